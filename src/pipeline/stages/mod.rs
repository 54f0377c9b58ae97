//! Built-in pipeline stage implementations.
//!
//! | Stage      | Inputs         | Outputs         |
//! |------------|----------------|-----------------|
//! | `Source`   | -              | `out`           |
//! | `Map`      | `in`           | `out`           |
//! | `Split`    | `in`           | `left`, `right` |
//! | `Merge`    | `left`,`right` | `out`           |
//! | `Sink`     | `in`           | -               |
//! | `FileSink` | `in`           | -               |

pub mod file_sink;
pub mod merge;
pub mod sink;
pub mod source;
pub mod split;
pub mod transform;

pub use file_sink::{FileSink, SinkStats};
pub use merge::Merge;
pub use sink::Sink;
pub use source::Source;
pub use split::Split;
pub use transform::Map;
