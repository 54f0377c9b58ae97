//! Integration tests for loading configuration files and running from them

use flowpipe::config::{PipelineConfig, SinkKind};
use flowpipe::greeting;
use std::io::Write;
use tempfile::NamedTempFile;

#[test]
fn test_save_then_load() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("flowpipe.toml");

    let mut config = PipelineConfig::default();
    config.runner = config.runner.with_parallelism(3).with_buffer_size(32);
    config.source.count = 12;
    config.sink.kind = SinkKind::Stdout;
    config.logging.filter = "flowpipe=debug".to_string();

    config.save(&path).unwrap();
    let loaded = PipelineConfig::load(&path).unwrap();
    assert_eq!(loaded, config);
}

#[test]
fn test_load_missing_file_fails() {
    let dir = tempfile::tempdir().unwrap();
    assert!(PipelineConfig::load(dir.path().join("missing.toml")).is_err());
    assert_eq!(
        PipelineConfig::load_or_default(dir.path().join("missing.toml")),
        PipelineConfig::default()
    );
}

#[test]
fn test_load_invalid_toml_fails() {
    let mut file = NamedTempFile::new().unwrap();
    writeln!(file, "[runner]\nbuffer_size = \"lots\"").unwrap();
    assert!(PipelineConfig::load(file.path()).is_err());
}

#[test]
fn test_run_from_config_file() {
    let dir = tempfile::tempdir().unwrap();
    let out = dir.path().join("greetings.txt");

    let mut file = NamedTempFile::new().unwrap();
    write!(
        file,
        "[runner]\nbuffer_size = 2\n\n[source]\ncount = 2\ntemplate = \"Hello {{n}}!!\"\n\n[sink]\nkind = \"file\"\npath = {:?}\n",
        out.to_str().unwrap()
    )
    .unwrap();

    let config = PipelineConfig::load(file.path()).unwrap();
    assert_eq!(config.runner.buffer_size, 2);
    assert_eq!(config.source.template, "Hello {n}!!");

    let network = greeting::build(&config).unwrap();
    let report = network.run().unwrap();
    assert!(report.all_completed());

    // "Hello 1!!" halves into "Hell" and "o 1!!".
    let written = std::fs::read_to_string(&out).unwrap();
    assert_eq!(written, "hellO 1!!hellO 2!!");
}
