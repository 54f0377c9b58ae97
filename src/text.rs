//! String helpers used by the greeting network.
//!
//! All of these are pure and total: any input, including the empty string,
//! produces a well-defined result.

/// `count` greetings rendered from `template`, `{n}` replaced by 1, 2, ...
pub fn greetings(template: &str, count: usize) -> impl Iterator<Item = String> + Send + 'static {
    let template = template.to_string();
    (1..=count).map(move |n| template.replace("{n}", &n.to_string()))
}

/// Split at half the character count, rounding down.
///
/// `left` holds the first `⌊L/2⌋` characters and `right` the remaining
/// `L - ⌊L/2⌋`, so odd lengths put the extra character on the right.
pub fn halve(s: String) -> (String, String) {
    let half = s.chars().count() / 2;
    let at = s
        .char_indices()
        .nth(half)
        .map(|(idx, _)| idx)
        .unwrap_or(s.len());
    let mut left = s;
    let right = left.split_off(at);
    (left, right)
}

pub fn to_lower(s: String) -> String {
    s.to_lowercase()
}

pub fn to_upper(s: String) -> String {
    s.to_uppercase()
}

pub fn concat(mut a: String, b: String) -> String {
    a.push_str(&b);
    a
}

pub fn to_bytes(s: String) -> Vec<u8> {
    s.into_bytes()
}
