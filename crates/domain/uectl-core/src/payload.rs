/// A request to apply the payload found at `uri`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PayloadRequest {
    pub uri: String,
    pub headers: Vec<String>,
}

impl PayloadRequest {
    /// Builds the request from the raw `--payload` and `--headers` values.
    pub fn from_flags(uri: impl Into<String>, headers: &str) -> Self {
        Self {
            uri: uri.into(),
            headers: parse_headers(headers),
        }
    }
}

/// Splits a newline separated list of `key:value` lines.
///
/// Empty lines are dropped. Every other line, whitespace-only ones included,
/// is kept verbatim and in order.
pub fn parse_headers(raw: &str) -> Vec<String> {
    raw.split('\n')
        .filter(|line| !line.is_empty())
        .map(str::to_owned)
        .collect()
}
