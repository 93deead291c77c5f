/// Human-readable, append-only page log. Runtime failures end up here instead of
/// being raised.
pub trait PageLog: Send + Sync {
    fn append(&self, line: &str);
}
