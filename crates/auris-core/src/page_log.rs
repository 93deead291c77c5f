use auris_ports::log::PageLog;
use parking_lot::Mutex;

#[derive(Clone, Copy, Debug, Default)]
pub struct LogPageLog;

impl PageLog for LogPageLog {
    fn append(&self, line: &str) {
        log::info!(target: "auris::page", "{}", line);
    }
}

#[derive(Default)]
pub struct MemoryPageLog {
    lines: Mutex<Vec<String>>,
}

impl MemoryPageLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn lines(&self) -> Vec<String> {
        self.lines.lock().clone()
    }
}

impl PageLog for MemoryPageLog {
    fn append(&self, line: &str) {
        self.lines.lock().push(line.to_string());
    }
}
