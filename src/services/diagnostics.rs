//! Diagnostic channel
//!
//! Everything the hosting framework collects into its error log: stage
//! logs, pipeline trace summaries and fatal messages. Defaults to stderr.

use std::io::Write;
use std::sync::{Arc, Mutex};

pub struct Diagnostics {
    sink: Box<dyn Write + Send>,
}

impl Diagnostics {
    pub fn stderr() -> Self {
        Self {
            sink: Box::new(std::io::stderr()),
        }
    }

    /// A channel writing into memory, for inspection afterwards
    pub fn capture() -> (Self, CapturedOutput) {
        let buffer = CapturedOutput::default();
        let sink = Self {
            sink: Box::new(buffer.clone()),
        };
        (sink, buffer)
    }

    pub fn line(&mut self, text: &str) {
        let _ = writeln!(self.sink, "{}", text);
        let _ = self.sink.flush();
    }

    /// A titled block, as used for trace summaries and replayed logs
    pub fn section(&mut self, title: &str, body: &str) {
        let _ = writeln!(self.sink, "{}", title);
        let _ = writeln!(self.sink, "{}", "-".repeat(31));
        let _ = write!(self.sink, "{}", body);
        if !body.ends_with('\n') {
            let _ = writeln!(self.sink);
        }
        let _ = self.sink.flush();
    }
}

impl Default for Diagnostics {
    fn default() -> Self {
        Self::stderr()
    }
}

/// Shared in-memory buffer behind [`Diagnostics::capture`]
#[derive(Clone, Default)]
pub struct CapturedOutput(Arc<Mutex<Vec<u8>>>);

impl CapturedOutput {
    pub fn contents(&self) -> String {
        let buffer = self.0.lock().unwrap_or_else(|e| e.into_inner());
        String::from_utf8_lossy(&buffer).into_owned()
    }
}

impl Write for CapturedOutput {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        let mut buffer = self.0.lock().unwrap_or_else(|e| e.into_inner());
        buffer.extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> std::io::Result<()> {
        Ok(())
    }
}
