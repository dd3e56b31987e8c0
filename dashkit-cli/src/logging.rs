use parking_lot::Mutex;
use std::io::{self, Write};
use std::sync::Arc;
use tracing_subscriber::fmt::MakeWriter;

/// Log destination for the subscriber.
///
/// Writes straight to stderr until [`LogSink::hold`] is called. While held,
/// output is kept in memory so it can't draw over the alternate screen, and
/// [`LogSink::release`] writes it out once the terminal is restored.
#[derive(Clone, Default)]
pub struct LogSink {
    held: Arc<Mutex<Option<Vec<u8>>>>,
}

impl LogSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn hold(&self) {
        self.held.lock().get_or_insert_with(Vec::new);
    }

    pub fn release(&self) -> io::Result<()> {
        self.release_to(&mut io::stderr())
    }

    /// Stop holding and write everything held so far to `out`
    pub fn release_to(&self, out: &mut impl Write) -> io::Result<()> {
        let held = self.held.lock().take();
        match held {
            Some(buf) => {
                out.write_all(&buf)?;
                out.flush()
            }
            None => Ok(()),
        }
    }
}

pub struct LogWriter {
    held: Arc<Mutex<Option<Vec<u8>>>>,
}

impl Write for LogWriter {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        match self.held.lock().as_mut() {
            Some(held) => {
                held.extend_from_slice(buf);
                Ok(buf.len())
            }
            None => io::stderr().write(buf),
        }
    }

    fn flush(&mut self) -> io::Result<()> {
        if self.held.lock().is_some() {
            return Ok(());
        }
        io::stderr().flush()
    }
}

impl<'a> MakeWriter<'a> for LogSink {
    type Writer = LogWriter;

    fn make_writer(&'a self) -> Self::Writer {
        LogWriter {
            held: self.held.clone(),
        }
    }
}
