use std::io::{self, Write};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

/// Writeable buffer that tracks what was written to it. Used for testing.
///
/// Also usable as a `tracing_subscriber` writer through `make_writer`.
#[derive(Clone, Default)]
pub struct SharedBuffer {
    inner: Arc<Mutex<Vec<u8>>>,
    flushes: Arc<AtomicUsize>,
}

impl SharedBuffer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get_content(&self) -> Vec<u8> {
        self.inner.lock().expect("buffer lock poisoned").clone()
    }

    pub fn get_string_content(&self) -> String {
        String::from_utf8(self.get_content()).expect("Data was invalid utf-8")
    }

    pub fn flush_count(&self) -> usize {
        self.flushes.load(Ordering::Relaxed)
    }

    /// A writer factory for `tracing_subscriber::fmt().with_writer(..)`.
    pub fn make_writer(&self) -> impl Fn() -> SharedBuffer + Send + Sync + 'static {
        let buffer = self.clone();
        move || buffer.clone()
    }
}

impl Write for SharedBuffer {
    fn write(&mut self, buf: &[u8]) -> Result<usize, io::Error> {
        self.inner.lock().expect("buffer lock poisoned").write(buf)
    }

    fn flush(&mut self) -> Result<(), io::Error> {
        self.flushes.fetch_add(1, Ordering::Relaxed);
        Ok(())
    }
}
