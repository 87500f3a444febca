//! Captures formatted log output for assertions.

use std::io;
use std::sync::{Arc, Mutex, PoisonError};

use tracing::Level;

#[derive(Clone, Default)]
struct Buffer(Arc<Mutex<Vec<u8>>>);

impl io::Write for Buffer {
	fn write(&mut self, bytes: &[u8]) -> io::Result<usize> {
		self.0.lock().unwrap_or_else(PoisonError::into_inner).extend_from_slice(bytes);
		Ok(bytes.len())
	}

	fn flush(&mut self) -> io::Result<()> {
		Ok(())
	}
}

/// Runs `f` with a debug-level subscriber installed on this thread and returns what it logged.
pub(crate) fn capture<R>(f: impl FnOnce() -> R) -> (R, String) {
	let buffer = Buffer::default();
	let writer = buffer.clone();
	let subscriber = tracing_subscriber::fmt()
		.with_max_level(Level::DEBUG)
		.with_ansi(false)
		.with_writer(move || writer.clone())
		.finish();
	let result = tracing::subscriber::with_default(subscriber, f);
	let bytes = buffer.0.lock().unwrap_or_else(PoisonError::into_inner).clone();
	(result, String::from_utf8_lossy(&bytes).into_owned())
}
