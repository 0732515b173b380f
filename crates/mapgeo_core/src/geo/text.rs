use std::fmt;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use crate::geo::Result;

/// Line-oriented text writer emitting CRLF line endings.
pub struct TextWriter<W: Write> {
	inner: W,
}

impl TextWriter<BufWriter<File>> {
	/// Create or truncate a file for writing.
	pub fn create(path: impl AsRef<Path>) -> Result<Self> {
		Ok(Self::new(BufWriter::new(File::create(path)?)))
	}
}

impl<W: Write> TextWriter<W> {
	/// Wrap a writer.
	pub fn new(inner: W) -> Self {
		Self { inner }
	}

	/// Write one line followed by CRLF.
	pub fn write_line(&mut self, line: impl fmt::Display) -> Result<()> {
		write!(self.inner, "{line}\r\n")?;
		Ok(())
	}

	/// Write `count` empty lines.
	pub fn blank_lines(&mut self, count: usize) -> Result<()> {
		for _ in 0..count {
			self.inner.write_all(b"\r\n")?;
		}
		Ok(())
	}

	/// Write already-formatted bytes verbatim.
	pub fn write_raw(&mut self, bytes: &[u8]) -> Result<()> {
		self.inner.write_all(bytes)?;
		Ok(())
	}

	/// Flush and return the inner writer.
	pub fn finish(mut self) -> Result<W> {
		self.inner.flush()?;
		Ok(self.inner)
	}
}

#[cfg(test)]
mod tests;
