use crate::geo::{GeoError, Result};

/// Bounded little-endian cursor over an immutable byte slice.
pub struct Cursor<'a> {
	bytes: &'a [u8],
	pos: usize,
}

impl<'a> Cursor<'a> {
	/// Create a cursor at position 0.
	pub fn new(bytes: &'a [u8]) -> Self {
		Self { bytes, pos: 0 }
	}

	/// Return current byte offset.
	pub fn pos(&self) -> usize {
		self.pos
	}

	/// Return remaining unread bytes.
	pub fn remaining(&self) -> usize {
		self.bytes.len().saturating_sub(self.pos)
	}

	/// Read exactly `n` bytes and advance cursor.
	pub fn read_exact(&mut self, n: usize) -> Result<&'a [u8]> {
		if n > self.remaining() {
			return Err(GeoError::UnexpectedEof {
				at: self.pos,
				need: n,
				rem: self.remaining(),
			});
		}

		let start = self.pos;
		self.pos += n;
		Ok(&self.bytes[start..self.pos])
	}

	/// Read a fixed-size byte array.
	pub fn read_array<const N: usize>(&mut self) -> Result<[u8; N]> {
		let raw = self.read_exact(N)?;
		let mut out = [0_u8; N];
		out.copy_from_slice(raw);
		Ok(out)
	}

	/// Read a four-byte code.
	pub fn read_code4(&mut self) -> Result<[u8; 4]> {
		self.read_array::<4>()
	}

	/// Read a single byte.
	pub fn read_u8(&mut self) -> Result<u8> {
		Ok(self.read_exact(1)?[0])
	}

	/// Read a little-endian `u32`.
	pub fn read_u32_le(&mut self) -> Result<u32> {
		Ok(u32::from_le_bytes(self.read_array::<4>()?))
	}

	/// Read a little-endian `i32`.
	pub fn read_i32_le(&mut self) -> Result<i32> {
		Ok(i32::from_le_bytes(self.read_array::<4>()?))
	}

	/// Read a little-endian `f32`.
	pub fn read_f32_le(&mut self) -> Result<f32> {
		Ok(f32::from_le_bytes(self.read_array::<4>()?))
	}

	/// Read `N` consecutive little-endian `f32` values.
	pub fn read_f32_array<const N: usize>(&mut self) -> Result<[f32; N]> {
		let mut out = [0.0_f32; N];
		for value in &mut out {
			*value = self.read_f32_le()?;
		}
		Ok(out)
	}

	/// Read a signed 32-bit count or length, rejecting negative values.
	pub fn read_count(&mut self, what: &'static str) -> Result<usize> {
		let at = self.pos;
		let value = self.read_i32_le()?;
		usize::try_from(value).map_err(|_| GeoError::NegativeCount { what, value, at })
	}

	/// Read an `i32` length prefix followed by that many raw bytes.
	///
	/// Names are stored this way, without a NUL terminator.
	pub fn read_sized_bytes(&mut self) -> Result<&'a [u8]> {
		let len = self.read_count("string length")?;
		self.read_exact(len)
	}

	/// Fail early when `count` items of at least `min_item_size` bytes cannot fit in the remaining input.
	pub fn ensure_items(&self, count: usize, min_item_size: usize) -> Result<()> {
		let need = count.saturating_mul(min_item_size);
		if need > self.remaining() {
			return Err(GeoError::UnexpectedEof {
				at: self.pos,
				need,
				rem: self.remaining(),
			});
		}
		Ok(())
	}
}
