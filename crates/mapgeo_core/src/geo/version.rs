use std::fmt;

use crate::geo::{GeoError, Result};

/// Supported on-disk mapgeo version.
///
/// Every version-gated section of the layout is answered here, so the
/// decoder never compares raw version numbers itself.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct FormatVersion(u8);

impl FormatVersion {
	/// Oldest supported version.
	pub const MIN: u8 = 5;
	/// Newest supported version.
	pub const MAX: u8 = 11;

	/// Validate a raw version integer.
	pub fn new(raw: i32) -> Result<Self> {
		match u8::try_from(raw) {
			Ok(version) if (Self::MIN..=Self::MAX).contains(&version) => Ok(Self(version)),
			_ => Err(GeoError::UnsupportedVersion { version: raw }),
		}
	}

	/// Iterate every supported version, oldest first.
	pub fn all() -> impl Iterator<Item = Self> {
		(Self::MIN..=Self::MAX).map(Self)
	}

	/// Raw version number.
	pub fn get(self) -> u8 {
		self.0
	}

	/// One reserved header byte, dropped in v7.
	pub fn has_header_reserved_byte(self) -> bool {
		self.0 < 7
	}

	/// Number of reserved header `u32` flags (one added in v9, another in v10).
	pub fn header_reserved_ints(self) -> usize {
		match self.0 {
			10.. => 2,
			9 => 1,
			_ => 0,
		}
	}

	/// Object byte preceding the bounding box, added in v6.
	pub fn has_alignment_byte(self) -> bool {
		self.0 >= 6
	}

	/// Per-object layer visibility mask, added in v7.
	pub fn has_layer_mask(self) -> bool {
		self.0 >= 7
	}

	/// Count of unidentified per-object floats, removed in v8.
	pub fn legacy_object_floats(self) -> usize {
		if self.0 < 8 { 27 } else { 0 }
	}

	/// Reserved object byte following the layer mask section, added in v11.
	pub fn has_object_reserved_byte(self) -> bool {
		self.0 >= 11
	}

	/// Reserved bytes closing each object record, added in v9.
	pub fn object_trailing_reserved(self) -> usize {
		if self.0 >= 9 { 20 } else { 0 }
	}
}

impl fmt::Display for FormatVersion {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(f, "{}", self.0)
	}
}
