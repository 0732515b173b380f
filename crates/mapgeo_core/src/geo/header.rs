use crate::geo::bytes::Cursor;
use crate::geo::{FormatVersion, GeoError, Result};

/// Leading magic of every mapgeo file (`MGEO` stored reversed).
pub const MAPGEO_MAGIC: [u8; 4] = *b"OEGM";

/// Parsed mapgeo file header.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MapGeoHeader {
	/// Declared format version.
	pub version: FormatVersion,
}

impl MapGeoHeader {
	/// Parse the magic and version, leaving the cursor at the start of the body.
	pub fn parse(cursor: &mut Cursor<'_>) -> Result<Self> {
		let magic = cursor.read_code4()?;
		if magic != MAPGEO_MAGIC {
			return Err(GeoError::UnknownMagic { magic });
		}

		let version = FormatVersion::new(cursor.read_i32_le()?)?;
		Ok(Self { version })
	}
}
