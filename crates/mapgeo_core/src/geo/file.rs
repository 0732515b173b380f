use std::fs;
use std::path::Path;

use crate::geo::bytes::Cursor;
use crate::geo::decode::decode_body;
use crate::geo::{Anomalies, Anomaly, DecodeOptions, MapGeo, MapGeoHeader, Result};

/// Opened and fully decoded `.mapgeo` file.
#[derive(Debug)]
pub struct MapGeoFile {
	/// Parsed file header.
	pub header: MapGeoHeader,
	/// Decoded body.
	pub geo: MapGeo,
	/// Anomalies observed while decoding.
	pub anomalies: Vec<Anomaly>,
	/// Source size in bytes.
	pub byte_len: usize,
	/// Bytes consumed by the decoder.
	pub consumed: usize,
}

impl MapGeoFile {
	/// Read and decode a mapgeo file from disk.
	pub fn open(path: impl AsRef<Path>, options: &DecodeOptions) -> Result<Self> {
		let path = path.as_ref();
		let raw = fs::read(path)?;
		tracing::debug!(path = %path.display(), bytes = raw.len(), "read mapgeo");
		Self::from_bytes(raw, options)
	}

	/// Decode a mapgeo file held in memory.
	pub fn from_bytes(raw: Vec<u8>, options: &DecodeOptions) -> Result<Self> {
		let mut cursor = Cursor::new(&raw);
		let header = MapGeoHeader::parse(&mut cursor)?;

		let mut anomalies = Anomalies::new(options.strict);
		let geo = decode_body(&mut cursor, header.version, options, &mut anomalies)?;
		let consumed = cursor.pos();

		Ok(Self {
			header,
			geo,
			anomalies: anomalies.into_vec(),
			byte_len: raw.len(),
			consumed,
		})
	}
}
