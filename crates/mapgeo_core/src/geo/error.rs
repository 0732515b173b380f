use thiserror::Error;

use crate::geo::Anomaly;

/// Crate-local result type.
pub type Result<T> = std::result::Result<T, GeoError>;

/// Errors produced while decoding `.mapgeo` data and exporting it.
#[derive(Debug, Error)]
pub enum GeoError {
	/// Filesystem or stream IO failure.
	#[error("io: {0}")]
	Io(#[from] std::io::Error),
	/// Leading magic is not `OEGM`.
	#[error("not a .mapgeo file (magic={magic:?})")]
	UnknownMagic {
		/// First 4 bytes of the stream.
		magic: [u8; 4],
	},
	/// Version integer outside the supported range.
	#[error("unsupported mapgeo version {version} (expected 5..=11)")]
	UnsupportedVersion {
		/// Parsed version value.
		version: i32,
	},
	/// Not enough bytes remained for a requested read.
	#[error("unexpected eof at offset {at}, need {need} bytes, remaining {rem}")]
	UnexpectedEof {
		/// Byte offset where the read was attempted.
		at: usize,
		/// Requested bytes.
		need: usize,
		/// Bytes still available.
		rem: usize,
	},
	/// A count or length field was negative.
	#[error("negative {what} {value} at offset {at}")]
	NegativeCount {
		/// Field being read.
		what: &'static str,
		/// Parsed signed value.
		value: i32,
		/// Byte offset of the field.
		at: usize,
	},
	/// A buffer byte length does not divide into whole elements.
	#[error("{what} byte length {len} at offset {at} is not a multiple of {unit}")]
	MisalignedBuffer {
		/// Buffer kind.
		what: &'static str,
		/// Declared byte length.
		len: usize,
		/// Element size in bytes.
		unit: usize,
		/// Byte offset of the length field.
		at: usize,
	},
	/// A block reference read from the file points past its collection.
	#[error("{kind} index out of range at offset {at}: idx={index}, len={len}")]
	IndexOutOfRange {
		/// Collection being indexed.
		kind: &'static str,
		/// Byte offset of the index field.
		at: usize,
		/// Offending index.
		index: usize,
		/// Collection length.
		len: usize,
	},
	/// An object references a block that does not exist.
	#[error("object {object}: {kind} index out of range: idx={index}, len={len}")]
	ObjectReference {
		/// Object index.
		object: usize,
		/// Collection being indexed.
		kind: &'static str,
		/// Offending index.
		index: usize,
		/// Collection length.
		len: usize,
	},
	/// Float buffer length is not a whole number of vertices.
	#[error("object {object}: float buffer {buffer} of {byte_len} bytes is not a multiple of vertex stride {stride}")]
	StrideMismatch {
		/// Object index.
		object: usize,
		/// Float buffer index.
		buffer: usize,
		/// Buffer length in bytes.
		byte_len: usize,
		/// Vertex stride in bytes.
		stride: usize,
	},
	/// Two float buffers of one object describe different vertex counts.
	#[error("object {object}: float buffer {buffer} holds {got} vertices, expected {expected}")]
	VertexCountMismatch {
		/// Object index.
		object: usize,
		/// Float buffer index.
		buffer: usize,
		/// Vertex count established by the first buffer.
		expected: usize,
		/// Vertex count of this buffer.
		got: usize,
	},
	/// A vertex format defines no bytes per vertex.
	#[error("object {object}: vertex format {format} has zero stride")]
	ZeroStride {
		/// Object index.
		object: usize,
		/// Vertex format index.
		format: usize,
	},
	/// A vertex format uses an attribute format of unknown size.
	#[error("object {object}: vertex format {format} uses unknown attribute format 0x{raw:02x}")]
	UnknownAttributeFormat {
		/// Object index.
		object: usize,
		/// Vertex format index.
		format: usize,
		/// Raw format value.
		raw: u32,
	},
	/// Descriptor-less object uses a buffer count with no fixed layout.
	#[error("object {object}: no legacy vertex layout for {buffers} float buffers")]
	UnsupportedLegacyLayout {
		/// Object index.
		object: usize,
		/// Number of referenced float buffers.
		buffers: usize,
	},
	/// Submesh triangle range exceeds its triangle buffer.
	#[error("object {object}: submesh {submesh} triangles {start}..{end} exceed triangle buffer of {len}")]
	SubmeshOutOfRange {
		/// Object index.
		object: usize,
		/// Submesh index within the object.
		submesh: usize,
		/// First triangle.
		start: usize,
		/// One past the last triangle.
		end: usize,
		/// Triangle buffer length.
		len: usize,
	},
	/// Triangle references a vertex the object does not have.
	#[error("object {object}: vertex index {index} exceeds vertex count {count}")]
	VertexIndexOutOfRange {
		/// Object index.
		object: usize,
		/// Local vertex index.
		index: usize,
		/// Object vertex count.
		count: usize,
	},
	/// Bytes remained after the last object.
	#[error("{remaining} trailing bytes after last object at offset {at}")]
	TrailingBytes {
		/// Offset where decoding stopped.
		at: usize,
		/// Unread bytes.
		remaining: usize,
	},
	/// An anomaly was escalated because strict decoding was requested.
	#[error("strict mode: {0}")]
	StrictAnomaly(Box<Anomaly>),
	/// No `.mapgeo` path was given.
	#[error("must provide a .mapgeo file")]
	MissingMapGeoInput,
	/// Input path could not be used.
	#[error("invalid input path: {path}")]
	InvalidInput {
		/// Offending path.
		path: String,
	},
}

impl GeoError {
	/// Return whether this error only affects the object being exported.
	///
	/// Such failures skip the object; everything else aborts the run.
	pub fn is_object_local(&self) -> bool {
		matches!(self, Self::SubmeshOutOfRange { .. } | Self::VertexIndexOutOfRange { .. })
	}
}
