use crate::geo::bytes::Cursor;
use crate::geo::layer::ALL_LAYERS;
use crate::geo::object::{CLASSIFICATIONS, IDENTITY_TRANSFORM};
use crate::geo::{
	Anomalies, Anomaly, AttributeFormat, AttributeName, FORMAT_SLOTS, FloatBuffer, FormatVersion, GeoError, ObjectRecord, ObjectReserved, Result, Submesh,
	TriangleBuffer, VertexAttribute, VertexFormat,
};

const FORMAT_RECORD_SIZE: usize = 8 + FORMAT_SLOTS * 8;
const MIN_OBJECT_SIZE: usize = 137;
const MIN_SUBMESH_SIZE: usize = 24;

/// Controls how strictly a mapgeo body is decoded.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DecodeOptions {
	/// Fail on the first non-informational anomaly instead of logging it.
	pub strict: bool,
	/// Report unread bytes after the last object as an anomaly instead of failing.
	pub allow_trailing_bytes: bool,
}

impl Default for DecodeOptions {
	fn default() -> Self {
		Self {
			strict: false,
			allow_trailing_bytes: true,
		}
	}
}

impl DecodeOptions {
	/// Strict preset: anomalies and trailing bytes are errors.
	pub fn strict() -> Self {
		Self {
			strict: true,
			allow_trailing_bytes: false,
		}
	}
}

/// Reserved header values, kept so unknown revisions can be compared.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HeaderReserved {
	/// Reserved byte present before v7.
	pub byte: Option<u8>,
	/// Reserved flags present from v9.
	pub ints: Vec<u32>,
}

/// Fully decoded mapgeo body.
#[derive(Debug, Clone, PartialEq)]
pub struct MapGeo {
	/// Declared format version.
	pub version: FormatVersion,
	/// Reserved header values.
	pub header_reserved: HeaderReserved,
	/// Vertex format descriptors.
	pub formats: Vec<VertexFormat>,
	/// Float data buffers.
	pub float_buffers: Vec<FloatBuffer>,
	/// Triangle index buffers.
	pub triangle_buffers: Vec<TriangleBuffer>,
	/// Object records in file order.
	pub objects: Vec<ObjectRecord>,
	/// OR of every layer mask other than `0xFF`.
	pub discovered_layers: u8,
}

impl MapGeo {
	/// Layer masks of all objects in file order.
	pub fn object_masks(&self) -> Vec<u8> {
		self.objects.iter().map(|object| object.layer_mask).collect()
	}

	/// Return whether any object names a specific layer.
	pub fn is_layered(&self) -> bool {
		self.discovered_layers != 0
	}

	/// Distinct submesh material names.
	pub fn material_names(&self) -> std::collections::BTreeSet<String> {
		self.objects
			.iter()
			.flat_map(|object| object.submeshes.iter().map(|submesh| submesh.material.clone()))
			.collect()
	}
}

/// Decode everything after the magic and version.
///
/// Structural problems (truncation, bad block references, misaligned buffers)
/// are errors; unexpected values that can still be consumed go to `anomalies`.
pub fn decode_body(cursor: &mut Cursor<'_>, version: FormatVersion, options: &DecodeOptions, anomalies: &mut Anomalies) -> Result<MapGeo> {
	let header_reserved = read_header_reserved(cursor, version, anomalies)?;
	let formats = read_formats(cursor, anomalies)?;
	let float_buffers = read_float_buffers(cursor)?;
	let triangle_buffers = read_triangle_buffers(cursor)?;

	let counts = BlockCounts {
		formats: formats.len(),
		float_buffers: float_buffers.len(),
		triangle_buffers: triangle_buffers.len(),
	};
	let objects = read_objects(cursor, version, counts, anomalies)?;

	let discovered_layers = objects
		.iter()
		.filter(|object| !object.on_all_layers())
		.fold(0_u8, |acc, object| acc | object.layer_mask);

	let remaining = cursor.remaining();
	if remaining > 0 {
		let at = cursor.pos();
		if !options.allow_trailing_bytes {
			return Err(GeoError::TrailingBytes { at, remaining });
		}
		anomalies.report(Anomaly::TrailingBytes { at, remaining })?;
	}

	tracing::debug!(
		version = version.get(),
		formats = formats.len(),
		float_buffers = float_buffers.len(),
		triangle_buffers = triangle_buffers.len(),
		objects = objects.len(),
		discovered_layers,
		"decoded mapgeo body"
	);

	Ok(MapGeo {
		version,
		header_reserved,
		formats,
		float_buffers,
		triangle_buffers,
		objects,
		discovered_layers,
	})
}

#[derive(Clone, Copy)]
struct BlockCounts {
	formats: usize,
	float_buffers: usize,
	triangle_buffers: usize,
}

fn read_header_reserved(cursor: &mut Cursor<'_>, version: FormatVersion, anomalies: &mut Anomalies) -> Result<HeaderReserved> {
	let byte = if version.has_header_reserved_byte() {
		Some(expect_zero_u8(cursor, "header.reserved_byte", anomalies)?)
	} else {
		None
	};

	let mut ints = Vec::with_capacity(version.header_reserved_ints());
	for idx in 0..version.header_reserved_ints() {
		let field = if idx == 0 { "header.flags_v9" } else { "header.flags_v10" };
		ints.push(expect_zero_u32(cursor, field, anomalies)?);
	}

	Ok(HeaderReserved { byte, ints })
}

fn read_formats(cursor: &mut Cursor<'_>, anomalies: &mut Anomalies) -> Result<Vec<VertexFormat>> {
	let count = cursor.read_count("vertex format count")?;
	cursor.ensure_items(count, FORMAT_RECORD_SIZE)?;

	let mut formats = Vec::with_capacity(count);
	for format_idx in 0..count {
		let block_type = expect_zero_u32(cursor, "vertex_format.block_type", anomalies)?;

		let defined_at = cursor.pos();
		let defined = cursor.read_count("vertex attribute count")?;
		if defined > FORMAT_SLOTS {
			return Err(GeoError::IndexOutOfRange {
				kind: "vertex attribute count",
				at: defined_at,
				index: defined,
				len: FORMAT_SLOTS,
			});
		}

		let mut attributes = Vec::with_capacity(defined);
		for slot in 0..defined {
			let name_at = cursor.pos();
			let name = AttributeName::from_raw(cursor.read_u32_le()?);
			let format_at = cursor.pos();
			let format = AttributeFormat::from_raw(cursor.read_u32_le()?);

			if let AttributeName::Unknown(raw) = name {
				anomalies.report(Anomaly::UnknownAttributeName {
					format: format_idx,
					slot,
					at: name_at,
					raw,
				})?;
			}
			if let AttributeFormat::Unknown(raw) = format {
				anomalies.report(Anomaly::UnknownAttributeFormat {
					format: format_idx,
					slot,
					at: format_at,
					raw,
				})?;
			}

			attributes.push(VertexAttribute { name, format });
		}

		cursor.read_exact((FORMAT_SLOTS - defined) * 8)?;
		formats.push(VertexFormat { block_type, attributes });
	}

	Ok(formats)
}

fn read_float_buffers(cursor: &mut Cursor<'_>) -> Result<Vec<FloatBuffer>> {
	let count = cursor.read_count("float buffer count")?;
	cursor.ensure_items(count, 4)?;

	let mut buffers = Vec::with_capacity(count);
	for _ in 0..count {
		let raw = read_aligned_buffer(cursor, "float buffer", 4)?;
		let data = raw.chunks_exact(4).map(|chunk| f32::from_le_bytes([chunk[0], chunk[1], chunk[2], chunk[3]])).collect();
		buffers.push(FloatBuffer { data });
	}

	Ok(buffers)
}

fn read_triangle_buffers(cursor: &mut Cursor<'_>) -> Result<Vec<TriangleBuffer>> {
	let count = cursor.read_count("triangle buffer count")?;
	cursor.ensure_items(count, 4)?;

	let mut buffers = Vec::with_capacity(count);
	for _ in 0..count {
		let raw = read_aligned_buffer(cursor, "triangle buffer", 6)?;
		let triangles = raw
			.chunks_exact(6)
			.map(|chunk| {
				[
					u16::from_le_bytes([chunk[0], chunk[1]]),
					u16::from_le_bytes([chunk[2], chunk[3]]),
					u16::from_le_bytes([chunk[4], chunk[5]]),
				]
			})
			.collect();
		buffers.push(TriangleBuffer { triangles });
	}

	Ok(buffers)
}

fn read_aligned_buffer<'a>(cursor: &mut Cursor<'a>, what: &'static str, unit: usize) -> Result<&'a [u8]> {
	let at = cursor.pos();
	let len = cursor.read_count("buffer byte length")?;
	if len % unit != 0 {
		return Err(GeoError::MisalignedBuffer { what, len, unit, at });
	}
	cursor.read_exact(len)
}

fn read_objects(cursor: &mut Cursor<'_>, version: FormatVersion, counts: BlockCounts, anomalies: &mut Anomalies) -> Result<Vec<ObjectRecord>> {
	let count = cursor.read_count("object count")?;
	cursor.ensure_items(count, MIN_OBJECT_SIZE)?;

	let mut objects = Vec::with_capacity(count);
	for object_idx in 0..count {
		objects.push(read_object(cursor, version, counts, object_idx, anomalies)?);
	}

	Ok(objects)
}

fn read_object(cursor: &mut Cursor<'_>, version: FormatVersion, counts: BlockCounts, object_idx: usize, anomalies: &mut Anomalies) -> Result<ObjectRecord> {
	let name = read_name(cursor, "object.name", anomalies)?;
	let vertex_count = cursor.read_u32_le()?;
	let buffer_count = cursor.read_count("float buffer reference count")?;
	let format_at = cursor.pos();
	let format_start = cursor.read_count("vertex format index")?;

	cursor.ensure_items(buffer_count, 4)?;
	let mut float_buffers = Vec::with_capacity(buffer_count);
	for _ in 0..buffer_count {
		float_buffers.push(read_index(cursor, "float buffer", counts.float_buffers)?);
	}

	// Descriptor-less files use fixed legacy layouts and never index the format list.
	if counts.formats > 0 && buffer_count > 0 {
		let last = format_start.saturating_add(buffer_count - 1);
		if last >= counts.formats {
			return Err(GeoError::IndexOutOfRange {
				kind: "vertex format",
				at: format_at,
				index: last,
				len: counts.formats,
			});
		}
	}

	let index_count = cursor.read_u32_le()?;
	let triangle_buffer = read_index(cursor, "triangle buffer", counts.triangle_buffers)?;

	let submesh_count = cursor.read_count("submesh count")?;
	cursor.ensure_items(submesh_count, MIN_SUBMESH_SIZE)?;
	let mut submeshes = Vec::with_capacity(submesh_count);
	for _ in 0..submesh_count {
		submeshes.push(read_submesh(cursor, anomalies)?);
	}

	let alignment = if version.has_alignment_byte() { Some(cursor.read_u8()?) } else { None };
	let bounds = cursor.read_f32_array::<6>()?;

	let transform_at = cursor.pos();
	let transform = cursor.read_f32_array::<16>()?;
	if transform != IDENTITY_TRANSFORM {
		anomalies.report(Anomaly::NonIdentityTransform {
			object: object_idx,
			at: transform_at,
			matrix: transform,
		})?;
	}

	let classification_at = cursor.pos();
	let classification = cursor.read_u8()?;
	if !CLASSIFICATIONS.contains(&classification) {
		anomalies.report(Anomaly::UnknownClassification {
			object: object_idx,
			at: classification_at,
			value: classification,
		})?;
	}

	let layer_mask = if version.has_layer_mask() { cursor.read_u8()? } else { ALL_LAYERS };

	let mut legacy_floats = Vec::with_capacity(version.legacy_object_floats());
	for _ in 0..version.legacy_object_floats() {
		legacy_floats.push(cursor.read_f32_le()?);
	}

	let object_byte = if version.has_object_reserved_byte() {
		Some(expect_zero_u8(cursor, "object.reserved_v11", anomalies)?)
	} else {
		None
	};

	let lightmap_texture = read_name(cursor, "object.lightmap", anomalies)?;
	let lightmap_params = cursor.read_array::<16>()?;

	let trailing_at = cursor.pos();
	let trailing = cursor.read_exact(version.object_trailing_reserved())?.to_vec();
	if let Some(offset) = trailing.iter().position(|byte| *byte != 0) {
		anomalies.report(Anomaly::ReservedNonZero {
			field: "object.reserved_v9",
			at: trailing_at + offset,
			value: u32::from(trailing[offset]),
		})?;
	}

	Ok(ObjectRecord {
		name,
		vertex_count,
		format_start,
		float_buffers,
		index_count,
		triangle_buffer,
		submeshes,
		bounds,
		transform,
		classification,
		layer_mask,
		lightmap_texture,
		reserved: ObjectReserved {
			alignment,
			legacy_floats,
			object_byte,
			lightmap_params,
			trailing,
		},
	})
}

/// Read a length-prefixed name, replacing invalid UTF-8 and reporting it.
fn read_name(cursor: &mut Cursor<'_>, field: &'static str, anomalies: &mut Anomalies) -> Result<String> {
	let at = cursor.pos();
	let raw = cursor.read_sized_bytes()?;
	if let Ok(name) = std::str::from_utf8(raw) {
		return Ok(name.to_owned());
	}

	let name = String::from_utf8_lossy(raw).into_owned();
	anomalies.report(Anomaly::NonUtf8Name {
		field,
		at,
		name: name.clone(),
	})?;
	Ok(name)
}

fn read_submesh(cursor: &mut Cursor<'_>, anomalies: &mut Anomalies) -> Result<Submesh> {
	let reserved = expect_zero_u32(cursor, "submesh.reserved", anomalies)?;
	let material = read_name(cursor, "submesh.material", anomalies)?;
	let start = cursor.read_count("submesh index start")? / 3;
	let count = cursor.read_count("submesh index count")? / 3;
	let reserved_range = [cursor.read_u32_le()?, cursor.read_u32_le()?];

	Ok(Submesh {
		reserved,
		material,
		start,
		count,
		reserved_range,
	})
}

fn read_index(cursor: &mut Cursor<'_>, kind: &'static str, len: usize) -> Result<usize> {
	let at = cursor.pos();
	let index = cursor.read_count(kind)?;
	if index >= len {
		return Err(GeoError::IndexOutOfRange { kind, at, index, len });
	}
	Ok(index)
}

fn expect_zero_u8(cursor: &mut Cursor<'_>, field: &'static str, anomalies: &mut Anomalies) -> Result<u8> {
	let at = cursor.pos();
	let value = cursor.read_u8()?;
	if value != 0 {
		anomalies.report(Anomaly::ReservedNonZero {
			field,
			at,
			value: u32::from(value),
		})?;
	}
	Ok(value)
}

fn expect_zero_u32(cursor: &mut Cursor<'_>, field: &'static str, anomalies: &mut Anomalies) -> Result<u32> {
	let at = cursor.pos();
	let value = cursor.read_u32_le()?;
	if value != 0 {
		anomalies.report(Anomaly::ReservedNonZero { field, at, value })?;
	}
	Ok(value)
}
