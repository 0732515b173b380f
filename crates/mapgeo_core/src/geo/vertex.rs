use crate::geo::{Anomalies, Anomaly, AttributeFormat, AttributeName, FloatBuffer, GeoError, MapGeo, Result, VertexAttribute, attribute_stride};

/// One reconstructed vertex. Attributes the source layout lacks stay `None`.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Vertex {
	/// Object-space position.
	pub position: Option<[f32; 3]>,
	/// Object-space normal.
	pub normal: Option<[f32; 3]>,
	/// Diffuse texture coordinates.
	pub color_uv: Option<[f32; 2]>,
	/// Lightmap texture coordinates.
	pub lightmap_uv: Option<[f32; 2]>,
}

/// Dense vertices of one object.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct VertexBlock {
	/// Vertices in buffer order.
	pub vertices: Vec<Vertex>,
}

impl VertexBlock {
	/// Number of vertices.
	pub fn len(&self) -> usize {
		self.vertices.len()
	}

	/// Return whether the block holds no vertices.
	pub fn is_empty(&self) -> bool {
		self.vertices.is_empty()
	}
}

const fn attr(name: AttributeName, format: AttributeFormat) -> VertexAttribute {
	VertexAttribute { name, format }
}

const POSITION: VertexAttribute = attr(AttributeName::Position, AttributeFormat::Float3);
const NORMAL: VertexAttribute = attr(AttributeName::NormalDirection, AttributeFormat::Float3);
const COLOR_UV: VertexAttribute = attr(AttributeName::ColorUv, AttributeFormat::Float2);
const LIGHTMAP_UV: VertexAttribute = attr(AttributeName::LightmapUv, AttributeFormat::Float2);

/// Single interleaved buffer used by descriptor-less files.
static LEGACY_COMBINED: [VertexAttribute; 3] = [POSITION, NORMAL, COLOR_UV];
static LEGACY_COMBINED_LIGHTMAP: [VertexAttribute; 4] = [POSITION, NORMAL, COLOR_UV, LIGHTMAP_UV];
/// Split geometry + UV buffers used by descriptor-less files.
static LEGACY_GEOMETRY: [VertexAttribute; 2] = [POSITION, NORMAL];
static LEGACY_UV: [VertexAttribute; 1] = [COLOR_UV];
static LEGACY_UV_LIGHTMAP: [VertexAttribute; 2] = [COLOR_UV, LIGHTMAP_UV];

struct Group<'g> {
	buffer: usize,
	format: Option<usize>,
	attributes: &'g [VertexAttribute],
}

/// Reassemble the vertices of one object from its float buffers.
///
/// Files with vertex format descriptors pair the object's n-th float buffer
/// with format `format_start + n`. Files without descriptors use one of the
/// fixed legacy interleavings, picked by buffer count and lightmap presence.
pub fn build_vertex_block(geo: &MapGeo, object_idx: usize, anomalies: &mut Anomalies) -> Result<VertexBlock> {
	let object = geo.objects.get(object_idx).ok_or(GeoError::ObjectReference {
		object: object_idx,
		kind: "object",
		index: object_idx,
		len: geo.objects.len(),
	})?;

	let groups = if geo.formats.is_empty() {
		legacy_groups(object_idx, &object.float_buffers, object.has_lightmap())?
	} else {
		let mut groups = Vec::with_capacity(object.float_buffers.len());
		let mut seen: Vec<AttributeName> = Vec::new();
		for (group_idx, buffer) in object.float_buffers.iter().copied().enumerate() {
			let format_idx = object.format_start + group_idx;
			let format = geo.formats.get(format_idx).ok_or(GeoError::ObjectReference {
				object: object_idx,
				kind: "vertex format",
				index: format_idx,
				len: geo.formats.len(),
			})?;

			for attribute in &format.attributes {
				if seen.contains(&attribute.name) {
					anomalies.report(Anomaly::DuplicateAttribute {
						object: object_idx,
						attribute: attribute.name,
					})?;
				} else {
					seen.push(attribute.name);
				}
			}

			groups.push(Group {
				buffer,
				format: Some(format_idx),
				attributes: &format.attributes,
			});
		}
		groups
	};

	let mut vertices: Option<Vec<Vertex>> = None;
	for group in &groups {
		let buffer = geo.float_buffers.get(group.buffer).ok_or(GeoError::ObjectReference {
			object: object_idx,
			kind: "float buffer",
			index: group.buffer,
			len: geo.float_buffers.len(),
		})?;

		let stride = group_stride(object_idx, group)?;
		if buffer.byte_len() % stride != 0 {
			return Err(GeoError::StrideMismatch {
				object: object_idx,
				buffer: group.buffer,
				byte_len: buffer.byte_len(),
				stride,
			});
		}

		let count = buffer.byte_len() / stride;
		let out = vertices.get_or_insert_with(|| vec![Vertex::default(); count]);
		if out.len() != count {
			return Err(GeoError::VertexCountMismatch {
				object: object_idx,
				buffer: group.buffer,
				expected: out.len(),
				got: count,
			});
		}

		fill_group(out, buffer, stride / 4, group.attributes);
	}

	let block = VertexBlock {
		vertices: vertices.unwrap_or_default(),
	};
	tracing::trace!(object = object_idx, vertices = block.len(), groups = groups.len(), "built vertex block");
	Ok(block)
}

fn legacy_groups(object_idx: usize, buffers: &[usize], lightmap: bool) -> Result<Vec<Group<'static>>> {
	let groups = match *buffers {
		[] => Vec::new(),
		[combined] => vec![Group {
			buffer: combined,
			format: None,
			attributes: if lightmap { &LEGACY_COMBINED_LIGHTMAP[..] } else { &LEGACY_COMBINED[..] },
		}],
		[geometry, uv] => vec![
			Group {
				buffer: geometry,
				format: None,
				attributes: &LEGACY_GEOMETRY,
			},
			Group {
				buffer: uv,
				format: None,
				attributes: if lightmap { &LEGACY_UV_LIGHTMAP[..] } else { &LEGACY_UV[..] },
			},
		],
		_ => {
			return Err(GeoError::UnsupportedLegacyLayout {
				object: object_idx,
				buffers: buffers.len(),
			});
		}
	};
	Ok(groups)
}

fn group_stride(object_idx: usize, group: &Group<'_>) -> Result<usize> {
	let format = group.format.unwrap_or_default();
	let stride = attribute_stride(group.attributes).map_err(|raw| GeoError::UnknownAttributeFormat { object: object_idx, format, raw })?;
	if stride == 0 {
		return Err(GeoError::ZeroStride { object: object_idx, format });
	}
	Ok(stride)
}

fn fill_group(vertices: &mut [Vertex], buffer: &FloatBuffer, floats_per_vertex: usize, attributes: &[VertexAttribute]) {
	for (vertex, chunk) in vertices.iter_mut().zip(buffer.data.chunks_exact(floats_per_vertex)) {
		let mut offset = 0;
		for attribute in attributes {
			let width = attribute.format.byte_size().unwrap_or_default() / 4;
			let values = &chunk[offset..offset + width];
			offset += width;

			match attribute.name {
				AttributeName::Position => vertex.position = Some(take3(values)),
				AttributeName::NormalDirection => vertex.normal = Some(take3(values)),
				AttributeName::ColorUv => vertex.color_uv = Some(take2(values)),
				AttributeName::LightmapUv => vertex.lightmap_uv = Some(take2(values)),
				AttributeName::SecondaryColor | AttributeName::Unknown(_) => {}
			}
		}
	}
}

fn take3(values: &[f32]) -> [f32; 3] {
	let mut out = [0.0; 3];
	for (slot, value) in out.iter_mut().zip(values) {
		*slot = *value;
	}
	out
}

fn take2(values: &[f32]) -> [f32; 2] {
	let mut out = [0.0; 2];
	for (slot, value) in out.iter_mut().zip(values) {
		*slot = *value;
	}
	out
}

/// Per-object memo of reconstructed vertex blocks, indexed by object position.
#[derive(Debug, Default)]
pub struct VertexCache {
	slots: Vec<Option<VertexBlock>>,
}

impl VertexCache {
	/// Create an empty cache for `object_count` objects.
	pub fn new(object_count: usize) -> Self {
		Self {
			slots: vec![None; object_count],
		}
	}

	/// Return the cached block for an object, building it on first use.
	pub fn get_or_build(&mut self, geo: &MapGeo, object_idx: usize, anomalies: &mut Anomalies) -> Result<&VertexBlock> {
		let len = self.slots.len();
		let slot = self.slots.get_mut(object_idx).ok_or(GeoError::ObjectReference {
			object: object_idx,
			kind: "vertex cache slot",
			index: object_idx,
			len,
		})?;

		let block = match slot.take() {
			Some(block) => block,
			None => build_vertex_block(geo, object_idx, anomalies)?,
		};
		let block: &VertexBlock = slot.insert(block);
		Ok(block)
	}

	/// Number of objects reconstructed so far.
	pub fn built(&self) -> usize {
		self.slots.iter().filter(|slot| slot.is_some()).count()
	}
}
