//! Shared test helpers for workspace crates: synthetic `.mapgeo` files and property blobs.

use std::path::{Path, PathBuf};

/// Raw attribute name values.
pub const ATTR_POSITION: u32 = 0x00;
/// Raw attribute name value of a normal.
pub const ATTR_NORMAL: u32 = 0x02;
/// Raw attribute name value of a secondary color.
pub const ATTR_SECONDARY_COLOR: u32 = 0x05;
/// Raw attribute name value of diffuse UVs.
pub const ATTR_COLOR_UV: u32 = 0x07;
/// Raw attribute name value of lightmap UVs.
pub const ATTR_LIGHTMAP_UV: u32 = 0x0E;

/// Raw attribute format value of two floats.
pub const FMT_FLOAT2: u32 = 0x01;
/// Raw attribute format value of three floats.
pub const FMT_FLOAT3: u32 = 0x02;
/// Raw attribute format value of four packed color bytes.
pub const FMT_PACKED_COLOR4: u32 = 0x04;

/// Position + normal + diffuse UV, the most common layout.
pub const POS_NORMAL_UV: [(u32, u32); 3] = [(ATTR_POSITION, FMT_FLOAT3), (ATTR_NORMAL, FMT_FLOAT3), (ATTR_COLOR_UV, FMT_FLOAT2)];

/// Column-major identity matrix.
pub const IDENTITY: [f32; 16] = [1.0, 0.0, 0.0, 0.0, 0.0, 1.0, 0.0, 0.0, 0.0, 0.0, 1.0, 0.0, 0.0, 0.0, 0.0, 1.0];

/// FNV-1a 32 of `value`, little-endian.
pub const VALUE_KEY_HASH: [u8; 4] = [0xCA, 0xD3, 0x5E, 0x42];

const FORMAT_SLOTS: usize = 15;

/// Submesh as stored on disk (index units, not triangles).
#[derive(Debug, Clone)]
pub struct SubmeshSpec {
	/// Material name bytes.
	pub material: Vec<u8>,
	/// First index (triangle * 3).
	pub start_index: i32,
	/// Index count (triangles * 3).
	pub index_count: i32,
	/// Leading reserved value.
	pub reserved: u32,
}

impl SubmeshSpec {
	/// Submesh covering `triangles` triangles from `first_triangle`.
	pub fn new(material: &str, first_triangle: i32, triangles: i32) -> Self {
		Self::with_material_bytes(material.as_bytes(), first_triangle, triangles)
	}

	/// Submesh whose material name is written verbatim, valid UTF-8 or not.
	pub fn with_material_bytes(material: &[u8], first_triangle: i32, triangles: i32) -> Self {
		Self {
			material: material.to_vec(),
			start_index: first_triangle * 3,
			index_count: triangles * 3,
			reserved: 0,
		}
	}
}

/// Object record as stored on disk.
#[derive(Debug, Clone)]
pub struct ObjectSpec {
	/// Object name bytes.
	pub name: Vec<u8>,
	/// Declared vertex count.
	pub vertex_count: u32,
	/// First vertex format index.
	pub format_start: i32,
	/// Float buffer indices.
	pub float_buffers: Vec<i32>,
	/// Declared index count.
	pub index_count: u32,
	/// Triangle buffer index.
	pub triangle_buffer: i32,
	/// Submeshes.
	pub submeshes: Vec<SubmeshSpec>,
	/// Column-major transform.
	pub transform: [f32; 16],
	/// Classification byte.
	pub classification: u8,
	/// Layer mask (written from v7).
	pub layer_mask: u8,
	/// Lightmap texture name.
	pub lightmap: String,
	/// Reserved v11 byte.
	pub reserved_v11: u8,
	/// Reserved v9 trailing bytes.
	pub reserved_v9: [u8; 20],
}

impl ObjectSpec {
	/// Object using float buffer 0, format 0, triangle buffer 0, and no submeshes.
	pub fn new(name: &str) -> Self {
		Self {
			name: name.as_bytes().to_vec(),
			vertex_count: 0,
			format_start: 0,
			float_buffers: vec![0],
			index_count: 0,
			triangle_buffer: 0,
			submeshes: Vec::new(),
			transform: IDENTITY,
			classification: 0x1F,
			layer_mask: 0xFF,
			lightmap: String::new(),
			reserved_v11: 0,
			reserved_v9: [0; 20],
		}
	}

	/// Replace the name with raw bytes, valid UTF-8 or not.
	pub fn name_bytes(mut self, name: &[u8]) -> Self {
		self.name = name.to_vec();
		self
	}

	/// Set float buffer indices.
	pub fn buffers(mut self, buffers: &[i32]) -> Self {
		self.float_buffers = buffers.to_vec();
		self
	}

	/// Set the first vertex format index.
	pub fn format_start(mut self, start: i32) -> Self {
		self.format_start = start;
		self
	}

	/// Set the triangle buffer index.
	pub fn triangle_buffer(mut self, index: i32) -> Self {
		self.triangle_buffer = index;
		self
	}

	/// Append a submesh.
	pub fn submesh(mut self, submesh: SubmeshSpec) -> Self {
		self.submeshes.push(submesh);
		self
	}

	/// Set the transform.
	pub fn transform(mut self, transform: [f32; 16]) -> Self {
		self.transform = transform;
		self
	}

	/// Set the classification byte.
	pub fn classification(mut self, value: u8) -> Self {
		self.classification = value;
		self
	}

	/// Set the layer mask.
	pub fn layer_mask(mut self, mask: u8) -> Self {
		self.layer_mask = mask;
		self
	}

	/// Set the lightmap texture name.
	pub fn lightmap(mut self, name: &str) -> Self {
		self.lightmap = name.to_owned();
		self
	}

	/// Set the reserved v11 byte.
	pub fn reserved_v11(mut self, value: u8) -> Self {
		self.reserved_v11 = value;
		self
	}

	/// Set one reserved v9 trailing byte.
	pub fn reserved_v9_byte(mut self, index: usize, value: u8) -> Self {
		self.reserved_v9[index] = value;
		self
	}
}

/// Builder for synthetic `.mapgeo` files of any version.
#[derive(Debug, Clone)]
pub struct MapGeoBuilder {
	version: i32,
	header_byte: u8,
	header_ints: [u32; 2],
	formats: Vec<(u32, Vec<(u32, u32)>)>,
	float_buffers: Vec<Vec<u8>>,
	triangle_buffers: Vec<Vec<u8>>,
	objects: Vec<ObjectSpec>,
	trailing: Vec<u8>,
}

impl MapGeoBuilder {
	/// Empty file of the given version.
	pub fn new(version: i32) -> Self {
		Self {
			version,
			header_byte: 0,
			header_ints: [0, 0],
			formats: Vec::new(),
			float_buffers: Vec::new(),
			triangle_buffers: Vec::new(),
			objects: Vec::new(),
			trailing: Vec::new(),
		}
	}

	/// Set the reserved header byte (written before v7).
	pub fn header_byte(mut self, value: u8) -> Self {
		self.header_byte = value;
		self
	}

	/// Set the reserved header flags (written from v9/v10).
	pub fn header_ints(mut self, values: [u32; 2]) -> Self {
		self.header_ints = values;
		self
	}

	/// Append a vertex format of raw `(name, format)` pairs.
	pub fn format(self, attributes: &[(u32, u32)]) -> Self {
		self.format_with_block_type(0, attributes)
	}

	/// Append a vertex format with an explicit block-type value.
	pub fn format_with_block_type(mut self, block_type: u32, attributes: &[(u32, u32)]) -> Self {
		self.formats.push((block_type, attributes.to_vec()));
		self
	}

	/// Append a float buffer.
	pub fn float_buffer(mut self, data: &[f32]) -> Self {
		self.float_buffers.push(data.iter().flat_map(|value| value.to_le_bytes()).collect());
		self
	}

	/// Append a float buffer from raw bytes.
	pub fn raw_float_buffer(mut self, bytes: &[u8]) -> Self {
		self.float_buffers.push(bytes.to_vec());
		self
	}

	/// Append a triangle buffer.
	pub fn triangle_buffer(mut self, triangles: &[[u16; 3]]) -> Self {
		self.triangle_buffers
			.push(triangles.iter().flat_map(|tri| tri.iter().flat_map(|index| index.to_le_bytes())).collect());
		self
	}

	/// Append a triangle buffer from raw bytes.
	pub fn raw_triangle_buffer(mut self, bytes: &[u8]) -> Self {
		self.triangle_buffers.push(bytes.to_vec());
		self
	}

	/// Append an object.
	pub fn object(mut self, object: ObjectSpec) -> Self {
		self.objects.push(object);
		self
	}

	/// Append bytes after the last object.
	pub fn trailing(mut self, bytes: &[u8]) -> Self {
		self.trailing.extend_from_slice(bytes);
		self
	}

	/// Serialize the file.
	pub fn build(&self) -> Vec<u8> {
		let v = self.version;
		let mut out = Vec::new();
		out.extend_from_slice(b"OEGM");
		put_i32(&mut out, v);

		if v < 7 {
			out.push(self.header_byte);
		}
		if v >= 9 {
			put_u32(&mut out, self.header_ints[0]);
		}
		if v >= 10 {
			put_u32(&mut out, self.header_ints[1]);
		}

		put_len(&mut out, self.formats.len());
		for (block_type, attributes) in &self.formats {
			put_u32(&mut out, *block_type);
			put_len(&mut out, attributes.len());
			for (name, format) in attributes {
				put_u32(&mut out, *name);
				put_u32(&mut out, *format);
			}
			for _ in attributes.len()..FORMAT_SLOTS {
				put_u32(&mut out, 0);
				put_u32(&mut out, 3);
			}
		}

		put_len(&mut out, self.float_buffers.len());
		for buffer in &self.float_buffers {
			put_len(&mut out, buffer.len());
			out.extend_from_slice(buffer);
		}

		put_len(&mut out, self.triangle_buffers.len());
		for buffer in &self.triangle_buffers {
			put_len(&mut out, buffer.len());
			out.extend_from_slice(buffer);
		}

		put_len(&mut out, self.objects.len());
		for object in &self.objects {
			put_bytes(&mut out, &object.name);
			put_u32(&mut out, object.vertex_count);
			put_len(&mut out, object.float_buffers.len());
			put_i32(&mut out, object.format_start);
			for index in &object.float_buffers {
				put_i32(&mut out, *index);
			}
			put_u32(&mut out, object.index_count);
			put_i32(&mut out, object.triangle_buffer);

			put_len(&mut out, object.submeshes.len());
			for submesh in &object.submeshes {
				put_u32(&mut out, submesh.reserved);
				put_bytes(&mut out, &submesh.material);
				put_i32(&mut out, submesh.start_index);
				put_i32(&mut out, submesh.index_count);
				put_u32(&mut out, 0);
				put_u32(&mut out, 0);
			}

			if v >= 6 {
				out.push(0);
			}
			for value in [-1.0_f32, -1.0, -1.0, 1.0, 1.0, 1.0] {
				out.extend_from_slice(&value.to_le_bytes());
			}
			for value in object.transform {
				out.extend_from_slice(&value.to_le_bytes());
			}
			out.push(object.classification);
			if v >= 7 {
				out.push(object.layer_mask);
			}
			if v < 8 {
				for _ in 0..27 {
					out.extend_from_slice(&0.0_f32.to_le_bytes());
				}
			}
			if v >= 11 {
				out.push(object.reserved_v11);
			}
			put_str(&mut out, &object.lightmap);
			out.extend_from_slice(&[0_u8; 16]);
			if v >= 9 {
				out.extend_from_slice(&object.reserved_v9);
			}
		}

		out.extend_from_slice(&self.trailing);
		out
	}
}

/// Builder for property blobs scanned by the material resolver.
#[derive(Debug, Clone, Default)]
pub struct BinBlobBuilder {
	bytes: Vec<u8>,
}

impl BinBlobBuilder {
	/// Empty blob that starts with a property-file magic.
	pub fn new() -> Self {
		Self { bytes: b"PROP\x01\x00\x00\x00".to_vec() }
	}

	/// Append text bytes.
	pub fn text(mut self, text: &str) -> Self {
		self.bytes.extend_from_slice(text.as_bytes());
		self
	}

	/// Append raw bytes.
	pub fn raw(mut self, bytes: &[u8]) -> Self {
		self.bytes.extend_from_slice(bytes);
		self
	}

	/// Append a material definition header.
	pub fn material(self, name: &str) -> Self {
		self.raw(&[0x10, 0x00]).text(name).raw(&[0x00, 0x83])
	}

	/// Append a sampler entry pointing at a texture path.
	pub fn sampler(self, key: &str, path: &str) -> Self {
		let len = u16::try_from(path.len()).unwrap_or(u16::MAX).to_le_bytes();
		self.raw(&[0x4C, 0x4F]).text(key).raw(&[0x10, len[0], len[1]]).text(path)
	}

	/// Append a vector4 color parameter.
	pub fn color(self, key: &str, rgba: [f32; 4]) -> Self {
		self.color_with_tag(key, 0x0D, rgba)
	}

	/// Append a color parameter with an arbitrary value-type tag.
	pub fn color_with_tag(self, key: &str, tag: u8, rgba: [f32; 4]) -> Self {
		let mut this = self.text(key).raw(&VALUE_KEY_HASH).raw(&[tag]);
		for value in rgba {
			this.bytes.extend_from_slice(&value.to_le_bytes());
		}
		this
	}

	/// Finished blob.
	pub fn build(&self) -> Vec<u8> {
		self.bytes.clone()
	}
}

/// Fresh temporary directory removed on drop.
pub fn scratch_dir() -> tempfile::TempDir {
	tempfile::Builder::new().prefix("mapgeo-").tempdir().expect("scratch dir is created")
}

/// Write bytes to `dir/name` and return the path.
pub fn write_file(dir: &Path, name: &str, bytes: &[u8]) -> PathBuf {
	let path = dir.join(name);
	std::fs::write(&path, bytes).expect("test file is written");
	path
}

fn put_i32(out: &mut Vec<u8>, value: i32) {
	out.extend_from_slice(&value.to_le_bytes());
}

fn put_u32(out: &mut Vec<u8>, value: u32) {
	out.extend_from_slice(&value.to_le_bytes());
}

fn put_len(out: &mut Vec<u8>, len: usize) {
	put_i32(out, i32::try_from(len).expect("test length fits in i32"));
}

fn put_str(out: &mut Vec<u8>, text: &str) {
	put_bytes(out, text.as_bytes());
}

fn put_bytes(out: &mut Vec<u8>, bytes: &[u8]) {
	put_len(out, bytes.len());
	out.extend_from_slice(bytes);
}
