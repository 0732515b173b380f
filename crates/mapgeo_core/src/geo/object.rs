use glam::Mat4;

use crate::geo::layer::{ALL_LAYERS, is_visible};

/// Column-major identity matrix.
pub const IDENTITY_TRANSFORM: [f32; 16] = [1.0, 0.0, 0.0, 0.0, 0.0, 1.0, 0.0, 0.0, 0.0, 0.0, 1.0, 0.0, 0.0, 0.0, 0.0, 1.0];

/// Classification byte values seen in shipped content.
pub const CLASSIFICATIONS: [u8; 3] = [0x1C, 0x1E, 0x1F];

/// Contiguous triangle range bound to one material.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Submesh {
	/// Reserved leading value, observed as zero.
	pub reserved: u32,
	/// Material name referenced in the property blob.
	pub material: String,
	/// First triangle.
	pub start: usize,
	/// Triangle count.
	pub count: usize,
	/// Two trailing values of unknown purpose.
	pub reserved_range: [u32; 2],
}

impl Submesh {
	/// One past the last triangle.
	pub fn end(&self) -> usize {
		self.start.saturating_add(self.count)
	}
}

/// Version-gated object fields that are consumed but carry no known meaning.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ObjectReserved {
	/// Byte before the bounding box (v6+).
	pub alignment: Option<u8>,
	/// Per-object float block (before v8).
	pub legacy_floats: Vec<f32>,
	/// Byte after the layer mask (v11+).
	pub object_byte: Option<u8>,
	/// Sixteen bytes after the lightmap texture name.
	pub lightmap_params: [u8; 16],
	/// Twenty trailing bytes (v9+).
	pub trailing: Vec<u8>,
}

/// One placed mesh.
#[derive(Debug, Clone, PartialEq)]
pub struct ObjectRecord {
	/// Object name.
	pub name: String,
	/// Declared vertex count; not used for reconstruction.
	pub vertex_count: u32,
	/// First vertex format used by this object's float buffers.
	pub format_start: usize,
	/// Referenced float buffers in vertex-group order.
	pub float_buffers: Vec<usize>,
	/// Declared triangle-index count; not used for export.
	pub index_count: u32,
	/// Referenced triangle buffer.
	pub triangle_buffer: usize,
	/// Material ranges.
	pub submeshes: Vec<Submesh>,
	/// Axis-aligned bounds as `min xyz, max xyz`.
	pub bounds: [f32; 6],
	/// Column-major object-to-world transform.
	pub transform: [f32; 16],
	/// Classification byte.
	pub classification: u8,
	/// Layer visibility bitmask; `0xFF` before v7.
	pub layer_mask: u8,
	/// Baked lightmap texture, empty when unlit.
	pub lightmap_texture: String,
	/// Unused fields retained for diagnostics.
	pub reserved: ObjectReserved,
}

impl ObjectRecord {
	/// Transform as a matrix.
	pub fn transform_matrix(&self) -> Mat4 {
		Mat4::from_cols_array(&self.transform)
	}

	/// Return whether the object carries a lightmap.
	pub fn has_lightmap(&self) -> bool {
		!self.lightmap_texture.is_empty()
	}

	/// Return whether the object is drawn on every layer.
	pub fn on_all_layers(&self) -> bool {
		self.layer_mask == ALL_LAYERS
	}

	/// Return whether the object passes a layer filter.
	pub fn visible_in(&self, filter: u8) -> bool {
		is_visible(self.layer_mask, filter)
	}
}

#[cfg(test)]
mod tests;
