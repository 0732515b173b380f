/// Flat run of floats whose per-vertex meaning comes from a vertex format or a fixed layout.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FloatBuffer {
	/// Buffer contents.
	pub data: Vec<f32>,
}

impl FloatBuffer {
	/// Buffer size in bytes.
	pub fn byte_len(&self) -> usize {
		self.data.len() * 4
	}
}

/// Triangles whose vertex indices are local to the owning object.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TriangleBuffer {
	/// Vertex index triples.
	pub triangles: Vec<[u16; 3]>,
}

impl TriangleBuffer {
	/// Number of triangles.
	pub fn len(&self) -> usize {
		self.triangles.len()
	}

	/// Return whether the buffer holds no triangles.
	pub fn is_empty(&self) -> bool {
		self.triangles.is_empty()
	}
}
