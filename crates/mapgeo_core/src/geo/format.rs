use std::fmt;

/// Attribute slots stored on disk for every vertex format, used or not.
pub const FORMAT_SLOTS: usize = 15;

/// Semantic meaning of one vertex attribute.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum AttributeName {
	/// Object-space position.
	Position,
	/// Object-space normal.
	NormalDirection,
	/// Secondary vertex color; recognized but not exported.
	SecondaryColor,
	/// Diffuse texture coordinates.
	ColorUv,
	/// Lightmap texture coordinates.
	LightmapUv,
	/// Value outside the known enumeration.
	Unknown(u32),
}

impl AttributeName {
	/// Map a raw on-disk value.
	pub fn from_raw(raw: u32) -> Self {
		match raw {
			0x00 => Self::Position,
			0x02 => Self::NormalDirection,
			0x05 => Self::SecondaryColor,
			0x07 => Self::ColorUv,
			0x0E => Self::LightmapUv,
			other => Self::Unknown(other),
		}
	}

	/// Stable label.
	pub fn as_str(self) -> &'static str {
		match self {
			Self::Position => "position",
			Self::NormalDirection => "normal",
			Self::SecondaryColor => "secondary_color",
			Self::ColorUv => "color_uv",
			Self::LightmapUv => "lightmap_uv",
			Self::Unknown(_) => "unknown",
		}
	}
}

impl fmt::Display for AttributeName {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			Self::Unknown(raw) => write!(f, "unknown(0x{raw:02x})"),
			other => f.write_str(other.as_str()),
		}
	}
}

/// Storage type of one vertex attribute.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AttributeFormat {
	/// Two `f32` values.
	Float2,
	/// Three `f32` values.
	Float3,
	/// Four packed color bytes.
	PackedColor4,
	/// Value outside the known enumeration.
	Unknown(u32),
}

impl AttributeFormat {
	/// Map a raw on-disk value.
	pub fn from_raw(raw: u32) -> Self {
		match raw {
			0x01 => Self::Float2,
			0x02 => Self::Float3,
			0x04 => Self::PackedColor4,
			other => Self::Unknown(other),
		}
	}

	/// Bytes per vertex, or `None` when the format is unknown.
	pub fn byte_size(self) -> Option<usize> {
		match self {
			Self::Float2 => Some(8),
			Self::Float3 => Some(12),
			Self::PackedColor4 => Some(4),
			Self::Unknown(_) => None,
		}
	}
}

/// One `(name, format)` pair of a vertex format.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VertexAttribute {
	/// Attribute meaning.
	pub name: AttributeName,
	/// Attribute storage type.
	pub format: AttributeFormat,
}

/// Vertex format descriptor: the defined attributes of one float buffer layout.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VertexFormat {
	/// Reserved block-type value, observed as zero.
	pub block_type: u32,
	/// Defined attributes in vertex order; placeholder slots are dropped.
	pub attributes: Vec<VertexAttribute>,
}

/// Bytes per vertex of an attribute list.
///
/// Fails with the raw value of the first attribute format that has no known size.
pub fn attribute_stride(attributes: &[VertexAttribute]) -> std::result::Result<usize, u32> {
	attributes.iter().try_fold(0, |stride, attribute| match attribute.format {
		AttributeFormat::Unknown(raw) => Err(raw),
		format => Ok(stride + format.byte_size().unwrap_or_default()),
	})
}
