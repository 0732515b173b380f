use std::fmt;

use crate::geo::{AttributeName, GeoError, Result};

/// Unexpected-but-consumable value observed while decoding or resolving.
///
/// Anomalies never desynchronize the stream. They are kept so that a future
/// format revision can be diagnosed from the offsets and values they carry.
#[derive(Debug, Clone, PartialEq)]
pub enum Anomaly {
	/// Reserved field expected to be zero held another value.
	ReservedNonZero {
		/// Field label.
		field: &'static str,
		/// Byte offset of the value.
		at: usize,
		/// Observed value.
		value: u32,
	},
	/// Vertex attribute name outside the known enumeration.
	UnknownAttributeName {
		/// Vertex format index.
		format: usize,
		/// Attribute slot within the format.
		slot: usize,
		/// Byte offset of the value.
		at: usize,
		/// Raw value.
		raw: u32,
	},
	/// Vertex attribute format outside the known enumeration.
	UnknownAttributeFormat {
		/// Vertex format index.
		format: usize,
		/// Attribute slot within the format.
		slot: usize,
		/// Byte offset of the value.
		at: usize,
		/// Raw value.
		raw: u32,
	},
	/// Object transform differs from identity.
	NonIdentityTransform {
		/// Object index.
		object: usize,
		/// Byte offset of the matrix.
		at: usize,
		/// Column-major matrix values.
		matrix: [f32; 16],
	},
	/// Object classification byte outside the observed set.
	UnknownClassification {
		/// Object index.
		object: usize,
		/// Byte offset of the value.
		at: usize,
		/// Observed value.
		value: u8,
	},
	/// Stored name is not valid UTF-8; invalid sequences were replaced.
	NonUtf8Name {
		/// Field label.
		field: &'static str,
		/// Byte offset of the length prefix.
		at: usize,
		/// Name after replacement.
		name: String,
	},
	/// The same attribute is defined by more than one of an object's formats.
	DuplicateAttribute {
		/// Object index.
		object: usize,
		/// Repeated attribute.
		attribute: AttributeName,
	},
	/// Material name does not occur in the property blob.
	MaterialNotFound {
		/// Material name.
		material: String,
	},
	/// Material span contains none of the known sampler keys.
	MissingSamplerKey {
		/// Material name.
		material: String,
	},
	/// Sampler key found without a following `assets/...dds` path.
	MissingTexturePath {
		/// Material name.
		material: String,
		/// Sampler key that matched.
		sampler: &'static str,
		/// Blob offset of the sampler key.
		at: usize,
	},
	/// Material uses a sampler whose texture may not be a plain diffuse map.
	NotableSampler {
		/// Material name.
		material: String,
		/// Sampler key that matched.
		sampler: &'static str,
	},
	/// Color key followed by a value type other than vector4.
	UnexpectedColorType {
		/// Material name.
		material: String,
		/// Color key that matched.
		key: &'static str,
		/// Blob offset of the type tag.
		at: usize,
		/// Observed type tag.
		tag: u8,
	},
	/// Color value runs past the end of the material span.
	TruncatedColor {
		/// Material name.
		material: String,
		/// Color key that matched.
		key: &'static str,
		/// Blob offset of the color key.
		at: usize,
	},
	/// Bytes remained after the last object.
	TrailingBytes {
		/// Offset where decoding stopped.
		at: usize,
		/// Unread bytes.
		remaining: usize,
	},
}

impl Anomaly {
	/// Stable snake_case label for the anomaly kind.
	pub fn kind(&self) -> &'static str {
		match self {
			Self::ReservedNonZero { .. } => "reserved_non_zero",
			Self::UnknownAttributeName { .. } => "unknown_attribute_name",
			Self::UnknownAttributeFormat { .. } => "unknown_attribute_format",
			Self::NonIdentityTransform { .. } => "non_identity_transform",
			Self::UnknownClassification { .. } => "unknown_classification",
			Self::NonUtf8Name { .. } => "non_utf8_name",
			Self::DuplicateAttribute { .. } => "duplicate_attribute",
			Self::MaterialNotFound { .. } => "material_not_found",
			Self::MissingSamplerKey { .. } => "missing_sampler_key",
			Self::MissingTexturePath { .. } => "missing_texture_path",
			Self::NotableSampler { .. } => "notable_sampler",
			Self::UnexpectedColorType { .. } => "unexpected_color_type",
			Self::TruncatedColor { .. } => "truncated_color",
			Self::TrailingBytes { .. } => "trailing_bytes",
		}
	}

	/// Return whether this anomaly is purely informational.
	///
	/// Informational anomalies describe valid content (placed instances, special samplers)
	/// and are never escalated by strict mode.
	pub fn is_informational(&self) -> bool {
		matches!(self, Self::NonIdentityTransform { .. } | Self::NotableSampler { .. })
	}
}

impl fmt::Display for Anomaly {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			Self::ReservedNonZero { field, at, value } => write!(f, "{field} at offset {at} is non-zero: 0x{value:x}"),
			Self::UnknownAttributeName { format, slot, at, raw } => {
				write!(f, "vertex format {format} slot {slot} at offset {at} has unknown attribute name 0x{raw:02x}")
			}
			Self::UnknownAttributeFormat { format, slot, at, raw } => {
				write!(f, "vertex format {format} slot {slot} at offset {at} has unknown attribute format 0x{raw:02x}")
			}
			Self::NonIdentityTransform { object, at, matrix } => {
				write!(f, "object {object} has non-identity transform at offset {at}:")?;
				for row in 0..4 {
					write!(f, " [")?;
					for col in 0..4 {
						if col > 0 {
							write!(f, " ")?;
						}
						write!(f, "{}", matrix[col * 4 + row])?;
					}
					write!(f, "]")?;
				}
				Ok(())
			}
			Self::UnknownClassification { object, at, value } => {
				write!(f, "object {object} has unrecognized classification byte 0x{value:02x} at offset {at}")
			}
			Self::NonUtf8Name { field, at, name } => write!(f, "{field} at offset {at} is not valid UTF-8, read as {name:?}"),
			Self::DuplicateAttribute { object, attribute } => write!(f, "object {object} defines vertex attribute {attribute} more than once"),
			Self::MaterialNotFound { material } => write!(f, "material {material:?} not found in property blob"),
			Self::MissingSamplerKey { material } => write!(f, "material {material:?} has no known sampler key"),
			Self::MissingTexturePath { material, sampler, at } => {
				write!(f, "material {material:?} sampler {sampler} at offset {at} has no assets/...dds path")
			}
			Self::NotableSampler { material, sampler } => write!(f, "material {material:?} uses sampler {sampler}"),
			Self::UnexpectedColorType { material, key, at, tag } => {
				write!(f, "material {material:?} color {key} has value type 0x{tag:02x} at offset {at}, expected vector4")
			}
			Self::TruncatedColor { material, key, at } => write!(f, "material {material:?} color {key} at offset {at} is truncated"),
			Self::TrailingBytes { at, remaining } => write!(f, "{remaining} bytes left unread at offset {at}"),
		}
	}
}

/// Anomaly sink shared by the decode, reconstruction, and resolution stages.
#[derive(Debug, Default)]
pub struct Anomalies {
	strict: bool,
	items: Vec<Anomaly>,
}

impl Anomalies {
	/// Create a sink; `strict` turns non-informational anomalies into errors.
	pub fn new(strict: bool) -> Self {
		Self { strict, items: Vec::new() }
	}

	/// Log and record an anomaly.
	pub fn report(&mut self, anomaly: Anomaly) -> Result<()> {
		if anomaly.is_informational() {
			tracing::info!(kind = anomaly.kind(), "{anomaly}");
		} else {
			tracing::warn!(kind = anomaly.kind(), "{anomaly}");
			if self.strict {
				return Err(GeoError::StrictAnomaly(Box::new(anomaly)));
			}
		}

		self.items.push(anomaly);
		Ok(())
	}

	/// Recorded anomalies in report order.
	pub fn items(&self) -> &[Anomaly] {
		&self.items
	}

	/// Number of recorded anomalies.
	pub fn len(&self) -> usize {
		self.items.len()
	}

	/// Return whether nothing was recorded.
	pub fn is_empty(&self) -> bool {
		self.items.is_empty()
	}

	/// Count recorded anomalies of one kind.
	pub fn count_kind(&self, kind: &str) -> usize {
		self.items.iter().filter(|item| item.kind() == kind).count()
	}

	/// Consume the sink and return recorded anomalies.
	pub fn into_vec(self) -> Vec<Anomaly> {
		self.items
	}
}
