use std::collections::{BTreeMap, BTreeSet};
use std::ops::Range;

use crate::geo::{Anomalies, Anomaly, Result};

/// Sampler keys whose texture is taken as the diffuse map, highest priority first.
pub const SAMPLER_KEYS: [&str; 9] = [
	"DiffuseTexture",
	"Diffuse_Texture",
	"Bottom_Texture",
	"FlipBook_Texture",
	"GlowTexture",
	"Glow_Texture",
	"Mask_Textures",
	"Mask_Texture",
	"Scrolling_Texture",
];

/// Samplers whose texture may not read as a plain diffuse map.
pub const NOTABLE_SAMPLERS: [&str; 2] = ["FlipBook_Texture", "GlowTexture"];

/// Emissive/ambient color keys, highest priority first.
pub const COLOR_KEYS: [&str; 5] = ["Emissive_Color", "Color_01", "Color", "ColorTop", "ColorBottom"];

/// FNV-1a 32 of `value` in little-endian order; follows a real property key.
pub const VALUE_KEY_HASH: [u8; 4] = [0xCA, 0xD3, 0x5E, 0x42];

/// Property value-type tag of a four-float vector.
pub const VECTOR4_TYPE: u8 = 0x0D;

/// Color of a material that resolved to nothing usable.
pub const UNRESOLVED_COLOR: [f32; 4] = [1.0, 0.0, 1.0, 1.0];

/// Color of a material with no color key.
pub const DEFAULT_COLOR: [f32; 4] = [0.0, 0.0, 0.0, 1.0];

/// Texture and color bound to one material name.
#[derive(Debug, Clone, PartialEq)]
pub struct Material {
	/// Material name as referenced by submeshes.
	pub name: String,
	/// Texture path with its original case, empty when none was found.
	pub texture: String,
	/// RGBA ambient/emissive color.
	pub ambient: [f32; 4],
	/// Sampler key the texture came from.
	pub sampler: Option<&'static str>,
	/// Color key the ambient color came from.
	pub color_key: Option<&'static str>,
}

impl Material {
	/// Material with an empty texture and the default color.
	pub fn new(name: impl Into<String>) -> Self {
		Self {
			name: name.into(),
			texture: String::new(),
			ambient: DEFAULT_COLOR,
			sampler: None,
			color_key: None,
		}
	}

	/// Texture path as written to `.mtl` files, with the extension forced to `.dds`.
	pub fn export_texture(&self) -> Option<String> {
		if self.texture.is_empty() {
			return None;
		}
		if self.texture.to_ascii_lowercase().contains(".dds") {
			return Some(self.texture.clone());
		}

		let stem = match self.texture.rfind('.') {
			Some(dot) => &self.texture[..dot],
			None => self.texture.as_str(),
		};
		Some(format!("{stem}.dds"))
	}
}

/// Resolved materials keyed by name.
pub type MaterialMap = BTreeMap<String, Material>;

/// Maps submesh material names to textures and colors.
pub trait MaterialResolver {
	/// Resolve every name; names that cannot be resolved still get an entry.
	fn resolve(&self, names: &BTreeSet<String>, anomalies: &mut Anomalies) -> Result<MaterialMap>;
}

/// Byte range of a property blob attributed to one material.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MaterialSpan {
	/// Material name.
	pub name: String,
	/// Offset of the claimed name occurrence; `None` when not found.
	pub start: Option<usize>,
	/// Exclusive end: the next claimed name, or the end of the blob.
	pub end: usize,
}

impl MaterialSpan {
	/// Blob range, if the name was found.
	pub fn range(&self) -> Option<Range<usize>> {
		self.start.map(|start| start..self.end)
	}
}

/// Heuristic resolver that scans a raw property blob for names and keys.
///
/// No structure of the blob is parsed. Each name owns the bytes up to the
/// next located name, and that span is searched for known sampler and color
/// keys.
pub struct BinScanResolver<'a> {
	blob: &'a [u8],
}

impl<'a> BinScanResolver<'a> {
	/// Wrap a property blob.
	pub fn new(blob: &'a [u8]) -> Self {
		Self { blob }
	}

	/// Find each name's span, ordered by position in the blob.
	///
	/// Longer names are located first, and a name may not claim an offset
	/// already claimed, so `Foo` never lands inside an earlier `FooBar`.
	/// Names that were not found sort first with empty spans.
	pub fn locate(&self, names: &BTreeSet<String>) -> Vec<MaterialSpan> {
		let mut ordered: Vec<&String> = names.iter().collect();
		ordered.sort_by(|left, right| right.len().cmp(&left.len()).then_with(|| left.cmp(right)));

		let mut claimed: Vec<usize> = Vec::with_capacity(ordered.len());
		let mut starts: Vec<(Option<usize>, &String)> = Vec::with_capacity(ordered.len());
		for name in ordered {
			let needle = name.as_bytes();
			let mut from = 0;
			let found = loop {
				match find_bytes(self.blob, needle, from) {
					Some(at) if claimed.contains(&at) => from = at + 1,
					other => break other,
				}
			};
			if let Some(at) = found {
				claimed.push(at);
			}
			starts.push((found, name));
		}

		starts.sort_by_key(|(start, _)| *start);

		let mut spans = Vec::with_capacity(starts.len());
		for (idx, (start, name)) in starts.iter().enumerate() {
			let end = match start {
				Some(_) => starts.get(idx + 1).and_then(|(next, _)| *next).unwrap_or(self.blob.len()),
				None => 0,
			};
			spans.push(MaterialSpan {
				name: (*name).clone(),
				start: *start,
				end,
			});
		}
		spans
	}

	fn resolve_span(&self, span: &MaterialSpan, anomalies: &mut Anomalies) -> Result<Material> {
		let mut material = Material::new(span.name.clone());
		let Some(range) = span.range() else {
			anomalies.report(Anomaly::MaterialNotFound {
				material: span.name.clone(),
			})?;
			return Ok(material);
		};

		let text = &self.blob[range.clone()];

		let sampler = SAMPLER_KEYS.iter().find_map(|key| find_bytes(text, key.as_bytes(), 0).map(|at| (*key, at)));
		match sampler {
			Some((key, at)) => {
				material.sampler = Some(key);
				if NOTABLE_SAMPLERS.contains(&key) {
					anomalies.report(Anomaly::NotableSampler {
						material: span.name.clone(),
						sampler: key,
					})?;
				}

				match texture_path(text, at) {
					Some(path) => material.texture = path,
					None => anomalies.report(Anomaly::MissingTexturePath {
						material: span.name.clone(),
						sampler: key,
						at: range.start + at,
					})?,
				}
			}
			None => anomalies.report(Anomaly::MissingSamplerKey {
				material: span.name.clone(),
			})?,
		}

		let color = COLOR_KEYS.iter().find_map(|key| {
			let mut needle = key.as_bytes().to_vec();
			needle.extend_from_slice(&VALUE_KEY_HASH);
			find_bytes(text, &needle, 0).map(|at| (*key, at, at + needle.len()))
		});

		match color {
			Some((key, at, tag_at)) => match text.get(tag_at) {
				Some(&VECTOR4_TYPE) => match read_rgba(text, tag_at + 1) {
					Some(rgba) => {
						material.ambient = rgba;
						material.color_key = Some(key);
					}
					None => anomalies.report(Anomaly::TruncatedColor {
						material: span.name.clone(),
						key,
						at: range.start + at,
					})?,
				},
				Some(&tag) => anomalies.report(Anomaly::UnexpectedColorType {
					material: span.name.clone(),
					key,
					at: range.start + tag_at,
					tag,
				})?,
				None => anomalies.report(Anomaly::TruncatedColor {
					material: span.name.clone(),
					key,
					at: range.start + at,
				})?,
			},
			None => {
				if material.texture.is_empty() {
					material.ambient = UNRESOLVED_COLOR;
				}
			}
		}

		tracing::debug!(
			material = %material.name,
			texture = %material.texture,
			sampler = material.sampler.unwrap_or("-"),
			color = material.color_key.unwrap_or("-"),
			"resolved material"
		);
		Ok(material)
	}
}

impl MaterialResolver for BinScanResolver<'_> {
	fn resolve(&self, names: &BTreeSet<String>, anomalies: &mut Anomalies) -> Result<MaterialMap> {
		let mut out = MaterialMap::new();
		for span in self.locate(names) {
			let material = self.resolve_span(&span, anomalies)?;
			out.insert(span.name, material);
		}
		Ok(out)
	}
}

fn texture_path(text: &[u8], from: usize) -> Option<String> {
	let start = find_ascii_ci(text, b"assets/", from)?;
	let end = find_ascii_ci(text, b".dds", start)? + 4;
	Some(String::from_utf8_lossy(&text[start..end]).into_owned())
}

fn read_rgba(text: &[u8], at: usize) -> Option<[f32; 4]> {
	let raw = text.get(at..at + 16)?;
	let mut out = [0.0_f32; 4];
	for (value, chunk) in out.iter_mut().zip(raw.chunks_exact(4)) {
		*value = f32::from_le_bytes([chunk[0], chunk[1], chunk[2], chunk[3]]);
	}
	Some(out)
}

/// First occurrence of `needle` at or after `from`.
pub fn find_bytes(haystack: &[u8], needle: &[u8], from: usize) -> Option<usize> {
	if needle.is_empty() || from > haystack.len() {
		return None;
	}
	haystack[from..].windows(needle.len()).position(|window| window == needle).map(|pos| pos + from)
}

fn find_ascii_ci(haystack: &[u8], needle: &[u8], from: usize) -> Option<usize> {
	if needle.is_empty() || from > haystack.len() {
		return None;
	}
	haystack[from..]
		.windows(needle.len())
		.position(|window| window.eq_ignore_ascii_case(needle))
		.map(|pos| pos + from)
}

#[cfg(test)]
mod tests;
