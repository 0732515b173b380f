use std::collections::BTreeMap;

/// Number of layer bits in an object mask.
pub const LAYER_COUNT: u8 = 8;
/// Mask of an object drawn on every layer.
pub const ALL_LAYERS: u8 = 0xFF;

/// Filter bit for one layer.
pub fn layer_bit(layer: u8) -> u8 {
	1_u8 << (layer % LAYER_COUNT)
}

/// Return whether an object mask passes a layer filter.
///
/// Every filter bit must be set; a zero filter passes everything.
pub fn is_visible(mask: u8, filter: u8) -> bool {
	mask & filter == filter
}

/// Visibility summary of one layer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LayerInfo {
	/// Layer index, `0..8`.
	pub index: u8,
	/// One `'1'`/`'0'` per object in file order.
	pub presence: String,
	/// Lowest earlier layer with the same presence string.
	pub duplicate_of: Option<u8>,
	/// Whether some object named this layer explicitly.
	pub discovered: bool,
}

impl LayerInfo {
	/// Number of objects visible on this layer.
	pub fn object_count(&self) -> usize {
		self.presence.bytes().filter(|byte| *byte == b'1').count()
	}
}

/// Per-layer presence and duplicate analysis of a whole file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LayerPlan {
	/// All eight layers.
	pub layers: Vec<LayerInfo>,
	/// OR of every mask other than `0xFF`.
	pub discovered: u8,
}

impl LayerPlan {
	/// Build the plan from per-object masks.
	pub fn build(masks: &[u8], discovered: u8) -> Self {
		let mut layers: Vec<LayerInfo> = Vec::with_capacity(usize::from(LAYER_COUNT));
		for index in 0..LAYER_COUNT {
			let bit = layer_bit(index);
			let presence: String = masks.iter().map(|mask| if is_visible(*mask, bit) { '1' } else { '0' }).collect();
			let duplicate_of = layers.iter().find(|earlier| earlier.presence == presence).map(|earlier| earlier.index);

			layers.push(LayerInfo {
				index,
				presence,
				duplicate_of,
				discovered: discovered & bit == bit,
			});
		}

		Self { layers, discovered }
	}

	/// Return whether any object named a specific layer.
	pub fn is_layered(&self) -> bool {
		self.discovered != 0
	}

	/// Layers that get their own file set.
	pub fn exported(&self, include_undiscovered: bool) -> impl Iterator<Item = &LayerInfo> {
		self.layers
			.iter()
			.filter(move |layer| layer.duplicate_of.is_none() && (layer.discovered || include_undiscovered))
	}

	/// Layers skipped as duplicates, as `(layer, duplicate_of)`.
	pub fn duplicates(&self) -> Vec<(u8, u8)> {
		self.layers.iter().filter_map(|layer| layer.duplicate_of.map(|of| (layer.index, of))).collect()
	}

	/// Unique layers no object named explicitly; these are possibly unused.
	pub fn undiscovered(&self) -> Vec<u8> {
		self.layers
			.iter()
			.filter(|layer| layer.duplicate_of.is_none() && !layer.discovered)
			.map(|layer| layer.index)
			.collect()
	}
}

/// Count objects per distinct layer mask.
pub fn mask_histogram(masks: &[u8]) -> BTreeMap<u8, usize> {
	let mut out = BTreeMap::new();
	for mask in masks {
		*out.entry(*mask).or_insert(0) += 1;
	}
	out
}

/// One output file set.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportTarget {
	/// Single file with every object; the file has no layering.
	Unlayered,
	/// Single file with every object, plus a layer sidecar.
	Merged,
	/// Objects visible on one layer.
	Layer(u8),
}

impl ExportTarget {
	/// Layer filter applied to object masks.
	pub fn filter(self) -> u8 {
		match self {
			Self::Unlayered | Self::Merged => 0,
			Self::Layer(index) => layer_bit(index),
		}
	}

	/// Output file stem for a base name.
	pub fn file_stem(self, base: &str) -> String {
		match self {
			Self::Unlayered | Self::Merged => base.to_owned(),
			Self::Layer(index) => format!("{base}.Layer{index}"),
		}
	}

	/// Layer index, if this target is one layer.
	pub fn layer(self) -> Option<u8> {
		match self {
			Self::Layer(index) => Some(index),
			_ => None,
		}
	}
}

/// Decide which file sets to write.
pub fn export_targets(plan: &LayerPlan, merged: bool, include_undiscovered: bool) -> Vec<ExportTarget> {
	if merged {
		return vec![ExportTarget::Merged];
	}
	if !plan.is_layered() {
		return vec![ExportTarget::Unlayered];
	}
	plan.exported(include_undiscovered).map(|layer| ExportTarget::Layer(layer.index)).collect()
}

#[cfg(test)]
mod tests;
