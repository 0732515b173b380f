use std::path::{Path, PathBuf};

use mapgeo::geo::{Anomalies, Anomaly, BinScanResolver, GeoError, MapGeo, MaterialMap, MaterialResolver, Result};

/// Inputs of a conversion, sorted by extension.
#[derive(Debug, PartialEq, Eq)]
pub(crate) struct InputSet {
	pub mapgeo: PathBuf,
	pub bin: Option<PathBuf>,
}

/// Pick the first `.mapgeo` and first `.bin` from unordered inputs.
///
/// Extra files of either kind and files with other extensions are warned
/// about and ignored.
pub(crate) fn split_inputs(inputs: Vec<PathBuf>) -> Result<InputSet> {
	let mut mapgeo = None;
	let mut bin = None;

	for path in inputs {
		let slot = match extension_lower(&path).as_deref() {
			Some("mapgeo") => &mut mapgeo,
			Some("bin") => &mut bin,
			_ => {
				tracing::warn!(path = %path.display(), "ignoring input with unrecognized extension");
				continue;
			}
		};
		if slot.is_some() {
			tracing::warn!(path = %path.display(), "ignoring extra input");
			continue;
		}
		*slot = Some(path);
	}

	let mapgeo = mapgeo.ok_or(GeoError::MissingMapGeoInput)?;
	Ok(InputSet { mapgeo, bin })
}

fn extension_lower(path: &Path) -> Option<String> {
	path.extension().and_then(|ext| ext.to_str()).map(str::to_ascii_lowercase)
}

/// File name without extension, used as the base of output names.
pub(crate) fn file_stem(path: &Path) -> Result<String> {
	path.file_stem()
		.and_then(|stem| stem.to_str())
		.map(str::to_owned)
		.ok_or_else(|| GeoError::InvalidInput {
			path: path.display().to_string(),
		})
}

/// Read a property blob and resolve every material the geometry names.
pub(crate) fn resolve_materials(geo: &MapGeo, bin: &Path, anomalies: &mut Anomalies) -> Result<MaterialMap> {
	let blob = std::fs::read(bin)?;
	tracing::debug!(path = %bin.display(), bytes = blob.len(), "read property blob");
	BinScanResolver::new(&blob).resolve(&geo.material_names(), anomalies)
}

/// Render a layer mask as `0x..` hex.
pub(crate) fn mask_hex(mask: u8) -> String {
	format!("0x{mask:02x}")
}

/// Print a serializable payload as pretty JSON on stdout.
pub(crate) fn emit_json<T: serde::Serialize>(payload: &T) {
	match serde_json::to_string_pretty(payload) {
		Ok(text) => println!("{text}"),
		Err(err) => eprintln!("error: failed to encode json: {err}"),
	}
}

/// Anomaly as reported in JSON output.
#[derive(serde::Serialize)]
pub(crate) struct AnomalyJson {
	pub kind: &'static str,
	pub message: String,
}

impl From<&Anomaly> for AnomalyJson {
	fn from(anomaly: &Anomaly) -> Self {
		Self {
			kind: anomaly.kind(),
			message: anomaly.to_string(),
		}
	}
}

#[cfg(test)]
mod tests;
