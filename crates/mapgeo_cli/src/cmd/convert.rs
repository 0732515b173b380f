use std::path::{Path, PathBuf};

use mapgeo::geo::{Anomalies, Anomaly, DecodeOptions, ExportOptions, ExportReport, MapGeoFile, Result, export_to_dir};

use crate::cmd::util::{AnomalyJson, InputSet, emit_json, file_stem, resolve_materials, split_inputs};

#[derive(clap::Args)]
pub struct Args {
	/// A `.mapgeo` file and an optional `.bin` property blob, in any order.
	pub inputs: Vec<PathBuf>,
	/// Output directory; defaults to the directory of the `.mapgeo`.
	#[arg(long = "out-dir")]
	pub out_dir: Option<PathBuf>,
	/// Also export layers no object names explicitly.
	#[arg(long = "all-layers")]
	pub all_layers: bool,
	/// Write one file with every object plus a layer mask sidecar.
	#[arg(long)]
	pub merged: bool,
	/// Treat decode and material anomalies as errors.
	#[arg(long)]
	pub strict: bool,
	#[arg(long)]
	pub json: bool,
}

/// Decode a mapgeo file and write its `.obj`/`.mtl` sets.
pub fn run(args: Args) -> Result<()> {
	let Args {
		inputs,
		out_dir,
		all_layers,
		merged,
		strict,
		json,
	} = args;

	let InputSet { mapgeo: path, bin } = split_inputs(inputs)?;
	let decode = if strict { DecodeOptions::strict() } else { DecodeOptions::default() };
	let file = MapGeoFile::open(&path, &decode)?;

	let mut anomalies = Anomalies::new(strict);
	let materials = match &bin {
		Some(bin) => Some(resolve_materials(&file.geo, bin, &mut anomalies)?),
		None => {
			tracing::warn!("no .bin given, exporting geometry without materials");
			None
		}
	};

	let out_dir = match out_dir {
		Some(dir) => dir,
		None => path.parent().map(Path::to_path_buf).unwrap_or_default(),
	};
	let base_name = file_stem(&path)?;
	let options = ExportOptions {
		include_undiscovered_layers: all_layers,
		merged,
	};
	let report = export_to_dir(&file.geo, materials.as_ref(), &options, &out_dir, &base_name, &mut anomalies)?;

	let all_anomalies: Vec<&Anomaly> = file.anomalies.iter().chain(anomalies.items()).collect();
	let material_count = materials.as_ref().map(|map| map.len());

	if json {
		print_json(&path, bin.as_deref(), &file, material_count, &report, &all_anomalies);
		return Ok(());
	}

	println!("path: {}", path.display());
	println!("bin: {}", bin.as_deref().map_or_else(|| "-".to_owned(), |bin| bin.display().to_string()));
	println!("version: {}", file.header.version);
	println!("materials: {}", material_count.map_or_else(|| "-".to_owned(), |count| count.to_string()));
	println!("anomalies: {}", all_anomalies.len());
	for (layer, of) in &report.duplicates {
		println!("duplicate_layer: {layer} (same as {of})");
	}
	for layer in &report.undiscovered {
		println!("undiscovered_layer: {layer}");
	}
	if let Some(sidecar) = &report.sidecar {
		println!("sidecar: {}", sidecar.display());
	}
	println!("files: {}", report.files.len());
	println!("obj\tobjects\tskipped\tvertices\tfaces");
	for file in &report.files {
		println!(
			"{}\t{}\t{}\t{}\t{}",
			file.obj_path.display(),
			file.stats.objects_written,
			file.stats.objects_skipped,
			file.stats.vertices,
			file.stats.faces
		);
	}

	Ok(())
}

fn print_json(path: &Path, bin: Option<&Path>, file: &MapGeoFile, materials: Option<usize>, report: &ExportReport, anomalies: &[&Anomaly]) {
	let payload = ConvertJson {
		path: path.display().to_string(),
		bin: bin.map(|bin| bin.display().to_string()),
		version: file.header.version.get(),
		materials,
		objects_built: report.objects_built,
		sidecar: report.sidecar.as_ref().map(|sidecar| sidecar.display().to_string()),
		duplicate_layers: report
			.duplicates
			.iter()
			.map(|(layer, of)| DuplicateJson {
				layer: *layer,
				duplicate_of: *of,
			})
			.collect(),
		undiscovered_layers: report.undiscovered.clone(),
		files: report
			.files
			.iter()
			.map(|file| FileJson {
				layer: file.target.layer(),
				obj: file.obj_path.display().to_string(),
				mtl: file.mtl_path.as_ref().map(|mtl| mtl.display().to_string()),
				objects: file.stats.objects_written,
				skipped: file.stats.objects_skipped,
				vertices: file.stats.vertices,
				faces: file.stats.faces,
			})
			.collect(),
		anomalies: anomalies.iter().map(|anomaly| AnomalyJson::from(*anomaly)).collect(),
	};

	emit_json(&payload);
}

#[derive(serde::Serialize)]
struct DuplicateJson {
	layer: u8,
	duplicate_of: u8,
}

#[derive(serde::Serialize)]
struct FileJson {
	layer: Option<u8>,
	obj: String,
	mtl: Option<String>,
	objects: usize,
	skipped: usize,
	vertices: usize,
	faces: usize,
}

#[derive(serde::Serialize)]
struct ConvertJson {
	path: String,
	bin: Option<String>,
	version: u8,
	materials: Option<usize>,
	objects_built: usize,
	sidecar: Option<String>,
	duplicate_layers: Vec<DuplicateJson>,
	undiscovered_layers: Vec<u8>,
	files: Vec<FileJson>,
	anomalies: Vec<AnomalyJson>,
}
