use std::path::PathBuf;

use mapgeo::geo::{Anomalies, DecodeOptions, MapGeoFile, Result};

use crate::cmd::util::{AnomalyJson, emit_json, resolve_materials};

#[derive(clap::Args)]
pub struct Args {
	pub mapgeo: PathBuf,
	pub bin: PathBuf,
	/// Fail on the first decode or material anomaly.
	#[arg(long)]
	pub strict: bool,
	#[arg(long)]
	pub json: bool,
}

/// Resolve every material the geometry names against a property blob.
pub fn run(args: Args) -> Result<()> {
	let Args { mapgeo, bin, strict, json } = args;

	let options = if strict { DecodeOptions::strict() } else { DecodeOptions::default() };
	let file = MapGeoFile::open(&mapgeo, &options)?;
	let mut anomalies = Anomalies::new(strict);
	let materials = resolve_materials(&file.geo, &bin, &mut anomalies)?;

	if json {
		let payload = MaterialsJson {
			mapgeo: mapgeo.display().to_string(),
			bin: bin.display().to_string(),
			materials: materials
				.values()
				.map(|material| MaterialJson {
					name: material.name.clone(),
					texture: material.export_texture(),
					ambient: material.ambient,
					sampler: material.sampler,
					color_key: material.color_key,
				})
				.collect(),
			anomalies: anomalies.items().iter().map(AnomalyJson::from).collect(),
		};
		emit_json(&payload);
		return Ok(());
	}

	println!("mapgeo: {}", mapgeo.display());
	println!("bin: {}", bin.display());
	println!("materials: {}", materials.len());
	println!("name\ttexture\tambient\tsampler\tcolor_key");
	for material in materials.values() {
		let [r, g, b, a] = material.ambient;
		println!(
			"{}\t{}\t{r:.3} {g:.3} {b:.3} {a:.3}\t{}\t{}",
			material.name,
			material.export_texture().as_deref().unwrap_or("-"),
			material.sampler.unwrap_or("-"),
			material.color_key.unwrap_or("-")
		);
	}
	println!("anomalies: {}", anomalies.len());

	Ok(())
}

#[derive(serde::Serialize)]
struct MaterialJson {
	name: String,
	texture: Option<String>,
	ambient: [f32; 4],
	sampler: Option<&'static str>,
	color_key: Option<&'static str>,
}

#[derive(serde::Serialize)]
struct MaterialsJson {
	mapgeo: String,
	bin: String,
	materials: Vec<MaterialJson>,
	anomalies: Vec<AnomalyJson>,
}
