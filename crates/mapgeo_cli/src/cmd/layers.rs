use std::path::PathBuf;

use mapgeo::geo::{DecodeOptions, LayerPlan, MapGeoFile, Result};

use crate::cmd::util::{emit_json, mask_hex};

#[derive(clap::Args)]
pub struct Args {
	pub path: PathBuf,
	#[arg(long)]
	pub json: bool,
}

/// Print which objects each layer shows and which layers repeat another.
pub fn run(args: Args) -> Result<()> {
	let Args { path, json } = args;

	let file = MapGeoFile::open(&path, &DecodeOptions::default())?;
	let plan = LayerPlan::build(&file.geo.object_masks(), file.geo.discovered_layers);

	if json {
		let payload = LayersJson {
			path: path.display().to_string(),
			objects: file.geo.objects.len(),
			discovered: mask_hex(plan.discovered),
			layered: plan.is_layered(),
			layers: plan
				.layers
				.iter()
				.map(|layer| LayerJson {
					index: layer.index,
					objects: layer.object_count(),
					discovered: layer.discovered,
					duplicate_of: layer.duplicate_of,
					presence: layer.presence.clone(),
				})
				.collect(),
		};
		emit_json(&payload);
		return Ok(());
	}

	println!("path: {}", path.display());
	println!("objects: {}", file.geo.objects.len());
	println!("discovered: {}", mask_hex(plan.discovered));
	println!("layered: {}", plan.is_layered());
	println!("layer\tobjects\tdiscovered\tduplicate_of\tpresence");
	for layer in &plan.layers {
		println!(
			"{}\t{}\t{}\t{}\t{}",
			layer.index,
			layer.object_count(),
			layer.discovered,
			layer.duplicate_of.map_or_else(|| "-".to_owned(), |of| of.to_string()),
			layer.presence
		);
	}

	Ok(())
}

#[derive(serde::Serialize)]
struct LayerJson {
	index: u8,
	objects: usize,
	discovered: bool,
	duplicate_of: Option<u8>,
	presence: String,
}

#[derive(serde::Serialize)]
struct LayersJson {
	path: String,
	objects: usize,
	discovered: String,
	layered: bool,
	layers: Vec<LayerJson>,
}
