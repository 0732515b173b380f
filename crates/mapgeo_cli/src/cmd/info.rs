use std::path::PathBuf;

use mapgeo::geo::{DecodeOptions, MapGeoFile, Result, mask_histogram};

use crate::cmd::util::{AnomalyJson, emit_json, mask_hex};

#[derive(clap::Args)]
pub struct Args {
	pub path: PathBuf,
	/// Fail on the first decode anomaly.
	#[arg(long)]
	pub strict: bool,
	#[arg(long)]
	pub json: bool,
}

/// Print header, block counts, layer masks, and decode anomalies.
pub fn run(args: Args) -> Result<()> {
	let Args { path, strict, json } = args;

	let options = if strict { DecodeOptions::strict() } else { DecodeOptions::default() };
	let file = MapGeoFile::open(&path, &options)?;
	let geo = &file.geo;
	let histogram = mask_histogram(&geo.object_masks());
	let materials = geo.material_names();

	if json {
		let payload = InfoJson {
			path: path.display().to_string(),
			version: file.header.version.get(),
			byte_len: file.byte_len,
			consumed: file.consumed,
			header_reserved: HeaderReservedJson {
				byte: geo.header_reserved.byte,
				ints: geo.header_reserved.ints.clone(),
			},
			vertex_formats: geo.formats.len(),
			float_buffers: geo.float_buffers.len(),
			triangle_buffers: geo.triangle_buffers.len(),
			objects: geo.objects.len(),
			materials: materials.len(),
			discovered_layers: mask_hex(geo.discovered_layers),
			layered: geo.is_layered(),
			masks: histogram
				.iter()
				.map(|(mask, count)| MaskJson {
					mask: mask_hex(*mask),
					objects: *count,
				})
				.collect(),
			anomalies: file.anomalies.iter().map(AnomalyJson::from).collect(),
		};
		emit_json(&payload);
		return Ok(());
	}

	println!("path: {}", path.display());
	println!("version: {}", file.header.version);
	println!("byte_len: {}", file.byte_len);
	println!("consumed: {}", file.consumed);
	if let Some(byte) = geo.header_reserved.byte {
		println!("header_reserved_byte: {byte}");
	}
	for (idx, value) in geo.header_reserved.ints.iter().enumerate() {
		println!("header_flag_{idx}: 0x{value:08x}");
	}
	println!("vertex_formats: {}", geo.formats.len());
	println!("float_buffers: {}", geo.float_buffers.len());
	println!("triangle_buffers: {}", geo.triangle_buffers.len());
	println!("objects: {}", geo.objects.len());
	println!("materials: {}", materials.len());
	println!("discovered_layers: {}", mask_hex(geo.discovered_layers));
	println!("layered: {}", geo.is_layered());

	println!("masks:");
	for (mask, count) in &histogram {
		println!("  {}: {}", mask_hex(*mask), count);
	}

	println!("anomalies: {}", file.anomalies.len());
	for anomaly in &file.anomalies {
		println!("  {}: {}", anomaly.kind(), anomaly);
	}

	Ok(())
}

#[derive(serde::Serialize)]
struct HeaderReservedJson {
	byte: Option<u8>,
	ints: Vec<u32>,
}

#[derive(serde::Serialize)]
struct MaskJson {
	mask: String,
	objects: usize,
}

#[derive(serde::Serialize)]
struct InfoJson {
	path: String,
	version: u8,
	byte_len: usize,
	consumed: usize,
	header_reserved: HeaderReservedJson,
	vertex_formats: usize,
	float_buffers: usize,
	triangle_buffers: usize,
	objects: usize,
	materials: usize,
	discovered_layers: String,
	layered: bool,
	masks: Vec<MaskJson>,
	anomalies: Vec<AnomalyJson>,
}
