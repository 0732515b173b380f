use std::fs;
use std::path::{Path, PathBuf};

use crate::geo::obj::{MTL_HEADER, OBJ_HEADER, render_object};
use crate::geo::{
	Anomalies, ExportTarget, GeoError, LayerPlan, MapGeo, MaterialMap, ObjectRecord, Result, TextWriter, TriangleBuffer, VertexCache, export_targets,
};

/// Magic of the merged-export layer sidecar.
pub const SIDECAR_MAGIC: [u8; 8] = *b"MGLAYERS";
/// Layer sidecar format version.
pub const SIDECAR_VERSION: i32 = 1;

/// Controls which file sets an export writes.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ExportOptions {
	/// Also export unique layers that no object names explicitly.
	pub include_undiscovered_layers: bool,
	/// Write one file with every object plus a `.mapgeolayer` sidecar.
	pub merged: bool,
}

/// Counters for one written file set.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LayerStats {
	/// Objects written.
	pub objects_written: usize,
	/// Objects dropped after an object-local failure.
	pub objects_skipped: usize,
	/// Vertices written.
	pub vertices: usize,
	/// Faces written.
	pub faces: usize,
}

/// One written `.obj` (and optional `.mtl`).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportedFile {
	/// What the file holds.
	pub target: ExportTarget,
	/// Written mesh file.
	pub obj_path: PathBuf,
	/// Written material file, absent without materials.
	pub mtl_path: Option<PathBuf>,
	/// Counters.
	pub stats: LayerStats,
}

/// Summary of a whole export run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExportReport {
	/// Written file sets in order.
	pub files: Vec<ExportedFile>,
	/// Layer sidecar written in merged mode.
	pub sidecar: Option<PathBuf>,
	/// Skipped duplicate layers as `(layer, duplicate_of)`.
	pub duplicates: Vec<(u8, u8)>,
	/// Unique layers no object names explicitly.
	pub undiscovered: Vec<u8>,
	/// Objects whose vertices were reconstructed.
	pub objects_built: usize,
}

/// Convert a decoded file into `.obj`/`.mtl` sets under `out_dir`.
///
/// Without `materials` no `.mtl` is written and faces carry no `usemtl`.
/// Every exported object is reconstructed before the first file is created,
/// so a reconstruction failure aborts the run with nothing written. A bad
/// submesh range or vertex index only drops the offending object.
pub fn export_to_dir(
	geo: &MapGeo,
	materials: Option<&MaterialMap>,
	options: &ExportOptions,
	out_dir: &Path,
	base_name: &str,
	anomalies: &mut Anomalies,
) -> Result<ExportReport> {
	let plan = LayerPlan::build(&geo.object_masks(), geo.discovered_layers);
	let targets = export_targets(&plan, options.merged, options.include_undiscovered_layers);
	let mut cache = VertexCache::new(geo.objects.len());
	prepare_objects(geo, &targets, &mut cache, anomalies)?;

	let mut report = ExportReport::default();

	if plan.is_layered() && !options.merged {
		report.duplicates = plan.duplicates();
		report.undiscovered = plan.undiscovered();
		for (layer, of) in &report.duplicates {
			tracing::info!(layer, duplicate_of = of, "skipping duplicate layer");
		}
		for layer in &report.undiscovered {
			if options.include_undiscovered_layers {
				tracing::warn!(layer, "exporting layer no object names explicitly");
			} else {
				tracing::warn!(layer, "skipping possibly unused layer");
			}
		}
	}

	fs::create_dir_all(out_dir)?;

	if options.merged {
		let path = out_dir.join(format!("{base_name}.mapgeolayer"));
		write_layer_sidecar(&path, &geo.object_masks())?;
		report.sidecar = Some(path);
	}

	for target in targets {
		let file = write_target(geo, materials, target, out_dir, base_name, &mut cache, anomalies)?;
		tracing::info!(
			obj = %file.obj_path.display(),
			objects = file.stats.objects_written,
			skipped = file.stats.objects_skipped,
			vertices = file.stats.vertices,
			faces = file.stats.faces,
			"wrote export"
		);
		report.files.push(file);
	}

	report.objects_built = cache.built();
	Ok(report)
}

/// Build the vertices of every object some target shows and check its triangle buffer reference.
fn prepare_objects(geo: &MapGeo, targets: &[ExportTarget], cache: &mut VertexCache, anomalies: &mut Anomalies) -> Result<()> {
	for (object_idx, object) in geo.objects.iter().enumerate() {
		if !targets.iter().any(|target| object.visible_in(target.filter())) {
			continue;
		}
		cache.get_or_build(geo, object_idx, anomalies)?;
		triangle_buffer(geo, object_idx, object)?;
	}
	tracing::debug!(objects = cache.built(), targets = targets.len(), "reconstructed exported objects");
	Ok(())
}

fn triangle_buffer<'g>(geo: &'g MapGeo, object_idx: usize, object: &ObjectRecord) -> Result<&'g TriangleBuffer> {
	geo.triangle_buffers.get(object.triangle_buffer).ok_or(GeoError::ObjectReference {
		object: object_idx,
		kind: "triangle buffer",
		index: object.triangle_buffer,
		len: geo.triangle_buffers.len(),
	})
}

fn write_target(
	geo: &MapGeo,
	materials: Option<&MaterialMap>,
	target: ExportTarget,
	out_dir: &Path,
	base_name: &str,
	cache: &mut VertexCache,
	anomalies: &mut Anomalies,
) -> Result<ExportedFile> {
	let stem = target.file_stem(base_name);
	let obj_path = out_dir.join(format!("{stem}.obj"));
	let mtl_name = format!("{stem}.mtl");

	let mut obj = TextWriter::create(&obj_path)?;
	obj.write_line(OBJ_HEADER)?;
	obj.blank_lines(1)?;

	let mut mtl = None;
	let mut mtl_path = None;
	if materials.is_some() {
		let path = out_dir.join(&mtl_name);
		let mut writer = TextWriter::create(&path)?;
		writer.write_line(MTL_HEADER)?;
		obj.write_line(format_args!("mtllib {mtl_name}"))?;
		mtl = Some(writer);
		mtl_path = Some(path);
	}

	let filter = target.filter();
	let mut stats = LayerStats::default();
	let mut offset = 1;
	for (object_idx, object) in geo.objects.iter().enumerate() {
		if !object.visible_in(filter) {
			continue;
		}

		let block = cache.get_or_build(geo, object_idx, anomalies)?;
		let triangles = triangle_buffer(geo, object_idx, object)?;

		match render_object(object_idx, object, block, triangles, offset, materials) {
			Ok(output) => {
				obj.write_raw(&output.obj)?;
				if let Some(mtl) = mtl.as_mut() {
					mtl.write_raw(&output.mtl)?;
				}
				offset += output.vertices;
				stats.objects_written += 1;
				stats.vertices += output.vertices;
				stats.faces += output.faces;
			}
			Err(err) if err.is_object_local() => {
				tracing::warn!(object = object_idx, name = %object.name, layer = ?target.layer(), "skipping object: {err}");
				stats.objects_skipped += 1;
			}
			Err(err) => return Err(err),
		}
	}

	obj.finish()?;
	if let Some(mtl) = mtl {
		mtl.finish()?;
	}

	Ok(ExportedFile {
		target,
		obj_path,
		mtl_path,
		stats,
	})
}

/// Write the merged-export layer sidecar: magic, version, object count, one mask byte per object.
pub fn write_layer_sidecar(path: &Path, masks: &[u8]) -> Result<()> {
	let count = i32::try_from(masks.len()).map_err(|_| GeoError::InvalidInput {
		path: path.display().to_string(),
	})?;

	let mut bytes = Vec::with_capacity(16 + masks.len());
	bytes.extend_from_slice(&SIDECAR_MAGIC);
	bytes.extend_from_slice(&SIDECAR_VERSION.to_le_bytes());
	bytes.extend_from_slice(&count.to_le_bytes());
	bytes.extend_from_slice(masks);
	fs::write(path, bytes)?;
	Ok(())
}
