#![allow(missing_docs)]

use std::path::{Path, PathBuf};
use std::process::{Command, Output};

use mapgeo_testkit::{BinBlobBuilder, MapGeoBuilder, ObjectSpec, POS_NORMAL_UV, SubmeshSpec, scratch_dir, write_file};
use serde_json::Value;

fn layered_fixture(dir: &Path) -> PathBuf {
	let mut builder = MapGeoBuilder::new(11)
		.format(&POS_NORMAL_UV)
		.float_buffer(&[
			0.0, 0.0, 0.0, 0.0, 1.0, 0.0, 0.0, 0.0, //
			1.0, 0.0, 0.0, 0.0, 1.0, 0.0, 1.0, 0.0, //
			0.0, 0.0, 1.0, 0.0, 1.0, 0.0, 0.0, 1.0,
		])
		.triangle_buffer(&[[0, 1, 2]]);
	for (idx, mask) in [0x01_u8, 0x02, 0xFF].into_iter().enumerate() {
		builder = builder.object(
			ObjectSpec::new(&format!("Object{idx}"))
				.layer_mask(mask)
				.submesh(SubmeshSpec::new(&format!("Maps/Mat{idx}"), 0, 1)),
		);
	}
	write_file(dir, "Room.mapgeo", &builder.build())
}

fn material_blob(dir: &Path) -> PathBuf {
	let blob = BinBlobBuilder::new()
		.material("Maps/Mat0")
		.sampler("DiffuseTexture", "ASSETS/Maps/floor.dds")
		.material("Maps/Mat1")
		.sampler("Mask_Textures", "assets/maps/wall.dds")
		.color("Emissive_Color", [0.5, 0.25, 1.0, 1.0])
		.material("Maps/Mat2")
		.build();
	write_file(dir, "Room.materials.bin", &blob)
}

fn run(args: &[&str]) -> Output {
	Command::new(env!("CARGO_BIN_EXE_mapgeo")).args(args).output().expect("command executes")
}

fn run_json(args: &[&str]) -> Value {
	let output = run(args);
	assert!(
		output.status.success(),
		"mapgeo failed with status={}: {}",
		output.status,
		String::from_utf8_lossy(&output.stderr)
	);
	serde_json::from_slice(&output.stdout).expect("stdout should be valid json")
}

fn path_str(path: &Path) -> &str {
	path.to_str().expect("scratch path is utf-8")
}

#[test]
fn info_json_reports_counts_and_masks() {
	let dir = scratch_dir();
	let mapgeo = layered_fixture(dir.path());

	let json = run_json(&["info", path_str(&mapgeo), "--json"]);

	assert_eq!(json["version"], 11);
	assert_eq!(json["objects"], 3);
	assert_eq!(json["materials"], 3);
	assert_eq!(json["discovered_layers"], "0x03");
	assert_eq!(json["layered"], true);
	assert_eq!(json["consumed"], json["byte_len"]);
	assert_eq!(json["masks"].as_array().map(Vec::len), Some(3));
	assert!(json["anomalies"].as_array().is_some_and(Vec::is_empty));
}

#[test]
fn layers_json_flags_duplicates_and_undiscovered() {
	let dir = scratch_dir();
	let mapgeo = layered_fixture(dir.path());

	let json = run_json(&["layers", path_str(&mapgeo), "--json"]);
	let layers = json["layers"].as_array().expect("layers array");

	assert_eq!(layers.len(), 8);
	assert_eq!(layers[0]["presence"], "101");
	assert_eq!(layers[1]["presence"], "011");
	assert_eq!(layers[2]["presence"], "001");
	assert_eq!(layers[2]["discovered"], false);
	assert!(layers[2]["duplicate_of"].is_null());
	for layer in &layers[3..] {
		assert_eq!(layer["duplicate_of"], 2);
	}
}

#[test]
fn convert_writes_discovered_layers_with_materials() {
	let dir = scratch_dir();
	let mapgeo = layered_fixture(dir.path());
	let bin = material_blob(dir.path());
	let out = dir.path().join("out");

	let json = run_json(&["convert", path_str(&bin), path_str(&mapgeo), "--out-dir", path_str(&out), "--json"]);

	assert_eq!(json["materials"], 3);
	assert_eq!(json["undiscovered_layers"], serde_json::json!([2]));
	let files = json["files"].as_array().expect("files array");
	assert_eq!(files.len(), 2);
	assert_eq!(files[0]["layer"], 0);
	assert_eq!(files[0]["objects"], 2);
	assert_eq!(files[1]["layer"], 1);

	let obj = std::fs::read_to_string(out.join("Room.Layer0.obj")).expect("obj written");
	assert!(obj.contains("mtllib Room.Layer0.mtl\r\n"));
	assert!(obj.contains("usemtl MapGeoMesh1SG\r\n"));
	assert!(obj.contains("usemtl MapGeoMesh3SG\r\n"));
	assert!(!obj.contains("MapGeoMesh2"));

	let mtl = std::fs::read_to_string(out.join("Room.Layer1.mtl")).expect("mtl written");
	assert!(mtl.contains("newmtl MapGeoMesh2SG\r\n"));
	assert!(mtl.contains("Ka 0.5 0.25 1\r\n"));
	assert!(mtl.contains("map_Kd textures/assets/maps/wall.dds\r\n"));
	assert!(!out.join("Room.Layer2.obj").exists());
}

#[test]
fn convert_all_layers_includes_undiscovered_layer() {
	let dir = scratch_dir();
	let mapgeo = layered_fixture(dir.path());
	let out = dir.path().join("out");

	let json = run_json(&["convert", path_str(&mapgeo), "--out-dir", path_str(&out), "--all-layers", "--json"]);

	assert_eq!(json["files"].as_array().map(Vec::len), Some(3));
	assert!(json["materials"].is_null());
	assert!(out.join("Room.Layer2.obj").exists());
	assert!(!out.join("Room.Layer2.mtl").exists());
}

#[test]
fn convert_merged_writes_single_file_and_sidecar() {
	let dir = scratch_dir();
	let mapgeo = layered_fixture(dir.path());
	let out = dir.path().join("out");

	let json = run_json(&["convert", path_str(&mapgeo), "--out-dir", path_str(&out), "--merged", "--json"]);

	assert_eq!(json["files"].as_array().map(Vec::len), Some(1));
	assert_eq!(json["files"][0]["objects"], 3);
	let sidecar = std::fs::read(out.join("Room.mapgeolayer")).expect("sidecar written");
	assert_eq!(&sidecar[..8], b"MGLAYERS");
	assert_eq!(&sidecar[sidecar.len() - 3..], &[0x01_u8, 0x02, 0xFF]);
}

#[test]
fn convert_defaults_out_dir_to_input_directory() {
	let dir = scratch_dir();
	let mapgeo = write_file(
		dir.path(),
		"Flat.mapgeo",
		&MapGeoBuilder::new(9)
			.format(&POS_NORMAL_UV)
			.float_buffer(&[0.0; 24])
			.triangle_buffer(&[[0, 1, 2]])
			.object(ObjectSpec::new("Only").submesh(SubmeshSpec::new("Maps/Only", 0, 1)))
			.build(),
	);

	let output = run(&["convert", path_str(&mapgeo)]);

	assert!(output.status.success(), "{}", String::from_utf8_lossy(&output.stderr));
	assert!(dir.path().join("Flat.obj").exists());
	assert!(!dir.path().join("Flat.mtl").exists());
}

#[test]
fn convert_without_mapgeo_fails() {
	let dir = scratch_dir();
	let bin = material_blob(dir.path());

	let output = run(&["convert", path_str(&bin)]);

	assert!(!output.status.success());
	assert!(String::from_utf8_lossy(&output.stderr).contains("error: must provide a .mapgeo file"));
}

#[test]
fn strict_info_rejects_reserved_anomaly() {
	let dir = scratch_dir();
	let mapgeo = write_file(
		dir.path(),
		"Odd.mapgeo",
		&MapGeoBuilder::new(10)
			.header_ints([0, 7])
			.format(&POS_NORMAL_UV)
			.float_buffer(&[0.0; 24])
			.triangle_buffer(&[[0, 1, 2]])
			.object(ObjectSpec::new("Only").submesh(SubmeshSpec::new("Maps/Only", 0, 1)))
			.build(),
	);

	let json = run_json(&["info", path_str(&mapgeo), "--json"]);
	assert_eq!(json["anomalies"][0]["kind"], "reserved_non_zero");

	let output = run(&["info", path_str(&mapgeo), "--strict"]);
	assert!(!output.status.success());
	assert!(String::from_utf8_lossy(&output.stderr).contains("error: strict mode:"));
}

#[test]
fn unknown_magic_is_reported() {
	let dir = scratch_dir();
	let path = write_file(dir.path(), "Bad.mapgeo", b"NOPE\x0b\0\0\0");

	let output = run(&["info", path_str(&path)]);

	assert!(!output.status.success());
	assert!(String::from_utf8_lossy(&output.stderr).contains("error: not a .mapgeo file"));
}
