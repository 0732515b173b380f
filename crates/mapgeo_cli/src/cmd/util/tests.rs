use std::path::PathBuf;

use mapgeo::geo::GeoError;

use super::{InputSet, file_stem, mask_hex, split_inputs};

#[test]
fn split_inputs_is_order_insensitive() {
	let set = split_inputs(vec![PathBuf::from("room.materials.bin"), PathBuf::from("room.mapgeo")]).expect("inputs split");
	assert_eq!(
		set,
		InputSet {
			mapgeo: PathBuf::from("room.mapgeo"),
			bin: Some(PathBuf::from("room.materials.bin")),
		}
	);
}

#[test]
fn split_inputs_matches_extension_case_insensitively() {
	let set = split_inputs(vec![PathBuf::from("BASE.MAPGEO"), PathBuf::from("Base.Bin")]).expect("inputs split");
	assert_eq!(set.mapgeo, PathBuf::from("BASE.MAPGEO"));
	assert_eq!(set.bin, Some(PathBuf::from("Base.Bin")));
}

#[test]
fn split_inputs_keeps_first_of_each_kind() {
	let set = split_inputs(vec![
		PathBuf::from("a.mapgeo"),
		PathBuf::from("notes.txt"),
		PathBuf::from("b.mapgeo"),
		PathBuf::from("c.bin"),
		PathBuf::from("d.bin"),
	])
	.expect("inputs split");
	assert_eq!(set.mapgeo, PathBuf::from("a.mapgeo"));
	assert_eq!(set.bin, Some(PathBuf::from("c.bin")));
}

#[test]
fn split_inputs_allows_missing_bin() {
	let set = split_inputs(vec![PathBuf::from("only.mapgeo")]).expect("inputs split");
	assert_eq!(set.bin, None);
}

#[test]
fn split_inputs_requires_mapgeo() {
	let err = split_inputs(vec![PathBuf::from("only.bin")]).expect_err("no mapgeo");
	assert!(matches!(err, GeoError::MissingMapGeoInput));

	let err = split_inputs(Vec::new()).expect_err("no inputs");
	assert!(matches!(err, GeoError::MissingMapGeoInput));
}

#[test]
fn file_stem_drops_last_extension_only() {
	assert_eq!(file_stem(&PathBuf::from("maps/base_srx.mapgeo")).expect("stem"), "base_srx");
	assert_eq!(file_stem(&PathBuf::from("x.y.mapgeo")).expect("stem"), "x.y");
}

#[test]
fn mask_hex_pads_two_digits() {
	assert_eq!(mask_hex(0x01), "0x01");
	assert_eq!(mask_hex(0xff), "0xff");
}
