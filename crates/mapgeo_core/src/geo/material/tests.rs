use std::collections::BTreeSet;

use mapgeo_testkit::BinBlobBuilder;

use crate::geo::{Anomalies, BinScanResolver, DEFAULT_COLOR, Material, MaterialResolver, UNRESOLVED_COLOR, find_bytes};

fn names(items: &[&str]) -> BTreeSet<String> {
	items.iter().map(|item| (*item).to_owned()).collect()
}

#[test]
fn longer_names_claim_their_occurrence_first() {
	let blob = BinBlobBuilder::new()
		.material("Maps/FooBar")
		.sampler("DiffuseTexture", "ASSETS/Maps/foobar.dds")
		.material("Maps/Foo")
		.sampler("DiffuseTexture", "ASSETS/Maps/foo.dds")
		.build();

	let resolver = BinScanResolver::new(&blob);
	let spans = resolver.locate(&names(&["Maps/Foo", "Maps/FooBar"]));

	let foobar_at = find_bytes(&blob, b"Maps/FooBar", 0).expect("FooBar present");
	let foo = spans.iter().find(|span| span.name == "Maps/Foo").expect("Foo located");
	let foobar = spans.iter().find(|span| span.name == "Maps/FooBar").expect("FooBar located");
	assert_eq!(foobar.start, Some(foobar_at));
	assert_ne!(foo.start, Some(foobar_at));
	assert_eq!(foobar.end, foo.start.expect("Foo found"));
	assert_eq!(foo.end, blob.len());

	let materials = resolver.resolve(&names(&["Maps/Foo", "Maps/FooBar"]), &mut Anomalies::default()).expect("resolves");
	assert_eq!(materials["Maps/FooBar"].texture, "ASSETS/Maps/foobar.dds");
	assert_eq!(materials["Maps/Foo"].texture, "ASSETS/Maps/foo.dds");
}

#[test]
fn sampler_priority_and_path_case_are_kept() {
	let blob = BinBlobBuilder::new()
		.material("Maps/Water")
		.sampler("Mask_Texture", "ASSETS/Maps/mask.dds")
		.sampler("Diffuse_Texture", "Assets/Maps/Water_Diffuse.DDS")
		.build();

	let materials = BinScanResolver::new(&blob)
		.resolve(&names(&["Maps/Water"]), &mut Anomalies::default())
		.expect("resolves");
	let water = &materials["Maps/Water"];
	assert_eq!(water.sampler, Some("Diffuse_Texture"));
	assert_eq!(water.texture, "Assets/Maps/Water_Diffuse.DDS");
	assert_eq!(water.ambient, DEFAULT_COLOR);
}

#[test]
fn color_key_requires_value_hash_and_vector4_tag() {
	let blob = BinBlobBuilder::new()
		.material("Maps/Glow")
		.text("ColorTint")
		.color("Emissive_Color", [0.5, 0.25, 1.0, 1.0])
		.build();

	let mut anomalies = Anomalies::default();
	let materials = BinScanResolver::new(&blob).resolve(&names(&["Maps/Glow"]), &mut anomalies).expect("resolves");
	let glow = &materials["Maps/Glow"];
	assert_eq!(glow.texture, "");
	assert_eq!(glow.color_key, Some("Emissive_Color"));
	assert_eq!(glow.ambient, [0.5, 0.25, 1.0, 1.0]);
	assert_eq!(anomalies.count_kind("missing_sampler_key"), 1);
}

#[test]
fn unexpected_color_tag_keeps_default_color() {
	let blob = BinBlobBuilder::new()
		.material("Maps/Odd")
		.color_with_tag("Color", 0x0C, [0.5, 0.5, 0.5, 1.0])
		.build();

	let mut anomalies = Anomalies::default();
	let materials = BinScanResolver::new(&blob).resolve(&names(&["Maps/Odd"]), &mut anomalies).expect("resolves");
	assert_eq!(materials["Maps/Odd"].ambient, DEFAULT_COLOR);
	assert_eq!(anomalies.count_kind("unexpected_color_type"), 1);
}

#[test]
fn span_without_sampler_or_color_is_magenta() {
	let blob = BinBlobBuilder::new().material("Maps/Nothing").text("just some unrelated text").build();

	let mut anomalies = Anomalies::default();
	let materials = BinScanResolver::new(&blob).resolve(&names(&["Maps/Nothing"]), &mut anomalies).expect("resolves");
	let nothing = &materials["Maps/Nothing"];
	assert_eq!(nothing.ambient, UNRESOLVED_COLOR);
	assert_eq!(nothing.ambient, [1.0, 0.0, 1.0, 1.0]);
	assert_eq!(nothing.texture, "");
}

#[test]
fn missing_name_keeps_defaults_and_is_reported() {
	let blob = BinBlobBuilder::new().material("Maps/Present").sampler("DiffuseTexture", "ASSETS/p.dds").build();

	let mut anomalies = Anomalies::default();
	let materials = BinScanResolver::new(&blob)
		.resolve(&names(&["Maps/Present", "Maps/Absent"]), &mut anomalies)
		.expect("resolves");
	assert_eq!(materials.len(), 2);
	assert_eq!(materials["Maps/Absent"], Material::new("Maps/Absent"));
	assert_eq!(materials["Maps/Present"].texture, "ASSETS/p.dds");
	assert_eq!(anomalies.count_kind("material_not_found"), 1);
}

#[test]
fn notable_sampler_is_informational() {
	let blob = BinBlobBuilder::new().material("Maps/Fx").sampler("GlowTexture", "ASSETS/glow.dds").build();

	let mut anomalies = Anomalies::new(true);
	let materials = BinScanResolver::new(&blob).resolve(&names(&["Maps/Fx"]), &mut anomalies).expect("strict still resolves");
	assert_eq!(materials["Maps/Fx"].texture, "ASSETS/glow.dds");
	assert_eq!(anomalies.count_kind("notable_sampler"), 1);
}

#[test]
fn export_texture_coerces_extension() {
	let mut material = Material::new("M");
	assert_eq!(material.export_texture(), None);

	material.texture = "ASSETS/a.DDS".to_owned();
	assert_eq!(material.export_texture().as_deref(), Some("ASSETS/a.DDS"));

	material.texture = "ASSETS/a.tex".to_owned();
	assert_eq!(material.export_texture().as_deref(), Some("ASSETS/a.dds"));
}

#[test]
fn find_bytes_handles_edges() {
	assert_eq!(find_bytes(b"abcabc", b"abc", 1), Some(3));
	assert_eq!(find_bytes(b"abc", b"", 0), None);
	assert_eq!(find_bytes(b"abc", b"c", 4), None);
	assert_eq!(find_bytes(b"ab", b"abc", 0), None);
}
