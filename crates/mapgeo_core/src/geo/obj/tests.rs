use crate::geo::{
	GeoError, IDENTITY_TRANSFORM, Material, MaterialMap, Num, ObjectRecord, ObjectReserved, Submesh, TextWriter, TriangleBuffer, Vertex, VertexBlock, group_name,
	render_object, write_material,
};

fn object(submeshes: Vec<Submesh>) -> ObjectRecord {
	ObjectRecord {
		name: "Rock".to_owned(),
		vertex_count: 0,
		format_start: 0,
		float_buffers: vec![0],
		index_count: 0,
		triangle_buffer: 0,
		submeshes,
		bounds: [0.0; 6],
		transform: IDENTITY_TRANSFORM,
		classification: 0x1F,
		layer_mask: 0xFF,
		lightmap_texture: String::new(),
		reserved: ObjectReserved::default(),
	}
}

fn submesh(material: &str, start: usize, count: usize) -> Submesh {
	Submesh {
		reserved: 0,
		material: material.to_owned(),
		start,
		count,
		reserved_range: [0, 0],
	}
}

fn block(count: usize) -> VertexBlock {
	let mut vertices = vec![
		Vertex {
			position: Some([0.0, 0.0, 0.0]),
			normal: Some([0.0, 1.0, 0.0]),
			color_uv: Some([0.0, 0.0]),
			lightmap_uv: None,
		};
		count
	];
	vertices[0] = Vertex {
		position: Some([1.0, 2.0, 3.0]),
		normal: Some([0.0, 0.0, 2.0]),
		color_uv: Some([0.2, 0.3]),
		lightmap_uv: None,
	};
	VertexBlock { vertices }
}

fn lines(bytes: &[u8]) -> Vec<String> {
	String::from_utf8(bytes.to_vec())
		.expect("output is utf-8")
		.split("\r\n")
		.map(str::to_owned)
		.collect()
}

#[test]
fn num_prints_shortest_form_and_hides_negative_zero() {
	assert_eq!(Num(-0.0).to_string(), "0");
	assert_eq!(Num(1.0).to_string(), "1");
	assert_eq!(Num(-1.0).to_string(), "-1");
	assert_eq!(Num(0.2).to_string(), "0.2");
}

#[test]
fn converts_handedness_and_flips_v() {
	let triangles = TriangleBuffer {
		triangles: vec![[0, 1, 2]],
	};
	let output = render_object(0, &object(vec![submesh("M", 0, 1)]), &block(3), &triangles, 1, None).expect("renders");
	let text = lines(&output.obj);

	assert!(text.contains(&"v -1 2 3".to_owned()), "{text:?}");
	assert!(text.contains(&"vt 0.2 0.7".to_owned()), "{text:?}");
	assert!(text.contains(&"vn 0 0 1".to_owned()), "{text:?}");
	assert!(text.contains(&"f 2/2/2 1/1/1 3/3/3".to_owned()), "{text:?}");
	assert!(!text.iter().any(|line| line.starts_with("usemtl")));
	assert_eq!(output.vertices, 3);
	assert_eq!(output.faces, 1);
	assert!(output.mtl.is_empty());
}

#[test]
fn face_indices_include_running_offset() {
	let triangles = TriangleBuffer {
		triangles: vec![[10, 11, 12]],
	};
	let output = render_object(4, &object(vec![submesh("M", 0, 1)]), &block(13), &triangles, 1, None).expect("renders");
	let text = lines(&output.obj);

	assert!(text.contains(&"f 12/12/12 11/11/11 13/13/13".to_owned()), "{text:?}");
	assert!(text.contains(&"g MapGeoMesh5".to_owned()));
}

#[test]
fn transform_applies_to_positions_and_normals() {
	let mut record = object(vec![]);
	// Translate by (10, 0, 0) and scale Z by 3.
	record.transform[10] = 3.0;
	record.transform[12] = 10.0;

	let output = render_object(0, &record, &block(1), &TriangleBuffer::default(), 1, None).expect("renders");
	let text = lines(&output.obj);
	assert!(text.contains(&"v -11 2 9".to_owned()), "{text:?}");
	assert!(text.contains(&"vn 0 0 1".to_owned()), "{text:?}");
}

#[test]
fn layout_of_object_block() {
	let triangles = TriangleBuffer {
		triangles: vec![[0, 0, 0], [0, 0, 0]],
	};
	let materials: MaterialMap = [("A".to_owned(), Material::new("A"))].into_iter().collect();
	let output = render_object(1, &object(vec![submesh("A", 0, 1), submesh("B", 1, 1)]), &block(1), &triangles, 7, Some(&materials))
		.expect("renders");

	let text = lines(&output.obj);
	assert_eq!(
		text,
		vec![
			"", "", "", "", "# Rock", "g default", "", "v -1 2 3", "", "vt 0.2 0.7", "", "vn 0 0 1", "", "s off", "g MapGeoMesh2_1",
			"usemtl MapGeoMesh2_1SG", "f 7/7/7 7/7/7 7/7/7", "s off", "g MapGeoMesh2_2", "usemtl MapGeoMesh2_2SG", "f 7/7/7 7/7/7 7/7/7", "",
		]
	);

	let mtl = lines(&output.mtl);
	assert_eq!(mtl.iter().filter(|line| line.starts_with("newmtl")).count(), 2);
	assert!(mtl.contains(&"newmtl MapGeoMesh2_2SG".to_owned()));
}

#[test]
fn submesh_past_triangle_buffer_is_object_local_error() {
	let triangles = TriangleBuffer {
		triangles: vec![[0, 0, 0]],
	};
	let err = render_object(0, &object(vec![submesh("M", 0, 2)]), &block(1), &triangles, 1, None).expect_err("range too long");
	assert!(err.is_object_local());
	assert!(matches!(err, GeoError::SubmeshOutOfRange { start: 0, end: 2, len: 1, .. }));
}

#[test]
fn vertex_index_past_block_is_object_local_error() {
	let triangles = TriangleBuffer {
		triangles: vec![[0, 1, 5]],
	};
	let err = render_object(0, &object(vec![submesh("M", 0, 1)]), &block(2), &triangles, 1, None).expect_err("index too large");
	assert!(err.is_object_local());
	assert!(matches!(err, GeoError::VertexIndexOutOfRange { index: 5, count: 2, .. }));
}

#[test]
fn material_entry_layout() {
	let mut material = Material::new("M");
	material.ambient = [1.0, 0.5, 0.0, 1.0];
	material.texture = "ASSETS/Maps/rock.dds".to_owned();

	let mut out = TextWriter::new(Vec::new());
	write_material(&mut out, "MapGeoMesh1SG", &material).expect("writes");
	let text = lines(&out.finish().expect("flushes"));

	assert_eq!(
		text,
		vec![
			"",
			"",
			"",
			"",
			"newmtl MapGeoMesh1SG",
			"illum 2",
			"Kd 1 0.5 0",
			"Ka 1 0.5 0",
			"Tf 1.00 1.00 1.00",
			"map_Kd textures/ASSETS/Maps/rock.dds",
			"Ni 1.00",
			"",
		]
	);
}

#[test]
fn group_names_number_from_one() {
	assert_eq!(group_name(0, 0, 1), "MapGeoMesh1");
	assert_eq!(group_name(2, 1, 3), "MapGeoMesh3_2");
}
