use glam::Vec3;

use crate::geo::{IDENTITY_TRANSFORM, ObjectRecord, ObjectReserved, Submesh};

fn object(mask: u8, transform: [f32; 16]) -> ObjectRecord {
	ObjectRecord {
		name: "Mesh".to_owned(),
		vertex_count: 0,
		format_start: 0,
		float_buffers: Vec::new(),
		index_count: 0,
		triangle_buffer: 0,
		submeshes: Vec::new(),
		bounds: [0.0; 6],
		transform,
		classification: 0x1F,
		layer_mask: mask,
		lightmap_texture: String::new(),
		reserved: ObjectReserved::default(),
	}
}

#[test]
fn transform_matrix_is_column_major() {
	let mut transform = IDENTITY_TRANSFORM;
	transform[12] = 5.0;
	transform[13] = -2.0;

	let record = object(0xFF, transform);
	assert_ne!(record.transform, IDENTITY_TRANSFORM);
	assert_eq!(record.transform_matrix().transform_point3(Vec3::new(1.0, 1.0, 1.0)), Vec3::new(6.0, -1.0, 1.0));
}

#[test]
fn layer_filter_requires_every_filter_bit() {
	let record = object(0b0000_0101, IDENTITY_TRANSFORM);
	assert!(record.visible_in(0b0000_0001));
	assert!(record.visible_in(0b0000_0100));
	assert!(!record.visible_in(0b0000_0010));
	assert!(record.visible_in(0));
	assert!(!record.on_all_layers());
	assert!(object(0xFF, IDENTITY_TRANSFORM).visible_in(0b1000_0000));
}

#[test]
fn submesh_end_is_exclusive() {
	let submesh = Submesh {
		reserved: 0,
		material: "M".to_owned(),
		start: 2,
		count: 3,
		reserved_range: [0, 0],
	};
	assert_eq!(submesh.end(), 5);
}
