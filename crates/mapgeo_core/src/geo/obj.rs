use std::fmt;

use glam::Vec3;

use crate::geo::{GeoError, Material, MaterialMap, ObjectRecord, Result, TextWriter, TriangleBuffer, VertexBlock};

/// First line of every `.obj` file.
pub const OBJ_HEADER: &str = "# .mapgeo file converted to .obj format";
/// First line of every `.mtl` file.
pub const MTL_HEADER: &str = "# .mtl file for an accompanying .obj file, converted from .mapgeo format";

/// Float rendered for OBJ/MTL text; negative zero prints as `0`.
#[derive(Debug, Clone, Copy)]
pub struct Num(pub f32);

impl fmt::Display for Num {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		if self.0 == 0.0 { f.write_str("0") } else { write!(f, "{}", self.0) }
	}
}

/// Buffered text of one object, committed only when rendering succeeds.
#[derive(Debug, Default)]
pub struct ObjectOutput {
	/// `.obj` bytes.
	pub obj: Vec<u8>,
	/// `.mtl` bytes, empty without materials.
	pub mtl: Vec<u8>,
	/// Vertices written.
	pub vertices: usize,
	/// Faces written.
	pub faces: usize,
}

/// Group name of one submesh.
pub fn group_name(object_idx: usize, submesh_idx: usize, submesh_count: usize) -> String {
	if submesh_count > 1 {
		format!("MapGeoMesh{}_{}", object_idx + 1, submesh_idx + 1)
	} else {
		format!("MapGeoMesh{}", object_idx + 1)
	}
}

/// Render one object.
///
/// Positions and normals go through the object transform, then X is negated
/// to change handedness, UVs get `v` flipped, and the first two indices of
/// each triangle are swapped to keep the winding. `offset` is the 1-based
/// file index of this object's first vertex.
pub fn render_object(
	object_idx: usize,
	object: &ObjectRecord,
	block: &VertexBlock,
	triangles: &TriangleBuffer,
	offset: usize,
	materials: Option<&MaterialMap>,
) -> Result<ObjectOutput> {
	for (submesh_idx, submesh) in object.submeshes.iter().enumerate() {
		if submesh.end() > triangles.len() {
			return Err(GeoError::SubmeshOutOfRange {
				object: object_idx,
				submesh: submesh_idx,
				start: submesh.start,
				end: submesh.end(),
				len: triangles.len(),
			});
		}
	}

	let matrix = object.transform_matrix();
	let mut obj = TextWriter::new(Vec::new());
	let mut mtl = TextWriter::new(Vec::new());

	obj.blank_lines(4)?;
	obj.write_line(format_args!("# {}", object.name))?;
	obj.write_line("g default")?;
	obj.blank_lines(1)?;

	for vertex in &block.vertices {
		let position = matrix.transform_point3(Vec3::from(vertex.position.unwrap_or_default()));
		obj.write_line(format_args!("v {} {} {}", Num(-position.x), Num(position.y), Num(position.z)))?;
	}
	obj.blank_lines(1)?;

	for vertex in &block.vertices {
		let [u, v] = vertex.color_uv.unwrap_or_default();
		obj.write_line(format_args!("vt {} {}", Num(u), Num(1.0 - v)))?;
	}
	obj.blank_lines(1)?;

	for vertex in &block.vertices {
		let normal = matrix.transform_vector3(Vec3::from(vertex.normal.unwrap_or_default())).normalize_or_zero();
		obj.write_line(format_args!("vn {} {} {}", Num(-normal.x), Num(normal.y), Num(normal.z)))?;
	}
	obj.blank_lines(1)?;

	let mut faces = 0;
	for (submesh_idx, submesh) in object.submeshes.iter().enumerate() {
		let group = group_name(object_idx, submesh_idx, object.submeshes.len());
		let material_name = format!("{group}SG");

		obj.write_line("s off")?;
		obj.write_line(format_args!("g {group}"))?;
		if materials.is_some() {
			obj.write_line(format_args!("usemtl {material_name}"))?;
		}

		for triangle in &triangles.triangles[submesh.start..submesh.end()] {
			let mut global = [0_usize; 3];
			for (slot, local) in global.iter_mut().zip(triangle) {
				let local = usize::from(*local);
				if local >= block.len() {
					return Err(GeoError::VertexIndexOutOfRange {
						object: object_idx,
						index: local,
						count: block.len(),
					});
				}
				*slot = local + offset;
			}

			let [a, b, c] = global;
			obj.write_line(format_args!("f {b}/{b}/{b} {a}/{a}/{a} {c}/{c}/{c}"))?;
			faces += 1;
		}

		if let Some(materials) = materials {
			let fallback;
			let material = match materials.get(&submesh.material) {
				Some(material) => material,
				None => {
					fallback = Material::new(submesh.material.clone());
					&fallback
				}
			};
			write_material(&mut mtl, &material_name, material)?;
		}
	}

	Ok(ObjectOutput {
		obj: obj.finish()?,
		mtl: mtl.finish()?,
		vertices: block.len(),
		faces,
	})
}

/// Write one `newmtl` entry.
pub fn write_material<W: std::io::Write>(out: &mut TextWriter<W>, name: &str, material: &Material) -> Result<()> {
	let [r, g, b, _] = material.ambient;

	out.blank_lines(4)?;
	out.write_line(format_args!("newmtl {name}"))?;
	out.write_line("illum 2")?;
	out.write_line(format_args!("Kd {} {} {}", Num(r), Num(g), Num(b)))?;
	out.write_line(format_args!("Ka {} {} {}", Num(r), Num(g), Num(b)))?;
	out.write_line("Tf 1.00 1.00 1.00")?;
	if let Some(texture) = material.export_texture() {
		out.write_line(format_args!("map_Kd textures/{texture}"))?;
	}
	out.write_line("Ni 1.00")?;
	Ok(())
}

#[cfg(test)]
mod tests;
