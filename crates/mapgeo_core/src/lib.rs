//! Public library API for decoding `.mapgeo` scene geometry and exporting it as Wavefront OBJ.

/// Mapgeo decoding, vertex reconstruction, material resolution, and OBJ export.
pub mod geo;
