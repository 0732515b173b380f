mod anomaly;
mod block;
mod bytes;
mod decode;
mod error;
mod export;
mod file;
mod format;
mod header;
mod layer;
mod material;
mod obj;
mod object;
mod text;
mod version;
mod vertex;

/// Soft anomaly record and collecting sink.
pub use anomaly::{Anomalies, Anomaly};
/// Raw float and triangle buffers.
pub use block::{FloatBuffer, TriangleBuffer};
/// Bounded little-endian byte cursor.
pub use bytes::Cursor;
/// Body decoding entry point and options.
pub use decode::{DecodeOptions, HeaderReserved, MapGeo, decode_body};
/// Error and result aliases.
pub use error::{GeoError, Result};
/// OBJ/MTL export entry point, options, and report types.
pub use export::{ExportOptions, ExportReport, ExportedFile, LayerStats, export_to_dir, write_layer_sidecar};
/// File abstraction.
pub use file::MapGeoFile;
/// Vertex format descriptor types.
pub use format::{AttributeFormat, AttributeName, FORMAT_SLOTS, VertexAttribute, VertexFormat, attribute_stride};
/// File header representation.
pub use header::{MAPGEO_MAGIC, MapGeoHeader};
/// Layer presence analysis and export targets.
pub use layer::{ALL_LAYERS, ExportTarget, LAYER_COUNT, LayerInfo, LayerPlan, export_targets, is_visible, layer_bit, mask_histogram};
/// Material resolution types and the property-blob scanner.
pub use material::{
	BinScanResolver, COLOR_KEYS, DEFAULT_COLOR, Material, MaterialMap, MaterialResolver, MaterialSpan, SAMPLER_KEYS, UNRESOLVED_COLOR, find_bytes,
};
/// OBJ text rendering helpers.
pub use obj::{Num, ObjectOutput, group_name, render_object, write_material};
/// Object record types.
pub use object::{CLASSIFICATIONS, IDENTITY_TRANSFORM, ObjectRecord, ObjectReserved, Submesh};
/// CRLF line writer.
pub use text::TextWriter;
/// Version gating.
pub use version::FormatVersion;
/// Vertex reconstruction and caching.
pub use vertex::{Vertex, VertexBlock, VertexCache, build_vertex_block};
