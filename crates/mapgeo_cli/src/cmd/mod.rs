/// OBJ/MTL conversion command.
pub mod convert;
/// File-level information command.
pub mod info;
/// Layer presence command.
pub mod layers;
/// Material resolution command.
pub mod materials;
mod util;
