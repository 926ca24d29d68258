pub mod loader;
pub mod model;
pub mod tables;

pub use loader::{load_static_data, parse_static_data, LoadError, DEFAULT_STATIC_DATA_PATH};
pub use model::StaticData;
pub use tables::LookupError;
