// Adapters layer: concrete implementations for external systems (file storage, exports).

pub mod csv_export;
pub mod json_repository;

pub use json_repository::{JsonFileRepository, DEFAULT_DATA_FILE};
