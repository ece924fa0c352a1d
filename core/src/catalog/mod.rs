pub mod manifest;
pub mod rotator;

pub use manifest::MANIFEST_NAME;
pub use rotator::{list_entries, rotate_and_publish, CatalogReport, DEFAULT_RETENTION};
