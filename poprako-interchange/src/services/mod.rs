//! Import and export services

pub mod exporter;
pub mod importer;

pub use exporter::ProjectExporter;
pub use importer::{merge_pages, unit_row, ProjectImporter};
