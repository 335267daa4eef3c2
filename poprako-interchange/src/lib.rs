//! poprako-interchange
//!
//! Conversion between stored comic translation units and project files
//! (LabelPlus text and Poprako JSON), plus the transactional merge of an
//! imported file into existing pages.

pub mod comment;
pub mod db;
pub mod error;
pub mod format;
pub mod labelplus;
pub mod model;
pub mod poprako;
pub mod services;

pub use error::{ErrorCategory, InterchangeError, Result};
pub use format::ProjectFormat;
pub use model::{ImportOptions, ImportReport, ImportRole, ParsedPage, ParsedProject, ParsedUnit, UnitText};
pub use services::{ProjectExporter, ProjectImporter};
