//! Parsed project types and import options
//!
//! Parsed structures are transient: a parser produces them and the merge
//! engine consumes them within the same import call.

/// Project decoded from a Poprako JSON file
#[derive(Debug, Clone, PartialEq)]
pub struct ParsedProject {
    pub author: String,
    pub title: String,
    pub pages: Vec<ParsedPage>,
}

/// One page of a project file
///
/// Pages have no stable key shared with the database; the n-th parsed page
/// is merged into the n-th stored page ordered by page index.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ParsedPage {
    /// Image name from the page marker or `image_filename`
    pub image_name: Option<String>,
    pub units: Vec<ParsedUnit>,
}

/// One positioned translation unit
#[derive(Debug, Clone, PartialEq)]
pub struct ParsedUnit {
    /// 1-based position within the page
    pub index: i64,
    pub x: f64,
    pub y: f64,
    pub is_in_box: bool,
    pub text: UnitText,
    pub translator_comment: Option<String>,
    pub proofreader_comment: Option<String>,
}

/// Text payload of a parsed unit
#[derive(Debug, Clone, PartialEq)]
pub enum UnitText {
    /// LabelPlus carries a single main text
    Plain { main_text: Option<String> },
    /// Poprako JSON carries both layers explicitly
    Layered {
        id: String,
        translated_text: Option<String>,
        proved_text: Option<String>,
        is_proved: bool,
    },
}

impl ParsedUnit {
    /// Text a reader would see: the main text, or proved before translated
    pub fn main_text(&self) -> Option<&str> {
        match &self.text {
            UnitText::Plain { main_text } => main_text.as_deref(),
            UnitText::Layered {
                translated_text,
                proved_text,
                ..
            } => proved_text.as_deref().or(translated_text.as_deref()),
        }
    }
}

/// Which layer an import writes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImportRole {
    Translator,
    Proofreader,
}

/// Options of one import call
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImportOptions {
    pub role: ImportRole,
    /// User stamped as creator and as translator or proofreader
    pub acting_user_id: String,
}

impl ImportOptions {
    pub fn new(is_proofreader: bool, acting_user_id: impl Into<String>) -> Self {
        let role = if is_proofreader {
            ImportRole::Proofreader
        } else {
            ImportRole::Translator
        };
        Self {
            role,
            acting_user_id: acting_user_id.into(),
        }
    }

    pub fn translator(acting_user_id: impl Into<String>) -> Self {
        Self::new(false, acting_user_id)
    }

    pub fn proofreader(acting_user_id: impl Into<String>) -> Self {
        Self::new(true, acting_user_id)
    }

    pub fn is_proofreader(&self) -> bool {
        self.role == ImportRole::Proofreader
    }
}

/// Outcome of a committed import
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ImportReport {
    /// Pages whose units were deleted and re-created
    pub pages_replaced: usize,
    /// Pages left untouched because they hold proofread units
    pub pages_skipped: usize,
    pub units_deleted: usize,
    pub units_written: usize,
}
