//! Poprako JSON project format
//!
//! ```json
//! {
//!   "author": "...",
//!   "title": "...",
//!   "pages": [
//!     {
//!       "image_filename": "001.jpg",
//!       "units": [
//!         { "id": "...", "x": 0.1, "y": 0.2, "index_in_page": 1, "is_inbox": true,
//!           "translated_text": "...", "prooved_text": "...", "is_prooved": false,
//!           "comment": "【翻译】...", "is_local": false }
//!       ]
//!     }
//!   ]
//! }
//! ```
//!
//! Decoding is strict about the top-level fields; content rules are checked
//! by [`validate_project`] before anything is handed to the merge engine.

use crate::comment::split_comments;
use crate::error::{InterchangeError, Result};
use crate::model::{ParsedPage, ParsedProject, ParsedUnit, UnitText};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::HashSet;

/// Project document as it appears on the wire
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PoprakoProject {
    pub author: String,
    pub title: String,
    pub pages: Vec<PoprakoPage>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PoprakoPage {
    #[serde(default)]
    pub image_filename: String,
    #[serde(default)]
    pub units: Vec<PoprakoUnit>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PoprakoUnit {
    #[serde(default)]
    pub id: String,
    pub x: f64,
    pub y: f64,
    #[serde(default)]
    pub index_in_page: i64,
    #[serde(default)]
    pub is_inbox: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub translated_text: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub prooved_text: Option<String>,
    #[serde(default)]
    pub is_prooved: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub comment: Option<String>,
    #[serde(default)]
    pub is_local: bool,
}

/// Decode, validate and normalize a Poprako JSON project
pub fn parse_poprako(bytes: &[u8]) -> Result<ParsedProject> {
    let project = decode_project(bytes)?;
    let parsed = normalize_project(project)?;

    tracing::debug!(
        author = %parsed.author,
        title = %parsed.title,
        pages = parsed.pages.len(),
        "Parsed Poprako project"
    );

    Ok(parsed)
}

/// Decode the document, checking presence and shape of the top-level fields
pub fn decode_project(bytes: &[u8]) -> Result<PoprakoProject> {
    let mut raw: Map<String, Value> = serde_json::from_slice(bytes)?;

    let author = raw.remove("author").ok_or(InterchangeError::MissingField("author"))?;
    let title = raw.remove("title").ok_or(InterchangeError::MissingField("title"))?;
    let pages = raw.remove("pages").ok_or(InterchangeError::MissingField("pages"))?;

    if pages.is_null() {
        return Err(InterchangeError::NullField("pages"));
    }

    let pages: Vec<PoprakoPage> = decode_field("pages", pages)?;
    // null author/title count as blank and fail validation
    let author: Option<String> = decode_field("author", author)?;
    let title: Option<String> = decode_field("title", title)?;

    Ok(PoprakoProject {
        author: author.unwrap_or_default(),
        title: title.unwrap_or_default(),
        pages,
    })
}

fn decode_field<T: DeserializeOwned>(field: &'static str, value: Value) -> Result<T> {
    serde_json::from_value(value).map_err(|source| InterchangeError::InvalidField { field, source })
}

/// Check every content rule; nothing is normalized here
pub fn validate_project(project: &PoprakoProject) -> Result<()> {
    if project.author.trim().is_empty() {
        return Err(InterchangeError::Validation("author must not be empty".into()));
    }
    if project.title.trim().is_empty() {
        return Err(InterchangeError::Validation("title must not be empty".into()));
    }

    for (i, page) in project.pages.iter().enumerate() {
        let page_no = i + 1;
        if page.image_filename.trim().is_empty() {
            return Err(InterchangeError::Validation(format!(
                "page {page_no}: image_filename must not be empty"
            )));
        }

        let mut seen_index = HashSet::with_capacity(page.units.len());
        let mut seen_id = HashSet::with_capacity(page.units.len());

        for (j, unit) in page.units.iter().enumerate() {
            let unit_no = j + 1;
            if unit.id.trim().is_empty() {
                return Err(InterchangeError::Validation(format!(
                    "page {page_no} unit {unit_no}: id must not be empty"
                )));
            }
            if unit.index_in_page < 1 {
                return Err(InterchangeError::Validation(format!(
                    "page {page_no} unit {unit_no}: index_in_page must be >= 1"
                )));
            }
            if !unit.x.is_finite() || !unit.y.is_finite() {
                return Err(InterchangeError::Validation(format!(
                    "page {page_no} unit {unit_no}: x/y must be finite numbers"
                )));
            }
            if !seen_index.insert(unit.index_in_page) {
                return Err(InterchangeError::Validation(format!(
                    "page {page_no}: duplicated index_in_page {}",
                    unit.index_in_page
                )));
            }
            if !seen_id.insert((unit.id.as_str(), unit.is_local)) {
                return Err(InterchangeError::Validation(format!(
                    "page {page_no}: duplicated (id,is_local) pair for id={}",
                    unit.id
                )));
            }
        }
    }

    Ok(())
}

/// Validate, then convert into parsed pages with units sorted by index
pub fn normalize_project(project: PoprakoProject) -> Result<ParsedProject> {
    validate_project(&project)?;

    let pages = project
        .pages
        .into_iter()
        .map(|page| {
            let mut units: Vec<ParsedUnit> = page.units.into_iter().map(normalize_unit).collect();
            units.sort_by_key(|u| u.index);
            ParsedPage {
                image_name: Some(page.image_filename),
                units,
            }
        })
        .collect();

    Ok(ParsedProject {
        author: project.author,
        title: project.title,
        pages,
    })
}

fn normalize_unit(unit: PoprakoUnit) -> ParsedUnit {
    let (translator_comment, proofreader_comment) = match normalize_optional_text(unit.comment) {
        Some(comment) => split_comments(&comment),
        None => (None, None),
    };

    ParsedUnit {
        index: unit.index_in_page,
        x: unit.x,
        y: unit.y,
        is_in_box: unit.is_inbox,
        text: UnitText::Layered {
            id: unit.id,
            translated_text: normalize_optional_text(unit.translated_text),
            proved_text: normalize_optional_text(unit.prooved_text),
            is_proved: unit.is_prooved,
        },
        translator_comment,
        proofreader_comment,
    }
}

/// Absent or whitespace-only text becomes `None`
fn normalize_optional_text(text: Option<String>) -> Option<String> {
    text.filter(|t| !t.trim().is_empty())
}
