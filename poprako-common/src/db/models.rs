//! Database models

#[derive(Debug, Clone, PartialEq, sqlx::FromRow)]
pub struct Comic {
    pub id: String,
    pub author: String,
    pub title: String,
}

#[derive(Debug, Clone, PartialEq, sqlx::FromRow)]
pub struct ComicPage {
    pub id: String,
    pub comic_id: String,
    pub page_index: i64,
    /// Object-storage key of the page image; its extension names the exported page
    pub oss_key: String,
    pub size_bytes: i64,
    pub uploaded: bool,
}

/// Stored translation unit
#[derive(Debug, Clone, PartialEq, sqlx::FromRow)]
pub struct ComicUnit {
    pub id: String,
    pub page_id: String,
    pub unit_index: i64,
    pub x_coordinate: f64,
    pub y_coordinate: f64,
    pub is_in_box: bool,

    pub translated_text: Option<String>,
    pub translator_id: Option<String>,
    pub translator_comment: Option<String>,

    pub proved_text: Option<String>,
    pub proved: bool,
    pub proofreader_id: Option<String>,
    pub proofreader_comment: Option<String>,

    pub creator_id: Option<String>,
}

/// Unit row about to be inserted
#[derive(Debug, Clone, PartialEq)]
pub struct NewComicUnit {
    pub id: String,
    pub page_id: String,
    pub unit_index: i64,
    pub x_coordinate: f64,
    pub y_coordinate: f64,
    pub is_in_box: bool,

    pub translated_text: Option<String>,
    pub translator_id: Option<String>,
    pub translator_comment: Option<String>,

    pub proved_text: Option<String>,
    pub proved: bool,
    pub proofreader_id: Option<String>,
    pub proofreader_comment: Option<String>,

    pub creator_id: Option<String>,
}
