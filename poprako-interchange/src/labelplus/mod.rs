//! LabelPlus plain-text project format
//!
//! ```text
//! 1,0
//! -
//! 框内
//! 框外
//! -
//! <generator line>
//! <blank>
//!
//! >>>>>>>>[page_1.jpg]<<<<<<<<
//! ----------------[1]----------------[100.5000,200.5000,1]
//! <main text>
//!
//! #[翻校注释]：【翻译】<translator note>
//! 【校对】<proofreader note>
//!
//! ```
//!
//! Group `1` marks an in-box unit, `2` an out-of-box unit.

pub mod filename;
pub mod parser;
pub mod writer;

use once_cell::sync::Lazy;
use regex::Regex;

pub use filename::{export_file_name, EXPORT_SUFFIX};
pub use parser::{parse_labelplus, parse_labelplus_str};
pub use writer::{write_header, write_page, write_project};

/// Fixed leading header lines
pub const HEADER_LINES: [&str; 5] = ["1,0", "-", "框内", "框外", "-"];

/// Free-form line written after the fixed header
pub const GENERATOR_LINE: &str = "Exported by PopRaKo Web";

/// Prefix of the first comment line of a unit
pub const COMMENT_MARKER: &str = "#[翻校注释]：";

/// Group code of an in-box unit
pub const GROUP_IN_BOX: &str = "1";

/// Group code of an out-of-box unit
pub const GROUP_OUT_OF_BOX: &str = "2";

pub(crate) static PAGE_MARKER_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^>>>>>>>>\[(.+)\]<<<<<<<<$").expect("page marker regex"));

pub(crate) static UNIT_HEADER_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"^----------------\[([0-9]+)\]----------------\[(-?[0-9.]+),(-?[0-9.]+),([12])\]$",
    )
    .expect("unit header regex")
});

pub(crate) static COMMENT_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^#\[翻校注释\]：(.*)$").expect("comment regex"));
