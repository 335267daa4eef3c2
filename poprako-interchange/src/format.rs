//! Project file formats and upload dispatch

use crate::error::{InterchangeError, Result};
use crate::labelplus::parse_labelplus_str;
use crate::model::ParsedPage;
use crate::poprako::parse_poprako;
use std::fmt;
use std::path::Path;
use std::str::FromStr;

/// Import path of a project file
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProjectFormat {
    /// LabelPlus plain text
    LabelPlus,
    /// Poprako JSON
    Poprako,
}

impl ProjectFormat {
    /// Pick the import path from an uploaded file name
    ///
    /// Only `.txt` (any case) is routed by extension; JSON projects must be
    /// selected explicitly.
    pub fn from_file_name(name: &str) -> Result<Self> {
        let ext = Path::new(name)
            .extension()
            .and_then(|e| e.to_str())
            .unwrap_or_default();

        if ext.eq_ignore_ascii_case("txt") {
            Ok(ProjectFormat::LabelPlus)
        } else {
            Err(InterchangeError::UnsupportedExtension(ext.to_string()))
        }
    }

    /// Parse a whole file into ordered pages
    pub fn parse(self, bytes: &[u8]) -> Result<Vec<ParsedPage>> {
        match self {
            ProjectFormat::LabelPlus => {
                let text = std::str::from_utf8(bytes).map_err(|e| {
                    InterchangeError::Io(std::io::Error::new(std::io::ErrorKind::InvalidData, e))
                })?;
                parse_labelplus_str(text)
            }
            ProjectFormat::Poprako => Ok(parse_poprako(bytes)?.pages),
        }
    }
}

impl FromStr for ProjectFormat {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "labelplus" | "txt" => Ok(ProjectFormat::LabelPlus),
            "poprako" | "json" => Ok(ProjectFormat::Poprako),
            other => Err(format!("unknown project format '{other}' (expected labelplus or poprako)")),
        }
    }
}

impl fmt::Display for ProjectFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ProjectFormat::LabelPlus => write!(f, "labelplus"),
            ProjectFormat::Poprako => write!(f, "poprako"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_txt_dispatch_is_case_insensitive() {
        assert_eq!(
            ProjectFormat::from_file_name("proj.labelplus.TXT").unwrap(),
            ProjectFormat::LabelPlus
        );
        assert_eq!(ProjectFormat::from_file_name("a.txt").unwrap(), ProjectFormat::LabelPlus);
    }

    #[test]
    fn test_other_extensions_rejected() {
        for name in ["a.json", "a.poprako.json", "a.zip", "noext"] {
            let err = ProjectFormat::from_file_name(name).unwrap_err();
            assert!(matches!(err, InterchangeError::UnsupportedExtension(_)), "{name}");
        }
    }

    #[test]
    fn test_from_str() {
        assert_eq!("LabelPlus".parse::<ProjectFormat>().unwrap(), ProjectFormat::LabelPlus);
        assert_eq!("poprako".parse::<ProjectFormat>().unwrap(), ProjectFormat::Poprako);
        assert!("xml".parse::<ProjectFormat>().is_err());
        assert_eq!(ProjectFormat::Poprako.to_string(), "poprako");
    }

    #[test]
    fn test_invalid_utf8_labelplus() {
        let err = ProjectFormat::LabelPlus.parse(&[0xff, 0xfe, 0x00]).unwrap_err();
        assert!(matches!(err, InterchangeError::Io(_)));
    }
}
