//! LabelPlus line scanner
//!
//! Single pass over the input. The scanner is an explicit state machine:
//! header validation first, then free lines until the first page marker,
//! then page bodies with at most one open unit at a time.

use super::{COMMENT_RE, GROUP_IN_BOX, HEADER_LINES, PAGE_MARKER_RE, UNIT_HEADER_RE};
use crate::comment::split_comments;
use crate::error::{InterchangeError, Result};
use crate::model::{ParsedPage, ParsedUnit, UnitText};
use std::io::BufRead;

/// Header length: fixed lines, generator line, blank line
const HEADER_LEN: usize = HEADER_LINES.len() + 2;

/// Parse a LabelPlus project from a buffered reader
pub fn parse_labelplus<R: BufRead>(reader: R) -> Result<Vec<ParsedPage>> {
    let mut pages = Vec::new();
    let mut state = ScanState::Header { consumed: 0 };

    for (idx, line) in reader.lines().enumerate() {
        let line_no = idx + 1;
        let line = line?;
        let line = if line_no == 1 {
            line.strip_prefix('\u{feff}').map(str::to_owned).unwrap_or(line)
        } else {
            line
        };

        state = state.step(line_no, &line, &mut pages)?;
    }

    state.finish(&mut pages)?;

    tracing::debug!(
        pages = pages.len(),
        units = pages.iter().map(|p| p.units.len()).sum::<usize>(),
        "Parsed LabelPlus project"
    );

    Ok(pages)
}

/// Parse a LabelPlus project held in memory
pub fn parse_labelplus_str(text: &str) -> Result<Vec<ParsedPage>> {
    parse_labelplus(text.as_bytes())
}

enum ScanState {
    /// Validating the header; `consumed` header lines accepted so far
    Header { consumed: usize },
    /// Header done, no page marker seen yet
    BeforeFirstPage,
    InPage {
        page: ParsedPage,
        unit: Option<UnitBuilder>,
    },
}

impl ScanState {
    fn step(self, line_no: usize, line: &str, pages: &mut Vec<ParsedPage>) -> Result<Self> {
        match self {
            ScanState::Header { consumed } => check_header_line(consumed, line_no, line),
            ScanState::BeforeFirstPage => match classify(line_no, line)? {
                Line::PageMarker(name) => Ok(ScanState::InPage {
                    page: new_page(name),
                    unit: None,
                }),
                Line::UnitHeader(_) => Err(InterchangeError::Syntax {
                    line: line_no,
                    message: "unit header before any page marker".to_string(),
                }),
                Line::Comment(_) | Line::Text(_) | Line::Blank => Ok(ScanState::BeforeFirstPage),
            },
            ScanState::InPage { mut page, unit } => match classify(line_no, line)? {
                Line::PageMarker(name) => {
                    if let Some(open) = unit {
                        page.units.push(open.finish());
                    }
                    pages.push(page);
                    Ok(ScanState::InPage {
                        page: new_page(name),
                        unit: None,
                    })
                }
                Line::UnitHeader(header) => {
                    if let Some(open) = unit {
                        page.units.push(open.finish());
                    }
                    Ok(ScanState::InPage {
                        page,
                        unit: Some(UnitBuilder::new(header)),
                    })
                }
                Line::Comment(rest) => Ok(ScanState::InPage {
                    page,
                    unit: unit.map(|u| u.with_comment_line(rest)),
                }),
                Line::Text(text) => Ok(ScanState::InPage {
                    page,
                    unit: unit.map(|u| u.with_text_line(text)),
                }),
                Line::Blank => Ok(ScanState::InPage { page, unit }),
            },
        }
    }

    fn finish(self, pages: &mut Vec<ParsedPage>) -> Result<()> {
        match self {
            ScanState::Header { consumed } => Err(InterchangeError::TruncatedHeader {
                line: consumed + 1,
            }),
            ScanState::BeforeFirstPage => Ok(()),
            ScanState::InPage { mut page, unit } => {
                if let Some(open) = unit {
                    page.units.push(open.finish());
                }
                pages.push(page);
                Ok(())
            }
        }
    }
}

fn check_header_line(consumed: usize, line_no: usize, line: &str) -> Result<ScanState> {
    let expected = match consumed {
        n if n < HEADER_LINES.len() => Some(HEADER_LINES[n]),
        // free-form generator line
        n if n == HEADER_LINES.len() => None,
        _ => Some(""),
    };

    if let Some(expected) = expected {
        if line != expected {
            return Err(InterchangeError::Header {
                line: line_no,
                expected: expected.to_string(),
                found: line.to_string(),
            });
        }
    }

    if consumed + 1 == HEADER_LEN {
        Ok(ScanState::BeforeFirstPage)
    } else {
        Ok(ScanState::Header {
            consumed: consumed + 1,
        })
    }
}

fn new_page(image_name: &str) -> ParsedPage {
    ParsedPage {
        image_name: Some(image_name.to_string()),
        units: Vec::new(),
    }
}

struct UnitHeader {
    index: i64,
    x: f64,
    y: f64,
    is_in_box: bool,
}

enum Line<'a> {
    PageMarker(&'a str),
    UnitHeader(UnitHeader),
    Comment(&'a str),
    Text(&'a str),
    Blank,
}

/// Classify one body line; markers are checked in priority order
fn classify(line_no: usize, line: &str) -> Result<Line<'_>> {
    if let Some(caps) = PAGE_MARKER_RE.captures(line) {
        let name = caps.get(1).map(|m| m.as_str()).unwrap_or_default();
        return Ok(Line::PageMarker(name));
    }

    if let Some(caps) = UNIT_HEADER_RE.captures(line) {
        return Ok(Line::UnitHeader(UnitHeader {
            index: parse_token(line_no, &caps[1], "unit index")?,
            x: parse_token(line_no, &caps[2], "X coordinate")?,
            y: parse_token(line_no, &caps[3], "Y coordinate")?,
            is_in_box: &caps[4] == GROUP_IN_BOX,
        }));
    }

    if let Some(caps) = COMMENT_RE.captures(line) {
        let rest = caps.get(1).map(|m| m.as_str()).unwrap_or_default();
        return Ok(Line::Comment(rest));
    }

    if line.is_empty() {
        Ok(Line::Blank)
    } else {
        Ok(Line::Text(line))
    }
}

fn parse_token<T: std::str::FromStr>(line_no: usize, token: &str, what: &str) -> Result<T>
where
    T::Err: std::fmt::Display,
{
    token.parse().map_err(|e| InterchangeError::Syntax {
        line: line_no,
        message: format!("failed to parse {what} '{token}': {e}"),
    })
}

/// Unit being accumulated; once a comment line is seen, text goes to the comment
struct UnitBuilder {
    header: UnitHeader,
    main: Vec<String>,
    comment: Option<Vec<String>>,
}

impl UnitBuilder {
    fn new(header: UnitHeader) -> Self {
        Self {
            header,
            main: Vec::new(),
            comment: None,
        }
    }

    fn with_comment_line(mut self, rest: &str) -> Self {
        self.comment
            .get_or_insert_with(Vec::new)
            .push(rest.to_string());
        self
    }

    fn with_text_line(mut self, text: &str) -> Self {
        match self.comment.as_mut() {
            Some(comment) => comment.push(text.to_string()),
            None => self.main.push(text.to_string()),
        }
        self
    }

    fn finish(self) -> ParsedUnit {
        let main_text = if self.main.is_empty() {
            None
        } else {
            Some(self.main.join("\n"))
        };

        let (translator_comment, proofreader_comment) = match self.comment {
            Some(lines) => split_comments(&lines.join("\n")),
            None => (None, None),
        };

        ParsedUnit {
            index: self.header.index,
            x: self.header.x,
            y: self.header.y,
            is_in_box: self.header.is_in_box,
            text: UnitText::Plain { main_text },
            translator_comment,
            proofreader_comment,
        }
    }
}
