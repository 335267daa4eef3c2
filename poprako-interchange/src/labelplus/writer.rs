//! LabelPlus serializer

use super::{COMMENT_MARKER, GENERATOR_LINE, GROUP_IN_BOX, GROUP_OUT_OF_BOX, HEADER_LINES};
use crate::comment::merge_comments;
use poprako_common::db::models::{ComicPage, ComicUnit};
use std::io::{self, Write};

/// Write the fixed file header, generator line and trailing blank line
pub fn write_header<W: Write>(w: &mut W) -> io::Result<()> {
    for line in HEADER_LINES {
        writeln!(w, "{line}")?;
    }
    writeln!(w, "{GENERATOR_LINE}")?;
    writeln!(w)
}

/// Write one page marker followed by its units, sorted by stored index and
/// renumbered from 1
pub fn write_page<W: Write>(w: &mut W, page: &ComicPage, units: &[ComicUnit]) -> io::Result<()> {
    let image_name = page_image_name(page.page_index, &page.oss_key);
    write!(w, "\n\n>>>>>>>>[{image_name}]<<<<<<<<\n")?;

    let mut ordered: Vec<&ComicUnit> = units.iter().collect();
    ordered.sort_by_key(|u| u.unit_index);

    for (i, unit) in ordered.into_iter().enumerate() {
        write_unit(w, unit, i + 1)?;
    }

    Ok(())
}

/// Write a whole project: header, then pages in the given order
pub fn write_project<W: Write>(w: &mut W, pages: &[(ComicPage, Vec<ComicUnit>)]) -> io::Result<()> {
    write_header(w)?;
    for (page, units) in pages {
        write_page(w, page, units)?;
    }
    Ok(())
}

fn write_unit<W: Write>(w: &mut W, unit: &ComicUnit, number: usize) -> io::Result<()> {
    let group = if unit.is_in_box {
        GROUP_IN_BOX
    } else {
        GROUP_OUT_OF_BOX
    };

    writeln!(
        w,
        "----------------[{number}]----------------[{:.4},{:.4},{group}]",
        unit.x_coordinate, unit.y_coordinate
    )?;

    if let Some(text) = select_main_text(unit) {
        writeln!(w, "{text}")?;
    }

    if let Some(comment) = merge_comments(
        unit.translator_comment.as_deref(),
        unit.proofreader_comment.as_deref(),
    ) {
        write!(w, "\n{COMMENT_MARKER}{comment}\n")?;
    }

    writeln!(w)
}

/// Main text of a stored unit: proved, then translated, skipping empty strings
pub fn select_main_text(unit: &ComicUnit) -> Option<&str> {
    [unit.proved_text.as_deref(), unit.translated_text.as_deref()]
        .into_iter()
        .flatten()
        .find(|t| !t.is_empty())
}

/// Exported image name `page_{index}{ext}`
pub fn page_image_name(page_index: i64, oss_key: &str) -> String {
    format!("page_{page_index}{}", key_extension(oss_key))
}

/// Extension of the last path element of an object key, leading dot included
fn key_extension(key: &str) -> &str {
    let name = key.rsplit('/').next().unwrap_or(key);
    match name.rfind('.') {
        Some(pos) => &name[pos..],
        None => "",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn page(index: i64, key: &str) -> ComicPage {
        ComicPage {
            id: format!("p{index}"),
            comic_id: "c".into(),
            page_index: index,
            oss_key: key.into(),
            size_bytes: 0,
            uploaded: true,
        }
    }

    fn unit(index: i64, in_box: bool) -> ComicUnit {
        ComicUnit {
            id: format!("u{index}"),
            page_id: "p1".into(),
            unit_index: index,
            x_coordinate: 0.0,
            y_coordinate: 0.0,
            is_in_box: in_box,
            translated_text: None,
            translator_id: None,
            translator_comment: None,
            proved_text: None,
            proved: false,
            proofreader_id: None,
            proofreader_comment: None,
            creator_id: None,
        }
    }

    fn render(f: impl FnOnce(&mut Vec<u8>) -> io::Result<()>) -> String {
        let mut buf = Vec::new();
        f(&mut buf).unwrap();
        String::from_utf8(buf).unwrap()
    }

    #[test]
    fn test_header_bytes() {
        assert_eq!(
            render(|w| write_header(w)),
            "1,0\n-\n框内\n框外\n-\nExported by PopRaKo Web\n\n"
        );
    }

    #[test]
    fn test_unit_layout() {
        let mut u = unit(1, true);
        u.x_coordinate = 10.0;
        u.y_coordinate = 20.5;
        u.translated_text = Some("hi".into());
        u.translator_comment = Some("t".into());
        u.proofreader_comment = Some("p".into());

        let out = render(|w| write_page(w, &page(3, "comics/x/3.png"), &[u]));
        assert_eq!(
            out,
            "\n\n>>>>>>>>[page_3.png]<<<<<<<<\n\
             ----------------[1]----------------[10.0000,20.5000,1]\n\
             hi\n\
             \n#[翻校注释]：【翻译】t\n【校对】p\n\
             \n"
        );
    }

    #[test]
    fn test_empty_unit_has_only_header_and_separator() {
        let out = render(|w| write_page(w, &page(1, "a.jpg"), &[unit(1, false)]));
        assert_eq!(
            out,
            "\n\n>>>>>>>>[page_1.jpg]<<<<<<<<\n\
             ----------------[1]----------------[0.0000,0.0000,2]\n\n"
        );
    }

    #[test]
    fn test_units_sorted_and_renumbered() {
        let mut a = unit(7, true);
        a.translated_text = Some("second".into());
        let mut b = unit(2, true);
        b.translated_text = Some("first".into());

        let out = render(|w| write_page(w, &page(1, "a.jpg"), &[a, b]));
        let first = out.find("[1]----------------[0.0000,0.0000,1]\nfirst").unwrap();
        let second = out.find("[2]----------------[0.0000,0.0000,1]\nsecond").unwrap();
        assert!(first < second);
    }

    #[test]
    fn test_select_main_text_priority() {
        let mut u = unit(1, true);
        assert_eq!(select_main_text(&u), None);

        u.translated_text = Some("draft".into());
        assert_eq!(select_main_text(&u), Some("draft"));

        u.proved_text = Some(String::new());
        assert_eq!(select_main_text(&u), Some("draft"));

        u.proved_text = Some("final".into());
        assert_eq!(select_main_text(&u), Some("final"));
    }

    #[test]
    fn test_page_image_name_extension() {
        assert_eq!(page_image_name(1, "a/b/c.jpeg"), "page_1.jpeg");
        assert_eq!(page_image_name(2, "a.b/noext"), "page_2");
        assert_eq!(page_image_name(3, "x.tar.gz"), "page_3.gz");
        assert_eq!(page_image_name(4, ""), "page_4");
    }
}
