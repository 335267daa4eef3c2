//! Export file naming

/// Filesystem limit for one path component
pub const MAX_FILE_NAME_BYTES: usize = 255;

/// Author budget before the ellipsis
pub const AUTHOR_MAX_RUNES: usize = 20;

/// Title budget before the ellipsis
pub const TITLE_MAX_RUNES: usize = 60;

/// Suffix shared by every export file
pub const EXPORT_SUFFIX: &str = ".labelplus.txt";

const ELLIPSIS: char = '…';

/// Build `【author】title-timestamp.labelplus.txt`, never longer than
/// [`MAX_FILE_NAME_BYTES`] unless author and title are already one rune each
pub fn export_file_name(author: &str, title: &str, timestamp: &str) -> String {
    let mut author = truncate_runes(&sanitize_file_name(author), AUTHOR_MAX_RUNES);
    let mut title = truncate_runes(&sanitize_file_name(title), TITLE_MAX_RUNES);

    let mut name = render(&author, &title, timestamp);
    while name.len() > MAX_FILE_NAME_BYTES {
        if title.chars().count() > 1 {
            title.pop();
        } else if author.chars().count() > 1 {
            author.pop();
        } else {
            break;
        }
        name = render(&author, &title, timestamp);
    }

    name
}

fn render(author: &str, title: &str, timestamp: &str) -> String {
    format!("【{author}】{title}-{timestamp}{EXPORT_SUFFIX}")
}

/// Replace path separators, reserved characters and control characters with `_`
pub fn sanitize_file_name(s: &str) -> String {
    s.chars()
        .map(|c| match c {
            '/' | '\\' | ':' | '*' | '?' | '"' | '<' | '>' | '|' => '_',
            c if c.is_control() => '_',
            c => c,
        })
        .collect()
}

/// Keep at most `limit` chars, appending an ellipsis when something was cut
pub fn truncate_runes(s: &str, limit: usize) -> String {
    match s.char_indices().nth(limit) {
        Some((cut, _)) => {
            let mut out = s[..cut].to_string();
            out.push(ELLIPSIS);
            out
        }
        None => s.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const TS: &str = "20250101120000";

    #[test]
    fn test_plain_name() {
        assert_eq!(
            export_file_name("Alice", "Book", TS),
            "【Alice】Book-20250101120000.labelplus.txt"
        );
    }

    #[test]
    fn test_sanitize() {
        assert_eq!(sanitize_file_name(r#"a/b\c:d*e?f"g<h>i|j"#), "a_b_c_d_e_f_g_h_i_j");
        assert_eq!(sanitize_file_name("tab\there"), "tab_here");
    }

    #[test]
    fn test_truncate_runes() {
        assert_eq!(truncate_runes("abc", 3), "abc");
        assert_eq!(truncate_runes("abcd", 3), "abc…");
        assert_eq!(truncate_runes("漫画漫画", 2), "漫画…");
    }

    #[test]
    fn test_author_and_title_budgets() {
        let name = export_file_name(&"a".repeat(30), &"t".repeat(80), TS);
        let expected = format!("【{}…】{}…-{TS}.labelplus.txt", "a".repeat(20), "t".repeat(60));
        assert_eq!(name, expected);
    }

    #[test]
    fn test_long_cjk_and_emoji_fit_limit() {
        let author = "作者😀".repeat(20);
        let title = "很长的标题🎉".repeat(40);
        let name = export_file_name(&author, &title, TS);

        assert!(name.len() <= MAX_FILE_NAME_BYTES, "{} bytes", name.len());
        assert!(std::str::from_utf8(name.as_bytes()).is_ok());
        assert!(name.starts_with("【作者😀"));
        assert!(name.ends_with("-20250101120000.labelplus.txt"));
    }

    #[test]
    fn test_all_emoji_fits_limit() {
        let author = "😀".repeat(300);
        let title = "😀".repeat(300);
        let name = export_file_name(&author, &title, TS);

        assert!(name.len() <= MAX_FILE_NAME_BYTES, "{} bytes", name.len());
        assert!(std::str::from_utf8(name.as_bytes()).is_ok());
        assert!(name.starts_with(&format!("【{}…】😀", "😀".repeat(20))));
        assert!(name.ends_with("-20250101120000.labelplus.txt"));
    }

    #[test]
    fn test_all_cjk_fits_limit() {
        let name = export_file_name(&"漫".repeat(300), &"画".repeat(300), TS);

        assert!(name.len() <= MAX_FILE_NAME_BYTES, "{} bytes", name.len());
        assert!(name.starts_with(&format!("【{}…】画", "漫".repeat(20))));
        assert!(name.ends_with(EXPORT_SUFFIX));
    }

    #[test]
    fn test_title_shrinks_before_author() {
        let author = "作".repeat(20);
        let title = "題".repeat(60);
        let name = export_file_name(&author, &title, TS);

        assert!(name.len() <= MAX_FILE_NAME_BYTES);
        // author keeps its full budget while the title can still shrink
        assert!(name.contains(&format!("【{}】", "作".repeat(20))));
    }
}
