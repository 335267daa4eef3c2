//! Translator/proofreader comment splitting
//!
//! A unit's comment block interleaves notes from both roles, each segment
//! introduced by a role prefix. Unprefixed lines belong to the segment above
//! them, or to the translator when no prefix has been seen yet.

/// Prefix opening a translator note
pub const TRANSLATOR_PREFIX: &str = "【翻译】";

/// Prefix opening a proofreader note
pub const PROOFREADER_PREFIX: &str = "【校对】";

#[derive(Clone, Copy)]
enum Target {
    Translator,
    Proofreader,
}

/// Split a comment block into `(translator_comment, proofreader_comment)`
pub fn split_comments(text: &str) -> (Option<String>, Option<String>) {
    let mut translator: Vec<&str> = Vec::new();
    let mut proofreader: Vec<&str> = Vec::new();
    let mut current = Target::Translator;

    for line in text.lines() {
        let content = if let Some(rest) = line.strip_prefix(TRANSLATOR_PREFIX) {
            current = Target::Translator;
            rest
        } else if let Some(rest) = line.strip_prefix(PROOFREADER_PREFIX) {
            current = Target::Proofreader;
            rest
        } else {
            line
        };

        match current {
            Target::Translator => translator.push(content),
            Target::Proofreader => proofreader.push(content),
        }
    }

    (join_non_empty(&translator), join_non_empty(&proofreader))
}

fn join_non_empty(lines: &[&str]) -> Option<String> {
    let joined = lines.join("\n");
    if joined.is_empty() {
        None
    } else {
        Some(joined)
    }
}

/// Merge both roles' notes into one prefixed block, the inverse of [`split_comments`]
pub fn merge_comments(
    translator_comment: Option<&str>,
    proofreader_comment: Option<&str>,
) -> Option<String> {
    let parts: Vec<String> = [
        (TRANSLATOR_PREFIX, translator_comment),
        (PROOFREADER_PREFIX, proofreader_comment),
    ]
    .into_iter()
    .filter_map(|(prefix, comment)| match comment {
        Some(c) if !c.is_empty() => Some(format!("{prefix}{c}")),
        _ => None,
    })
    .collect();

    if parts.is_empty() {
        None
    } else {
        Some(parts.join("\n"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_split_both_roles() {
        let (t, p) = split_comments("【翻译】foo\n【校对】bar");
        assert_eq!(t.as_deref(), Some("foo"));
        assert_eq!(p.as_deref(), Some("bar"));
    }

    #[test]
    fn test_unprefixed_goes_to_translator() {
        let (t, p) = split_comments("plain note");
        assert_eq!(t.as_deref(), Some("plain note"));
        assert_eq!(p, None);
    }

    #[test]
    fn test_continuation_lines_follow_open_segment() {
        let (t, p) = split_comments("lead\n【校对】first\nsecond\n【翻译】again\nmore");
        assert_eq!(t.as_deref(), Some("lead\nagain\nmore"));
        assert_eq!(p.as_deref(), Some("first\nsecond"));
    }

    #[test]
    fn test_empty_input_yields_nothing() {
        assert_eq!(split_comments(""), (None, None));
        assert_eq!(split_comments("【校对】"), (None, None));
    }

    #[test]
    fn test_merge_skips_missing_sides() {
        assert_eq!(merge_comments(None, None), None);
        assert_eq!(merge_comments(Some(""), None), None);
        assert_eq!(merge_comments(Some("a"), None).as_deref(), Some("【翻译】a"));
        assert_eq!(
            merge_comments(Some("a"), Some("b")).as_deref(),
            Some("【翻译】a\n【校对】b")
        );
    }

    #[test]
    fn test_merge_then_split_is_identity() {
        let cases = [
            (Some("t1\nt2"), Some("p1")),
            (None, Some("only proofreader")),
            (Some("only translator"), None),
        ];
        for (t, p) in cases {
            let merged = merge_comments(t, p).unwrap();
            let (t2, p2) = split_comments(&merged);
            assert_eq!(t2.as_deref(), t);
            assert_eq!(p2.as_deref(), p);
        }
    }
}
