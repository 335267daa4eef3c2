//! Project file fixtures

/// Header as written by the exporter
pub const LABELPLUS_HEADER: &str = "1,0\n-\n框内\n框外\n-\nExported by PopRaKo Web\n\n";

/// Prefix a LabelPlus body with the standard header
pub fn labelplus(body: &str) -> String {
    format!("{LABELPLUS_HEADER}{body}")
}
