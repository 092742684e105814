use std::sync::LazyLock;

use regex::Regex;

static EXTENSION: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\.([a-z0-9]+)$").unwrap_or_else(|e| panic!("invalid extension pattern: {e}"))
});

/// Trim whitespace and any run of wrapping double or single quotes left over
/// from copy-pasting a quoted path.
pub fn normalize_ref(raw: &str) -> String {
    raw.trim().trim_matches('"').trim_matches('\'').to_string()
}

pub fn to_forward_slashes(path: &str) -> String {
    path.replace('\\', "/")
}

/// Drop the `a/` or `b/` side marker that unified diffs put in front of paths.
pub fn strip_diff_prefix(path: &str) -> String {
    let normalized = to_forward_slashes(path);
    match normalized
        .strip_prefix("a/")
        .or_else(|| normalized.strip_prefix("b/"))
    {
        Some(rest) => rest.to_string(),
        None => normalized,
    }
}

/// Last non-empty path segment, or the input itself when there is none.
pub fn base_name(path: &str) -> &str {
    path.rsplit(['/', '\\'])
        .find(|segment| !segment.is_empty())
        .unwrap_or(path)
}

/// Trailing alphanumeric extension, lower-cased.
pub fn extension(name: &str) -> Option<String> {
    EXTENSION
        .captures(name)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str().to_ascii_lowercase())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_strips_quotes_and_whitespace() {
        assert_eq!(normalize_ref("  \"zcl_demo.clas.abap\"  "), "zcl_demo.clas.abap");
        assert_eq!(normalize_ref("''src/main.rs''"), "src/main.rs");
        assert_eq!(normalize_ref("\"'quoted'\""), "quoted");
        assert_eq!(normalize_ref("   "), "");
    }

    #[test]
    fn test_strip_diff_prefix() {
        assert_eq!(strip_diff_prefix("a/src/zcl_demo.clas.abap"), "src/zcl_demo.clas.abap");
        assert_eq!(strip_diff_prefix("b\\src\\x.abap"), "src/x.abap");
        assert_eq!(strip_diff_prefix("abc/x.abap"), "abc/x.abap");
        assert_eq!(strip_diff_prefix("ZCL_DEMO"), "ZCL_DEMO");
    }

    #[test]
    fn test_base_name() {
        assert_eq!(base_name("src/objects/zcl_demo.clas.abap"), "zcl_demo.clas.abap");
        assert_eq!(base_name("src\\objects\\report.sql"), "report.sql");
        assert_eq!(base_name("/sap/bc/adt/oo/classes/zcl_x/"), "zcl_x");
        assert_eq!(base_name("ZCL_DEMO"), "ZCL_DEMO");
        assert_eq!(base_name("///"), "///");
    }

    #[test]
    fn test_extension() {
        assert_eq!(extension("zcl_demo.clas.abap").as_deref(), Some("abap"));
        assert_eq!(extension("REPORT.SQL").as_deref(), Some("sql"));
        assert_eq!(extension("Dockerfile"), None);
        assert_eq!(extension("name.with-dash"), None);
    }
}
