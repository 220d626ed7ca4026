//! Static import discovery by pattern matching.
//!
//! Covers `import ... from "x"`, `import "x"`, `export ... from "x"` and
//! dynamic `import("x")` with a literal argument. Imports inside strings or
//! comments are not distinguished from real ones.

use std::ops::Range;
use std::sync::OnceLock;

use regex::Regex;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImportSite {
    pub specifier: String,
    /// Byte range of the specifier inside the quotes.
    pub span: Range<usize>,
}

fn import_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(
            r#"(?m)(?:^|[^\w$.])(?:(?:import|export)(?:\s*[\w$*{}\s,]*?\s*from)?\s*|import\s*\(\s*)(?:"([^"\n]+)"|'([^'\n]+)')"#,
        )
        .expect("import pattern is valid")
    })
}

/// All import sites in `source`, in source order.
pub fn scan_imports(source: &str) -> Vec<ImportSite> {
    import_pattern()
        .captures_iter(source)
        .filter_map(|caps| caps.get(1).or_else(|| caps.get(2)))
        .map(|m| ImportSite {
            specifier: m.as_str().to_string(),
            span: m.range(),
        })
        .collect()
}

/// Replaces every import specifier for which `replace` returns a value.
pub fn rewrite_imports<F>(source: &str, mut replace: F) -> String
where
    F: FnMut(&str) -> Option<String>,
{
    let mut out = String::with_capacity(source.len());
    let mut last = 0;
    for site in scan_imports(source) {
        if let Some(new) = replace(&site.specifier) {
            out.push_str(&source[last..site.span.start]);
            out.push_str(&new);
            last = site.span.end;
        }
    }
    out.push_str(&source[last..]);
    out
}
