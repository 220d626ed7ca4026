//! Closed set of importable module extensions and the MIME map used when the
//! URL itself carries no usable suffix.

use url::Url;

/// Extensions the module host can treat as importable modules.
pub const EXTENSIONS: [&str; 10] = [
    "js", "mjs", "cjs", "ts", "mts", "cts", "jsx", "tsx", "json", "css",
];

/// Membership test against [`EXTENSIONS`] (case-insensitive).
pub fn is_valid_extension(candidate: &str) -> bool {
    EXTENSIONS.iter().any(|e| e.eq_ignore_ascii_case(candidate))
}

/// Splits `name` into `(stem, ext)` when it ends in a recognized extension.
pub(crate) fn split_extension(name: &str) -> Option<(&str, &str)> {
    let (stem, ext) = name.rsplit_once('.')?;
    if stem.is_empty() || !is_valid_extension(ext) {
        return None;
    }
    Some((stem, ext))
}

/// Recognized extension from the last URL path segment, lower-cased.
/// Query strings do not count: `mod.js?x=1` resolves to `js`.
pub fn resolve_extension(url: &Url) -> Option<String> {
    let last = url.path_segments()?.last()?;
    split_extension(last).map(|(_, ext)| ext.to_ascii_lowercase())
}

/// Extension for an HTTP `Content-Type` value, ignoring parameters like `charset`.
pub fn extension_from_content_type(content_type: &str) -> Option<&'static str> {
    let mime = content_type.split(';').next()?.trim().to_ascii_lowercase();
    let ext = match mime.as_str() {
        "text/javascript"
        | "application/javascript"
        | "application/x-javascript"
        | "application/ecmascript"
        | "text/ecmascript" => "js",
        "application/typescript"
        | "text/typescript"
        | "application/x-typescript"
        | "video/vnd.dlna.mpeg-tts"
        | "video/mp2t" => "ts",
        "text/jsx" => "jsx",
        "text/tsx" => "tsx",
        "application/json" | "text/json" => "json",
        "text/css" => "css",
        _ => return None,
    };
    Some(ext)
}
