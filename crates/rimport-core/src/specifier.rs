//! Classification of import specifiers.

/// Network scheme prefixes handled by the fetch stage.
const REMOTE_PREFIXES: [&str; 2] = ["http://", "https://"];

/// True for fully-qualified `http://` / `https://` specifiers.
pub fn is_remote(specifier: &str) -> bool {
    REMOTE_PREFIXES.iter().any(|p| {
        specifier
            .get(..p.len())
            .is_some_and(|head| head.eq_ignore_ascii_case(p))
    })
}

/// True for `./x`, `../x` and the bare `.` / `..` forms.
pub fn is_relative(specifier: &str) -> bool {
    specifier.starts_with("./")
        || specifier.starts_with("../")
        || specifier == "."
        || specifier == ".."
}

/// True for `/x` and protocol-relative `//host/x`. Inside a remote module these
/// resolve against the module's origin, not the local filesystem.
pub fn is_root_relative(specifier: &str) -> bool {
    specifier.starts_with('/')
}

/// True for filesystem-absolute specifiers (`/x`, `file:` URLs, Windows drive paths).
pub fn is_absolute_path(specifier: &str) -> bool {
    specifier.starts_with('/')
        || specifier.starts_with("file:")
        || std::path::Path::new(specifier).is_absolute()
}

/// Bare specifiers are neither relative nor filesystem-absolute. Remote URLs count as bare.
pub fn is_bare(specifier: &str) -> bool {
    !specifier.is_empty() && !is_relative(specifier) && !is_absolute_path(specifier)
}
