//! Parse HTTP response header lines collected during a transfer.

/// Content-Type of the final response.
///
/// With redirects followed, libcurl reports the headers of every hop; a
/// status line (`HTTP/...`) starts a new response, so earlier values are dropped.
pub(crate) fn parse_content_type(lines: &[String]) -> Option<String> {
    let mut content_type = None;

    for line in lines {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        if line
            .get(..5)
            .is_some_and(|head| head.eq_ignore_ascii_case("HTTP/"))
        {
            content_type = None;
            continue;
        }
        if let Some((name, value)) = line.split_once(':') {
            if name.trim().eq_ignore_ascii_case("content-type") {
                let value = value.trim();
                if !value.is_empty() {
                    content_type = Some(value.to_string());
                }
            }
        }
    }

    content_type
}
