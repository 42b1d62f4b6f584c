//! Normalization of user-entered domains.

/// Turns user input into the scheme-qualified URL that is sent for analysis.
///
/// Returns `None` for blank input. Inputs with an `http://` or `https://`
/// scheme (any case) are kept as-is after trimming; everything else, including
/// hosts such as `httpbin.org`, gets an `https://` prefix.
pub fn normalize_domain(input: &str) -> Option<String> {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        return None;
    }
    if has_http_scheme(trimmed) {
        Some(trimmed.to_string())
    } else {
        Some(format!("https://{trimmed}"))
    }
}

fn has_http_scheme(input: &str) -> bool {
    ["http://", "https://"].iter().any(|scheme| {
        input
            .get(..scheme.len())
            .is_some_and(|prefix| prefix.eq_ignore_ascii_case(scheme))
    })
}
