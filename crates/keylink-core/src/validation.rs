use url::Url;

/// Returns `true` if `candidate` is a well-formed absolute `http`/`https`
/// URL with a host.
pub fn validate_url(candidate: &str) -> bool {
    normalize_url(candidate).is_some()
}

/// Validates `candidate` and returns the form to store and redirect to.
///
/// Input the parser would silently rewrite (control characters such as tab
/// or newline, surrounding whitespace) is rejected outright. Plain visible
/// ASCII is kept verbatim; anything else is replaced by the serialized URL,
/// which is always a valid `Location` header value.
pub fn normalize_url(candidate: &str) -> Option<String> {
    if candidate.chars().any(char::is_control) || candidate.trim() != candidate {
        return None;
    }

    let url = Url::parse(candidate).ok()?;
    let has_host = url.host_str().is_some_and(|host| !host.is_empty());
    if !matches!(url.scheme(), "http" | "https") || !has_host {
        return None;
    }

    if candidate.bytes().all(|b| b.is_ascii_graphic()) {
        Some(candidate.to_string())
    } else {
        Some(url.into())
    }
}
