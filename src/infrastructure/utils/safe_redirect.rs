use url::Url;

/// Returns `next` when it points inside this site, otherwise `/`.
///
/// Only absolute paths are honored; anything carrying a scheme or host
/// (including the protocol-relative `//host` form) is discarded.
pub fn safe_next(next: Option<&str>) -> String {
    let Some(candidate) = next.map(str::trim).filter(|n| !n.is_empty()) else {
        return "/".to_string();
    };

    if !candidate.starts_with('/') || candidate.starts_with("//") || candidate.contains('\\') {
        return "/".to_string();
    }

    // Resolve against a dummy origin; a path that escapes it is not local.
    let Ok(base) = Url::parse("http://localhost/") else {
        return "/".to_string();
    };
    match base.join(candidate) {
        Ok(resolved) if resolved.origin() == base.origin() => candidate.to_string(),
        _ => "/".to_string(),
    }
}
