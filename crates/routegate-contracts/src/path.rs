//! Path normalization for hosts.
//!
//! Registry lookup compares paths literally.  Hosts call `normalize_path`
//! on whatever the router reports before handing it to a gate, so that
//! `/dashboard/users/?tab=2` and `/dashboard/users` are treated alike.

/// Normalize a raw router path.
///
/// - drops everything from the first `?` or `#`
/// - collapses runs of `/`
/// - strips a trailing `/` (the root stays `/`)
/// - an empty input becomes `/`
///
/// Case is preserved; matching is case-sensitive.
pub fn normalize_path(raw: &str) -> String {
    let end = raw.find(['?', '#']).unwrap_or(raw.len());
    let trimmed = &raw[..end];

    let segments: Vec<&str> = trimmed.split('/').filter(|s| !s.is_empty()).collect();
    if segments.is_empty() {
        return "/".to_string();
    }

    let mut out = String::with_capacity(trimmed.len() + 1);
    for segment in segments {
        out.push('/');
        out.push_str(segment);
    }
    out
}

/// Return true if `path` is already in the form `normalize_path` produces.
pub fn is_normalized(path: &str) -> bool {
    normalize_path(path) == path
}
