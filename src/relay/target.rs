//! Upstream URL construction.

/// Local mount point of all relayed routes.
pub const API_PREFIX: &str = "/api";

/// Map a local request path to the backend path by dropping the `/api` mount.
///
/// Paths outside the mount are returned unchanged.
pub fn upstream_path(local_path: &str) -> &str {
    match local_path.strip_prefix(API_PREFIX) {
        Some(rest) if rest.is_empty() => "/",
        Some(rest) if rest.starts_with('/') => rest,
        _ => local_path,
    }
}

/// Build `{base}{path}{?query}`, copying path and query verbatim.
pub fn target_url(base: &str, path: &str, query: Option<&str>) -> String {
    let base = match base.strip_suffix('/') {
        Some(trimmed) if path.starts_with('/') => trimmed,
        _ => base,
    };

    match query.filter(|q| !q.is_empty()) {
        Some(query) => format!("{base}{path}?{query}"),
        None => format!("{base}{path}"),
    }
}
