//! Path exclusion and session cookie lookup for request guards

/// Whether `path` needs authentication given the excluded path list.
///
/// Comparison ignores a trailing slash. An excluded entry ending in `*`
/// matches every path starting with the part before the star.
pub fn require_auth<S: AsRef<str>>(path: Option<&str>, excluded_paths: &[S]) -> bool {
    let Some(path) = path else {
        return true;
    };
    if path.is_empty() || excluded_paths.is_empty() {
        return true;
    }

    let path = with_trailing_slash(path);
    !excluded_paths.iter().map(AsRef::as_ref).any(|excluded| {
        match excluded.strip_suffix('*') {
            Some(prefix) => path.starts_with(prefix),
            None => with_trailing_slash(excluded) == path,
        }
    })
}

fn with_trailing_slash(path: &str) -> String {
    if path.ends_with('/') {
        path.to_string()
    } else {
        format!("{}/", path)
    }
}

/// Value of cookie `name` in a `Cookie` header.
pub fn session_cookie<'a>(cookie_header: Option<&'a str>, name: &str) -> Option<&'a str> {
    cookie_header?
        .split(';')
        .filter_map(|pair| pair.trim().split_once('='))
        .find(|(key, _)| *key == name)
        .map(|(_, value)| value)
}
