//! URL helpers for upstream links.
//!
//! Upstream pages mix absolute and origin-relative hrefs, and some run links
//! are published with the origin glued in front of an already absolute URL.

/// Returns true for `http://` and `https://` URLs.
pub fn is_absolute(url: &str) -> bool {
    url.starts_with("http://") || url.starts_with("https://")
}

/// Join an origin-relative href onto the site origin.
pub fn absolutize(origin: &str, href: &str) -> String {
    let href = href.trim();
    if is_absolute(href) {
        return href.to_string();
    }
    let origin = origin.trim_end_matches('/');
    if href.starts_with('/') {
        format!("{origin}{href}")
    } else {
        format!("{origin}/{href}")
    }
}

/// Path component of a URL, without query or fragment.
pub fn path_of(url: &str) -> &str {
    let rest = match url.split_once("://") {
        Some((_, rest)) => rest.find('/').map_or("", |i| &rest[i..]),
        None => url,
    };
    let end = rest.find(|c: char| c == '?' || c == '#').unwrap_or(rest.len());
    &rest[..end]
}

/// Path after the leading language segment.
///
/// `https://host/es/simulation/density` → `simulation/density`. This is the
/// same for every translation of one simulation.
pub fn path_after_language(url: &str) -> &str {
    let path = path_of(url).trim_start_matches('/');
    match path.split_once('/') {
        Some((_, rest)) => rest,
        None => path,
    }
}

/// First path segment, which upstream uses for the language code.
pub fn first_segment(url: &str) -> &str {
    let path = path_of(url).trim_start_matches('/');
    path.split('/').next().unwrap_or("")
}

/// Make a run URL absolute and repair the known upstream defect where the
/// origin is prefixed to an already absolute HTTPS URL.
pub fn normalize_run_url(origin: &str, url: &str) -> String {
    let url = url.trim();
    if url.is_empty() {
        return String::new();
    }

    let absolute = absolutize(origin, url);
    let host = origin
        .trim_end_matches('/')
        .split_once("://")
        .map_or(origin, |(_, host)| host);

    for scheme in ["http://", "https://"] {
        let prefix = format!("{scheme}{host}");
        if let Some(rest) = absolute.strip_prefix(&prefix) {
            if rest.starts_with("https://") {
                return rest.to_string();
            }
        }
    }

    absolute
}
