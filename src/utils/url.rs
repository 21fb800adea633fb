//! Joining configured base URLs with endpoint paths.

/// Strip trailing slashes from a base URL.
///
/// ```
/// use geoai::utils::url::normalize_base_url;
///
/// assert_eq!(normalize_base_url("http://localhost:8000/"), "http://localhost:8000");
/// assert_eq!(normalize_base_url("http://localhost:8000"), "http://localhost:8000");
/// ```
pub fn normalize_base_url(base_url: &str) -> String {
    base_url.trim().trim_end_matches('/').to_string()
}

/// Join a base URL and an endpoint path with exactly one slash.
///
/// ```
/// use geoai::utils::url::construct_api_url;
///
/// assert_eq!(
///     construct_api_url("http://localhost:8000/", "/predict"),
///     "http://localhost:8000/predict"
/// );
/// ```
pub fn construct_api_url(base_url: &str, endpoint: &str) -> String {
    let normalized_base = normalize_base_url(base_url);
    let endpoint = endpoint.trim_start_matches('/');
    format!("{normalized_base}/{endpoint}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalize_strips_every_trailing_slash() {
        assert_eq!(
            normalize_base_url("http://localhost:8000///"),
            "http://localhost:8000"
        );
        assert_eq!(normalize_base_url(" http://geo.example/api/ "), "http://geo.example/api");
        assert_eq!(normalize_base_url("///"), "");
    }

    #[test]
    fn construct_keeps_base_path_segments() {
        assert_eq!(
            construct_api_url("http://geo.example/backend", "predict"),
            "http://geo.example/backend/predict"
        );
        assert_eq!(
            construct_api_url("http://geo.example/backend//", "///predict"),
            "http://geo.example/backend/predict"
        );
    }
}
