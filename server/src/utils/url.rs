//! Site URL helpers

/// Default display name for a newly discovered site.
///
/// Strips a leading `http://` or `https://` and a single trailing `/`.
/// Property URLs such as `sc-domain:example.com` pass through untouched.
pub fn default_display_name(site_url: &str) -> String {
    let without_scheme = site_url
        .strip_prefix("https://")
        .or_else(|| site_url.strip_prefix("http://"))
        .unwrap_or(site_url);
    without_scheme
        .strip_suffix('/')
        .unwrap_or(without_scheme)
        .to_string()
}
