//! Domain key extraction.
//!
//! Availability is aggregated per bare host: no scheme, no userinfo, no
//! port, no path.

/// Return the host of `url` with any `:port` suffix removed.
///
/// Hostnames are returned lowercased as normalised by URL parsing, so
/// `https://API.example.com` and `https://api.example.com:8443/x` share a
/// key. IPv6 literals keep their brackets (`[::1]`).
///
/// Input is expected to come from a validated descriptor. Anything the URL
/// parser rejects falls back to a plain textual split and never panics.
///
/// ```
/// use vigil::extract_domain;
///
/// assert_eq!(extract_domain("https://a.example.com:8443/x"), "a.example.com");
/// assert_eq!(extract_domain("https://a.example.com/y"), "a.example.com");
/// ```
pub fn extract_domain(url: &str) -> String {
    match url::Url::parse(url) {
        Ok(parsed) => match parsed.host_str() {
            Some(host) if !host.is_empty() => host.to_string(),
            _ => split_authority(url),
        },
        Err(_) => split_authority(url),
    }
}

fn split_authority(url: &str) -> String {
    let rest = url.split_once("://").map_or(url, |(_, rest)| rest);
    let authority = rest.split(['/', '?', '#']).next().unwrap_or_default();
    let host_port = authority.rsplit_once('@').map_or(authority, |(_, host)| host);

    if host_port.starts_with('[') {
        if let Some(end) = host_port.find(']') {
            return host_port[..=end].to_string();
        }
    }

    host_port
        .split(':')
        .next()
        .unwrap_or_default()
        .to_ascii_lowercase()
}
