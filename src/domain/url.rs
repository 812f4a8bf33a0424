// src/domain/url.rs
use crate::domain::error::{DomainError, DomainResult};
use url::{form_urlencoded, Url};

const TRACKING_PARAM_PREFIX: &str = "utm_";
const WEB_PORTS: [u16; 2] = [80, 443];

fn parse_lenient(input: &str) -> DomainResult<Url> {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        return Err(DomainError::InvalidUrl("URL cannot be empty".to_string()));
    }
    // without a scheme separator `host:port/path` would parse with the host as scheme
    let parsed = if trimmed.contains("://") {
        Url::parse(trimmed)
    } else {
        Url::parse(&format!("http://{}", trimmed))
    };
    parsed.map_err(|e| DomainError::InvalidUrl(format!("{}: {}", trimmed, e)))
}

fn bare_host(url: &Url, original: &str) -> DomainResult<String> {
    let host = url
        .host_str()
        .filter(|h| !h.is_empty())
        .ok_or_else(|| DomainError::InvalidUrl(format!("{}: missing host", original)))?;
    let host = host.to_lowercase();
    Ok(host.strip_prefix("www.").unwrap_or(&host).to_string())
}

/// Maps an arbitrary URL onto the identity string used as association key.
///
/// Scheme, `www.`, fragment, trailing slashes and `utm_*` parameters are dropped,
/// remaining query pairs are sorted.
pub fn normalize_url(input: &str) -> DomainResult<String> {
    let url = parse_lenient(input)?;
    let mut normalized = bare_host(&url, input)?;

    // the scheme is dropped, so its default ports are too
    if let Some(port) = url.port().filter(|p| !WEB_PORTS.contains(p)) {
        normalized.push(':');
        normalized.push_str(&port.to_string());
    }

    normalized.push_str(url.path().trim_end_matches('/'));

    let mut pairs: Vec<(String, String)> = url
        .query_pairs()
        .filter(|(k, _)| !k.starts_with(TRACKING_PARAM_PREFIX))
        .map(|(k, v)| (k.into_owned(), v.into_owned()))
        .collect();
    if !pairs.is_empty() {
        pairs.sort();
        let query = form_urlencoded::Serializer::new(String::new())
            .extend_pairs(pairs)
            .finish();
        normalized.push('?');
        normalized.push_str(&query);
    }

    Ok(normalized)
}

/// Host part of a URL without `www.`, used as the page's domain.
pub fn extract_domain(input: &str) -> DomainResult<String> {
    let url = parse_lenient(input)?;
    bare_host(&url, input)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn given_https_url_when_normalize_then_strips_scheme() {
        assert_eq!(normalize_url("https://example.com/x").unwrap(), "example.com/x");
    }

    #[test]
    fn given_noisy_url_when_normalize_then_returns_canonical_form() {
        let normalized = normalize_url("https://www.Example.com/x/?b=2&utm_source=feed&a=1#frag").unwrap();
        assert_eq!(normalized, "example.com/x?a=1&b=2");
    }

    #[test]
    fn given_url_without_scheme_when_normalize_then_parses_as_http() {
        assert_eq!(normalize_url("a.com/page/").unwrap(), "a.com/page");
        assert_eq!(normalize_url("http://a.com/").unwrap(), "a.com");
    }

    #[test]
    fn given_non_default_port_when_normalize_then_keeps_port() {
        assert_eq!(normalize_url("http://localhost:8080/app").unwrap(), "localhost:8080/app");
    }

    #[test]
    fn given_normalized_url_when_normalized_again_then_unchanged() {
        for input in [
            "https://a.com:8080/x",
            "http://localhost:8080/app?b=2&a=1",
            "https://www.a.com/p/?q=rust+lang#top",
            "a.com",
            "https://a.com:80/x",
        ] {
            let once = normalize_url(input).unwrap();
            assert_eq!(normalize_url(&once).unwrap(), once, "{}", input);
        }
    }

    #[test]
    fn given_web_port_when_normalize_then_dropped_for_either_scheme() {
        assert_eq!(normalize_url("https://a.com:80/x").unwrap(), "a.com/x");
        assert_eq!(normalize_url("http://a.com:443/x").unwrap(), "a.com/x");
    }

    #[test]
    fn given_equivalent_urls_when_normalize_then_identities_match() {
        let a = normalize_url("http://www.a.com/p#section").unwrap();
        let b = normalize_url("https://a.com/p/").unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn given_invalid_url_when_normalize_then_returns_invalid_url_error() {
        assert!(matches!(normalize_url(""), Err(DomainError::InvalidUrl(_))));
        assert!(matches!(normalize_url("not a url"), Err(DomainError::InvalidUrl(_))));
        assert!(matches!(normalize_url("mailto:someone"), Err(DomainError::InvalidUrl(_))));
    }

    #[test]
    fn given_url_when_extract_domain_then_returns_bare_host() {
        assert_eq!(extract_domain("https://www.news.site.org/a/b").unwrap(), "news.site.org");
    }
}
