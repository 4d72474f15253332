//! Origin guard for cookie-transported credentials
//!
//! State-changing requests that authenticate via the session cookie must
//! present an acceptable `Origin` (or `Referer`) before their token is
//! even validated. Bearer requests are exempt: attaching the header takes
//! an explicit client-side action that a passive cross-site request
//! cannot forge.

use axum::http::header::{ORIGIN, REFERER};
use axum::http::{HeaderMap, Method};
use url::Url;

/// First comma-separated value of `X-Forwarded-Proto`, if any.
const FORWARDED_PROTO: &str = "x-forwarded-proto";

/// Decide whether a cookie-authenticated request may proceed.
///
/// `allowed_origins` entries are exact `scheme://host[:port]` strings,
/// the literal `*`, or subdomain wildcards `*.suffix`. An empty list
/// means same-origin only, not allow-everything.
pub(crate) fn enforce_cookie_origin(
    method: &Method,
    headers: &HeaderMap,
    request_tls: bool,
    host: &str,
    allowed_origins: &[String],
    require_origin: bool,
) -> bool {
    if !is_state_changing(method) {
        return true;
    }

    let Some(origin) = claimed_origin(headers) else {
        // No usable Origin/Referer signal at all.
        return !require_origin;
    };

    if allowed_origins.is_empty() {
        let own = server_origin(headers, request_tls, host);
        return normalize_origin(&origin) == normalize_origin(&own);
    }

    allowed_origins
        .iter()
        .any(|allowed| match_allowed_origin(&origin, allowed))
}

/// Safe methods must not mutate state, so they skip the check entirely.
fn is_state_changing(method: &Method) -> bool {
    !(method == Method::GET
        || method == Method::HEAD
        || method == Method::OPTIONS
        || method == Method::TRACE)
}

/// The origin the client claims: `Origin` header first, else the
/// `scheme://host` of a syntactically valid `Referer`.
fn claimed_origin(headers: &HeaderMap) -> Option<String> {
    if let Some(origin) = header_str(headers, ORIGIN.as_str()) {
        if !origin.is_empty() {
            return Some(origin.to_string());
        }
    }

    let referer = header_str(headers, REFERER.as_str())?;
    if referer.is_empty() {
        return None;
    }
    let parsed = Url::parse(referer).ok()?;
    parsed.host_str()?;
    Some(format!("{}://{}", parsed.scheme(), authority(&parsed)))
}

/// The server's own origin: scheme from the TLS state or a trusted
/// `X-Forwarded-Proto`, concatenated with the request host.
pub(crate) fn server_origin(headers: &HeaderMap, request_tls: bool, host: &str) -> String {
    let mut scheme = if request_tls { "https" } else { "http" };
    if let Some(forwarded) = header_str(headers, FORWARDED_PROTO) {
        if let Some(first) = forwarded.split(',').next() {
            let candidate = first.trim();
            if !candidate.is_empty() {
                scheme = candidate;
            }
        }
    }
    format!("{}://{}", scheme, host)
}

fn match_allowed_origin(origin: &str, allowed: &str) -> bool {
    let allowed = allowed.trim();
    if allowed.is_empty() {
        return false;
    }
    if allowed == "*" {
        return true;
    }

    let origin = normalize_origin(origin);
    let allowed = normalize_origin(allowed);

    if !allowed.contains('*') {
        return origin == allowed;
    }

    // Wildcard pattern: optional scheme, then `*.suffix` host match.
    let (pattern_scheme, pattern_host) = match allowed.split_once("://") {
        Some((scheme, host)) => (Some(scheme), host),
        None => (None, allowed.as_str()),
    };

    let Ok(origin_url) = Url::parse(&origin) else {
        return false;
    };
    if let Some(scheme) = pattern_scheme {
        if scheme != origin_url.scheme() {
            return false;
        }
    }
    let Some(origin_host) = origin_url.host_str() else {
        return false;
    };

    match pattern_host.strip_prefix("*.") {
        // The bare apex is not a subdomain of itself: `example.com`
        // does not end with `.example.com`.
        Some(suffix) => origin_host.ends_with(&format!(".{}", suffix)),
        None => false,
    }
}

/// Trailing-slash normalization so string comparison cannot miss.
fn normalize_origin(origin: &str) -> String {
    origin.trim_end_matches('/').to_string()
}

fn authority(url: &Url) -> String {
    match (url.host_str(), url.port()) {
        (Some(host), Some(port)) => format!("{}:{}", host, port),
        (Some(host), None) => host.to_string(),
        _ => String::new(),
    }
}

fn header_str<'a>(headers: &'a HeaderMap, name: &str) -> Option<&'a str> {
    headers.get(name).and_then(|v| v.to_str().ok()).map(str::trim)
}
