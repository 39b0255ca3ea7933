//! Validation of redirect target URLs.
//!
//! Targets are stored exactly as submitted. Validation only rejects what a
//! browser could not or should not be redirected to.

use url::{Host, Url};

/// Reasons a target URL is rejected.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum UrlValidationError {
    #[error("Invalid URL format: {0}")]
    InvalidFormat(String),

    #[error("Only HTTP and HTTPS protocols are allowed")]
    UnsupportedProtocol,

    #[error("URL host must be an IP address or a domain with a top-level domain")]
    MissingTld,

    #[error("URL must not contain whitespace or control characters")]
    UnsafeCharacters,
}

/// Checks that `input` is an absolute `http`/`https` URL with a routable host.
///
/// # Rules
///
/// 1. **Characters**: no control characters, no surrounding whitespace. The URL
///    parser silently strips tabs and newlines, but the stored text is what
///    ends up in the `Location` header
/// 2. **Syntax**: must parse as an absolute URL
/// 3. **Protocol**: only HTTP and HTTPS
/// 4. **Host**: an IP address, or a domain containing a dot (`localhost` is rejected)
///
/// Rejects `javascript:`, `data:`, `file:` and other non-web schemes.
///
/// # Examples
///
/// ```
/// use shortlink::utils::url_validator::{validate_target_url, UrlValidationError};
///
/// assert!(validate_target_url("https://example.com/path?q=1").is_ok());
/// assert_eq!(
///     validate_target_url("ftp://example.com"),
///     Err(UrlValidationError::UnsupportedProtocol)
/// );
/// ```
pub fn validate_target_url(input: &str) -> Result<(), UrlValidationError> {
    if input.trim() != input || input.chars().any(char::is_control) {
        return Err(UrlValidationError::UnsafeCharacters);
    }

    let url = Url::parse(input).map_err(|e| UrlValidationError::InvalidFormat(e.to_string()))?;

    match url.scheme() {
        "http" | "https" => {}
        _ => return Err(UrlValidationError::UnsupportedProtocol),
    }

    match url.host() {
        Some(Host::Ipv4(_)) | Some(Host::Ipv6(_)) => Ok(()),
        Some(Host::Domain(domain)) => {
            let has_tld = domain
                .trim_end_matches('.')
                .rsplit_once('.')
                .is_some_and(|(name, tld)| !name.is_empty() && !tld.is_empty());
            if has_tld {
                Ok(())
            } else {
                Err(UrlValidationError::MissingTld)
            }
        }
        None => Err(UrlValidationError::InvalidFormat("missing host".to_string())),
    }
}
