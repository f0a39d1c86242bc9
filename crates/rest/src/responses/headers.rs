//! Response header generation.
//!
//! Provides the JSON content type every response carries and the
//! `Location` header written on create.

use axum::http::HeaderValue;
use thiserror::Error;
use url::Url;

/// Content type of every JSON response.
pub const JSON_CONTENT_TYPE: &str = "application/json; charset=utf-8";

/// Content type of plain-text error bodies.
pub const TEXT_CONTENT_TYPE: &str = "text/plain; charset=utf-8";

/// Returns the JSON content type as a header value.
pub fn json_content_type() -> HeaderValue {
    HeaderValue::from_static(JSON_CONTENT_TYPE)
}

/// Failure to build a `Location` header.
#[derive(Error, Debug)]
pub enum LocationError {
    /// The OS host name could not be read.
    #[error("unable to determine host name: {0}")]
    Hostname(#[from] std::io::Error),

    /// The OS host name is not valid UTF-8.
    #[error("host name is not valid UTF-8")]
    NonUtf8Hostname,

    /// The host, port and path do not form a valid URL.
    #[error("invalid location URL: {0}")]
    InvalidUrl(#[from] url::ParseError),
}

/// Returns the host written into `Location` headers.
///
/// The configured public host wins; otherwise the OS host name is used.
pub fn resolve_host(public_host: Option<&str>) -> Result<String, LocationError> {
    if let Some(host) = public_host {
        return Ok(host.to_string());
    }

    hostname::get()?
        .into_string()
        .map_err(|_| LocationError::NonUtf8Hostname)
}

/// Builds `http://<host>:<port>/<resource_type>/<id>`.
///
/// The port is always written out, even when it is the scheme default.
pub fn location_url(
    host: &str,
    port: u16,
    resource_type: &str,
    id: &str,
) -> Result<String, LocationError> {
    let location = format!("http://{}:{}/{}/{}", host, port, resource_type, id);
    Url::parse(&location)?;
    Ok(location)
}
