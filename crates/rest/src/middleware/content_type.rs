//! Response content type normalization.
//!
//! Every response that is not a plain-text error is labelled
//! `application/json; charset=utf-8`, including empty ones.

use axum::{
    http::{HeaderMap, header},
    response::Response,
};
use mime::Mime;

use crate::responses::headers::json_content_type;

/// Returns true if the response should be labelled as UTF-8 JSON.
///
/// That is the case when no content type is set or when it is JSON without
/// an explicit charset.
pub fn needs_json_content_type(headers: &HeaderMap) -> bool {
    let Some(value) = headers.get(header::CONTENT_TYPE) else {
        return true;
    };

    match value.to_str().ok().and_then(|v| v.parse::<Mime>().ok()) {
        Some(mime) => mime.essence_str() == mime::APPLICATION_JSON.essence_str()
            && mime.get_param(mime::CHARSET).is_none(),
        None => false,
    }
}

/// Sets the JSON content type where [`needs_json_content_type`] says so.
pub async fn json_content_type_middleware(mut response: Response) -> Response {
    if needs_json_content_type(response.headers()) {
        response
            .headers_mut()
            .insert(header::CONTENT_TYPE, json_content_type());
    }
    response
}
