//! Picks HTML or JSON for the auth responses from the request's `Accept` header.

use axum::http::header::ACCEPT;
use axum::http::HeaderMap;

const HTML_MEDIA_TYPES: [&str; 2] = ["text/html", "application/xhtml+xml"];
const JSON_MEDIA_TYPE: &str = "application/json";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum ResponseFormat {
    Html,
    Json,
}

impl ResponseFormat {
    /// HTML only when the client names an HTML media type explicitly and prefers it at least as
    /// much as JSON. Wildcards and a missing header mean JSON.
    pub(crate) fn from_headers(headers: &HeaderMap) -> Self {
        let mut html_quality: Option<f32> = None;
        let mut json_quality: Option<f32> = None;

        for value in headers.get_all(ACCEPT).iter() {
            let Ok(value) = value.to_str() else {
                continue;
            };
            for (media_type, quality) in value.split(',').filter_map(parse_media_range) {
                if HTML_MEDIA_TYPES.contains(&media_type.as_str()) {
                    html_quality = Some(html_quality.map_or(quality, |q| q.max(quality)));
                } else if media_type == JSON_MEDIA_TYPE {
                    json_quality = Some(json_quality.map_or(quality, |q| q.max(quality)));
                }
            }
        }

        match html_quality {
            Some(html) if html > 0.0 && html >= json_quality.unwrap_or(0.0) => ResponseFormat::Html,
            _ => ResponseFormat::Json,
        }
    }
}

fn parse_media_range(range: &str) -> Option<(String, f32)> {
    let mut parts = range.split(';');
    let media_type = parts.next()?.trim().to_ascii_lowercase();
    if media_type.is_empty() {
        return None;
    }

    let quality = parts
        .filter_map(|param| param.trim().split_once('='))
        .find(|(name, _)| name.trim().eq_ignore_ascii_case("q"))
        .and_then(|(_, q)| q.trim().parse::<f32>().ok())
        .unwrap_or(1.0);

    Some((media_type, quality))
}
