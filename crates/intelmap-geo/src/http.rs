//! HTTP resolvers: postcodes.io-style postcode lookup and a
//! nominatim-style place search.

use std::time::Duration;

use async_trait::async_trait;
use intelmap_core::postcode::normalize_postcode;
use intelmap_core::{CoordinateResolver, LatLng, ResolveError};
use reqwest::StatusCode;
use serde::Deserialize;
use serde_json::Value;
use tracing::debug;

use crate::error::GeoError;

const USER_AGENT: &str = concat!("intelmap/", env!("CARGO_PKG_VERSION"));

fn build_client(timeout: Duration) -> Result<reqwest::Client, GeoError> {
    Ok(reqwest::Client::builder()
        .timeout(timeout)
        .user_agent(USER_AGENT)
        .build()?)
}

/// Read a response body, turning non-success statuses into [`GeoError::Server`].
/// `404` is reported as `None`.
async fn body_of(resp: reqwest::Response) -> Result<Option<String>, GeoError> {
    let status = resp.status();
    if status == StatusCode::NOT_FOUND {
        return Ok(None);
    }
    if !status.is_success() {
        let body = resp.text().await.unwrap_or_default();
        return Err(GeoError::Server {
            status: status.as_u16(),
            body,
        });
    }
    Ok(Some(resp.text().await?))
}

#[derive(Deserialize)]
struct PostcodeResponse {
    result: Option<PostcodeResult>,
}

#[derive(Deserialize)]
struct PostcodeResult {
    latitude: Option<f64>,
    longitude: Option<f64>,
}

/// Client for `GET {base}/postcodes/{postcode}`.
pub struct PostcodesIo {
    client: reqwest::Client,
    base_url: String,
}

impl PostcodesIo {
    /// `base_url` like `https://api.postcodes.io`; a trailing slash is dropped.
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self, GeoError> {
        Ok(Self {
            client: build_client(timeout)?,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    pub async fn lookup(&self, postcode: &str) -> Result<Option<LatLng>, GeoError> {
        let url = format!("{}/postcodes/{}", self.base_url, normalize_postcode(postcode));
        debug!(url = %url, "looking up postcode");
        let resp = self.client.get(&url).send().await?;
        match body_of(resp).await? {
            Some(body) => parse_postcode_response(&body),
            None => Ok(None),
        }
    }
}

/// Terminated postcodes come back with null coordinates; those are `None`.
pub fn parse_postcode_response(body: &str) -> Result<Option<LatLng>, GeoError> {
    let parsed: PostcodeResponse = serde_json::from_str(body)?;
    Ok(parsed
        .result
        .and_then(|r| Some(LatLng::new(r.latitude?, r.longitude?))))
}

#[async_trait]
impl CoordinateResolver for PostcodesIo {
    async fn resolve(&self, key: &str) -> Result<Option<LatLng>, ResolveError> {
        Ok(self.lookup(key).await?)
    }
}

/// Client for `GET {base}/search?q=..&format=json&limit=1`.
pub struct PlaceSearchClient {
    client: reqwest::Client,
    base_url: String,
}

impl PlaceSearchClient {
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self, GeoError> {
        Ok(Self {
            client: build_client(timeout)?,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    pub async fn search(&self, query: &str) -> Result<Option<LatLng>, GeoError> {
        let url = format!("{}/search", self.base_url);
        debug!(url = %url, query = %query, "place search");
        let resp = self
            .client
            .get(&url)
            .query(&[("q", query), ("format", "json"), ("limit", "1")])
            .send()
            .await?;
        match body_of(resp).await? {
            Some(body) => parse_search_response(&body),
            None => Ok(None),
        }
    }
}

/// First hit of a `[{"lat": .., "lon": ..}]` array. Coordinates may be
/// numbers or numeric strings.
pub fn parse_search_response(body: &str) -> Result<Option<LatLng>, GeoError> {
    let hits: Vec<Value> = serde_json::from_str(body)?;
    Ok(hits.first().and_then(|hit| {
        let lat = number(hit.get("lat")?)?;
        let lon = number(hit.get("lon")?)?;
        Some(LatLng::new(lat, lon))
    }))
}

fn number(v: &Value) -> Option<f64> {
    let n = match v {
        Value::Number(n) => n.as_f64()?,
        Value::String(s) => s.trim().parse().ok()?,
        _ => return None,
    };
    n.is_finite().then_some(n)
}

#[async_trait]
impl CoordinateResolver for PlaceSearchClient {
    async fn resolve(&self, key: &str) -> Result<Option<LatLng>, ResolveError> {
        Ok(self.search(key).await?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn postcode_body_parsed() {
        let body = r#"{"status": 200, "result": {"postcode": "SW1A 2AA", "latitude": 51.50354, "longitude": -0.127695}}"#;
        assert_eq!(
            parse_postcode_response(body).unwrap(),
            Some(LatLng::new(51.50354, -0.127695))
        );
    }

    #[test]
    fn postcode_without_coordinates_is_none() {
        let body = r#"{"status": 200, "result": {"postcode": "XX1 1XX", "latitude": null, "longitude": null}}"#;
        assert_eq!(parse_postcode_response(body).unwrap(), None);
        assert_eq!(parse_postcode_response(r#"{"result": null}"#).unwrap(), None);
    }

    #[test]
    fn postcode_body_malformed() {
        assert!(matches!(
            parse_postcode_response("<html>"),
            Err(GeoError::Json(_))
        ));
    }

    #[test]
    fn search_hit_with_string_coordinates() {
        let body = r#"[{"lat": "53.9580", "lon": "-1.0930", "display_name": "York"}]"#;
        assert_eq!(
            parse_search_response(body).unwrap(),
            Some(LatLng::new(53.958, -1.093))
        );
    }

    #[test]
    fn search_numbers_and_misses() {
        assert_eq!(
            parse_search_response(r#"[{"lat": 1.5, "lon": 2.5}]"#).unwrap(),
            Some(LatLng::new(1.5, 2.5))
        );
        assert_eq!(parse_search_response("[]").unwrap(), None);
        assert_eq!(
            parse_search_response(r#"[{"lat": "north", "lon": "1"}]"#).unwrap(),
            None
        );
    }

    #[test]
    fn base_url_trailing_slash_trimmed() {
        let client = PostcodesIo::new("https://api.postcodes.io/", Duration::from_secs(1)).unwrap();
        assert_eq!(client.base_url, "https://api.postcodes.io");
    }
}
