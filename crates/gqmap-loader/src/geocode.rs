//! Forward geocoding against the Mapbox places API.

use std::time::Duration;

use percent_encoding::{utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};
use reqwest::{Client, Url};
use serde::Deserialize;

use gqmap_engine::{CameraTarget, GeoPoint};

use crate::error::LoaderError;

const DEFAULT_BASE_URL: &str = "https://api.mapbox.com/";

/// Shown to the user when a search matched nothing.
pub const LOCATION_NOT_FOUND_NOTICE: &str = "Location not found.";

/// Characters `encodeURIComponent` leaves alone; everything else is escaped.
const QUERY_SEGMENT: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'!')
    .remove(b'~')
    .remove(b'*')
    .remove(b'\'')
    .remove(b'(')
    .remove(b')');

/// A body without `features`, or a feature without a two-element `center`,
/// is malformed rather than an empty match.
#[derive(Debug, Deserialize)]
struct GeocodeResponse {
    features: Vec<GeocodeFeature>,
}

#[derive(Debug, Deserialize)]
struct GeocodeFeature {
    /// `[longitude, latitude]`
    center: [f64; 2],
}

pub struct MapboxGeocoder {
    client: Client,
    access_token: String,
    base_url: Url,
}

// The access token is a credential; keep it out of logs.
impl std::fmt::Debug for MapboxGeocoder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MapboxGeocoder")
            .field("access_token", &"[redacted]")
            .field("base_url", &self.base_url.as_str())
            .finish_non_exhaustive()
    }
}

impl MapboxGeocoder {
    /// Creates a geocoder pointed at the public Mapbox API.
    ///
    /// # Errors
    ///
    /// Returns [`LoaderError::Http`] if the HTTP client cannot be built.
    pub fn new(
        access_token: &str,
        timeout_secs: u64,
        user_agent: &str,
    ) -> Result<Self, LoaderError> {
        Self::with_base_url(access_token, timeout_secs, user_agent, DEFAULT_BASE_URL)
    }

    /// Creates a geocoder with a custom base URL. Used by tests to point at
    /// a mock server.
    ///
    /// # Errors
    ///
    /// Returns [`LoaderError::InvalidBaseUrl`] if `base_url` does not parse,
    /// or [`LoaderError::Http`] if the HTTP client cannot be built.
    pub fn with_base_url(
        access_token: &str,
        timeout_secs: u64,
        user_agent: &str,
        base_url: &str,
    ) -> Result<Self, LoaderError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .connect_timeout(Duration::from_secs(10))
            .user_agent(user_agent)
            .build()?;

        // Url::join drops the last path segment unless the base ends in '/'.
        let normalized = if base_url.ends_with('/') {
            base_url.to_owned()
        } else {
            format!("{base_url}/")
        };
        let base_url = Url::parse(&normalized).map_err(|e| LoaderError::InvalidBaseUrl {
            base_url: base_url.to_owned(),
            reason: e.to_string(),
        })?;

        Ok(Self {
            client,
            access_token: access_token.to_owned(),
            base_url,
        })
    }

    /// Request URL for `query`, without the access token.
    fn places_url(&self, query: &str) -> Result<Url, LoaderError> {
        let segment = utf8_percent_encode(query, QUERY_SEGMENT);
        self.base_url
            .join(&format!("geocoding/v5/mapbox.places/{segment}.json"))
            .map_err(|e| LoaderError::InvalidBaseUrl {
                base_url: self.base_url.to_string(),
                reason: e.to_string(),
            })
    }

    /// Resolve free text to the best-matching point, if any.
    ///
    /// `Ok(None)` means the service answered but had no usable match.
    ///
    /// # Errors
    ///
    /// - [`LoaderError::Http`] on network failure (the URL is stripped so the
    ///   token never reaches logs).
    /// - [`LoaderError::UnexpectedStatus`] for non-2xx responses.
    /// - [`LoaderError::Deserialize`] if the body is not a geocoding response.
    pub async fn geocode(&self, query: &str) -> Result<Option<GeoPoint>, LoaderError> {
        let url = self.places_url(query)?;
        let public_url = url.to_string();

        let response = self
            .client
            .get(url)
            .query(&[("access_token", self.access_token.as_str()), ("limit", "1")])
            .send()
            .await
            .map_err(|e| LoaderError::Http(e.without_url()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(LoaderError::UnexpectedStatus {
                status: status.as_u16(),
                url: public_url,
            });
        }

        let body = response
            .text()
            .await
            .map_err(|e| LoaderError::Http(e.without_url()))?;
        let parsed: GeocodeResponse =
            serde_json::from_str(&body).map_err(|source| LoaderError::Deserialize {
                context: "geocoding response".to_string(),
                source,
            })?;

        Ok(parsed.features.first().and_then(|feature| {
            let [lng, lat] = feature.center;
            GeoPoint::new(lat, lng)
        }))
    }
}

/// What a location search should do to the map.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SearchOutcome {
    /// Blank query; nothing was sent.
    EmptyQuery,
    /// Recenter the camera on the result.
    Found(CameraTarget),
    /// The service had no match; show [`LOCATION_NOT_FOUND_NOTICE`].
    NotFound,
    /// The request failed; the error was logged and the map stays put.
    Failed,
}

impl SearchOutcome {
    /// User-facing notice, if the outcome calls for one.
    #[must_use]
    pub fn notice(&self) -> Option<&'static str> {
        match self {
            Self::NotFound => Some(LOCATION_NOT_FOUND_NOTICE),
            Self::EmptyQuery | Self::Found(_) | Self::Failed => None,
        }
    }
}

/// Run one location search. Never fails; see [`SearchOutcome`].
pub async fn search_location(geocoder: &MapboxGeocoder, query: &str) -> SearchOutcome {
    let query = query.trim();
    if query.is_empty() {
        return SearchOutcome::EmptyQuery;
    }

    match geocoder.geocode(query).await {
        Ok(Some(point)) => {
            tracing::debug!(query, %point, "location search matched");
            SearchOutcome::Found(CameraTarget::search_result(point))
        }
        Ok(None) => {
            tracing::info!(query, "location search found nothing");
            SearchOutcome::NotFound
        }
        Err(e) => {
            tracing::error!(query, error = %e, "location search failed");
            SearchOutcome::Failed
        }
    }
}
