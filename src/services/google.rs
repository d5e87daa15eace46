use serde::Deserialize;
use serde_json::{json, Value};
use std::sync::Mutex;
use std::time::Duration;

use crate::models::{BusinessStatus, Candidate, Coordinates, TravelMode};
use crate::services::provider::{
    LocationRequest, NearbyQuery, PlaceDetails, PlacesProvider, ProviderError, RouteSummary,
};

/// Minimum length of a plausible API key
const MIN_API_KEY_LEN: usize = 20;

/// Width requested for place photos
const PHOTO_MAX_WIDTH: u32 = 400;

/// Fields fetched by the place details call
const DETAIL_FIELDS: &str = "place_id,name,geometry,rating,user_ratings_total,price_level,\
business_status,opening_hours,types,vicinity,formatted_address,formatted_phone_number,website,photos";

/// Google Maps web-service client
///
/// Handles all communication with the Google Maps platform including:
/// - Geocoding station names
/// - Nearby place search
/// - Place details and directions
/// - IP based geolocation
pub struct GooglePlacesClient {
    base_url: String,
    geolocation_url: String,
    api_key: String,
    language: String,
    client: reqwest::Client,
    last_location: Mutex<Option<Coordinates>>,
}

/// Check whether an API key looks usable
pub fn is_api_key_configured(api_key: &str) -> bool {
    let key = api_key.trim();
    !key.is_empty() && key.len() > MIN_API_KEY_LEN
}

impl GooglePlacesClient {
    /// Create a new client
    pub fn new(
        base_url: String,
        geolocation_url: String,
        api_key: String,
        language: String,
        timeout: Duration,
    ) -> Result<Self, ProviderError> {
        let client = reqwest::Client::builder().timeout(timeout).build()?;

        Ok(Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            geolocation_url,
            api_key,
            language,
            client,
            last_location: Mutex::new(None),
        })
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}/{}/json", self.base_url, path)
    }

    /// Photo link without credentials, safe to persist
    fn photo_link(&self, photo_reference: &str) -> String {
        format!(
            "{}/place/photo?maxwidth={}&photo_reference={}",
            self.base_url,
            PHOTO_MAX_WIDTH,
            urlencoding::encode(photo_reference)
        )
    }

    async fn get_json(
        &self,
        url: &str,
        params: &[(&str, String)],
    ) -> Result<Value, ProviderError> {
        let mut query: Vec<(&str, String)> = params.to_vec();
        query.push(("language", self.language.clone()));
        query.push(("key", self.api_key.clone()));

        let response = self.client.get(url).query(&query).send().await?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_else(|_| "Unable to read body".to_string());
            tracing::error!("Maps request to {} failed: {} - {}", url, status, body);
            return Err(ProviderError::ApiError(format!("HTTP {}", status)));
        }

        Ok(response.json().await?)
    }

    fn to_candidate(&self, raw: RawPlace) -> Candidate {
        let photo_url = raw
            .photos
            .first()
            .map(|photo| self.photo_link(&photo.photo_reference));

        Candidate {
            id: raw.place_id,
            name: raw.name.unwrap_or_default(),
            coordinates: raw.geometry.map(|g| Coordinates::new(g.location.lat, g.location.lng)),
            rating: raw.rating,
            review_count: raw.user_ratings_total,
            price_tier: raw.price_level.as_ref().and_then(parse_price_level),
            business_status: raw
                .business_status
                .as_deref()
                .and_then(BusinessStatus::from_provider),
            open_now: raw.opening_hours.and_then(|h| h.open_now),
            types: raw.types,
            address: raw.vicinity.or_else(|| raw.formatted_address.clone()),
            photo_url,
        }
    }
}

impl PlacesProvider for GooglePlacesClient {
    fn photo_url(&self, stored: &str) -> String {
        if !stored.starts_with(&self.base_url) || stored.contains("key=") {
            return stored.to_string();
        }
        format!("{}&key={}", stored, urlencoding::encode(&self.api_key))
    }

    async fn geocode(&self, query: &str) -> Result<Coordinates, ProviderError> {
        tracing::debug!("Geocoding: {}", query);

        let json = self
            .get_json(&self.endpoint("geocode"), &[("address", query.to_string())])
            .await?;

        match check_status(&json, query)? {
            Status::Ok => {}
            Status::ZeroResults => {
                return Err(ProviderError::NotFound(format!("no location for '{}'", query)))
            }
        }

        let location = json
            .pointer("/results/0/geometry/location")
            .ok_or_else(|| ProviderError::NotFound(format!("no location for '{}'", query)))?;
        let location: RawLatLng = serde_json::from_value(location.clone())
            .map_err(|e| {
                ProviderError::InvalidResponse(format!("Failed to parse location: {}", e))
            })?;

        Ok(Coordinates::new(location.lat, location.lng))
    }

    async fn search_nearby(&self, query: &NearbyQuery) -> Result<Vec<Candidate>, ProviderError> {
        let mut params = vec![
            ("location", query.point.to_string()),
            ("radius", query.radius_m.to_string()),
        ];
        if let Some(category) = &query.category {
            params.push(("type", category.clone()));
        }
        if query.open_now {
            params.push(("opennow", "true".to_string()));
        }
        if let Some(range) = query.price_range {
            params.push(("minprice", range.min_tier.to_string()));
            params.push(("maxprice", range.max_tier.to_string()));
        }

        tracing::debug!("Nearby search: {:?}", params);

        let json = self.get_json(&self.endpoint("place/nearbysearch"), &params).await?;

        if check_status(&json, "nearby search")? == Status::ZeroResults {
            return Err(ProviderError::ZeroResults);
        }

        let results = json
            .get("results")
            .and_then(|r| r.as_array())
            .ok_or_else(|| ProviderError::InvalidResponse("Missing results array".into()))?;

        let candidates: Vec<Candidate> = results
            .iter()
            .filter_map(|place| serde_json::from_value::<RawPlace>(place.clone()).ok())
            .map(|raw| self.to_candidate(raw))
            .collect();

        tracing::debug!("Nearby search returned {} places", candidates.len());

        Ok(candidates)
    }

    async fn place_details(&self, place_id: &str) -> Result<PlaceDetails, ProviderError> {
        tracing::debug!("Fetching details for place: {}", place_id);

        let json = self
            .get_json(
                &self.endpoint("place/details"),
                &[("place_id", place_id.to_string()), ("fields", DETAIL_FIELDS.to_string())],
            )
            .await?;

        if check_status(&json, place_id)? == Status::ZeroResults {
            return Err(ProviderError::NotFound(format!("place {}", place_id)));
        }

        let result = json
            .get("result")
            .ok_or_else(|| ProviderError::NotFound(format!("place {}", place_id)))?;
        let raw: RawPlace = serde_json::from_value(result.clone())
            .map_err(|e| ProviderError::InvalidResponse(format!("Failed to parse place: {}", e)))?;

        let formatted_address = raw.formatted_address.clone();
        let phone_number = raw.formatted_phone_number.clone();
        let website = raw.website.clone();

        Ok(PlaceDetails {
            candidate: self.to_candidate(raw),
            formatted_address,
            phone_number,
            website,
        })
    }

    async fn route(
        &self,
        origin: Coordinates,
        destination: Coordinates,
        mode: TravelMode,
    ) -> Result<RouteSummary, ProviderError> {
        let json = self
            .get_json(
                &self.endpoint("directions"),
                &[
                    ("origin", origin.to_string()),
                    ("destination", destination.to_string()),
                    ("mode", mode.as_str().to_string()),
                ],
            )
            .await?;

        if check_status(&json, "directions")? == Status::ZeroResults {
            return Err(ProviderError::NotFound("no route between points".into()));
        }

        let leg = json
            .pointer("/routes/0/legs/0")
            .ok_or_else(|| ProviderError::InvalidResponse("Missing route legs".into()))?;
        let text = |field: &str| {
            leg.pointer(&format!("/{}/text", field))
                .and_then(|v| v.as_str())
                .map(str::to_string)
                .ok_or_else(|| ProviderError::InvalidResponse(format!("Missing {} text", field)))
        };

        Ok(RouteSummary {
            distance_text: text("distance")?,
            duration_text: text("duration")?,
        })
    }

    async fn current_location(
        &self,
        request: &LocationRequest,
    ) -> Result<Coordinates, ProviderError> {
        if request.allow_cached {
            let cached = *self
                .last_location
                .lock()
                .map_err(|_| ProviderError::Unavailable("location cache poisoned".into()))?;
            if let Some(location) = cached {
                tracing::trace!("Using cached device location");
                return Ok(location);
            }
        }

        let response = self
            .client
            .post(&self.geolocation_url)
            .query(&[("key", self.api_key.as_str())])
            .timeout(Duration::from_millis(request.timeout_ms))
            .json(&json!({ "considerIp": true, "considerWifi": request.high_accuracy }))
            .send()
            .await?;

        match response.status().as_u16() {
            200 => {}
            401 | 403 => return Err(ProviderError::PermissionDenied),
            404 => return Err(ProviderError::NotFound("device location".into())),
            status => return Err(ProviderError::ApiError(format!("geolocation HTTP {}", status))),
        }

        let json: Value = response.json().await?;
        let location = json
            .get("location")
            .ok_or_else(|| ProviderError::InvalidResponse("Missing location".into()))?;
        let location: RawLatLng = serde_json::from_value(location.clone())
            .map_err(|e| {
                ProviderError::InvalidResponse(format!("Failed to parse location: {}", e))
            })?;
        let coordinates = Coordinates::new(location.lat, location.lng);

        if let Ok(mut last) = self.last_location.lock() {
            *last = Some(coordinates);
        }

        Ok(coordinates)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Status {
    Ok,
    ZeroResults,
}

/// Map the `status` field of a Maps response onto the error taxonomy
fn check_status(json: &Value, context: &str) -> Result<Status, ProviderError> {
    let status = json.get("status").and_then(|s| s.as_str()).unwrap_or("OK");
    match status {
        "OK" => Ok(Status::Ok),
        "ZERO_RESULTS" => Ok(Status::ZeroResults),
        "NOT_FOUND" => Err(ProviderError::NotFound(context.to_string())),
        "REQUEST_DENIED" | "OVER_QUERY_LIMIT" | "OVER_DAILY_LIMIT" => {
            let message = json
                .get("error_message")
                .and_then(|m| m.as_str())
                .unwrap_or(status);
            Err(ProviderError::Unavailable(message.to_string()))
        }
        other => Err(ProviderError::ApiError(format!("{} ({})", other, context))),
    }
}

/// Price levels arrive as numbers, occasionally as strings
fn parse_price_level(value: &Value) -> Option<u8> {
    let level = match value {
        Value::Number(n) => n.as_u64()?,
        Value::String(s) => s.trim().parse::<u64>().ok()?,
        _ => return None,
    };
    u8::try_from(level.min(4)).ok()
}

#[derive(Debug, Deserialize)]
struct RawLatLng {
    lat: f64,
    lng: f64,
}

#[derive(Debug, Deserialize)]
struct RawGeometry {
    location: RawLatLng,
}

#[derive(Debug, Deserialize)]
struct RawOpeningHours {
    open_now: Option<bool>,
}

#[derive(Debug, Deserialize)]
struct RawPhoto {
    photo_reference: String,
}

#[derive(Debug, Deserialize)]
struct RawPlace {
    place_id: String,
    name: Option<String>,
    geometry: Option<RawGeometry>,
    rating: Option<f64>,
    user_ratings_total: Option<u32>,
    price_level: Option<Value>,
    business_status: Option<String>,
    opening_hours: Option<RawOpeningHours>,
    #[serde(default)]
    types: Vec<String>,
    vicinity: Option<String>,
    formatted_address: Option<String>,
    formatted_phone_number: Option<String>,
    website: Option<String>,
    #[serde(default)]
    photos: Vec<RawPhoto>,
}
