//! HTTP routes for collectors (`/collect`) and readers (`/query`)

use std::sync::Arc;

use axum::{
    Router,
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Json, Response},
    routing::{get, post, put},
};
use tracing::error;

use crate::error::{Field, WeatherError};
use crate::models::{AirportEntry, Measurement, ReadingAggregate};
use crate::store::{StoreStats, WeatherStore};

pub type SharedStore = Arc<WeatherStore>;

impl IntoResponse for WeatherError {
    fn into_response(self) -> Response {
        let status = match &self {
            WeatherError::Validation { .. } => StatusCode::BAD_REQUEST,
            WeatherError::NotFound { .. } => StatusCode::NOT_FOUND,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        };
        if status.is_server_error() {
            error!("request failed: {self}");
        }
        (status, self.user_message()).into_response()
    }
}

pub fn router(store: SharedStore) -> Router {
    Router::new()
        .nest("/collect", collect_router())
        .nest("/query", query_router())
        .with_state(store)
}

fn collect_router() -> Router<SharedStore> {
    Router::new()
        .route("/ping", get(collect_ping))
        .route(
            "/weather/{iata}/{point_type}",
            put(update_weather).post(update_weather),
        )
        .route("/airports", get(get_airports))
        .route("/airport", post(add_airport))
        .route("/airport/{iata}", get(get_airport).delete(delete_airport))
        .route("/airport/{iata}/{lat}/{long}", post(add_airport_at))
}

fn query_router() -> Router<SharedStore> {
    Router::new()
        .route("/ping", get(query_ping))
        .route("/weather/{iata}", get(query_weather_here))
        .route("/weather/{iata}/{radius}", get(query_weather))
}

async fn collect_ping() -> &'static str {
    "ready"
}

async fn update_weather(
    State(store): State<SharedStore>,
    Path((iata, point_type)): Path<(String, String)>,
    Json(measurement): Json<Measurement>,
) -> Result<StatusCode, WeatherError> {
    store.apply_measurement(&iata, &point_type, measurement)?;
    Ok(StatusCode::OK)
}

async fn get_airports(State(store): State<SharedStore>) -> Result<Json<Vec<String>>, StatusCode> {
    let codes = store.list_iata_codes();
    if codes.is_empty() {
        return Err(StatusCode::NOT_FOUND);
    }
    Ok(Json(codes))
}

async fn get_airport(
    State(store): State<SharedStore>,
    Path(iata): Path<String>,
) -> Result<Json<AirportEntry>, StatusCode> {
    store
        .find_airport(&iata)
        .map(Json)
        .ok_or(StatusCode::NOT_FOUND)
}

async fn add_airport(
    State(store): State<SharedStore>,
    Json(airport): Json<AirportEntry>,
) -> Result<StatusCode, WeatherError> {
    store.add_airport_entry(airport)?;
    Ok(StatusCode::CREATED)
}

async fn add_airport_at(
    State(store): State<SharedStore>,
    Path((iata, lat, long)): Path<(String, String, String)>,
) -> Result<StatusCode, WeatherError> {
    let latitude = parse_number(&lat, Field::Latitude)?;
    let longitude = parse_number(&long, Field::Longitude)?;
    store.add_airport(&iata, latitude, longitude)?;
    Ok(StatusCode::CREATED)
}

async fn delete_airport(
    State(store): State<SharedStore>,
    Path(iata): Path<String>,
) -> Result<StatusCode, WeatherError> {
    if store.remove_airport(&iata)? {
        Ok(StatusCode::OK)
    } else {
        Err(WeatherError::not_found(iata))
    }
}

async fn query_ping(State(store): State<SharedStore>) -> Json<StoreStats> {
    Json(store.stats())
}

async fn query_weather_here(
    State(store): State<SharedStore>,
    Path(iata): Path<String>,
) -> Result<Json<Vec<ReadingAggregate>>, WeatherError> {
    Ok(Json(store.query_weather(&iata, 0.0)?))
}

async fn query_weather(
    State(store): State<SharedStore>,
    Path((iata, radius)): Path<(String, String)>,
) -> Result<Json<Vec<ReadingAggregate>>, WeatherError> {
    let radius = if radius.trim().is_empty() {
        0.0
    } else {
        parse_number(&radius, Field::Radius)?
    };
    Ok(Json(store.query_weather(&iata, radius)?))
}

fn parse_number(value: &str, field: Field) -> Result<f64, WeatherError> {
    value
        .trim()
        .parse::<f64>()
        .map_err(|_| WeatherError::validation(field, format!("Invalid {field} '{value}'")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http::{Method, Request, header};
    use http_body_util::BodyExt;
    use tower::ServiceExt;

    fn seeded_store() -> SharedStore {
        let store = WeatherStore::new();
        store
            .seed([
                AirportEntry::new("BOS", 42.364347, -71.005181),
                AirportEntry::new("EWR", 40.6925, -74.168667),
                AirportEntry::new("JFK", 40.639751, -73.778925),
                AirportEntry::new("LGA", 40.777245, -73.872608),
                AirportEntry::new("MMU", 40.79935, -74.4148747),
            ])
            .unwrap();
        Arc::new(store)
    }

    async fn send(
        store: &SharedStore,
        method: Method,
        uri: &str,
        body: Option<&str>,
    ) -> (StatusCode, String) {
        let builder = Request::builder().method(method).uri(uri);
        let request = match body {
            Some(json) => builder
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(json.to_string()))
                .unwrap(),
            None => builder.body(Body::empty()).unwrap(),
        };
        let response = router(Arc::clone(store)).oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        (status, String::from_utf8(bytes.to_vec()).unwrap())
    }

    #[tokio::test]
    async fn test_collect_ping() {
        let store = seeded_store();
        let (status, body) = send(&store, Method::GET, "/collect/ping", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, "ready");
    }

    #[tokio::test]
    async fn test_update_then_query() {
        let store = seeded_store();
        let wind = r#"{"mean":22.0,"first":10,"second":20,"third":30,"count":10}"#;
        let (status, _) = send(&store, Method::PUT, "/collect/weather/BOS/wind", Some(wind)).await;
        assert_eq!(status, StatusCode::OK);

        let (status, body) = send(&store, Method::GET, "/query/weather/BOS/0", None).await;
        assert_eq!(status, StatusCode::OK);
        let readings: Vec<ReadingAggregate> = serde_json::from_str(&body).unwrap();
        assert_eq!(readings[0].wind, Some(Measurement::new(10, 20, 30, 22.0, 10)));

        let (status, body) = send(&store, Method::GET, "/query/ping", None).await;
        assert_eq!(status, StatusCode::OK);
        let stats: StoreStats = serde_json::from_str(&body).unwrap();
        assert_eq!(stats.datasize, 1);
        assert_eq!(stats.iata_freq.len(), 5);
    }

    #[tokio::test]
    async fn test_update_rejected() {
        let store = seeded_store();
        let body = r#"{"mean":120.0}"#;
        let (status, message) =
            send(&store, Method::POST, "/collect/weather/BOS/humidity", Some(body)).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(message, "could not update atmospheric data");

        let (status, _) = send(&store, Method::PUT, "/collect/weather/XXX/wind", Some(body)).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_add_airport_alter_flow() {
        let store = seeded_store();
        let cases = [
            ("/collect/airport/ZZZZ/1/2", StatusCode::BAD_REQUEST, Some("IATA code is incorrect")),
            ("/collect/airport/AAA/0/2", StatusCode::BAD_REQUEST, Some("Latitude should be set")),
            ("/collect/airport/AAA/1/0", StatusCode::BAD_REQUEST, Some("Longitude should be set")),
            ("/collect/airport/AAA/x/0", StatusCode::BAD_REQUEST, Some("Invalid latitude 'x'")),
        ];
        for (uri, expected, message) in cases {
            let (status, body) = send(&store, Method::POST, uri, None).await;
            assert_eq!(status, expected, "{uri}");
            if let Some(message) = message {
                assert_eq!(body, message);
            }
        }

        let empty_iata = r#"{"iata":"","latitude":1.2,"longitude":2.3}"#;
        let (status, body) = send(&store, Method::POST, "/collect/airport", Some(empty_iata)).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body, "IATA code is incorrect");
    }

    #[tokio::test]
    async fn test_add_and_delete_airport() {
        let store = seeded_store();
        let (status, _) = send(&store, Method::POST, "/collect/airport/BSV/1.2/2.3", None).await;
        assert_eq!(status, StatusCode::CREATED);

        let (status, body) = send(&store, Method::GET, "/collect/airport/BSV", None).await;
        assert_eq!(status, StatusCode::OK);
        let airport: AirportEntry = serde_json::from_str(&body).unwrap();
        assert_eq!(airport, AirportEntry::new("BSV", 1.2, 2.3));

        let (status, _) = send(&store, Method::DELETE, "/collect/airport/BSV", None).await;
        assert_eq!(status, StatusCode::OK);
        let (status, _) = send(&store, Method::GET, "/collect/airport/BSV", None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_delete_alter_flow() {
        let store = seeded_store();
        let (status, body) = send(&store, Method::DELETE, "/collect/airport/ZZZ", None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body, "Airport with iata=[ZZZ] has not found");

        let (status, body) = send(&store, Method::DELETE, "/collect/airport/ZZZZ", None).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body, "IATA code is incorrect");
    }

    #[tokio::test]
    async fn test_get_airports() {
        let store = seeded_store();
        let (status, body) = send(&store, Method::GET, "/collect/airports", None).await;
        assert_eq!(status, StatusCode::OK);
        let codes: Vec<String> = serde_json::from_str(&body).unwrap();
        assert_eq!(codes, ["BOS", "EWR", "JFK", "LGA", "MMU"]);

        store.clear();
        let (status, _) = send(&store, Method::GET, "/collect/airports", None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_query_bad_radius() {
        let store = seeded_store();
        let (status, _) = send(&store, Method::GET, "/query/weather/BOS/far", None).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        let (status, _) = send(&store, Method::GET, "/query/weather/BOS/-5", None).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_query_without_radius() {
        let store = seeded_store();
        let (status, body) = send(&store, Method::GET, "/query/weather/LGA", None).await;
        assert_eq!(status, StatusCode::OK);
        let readings: Vec<ReadingAggregate> = serde_json::from_str(&body).unwrap();
        assert_eq!(readings, vec![ReadingAggregate::default()]);
    }
}
