//! HTTP API routes
//!
//! Defines all REST API endpoints for the server.

use crate::category::{available_categories, Category, CategoryInfo};
use crate::error::Error;
use crate::geo::{Coordinates, GeocodeGateway};
use crate::notify::Notification;
use crate::search::{resolve, Completion};
use crate::server::state::AppState;
use crate::session::{MapSession, SessionSnapshot};
use crate::store::{Place, PlaceId};

use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::{delete, get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::sync::Arc;
use tower_http::services::ServeDir;

/// Create the API router
pub fn create_router<G: GeocodeGateway + 'static>(state: Arc<AppState<G>>) -> Router {
    Router::new()
        .route("/api/state", get(state_handler::<G>))
        .route("/api/search", post(search_handler::<G>))
        .route("/api/click", post(click_handler::<G>))
        .route("/api/selection", delete(dismiss_handler::<G>))
        .route("/api/selection/save", post(save_handler::<G>))
        .route("/api/favorites", get(favorites_handler::<G>))
        .route("/api/favorites/:id", delete(remove_handler::<G>))
        .route("/api/favorites/:id/focus", post(focus_handler::<G>))
        .route("/api/categories", get(categories_handler))
        .nest_service("/", ServeDir::new(static_dir()).append_index_html_on_directories(true))
        .with_state(state)
}

/// Static frontend directory: `./static`, else next to the executable
fn static_dir() -> PathBuf {
    let local = PathBuf::from("static");
    if local.exists() {
        return local;
    }

    std::env::current_exe()
        .ok()
        .and_then(|exe| exe.parent().map(|dir| dir.join("static")))
        .filter(|path| path.exists())
        .unwrap_or(local)
}

/// API error response
#[derive(Debug, Serialize, Deserialize)]
pub struct ApiError {
    pub error: String,
    pub code: String,
}

type ApiFailure = (StatusCode, Json<ApiError>);

impl From<Error> for ApiError {
    fn from(err: Error) -> Self {
        let code = match &err {
            Error::Validation(_) => "VALIDATION_ERROR",
            Error::NotFound(_) => "NOT_FOUND",
            Error::Network(_) | Error::Http(_) => "NETWORK_ERROR",
            Error::Storage(_) | Error::Io(_) => "STORAGE_ERROR",
            Error::Config(_) => "CONFIG_ERROR",
            _ => "INTERNAL_ERROR",
        };
        ApiError {
            error: err.to_string(),
            code: code.to_string(),
        }
    }
}

fn failure(err: Error) -> ApiFailure {
    let status = match &err {
        Error::Validation(_) => StatusCode::BAD_REQUEST,
        Error::NotFound(_) => StatusCode::NOT_FOUND,
        Error::Network(_) | Error::Http(_) => StatusCode::BAD_GATEWAY,
        _ => StatusCode::INTERNAL_SERVER_ERROR,
    };
    (status, Json(ApiError::from(err)))
}

fn parse_id(id: &str) -> Result<PlaceId, ApiFailure> {
    id.parse().map_err(failure)
}

/// Session snapshot plus visible notifications
#[derive(Debug, Serialize)]
pub struct StateResponse {
    #[serde(flatten)]
    pub session: SessionSnapshot,
    pub notifications: Vec<Notification>,
}

/// Outcome of a search or click
#[derive(Debug, Serialize)]
pub struct LookupResponse {
    pub completion: Completion,
    pub state: StateResponse,
}

/// Current map state
///
/// GET /api/state
async fn state_handler<G: GeocodeGateway + 'static>(State(state): State<Arc<AppState<G>>>) -> Json<StateResponse> {
    let session = state.session.lock().await;
    Json(snapshot(&state, &session))
}

fn snapshot<G>(state: &AppState<G>, session: &MapSession) -> StateResponse {
    StateResponse {
        session: session.snapshot(),
        notifications: state.board.board.visible(),
    }
}

/// Search request body
#[derive(Debug, Deserialize)]
pub struct SearchRequest {
    pub query: String,
}

/// Search by address or postal code
///
/// POST /api/search
async fn search_handler<G: GeocodeGateway + 'static>(
    State(state): State<Arc<AppState<G>>>,
    Json(req): Json<SearchRequest>,
) -> Result<Json<LookupResponse>, ApiFailure> {
    let ticket = state.session.lock().await.begin_search(&req.query);
    let ticket = ticket.ok_or_else(|| failure(Error::Validation("Search query is empty".to_string())))?;

    let response = resolve(&state.gateway, &ticket).await;

    let mut session = state.session.lock().await;
    let completion = session.complete(&ticket, response);
    Ok(Json(LookupResponse {
        completion,
        state: snapshot(&state, &session),
    }))
}

/// Map click request body
#[derive(Debug, Deserialize)]
pub struct ClickRequest {
    pub lat: f64,
    pub lng: f64,
}

/// Select the clicked point and resolve its name
///
/// POST /api/click
async fn click_handler<G: GeocodeGateway + 'static>(
    State(state): State<Arc<AppState<G>>>,
    Json(req): Json<ClickRequest>,
) -> Result<Json<LookupResponse>, ApiFailure> {
    let ticket = state
        .session
        .lock()
        .await
        .begin_click(Coordinates::new(req.lat, req.lng))
        .map_err(failure)?;

    let response = resolve(&state.gateway, &ticket).await;

    let mut session = state.session.lock().await;
    let completion = session.complete(&ticket, response);
    Ok(Json(LookupResponse {
        completion,
        state: snapshot(&state, &session),
    }))
}

/// Save request body
#[derive(Debug, Deserialize)]
pub struct SaveRequest {
    pub name: String,
    #[serde(default)]
    pub category: Option<String>,
}

/// Save the current selection as a favorite
///
/// POST /api/selection/save
async fn save_handler<G: GeocodeGateway + 'static>(
    State(state): State<Arc<AppState<G>>>,
    Json(req): Json<SaveRequest>,
) -> Result<(StatusCode, Json<Place>), ApiFailure> {
    let category = req.category.as_deref().map(Category::resolve);
    let place = state
        .session
        .lock()
        .await
        .save_selection(&req.name, category)
        .map_err(failure)?;
    Ok((StatusCode::CREATED, Json(place)))
}

/// Clear the selection
///
/// DELETE /api/selection
async fn dismiss_handler<G: GeocodeGateway + 'static>(State(state): State<Arc<AppState<G>>>) -> StatusCode {
    state.session.lock().await.dismiss_selection();
    StatusCode::NO_CONTENT
}

/// List favorites in insertion order
///
/// GET /api/favorites
async fn favorites_handler<G: GeocodeGateway + 'static>(State(state): State<Arc<AppState<G>>>) -> Json<Vec<Place>> {
    let session = state.session.lock().await;
    Json(session.state().favorites.list().to_vec())
}

/// Remove a favorite
///
/// DELETE /api/favorites/:id
async fn remove_handler<G: GeocodeGateway + 'static>(
    State(state): State<Arc<AppState<G>>>,
    Path(id): Path<String>,
) -> Result<StatusCode, ApiFailure> {
    let id = parse_id(&id)?;
    let removed = state.session.lock().await.remove_favorite(&id);
    match removed {
        Some(_) => Ok(StatusCode::NO_CONTENT),
        None => Err(failure(Error::NotFound(format!("Favorite {}", id)))),
    }
}

/// Select a favorite and fly the camera to it
///
/// POST /api/favorites/:id/focus
async fn focus_handler<G: GeocodeGateway + 'static>(
    State(state): State<Arc<AppState<G>>>,
    Path(id): Path<String>,
) -> Result<Json<StateResponse>, ApiFailure> {
    let id = parse_id(&id)?;
    let mut session = state.session.lock().await;
    session.focus_favorite(&id).map_err(failure)?;
    Ok(Json(snapshot(&state, &session)))
}

/// List place categories
///
/// GET /api/categories
async fn categories_handler() -> Json<Vec<CategoryInfo>> {
    Json(available_categories())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use crate::geo::stub::StubGateway;
    use crate::geo::{GeocodeHit, ReverseHit};
    use crate::store::backend::MemoryStorage;
    use axum::body::Body;
    use axum::http::Request;
    use http_body_util::BodyExt;
    use serde_json::{json, Value};
    use tower::ServiceExt;

    fn create_test_state() -> Arc<AppState<StubGateway>> {
        let gateway = StubGateway::new()
            .with_forward("Paulista Avenue", vec![GeocodeHit::new("-23.5614", "-46.6559", "Avenida Paulista")])
            .with_reverse(-18.9, -48.2, Some(ReverseHit {
                name: "Praça Clarimundo Carneiro".into(),
                ..Default::default()
            }));
        Arc::new(AppState::new(&Config::default(), gateway, Box::new(MemoryStorage::new())))
    }

    async fn send(app: Router, method: &str, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
        let mut builder = Request::builder().method(method).uri(uri);
        let body = match body {
            Some(json) => {
                builder = builder.header("Content-Type", "application/json");
                Body::from(json.to_string())
            }
            None => Body::empty(),
        };

        let response = app.oneshot(builder.body(body).unwrap()).await.unwrap();
        let status = response.status();
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        let value = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap()
        };
        (status, value)
    }

    #[tokio::test]
    async fn test_state_endpoint() {
        let app = create_router(create_test_state());

        let (status, body) = send(app, "GET", "/api/state", None).await;

        assert_eq!(status, StatusCode::OK);
        assert!(body["selection"].is_null());
        assert_eq!(body["camera"]["zoom"], 13);
        assert_eq!(body["favorites"], json!([]));
        assert_eq!(body["lookup"]["phase"], "idle");
    }

    #[tokio::test]
    async fn test_search_endpoint() {
        let state = create_test_state();
        let app = create_router(state.clone());

        let (status, body) = send(app, "POST", "/api/search", Some(json!({"query": "Paulista Avenue"}))).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["completion"]["status"], "applied");
        assert_eq!(body["completion"]["result"]["result"], "found");
        assert_eq!(body["state"]["selection"]["name"], "Avenida Paulista");
        assert_eq!(body["state"]["markers"].as_array().unwrap().len(), 1);
        assert_eq!(body["state"]["notifications"][0]["severity"], "success");
    }

    #[tokio::test]
    async fn test_blank_search_rejected() {
        let app = create_router(create_test_state());

        let (status, body) = send(app, "POST", "/api/search", Some(json!({"query": "  "}))).await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["code"], "VALIDATION_ERROR");
    }

    #[tokio::test]
    async fn test_click_save_remove_flow() {
        let state = create_test_state();

        let (status, body) = send(
            create_router(state.clone()),
            "POST",
            "/api/click",
            Some(json!({"lat": -18.9, "lng": -48.2})),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["state"]["selection"]["name"], "Praça Clarimundo Carneiro");

        let (status, place) = send(
            create_router(state.clone()),
            "POST",
            "/api/selection/save",
            Some(json!({"name": "Square", "category": "leisure"})),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(place["category"], "leisure");
        let id = place["id"].as_str().unwrap().to_string();

        let (_, favorites) = send(create_router(state.clone()), "GET", "/api/favorites", None).await;
        assert_eq!(favorites.as_array().unwrap().len(), 1);

        let uri = format!("/api/favorites/{}", id);
        let (status, _) = send(create_router(state.clone()), "DELETE", &uri, None).await;
        assert_eq!(status, StatusCode::NO_CONTENT);
        let (status, body) = send(create_router(state), "DELETE", &uri, None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["code"], "NOT_FOUND");
    }

    #[tokio::test]
    async fn test_click_invalid_coordinates() {
        let app = create_router(create_test_state());

        let (status, body) = send(app, "POST", "/api/click", Some(json!({"lat": 91.0, "lng": 0.0}))).await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["code"], "VALIDATION_ERROR");
    }

    #[tokio::test]
    async fn test_save_without_name() {
        let state = create_test_state();
        send(create_router(state.clone()), "POST", "/api/click", Some(json!({"lat": 1.0, "lng": 2.0}))).await;

        let (status, _) = send(
            create_router(state.clone()),
            "POST",
            "/api/selection/save",
            Some(json!({"name": "   "})),
        )
        .await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(state.session.lock().await.state().favorites.is_empty());
    }

    #[tokio::test]
    async fn test_focus_favorite() {
        let state = create_test_state();
        send(create_router(state.clone()), "POST", "/api/click", Some(json!({"lat": -18.9, "lng": -48.2}))).await;
        let (_, place) = send(
            create_router(state.clone()),
            "POST",
            "/api/selection/save",
            Some(json!({"name": "Square"})),
        )
        .await;

        let uri = format!("/api/favorites/{}/focus", place["id"].as_str().unwrap());
        let (status, body) = send(create_router(state), "POST", &uri, None).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["selection"]["name"], "Square");
        assert_eq!(body["selection_saved"], true);
        assert_eq!(body["camera"]["zoom"], 16);
    }

    #[tokio::test]
    async fn test_bad_place_id() {
        let app = create_router(create_test_state());

        let (status, _) = send(app, "POST", "/api/favorites/not-an-id/focus", None).await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_dismiss_selection() {
        let state = create_test_state();
        send(create_router(state.clone()), "POST", "/api/click", Some(json!({"lat": 1.0, "lng": 2.0}))).await;

        let (status, _) = send(create_router(state.clone()), "DELETE", "/api/selection", None).await;

        assert_eq!(status, StatusCode::NO_CONTENT);
        assert!(state.session.lock().await.state().selection.is_empty());
    }

    #[tokio::test]
    async fn test_categories_endpoint() {
        let app = create_router(create_test_state());

        let (status, body) = send(app, "GET", "/api/categories", None).await;

        assert_eq!(status, StatusCode::OK);
        let categories = body.as_array().unwrap();
        assert_eq!(categories.len(), 6);
        assert_eq!(categories[0]["id"], "general");
        assert!(categories[0]["color"].as_str().unwrap().starts_with('#'));
    }
}
