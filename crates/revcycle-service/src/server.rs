//! HTTP server for the simulator API.
//!
//! Sessions live in the simulator's registry; every route operates on one
//! session addressed by its id.

use crate::apis::session::{self, SessionView};
use axum::{
	extract::{Path, State},
	http::StatusCode,
	response::Json,
	routing::{get, post},
	Router,
};
use revcycle_config::ApiConfig;
use revcycle_core::Simulator;
use revcycle_types::{APIError, AdvanceRequest, RenderedDocument};
use std::sync::Arc;
use tokio::net::TcpListener;
use tower::ServiceBuilder;
use tower_http::cors::CorsLayer;

/// Shared application state for the API server.
#[derive(Clone)]
pub struct AppState {
	pub simulator: Arc<Simulator>,
}

/// Builds the `/api` router over `state`.
pub fn router(state: AppState) -> Router {
	Router::new()
		.nest(
			"/api",
			Router::new()
				.route("/sessions", post(handle_create_session))
				.route(
					"/sessions/{id}",
					get(handle_get_session).delete(handle_delete_session),
				)
				.route("/sessions/{id}/advance", post(handle_advance_session))
				.route("/sessions/{id}/reset", post(handle_reset_session))
				.route("/sessions/{id}/documents/{step}", get(handle_step_documents)),
		)
		.layer(ServiceBuilder::new().layer(CorsLayer::permissive()))
		.with_state(state)
}

/// Starts the HTTP server and serves until the listener fails.
pub async fn start_server(
	api_config: ApiConfig,
	simulator: Arc<Simulator>,
) -> Result<(), Box<dyn std::error::Error>> {
	let app = router(AppState { simulator });

	let bind_address = format!("{}:{}", api_config.host, api_config.port);
	let listener = TcpListener::bind(&bind_address).await?;

	tracing::info!("Revenue cycle API server starting on {}", bind_address);

	axum::serve(listener, app).await?;

	Ok(())
}

/// Handles POST /api/sessions requests.
async fn handle_create_session(
	State(state): State<AppState>,
) -> Result<(StatusCode, Json<SessionView>), APIError> {
	match session::create_session(state.simulator.registry()).await {
		Ok(view) => Ok((StatusCode::CREATED, Json(view))),
		Err(e) => {
			tracing::warn!("Session creation failed: {}", e);
			Err(e)
		},
	}
}

/// Handles GET /api/sessions/{id} requests.
async fn handle_get_session(
	Path(id): Path<String>,
	State(state): State<AppState>,
) -> Result<Json<SessionView>, APIError> {
	match session::get_session(state.simulator.registry(), &id).await {
		Ok(view) => Ok(Json(view)),
		Err(e) => {
			tracing::warn!("Session retrieval failed: {}", e);
			Err(e)
		},
	}
}

/// Handles DELETE /api/sessions/{id} requests.
async fn handle_delete_session(
	Path(id): Path<String>,
	State(state): State<AppState>,
) -> Result<StatusCode, APIError> {
	match session::delete_session(state.simulator.registry(), &id).await {
		Ok(()) => Ok(StatusCode::NO_CONTENT),
		Err(e) => {
			tracing::warn!("Session deletion failed: {}", e);
			Err(e)
		},
	}
}

/// Handles POST /api/sessions/{id}/advance requests.
///
/// The body carries the decision label for steps that need one, e.g.
/// `{"decision": "Out of Stock"}`; other steps accept an empty object.
async fn handle_advance_session(
	Path(id): Path<String>,
	State(state): State<AppState>,
	Json(request): Json<AdvanceRequest>,
) -> Result<Json<SessionView>, APIError> {
	match session::advance_session(state.simulator.registry(), &id, request).await {
		Ok(view) => Ok(Json(view)),
		Err(e) => {
			tracing::warn!("Advance request failed: {}", e);
			Err(e)
		},
	}
}

/// Handles POST /api/sessions/{id}/reset requests.
async fn handle_reset_session(
	Path(id): Path<String>,
	State(state): State<AppState>,
) -> Result<Json<SessionView>, APIError> {
	match session::reset_session(state.simulator.registry(), &id).await {
		Ok(view) => Ok(Json(view)),
		Err(e) => {
			tracing::warn!("Reset request failed: {}", e);
			Err(e)
		},
	}
}

/// Handles GET /api/sessions/{id}/documents/{step} requests.
async fn handle_step_documents(
	Path((id, step)): Path<(String, String)>,
	State(state): State<AppState>,
) -> Result<Json<Vec<RenderedDocument>>, APIError> {
	match session::step_documents(state.simulator.registry(), &id, &step).await {
		Ok(documents) => Ok(Json(documents)),
		Err(e) => {
			tracing::warn!("Document request failed: {}", e);
			Err(e)
		},
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use axum::body::Body;
	use axum::http::Request;
	use revcycle_config::builders::ConfigBuilder;
	use revcycle_core::{SimulatorBuilder, SimulatorFactories};
	use revcycle_storage::get_all_implementations;
	use serde_json::Value;
	use tower::ServiceExt;

	fn app() -> Router {
		let factories = SimulatorFactories {
			storage_factories: get_all_implementations()
				.into_iter()
				.map(|(name, factory)| (name.to_string(), factory))
				.collect(),
		};
		let simulator = SimulatorBuilder::new(ConfigBuilder::new().build())
			.build(factories)
			.unwrap();
		router(AppState {
			simulator: Arc::new(simulator),
		})
	}

	async fn send(
		app: &Router,
		method: &str,
		uri: &str,
		body: Option<&str>,
	) -> (StatusCode, Value) {
		let request = Request::builder().method(method).uri(uri);
		let request = match body {
			Some(body) => request
				.header("content-type", "application/json")
				.body(Body::from(body.to_string()))
				.unwrap(),
			None => request.body(Body::empty()).unwrap(),
		};

		let resp = app.clone().oneshot(request).await.unwrap();
		let status = resp.status();
		let bytes = axum::body::to_bytes(resp.into_body(), usize::MAX)
			.await
			.unwrap();
		let json = if bytes.is_empty() {
			Value::Null
		} else {
			serde_json::from_slice(&bytes).unwrap()
		};
		(status, json)
	}

	async fn create(app: &Router) -> String {
		let (status, body) = send(app, "POST", "/api/sessions", None).await;
		assert_eq!(status, StatusCode::CREATED);
		body["id"].as_str().unwrap().to_string()
	}

	async fn advance(app: &Router, id: &str, decision: Option<&str>) -> (StatusCode, Value) {
		let body = match decision {
			Some(label) => serde_json::json!({ "decision": label }).to_string(),
			None => "{}".to_string(),
		};
		send(
			app,
			"POST",
			&format!("/api/sessions/{}/advance", id),
			Some(&body),
		)
		.await
	}

	#[tokio::test]
	async fn test_create_session() {
		let app = app();
		let (status, body) = send(&app, "POST", "/api/sessions", None).await;

		assert_eq!(status, StatusCode::CREATED);
		assert_eq!(body["step"]["id"], 1);
		assert_eq!(body["step"]["name"], "Inquiry");
		assert_eq!(body["step"]["requiresDecision"], false);
		assert_eq!(body["state"]["currentStep"], 1);
		assert_eq!(body["documents"].as_array().unwrap().len(), 1);
		assert_eq!(body["summary"]["totalCost"], 50_000);
	}

	#[tokio::test]
	async fn test_out_of_stock_path_over_api() {
		let app = app();
		let id = create(&app).await;

		advance(&app, &id, None).await;
		let (_, body) = advance(&app, &id, None).await;
		assert_eq!(
			body["step"]["options"],
			serde_json::json!(["Approve", "Reject"])
		);

		advance(&app, &id, Some("Approve")).await;
		let (_, body) = advance(&app, &id, Some("Out of Stock")).await;
		assert_eq!(body["step"]["id"], 5);

		let (status, body) = advance(&app, &id, Some("Available")).await;
		assert_eq!(status, StatusCode::OK);
		assert_eq!(body["step"]["id"], 7);
		assert_eq!(body["state"]["costs"]["production"], 35_000);
	}

	#[tokio::test]
	async fn test_missing_decision_is_bad_request() {
		let app = app();
		let id = create(&app).await;
		advance(&app, &id, None).await;
		advance(&app, &id, None).await;

		let (status, body) = advance(&app, &id, None).await;
		assert_eq!(status, StatusCode::BAD_REQUEST);
		assert_eq!(body["error"], "INVALID_DECISION");

		let (_, body) = send(&app, "GET", &format!("/api/sessions/{}", id), None).await;
		assert_eq!(body["step"]["id"], 3);
	}

	#[tokio::test]
	async fn test_terminal_step_is_conflict() {
		let app = app();
		let id = create(&app).await;
		for decision in [None, None, Some("Approve"), Some("In Stock"), None] {
			let (status, _) = advance(&app, &id, decision).await;
			assert_eq!(status, StatusCode::OK);
		}
		let (_, body) = advance(&app, &id, None).await;
		assert_eq!(body["step"]["id"], 10);
		assert_eq!(body["step"]["terminal"], true);

		let (status, body) = advance(&app, &id, None).await;
		assert_eq!(status, StatusCode::CONFLICT);
		assert_eq!(body["error"], "INVALID_STATE");
	}

	#[tokio::test]
	async fn test_reset_and_documents() {
		let app = app();
		let id = create(&app).await;
		advance(&app, &id, None).await;
		advance(&app, &id, None).await;
		let (_, body) = advance(&app, &id, Some("Reject")).await;
		assert_eq!(body["step"]["id"], 1);

		let (status, documents) = send(
			&app,
			"GET",
			&format!("/api/sessions/{}/documents/1", id),
			None,
		)
		.await;
		assert_eq!(status, StatusCode::OK);
		assert_eq!(documents.as_array().unwrap().len(), 2);

		let (status, body) = send(&app, "POST", &format!("/api/sessions/{}/reset", id), None).await;
		assert_eq!(status, StatusCode::OK);
		assert_eq!(body["documents"].as_array().unwrap().len(), 1);
	}

	#[tokio::test]
	async fn test_delete_session() {
		let app = app();
		let id = create(&app).await;
		let uri = format!("/api/sessions/{}", id);

		let (status, body) = send(&app, "DELETE", &uri, None).await;
		assert_eq!(status, StatusCode::NO_CONTENT);
		assert_eq!(body, Value::Null);

		let (status, body) = send(&app, "GET", &uri, None).await;
		assert_eq!(status, StatusCode::NOT_FOUND);
		assert_eq!(body["error"], "SESSION_NOT_FOUND");

		let (status, _) = send(&app, "DELETE", &uri, None).await;
		assert_eq!(status, StatusCode::NOT_FOUND);
	}

	#[tokio::test]
	async fn test_unknown_session_and_step() {
		let app = app();
		let (status, body) = send(
			&app,
			"GET",
			"/api/sessions/6f1c2a8e-3b4d-4e5f-8a9b-0c1d2e3f4a5b",
			None,
		)
		.await;
		assert_eq!(status, StatusCode::NOT_FOUND);
		assert_eq!(body["error"], "SESSION_NOT_FOUND");

		let (status, _) = send(&app, "GET", "/api/sessions/not-a-uuid", None).await;
		assert_eq!(status, StatusCode::BAD_REQUEST);

		let id = create(&app).await;
		let (status, body) = send(
			&app,
			"GET",
			&format!("/api/sessions/{}/documents/11", id),
			None,
		)
		.await;
		assert_eq!(status, StatusCode::NOT_FOUND);
		assert_eq!(body["error"], "STEP_NOT_FOUND");
	}
}
