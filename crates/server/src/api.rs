//! REST surface for alert management, alongside the chat wizard.

use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use jobwatch_core::domain::alert::{Alert, AlertId, FilterDraft, UserId};
use jobwatch_core::errors::{ApplicationError, InterfaceError};
use jobwatch_core::schema::{self, FixedPriceBucket};
use jobwatch_core::wizard::parse_hourly_range;
use jobwatch_db::AlertRepository;
use uuid::Uuid;

#[derive(Clone)]
pub struct ApiState {
    repository: Arc<dyn AlertRepository>,
}

#[derive(Debug, Deserialize)]
pub struct CreateAlertRequest {
    // Optional at the serde layer so an absent key is a 400, not a 422
    // extractor rejection.
    #[serde(default)]
    pub user_id: Option<String>,
    #[serde(default)]
    pub filters: FilterDraft,
}

#[derive(Debug, Serialize)]
pub struct DeleteAlertResponse {
    pub deleted: bool,
}

#[derive(Debug, Serialize)]
pub struct CategoryEntry {
    pub id: &'static str,
    pub label: &'static str,
}

#[derive(Debug, Serialize)]
pub struct ApiError {
    pub error: String,
}

pub fn router(repository: Arc<dyn AlertRepository>) -> Router {
    Router::new()
        .route("/api/v1/alerts", post(create_alert))
        // GET reads the id as a user id, DELETE as an alert id.
        .route("/api/v1/alerts/{id}", get(list_alerts).delete(delete_alert))
        .route("/api/v1/categories", get(list_categories))
        .with_state(ApiState { repository })
}

pub async fn spawn(
    bind_address: &str,
    port: u16,
    repository: Arc<dyn AlertRepository>,
) -> std::io::Result<()> {
    let address = format!("{bind_address}:{port}");
    let listener = tokio::net::TcpListener::bind(&address).await?;

    info!(
        event_name = "system.api.start",
        correlation_id = "bootstrap",
        bind_address = %address,
        "alert api started"
    );

    tokio::spawn(async move {
        if let Err(error) = axum::serve(listener, router(repository)).await {
            tracing::error!(
                event_name = "system.api.error",
                correlation_id = "bootstrap",
                error = %error,
                "alert api server terminated unexpectedly"
            );
        }
    });

    Ok(())
}

async fn create_alert(
    State(state): State<ApiState>,
    Json(request): Json<CreateAlertRequest>,
) -> Result<(StatusCode, Json<Alert>), (StatusCode, Json<ApiError>)> {
    let user_id = request.user_id.unwrap_or_default();
    if user_id.trim().is_empty() {
        return Err(bad_request("user_id is required"));
    }
    validate_filters(&request.filters).map_err(|message| bad_request(&message))?;

    let user_id = UserId(user_id);
    let alert =
        state.repository.create(&user_id, request.filters).await.map_err(store_unavailable)?;

    info!(
        event_name = "api.alert.created",
        user_id = %alert.user_id.0,
        alert_id = %alert.id.0,
        "alert created over rest"
    );
    Ok((StatusCode::CREATED, Json(alert)))
}

async fn list_alerts(
    State(state): State<ApiState>,
    Path(user_id): Path<String>,
) -> Result<Json<Vec<Alert>>, (StatusCode, Json<ApiError>)> {
    let alerts = state
        .repository
        .list_by_user(&UserId(user_id))
        .await
        .map_err(store_unavailable)?;
    Ok(Json(alerts))
}

async fn delete_alert(
    State(state): State<ApiState>,
    Path(alert_id): Path<String>,
) -> Result<Json<DeleteAlertResponse>, (StatusCode, Json<ApiError>)> {
    let deleted = state
        .repository
        .delete_by_id(&AlertId(alert_id.clone()))
        .await
        .map_err(store_unavailable)?;

    info!(event_name = "api.alert.deleted", alert_id = %alert_id, deleted, "alert delete processed");
    // Idempotent: an already-absent id still answers 200.
    Ok(Json(DeleteAlertResponse { deleted }))
}

async fn list_categories() -> Json<Vec<CategoryEntry>> {
    Json(
        schema::CATEGORIES
            .iter()
            .map(|&(id, label)| CategoryEntry { id, label })
            .collect(),
    )
}

fn validate_filters(filters: &FilterDraft) -> Result<(), String> {
    if let Some(category) = &filters.category {
        if !schema::is_known_category(category) {
            return Err(format!("unknown category id `{category}`"));
        }
    }

    if let Some(amount) = &filters.amount_range {
        let fixed = FixedPriceBucket::parse_wire(amount).is_some();
        let hourly = parse_hourly_range(amount).is_ok();
        if !fixed && !hourly {
            return Err(format!("invalid amount range `{amount}`"));
        }
    }

    Ok(())
}

fn bad_request(message: &str) -> (StatusCode, Json<ApiError>) {
    (StatusCode::BAD_REQUEST, Json(ApiError { error: message.to_owned() }))
}

fn store_unavailable(error: jobwatch_db::RepositoryError) -> (StatusCode, Json<ApiError>) {
    let correlation_id = Uuid::new_v4().to_string();
    warn!(
        event_name = "api.alert.store_failure",
        correlation_id = %correlation_id,
        error = %error,
        "alert store failure"
    );

    let interface = ApplicationError::Persistence(error.to_string()).into_interface(correlation_id);
    (status_for(&interface), Json(ApiError { error: interface.user_message().to_owned() }))
}

fn status_for(error: &InterfaceError) -> StatusCode {
    match error {
        InterfaceError::BadRequest { .. } => StatusCode::BAD_REQUEST,
        InterfaceError::ServiceUnavailable { .. } => StatusCode::SERVICE_UNAVAILABLE,
        InterfaceError::Internal { .. } => StatusCode::INTERNAL_SERVER_ERROR,
    }
}
