//! HTTP front door: decodes requests into dispatcher calls and encodes the record.

use std::future::Future;
use std::sync::Arc;

use axum::{
    Json, Router,
    body::Bytes,
    extract::{Path, State},
    http::StatusCode,
    routing::{get, post},
};
use ssx_core::{ActivityPayload, Dispatcher, JobRecord};
use tokio::net::TcpListener;
use tracing::{debug, warn};

pub const ACTIVITIES_PATH: &str = "/rest/v0/activities";
pub const ACTIVITY_STATUS_PATH: &str = "/rest/v0/activities/{id}";

pub fn router(dispatcher: Arc<Dispatcher>) -> Router {
    Router::new()
        .route(ACTIVITIES_PATH, post(submit_activity))
        .route(ACTIVITY_STATUS_PATH, get(activity_status))
        .with_state(dispatcher)
}

/// Serve until `shutdown` resolves.
pub async fn serve(
    listener: TcpListener,
    dispatcher: Arc<Dispatcher>,
    shutdown: impl Future<Output = ()> + Send + 'static,
) -> anyhow::Result<()> {
    axum::serve(listener, router(dispatcher))
        .with_graceful_shutdown(shutdown)
        .await?;
    Ok(())
}

/// Always 201; an undecodable body is submitted as an empty payload.
async fn submit_activity(
    State(dispatcher): State<Arc<Dispatcher>>,
    body: Bytes,
) -> (StatusCode, Json<JobRecord>) {
    let payload = serde_json::from_slice::<ActivityPayload>(&body).unwrap_or_else(|e| {
        warn!(error = %e, "unable to parse activity payload");
        ActivityPayload::default()
    });

    (StatusCode::CREATED, Json(dispatcher.submit_activity(&payload)))
}

async fn activity_status(
    State(dispatcher): State<Arc<Dispatcher>>,
    Path(id): Path<String>,
) -> (StatusCode, Json<JobRecord>) {
    match dispatcher.status(&id) {
        Ok(record) => (StatusCode::OK, Json(record)),
        Err(e) => {
            debug!(error = %e, "status lookup failed");
            (StatusCode::NOT_FOUND, Json(JobRecord::blank()))
        }
    }
}
