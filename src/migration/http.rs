//! HTTP trigger for the duty-roster migration.

use std::net::SocketAddr;
use std::sync::Arc;

use axum::extract::State;
use axum::http::StatusCode;
use axum::routing::post;
use axum::{Json, Router};
use serde::{Deserialize, Serialize};

use super::{MigrationOutcome, MigrationRunner};

pub const DUTY_ROSTER_ROUTE: &str = "/migrations/duty-roster";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MigrationStatus {
    Applied,
    AlreadyExists,
    Error,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MigrationResponse {
    pub status: MigrationStatus,
    pub message: String,
}

pub fn migration_router(runner: MigrationRunner) -> Router {
    Router::new()
        .route(DUTY_ROSTER_ROUTE, post(run_duty_roster))
        .with_state(Arc::new(runner))
}

/// Bind `addr` and serve the trigger until the process exits.
pub async fn serve(addr: SocketAddr, runner: MigrationRunner) -> std::io::Result<()> {
    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!(addr = %listener.local_addr()?, "migration trigger listening");
    axum::serve(listener, migration_router(runner)).await
}

async fn run_duty_roster(
    State(runner): State<Arc<MigrationRunner>>,
) -> (StatusCode, Json<MigrationResponse>) {
    let result = tokio::task::spawn_blocking(move || runner.run()).await;

    let (status, response) = match result {
        Ok(Ok(outcome)) => {
            let status = match outcome {
                MigrationOutcome::Applied => MigrationStatus::Applied,
                MigrationOutcome::AlreadyExists(_) => MigrationStatus::AlreadyExists,
            };
            (
                StatusCode::OK,
                MigrationResponse {
                    status,
                    message: outcome.message(),
                },
            )
        }
        Ok(Err(e)) => (
            StatusCode::INTERNAL_SERVER_ERROR,
            MigrationResponse {
                status: MigrationStatus::Error,
                message: e.to_string(),
            },
        ),
        Err(join) => {
            tracing::error!(error = %join, "migration task aborted");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                MigrationResponse {
                    status: MigrationStatus::Error,
                    message: format!("Migration task failed: {join}"),
                },
            )
        }
    };
    (status, Json(response))
}
