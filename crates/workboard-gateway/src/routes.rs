//! API route handlers for the gateway.

use axum::{Json, body::Bytes, extract::State, http::StatusCode};
use serde_json::{Value, json};
use std::sync::Arc;

use workboard_core::error::WorkboardError;
use workboard_store::{Collection, StatsReport};

use super::server::AppState;
use super::sync::SyncPayload;

type ApiResponse = (StatusCode, Json<Value>);

fn now() -> chrono::NaiveDateTime {
    chrono::Local::now().naive_local()
}

fn current_stats(state: &AppState) -> StatsReport {
    let tasks = state.store.read(Collection::Tasks);
    let discoveries = state.store.read(Collection::Discoveries);
    StatsReport::compute(&tasks, &discoveries, now())
}

fn status_for(err: &WorkboardError) -> StatusCode {
    match err {
        WorkboardError::InvalidPayload(_) | WorkboardError::Json(_) => StatusCode::BAD_REQUEST,
        _ => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

/// Service status page: stats plus a directory of endpoints.
pub async fn index(State(state): State<Arc<AppState>>) -> Json<Value> {
    Json(json!({
        "status": "running",
        "message": "Workboard tasks & discoveries server",
        "version": env!("CARGO_PKG_VERSION"),
        "uptime_secs": state.start_time.elapsed().as_secs(),
        "stats": current_stats(&state),
        "endpoints": {
            "sync": "/api/sync",
            "load": "/api/load",
            "tasks": "/api/tasks",
            "discoveries": "/api/discoveries",
            "stats": "/api/stats",
            "backup": "/api/backup",
        }
    }))
}

/// Bulk replace-or-skip of both collections from frontend localStorage data.
pub async fn sync_data(State(state): State<Arc<AppState>>, body: Bytes) -> ApiResponse {
    let result = SyncPayload::from_slice(&body)
        .and_then(|payload| payload.decode())
        .and_then(|plan| plan.apply(&state.store));

    match result {
        Ok(synced) => {
            tracing::info!(
                "🔄 Synced {} task(s), {} discovery(ies)",
                synced.tasks,
                synced.discoveries
            );
            (
                StatusCode::OK,
                Json(json!({
                    "status": "success",
                    "message": "Data synced",
                    "synced": synced,
                })),
            )
        }
        Err(e) => {
            tracing::warn!("⚠️ Sync failed: {e}");
            (
                status_for(&e),
                Json(json!({
                    "status": "error",
                    "message": format!("Sync failed: {e}"),
                })),
            )
        }
    }
}

fn read_collection(state: &AppState, collection: Collection) -> Json<Value> {
    Json(Value::Array(state.store.read(collection)))
}

fn replace_collection(state: &AppState, collection: Collection, body: &[u8]) -> ApiResponse {
    let records = match serde_json::from_slice::<Value>(body) {
        Ok(Value::Array(records)) => records,
        Ok(_) => {
            return (
                StatusCode::BAD_REQUEST,
                Json(json!({"error": "Invalid data format: expected a JSON array"})),
            );
        }
        Err(e) => {
            return (
                StatusCode::BAD_REQUEST,
                Json(json!({"error": format!("Invalid JSON: {e}")})),
            );
        }
    };

    match state.store.write(collection, &records) {
        Ok(_) => (
            StatusCode::OK,
            Json(json!({"status": "success", "count": records.len()})),
        ),
        Err(e) => {
            tracing::error!("❌ Failed to write {collection}: {e}");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({"error": e.to_string()})),
            )
        }
    }
}

/// List stored tasks.
pub async fn get_tasks(State(state): State<Arc<AppState>>) -> Json<Value> {
    read_collection(&state, Collection::Tasks)
}

/// Replace all tasks.
pub async fn update_tasks(State(state): State<Arc<AppState>>, body: Bytes) -> ApiResponse {
    replace_collection(&state, Collection::Tasks, &body)
}

/// List stored discoveries.
pub async fn get_discoveries(State(state): State<Arc<AppState>>) -> Json<Value> {
    read_collection(&state, Collection::Discoveries)
}

/// Replace all discoveries.
pub async fn update_discoveries(State(state): State<Arc<AppState>>, body: Bytes) -> ApiResponse {
    replace_collection(&state, Collection::Discoveries, &body)
}

/// Both collections, once as localStorage strings and once parsed.
pub async fn load_data(State(state): State<Arc<AppState>>) -> ApiResponse {
    let tasks = state.store.read(Collection::Tasks);
    let discoveries = state.store.read(Collection::Discoveries);

    let encoded = serde_json::to_string(&tasks).and_then(|t| {
        serde_json::to_string(&discoveries).map(|d| (t, d))
    });
    match encoded {
        Ok((tasks_json, discoveries_json)) => {
            let mut data = serde_json::Map::new();
            data.insert(Collection::Tasks.storage_key().into(), tasks_json.into());
            data.insert(
                Collection::Discoveries.storage_key().into(),
                discoveries_json.into(),
            );
            (
                StatusCode::OK,
                Json(json!({
                    "status": "success",
                    "data": data,
                    "parsed": {
                        "tasks": tasks,
                        "discoveries": discoveries,
                    }
                })),
            )
        }
        Err(e) => (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(json!({
                "status": "error",
                "message": format!("Failed to load data: {e}"),
            })),
        ),
    }
}

/// Aggregate counters.
pub async fn get_stats(State(state): State<Arc<AppState>>) -> Json<StatsReport> {
    Json(current_stats(&state))
}

/// Write a snapshot of both collections into the backup directory.
pub async fn create_backup(State(state): State<Arc<AppState>>) -> ApiResponse {
    match state.store.create_backup(now()) {
        Ok(snapshot) => (
            StatusCode::OK,
            Json(json!({
                "status": "success",
                "filename": snapshot.filename,
                "tasks": snapshot.tasks,
                "discoveries": snapshot.discoveries,
            })),
        ),
        Err(e) => {
            tracing::error!("❌ Backup failed: {e}");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({
                    "status": "error",
                    "message": format!("Backup failed: {e}"),
                })),
            )
        }
    }
}
