//! HTTP surface over a [`TeamStore`]: read the snapshot, or replace it whole.

use crate::store::{SharedStore, TeamStore};
use crate::{Team, TeamData};
use axum::{
    Json, Router,
    body::Bytes,
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
};
use log::{error, info};
use serde_json::{Value, json};
use std::sync::MutexGuard;

const INVALID_FORMAT: &str = "Invalid data format";
const UPDATE_FAILED: &str = "Failed to update team data";
const READ_FAILED: &str = "Failed to read team data";

pub fn router(store: SharedStore) -> Router {
    Router::new()
        .route("/api/teams", get(get_teams).put(put_teams))
        .with_state(store)
}

fn json_error(status: StatusCode, msg: &str) -> Response {
    (status, Json(json!({ "error": msg }))).into_response()
}

fn lock(store: &SharedStore) -> MutexGuard<'_, Box<dyn TeamStore>> {
    store.lock().unwrap_or_else(|e| e.into_inner())
}

async fn get_teams(State(store): State<SharedStore>) -> Response {
    let loaded = lock(&store).load_all();
    match loaded {
        Ok(teams) => (StatusCode::OK, Json(TeamData { teams })).into_response(),
        Err(e) => {
            error!("Team store read failed: {e}");
            json_error(StatusCode::INTERNAL_SERVER_ERROR, READ_FAILED)
        }
    }
}

async fn put_teams(State(store): State<SharedStore>, body: Bytes) -> Response {
    let Some(teams) = parse_teams(&body) else {
        return json_error(StatusCode::BAD_REQUEST, INVALID_FORMAT);
    };

    let saved = lock(&store).save_all(&teams);
    match saved {
        Ok(()) => {
            info!("Team store replaced with {} records", teams.len());
            (StatusCode::OK, Json(json!({ "success": true }))).into_response()
        }
        Err(e) => {
            error!("Team store update failed: {e}");
            json_error(StatusCode::INTERNAL_SERVER_ERROR, UPDATE_FAILED)
        }
    }
}

/// `None` unless the body is an object whose `teams` is an array of valid
/// team records.
fn parse_teams(body: &[u8]) -> Option<Vec<Team>> {
    let mut value: Value = serde_json::from_slice(body).ok()?;
    let Value::Array(records) = value.get_mut("teams")?.take() else {
        return None;
    };
    records
        .into_iter()
        .map(|record| serde_json::from_value::<Team>(record).ok().filter(Team::validate))
        .collect()
}
