//! HTTP API endpoint handlers.

use std::sync::Arc;

use axum::{Json, extract::State, http::StatusCode};

use crate::{
    infrastructure::dto::http::{GameListDto, HealthDto, RoomSummaryDto, UnhealthyDto},
    time::get_unix_timestamp,
    ui::state::AppState,
};

/// Health check endpoint
///
/// Verifies store reachability; a relay that cannot reach its store
/// cannot admit anyone, so that is reported as unhealthy.
pub async fn health_check(
    State(state): State<Arc<AppState>>,
) -> Result<Json<HealthDto>, (StatusCode, Json<UnhealthyDto>)> {
    if let Err(e) = state.store.ping().await {
        tracing::error!("Health check failed: {}", e);
        return Err((
            StatusCode::SERVICE_UNAVAILABLE,
            Json(UnhealthyDto {
                status: "unhealthy".to_string(),
                store: state.backend.to_string(),
                error: e.to_string(),
                timestamp: get_unix_timestamp(),
            }),
        ));
    }

    let active_games = state.store.count_rooms().await.unwrap_or(0);
    let active_players = state.store.count_sessions().await.unwrap_or(0);

    Ok(Json(HealthDto {
        status: "ok".to_string(),
        store: state.backend.to_string(),
        active_games,
        active_players,
        timestamp: get_unix_timestamp(),
    }))
}

/// Get list of active games
pub async fn get_games(
    State(state): State<Arc<AppState>>,
) -> Result<Json<GameListDto>, StatusCode> {
    let rooms = state.store.list_rooms().await.map_err(|e| {
        tracing::error!("Failed to list rooms: {}", e);
        StatusCode::INTERNAL_SERVER_ERROR
    })?;

    let games: Vec<RoomSummaryDto> = rooms.iter().map(RoomSummaryDto::from).collect();
    Ok(Json(GameListDto {
        total_games: games.len(),
        games,
    }))
}
