use axum::{Json, extract::State};
use yurline_maps::MapLink;

use super::AppState;

/// GET /api/office-map - Office address and the link to open it on a map
pub async fn office_map(State(app_state): State<AppState>) -> Json<MapLink> {
    Json(app_state.maps.link(&app_state.config.maps.address))
}
