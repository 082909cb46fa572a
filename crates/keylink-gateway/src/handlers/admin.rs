use crate::error::{AppError, Result};
use crate::model::{DetailResponse, UrlInfo};
use crate::state::AppState;
use axum::extract::{OriginalUri, Path, State};
use axum::Json;
use keylink_core::SecretKey;

pub async fn get_url_info_handler(
    Path(secret_key): Path<String>,
    State(state): State<AppState>,
    OriginalUri(uri): OriginalUri,
) -> Result<Json<UrlInfo>> {
    let record = state
        .manager()
        .get_by_secret(&SecretKey::new(secret_key))
        .await
        .map_err(|e| AppError::from_manager(e, state.requested_url(&uri)))?;

    Ok(Json(UrlInfo::from_record(record, state.base_url())))
}

pub async fn delete_url_handler(
    Path(secret_key): Path<String>,
    State(state): State<AppState>,
    OriginalUri(uri): OriginalUri,
) -> Result<Json<DetailResponse>> {
    let record = state
        .manager()
        .deactivate(&SecretKey::new(secret_key))
        .await
        .map_err(|e| AppError::from_manager(e, state.requested_url(&uri)))?;

    Ok(Json(DetailResponse {
        detail: format!(
            "Successfully deleted shortened URL for '{}'",
            record.target_url
        ),
    }))
}
