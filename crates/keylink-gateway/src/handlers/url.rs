use crate::error::{AppError, Result};
use crate::model::{CreateUrlRequest, UrlInfo};
use crate::state::AppState;
use axum::extract::rejection::JsonRejection;
use axum::extract::{OriginalUri, Path, State};
use axum::response::Redirect;
use axum::Json;
use keylink_core::ShortKey;

pub async fn create_url_handler(
    State(state): State<AppState>,
    OriginalUri(uri): OriginalUri,
    payload: std::result::Result<Json<CreateUrlRequest>, JsonRejection>,
) -> Result<Json<UrlInfo>> {
    let Json(request) = payload.map_err(|rejection| AppError::BadRequest(rejection.body_text()))?;

    let record = state
        .manager()
        .create(&request.target_url)
        .await
        .map_err(|e| AppError::from_manager(e, state.requested_url(&uri)))?;

    Ok(Json(UrlInfo::from_record(record, state.base_url())))
}

/// Sends the client on to the target of an active short key with a 307.
pub async fn redirect_handler(
    Path(key): Path<String>,
    State(state): State<AppState>,
    OriginalUri(uri): OriginalUri,
) -> Result<Redirect> {
    let record = state
        .manager()
        .resolve(&ShortKey::new(key))
        .await
        .map_err(|e| AppError::from_manager(e, state.requested_url(&uri)))?;

    Ok(Redirect::temporary(&record.target_url))
}
