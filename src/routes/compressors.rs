//! CRUD endpoints for the compressor registry.
//!
//! Sibling module in the `routes` directory (EMBP): the handlers and their
//! query types stay internal, `mod.rs` only sees the subrouter. Identity is
//! the application-level `id_compressor`; the document id only travels in
//! responses.

use axum::{
    extract::Path, extract::Query, extract::State, http::StatusCode, response::IntoResponse,
    routing::get, routing::post, Json, Router,
};
use serde::Deserialize;
use serde_json::json;
use tracing::{info, warn};

use super::AppState;
use crate::error::{ApiError, ApiResult};
use crate::models::{CompressorUpdate, NewCompressor};
use crate::store;

// ---

pub fn router() -> Router<AppState> {
    // ---
    Router::new()
        .route("/compressores", post(create).get(list))
        .route(
            "/compressores/{id_compressor}",
            get(fetch).put(update).delete(remove),
        )
}

async fn create(
    State((pool, _)): State<AppState>,
    Json(body): Json<NewCompressor>,
) -> ApiResult<impl IntoResponse> {
    // ---
    info!("POST /compressores - registering compressor {}", body.compressor_id);

    body.validate().map_err(ApiError::BadRequest)?;

    // Uniqueness lives here, not in the schema: check-then-insert.
    if store::compressor_exists(&pool, body.compressor_id).await? {
        warn!("compressor {} already registered", body.compressor_id);
        return Err(ApiError::BadRequest(format!(
            "Já existe um compressor com ID '{}'",
            body.compressor_id
        )));
    }

    let compressor = store::insert_compressor(&pool, &body).await?;
    info!(
        "compressor {} registered (doc {})",
        compressor.compressor_id, compressor.doc_id
    );

    Ok((
        StatusCode::CREATED,
        Json(json!({
            "status": "sucesso",
            "message": "Compressor cadastrado com sucesso",
            "firestore_id": compressor.doc_id,
            "id_compressor": compressor.compressor_id,
            "data_cadastro": compressor.registered_at,
        })),
    ))
}

/// Query parameters for `GET /compressores`.
#[derive(Debug, Deserialize)]
struct ListQuery {
    ativo_apenas: Option<bool>,
    limit: Option<i64>,
}

async fn list(
    State((pool, _)): State<AppState>,
    Query(params): Query<ListQuery>,
) -> ApiResult<impl IntoResponse> {
    // ---
    let limit = super::validate_limit(params.limit)?;
    info!(
        "GET /compressores (ativo_apenas={:?}, limit={})",
        params.ativo_apenas, limit
    );

    let compressors = store::list_compressors(&pool, params.ativo_apenas, limit).await?;
    info!("found {} compressors", compressors.len());

    Ok(Json(json!({
        "total": compressors.len(),
        "compressores": compressors,
    })))
}

async fn fetch(
    State((pool, _)): State<AppState>,
    Path(id_compressor): Path<i64>,
) -> ApiResult<impl IntoResponse> {
    // ---
    info!("GET /compressores/{id_compressor}");

    let Some(compressor) = store::find_compressor(&pool, id_compressor).await? else {
        warn!("compressor {id_compressor} not found");
        return Err(ApiError::compressor_not_found(id_compressor));
    };

    Ok(Json(json!({ "compressor": compressor })))
}

async fn update(
    State((pool, _)): State<AppState>,
    Path(id_compressor): Path<i64>,
    Json(body): Json<CompressorUpdate>,
) -> ApiResult<impl IntoResponse> {
    // ---
    info!("PUT /compressores/{id_compressor}");

    body.validate().map_err(ApiError::BadRequest)?;

    if !store::compressor_exists(&pool, id_compressor).await? {
        warn!("compressor {id_compressor} not found for update");
        return Err(ApiError::compressor_not_found(id_compressor));
    }

    if body.is_empty() {
        warn!("update for compressor {id_compressor} carried no fields");
        return Err(ApiError::BadRequest(
            "Nenhum campo válido fornecido para atualização".into(),
        ));
    }

    let updated = store::update_compressor(&pool, id_compressor, &body)
        .await?
        .ok_or_else(|| ApiError::compressor_not_found(id_compressor))?;
    info!("compressor {id_compressor} updated");

    Ok(Json(json!({
        "status": "sucesso",
        "message": "Compressor atualizado com sucesso",
        "compressor": updated,
    })))
}

async fn remove(
    State((pool, _)): State<AppState>,
    Path(id_compressor): Path<i64>,
) -> ApiResult<impl IntoResponse> {
    // ---
    info!("DELETE /compressores/{id_compressor}");

    if !store::delete_compressor(&pool, id_compressor).await? {
        warn!("compressor {id_compressor} not found for deletion");
        return Err(ApiError::compressor_not_found(id_compressor));
    }

    info!("compressor {id_compressor} deleted");

    Ok(Json(json!({
        "status": "sucesso",
        "message": format!("Compressor '{id_compressor}' excluído com sucesso"),
    })))
}
