//! JSON API for listing, uploading and deleting assets.
//!
//! The same three handlers serve both asset kinds; [`asset_routes`] binds
//! them to one [`AssetKind`].
//!
//! ## Endpoints (images shown, videos identical under `/api/videos`)
//!
//! - `GET /api/images` - Filenames with an image extension
//! - `POST /api/images` - Multipart upload, file in field `image`
//! - `DELETE /api/images/{filename}` - Remove a file
//!
//! # Example
//!
//! ```bash
//! curl -X POST http://localhost:3000/api/images -F "image=@cat.png"
//! curl http://localhost:3000/api/images
//! curl -X DELETE http://localhost:3000/api/images/cat.png
//! ```

use axum::{
    extract::{Multipart, Path, State},
    routing::{delete, get},
    Json, Router,
};
use tracing::info;

use crate::error::{AppError, Result};
use crate::models::{AssetKind, AssetName, FilenameResponse};
use crate::state::AppState;

/// List stored assets
///
/// GET /api/{images,videos}
///
/// Only names with an allow-listed extension are returned, in the order the
/// directory yields them.
async fn list_assets(state: AppState, kind: AssetKind) -> Result<Json<Vec<String>>> {
    let names = state.store(kind).list().await?;
    Ok(Json(names))
}

/// Upload an asset via multipart form
///
/// POST /api/{images,videos}
///
/// The first file part in the kind's form field is streamed to disk under its
/// original filename, replacing any file of the same name. Other parts are
/// ignored. The file's extension and contents are not checked.
async fn upload_asset(
    state: AppState,
    kind: AssetKind,
    mut multipart: Multipart,
) -> Result<Json<FilenameResponse>> {
    let store = state.store(kind);

    while let Some(mut field) = multipart.next_field().await? {
        if field.name() != Some(kind.form_field()) {
            continue;
        }

        // A plain text value in the file field does not count as a file
        let Some(file_name) = field.file_name() else {
            continue;
        };
        let name = AssetName::parse(file_name)?;

        let mut writer = store.create(&name).await?;
        loop {
            match field.chunk().await {
                Ok(Some(chunk)) => {
                    if let Err(e) = writer.write_chunk(&chunk).await {
                        writer.discard().await;
                        return Err(e);
                    }
                }
                Ok(None) => break,
                Err(e) => {
                    writer.discard().await;
                    return Err(e.into());
                }
            }
        }
        let size = writer.finish().await?;

        info!(kind = %kind, filename = %name, size, "Stored upload");

        return Ok(Json(name.into()));
    }

    Err(AppError::missing_file(kind))
}

/// Delete an asset
///
/// DELETE /api/{images,videos}/{filename}
async fn delete_asset(
    state: AppState,
    kind: AssetKind,
    filename: String,
) -> Result<Json<FilenameResponse>> {
    let name = AssetName::parse(&filename)?;

    state.store(kind).delete(&name).await?;

    info!(kind = %kind, filename = %name, "Deleted asset");

    Ok(Json(name.into()))
}

/// Create the API routes for one asset kind
pub fn asset_routes(kind: AssetKind) -> Router<AppState> {
    Router::new()
        .route(
            "/",
            get(move |State(state): State<AppState>| list_assets(state, kind)).post(
                move |State(state): State<AppState>, multipart: Multipart| {
                    upload_asset(state, kind, multipart)
                },
            ),
        )
        .route(
            "/{filename}",
            delete(
                move |State(state): State<AppState>, Path(filename): Path<String>| {
                    delete_asset(state, kind, filename)
                },
            ),
        )
}
