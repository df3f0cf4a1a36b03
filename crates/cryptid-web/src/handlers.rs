//! REST endpoint handlers for creatures and explorers.
//!
//! Both resources are open: no session is required. Bodies are validated
//! against the record's field rules before reaching the service.
//!
//! # Endpoints
//!
//! | Method | Path | Description |
//! |--------|------|-------------|
//! | `GET` | `/creature` | List all creatures |
//! | `GET` | `/creature/{name}` | Get single creature |
//! | `POST` | `/creature` | Create a creature (201) |
//! | `PATCH` | `/creature/{name}` | Replace a creature |
//! | `DELETE` | `/creature/{name}` | Delete a creature |
//! | `GET` | `/explorer` | List all explorers |
//! | `GET` | `/explorer/{name}` | Get single explorer |
//! | `POST` | `/explorer` | Create an explorer (201) |
//! | `PATCH` | `/explorer/?name=..` | Replace an explorer |
//! | `DELETE` | `/explorer/{name}` | Delete an explorer (204) |

use std::sync::Arc;

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use cryptid_types::{Creature, Explorer};
use validator::Validate;

use crate::error::ApiError;
use crate::extract::{JsonBody, QueryParams};
use crate::state::AppState;

/// Query parameters for `PATCH /explorer/`.
#[derive(Debug, serde::Deserialize)]
pub struct NameQuery {
    /// Key of the explorer to replace.
    pub name: String,
}

/// Run field validation on a request body.
pub(crate) fn validated<T: Validate>(body: T) -> Result<T, ApiError> {
    body.validate()?;
    Ok(body)
}

// ---------------------------------------------------------------------------
// /creature
// ---------------------------------------------------------------------------

/// List every creature.
pub async fn list_creatures(
    State(state): State<Arc<AppState>>,
) -> Result<Json<Vec<Creature>>, ApiError> {
    Ok(Json(state.creatures.get_all().await?))
}

/// Fetch one creature by name.
pub async fn get_creature(
    State(state): State<Arc<AppState>>,
    Path(name): Path<String>,
) -> Result<Json<Creature>, ApiError> {
    Ok(Json(state.creatures.get_one(&name).await?))
}

/// Create a creature. 409 if the name is taken.
pub async fn create_creature(
    State(state): State<Arc<AppState>>,
    JsonBody(creature): JsonBody<Creature>,
) -> Result<(StatusCode, Json<Creature>), ApiError> {
    let creature = validated(creature)?;
    let created = state.creatures.create(&creature).await?;
    Ok((StatusCode::CREATED, Json(created)))
}

/// Replace every field of a creature, possibly renaming it.
pub async fn modify_creature(
    State(state): State<Arc<AppState>>,
    Path(name): Path<String>,
    JsonBody(creature): JsonBody<Creature>,
) -> Result<Json<Creature>, ApiError> {
    let creature = validated(creature)?;
    Ok(Json(state.creatures.modify(&name, &creature).await?))
}

/// Delete a creature. Responds `null`.
pub async fn delete_creature(
    State(state): State<Arc<AppState>>,
    Path(name): Path<String>,
) -> Result<Json<()>, ApiError> {
    state.creatures.delete(&name).await?;
    Ok(Json(()))
}

// ---------------------------------------------------------------------------
// /explorer
// ---------------------------------------------------------------------------

/// List every explorer.
pub async fn list_explorers(
    State(state): State<Arc<AppState>>,
) -> Result<Json<Vec<Explorer>>, ApiError> {
    Ok(Json(state.explorers.get_all().await?))
}

/// Fetch one explorer by name.
pub async fn get_explorer(
    State(state): State<Arc<AppState>>,
    Path(name): Path<String>,
) -> Result<Json<Explorer>, ApiError> {
    Ok(Json(state.explorers.get_one(&name).await?))
}

/// Create an explorer. 409 if the name is taken.
pub async fn create_explorer(
    State(state): State<Arc<AppState>>,
    JsonBody(explorer): JsonBody<Explorer>,
) -> Result<(StatusCode, Json<Explorer>), ApiError> {
    let explorer = validated(explorer)?;
    let created = state.explorers.create(&explorer).await?;
    Ok((StatusCode::CREATED, Json(created)))
}

/// Replace the explorer named by the `name` query parameter.
pub async fn modify_explorer(
    State(state): State<Arc<AppState>>,
    QueryParams(query): QueryParams<NameQuery>,
    JsonBody(explorer): JsonBody<Explorer>,
) -> Result<Json<Explorer>, ApiError> {
    let explorer = validated(explorer)?;
    Ok(Json(state.explorers.modify(&query.name, &explorer).await?))
}

/// Delete an explorer. Responds 204.
pub async fn delete_explorer(
    State(state): State<Arc<AppState>>,
    Path(name): Path<String>,
) -> Result<StatusCode, ApiError> {
    state.explorers.delete(&name).await?;
    Ok(StatusCode::NO_CONTENT)
}
