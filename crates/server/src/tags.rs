//! Tags API endpoints.

use api_types::{
    Kind,
    tag::{TagCreated, TagNew, TagUpdate, TagView},
};
use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use chrono::Utc;
use engine::TagKind;
use uuid::Uuid;

use crate::{ServerError, server::ServerState};

fn tag_kind(kind: Kind) -> TagKind {
    match kind {
        Kind::Income => TagKind::Income,
        Kind::Expense => TagKind::Expense,
    }
}

fn api_kind(kind: TagKind) -> Kind {
    match kind {
        TagKind::Income => Kind::Income,
        TagKind::Expense => Kind::Expense,
    }
}

pub async fn create(
    State(state): State<ServerState>,
    Json(payload): Json<TagNew>,
) -> Result<(StatusCode, Json<TagCreated>), ServerError> {
    let id = state
        .engine
        .new_tag(
            &payload.name,
            tag_kind(payload.kind),
            &payload.icon,
            &payload.text_color,
            &payload.bg_color,
            payload.spend_limit,
            Utc::now(),
        )
        .await?;
    Ok((StatusCode::CREATED, Json(TagCreated { id })))
}

pub async fn list(State(state): State<ServerState>) -> Result<Json<Vec<TagView>>, ServerError> {
    let tags = state.engine.list_tags().await?;
    let mut views = Vec::with_capacity(tags.len());
    for tag in tags {
        let spent = state.engine.tag_spent(tag.id).await?;
        views.push(TagView {
            id: tag.id,
            name: tag.name,
            kind: api_kind(tag.kind),
            icon: tag.icon,
            text_color: tag.text_color,
            bg_color: tag.bg_color,
            spend_limit: tag.spend_limit,
            spent,
        });
    }
    Ok(Json(views))
}

pub async fn update(
    State(state): State<ServerState>,
    Path(id): Path<Uuid>,
    Json(payload): Json<TagUpdate>,
) -> Result<StatusCode, ServerError> {
    state
        .engine
        .update_tag(
            id,
            payload.kind.map(tag_kind),
            engine::TagUpdate {
                name: payload.name,
                icon: payload.icon,
                text_color: payload.text_color,
                bg_color: payload.bg_color,
                spend_limit: payload.spend_limit,
            },
        )
        .await?;
    Ok(StatusCode::OK)
}

pub async fn delete(
    State(state): State<ServerState>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, ServerError> {
    state.engine.delete_tag(id).await?;
    Ok(StatusCode::NO_CONTENT)
}
