use std::collections::HashMap;

use axum::extract::{Multipart, Path, Query, State};
use axum::response::Response;
use axum::routing::{get, post};
use axum::{Form, Json, Router};

use docdesk::db::document_repo::{DocumentListItem, DocumentRow};
use docdesk::forms::{CreateDocumentInput, UpdateDocumentInput, VerifyDocumentInput};
use docdesk::VerificationOutcome;

use super::{created, deleted, form_data, read_multipart, ListQuery, Page};
use crate::error::AppError;
use crate::state::AppState;

pub(super) fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list).post(create))
        .route("/:id", get(show).post(update).delete(remove))
        .route("/:id/verify", post(verify))
}

async fn list(
    State(state): State<AppState>,
    Query(params): Query<ListQuery>,
) -> Result<Json<Page<DocumentListItem>>, AppError> {
    state
        .run(move |dashboard| {
            Ok(Page {
                items: dashboard.documents_page(&params.query, params.page)?,
                total_pages: dashboard.document_pages(&params.query)?,
            })
        })
        .await
        .map(Json)
}

async fn create(State(state): State<AppState>, multipart: Multipart) -> Result<Response, AppError> {
    let policy = &state.dashboard().config().uploads;
    let form = read_multipart(multipart, policy, "Create Document").await?;
    let input = CreateDocumentInput::from_form(form);
    state
        .run(move |dashboard| dashboard.create_document(input))
        .await
        .map(created)
}

async fn show(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<DocumentRow>, AppError> {
    state.run(move |dashboard| dashboard.document(&id)).await.map(Json)
}

async fn update(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Form(fields): Form<HashMap<String, String>>,
) -> Result<Json<DocumentRow>, AppError> {
    let input = UpdateDocumentInput::from_form(&form_data(fields));
    state
        .run(move |dashboard| dashboard.update_document(&id, input))
        .await
        .map(Json)
}

async fn remove(State(state): State<AppState>, Path(id): Path<String>) -> Result<Response, AppError> {
    state
        .run(move |dashboard| dashboard.delete_document(&id))
        .await
        .map(deleted)
}

/// Both outcomes are a 200; the body carries the status.
async fn verify(
    State(state): State<AppState>,
    Path(id): Path<String>,
    multipart: Multipart,
) -> Result<Json<VerificationOutcome>, AppError> {
    let policy = &state.dashboard().config().uploads;
    let form = read_multipart(multipart, policy, "Verify Document").await?;
    let input = VerifyDocumentInput::from_form(form);
    state
        .run(move |dashboard| dashboard.verify_document(&id, input))
        .await
        .map(Json)
}
