use std::collections::HashMap;

use axum::extract::{Path, Query, State};
use axum::response::Response;
use axum::routing::get;
use axum::{Form, Json, Router};

use docdesk::db::invoice_repo::{InvoiceListItem, InvoiceRow};
use docdesk::forms::InvoiceInput;

use super::{created, deleted, form_data, ListQuery, Page};
use crate::error::AppError;
use crate::state::AppState;

pub(super) fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list).post(create))
        .route("/latest", get(latest))
        .route("/:id", get(show).post(update).delete(remove))
}

async fn list(
    State(state): State<AppState>,
    Query(params): Query<ListQuery>,
) -> Result<Json<Page<InvoiceListItem>>, AppError> {
    state
        .run(move |dashboard| {
            Ok(Page {
                items: dashboard.invoices_page(&params.query, params.page)?,
                total_pages: dashboard.invoice_pages(&params.query)?,
            })
        })
        .await
        .map(Json)
}

async fn latest(State(state): State<AppState>) -> Result<Json<Vec<InvoiceListItem>>, AppError> {
    state.run(|dashboard| dashboard.latest_invoices()).await.map(Json)
}

async fn create(
    State(state): State<AppState>,
    Form(fields): Form<HashMap<String, String>>,
) -> Result<Response, AppError> {
    let input = InvoiceInput::from_form(&form_data(fields));
    state
        .run(move |dashboard| dashboard.create_invoice(input))
        .await
        .map(created)
}

async fn show(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<InvoiceRow>, AppError> {
    state.run(move |dashboard| dashboard.invoice(&id)).await.map(Json)
}

async fn update(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Form(fields): Form<HashMap<String, String>>,
) -> Result<Json<InvoiceRow>, AppError> {
    let input = InvoiceInput::from_form(&form_data(fields));
    state
        .run(move |dashboard| dashboard.update_invoice(&id, input))
        .await
        .map(Json)
}

async fn remove(State(state): State<AppState>, Path(id): Path<String>) -> Result<Response, AppError> {
    state
        .run(move |dashboard| dashboard.delete_invoice(&id))
        .await
        .map(deleted)
}
