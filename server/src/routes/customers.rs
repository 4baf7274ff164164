use std::collections::HashMap;

use axum::extract::{Path, Query, State};
use axum::response::Response;
use axum::routing::get;
use axum::{Form, Json, Router};

use docdesk::db::customer_repo::{CustomerField, CustomerRow, CustomerSummary};
use docdesk::forms::CustomerInput;

use super::{created, deleted, form_data, ListQuery, Page};
use crate::error::AppError;
use crate::state::AppState;

pub(super) fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list).post(create))
        .route("/all", get(all))
        .route("/:id", get(show).post(update).delete(remove))
}

async fn list(
    State(state): State<AppState>,
    Query(params): Query<ListQuery>,
) -> Result<Json<Page<CustomerSummary>>, AppError> {
    state
        .run(move |dashboard| {
            Ok(Page {
                items: dashboard.customers_page(&params.query, params.page)?,
                total_pages: dashboard.customer_pages(&params.query)?,
            })
        })
        .await
        .map(Json)
}

async fn all(State(state): State<AppState>) -> Result<Json<Vec<CustomerField>>, AppError> {
    state.run(|dashboard| dashboard.customers()).await.map(Json)
}

async fn create(
    State(state): State<AppState>,
    Form(fields): Form<HashMap<String, String>>,
) -> Result<Response, AppError> {
    let input = CustomerInput::from_form(&form_data(fields));
    state
        .run(move |dashboard| dashboard.create_customer(input))
        .await
        .map(created)
}

async fn show(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<CustomerRow>, AppError> {
    state.run(move |dashboard| dashboard.customer(&id)).await.map(Json)
}

async fn update(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Form(fields): Form<HashMap<String, String>>,
) -> Result<Json<CustomerRow>, AppError> {
    let input = CustomerInput::from_form(&form_data(fields));
    state
        .run(move |dashboard| dashboard.update_customer(&id, input))
        .await
        .map(Json)
}

async fn remove(State(state): State<AppState>, Path(id): Path<String>) -> Result<Response, AppError> {
    state
        .run(move |dashboard| dashboard.delete_customer(&id))
        .await
        .map(deleted)
}
