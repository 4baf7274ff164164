//! Route handlers. Each module maps one area of the dashboard to
//! `docdesk::Dashboard` calls.

use std::collections::HashMap;

use axum::extract::multipart::MultipartError;
use axum::extract::Multipart;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::{Json, Router};
use serde::{Deserialize, Serialize};

use docdesk::forms::document::DOCUMENT_FILE;
use docdesk::forms::file_too_large;
use docdesk::{ActionError, FieldErrors, FormData, Persistence, UploadPolicy, UploadedFile};

use crate::error::AppError;
use crate::state::AppState;

mod customers;
mod dashboard;
mod documents;
mod invoices;

pub fn router() -> Router<AppState> {
    Router::new()
        .nest("/api/dashboard", dashboard::router())
        .nest("/api/documents", documents::router())
        .nest("/api/customers", customers::router())
        .nest("/api/invoices", invoices::router())
}

/// `?query=&page=` for the searchable tables. Pages start at 1.
#[derive(Debug, Deserialize)]
pub(crate) struct ListQuery {
    #[serde(default)]
    query: String,
    #[serde(default = "first_page")]
    page: u32,
}

fn first_page() -> u32 {
    1
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct Page<T> {
    items: Vec<T>,
    total_pages: u64,
}

/// Reads every multipart field. Parts with a file name become uploads, the
/// rest text.
///
/// A body over the router limit is reported like any other oversized file:
/// a `documentFile` field error for `action`.
pub(crate) async fn read_multipart(
    multipart: Multipart,
    policy: &UploadPolicy,
    action: &str,
) -> Result<FormData, AppError> {
    match read_fields(multipart).await {
        Ok(form) => Ok(form),
        Err(err) if err.status() == StatusCode::PAYLOAD_TOO_LARGE => {
            let mut errors = FieldErrors::new();
            errors.add(DOCUMENT_FILE, file_too_large(policy));
            Err(ActionError::invalid(errors, action).into())
        }
        Err(err) => Err(err.into()),
    }
}

async fn read_fields(mut multipart: Multipart) -> Result<FormData, MultipartError> {
    let mut form = FormData::new();
    while let Some(field) = multipart.next_field().await? {
        let Some(name) = field.name().map(str::to_string) else {
            continue;
        };
        match field.file_name().map(str::to_string) {
            Some(file_name) => {
                let content_type = field.content_type().map(str::to_string);
                let bytes = field.bytes().await?;
                form.insert_file(
                    name,
                    UploadedFile {
                        file_name,
                        content_type,
                        bytes: bytes.to_vec(),
                    },
                );
            }
            None => {
                let text = field.text().await?;
                form.insert_text(name, text);
            }
        }
    }
    Ok(form)
}

pub(crate) fn form_data(fields: HashMap<String, String>) -> FormData {
    fields.into_iter().collect()
}

fn unconfirmed() -> Response {
    (
        StatusCode::ACCEPTED,
        Json(serde_json::json!({ "status": "unconfirmed" })),
    )
        .into_response()
}

pub(crate) fn created<T: Serialize>(result: Persistence<T>) -> Response {
    match result {
        Persistence::Persisted(value) => (StatusCode::CREATED, Json(value)).into_response(),
        Persistence::Suppressed { .. } => unconfirmed(),
    }
}

pub(crate) fn deleted(result: Persistence<()>) -> Response {
    match result {
        Persistence::Persisted(()) => StatusCode::NO_CONTENT.into_response(),
        Persistence::Suppressed { .. } => unconfirmed(),
    }
}
