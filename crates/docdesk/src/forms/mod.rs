//! Form submissions and their validation.
//!
//! A transport (HTTP multipart, urlencoded, tests) builds a [`FormData`]
//! once. Each action converts it into a typed input struct whose
//! `validate` either yields a validated record or [`FieldErrors`]. Nothing
//! is persisted unless validation passes for every field.

use std::collections::BTreeMap;

use serde::Serialize;

use crate::config::UploadPolicy;
use crate::sanitize::sanitize_file_name;

pub mod customer;
pub mod document;
pub mod invoice;

pub use customer::{CustomerInput, ValidCustomer};
pub use document::{
    normalize_description, CreateDocumentInput, DocumentType, UpdateDocumentInput,
    ValidCreateDocument, ValidDocumentMetadata, ValidVerifyDocument, VerifyDocumentInput,
};
pub use invoice::{InvoiceInput, InvoiceStatus, ValidInvoice};

/// A file received as part of a submission.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadedFile {
    pub file_name: String,
    pub content_type: Option<String>,
    pub bytes: Vec<u8>,
}

impl UploadedFile {
    pub fn new(file_name: impl Into<String>, bytes: impl Into<Vec<u8>>) -> Self {
        Self {
            file_name: file_name.into(),
            content_type: None,
            bytes: bytes.into(),
        }
    }

    pub fn with_content_type(mut self, content_type: impl Into<String>) -> Self {
        self.content_type = Some(content_type.into());
        self
    }

    /// Declared content type, or one guessed from the file name.
    pub fn effective_content_type(&self) -> String {
        match self.content_type.as_deref().map(str::trim) {
            Some(declared) if !declared.is_empty() => declared
                .split(';')
                .next()
                .unwrap_or(declared)
                .trim()
                .to_ascii_lowercase(),
            _ => mime_guess::from_path(&self.file_name)
                .first_or_octet_stream()
                .essence_str()
                .to_string(),
        }
    }

    pub fn len(&self) -> u64 {
        self.bytes.len() as u64
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FormValue {
    Text(String),
    File(UploadedFile),
}

/// Raw submission: field name to value. A repeated field keeps the last value.
#[derive(Debug, Clone, Default)]
pub struct FormData {
    fields: BTreeMap<String, FormValue>,
}

impl FormData {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, name: impl Into<String>, value: FormValue) {
        self.fields.insert(name.into(), value);
    }

    pub fn insert_text(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.insert(name, FormValue::Text(value.into()));
    }

    pub fn insert_file(&mut self, name: impl Into<String>, file: UploadedFile) {
        self.insert(name, FormValue::File(file));
    }

    pub fn with_text(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.insert_text(name, value);
        self
    }

    pub fn with_file(mut self, name: impl Into<String>, file: UploadedFile) -> Self {
        self.insert_file(name, file);
        self
    }

    /// Text value of `name`. File values are not text.
    pub fn text(&self, name: &str) -> Option<&str> {
        match self.fields.get(name) {
            Some(FormValue::Text(value)) => Some(value),
            _ => None,
        }
    }

    /// Removes and returns the file uploaded as `name`.
    pub fn take_file(&mut self, name: &str) -> Option<UploadedFile> {
        match self.fields.remove(name) {
            Some(FormValue::File(file)) => Some(file),
            Some(other) => {
                self.fields.insert(name.to_string(), other);
                None
            }
            None => None,
        }
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

impl<K, V> FromIterator<(K, V)> for FormData
where
    K: Into<String>,
    V: Into<String>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut form = FormData::new();
        for (name, value) in iter {
            form.insert_text(name, value);
        }
        form
    }
}

/// Field name to the messages explaining why it was rejected.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct FieldErrors {
    errors: BTreeMap<String, Vec<String>>,
}

impl FieldErrors {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, field: &str, message: impl Into<String>) {
        self.errors
            .entry(field.to_string())
            .or_default()
            .push(message.into());
    }

    pub fn get(&self, field: &str) -> Option<&[String]> {
        self.errors.get(field).map(Vec::as_slice)
    }

    pub fn contains(&self, field: &str) -> bool {
        self.errors.contains_key(field)
    }

    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn fields(&self) -> impl Iterator<Item = &str> {
        self.errors.keys().map(String::as_str)
    }

    /// `Ok(value)` when no field was rejected.
    pub fn into_result<T>(self, value: impl FnOnce() -> T) -> Result<T, FieldErrors> {
        if self.is_empty() {
            Ok(value())
        } else {
            Err(self)
        }
    }
}

impl std::fmt::Display for FieldErrors {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut first = true;
        for (field, messages) in &self.errors {
            for message in messages {
                if !first {
                    f.write_str("; ")?;
                }
                write!(f, "{}: {}", field, message)?;
                first = false;
            }
        }
        Ok(())
    }
}

/// Trimmed, non-empty text field.
pub(crate) fn required_text(value: Option<&str>) -> Option<String> {
    value
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_string)
}

/// Checks an uploaded file against `policy`, recording problems under
/// `field`. Returns the file with its name reduced to a bare file name.
pub(crate) fn validate_file(
    file: Option<UploadedFile>,
    policy: &UploadPolicy,
    field: &str,
    errors: &mut FieldErrors,
) -> Option<UploadedFile> {
    let Some(mut file) = file else {
        errors.add(field, "Please select a file.");
        return None;
    };

    let name = sanitize_file_name(&file.file_name);
    if name.is_none() || file.is_empty() {
        errors.add(field, "Please select a file.");
        return None;
    }

    let mut valid = true;
    if file.len() > policy.max_file_bytes {
        errors.add(field, file_too_large(policy));
        valid = false;
    }

    let content_type = file.effective_content_type();
    if !policy.allows(&content_type) {
        errors.add(
            field,
            format!(
                "Only {} files are accepted.",
                policy.allowed_content_types.join(", ")
            ),
        );
        valid = false;
    }

    if !valid {
        return None;
    }

    if let Some(name) = name {
        file.file_name = name;
    }
    file.content_type = Some(content_type);
    Some(file)
}

/// Field message for a file over `policy.max_file_bytes`.
pub fn file_too_large(policy: &UploadPolicy) -> String {
    format!("Max file size is {}.", human_size(policy.max_file_bytes))
}

fn human_size(bytes: u64) -> String {
    const MIB: u64 = 1024 * 1024;
    const KIB: u64 = 1024;
    if bytes % MIB == 0 {
        format!("{}MB", bytes / MIB)
    } else if bytes % KIB == 0 {
        format!("{}KB", bytes / KIB)
    } else {
        format!("{} bytes", bytes)
    }
}
