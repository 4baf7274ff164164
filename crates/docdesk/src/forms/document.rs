use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::{required_text, validate_file, FieldErrors, FormData, UploadedFile};
use crate::config::UploadPolicy;

pub const CUSTOMER_ID: &str = "customerId";
pub const DOCUMENT_TYPE: &str = "documentType";
pub const DOCUMENT_DESCRIPTION: &str = "documentDescription";
pub const DOCUMENT_FILE: &str = "documentFile";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DocumentType {
    #[serde(rename = "agreement")]
    Agreement,
    #[serde(rename = "title deed")]
    TitleDeed,
    #[serde(rename = "last will")]
    LastWill,
}

impl DocumentType {
    pub const ALL: [DocumentType; 3] = [Self::Agreement, Self::TitleDeed, Self::LastWill];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Agreement => "agreement",
            Self::TitleDeed => "title deed",
            Self::LastWill => "last will",
        }
    }
}

impl fmt::Display for DocumentType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for DocumentType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|t| t.as_str() == s)
            .ok_or_else(|| format!("Unknown document type: {}", s))
    }
}

/// Lowercases and collapses runs of whitespace to one space.
pub fn normalize_description(raw: &str) -> String {
    raw.split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .to_lowercase()
}

#[derive(Debug, Clone, Default)]
pub struct CreateDocumentInput {
    pub customer_id: Option<String>,
    pub document_type: Option<String>,
    pub document_description: Option<String>,
    pub document_file: Option<UploadedFile>,
}

impl CreateDocumentInput {
    pub fn from_form(mut form: FormData) -> Self {
        Self {
            customer_id: form.text(CUSTOMER_ID).map(str::to_string),
            document_type: form.text(DOCUMENT_TYPE).map(str::to_string),
            document_description: form.text(DOCUMENT_DESCRIPTION).map(str::to_string),
            document_file: form.take_file(DOCUMENT_FILE),
        }
    }

    pub fn validate(self, policy: &UploadPolicy) -> Result<ValidCreateDocument, FieldErrors> {
        let mut errors = FieldErrors::new();
        let metadata = validate_metadata(
            self.customer_id.as_deref(),
            self.document_type.as_deref(),
            self.document_description.as_deref(),
            &mut errors,
        );
        let file = validate_file(self.document_file, policy, DOCUMENT_FILE, &mut errors);

        match (metadata, file) {
            (Some(metadata), Some(file)) if errors.is_empty() => {
                Ok(ValidCreateDocument { metadata, file })
            }
            _ => Err(errors),
        }
    }
}

#[derive(Debug, Clone)]
pub struct ValidCreateDocument {
    pub metadata: ValidDocumentMetadata,
    pub file: UploadedFile,
}

/// Editable document fields. The file cannot be replaced through an update.
#[derive(Debug, Clone, Default)]
pub struct UpdateDocumentInput {
    pub customer_id: Option<String>,
    pub document_type: Option<String>,
    pub document_description: Option<String>,
}

impl UpdateDocumentInput {
    pub fn from_form(form: &FormData) -> Self {
        Self {
            customer_id: form.text(CUSTOMER_ID).map(str::to_string),
            document_type: form.text(DOCUMENT_TYPE).map(str::to_string),
            document_description: form.text(DOCUMENT_DESCRIPTION).map(str::to_string),
        }
    }

    pub fn validate(self) -> Result<ValidDocumentMetadata, FieldErrors> {
        let mut errors = FieldErrors::new();
        let metadata = validate_metadata(
            self.customer_id.as_deref(),
            self.document_type.as_deref(),
            self.document_description.as_deref(),
            &mut errors,
        );
        match metadata {
            Some(metadata) if errors.is_empty() => Ok(metadata),
            _ => Err(errors),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidDocumentMetadata {
    pub customer_id: String,
    pub document_type: DocumentType,
    /// Already normalized.
    pub document_description: String,
}

#[derive(Debug, Clone, Default)]
pub struct VerifyDocumentInput {
    pub document_file: Option<UploadedFile>,
}

impl VerifyDocumentInput {
    pub fn from_form(mut form: FormData) -> Self {
        Self {
            document_file: form.take_file(DOCUMENT_FILE),
        }
    }

    pub fn validate(self, policy: &UploadPolicy) -> Result<ValidVerifyDocument, FieldErrors> {
        let mut errors = FieldErrors::new();
        match validate_file(self.document_file, policy, DOCUMENT_FILE, &mut errors) {
            Some(file) => Ok(ValidVerifyDocument { file }),
            None => Err(errors),
        }
    }
}

#[derive(Debug, Clone)]
pub struct ValidVerifyDocument {
    pub file: UploadedFile,
}

fn validate_metadata(
    customer_id: Option<&str>,
    document_type: Option<&str>,
    description: Option<&str>,
    errors: &mut FieldErrors,
) -> Option<ValidDocumentMetadata> {
    let customer_id = required_text(customer_id);
    if customer_id.is_none() {
        errors.add(CUSTOMER_ID, "Please select a customer.");
    }

    let document_type = document_type.and_then(|t| t.trim().parse::<DocumentType>().ok());
    if document_type.is_none() {
        errors.add(DOCUMENT_TYPE, "Please select document type.");
    }

    let description = description
        .map(normalize_description)
        .filter(|d| !d.is_empty());
    if description.is_none() {
        errors.add(DOCUMENT_DESCRIPTION, "Please enter document description.");
    }

    Some(ValidDocumentMetadata {
        customer_id: customer_id?,
        document_type: document_type?,
        document_description: description?,
    })
}
