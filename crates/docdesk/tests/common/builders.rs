//! Builders for configurations and form submissions.

#![allow(dead_code)]

use docdesk::config::{Config, DatabaseErrorPolicy, UploadPolicy};
use docdesk::forms::{CreateDocumentInput, VerifyDocumentInput};
use docdesk::{FormData, SaveMode, UploadedFile};

/// Builder for `Config` instances.
pub struct ConfigBuilder {
    config: Config,
}

impl ConfigBuilder {
    pub fn new() -> Self {
        Self {
            config: Config::default(),
        }
    }

    pub fn page_size(mut self, page_size: u32) -> Self {
        self.config.page_size = page_size;
        self
    }

    pub fn max_file_bytes(mut self, bytes: u64) -> Self {
        self.config.uploads.max_file_bytes = bytes;
        self
    }

    pub fn allowed_content_types(mut self, types: &[&str]) -> Self {
        self.config.uploads.allowed_content_types = types.iter().map(|t| t.to_string()).collect();
        self
    }

    pub fn create_mode(mut self, mode: SaveMode) -> Self {
        self.config.uploads.create_mode = mode;
        self
    }

    pub fn fail_open(mut self) -> Self {
        self.config.database_error_policy = DatabaseErrorPolicy::FailOpen;
        self
    }

    pub fn build(self) -> Config {
        self.config
    }
}

impl Default for ConfigBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// Builder for a create-document submission.
pub struct DocumentFormBuilder {
    form: FormData,
}

impl DocumentFormBuilder {
    /// A complete, valid submission for `customer_id`.
    pub fn new(customer_id: &str) -> Self {
        Self {
            form: FormData::new()
                .with_text("customerId", customer_id)
                .with_text("documentType", "agreement")
                .with_text("documentDescription", "rental agreement")
                .with_file("documentFile", pdf("agreement.pdf", b"%PDF-1.7 agreement")),
        }
    }

    pub fn document_type(mut self, document_type: &str) -> Self {
        self.form.insert_text("documentType", document_type);
        self
    }

    pub fn description(mut self, description: &str) -> Self {
        self.form.insert_text("documentDescription", description);
        self
    }

    pub fn file(mut self, file: UploadedFile) -> Self {
        self.form.insert_file("documentFile", file);
        self
    }

    pub fn without(mut self, field: &str) -> Self {
        let mut form = FormData::new();
        for name in ["customerId", "documentType", "documentDescription"] {
            if name != field {
                if let Some(value) = self.form.text(name) {
                    form.insert_text(name, value);
                }
            }
        }
        if field != "documentFile" {
            if let Some(file) = self.form.take_file("documentFile") {
                form.insert_file("documentFile", file);
            }
        }
        self.form = form;
        self
    }

    pub fn build_form(self) -> FormData {
        self.form
    }

    pub fn build(self) -> CreateDocumentInput {
        CreateDocumentInput::from_form(self.form)
    }
}

pub fn pdf(name: &str, bytes: &[u8]) -> UploadedFile {
    UploadedFile::new(name, bytes.to_vec()).with_content_type("application/pdf")
}

pub fn verify_input(file: UploadedFile) -> VerifyDocumentInput {
    VerifyDocumentInput::from_form(FormData::new().with_file("documentFile", file))
}

/// Default upload policy, for tests that call validation directly.
pub fn default_policy() -> UploadPolicy {
    UploadPolicy::default()
}
