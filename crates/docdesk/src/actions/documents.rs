use tracing::{info, info_span};

use super::{ActionError, Dashboard, Persistence};
use crate::checksum::file_checksum;
use crate::db::document_repo::{self, DocumentListItem, DocumentMetadata, DocumentRow};
use crate::db::{new_id, today};
use crate::forms::{
    CreateDocumentInput, UpdateDocumentInput, ValidCreateDocument, VerifyDocumentInput,
};
use crate::sanitize;
use crate::verify::{verify_upload, VerificationOutcome};

const ENTITY: &str = "Document";

impl Dashboard {
    /// Stores the uploaded file, records its checksum and inserts the row.
    ///
    /// Storage and checksum failures are always returned. A failed insert
    /// follows the database error policy; the stored file is left behind
    /// in that case.
    pub fn create_document(
        &self,
        input: CreateDocumentInput,
    ) -> Result<Persistence<DocumentRow>, ActionError> {
        let ValidCreateDocument { metadata, file } = input
            .validate(&self.config.uploads)
            .map_err(|errors| ActionError::invalid(errors, "Create Document"))?;

        let _span = info_span!("create_document",
            customer_id = %metadata.customer_id,
            filename = %file.file_name,
        )
        .entered();

        let path = {
            let _step = info_span!("store").entered();
            self.files
                .save(&file.bytes, &file.file_name, self.config.uploads.create_mode)?
        };

        let checksum = {
            let _step = info_span!("checksum").entered();
            file_checksum(&path)?
        };

        let row = DocumentRow {
            id: new_id(),
            customer_id: metadata.customer_id,
            document_type: metadata.document_type.as_str().to_string(),
            document_name: file.file_name,
            document_description: metadata.document_description,
            document_path: path.to_string_lossy().into_owned(),
            document_file_check_sum: checksum,
            date: today(),
        };

        let persisted = self.persist("Create Document", document_repo::insert(&self.db, &row))?;
        if persisted.is_persisted() {
            info!(
                document_id = %row.id,
                stored = %sanitize::redact_path(&path),
                "Document created"
            );
        }
        Ok(persisted.map(|()| row))
    }

    /// Replaces customer, type and description. The file is untouched.
    /// Database errors are always returned, whatever the policy.
    pub fn update_document(
        &self,
        id: &str,
        input: UpdateDocumentInput,
    ) -> Result<DocumentRow, ActionError> {
        let metadata = input
            .validate()
            .map_err(|errors| ActionError::invalid(errors, "Update Document"))?;

        let metadata = DocumentMetadata {
            customer_id: metadata.customer_id,
            document_type: metadata.document_type.as_str().to_string(),
            document_description: metadata.document_description,
        };

        let changed = document_repo::update_metadata(&self.db, id, &metadata)
            .map_err(ActionError::update_failed("Update Document"))?;
        if !changed {
            return Err(ActionError::not_found(ENTITY, id));
        }

        info!(document_id = %id, "Document updated");
        self.document(id)
    }

    /// Removes the row. The stored file stays on disk.
    pub fn delete_document(&self, id: &str) -> Result<Persistence<()>, ActionError> {
        self.delete_with(ENTITY, "Delete Document", id, document_repo::delete)
    }

    /// Checks an upload against the checksum recorded for document `id`.
    pub fn verify_document(
        &self,
        id: &str,
        input: VerifyDocumentInput,
    ) -> Result<VerificationOutcome, ActionError> {
        let valid = input
            .validate(&self.config.uploads)
            .map_err(|errors| ActionError::invalid(errors, "Verify Document"))?;

        // Unknown ids are reported before anything is written to disk.
        self.document(id)?;

        Ok(verify_upload(&self.files, &self.db, id, &valid.file)?)
    }

    pub fn document(&self, id: &str) -> Result<DocumentRow, ActionError> {
        document_repo::find_by_id(&self.db, id)
            .map_err(ActionError::database("Fetch Document"))?
            .ok_or_else(|| ActionError::not_found(ENTITY, id))
    }

    pub fn documents_page(
        &self,
        query: &str,
        page: u32,
    ) -> Result<Vec<DocumentListItem>, ActionError> {
        document_repo::list_page(&self.db, query, page, self.page_size())
            .map_err(ActionError::database("Fetch Documents"))
    }

    pub fn document_pages(&self, query: &str) -> Result<u64, ActionError> {
        document_repo::count_pages(&self.db, query, self.page_size())
            .map_err(ActionError::database("Fetch Total Number of Documents"))
    }
}
