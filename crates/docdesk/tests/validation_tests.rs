//! Table-driven tests for submission validation. A rejected submission must
//! leave no row and no file behind.

mod common;

use common::{pdf, ConfigBuilder, DocumentFormBuilder, TestHarness};
use docdesk::{ActionError, UploadedFile};

const TWO_MIB: usize = 2 * 1024 * 1024;

struct ValidationCase {
    name: &'static str,
    form: fn() -> DocumentFormBuilder,
    /// Fields expected to carry errors, in the order `FieldErrors` lists them.
    rejected_fields: &'static [&'static str],
}

fn cases() -> Vec<ValidationCase> {
    vec![
        ValidationCase {
            name: "file_over_two_mib",
            form: || DocumentFormBuilder::new("c1").file(pdf("big.pdf", &vec![0u8; TWO_MIB + 1])),
            rejected_fields: &["documentFile"],
        },
        ValidationCase {
            name: "plain_text_file",
            form: || {
                DocumentFormBuilder::new("c1")
                    .file(UploadedFile::new("notes.txt", b"hello".to_vec()).with_content_type("text/plain"))
            },
            rejected_fields: &["documentFile"],
        },
        ValidationCase {
            name: "gif_guessed_from_name",
            form: || DocumentFormBuilder::new("c1").file(UploadedFile::new("anim.gif", b"GIF89a".to_vec())),
            rejected_fields: &["documentFile"],
        },
        ValidationCase {
            name: "empty_file",
            form: || DocumentFormBuilder::new("c1").file(pdf("empty.pdf", b"")),
            rejected_fields: &["documentFile"],
        },
        ValidationCase {
            name: "missing_file",
            form: || DocumentFormBuilder::new("c1").without("documentFile"),
            rejected_fields: &["documentFile"],
        },
        ValidationCase {
            name: "unknown_document_type",
            form: || DocumentFormBuilder::new("c1").document_type("power of attorney"),
            rejected_fields: &["documentType"],
        },
        ValidationCase {
            name: "blank_description",
            form: || DocumentFormBuilder::new("c1").description("   "),
            rejected_fields: &["documentDescription"],
        },
        ValidationCase {
            name: "missing_customer",
            form: || DocumentFormBuilder::new("c1").without("customerId"),
            rejected_fields: &["customerId"],
        },
        ValidationCase {
            name: "everything_wrong",
            form: || {
                DocumentFormBuilder::new("")
                    .document_type("")
                    .description("")
                    .file(UploadedFile::new("x.exe", b"MZ".to_vec()))
            },
            rejected_fields: &[
                "customerId",
                "documentDescription",
                "documentFile",
                "documentType",
            ],
        },
    ]
}

#[test]
fn test_create_document_validation() {
    for case in cases() {
        let harness = TestHarness::new();
        harness.add_customer("c1", "Lee Robinson");

        let result = harness.dashboard.create_document((case.form)().build());

        let err = match result {
            Err(err) => err,
            Ok(other) => panic!("Test '{}': expected rejection, got {:?}", case.name, other),
        };
        let errors = err
            .field_errors()
            .unwrap_or_else(|| panic!("Test '{}': expected field errors, got {}", case.name, err));
        assert_eq!(
            errors.fields().collect::<Vec<_>>(),
            case.rejected_fields,
            "Test '{}'",
            case.name
        );
        assert_eq!(
            err.to_string(),
            "Missing Fields. Failed to Create Document.",
            "Test '{}'",
            case.name
        );

        assert!(
            harness.stored_files().is_empty(),
            "Test '{}': rejected upload was written",
            case.name
        );
        assert_eq!(
            harness.dashboard.document_pages("").unwrap(),
            0,
            "Test '{}': rejected submission was persisted",
            case.name
        );
    }
}

#[test]
fn test_file_at_limit_is_accepted() {
    let harness = TestHarness::new();
    harness.add_customer("c1", "Lee Robinson");

    let form = DocumentFormBuilder::new("c1").file(pdf("exact.pdf", &vec![7u8; TWO_MIB]));
    let result = harness.dashboard.create_document(form.build()).unwrap();
    assert!(result.is_persisted());
}

#[test]
fn test_custom_upload_policy() {
    let harness = TestHarness::with_config(
        ConfigBuilder::new()
            .max_file_bytes(16)
            .allowed_content_types(&["text/plain"])
            .build(),
    );
    harness.add_customer("c1", "Lee Robinson");

    let ok = DocumentFormBuilder::new("c1").file(UploadedFile::new("note.txt", b"short".to_vec()));
    assert!(harness.dashboard.create_document(ok.build()).unwrap().is_persisted());

    let pdf_now_rejected = DocumentFormBuilder::new("c1").file(pdf("a.pdf", b"%PDF"));
    let err = harness
        .dashboard
        .create_document(pdf_now_rejected.build())
        .unwrap_err();
    assert_eq!(
        err.field_errors().unwrap().get("documentFile").unwrap(),
        ["Only text/plain files are accepted."]
    );

    let too_long = DocumentFormBuilder::new("c1")
        .file(UploadedFile::new("long.txt", b"more than sixteen bytes".to_vec()));
    let err = harness.dashboard.create_document(too_long.build()).unwrap_err();
    assert_eq!(
        err.field_errors().unwrap().get("documentFile").unwrap(),
        ["Max file size is 16 bytes."]
    );
}

#[test]
fn test_verify_rejects_bad_upload_before_storage() {
    let harness = TestHarness::new();
    harness.add_customer("c1", "Lee Robinson");
    let row = harness
        .dashboard
        .create_document(DocumentFormBuilder::new("c1").build())
        .unwrap()
        .persisted()
        .unwrap();
    let before = harness.stored_files();

    let big = pdf("big.pdf", &vec![1u8; TWO_MIB + 1]);
    let err = harness
        .dashboard
        .verify_document(&row.id, common::verify_input(big))
        .unwrap_err();

    assert!(matches!(err, ActionError::Invalid { .. }));
    assert_eq!(harness.stored_files(), before);
}

#[test]
fn test_traversal_names_stay_in_uploads() {
    let harness = TestHarness::new();
    harness.add_customer("c1", "Lee Robinson");

    let form = DocumentFormBuilder::new("c1").file(pdf("../../outside.pdf", b"%PDF"));
    let row = harness
        .dashboard
        .create_document(form.build())
        .unwrap()
        .persisted()
        .unwrap();

    assert_eq!(row.document_name, "outside.pdf");
    assert_eq!(harness.stored_files(), ["outside.pdf"]);
    assert!(!harness.temp_path().join("outside.pdf").exists());
}
