// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use time::OffsetDateTime;
use time::macros::datetime;

use crate::{
    Applicant, Application, ApplicationView, Document, DocumentUpload, ExemptionCategory,
    ExpiryClass, aggregate_documents, file_extension,
};

fn create_test_document(document_id: i64, doc_type: &str, file_path: &str) -> Document {
    Document {
        document_id,
        application_id: 1,
        doc_type: doc_type.to_string(),
        file_path: file_path.to_string(),
        file_type: file_extension(file_path),
        created_at: datetime!(2026-01-01 00:00 UTC),
        updated_at: None,
    }
}

fn create_test_application() -> Application {
    Application::new_pending(
        1,
        1,
        Applicant::new("Mr", "John", "Doe", "63-1234", "1 Main St", "0771000000"),
        datetime!(2026-01-01 00:00 UTC),
    )
}

#[test]
fn test_file_extension_is_lowercased() {
    assert_eq!(file_extension("uploads/RegBook.PDF"), "pdf");
    assert_eq!(file_extension("uploads\\scan.jpeg"), "jpeg");
    assert_eq!(file_extension("uploads/README"), "");
    assert_eq!(file_extension("uploads/.hidden"), "");
}

#[test]
fn test_upload_type_defaults_to_category() {
    let plain: DocumentUpload = DocumentUpload::new("a.pdf");
    let labelled: DocumentUpload = DocumentUpload::labelled("b.pdf", "Proof of Residence");

    assert_eq!(plain.resolved_type(ExemptionCategory::WarVeteran), "War Veteran");
    assert_eq!(
        labelled.resolved_type(ExemptionCategory::WarVeteran),
        "Proof of Residence"
    );
}

#[test]
fn test_aggregation_dedupes_by_path_in_id_order() {
    let documents: Vec<Document> = vec![
        create_test_document(3, "License", "c.pdf"),
        create_test_document(1, "War Veteran", "a.pdf"),
        create_test_document(2, "War Veteran", "a.pdf"),
        create_test_document(4, "RegBook", "b.pdf"),
    ];

    let refs = aggregate_documents(&documents);
    let paths: Vec<&str> = refs.iter().map(|d| d.file_path.as_str()).collect();
    assert_eq!(paths, vec!["a.pdf", "c.pdf", "b.pdf"]);
}

#[test]
fn test_primary_type_is_first_aggregated_type() {
    let documents: Vec<Document> = vec![
        create_test_document(5, "Senior Citizen", "x.pdf"),
        create_test_document(6, "War Veteran", "y.pdf"),
        create_test_document(7, "Senior Citizen", "z.pdf"),
    ];

    let view: ApplicationView =
        ApplicationView::assemble(create_test_application(), String::from("ABC123"), &documents);

    assert_eq!(view.primary_type.as_deref(), Some("Senior Citizen"));
    assert_eq!(view.document_types(), vec!["Senior Citizen", "War Veteran"]);
}

#[test]
fn test_view_without_documents_has_no_primary_type() {
    let view: ApplicationView =
        ApplicationView::assemble(create_test_application(), String::from("ABC123"), &[]);
    assert!(view.documents.is_empty());
    assert_eq!(view.primary_type, None);
}

#[test]
fn test_expiry_class_absent_without_expiry() {
    let mut application: Application = create_test_application();
    let now: OffsetDateTime = datetime!(2026-06-01 00:00 UTC);
    assert_eq!(application.expiry_class(now), None);
    assert!(!application.is_expired(now));

    application.expiry_date = Some(datetime!(2026-05-31 00:00 UTC));
    assert_eq!(application.expiry_class(now), Some(ExpiryClass::Expired));
    assert!(application.is_expired(now));
}
