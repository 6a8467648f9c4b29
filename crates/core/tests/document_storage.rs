//! Uploaded documents: bytes under the configured directory, metadata in the
//! database, clinical-role and hospital-scope enforcement.

mod common;

use std::fs;

use api_shared::Role;
use carelink_core::{CareLinkError, DocumentService};
use common::{add_hospital, add_patient, add_staff, setup};

#[test]
fn stored_documents_land_on_disk_and_in_metadata() {
    let env = setup();
    let hospital = add_hospital(&env, "Here General");
    let doctor = add_staff(&env, &hospital, Role::Doctor, "doc@here.test");
    let patient = add_patient(&env, &doctor, "Scanned");
    let docs = DocumentService::new(&env.db, &env.cfg);

    let bytes = b"%PDF-1.7 fake scan";
    let stored = docs
        .store(&doctor, patient, "chest-xray.pdf", "application/pdf", bytes)
        .unwrap();
    assert_eq!(stored.file_name, "chest-xray.pdf");
    assert_eq!(stored.size_bytes, bytes.len() as u64);
    assert_eq!(stored.uploaded_by, doctor.user_id);

    // The file sits under the document dir, keyed by the document id rather
    // than the client-supplied name.
    let on_disk = env.cfg.document_dir().join(stored.id.simple().to_string());
    assert_eq!(fs::read(&on_disk).unwrap(), bytes);
    assert!(!env.cfg.document_dir().join("chest-xray.pdf").exists());

    let listed = docs.list(&doctor, patient).unwrap();
    assert_eq!(listed.len(), 1);
    assert_eq!(listed[0].id, stored.id);
}

#[test]
fn uploads_require_a_clinical_role_and_hospital_scope() {
    let env = setup();
    let here = add_hospital(&env, "Here General");
    let there = add_hospital(&env, "There Royal");
    let doctor = add_staff(&env, &here, Role::Doctor, "doc@here.test");
    let admin = add_staff(&env, &here, Role::HospitalAdmin, "admin@here.test");
    let outsider = add_staff(&env, &there, Role::Doctor, "doc@there.test");
    let patient = add_patient(&env, &doctor, "Guarded");
    let docs = DocumentService::new(&env.db, &env.cfg);

    // Administrators do not upload clinical documents.
    assert!(matches!(
        docs.store(&admin, patient, "note.txt", "text/plain", b"x")
            .unwrap_err(),
        CareLinkError::Forbidden
    ));

    // Another hospital's patient reads as not-found, no existence leak.
    assert!(matches!(
        docs.store(&outsider, patient, "note.txt", "text/plain", b"x")
            .unwrap_err(),
        CareLinkError::NotFound(_)
    ));
    assert!(matches!(
        docs.list(&outsider, patient).unwrap_err(),
        CareLinkError::NotFound(_)
    ));

    assert!(matches!(
        docs.store(&doctor, patient, "  ", "text/plain", b"x")
            .unwrap_err(),
        CareLinkError::Validation(_)
    ));
}

#[test]
fn documents_list_newest_first() {
    let env = setup();
    let hospital = add_hospital(&env, "Here General");
    let nurse = add_staff(&env, &hospital, Role::Nurse, "nurse@here.test");
    let patient = add_patient(&env, &nurse, "Serial");
    let docs = DocumentService::new(&env.db, &env.cfg);

    docs.store(&nurse, patient, "first.txt", "text/plain", b"one")
        .unwrap();
    std::thread::sleep(std::time::Duration::from_millis(2));
    let second = docs
        .store(&nurse, patient, "second.txt", "text/plain", b"two")
        .unwrap();

    let listed = docs.list(&nurse, patient).unwrap();
    assert_eq!(listed.len(), 2);
    assert_eq!(listed[0].id, second.id);
}
