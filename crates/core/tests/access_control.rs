//! Tenancy and authentication: hospital scoping, the invitation flow, and
//! the append-only audit log.

mod common;

use api_shared::Role;
use carelink_core::{
    AuditService, AuthService, CareLinkError, PatientService, ReferralService, StaffService,
};
use common::{add_hospital, add_patient, add_staff, setup};

#[test]
fn cross_hospital_reads_are_refused() {
    let env = setup();
    let here = add_hospital(&env, "Here General");
    let there = add_hospital(&env, "There Royal");
    let our_doctor = add_staff(&env, &here, Role::Doctor, "doc@here.test");
    let their_doctor = add_staff(&env, &there, Role::Doctor, "doc@there.test");
    let patient = add_patient(&env, &our_doctor, "Local");

    // Another hospital's patient reads as not-found, not forbidden: no
    // existence leak.
    assert!(matches!(
        PatientService::new(&env.db).get(&their_doctor, patient).unwrap_err(),
        CareLinkError::NotFound(_)
    ));
    assert!(PatientService::new(&env.db)
        .list(&their_doctor)
        .unwrap()
        .is_empty());

    // Staff lists are scoped too.
    assert!(matches!(
        StaffService::new(&env.db).list(&their_doctor, here.id).unwrap_err(),
        CareLinkError::Forbidden
    ));

    // A hospital uninvolved in a referral cannot see it.
    let referral = ReferralService::new(&env.db)
        .create(
            &our_doctor,
            patient,
            there.id,
            api_shared::ReferralPriority::Normal,
            "transfer",
            None,
            false,
        )
        .unwrap();
    let elsewhere = add_hospital(&env, "Elsewhere Clinic");
    let bystander = add_staff(&env, &elsewhere, Role::Doctor, "doc@elsewhere.test");
    assert!(matches!(
        ReferralService::new(&env.db).get(&bystander, referral.id).unwrap_err(),
        CareLinkError::NotFound(_)
    ));
}

#[test]
fn invitation_flow_replaces_default_passwords() {
    let env = setup();
    let hospital = add_hospital(&env, "Here General");
    let auth = AuthService::new(&env.db, &env.cfg);

    let invitation = StaffService::new(&env.db)
        .invite(
            &env.admin,
            hospital.id,
            "New Nurse",
            "nurse@here.test",
            Role::Nurse,
            "A&E",
        )
        .unwrap();
    assert!(invitation.profile.pending_activation);

    // No login before activation, under any password.
    assert!(matches!(
        auth.login("nurse@here.test", "anything").unwrap_err(),
        CareLinkError::Unauthorized
    ));

    // Short passwords are refused at activation.
    assert!(matches!(
        auth.activate(&invitation.invite_token, "short").unwrap_err(),
        CareLinkError::Validation(_)
    ));

    let profile = auth
        .activate(&invitation.invite_token, "long-enough-pw")
        .unwrap();
    assert!(!profile.pending_activation);

    let (token, logged_in) = auth.login("nurse@here.test", "long-enough-pw").unwrap();
    assert_eq!(logged_in.id, profile.id);
    assert!(!token.is_empty());

    // The invitation token is one-time.
    assert!(matches!(
        auth.activate(&invitation.invite_token, "another-pw-12").unwrap_err(),
        CareLinkError::Unauthorized
    ));
}

#[test]
fn authenticate_slides_the_expiry_window() {
    let env = setup();
    let auth = AuthService::new(&env.db, &env.cfg);
    let (token, profile) = auth.login("root@carelink.test", "super-secret-pw").unwrap();

    let (ctx, refreshed) = auth.authenticate(&token).unwrap();
    assert_eq!(ctx.user_id, profile.id);
    assert!(auth.authenticate(&refreshed).is_ok());

    assert!(matches!(
        auth.authenticate("not-a-token").unwrap_err(),
        CareLinkError::Unauthorized
    ));
}

#[test]
fn duplicate_invites_conflict() {
    let env = setup();
    let hospital = add_hospital(&env, "Here General");
    let staff = StaffService::new(&env.db);

    staff
        .invite(
            &env.admin,
            hospital.id,
            "First",
            "taken@here.test",
            Role::Doctor,
            "",
        )
        .unwrap();
    assert!(matches!(
        staff
            .invite(
                &env.admin,
                hospital.id,
                "Second",
                "taken@here.test",
                Role::Doctor,
                "",
            )
            .unwrap_err(),
        CareLinkError::Conflict(_)
    ));

    // Invitations never mint system administrators.
    assert!(matches!(
        staff
            .invite(
                &env.admin,
                hospital.id,
                "Sneaky",
                "admin2@here.test",
                Role::SystemAdmin,
                "",
            )
            .unwrap_err(),
        CareLinkError::Forbidden
    ));
}

#[test]
fn bootstrap_runs_once_and_leaves_no_partial_state() {
    let env = setup();
    let count = |sql: &str| -> i64 { env.db.conn().query_row(sql, [], |r| r.get(0)).unwrap() };

    // The fixture bootstrapped exactly one hospital/admin pair, atomically.
    assert_eq!(count("SELECT COUNT(*) FROM hospitals"), 1);
    assert_eq!(count("SELECT COUNT(*) FROM users"), 1);

    assert!(matches!(
        AuthService::new(&env.db, &env.cfg)
            .bootstrap_system_admin("Another Root", "root2@carelink.test", "super-secret-pw")
            .unwrap_err(),
        CareLinkError::Conflict(_)
    ));
    assert_eq!(count("SELECT COUNT(*) FROM hospitals"), 1);
    assert_eq!(count("SELECT COUNT(*) FROM users"), 1);
}

#[test]
fn activated_staff_can_be_removed_and_their_audit_history_survives() {
    let env = setup();
    let hospital = add_hospital(&env, "Here General");
    let nurse = add_staff(&env, &hospital, Role::Nurse, "nurse@here.test");
    let staff = StaffService::new(&env.db);

    // Activation already wrote an audit row under the nurse's account.
    staff.remove(&env.admin, nurse.user_id).unwrap();

    let remaining = staff.list(&env.admin, hospital.id).unwrap();
    assert!(remaining.iter().all(|p| p.id != nurse.user_id));

    // The account is gone; its audit trail is not.
    let entries = AuditService::new(&env.db).list(&env.admin, None).unwrap();
    assert!(entries
        .iter()
        .any(|e| e.user_id == nurse.user_id && e.action == "ACTIVATE_ACCOUNT"));
    assert!(entries.iter().any(|e| e.action == "REMOVE_STAFF"));
}

#[test]
fn removal_is_refused_while_clinical_rows_reference_the_account() {
    let env = setup();
    let hospital = add_hospital(&env, "Here General");
    let doctor = add_staff(&env, &hospital, Role::Doctor, "doc@here.test");
    let patient = add_patient(&env, &doctor, "Charted");
    PatientService::new(&env.db)
        .add_record(&doctor, patient, "Admission note", "stable on arrival")
        .unwrap();

    assert!(matches!(
        StaffService::new(&env.db)
            .remove(&env.admin, doctor.user_id)
            .unwrap_err(),
        CareLinkError::Conflict(_)
    ));

    // The account still works.
    assert!(StaffService::new(&env.db)
        .list(&env.admin, hospital.id)
        .unwrap()
        .iter()
        .any(|p| p.id == doctor.user_id));
}

#[test]
fn audit_log_accumulates_and_is_append_only() {
    let env = setup();
    let hospital = add_hospital(&env, "Here General");
    let doctor = add_staff(&env, &hospital, Role::Doctor, "doc@here.test");
    add_patient(&env, &doctor, "Audited");

    let entries = AuditService::new(&env.db).list(&env.admin, None).unwrap();
    // At minimum: hospital creation, staff invitation, account activation,
    // patient creation.
    for action in [
        "CREATE_HOSPITAL",
        "INVITE_STAFF",
        "ACTIVATE_ACCOUNT",
        "CREATE_PATIENT",
    ] {
        assert!(
            entries.iter().any(|e| e.action == action),
            "missing audit action {action}"
        );
    }

    // Doctors cannot read the audit log.
    assert!(matches!(
        AuditService::new(&env.db).list(&doctor, None).unwrap_err(),
        CareLinkError::Forbidden
    ));

    // The schema refuses mutation of audit rows outright.
    assert!(env
        .db
        .conn()
        .execute("UPDATE audit_logs SET action = 'TAMPERED'", [])
        .is_err());
    assert!(env.db.conn().execute("DELETE FROM audit_logs", []).is_err());
}
