//! Referral lifecycle: creation, terminal transitions, the append-only
//! timeline, and the incoming/outgoing ordering asymmetry.

mod common;

use api_shared::{ReferralEventType, ReferralPriority, ReferralStatus, Role};
use carelink_core::{CareLinkError, ReferralService};
use common::{add_hospital, add_patient, add_staff, setup};

#[test]
fn only_doctors_create_referrals() {
    let env = setup();
    let source = add_hospital(&env, "Source General");
    let dest = add_hospital(&env, "Dest Royal");
    let doctor = add_staff(&env, &source, Role::Doctor, "doc@source.test");
    let nurse = add_staff(&env, &source, Role::Nurse, "nurse@source.test");
    let patient = add_patient(&env, &doctor, "Referred");

    let svc = ReferralService::new(&env.db);
    let err = svc
        .create(
            &nurse,
            patient,
            dest.id,
            ReferralPriority::Normal,
            "needs cardiology",
            None,
            false,
        )
        .unwrap_err();
    assert!(matches!(err, CareLinkError::Forbidden));

    let referral = svc
        .create(
            &doctor,
            patient,
            dest.id,
            ReferralPriority::Normal,
            "needs cardiology",
            None,
            false,
        )
        .unwrap();
    assert_eq!(referral.status, ReferralStatus::Sent);

    let events = svc.timeline(&doctor, referral.id).unwrap();
    assert_eq!(events.len(), 1);
    assert_eq!(events[0].event_type, ReferralEventType::Created);
    assert_eq!(events[0].actor_id, doctor.user_id);
}

#[test]
fn accept_appends_one_event_and_is_final() {
    let env = setup();
    let source = add_hospital(&env, "Source General");
    let dest = add_hospital(&env, "Dest Royal");
    let sender = add_staff(&env, &source, Role::Doctor, "doc@source.test");
    let receiver = add_staff(&env, &dest, Role::Doctor, "doc@dest.test");
    let patient = add_patient(&env, &sender, "Referred");

    let svc = ReferralService::new(&env.db);
    let referral = svc
        .create(
            &sender,
            patient,
            dest.id,
            ReferralPriority::Urgent,
            "surgical opinion",
            None,
            true,
        )
        .unwrap();

    let accepted = svc.accept(&receiver, referral.id).unwrap();
    assert_eq!(accepted.status, ReferralStatus::Accepted);
    assert_eq!(accepted.receiving_doctor_id, Some(receiver.user_id));
    assert!(accepted.resolved_at.is_some());

    let events = svc.timeline(&receiver, referral.id).unwrap();
    assert_eq!(events.len(), 2);
    assert_eq!(events[0].event_type, ReferralEventType::Created);
    assert_eq!(events[1].event_type, ReferralEventType::Accepted);

    // Terminal states reject further transitions, and the failed attempt
    // must not grow the timeline.
    let err = svc.accept(&receiver, referral.id).unwrap_err();
    assert!(matches!(err, CareLinkError::InvalidTransition(_)));
    let err = svc.reject(&receiver, referral.id, "changed my mind").unwrap_err();
    assert!(matches!(err, CareLinkError::InvalidTransition(_)));
    assert_eq!(svc.timeline(&receiver, referral.id).unwrap().len(), 2);
}

#[test]
fn reject_records_the_reason() {
    let env = setup();
    let source = add_hospital(&env, "Source General");
    let dest = add_hospital(&env, "Dest Royal");
    let sender = add_staff(&env, &source, Role::Doctor, "doc@source.test");
    let receiver = add_staff(&env, &dest, Role::Doctor, "doc@dest.test");
    let patient = add_patient(&env, &sender, "Referred");

    let svc = ReferralService::new(&env.db);
    let referral = svc
        .create(
            &sender,
            patient,
            dest.id,
            ReferralPriority::Normal,
            "second opinion",
            None,
            false,
        )
        .unwrap();

    assert!(matches!(
        svc.reject(&receiver, referral.id, "  ").unwrap_err(),
        CareLinkError::Validation(_)
    ));

    let rejected = svc.reject(&receiver, referral.id, "no capacity").unwrap();
    assert_eq!(rejected.status, ReferralStatus::Rejected);
    assert_eq!(rejected.rejection_reason.as_deref(), Some("no capacity"));

    let events = svc.timeline(&receiver, referral.id).unwrap();
    assert_eq!(events.last().unwrap().event_type, ReferralEventType::Rejected);
    assert_eq!(events.last().unwrap().details.as_deref(), Some("no capacity"));
}

#[test]
fn only_destination_doctors_resolve() {
    let env = setup();
    let source = add_hospital(&env, "Source General");
    let dest = add_hospital(&env, "Dest Royal");
    let sender = add_staff(&env, &source, Role::Doctor, "doc@source.test");
    let dest_nurse = add_staff(&env, &dest, Role::Nurse, "nurse@dest.test");
    let patient = add_patient(&env, &sender, "Referred");

    let svc = ReferralService::new(&env.db);
    let referral = svc
        .create(
            &sender,
            patient,
            dest.id,
            ReferralPriority::Normal,
            "transfer",
            None,
            false,
        )
        .unwrap();

    // The referring doctor is at the wrong hospital; the destination nurse
    // has the wrong role.
    assert!(matches!(
        svc.accept(&sender, referral.id).unwrap_err(),
        CareLinkError::Forbidden
    ));
    assert!(matches!(
        svc.accept(&dest_nurse, referral.id).unwrap_err(),
        CareLinkError::Forbidden
    ));
}

#[test]
fn incoming_orders_by_priority_then_recency_outgoing_by_recency() {
    let env = setup();
    let source = add_hospital(&env, "Source General");
    let dest = add_hospital(&env, "Dest Royal");
    let sender = add_staff(&env, &source, Role::Doctor, "doc@source.test");
    let receiver = add_staff(&env, &dest, Role::Doctor, "doc@dest.test");
    let patient = add_patient(&env, &sender, "Referred");

    let svc = ReferralService::new(&env.db);
    let mut created = Vec::new();
    for priority in [
        ReferralPriority::Normal,
        ReferralPriority::Emergency,
        ReferralPriority::Urgent,
        ReferralPriority::Emergency,
        ReferralPriority::Normal,
    ] {
        // Distinct timestamps so recency ordering is observable.
        std::thread::sleep(std::time::Duration::from_millis(2));
        created.push(
            svc.create(&sender, patient, dest.id, priority, "triage", None, false)
                .unwrap(),
        );
    }

    let incoming = svc.incoming(&receiver).unwrap();
    let got: Vec<_> = incoming.iter().map(|r| r.id).collect();
    // Emergencies first (newest of them leading), then urgent, then normal.
    assert_eq!(
        got,
        vec![
            created[3].id,
            created[1].id,
            created[2].id,
            created[4].id,
            created[0].id,
        ]
    );

    let outgoing = svc.outgoing(&sender).unwrap();
    let got: Vec<_> = outgoing.iter().map(|r| r.id).collect();
    // Recency only, priority ignored.
    assert_eq!(
        got,
        vec![
            created[4].id,
            created[3].id,
            created[2].id,
            created[1].id,
            created[0].id,
        ]
    );
}

#[test]
fn referral_requires_a_foreign_destination() {
    let env = setup();
    let source = add_hospital(&env, "Source General");
    let doctor = add_staff(&env, &source, Role::Doctor, "doc@source.test");
    let patient = add_patient(&env, &doctor, "Referred");

    let err = ReferralService::new(&env.db)
        .create(
            &doctor,
            patient,
            source.id,
            ReferralPriority::Normal,
            "loop",
            None,
            false,
        )
        .unwrap_err();
    assert!(matches!(err, CareLinkError::Validation(_)));
}
