//! Staff messaging and tasks.

mod common;

use api_shared::{Role, TaskStatus};
use carelink_core::{CareLinkError, MessageService, TaskService};
use common::{add_hospital, add_staff, setup};

#[test]
fn messages_flow_across_hospitals() {
    let env = setup();
    let here = add_hospital(&env, "Here General");
    let there = add_hospital(&env, "There Royal");
    let sender = add_staff(&env, &here, Role::Doctor, "doc@here.test");
    let recipient = add_staff(&env, &there, Role::Doctor, "doc@there.test");

    let svc = MessageService::new(&env.db);
    let message = svc
        .send(
            &sender,
            recipient.user_id,
            "Re: referral",
            "Can you take this patient on Tuesday?",
        )
        .unwrap();
    assert!(!message.read);

    let inbox = svc.inbox(&recipient).unwrap();
    assert_eq!(inbox.len(), 1);
    assert_eq!(inbox[0].id, message.id);
    assert!(svc.inbox(&sender).unwrap().is_empty());
    assert_eq!(svc.sent(&sender).unwrap().len(), 1);

    // Only the recipient marks a message read.
    assert!(matches!(
        svc.mark_read(&sender, message.id).unwrap_err(),
        CareLinkError::Forbidden
    ));
    svc.mark_read(&recipient, message.id).unwrap();
    assert!(svc.inbox(&recipient).unwrap()[0].read);
}

#[test]
fn messages_need_a_subject_and_a_real_recipient() {
    let env = setup();
    let here = add_hospital(&env, "Here General");
    let sender = add_staff(&env, &here, Role::Nurse, "nurse@here.test");
    let peer = add_staff(&env, &here, Role::Doctor, "doc@here.test");

    let svc = MessageService::new(&env.db);
    assert!(matches!(
        svc.send(&sender, peer.user_id, "   ", "body").unwrap_err(),
        CareLinkError::Validation(_)
    ));
    assert!(matches!(
        svc.send(&sender, uuid::Uuid::new_v4(), "Hello", "body")
            .unwrap_err(),
        CareLinkError::NotFound(_)
    ));
}

#[test]
fn tasks_stay_within_the_hospital() {
    let env = setup();
    let here = add_hospital(&env, "Here General");
    let there = add_hospital(&env, "There Royal");
    let admin = add_staff(&env, &here, Role::HospitalAdmin, "admin@here.test");
    let nurse = add_staff(&env, &here, Role::Nurse, "nurse@here.test");
    let outsider = add_staff(&env, &there, Role::Doctor, "doc@there.test");

    let svc = TaskService::new(&env.db);
    // Assignees must work at the caller's hospital.
    assert!(matches!(
        svc.create(&admin, outsider.user_id, "Chase discharge letter", "", None)
            .unwrap_err(),
        CareLinkError::Forbidden
    ));

    let task = svc
        .create(
            &admin,
            nurse.user_id,
            "Chase discharge letter",
            "GP practice has not received it",
            Some("2026-09-15".to_string()),
        )
        .unwrap();
    assert_eq!(task.status, TaskStatus::Pending);

    // Visible to hospital colleagues, not to other hospitals.
    assert_eq!(svc.list(&nurse).unwrap().len(), 1);
    assert!(svc.list(&outsider).unwrap().is_empty());
}

#[test]
fn tasks_complete_once() {
    let env = setup();
    let here = add_hospital(&env, "Here General");
    let admin = add_staff(&env, &here, Role::HospitalAdmin, "admin@here.test");
    let nurse = add_staff(&env, &here, Role::Nurse, "nurse@here.test");
    let doctor = add_staff(&env, &here, Role::Doctor, "doc@here.test");

    let svc = TaskService::new(&env.db);
    let task = svc
        .create(&admin, nurse.user_id, "Restock crash cart", "", None)
        .unwrap();

    // A colleague who is neither the assignee nor an admin cannot complete it.
    assert!(matches!(
        svc.complete(&doctor, task.id).unwrap_err(),
        CareLinkError::Forbidden
    ));

    let done = svc.complete(&nurse, task.id).unwrap();
    assert_eq!(done.status, TaskStatus::Done);

    assert!(matches!(
        svc.complete(&admin, task.id).unwrap_err(),
        CareLinkError::InvalidTransition(_)
    ));
}
