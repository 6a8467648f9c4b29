//! Shared fixtures: an in-memory database bootstrapped with a system
//! administrator, plus helpers that drive the real invitation/activation
//! flow to mint staff accounts.

use tempfile::TempDir;
use uuid::Uuid;

use api_shared::{Hospital, Role, UserProfile};
use carelink_core::{
    AuthContext, AuthService, CoreConfig, Database, HospitalService, PatientService, StaffService,
    DEFAULT_SESSION_TTL_SECS,
};

pub struct TestEnv {
    pub db: Database,
    pub cfg: CoreConfig,
    pub admin: AuthContext,
    _docs: TempDir,
}

pub fn ctx_for(profile: &UserProfile) -> AuthContext {
    AuthContext {
        user_id: profile.id,
        role: profile.role,
        hospital_id: profile.hospital_id,
    }
}

pub fn setup() -> TestEnv {
    let docs = TempDir::new().expect("create temp document dir");
    let cfg = CoreConfig::new(
        docs.path().join("carelink.db"),
        docs.path().join("documents"),
        b"test-secret-test-secret-test-secret".to_vec(),
        DEFAULT_SESSION_TTL_SECS,
    )
    .expect("build config");
    let db = Database::open_in_memory().expect("open database");

    let admin = AuthService::new(&db, &cfg)
        .bootstrap_system_admin("Root Admin", "root@carelink.test", "super-secret-pw")
        .expect("bootstrap admin");
    let admin = ctx_for(&admin);

    TestEnv {
        db,
        cfg,
        admin,
        _docs: docs,
    }
}

pub fn add_hospital(env: &TestEnv, name: &str) -> Hospital {
    HospitalService::new(&env.db)
        .create(&env.admin, name, "General", "Testville", vec![])
        .expect("create hospital")
}

/// Invite and activate a staff member, returning a ready-to-use context.
pub fn add_staff(env: &TestEnv, hospital: &Hospital, role: Role, email: &str) -> AuthContext {
    let invitation = StaffService::new(&env.db)
        .invite(&env.admin, hospital.id, "Test Staffer", email, role, "Ward 1")
        .expect("invite staff");
    let profile = AuthService::new(&env.db, &env.cfg)
        .activate(&invitation.invite_token, "a-decent-password")
        .expect("activate staff");
    ctx_for(&profile)
}

pub fn add_patient(env: &TestEnv, doctor: &AuthContext, last_name: &str) -> Uuid {
    PatientService::new(&env.db)
        .create(
            doctor,
            "Pat",
            last_name,
            "1980-01-01",
            "female",
            None,
            None,
            None,
        )
        .expect("create patient")
        .id
}
