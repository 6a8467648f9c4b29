//! SQLite schema definition.

/// Complete database schema for CareLink.
pub const SCHEMA: &str = r#"
-- Enable foreign keys
PRAGMA foreign_keys = ON;

-- ============================================================================
-- Hospitals & staff
-- ============================================================================

CREATE TABLE IF NOT EXISTS hospitals (
    id TEXT PRIMARY KEY,
    name TEXT NOT NULL,
    kind TEXT NOT NULL,
    location TEXT NOT NULL,
    status TEXT NOT NULL CHECK (status IN ('CONNECTED', 'PENDING', 'INACTIVE')),
    specialties TEXT NOT NULL DEFAULT '[]',      -- JSON array of strings
    created_at TEXT NOT NULL
);

CREATE TABLE IF NOT EXISTS users (
    id TEXT PRIMARY KEY,
    name TEXT NOT NULL,
    email TEXT NOT NULL UNIQUE,
    password_hash TEXT,                          -- NULL until the invite is redeemed
    role TEXT NOT NULL CHECK (role IN ('DOCTOR', 'NURSE', 'HOSPITAL_ADMIN', 'SYSTEM_ADMIN')),
    hospital_id TEXT NOT NULL REFERENCES hospitals(id),
    department TEXT NOT NULL DEFAULT '',
    invite_token TEXT UNIQUE,                    -- one-time activation token
    created_at TEXT NOT NULL
);

CREATE INDEX IF NOT EXISTS idx_users_hospital ON users(hospital_id);

CREATE TABLE IF NOT EXISTS departments (
    id TEXT PRIMARY KEY,
    hospital_id TEXT NOT NULL REFERENCES hospitals(id),
    name TEXT NOT NULL,
    head_user_id TEXT REFERENCES users(id),
    created_at TEXT NOT NULL
);

CREATE INDEX IF NOT EXISTS idx_departments_hospital ON departments(hospital_id);

-- ============================================================================
-- Patients & clinical data
-- ============================================================================

CREATE TABLE IF NOT EXISTS patients (
    id TEXT PRIMARY KEY,
    hospital_id TEXT NOT NULL REFERENCES hospitals(id),
    first_name TEXT NOT NULL,
    last_name TEXT NOT NULL,
    birth_date TEXT NOT NULL,
    gender TEXT NOT NULL,
    blood_type TEXT,
    allergies TEXT,
    diagnosis TEXT,
    created_at TEXT NOT NULL
);

CREATE INDEX IF NOT EXISTS idx_patients_hospital ON patients(hospital_id);

CREATE TABLE IF NOT EXISTS medical_records (
    id TEXT PRIMARY KEY,
    patient_id TEXT NOT NULL REFERENCES patients(id),
    author_id TEXT NOT NULL REFERENCES users(id),
    title TEXT NOT NULL,
    body TEXT NOT NULL,
    created_at TEXT NOT NULL
);

CREATE INDEX IF NOT EXISTS idx_medical_records_patient ON medical_records(patient_id);

CREATE TABLE IF NOT EXISTS medical_documents (
    id TEXT PRIMARY KEY,
    patient_id TEXT NOT NULL REFERENCES patients(id),
    uploaded_by TEXT NOT NULL REFERENCES users(id),
    file_name TEXT NOT NULL,
    content_type TEXT NOT NULL,
    size_bytes INTEGER NOT NULL,
    stored_path TEXT NOT NULL,
    created_at TEXT NOT NULL
);

CREATE INDEX IF NOT EXISTS idx_medical_documents_patient ON medical_documents(patient_id);

-- ============================================================================
-- Referrals (status-guarded) and their append-only event timeline
-- ============================================================================

CREATE TABLE IF NOT EXISTS referrals (
    id TEXT PRIMARY KEY,
    patient_id TEXT NOT NULL REFERENCES patients(id),
    from_hospital_id TEXT NOT NULL REFERENCES hospitals(id),
    to_hospital_id TEXT NOT NULL REFERENCES hospitals(id),
    referring_doctor_id TEXT NOT NULL REFERENCES users(id),
    receiving_doctor_id TEXT REFERENCES users(id),
    status TEXT NOT NULL CHECK (status IN ('SENT', 'ACCEPTED', 'REJECTED')),
    priority TEXT NOT NULL CHECK (priority IN ('NORMAL', 'URGENT', 'EMERGENCY')),
    reason TEXT NOT NULL,
    notes TEXT,
    share_documents INTEGER NOT NULL DEFAULT 0,
    rejection_reason TEXT,
    created_at TEXT NOT NULL,
    resolved_at TEXT
);

CREATE INDEX IF NOT EXISTS idx_referrals_to_hospital ON referrals(to_hospital_id);
CREATE INDEX IF NOT EXISTS idx_referrals_from_hospital ON referrals(from_hospital_id);
CREATE INDEX IF NOT EXISTS idx_referrals_patient ON referrals(patient_id);

CREATE TABLE IF NOT EXISTS referral_events (
    id TEXT PRIMARY KEY,
    referral_id TEXT NOT NULL REFERENCES referrals(id),
    event_type TEXT NOT NULL CHECK (event_type IN ('CREATED', 'ACCEPTED', 'REJECTED')),
    actor_id TEXT NOT NULL REFERENCES users(id),
    details TEXT,
    created_at TEXT NOT NULL
);

CREATE INDEX IF NOT EXISTS idx_referral_events_referral ON referral_events(referral_id);

-- The event timeline is the source of truth for referral history.
CREATE TRIGGER IF NOT EXISTS referral_events_no_update BEFORE UPDATE ON referral_events
BEGIN
    SELECT RAISE(ABORT, 'referral events are append-only');
END;

CREATE TRIGGER IF NOT EXISTS referral_events_no_delete BEFORE DELETE ON referral_events
BEGIN
    SELECT RAISE(ABORT, 'referral events are append-only');
END;

-- ============================================================================
-- Break-glass access sessions
-- ============================================================================

CREATE TABLE IF NOT EXISTS emergency_access_logs (
    id TEXT PRIMARY KEY,
    user_id TEXT NOT NULL REFERENCES users(id),
    patient_id TEXT NOT NULL REFERENCES patients(id),
    reason TEXT NOT NULL,
    start_time TEXT NOT NULL,
    end_time TEXT,
    status TEXT NOT NULL CHECK (status IN ('OPEN', 'CLOSED'))
);

CREATE INDEX IF NOT EXISTS idx_emergency_user ON emergency_access_logs(user_id);
CREATE INDEX IF NOT EXISTS idx_emergency_patient ON emergency_access_logs(patient_id);

-- ============================================================================
-- Audit log (append-only)
-- ============================================================================

-- No foreign key on user_id: audit history must survive account removal.
CREATE TABLE IF NOT EXISTS audit_logs (
    id TEXT PRIMARY KEY,
    user_id TEXT NOT NULL,
    action TEXT NOT NULL,
    resource TEXT NOT NULL,
    details TEXT NOT NULL DEFAULT '',
    created_at TEXT NOT NULL
);

CREATE INDEX IF NOT EXISTS idx_audit_user ON audit_logs(user_id);
CREATE INDEX IF NOT EXISTS idx_audit_action ON audit_logs(action);

CREATE TRIGGER IF NOT EXISTS audit_logs_no_update BEFORE UPDATE ON audit_logs
BEGIN
    SELECT RAISE(ABORT, 'audit log is append-only');
END;

CREATE TRIGGER IF NOT EXISTS audit_logs_no_delete BEFORE DELETE ON audit_logs
BEGIN
    SELECT RAISE(ABORT, 'audit log is append-only');
END;

-- ============================================================================
-- Messaging & tasks
-- ============================================================================

CREATE TABLE IF NOT EXISTS messages (
    id TEXT PRIMARY KEY,
    sender_id TEXT NOT NULL REFERENCES users(id),
    recipient_id TEXT NOT NULL REFERENCES users(id),
    subject TEXT NOT NULL,
    body TEXT NOT NULL,
    read_flag INTEGER NOT NULL DEFAULT 0,
    created_at TEXT NOT NULL
);

CREATE INDEX IF NOT EXISTS idx_messages_recipient ON messages(recipient_id);
CREATE INDEX IF NOT EXISTS idx_messages_sender ON messages(sender_id);

CREATE TABLE IF NOT EXISTS tasks (
    id TEXT PRIMARY KEY,
    hospital_id TEXT NOT NULL REFERENCES hospitals(id),
    assignee_id TEXT NOT NULL REFERENCES users(id),
    title TEXT NOT NULL,
    description TEXT NOT NULL DEFAULT '',
    status TEXT NOT NULL CHECK (status IN ('PENDING', 'DONE')),
    due_date TEXT,
    created_at TEXT NOT NULL
);

CREATE INDEX IF NOT EXISTS idx_tasks_hospital ON tasks(hospital_id);
CREATE INDEX IF NOT EXISTS idx_tasks_assignee ON tasks(assignee_id);
"#;
