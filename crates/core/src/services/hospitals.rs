//! Hospital directory and department management.

use uuid::Uuid;

use api_shared::{Department, Hospital, HospitalStatus, Role};

use crate::auth::AuthContext;
use crate::db::{now_rfc3339, Database};
use crate::error::{CareLinkError, CareLinkResult};
use crate::services::audit;

pub struct HospitalService<'a> {
    db: &'a Database,
}

impl<'a> HospitalService<'a> {
    pub fn new(db: &'a Database) -> Self {
        Self { db }
    }

    /// The hospital directory. Visible to any authenticated staff member —
    /// referrals are cross-hospital by nature, so senders need the full
    /// list of destinations.
    pub fn list(&self, _ctx: &AuthContext) -> CareLinkResult<Vec<Hospital>> {
        self.db.list_hospitals()
    }

    /// Register a hospital on the network. New hospitals start PENDING until
    /// a system administrator connects them.
    pub fn create(
        &self,
        ctx: &AuthContext,
        name: &str,
        kind: &str,
        location: &str,
        specialties: Vec<String>,
    ) -> CareLinkResult<Hospital> {
        ctx.require_role(&[Role::SystemAdmin])?;
        if name.trim().is_empty() {
            return Err(CareLinkError::Validation("hospital name is required".into()));
        }

        let hospital = Hospital {
            id: Uuid::new_v4(),
            name: name.to_string(),
            kind: kind.to_string(),
            location: location.to_string(),
            status: HospitalStatus::Pending,
            specialties,
            created_at: now_rfc3339(),
        };
        self.db.insert_hospital(&hospital)?;
        audit::record_best_effort(self.db, ctx.user_id, "CREATE_HOSPITAL", "hospital", name);

        Ok(hospital)
    }

    pub fn set_status(
        &self,
        ctx: &AuthContext,
        hospital_id: Uuid,
        status: HospitalStatus,
    ) -> CareLinkResult<()> {
        ctx.require_role(&[Role::SystemAdmin])?;

        if !self.db.set_hospital_status(hospital_id, status)? {
            return Err(CareLinkError::NotFound("hospital"));
        }
        audit::record_best_effort(
            self.db,
            ctx.user_id,
            "SET_HOSPITAL_STATUS",
            "hospital",
            status.as_str(),
        );
        Ok(())
    }
}

pub struct DepartmentService<'a> {
    db: &'a Database,
}

impl<'a> DepartmentService<'a> {
    pub fn new(db: &'a Database) -> Self {
        Self { db }
    }

    /// Departments of the caller's own hospital.
    pub fn list(&self, ctx: &AuthContext) -> CareLinkResult<Vec<Department>> {
        self.db.list_departments(ctx.hospital_id)
    }

    pub fn create(
        &self,
        ctx: &AuthContext,
        name: &str,
        head_user_id: Option<Uuid>,
    ) -> CareLinkResult<Department> {
        ctx.require_role(&[Role::HospitalAdmin])?;
        if name.trim().is_empty() {
            return Err(CareLinkError::Validation(
                "department name is required".into(),
            ));
        }

        let department = Department {
            id: Uuid::new_v4(),
            hospital_id: ctx.hospital_id,
            name: name.to_string(),
            head_user_id,
            created_at: now_rfc3339(),
        };
        self.db.insert_department(&department)?;

        Ok(department)
    }
}
