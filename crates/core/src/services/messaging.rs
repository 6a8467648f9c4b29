//! Staff messaging and work tasks.

use uuid::Uuid;

use api_shared::{Message, Role, Task, TaskStatus};

use crate::auth::AuthContext;
use crate::db::{now_rfc3339, Database};
use crate::error::{CareLinkError, CareLinkResult};

pub struct MessageService<'a> {
    db: &'a Database,
}

impl<'a> MessageService<'a> {
    pub fn new(db: &'a Database) -> Self {
        Self { db }
    }

    /// Send a message to another staff member. Messaging is network-wide;
    /// referral coordination routinely crosses hospitals.
    pub fn send(
        &self,
        ctx: &AuthContext,
        recipient_id: Uuid,
        subject: &str,
        body: &str,
    ) -> CareLinkResult<Message> {
        if self.db.get_user_by_id(recipient_id)?.is_none() {
            return Err(CareLinkError::NotFound("recipient"));
        }
        if subject.trim().is_empty() {
            return Err(CareLinkError::Validation("subject is required".into()));
        }

        let message = Message {
            id: Uuid::new_v4(),
            sender_id: ctx.user_id,
            recipient_id,
            subject: subject.to_string(),
            body: body.to_string(),
            read: false,
            created_at: now_rfc3339(),
        };
        self.db.insert_message(&message)?;

        Ok(message)
    }

    pub fn inbox(&self, ctx: &AuthContext) -> CareLinkResult<Vec<Message>> {
        self.db.list_inbox(ctx.user_id)
    }

    pub fn sent(&self, ctx: &AuthContext) -> CareLinkResult<Vec<Message>> {
        self.db.list_sent(ctx.user_id)
    }

    /// Mark a message read. Recipient only.
    pub fn mark_read(&self, ctx: &AuthContext, message_id: Uuid) -> CareLinkResult<()> {
        let message = self
            .db
            .get_message(message_id)?
            .ok_or(CareLinkError::NotFound("message"))?;
        if message.recipient_id != ctx.user_id {
            return Err(CareLinkError::Forbidden);
        }

        if !self.db.mark_message_read(message_id)? {
            return Err(CareLinkError::NotFound("message"));
        }
        Ok(())
    }
}

pub struct TaskService<'a> {
    db: &'a Database,
}

impl<'a> TaskService<'a> {
    pub fn new(db: &'a Database) -> Self {
        Self { db }
    }

    /// Create a task for a colleague at the caller's hospital.
    pub fn create(
        &self,
        ctx: &AuthContext,
        assignee_id: Uuid,
        title: &str,
        description: &str,
        due_date: Option<String>,
    ) -> CareLinkResult<Task> {
        ctx.require_role(&[Role::Doctor, Role::Nurse, Role::HospitalAdmin])?;
        if title.trim().is_empty() {
            return Err(CareLinkError::Validation("task title is required".into()));
        }

        let assignee = self
            .db
            .get_user_by_id(assignee_id)?
            .ok_or(CareLinkError::NotFound("assignee"))?;
        ctx.require_hospital(assignee.hospital_id)?;

        let task = Task {
            id: Uuid::new_v4(),
            hospital_id: ctx.hospital_id,
            assignee_id,
            title: title.to_string(),
            description: description.to_string(),
            status: TaskStatus::Pending,
            due_date,
            created_at: now_rfc3339(),
        };
        self.db.insert_task(&task)?;

        Ok(task)
    }

    /// The caller's hospital's tasks: pending first, then by due date.
    pub fn list(&self, ctx: &AuthContext) -> CareLinkResult<Vec<Task>> {
        self.db.list_tasks(ctx.hospital_id)
    }

    /// Complete a task: its assignee, or a hospital admin of the same
    /// hospital. Conditional on the task still being pending.
    pub fn complete(&self, ctx: &AuthContext, task_id: Uuid) -> CareLinkResult<Task> {
        let task = self
            .db
            .get_task(task_id)?
            .ok_or(CareLinkError::NotFound("task"))?;
        ctx.require_hospital(task.hospital_id)?;
        if task.assignee_id != ctx.user_id && ctx.role != Role::HospitalAdmin {
            return Err(CareLinkError::Forbidden);
        }

        if !self.db.complete_task(task_id)? {
            return Err(CareLinkError::InvalidTransition(
                "task is already done".into(),
            ));
        }

        self.db
            .get_task(task_id)?
            .ok_or(CareLinkError::NotFound("task"))
    }
}
