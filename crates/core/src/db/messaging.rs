//! Message and task queries.

use rusqlite::{params, OptionalExtension, Row};
use uuid::Uuid;

use api_shared::{Message, Task, TaskStatus};

use super::{enum_col, uuid_col, Database};
use crate::error::CareLinkResult;

const MESSAGE_COLS: &str = "id, sender_id, recipient_id, subject, body, read_flag, created_at";
const TASK_COLS: &str =
    "id, hospital_id, assignee_id, title, description, status, due_date, created_at";

fn map_message(row: &Row<'_>) -> rusqlite::Result<Message> {
    Ok(Message {
        id: uuid_col(row, 0)?,
        sender_id: uuid_col(row, 1)?,
        recipient_id: uuid_col(row, 2)?,
        subject: row.get(3)?,
        body: row.get(4)?,
        read: row.get(5)?,
        created_at: row.get(6)?,
    })
}

fn map_task(row: &Row<'_>) -> rusqlite::Result<Task> {
    Ok(Task {
        id: uuid_col(row, 0)?,
        hospital_id: uuid_col(row, 1)?,
        assignee_id: uuid_col(row, 2)?,
        title: row.get(3)?,
        description: row.get(4)?,
        status: enum_col(row, 5, TaskStatus::parse)?,
        due_date: row.get(6)?,
        created_at: row.get(7)?,
    })
}

impl Database {
    pub fn insert_message(&self, message: &Message) -> CareLinkResult<()> {
        self.conn.execute(
            r#"
            INSERT INTO messages (id, sender_id, recipient_id, subject, body, read_flag, created_at)
            VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)
            "#,
            params![
                message.id.to_string(),
                message.sender_id.to_string(),
                message.recipient_id.to_string(),
                message.subject,
                message.body,
                message.read,
                message.created_at,
            ],
        )?;
        Ok(())
    }

    pub fn get_message(&self, id: Uuid) -> CareLinkResult<Option<Message>> {
        self.conn
            .query_row(
                &format!("SELECT {MESSAGE_COLS} FROM messages WHERE id = ?"),
                [id.to_string()],
                map_message,
            )
            .optional()
            .map_err(Into::into)
    }

    pub fn list_inbox(&self, recipient_id: Uuid) -> CareLinkResult<Vec<Message>> {
        let mut stmt = self.conn.prepare(&format!(
            "SELECT {MESSAGE_COLS} FROM messages WHERE recipient_id = ? ORDER BY created_at DESC"
        ))?;
        let rows = stmt.query_map([recipient_id.to_string()], map_message)?;
        Ok(rows.collect::<rusqlite::Result<Vec<_>>>()?)
    }

    pub fn list_sent(&self, sender_id: Uuid) -> CareLinkResult<Vec<Message>> {
        let mut stmt = self.conn.prepare(&format!(
            "SELECT {MESSAGE_COLS} FROM messages WHERE sender_id = ? ORDER BY created_at DESC"
        ))?;
        let rows = stmt.query_map([sender_id.to_string()], map_message)?;
        Ok(rows.collect::<rusqlite::Result<Vec<_>>>()?)
    }

    pub fn mark_message_read(&self, id: Uuid) -> CareLinkResult<bool> {
        let rows_affected = self.conn.execute(
            "UPDATE messages SET read_flag = 1 WHERE id = ?",
            [id.to_string()],
        )?;
        Ok(rows_affected > 0)
    }

    pub fn insert_task(&self, task: &Task) -> CareLinkResult<()> {
        self.conn.execute(
            r#"
            INSERT INTO tasks (id, hospital_id, assignee_id, title, description,
                               status, due_date, created_at)
            VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)
            "#,
            params![
                task.id.to_string(),
                task.hospital_id.to_string(),
                task.assignee_id.to_string(),
                task.title,
                task.description,
                task.status.as_str(),
                task.due_date,
                task.created_at,
            ],
        )?;
        Ok(())
    }

    pub fn get_task(&self, id: Uuid) -> CareLinkResult<Option<Task>> {
        self.conn
            .query_row(
                &format!("SELECT {TASK_COLS} FROM tasks WHERE id = ?"),
                [id.to_string()],
                map_task,
            )
            .optional()
            .map_err(Into::into)
    }

    /// A hospital's tasks: pending before done, then by due date.
    pub fn list_tasks(&self, hospital_id: Uuid) -> CareLinkResult<Vec<Task>> {
        let mut stmt = self.conn.prepare(&format!(
            r#"
            SELECT {TASK_COLS} FROM tasks
            WHERE hospital_id = ?
            ORDER BY CASE status WHEN 'PENDING' THEN 0 ELSE 1 END,
                     due_date IS NULL,
                     due_date,
                     created_at DESC
            "#
        ))?;
        let rows = stmt.query_map([hospital_id.to_string()], map_task)?;
        Ok(rows.collect::<rusqlite::Result<Vec<_>>>()?)
    }

    /// Mark a task done, conditional on it still being PENDING.
    pub fn complete_task(&self, id: Uuid) -> CareLinkResult<bool> {
        let rows_affected = self.conn.execute(
            "UPDATE tasks SET status = 'DONE' WHERE id = ? AND status = 'PENDING'",
            [id.to_string()],
        )?;
        Ok(rows_affected > 0)
    }
}
