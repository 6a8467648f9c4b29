//! Staff messaging and work tasks.

use axum::extract::{Path as AxumPath, Query, State};
use axum::http::HeaderMap;
use axum::response::Json;
use serde::Deserialize;
use uuid::Uuid;

use api_shared::{CreateTaskReq, Message, SendMessageReq, Task};
use carelink_core::{MessageService, TaskService};

use crate::{authorize, ApiError, AppState, Authed};

#[derive(Debug, Deserialize)]
pub struct ListMessagesParams {
    /// `sent` for the caller's outbox; anything else (or absent) is the
    /// inbox.
    pub folder: Option<String>,
}

#[utoipa::path(
    get,
    path = "/messages",
    responses(
        (status = 200, description = "The caller's inbox (or outbox with ?folder=sent), newest first", body = [Message]),
        (status = 401, description = "Unauthorized")
    )
)]
#[axum::debug_handler]
pub async fn list_messages(
    State(state): State<AppState>,
    headers: HeaderMap,
    Query(params): Query<ListMessagesParams>,
) -> Result<Authed<Vec<Message>>, ApiError> {
    let (ctx, token) = authorize(&state, &headers).await?;
    let db = state.db.lock().await;
    let svc = MessageService::new(&db);
    let messages = if params.folder.as_deref() == Some("sent") {
        svc.sent(&ctx)?
    } else {
        svc.inbox(&ctx)?
    };
    Ok(Authed::new(token, messages))
}

#[utoipa::path(
    post,
    path = "/messages",
    request_body = SendMessageReq,
    responses(
        (status = 200, description = "Message sent", body = Message),
        (status = 400, description = "No subject given"),
        (status = 404, description = "Unknown recipient")
    )
)]
/// Send a message to any staff member on the network.
#[axum::debug_handler]
pub async fn send_message(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(req): Json<SendMessageReq>,
) -> Result<Authed<Message>, ApiError> {
    let (ctx, token) = authorize(&state, &headers).await?;
    let db = state.db.lock().await;
    let message = MessageService::new(&db).send(&ctx, req.recipient_id, &req.subject, &req.body)?;
    Ok(Authed::new(token, message))
}

#[utoipa::path(
    post,
    path = "/messages/{id}/read",
    responses(
        (status = 200, description = "Marked read"),
        (status = 403, description = "Only the recipient may mark a message read"),
        (status = 404, description = "No such message")
    )
)]
#[axum::debug_handler]
pub async fn mark_message_read(
    State(state): State<AppState>,
    headers: HeaderMap,
    AxumPath(id): AxumPath<Uuid>,
) -> Result<Authed<serde_json::Value>, ApiError> {
    let (ctx, token) = authorize(&state, &headers).await?;
    let db = state.db.lock().await;
    MessageService::new(&db).mark_read(&ctx, id)?;
    Ok(Authed::new(token, serde_json::json!({ "success": true })))
}

#[utoipa::path(
    get,
    path = "/tasks",
    responses(
        (status = 200, description = "The caller's hospital's tasks, pending first", body = [Task]),
        (status = 401, description = "Unauthorized")
    )
)]
#[axum::debug_handler]
pub async fn list_tasks(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<Authed<Vec<Task>>, ApiError> {
    let (ctx, token) = authorize(&state, &headers).await?;
    let db = state.db.lock().await;
    let tasks = TaskService::new(&db).list(&ctx)?;
    Ok(Authed::new(token, tasks))
}

#[utoipa::path(
    post,
    path = "/tasks",
    request_body = CreateTaskReq,
    responses(
        (status = 200, description = "Task created", body = Task),
        (status = 403, description = "Assignee works at another hospital")
    )
)]
/// Create a task for a colleague at the caller's hospital.
#[axum::debug_handler]
pub async fn create_task(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(req): Json<CreateTaskReq>,
) -> Result<Authed<Task>, ApiError> {
    let (ctx, token) = authorize(&state, &headers).await?;
    let db = state.db.lock().await;
    let task = TaskService::new(&db).create(
        &ctx,
        req.assignee_id,
        &req.title,
        &req.description,
        req.due_date,
    )?;
    Ok(Authed::new(token, task))
}

#[utoipa::path(
    post,
    path = "/tasks/{id}/complete",
    responses(
        (status = 200, description = "Task completed", body = Task),
        (status = 403, description = "Neither the assignee nor a hospital admin"),
        (status = 409, description = "Task already done")
    )
)]
#[axum::debug_handler]
pub async fn complete_task(
    State(state): State<AppState>,
    headers: HeaderMap,
    AxumPath(id): AxumPath<Uuid>,
) -> Result<Authed<Task>, ApiError> {
    let (ctx, token) = authorize(&state, &headers).await?;
    let db = state.db.lock().await;
    let task = TaskService::new(&db).complete(&ctx, id)?;
    Ok(Authed::new(token, task))
}
