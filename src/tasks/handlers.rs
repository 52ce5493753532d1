//! # Handlers HTTP para Tareas
//! src/tasks/handlers.rs
//!
//! - `POST /tasks` -> 201 + JSON de la tarea (otros métodos: 405)
//! - `GET /tasks/{id}` -> 200 + JSON, o 404
//! - `DELETE /tasks/{id}` -> 204, o 404
//! - `/tasks/` sin id -> 400 (antes de mirar el método)

use crate::error::ApiError;
use crate::http::{Method, Request, Response, StatusCode};
use crate::tasks::service::TaskService;
use crate::tasks::types::Task;

/// Ruta de la colección
pub const COLLECTION_PATH: &str = "/tasks";

/// Prefijo de las rutas de una tarea
pub const ITEM_PREFIX: &str = "/tasks/";

/// Handler para `/tasks`
pub fn collection_handler(req: &Request, service: &TaskService) -> Response {
    let result = match req.method() {
        Method::POST => create(service),
        other => Err(ApiError::MethodNotAllowed(other.to_string())),
    };

    result.unwrap_or_else(ApiError::into_response)
}

/// Handler para `/tasks/{id}`
pub fn item_handler(req: &Request, service: &TaskService) -> Response {
    let task_id = req.path().strip_prefix(ITEM_PREFIX).unwrap_or_default();

    let result = if task_id.is_empty() {
        Err(ApiError::BadRequest("task id required".to_string()))
    } else {
        match req.method() {
            Method::GET => get(service, task_id),
            Method::DELETE => delete(service, task_id),
            other => Err(ApiError::MethodNotAllowed(other.to_string())),
        }
    };

    result.unwrap_or_else(ApiError::into_response)
}

fn create(service: &TaskService) -> Result<Response, ApiError> {
    let task = service.create_task();
    let location = format!("{}{}", ITEM_PREFIX, task.id());

    Ok(task_response(StatusCode::Created, &task)?.with_header("Location", &location))
}

fn get(service: &TaskService, task_id: &str) -> Result<Response, ApiError> {
    let task = service.get_task(task_id)?;
    task_response(StatusCode::Ok, &task)
}

fn delete(service: &TaskService, task_id: &str) -> Result<Response, ApiError> {
    service.delete_task(task_id)?;
    Ok(Response::new(StatusCode::NoContent))
}

fn task_response(status: StatusCode, task: &Task) -> Result<Response, ApiError> {
    let body = serde_json::to_string(task)?;
    Ok(Response::json(status, &body))
}
