//! Translates HTTP requests into repository calls and repository outcomes
//! into responses. Typed errors are decoded here and nowhere else; store
//! failures leave only a generic body, the detail goes to the log.

use lambda_http::{Body, Error, Request, Response};
use serde::Serialize;
use serde_json::json;
use tracing::{error, info};

use crate::error::RepositoryError;
use crate::repository::TaskRepository;
use crate::router::{self, Route, RouteMatch};
use crate::store::RecordStore;
use crate::task::NewTask;

pub(crate) async fn function_handler<S: RecordStore>(
    repository: &TaskRepository<S>,
    event: Request,
) -> Result<Response<Body>, Error> {
    let method = event.method().clone();
    let path = event.uri().path().to_string();
    info!(method = %method, path = %path, "request received");

    match router::resolve(&method, &path) {
        RouteMatch::Handler(Route::ListTasks) => list_tasks(repository).await,
        RouteMatch::Handler(Route::CreateTask) => create_task(repository, event.body()).await,
        RouteMatch::Handler(Route::DeleteAllTasks) => delete_all_tasks(repository).await,
        RouteMatch::MethodNotAllowed => {
            json_response(405, &json!({ "error": "Method not allowed" }))
        }
        RouteMatch::NotFound => {
            json_response(404, &json!({ "message": "Route not found", "path": path }))
        }
    }
}

async fn list_tasks<S: RecordStore>(
    repository: &TaskRepository<S>,
) -> Result<Response<Body>, Error> {
    match repository.list_tasks().await {
        Ok(tasks) => {
            info!(count = tasks.len(), "tasks returned");
            json_response(200, &json!({ "tasks": tasks, "count": tasks.len() }))
        }
        Err(err) => internal_error(&err),
    }
}

async fn create_task<S: RecordStore>(
    repository: &TaskRepository<S>,
    body: &Body,
) -> Result<Response<Body>, Error> {
    let candidate: NewTask = match serde_json::from_slice(body.as_ref()) {
        Ok(candidate) => candidate,
        Err(err) => {
            return json_response(400, &json!({ "error": format!("Invalid JSON: {err}") }));
        }
    };

    match repository.create_task(candidate).await {
        Ok(task) => {
            info!(task_id = %task.task_id, "task created");
            json_response(201, &json!({ "message": "Task created", "task": task }))
        }
        Err(RepositoryError::Validation(message)) => {
            json_response(400, &json!({ "error": message }))
        }
        Err(err @ RepositoryError::Conflict(_)) => {
            json_response(409, &json!({ "error": err.to_string() }))
        }
        Err(RepositoryError::Store(err)) => internal_error(&err),
    }
}

async fn delete_all_tasks<S: RecordStore>(
    repository: &TaskRepository<S>,
) -> Result<Response<Body>, Error> {
    match repository.delete_all_tasks().await {
        Ok(count) => {
            info!(count, "tasks deleted");
            json_response(200, &json!({ "message": "All tasks deleted", "count": count }))
        }
        Err(err) => internal_error(&err),
    }
}

fn internal_error(err: &dyn std::fmt::Display) -> Result<Response<Body>, Error> {
    error!(error = %err, "store operation failed");
    json_response(500, &json!({ "message": "Internal server error" }))
}

fn json_response(status: u16, body: &impl Serialize) -> Result<Response<Body>, Error> {
    Ok(Response::builder()
        .status(status)
        .header("Content-Type", "application/json")
        .header("Access-Control-Allow-Origin", "*")
        .body(Body::Text(serde_json::to_string(body)?))?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::memory::InMemoryRecordStore;
    use lambda_http::http;
    use serde_json::Value;

    fn repository() -> TaskRepository<InMemoryRecordStore> {
        TaskRepository::new(InMemoryRecordStore::default())
    }

    fn request(method: &str, path: &str, body: Body) -> Request {
        http::Request::builder()
            .method(method)
            .uri(path)
            .body(body)
            .unwrap()
    }

    fn body_json(response: &Response<Body>) -> Value {
        match response.body() {
            Body::Text(text) => serde_json::from_str(text).unwrap(),
            other => panic!("unexpected body: {other:?}"),
        }
    }

    fn assert_common_headers(response: &Response<Body>) {
        assert_eq!(
            response.headers().get("Content-Type").unwrap(),
            "application/json"
        );
        assert_eq!(
            response
                .headers()
                .get("Access-Control-Allow-Origin")
                .unwrap(),
            "*"
        );
    }

    #[tokio::test]
    async fn get_on_empty_table_returns_zero_tasks() {
        let repo = repository();
        let response = function_handler(&repo, request("GET", "/tasks", Body::Empty))
            .await
            .unwrap();

        assert_eq!(response.status(), 200);
        assert_common_headers(&response);
        let body = body_json(&response);
        assert_eq!(body["count"], 0);
        assert_eq!(body["tasks"], json!([]));
    }

    #[tokio::test]
    async fn post_creates_a_task_visible_to_get() {
        let repo = repository();
        let response = function_handler(
            &repo,
            request("POST", "/tasks", Body::Text(r#"{"title": "Buy milk"}"#.into())),
        )
        .await
        .unwrap();

        assert_eq!(response.status(), 201);
        assert_common_headers(&response);
        let body = body_json(&response);
        assert_eq!(body["message"], "Task created");
        assert_eq!(body["task"]["title"], "Buy milk");
        assert_eq!(body["task"]["completed"], false);
        assert_eq!(body["task"]["createdAt"], body["task"]["updatedAt"]);
        assert!(body["task"]["taskId"].as_str().is_some_and(|id| !id.is_empty()));

        let response = function_handler(&repo, request("GET", "/tasks", Body::Empty))
            .await
            .unwrap();
        let body = body_json(&response);
        assert_eq!(body["count"], 1);
        assert_eq!(body["tasks"][0]["title"], "Buy milk");
    }

    #[tokio::test]
    async fn malformed_body_is_rejected_without_a_store_call() {
        let repo = repository();
        let response = function_handler(
            &repo,
            request("POST", "/tasks", Body::Text("{not json".into())),
        )
        .await
        .unwrap();

        assert_eq!(response.status(), 400);
        assert_eq!(repo.store().put_calls(), 0);
    }

    #[tokio::test]
    async fn missing_title_is_a_validation_error() {
        let repo = repository();
        let response = function_handler(
            &repo,
            request("POST", "/tasks", Body::Text(r#"{"title": ""}"#.into())),
        )
        .await
        .unwrap();

        assert_eq!(response.status(), 400);
        let body = body_json(&response);
        assert!(body["error"].as_str().is_some());
    }

    #[tokio::test]
    async fn duplicate_task_id_is_a_conflict() {
        let repo = repository();
        let payload = r#"{"taskId": "task-1", "title": "Buy milk"}"#;
        function_handler(&repo, request("POST", "/tasks", Body::Text(payload.into())))
            .await
            .unwrap();
        let response =
            function_handler(&repo, request("POST", "/tasks", Body::Text(payload.into())))
                .await
                .unwrap();

        assert_eq!(response.status(), 409);
        assert_eq!(repo.store().len(), 1);
    }

    #[tokio::test]
    async fn delete_reports_the_number_of_tasks_removed() {
        let repo = repository();
        for title in ["one", "two"] {
            let payload = format!(r#"{{"title": "{title}"}}"#);
            function_handler(&repo, request("POST", "/tasks", Body::Text(payload)))
                .await
                .unwrap();
        }

        let response = function_handler(&repo, request("DELETE", "/tasks", Body::Empty))
            .await
            .unwrap();

        assert_eq!(response.status(), 200);
        let body = body_json(&response);
        assert_eq!(body["message"], "All tasks deleted");
        assert_eq!(body["count"], 2);
        assert_eq!(repo.store().len(), 0);
    }

    #[tokio::test]
    async fn unknown_path_is_404() {
        let repo = repository();
        let response = function_handler(&repo, request("GET", "/unknown", Body::Empty))
            .await
            .unwrap();

        assert_eq!(response.status(), 404);
        assert_eq!(body_json(&response)["message"], "Route not found");
    }

    #[tokio::test]
    async fn unsupported_method_is_405() {
        let repo = repository();
        let response = function_handler(&repo, request("PATCH", "/tasks", Body::Empty))
            .await
            .unwrap();

        assert_eq!(response.status(), 405);
        assert_eq!(body_json(&response)["error"], "Method not allowed");
    }

    #[tokio::test]
    async fn store_failure_is_a_generic_500() {
        let repo = repository();
        repo.store().fail_scans();

        let response = function_handler(&repo, request("GET", "/tasks", Body::Empty))
            .await
            .unwrap();

        assert_eq!(response.status(), 500);
        let body = body_json(&response);
        assert_eq!(body["message"], "Internal server error");
        assert!(!body.to_string().contains("injected"));
    }
}
