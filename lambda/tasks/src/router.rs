//! Pure (method, path) routing. Never touches the repository.

use lambda_http::http::Method;

const TASKS_PATH: &str = "/tasks";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Route {
    ListTasks,
    CreateTask,
    DeleteAllTasks,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RouteMatch {
    Handler(Route),
    /// The path is known but not served with this method.
    MethodNotAllowed,
    /// No known path matched.
    NotFound,
}

/// Resolves a request to a route. An exact path match is tried first, then a
/// path-prefix match (API Gateway stage mappings can leave a trailing
/// segment), else the not-found fallback.
pub fn resolve(method: &Method, path: &str) -> RouteMatch {
    let path_matches = path == TASKS_PATH
        || path
            .strip_prefix(TASKS_PATH)
            .is_some_and(|rest| rest.starts_with('/'));

    if !path_matches {
        return RouteMatch::NotFound;
    }

    match *method {
        Method::GET => RouteMatch::Handler(Route::ListTasks),
        Method::POST => RouteMatch::Handler(Route::CreateTask),
        Method::DELETE => RouteMatch::Handler(Route::DeleteAllTasks),
        _ => RouteMatch::MethodNotAllowed,
    }
}
