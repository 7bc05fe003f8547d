// roster-client/tests/common/mod.rs
// 测试用的记录 API 模拟服务

#![allow(dead_code)]

use std::collections::HashMap;
use std::net::SocketAddr;
use std::sync::{Arc, Mutex, MutexGuard};

use axum::extract::{Path, State};
use axum::http::{HeaderMap, StatusCode, header};
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum::{Json, Router};
use roster_client::{App, ClientConfig, HttpClient, MemoryStorage, SessionStore};
use serde_json::json;
use shared::{
    ApiErrorBody, Employee, EmployeeDraft, EmployeeId, Experience, HealthResponse, LoginRequest,
    LoginResponse, RegisterRequest, Role, SalaryRecord,
};

pub const PASSWORD: &str = "secret";
pub const PDF_BYTES: &[u8] = b"%PDF-1.4\n% roster mock\n";

/// Server-side state of the mock
#[derive(Debug, Default)]
pub struct MockState {
    pub employees: Vec<Employee>,
    next_id: EmployeeId,
    users: HashMap<String, (String, Role)>,
    tokens: HashMap<String, Role>,
    issued: u32,
    /// `Authorization` header of every record request, in arrival order
    pub auth_headers: Vec<Option<String>>,
    /// Answer writes with a 500
    pub fail_writes: bool,
    /// Answer writes with the stored record instead of a short ack
    pub echo_records: bool,
    /// Records stored verbatim, as an older client may have written them
    pub raw_records: Vec<serde_json::Value>,
    /// Role string sent back by login instead of the user's role
    pub login_role: Option<String>,
}

type Shared = Arc<Mutex<MockState>>;
type ApiResult<T> = Result<T, (StatusCode, Json<ApiErrorBody>)>;

/// Record API on an ephemeral local port
#[derive(Clone)]
pub struct MockApi {
    state: Shared,
    addr: SocketAddr,
}

impl MockApi {
    /// Starts the mock with users `alice` (edit) and `bob` (view)
    pub async fn start() -> Self {
        let mut state = MockState::default();
        state.users.insert("alice".into(), (PASSWORD.into(), Role::Edit));
        state.users.insert("bob".into(), (PASSWORD.into(), Role::View));
        let state = Arc::new(Mutex::new(state));

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let app = router(state.clone());
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        Self { state, addr }
    }

    pub fn base_url(&self) -> String {
        format!("http://{}", self.addr)
    }

    pub fn state(&self) -> MutexGuard<'_, MockState> {
        self.state.lock().unwrap()
    }

    /// Stores a record directly, bypassing the API
    pub fn seed(&self, draft: EmployeeDraft) -> Employee {
        let mut state = self.state();
        state.next_id += 1;
        let employee = draft.with_id(state.next_id);
        state.employees.push(employee.clone());
        employee
    }

    /// Invalidates every issued token, as if they had expired
    pub fn revoke_tokens(&self) {
        self.state().tokens.clear();
    }

    pub fn request_count(&self) -> usize {
        self.state().auth_headers.len()
    }

    /// `Authorization` header of the latest record request
    pub fn last_auth(&self) -> Option<String> {
        self.state().auth_headers.last().cloned().flatten()
    }
}

/// App wired to the mock with an in-memory session
pub fn app(api: &MockApi) -> App {
    app_at(&api.base_url())
}

pub fn app_at(base_url: &str) -> App {
    let session = Arc::new(SessionStore::new(MemoryStorage::new()));
    let http = HttpClient::new(&ClientConfig::new(base_url).with_timeout(5), session).unwrap();
    App::new(http)
}

/// URL nothing listens on
pub async fn dead_base_url() -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);
    format!("http://{addr}")
}

pub fn draft(name: &str) -> EmployeeDraft {
    EmployeeDraft {
        name: name.into(),
        address: "1 Main St".into(),
        phone_number: "555-0100".into(),
        government_id: "ID-42".into(),
        current_position_details: "Engineer".into(),
        previous_experience: vec![Experience {
            company: "Acme".into(),
            position: "Developer".into(),
            years: 3.0,
        }],
        salary_history: vec![SalaryRecord {
            year: 2023,
            salary: 50000.0,
            currency: "USD".into(),
            position: "Developer".into(),
        }],
    }
}

// =============================================================================
// Routes
// =============================================================================

fn router(state: Shared) -> Router {
    Router::new()
        .route("/api/health", get(health))
        .route("/api/login", axum::routing::post(login))
        .route("/api/users", axum::routing::post(register))
        .route("/api/employees", get(list_employees).post(create_employee))
        .route("/api/employees/pdf", get(all_pdf))
        .route(
            "/api/employees/{id}",
            get(get_employee).put(update_employee).delete(delete_employee),
        )
        .route("/api/employees/{id}/pdf", get(employee_pdf))
        .with_state(state)
}

fn reject(status: StatusCode, message: &str) -> (StatusCode, Json<ApiErrorBody>) {
    (status, Json(ApiErrorBody::new(message)))
}

fn authorize(state: &mut MockState, headers: &HeaderMap, write: bool) -> ApiResult<()> {
    let auth = headers
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .map(str::to_string);
    state.auth_headers.push(auth.clone());

    let role = auth
        .as_deref()
        .and_then(|v| v.strip_prefix("Bearer "))
        .and_then(|token| state.tokens.get(token))
        .copied()
        .ok_or_else(|| reject(StatusCode::UNAUTHORIZED, "Token is invalid or expired"))?;

    if write && role != Role::Edit {
        return Err(reject(StatusCode::FORBIDDEN, "Edit role required"));
    }
    if write && state.fail_writes {
        return Err(reject(StatusCode::INTERNAL_SERVER_ERROR, "Database unavailable"));
    }
    Ok(())
}

fn not_found(id: EmployeeId) -> (StatusCode, Json<ApiErrorBody>) {
    reject(StatusCode::NOT_FOUND, &format!("Employee {id} not found"))
}

async fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".into(),
    })
}

async fn login(State(state): State<Shared>, Json(req): Json<LoginRequest>) -> ApiResult<Json<LoginResponse>> {
    let mut state = state.lock().unwrap();
    let role = match state.users.get(&req.username) {
        Some((password, role)) if *password == req.password => *role,
        _ => return Err(reject(StatusCode::UNAUTHORIZED, "Invalid credentials")),
    };
    state.issued += 1;
    let token = format!("token-{}-{}", req.username, state.issued);
    state.tokens.insert(token.clone(), role);
    let role = state
        .login_role
        .clone()
        .unwrap_or_else(|| role.as_str().to_string());
    Ok(Json(LoginResponse {
        access_token: token,
        role,
    }))
}

async fn register(State(state): State<Shared>, Json(req): Json<RegisterRequest>) -> ApiResult<Response> {
    let mut state = state.lock().unwrap();
    if state.users.contains_key(&req.username) {
        return Err(reject(StatusCode::CONFLICT, "Username already exists"));
    }
    state.users.insert(req.username, (req.password, req.role));
    let id = state.users.len();
    Ok((StatusCode::CREATED, Json(json!({ "id": id }))).into_response())
}

async fn list_employees(
    State(state): State<Shared>,
    headers: HeaderMap,
) -> ApiResult<Json<Vec<serde_json::Value>>> {
    let mut state = state.lock().unwrap();
    authorize(&mut state, &headers, false)?;
    let mut records: Vec<serde_json::Value> = state
        .employees
        .iter()
        .map(|e| serde_json::to_value(e).unwrap())
        .collect();
    records.extend(state.raw_records.iter().cloned());
    Ok(Json(records))
}

async fn get_employee(
    State(state): State<Shared>,
    Path(id): Path<EmployeeId>,
    headers: HeaderMap,
) -> ApiResult<Json<serde_json::Value>> {
    let mut state = state.lock().unwrap();
    authorize(&mut state, &headers, false)?;
    let stored = state
        .employees
        .iter()
        .find(|e| e.id == id)
        .map(|e| serde_json::to_value(e).unwrap());
    let raw = || {
        state
            .raw_records
            .iter()
            .find(|r| r["id"].as_i64() == Some(id))
            .cloned()
    };
    stored.or_else(raw).map(Json).ok_or_else(|| not_found(id))
}

async fn create_employee(
    State(state): State<Shared>,
    headers: HeaderMap,
    Json(draft): Json<EmployeeDraft>,
) -> ApiResult<Response> {
    let mut state = state.lock().unwrap();
    authorize(&mut state, &headers, true)?;
    if draft.name.trim().is_empty() {
        return Err(reject(StatusCode::BAD_REQUEST, "Name is required"));
    }
    state.next_id += 1;
    let employee = draft.with_id(state.next_id);
    state.employees.push(employee.clone());

    let body = if state.echo_records {
        Json(serde_json::to_value(&employee).unwrap())
    } else {
        Json(json!({ "id": employee.id }))
    };
    Ok((StatusCode::CREATED, body).into_response())
}

async fn update_employee(
    State(state): State<Shared>,
    Path(id): Path<EmployeeId>,
    headers: HeaderMap,
    Json(draft): Json<EmployeeDraft>,
) -> ApiResult<Response> {
    let mut state = state.lock().unwrap();
    authorize(&mut state, &headers, true)?;
    let echo = state.echo_records;
    let employee = state
        .employees
        .iter_mut()
        .find(|e| e.id == id)
        .ok_or_else(|| not_found(id))?;
    employee.fields = draft;

    if echo {
        Ok(Json(employee.clone()).into_response())
    } else {
        Ok(Json(json!({ "status": "updated" })).into_response())
    }
}

async fn delete_employee(
    State(state): State<Shared>,
    Path(id): Path<EmployeeId>,
    headers: HeaderMap,
) -> ApiResult<Json<serde_json::Value>> {
    let mut state = state.lock().unwrap();
    authorize(&mut state, &headers, true)?;
    let before = state.employees.len();
    state.employees.retain(|e| e.id != id);
    if state.employees.len() == before {
        return Err(not_found(id));
    }
    Ok(Json(json!({ "status": "deleted" })))
}

async fn all_pdf(State(state): State<Shared>, headers: HeaderMap) -> ApiResult<Response> {
    let mut state = state.lock().unwrap();
    authorize(&mut state, &headers, false)?;
    Ok(pdf())
}

async fn employee_pdf(
    State(state): State<Shared>,
    Path(id): Path<EmployeeId>,
    headers: HeaderMap,
) -> ApiResult<Response> {
    let mut state = state.lock().unwrap();
    authorize(&mut state, &headers, false)?;
    if !state.employees.iter().any(|e| e.id == id) {
        return Err(not_found(id));
    }
    Ok(pdf())
}

fn pdf() -> Response {
    ([(header::CONTENT_TYPE, "application/pdf")], PDF_BYTES).into_response()
}
