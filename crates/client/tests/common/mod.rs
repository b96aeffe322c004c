#![allow(dead_code)]

//! In-process fake of the WellNest API for integration tests.
//!
//! Accounts (password `secret1` for all):
//!
//! | username | role    | notes                                  |
//! |----------|---------|----------------------------------------|
//! | alice    | USER    |                                        |
//! | tom      | TRAINER | id `t-1`                               |
//! | root     | ADMIN   |                                        |
//! | newbie   | USER    | email not verified, login is refused   |
//!
//! Tokens are `token-<username>`. Any other bearer value gets a 401.
//! The one valid verification / reset code is [`OTP`].

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use axum::extract::{Path, Query, State};
use axum::http::{HeaderMap, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::{delete, get, patch, post};
use axum::{Json, Router};
use serde_json::{json, Value};
use wellnest_client::api::WellnestApi;
use wellnest_client::storage::FileStorage;
use wellnest_client::store::SessionStore;

pub const PASSWORD: &str = "secret1";
pub const OTP: &str = "123456";

#[derive(Default)]
pub struct FakeState {
    /// Account awaiting email verification: (username, email, fullName, role).
    pending: Mutex<Option<(String, String, String, String)>>,
    selected_trainer: Mutex<Option<String>>,
    fitness: Mutex<Option<Value>>,
    reports: Mutex<Vec<Value>>,
    next_report: Mutex<u32>,
    /// Every `METHOD /path` received, in order.
    pub requests: Mutex<Vec<String>>,
}

type Shared = Arc<FakeState>;

pub struct FakeServer {
    pub base_url: String,
    pub state: Shared,
}

impl FakeServer {
    pub fn api(&self) -> WellnestApi {
        WellnestApi::new(self.base_url.clone())
    }

    /// A store backed by a session file at `path`, already restored.
    pub fn store(&self, path: &std::path::Path) -> SessionStore {
        let store = SessionStore::new(Arc::new(self.api()), Box::new(FileStorage::new(path)));
        store.restore_from_storage();
        store
    }

    pub fn requests(&self) -> Vec<String> {
        self.state.requests.lock().unwrap().clone()
    }
}

/// Start the fake API on an ephemeral port.
pub async fn spawn() -> FakeServer {
    let state: Shared = Arc::new(FakeState::default());
    let app = Router::new().nest("/api", routes()).with_state(state.clone());

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("bind should succeed");
    let addr = listener.local_addr().expect("local addr should resolve");
    tokio::spawn(async move {
        axum::serve(listener, app).await.expect("fake server crashed");
    });

    FakeServer {
        base_url: format!("http://{addr}/api"),
        state,
    }
}

fn routes() -> Router<Shared> {
    Router::new()
        .route("/auth/register", post(register))
        .route("/auth/verify-email", post(verify_email))
        .route("/auth/resend-otp", post(resend_otp))
        .route("/auth/login", post(login))
        .route("/auth/forgot-password", post(forgot_password))
        .route("/auth/reset-password", post(reset_password))
        .route("/trainers", get(list_trainers))
        .route("/trainers/select", post(select_trainer))
        .route("/trainers/my-trainees", get(my_trainees))
        .route("/trainers/my-trainer-today", get(my_trainer_today))
        .route("/profile", get(profile))
        .route("/profile/fitness", post(save_fitness))
        .route("/reports", post(create_report).get(all_reports))
        .route("/reports/my-reports", get(my_reports))
        .route("/reports/pending", get(pending_reports))
        .route("/reports/trainer/{trainer_id}", get(reports_by_trainer))
        .route("/reports/{id}/status", patch(update_report_status))
        .route("/reports/{id}", delete(delete_report))
        .route("/admin/stats", get(admin_stats))
        .route("/admin/customers", get(customers))
        .route("/admin/trainers", get(trainer_accounts))
        .route("/admin/users/{id}", delete(delete_user))
}

// ---------------------------------------------------------------------------
// Envelope helpers
// ---------------------------------------------------------------------------

fn ok(message: &str, data: Value) -> Response {
    Json(json!({ "success": true, "message": message, "data": data })).into_response()
}

fn fail(status: StatusCode, message: &str) -> Response {
    (
        status,
        Json(json!({ "success": false, "message": message, "data": null })),
    )
        .into_response()
}

fn record(state: &FakeState, line: impl Into<String>) {
    state.requests.lock().unwrap().push(line.into());
}

struct Account {
    id: &'static str,
    username: &'static str,
    full_name: &'static str,
    email: &'static str,
    role: &'static str,
}

const ACCOUNTS: &[Account] = &[
    Account {
        id: "u-1",
        username: "alice",
        full_name: "Alice Liddell",
        email: "alice@example.com",
        role: "ROLE_USER",
    },
    Account {
        id: "t-1",
        username: "tom",
        full_name: "Tom Trainer",
        email: "tom@example.com",
        role: "ROLE_TRAINER",
    },
    Account {
        id: "a-1",
        username: "root",
        full_name: "Site Admin",
        email: "root@example.com",
        role: "ROLE_ADMIN",
    },
    Account {
        id: "u-9",
        username: "newbie",
        full_name: "New Bie",
        email: "newbie@example.com",
        role: "ROLE_USER",
    },
];

fn find_account(username_or_email: &str) -> Option<&'static Account> {
    ACCOUNTS
        .iter()
        .find(|a| a.username == username_or_email || a.email == username_or_email)
}

fn auth_payload(id: &str, username: &str, full_name: &str, email: &str, role: &str) -> Value {
    json!({
        "token": format!("token-{username}"),
        "type": "Bearer",
        "id": id,
        "username": username,
        "email": email,
        "fullName": full_name,
        "role": role,
    })
}

/// Resolve the caller from the bearer token, or answer 401.
fn caller(headers: &HeaderMap) -> Result<&'static Account, Response> {
    headers
        .get("authorization")
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.strip_prefix("Bearer token-"))
        .and_then(find_account)
        .ok_or_else(|| fail(StatusCode::UNAUTHORIZED, "Full authentication is required"))
}

fn require_role(headers: &HeaderMap, role: &str) -> Result<&'static Account, Response> {
    let account = caller(headers)?;
    if account.role != role {
        return Err(fail(StatusCode::FORBIDDEN, "Access denied"));
    }
    Ok(account)
}

fn field<'a>(body: &'a Value, name: &str) -> &'a str {
    body.get(name).and_then(Value::as_str).unwrap_or_default()
}

// ---------------------------------------------------------------------------
// /auth
// ---------------------------------------------------------------------------

async fn register(State(state): State<Shared>, Json(body): Json<Value>) -> Response {
    record(&state, "POST /auth/register");
    let username = field(&body, "username");
    let email = field(&body, "email");
    if find_account(username).is_some() {
        return fail(StatusCode::BAD_REQUEST, "Username is already taken");
    }
    if find_account(email).is_some() {
        return fail(StatusCode::BAD_REQUEST, "Email is already registered");
    }
    let role = match field(&body, "role") {
        "TRAINER" => "ROLE_TRAINER",
        _ => "ROLE_USER",
    };
    *state.pending.lock().unwrap() = Some((
        username.to_string(),
        email.to_string(),
        field(&body, "fullName").to_string(),
        role.to_string(),
    ));
    ok(
        "Registration successful. Please check your email for OTP verification.",
        Value::Null,
    )
}

async fn verify_email(State(state): State<Shared>, Json(body): Json<Value>) -> Response {
    record(&state, "POST /auth/verify-email");
    let pending = state.pending.lock().unwrap().clone();
    match pending {
        Some((username, email, full_name, role))
            if email == field(&body, "email") && field(&body, "otp") == OTP =>
        {
            ok(
                "Email verified successfully",
                auth_payload("u-new", &username, &full_name, &email, &role),
            )
        }
        _ => fail(StatusCode::BAD_REQUEST, "Invalid or expired OTP"),
    }
}

/// Issues email-verification codes only, so verified accounts are refused.
async fn resend_otp(State(state): State<Shared>, Json(body): Json<Value>) -> Response {
    record(&state, "POST /auth/resend-otp");
    let email = field(&body, "email");
    let pending = state
        .pending
        .lock()
        .unwrap()
        .as_ref()
        .is_some_and(|(_, pending_email, _, _)| pending_email == email);
    if pending || find_account(email).is_some_and(|a| a.username == "newbie") {
        return ok("OTP sent successfully", Value::Null);
    }
    match find_account(email) {
        Some(_) => fail(StatusCode::BAD_REQUEST, "Email is already verified"),
        None => fail(StatusCode::NOT_FOUND, "User not found with this email"),
    }
}

async fn login(State(state): State<Shared>, Json(body): Json<Value>) -> Response {
    record(&state, "POST /auth/login");
    let Some(account) = find_account(field(&body, "username")) else {
        return fail(StatusCode::UNAUTHORIZED, "Invalid credentials");
    };
    if field(&body, "password") != PASSWORD {
        return fail(StatusCode::UNAUTHORIZED, "Invalid credentials");
    }
    if account.username == "newbie" {
        return fail(
            StatusCode::FORBIDDEN,
            "Email not verified. A new OTP has been sent to your email.",
        );
    }
    ok(
        "Login successful",
        auth_payload(
            account.id,
            account.username,
            account.full_name,
            account.email,
            account.role,
        ),
    )
}

async fn forgot_password(State(state): State<Shared>, Json(body): Json<Value>) -> Response {
    record(&state, "POST /auth/forgot-password");
    if find_account(field(&body, "email")).is_none() {
        return fail(StatusCode::NOT_FOUND, "User not found with this email");
    }
    ok("OTP sent to your email", Value::Null)
}

async fn reset_password(State(state): State<Shared>, Json(body): Json<Value>) -> Response {
    record(&state, "POST /auth/reset-password");
    if field(&body, "otp") != OTP {
        return fail(StatusCode::BAD_REQUEST, "Invalid or expired OTP");
    }
    ok("Password reset successfully", Value::Null)
}

// ---------------------------------------------------------------------------
// /trainers
// ---------------------------------------------------------------------------

fn trainer_json() -> Value {
    json!({ "id": "t-1", "fullName": "Tom Trainer", "username": "tom", "activeTraineeCount": 3 })
}

async fn list_trainers(State(state): State<Shared>, headers: HeaderMap) -> Response {
    record(&state, "GET /trainers");
    if let Err(r) = caller(&headers) {
        return r;
    }
    ok("Trainers retrieved", json!([trainer_json()]))
}

async fn select_trainer(
    State(state): State<Shared>,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> Response {
    record(&state, "POST /trainers/select");
    if let Err(r) = require_role(&headers, "ROLE_USER") {
        return r;
    }
    let trainer_id = field(&body, "trainerId");
    if trainer_id != "t-1" {
        return fail(StatusCode::NOT_FOUND, "Trainer not found");
    }
    *state.selected_trainer.lock().unwrap() = Some(trainer_id.to_string());
    ok("Trainer selected successfully", Value::Null)
}

async fn my_trainees(State(state): State<Shared>, headers: HeaderMap) -> Response {
    record(&state, "GET /trainers/my-trainees");
    if let Err(r) = require_role(&headers, "ROLE_TRAINER") {
        return r;
    }
    ok(
        "Trainees retrieved",
        json!([{
            "id": "u-1",
            "username": "alice",
            "fullName": "Alice Liddell",
            "email": "alice@example.com",
            "assignmentDate": "2026-03-01",
            "age": 31,
            "weight": 61.5,
            "height": 168.0,
            "fitnessGoal": "Endurance",
            "hasProfile": true,
        }]),
    )
}

async fn my_trainer_today(State(state): State<Shared>, headers: HeaderMap) -> Response {
    record(&state, "GET /trainers/my-trainer-today");
    if let Err(r) = caller(&headers) {
        return r;
    }
    match state.selected_trainer.lock().unwrap().as_deref() {
        Some(_) => ok("Trainer retrieved", trainer_json()),
        None => ok("No trainer selected for today", Value::Null),
    }
}

// ---------------------------------------------------------------------------
// /profile
// ---------------------------------------------------------------------------

async fn profile(State(state): State<Shared>, headers: HeaderMap) -> Response {
    record(&state, "GET /profile");
    let account = match caller(&headers) {
        Ok(a) => a,
        Err(r) => return r,
    };
    let fitness = state.fitness.lock().unwrap().clone().unwrap_or(Value::Null);
    ok(
        "Profile retrieved",
        json!({
            "id": account.id,
            "username": account.username,
            "email": account.email,
            "fullName": account.full_name,
            "role": account.role,
            "fitnessProfile": fitness,
        }),
    )
}

async fn save_fitness(
    State(state): State<Shared>,
    headers: HeaderMap,
    Json(mut body): Json<Value>,
) -> Response {
    record(&state, "POST /profile/fitness");
    if let Err(r) = caller(&headers) {
        return r;
    }
    body["id"] = json!("fp-1");
    *state.fitness.lock().unwrap() = Some(body.clone());
    ok("Fitness profile saved", body)
}

// ---------------------------------------------------------------------------
// /reports
// ---------------------------------------------------------------------------

async fn create_report(
    State(state): State<Shared>,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> Response {
    record(&state, "POST /reports");
    let account = match caller(&headers) {
        Ok(a) => a,
        Err(r) => return r,
    };
    let id = {
        let mut next = state.next_report.lock().unwrap();
        *next += 1;
        format!("r-{next}")
    };
    let report = json!({
        "id": id,
        "customerId": account.id,
        "customerName": account.full_name,
        "trainerId": field(&body, "trainerId"),
        "trainerName": "Tom Trainer",
        "message": field(&body, "message"),
        "status": "PENDING",
        "createdAt": "2026-03-01T10:00:00",
    });
    state.reports.lock().unwrap().push(report.clone());
    ok("Report submitted", report)
}

async fn my_reports(State(state): State<Shared>, headers: HeaderMap) -> Response {
    record(&state, "GET /reports/my-reports");
    let account = match caller(&headers) {
        Ok(a) => a,
        Err(r) => return r,
    };
    let mine: Vec<Value> = state
        .reports
        .lock()
        .unwrap()
        .iter()
        .filter(|r| r["customerId"] == account.id)
        .cloned()
        .collect();
    ok("Reports retrieved", Value::Array(mine))
}

async fn all_reports(State(state): State<Shared>, headers: HeaderMap) -> Response {
    record(&state, "GET /reports");
    if let Err(r) = require_role(&headers, "ROLE_ADMIN") {
        return r;
    }
    let all = state.reports.lock().unwrap().clone();
    ok("Reports retrieved", Value::Array(all))
}

async fn pending_reports(State(state): State<Shared>, headers: HeaderMap) -> Response {
    record(&state, "GET /reports/pending");
    if let Err(r) = require_role(&headers, "ROLE_ADMIN") {
        return r;
    }
    let pending: Vec<Value> = state
        .reports
        .lock()
        .unwrap()
        .iter()
        .filter(|r| r["status"] == "PENDING")
        .cloned()
        .collect();
    ok("Reports retrieved", Value::Array(pending))
}

async fn reports_by_trainer(
    State(state): State<Shared>,
    headers: HeaderMap,
    Path(trainer_id): Path<String>,
) -> Response {
    record(&state, format!("GET /reports/trainer/{trainer_id}"));
    if let Err(r) = require_role(&headers, "ROLE_ADMIN") {
        return r;
    }
    let matching: Vec<Value> = state
        .reports
        .lock()
        .unwrap()
        .iter()
        .filter(|r| r["trainerId"] == trainer_id.as_str())
        .cloned()
        .collect();
    ok("Reports retrieved", Value::Array(matching))
}

async fn update_report_status(
    State(state): State<Shared>,
    headers: HeaderMap,
    Path(id): Path<String>,
    Query(query): Query<HashMap<String, String>>,
) -> Response {
    let status = query.get("status").cloned().unwrap_or_default();
    record(&state, format!("PATCH /reports/{id}/status?status={status}"));
    let admin = match require_role(&headers, "ROLE_ADMIN") {
        Ok(a) => a,
        Err(r) => return r,
    };
    let mut reports = state.reports.lock().unwrap();
    let Some(report) = reports.iter_mut().find(|r| r["id"] == id.as_str()) else {
        return fail(StatusCode::NOT_FOUND, "Report not found");
    };
    report["status"] = json!(status);
    report["resolvedAt"] = json!("2026-03-02T09:30:00");
    report["resolvedBy"] = json!(admin.id);
    ok("Report status updated", report.clone())
}

async fn delete_report(
    State(state): State<Shared>,
    headers: HeaderMap,
    Path(id): Path<String>,
) -> Response {
    record(&state, format!("DELETE /reports/{id}"));
    if let Err(r) = require_role(&headers, "ROLE_ADMIN") {
        return r;
    }
    let mut reports = state.reports.lock().unwrap();
    let before = reports.len();
    reports.retain(|r| r["id"] != id.as_str());
    if reports.len() == before {
        return fail(StatusCode::NOT_FOUND, "Report not found");
    }
    ok("Report deleted successfully", Value::Null)
}

// ---------------------------------------------------------------------------
// /admin
// ---------------------------------------------------------------------------

async fn admin_stats(State(state): State<Shared>, headers: HeaderMap) -> Response {
    record(&state, "GET /admin/stats");
    if let Err(r) = require_role(&headers, "ROLE_ADMIN") {
        return r;
    }
    let reports = state.reports.lock().unwrap();
    let pending = reports.iter().filter(|r| r["status"] == "PENDING").count();
    ok(
        "Stats retrieved",
        json!({
            "totalUsers": 2,
            "totalTrainers": 1,
            "pendingReports": pending,
            "totalReports": reports.len(),
            "activeAssignments": 1,
        }),
    )
}

fn summary(account: &Account) -> Value {
    json!({
        "id": account.id,
        "username": account.username,
        "email": account.email,
        "fullName": account.full_name,
        "role": account.role,
        "emailVerified": account.username != "newbie",
        "createdAt": "2026-01-15T08:00:00",
    })
}

async fn customers(State(state): State<Shared>, headers: HeaderMap) -> Response {
    record(&state, "GET /admin/customers");
    if let Err(r) = require_role(&headers, "ROLE_ADMIN") {
        return r;
    }
    let rows: Vec<Value> = ACCOUNTS
        .iter()
        .filter(|a| a.role == "ROLE_USER")
        .map(summary)
        .collect();
    ok("Customers retrieved", Value::Array(rows))
}

async fn trainer_accounts(State(state): State<Shared>, headers: HeaderMap) -> Response {
    record(&state, "GET /admin/trainers");
    if let Err(r) = require_role(&headers, "ROLE_ADMIN") {
        return r;
    }
    let rows: Vec<Value> = ACCOUNTS
        .iter()
        .filter(|a| a.role == "ROLE_TRAINER")
        .map(|a| {
            let mut row = summary(a);
            row["assignedClients"] = json!(3);
            row
        })
        .collect();
    ok("Trainers retrieved", Value::Array(rows))
}

async fn delete_user(
    State(state): State<Shared>,
    headers: HeaderMap,
    Path(id): Path<String>,
) -> Response {
    record(&state, format!("DELETE /admin/users/{id}"));
    if let Err(r) = require_role(&headers, "ROLE_ADMIN") {
        return r;
    }
    if !ACCOUNTS.iter().any(|a| a.id == id) {
        return fail(StatusCode::NOT_FOUND, "User not found");
    }
    ok("User deleted successfully", Value::Null)
}
