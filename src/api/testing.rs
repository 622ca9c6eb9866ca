//! In-process stand-in for the CareerLens API, served by axum on a random
//! local port.

use axum::extract::{Path, State};
use axum::http::header::AUTHORIZATION;
use axum::http::{HeaderMap, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post, put};
use axum::{Json, Router};
use serde_json::{json, Value};
use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

use super::resume::Resume;
use super::ApiClient;
use crate::analysis::AnalysisResult;
use crate::config::ApiConfig;
use crate::session::{AuthSession, AuthUser, SessionStore};

#[derive(Default)]
struct FakeState {
    resumes: Vec<Resume>,
    next_resume_id: i64,
    fail_resume_list: bool,
    resume_list_auth: Vec<Option<String>>,
    auth_calls: u32,
    analysis_results: VecDeque<AnalysisResult>,
    analysis_fetches: u32,
    last_analysis_request: Option<Value>,
    omit_analysis_id: bool,
}

type Shared = Arc<Mutex<FakeState>>;

pub(crate) struct FakeApi {
    base_url: String,
    state: Shared,
    sessions: SessionStore,
}

impl FakeApi {
    pub const PASSWORD: &'static str = "secret";
    pub const TOKEN: &'static str = "tok-123";

    pub async fn start() -> Self {
        let state: Shared = Arc::new(Mutex::new(FakeState {
            next_resume_id: 1,
            ..Default::default()
        }));

        let api = Router::new()
            .route("/auth/login", post(login))
            .route("/auth/register", post(register))
            .route("/resume", get(list_resumes).post(create_resume))
            .route("/resume/:id", put(update_resume).delete(delete_resume))
            .route("/analysis", post(create_analysis))
            .route("/analysis/:id", get(fetch_analysis))
            .with_state(state.clone());
        let app = Router::new().nest("/api/v1", api);

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        Self {
            base_url: format!("http://{addr}/api/v1"),
            state,
            sessions: SessionStore::in_memory(),
        }
    }

    /// A client sharing this fake's session store.
    pub fn client(&self) -> ApiClient {
        let config = ApiConfig {
            base_url: self.base_url.clone(),
            timeout_secs: 5,
        };
        ApiClient::new(&config, self.sessions.clone()).unwrap()
    }

    pub async fn sign_in(&self) {
        let session = AuthSession {
            user: AuthUser {
                id: 1,
                name: "Ana".to_string(),
                email: Some("ana@example.com".to_string()),
            },
            token: Self::TOKEN.to_string(),
        };
        self.sessions.save(&session).await.unwrap();
    }

    pub fn seed_resume(&self, title: &str, description: &str) {
        let mut state = self.state.lock().unwrap();
        let id = state.next_resume_id;
        state.next_resume_id += 1;
        state.resumes.push(Resume {
            id,
            title: title.to_string(),
            description: description.to_string(),
        });
    }

    pub fn fail_resume_list(&self, fail: bool) {
        self.state.lock().unwrap().fail_resume_list = fail;
    }

    pub fn omit_analysis_id(&self, omit: bool) {
        self.state.lock().unwrap().omit_analysis_id = omit;
    }

    pub fn queue_analysis_result(&self, result: AnalysisResult) {
        self.state.lock().unwrap().analysis_results.push_back(result);
    }

    pub fn resume_list_auth_headers(&self) -> Vec<Option<String>> {
        self.state.lock().unwrap().resume_list_auth.clone()
    }

    pub fn auth_calls(&self) -> u32 {
        self.state.lock().unwrap().auth_calls
    }

    pub fn analysis_fetches(&self) -> u32 {
        self.state.lock().unwrap().analysis_fetches
    }

    pub fn last_analysis_request(&self) -> Option<Value> {
        self.state.lock().unwrap().last_analysis_request.clone()
    }
}

async fn login(State(state): State<Shared>, Json(body): Json<Value>) -> Response {
    state.lock().unwrap().auth_calls += 1;
    if body["password"] == FakeApi::PASSWORD {
        Json(json!({"id": 1, "name": "Ana", "token": FakeApi::TOKEN})).into_response()
    } else {
        (StatusCode::UNAUTHORIZED, "invalid credentials").into_response()
    }
}

async fn register(State(state): State<Shared>, Json(body): Json<Value>) -> Response {
    state.lock().unwrap().auth_calls += 1;
    Json(json!({"id": 2, "name": body["name"], "token": "tok-new"})).into_response()
}

async fn list_resumes(State(state): State<Shared>, headers: HeaderMap) -> Response {
    let mut state = state.lock().unwrap();
    let auth = headers
        .get(AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .map(str::to_string);
    state.resume_list_auth.push(auth);

    if state.fail_resume_list {
        return (StatusCode::INTERNAL_SERVER_ERROR, "database unavailable").into_response();
    }
    Json(json!({"content": state.resumes, "totalElements": state.resumes.len()})).into_response()
}

async fn create_resume(State(state): State<Shared>, Json(body): Json<Value>) -> Response {
    let mut state = state.lock().unwrap();
    let resume = Resume {
        id: state.next_resume_id,
        title: body["title"].as_str().unwrap_or_default().to_string(),
        description: body["description"].as_str().unwrap_or_default().to_string(),
    };
    state.next_resume_id += 1;
    state.resumes.push(resume.clone());
    (StatusCode::CREATED, Json(resume)).into_response()
}

async fn update_resume(
    State(state): State<Shared>,
    Path(id): Path<i64>,
    Json(body): Json<Value>,
) -> Response {
    let mut state = state.lock().unwrap();
    match state.resumes.iter_mut().find(|r| r.id == id) {
        Some(resume) => {
            resume.title = body["title"].as_str().unwrap_or_default().to_string();
            resume.description = body["description"].as_str().unwrap_or_default().to_string();
            Json(resume.clone()).into_response()
        }
        None => (StatusCode::NOT_FOUND, "resume not found").into_response(),
    }
}

async fn delete_resume(State(state): State<Shared>, Path(id): Path<i64>) -> StatusCode {
    let mut state = state.lock().unwrap();
    let before = state.resumes.len();
    state.resumes.retain(|r| r.id != id);
    if state.resumes.len() < before {
        StatusCode::NO_CONTENT
    } else {
        StatusCode::NOT_FOUND
    }
}

async fn create_analysis(State(state): State<Shared>, Json(body): Json<Value>) -> Json<Value> {
    let mut state = state.lock().unwrap();
    state.last_analysis_request = Some(body);
    if state.omit_analysis_id {
        Json(json!({"status": "PENDING"}))
    } else {
        Json(json!({"id": 7, "status": "PENDING"}))
    }
}

async fn fetch_analysis(State(state): State<Shared>, Path(_id): Path<i64>) -> Json<AnalysisResult> {
    let mut state = state.lock().unwrap();
    state.analysis_fetches += 1;
    Json(state.analysis_results.pop_front().unwrap_or_default())
}
