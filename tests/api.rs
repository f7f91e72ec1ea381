use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use axum::body::{Body, to_bytes};
use axum::http::{Request, StatusCode, header};
use lecsched::{AppState, app};
use lecsched_core::{
    CalendarEvent, CalendarProvider, Credentials, EventWindow, Lecturer, ProviderError,
    ReferenceData, ScheduleExpander, SubjectSchedule, TokenGrant, UserInfo,
};
use serde_json::{Value, json};
use tower::ServiceExt;

#[derive(Default)]
struct FakeProvider {
    inserted: Mutex<Vec<CalendarEvent>>,
    /// Insert calls (0-based) that fail
    fail_on: Vec<usize>,
    calls: Mutex<usize>,
}

#[async_trait]
impl CalendarProvider for FakeProvider {
    fn consent_url(&self) -> Result<String, ProviderError> {
        Ok("https://accounts.example.com/consent?state=xyz".to_string())
    }

    async fn exchange_code(&self, code: &str, _state: &str) -> Result<TokenGrant, ProviderError> {
        if code != "good-code" {
            return Err(ProviderError::Auth("invalid_grant".to_string()));
        }
        Ok(TokenGrant {
            access_token: "access-1".to_string(),
            refresh_token: "refresh-1".to_string(),
            expires_in: 3600,
        })
    }

    async fn user_info(&self, _access_token: &str) -> Result<UserInfo, ProviderError> {
        Ok(UserInfo {
            id: "42".to_string(),
            email: "lecturer@hcmut.edu.vn".to_string(),
            name: "Lê Cao Đăng".to_string(),
        })
    }

    async fn insert_event(
        &self,
        _credentials: &Credentials,
        event: &CalendarEvent,
    ) -> Result<(), ProviderError> {
        let call = {
            let mut calls = self.calls.lock().unwrap();
            let call = *calls;
            *calls += 1;
            call
        };
        if self.fail_on.contains(&call) {
            return Err(ProviderError::Request("rate limited".to_string()));
        }
        self.inserted.lock().unwrap().push(event.clone());
        Ok(())
    }

    async fn list_events(
        &self,
        credentials: &Credentials,
        window: &EventWindow,
    ) -> Result<Vec<Value>, ProviderError> {
        Ok(vec![json!({
            "summary": "listed",
            "token": credentials.access_token,
            "from": window.from.to_rfc3339(),
            "to": window.to.to_rfc3339(),
        })])
    }
}

fn reference() -> ReferenceData {
    let subjects: Vec<SubjectSchedule> = serde_json::from_value(json!([
        {
            "id": "14178",
            "maMonHoc": "AS2009",
            "tenMonHoc": "Cơ học lượng tử",
            "soTinChi": 3,
            "lichHoc": [{
                "classInfo": [{ "phong": "H6-411", "dayOfWeek": 3, "tietHoc": [5, 6], "week": [1, 2] }],
                "giangVien": "Lê Cao Đăng",
                "giangVienBT": "",
                "group": "L01"
            }]
        }
    ]))
    .unwrap();

    let lecturers = vec![Lecturer {
        name: "Lê Cao Đăng".to_string(),
        email: "lcdang@hcmut.edu.vn".to_string(),
        phone: "5317".to_string(),
    }];

    ReferenceData::from_parts(subjects, lecturers)
}

fn state_with(provider: Arc<FakeProvider>) -> AppState {
    AppState::new(reference(), ScheduleExpander::default(), provider)
}

fn schedule_payload() -> Value {
    json!({
        "maMonHoc": "AS2009",
        "tenMonHoc": "Cơ học lượng tử",
        "lichHoc": [{
            "classInfo": [{ "phong": "H6-411", "dayOfWeek": 3, "tietHoc": [5, 6], "week": [1, 2] }],
            "giangVien": "Lê Cao Đăng",
            "email": "a@b.vn",
            "group": "L01"
        }]
    })
}

async fn send(state: AppState, request: Request<Body>) -> (StatusCode, Vec<u8>) {
    let response = app(state).oneshot(request).await.unwrap();
    let status = response.status();
    let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    (status, body.to_vec())
}

async fn get(state: AppState, uri: &str) -> (StatusCode, Vec<u8>) {
    send(state, Request::get(uri).body(Body::empty()).unwrap()).await
}

fn json_body(body: &[u8]) -> Value {
    serde_json::from_slice(body).unwrap()
}

fn post_calendar(uri: &str, body: impl Into<Body>) -> Request<Body> {
    Request::post(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(body.into())
        .unwrap()
}

#[tokio::test]
async fn test_home_and_health() {
    let state = state_with(Arc::default());

    let (status, body) = get(state.clone(), "/").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, b"Hello, World!");

    let (status, body) = get(state, "/health").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json_body(&body), json!({ "status": "ok" }));
}

#[tokio::test]
async fn test_search_by_code_and_lecturer() {
    let state = state_with(Arc::default());

    let (status, body) = get(state.clone(), "/api?id=as2009").await;
    assert_eq!(status, StatusCode::OK);
    let found = json_body(&body);
    assert_eq!(found[0]["maMonHoc"], "AS2009");
    assert_eq!(found[0]["lichHoc"][0]["email"], "lcdang@hcmut.edu.vn");
    assert_eq!(found[0]["lichHoc"][0]["emailBT"], "");

    let (_, body) = get(state.clone(), "/api?gv=Le%20Cao%20Dang").await;
    assert_eq!(json_body(&body).as_array().unwrap().len(), 1);

    let (_, body) = get(state, "/api").await;
    assert_eq!(json_body(&body), json!([]));
}

#[tokio::test]
async fn test_info_endpoints() {
    let state = state_with(Arc::default());

    let (_, body) = get(state.clone(), "/api/info?gv=Nobody").await;
    assert_eq!(json_body(&body), json!({ "name": "Nobody", "email": "", "phone": "" }));

    let (_, body) = get(state.clone(), "/api/info").await;
    assert_eq!(json_body(&body)[0]["name"], "Lê Cao Đăng");

    let (_, body) = get(state.clone(), "/api/info/subject").await;
    assert_eq!(json_body(&body), json!([{ "id": "AS2009", "name": "Cơ học lượng tử" }]));

    let (_, body) = get(state, "/api/lecturers").await;
    assert_eq!(json_body(&body).as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn test_subject_catalog() {
    let state = state_with(Arc::default());

    let (status, body) = get(state.clone(), "/api/subjects?maMonHoc=%20AS2009%20").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        json_body(&body),
        json!({ "maMonHoc": "AS2009", "tenMonHoc": "Cơ học lượng tử", "soTinChi": 3, "id": "14178" })
    );

    let (status, body) = get(state.clone(), "/api/subjects?maMonHoc=XX0000").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(json_body(&body), json!({ "error": "Subject not found" }));

    let (_, body) = get(state, "/api/subjects").await;
    assert_eq!(json_body(&body).as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn test_auth_flow() {
    let state = state_with(Arc::default());

    let response = app(state.clone())
        .oneshot(Request::get("/api/auth/login").body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::FOUND);
    assert_eq!(
        response.headers()[header::LOCATION],
        "https://accounts.example.com/consent?state=xyz"
    );

    let (status, body) = get(state.clone(), "/api/auth/callback?code=good-code&state=xyz").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        json_body(&body),
        json!({
            "access_token": "access-1",
            "refresh_token": "refresh-1",
            "google_id": "42",
            "email": "lecturer@hcmut.edu.vn",
            "name": "Lê Cao Đăng"
        })
    );

    let (status, _) = get(state.clone(), "/api/auth/callback?code=bad&state=xyz").await;
    assert_eq!(status, StatusCode::BAD_GATEWAY);

    let (status, _) = get(state.clone(), "/api/auth/callback").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = send(
        state,
        Request::post("/api/auth/logout").body(Body::empty()).unwrap(),
    )
    .await;
    assert_eq!(status, StatusCode::NO_CONTENT);
}

#[tokio::test]
async fn test_guard_rejects_missing_tokens() {
    let state = state_with(Arc::default());

    for uri in ["/api/auth/protected", "/api/calendar", "/api/calendar?access_token=a"] {
        let (status, body) = get(state.clone(), uri).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED, "{}", uri);
        assert_eq!(
            json_body(&body),
            json!({ "error": "Access token and refresh token are required" })
        );
    }

    let (status, _) = send(
        state.clone(),
        post_calendar("/api/calendar/", schedule_payload().to_string()),
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let request = Request::get("/api/auth/protected")
        .header(header::AUTHORIZATION, "Bearer a")
        .header("x-refresh-token", "r")
        .body(Body::empty())
        .unwrap();
    let (status, body) = send(state, request).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json_body(&body), json!({ "message": "This is a protected route" }));
}

#[tokio::test]
async fn test_list_events_window() {
    let state = state_with(Arc::default());

    let uri = "/api/calendar?access_token=a&refresh_token=r\
               &startDate=2025-02-01T00:00:00Z&endDate=2025-03-01T00:00:00Z";
    let (status, body) = get(state.clone(), uri).await;
    assert_eq!(status, StatusCode::OK);

    let listed = json_body(&body);
    assert_eq!(listed[0]["token"], "a");
    assert_eq!(listed[0]["from"], "2025-02-01T00:00:00+00:00");
    assert_eq!(listed[0]["to"], "2025-03-01T00:00:00+00:00");

    let (status, _) = get(state, "/api/calendar?access_token=a&refresh_token=r&startDate=yesterday").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_create_events() {
    let provider = Arc::new(FakeProvider::default());
    let state = state_with(provider.clone());

    let request = post_calendar(
        "/api/calendar/?access_token=a&refresh_token=r",
        schedule_payload().to_string(),
    );
    let (status, body) = send(state, request).await;
    assert_eq!(status, StatusCode::CREATED);

    let body = json_body(&body);
    assert_eq!(body["message"], "Events created successfully");
    assert_eq!(body["event"].as_array().unwrap().len(), 2);
    assert_eq!(body["event"][0]["start"]["dateTime"], "2025-02-05T11:00:00+00:00");
    assert_eq!(body["event"][1]["end"]["dateTime"], "2025-02-12T12:50:00+00:00");
    assert_eq!(body["event"][0]["summary"], "AS2009 – Cơ học lượng tử");

    assert_eq!(provider.inserted.lock().unwrap().len(), 2);
}

#[tokio::test]
async fn test_create_events_rejects_bad_payloads() {
    let provider = Arc::new(FakeProvider::default());
    let state = state_with(provider.clone());
    let uri = "/api/calendar/?access_token=a&refresh_token=r";

    let (status, body) = send(state.clone(), post_calendar(uri, "")).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(json_body(&body), json!({ "error": "No payload provided" }));

    let mut bad_day = schedule_payload();
    bad_day["lichHoc"][0]["classInfo"][0]["dayOfWeek"] = json!(8);
    let (status, _) = send(state.clone(), post_calendar(uri, bad_day.to_string())).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let mut bad_period = schedule_payload();
    bad_period["lichHoc"][0]["classInfo"][0]["tietHoc"] = json!([5, 13]);
    let (status, _) = send(state, post_calendar(uri, bad_period.to_string())).await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);

    // Nothing reached the calendar
    assert!(provider.inserted.lock().unwrap().is_empty());
}

#[tokio::test]
async fn test_create_events_reports_partial_failure() {
    let provider = Arc::new(FakeProvider {
        fail_on: vec![0],
        ..Default::default()
    });
    let state = state_with(provider.clone());

    let request = post_calendar(
        "/api/calendar/?access_token=a&refresh_token=r",
        schedule_payload().to_string(),
    );
    let (status, body) = send(state, request).await;
    assert_eq!(status, StatusCode::BAD_GATEWAY);

    let body = json_body(&body);
    assert_eq!(body["created"], 1);
    assert_eq!(body["failed"][0]["index"], 0);
    assert_eq!(body["event"].as_array().unwrap().len(), 2);

    // The second insert still went through
    assert_eq!(provider.inserted.lock().unwrap().len(), 1);
}
