use std::sync::Arc;

use anyhow::Result;
use axum::{
    extract::{Path, State},
    middleware,
    response::Json,
    routing::post,
    Router,
};
use serde_json::{json, Value};
use tokio::net::TcpListener;
use tower_http::trace::TraceLayer;
use wiremock::matchers::{method, path_regex};
use wiremock::{Mock, MockServer, ResponseTemplate};

use mnp_interservice::clients::types::{NotificationChannel, TaskAssignmentNotificationRequest};
use mnp_interservice::{propagate_credentials, NotificationClient, ProfileClient};

/// Platform response envelope with a successful code.
pub fn envelope(result: Value) -> Value {
    json!({ "code": 1000, "result": result })
}

/// Minimal profile body accepted by the typed client.
pub fn profile_body() -> Value {
    json!({
        "id": "profile-1",
        "userId": "user-1",
        "availabilityStatus": "AVAILABLE"
    })
}

/// Downstream stub standing in for the profile and notification services;
/// answers every internal endpoint and records what it received.
pub async fn spawn_downstream() -> MockServer {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path_regex(r"^/internal/profiles/.*$"))
        .respond_with(ResponseTemplate::new(200).set_body_json(envelope(profile_body())))
        .mount(&server)
        .await;

    Mock::given(method("POST"))
        .and(path_regex(r"^/internal/notifications/.*$"))
        .respond_with(ResponseTemplate::new(200).set_body_json(envelope(json!("queued"))))
        .mount(&server)
        .await;

    server
}

pub struct Clients {
    pub profile: ProfileClient,
    pub notification: NotificationClient,
}

/// Spawn an in-process service whose handler fans out two internal calls
/// (profile lookup, then notification send) within one unit of work.
pub async fn spawn_app(downstream_url: &str) -> Result<String> {
    let clients = Arc::new(Clients {
        profile: ProfileClient::new(downstream_url)?,
        notification: NotificationClient::new(downstream_url)?,
    });

    let app = Router::new()
        .route("/api/assignments/:task_id/notify", post(fanout_handler))
        .layer(middleware::from_fn(propagate_credentials))
        .layer(TraceLayer::new_for_http())
        .with_state(clients);

    let listener = TcpListener::bind("127.0.0.1:0").await?;
    let base_url = format!("http://{}", listener.local_addr()?);
    tokio::spawn(async move {
        let _ = axum::serve(listener, app).await;
    });

    Ok(base_url)
}

async fn fanout_handler(
    State(clients): State<Arc<Clients>>,
    Path(task_id): Path<String>,
) -> Json<Value> {
    // The task id doubles as the assignee lookup key so downstream requests
    // can be correlated back to the inbound unit of work in assertions.
    let profile_ok = clients.profile.get_user_profile(&task_id).await.is_ok();

    let request = TaskAssignmentNotificationRequest::new(
        NotificationChannel::Websocket,
        task_id,
        "TASK_ASSIGNED",
        "New task",
        "You have been assigned a task",
    );
    let notify_ok = clients.notification.send(&request).await.is_ok();

    Json(envelope(json!({
        "profileOk": profile_ok,
        "notifyOk": notify_ok
    })))
}
