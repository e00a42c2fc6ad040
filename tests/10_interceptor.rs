mod common;

use anyhow::Result;
use serde_json::json;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use mnp_interservice::{
    AiClient, ClientError, Credential, CredentialContext, ProfileClient,
};

// Outbound interceptor behavior: the Authorization header is attached
// exactly when the unit of work holds a non-empty credential, and it is
// re-read from the store on every call.

#[tokio::test]
async fn outbound_call_carries_scoped_credential() -> Result<()> {
    let downstream = common::spawn_downstream().await;
    let profile = ProfileClient::new(&downstream.uri())?;

    CredentialContext::scope_with(Credential::from("abc123"), async {
        profile.get_user_profile("user-1").await
    })
    .await?;

    let requests = downstream.received_requests().await.unwrap();
    assert_eq!(requests.len(), 1);
    assert_eq!(
        requests[0].headers.get("authorization").unwrap(),
        "Bearer abc123"
    );
    Ok(())
}

#[tokio::test]
async fn outbound_call_without_scope_has_no_header() -> Result<()> {
    let downstream = common::spawn_downstream().await;
    let profile = ProfileClient::new(&downstream.uri())?;

    // No unit of work at all: the context read fails and the interceptor
    // degrades to an unauthenticated call instead of failing it.
    profile.get_user_profile("user-1").await?;

    let requests = downstream.received_requests().await.unwrap();
    assert_eq!(requests.len(), 1);
    assert!(requests[0].headers.get("authorization").is_none());
    Ok(())
}

#[tokio::test]
async fn outbound_call_in_empty_scope_has_no_header() -> Result<()> {
    let downstream = common::spawn_downstream().await;
    let profile = ProfileClient::new(&downstream.uri())?;

    CredentialContext::scope(async { profile.get_user_profile("user-1").await }).await?;

    let requests = downstream.received_requests().await.unwrap();
    assert!(requests[0].headers.get("authorization").is_none());
    Ok(())
}

#[tokio::test]
async fn empty_credential_never_becomes_a_header() -> Result<()> {
    let downstream = common::spawn_downstream().await;
    let profile = ProfileClient::new(&downstream.uri())?;

    CredentialContext::scope_with(Credential::from(""), async {
        profile.get_user_profile("user-1").await
    })
    .await?;

    let requests = downstream.received_requests().await.unwrap();
    assert!(requests[0].headers.get("authorization").is_none());
    Ok(())
}

#[tokio::test]
async fn mid_flow_reauthentication_is_reflected_on_next_call() -> Result<()> {
    let downstream = common::spawn_downstream().await;
    let profile = ProfileClient::new(&downstream.uri())?;

    CredentialContext::scope(async {
        CredentialContext::set(Credential::from("first-token")).unwrap();
        profile.get_user_profile("user-1").await?;

        CredentialContext::set(Credential::from("second-token")).unwrap();
        profile.get_user_profile("user-1").await
    })
    .await?;

    let requests = downstream.received_requests().await.unwrap();
    assert_eq!(requests.len(), 2);
    assert_eq!(
        requests[0].headers.get("authorization").unwrap(),
        "Bearer first-token"
    );
    assert_eq!(
        requests[1].headers.get("authorization").unwrap(),
        "Bearer second-token"
    );
    Ok(())
}

#[tokio::test]
async fn internal_call_headers_are_always_present() -> Result<()> {
    let downstream = common::spawn_downstream().await;
    let profile = ProfileClient::new(&downstream.uri())?;

    profile.get_user_profile("user-1").await?;

    let requests = downstream.received_requests().await.unwrap();
    assert_eq!(requests[0].headers.get("x-internal-request").unwrap(), "true");
    assert!(requests[0].headers.get("x-service-name").is_some());
    Ok(())
}

#[tokio::test]
async fn upstream_404_maps_to_not_found() -> Result<()> {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/internal/profiles/missing"))
        .respond_with(
            ResponseTemplate::new(404)
                .set_body_json(json!({ "code": 1005, "message": "User not existed" })),
        )
        .mount(&server)
        .await;

    let profile = ProfileClient::new(&server.uri())?;
    let err = profile.get_user_profile("missing").await.unwrap_err();

    match err {
        ClientError::NotFound(message) => assert_eq!(message, "User not existed"),
        other => panic!("expected NotFound, got {other:?}"),
    }
    Ok(())
}

#[tokio::test]
async fn error_envelope_on_200_maps_to_api_error() -> Result<()> {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/internal/profiles/user-1"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({ "code": 1007, "message": "You do not have permission" })),
        )
        .mount(&server)
        .await;

    let profile = ProfileClient::new(&server.uri())?;
    let err = profile.get_user_profile("user-1").await.unwrap_err();

    match err {
        ClientError::Api { code, message } => {
            assert_eq!(code, 1007);
            assert_eq!(message, "You do not have permission");
        }
        other => panic!("expected Api error, got {other:?}"),
    }
    Ok(())
}

#[tokio::test]
async fn batch_profile_lookup_repeats_query_param() -> Result<()> {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/internal/profiles/batch"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(common::envelope(json!([]))),
        )
        .mount(&server)
        .await;

    let profile = ProfileClient::new(&server.uri())?;
    let profiles = profile.get_user_profiles(&["user-1", "user-2"]).await?;
    assert!(profiles.is_empty());

    let requests = server.received_requests().await.unwrap();
    let query = requests[0].url.query().unwrap_or_default();
    assert!(query.contains("userIds=user-1"));
    assert!(query.contains("userIds=user-2"));
    Ok(())
}

#[tokio::test]
async fn unreachable_ai_service_degrades_to_empty_recommendations() -> Result<()> {
    // Nothing is listening on this port; the transport error must degrade,
    // not propagate.
    let ai = AiClient::new("http://127.0.0.1:9")?;
    let recommendations = ai.generate_task_recommendations("task-1").await?;
    assert!(recommendations.is_empty());
    Ok(())
}
