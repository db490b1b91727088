//! End-to-end tournament flows against a wiremock tournament server.
//!
//! ## Flows Tested
//!
//! | Flow | Endpoint | Test |
//! |------|----------|------|
//! | Registration gate | `POST /api/submitter/register` | `register_*` |
//! | Result submission | `POST {submitUrl}` | `submit_*` |

use std::sync::Arc;
use std::time::Duration;

use touche_client::{ClientConfig, CredentialStore, KeyValueStore, MemoryStore, TournamentClient};
use touche_core::{MatchDescriptor, MatchFormat, Side};
use touche_session::{
    LoadOutcome, MatchEvent, NoopWakeLock, Session, SessionConfig, SessionError, SharedCredentials,
    SubmissionStatus,
};
use wiremock::matchers::{body_json, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

const FLASH: Duration = Duration::from_millis(50);

fn credentials() -> SharedCredentials {
    CredentialStore::new(Arc::new(MemoryStore::new()) as Arc<dyn KeyValueStore>)
}

fn session(credentials: SharedCredentials) -> Session {
    let client = TournamentClient::new(&ClientConfig::with_timeout(5)).unwrap();
    let config = SessionConfig {
        submitted_flash: FLASH,
        ..SessionConfig::default()
    };
    Session::with_config(config, client, credentials, Box::new(NoopWakeLock)).unwrap()
}

fn descriptor(server: &MockServer, require_identity: bool) -> MatchDescriptor {
    MatchDescriptor {
        match_id: "match-42".to_string(),
        player1: "Kim".to_string(),
        player2: "Ada".to_string(),
        tournament_id: 9,
        round: 1,
        base_uri: server.uri(),
        submit_url: format!("{}/api/matches/match-42/result", server.uri()),
        require_submitter_identity: require_identity,
    }
}

async fn mount_submit(server: &MockServer, body: serde_json::Value, status: u16) {
    Mock::given(method("POST"))
        .and(path("/api/matches/match-42/result"))
        .and(body_json(body))
        .respond_with(ResponseTemplate::new(status))
        .expect(1)
        .mount(server)
        .await;
}

// ── Registration gate ────────────────────────────────────────────────

#[tokio::test]
async fn register_saves_credential_and_loads_match() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/submitter/register"))
        .and(body_json(serde_json::json!({ "name": "Piste 2" })))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(serde_json::json!({ "deviceToken": "dev-1" })),
        )
        .expect(1)
        .mount(&server)
        .await;

    let session = session(credentials());
    let outcome = session.offer_descriptor(descriptor(&server, true)).unwrap();
    assert_eq!(outcome, LoadOutcome::RegistrationRequired);

    session.register_device(" Piste 2 ").await.unwrap();

    let token = session.credentials().get_token().unwrap().unwrap();
    assert_eq!(token.as_str(), "dev-1");
    assert_eq!(
        session.credentials().get_device_name().unwrap().as_deref(),
        Some("Piste 2")
    );
    assert!(session.pending_registration().is_none());
    let state = session.snapshot();
    assert_eq!(state.external_match().unwrap().match_id, "match-42");
    assert_eq!(state.competitor(Side::Right).display_name.as_deref(), Some("Ada"));
}

#[tokio::test]
async fn register_failure_keeps_match_pending() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/submitter/register"))
        .respond_with(ResponseTemplate::new(500).set_body_string("down"))
        .mount(&server)
        .await;

    let session = session(credentials());
    session.offer_descriptor(descriptor(&server, true)).unwrap();

    let err = session.register_device("Piste 2").await.unwrap_err();
    assert!(matches!(err, SessionError::Client(_)));
    assert!(session.credentials().get_token().unwrap().is_none());
    assert!(session.pending_registration().is_some());
    assert!(session.snapshot().external_match().is_none());
}

// ── Result submission ────────────────────────────────────────────────

#[tokio::test]
async fn submit_success_flashes_then_clears_match() {
    let server = MockServer::start().await;
    mount_submit(
        &server,
        serde_json::json!({
            "matchId": "match-42",
            "player1_hits": 3,
            "player2_hits": 1,
            "winner": "Kim"
        }),
        200,
    )
    .await;

    let session = session(credentials());
    session.offer_descriptor(descriptor(&server, false)).unwrap();
    for _ in 0..3 {
        session.apply(MatchEvent::IncrementScore(Side::Left));
    }
    session.apply(MatchEvent::IncrementScore(Side::Right));

    session.submit_result().await.unwrap();
    assert_eq!(
        *session.submission_status().borrow(),
        SubmissionStatus::Submitted {
            match_id: "match-42".to_string()
        }
    );
    assert!(session.snapshot().external_match().is_some());

    tokio::time::sleep(FLASH * 4).await;
    assert!(session.snapshot().external_match().is_none());
    assert_eq!(*session.submission_status().borrow(), SubmissionStatus::Idle);
    assert_eq!(session.snapshot().score(Side::Left), 3);
}

#[tokio::test]
async fn submit_follows_competitors_across_swap() {
    let server = MockServer::start().await;
    mount_submit(
        &server,
        serde_json::json!({
            "matchId": "match-42",
            "player1_hits": 0,
            "player2_hits": 2,
            "winner": "Ada"
        }),
        200,
    )
    .await;

    let session = session(credentials());
    session.offer_descriptor(descriptor(&server, false)).unwrap();
    session.apply(MatchEvent::SwapSides);
    session.apply(MatchEvent::IncrementScore(Side::Left));
    session.apply(MatchEvent::IncrementScore(Side::Left));

    session.submit_result().await.unwrap();
}

#[tokio::test]
async fn submit_tie_resolved_by_priority_after_overtime() {
    let server = MockServer::start().await;
    mount_submit(
        &server,
        serde_json::json!({
            "matchId": "match-42",
            "player1_hits": 2,
            "player2_hits": 2,
            "winner": "Ada"
        }),
        200,
    )
    .await;

    let session = session(credentials());
    session.apply(MatchEvent::ChangeFormat(MatchFormat::FreeForm));
    session.offer_descriptor(descriptor(&server, false)).unwrap();
    session.apply(MatchEvent::ChangeScore { side: Side::Left, score: 2 });
    session.apply(MatchEvent::ChangeScore { side: Side::Right, score: 2 });
    session.apply(MatchEvent::AssignPriority(Side::Right));
    session.apply(MatchEvent::ChangeTime(0));

    session.submit_result().await.unwrap();
}

#[tokio::test]
async fn submit_tie_before_overtime_ends_reports_tie() {
    let server = MockServer::start().await;
    mount_submit(
        &server,
        serde_json::json!({
            "matchId": "match-42",
            "player1_hits": 1,
            "player2_hits": 1,
            "winner": "tie"
        }),
        200,
    )
    .await;

    let session = session(credentials());
    session.offer_descriptor(descriptor(&server, false)).unwrap();
    session.apply(MatchEvent::ChangeScore { side: Side::Left, score: 1 });
    session.apply(MatchEvent::ChangeScore { side: Side::Right, score: 1 });
    session.apply(MatchEvent::AssignPriority(Side::Left));

    session.submit_result().await.unwrap();
}

#[tokio::test]
async fn submit_with_identity_carries_device_token() {
    let server = MockServer::start().await;
    mount_submit(
        &server,
        serde_json::json!({
            "matchId": "match-42",
            "player1_hits": 0,
            "player2_hits": 0,
            "winner": "tie",
            "deviceToken": "dev-9"
        }),
        200,
    )
    .await;

    let credentials = credentials();
    credentials.save_token("dev-9", None).unwrap();
    let session = session(credentials);
    assert_eq!(
        session.offer_descriptor(descriptor(&server, true)).unwrap(),
        LoadOutcome::Loaded
    );

    session.submit_result().await.unwrap();
}

#[tokio::test]
async fn submit_failure_keeps_match_for_retry() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/matches/match-42/result"))
        .respond_with(ResponseTemplate::new(502).set_body_string("bad gateway"))
        .expect(2)
        .mount(&server)
        .await;

    let session = session(credentials());
    session.offer_descriptor(descriptor(&server, false)).unwrap();
    session.apply(MatchEvent::IncrementScore(Side::Right));

    for _ in 0..2 {
        let err = session.submit_result().await.unwrap_err();
        assert!(matches!(err, SessionError::Client(_)));
        assert!(matches!(
            *session.submission_status().borrow(),
            SubmissionStatus::Failed { .. }
        ));
    }

    tokio::time::sleep(FLASH * 4).await;
    let state = session.snapshot();
    assert!(state.external_match().is_some());
    assert_eq!(state.score(Side::Right), 1);
}
