use axum::body::Body;
use axum::http::{HeaderMap, Request, StatusCode};
use axum::routing::post;
use axum::{Json, Router};
use serde_json::{json, Value};
use tower::ServiceExt;

use tokviz::api::{ErrorResponse, TokenizeResponse};
use tokviz::app::{create_router, AppState};
use tokviz::core::tokenizer::fallback::reconstruct;
use tokviz::core::tokenizer::{BackendSlot, HostedBackend, SubwordBackend, TiktokenBackend};
use tokviz::envconfig::HostedConfig;
use tokviz::{Dispatcher, PastelPalette, Scheme, SchemeStatus};

fn offline_dispatcher() -> Dispatcher {
    Dispatcher::new(
        BackendSlot::missing("encoder not cached"),
        BackendSlot::missing("no subword tokenizer configured"),
        BackendSlot::missing("missing credential: set TOKVIZ_HOSTED_API_KEY"),
    )
}

fn router(dispatcher: Dispatcher) -> Router {
    create_router(AppState::new(dispatcher))
}

async fn post_json(app: Router, uri: &str, body: Value) -> (StatusCode, Vec<u8>) {
    let req = Request::builder()
        .method("POST")
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap();
    let resp = app.oneshot(req).await.unwrap();
    let status = resp.status();
    let bytes = axum::body::to_bytes(resp.into_body(), usize::MAX).await.unwrap();
    (status, bytes.to_vec())
}

#[tokio::test]
async fn test_naive_word_example() {
    let (status, body) = post_json(
        router(offline_dispatcher()),
        "/tokenize",
        json!({ "text": "Hello, world!", "schemes": ["naive_word"], "seed": 1 }),
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let resp: TokenizeResponse = serde_json::from_slice(&body).unwrap();
    assert_eq!(resp.results.len(), 1);
    let result = &resp.results[0];
    assert_eq!(result.scheme_id, Scheme::NaiveWord);
    assert_eq!(result.status, SchemeStatus::Ok);
    assert_eq!(result.token_count, 4);

    let texts: Vec<&str> = result.tokens.iter().map(|t| t.text.as_str()).collect();
    assert_eq!(texts, vec!["Hello", ",", "world", "!"]);

    let palette = PastelPalette::default();
    for (i, token) in result.tokens.iter().enumerate() {
        assert_eq!(token.position, i);
        assert!(palette.contains(&token.color));
    }
}

#[tokio::test]
async fn test_empty_text_rejected() {
    let (status, body) = post_json(router(offline_dispatcher()), "/tokenize", json!({ "text": "" })).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    let err: ErrorResponse = serde_json::from_slice(&body).unwrap();
    assert_eq!(err.error, "No text provided");
}

#[tokio::test]
async fn test_missing_text_rejected() {
    let (status, _) = post_json(router(offline_dispatcher()), "/api/tokenize", json!({})).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_unknown_scheme_rejected() {
    let (status, _) = post_json(
        router(offline_dispatcher()),
        "/tokenize",
        json!({ "text": "hi", "schemes": ["morse"] }),
    )
    .await;
    assert!(status.is_client_error());
}

#[tokio::test]
async fn test_empty_scheme_list_means_all() {
    let (status, body) = post_json(
        router(offline_dispatcher()),
        "/tokenize",
        json!({ "text": "hi", "schemes": [] }),
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let resp: TokenizeResponse = serde_json::from_slice(&body).unwrap();
    let order: Vec<Scheme> = resp.results.iter().map(|r| r.scheme_id).collect();
    assert_eq!(order, Scheme::ALL.to_vec());
}

#[tokio::test]
async fn test_offline_schemes_degrade_independently() {
    let (status, body) = post_json(
        router(offline_dispatcher()),
        "/tokenize",
        json!({ "text": "Tokenizers split text" }),
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let resp: TokenizeResponse = serde_json::from_slice(&body).unwrap();
    let order: Vec<Scheme> = resp.results.iter().map(|r| r.scheme_id).collect();
    assert_eq!(order, Scheme::ALL.to_vec());

    let byte_pair = resp.get(Scheme::BytePair).unwrap();
    assert_eq!(byte_pair.status, SchemeStatus::Degraded);
    assert!(byte_pair.token_count > 0);
    assert_eq!(byte_pair.detail.as_deref(), Some("encoder not cached"));

    let subword = resp.get(Scheme::Subword).unwrap();
    assert_eq!(subword.status, SchemeStatus::Degraded);

    let hosted = resp.get(Scheme::HostedModel).unwrap();
    assert_eq!(hosted.status, SchemeStatus::Unavailable);
    assert_eq!(hosted.token_count, 0);
    assert!(hosted.detail.as_deref().unwrap().contains("TOKVIZ_HOSTED_API_KEY"));

    let naive = resp.get(Scheme::NaiveWord).unwrap();
    assert_eq!(naive.status, SchemeStatus::Ok);
    assert_eq!(naive.token_count, 3);
}

#[tokio::test]
async fn test_same_seed_same_colors() {
    let app = router(offline_dispatcher());
    let body = json!({ "text": "colors stay put", "seed": 1234 });
    let (_, a) = post_json(app.clone(), "/tokenize", body.clone()).await;
    let (_, b) = post_json(app, "/tokenize", body).await;
    assert_eq!(a, b);
}

#[tokio::test]
async fn test_tokens_reconstruct_input() {
    let dispatcher = Dispatcher::new(
        BackendSlot::ready(TiktokenBackend::gpt2().unwrap()),
        BackendSlot::missing("no subword tokenizer configured"),
        BackendSlot::missing("no credential"),
    );
    let inputs = [
        "Hello, world!",
        "  leading and trailing  ",
        "tabs\tand\nnewlines; punctuation: yes?",
        "unicode: naïve façade 東京 🚀",
    ];

    for text in inputs {
        let outcomes = dispatcher.tokenize_all(text, &Scheme::ALL).await.unwrap();
        for outcome in outcomes {
            let joined = reconstruct(&outcome.tokens);
            match outcome.scheme {
                Scheme::BytePair => {
                    assert_eq!(outcome.status, SchemeStatus::Ok);
                    assert_eq!(joined, text);
                }
                Scheme::Subword => assert_eq!(joined, text),
                Scheme::NaiveWord => assert_eq!(joined, text.replace(' ', "")),
                Scheme::HostedModel => assert!(outcome.tokens.is_empty()),
            }
        }
    }
}

const SUBWORD_TOKENIZER_JSON: &str = r#"{
  "version": "1.0",
  "truncation": null,
  "padding": null,
  "added_tokens": [],
  "normalizer": null,
  "pre_tokenizer": { "type": "Metaspace", "replacement": "▁", "prepend_scheme": "always", "split": true },
  "post_processor": null,
  "decoder": null,
  "model": {
    "type": "WordLevel",
    "vocab": { "[UNK]": 0, "▁Hello": 1, "▁world": 2 },
    "unk_token": "[UNK]"
  }
}"#;

#[tokio::test]
async fn test_loaded_subword_tokenizer_reconstructs_input() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("tokenizer.json");
    std::fs::write(&path, SUBWORD_TOKENIZER_JSON).unwrap();

    let dispatcher = Dispatcher::new(
        BackendSlot::missing("off"),
        BackendSlot::ready(SubwordBackend::from_file(&path).unwrap()),
        BackendSlot::missing("off"),
    );

    let outcome = dispatcher.tokenize("Hello world", Scheme::Subword).await;
    assert_eq!(outcome.status, SchemeStatus::Ok);
    assert_eq!(outcome.detail, None);
    assert_eq!(outcome.tokens, vec!["Hello", " world"]);
    assert_eq!(reconstruct(&outcome.tokens), "Hello world");

    let (status, body) = post_json(
        router(dispatcher),
        "/tokenize",
        json!({ "text": "Hello  world, Hello", "schemes": ["subword"], "seed": 3 }),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    let resp: TokenizeResponse = serde_json::from_slice(&body).unwrap();
    let subword = resp.get(Scheme::Subword).unwrap();
    assert_eq!(subword.status, SchemeStatus::Ok);
    let pieces: Vec<String> = subword.tokens.iter().map(|t| t.text.clone()).collect();
    assert_eq!(reconstruct(&pieces), "Hello  world, Hello");
}

#[tokio::test]
async fn test_schemes_listing_and_health() {
    let app = router(offline_dispatcher());

    let req = Request::builder().uri("/api/schemes").body(Body::empty()).unwrap();
    let resp = app.clone().oneshot(req).await.unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    let bytes = axum::body::to_bytes(resp.into_body(), usize::MAX).await.unwrap();
    let schemes: Vec<Value> = serde_json::from_slice(&bytes).unwrap();
    assert_eq!(schemes.len(), 4);
    assert_eq!(schemes[0]["scheme_id"], "byte_pair");

    let req = Request::builder().uri("/api/health").body(Body::empty()).unwrap();
    let resp = app.oneshot(req).await.unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
}

#[tokio::test]
async fn test_index_page_served() {
    let req = Request::builder().uri("/").body(Body::empty()).unwrap();
    let resp = router(offline_dispatcher()).oneshot(req).await.unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    let bytes = axum::body::to_bytes(resp.into_body(), usize::MAX).await.unwrap();
    assert!(String::from_utf8_lossy(&bytes).contains("/tokenize"));
}

#[tokio::test]
async fn test_foreign_host_forbidden() {
    let req = Request::builder()
        .uri("/api/health")
        .header("host", "attacker.example.com")
        .body(Body::empty())
        .unwrap();
    let resp = router(offline_dispatcher()).oneshot(req).await.unwrap();
    assert_eq!(resp.status(), StatusCode::FORBIDDEN);

    let app = create_router(
        AppState::new(offline_dispatcher()).allowed_hosts(vec!["tok.example.com".into()]),
    );
    let req = Request::builder()
        .uri("/api/health")
        .header("host", "tok.example.com")
        .body(Body::empty())
        .unwrap();
    let resp = app.oneshot(req).await.unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
}

async fn hosted_stub(headers: HeaderMap, Json(body): Json<Value>) -> Result<Json<Value>, StatusCode> {
    let auth = headers.get("authorization").and_then(|v| v.to_str().ok());
    if auth != Some("Bearer secret") {
        return Err(StatusCode::UNAUTHORIZED);
    }
    let text = body["text"].as_str().unwrap_or_default();
    let tokens: Vec<&str> = text.split_inclusive(' ').collect();
    Ok(Json(json!({ "tokens": tokens })))
}

async fn spawn_hosted_stub() -> String {
    let app = Router::new().route("/v1/tokenize", post(hosted_stub));
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    format!("http://{}/v1/tokenize", addr)
}

fn hosted_dispatcher(endpoint: String, api_key: &str) -> Dispatcher {
    let config = HostedConfig {
        endpoint: Some(endpoint),
        api_key: Some(api_key.to_string()),
        model: "stub".to_string(),
        timeout: 5,
    };
    let hosted = HostedBackend::from_config(&config).map_err(|e| e.to_string()).unwrap();
    Dispatcher::new(
        BackendSlot::missing("off"),
        BackendSlot::missing("off"),
        BackendSlot::ready(hosted),
    )
}

#[tokio::test]
async fn test_hosted_scheme_with_credential() {
    let endpoint = spawn_hosted_stub().await;
    let dispatcher = hosted_dispatcher(endpoint, "secret");

    let outcome = dispatcher.tokenize("one two three", Scheme::HostedModel).await;
    assert_eq!(outcome.status, SchemeStatus::Ok);
    assert_eq!(outcome.tokens, vec!["one ", "two ", "three"]);
}

#[tokio::test]
async fn test_hosted_scheme_rejected_credential() {
    let endpoint = spawn_hosted_stub().await;
    let dispatcher = hosted_dispatcher(endpoint, "wrong");

    let outcome = dispatcher.tokenize("one two", Scheme::HostedModel).await;
    assert_eq!(outcome.status, SchemeStatus::Unavailable);
    assert!(outcome.tokens.is_empty());
    assert!(outcome.detail.unwrap().contains("401"));
}
