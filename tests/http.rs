use std::sync::Arc;

use axum::{
    Router,
    body::Body,
    http::{Method, Request, StatusCode, header::CONTENT_TYPE},
};
use http_body_util::BodyExt;
use pygments_service::{
    application::highlight::{
        HighlightRenderer, HighlightService, LanguageResolver, RenderError, SyntectResolver,
        bundled_syntaxes,
    },
    config::RenderSettings,
    domain::highlight::LexerHandle,
    infra::{
        http::{HttpState, build_router},
        platform::PlatformEnv,
    },
};
use tower::ServiceExt;

const FORM: &str = "application/x-www-form-urlencoded";

fn platform() -> Arc<PlatformEnv> {
    let env = PlatformEnv::from_lookup(|key| match key {
        "PORT" => Some("8080".to_string()),
        // base64 of `{}`
        "PLATFORM_RELATIONSHIPS" => Some("e30=".to_string()),
        _ => None,
    })
    .expect("valid platform env");
    Arc::new(env)
}

fn app() -> Router {
    let highlighter =
        HighlightService::from_settings(&RenderSettings::default()).expect("bundled pipeline");
    build_router(HttpState {
        highlighter: Arc::new(highlighter),
        platform: platform(),
    })
}

async fn send(app: Router, request: Request<Body>) -> (StatusCode, Option<String>, String) {
    let response = app.oneshot(request).await.expect("router should respond");
    let status = response.status();
    let content_type = response
        .headers()
        .get(CONTENT_TYPE)
        .and_then(|value| value.to_str().ok())
        .map(str::to_string);
    let bytes = response
        .into_body()
        .collect()
        .await
        .expect("body should collect")
        .to_bytes();
    let body = String::from_utf8(bytes.to_vec()).expect("utf-8 body");
    (status, content_type, body)
}

fn post_form(body: impl Into<String>) -> Request<Body> {
    Request::builder()
        .method(Method::POST)
        .uri("/")
        .header(CONTENT_TYPE, FORM)
        .body(Body::from(body.into()))
        .expect("request should build")
}

#[tokio::test]
async fn known_language_renders_inline_styled_markup() {
    let (status, _, body) = send(app(), post_form("language=python&text=print%281%29")).await;

    assert_eq!(status, StatusCode::OK);
    assert!(body.starts_with("<div class=\"highlight\"><pre style=\""));
    assert!(body.contains("print"));
    assert!(body.contains('1'));
    assert!(body.contains("<span style=\""));
}

#[tokio::test]
async fn unknown_language_falls_back_to_guessing() {
    let (status, _, guessed) =
        send(app(), post_form("language=not-a-real-language&text=SELECT+1")).await;
    assert_eq!(status, StatusCode::OK);
    assert!(!guessed.is_empty());
    assert!(guessed.contains("SELECT"));

    let (_, _, named) = send(app(), post_form("language=sql&text=SELECT+1")).await;
    assert_eq!(guessed, named);
}

#[tokio::test]
async fn empty_or_garbage_hints_still_render() {
    for body in [
        "text=def+f%28%29%3A+pass",
        "language=&text=def+f%28%29%3A+pass",
        "language=%24%25%5E%26&text=def+f%28%29%3A+pass",
    ] {
        let (status, _, markup) = send(app(), post_form(body)).await;
        assert_eq!(status, StatusCode::OK, "request `{body}`");
        assert!(markup.contains("def"), "request `{body}`");
    }
}

#[tokio::test]
async fn missing_fields_render_an_empty_block() {
    let (status, _, body) = send(app(), post_form("")).await;
    assert_eq!(status, StatusCode::OK);
    assert!(body.contains("<pre"));

    let request = Request::builder()
        .method(Method::POST)
        .uri("/")
        .body(Body::empty())
        .expect("request should build");
    let (status, _, body) = send(app(), request).await;
    assert_eq!(status, StatusCode::OK);
    assert!(body.contains("<pre"));
}

#[tokio::test]
async fn non_form_bodies_are_treated_as_empty_forms() {
    let request = Request::builder()
        .method(Method::POST)
        .uri("/")
        .header(CONTENT_TYPE, "application/json")
        .body(Body::from(r#"{"language":"python","text":"print(1)"}"#))
        .expect("request should build");

    let (status, _, body) = send(app(), request).await;
    assert_eq!(status, StatusCode::OK);
    assert!(!body.contains("print"));
}

#[tokio::test]
async fn multipart_forms_are_accepted() {
    let boundary = "highlight-boundary";
    let payload = format!(
        "--{boundary}\r\n\
         Content-Disposition: form-data; name=\"language\"\r\n\r\n\
         rust\r\n\
         --{boundary}\r\n\
         Content-Disposition: form-data; name=\"text\"\r\n\r\n\
         fn main() {{}}\r\n\
         --{boundary}--\r\n"
    );
    let request = Request::builder()
        .method(Method::POST)
        .uri("/")
        .header(
            CONTENT_TYPE,
            format!("multipart/form-data; boundary={boundary}"),
        )
        .body(Body::from(payload))
        .expect("request should build");

    let (status, _, multipart) = send(app(), request).await;
    assert_eq!(status, StatusCode::OK);

    let (_, _, urlencoded) = send(app(), post_form("language=rust&text=fn+main%28%29+%7B%7D")).await;
    assert_eq!(multipart, urlencoded);
}

#[tokio::test]
async fn multipart_text_with_invalid_utf8_is_decoded_lossily() {
    let boundary = "highlight-boundary";
    let mut payload = format!(
        "--{boundary}\r\n\
         Content-Disposition: form-data; name=\"language\"\r\n\r\n\
         python\r\n\
         --{boundary}\r\n\
         Content-Disposition: form-data; name=\"text\"\r\n\r\n\
         print("
    )
    .into_bytes();
    payload.extend_from_slice(&[0xff, 0xfe]);
    payload.extend_from_slice(format!(")\r\n--{boundary}--\r\n").as_bytes());

    let request = Request::builder()
        .method(Method::POST)
        .uri("/")
        .header(
            CONTENT_TYPE,
            format!("multipart/form-data; boundary={boundary}"),
        )
        .body(Body::from(payload))
        .expect("request should build");

    let (status, _, body) = send(app(), request).await;
    assert_eq!(status, StatusCode::OK);
    assert!(body.contains("print"));
    assert!(body.contains('\u{fffd}'));
}

#[tokio::test]
async fn identical_requests_produce_identical_markup() {
    let app = app();
    let body = "language=javascript&text=const+x+%3D+%28a%29+%3D%3E+a+*+2%3B";

    let (_, _, first) = send(app.clone(), post_form(body)).await;
    let (_, _, second) = send(app, post_form(body)).await;
    assert_eq!(first, second);
}

#[tokio::test]
async fn large_payloads_are_not_limited() {
    let text = "a".repeat(3 * 1024 * 1024);
    let (status, _, body) = send(app(), post_form(format!("language=text&text={text}"))).await;

    assert_eq!(status, StatusCode::OK);
    assert!(body.len() > text.len());
}

#[tokio::test]
async fn discovery_returns_the_static_descriptor() {
    let request = Request::builder()
        .method(Method::GET)
        .uri("/discover")
        .body(Body::empty())
        .expect("request should build");

    let (status, content_type, body) = send(app(), request).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(content_type.as_deref(), Some("application/json"));
    insta::assert_snapshot!(body, @r#"{"name":"pygments","type":"*ast.CodeBlock","attrs":{"language":"Info"}}"#);
}

#[tokio::test]
async fn render_failures_surface_as_opaque_500s() {
    struct BrokenRenderer;

    impl HighlightRenderer for BrokenRenderer {
        fn render(&self, _text: &str, lexer: &LexerHandle) -> Result<String, RenderError> {
            Err(RenderError::UnknownLexer(lexer.name().to_string()))
        }
    }

    let resolver: Arc<dyn LanguageResolver> = Arc::new(SyntectResolver::new(bundled_syntaxes()));
    let highlighter = HighlightService::new(resolver, Arc::new(BrokenRenderer));
    let app = build_router(HttpState {
        highlighter: Arc::new(highlighter),
        platform: platform(),
    });

    let (status, _, body) = send(app, post_form("language=python&text=print%281%29")).await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body, "Internal server error");
}

#[tokio::test]
async fn wrong_methods_are_rejected() {
    let request = Request::builder()
        .method(Method::GET)
        .uri("/")
        .body(Body::empty())
        .expect("request should build");
    let (status, _, _) = send(app(), request).await;
    assert_eq!(status, StatusCode::METHOD_NOT_ALLOWED);

    let request = Request::builder()
        .method(Method::POST)
        .uri("/discover")
        .body(Body::empty())
        .expect("request should build");
    let (status, _, _) = send(app(), request).await;
    assert_eq!(status, StatusCode::METHOD_NOT_ALLOWED);
}
