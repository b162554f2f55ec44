use super::*;
use http_body_util::BodyExt;

async fn problem_body(err: ApiError) -> (StatusCode, Option<String>, serde_json::Value) {
    let response = err.into_response();
    let status = response.status();
    let content_type = response
        .headers()
        .get(header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .map(str::to_owned);
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    (status, content_type, serde_json::from_slice(&bytes).unwrap())
}

#[test]
fn error_type_status_mapping() {
    assert_eq!(ErrorType::Unknown.status(), StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(ErrorType::ValidationError.status(), StatusCode::BAD_REQUEST);
    assert_eq!(ErrorType::UserAlreadyExists.status(), StatusCode::CONFLICT);
    assert_eq!(ErrorType::LoginIncorrect.status(), StatusCode::UNAUTHORIZED);
    assert_eq!(ErrorType::Unauthorized.status(), StatusCode::UNAUTHORIZED);
}

#[test]
fn unknown_uses_about_blank() {
    assert_eq!(ErrorType::Unknown.type_uri(), "about:blank");
    assert_eq!(ErrorType::LoginIncorrect.type_uri(), "tag:domus-web,2024:errors/login-incorrect");
}

#[tokio::test]
async fn problem_response_shape() {
    let (status, content_type, body) =
        problem_body(ApiError::new(ErrorType::ValidationError).detail("bad email").field("field", "email")).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(content_type.as_deref(), Some(PROBLEM_JSON));
    assert_eq!(
        body,
        serde_json::json!({
            "type": "tag:domus-web,2024:errors/validation-error",
            "status": 400,
            "title": "Your request is not valid.",
            "detail": "bad email",
            "field": "email",
        })
    );
}

#[tokio::test]
async fn detail_omitted_when_absent() {
    let (_, _, body) = problem_body(ErrorType::Unauthorized.into()).await;
    assert!(body.get("detail").is_none());
}

#[tokio::test]
async fn login_incorrect_has_default_detail() {
    let (status, _, body) = problem_body(UserError::LoginIncorrect.into()).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert!(body["detail"].as_str().unwrap().contains("incorrect"));
}

#[test]
fn user_errors_map_to_problem_types() {
    assert_eq!(ApiError::from(UserError::Invalid("x")).status(), StatusCode::BAD_REQUEST);
    assert_eq!(ApiError::from(UserError::AlreadyExists("a@b.c".into())).status(), StatusCode::CONFLICT);
    assert_eq!(ApiError::from(UserError::Hash("boom".into())).status(), StatusCode::INTERNAL_SERVER_ERROR);
}
