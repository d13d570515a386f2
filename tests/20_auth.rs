mod common;

use anyhow::Result;
use reqwest::StatusCode;
use serde_json::json;

// Credential checks need a reachable database; without one the pool
// lookup surfaces as a 500. Both paths pin the response contract.
#[tokio::test]
async fn login_with_unknown_credentials_never_leaks_a_token() -> Result<()> {
    let server = common::ensure_server().await?;
    let client = reqwest::Client::new();

    let res = client
        .post(format!("{}/api/v1/auth/login", server.base_url))
        .json(&json!({ "email": "nobody@example.com", "password": "wrong" }))
        .send()
        .await?;

    let status = res.status();
    let body = res.json::<serde_json::Value>().await?;

    assert!(body.get("token").is_none(), "no token on failure: {body}");

    if status == StatusCode::UNAUTHORIZED {
        assert_eq!(body["error"], "invalid credentials");
    } else {
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    }
    Ok(())
}

#[tokio::test]
async fn signup_without_user_wrapper_is_a_bad_request() -> Result<()> {
    let server = common::ensure_server().await?;
    let client = reqwest::Client::new();

    let res = client
        .post(format!("{}/api/v1/auth/signup", server.base_url))
        .json(&json!({ "email": "nobody@example.com" }))
        .send()
        .await?;

    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    let body = res.json::<serde_json::Value>().await?;
    assert_eq!(body["error"], "bad request");
    assert_eq!(body["message"], "missing user parameter");
    Ok(())
}
