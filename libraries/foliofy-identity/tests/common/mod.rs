//! Shared fixtures: a mock user pool and tokens signed with the test key.

#![allow(dead_code)]

use chrono::Utc;
use foliofy_identity::{CognitoClient, CognitoConfig};
use jsonwebtoken::{encode, Algorithm, EncodingKey, Header};
use serde_json::{json, Value};
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

pub const REGION: &str = "ap-northeast-1";
pub const POOL_ID: &str = "ap-northeast-1_TestPool";
pub const CLIENT_ID: &str = "test-client-id";
pub const KID: &str = "test-key-1";

const TEST_KEY: &[u8] = include_bytes!("../fixtures/test_rsa_key.pem");
const TEST_JWKS: &str = include_str!("../fixtures/jwks.json");

pub fn config_for(server: &MockServer) -> CognitoConfig {
    CognitoConfig::new(REGION, POOL_ID, CLIENT_ID).with_endpoint(server.uri())
}

pub fn client_for(server: &MockServer) -> CognitoClient {
    CognitoClient::new(config_for(server)).expect("Failed to build client")
}

pub fn issuer() -> String {
    format!("https://cognito-idp.{}.amazonaws.com/{}", REGION, POOL_ID)
}

pub fn jwks_path() -> String {
    format!("/{}/.well-known/jwks.json", POOL_ID)
}

pub fn jwks() -> Value {
    serde_json::from_str(TEST_JWKS).expect("Invalid JWKS fixture")
}

/// JWKS whose only key carries a different kid
pub fn rotated_out_jwks() -> Value {
    let mut set = jwks();
    set["keys"][0]["kid"] = json!("retired-key");
    set
}

pub async fn mount_jwks(server: &MockServer) {
    Mock::given(method("GET"))
        .and(path(jwks_path()))
        .respond_with(ResponseTemplate::new(200).set_body_json(jwks()))
        .mount(server)
        .await;
}

pub fn sign(claims: &Value, kid: &str) -> String {
    let mut header = Header::new(Algorithm::RS256);
    header.kid = Some(kid.to_string());
    let key = EncodingKey::from_rsa_pem(TEST_KEY).expect("Invalid key fixture");
    encode(&header, claims, &key).expect("Failed to sign token")
}

pub fn id_token_claims(sub: &str) -> Value {
    json!({
        "sub": sub,
        "email": format!("{}@example.com", sub),
        "email_verified": true,
        "token_use": "id",
        "aud": CLIENT_ID,
        "iss": issuer(),
        "exp": Utc::now().timestamp() + 3600,
        "iat": Utc::now().timestamp(),
        "cognito:username": sub,
    })
}

pub fn access_token_claims(sub: &str) -> Value {
    json!({
        "sub": sub,
        "token_use": "access",
        "client_id": CLIENT_ID,
        "scope": "aws.cognito.signin.user.admin",
        "iss": issuer(),
        "exp": Utc::now().timestamp() + 3600,
        "iat": Utc::now().timestamp(),
        "username": sub,
    })
}
