//! Common test utilities and fixtures
//!
//! The router runs against a real SQLite file, a mocked identity provider
//! and an in-memory price table.

#![allow(dead_code)]

use async_trait::async_trait;
use axum::{
    body::Body,
    http::{header, HeaderMap, Method, Request, StatusCode},
    Router,
};
use foliofy_core::{FolioError, PriceSource, StockQuote};
use foliofy_identity::{
    AuthTokens, CodeDeliveryDetails, IdentityError, IdentityProvider, SignUpOutcome, TokenClaims,
};
use foliofy_server::{create_router, AppState, ServerConfig};
use foliofy_storage::SqliteStore;
use mockall::mock;
use rust_decimal::Decimal;
use serde_json::Value;
use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use tempfile::TempDir;
use tower::util::ServiceExt;

mock! {
    pub Identity {}

    #[async_trait]
    impl IdentityProvider for Identity {
        async fn sign_up(&self, email: &str, password: &str) -> foliofy_identity::Result<SignUpOutcome>;
        async fn confirm_sign_up(&self, email: &str, code: &str) -> foliofy_identity::Result<()>;
        async fn resend_confirmation_code(
            &self,
            email: &str,
        ) -> foliofy_identity::Result<Option<CodeDeliveryDetails>>;
        async fn sign_in(&self, email: &str, password: &str) -> foliofy_identity::Result<AuthTokens>;
        async fn refresh(&self, refresh_token: &str) -> foliofy_identity::Result<AuthTokens>;
        async fn sign_out(&self, access_token: &str) -> foliofy_identity::Result<()>;
        async fn verify_token(&self, token: &str) -> foliofy_identity::Result<TokenClaims>;
    }
}

/// Bearer token the mocked provider accepts for `sub`
pub fn token_for(sub: &str) -> String {
    format!("token-{sub}")
}

/// Claims of an ID token for `sub`
pub fn claims_for(sub: &str) -> TokenClaims {
    TokenClaims {
        sub: sub.to_string(),
        email: Some(format!("{sub}@example.com")),
        email_verified: Some(true),
        token_use: Some("id".to_string()),
        aud: Some("test-client-id".to_string()),
        client_id: None,
        iss: "https://cognito-idp.ap-northeast-1.amazonaws.com/ap-northeast-1_TestPool".to_string(),
        exp: 4_102_444_800,
        username: Some(sub.to_string()),
    }
}

/// Identity provider that accepts `token-<sub>` and rejects everything else
///
/// `jwks-down` simulates an unreachable key endpoint.
pub fn token_checking_identity() -> MockIdentity {
    let mut identity = MockIdentity::new();
    identity.expect_verify_token().returning(|token| {
        if token == "jwks-down" {
            return Err(IdentityError::Provider {
                code: "HTTP 503".to_string(),
                message: "Service Unavailable".to_string(),
            });
        }
        match token.strip_prefix("token-") {
            Some(sub) => Ok(claims_for(sub)),
            None => Err(IdentityError::InvalidToken("InvalidSignature".to_string())),
        }
    });
    identity
}

/// Sample tokens as returned on sign-in
pub fn sample_tokens(refresh_token: Option<&str>) -> AuthTokens {
    AuthTokens {
        id_token: "id.jwt.token".to_string(),
        access_token: "access.jwt.token".to_string(),
        refresh_token: refresh_token.map(String::from),
        expires_in: 3600,
        token_type: "Bearer".to_string(),
    }
}

/// Price source backed by a fixed table
///
/// Symbols missing from the table are unknown; symbols in `failing` error
/// like a provider outage.
#[derive(Default)]
pub struct FakePrices {
    quotes: HashMap<String, StockQuote>,
    failing: HashSet<String>,
    calls: AtomicUsize,
}

impl FakePrices {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_quote(
        mut self,
        symbol: &str,
        name: &str,
        current: Decimal,
        previous: Decimal,
    ) -> Self {
        let change = if previous.is_zero() {
            Decimal::ZERO
        } else {
            ((current - previous) / previous * Decimal::ONE_HUNDRED).round_dp(2)
        };
        self.quotes.insert(
            symbol.to_string(),
            StockQuote {
                symbol: symbol.to_string(),
                name: name.to_string(),
                current_price: current,
                previous_close: previous,
                daily_change_pct: change,
            },
        );
        self
    }

    pub fn with_outage(mut self, symbol: &str) -> Self {
        self.failing.insert(symbol.to_string());
        self
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl PriceSource for FakePrices {
    async fn fetch_quote(&self, symbol: &str) -> foliofy_core::Result<StockQuote> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if self.failing.contains(symbol) {
            return Err(FolioError::market_data("connection reset"));
        }
        self.quotes
            .get(symbol)
            .cloned()
            .ok_or_else(|| FolioError::SymbolNotFound(symbol.to_string()))
    }
}

/// Router plus the resources it runs on
pub struct TestApp {
    pub router: Router,
    pub store: SqliteStore,
    pub prices: Arc<FakePrices>,
    _temp_dir: TempDir,
}

impl TestApp {
    /// App with the token-checking identity provider
    pub async fn new(prices: FakePrices) -> Self {
        Self::with_identity(token_checking_identity(), prices).await
    }

    pub async fn with_identity(identity: MockIdentity, prices: FakePrices) -> Self {
        let temp_dir = tempfile::tempdir().expect("Failed to create temp dir");
        let db_url = format!("sqlite://{}", temp_dir.path().join("test.db").display());

        let pool = foliofy_storage::create_pool(&db_url)
            .await
            .expect("Failed to create pool");
        foliofy_storage::run_migrations(&pool)
            .await
            .expect("Failed to run migrations");

        let store = SqliteStore::new(pool);
        let prices = Arc::new(prices);

        let app_state = AppState::new(
            Arc::new(store.clone()),
            Arc::new(identity),
            Arc::clone(&prices) as Arc<dyn PriceSource>,
        );
        let router = create_router(app_state, &ServerConfig::default().cors)
            .expect("Failed to build router");

        Self {
            router,
            store,
            prices,
            _temp_dir: temp_dir,
        }
    }

    /// Send a request and decode the JSON body (`Null` when empty)
    pub async fn send(
        &self,
        method: Method,
        uri: &str,
        token: Option<&str>,
        body: Option<Value>,
    ) -> (StatusCode, HeaderMap, Value) {
        let mut builder = Request::builder().method(method).uri(uri);
        if let Some(token) = token {
            builder = builder.header(header::AUTHORIZATION, format!("Bearer {}", token));
        }

        let request = match body {
            Some(body) => builder
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(body.to_string()))
                .unwrap(),
            None => builder.body(Body::empty()).unwrap(),
        };

        let response = self.router.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let headers = response.headers().clone();

        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        // extractor rejections are plain text
        let json = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes)
                .unwrap_or_else(|_| Value::String(String::from_utf8_lossy(&bytes).into_owned()))
        };

        (status, headers, json)
    }

    pub async fn get(&self, uri: &str, token: Option<&str>) -> (StatusCode, HeaderMap, Value) {
        self.send(Method::GET, uri, token, None).await
    }

    pub async fn post(
        &self,
        uri: &str,
        token: Option<&str>,
        body: Value,
    ) -> (StatusCode, HeaderMap, Value) {
        self.send(Method::POST, uri, token, Some(body)).await
    }

    pub async fn put(
        &self,
        uri: &str,
        token: Option<&str>,
        body: Value,
    ) -> (StatusCode, HeaderMap, Value) {
        self.send(Method::PUT, uri, token, Some(body)).await
    }

    pub async fn delete(&self, uri: &str, token: Option<&str>) -> (StatusCode, HeaderMap, Value) {
        self.send(Method::DELETE, uri, token, None).await
    }
}

/// Read a decimal field whether it was serialized as a string or a number
pub fn decimal(value: &Value) -> Decimal {
    use std::str::FromStr;
    match value {
        Value::String(s) => Decimal::from_str(s).unwrap(),
        Value::Number(n) => Decimal::from_str(&n.to_string()).unwrap(),
        other => panic!("not a decimal: {other}"),
    }
}
