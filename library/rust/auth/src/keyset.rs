//! 署名鍵セット: 発行者の JWKS ドキュメントを取得して保持する。

use crate::error::{AuthError, ConfigError};
use jsonwebtoken::DecodingKey;
use serde::Deserialize;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::RwLock;
use tracing::{debug, warn};

/// JWKS ドキュメントの公開パス。
pub const JWKS_PATH: &str = "/.well-known/jwks.json";

const FETCH_TIMEOUT: Duration = Duration::from_secs(10);

/// SigningKey は JWKS 内の個々の公開鍵。発行者のドキュメントからそのまま取り込む。
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct SigningKey {
    #[serde(rename = "kid")]
    pub key_id: String,

    #[serde(rename = "kty")]
    pub key_type: String,

    #[serde(rename = "use", default)]
    pub usage: String,

    /// RSA モジュラス（base64url）
    #[serde(rename = "n", default)]
    pub modulus: String,

    /// RSA 公開指数（base64url）
    #[serde(rename = "e", default)]
    pub exponent: String,
}

impl SigningKey {
    /// 検証用の鍵素材を組み立てる。RSA 以外の鍵は扱わない。
    pub fn decoding_key(&self) -> Result<DecodingKey, AuthError> {
        if self.key_type != "RSA" {
            return Err(AuthError::MalformedToken(format!(
                "unsupported key type: {}",
                self.key_type
            )));
        }
        DecodingKey::from_rsa_components(&self.modulus, &self.exponent)
            .map_err(|e| AuthError::MalformedToken(e.to_string()))
    }
}

/// KeySet は発行者が公開している署名鍵の一覧（順序を保持する）。
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct KeySet {
    pub keys: Vec<SigningKey>,
}

impl KeySet {
    pub fn new(keys: Vec<SigningKey>) -> Self {
        Self { keys }
    }

    /// key_id が一致する最初の鍵を返す。
    pub fn find(&self, key_id: &str) -> Option<&SigningKey> {
        self.keys.iter().find(|k| k.key_id == key_id)
    }

}

/// 発行者ドメインから JWKS の URL を組み立てる。
pub fn jwks_url(scheme: &str, issuer_domain: &str) -> String {
    format!(
        "{}://{}{}",
        scheme,
        issuer_domain.trim_end_matches('/'),
        JWKS_PATH
    )
}

/// 発行者ドメインから期待する iss 値を組み立てる。
pub fn issuer_for_domain(issuer_domain: &str) -> String {
    format!("https://{}/", issuer_domain.trim_end_matches('/'))
}

/// KeySetProvider は発行者の鍵セット取得を抽象化するトレイト。
#[async_trait::async_trait]
pub trait KeySetProvider: Send + Sync {
    async fn fetch(&self, issuer_domain: &str) -> Result<KeySet, AuthError>;
}

/// HttpKeySetProvider は呼び出しごとに JWKS を取得するデフォルト実装。
/// キャッシュもリトライも行わない。
pub struct HttpKeySetProvider {
    client: reqwest::Client,
    scheme: String,
}

impl HttpKeySetProvider {
    pub fn new() -> Result<Self, ConfigError> {
        Self::with_scheme("https")
    }

    /// スキームを指定して生成する。ローカル発行者やテストでは "http" を使う。
    pub fn with_scheme(scheme: &str) -> Result<Self, ConfigError> {
        let client = reqwest::Client::builder()
            .timeout(FETCH_TIMEOUT)
            .build()
            .map_err(|e| ConfigError::HttpClient(e.to_string()))?;
        Ok(Self {
            client,
            scheme: scheme.to_string(),
        })
    }
}

#[async_trait::async_trait]
impl KeySetProvider for HttpKeySetProvider {
    async fn fetch(&self, issuer_domain: &str) -> Result<KeySet, AuthError> {
        let url = jwks_url(&self.scheme, issuer_domain);
        debug!(url = %url, "fetching signing key set");

        let resp = self
            .client
            .get(&url)
            .send()
            .await
            .and_then(reqwest::Response::error_for_status)
            .map_err(|e| {
                warn!(url = %url, error = %e, "signing key set fetch failed");
                AuthError::KeySetUnavailable(e.to_string())
            })?;

        resp.json::<KeySet>().await.map_err(|e| {
            warn!(url = %url, error = %e, "signing key set document is malformed");
            AuthError::KeySetUnavailable(e.to_string())
        })
    }
}

struct CachedKeySet {
    key_set: KeySet,
    fetched_at: Instant,
}

/// CachedKeySetProvider は任意のプロバイダーに TTL キャッシュを被せる。
///
/// 鍵ローテーション直後は TTL が切れるまで古い鍵セットで検証するため、
/// 明示的に設定された場合のみ使用する。取得失敗はキャッシュしない。
pub struct CachedKeySetProvider {
    inner: Arc<dyn KeySetProvider>,
    ttl: Duration,
    cache: RwLock<HashMap<String, CachedKeySet>>,
}

impl CachedKeySetProvider {
    pub fn new(inner: Arc<dyn KeySetProvider>, ttl: Duration) -> Self {
        Self {
            inner,
            ttl,
            cache: RwLock::new(HashMap::new()),
        }
    }

    /// キャッシュを破棄する。鍵ローテーション時に使用。
    pub async fn invalidate(&self) {
        self.cache.write().await.clear();
    }

    fn fresh<'a>(&self, entry: Option<&'a CachedKeySet>) -> Option<&'a KeySet> {
        entry
            .filter(|c| c.fetched_at.elapsed() < self.ttl)
            .map(|c| &c.key_set)
    }
}

#[async_trait::async_trait]
impl KeySetProvider for CachedKeySetProvider {
    async fn fetch(&self, issuer_domain: &str) -> Result<KeySet, AuthError> {
        {
            let cache = self.cache.read().await;
            if let Some(key_set) = self.fresh(cache.get(issuer_domain)) {
                return Ok(key_set.clone());
            }
        }

        let mut cache = self.cache.write().await;

        // ダブルチェック
        if let Some(key_set) = self.fresh(cache.get(issuer_domain)) {
            return Ok(key_set.clone());
        }

        let key_set = self.inner.fetch(issuer_domain).await?;
        cache.insert(
            issuer_domain.to_string(),
            CachedKeySet {
                key_set: key_set.clone(),
                fetched_at: Instant::now(),
            },
        );

        Ok(key_set)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicU32, Ordering};

    fn sample_key(kid: &str) -> SigningKey {
        SigningKey {
            key_id: kid.into(),
            key_type: "RSA".into(),
            usage: "sig".into(),
            modulus: "AQAB".into(),
            exponent: "AQAB".into(),
        }
    }

    struct CountingProvider {
        calls: AtomicU32,
        fail: bool,
    }

    #[async_trait::async_trait]
    impl KeySetProvider for CountingProvider {
        async fn fetch(&self, _issuer_domain: &str) -> Result<KeySet, AuthError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            if self.fail {
                return Err(AuthError::KeySetUnavailable("down".into()));
            }
            Ok(KeySet::new(vec![sample_key("k1")]))
        }
    }

    #[test]
    fn test_parse_jwks_document() {
        let doc = serde_json::json!({
            "keys": [
                {"kty": "RSA", "kid": "a", "use": "sig", "n": "nnn", "e": "AQAB", "alg": "RS256", "x5c": ["..."]},
                {"kty": "RSA", "kid": "b", "use": "sig", "n": "mmm", "e": "AQAB"}
            ]
        });
        let key_set: KeySet = serde_json::from_value(doc).unwrap();
        assert_eq!(key_set.keys.len(), 2);
        assert_eq!(key_set.keys[0].key_id, "a");
        assert_eq!(key_set.keys[0].usage, "sig");
        assert_eq!(key_set.find("b").map(|k| k.modulus.as_str()), Some("mmm"));
        assert!(key_set.find("c").is_none());
    }

    #[test]
    fn test_parse_jwks_without_keys_fails() {
        let result: Result<KeySet, _> = serde_json::from_value(serde_json::json!({"nope": []}));
        assert!(result.is_err());
    }

    #[test]
    fn test_non_rsa_key_is_rejected() {
        let mut key = sample_key("ec");
        key.key_type = "EC".into();
        assert!(matches!(
            key.decoding_key(),
            Err(AuthError::MalformedToken(_))
        ));
    }

    #[test]
    fn test_urls_from_domain() {
        assert_eq!(
            jwks_url("https", "tenant.auth0.com"),
            "https://tenant.auth0.com/.well-known/jwks.json"
        );
        assert_eq!(
            issuer_for_domain("tenant.auth0.com/"),
            "https://tenant.auth0.com/"
        );
    }

    #[tokio::test]
    async fn test_cached_provider_reuses_key_set_within_ttl() {
        let inner = Arc::new(CountingProvider {
            calls: AtomicU32::new(0),
            fail: false,
        });
        let cached = CachedKeySetProvider::new(inner.clone(), Duration::from_secs(600));

        cached.fetch("issuer.example.com").await.unwrap();
        cached.fetch("issuer.example.com").await.unwrap();
        assert_eq!(inner.calls.load(Ordering::SeqCst), 1);

        cached.invalidate().await;
        cached.fetch("issuer.example.com").await.unwrap();
        assert_eq!(inner.calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_cached_provider_zero_ttl_always_fetches() {
        let inner = Arc::new(CountingProvider {
            calls: AtomicU32::new(0),
            fail: false,
        });
        let cached = CachedKeySetProvider::new(inner.clone(), Duration::ZERO);

        cached.fetch("issuer.example.com").await.unwrap();
        cached.fetch("issuer.example.com").await.unwrap();
        assert_eq!(inner.calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_cached_provider_does_not_cache_failures() {
        let inner = Arc::new(CountingProvider {
            calls: AtomicU32::new(0),
            fail: true,
        });
        let cached = CachedKeySetProvider::new(inner.clone(), Duration::from_secs(600));

        assert!(cached.fetch("issuer.example.com").await.is_err());
        assert!(cached.fetch("issuer.example.com").await.is_err());
        assert_eq!(inner.calls.load(Ordering::SeqCst), 2);
    }
}
