use base64::{engine::general_purpose::URL_SAFE_NO_PAD, Engine};
use chrono::{Duration, Utc};
use jsonwebtoken::{encode, Algorithm, EncodingKey, Header};
use rand::rngs::OsRng;
use rsa::pkcs1::{EncodeRsaPrivateKey, LineEnding};
use rsa::traits::PublicKeyParts;
use rsa::RsaPrivateKey;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use std::sync::OnceLock;

pub const PRIMARY_KID: &str = "test-key-1";
pub const ROTATED_KID: &str = "test-key-2";

/// 署名鍵と、JWKS に載せる公開鍵成分。
struct KeyMaterial {
    encoding: EncodingKey,
    n: String,
    e: String,
}

// 2048bit 鍵の生成は遅いため、プロセス内で使い回す
static PRIMARY: OnceLock<KeyMaterial> = OnceLock::new();
static ROTATED: OnceLock<KeyMaterial> = OnceLock::new();

fn generate_key_material() -> KeyMaterial {
    let private_key = RsaPrivateKey::new(&mut OsRng, 2048).expect("RSA key generation");
    let public_key = private_key.to_public_key();
    let pem = private_key
        .to_pkcs1_pem(LineEnding::LF)
        .expect("PKCS#1 PEM encoding");

    KeyMaterial {
        encoding: EncodingKey::from_rsa_pem(pem.as_bytes()).expect("RSA encoding key"),
        n: URL_SAFE_NO_PAD.encode(public_key.n().to_bytes_be()),
        e: URL_SAFE_NO_PAD.encode(public_key.e().to_bytes_be()),
    }
}

/// テスト用 JWT クレーム。
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TestClaims {
    pub iss: String,
    pub aud: String,
    pub sub: String,
    pub iat: i64,
    pub exp: i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub permissions: Option<Vec<String>>,
}

impl TestClaims {
    /// 1 時間前に期限切れになったクレームにする。
    #[must_use]
    pub fn expired(mut self) -> Self {
        let now = Utc::now();
        self.iat = (now - Duration::hours(2)).timestamp();
        self.exp = (now - Duration::hours(1)).timestamp();
        self
    }

    #[must_use]
    pub fn with_audience(mut self, aud: &str) -> Self {
        self.aud = aud.to_string();
        self
    }

    #[must_use]
    pub fn with_issuer(mut self, iss: &str) -> Self {
        self.iss = iss.to_string();
        self
    }

    #[must_use]
    pub fn without_permissions(mut self) -> Self {
        self.permissions = None;
        self
    }
}

/// TestIssuer は外部発行者の代わりに RS256 トークンを発行する。
pub struct TestIssuer {
    domain: String,
    kid: String,
    key: &'static KeyMaterial,
}

impl TestIssuer {
    pub fn new(domain: &str) -> Self {
        Self {
            domain: domain.to_string(),
            kid: PRIMARY_KID.to_string(),
            key: PRIMARY.get_or_init(generate_key_material),
        }
    }

    /// 別の鍵ペアで署名する発行者。鍵ローテーションや署名不一致の再現に使う。
    pub fn rotated(domain: &str) -> Self {
        Self {
            domain: domain.to_string(),
            kid: ROTATED_KID.to_string(),
            key: ROTATED.get_or_init(generate_key_material),
        }
    }

    #[must_use]
    pub fn with_kid(mut self, kid: &str) -> Self {
        self.kid = kid.to_string();
        self
    }

    pub fn domain(&self) -> &str {
        &self.domain
    }

    pub fn kid(&self) -> &str {
        &self.kid
    }

    pub fn issuer(&self) -> String {
        format!("https://{}/", self.domain)
    }

    pub fn jwk(&self) -> Value {
        json!({
            "kty": "RSA",
            "kid": self.kid,
            "use": "sig",
            "alg": "RS256",
            "n": self.key.n,
            "e": self.key.e,
        })
    }

    /// `{"keys": [...]}` 形式の JWKS ドキュメント。
    pub fn jwks(&self) -> Value {
        json!({ "keys": [self.jwk()] })
    }

    /// 有効期限 1 時間のクレームを生成する。
    pub fn claims(&self, audience: &str, permissions: &[&str]) -> TestClaims {
        let now = Utc::now();
        TestClaims {
            iss: self.issuer(),
            aud: audience.to_string(),
            sub: "auth0|test-user".to_string(),
            iat: now.timestamp(),
            exp: (now + Duration::hours(1)).timestamp(),
            permissions: Some(permissions.iter().map(|p| (*p).to_string()).collect()),
        }
    }

    pub fn token(&self, audience: &str, permissions: &[&str]) -> String {
        self.sign(&self.claims(audience, permissions))
    }

    pub fn sign<T: Serialize>(&self, claims: &T) -> String {
        self.sign_with(Algorithm::RS256, claims)
    }

    /// RSA 系アルゴリズムを指定して署名する。
    pub fn sign_with<T: Serialize>(&self, alg: Algorithm, claims: &T) -> String {
        let mut header = Header::new(alg);
        header.kid = Some(self.kid.clone());
        encode(&header, claims, &self.key.encoding).expect("token signing")
    }

    /// ヘッダーに kid を持たない RS256 トークン。
    pub fn sign_without_kid<T: Serialize>(&self, claims: &T) -> String {
        encode(&Header::new(Algorithm::RS256), claims, &self.key.encoding).expect("token signing")
    }

    /// 同じ kid を名乗る HS256 トークン。アルゴリズム混同攻撃の再現に使う。
    pub fn forge_hs256<T: Serialize>(&self, secret: &[u8], claims: &T) -> String {
        let mut header = Header::new(Algorithm::HS256);
        header.kid = Some(self.kid.clone());
        encode(&header, claims, &EncodingKey::from_secret(secret)).expect("token signing")
    }

    /// モックサーバーの `/.well-known/jwks.json` でこの発行者の JWKS を返す。
    #[cfg(feature = "mock-server")]
    pub async fn mount_jwks(&self, server: &wiremock::MockServer) {
        use wiremock::matchers::{method, path};
        use wiremock::{Mock, ResponseTemplate};

        Mock::given(method("GET"))
            .and(path("/.well-known/jwks.json"))
            .respond_with(ResponseTemplate::new(200).set_body_json(self.jwks()))
            .mount(server)
            .await;
    }
}
