//! 認証設定。起動時に一度だけ読み込み、以降は変更しない。

use crate::error::ConfigError;
use crate::gate::PermissionGate;
use crate::keyset::{issuer_for_domain, CachedKeySetProvider, HttpKeySetProvider, KeySetProvider};
use crate::verifier::{parse_algorithms, TokenVerifier};
use serde::Deserialize;
use std::sync::Arc;
use std::time::Duration;

#[derive(Debug, Clone, Deserialize)]
pub struct AuthSettings {
    /// 発行者ドメイン（例: "tenant.auth0.com"）
    pub domain: String,

    /// 期待する aud（API 識別子）
    pub audience: String,

    #[serde(default = "default_algorithms")]
    pub algorithms: Vec<String>,

    #[serde(default)]
    pub leeway_secs: u64,

    /// 指定時のみ JWKS をキャッシュする。未指定または 0 なら毎回取得する。
    #[serde(default)]
    pub jwks_cache_ttl_secs: Option<u64>,

    #[serde(default = "default_jwks_scheme")]
    pub jwks_scheme: String,
}

fn default_algorithms() -> Vec<String> {
    vec!["RS256".to_string()]
}

fn default_jwks_scheme() -> String {
    "https".to_string()
}

impl AuthSettings {
    pub fn new(domain: &str, audience: &str) -> Self {
        Self {
            domain: domain.to_string(),
            audience: audience.to_string(),
            algorithms: default_algorithms(),
            leeway_secs: 0,
            jwks_cache_ttl_secs: None,
            jwks_scheme: default_jwks_scheme(),
        }
    }

    pub fn issuer(&self) -> String {
        issuer_for_domain(&self.domain)
    }

    pub fn verifier(&self) -> Result<TokenVerifier, ConfigError> {
        if self.domain.trim().is_empty() {
            return Err(ConfigError::EmptyDomain);
        }
        let algorithms = parse_algorithms(&self.algorithms)?;
        TokenVerifier::new(&self.audience, &self.issuer(), algorithms)?
            .with_leeway(self.leeway_secs)
    }

    pub fn key_set_provider(&self) -> Result<Arc<dyn KeySetProvider>, ConfigError> {
        let http: Arc<dyn KeySetProvider> =
            Arc::new(HttpKeySetProvider::with_scheme(&self.jwks_scheme)?);
        Ok(match self.jwks_cache_ttl_secs {
            Some(ttl) if ttl > 0 => Arc::new(CachedKeySetProvider::new(
                http,
                Duration::from_secs(ttl),
            )),
            _ => http,
        })
    }

    pub fn build_gate(&self) -> Result<PermissionGate, ConfigError> {
        let verifier = self.verifier()?;
        Ok(PermissionGate::new(
            &self.domain,
            self.key_set_provider()?,
            verifier,
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_from_yaml_like_json() {
        let settings: AuthSettings = serde_json::from_value(serde_json::json!({
            "domain": "casting.example.com",
            "audience": "casting-api",
        }))
        .unwrap();

        assert_eq!(settings.algorithms, vec!["RS256"]);
        assert_eq!(settings.leeway_secs, 0);
        assert_eq!(settings.jwks_cache_ttl_secs, None);
        assert_eq!(settings.issuer(), "https://casting.example.com/");
    }

    #[test]
    fn test_verifier_uses_issuer_from_domain() {
        let verifier = AuthSettings::new("casting.example.com", "casting-api")
            .verifier()
            .unwrap();
        assert_eq!(verifier.issuer(), "https://casting.example.com/");
        assert_eq!(verifier.audience(), "casting-api");
    }

    #[test]
    fn test_empty_domain_rejected() {
        let settings = AuthSettings::new(" ", "casting-api");
        assert_eq!(settings.verifier().err(), Some(ConfigError::EmptyDomain));
    }

    #[test]
    fn test_key_set_provider_builds() {
        let mut settings = AuthSettings::new("casting.example.com", "casting-api");
        assert!(settings.key_set_provider().is_ok());
        settings.jwks_cache_ttl_secs = Some(60);
        assert!(settings.key_set_provider().is_ok());
    }

    #[test]
    fn test_symmetric_algorithm_rejected() {
        let mut settings = AuthSettings::new("casting.example.com", "casting-api");
        settings.algorithms = vec!["HS256".into()];
        assert!(settings.build_gate().is_err());
    }
}
