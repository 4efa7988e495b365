//! トークン検証器: 鍵セットから kid で鍵を選び、署名・有効期限・aud・iss を検証する。

use crate::claims::ClaimSet;
use crate::error::{AuthError, ConfigError};
use crate::keyset::KeySet;
use jsonwebtoken::errors::ErrorKind;
use jsonwebtoken::{decode, decode_header, Algorithm, Validation};
use std::str::FromStr;
use tracing::debug;

/// 文字列のアルゴリズム名を解釈する。RSA 系以外は受け付けない。
pub fn parse_algorithms<S: AsRef<str>>(names: &[S]) -> Result<Vec<Algorithm>, ConfigError> {
    let mut algorithms = Vec::with_capacity(names.len());
    for name in names {
        let name = name.as_ref().trim();
        if name.is_empty() {
            continue;
        }
        let alg = Algorithm::from_str(name)
            .map_err(|_| ConfigError::UnknownAlgorithm(name.to_string()))?;
        if !is_rsa(alg) {
            return Err(ConfigError::UnsupportedAlgorithm(name.to_string()));
        }
        if !algorithms.contains(&alg) {
            algorithms.push(alg);
        }
    }
    if algorithms.is_empty() {
        return Err(ConfigError::NoAlgorithms);
    }
    Ok(algorithms)
}

fn is_rsa(alg: Algorithm) -> bool {
    matches!(
        alg,
        Algorithm::RS256
            | Algorithm::RS384
            | Algorithm::RS512
            | Algorithm::PS256
            | Algorithm::PS384
            | Algorithm::PS512
    )
}

/// exp/nbf 判定で許容する時刻ずれの上限（秒）。
pub const MAX_LEEWAY_SECS: u64 = 300;

/// TokenVerifier は期待する aud・iss と許可アルゴリズムを保持し、トークンを検証する。
///
/// 状態を持たないため、同じトークンと鍵セットに対しては常に同じ結果を返す。
#[derive(Debug, Clone)]
pub struct TokenVerifier {
    audience: String,
    issuer: String,
    algorithms: Vec<Algorithm>,
    leeway_secs: u64,
}

impl TokenVerifier {
    pub fn new(
        audience: &str,
        issuer: &str,
        algorithms: Vec<Algorithm>,
    ) -> Result<Self, ConfigError> {
        if audience.trim().is_empty() {
            return Err(ConfigError::EmptyAudience);
        }
        if algorithms.is_empty() {
            return Err(ConfigError::NoAlgorithms);
        }
        if let Some(alg) = algorithms.iter().find(|a| !is_rsa(**a)) {
            return Err(ConfigError::UnsupportedAlgorithm(format!("{alg:?}")));
        }
        Ok(Self {
            audience: audience.to_string(),
            issuer: issuer.to_string(),
            algorithms,
            leeway_secs: 0,
        })
    }

    /// exp/nbf 判定の許容秒数を設定する（デフォルト 0、上限 [`MAX_LEEWAY_SECS`]）。
    pub fn with_leeway(mut self, leeway_secs: u64) -> Result<Self, ConfigError> {
        if leeway_secs > MAX_LEEWAY_SECS {
            return Err(ConfigError::LeewayTooLarge {
                secs: leeway_secs,
                max: MAX_LEEWAY_SECS,
            });
        }
        self.leeway_secs = leeway_secs;
        Ok(self)
    }

    pub fn audience(&self) -> &str {
        &self.audience
    }

    pub fn issuer(&self) -> &str {
        &self.issuer
    }

    pub fn algorithms(&self) -> &[Algorithm] {
        &self.algorithms
    }

    /// トークン文字列を鍵セットで検証し、ClaimSet を返す。
    pub fn verify(&self, raw_token: &str, key_set: &KeySet) -> Result<ClaimSet, AuthError> {
        let header =
            decode_header(raw_token).map_err(|e| AuthError::MalformedToken(e.to_string()))?;

        let kid = header.kid.ok_or(AuthError::UnknownSigningKey)?;
        let signing_key = key_set.find(&kid).ok_or_else(|| {
            debug!(kid = %kid, "no signing key matches token");
            AuthError::UnknownSigningKey
        })?;

        let key = signing_key.decoding_key()?;

        let data = decode::<serde_json::Value>(raw_token, &key, &self.validation())
            .map_err(|e| {
                let err = classify(&e);
                debug!(kid = %kid, code = err.code(), reason = %e, "token rejected");
                err
            })?;

        serde_json::from_value(data.claims).map_err(|e| AuthError::InvalidClaims(e.to_string()))
    }

    fn validation(&self) -> Validation {
        let mut validation = Validation::new(self.algorithms[0]);
        validation.algorithms.clone_from(&self.algorithms);
        validation.set_audience(&[&self.audience]);
        validation.set_issuer(&[&self.issuer]);
        validation.set_required_spec_claims(&["exp", "aud", "iss"]);
        validation.validate_exp = true;
        validation.validate_nbf = true;
        validation.leeway = self.leeway_secs;
        validation
    }
}

/// jsonwebtoken のエラーを分類する。
///
/// 有効期限切れは他の Claim より先に判定されるため、常に TokenExpired になる。
fn classify(err: &jsonwebtoken::errors::Error) -> AuthError {
    match err.kind() {
        ErrorKind::ExpiredSignature => AuthError::TokenExpired,
        ErrorKind::InvalidAudience
        | ErrorKind::InvalidIssuer
        | ErrorKind::InvalidSubject
        | ErrorKind::ImmatureSignature
        | ErrorKind::InvalidAlgorithm
        | ErrorKind::MissingRequiredClaim(_) => AuthError::InvalidClaims(err.to_string()),
        _ => AuthError::MalformedToken(err.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_algorithms_accepts_rsa() {
        let algs = parse_algorithms(&["RS256", " PS384 ", "RS256"]).unwrap();
        assert_eq!(algs, vec![Algorithm::RS256, Algorithm::PS384]);
    }

    #[test]
    fn test_parse_algorithms_rejects_symmetric_and_unknown() {
        assert_eq!(
            parse_algorithms(&["RS256", "HS256"]),
            Err(ConfigError::UnsupportedAlgorithm("HS256".into()))
        );
        assert_eq!(
            parse_algorithms(&["ES256"]),
            Err(ConfigError::UnsupportedAlgorithm("ES256".into()))
        );
        assert_eq!(
            parse_algorithms(&["none"]),
            Err(ConfigError::UnknownAlgorithm("none".into()))
        );
    }

    #[test]
    fn test_parse_algorithms_empty() {
        let empty: [&str; 0] = [];
        assert_eq!(parse_algorithms(&empty), Err(ConfigError::NoAlgorithms));
        assert_eq!(parse_algorithms(&[" "]), Err(ConfigError::NoAlgorithms));
    }

    #[test]
    fn test_new_rejects_bad_config() {
        assert_eq!(
            TokenVerifier::new("", "https://i/", vec![Algorithm::RS256]).err(),
            Some(ConfigError::EmptyAudience)
        );
        assert_eq!(
            TokenVerifier::new("aud", "https://i/", vec![]).err(),
            Some(ConfigError::NoAlgorithms)
        );
        assert!(matches!(
            TokenVerifier::new("aud", "https://i/", vec![Algorithm::HS256]),
            Err(ConfigError::UnsupportedAlgorithm(_))
        ));
    }

    #[test]
    fn test_leeway_is_bounded() {
        let verifier = TokenVerifier::new("aud", "https://i/", vec![Algorithm::RS256]).unwrap();
        assert!(verifier.clone().with_leeway(MAX_LEEWAY_SECS).is_ok());
        assert_eq!(
            verifier.with_leeway(MAX_LEEWAY_SECS + 1).err(),
            Some(ConfigError::LeewayTooLarge {
                secs: MAX_LEEWAY_SECS + 1,
                max: MAX_LEEWAY_SECS,
            })
        );
    }

    #[test]
    fn test_settings_reject_huge_leeway() {
        let mut settings =
            crate::config::AuthSettings::new("casting.example.com", "casting-api");
        settings.leeway_secs = u64::MAX;
        assert!(matches!(
            settings.verifier(),
            Err(ConfigError::LeewayTooLarge { secs: u64::MAX, .. })
        ));
        assert!(settings.build_gate().is_err());
    }

    #[test]
    fn test_malformed_token_is_400() {
        let verifier = TokenVerifier::new("aud", "https://i/", vec![Algorithm::RS256]).unwrap();
        let err = verifier.verify("not-a-jwt", &KeySet::default()).unwrap_err();
        assert!(matches!(err, AuthError::MalformedToken(_)));
        assert_eq!(err.code(), "invalid_header");
        assert_eq!(err.status(), http::StatusCode::BAD_REQUEST);
    }
}
