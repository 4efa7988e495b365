//! 認証・認可エラー。
//!
//! すべての失敗は機械可読なコードと HTTP ステータスを持つ。
//! HTTP レスポンスへの変換は境界層（[`crate::middleware`]）が行う。

use http::StatusCode;

/// ヘッダー形式エラーの詳細。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HeaderShape {
    /// 先頭が Bearer でない
    MissingBearerScheme,
    /// Bearer のみでトークンがない
    MissingToken,
    /// トークンの後ろに余分な要素がある
    TooManyParts,
}

/// AuthError はトークン検証・権限判定の失敗を表す。
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum AuthError {
    #[error("missing Authorization header")]
    MissingAuthorizationHeader,

    #[error("invalid Authorization header shape: {0:?}")]
    InvalidHeaderShape(HeaderShape),

    /// kid に一致する署名鍵が鍵セットに存在しない。
    #[error("no signing key matches the token key id")]
    UnknownSigningKey,

    /// トークンを復号できない（形式不正・署名不一致・鍵素材不正など）。
    #[error("malformed token: {0}")]
    MalformedToken(String),

    #[error("token expired")]
    TokenExpired,

    #[error("invalid claims: {0}")]
    InvalidClaims(String),

    #[error("permission not granted: {0}")]
    PermissionDenied(String),

    #[error("signing key set unavailable: {0}")]
    KeySetUnavailable(String),
}

impl AuthError {
    /// レスポンスボディに載せるエラーコード。
    pub fn code(&self) -> &'static str {
        match self {
            AuthError::MissingAuthorizationHeader => "authorization_header_missing",
            AuthError::InvalidHeaderShape(_)
            | AuthError::UnknownSigningKey
            | AuthError::MalformedToken(_) => "invalid_header",
            AuthError::TokenExpired => "token_expired",
            AuthError::InvalidClaims(_) => "invalid_claims",
            AuthError::PermissionDenied(_) => "unauthorized",
            AuthError::KeySetUnavailable(_) => "key_set_unavailable",
        }
    }

    pub fn status(&self) -> StatusCode {
        match self {
            AuthError::MalformedToken(_) => StatusCode::BAD_REQUEST,
            AuthError::PermissionDenied(_) => StatusCode::FORBIDDEN,
            AuthError::KeySetUnavailable(_) => StatusCode::SERVICE_UNAVAILABLE,
            AuthError::MissingAuthorizationHeader
            | AuthError::InvalidHeaderShape(_)
            | AuthError::UnknownSigningKey
            | AuthError::TokenExpired
            | AuthError::InvalidClaims(_) => StatusCode::UNAUTHORIZED,
        }
    }

    /// クライアントに返す説明文。内部の詳細は含めない。
    pub fn description(&self) -> &'static str {
        match self {
            AuthError::MissingAuthorizationHeader => "Authorization header is expected.",
            AuthError::InvalidHeaderShape(HeaderShape::MissingBearerScheme) => {
                "Authorization header must start with Bearer."
            }
            AuthError::InvalidHeaderShape(HeaderShape::MissingToken) => "Token not found.",
            AuthError::InvalidHeaderShape(HeaderShape::TooManyParts) => {
                "Authorization header must be Bearer token."
            }
            AuthError::UnknownSigningKey | AuthError::MalformedToken(_) => {
                "Unable to parse authentication token."
            }
            AuthError::TokenExpired => "Token expired.",
            AuthError::InvalidClaims(_) => "Incorrect claims. Check the audience and issuer.",
            AuthError::PermissionDenied(_) => "Permission not found.",
            AuthError::KeySetUnavailable(_) => "Unable to retrieve signing keys.",
        }
    }
}

/// ConfigError は起動時の設定不備を表す。
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    #[error("issuer domain must not be empty")]
    EmptyDomain,

    #[error("audience must not be empty")]
    EmptyAudience,

    #[error("at least one signing algorithm must be allowed")]
    NoAlgorithms,

    #[error("unknown signing algorithm: {0}")]
    UnknownAlgorithm(String),

    /// HS 系や EC 系など、RSA 公開鍵で検証できないアルゴリズム。
    #[error("signing algorithm not allowed for RSA key sets: {0}")]
    UnsupportedAlgorithm(String),

    #[error("leeway of {secs}s exceeds the maximum of {max}s")]
    LeewayTooLarge { secs: u64, max: u64 },

    #[error("failed to build HTTP client: {0}")]
    HttpClient(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_header_errors_are_401_invalid_header() {
        for shape in [
            HeaderShape::MissingBearerScheme,
            HeaderShape::MissingToken,
            HeaderShape::TooManyParts,
        ] {
            let err = AuthError::InvalidHeaderShape(shape);
            assert_eq!(err.code(), "invalid_header");
            assert_eq!(err.status(), StatusCode::UNAUTHORIZED);
        }
    }

    #[test]
    fn test_header_content_status_split() {
        assert_eq!(AuthError::UnknownSigningKey.status(), StatusCode::UNAUTHORIZED);
        assert_eq!(
            AuthError::MalformedToken("bad".into()).status(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(AuthError::UnknownSigningKey.code(), "invalid_header");
    }

    #[test]
    fn test_permission_denied_is_403() {
        let err = AuthError::PermissionDenied("view:movies".into());
        assert_eq!(err.code(), "unauthorized");
        assert_eq!(err.status(), StatusCode::FORBIDDEN);
        assert_eq!(err.description(), "Permission not found.");
    }

    #[test]
    fn test_key_set_unavailable_is_503() {
        let err = AuthError::KeySetUnavailable("timeout".into());
        assert_eq!(err.status(), StatusCode::SERVICE_UNAVAILABLE);
        assert!(!err.description().contains("timeout"));
    }
}
