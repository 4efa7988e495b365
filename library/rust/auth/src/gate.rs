//! パーミッションゲート: Authorization ヘッダーを検査し、検証済み Claims で操作を実行する。

use crate::claims::ClaimSet;
use crate::error::{AuthError, HeaderShape};
use crate::keyset::KeySetProvider;
use crate::verifier::TokenVerifier;
use std::future::Future;
use std::sync::Arc;
use tracing::debug;

/// Authorization ヘッダーの値から Bearer トークンを取り出す。
///
/// 空白で分割し、先頭が大文字小文字を区別せず "Bearer" で、要素がちょうど 2 つの場合のみ成功する。
pub fn extract_bearer_token(header: Option<&str>) -> Result<&str, AuthError> {
    let header = match header {
        Some(h) if !h.is_empty() => h,
        _ => return Err(AuthError::MissingAuthorizationHeader),
    };

    let parts: Vec<&str> = header.split_whitespace().collect();
    match parts.as_slice() {
        [scheme, ..] if !scheme.eq_ignore_ascii_case("bearer") => {
            Err(AuthError::InvalidHeaderShape(HeaderShape::MissingBearerScheme))
        }
        [] => Err(AuthError::InvalidHeaderShape(HeaderShape::MissingBearerScheme)),
        [_] => Err(AuthError::InvalidHeaderShape(HeaderShape::MissingToken)),
        [_, token] => Ok(*token),
        _ => Err(AuthError::InvalidHeaderShape(HeaderShape::TooManyParts)),
    }
}

/// PermissionGate は保護された操作の前段で認証・認可を行う。
pub struct PermissionGate {
    issuer_domain: String,
    provider: Arc<dyn KeySetProvider>,
    verifier: TokenVerifier,
}

impl PermissionGate {
    pub fn new(
        issuer_domain: &str,
        provider: Arc<dyn KeySetProvider>,
        verifier: TokenVerifier,
    ) -> Self {
        Self {
            issuer_domain: issuer_domain.to_string(),
            provider,
            verifier,
        }
    }

    /// ヘッダーを検査してトークンを検証し、ClaimSet を返す。パーミッションは見ない。
    pub async fn authenticate(&self, header: Option<&str>) -> Result<ClaimSet, AuthError> {
        let token = extract_bearer_token(header)?;
        let key_set = self.provider.fetch(&self.issuer_domain).await?;
        self.verifier.verify(token, &key_set)
    }

    /// 認証に加えて、required_permission が付与されているかを判定する。
    pub async fn authorize(
        &self,
        header: Option<&str>,
        required_permission: &str,
    ) -> Result<ClaimSet, AuthError> {
        let claims = self.authenticate(header).await?;
        if !claims.has_permission(required_permission) {
            debug!(
                sub = claims.subject().unwrap_or_default(),
                permission = required_permission,
                "permission not granted"
            );
            return Err(AuthError::PermissionDenied(required_permission.to_string()));
        }
        Ok(claims)
    }

    /// 認可に成功した場合のみ operation を ClaimSet 付きで実行し、その結果をそのまま返す。
    pub async fn guard<F, Fut, T>(
        &self,
        header: Option<&str>,
        required_permission: &str,
        operation: F,
    ) -> Result<T, AuthError>
    where
        F: FnOnce(ClaimSet) -> Fut,
        Fut: Future<Output = T>,
    {
        let claims = self.authorize(header, required_permission).await?;
        Ok(operation(claims).await)
    }
}
