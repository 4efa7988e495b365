//! axum 用のパーミッションミドルウェア。

use crate::error::AuthError;
use crate::gate::PermissionGate;
use axum::{
    body::Body,
    extract::Request,
    http::StatusCode,
    middleware::Next,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use std::sync::Arc;
use tracing::debug;

/// ミドルウェアファクトリの戻り値型。
type AuthMiddlewareFuture = std::pin::Pin<
    Box<dyn std::future::Future<Output = Result<Response, AuthErrorResponse>> + Send>,
>;

/// require_permission は指定パーミッションを必須とするミドルウェアファクトリ。
///
/// 成功時は ClaimSet をリクエストエクステンションに格納し、ハンドラーは
/// `Extension<ClaimSet>` で受け取る。ハンドラーのレスポンスは変更しない。
pub fn require_permission(
    gate: Arc<PermissionGate>,
    permission: &'static str,
) -> impl Fn(Request<Body>, Next) -> AuthMiddlewareFuture + Clone {
    move |mut req: Request<Body>, next: Next| {
        let gate = gate.clone();
        let fut: AuthMiddlewareFuture = Box::pin(async move {
            let header = req
                .headers()
                .get(http::header::AUTHORIZATION)
                .map(|v| String::from_utf8_lossy(v.as_bytes()).into_owned());

            let claims = gate
                .authorize(header.as_deref(), permission)
                .await
                .map_err(AuthErrorResponse::from)?;

            req.extensions_mut().insert(claims);

            Ok(next.run(req).await)
        });
        fut
    }
}

/// AuthErrorResponse は認証エラーの HTTP レスポンス。
#[derive(Debug)]
pub struct AuthErrorResponse {
    pub status: StatusCode,
    pub code: &'static str,
    pub message: &'static str,
}

impl From<AuthError> for AuthErrorResponse {
    fn from(err: AuthError) -> Self {
        debug!(code = err.code(), status = err.status().as_u16(), "request rejected");
        Self {
            status: err.status(),
            code: err.code(),
            message: err.description(),
        }
    }
}

impl IntoResponse for AuthErrorResponse {
    fn into_response(self) -> Response {
        let body = json!({
            "success": false,
            "error": self.status.as_u16(),
            "message": self.message,
        });

        (self.status, Json(body)).into_response()
    }
}
