//! casting-auth: 外部発行者の JWKS によるベアラートークン検証 + パーミッションゲート
//!
//! 発行者の JWKS エンドポイントから公開鍵を取得し、JWT の署名・有効期限・aud・iss を検証する。
//! 検証済み Claims の `permissions` に必要なパーミッションが含まれる場合のみ操作を実行する。
//!
//! # 使い方
//!
//! ```ignore
//! use casting_auth::AuthSettings;
//!
//! let gate = AuthSettings::new("tenant.auth0.com", "casting-api").build_gate()?;
//!
//! let movies = gate
//!     .guard(Some("Bearer eyJ..."), "view:movies", |claims| async move {
//!         list_movies_for(claims.subject()).await
//!     })
//!     .await?;
//! ```

pub mod claims;
pub mod config;
pub mod error;
pub mod gate;
pub mod keyset;
pub mod middleware;
pub mod verifier;

pub use claims::{Audience, ClaimSet};
pub use config::AuthSettings;
pub use error::{AuthError, ConfigError, HeaderShape};
pub use gate::{extract_bearer_token, PermissionGate};
pub use keyset::{CachedKeySetProvider, HttpKeySetProvider, KeySet, KeySetProvider, SigningKey};
pub use middleware::{require_permission, AuthErrorResponse};
pub use verifier::{parse_algorithms, TokenVerifier, MAX_LEEWAY_SECS};
