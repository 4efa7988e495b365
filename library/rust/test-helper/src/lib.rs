//! テスト用の発行者: RS256 トークンを発行し、対応する JWKS ドキュメントを公開する。

pub mod jwt;

pub use jwt::{TestClaims, TestIssuer};
