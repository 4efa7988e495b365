//! 検証済みトークンの Claims。

use serde::Deserialize;
use serde_json::{Map, Value};

/// ClaimSet は署名・有効期限・aud・iss の検証をすべて通過したトークンの内容。
///
/// リクエスト単位でのみ存在し、永続化もキャッシュもしない。
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ClaimSet {
    /// トークン発行者
    pub iss: String,

    /// トークンの対象オーディエンス
    pub aud: Audience,

    /// トークンの有効期限（Unix タイムスタンプ）
    pub exp: u64,

    #[serde(default)]
    pub sub: Option<String>,

    #[serde(default)]
    pub iat: Option<u64>,

    /// 付与されたパーミッション。存在しない場合は空として扱う。
    #[serde(default)]
    pub permissions: Option<Vec<String>>,

    /// 上記以外の Claim
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl ClaimSet {
    /// パーミッション一覧を返す。
    pub fn permissions(&self) -> &[String] {
        self.permissions.as_deref().unwrap_or(&[])
    }

    /// 指定パーミッションが完全一致で含まれるかを判定する。
    pub fn has_permission(&self, permission: &str) -> bool {
        self.permissions().iter().any(|p| p == permission)
    }

    pub fn subject(&self) -> Option<&str> {
        self.sub.as_deref()
    }
}

/// Audience は JWT の aud Claim を表す。
/// 文字列または文字列配列のどちらも受け付ける。
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Audience(pub Vec<String>);

impl Audience {
    pub fn contains(&self, audience: &str) -> bool {
        self.0.iter().any(|a| a == audience)
    }
}

impl<'de> Deserialize<'de> for Audience {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        use serde::de;

        struct AudienceVisitor;

        impl<'de> de::Visitor<'de> for AudienceVisitor {
            type Value = Audience;

            fn expecting(&self, formatter: &mut std::fmt::Formatter) -> std::fmt::Result {
                formatter.write_str("a string or array of strings")
            }

            fn visit_str<E>(self, v: &str) -> Result<Self::Value, E>
            where
                E: de::Error,
            {
                Ok(Audience(vec![v.to_string()]))
            }

            fn visit_seq<A>(self, mut seq: A) -> Result<Self::Value, A::Error>
            where
                A: de::SeqAccess<'de>,
            {
                let mut values = Vec::new();
                while let Some(v) = seq.next_element::<String>()? {
                    values.push(v);
                }
                Ok(Audience(values))
            }
        }

        deserializer.deserialize_any(AudienceVisitor)
    }
}
