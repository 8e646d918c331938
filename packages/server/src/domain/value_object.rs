//! Value objects
//!
//! 不変で、値によって同一性が決まるドメインの基本型。

use std::fmt;

use serde::{Deserialize, Serialize};

use super::error::ValueObjectError;

/// 参加者 ID
///
/// 接続時にトランスポート層が払い出す不透明な識別子。接続中は変わらない。
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct ClientId(String);

impl ClientId {
    /// 最大長（UUID の文字列表現に余裕を持たせた長さ）
    pub const MAX_LEN: usize = 64;

    /// 文字列から ClientId を作成
    ///
    /// 空文字列、空白のみ、`MAX_LEN` を超える値は受け付けない。
    pub fn new(value: String) -> Result<Self, ValueObjectError> {
        if value.trim().is_empty() {
            return Err(ValueObjectError::ClientIdEmpty);
        }
        if value.len() > Self::MAX_LEN {
            return Err(ValueObjectError::ClientIdTooLong(value.len()));
        }
        Ok(Self(value))
    }

    /// 新しい一意な ClientId を払い出す（UUID v4）
    pub fn generate() -> Self {
        Self(uuid::Uuid::new_v4().to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }
}

impl TryFrom<String> for ClientId {
    type Error = ValueObjectError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<ClientId> for String {
    fn from(value: ClientId) -> Self {
        value.0
    }
}

impl fmt::Display for ClientId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Unix タイムスタンプ（ミリ秒）
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Timestamp(i64);

impl Timestamp {
    pub fn new(value: i64) -> Self {
        Self(value)
    }

    pub fn value(&self) -> i64 {
        self.0
    }
}
