//! UseCase 層のエラー型

use thiserror::Error;

use crate::domain::RegistryError;

/// 参加者接続時のエラー
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConnectError {
    #[error("client ID '{0}' is already connected")]
    DuplicateClientId(String),
    #[error(transparent)]
    Registry(#[from] RegistryError),
}

/// メタデータ登録時のエラー
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RegisterMetadataError {
    #[error("client '{0}' is not connected")]
    NotConnected(String),
    #[error("metadata for client '{0}' is already registered")]
    AlreadyRegistered(String),
}

impl From<RegistryError> for RegisterMetadataError {
    fn from(error: RegistryError) -> Self {
        match error {
            RegistryError::MetadataAlreadySet(id) => Self::AlreadyRegistered(id),
            RegistryError::NotRegistered(id) | RegistryError::DuplicateId(id) => {
                Self::NotConnected(id)
            }
        }
    }
}
