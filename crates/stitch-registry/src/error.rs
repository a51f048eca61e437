//! Registry エラー型

use std::path::PathBuf;
use stitch_core::SpecError;

/// Registry のエラー
#[derive(Debug, thiserror::Error)]
pub enum RegistryError {
    #[error(transparent)]
    Spec(#[from] SpecError),

    #[error("Unknown service '{0}', make sure it is in the registry.")]
    UnknownService(String),

    #[error(
        "Cannot find mocks for service '{0}', make sure the service has a mocks section in the registry."
    )]
    MocksNotConfigured(String),

    #[error("Service '{0}' has no git repo in the registry.")]
    NoSourceConfigured(String),

    #[error("Cannot link '{}': not a directory.", .0.display())]
    InvalidLinkPath(PathBuf),

    #[error("git 操作に失敗しました: サービス '{service}'\n理由: {message}")]
    Checkout { service: String, message: String },

    #[error("Registry の取得に失敗しました: {0}")]
    Fetch(#[from] reqwest::Error),

    #[error("IO エラー: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, RegistryError>;
