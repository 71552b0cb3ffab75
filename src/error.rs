pub use anyhow::{anyhow, Result};

use thiserror::Error as TError;

use crate::field::ErrorList;

#[derive(Debug, TError)]
pub enum Error {
    #[error(transparent)]
    Kube(#[from] kube::Error),
    #[error(transparent)]
    Kubeconfig(#[from] kube::config::KubeconfigError),
    #[error(transparent)]
    IO(#[from] std::io::Error),
    #[error(transparent)]
    Yaml(#[from] serde_yaml::Error),
    #[error(transparent)]
    Json(#[from] serde_json::Error),
    #[error("conversion failed: {0}")]
    Conversion(#[from] ErrorList),
    #[error("UnknownProvider: {0}")]
    UnknownProvider(String),
    #[error("Namespace: {0}")]
    Namespace(String),
    #[error("Context: {0}")]
    Context(String),
}
