//! 注册信息错误

use std::path::PathBuf;

use manymodels_errors::AppError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum RegistryError {
    #[error("Invalid {field} '{value}': {reason}")]
    InvalidKeyPart {
        field: &'static str,
        value: String,
        reason: &'static str,
    },

    #[error("No routing table artifact found under {}", .dir.display())]
    NoArtifact { dir: PathBuf },

    #[error("Found more than one routing table artifact under {}: {files:?}", .dir.display())]
    MultipleArtifacts { dir: PathBuf, files: Vec<PathBuf> },

    #[error("Failed to scan {}: {source}", .dir.display())]
    Scan {
        dir: PathBuf,
        #[source]
        source: walkdir::Error,
    },

    #[error("Failed to access {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid routing table artifact {}: {source}", .path.display())]
    InvalidArtifact {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("Model '{model}' has no '{tag}' tag")]
    MissingTag { model: String, tag: String },

    #[error("No scoring URI for service '{service}' (group '{group}')")]
    MissingDeployment { group: String, service: String },
}

impl From<RegistryError> for AppError {
    fn from(err: RegistryError) -> Self {
        match err {
            RegistryError::InvalidKeyPart { .. } => AppError::malformed(err.to_string()),
            other => AppError::configuration(other.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_key_part_error_maps_to_malformed() {
        let err: AppError = RegistryError::InvalidKeyPart {
            field: "store",
            value: "Store_1".to_string(),
            reason: "must not contain '_'",
        }
        .into();
        assert!(matches!(err, AppError::MalformedRequest(_)));
        assert_eq!(err.status_code(), 400);
    }

    #[test]
    fn test_artifact_errors_map_to_configuration() {
        let err: AppError = RegistryError::NoArtifact {
            dir: PathBuf::from("/models"),
        }
        .into();
        assert!(matches!(err, AppError::Configuration(_)));
        assert!(err.to_string().contains("/models"));
    }
}
