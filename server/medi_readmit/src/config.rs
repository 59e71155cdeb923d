//! Service configuration read from a TOML file.
//!
//! Every section is optional; an empty file reproduces the stock
//! readmission service on `0.0.0.0:5001`.

use std::net::{IpAddr, SocketAddr};
use std::path::{Path, PathBuf};

use medi_features::{FeatureField, FeatureSet, FeatureSetError};
use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("Malformed config: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("Invalid feature fields: {0}")]
    Features(#[from] FeatureSetError),
    #[error("Invalid server host '{0}'")]
    InvalidHost(String),
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default, deny_unknown_fields)]
pub struct ServiceConfig {
    pub server: ServerConfig,
    pub artifacts: ArtifactConfig,
    pub features: Vec<FeatureField>,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default, deny_unknown_fields)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub cors_allow_any_origin: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default, deny_unknown_fields)]
pub struct ArtifactConfig {
    pub model: PathBuf,
    pub schema: PathBuf,
    pub load: LoadMode,
}

/// When artifacts are read: at startup, or on the first prediction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum LoadMode {
    #[default]
    Eager,
    Lazy,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            server: ServerConfig::default(),
            artifacts: ArtifactConfig::default(),
            features: FeatureSet::readmission().fields().to_vec(),
        }
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 5001,
            cors_allow_any_origin: true,
        }
    }
}

impl Default for ArtifactConfig {
    fn default() -> Self {
        Self {
            model: PathBuf::from("patient_readmission_model.json"),
            schema: PathBuf::from("feature_columns.json"),
            load: LoadMode::Eager,
        }
    }
}

impl ServiceConfig {
    pub fn feature_set(&self) -> Result<FeatureSet, ConfigError> {
        Ok(FeatureSet::new(self.features.clone())?)
    }

    pub fn socket_addr(&self) -> Result<SocketAddr, ConfigError> {
        let ip: IpAddr = self
            .server
            .host
            .parse()
            .map_err(|_| ConfigError::InvalidHost(self.server.host.clone()))?;
        Ok(SocketAddr::new(ip, self.server.port))
    }

    /// Resolve relative artifact paths against `base`
    pub fn resolve_paths(&mut self, base: &Path) {
        for p in [&mut self.artifacts.model, &mut self.artifacts.schema] {
            if p.is_relative() {
                *p = base.join(&*p);
            }
        }
    }
}

pub fn parse_config(text: &str) -> Result<ServiceConfig, ConfigError> {
    let config = toml::from_str::<ServiceConfig>(text)?;
    config.feature_set()?;
    Ok(config)
}

/// Read a config file; relative artifact paths are taken relative to it.
pub fn load_config(path: &Path) -> Result<ServiceConfig, ConfigError> {
    let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let mut config = parse_config(&text)?;
    if let Some(dir) = path.parent() {
        config.resolve_paths(dir);
    }
    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use medi_features::FeatureKind;
    use pretty_assertions::assert_eq;

    #[test]
    fn empty_config_is_the_stock_service() {
        let config = parse_config("").unwrap();
        assert_eq!(config, ServiceConfig::default());
        assert_eq!(config.socket_addr().unwrap().port(), 5001);
        assert_eq!(config.artifacts.load, LoadMode::Eager);
        assert_eq!(config.feature_set().unwrap(), FeatureSet::readmission());
    }

    #[test]
    fn parses_all_sections() {
        let config = parse_config(
            r#"
            [server]
            host = "127.0.0.1"
            port = 8080
            cors_allow_any_origin = false

            [artifacts]
            model = "/srv/model.json"
            schema = "/srv/schema.json"
            load = "lazy"

            [[features]]
            key = "age"
            column = "Age"
            kind = "numeric"

            [[features]]
            key = "sex"
            column = "Gender"
            kind = "categorical"
            "#,
        )
        .unwrap();
        assert_eq!(config.socket_addr().unwrap().to_string(), "127.0.0.1:8080");
        assert!(!config.server.cors_allow_any_origin);
        assert_eq!(config.artifacts.load, LoadMode::Lazy);
        let fields = config.feature_set().unwrap();
        assert_eq!(fields.len(), 2);
        assert_eq!(fields.fields()[1].column(), "Gender");
        assert_eq!(fields.fields()[1].kind, FeatureKind::Categorical);
    }

    #[test]
    fn rejects_unknown_keys_and_bad_fields() {
        assert!(matches!(
            parse_config("[server]\nprot = 1\n"),
            Err(ConfigError::Parse(_))
        ));
        let dup = r#"
            [[features]]
            key = "Age"
            kind = "numeric"
            [[features]]
            key = "Age"
            kind = "categorical"
        "#;
        assert!(matches!(
            parse_config(dup),
            Err(ConfigError::Features(FeatureSetError::DuplicateKey(k))) if k == "Age"
        ));
    }

    #[test]
    fn bad_host_is_reported() {
        let mut config = ServiceConfig::default();
        config.server.host = "localhost:99".into();
        assert!(matches!(
            config.socket_addr(),
            Err(ConfigError::InvalidHost(h)) if h == "localhost:99"
        ));
    }

    #[test]
    fn relative_artifacts_follow_config_file() {
        let tmp = tempfile::tempdir().expect("tmpdir");
        let path = tmp.path().join("readmit.toml");
        std::fs::write(
            &path,
            "[artifacts]\nmodel = \"model.json\"\nschema = \"/abs/schema.json\"\n",
        )
        .expect("write");
        let config = load_config(&path).unwrap();
        assert_eq!(config.artifacts.model, tmp.path().join("model.json"));
        assert_eq!(config.artifacts.schema, PathBuf::from("/abs/schema.json"));
    }
}
