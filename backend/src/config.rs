use crate::error::ConfigError;
use serde::Deserialize;
use std::env;
use std::path::{Path, PathBuf};

const DEFAULT_MAX_UPLOAD_BYTES: usize = 10 * 1024 * 1024;

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub host: String,
    pub port: u16,
    pub model_path: PathBuf,
    pub frontend_dir: PathBuf,
    pub max_upload_bytes: usize,
}

impl Default for AppConfig {
    fn default() -> Self {
        let frontend_dir = if let Ok(manifest_dir) = env::var("CARGO_MANIFEST_DIR") {
            format!("{}/../frontend/dist", manifest_dir)
        } else {
            "/usr/src/app/frontend/dist".to_string()
        };

        Self {
            host: "0.0.0.0".to_string(),
            port: 8081,
            model_path: PathBuf::from("models/waste_classifier.onnx"),
            frontend_dir: PathBuf::from(frontend_dir),
            max_upload_bytes: DEFAULT_MAX_UPLOAD_BYTES,
        }
    }
}

impl AppConfig {
    /// Defaults, then the YAML file (if any), then the process environment.
    pub fn load() -> Result<Self, ConfigError> {
        let path = config_file_path();
        let mut config = if path.is_file() {
            log::info!("Loading config from {}", path.display());
            Self::from_yaml_file(&path)?
        } else {
            Self::default()
        };
        config.apply_overrides(|key| env::var(key).ok())?;
        Ok(config)
    }

    pub fn from_yaml_file(path: &Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_yaml_str(&contents)
    }

    pub fn from_yaml_str(contents: &str) -> Result<Self, ConfigError> {
        // An empty file is valid and means "all defaults".
        if contents.trim().is_empty() {
            return Ok(Self::default());
        }
        Ok(serde_yaml::from_str(contents)?)
    }

    pub fn apply_overrides<F>(&mut self, lookup: F) -> Result<(), ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(host) = lookup("HOST") {
            self.host = host;
        }
        if let Some(port) = lookup("PORT") {
            self.port = port
                .parse()
                .map_err(|_| ConfigError::InvalidValue { key: "PORT", value: port })?;
        }
        if let Some(model_path) = lookup("MODEL_PATH") {
            self.model_path = PathBuf::from(model_path);
        }
        if let Some(frontend_dir) = lookup("FRONTEND_DIR") {
            self.frontend_dir = PathBuf::from(frontend_dir);
        }
        if let Some(limit) = lookup("MAX_UPLOAD_BYTES") {
            self.max_upload_bytes = match limit.parse::<usize>() {
                Ok(0) | Err(_) => {
                    return Err(ConfigError::InvalidValue {
                        key: "MAX_UPLOAD_BYTES",
                        value: limit,
                    });
                }
                Ok(bytes) => bytes,
            };
        }
        Ok(())
    }

    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

fn config_file_path() -> PathBuf {
    if let Ok(path) = env::var("APP_CONFIG") {
        return PathBuf::from(path);
    }
    match env::var("CARGO_MANIFEST_DIR") {
        Ok(manifest_dir) => Path::new(&manifest_dir).join("config/app.yaml"),
        Err(_) => PathBuf::from("config/app.yaml"),
    }
}
