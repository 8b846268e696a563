use std::path::Path;

use anyhow::Context;
use serde::Deserialize;

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    pub server: ServerConfig,
    pub llm: LlmConfig,
    pub parse: ParseConfig,
    pub index: IndexConfig,
}

#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub bind: String,
    pub port: u16,
    pub max_body_bytes: usize,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind: "127.0.0.1".into(),
            port: 8080,
            max_body_bytes: 10 * 1024 * 1024,
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct LlmConfig {
    pub base_url: String,
    pub chat_model: String,
    pub embedding_model: String,
    pub max_tokens: u32,
    pub temperature: f32,
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            base_url: "https://api.upstage.ai/v1".into(),
            chat_model: "solar-1-mini-chat".into(),
            embedding_model: "embedding-passage".into(),
            max_tokens: 1000,
            temperature: 0.7,
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct ParseConfig {
    pub base_url: String,
    pub model: String,
}

impl Default for ParseConfig {
    fn default() -> Self {
        Self {
            base_url: "https://api.upstage.ai/v1".into(),
            model: "document-parse".into(),
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct IndexConfig {
    pub backend: String,
    pub qdrant_url: String,
    pub collection: String,
    pub vector_size: u64,
    pub top_k: u64,
    pub batch_size: usize,
}

impl Default for IndexConfig {
    fn default() -> Self {
        Self {
            backend: "qdrant".into(),
            qdrant_url: "http://localhost:6334".into(),
            collection: "docchat".into(),
            vector_size: 4096,
            top_k: 5,
            batch_size: 100,
        }
    }
}

impl Config {
    /// Load configuration from a TOML file with env var overrides.
    ///
    /// Falls back to defaults when the file does not exist.
    ///
    /// # Errors
    ///
    /// Returns an error if the file exists but cannot be read or parsed.
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let mut config = if path.exists() {
            let content = std::fs::read_to_string(path).context("failed to read config file")?;
            toml::from_str::<Self>(&content).context("failed to parse config file")?
        } else {
            Self::default()
        };

        config.apply_env_overrides();
        Ok(config)
    }

    fn apply_env_overrides(&mut self) {
        if let Ok(v) = std::env::var("DOCCHAT_LLM_BASE_URL") {
            self.llm.base_url = v;
        }
        if let Ok(v) = std::env::var("DOCCHAT_PARSE_BASE_URL") {
            self.parse.base_url = v;
        }
        if let Ok(v) = std::env::var("DOCCHAT_QDRANT_URL") {
            self.index.qdrant_url = v;
        }
        if let Ok(v) = std::env::var("DOCCHAT_COLLECTION") {
            self.index.collection = v;
        }
        if let Ok(v) = std::env::var("DOCCHAT_INDEX_BACKEND") {
            self.index.backend = v;
        }
    }
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use super::*;

    #[test]
    fn defaults_when_file_missing() {
        let config = Config::load(Path::new("/nonexistent/docchat.toml")).unwrap();
        assert_eq!(config.server.port, 8080);
        assert_eq!(config.llm.chat_model, "solar-1-mini-chat");
        assert_eq!(config.llm.embedding_model, "embedding-passage");
        assert_eq!(config.index.backend, "qdrant");
        assert_eq!(config.index.top_k, 5);
        assert_eq!(config.index.batch_size, 100);
    }

    #[test]
    fn parse_valid_toml() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("test.toml");
        let mut f = std::fs::File::create(&path).unwrap();
        write!(
            f,
            r#"
[server]
port = 9999

[llm]
chat_model = "solar-pro"

[index]
backend = "memory"
collection = "test_chunks"
vector_size = 8
"#
        )
        .unwrap();

        let config = Config::load(&path).unwrap();
        assert_eq!(config.server.port, 9999);
        assert_eq!(config.server.bind, "127.0.0.1");
        assert_eq!(config.llm.chat_model, "solar-pro");
        assert_eq!(config.index.backend, "memory");
        assert_eq!(config.index.collection, "test_chunks");
        assert_eq!(config.index.vector_size, 8);
    }

    #[test]
    fn invalid_toml_errors() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bad.toml");
        std::fs::write(&path, "not [valid toml").unwrap();
        assert!(Config::load(&path).is_err());
    }

    #[test]
    fn env_overrides_apply() {
        let mut config = Config::default();
        unsafe { std::env::set_var("DOCCHAT_COLLECTION", "override_chunks") };
        config.apply_env_overrides();
        unsafe { std::env::remove_var("DOCCHAT_COLLECTION") };
        assert_eq!(config.index.collection, "override_chunks");
    }
}
