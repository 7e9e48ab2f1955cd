use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::data_dir::APP_DIR_NAME;

const CONFIG_FILE_NAME: &str = "config.toml";
const DEFAULT_HOST: &str = "127.0.0.1";
const DEFAULT_PORT: u16 = 3846;
const DEFAULT_LOG_LEVEL: &str = "info";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub log_level: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data_dir: Option<PathBuf>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bootstrap_super_admin: Option<String>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: DEFAULT_HOST.to_string(),
            port: DEFAULT_PORT,
            log_level: DEFAULT_LOG_LEVEL.to_string(),
            data_dir: None,
            bootstrap_super_admin: None,
        }
    }
}

#[derive(Debug, Clone)]
pub struct ConfigLoad {
    pub config: ServerConfig,
    pub file: PathBuf,
    pub created: bool,
}

/// Reads the config file, writing the defaults first when it does not exist.
pub fn load_or_create(path: Option<&Path>) -> Result<ConfigLoad, String> {
    let file = match path {
        Some(path) => path.to_path_buf(),
        None => default_config_file()?,
    };
    if let Some(dir) = file.parent().filter(|dir| !dir.as_os_str().is_empty()) {
        fs::create_dir_all(dir)
            .map_err(|err| format!("create config dir {}: {}", dir.display(), err))?;
    }

    if file.exists() {
        let contents = fs::read_to_string(&file)
            .map_err(|err| format!("read config {}: {}", file.display(), err))?;
        let config: ServerConfig = toml::from_str(&contents)
            .map_err(|err| format!("parse config {}: {}", file.display(), err))?;
        return Ok(ConfigLoad {
            config,
            file,
            created: false,
        });
    }

    let config = ServerConfig::default();
    let contents =
        toml::to_string_pretty(&config).map_err(|err| format!("serialize config: {}", err))?;
    fs::write(&file, contents).map_err(|err| format!("write config {}: {}", file.display(), err))?;

    Ok(ConfigLoad {
        config,
        file,
        created: true,
    })
}

fn default_config_file() -> Result<PathBuf, String> {
    let dir = dirs::config_dir().ok_or_else(|| "resolve config dir".to_string())?;
    Ok(dir.join(APP_DIR_NAME).join(CONFIG_FILE_NAME))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn creates_defaults_then_reads_them_back() {
        let dir = tempfile::tempdir().expect("temp dir");
        let file = dir.path().join("nested").join("config.toml");

        let first = load_or_create(Some(&file)).expect("create");
        assert!(first.created);
        assert_eq!(first.config.port, 3846);
        assert_eq!(first.config.host, "127.0.0.1");

        let second = load_or_create(Some(&file)).expect("load");
        assert!(!second.created);
        assert_eq!(second.config, first.config);
    }

    #[test]
    fn missing_keys_fall_back_to_defaults() {
        let dir = tempfile::tempdir().expect("temp dir");
        let file = dir.path().join("config.toml");
        fs::write(&file, "port = 9000\nbootstrap_super_admin = \"root\"\n").expect("write");

        let load = load_or_create(Some(&file)).expect("load");
        assert_eq!(load.config.port, 9000);
        assert_eq!(load.config.log_level, "info");
        assert_eq!(load.config.bootstrap_super_admin.as_deref(), Some("root"));
    }
}
