use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use treejsx_compiler::CompileOptions;

pub const DEFAULT_CONFIG_NAME: &str = "treejsx.config.json";

/// Suffix of component-tree input files
pub const TREE_FILE_SUFFIX: &str = ".tree.json";

/// treejsx configuration file format
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Config {
    /// Options handed to the JSX compiler
    #[serde(default)]
    pub compiler_options: CompileOptions,

    /// Output directory for compiled modules
    #[serde(default = "default_out_dir")]
    pub out_dir: String,
}

fn default_out_dir() -> String {
    "dist".to_string()
}

impl Config {
    /// Load config from a directory, falling back to defaults
    pub fn load(cwd: &str) -> anyhow::Result<Self> {
        Self::load_from(&PathBuf::from(cwd).join(DEFAULT_CONFIG_NAME))
    }

    pub fn load_from(config_path: &Path) -> anyhow::Result<Self> {
        if config_path.exists() {
            let content = std::fs::read_to_string(config_path)?;
            let config: Config = serde_json::from_str(&content)?;
            Ok(config)
        } else {
            Ok(Config::default())
        }
    }

    pub fn get_out_dir(&self, cwd: &str) -> PathBuf {
        PathBuf::from(cwd).join(&self.out_dir)
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            compiler_options: CompileOptions::default(),
            out_dir: default_out_dir(),
        }
    }
}
