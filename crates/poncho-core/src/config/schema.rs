//! 按领域分组的配置结构体
//!
//! 从环境变量加载，统一 fallback 逻辑。构建一次后显式传给流水线各阶段。

use super::env_keys::{observability as obv_keys, tools as tool_keys};
use super::loader::{env_bool, env_or};

/// 可观测性配置：quiet、log_level、log_json
#[derive(Debug, Clone)]
pub struct ObservabilityConfig {
    pub quiet: bool,
    pub log_level: String,
    pub log_json: bool,
}

impl ObservabilityConfig {
    pub fn from_env() -> Self {
        super::loader::load_dotenv();
        Self {
            quiet: env_bool(obv_keys::PONCHO_QUIET, &[], false),
            log_level: env_or(obv_keys::PONCHO_LOG_LEVEL, &[], || {
                "poncho=info,poncho_env=info".to_string()
            }),
            log_json: env_bool(obv_keys::PONCHO_LOG_JSON, &[], false),
        }
    }

    /// CLI flags win over the environment.
    pub fn with_cli_overrides(mut self, log_level: Option<String>, quiet: bool) -> Self {
        if let Some(level) = log_level {
            self.log_level = level;
        }
        if quiet {
            self.quiet = true;
        }
        self
    }
}

/// Programs the pipeline shells out to. Each one may be replaced by an
/// absolute path through its `PONCHO_*` variable.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ToolsConfig {
    pub python: String,
    pub pip: String,
    pub conda: String,
    pub conda_pack: String,
    pub git: String,
    pub curl: String,
    pub tar: String,
    pub gzip: String,
}

impl Default for ToolsConfig {
    fn default() -> Self {
        Self {
            python: "python3".to_string(),
            pip: "pip".to_string(),
            conda: "conda".to_string(),
            conda_pack: "conda-pack".to_string(),
            git: "git".to_string(),
            curl: "curl".to_string(),
            tar: "tar".to_string(),
            gzip: "gzip".to_string(),
        }
    }
}

impl ToolsConfig {
    pub fn from_env() -> Self {
        super::loader::load_dotenv();
        let d = Self::default();
        Self {
            python: env_or(tool_keys::PONCHO_PYTHON, tool_keys::PYTHON_ALIASES, || d.python),
            pip: env_or(tool_keys::PONCHO_PIP, &[], || d.pip),
            conda: env_or(tool_keys::PONCHO_CONDA, tool_keys::CONDA_ALIASES, || d.conda),
            conda_pack: env_or(tool_keys::PONCHO_CONDA_PACK, &[], || d.conda_pack),
            git: env_or(tool_keys::PONCHO_GIT, &[], || d.git),
            curl: env_or(tool_keys::PONCHO_CURL, &[], || d.curl),
            tar: env_or(tool_keys::PONCHO_TAR, &[], || d.tar),
            gzip: env_or(tool_keys::PONCHO_GZIP, &[], || d.gzip),
        }
    }
}
