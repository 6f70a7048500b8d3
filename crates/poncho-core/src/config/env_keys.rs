//! 环境变量 key 常量与别名定义
//!
//! 主变量优先使用 `PONCHO_*`，兼容 conda / python 自身导出的变量。

/// 可观测性与日志
pub mod observability {
    pub const PONCHO_QUIET: &str = "PONCHO_QUIET";
    pub const PONCHO_LOG_LEVEL: &str = "PONCHO_LOG_LEVEL";
    pub const PONCHO_LOG_JSON: &str = "PONCHO_LOG_JSON";
}

/// External programs invoked by the packaging pipeline.
pub mod tools {
    pub const PONCHO_PYTHON: &str = "PONCHO_PYTHON";
    /// `python` of the active environment, exported by some activation scripts.
    pub const PYTHON_ALIASES: &[&str] = &["PYTHON"];

    pub const PONCHO_PIP: &str = "PONCHO_PIP";

    pub const PONCHO_CONDA: &str = "PONCHO_CONDA";
    /// Set by `conda activate`.
    pub const CONDA_ALIASES: &[&str] = &["CONDA_EXE"];

    pub const PONCHO_CONDA_PACK: &str = "PONCHO_CONDA_PACK";
    pub const PONCHO_GIT: &str = "PONCHO_GIT";
    pub const PONCHO_CURL: &str = "PONCHO_CURL";
    pub const PONCHO_TAR: &str = "PONCHO_TAR";
    pub const PONCHO_GZIP: &str = "PONCHO_GZIP";
}
