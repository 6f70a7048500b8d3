//! 统一环境变量加载逻辑
//!
//! 集中维护 fallback 链，避免在业务代码中重复 `or_else` 调用。

use std::env;
use std::path::Path;

/// 加载当前目录下的 `.env` 到环境变量（不覆盖已存在的变量）
pub fn load_dotenv() {
    use std::sync::Once;
    static INIT: Once = Once::new();
    INIT.call_once(|| {
        let path = env::current_dir()
            .map(|d| d.join(".env"))
            .unwrap_or_else(|_| std::path::PathBuf::from(".env"));
        for (key, value) in read_dotenv(&path) {
            if env::var(&key).is_err() {
                #[allow(unsafe_code)]
                unsafe {
                    env::set_var(key, value);
                }
            }
        }
    });
}

/// 解析 `.env` 文件为 (key, value) 列表；文件不存在时返回空
pub fn read_dotenv(path: &Path) -> Vec<(String, String)> {
    let Ok(content) = std::fs::read_to_string(path) else {
        return Vec::new();
    };
    let mut pairs = Vec::new();
    for line in content.lines() {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }
        let line = line.strip_prefix("export ").unwrap_or(line);
        if let Some(eq_pos) = line.find('=') {
            let key = line[..eq_pos].trim();
            let mut value = line[eq_pos + 1..].trim();
            if value.len() >= 2
                && ((value.starts_with('"') && value.ends_with('"'))
                    || (value.starts_with('\'') && value.ends_with('\'')))
            {
                value = &value[1..value.len() - 1];
            }
            if !key.is_empty() {
                pairs.push((key.to_string(), value.to_string()));
            }
        }
    }
    pairs
}

/// 从主变量或别名链读取环境变量，失败时使用默认值
pub fn env_or<F>(primary: &str, aliases: &[&str], default: F) -> String
where
    F: FnOnce() -> String,
{
    env::var(primary)
        .ok()
        .or_else(|| aliases.iter().find_map(|a| env::var(a).ok()))
        .filter(|s| !s.is_empty())
        .unwrap_or_else(default)
}

/// 从主变量或别名链读取，返回 Option（空值视为未设置）
pub fn env_optional(primary: &str, aliases: &[&str]) -> Option<String> {
    env::var(primary)
        .ok()
        .or_else(|| aliases.iter().find_map(|a| env::var(a).ok()))
        .and_then(|s| {
            let s = s.trim().to_string();
            if s.is_empty() {
                None
            } else {
                Some(s)
            }
        })
}

/// 解析布尔型环境变量：1/true/yes 为 true，0/false/no/off 为 false
pub fn env_bool(primary: &str, aliases: &[&str], default: bool) -> bool {
    let v = env::var(primary)
        .ok()
        .or_else(|| aliases.iter().find_map(|a| env::var(a).ok()));
    match v.as_deref() {
        Some(s) => !matches!(
            s.trim().to_lowercase().as_str(),
            "0" | "false" | "no" | "off"
        ),
        None => default,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_read_dotenv_parses_quotes_and_export() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(".env");
        let mut f = std::fs::File::create(&path).unwrap();
        writeln!(f, "# comment").unwrap();
        writeln!(f, "PONCHO_CONDA=\"/opt/conda/bin/conda\"").unwrap();
        writeln!(f, "export PONCHO_GIT='git'").unwrap();
        writeln!(f).unwrap();
        writeln!(f, "PONCHO_QUIET=1").unwrap();

        let pairs = read_dotenv(&path);
        assert_eq!(
            pairs,
            vec![
                ("PONCHO_CONDA".to_string(), "/opt/conda/bin/conda".to_string()),
                ("PONCHO_GIT".to_string(), "git".to_string()),
                ("PONCHO_QUIET".to_string(), "1".to_string()),
            ]
        );
    }

    #[test]
    fn test_read_dotenv_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        assert!(read_dotenv(&dir.path().join("nope.env")).is_empty());
    }

    #[test]
    fn test_env_or_uses_default_when_unset() {
        let v = env_or("PONCHO_TEST_SURELY_UNSET_KEY", &[], || "fallback".to_string());
        assert_eq!(v, "fallback");
        assert!(env_optional("PONCHO_TEST_SURELY_UNSET_KEY", &[]).is_none());
        assert!(env_bool("PONCHO_TEST_SURELY_UNSET_KEY", &[], true));
    }
}
