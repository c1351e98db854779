use anyhow::{Result, anyhow, bail};
use serde::Deserialize;
use std::collections::BTreeMap;
use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use crate::policy::PolicyConfig;

const CONFIG_DIR_NAME: &str = "defectql";
const CONFIG_FILE_NAME: &str = "config.toml";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    pub config_path: PathBuf,
    pub config_is_explicit: bool,
    /// Prompt name to select as the default, when set.
    pub prompt: Option<String>,
    /// Extra prompts to register at startup, name to file path.
    pub prompt_files: BTreeMap<String, PathBuf>,
    pub policy: PolicyConfig,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct RawFileConfig {
    prompt: Option<String>,
    policy: Option<RawPolicyConfig>,
    prompts: Option<BTreeMap<String, PathBuf>>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct RawPolicyConfig {
    allow_mutation: Option<bool>,
    allow_destructive: Option<bool>,
    require_limit_on_explore: Option<bool>,
}

impl AppConfig {
    pub fn load() -> Result<Self> {
        Self::load_with_path(None)
    }

    pub fn load_with_path(path: Option<&Path>) -> Result<Self> {
        let (config_path, config_is_explicit) = match path {
            Some(path) => (path.to_path_buf(), true),
            None => (discover_config_path()?, false),
        };
        let file_config = load_file_config(&config_path, config_is_explicit)?;

        dotenvy::dotenv().ok();

        let file_prompt = file_config
            .as_ref()
            .and_then(|cfg| cfg.prompt.as_ref())
            .and_then(|value| non_empty(value).map(ToOwned::to_owned));
        let raw_policy = file_config.as_ref().and_then(|cfg| cfg.policy.as_ref());
        let defaults = PolicyConfig::default();

        let policy = PolicyConfig {
            allow_mutation: env_bool("DEFECTQL_ALLOW_MUTATION")?
                .or(raw_policy.and_then(|policy| policy.allow_mutation))
                .unwrap_or(defaults.allow_mutation),
            allow_destructive: env_bool("DEFECTQL_ALLOW_DESTRUCTIVE")?
                .or(raw_policy.and_then(|policy| policy.allow_destructive))
                .unwrap_or(defaults.allow_destructive),
            require_limit_on_explore: env_bool("DEFECTQL_REQUIRE_LIMIT")?
                .or(raw_policy.and_then(|policy| policy.require_limit_on_explore))
                .unwrap_or(defaults.require_limit_on_explore),
        };

        let prompt_files = file_config
            .and_then(|cfg| cfg.prompts)
            .unwrap_or_default();

        Ok(Self {
            config_path,
            config_is_explicit,
            prompt: env_non_empty("DEFECTQL_PROMPT").or(file_prompt),
            prompt_files,
            policy,
        })
    }
}

fn discover_config_path() -> Result<PathBuf> {
    if let Ok(xdg) = env::var("XDG_CONFIG_HOME") {
        let trimmed = xdg.trim();
        if trimmed.is_empty() {
            bail!("Failed to resolve config path: XDG_CONFIG_HOME is set but empty");
        }

        return Ok(PathBuf::from(trimmed)
            .join(CONFIG_DIR_NAME)
            .join(CONFIG_FILE_NAME));
    }

    let home = dirs::home_dir().ok_or_else(|| {
        anyhow!("Failed to resolve config path: HOME directory is unavailable")
    })?;

    Ok(home
        .join(".config")
        .join(CONFIG_DIR_NAME)
        .join(CONFIG_FILE_NAME))
}

fn load_file_config(config_path: &Path, explicit: bool) -> Result<Option<RawFileConfig>> {
    if !config_path.is_file() {
        if explicit {
            bail!(
                "Failed to load config {}: file does not exist",
                config_path.display()
            );
        }
        return Ok(None);
    }

    let config_text = fs::read_to_string(config_path).map_err(|err| {
        anyhow!(
            "Failed to load config {}: unable to read file: {err}",
            config_path.display()
        )
    })?;

    toml::from_str(&config_text).map(Some).map_err(|err| {
        anyhow!(
            "Failed to load config {}: {err}",
            config_path.display()
        )
    })
}

fn env_bool(key: &str) -> Result<Option<bool>> {
    let Some(value) = env_non_empty(key) else {
        return Ok(None);
    };

    match value.as_str() {
        "true" | "1" => Ok(Some(true)),
        "false" | "0" => Ok(Some(false)),
        other => bail!("Failed to read {key}: expected true/false/1/0, got '{other}'"),
    }
}

fn env_non_empty(key: &str) -> Option<String> {
    env::var(key).ok().and_then(|value| {
        let trimmed = value.trim();
        if trimmed.is_empty() {
            None
        } else {
            Some(trimmed.to_string())
        }
    })
}

fn non_empty(value: &str) -> Option<&str> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed)
    }
}

#[cfg(test)]
mod tests {
    use super::AppConfig;
    use crate::policy::PolicyConfig;
    use serial_test::serial;
    use std::env;
    use std::fs;
    use std::path::Path;

    fn reset_vars() {
        unsafe {
            env::remove_var("DEFECTQL_PROMPT");
            env::remove_var("DEFECTQL_ALLOW_MUTATION");
            env::remove_var("DEFECTQL_ALLOW_DESTRUCTIVE");
            env::remove_var("DEFECTQL_REQUIRE_LIMIT");
            env::remove_var("XDG_CONFIG_HOME");
        }
    }

    fn with_cwd<T>(path: &Path, f: impl FnOnce() -> T) -> T {
        let cwd = env::current_dir().expect("current dir");
        env::set_current_dir(path).expect("set current dir");
        let result = f();
        env::set_current_dir(cwd).expect("restore current dir");
        result
    }

    #[test]
    #[serial]
    fn load_uses_policy_defaults_when_unset() {
        let tmp = tempfile::tempdir().expect("tempdir");
        reset_vars();
        unsafe {
            env::set_var("XDG_CONFIG_HOME", tmp.path());
        }

        let cfg = with_cwd(tmp.path(), || AppConfig::load().expect("load config"));
        assert_eq!(cfg.policy, PolicyConfig::default());
        assert_eq!(cfg.prompt, None);
        assert!(cfg.prompt_files.is_empty());
        assert!(!cfg.config_is_explicit);
    }

    #[test]
    #[serial]
    fn load_reads_policy_flags_and_prompt_from_file() {
        let tmp = tempfile::tempdir().expect("tempdir");
        let config_dir = tmp.path().join("defectql");
        fs::create_dir_all(&config_dir).expect("create config dir");
        fs::write(
            config_dir.join("config.toml"),
            r#"
prompt = "manufacturing-defects"

[policy]
allow_mutation = true
require_limit_on_explore = false

[prompts]
quality-review = "/srv/prompts/quality.md"
"#,
        )
        .expect("write config");

        reset_vars();
        unsafe {
            env::set_var("XDG_CONFIG_HOME", tmp.path());
        }

        let cfg = with_cwd(tmp.path(), || AppConfig::load().expect("load config"));
        assert_eq!(cfg.prompt.as_deref(), Some("manufacturing-defects"));
        assert!(cfg.policy.allow_mutation);
        assert!(!cfg.policy.allow_destructive);
        assert!(!cfg.policy.require_limit_on_explore);
        assert_eq!(
            cfg.prompt_files.get("quality-review").map(|p| p.as_path()),
            Some(Path::new("/srv/prompts/quality.md"))
        );
    }

    #[test]
    #[serial]
    fn load_env_overrides_file() {
        let tmp = tempfile::tempdir().expect("tempdir");
        let config_dir = tmp.path().join("defectql");
        fs::create_dir_all(&config_dir).expect("create config dir");
        fs::write(
            config_dir.join("config.toml"),
            r#"
prompt = "from-file"

[policy]
allow_mutation = false
"#,
        )
        .expect("write config");

        reset_vars();
        unsafe {
            env::set_var("XDG_CONFIG_HOME", tmp.path());
            env::set_var("DEFECTQL_PROMPT", "from-env");
            env::set_var("DEFECTQL_ALLOW_MUTATION", "true");
        }

        let cfg = with_cwd(tmp.path(), || AppConfig::load().expect("load config"));
        assert_eq!(cfg.prompt.as_deref(), Some("from-env"));
        assert!(cfg.policy.allow_mutation);
    }

    #[test]
    #[serial]
    fn load_rejects_malformed_env_bool() {
        let tmp = tempfile::tempdir().expect("tempdir");
        reset_vars();
        unsafe {
            env::set_var("XDG_CONFIG_HOME", tmp.path());
            env::set_var("DEFECTQL_ALLOW_DESTRUCTIVE", "maybe");
        }

        let err = with_cwd(tmp.path(), || {
            AppConfig::load().expect_err("load should fail")
        });
        assert!(
            err.to_string()
                .contains("Failed to read DEFECTQL_ALLOW_DESTRUCTIVE")
        );
    }

    #[test]
    #[serial]
    fn load_fails_when_xdg_config_home_is_empty() {
        reset_vars();
        unsafe {
            env::set_var("XDG_CONFIG_HOME", "   ");
        }

        let err = AppConfig::load().expect_err("load should fail");
        assert!(
            err.to_string()
                .contains("Failed to resolve config path: XDG_CONFIG_HOME is set but empty")
        );
    }

    #[test]
    #[serial]
    fn load_fails_on_unknown_root_key() {
        let tmp = tempfile::tempdir().expect("tempdir");
        let config_dir = tmp.path().join("defectql");
        fs::create_dir_all(&config_dir).expect("create config dir");
        fs::write(config_dir.join("config.toml"), "unknown_key = 1").expect("write config");

        reset_vars();
        unsafe {
            env::set_var("XDG_CONFIG_HOME", tmp.path());
        }

        let err = with_cwd(tmp.path(), || {
            AppConfig::load().expect_err("load should fail")
        });
        assert!(err.to_string().contains("Failed to load config"));
        assert!(err.to_string().contains("unknown field"));
    }

    #[test]
    #[serial]
    fn load_fails_on_unknown_policy_key() {
        let tmp = tempfile::tempdir().expect("tempdir");
        let config_dir = tmp.path().join("defectql");
        fs::create_dir_all(&config_dir).expect("create config dir");
        fs::write(
            config_dir.join("config.toml"),
            r#"
[policy]
allow_everything = true
"#,
        )
        .expect("write config");

        reset_vars();
        unsafe {
            env::set_var("XDG_CONFIG_HOME", tmp.path());
        }

        let err = with_cwd(tmp.path(), || {
            AppConfig::load().expect_err("load should fail")
        });
        assert!(err.to_string().contains("unknown field"));
    }

    #[test]
    #[serial]
    fn load_fails_when_explicit_config_is_missing() {
        let tmp = tempfile::tempdir().expect("tempdir");
        reset_vars();

        let missing = tmp.path().join("nope.toml");
        let err = with_cwd(tmp.path(), || {
            AppConfig::load_with_path(Some(&missing)).expect_err("load should fail")
        });
        assert!(err.to_string().contains("file does not exist"));
    }

    #[test]
    #[serial]
    fn explicit_config_path_is_used_as_given() {
        let tmp = tempfile::tempdir().expect("tempdir");
        let config_path = tmp.path().join("custom.toml");
        fs::write(&config_path, r#"prompt = "custom""#).expect("write config");

        reset_vars();

        let cfg = with_cwd(tmp.path(), || {
            AppConfig::load_with_path(Some(&config_path)).expect("load config")
        });
        assert!(cfg.config_is_explicit);
        assert_eq!(cfg.config_path, config_path);
        assert_eq!(cfg.prompt.as_deref(), Some("custom"));
    }
}
