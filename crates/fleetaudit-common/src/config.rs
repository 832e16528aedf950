//! Run configuration resolved from flags and the process environment

use fleetaudit_core::{Error, Result};
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Settings for one audit run.
///
/// Built once at startup and treated as immutable afterwards. Anything that
/// cannot be resolved here (most importantly the API token) is a
/// `Configuration` error and aborts the run before any control executes.
#[derive(Debug, Clone)]
pub struct RunConfig {
    pub root_dir: PathBuf,
    pub env_tag: String,

    pub log_dir: PathBuf,
    pub report_dir: PathBuf,

    pub api_token: String,

    pub ssh_user: String,
    pub ssh_user_fallback: String,
    pub ssh_key_path: Option<PathBuf>,
    pub ssh_port: u16,
    pub ssh_timeout: Duration,
}

impl RunConfig {
    /// Resolves the configuration from the process environment. `env_tag_flag`
    /// is the command-line override and wins over `ENV_TAG`.
    pub fn from_env(root_dir: &Path, env_tag_flag: Option<&str>) -> Result<Self> {
        Self::resolve(root_dir, env_tag_flag, |key| std::env::var(key).ok())
    }

    /// Same as [`RunConfig::from_env`] but with an explicit variable lookup,
    /// so resolution rules can be tested without mutating process state.
    pub fn resolve<F>(root_dir: &Path, env_tag_flag: Option<&str>, lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |key: &str| {
            lookup(key)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
        };

        let api_token = var("DO_ACCESS_TOKEN")
            .or_else(|| var("DIGITALOCEAN_ACCESS_TOKEN"))
            .or_else(|| var("TF_VAR_do_token"))
            .ok_or_else(|| {
                Error::Configuration(
                    "missing API token (set DO_ACCESS_TOKEN or DIGITALOCEAN_ACCESS_TOKEN)".into(),
                )
            })?;

        let env_tag = env_tag_flag
            .map(str::trim)
            .filter(|v| !v.is_empty())
            .map(str::to_string)
            .or_else(|| var("ENV_TAG"))
            .unwrap_or_else(|| "env:demo".into());

        let log_dir = var("LOG_DIR")
            .map(PathBuf::from)
            .unwrap_or_else(|| root_dir.join("logs"));
        let report_dir = var("REPORT_DIR")
            .map(PathBuf::from)
            .unwrap_or_else(|| root_dir.join("reports"));

        // Malformed numeric overrides fall back to the defaults silently.
        let ssh_port = var("SSH_PORT")
            .and_then(|v| v.parse::<u16>().ok())
            .filter(|p| *p > 0)
            .unwrap_or(22);
        let ssh_timeout = var("SSH_TIMEOUT_SECONDS")
            .and_then(|v| v.parse::<u64>().ok())
            .filter(|s| *s > 0)
            .map(Duration::from_secs)
            .unwrap_or_else(|| Duration::from_secs(10));

        Ok(Self {
            root_dir: root_dir.to_path_buf(),
            env_tag,
            log_dir,
            report_dir,
            api_token,
            ssh_user: var("SSH_USER").unwrap_or_else(|| "devops".into()),
            ssh_user_fallback: var("SSH_USER_FALLBACK").unwrap_or_else(|| "root".into()),
            ssh_key_path: var("SSH_KEY_PATH").map(PathBuf::from),
            ssh_port,
            ssh_timeout,
        })
    }
}

/// Walks up from the current directory looking for the deployment marker
/// `scripts/common/doctl_helpers.sh`; falls back to the current directory
/// when no ancestor carries it.
pub fn find_deployment_root() -> PathBuf {
    let Ok(cwd) = std::env::current_dir() else {
        return PathBuf::from(".");
    };
    let mut dir = cwd.as_path();
    loop {
        if dir.join("scripts/common/doctl_helpers.sh").is_file() {
            return dir.to_path_buf();
        }
        match dir.parent() {
            Some(parent) => dir = parent,
            None => return cwd,
        }
    }
}
