//! Command-line and environment configuration.

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use clap::Parser;
use reqwest::Url;

use crate::api::{FixedCount, HttpUserApi, InMemoryUserApi, UserApi};
use crate::error::{Context, Result, simple_error};
use crate::pagination::{DEFAULT_PAGE_SIZE, PAGE_SIZES};

pub const DEFAULT_API_URL: &str = "http://localhost:3000";

#[derive(Parser, Debug, Clone)]
#[command(name = "userlist-tui", version, about = "Browse a paginated, filterable list of users")]
pub struct Cli {
    /// Base URL of the users API.
    #[arg(long, env = "USERLIST_API_URL", default_value = DEFAULT_API_URL)]
    pub api_url: String,

    /// Use the built-in sample users instead of the HTTP API.
    #[arg(long)]
    pub demo: bool,

    /// Initial page size (one of 4, 6, 8, 11).
    #[arg(long, env = "USERLIST_PAGE_SIZE", default_value_t = DEFAULT_PAGE_SIZE)]
    pub page_size: usize,

    /// Report this total instead of asking the API for a count.
    #[arg(long, value_name = "N")]
    pub fixed_count: Option<u64>,

    /// Per-request timeout for the HTTP API.
    #[arg(long, default_value_t = 10)]
    pub timeout_secs: u64,

    #[arg(long, default_value = "theme.conf")]
    pub theme: String,

    #[arg(long, default_value = "keybinds.conf")]
    pub keybinds: String,

    #[arg(long, env = "USERLIST_LOG_FILE", default_value = "userlist-tui.log")]
    pub log_file: PathBuf,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum BackendKind {
    Http { base_url: Url, timeout: Duration },
    Demo,
}

/// Validated configuration.
#[derive(Clone, Debug)]
pub struct Settings {
    pub backend: BackendKind,
    pub page_size: usize,
    pub fixed_count: Option<u64>,
    pub theme_path: String,
    pub keybinds_path: String,
    pub log_file: PathBuf,
}

impl Cli {
    pub fn into_settings(self) -> Result<Settings> {
        if !PAGE_SIZES.contains(&self.page_size) {
            return Err(simple_error(format!(
                "page size must be one of {:?}, got {}",
                PAGE_SIZES, self.page_size
            )));
        }
        let backend = if self.demo {
            BackendKind::Demo
        } else {
            let base_url = Url::parse(&self.api_url).with_ctx(|| format!("invalid --api-url '{}'", self.api_url))?;
            if !matches!(base_url.scheme(), "http" | "https") {
                return Err(simple_error(format!("--api-url must be http(s), got '{}'", self.api_url)));
            }
            BackendKind::Http {
                base_url,
                timeout: Duration::from_secs(self.timeout_secs.max(1)),
            }
        };
        Ok(Settings {
            backend,
            page_size: self.page_size,
            fixed_count: self.fixed_count,
            theme_path: self.theme,
            keybinds_path: self.keybinds,
            log_file: self.log_file,
        })
    }
}

impl Settings {
    pub fn build_api(&self) -> Result<Arc<dyn UserApi>> {
        let base: Arc<dyn UserApi> = match &self.backend {
            BackendKind::Http { base_url, timeout } => Arc::new(
                HttpUserApi::new(base_url.clone(), *timeout).with_ctx(|| "build HTTP client".to_string())?,
            ),
            BackendKind::Demo => Arc::new(InMemoryUserApi::sample()),
        };
        Ok(match self.fixed_count {
            Some(count) => Arc::new(FixedCount::new(base, count)),
            None => base,
        })
    }
}
