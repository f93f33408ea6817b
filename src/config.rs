use crate::types::{Delimiter, Visibility};
use crate::upload::UploadConfig;
use std::path::PathBuf;
use std::time::Duration;

/// Application configuration.
pub struct Config {
    pub manifest: Option<PathBuf>,
    pub auth_file: PathBuf,
    pub base_directory: Option<PathBuf>,
    pub report: Option<PathBuf>,

    pub delay: Duration,
    pub timeout: Duration,
    pub burst: u32,
    pub threads_num: u16,

    pub delimiter: Delimiter,
    pub visibility: Visibility,

    pub auth_only: bool,
    pub list_albums: bool,
    pub no_progress_bar: bool,
}

impl std::fmt::Debug for Config {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Config")
            .field("manifest", &self.manifest)
            .field("auth_file", &self.auth_file)
            .field("delimiter", &self.delimiter)
            .field("visibility", &self.visibility)
            .field("delay", &self.delay)
            .field("threads_num", &self.threads_num)
            .finish_non_exhaustive()
    }
}

fn expand_tilde(path: &str) -> PathBuf {
    if let Some(stripped) = path.strip_prefix("~/") {
        if let Some(home) = dirs::home_dir() {
            return home.join(stripped);
        }
    }
    PathBuf::from(path)
}

impl Config {
    pub fn from_cli(cli: crate::cli::Cli) -> anyhow::Result<Self> {
        if cli.timeout_secs == 0 {
            anyhow::bail!("--timeout-secs must be greater than zero");
        }

        let base_directory = cli.base_directory.as_deref().map(expand_tilde);
        if let Some(dir) = &base_directory {
            if !dir.is_dir() {
                anyhow::bail!("Base directory {} does not exist", dir.display());
            }
        }

        Ok(Self {
            manifest: cli.manifest.as_deref().map(expand_tilde),
            auth_file: expand_tilde(&cli.auth_file),
            base_directory,
            report: cli.report.as_deref().map(expand_tilde),
            delay: Duration::from_millis(cli.delay_ms),
            timeout: Duration::from_secs(cli.timeout_secs),
            burst: cli.burst,
            threads_num: cli.threads_num,
            delimiter: cli.delimiter,
            visibility: cli.visibility,
            auth_only: cli.auth_only,
            list_albums: cli.list_albums,
            no_progress_bar: cli.no_progress_bar,
        })
    }

    /// The slice of configuration the upload engine needs.
    pub fn upload_config(&self) -> UploadConfig {
        UploadConfig {
            base_directory: self.base_directory.clone(),
            visibility: self.visibility,
            delay: self.delay,
            burst: self.burst,
            threads_num: self.threads_num as usize,
            no_progress_bar: self.no_progress_bar,
        }
    }
}
