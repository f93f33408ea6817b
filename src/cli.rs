use clap::Parser;
use crate::types::*;

#[derive(Parser, Debug)]
#[command(
    name = "flickr-uploader",
    about = "Batch-upload photos to Flickr from a CSV manifest"
)]
pub struct Cli {
    /// Manifest file with one row per photo. Expected columns: filename,
    /// title, description, tags, license, album, system_id
    #[arg(short = 'm', long, required_unless_present_any = ["auth_only", "list_albums"])]
    pub manifest: Option<String>,

    /// File holding API key, API secret, OAuth token and OAuth token secret,
    /// one per line
    #[arg(long, env = "FLICKR_AUTH_FILE", default_value = "flickrAuthData.txt")]
    pub auth_file: String,

    /// Manifest column separator
    #[arg(long, value_enum, default_value = "comma")]
    pub delimiter: Delimiter,

    /// Who can see uploaded photos
    #[arg(long, value_enum, default_value = "public")]
    pub visibility: Visibility,

    /// Minimum milliseconds between uploads (0 disables throttling)
    #[arg(long, default_value_t = 1000)]
    pub delay_ms: u64,

    /// Uploads allowed back-to-back before throttling kicks in
    #[arg(long, default_value_t = 1, value_parser = clap::value_parser!(u32).range(1..))]
    pub burst: u32,

    /// Number of rows uploaded concurrently
    #[arg(long, default_value_t = 1, value_parser = clap::value_parser!(u16).range(1..))]
    pub threads_num: u16,

    /// Directory that relative manifest paths are resolved against
    #[arg(short = 'd', long)]
    pub base_directory: Option<String>,

    /// Write a JSON report of every row's outcome to this file
    #[arg(long)]
    pub report: Option<String>,

    /// HTTP request timeout in seconds
    #[arg(long, default_value_t = 120)]
    pub timeout_secs: u64,

    /// Log level
    #[arg(long, value_enum, default_value = "info")]
    pub log_level: LogLevel,

    /// Disable the progress bar
    #[arg(long)]
    pub no_progress_bar: bool,

    /// Only check that the credentials are accepted
    #[arg(long)]
    pub auth_only: bool,

    /// List the account's albums
    #[arg(short = 'l', long)]
    pub list_albums: bool,
}
