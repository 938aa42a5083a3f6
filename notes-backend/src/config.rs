use clap::{ArgAction, Parser};
use std::path::PathBuf;

/// Environment variable names - single source of truth
pub mod env_vars {
    pub const HOST: &str = "NOTES_HOST";
    pub const PORT: &str = "NOTES_PORT";
    /// Directory holding the `<name>.txt` note files
    pub const CACHE_DIR: &str = "NOTES_CACHE_DIR";
    pub const UPLOAD_FORM: &str = "NOTES_UPLOAD_FORM";
}

/// Default values
pub mod defaults {
    pub const HOST: &str = "127.0.0.1";
    pub const PORT: u16 = 3000;
    pub const CACHE_DIR: &str = "./cache";
    pub const STATIC_DIR: &str = "static";
    pub const UPLOAD_FORM: &str = "UploadForm.html";
}

/// Returns the absolute path to the notes-backend directory.
/// Uses CARGO_MANIFEST_DIR at compile time, so it always resolves
/// to notes-backend/ regardless of the working directory at runtime.
pub fn backend_dir() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
}

/// Get the bundled upload form (notes-backend/static/UploadForm.html)
pub fn default_upload_form_path() -> PathBuf {
    backend_dir()
        .join(defaults::STATIC_DIR)
        .join(defaults::UPLOAD_FORM)
}

/// Command line flags; each one falls back to its environment variable.
///
/// `-h` selects the host, so help is only available as `--help`.
#[derive(Parser, Debug)]
#[command(name = "notes-backend", version, about = "File-backed notes service")]
#[command(disable_help_flag = true)]
pub struct Cli {
    /// Address to bind the HTTP server to
    #[arg(short = 'h', long, env = env_vars::HOST, default_value = defaults::HOST)]
    pub host: String,

    /// Port to bind the HTTP server to
    #[arg(short = 'p', long, env = env_vars::PORT, default_value_t = defaults::PORT)]
    pub port: u16,

    /// Directory where note files are stored
    #[arg(
        short = 'C',
        long = "cache",
        env = env_vars::CACHE_DIR,
        default_value = defaults::CACHE_DIR
    )]
    pub cache_dir: PathBuf,

    /// HTML page served at /UploadForm.html
    #[arg(long = "form", env = env_vars::UPLOAD_FORM)]
    pub upload_form: Option<PathBuf>,

    /// Print help
    #[arg(long, action = ArgAction::Help)]
    help: Option<bool>,
}

#[derive(Clone, Debug)]
pub struct Config {
    pub host: String,
    pub port: u16,
    pub notes_dir: PathBuf,
    pub upload_form_path: PathBuf,
}

impl Config {
    /// Parse the process arguments (and environment)
    pub fn from_args() -> Self {
        Cli::parse().into()
    }
}

impl From<Cli> for Config {
    fn from(cli: Cli) -> Self {
        Self {
            host: cli.host,
            port: cli.port,
            notes_dir: cli.cache_dir,
            upload_form_path: cli.upload_form.unwrap_or_else(default_upload_form_path),
        }
    }
}
