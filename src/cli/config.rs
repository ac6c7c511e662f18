use clap::{Parser, Subcommand};
use serde::{Deserialize, Serialize};

use crate::browsers::Browser;

// ============================================================================
// CLI Argument Parsing (clap derive)
// ============================================================================

#[derive(Parser, Debug)]
#[command(
    name = "login-forge",
    version,
    about = "Generates login automation artifacts from web login pages"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Verbosity level (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Node driver script for live browser sessions
    #[arg(long, global = true)]
    pub driver_script: Option<String>,

    /// Path to config file (default: login-forge.yaml in current dir)
    #[arg(long, global = true)]
    pub config: Option<String>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Inspect a login page and print the detected signature
    Scrape {
        /// URL of the login page
        #[arg(long)]
        url: String,

        /// Browser the artifacts will target: chrome, firefox, edge
        #[arg(long)]
        browser: Option<String>,

        /// Load the page in a live browser instead of fetching the raw HTML
        #[arg(long, default_value_t = false)]
        rendered: bool,

        /// Print the signature as JSON
        #[arg(long, default_value_t = false)]
        json: bool,
    },

    /// Capture a signature from a page the operator fills by hand
    Capture {
        /// URL of the login page
        #[arg(long)]
        url: String,

        /// Browser the artifacts will target: chrome, firefox, edge
        #[arg(long)]
        browser: Option<String>,

        /// Print the signature as JSON
        #[arg(long, default_value_t = false)]
        json: bool,
    },

    /// Generate the INI descriptor and AutoIt script for a login page
    Generate {
        /// URL of the login page
        #[arg(long)]
        url: String,

        /// Browser the artifacts will target: chrome, firefox, edge
        #[arg(long)]
        browser: Option<String>,

        /// Capture interactively instead of scraping
        #[arg(long, default_value_t = false)]
        capture: bool,

        /// Scrape through a live browser instead of fetching the raw HTML
        #[arg(long, default_value_t = false)]
        rendered: bool,

        /// Descriptor output path (default: <host>_login.ini)
        #[arg(long)]
        descriptor: Option<String>,

        /// Script output path (default: <host>_login.au3)
        #[arg(long)]
        script: Option<String>,

        /// Which artifacts to emit: ini, au3, both
        #[arg(long, default_value = "both")]
        emit: String,

        /// Output directory for default-named artifacts
        #[arg(short, long)]
        output_dir: Option<String>,
    },

    /// Replay a descriptor through the external engine and report its verdict
    Validate {
        /// Path to the INI descriptor
        #[arg(long)]
        descriptor: String,

        /// URL of the login page
        #[arg(long)]
        url: String,

        /// Browser to replay in: chrome, firefox, edge
        #[arg(long)]
        browser: Option<String>,

        /// Real username for the run (placeholders stay in place when omitted)
        #[arg(long)]
        username: Option<String>,

        /// Real password for the run
        #[arg(long)]
        password: Option<String>,
    },
}

// ============================================================================
// Config File Model (optional YAML)
// ============================================================================

/// Optional YAML config file: `login-forge.yaml`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub general: GeneralConfig,
    #[serde(default)]
    pub driver: DriverConfig,
    #[serde(default)]
    pub validator: ValidatorConfig,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            general: GeneralConfig::default(),
            driver: DriverConfig::default(),
            validator: ValidatorConfig::default(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeneralConfig {
    #[serde(default = "default_browser")]
    pub browser: String,

    #[serde(default = "default_output_dir")]
    pub output_dir: String,

    #[serde(default = "default_run_log")]
    pub run_log: String,
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            browser: "chrome".to_string(),
            output_dir: ".".to_string(),
            run_log: "login-forge.jsonl".to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DriverConfig {
    #[serde(default = "default_driver_script")]
    pub script: String,
}

impl Default for DriverConfig {
    fn default() -> Self {
        Self {
            script: "driver/login_driver.js".to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ValidatorConfig {
    #[serde(default = "default_validator")]
    pub executable: String,
}

impl Default for ValidatorConfig {
    fn default() -> Self {
        Self {
            executable: "ps_automate".to_string(),
        }
    }
}

// Serde default helpers
fn default_browser() -> String { "chrome".to_string() }
fn default_output_dir() -> String { ".".to_string() }
fn default_run_log() -> String { "login-forge.jsonl".to_string() }
fn default_driver_script() -> String { "driver/login_driver.js".to_string() }
fn default_validator() -> String { "ps_automate".to_string() }

// ============================================================================
// Config File Loading
// ============================================================================

/// Load config from a YAML file. Returns defaults if file is missing or malformed.
pub fn load_config(path: Option<&str>) -> AppConfig {
    let config_path = path.unwrap_or("login-forge.yaml");
    match std::fs::read_to_string(config_path) {
        Ok(content) => serde_yaml::from_str(&content).unwrap_or_default(),
        Err(_) => AppConfig::default(),
    }
}

// ============================================================================
// Config Builders (merge CLI args with config file)
// ============================================================================

/// Resolve the target browser: CLI flag > config file > chrome.
pub fn resolve_browser(flag: Option<&str>, config: &AppConfig) -> Result<Browser, String> {
    let name = flag.unwrap_or(&config.general.browser);
    Browser::from_name(name)
        .ok_or_else(|| format!("Unknown browser '{}' (expected chrome, firefox, or edge)", name))
}

/// Build a driver session config from resolved CLI/config values.
pub fn build_driver_config(
    script_flag: Option<&str>,
    browser: Browser,
    config: &AppConfig,
) -> crate::acquisition::session::DriverConfig {
    crate::acquisition::session::DriverConfig {
        script: script_flag.unwrap_or(&config.driver.script).to_string(),
        browser,
    }
}
