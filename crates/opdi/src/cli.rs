//! Clap derive structures for the `opdi` CLI.
//!
//! Defines the complete command tree, global flags, and shared types.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};

// ── Top-Level CLI ────────────────────────────────────────────────────

/// opdi -- inspect and drive OPDI Wi-Fi camera devices
#[derive(Debug, Parser)]
#[command(
    name = "opdi",
    version,
    about = "Inspect and configure OPDI Wi-Fi camera devices",
    long_about = "Talks to an OPDI device over its local HTTP API and event stream.\n\n\
        One-shot commands poll the device once; `watch` keeps a live,\n\
        reconciled view of the device until interrupted.",
    propagate_version = true,
    subcommand_required = true,
    arg_required_else_help = true
)]
pub struct Cli {
    #[command(flatten)]
    pub global: GlobalOpts,

    #[command(subcommand)]
    pub command: Command,
}

// ── Global Options ───────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct GlobalOpts {
    /// Configured device to use
    #[arg(long, short = 'd', env = "OPDI_DEVICE", global = true)]
    pub device: Option<String>,

    /// Device URL (overrides the configured device)
    #[arg(long, short = 'u', env = "OPDI_URL", global = true)]
    pub url: Option<String>,

    /// Config file (defaults to the platform config directory)
    #[arg(long, env = "OPDI_CONFIG", global = true)]
    pub config: Option<PathBuf>,

    /// Output format
    #[arg(
        long,
        short = 'o',
        env = "OPDI_OUTPUT",
        default_value = "table",
        global = true
    )]
    pub output: OutputFormat,

    /// When to use color output
    #[arg(long, default_value = "auto", global = true)]
    pub color: ColorMode,

    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(long, short = 'v', action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress non-error output
    #[arg(long, short = 'q', global = true)]
    pub quiet: bool,

    /// Skip confirmation prompts
    #[arg(long, short = 'y', global = true)]
    pub yes: bool,

    /// Verify the device's TLS certificate against the system store
    #[arg(long, global = true)]
    pub strict_tls: bool,

    /// Request timeout in seconds
    #[arg(long, env = "OPDI_TIMEOUT", global = true)]
    pub timeout: Option<u64>,
}

// ── Output & Color Enums ─────────────────────────────────────────────

#[derive(Debug, Clone, ValueEnum)]
pub enum OutputFormat {
    /// Pretty table (default, interactive)
    Table,
    /// Pretty-printed JSON
    Json,
    /// Compact single-line JSON
    JsonCompact,
    /// YAML
    Yaml,
    /// Plain text, one value per line (scripting)
    Plain,
}

#[derive(Debug, Clone, ValueEnum)]
pub enum ColorMode {
    /// Auto-detect (color if terminal is interactive)
    Auto,
    /// Always emit color codes
    Always,
    /// Never emit color codes
    Never,
}

// ── Top-Level Command Enum ───────────────────────────────────────────

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Show station mode, addressing and signal
    #[command(alias = "st")]
    Status,

    /// Follow the device live until interrupted
    #[command(alias = "w")]
    Watch(WatchArgs),

    /// Manage saved Wi-Fi profiles
    #[command(alias = "p")]
    Profiles(ProfilesArgs),

    /// Join a network
    Connect {
        /// SSID to join; omit to reconnect to the best known profile
        ssid: Option<String>,
    },

    /// List nearby networks
    Scan {
        /// Ask for the firmware's cached summary instead of a fresh scan
        #[arg(long, short = 's')]
        summary: bool,
    },

    /// Show station connection metrics
    Metrics,

    /// Show firmware version information
    Version,

    /// Show system information
    #[command(alias = "sys")]
    Sysinfo,

    /// Show the device's recent log lines
    Logs {
        /// Only show the last N lines
        #[arg(long, short = 'n')]
        tail: Option<usize>,
    },

    /// Soft-AP settings
    Ap(ApArgs),

    /// Camera settings and stills
    #[command(alias = "cam")]
    Camera(CameraArgs),

    /// Manage CLI configuration and devices
    Config(ConfigArgs),

    /// Generate shell completions
    Completions(CompletionsArgs),
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
//  WATCH
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[derive(Debug, Args)]
pub struct WatchArgs {
    /// Poll only; do not open the event stream
    #[arg(long)]
    pub no_stream: bool,

    /// Status poll cadence in milliseconds
    #[arg(long)]
    pub interval_ms: Option<u64>,

    /// Also print raw frames, stream transitions and poll failures
    #[arg(long, short = 'e')]
    pub events: bool,
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
//  PROFILES
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[derive(Debug, Args)]
pub struct ProfilesArgs {
    #[command(subcommand)]
    pub command: ProfilesCommand,
}

#[derive(Debug, Subcommand)]
pub enum ProfilesCommand {
    /// List saved profiles
    #[command(alias = "ls")]
    List,

    /// Save a new profile
    Add {
        /// Network SSID
        ssid: String,

        /// Pre-shared key (omit for an open network)
        #[arg(long, env = "OPDI_PSK", hide_env_values = true, conflicts_with = "ask_psk")]
        psk: Option<String>,

        /// Prompt for the pre-shared key
        #[arg(long)]
        ask_psk: bool,

        /// The network does not broadcast its SSID
        #[arg(long)]
        hidden: bool,
    },

    /// Delete a saved profile
    #[command(alias = "rm")]
    Delete {
        /// Profile ID (as shown by `profiles list`)
        id: String,
    },
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
//  AP
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[derive(Debug, Args)]
pub struct ApArgs {
    #[command(subcommand)]
    pub command: ApCommand,
}

#[derive(Debug, Subcommand)]
pub enum ApCommand {
    /// Show the soft-AP SSID and channel
    Show,

    /// Change the soft-AP SSID and/or channel
    Set {
        #[arg(long)]
        ssid: Option<String>,

        /// Channel (1-13)
        #[arg(long)]
        channel: Option<u8>,
    },
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
//  CAMERA
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[derive(Debug, Args)]
pub struct CameraArgs {
    #[command(subcommand)]
    pub command: CameraCommand,
}

#[derive(Debug, Subcommand)]
pub enum CameraCommand {
    /// Show image settings
    Show,

    /// Change image settings (only the given ones)
    Set {
        /// Frame size, e.g. VGA, SVGA, HD
        #[arg(long)]
        resolution: Option<String>,

        /// JPEG quality, 0 (best) to 63
        #[arg(long)]
        quality: Option<u8>,

        #[arg(long, allow_hyphen_values = true)]
        brightness: Option<i32>,

        #[arg(long, allow_hyphen_values = true)]
        contrast: Option<i32>,

        #[arg(long, allow_hyphen_values = true)]
        saturation: Option<i32>,

        #[arg(long)]
        auto_exposure: Option<bool>,
    },

    /// Capture a JPEG still
    Snapshot {
        /// Output file, or "-" for stdout
        #[arg(long, short = 'O', default_value = "snapshot.jpg")]
        out: PathBuf,
    },
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
//  CONFIG
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[derive(Debug, Args)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub command: ConfigCommand,
}

#[derive(Debug, Subcommand)]
pub enum ConfigCommand {
    /// Create a config file with guided setup
    Init,

    /// Display current configuration
    Show,

    /// Print the config file location
    Path,

    /// List configured devices
    Devices,

    /// Set the default device
    Use {
        /// Device name to set as default
        name: String,
    },
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
//  COMPLETIONS
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[derive(Debug, Args)]
pub struct CompletionsArgs {
    /// Target shell
    pub shell: clap_complete::Shell,
}
