//! Clap derive structures for the `netmap` CLI.
//!
//! Defines the command tree, global flags, and shared value enums. Kept free
//! of workspace crates so `build.rs` can include it for man page generation.

use std::net::IpAddr;
use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};

// ── Top-Level CLI ────────────────────────────────────────────────────

/// netmap -- discover, classify and watch the devices on your network
#[derive(Debug, Parser)]
#[command(
    name = "netmap",
    version,
    about = "Explore a discovered network from the command line",
    long_about = "Talks to a netmap discovery backend: list and scan devices,\n\
        enrich them with nmap/SNMP data, promote tagged devices to a\n\
        router/switch/computer class, and watch live bandwidth.",
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
    /// Backend profile to use
    #[arg(long, short = 'p', env = "NETMAP_PROFILE", global = true)]
    pub profile: Option<String>,

    /// Backend URL (overrides profile)
    #[arg(long, short = 'b', env = "NETMAP_BACKEND", global = true)]
    pub backend: Option<String>,

    /// Output format
    #[arg(
        long,
        short = 'o',
        env = "NETMAP_OUTPUT",
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

    /// Request timeout in seconds (overrides profile)
    #[arg(long, env = "NETMAP_TIMEOUT", global = true)]
    pub timeout: Option<u64>,
}

// ── Output & Color Enums ─────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
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

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ColorMode {
    /// Auto-detect (color if terminal is interactive)
    Auto,
    /// Always emit color codes
    Always,
    /// Never emit color codes
    Never,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum EnrichKindArg {
    /// Port and service scan
    Nmap,
    /// SNMP probe
    Snmp,
    /// nmap followed by SNMP
    Both,
}

// ── Top-Level Command Enum ───────────────────────────────────────────

#[derive(Debug, Subcommand)]
pub enum Command {
    /// List and inspect discovered devices
    #[command(alias = "dev", alias = "d")]
    Devices(DevicesArgs),

    /// Run a discovery scan and replace the directory with its result
    Scan,

    /// Download the backend's device snapshot
    Export {
        /// Destination file [default: <export_dir>/network_data.json]
        #[arg(long, short = 'f')]
        file: Option<PathBuf>,
    },

    /// Upload a device snapshot to the backend
    Import {
        /// Snapshot file to upload
        file: PathBuf,
    },

    /// Enrich one device with nmap and/or SNMP data
    Enrich {
        /// Device IP address
        ip: IpAddr,

        /// Enrichment strategy
        #[arg(long, short = 'k', default_value = "both")]
        kind: EnrichKindArg,
    },

    /// Reclassify a device using one of its tags (router, switch, computer)
    Promote {
        /// Device IP address
        ip: IpAddr,

        /// Tag naming the new class
        tag: String,
    },

    /// Stream live bandwidth samples for one device
    #[command(alias = "bw")]
    Bandwidth {
        /// Device IP address
        ip: IpAddr,

        /// Stop after this many samples
        #[arg(long, short = 'n', default_value = "10")]
        samples: u32,
    },

    /// Print the topology graph synthesized from the directory
    #[command(alias = "topo")]
    Topology,

    /// Probe which SNMP version a device answers to
    SnmpVersion {
        /// Device IP address
        ip: IpAddr,
    },

    /// Show the subnet the backend scans
    Cidr,

    /// Manage CLI configuration and profiles
    Config(ConfigArgs),

    /// Generate shell completions
    Completions(CompletionsArgs),
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
//  DEVICES
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[derive(Debug, Args)]
pub struct DevicesArgs {
    #[command(subcommand)]
    pub command: DevicesCommand,
}

#[derive(Debug, Subcommand)]
pub enum DevicesCommand {
    /// List every device in the directory
    #[command(alias = "ls")]
    List,

    /// Show one device, including ports, uptime and SNMP
    Get {
        /// Device IP address
        ip: IpAddr,
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
    /// Create initial config file with guided setup
    Init,

    /// Display current configuration
    Show,

    /// Print the config file location
    Path,

    /// Set a value on the active profile (backend, timeout, export_dir)
    Set {
        /// Profile key
        key: String,

        /// Value to set
        value: String,
    },

    /// Set the default profile
    SetDefault {
        /// Profile name to set as default
        name: String,
    },
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
//  COMPLETIONS
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[derive(Debug, Args)]
pub struct CompletionsArgs {
    /// Shell to generate completions for
    pub shell: clap_complete::Shell,
}
