//! CLI argument parsing

use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "sidpage")]
#[command(author, version, about = "Manufacturing page builder", long_about = None)]
pub struct Cli {
    /// Verbosity level (-v, -vv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Commands,
}

/// Target and output options shared by every input group
#[derive(Args, Debug, Clone, Default)]
pub struct CommonArgs {
    /// Page layout config (YAML)
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Write a flat binary page; requires --config
    #[arg(long)]
    pub output_bin: Option<PathBuf>,

    /// Write an Intel HEX image; requires --output-bin and a chip
    #[arg(long)]
    pub output_hex: Option<PathBuf>,

    /// Write an NVM3 object stream
    #[arg(long)]
    pub output_nvm3: Option<PathBuf>,

    /// Write a SiLabs S37 image; requires --output-nvm3 and a chip
    #[arg(long)]
    pub output_s37: Option<PathBuf>,

    /// Target platform family [nordic, ti, silabs, generic]
    #[arg(long)]
    pub platform: Option<String>,

    /// Chip variant name within the platform (e.g. nrf52840, p7, mg21)
    #[arg(long)]
    pub chip: Option<String>,

    /// Flash memory variant in KiB, for chips shipping multiple sizes
    #[arg(long)]
    pub memory: Option<u32>,

    /// Encode integer fields little-endian instead of big-endian
    #[arg(long)]
    pub little_endian: bool,

    /// Treat catalog size mismatches as errors instead of warnings
    #[arg(long)]
    pub strict_sizes: bool,

    /// Print the encoded field table to stdout
    #[arg(long)]
    pub dump_raw_values: bool,

    /// Directory containing the SiLabs commander executable
    /// (defaults to PATH lookup)
    #[arg(long)]
    pub commander: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Build a page from a console certificate export
    Acs {
        /// Certificate JSON exported by the console
        #[arg(long)]
        json: PathBuf,

        /// Application server public key: a 32-byte file or 64 hex chars
        #[arg(long)]
        app_srv_pub: String,

        #[command(flatten)]
        common: CommonArgs,
    },

    /// Build a page from a black-box provisioning export
    Bb {
        /// Black-box JSON document
        #[arg(long)]
        json: PathBuf,

        #[command(flatten)]
        common: CommonArgs,
    },

    /// Build a page from cloud API responses
    Aws {
        /// get-wireless-device response JSON
        #[arg(long, requires = "device_profile_json", conflicts_with = "certificate_json")]
        wireless_device_json: Option<PathBuf>,

        /// get-device-profile response JSON
        #[arg(long, requires = "wireless_device_json", conflicts_with = "certificate_json")]
        device_profile_json: Option<PathBuf>,

        /// Unified certificate JSON from the cloud console
        #[arg(long)]
        certificate_json: Option<PathBuf>,

        #[command(flatten)]
        common: CommonArgs,
    },
}
