//! sidpage - manufacturing page builder for Sidewalk-class edge devices
//!
//! Takes one of three provisioning JSON shapes (console certificate
//! export, black-box export, cloud API responses), canonicalizes it into
//! a field list and writes the binary containers a device consumes:
//! flat page, Intel HEX, NVM3 object stream, S37 image.

mod cli;

use clap::Parser;
use cli::{Cli, Commands, CommonArgs};
use sidpage_commander::Commander;
use sidpage_core::adapters::{self, aws::AwsInput};
use sidpage_core::builder::PageBuilder;
use sidpage_core::chip::{self, ChipDescriptor, Platform};
use sidpage_core::config::PageConfig;
use sidpage_core::encode::{Endianness, SizePolicy};
use sidpage_core::output::bin::BinPage;
use sidpage_core::output::hex::write_hex_file;
use sidpage_core::output::nvm3::Nvm3Stream;
use sidpage_core::output::s37::write_s37;
use std::fs;
use std::path::{Path, PathBuf};

type CliResult<T> = Result<T, Box<dyn std::error::Error>>;

/// The parsed provisioning input, one variant per JSON shape
#[derive(Clone, Copy)]
enum Input<'a> {
    Acs { json: &'a str, app_pub: &'a [u8] },
    Bb { json: &'a str },
    AwsPair { wireless_device: &'a str, device_profile: &'a str },
    AwsCertificate { json: &'a str },
}

impl Input<'_> {
    /// Group tag used in default artifact names
    fn group(self) -> &'static str {
        match self {
            Input::Acs { .. } => "acs",
            Input::Bb { .. } => "bb",
            Input::AwsPair { .. } | Input::AwsCertificate { .. } => "aws",
        }
    }

    fn build(self, page: &mut PageBuilder<'_>) -> sidpage_core::Result<()> {
        match self {
            Input::Acs { json, app_pub } => adapters::acs::build(json, app_pub, page),
            Input::Bb { json } => adapters::bb::build(json, page),
            Input::AwsPair {
                wireless_device,
                device_profile,
            } => adapters::aws::build(
                AwsInput::ApiPair {
                    wireless_device,
                    device_profile,
                },
                page,
            ),
            Input::AwsCertificate { json } => {
                adapters::aws::build(AwsInput::Certificate(json), page)
            }
        }
    }
}

fn main() -> CliResult<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();
    match cli.verbose {
        0 => {} // default (info)
        1 => log::set_max_level(log::LevelFilter::Debug),
        _ => log::set_max_level(log::LevelFilter::Trace),
    }

    match cli.command {
        Commands::Acs {
            json,
            app_srv_pub,
            common,
        } => {
            let app_pub = read_app_srv_pub(&app_srv_pub)?;
            let json = fs::read_to_string(&json)?;
            run(
                &common,
                Input::Acs {
                    json: &json,
                    app_pub: &app_pub,
                },
            )
        }
        Commands::Bb { json, common } => {
            let json = fs::read_to_string(&json)?;
            run(&common, Input::Bb { json: &json })
        }
        Commands::Aws {
            wireless_device_json,
            device_profile_json,
            certificate_json,
            common,
        } => {
            if let Some(cert) = certificate_json {
                let cert = fs::read_to_string(&cert)?;
                run(&common, Input::AwsCertificate { json: &cert })
            } else if let (Some(wd), Some(dp)) = (wireless_device_json, device_profile_json) {
                let wd = fs::read_to_string(&wd)?;
                let dp = fs::read_to_string(&dp)?;
                run(
                    &common,
                    Input::AwsPair {
                        wireless_device: &wd,
                        device_profile: &dp,
                    },
                )
            } else {
                Err("aws needs --certificate-json, or --wireless-device-json \
                     with --device-profile-json"
                    .into())
            }
        }
    }
}

fn run(common: &CommonArgs, input: Input<'_>) -> CliResult<()> {
    if common.output_bin.is_none()
        && common.output_hex.is_none()
        && common.output_nvm3.is_none()
        && common.output_s37.is_none()
        && !common.dump_raw_values
    {
        return Err("no output requested: pass at least one --output-* flag".into());
    }
    if common.output_hex.is_some() && common.output_bin.is_none() {
        return Err("--output-hex requires --output-bin".into());
    }
    if common.output_s37.is_some() && common.output_nvm3.is_none() {
        return Err("--output-s37 requires --output-nvm3".into());
    }

    let config = match &common.config {
        Some(path) => {
            let config = PageConfig::from_yaml_file(path)?;
            log::info!("loaded page layout from {}", path.display());
            Some(config)
        }
        None => None,
    };
    let chip = resolve_chip(common)?;
    if let Some(chip) = chip {
        log::info!(
            "target chip {} ({}) at 0x{:08x}",
            chip.name,
            chip.full_part_name,
            chip.base_address
        );
    }

    let endianness = if common.little_endian {
        Endianness::Little
    } else {
        Endianness::Big
    };
    let policy = if common.strict_sizes {
        SizePolicy::Strict
    } else {
        SizePolicy::Warn
    };

    let mut page = PageBuilder::new(config.as_ref(), endianness, policy);
    input.build(&mut page)?;
    log::info!("built {} manufacturing fields", page.len());

    if common.dump_raw_values {
        dump_fields(&page);
    }

    let group = input.group();

    match (&common.output_bin, config.as_ref()) {
        (Some(flag), Some(config)) => {
            let bin_path = artifact_path(flag, group, chip, "bin");
            let mut out = BinPage::open(&bin_path, config)?;
            out.write_page(&page)?;

            if let Some(flag) = &common.output_hex {
                let chip = chip.ok_or("--output-hex needs a chip: pass --platform")?;
                let hex_path = artifact_path(flag, group, Some(chip), "hex");
                write_hex_file(&hex_path, out.buffer(), chip.base_address)?;
                log::info!("wrote {}", hex_path.display());
            }

            out.close()?;
            log::info!("wrote {}", bin_path.display());
        }
        (Some(_), None) => return Err("--output-bin requires --config".into()),
        (None, _) => {}
    }

    if let Some(flag) = &common.output_nvm3 {
        let nvm3_path = artifact_path(flag, group, chip, "nvm3");
        let mut stream = Nvm3Stream::open(&nvm3_path);
        stream.write_page(&page);
        stream.close()?;
        log::info!("wrote {}", nvm3_path.display());

        if let Some(flag) = &common.output_s37 {
            let chip = chip.ok_or("--output-s37 needs a chip: pass --platform silabs")?;
            let s37_path = artifact_path(flag, group, Some(chip), "s37");
            let tool = match &common.commander {
                Some(dir) => Commander::from_dir(dir),
                None => Commander::from_path(),
            };
            write_s37(&tool, chip, &nvm3_path, &s37_path)?;
            log::info!("wrote {}", s37_path.display());
        }
    }

    Ok(())
}

/// Resolve the target chip from --platform/--chip/--memory, or None when
/// no platform was requested
fn resolve_chip(common: &CommonArgs) -> CliResult<Option<&'static ChipDescriptor>> {
    let Some(platform) = &common.platform else {
        if common.chip.is_some() || common.memory.is_some() {
            return Err("--chip and --memory require --platform".into());
        }
        return Ok(None);
    };
    let platform = Platform::from_name(platform).ok_or_else(|| {
        format!(
            "unknown platform {platform:?}, valid: {}",
            Platform::ALL
                .iter()
                .map(|p| p.name())
                .collect::<Vec<_>>()
                .join(", ")
        )
    })?;
    Ok(Some(chip::resolve(
        platform,
        common.chip.as_deref(),
        common.memory,
    )?))
}

/// The application server public key comes either as a raw 32-byte file
/// or as 64 hex characters on the command line
fn read_app_srv_pub(arg: &str) -> CliResult<Vec<u8>> {
    let path = Path::new(arg);
    let bytes = if path.is_file() {
        fs::read(path)?
    } else {
        hex::decode(arg)
            .map_err(|e| format!("--app-srv-pub is neither a file nor valid hex: {e}"))?
    };
    if bytes.len() != 32 {
        return Err(format!(
            "application server public key must be 32 bytes, got {}",
            bytes.len()
        )
        .into());
    }
    Ok(bytes)
}

/// When an output flag names a directory, generate the artifact name
/// inside it; otherwise use the flag as the file path
fn artifact_path(
    flag: &Path,
    group: &str,
    chip: Option<&ChipDescriptor>,
    ext: &str,
) -> PathBuf {
    if flag.is_dir() {
        let name = match chip {
            Some(c) => format!("{}_{}_{}.{}", c.platform.name(), group, c.name, ext),
            None => format!("{group}.{ext}"),
        };
        flag.join(name)
    } else {
        flag.to_path_buf()
    }
}

fn dump_fields(page: &PageBuilder<'_>) {
    println!("{:<4} {:<44} {:>5}  value", "id", "name", "bytes");
    for field in page.fields() {
        println!(
            "{:<4} {:<44} {:>5}  {}",
            field.id.id(),
            field.id.name(),
            field.encoded().len(),
            hex::encode(field.encoded())
        );
    }
}
