//! Entry point for the one-shot gpustat CLI. Parses args, collects once, prints JSON.

use gpustat::{collect_batch, collect_inventory, collect_reading, load_settings, Host};
use std::env;
use std::io::{self, Write};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

const USAGE: &str = "[--config FILE|-c FILE] [--vendor NAME|-v NAME] [--gpu ID|-g ID] [--inventory|-i] [--gpus JSON]";

#[derive(Debug, Default)]
struct ParsedArgs {
    config: Option<PathBuf>,
    vendor: Option<String>,
    gpu: Option<String>,
    inventory: bool,
    gpus: Option<String>,
}

fn parse_args<I: IntoIterator<Item = String>>(args: I) -> Result<ParsedArgs, String> {
    let mut it = args.into_iter();
    let prog = it.next().unwrap_or_else(|| "gpustat".into());
    let mut parsed = ParsedArgs::default();

    while let Some(arg) = it.next() {
        match arg.as_str() {
            "-h" | "--help" => return Err(format!("Usage: {prog} {USAGE}")),
            "--config" | "-c" => parsed.config = it.next().map(PathBuf::from),
            "--vendor" | "-v" => parsed.vendor = it.next(),
            "--gpu" | "-g" => parsed.gpu = it.next(),
            "--inventory" | "-i" => parsed.inventory = true,
            "--gpus" => parsed.gpus = it.next(),
            _ => {
                let Some((flag, v)) = arg.split_once('=') else {
                    return Err(format!("Unexpected argument {arg}. Usage: {prog} {USAGE}"));
                };
                if v.is_empty() {
                    continue;
                }
                match flag {
                    "--config" => parsed.config = Some(PathBuf::from(v)),
                    "--vendor" => parsed.vendor = Some(v.to_string()),
                    "--gpu" => parsed.gpu = Some(v.to_string()),
                    "--gpus" => parsed.gpus = Some(v.to_string()),
                    _ => return Err(format!("Unexpected argument {arg}. Usage: {prog} {USAGE}")),
                }
            }
        }
    }
    Ok(parsed)
}

fn main() -> anyhow::Result<()> {
    // stdout carries the JSON document, so logs only appear when asked for
    if env::var_os("RUST_LOG").is_some() {
        tracing_subscriber::fmt()
            .with_env_filter(EnvFilter::from_default_env())
            .with_writer(io::stderr)
            .init();
    }

    let parsed = match parse_args(env::args()) {
        Ok(v) => v,
        Err(msg) => {
            eprintln!("{msg}");
            return Ok(());
        }
    };

    let mut settings = load_settings(parsed.config.as_deref());
    if let Some(vendor) = parsed.vendor {
        settings.vendor = vendor.to_ascii_lowercase();
    }
    if let Some(gpu) = parsed.gpu {
        settings.gpu_id = gpu;
    }

    let host = Host::system();
    let json = if parsed.inventory {
        serde_json::to_string(&collect_inventory(&host))?
    } else if let Some(gpus) = parsed.gpus {
        serde_json::to_string(&collect_batch(&gpus, &settings, &host))?
    } else {
        serde_json::to_string(&collect_reading(&settings, &host))?
    };

    let mut out = io::stdout().lock();
    writeln!(out, "{json}")?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(list: &[&str]) -> Vec<String> {
        std::iter::once("gpustat")
            .chain(list.iter().copied())
            .map(String::from)
            .collect()
    }

    #[test]
    fn long_short_and_assign_forms() {
        let p = parse_args(args(&["-v", "amd", "--gpu", "0c", "-c", "/tmp/x.cfg"])).unwrap();
        assert_eq!(p.vendor.as_deref(), Some("amd"));
        assert_eq!(p.gpu.as_deref(), Some("0c"));
        assert_eq!(p.config, Some(PathBuf::from("/tmp/x.cfg")));

        let p = parse_args(args(&["--vendor=intel", "--gpu=0000:00:02.0", "-i"])).unwrap();
        assert_eq!(p.vendor.as_deref(), Some("intel"));
        assert_eq!(p.gpu.as_deref(), Some("0000:00:02.0"));
        assert!(p.inventory);
    }

    #[test]
    fn help_and_unknown_flags_are_errors() {
        let help = parse_args(args(&["--help"])).unwrap_err();
        assert!(help.starts_with("Usage: gpustat"));
        assert!(parse_args(args(&["--bogus"])).is_err());
    }
}
