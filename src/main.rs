use anyhow::anyhow;
use clap::{Arg, ArgMatches, Command};
use colored::*;
use std::process;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;

use portcheck::{
    config::{ScanConfig, DEFAULT_TIMEOUT_MS},
    output::StreamReporter,
    scanner::engine::ScanEngine,
    utils::limits::fit_workers_to_ulimit,
};

/// Exit status when Ctrl-C stopped the run before every port was tried
const EXIT_INTERRUPTED: i32 = 130;

fn build_cli() -> Command {
    Command::new("portcheck")
        .version(env!("CARGO_PKG_VERSION"))
        .about("Report which TCP ports of a host accept a connection")
        .override_usage("portcheck [OPTIONS] HOST [port|port-range|port1,port2,...]")
        .arg(
            Arg::new("host")
                .value_name("HOST")
                .help("Target host name or IP address")
                .required(true)
                .index(1),
        )
        .arg(
            Arg::new("ports")
                .value_name("PORTS")
                .help("Ports to probe, e.g. 80 or 8000-8100 or 22,80,8000-8002 (default: 1-65535)")
                .index(2),
        )
        .arg(
            Arg::new("workers")
                .short('w')
                .long("workers")
                .value_name("N")
                .help("Maximum concurrent connection attempts (default: 10 per logical core)")
                .value_parser(clap::value_parser!(usize)),
        )
        .arg(
            Arg::new("timeout")
                .short('t')
                .long("timeout")
                .value_name("MS")
                .help(format!(
                    "Connect timeout per attempt in milliseconds (default: {})",
                    DEFAULT_TIMEOUT_MS
                ))
                .value_parser(clap::value_parser!(u64)),
        )
        .arg(
            Arg::new("ulimit")
                .short('u')
                .long("ulimit")
                .value_name("LIMIT")
                .help("Set the open file limit to this value before probing")
                .value_parser(clap::value_parser!(u64)),
        )
}

fn config_from_matches(matches: &ArgMatches) -> anyhow::Result<ScanConfig> {
    let host = matches
        .get_one::<String>("host")
        .ok_or_else(|| anyhow!("Not enough arguments: HOST is required"))?;

    let timeout = matches
        .get_one::<u64>("timeout")
        .copied()
        .unwrap_or(DEFAULT_TIMEOUT_MS);

    let mut config = ScanConfig::new(host.as_str()).with_timeout(timeout);

    if let Some(ports) = matches.get_one::<String>("ports") {
        config = config.with_ports(ports.as_str());
    }
    if let Some(&workers) = matches.get_one::<usize>("workers") {
        config = config.with_workers(workers);
    }

    config.validate()?;
    Ok(config)
}

async fn run(matches: &ArgMatches) -> anyhow::Result<i32> {
    let mut config = config_from_matches(matches)?;

    let workers = fit_workers_to_ulimit(config.workers, matches.get_one::<u64>("ulimit").copied());
    config = config.with_workers(workers);

    let cancel = CancellationToken::new();
    {
        let cancel = cancel.clone();
        tokio::spawn(async move {
            if tokio::signal::ctrl_c().await.is_ok() {
                eprintln!(
                    "{}",
                    "[~] Interrupted, waiting for in-flight attempts to finish".bright_yellow()
                );
                cancel.cancel();
            }
        });
    }

    let engine = ScanEngine::new(config, Arc::new(StreamReporter::stdio()))?
        .with_cancellation(cancel);
    let summary = engine.scan().await?;

    if summary.skipped > 0 {
        return Ok(EXIT_INTERRUPTED);
    }
    Ok(0)
}

#[tokio::main]
async fn main() {
    env_logger::init();

    // Exits with a usage message when HOST is missing
    let matches = build_cli().get_matches();

    match run(&matches).await {
        Ok(0) => {}
        Ok(code) => process::exit(code),
        Err(e) => {
            eprintln!("{} {}", "[!]".bright_red(), e);
            process::exit(1);
        }
    }
}
