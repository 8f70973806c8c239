use anyhow::{anyhow, Result};
use clap::{self, Parser};
use std::path::PathBuf;
use std::process::ExitCode;
use tracing::error;
use tracing_subscriber::fmt;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::EnvFilter;

use crate::ruletree::metadata::UnixMetadata;
use crate::ruletree::report::Report;
use crate::ruletree::ruleset::RuleSet;
use crate::ruletree::sync::{synchronize, SyncOptions};
use crate::ruletree::utils::parse_mode;

/// Materializes declarative iptables rules into per-chain directories of
/// priority-ordered rule files.
#[derive(Parser, Debug)]
#[command(name = "iptables-ruletree", version, about, long_about)]
struct Args {
    /// Rules document: YAML mapping of tables to chains to rule entries
    #[arg(short, long, value_name = "FILE")]
    rules: PathBuf,

    /// Root of the managed tree
    #[arg(
        short,
        long,
        value_name = "DIR",
        default_value = "/etc/firewall/rules.d"
    )]
    dest: PathBuf,

    /// Owner applied to created directories and rule files
    #[arg(short, long, value_name = "USER", default_value = "root")]
    owner: String,

    /// Group applied to created directories and rule files
    #[arg(short, long, value_name = "GROUP", default_value = "root")]
    group: String,

    /// Octal mode applied to rule files
    #[arg(short, long, value_name = "MODE", default_value = "0644")]
    mode: String,

    /// Logical name embedded in every rule file name
    #[arg(short, long, value_name = "NAME")]
    name: String,

    /// Report what would change without touching the tree
    #[arg(short, long, action = clap::ArgAction::SetTrue)]
    check: bool,
}

mod ruletree;

fn start(args: Args) -> Result<bool> {
    let mode = parse_mode(&args.mode)
        .ok_or_else(|| anyhow!("invalid mode '{}', expected octal bits like 0644", args.mode))?;

    let rules = RuleSet::load(&args.rules)?;

    let opts = SyncOptions {
        dest: args.dest,
        owner: args.owner,
        group: args.group,
        mode,
        name: args.name,
        check: args.check,
    };

    let changed = synchronize(&rules, &opts, &UnixMetadata)?;

    Ok(changed)
}

fn main() -> ExitCode {
    let the_env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into());

    // Logs go to stderr; stdout carries the JSON report for the caller
    let f = fmt::layer()
        .with_level(true)
        .with_target(true)
        .with_writer(std::io::stderr);

    tracing_subscriber::registry()
        .with(the_env_filter)
        .with(f)
        .init();

    let args = Args::parse();

    match start(args) {
        Ok(changed) => {
            println!("{}", Report::changed(changed).to_json());
            ExitCode::SUCCESS
        }
        Err(e) => {
            let msg = format!("{:#}", e);
            error!("{}", &msg);
            println!("{}", Report::failed(msg).to_json());
            ExitCode::FAILURE
        }
    }
}
