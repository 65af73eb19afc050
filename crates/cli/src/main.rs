// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Casesync CLI entry point.

use clap::Parser;
use tracing_subscriber::{EnvFilter, fmt};

use casesync::cli::{Cli, log_filter_directive};
use casesync::error::ExitCode;

mod cmd_sync;

/// `CASESYNC_LOG` wins over `--log-level`.
fn init_logging(level: &str) {
    let filter = EnvFilter::try_from_env("CASESYNC_LOG")
        .unwrap_or_else(|_| EnvFilter::new(log_filter_directive(level)));

    fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn main() {
    let cli = Cli::parse();
    init_logging(&cli.log_level);

    let exit_code = match cmd_sync::run(&cli) {
        Ok(code) => code,
        Err(e) => {
            eprintln!("casesync: {}", e);
            match e.downcast_ref::<casesync::Error>() {
                Some(err) => ExitCode::from(err),
                None => ExitCode::InternalError,
            }
        }
    };

    std::process::exit(exit_code as i32);
}
