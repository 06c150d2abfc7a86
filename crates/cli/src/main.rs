// Copyright 2025 Benchscope Contributors
// SPDX-License-Identifier: Apache-2.0

//! benchscope CLI entry point.

use benchscope_cli::Cli;
use clap::Parser;

fn main() {
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(e) => {
            // Usage errors exit 1; help and version exit 0.
            let code = if e.use_stderr() { 1 } else { 0 };
            let _ = e.print();
            std::process::exit(code);
        }
    };

    benchscope_cli::init_tracing(cli.verbose);
    if let Err(e) = benchscope_cli::run(cli) {
        eprintln!("Error: {:#}", e);
        std::process::exit(benchscope_cli::exit_code(&e));
    }
}
