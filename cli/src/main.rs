// Copyright 2025 nhcheck Authors
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

use clap::Parser;
use nhcheck::checker::Checker;
use nhcheck::config::{Config, FailOn};
use nhcheck::error::CheckError;
use nhcheck::log::Logger;
use nhcheck::report::{JsonLineSink, Reporter};
use std::process::exit;

/// Exit status for unusable settings, matching clap's usage errors
const EXIT_SETUP: i32 = 2;

#[derive(Parser)]
#[command(name = "nexthop-checker")]
#[command(
    about = "Loads all next-hops and flows from vRouter introspection and checks that every flow's next-hop exists",
    version
)]
#[command(after_help = "Verbose levels:\n  Error     --v 0\n  Warning   --v 1 (default)\n  Info      --v 2\n  Debug     --v 3")]
struct Cli {
    /// vRouter IP address [default: 127.0.0.1]
    #[arg(long)]
    host: Option<String>,

    /// vRouter introspection port [default: 8085]
    #[arg(long)]
    port: Option<u16>,

    /// Show progress bar
    #[arg(long)]
    progress: bool,

    /// Verbose level, 0-3 [default: 1]
    #[arg(long = "v", value_name = "LEVEL")]
    verbosity: Option<u8>,

    /// Path to YAML configuration file
    #[arg(short, long)]
    config: Option<String>,

    /// Exit non-zero on: never, dangling, incomplete, any [default: never]
    #[arg(long, value_name = "POLICY")]
    fail_on: Option<FailOn>,
}

impl Cli {
    /// Flags given on the command line override the config file, which
    /// overrides built-in defaults.
    fn into_config(self) -> Result<Config, CheckError> {
        let mut config = match &self.config {
            Some(path) => Config::from_file(path)?,
            None => Config::default(),
        };
        if let Some(host) = self.host {
            config.host = host;
        }
        if let Some(port) = self.port {
            config.port = port;
        }
        if self.progress {
            config.progress = true;
        }
        if let Some(verbosity) = self.verbosity {
            config.verbosity = verbosity;
        }
        if let Some(fail_on) = self.fail_on {
            config.fail_on = fail_on;
        }
        Ok(config)
    }
}

#[tokio::main(flavor = "current_thread")]
async fn main() {
    let cli = Cli::parse();

    match run(cli).await {
        Ok(code) => exit(code),
        Err(err) => {
            eprintln!("nexthop-checker error: {}", err);
            exit(EXIT_SETUP);
        }
    }
}

async fn run(cli: Cli) -> Result<i32, CheckError> {
    let config = cli.into_config()?;
    let checker = Checker::new(config.clone())?;
    let mut reporter =
        Reporter::new(Logger::new(config.log_level()), JsonLineSink).with_progress(config.progress);

    let report = checker.run(&mut reporter).await;
    Ok(report.exit_code(config.fail_on))
}
