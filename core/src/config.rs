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

use crate::error::Result;
use crate::log::LogLevel;
use serde::{Deserialize, Serialize};
use std::fs;
use std::str::FromStr;

/// When a finished run should exit non-zero.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum FailOn {
    /// Always exit 0, whatever was found
    Never,
    /// Exit non-zero when at least one flow is dangling
    Dangling,
    /// Exit non-zero when either listing could not be fully fetched and decoded
    Incomplete,
    /// Both of the above
    Any,
}

impl FromStr for FailOn {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "never" => Ok(FailOn::Never),
            "dangling" => Ok(FailOn::Dangling),
            "incomplete" => Ok(FailOn::Incomplete),
            "any" => Ok(FailOn::Any),
            _ => Err(format!(
                "invalid fail-on policy: {} (expected never, dangling, incomplete or any)",
                s
            )),
        }
    }
}

/// Checker settings, optionally loaded from a YAML file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    /// vRouter introspection host
    #[serde(default = "default_host")]
    pub host: String,
    /// vRouter introspection port
    #[serde(default = "default_port")]
    pub port: u16,
    #[serde(default)]
    pub progress: bool,
    /// 0=error, 1=warning, 2=info, 3=debug
    #[serde(default = "default_verbosity")]
    pub verbosity: u8,
    #[serde(default = "default_fail_on", rename = "fail-on", alias = "fail_on")]
    pub fail_on: FailOn,
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    8085
}

fn default_verbosity() -> u8 {
    1
}

fn default_fail_on() -> FailOn {
    FailOn::Never
}

impl Config {
    pub fn from_file(path: &str) -> Result<Self> {
        let contents = fs::read_to_string(path)?;
        Ok(serde_yaml::from_str(&contents)?)
    }

    pub fn log_level(&self) -> LogLevel {
        LogLevel::from_verbosity(self.verbosity)
    }
}

impl Default for Config {
    fn default() -> Self {
        Config {
            host: default_host(),
            port: default_port(),
            progress: false,
            verbosity: default_verbosity(),
            fail_on: default_fail_on(),
        }
    }
}
