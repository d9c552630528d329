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

use crate::error::{CheckError, Result};

/// Next-hop listing; an empty `nh_id` selects every next-hop.
pub const NEXTHOP_PATH: &str = "/Snh_KNHReq?nh_id=";
/// Flow statistics listing.
pub const FLOW_PATH: &str = "/Snh_FlowStatsRecordsReq";

/// Thin wrapper around an HTTP client bound to one agent's introspection port.
///
/// Requests use the client's default settings: no retries, no timeout.
pub struct IntrospectClient {
    inner: reqwest::Client,
    base_url: String,
}

impl IntrospectClient {
    pub fn new(host: &str, port: u16) -> Result<Self> {
        let inner = reqwest::Client::builder()
            .build()
            .map_err(CheckError::Client)?;
        Ok(Self {
            inner,
            base_url: base_url(host, port),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn nexthops_url(&self) -> String {
        format!("{}{}", self.base_url, NEXTHOP_PATH)
    }

    pub fn flows_url(&self) -> String {
        format!("{}{}", self.base_url, FLOW_PATH)
    }

    /// Raw XML of the full next-hop listing.
    pub async fn fetch_nexthops(&self) -> Result<Vec<u8>> {
        self.get(self.nexthops_url()).await
    }

    /// Raw XML of the flow statistics listing.
    pub async fn fetch_flows(&self) -> Result<Vec<u8>> {
        self.get(self.flows_url()).await
    }

    async fn get(&self, url: String) -> Result<Vec<u8>> {
        let resp = match self.inner.get(&url).send().await {
            Ok(resp) => resp,
            Err(source) => return Err(CheckError::Request { url, source }),
        };

        // Only 200 carries a listing; 204 and friends would decode as an empty table
        let status = resp.status();
        if status != reqwest::StatusCode::OK {
            return Err(CheckError::Status {
                url,
                status: status.as_u16(),
            });
        }

        match resp.bytes().await {
            Ok(body) => Ok(body.to_vec()),
            Err(source) => Err(CheckError::Request { url, source }),
        }
    }
}

fn base_url(host: &str, port: u16) -> String {
    // IPv6 literals need brackets inside a URL authority
    if host.contains(':') && !host.starts_with('[') {
        format!("http://[{}]:{}", host, port)
    } else {
        format!("http://{}:{}", host, port)
    }
}
