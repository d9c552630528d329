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

use serde::Serialize;

/// Flow identity as exported by the agent, including the next-hop the flow
/// is forwarded through.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct FlowKey {
    pub next_hop_id: u32,
    pub source_ip: String,
    pub dest_ip: String,
    pub source_port: u32,
    pub dest_port: u32,
    pub protocol: u16,
}

/// A tracked flow. Addresses are kept as delivered, without parsing.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct FlowRecord {
    pub key: FlowKey,
    pub egress_uuid: String,
}

impl FlowRecord {
    pub fn next_hop_id(&self) -> u32 {
        self.key.next_hop_id
    }
}
