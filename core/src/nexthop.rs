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
use std::collections::BTreeMap;

/// One forwarding next-hop as listed by the vRouter agent.
///
/// Only `id` takes part in verification; the remaining fields are carried
/// for diagnostic output.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct NextHopEntry {
    pub id: u32,
    #[serde(rename = "type")]
    pub nh_type: String,
    pub vrf: i32,
    pub flags: String,
    pub encap_family: String,
    pub encap_oif_id: String,
}

/// Next-hop table for a single check run.
///
/// Built once from the decoded listing and only read afterwards. Identifiers
/// are not required to be unique: lookups return the first entry in listing
/// order.
#[derive(Debug, Clone, Default)]
pub struct NextHopTable {
    entries: Vec<NextHopEntry>,
}

impl NextHopTable {
    pub fn build(entries: Vec<NextHopEntry>) -> Self {
        NextHopTable { entries }
    }

    /// Linear scan, first match wins.
    pub fn lookup(&self, id: u32) -> Option<&NextHopEntry> {
        self.entries.iter().find(|entry| entry.id == id)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &NextHopEntry> {
        self.entries.iter()
    }

    /// Identifiers listed more than once, in ascending order.
    pub fn duplicate_ids(&self) -> Vec<u32> {
        let mut counts: BTreeMap<u32, usize> = BTreeMap::new();
        for entry in &self.entries {
            *counts.entry(entry.id).or_default() += 1;
        }
        counts
            .into_iter()
            .filter(|(_, count)| *count > 1)
            .map(|(id, _)| id)
            .collect()
    }
}
