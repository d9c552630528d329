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

//! Access to the vRouter agent's introspection (Sandesh) HTTP interface.

pub mod client;
pub mod xml;

pub use client::IntrospectClient;
pub use xml::{decode_flows, decode_nexthops};

use crate::error::CheckError;
use serde::Serialize;

/// How much of a data set made it through fetch and decode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Completeness {
    /// Fetched and decoded without error. May still hold zero records.
    Complete,
    /// Decoding failed after at least one record was produced.
    Partial,
    /// The fetch failed, or decoding failed before the first record.
    Empty,
}

/// Records obtained from one endpoint, together with the failure that cut
/// them short, if any.
#[derive(Debug)]
pub struct Fetched<T> {
    pub records: Vec<T>,
    pub completeness: Completeness,
    pub error: Option<CheckError>,
}

impl<T> Fetched<T> {
    pub fn complete(records: Vec<T>) -> Self {
        Fetched {
            records,
            completeness: Completeness::Complete,
            error: None,
        }
    }

    /// Keeps `records` decoded before `error` occurred.
    pub fn degraded(records: Vec<T>, error: CheckError) -> Self {
        let completeness = if records.is_empty() {
            Completeness::Empty
        } else {
            Completeness::Partial
        };
        Fetched {
            records,
            completeness,
            error: Some(error),
        }
    }

    pub fn empty(error: CheckError) -> Self {
        Fetched::degraded(Vec::new(), error)
    }

    pub fn is_complete(&self) -> bool {
        self.completeness == Completeness::Complete
    }
}
