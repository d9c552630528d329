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

//! Consistency checking between a vRouter agent's flow table and its
//! next-hop table, read over the agent's introspection interface.

pub mod checker;
pub mod config;
pub mod error;
pub mod flow;
pub mod introspect;
pub mod log;
pub mod nexthop;
pub mod report;
pub mod verify;
