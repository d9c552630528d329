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

//! Streaming decoders for the Sandesh XML listings.
//!
//! Sandesh wraps each list in several envelope elements and annotates most
//! elements with `type`/`identifier` attributes. The decoders ignore the
//! document root and all attributes, locate the repeated record element by
//! its path below the root, and collect the text of the record's descendants.
//! Decoding stops at the first error; records completed before it are kept.

use super::Fetched;
use crate::error::{CheckError, Result};
use crate::flow::FlowRecord;
use crate::nexthop::NextHopEntry;
use quick_xml::events::Event;
use quick_xml::Reader;
use std::str::FromStr;

/// A record decoded from one repeated element of an introspection listing.
pub trait XmlRecord: Default {
    /// Element names from the root's child down to the record element.
    const PATH: &'static [&'static str];

    /// Stores `text` found at `field`, a path relative to the record element.
    /// Unknown fields are ignored.
    fn assign(&mut self, field: &[&str], text: &str) -> Result<()>;
}

impl XmlRecord for NextHopEntry {
    const PATH: &'static [&'static str] = &["KNHResp", "nh_list", "list", "KNHInfo"];

    fn assign(&mut self, field: &[&str], text: &str) -> Result<()> {
        match field {
            ["id"] => self.id = parse_field("id", text)?,
            ["type"] => self.nh_type = text.to_string(),
            ["vrf"] => self.vrf = parse_field("vrf", text)?,
            ["flags"] => self.flags = text.to_string(),
            ["encap_family"] => self.encap_family = text.to_string(),
            ["encap_oif_id"] => self.encap_oif_id = text.to_string(),
            _ => {}
        }
        Ok(())
    }
}

impl XmlRecord for FlowRecord {
    const PATH: &'static [&'static str] = &["records_list", "list", "FlowStatsRecord"];

    fn assign(&mut self, field: &[&str], text: &str) -> Result<()> {
        let key = &mut self.key;
        match field {
            ["info", "SandeshFlowExportInfo", "key", "SandeshFlowKey", name] => match *name {
                "nh" => key.next_hop_id = parse_field("nh", text)?,
                "sip" => key.source_ip = text.to_string(),
                "dip" => key.dest_ip = text.to_string(),
                "src_port" => key.source_port = parse_field("src_port", text)?,
                "dst_port" => key.dest_port = parse_field("dst_port", text)?,
                "protocol" => key.protocol = parse_field("protocol", text)?,
                _ => {}
            },
            ["info", "SandeshFlowExportInfo", "egress_uuid"] => {
                self.egress_uuid = text.to_string()
            }
            _ => {}
        }
        Ok(())
    }
}

pub fn decode_nexthops(body: &[u8]) -> Fetched<NextHopEntry> {
    decode(body)
}

pub fn decode_flows(body: &[u8]) -> Fetched<FlowRecord> {
    decode(body)
}

pub fn decode<T: XmlRecord>(body: &[u8]) -> Fetched<T> {
    let mut records = Vec::new();
    match walk(body, &mut records) {
        Ok(()) => Fetched::complete(records),
        Err(e) => Fetched::degraded(records, e),
    }
}

fn walk<T: XmlRecord>(body: &[u8], records: &mut Vec<T>) -> Result<()> {
    // No trim_text: string fields keep their whitespace, numbers are trimmed in parse_field
    let mut reader = Reader::from_reader(body);

    let mut path: Vec<String> = Vec::new();
    // Text of each open element, joined across comments and CDATA sections
    let mut texts: Vec<String> = Vec::new();
    let mut current: Option<T> = None;

    loop {
        match reader.read_event()? {
            Event::Start(e) => {
                path.push(element_name(e.local_name().as_ref()));
                texts.push(String::new());
                if current.is_none() && is_record_path::<T>(&path) {
                    current = Some(T::default());
                }
            }
            Event::Empty(e) => {
                // <KNHInfo/> is a record with every field defaulted
                if current.is_none() {
                    path.push(element_name(e.local_name().as_ref()));
                    if is_record_path::<T>(&path) {
                        records.push(T::default());
                    }
                    path.pop();
                }
            }
            Event::Text(t) => {
                if current.is_some() {
                    if let Some(text) = texts.last_mut() {
                        text.push_str(&t.unescape()?);
                    }
                }
            }
            Event::CData(c) => {
                if current.is_some() {
                    if let Some(text) = texts.last_mut() {
                        text.push_str(&String::from_utf8_lossy(&c));
                    }
                }
            }
            Event::End(_) => {
                let text = texts.pop().unwrap_or_default();
                if let Some(record) = current.as_mut() {
                    assign_at(record, &path, &text)?;
                }
                if is_record_path::<T>(&path) {
                    if let Some(record) = current.take() {
                        records.push(record);
                    }
                }
                path.pop();
            }
            Event::Eof => break,
            _ => {}
        }
    }

    match path.pop() {
        Some(open) => Err(CheckError::Truncated(open)),
        None => Ok(()),
    }
}

fn element_name(raw: &[u8]) -> String {
    String::from_utf8_lossy(raw).into_owned()
}

/// `path` starts at the document root, which is not part of `T::PATH`.
fn is_record_path<T: XmlRecord>(path: &[String]) -> bool {
    path.len() == T::PATH.len() + 1 && path[1..].iter().zip(T::PATH).all(|(a, b)| a == b)
}

fn assign_at<T: XmlRecord>(record: &mut T, path: &[String], text: &str) -> Result<()> {
    let depth = T::PATH.len() + 1;
    if path.len() <= depth {
        return Ok(());
    }
    let field: Vec<&str> = path[depth..].iter().map(String::as_str).collect();
    record.assign(&field, text)
}

fn parse_field<N: FromStr>(field: &'static str, text: &str) -> Result<N> {
    text.trim().parse().map_err(|_| CheckError::Field {
        field,
        value: text.to_string(),
    })
}
