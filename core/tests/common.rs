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

//! Common test utilities: a canned introspection HTTP server and XML builders

#![allow(dead_code)]

use nhcheck::config::Config;
use nhcheck::log::{LogLevel, Logger};
use nhcheck::report::{Event, Reporter};
use std::collections::HashMap;
use std::sync::Arc;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpListener;

pub const NEXTHOP_PATH: &str = "/Snh_KNHReq?nh_id=";
pub const FLOW_PATH: &str = "/Snh_FlowStatsRecordsReq";

/// Response served for one request path
#[derive(Clone)]
pub struct Canned {
    pub status: u16,
    pub body: String,
}

impl Canned {
    pub fn ok(body: impl Into<String>) -> Self {
        Canned {
            status: 200,
            body: body.into(),
        }
    }

    pub fn status(status: u16) -> Self {
        Canned {
            status,
            body: String::new(),
        }
    }
}

/// Introspection server bound to an OS-allocated port. Unknown paths get 404.
pub struct MockAgent {
    pub port: u16,
}

impl MockAgent {
    pub async fn start(routes: Vec<(&str, Canned)>) -> Self {
        let routes: Arc<HashMap<String, Canned>> = Arc::new(
            routes
                .into_iter()
                .map(|(path, canned)| (path.to_string(), canned))
                .collect(),
        );
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let port = listener.local_addr().unwrap().port();

        tokio::spawn(async move {
            loop {
                let Ok((mut stream, _)) = listener.accept().await else {
                    return;
                };
                let routes = routes.clone();
                tokio::spawn(async move {
                    let Some(path) = read_request_path(&mut stream).await else {
                        return;
                    };
                    let canned = routes
                        .get(&path)
                        .cloned()
                        .unwrap_or_else(|| Canned::status(404));
                    let response = format!(
                        "HTTP/1.1 {} Canned\r\nContent-Type: text/xml\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
                        canned.status,
                        canned.body.len(),
                        canned.body
                    );
                    let _ = stream.write_all(response.as_bytes()).await;
                    let _ = stream.shutdown().await;
                });
            }
        });

        MockAgent { port }
    }

    pub fn config(&self) -> Config {
        Config {
            port: self.port,
            ..Config::default()
        }
    }
}

async fn read_request_path(stream: &mut tokio::net::TcpStream) -> Option<String> {
    let mut request = Vec::new();
    let mut buf = [0u8; 1024];
    while !request.windows(4).any(|w| w == b"\r\n\r\n") {
        let n = stream.read(&mut buf).await.ok()?;
        if n == 0 {
            return None;
        }
        request.extend_from_slice(&buf[..n]);
    }
    let request = String::from_utf8_lossy(&request);
    let request_line = request.lines().next()?;
    request_line.split_whitespace().nth(1).map(str::to_string)
}

/// Port with nothing listening on it
pub async fn closed_port() -> u16 {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    listener.local_addr().unwrap().port()
}

pub fn collecting_reporter(verbosity: u8) -> Reporter<Vec<Event>> {
    Reporter::new(Logger::new(LogLevel::from_verbosity(verbosity)), Vec::new())
}

/// Next-hop listing in Sandesh layout, one `KNHResp` per group of ids
pub fn nexthop_xml(groups: &[&[u32]]) -> String {
    let mut xml = String::from("<?xml-stylesheet type=\"text/xsl\" href=\"/universal_parse.xsl\"?>\n<__KNHResp_list type=\"slist\">\n");
    for ids in groups {
        xml.push_str(&format!(
            "<KNHResp type=\"sandesh\"><nh_list type=\"list\" identifier=\"1\"><list type=\"struct\" size=\"{}\">\n",
            ids.len()
        ));
        for id in ids.iter() {
            xml.push_str(&format!(
                "<KNHInfo><id type=\"i32\" identifier=\"1\">{}</id><type type=\"string\" identifier=\"2\">ENCAP</type><vrf type=\"i32\" identifier=\"6\">1</vrf><flags type=\"string\" identifier=\"5\">VALID</flags><encap_family type=\"string\" identifier=\"8\">IPV4</encap_family><encap_oif_id type=\"string\" identifier=\"9\">3</encap_oif_id></KNHInfo>\n",
                id
            ));
        }
        xml.push_str("</list></nh_list><more type=\"bool\" identifier=\"0\">false</more></KNHResp>\n");
    }
    xml.push_str("</__KNHResp_list>\n");
    xml
}

/// Flow statistics listing in Sandesh layout, one record per next-hop id
pub fn flow_xml(nexthop_ids: &[u32]) -> String {
    let mut xml = String::from("<?xml-stylesheet type=\"text/xsl\" href=\"/universal_parse.xsl\"?>\n<FlowStatsRecordsResp type=\"sandesh\"><records_list type=\"list\" identifier=\"1\">");
    xml.push_str(&format!(
        "<list type=\"struct\" size=\"{}\">\n",
        nexthop_ids.len()
    ));
    for (i, nh) in nexthop_ids.iter().enumerate() {
        xml.push_str(&format!(
            "<FlowStatsRecord><info type=\"struct\" identifier=\"2\"><SandeshFlowExportInfo><key type=\"struct\" identifier=\"1\"><SandeshFlowKey><nh type=\"u32\" identifier=\"2\">{nh}</nh><sip type=\"string\" identifier=\"3\">10.0.0.{i}</sip><dip type=\"string\" identifier=\"4\">10.0.1.{i}</dip><src_port type=\"u32\" identifier=\"5\">{port}</src_port><dst_port type=\"u32\" identifier=\"6\">53</dst_port><protocol type=\"u16\" identifier=\"7\">17</protocol></SandeshFlowKey></key><egress_uuid type=\"string\" identifier=\"3\">uuid-{i}</egress_uuid></SandeshFlowExportInfo></info></FlowStatsRecord>\n",
            nh = nh,
            i = i,
            port = 30000 + i,
        ));
    }
    xml.push_str("</list></records_list></FlowStatsRecordsResp>\n");
    xml
}
