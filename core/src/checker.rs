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

use crate::config::{Config, FailOn};
use crate::error::{CheckError, Result};
use crate::flow::FlowRecord;
use crate::introspect::{
    decode_flows, decode_nexthops, Completeness, Fetched, IntrospectClient,
};
use crate::nexthop::{NextHopEntry, NextHopTable};
use crate::report::{event, EventSink, Reporter};
use crate::verify::{verify, VerifySummary};
use serde::Serialize;

/// Exit status when dangling flows were found under `FailOn::Dangling`/`Any`.
pub const EXIT_DANGLING: i32 = 1;
/// Exit status when a listing was incomplete under `FailOn::Incomplete`/`Any`.
pub const EXIT_INCOMPLETE: i32 = 3;

/// What one listing contributed to the run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct DataStatus {
    pub completeness: Completeness,
    pub records: usize,
}

impl DataStatus {
    fn of<T>(fetched: &Fetched<T>) -> Self {
        DataStatus {
            completeness: fetched.completeness,
            records: fetched.records.len(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct RunReport {
    pub nexthops: DataStatus,
    pub flows: DataStatus,
    pub summary: VerifySummary,
}

impl RunReport {
    /// Both listings were fetched and decoded without error.
    pub fn is_complete(&self) -> bool {
        self.nexthops.completeness == Completeness::Complete
            && self.flows.completeness == Completeness::Complete
    }

    pub fn exit_code(&self, fail_on: FailOn) -> i32 {
        let check_incomplete = matches!(fail_on, FailOn::Incomplete | FailOn::Any);
        let check_dangling = matches!(fail_on, FailOn::Dangling | FailOn::Any);

        if check_incomplete && !self.is_complete() {
            EXIT_INCOMPLETE
        } else if check_dangling && self.summary.dangling > 0 {
            EXIT_DANGLING
        } else {
            0
        }
    }
}

/// Runs one consistency check against a vRouter agent.
///
/// The next-hop listing is fetched and turned into a table before the flow
/// listing is requested; nothing runs concurrently.
pub struct Checker {
    config: Config,
    client: IntrospectClient,
}

impl Checker {
    pub fn new(config: Config) -> Result<Self> {
        let client = IntrospectClient::new(&config.host, config.port)?;
        Ok(Checker { config, client })
    }

    pub async fn run<S: EventSink>(&self, reporter: &mut Reporter<S>) -> RunReport {
        reporter.emit(event!(Info, CheckStarted, "Start checking ...",
            "host" => &self.config.host,
            "port" => self.config.port,
        ));

        let nexthops = self.load_nexthops(reporter).await;
        let nexthop_status = DataStatus::of(&nexthops);
        let table = NextHopTable::build(nexthops.records);
        for entry in table.iter() {
            reporter.emit(event!(Debug, NextHopLoaded, "Loading NH", "nexthop" => entry));
        }
        for id in table.duplicate_ids() {
            reporter.emit(event!(Info, DuplicateNextHop, "NextHop listed more than once",
                "id" => id,
            ));
        }

        let flows = self.load_flows(reporter).await;
        let flow_status = DataStatus::of(&flows);

        let mut summary = VerifySummary::default();
        reporter.start_progress(flows.records.len());
        for verdict in verify(&flows.records, &table) {
            summary.record(verdict.outcome.classification());
            reporter.verdict(&verdict);
            reporter.advance();
        }
        reporter.finish_progress();

        let report = RunReport {
            nexthops: nexthop_status,
            flows: flow_status,
            summary,
        };
        reporter.emit(event!(Info, CheckFinished, "Done",
            "nexthops" => report.nexthops,
            "flows" => report.flows,
            "summary" => report.summary,
        ));
        report
    }

    async fn load_nexthops<S: EventSink>(
        &self,
        reporter: &mut Reporter<S>,
    ) -> Fetched<NextHopEntry> {
        let url = self.client.nexthops_url();
        let body = self.client.fetch_nexthops().await;
        settle(reporter, "nexthops", &url, body, decode_nexthops)
    }

    async fn load_flows<S: EventSink>(&self, reporter: &mut Reporter<S>) -> Fetched<FlowRecord> {
        let url = self.client.flows_url();
        let body = self.client.fetch_flows().await;
        settle(reporter, "flows", &url, body, decode_flows)
    }
}

/// Turns a fetch result into decoded records, logging whatever went wrong.
fn settle<S: EventSink, T>(
    reporter: &mut Reporter<S>,
    source: &str,
    url: &str,
    body: std::result::Result<Vec<u8>, CheckError>,
    decode: fn(&[u8]) -> Fetched<T>,
) -> Fetched<T> {
    let body = match body {
        Ok(body) => body,
        Err(e) => {
            reporter.emit(event!(Error, FetchFailed, "failed to fetch listing",
                "source" => source,
                "url" => url,
                "error" => e.to_string(),
            ));
            return Fetched::empty(e);
        }
    };

    let fetched = decode(&body);
    if let Some(e) = &fetched.error {
        reporter.emit(event!(Error, DecodeFailed, "failed to decode listing",
            "source" => source,
            "url" => url,
            "error" => e.to_string(),
            "records_kept" => fetched.records.len(),
        ));
    }
    fetched
}
