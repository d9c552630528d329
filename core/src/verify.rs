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

use crate::flow::FlowRecord;
use crate::nexthop::{NextHopEntry, NextHopTable};
use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Classification {
    Resolved,
    Dangling,
}

/// Result of looking up one flow's next-hop.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome<'a> {
    Resolved(&'a NextHopEntry),
    Dangling,
}

impl Outcome<'_> {
    pub fn classification(&self) -> Classification {
        match self {
            Outcome::Resolved(_) => Classification::Resolved,
            Outcome::Dangling => Classification::Dangling,
        }
    }
}

#[derive(Debug, Clone, Copy)]
pub struct Verdict<'a> {
    pub flow: &'a FlowRecord,
    pub outcome: Outcome<'a>,
}

pub fn classify<'a>(flow: &FlowRecord, table: &'a NextHopTable) -> Outcome<'a> {
    match table.lookup(flow.next_hop_id()) {
        Some(entry) => Outcome::Resolved(entry),
        None => Outcome::Dangling,
    }
}

/// Classifies every flow in input order.
///
/// Each flow is looked up on its own, even when an earlier flow already
/// confirmed the same next-hop.
pub fn verify<'a>(
    flows: &'a [FlowRecord],
    table: &'a NextHopTable,
) -> impl Iterator<Item = Verdict<'a>> + 'a {
    flows.iter().map(move |flow| Verdict {
        flow,
        outcome: classify(flow, table),
    })
}

/// Counts of verdicts produced by one run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct VerifySummary {
    pub total: usize,
    pub resolved: usize,
    pub dangling: usize,
}

impl VerifySummary {
    pub fn record(&mut self, classification: Classification) {
        self.total += 1;
        match classification {
            Classification::Resolved => self.resolved += 1,
            Classification::Dangling => self.dangling += 1,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_helpers::{create_test_flow, create_test_nexthop};

    fn table_of(ids: &[u32]) -> NextHopTable {
        NextHopTable::build(ids.iter().map(|id| create_test_nexthop(*id)).collect())
    }

    fn classifications(flows: &[FlowRecord], table: &NextHopTable) -> Vec<Classification> {
        verify(flows, table)
            .map(|verdict| verdict.outcome.classification())
            .collect()
    }

    #[test]
    fn test_resolved_and_dangling() {
        let table = table_of(&[5, 7]);
        let flows = vec![create_test_flow(5), create_test_flow(9)];

        let verdicts: Vec<Verdict> = verify(&flows, &table).collect();
        assert_eq!(verdicts.len(), 2);
        assert_eq!(verdicts[0].outcome, Outcome::Resolved(&create_test_nexthop(5)));
        assert_eq!(verdicts[1].outcome, Outcome::Dangling);
        assert_eq!(verdicts[1].flow.next_hop_id(), 9);
    }

    #[test]
    fn test_empty_table_all_dangling() {
        let table = table_of(&[]);
        let flows: Vec<FlowRecord> = (0..5).map(create_test_flow).collect();

        assert!(classifications(&flows, &table)
            .iter()
            .all(|c| *c == Classification::Dangling));
    }

    #[test]
    fn test_duplicate_next_hop_ids_resolve() {
        let table = table_of(&[1, 1]);
        let flows = vec![create_test_flow(1)];
        assert_eq!(
            classifications(&flows, &table),
            vec![Classification::Resolved]
        );
    }

    #[test]
    fn test_verify_is_repeatable() {
        let table = table_of(&[3, 4]);
        let flows = vec![create_test_flow(3), create_test_flow(8), create_test_flow(4)];

        assert_eq!(
            classifications(&flows, &table),
            classifications(&flows, &table)
        );
        for flow in &flows {
            assert_eq!(classify(flow, &table), classify(flow, &table));
        }
    }

    #[test]
    fn test_listing_order_does_not_matter() {
        let flows: Vec<FlowRecord> = (0..10).map(create_test_flow).collect();
        let forward = table_of(&[1, 2, 3, 5, 8]);
        let reversed = table_of(&[8, 5, 3, 2, 1]);
        let shuffled = table_of(&[3, 8, 1, 5, 2, 3]);

        let expected = classifications(&flows, &forward);
        assert_eq!(classifications(&flows, &reversed), expected);
        assert_eq!(classifications(&flows, &shuffled), expected);
    }

    #[test]
    fn test_every_flow_checked_independently() {
        let table = table_of(&[2]);
        let flows = vec![create_test_flow(2), create_test_flow(2), create_test_flow(2)];

        let mut summary = VerifySummary::default();
        for verdict in verify(&flows, &table) {
            summary.record(verdict.outcome.classification());
        }
        assert_eq!(
            summary,
            VerifySummary {
                total: 3,
                resolved: 3,
                dangling: 0
            }
        );
    }

    #[test]
    fn test_summary_counts() {
        let table = table_of(&[1]);
        let flows = vec![create_test_flow(1), create_test_flow(2), create_test_flow(3)];

        let mut summary = VerifySummary::default();
        for verdict in verify(&flows, &table) {
            summary.record(verdict.outcome.classification());
        }
        assert_eq!(summary.total, 3);
        assert_eq!(summary.resolved, 1);
        assert_eq!(summary.dangling, 2);
        assert_eq!(summary.total, summary.resolved + summary.dangling);
    }
}
