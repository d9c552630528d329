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

//! Structured run events and their presentation.
//!
//! Checking code only describes what happened as an [`Event`] with a kind and
//! a severity. The [`Reporter`] decides from the configured verbosity whether
//! an event is shown, writes it through an [`EventSink`] and keeps the
//! optional progress bar out of the way of log lines.

use crate::log::{render, LogLevel, Logger};
use crate::verify::{Outcome, Verdict};
use indicatif::ProgressBar;
use serde::Serialize;
use serde_json::{Map, Value};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum EventKind {
    CheckStarted,
    FetchFailed,
    DecodeFailed,
    NextHopLoaded,
    DuplicateNextHop,
    FlowResolved,
    NextHopDetail,
    FlowDangling,
    CheckFinished,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Event {
    pub kind: EventKind,
    pub level: LogLevel,
    pub message: String,
    pub fields: Map<String, Value>,
}

impl Event {
    pub fn new(level: LogLevel, kind: EventKind, message: impl Into<String>) -> Self {
        Event {
            kind,
            level,
            message: message.into(),
            fields: Map::new(),
        }
    }

    /// `fields` is expected to be a JSON object; anything else is dropped.
    pub fn with_fields(
        level: LogLevel,
        kind: EventKind,
        message: impl Into<String>,
        fields: Value,
    ) -> Self {
        let mut event = Event::new(level, kind, message);
        if let Value::Object(map) = fields {
            event.fields = map;
        }
        event
    }

    pub fn to_json(&self) -> Value {
        let mut fields = self.fields.clone();
        fields.insert("kind".to_string(), serde_json::json!(self.kind));
        render(self.level, &self.message, &fields)
    }
}

macro_rules! event {
    ($level:ident, $kind:ident, $msg:expr) => {
        $crate::report::Event::new(
            $crate::log::LogLevel::$level,
            $crate::report::EventKind::$kind,
            $msg,
        )
    };
    ($level:ident, $kind:ident, $msg:expr, $($key:tt => $val:expr),+ $(,)?) => {
        $crate::report::Event::with_fields(
            $crate::log::LogLevel::$level,
            $crate::report::EventKind::$kind,
            $msg,
            serde_json::json!({
                $(
                    $key: $val
                ),+
            }),
        )
    };
}

pub(crate) use event;

/// Destination for events that passed the verbosity filter.
pub trait EventSink {
    fn write(&mut self, event: &Event);
}

/// One JSON object per line. Errors go to stderr, everything else to stdout.
#[derive(Debug, Default)]
pub struct JsonLineSink;

impl EventSink for JsonLineSink {
    fn write(&mut self, event: &Event) {
        let line = event.to_json();
        if event.level == LogLevel::Error {
            eprintln!("{}", line);
        } else {
            println!("{}", line);
        }
    }
}

/// Collects events in memory.
impl EventSink for Vec<Event> {
    fn write(&mut self, event: &Event) {
        self.push(event.clone());
    }
}

/// Events describing one flow verdict.
///
/// A resolved flow yields its key at info level and the matched next-hop at
/// debug level; a dangling flow yields its key at warning level.
pub fn verdict_events(verdict: &Verdict) -> Vec<Event> {
    let key = &verdict.flow.key;
    match verdict.outcome {
        Outcome::Resolved(nexthop) => vec![
            event!(Info, FlowResolved, "NextHop exists for flow", "flow" => key),
            event!(Debug, NextHopDetail, "NextHop", "nexthop" => nexthop),
        ],
        Outcome::Dangling => vec![event!(
            Warn,
            FlowDangling,
            "NextHop doesn't exist for flow",
            "flow" => key,
            "egress_uuid" => &verdict.flow.egress_uuid,
        )],
    }
}

pub struct Reporter<S: EventSink> {
    logger: Logger,
    sink: S,
    progress: bool,
    bar: Option<ProgressBar>,
}

impl<S: EventSink> Reporter<S> {
    pub fn new(logger: Logger, sink: S) -> Self {
        Reporter {
            logger,
            sink,
            progress: false,
            bar: None,
        }
    }

    /// Enables the per-flow progress bar.
    pub fn with_progress(mut self, enabled: bool) -> Self {
        self.progress = enabled;
        self
    }

    pub fn emit(&mut self, event: Event) {
        if !self.logger.should_log(event.level) {
            return;
        }
        match &self.bar {
            Some(bar) => {
                let sink = &mut self.sink;
                bar.suspend(|| sink.write(&event));
            }
            None => self.sink.write(&event),
        }
    }

    pub fn verdict(&mut self, verdict: &Verdict) {
        for event in verdict_events(verdict) {
            self.emit(event);
        }
    }

    pub fn start_progress(&mut self, total: usize) {
        if self.progress {
            self.bar = Some(ProgressBar::new(total as u64));
        }
    }

    pub fn advance(&mut self) {
        if let Some(bar) = &self.bar {
            bar.inc(1);
        }
    }

    pub fn finish_progress(&mut self) {
        if let Some(bar) = self.bar.take() {
            bar.finish();
        }
    }

    /// Position of the progress bar, if one is running.
    pub fn progress_position(&self) -> Option<u64> {
        self.bar.as_ref().map(|bar| bar.position())
    }

    pub fn sink(&self) -> &S {
        &self.sink
    }

    pub fn into_sink(self) -> S {
        self.sink
    }
}
