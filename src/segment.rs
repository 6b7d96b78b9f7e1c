use chrono::TimeDelta;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::time::Duration;

use crate::util::delta;

/// Static description of one leg of a route.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct SegmentDef {
    pub id: String,
    pub name: String,
    /// `|` toggles between normal and highlighted text when rendered.
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub stats: BTreeMap<String, serde_json::Value>,
    #[serde(default)]
    pub build: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
    #[serde(default, with = "crate::millis", skip_serializing_if = "Option::is_none")]
    pub pb: Option<Duration>,
    #[serde(
        default,
        alias = "bpt",
        with = "crate::millis",
        skip_serializing_if = "Option::is_none"
    )]
    pub gold: Option<Duration>,
}

impl SegmentDef {
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            ..Default::default()
        }
    }

    /// Stat lines as `label value`, strings rendered without quotes.
    pub fn stat_lines(&self) -> Vec<String> {
        self.stats
            .iter()
            .map(|(label, value)| match value {
                serde_json::Value::String(s) => format!("{label} {s}"),
                other => format!("{label} {other}"),
            })
            .collect()
    }
}

/// Comparison of a segment against its references.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, strum_macros::Display)]
#[strum(serialize_all = "kebab-case")]
pub enum Status {
    /// No reference to compare against, or not reached yet.
    #[default]
    Normal,
    /// Finished faster than the segment has ever been done.
    Gold,
    AheadGain,
    AheadLoss,
    BehindGain,
    BehindLoss,
}

/// Timing state of one segment during an attempt.
#[derive(Debug, Clone, PartialEq)]
pub struct SegmentState {
    pub id: String,
    pub pb: Option<Duration>,
    pub gold: Option<Duration>,
    /// Sum of the `pb` of every earlier segment.
    pub pb_start: Duration,
    pub progress: Option<Duration>,
    pub progress_start: Option<Duration>,
    status: Status,
}

impl SegmentState {
    pub fn new(id: impl Into<String>, pb: Option<Duration>, gold: Option<Duration>) -> Self {
        Self {
            id: id.into(),
            pb,
            gold,
            pb_start: Duration::ZERO,
            progress: None,
            progress_start: None,
            status: Status::Normal,
        }
    }

    pub fn duration(&self) -> Option<Duration> {
        match (self.progress, self.progress_start) {
            (Some(progress), Some(start)) => Some(progress.saturating_sub(start)),
            _ => None,
        }
    }

    /// Absolute attempt time at which the reference run finished this segment.
    pub fn checkpoint(&self) -> Option<Duration> {
        self.pb.map(|pb| self.pb_start + pb)
    }

    pub fn status(&self) -> Status {
        self.status
    }

    /// True when the recorded duration is a new best for this segment.
    pub fn beats_gold(&self) -> bool {
        match (self.duration(), self.gold) {
            (Some(duration), Some(gold)) => duration < gold,
            (Some(_), None) => true,
            (None, _) => false,
        }
    }

    pub fn classify(&self, active: bool) -> Status {
        let (Some(duration), Some(progress)) = (self.duration(), self.progress) else {
            return Status::Normal;
        };

        if !active && self.beats_gold() {
            return Status::Gold;
        }

        match (self.pb, self.checkpoint()) {
            (Some(pb), Some(checkpoint)) => {
                let ahead = progress <= checkpoint;
                let gain = duration < pb;
                match (ahead, gain) {
                    (true, true) => Status::AheadGain,
                    (true, false) => Status::AheadLoss,
                    (false, true) => Status::BehindGain,
                    (false, false) => Status::BehindLoss,
                }
            }
            _ => Status::Normal,
        }
    }

    pub fn update(&mut self, active: bool) {
        self.status = self.classify(active);
    }

    pub fn begin(&mut self, at: Duration) {
        self.progress_start = Some(at);
        self.progress = Some(at);
    }

    /// Finalise the segment: freeze its status, then bank a new best.
    pub fn stop(&mut self) {
        self.update(false);
        self.bank_gold();
    }

    /// Store the duration as gold if it beats it. Returns whether it did.
    pub fn bank_gold(&mut self) -> bool {
        if !self.beats_gold() {
            return false;
        }
        self.gold = self.duration();
        true
    }

    /// Bank any new best, then forget the attempt's timing.
    pub fn reset(&mut self) {
        self.bank_gold();
        self.progress = None;
        self.progress_start = None;
        self.status = Status::Normal;
    }

    /// Attempt time relative to the reference checkpoint, or the raw
    /// progress when there is no reference.
    pub fn delta(&self) -> Option<TimeDelta> {
        let progress = self.progress?;
        Some(delta(progress, self.checkpoint().unwrap_or(Duration::ZERO)))
    }

    pub fn gold_delta(&self) -> Option<TimeDelta> {
        Some(delta(self.duration()?, self.gold?))
    }

    pub fn pb_gold_delta(&self) -> Option<TimeDelta> {
        Some(delta(self.pb?, self.gold?))
    }

    /// Whether the live delta is worth showing. An active segment only
    /// reveals it once it can no longer be a gold or has passed its checkpoint.
    pub fn shows_delta(&self, active: bool) -> bool {
        let Some(progress) = self.progress else {
            return false;
        };
        if !active {
            return true;
        }
        let duration = self.duration().unwrap_or_default();
        match self.checkpoint() {
            None => true,
            Some(checkpoint) => {
                duration > self.gold.unwrap_or_default() || progress >= checkpoint
            }
        }
    }
}
