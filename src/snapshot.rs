use chrono::TimeDelta;
use std::time::Duration;

use crate::engine::{EngineState, Standing};
use crate::segment::{SegmentState, Status};
use crate::totals::Totals;

/// Read-only copy of what the engine publishes after each update.
#[derive(Debug, Clone, PartialEq)]
pub struct Snapshot {
    pub state: EngineState,
    pub standing: Standing,
    pub elapsed: Duration,
    pub totals: Totals,
    pub current: Option<usize>,
    pub segments: Vec<SegmentView>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct SegmentView {
    pub id: String,
    pub active: bool,
    pub status: Status,
    pub pb: Option<Duration>,
    pub gold: Option<Duration>,
    pub progress: Option<Duration>,
    pub checkpoint: Option<Duration>,
    pub duration: Option<Duration>,
    /// Live time against the checkpoint, `None` while it is still hidden.
    pub delta: Option<TimeDelta>,
    pub gold_delta: Option<TimeDelta>,
    pub pb_gold_delta: Option<TimeDelta>,
}

impl SegmentView {
    pub fn of(seg: &SegmentState, active: bool) -> Self {
        Self {
            id: seg.id.clone(),
            active,
            status: seg.status(),
            pb: seg.pb,
            gold: seg.gold,
            progress: seg.progress,
            checkpoint: seg.checkpoint(),
            duration: seg.duration(),
            delta: seg.delta().filter(|_| seg.shows_delta(active)),
            gold_delta: seg.gold_delta(),
            pb_gold_delta: seg.pb_gold_delta(),
        }
    }

    /// A finished segment that set a new best during this attempt.
    pub fn is_new_gold(&self) -> bool {
        !self.active && self.status == Status::Gold
    }
}
