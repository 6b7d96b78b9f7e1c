//! The split-timer state machine.
//!
//! An [`Engine`] owns the attempt (one [`SegmentState`] per route segment),
//! the [`Clock`] and the derived [`Totals`]. Every operation is defined in
//! every state; those that do not apply are no-ops.

use std::time::Duration;

use crate::clock::Clock;
use crate::route::Route;
use crate::run::{RunFile, SegmentRecord, Splits};
use crate::segment::SegmentState;
use crate::snapshot::{SegmentView, Snapshot};
use crate::totals::Totals;

#[derive(Debug, Clone, Copy, PartialEq, Eq, strum_macros::Display)]
pub enum EngineState {
    Idle,
    Running,
    Paused,
    Finished,
}

/// Header tone: where the attempt stands against the reference.
#[derive(Debug, Clone, Copy, PartialEq, Eq, strum_macros::Display)]
pub enum Standing {
    Idle,
    Paused,
    Ahead,
    Behind,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Cursor {
    NotStarted,
    At(usize),
    Finished,
}

#[derive(Debug, Clone)]
pub struct Engine {
    segments: Vec<SegmentState>,
    cursor: Cursor,
    clock: Clock,
    totals: Totals,
}

impl Engine {
    pub fn new(segments: Vec<SegmentState>, clock: Clock) -> Self {
        let mut engine = Self {
            segments,
            cursor: Cursor::NotStarted,
            clock,
            totals: Totals::default(),
        };
        engine.clock.set_paused(true);
        engine.recompute_pb_starts();
        engine.refresh();
        engine
    }

    /// A blank attempt seeded with the route's own reference times.
    pub fn from_route(route: &Route, clock: Clock) -> Self {
        let segments = route
            .segments
            .iter()
            .map(|def| SegmentState::new(def.id.clone(), def.pb, def.gold))
            .collect();
        Self::new(segments, clock)
    }

    /// Align a saved run with the route by segment id. Recorded durations
    /// are laid back end to end; ids the run does not know start blank.
    pub fn load(route: &Route, run: &RunFile, clock: Clock) -> Self {
        let mut at = Duration::ZERO;
        let segments = route
            .segments
            .iter()
            .map(|def| {
                let record = run.segs.get(&def.id).copied().unwrap_or(SegmentRecord {
                    duration: None,
                    pb: def.pb,
                    gold: def.gold,
                });
                let mut seg = SegmentState::new(def.id.clone(), record.pb, record.gold);
                if let Some(duration) = record.duration {
                    seg.progress_start = Some(at);
                    seg.progress = Some(at + duration);
                    at += duration;
                }
                seg
            })
            .collect();

        let mut engine = Self::new(segments, clock);
        for seg in &mut engine.segments {
            seg.update(false);
        }
        engine.clock.set_elapsed(at);
        engine
    }

    pub fn state(&self) -> EngineState {
        match self.cursor {
            Cursor::NotStarted => EngineState::Idle,
            Cursor::Finished => EngineState::Finished,
            Cursor::At(_) if self.clock.is_paused() => EngineState::Paused,
            Cursor::At(_) => EngineState::Running,
        }
    }

    pub fn current_index(&self) -> Option<usize> {
        match self.cursor {
            Cursor::At(idx) => Some(idx),
            _ => None,
        }
    }

    pub fn current(&self) -> Option<&SegmentState> {
        self.current_index().map(|idx| &self.segments[idx])
    }

    pub fn segments(&self) -> &[SegmentState] {
        &self.segments
    }

    pub fn elapsed(&self) -> Duration {
        self.clock.elapsed()
    }

    pub fn is_paused(&self) -> bool {
        self.clock.is_paused()
    }

    pub fn totals(&self) -> Totals {
        self.totals
    }

    /// Advance the clock by one interval and carry the active segment along.
    pub fn tick(&mut self) -> bool {
        if !self.clock.tick() {
            return false;
        }
        if let Some(idx) = self.current_index() {
            self.segments[idx].progress = Some(self.clock.elapsed());
        }
        self.refresh();
        true
    }

    /// Start the attempt, or finish the current segment and move on.
    pub fn split(&mut self) {
        match self.cursor {
            Cursor::Finished => return,
            Cursor::NotStarted => self.start(),
            Cursor::At(idx) => self.advance(idx),
        }
        self.refresh();
    }

    fn start(&mut self) {
        self.reset();
        if self.segments.is_empty() {
            self.stop(Cursor::Finished);
            return;
        }
        self.clock.set_elapsed(Duration::ZERO);
        self.clock.set_paused(false);
        self.cursor = Cursor::At(0);
        self.segments[0].begin(Duration::ZERO);
        log::debug!("attempt started");
    }

    fn advance(&mut self, idx: usize) {
        let at = self.clock.elapsed();
        let seg = &mut self.segments[idx];
        seg.progress = Some(at);
        seg.stop();
        log::debug!("split {} at {:?} ({})", seg.id, at, seg.status());

        let next = idx + 1;
        if next >= self.segments.len() {
            self.stop(Cursor::Finished);
            log::debug!("attempt finished at {at:?}");
            return;
        }
        self.cursor = Cursor::At(next);
        self.segments[next].begin(at);
    }

    fn stop(&mut self, cursor: Cursor) {
        self.cursor = cursor;
        self.clock.set_paused(true);
    }

    /// Toggle pause while a segment is current.
    pub fn pause(&mut self) {
        if self.current_index().is_none() {
            return;
        }
        let paused = !self.clock.is_paused();
        self.clock.set_paused(paused);
        log::debug!("paused: {paused}");
    }

    /// Abandon the attempt. New bests are banked as golds first.
    pub fn reset(&mut self) {
        for seg in &mut self.segments {
            seg.reset();
        }
        self.clock.set_elapsed(Duration::ZERO);
        self.stop(Cursor::NotStarted);
        self.refresh();
    }

    /// Resume at the first segment without a recorded time.
    pub fn resume(&mut self) {
        self.resume_at(self.first_unrecorded());
    }

    /// Re-enter the attempt, paused, at `index`. Earlier recorded times are
    /// kept; `index` is clamped to the first gap. Only applies while no
    /// segment is current.
    pub fn resume_at(&mut self, index: usize) {
        if self.current_index().is_some() {
            return;
        }
        let index = index.min(self.first_unrecorded());
        let at = match index.checked_sub(1) {
            Some(prev) => self.segments[prev].progress.unwrap_or_default(),
            None => Duration::ZERO,
        };

        for seg in &mut self.segments[index..] {
            seg.reset();
        }
        self.clock.set_elapsed(at);

        if index >= self.segments.len() {
            self.stop(Cursor::Finished);
        } else {
            self.stop(Cursor::At(index));
            self.segments[index].begin(at);
            log::debug!("resumed at segment {index} ({at:?})");
        }
        self.refresh();
    }

    fn first_unrecorded(&self) -> usize {
        self.segments
            .iter()
            .position(|seg| seg.duration().is_none())
            .unwrap_or(self.segments.len())
    }

    /// Snapshot of every segment's `(duration, pb, gold)`.
    pub fn save_run(&self) -> Splits {
        self.segments
            .iter()
            .map(|seg| {
                let record = SegmentRecord {
                    duration: seg.duration(),
                    pb: seg.pb,
                    gold: seg.gold,
                };
                (seg.id.clone(), record)
            })
            .collect()
    }

    /// Record this attempt as the new reference. Finished segments bank
    /// their golds and every record's pb becomes its duration. The live
    /// reference stays as loaded until the next session.
    pub fn save_pb(&mut self) -> Splits {
        let current = self.current_index();
        for (idx, seg) in self.segments.iter_mut().enumerate() {
            if Some(idx) != current {
                seg.bank_gold();
            }
        }
        self.refresh();

        let mut splits = self.save_run();
        for record in splits.values_mut() {
            record.pb = record.duration;
        }
        splits
    }

    /// Bank every recorded segment that beats its gold, here and in `pb`,
    /// leaving reference times alone.
    pub fn save_golds(&mut self, pb: &mut Splits) {
        for seg in &mut self.segments {
            let Some(duration) = seg.duration() else {
                continue;
            };
            seg.bank_gold();
            let record = pb.entry(seg.id.clone()).or_default();
            if record.gold.map_or(true, |gold| duration < gold) {
                record.gold = Some(duration);
            }
        }
        self.refresh();
    }

    pub fn standing(&self) -> Standing {
        let Some(idx) = self.current_index() else {
            return Standing::Idle;
        };
        if self.clock.is_paused() {
            return Standing::Paused;
        }
        let past = |seg: &SegmentState| match (seg.progress, seg.checkpoint()) {
            (Some(progress), Some(checkpoint)) => progress > checkpoint,
            _ => false,
        };
        let previous_behind = idx
            .checked_sub(1)
            .is_some_and(|prev| past(&self.segments[prev]));
        if previous_behind || past(&self.segments[idx]) {
            Standing::Behind
        } else {
            Standing::Ahead
        }
    }

    pub fn snapshot(&self) -> Snapshot {
        let current = self.current_index();
        let segments = self
            .segments
            .iter()
            .enumerate()
            .map(|(idx, seg)| SegmentView::of(seg, Some(idx) == current))
            .collect();

        Snapshot {
            state: self.state(),
            standing: self.standing(),
            elapsed: self.clock.elapsed(),
            totals: self.totals,
            current,
            segments,
        }
    }

    fn recompute_pb_starts(&mut self) {
        let mut start = Duration::ZERO;
        for seg in &mut self.segments {
            seg.pb_start = start;
            start += seg.pb.unwrap_or_default();
        }
    }

    fn refresh(&mut self) {
        if let Some(idx) = self.current_index() {
            self.segments[idx].update(true);
        }
        self.totals = Totals::compute(&self.segments, self.current_index());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::segment::{SegmentDef, Status};
    use assert_matches::assert_matches;

    fn secs(n: u64) -> Duration {
        Duration::from_secs(n)
    }

    fn millis(n: u64) -> Duration {
        Duration::from_millis(n)
    }

    fn route(n: usize) -> Route {
        let segments = (0..n)
            .map(|i| SegmentDef::new(format!("s{i}"), format!("Segment {i}")))
            .collect();
        Route::new("game", "any%", segments)
    }

    fn with_refs(refs: &[(Option<u64>, Option<u64>)]) -> Engine {
        let segments = refs
            .iter()
            .enumerate()
            .map(|(i, (pb, gold))| SegmentState::new(format!("s{i}"), pb.map(secs), gold.map(secs)))
            .collect();
        Engine::new(segments, Clock::default())
    }

    fn ticks(engine: &mut Engine, n: usize) {
        for _ in 0..n {
            engine.tick();
        }
    }

    fn assert_pb_starts(engine: &Engine) {
        let mut sum = Duration::ZERO;
        for seg in engine.segments() {
            assert_eq!(seg.pb_start, sum, "pb_start of {}", seg.id);
            sum += seg.pb.unwrap_or_default();
        }
    }

    #[test]
    fn test_new_engine_is_idle() {
        let engine = Engine::from_route(&route(3), Clock::default());
        assert_eq!(engine.state(), EngineState::Idle);
        assert_eq!(engine.current_index(), None);
        assert!(engine.is_paused());
        assert_eq!(engine.elapsed(), Duration::ZERO);
        assert_eq!(engine.standing(), Standing::Idle);
    }

    #[test]
    fn test_scenario_two_segments_without_history() {
        let mut engine = Engine::from_route(&route(2), Clock::default());

        engine.split();
        assert_eq!(engine.state(), EngineState::Running);
        assert_eq!(engine.current_index(), Some(0));
        ticks(&mut engine, 10);
        assert_eq!(engine.elapsed(), secs(1));

        engine.split();
        let first = &engine.segments()[0];
        assert_eq!(first.duration(), Some(secs(1)));
        assert_eq!(first.gold, Some(secs(1)));
        assert_eq!(first.status(), Status::Gold);
        assert_eq!(engine.current_index(), Some(1));

        ticks(&mut engine, 5);
        engine.split();
        assert_eq!(engine.segments()[1].duration(), Some(millis(500)));
        assert_eq!(engine.state(), EngineState::Finished);

        engine.split();
        assert_eq!(engine.state(), EngineState::Finished);

        let totals = engine.totals();
        assert_eq!(totals.best_possible, millis(1_500));
        assert_eq!(totals.sum_of_best, millis(1_500));
        assert_eq!(totals.pb_total, Duration::ZERO);
    }

    #[test]
    fn test_live_segment_ahead_gain() {
        let mut engine = with_refs(&[(Some(10), Some(8))]);
        engine.split();
        ticks(&mut engine, 90);

        let seg = engine.current().unwrap();
        assert_eq!(seg.duration(), Some(secs(9)));
        assert_eq!(seg.status(), Status::AheadGain);
        assert_eq!(engine.standing(), Standing::Ahead);
    }

    #[test]
    fn test_standing_behind_after_checkpoint() {
        let mut engine = with_refs(&[(Some(1), None), (Some(10), None)]);
        engine.split();
        ticks(&mut engine, 12);
        assert_eq!(engine.standing(), Standing::Behind);

        // still behind on the next segment because the previous one was late
        engine.split();
        assert_eq!(engine.standing(), Standing::Behind);

        engine.pause();
        assert_eq!(engine.standing(), Standing::Paused);
    }

    #[test]
    fn test_ticks_while_idle_or_paused_do_nothing() {
        let mut engine = Engine::from_route(&route(2), Clock::default());
        assert!(!engine.tick());

        engine.split();
        ticks(&mut engine, 3);
        engine.pause();
        assert_eq!(engine.state(), EngineState::Paused);
        assert!(!engine.tick());
        assert_eq!(engine.elapsed(), millis(300));
        assert_eq!(engine.current().unwrap().progress, Some(millis(300)));
    }

    #[test]
    fn test_pause_twice_restores_state() {
        let mut engine = Engine::from_route(&route(1), Clock::default());
        engine.split();
        let before = engine.is_paused();
        engine.pause();
        engine.pause();
        assert_eq!(engine.is_paused(), before);
        assert_eq!(engine.state(), EngineState::Running);
    }

    #[test]
    fn test_pause_and_split_without_attempt_are_noops() {
        let mut engine = Engine::from_route(&route(1), Clock::default());
        engine.pause();
        assert_eq!(engine.state(), EngineState::Idle);
        assert!(engine.is_paused());

        engine.split();
        engine.split();
        assert_eq!(engine.state(), EngineState::Finished);
        engine.pause();
        engine.split();
        engine.resume();
        assert_eq!(engine.state(), EngineState::Finished);
    }

    #[test]
    fn test_empty_route_goes_straight_to_finished() {
        let mut engine = Engine::from_route(&route(0), Clock::default());
        engine.split();
        assert_eq!(engine.state(), EngineState::Finished);
        assert_eq!(engine.totals(), Totals::default());
        engine.reset();
        assert_eq!(engine.state(), EngineState::Idle);
    }

    #[test]
    fn test_split_while_paused_stays_paused() {
        let mut engine = Engine::from_route(&route(3), Clock::default());
        engine.split();
        ticks(&mut engine, 4);
        engine.pause();
        engine.split();
        assert_eq!(engine.state(), EngineState::Paused);
        assert_eq!(engine.current_index(), Some(1));
        assert_eq!(engine.current().unwrap().progress_start, Some(millis(400)));
    }

    #[test]
    fn test_running_invariants() {
        let mut engine = Engine::from_route(&route(4), Clock::default());
        engine.split();
        ticks(&mut engine, 5);
        engine.split();
        ticks(&mut engine, 7);

        let idx = engine.current_index().unwrap();
        for seg in &engine.segments()[..idx] {
            assert!(seg.duration().is_some());
        }
        for seg in &engine.segments()[idx + 1..] {
            assert_eq!(seg.progress, None);
            assert_eq!(seg.duration(), None);
        }
        assert_eq!(engine.current().unwrap().duration(), Some(millis(700)));
    }

    #[test]
    fn test_reset_banks_golds_and_returns_to_idle() {
        let mut engine = with_refs(&[(Some(10), Some(3)), (Some(10), Some(9))]);
        engine.split();
        ticks(&mut engine, 40);
        engine.split();
        ticks(&mut engine, 20);

        let before: Vec<_> = engine.segments().iter().map(|s| s.gold).collect();
        engine.reset();

        assert_eq!(engine.state(), EngineState::Idle);
        assert_eq!(engine.elapsed(), Duration::ZERO);
        for (seg, old) in engine.segments().iter().zip(before) {
            assert!(seg.gold <= old, "gold of {} got worse", seg.id);
            assert_eq!(seg.progress, None);
            assert_eq!(seg.progress_start, None);
            assert_eq!(seg.status(), Status::Normal);
        }
        // abandoned second segment took 2s against a gold of 9
        assert_eq!(engine.segments()[1].gold, Some(secs(2)));
        assert_eq!(engine.segments()[0].gold, Some(secs(3)));
    }

    #[test]
    fn test_sum_of_best_bounded_by_best_possible_throughout() {
        let mut engine = with_refs(&[(Some(3), Some(2)), (None, Some(4)), (Some(5), None)]);
        let check = |e: &Engine| {
            let t = e.totals();
            assert!(t.sum_of_best <= t.best_possible, "{t:?} in {:?}", e.state());
        };
        check(&engine);
        engine.split();
        for _ in 0..3 {
            for _ in 0..25 {
                engine.tick();
                check(&engine);
            }
            engine.split();
            check(&engine);
        }
        engine.reset();
        check(&engine);
    }

    #[test]
    fn test_pb_total_and_starts() {
        let engine = with_refs(&[(Some(3), None), (None, None), (Some(5), None)]);
        assert_eq!(engine.totals().pb_total, secs(8));
        assert_pb_starts(&engine);
        assert_eq!(engine.segments()[2].pb_start, secs(3));
    }

    #[test]
    fn test_save_run_is_a_plain_snapshot() {
        let mut engine = with_refs(&[(Some(3), Some(1)), (Some(4), None)]);
        engine.split();
        ticks(&mut engine, 20);
        engine.split();
        ticks(&mut engine, 5);

        let splits = engine.save_run();
        assert_eq!(splits.len(), 2);
        assert_eq!(splits["s0"].duration, Some(secs(2)));
        assert_eq!(splits["s0"].pb, Some(secs(3)));
        assert_eq!(splits["s0"].gold, Some(secs(1)));
        assert_eq!(splits["s1"].duration, Some(millis(500)));
        assert_eq!(splits["s1"].gold, None);
        assert_eq!(engine.state(), EngineState::Running);
    }

    #[test]
    fn test_save_pb_records_new_reference() {
        let mut engine = with_refs(&[(Some(3), Some(1)), (Some(4), Some(9)), (Some(2), Some(2))]);
        engine.split();
        ticks(&mut engine, 25);
        engine.split();
        ticks(&mut engine, 30);

        let splits = engine.save_pb();
        // slower than its pb, still the new reference
        assert_eq!(splits["s0"].pb, Some(millis(2_500)));
        assert_eq!(splits["s0"].gold, Some(secs(1)));
        // the active segment does not bank its gold
        assert_eq!(splits["s1"].pb, Some(secs(3)));
        assert_eq!(splits["s1"].gold, Some(secs(9)));
        // never reached
        assert_eq!(splits["s2"].pb, None);
        assert_eq!(splits["s2"].gold, Some(secs(2)));

        // the session keeps comparing against the loaded reference
        assert_pb_starts(&engine);
        assert_eq!(engine.totals().pb_total, secs(9));
        assert_eq!(engine.segments()[1].pb, Some(secs(4)));
        assert_eq!(engine.segments()[2].pb, Some(secs(2)));
        assert_eq!(engine.segments()[0].gold, Some(secs(1)));
    }

    #[test]
    fn test_save_pb_mid_attempt_keeps_live_status() {
        let mut engine = with_refs(&[(Some(10), Some(8)), (Some(10), Some(8))]);
        engine.split();
        ticks(&mut engine, 20);
        assert_eq!(engine.segments()[0].status(), Status::AheadGain);

        let splits = engine.save_pb();
        ticks(&mut engine, 1);

        assert_eq!(splits["s0"].pb, Some(millis(2_000)));
        assert_eq!(splits["s1"].pb, None);
        assert_eq!(engine.totals().pb_total, secs(20));
        assert_eq!(engine.segments()[0].status(), Status::AheadGain);
        assert_eq!(engine.segments()[1].pb, Some(secs(10)));
    }

    #[test]
    fn test_save_golds_never_regresses() {
        let mut engine = with_refs(&[(None, None)]);
        let mut pb = Splits::new();

        engine.split();
        ticks(&mut engine, 30);
        engine.save_golds(&mut pb);
        assert_eq!(pb["s0"].gold, Some(secs(3)));
        assert_eq!(engine.segments()[0].gold, Some(secs(3)));
        assert_eq!(pb["s0"].pb, None);

        engine.reset();
        engine.split();
        ticks(&mut engine, 50);
        engine.save_golds(&mut pb);
        assert_eq!(pb["s0"].gold, Some(secs(3)));
        assert_eq!(engine.segments()[0].gold, Some(secs(3)));
    }

    #[test]
    fn test_save_golds_keeps_pb_record_reference() {
        let mut engine = with_refs(&[(Some(10), Some(8))]);
        let mut pb = engine.save_run();
        pb.get_mut("s0").unwrap().duration = Some(secs(10));

        engine.split();
        ticks(&mut engine, 70);
        engine.split();
        engine.save_golds(&mut pb);

        assert_eq!(pb["s0"].gold, Some(secs(7)));
        assert_eq!(pb["s0"].duration, Some(secs(10)));
        assert_eq!(pb["s0"].pb, Some(secs(10)));
    }

    #[test]
    fn test_load_lays_durations_end_to_end() {
        let route = route(3);
        let mut run = RunFile::from_route("r.json", &route);
        for (id, dur) in [("s0", 4), ("s1", 6)] {
            let rec = run.segs.get_mut(id).unwrap();
            rec.duration = Some(secs(dur));
            rec.pb = Some(secs(5));
            rec.gold = Some(secs(5));
        }

        let engine = Engine::load(&route, &run, Clock::default());
        assert_eq!(engine.state(), EngineState::Idle);
        assert_eq!(engine.elapsed(), secs(10));
        let segs = engine.segments();
        assert_eq!(segs[0].progress_start, Some(secs(0)));
        assert_eq!(segs[1].progress_start, Some(secs(4)));
        assert_eq!(segs[1].progress, Some(secs(10)));
        assert_eq!(segs[2].duration(), None);
        assert_eq!(segs[0].status(), Status::Gold);
        // slower than pb but exactly on its checkpoint
        assert_eq!(segs[1].status(), Status::AheadLoss);
        assert_pb_starts(&engine);

        assert_eq!(engine.save_run(), run.segs);
    }

    #[test]
    fn test_load_falls_back_to_route_references() {
        let mut route = route(2);
        route.segments[1].pb = Some(secs(7));
        let run = RunFile::default();
        let engine = Engine::load(&route, &run, Clock::default());
        assert_eq!(engine.segments()[1].pb, Some(secs(7)));
        assert_eq!(engine.segments()[1].pb_start, Duration::ZERO);
    }

    #[test]
    fn test_resume_continues_after_recorded_segments() {
        let route = route(3);
        let mut run = RunFile::from_route("r.json", &route);
        run.segs.get_mut("s0").unwrap().duration = Some(secs(4));

        let mut engine = Engine::load(&route, &run, Clock::default());
        engine.resume();
        assert_eq!(engine.state(), EngineState::Paused);
        assert_eq!(engine.current_index(), Some(1));
        assert_eq!(engine.elapsed(), secs(4));
        assert_eq!(engine.segments()[0].duration(), Some(secs(4)));

        engine.pause();
        ticks(&mut engine, 10);
        engine.split();
        assert_eq!(engine.segments()[1].duration(), Some(secs(1)));
        assert_eq!(engine.current_index(), Some(2));
    }

    #[test]
    fn test_resume_at_is_clamped_and_clears_later_times() {
        let route = route(3);
        let mut run = RunFile::from_route("r.json", &route);
        run.segs.get_mut("s0").unwrap().duration = Some(secs(4));
        run.segs.get_mut("s1").unwrap().duration = Some(secs(6));

        let mut engine = Engine::load(&route, &run, Clock::default());
        engine.resume_at(1);
        assert_eq!(engine.current_index(), Some(1));
        assert_eq!(engine.elapsed(), secs(4));
        assert_eq!(engine.segments()[1].duration(), Some(Duration::ZERO));
        assert_eq!(engine.segments()[1].gold, Some(secs(6)));

        engine.reset();
        engine.resume_at(2);
        assert_eq!(engine.current_index(), Some(0));
        assert_eq!(engine.elapsed(), Duration::ZERO);
    }

    #[test]
    fn test_resume_when_everything_is_recorded() {
        let mut engine = Engine::from_route(&route(1), Clock::default());
        engine.split();
        ticks(&mut engine, 2);
        engine.split();
        assert_eq!(engine.state(), EngineState::Finished);

        engine.resume();
        assert_eq!(engine.state(), EngineState::Finished);
        assert_eq!(engine.segments()[0].duration(), Some(millis(200)));
    }

    #[test]
    fn test_resume_while_running_is_ignored() {
        let mut engine = Engine::from_route(&route(2), Clock::default());
        engine.split();
        ticks(&mut engine, 3);
        engine.resume_at(1);
        assert_eq!(engine.current_index(), Some(0));
        assert_eq!(engine.state(), EngineState::Running);
    }

    #[test]
    fn test_snapshot_mirrors_engine() {
        let mut engine = with_refs(&[(Some(1), Some(1)), (None, None)]);
        engine.split();
        ticks(&mut engine, 2);

        let snap = engine.snapshot();
        assert_eq!(snap.state, EngineState::Running);
        assert_eq!(snap.current, Some(0));
        assert_eq!(snap.elapsed, millis(200));
        assert_eq!(snap.totals, engine.totals());
        assert_matches!(snap.segments.as_slice(), [first, second] => {
            assert!(first.active);
            assert_eq!(first.duration, Some(millis(200)));
            assert!(!second.active);
            assert_eq!(second.duration, None);
        });
    }
}
