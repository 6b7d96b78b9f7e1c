use std::time::Duration;

use crate::segment::SegmentState;

/// Headline figures derived from an attempt.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Totals {
    pub sum_of_best: Duration,
    pub best_possible: Duration,
    pub pb_total: Duration,
}

impl Totals {
    pub fn compute(segments: &[SegmentState], current: Option<usize>) -> Self {
        Self {
            sum_of_best: sum_of_best(segments, current),
            best_possible: best_possible(segments, current),
            pb_total: pb_total(segments),
        }
    }
}

fn finished_duration(idx: usize, seg: &SegmentState, current: Option<usize>) -> Option<Duration> {
    if Some(idx) == current {
        None
    } else {
        seg.duration()
    }
}

/// Lower bound if every segment hit its best. A finished segment counts
/// the better of its time and its gold; anything else counts its gold.
/// An absent gold counts as zero either way.
pub fn sum_of_best(segments: &[SegmentState], current: Option<usize>) -> Duration {
    segments
        .iter()
        .enumerate()
        .map(|(idx, seg)| {
            let gold = seg.gold.unwrap_or_default();
            finished_duration(idx, seg, current).map_or(gold, |duration| duration.min(gold))
        })
        .sum()
}

/// Projected finish if every remaining segment matches its gold. The
/// current segment counts at least its gold, more once it runs longer.
pub fn best_possible(segments: &[SegmentState], current: Option<usize>) -> Duration {
    segments
        .iter()
        .enumerate()
        .map(|(idx, seg)| {
            let gold = seg.gold.unwrap_or_default();
            if Some(idx) == current {
                seg.duration().unwrap_or_default().max(gold)
            } else {
                seg.duration().unwrap_or(gold)
            }
        })
        .sum()
}

pub fn pb_total(segments: &[SegmentState]) -> Duration {
    segments.iter().filter_map(|seg| seg.pb).sum()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn secs(n: u64) -> Duration {
        Duration::from_secs(n)
    }

    fn seg(pb: Option<u64>, gold: Option<u64>, span: Option<(u64, u64)>) -> SegmentState {
        let mut s = SegmentState::new("s", pb.map(secs), gold.map(secs));
        if let Some((start, end)) = span {
            s.begin(secs(start));
            s.progress = Some(secs(end));
        }
        s
    }

    #[test]
    fn test_empty_attempt() {
        assert_eq!(Totals::compute(&[], None), Totals::default());
    }

    #[test]
    fn test_unreached_segments_count_gold() {
        let segs = [seg(Some(10), Some(8), None), seg(None, None, None)];
        let totals = Totals::compute(&segs, None);
        assert_eq!(totals.sum_of_best, secs(8));
        assert_eq!(totals.best_possible, secs(8));
        assert_eq!(totals.pb_total, secs(10));
    }

    #[test]
    fn test_finished_segment_without_gold() {
        // reloaded mid-attempt: a duration but no gold banked yet
        let segs = [seg(None, None, Some((0, 4))), seg(Some(3), Some(2), Some((4, 7)))];
        assert_eq!(sum_of_best(&segs, None), secs(2));
        assert_eq!(best_possible(&segs, None), secs(7));
    }

    #[test]
    fn test_finished_segment_slower_than_gold() {
        let segs = [seg(Some(10), Some(8), Some((0, 12)))];
        assert_eq!(sum_of_best(&segs, None), secs(8));
        assert_eq!(best_possible(&segs, None), secs(12));
    }

    #[test]
    fn test_current_segment_counts_at_least_gold() {
        let segs = [
            seg(Some(10), Some(8), Some((0, 9))),
            seg(Some(10), Some(7), Some((9, 12))),
            seg(Some(10), Some(6), None),
        ];
        // current has run 3s, under its gold of 7
        assert_eq!(best_possible(&segs, Some(1)), secs(9 + 7 + 6));
        assert_eq!(sum_of_best(&segs, Some(1)), secs(8 + 7 + 6));

        let segs = [seg(None, Some(2), Some((0, 5)))];
        assert_eq!(best_possible(&segs, Some(0)), secs(5));
        assert_eq!(sum_of_best(&segs, Some(0)), secs(2));
    }

    #[test]
    fn test_sum_of_best_never_exceeds_best_possible() {
        let golds = [None, Some(3), Some(8)];
        let spans = [None, Some((0, 2)), Some((0, 5)), Some((0, 9))];
        for gold in golds {
            for span in spans {
                for current in [None, Some(0)] {
                    let segs = [seg(Some(6), gold, span), seg(None, gold, None)];
                    assert!(
                        sum_of_best(&segs, current) <= best_possible(&segs, current),
                        "gold {gold:?} span {span:?} current {current:?}"
                    );
                }
            }
        }
    }
}
