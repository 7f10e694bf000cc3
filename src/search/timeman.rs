//! Time allocation for a single `go` command: derives a hard stop (search
//! must abort immediately) and a soft stop (don't start another iterative
//! deepening pass) from either a fixed move time or the clock/increment
//! pair UCI hands over.

use std::time::Duration;

/// Fraction of the hard bound that, once exceeded by the best move's
/// fraction of nodes searched at the completed depth, means continuing
/// to the next depth almost certainly won't finish in time.
const WONT_FINISH_NEXT_DEPTH_FRACTION: f64 = 0.65;

const MOVE_OVERHEAD: Duration = Duration::from_millis(50);

#[derive(Clone, Copy, Debug)]
pub struct TimeControl {
    pub our_time: Duration,
    pub increment: Duration,
    pub moves_to_go: Option<u32>,
}

#[derive(Clone, Copy, Debug)]
pub enum TimeAllotment {
    /// A fixed `movetime N` budget; soft and hard bounds coincide.
    Fixed(Duration),
    Clock(TimeControl),
    /// No time limit; only a node or depth cap governs the search.
    Infinite,
}

pub struct TimeManager {
    hard: Duration,
    soft: Duration,
    initial_soft: Duration,
    started: bool,
}

impl TimeManager {
    #[must_use]
    pub fn new(allotment: TimeAllotment) -> Self {
        let (hard, soft) = match allotment {
            TimeAllotment::Fixed(d) => {
                let usable = d.saturating_sub(MOVE_OVERHEAD).max(Duration::from_millis(1));
                (usable, usable)
            }
            TimeAllotment::Infinite => (Duration::from_secs(3600), Duration::from_secs(3600)),
            TimeAllotment::Clock(tc) => Self::tournament_bounds(tc),
        };
        TimeManager { hard, soft, initial_soft: soft, started: false }
    }

    fn tournament_bounds(tc: TimeControl) -> (Duration, Duration) {
        let moves_to_go = tc.moves_to_go.unwrap_or(30).max(1) as f64;
        let usable = tc.our_time.saturating_sub(MOVE_OVERHEAD).as_secs_f64().max(0.0);
        let inc = tc.increment.as_secs_f64();

        let base = usable / moves_to_go + inc * 0.8;
        let hard = (usable * 0.33).min(base * 4.0).max(0.001);
        let soft = (usable * 0.083).min(base).max(0.001);
        (Duration::from_secs_f64(hard), Duration::from_secs_f64(soft))
    }

    #[must_use]
    pub fn hard_bound(&self) -> Duration {
        self.hard
    }

    #[must_use]
    pub fn soft_bound(&self) -> Duration {
        self.soft
    }

    /// Called after each completed iterative-deepening depth. `best_move_node_fraction`
    /// is the fraction of total nodes spent on the PV move (stability signal);
    /// `elapsed` is time spent so far this search.
    pub fn on_depth_complete(&mut self, elapsed: Duration, best_move_node_fraction: f64) {
        self.started = true;
        let used_fraction = elapsed.as_secs_f64() / self.hard.as_secs_f64().max(1e-9);

        if used_fraction >= WONT_FINISH_NEXT_DEPTH_FRACTION {
            self.soft = Duration::from_secs(0);
            return;
        }

        // A dominant best move (most nodes spent confirming it) means the
        // position is settled; shrink the soft bound. An unstable best move
        // means deepening further is likely to change the answer; grow it
        // back toward the initial allocation.
        if best_move_node_fraction > 0.7 {
            self.soft = Duration::from_secs_f64(self.soft.as_secs_f64() * 0.8);
        } else {
            self.soft = (self.soft.as_secs_f64() * 1.15)
                .min(self.initial_soft.as_secs_f64() * 1.5)
                .pipe(Duration::from_secs_f64);
        }
    }

    #[must_use]
    pub fn should_start_next_depth(&self, elapsed: Duration) -> bool {
        elapsed < self.soft
    }

    #[must_use]
    pub fn must_stop(&self, elapsed: Duration) -> bool {
        elapsed >= self.hard
    }
}

trait Pipe: Sized {
    fn pipe<T>(self, f: impl FnOnce(Self) -> T) -> T {
        f(self)
    }
}
impl Pipe for f64 {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fixed_movetime_reserves_overhead() {
        let tm = TimeManager::new(TimeAllotment::Fixed(Duration::from_millis(1000)));
        assert!(tm.hard_bound() < Duration::from_millis(1000));
        assert_eq!(tm.hard_bound(), tm.soft_bound());
    }

    #[test]
    fn tournament_soft_bound_is_smaller_than_hard() {
        let tm = TimeManager::new(TimeAllotment::Clock(TimeControl {
            our_time: Duration::from_secs(60),
            increment: Duration::from_secs(1),
            moves_to_go: None,
        }));
        assert!(tm.soft_bound() < tm.hard_bound());
    }

    #[test]
    fn near_hard_bound_zeros_soft_bound() {
        let mut tm = TimeManager::new(TimeAllotment::Clock(TimeControl {
            our_time: Duration::from_secs(60),
            increment: Duration::ZERO,
            moves_to_go: None,
        }));
        let hard = tm.hard_bound();
        tm.on_depth_complete(hard.mul_f64(0.9), 0.5);
        assert_eq!(tm.soft_bound(), Duration::ZERO);
    }

    #[test]
    fn must_stop_respects_hard_bound() {
        let tm = TimeManager::new(TimeAllotment::Fixed(Duration::from_millis(200)));
        assert!(!tm.must_stop(Duration::from_millis(1)));
        assert!(tm.must_stop(tm.hard_bound() + Duration::from_millis(1)));
    }
}
