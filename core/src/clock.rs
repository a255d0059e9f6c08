use alloc::vec::Vec;

use crate::*;

#[derive(Copy, Clone, Debug, PartialEq)]
struct Scheduled {
    token: TimerToken,
    due: u64,
    period: Option<Millis>,
}

/// Virtual clock that executes an engine's timer commands against a
/// manually advanced time line.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ManualClock {
    now: u64,
    scheduled: Vec<Scheduled>,
}

impl ManualClock {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn pending(&self) -> impl Iterator<Item = TimerToken> {
        self.scheduled.iter().map(|entry| entry.token)
    }

    pub fn apply(&mut self, commands: impl IntoIterator<Item = TimerCommand>) {
        for command in commands {
            match command {
                TimerCommand::Arm { token, schedule } => {
                    self.scheduled.retain(|entry| entry.token.kind != token.kind);
                    self.scheduled.push(Scheduled {
                        token,
                        due: self.now + u64::from(schedule.delay()),
                        period: schedule.is_repeating().then_some(schedule.delay()),
                    });
                }
                TimerCommand::Cancel(token) => {
                    self.scheduled.retain(|entry| entry.token != token);
                }
            }
        }
    }

    pub fn sync(&mut self, engine: &mut GameEngine) {
        self.apply(engine.take_timer_commands());
    }

    /// Moves time forward by `ms`, firing every timer that comes due in
    /// deadline order. Timers armed at the same deadline fire in arming order.
    pub fn advance(&mut self, engine: &mut GameEngine, ms: Millis) -> Vec<TimerOutcome> {
        let target = self.now + u64::from(ms);
        let mut outcomes = Vec::new();
        self.sync(engine);

        while let Some(index) = self.next_due(target) {
            let entry = self.scheduled[index];
            self.now = entry.due;
            match entry.period {
                Some(period) => self.scheduled[index].due += u64::from(period.max(1)),
                None => {
                    self.scheduled.remove(index);
                }
            }

            match engine.on_timer(entry.token) {
                Ok(outcome) => outcomes.push(outcome),
                Err(err) => log::trace!("dropped {:?}: {}", entry.token, err),
            }
            self.sync(engine);
        }

        self.now = target;
        outcomes
    }

    fn next_due(&self, target: u64) -> Option<usize> {
        self.scheduled
            .iter()
            .enumerate()
            .filter(|(_, entry)| entry.due <= target)
            .min_by_key(|(_, entry)| entry.due)
            .map(|(index, _)| index)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn paired_grid() -> Grid {
        Grid::from_symbols(4, &[0, 0, 1, 1, 2, 2, 3, 3, 4, 4, 5, 5, 6, 6, 7, 7]).unwrap()
    }

    #[test]
    fn preview_ends_after_configured_delay() {
        let mut engine = GameEngine::new(GameConfig::memory(), 5);
        let mut clock = ManualClock::new();
        engine.start_with_grid(paired_grid()).unwrap();

        clock.advance(&mut engine, 1999);
        assert_eq!(engine.phase(), Phase::Revealing);
        assert_eq!(engine.session().seconds_remaining, 59);

        let outcomes = clock.advance(&mut engine, 1);
        assert_eq!(
            outcomes,
            [
                TimerOutcome::Tick(TickOutcome::Counted),
                TimerOutcome::PreviewEnded
            ]
        );
        assert_eq!(engine.phase(), Phase::Playing);
    }

    #[test]
    fn mismatch_flips_back_after_delay() {
        let mut engine = GameEngine::new(GameConfig::memory(), 5);
        let mut clock = ManualClock::new();
        engine.start_with_grid(paired_grid()).unwrap();
        clock.advance(&mut engine, 2000);

        engine.on_cell_click((0, 0)).unwrap();
        engine.on_cell_click((3, 3)).unwrap();
        clock.advance(&mut engine, 999);
        assert!(engine.grid()[(0, 0)].face_up);

        clock.advance(&mut engine, 1);
        assert!(!engine.grid()[(0, 0)].face_up);
        assert!(!engine.grid()[(3, 3)].face_up);
        assert_eq!(engine.phase(), Phase::Playing);
    }

    #[test]
    fn agitation_runs_ten_frames_then_settles() {
        let mut engine = GameEngine::new(GameConfig::shuffle(), 5);
        let mut clock = ManualClock::new();
        engine.start().unwrap();

        let outcomes = clock.advance(&mut engine, 2000);
        let frames = outcomes
            .iter()
            .filter(|outcome| matches!(outcome, TimerOutcome::Agitated))
            .count();

        assert_eq!(frames, 10);
        assert_eq!(outcomes.last(), Some(&TimerOutcome::Settled));
        assert_eq!(engine.phase(), Phase::Playing);
        assert!(clock.pending().all(|token| token.kind == TimerKind::Countdown));
    }

    #[test]
    fn countdown_runs_out_to_lost() {
        let config = GameConfig::memory().with_timer_secs(5);
        let mut engine = GameEngine::new(config, 5);
        let mut clock = ManualClock::new();
        engine.start().unwrap();

        clock.advance(&mut engine, 10_000);

        assert_eq!(engine.phase(), Phase::Lost);
        assert_eq!(engine.session().seconds_remaining, 0);
        assert_eq!(clock.pending().count(), 0);
    }

    #[test]
    fn win_loops_into_a_new_round() {
        let mut engine = GameEngine::new(GameConfig::memory(), 5);
        let mut clock = ManualClock::new();
        engine.start_with_grid(paired_grid()).unwrap();
        clock.advance(&mut engine, 2000);
        for row in 0..4 {
            for col in [0, 2] {
                engine.on_cell_click((row, col)).unwrap();
                engine.on_cell_click((row, col + 1)).unwrap();
            }
        }
        assert_eq!(engine.phase(), Phase::Won);

        clock.advance(&mut engine, 2000);
        assert_eq!(engine.phase(), Phase::Revealing);
        assert_eq!(engine.session().high_score, 360);
        assert_eq!(engine.session().seconds_remaining, 60);
        assert!(engine.grid().is_paired());
    }
}
