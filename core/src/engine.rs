use alloc::format;
use alloc::string::String;
use rand::prelude::*;
use serde::{Deserialize, Serialize};

use crate::*;

#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum Phase {
    #[default]
    Idle,
    /// Memory preview or shuffle agitation.
    Revealing,
    Playing,
    /// Input locked while a pair flips back or a failed line check waits for a reshuffle.
    Resolving,
    Won,
    Lost,
}

impl Phase {
    pub const fn is_terminal(self) -> bool {
        matches!(self, Self::Won | Self::Lost)
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Pick {
    pub coords: Coord2,
    pub symbol: Symbol,
}

/// Mutable state of one play-through.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Session {
    pub grid: Grid,
    pub phase: Phase,
    pub seconds_remaining: u32,
    pub mismatch_count: u32,
    pub score: u32,
    pub streak: u32,
    pub high_score: u32,
    pub pending_first_pick: Option<Pick>,
    pub message: String,
}

impl Session {
    fn idle(grid: Grid, high_score: u32) -> Self {
        Self {
            grid,
            phase: Phase::Idle,
            seconds_remaining: 0,
            mismatch_count: 0,
            score: 0,
            streak: 0,
            high_score,
            pending_first_pick: None,
            message: String::new(),
        }
    }
}

#[derive(Clone, Debug)]
pub struct GameEngine {
    config: GameConfig,
    session: Session,
    rng: SmallRng,
    timers: Timers,
    mismatched: Option<(Coord2, Coord2)>,
    dealt: Option<Grid>,
}

impl GameEngine {
    pub fn new(config: GameConfig, seed: u64) -> Self {
        let mut rng = SmallRng::seed_from_u64(seed);
        let grid = Self::idle_grid(&config, &mut rng);
        log::debug!("new {} engine, seed {}", config.mode().name(), seed);
        Self {
            config,
            session: Session::idle(grid, 0),
            rng,
            timers: Timers::default(),
            mismatched: None,
            dealt: None,
        }
    }

    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    pub fn grid(&self) -> &Grid {
        &self.session.grid
    }

    pub fn phase(&self) -> Phase {
        self.session.phase
    }

    pub fn mode(&self) -> Mode {
        self.config.mode()
    }

    pub fn is_locked(&self) -> bool {
        matches!(self.session.phase, Phase::Resolving)
    }

    pub fn attempts_left(&self) -> u32 {
        self.config
            .max_mismatches()
            .saturating_sub(self.session.mismatch_count)
    }

    pub fn timers(&self) -> &Timers {
        &self.timers
    }

    /// Drains the arm/cancel requests produced since the last call.
    pub fn take_timer_commands(&mut self) -> TimerCommands {
        self.timers.take_commands()
    }

    pub fn can_start(&self) -> bool {
        matches!(self.session.phase, Phase::Idle) || self.session.phase.is_terminal()
    }

    pub fn can_reshuffle(&self) -> bool {
        matches!(self.config.mode(), Mode::Shuffle) && matches!(self.session.phase, Phase::Resolving)
    }

    pub fn can_reset(&self) -> bool {
        self.session.phase.is_terminal()
            || (!matches!(self.session.phase, Phase::Idle) && self.session.seconds_remaining == 0)
    }

    pub fn can_interact_at(&self, coords: Coord2) -> bool {
        if !matches!(self.session.phase, Phase::Playing) {
            return false;
        }
        match (self.config.mode(), self.session.grid.get(coords)) {
            (_, None) => false,
            (Mode::Shuffle, Some(_)) => true,
            (Mode::Memory, Some(card)) => card.is_pickable(),
        }
    }

    pub fn start(&mut self) -> Result<StartOutcome> {
        self.check_can_start()?;
        let deal = generator_for(self.config.mode()).generate(&self.config, &mut self.rng);
        Ok(self.begin_round(deal))
    }

    /// Starts a round on a predetermined deal.
    pub fn start_with_grid(&mut self, grid: Grid) -> Result<StartOutcome> {
        self.check_can_start()?;
        self.check_grid_shape(&grid)?;
        Ok(self.begin_round(grid))
    }

    /// Shuffle mode: spends the next attempt on a fresh deal.
    pub fn reshuffle(&mut self) -> Result<StartOutcome> {
        self.check_can_reshuffle()?;
        let deal = generator_for(self.config.mode()).generate(&self.config, &mut self.rng);
        Ok(self.begin_agitation(deal))
    }

    pub fn reshuffle_with_grid(&mut self, grid: Grid) -> Result<StartOutcome> {
        self.check_can_reshuffle()?;
        self.check_grid_shape(&grid)?;
        Ok(self.begin_agitation(grid))
    }

    pub fn on_cell_click(&mut self, coords: Coord2) -> Result<ClickOutcome> {
        let coords = self.session.grid.validate_coords(coords)?;
        match self.session.phase {
            Phase::Playing => {}
            Phase::Resolving => return Err(GameError::InputLocked),
            _ => return Err(GameError::NotPlaying),
        }

        match self.config.mode() {
            Mode::Shuffle => Ok(self.flip_shuffle_card(coords)),
            Mode::Memory => self.pick_memory_card(coords),
        }
    }

    pub fn on_tick(&mut self) -> Result<TickOutcome> {
        if !self.timers.is_armed(TimerKind::Countdown) {
            return Err(GameError::NotPlaying);
        }

        self.session.seconds_remaining = self.session.seconds_remaining.saturating_sub(1);
        if self.session.seconds_remaining > 0 {
            return Ok(TickOutcome::Counted);
        }

        self.timers.cancel(TimerKind::Countdown);
        if !matches!(self.session.phase, Phase::Won) {
            self.lose("Time's up!");
        }
        Ok(TickOutcome::TimeUp)
    }

    /// Delivers a timer firing. Tokens that are no longer armed are rejected
    /// without touching the session.
    pub fn on_timer(&mut self, token: TimerToken) -> Result<TimerOutcome> {
        self.timers.fire(token)?;
        log::trace!("timer fired: {:?}", token);

        Ok(match token.kind {
            TimerKind::Countdown => TimerOutcome::Tick(self.on_tick()?),
            TimerKind::Agitation => {
                self.session.grid = self.agitation_frame();
                TimerOutcome::Agitated
            }
            TimerKind::AgitationEnd => {
                self.settle();
                TimerOutcome::Settled
            }
            TimerKind::PreviewEnd => {
                self.session.grid.set_all_face_up(false);
                self.session.phase = Phase::Playing;
                log::debug!("preview over");
                TimerOutcome::PreviewEnded
            }
            TimerKind::MismatchFlipBack => {
                self.flip_back();
                TimerOutcome::FlippedBack
            }
            TimerKind::AutoRestart => TimerOutcome::Restarted(self.start()?),
        })
    }

    pub fn reset(&mut self) -> Result<()> {
        if !self.can_reset() {
            return Err(GameError::NotTerminal);
        }

        self.timers.cancel_all();
        self.mismatched = None;
        self.dealt = None;
        let grid = Self::idle_grid(&self.config, &mut self.rng);
        self.session = Session::idle(grid, self.session.high_score);
        log::debug!("reset to idle");
        Ok(())
    }

    pub fn status_line(&self) -> String {
        let session = &self.session;
        let mut line = format!("Time: {}s", session.seconds_remaining);
        match self.config.mode() {
            Mode::Memory => {
                line += &format!(
                    " | Score: {} | Mismatches: {}/{}",
                    session.score,
                    session.mismatch_count,
                    self.config.max_mismatches()
                );
            }
            Mode::Shuffle => {
                line += &format!(" | Attempts: {}", self.attempts_left());
            }
        }
        if !session.message.is_empty() {
            line += " | ";
            line += &session.message;
        }
        line
    }

    fn idle_grid(config: &GameConfig, rng: &mut SmallRng) -> Grid {
        let mut grid = generator_for(config.mode()).generate(config, rng);
        // the shuffle table is on display before the first start
        grid.set_all_face_up(matches!(config.mode(), Mode::Shuffle));
        grid
    }

    fn check_can_start(&self) -> Result<()> {
        if self.can_start() {
            Ok(())
        } else {
            Err(GameError::AlreadyRunning)
        }
    }

    fn check_can_reshuffle(&self) -> Result<()> {
        if !matches!(self.config.mode(), Mode::Shuffle) {
            return Err(GameError::WrongMode);
        }
        if !matches!(self.session.phase, Phase::Resolving) {
            return Err(GameError::NotPlaying);
        }
        Ok(())
    }

    fn check_grid_shape(&self, grid: &Grid) -> Result<()> {
        let side = usize::from(self.config.grid_size());
        if grid.dim() == (side, side) {
            Ok(())
        } else {
            Err(GameError::InvalidGridSize {
                min: self.config.grid_size(),
                max: self.config.grid_size(),
            })
        }
    }

    fn begin_round(&mut self, deal: Grid) -> StartOutcome {
        self.timers.cancel_all();
        self.mismatched = None;
        self.dealt = None;

        let high_score = self.session.high_score;
        match self.config.mode() {
            Mode::Memory => {
                self.session = Session::idle(deal, high_score);
                self.arm_countdown();
                self.session.grid.set_all_face_up(true);
                self.session.phase = Phase::Revealing;
                self.timers.arm(
                    TimerKind::PreviewEnd,
                    Schedule::Once(self.config.timings().preview_ms),
                );
                log::debug!("round started, previewing");
                StartOutcome::Previewing
            }
            Mode::Shuffle => {
                let frame = self.agitation_frame();
                self.session = Session::idle(frame, high_score);
                self.arm_countdown();
                self.begin_agitation(deal)
            }
        }
    }

    fn arm_countdown(&mut self) {
        self.session.seconds_remaining = self.config.timer_secs();
        self.timers
            .arm(TimerKind::Countdown, Schedule::Every(TICK_MS));
    }

    fn begin_agitation(&mut self, deal: Grid) -> StartOutcome {
        let timings = self.config.timings();
        self.dealt = Some(deal);
        self.session.grid = self.agitation_frame();
        self.session.phase = Phase::Revealing;
        self.session.message.clear();
        self.timers.arm(
            TimerKind::Agitation,
            Schedule::Every(timings.agitation_interval_ms),
        );
        self.timers
            .arm(TimerKind::AgitationEnd, Schedule::Once(timings.agitation_ms));
        log::debug!("agitation started");
        StartOutcome::Shuffling
    }

    fn agitation_frame(&mut self) -> Grid {
        let mut frame = IndependentGenerator.generate(&self.config, &mut self.rng);
        frame.set_all_face_up(true);
        frame
    }

    /// Ends agitation on the dealt grid, face-down. The line check waits
    /// until the player has turned every card back up.
    fn settle(&mut self) {
        self.timers.cancel(TimerKind::Agitation);
        let mut grid = match self.dealt.take() {
            Some(grid) => grid,
            None => {
                log::warn!("agitation ended without a deal, dealing now");
                IndependentGenerator.generate(&self.config, &mut self.rng)
            }
        };
        grid.set_all_face_up(false);
        self.session.grid = grid;
        self.session.phase = Phase::Playing;
        log::debug!("grid settled");
    }

    fn flip_shuffle_card(&mut self, coords: Coord2) -> ClickOutcome {
        let card = &mut self.session.grid[coords];
        card.face_up = !card.face_up;

        if !self.session.grid.all_face_up() {
            return ClickOutcome::Flipped;
        }

        if let Some(line) = self.session.grid.uniform_line() {
            log::debug!("uniform line {:?}", line);
            self.win();
            return ClickOutcome::Won;
        }

        self.session.mismatch_count += 1;
        let attempts_left = self.attempts_left();
        if attempts_left == 0 {
            self.lose("Game over!");
            ClickOutcome::Lost
        } else {
            self.session.phase = Phase::Resolving;
            self.session.message = format!("No match. Attempts left: {}", attempts_left);
            ClickOutcome::NoLine
        }
    }

    fn pick_memory_card(&mut self, coords: Coord2) -> Result<ClickOutcome> {
        let card = self.session.grid[coords];
        if !card.is_pickable() {
            return Err(GameError::CardUnavailable);
        }
        self.session.grid[coords].face_up = true;

        let Some(first) = self.session.pending_first_pick.take() else {
            self.session.pending_first_pick = Some(Pick {
                coords,
                symbol: card.symbol,
            });
            return Ok(ClickOutcome::FirstPick);
        };

        if first.symbol == card.symbol {
            self.session.grid[first.coords].matched = true;
            self.session.grid[coords].matched = true;
            self.session.score += 10 * (self.session.streak + 1);
            self.session.streak += 1;

            if self.session.grid.all_matched() {
                self.win();
                return Ok(ClickOutcome::Won);
            }
            return Ok(ClickOutcome::Matched);
        }

        self.session.mismatch_count += 1;
        self.session.streak = 0;
        if self.session.mismatch_count >= self.config.max_mismatches() {
            self.lose("Too many mismatches!");
            return Ok(ClickOutcome::Lost);
        }

        self.session.phase = Phase::Resolving;
        self.mismatched = Some((first.coords, coords));
        self.timers.arm(
            TimerKind::MismatchFlipBack,
            Schedule::Once(self.config.timings().mismatch_ms),
        );
        Ok(ClickOutcome::Mismatched)
    }

    fn flip_back(&mut self) {
        if let Some((a, b)) = self.mismatched.take() {
            self.session.grid[a].face_up = false;
            self.session.grid[b].face_up = false;
        }
        self.session.pending_first_pick = None;
        self.session.phase = Phase::Playing;
    }

    fn win(&mut self) {
        self.timers.cancel_all();
        self.session.phase = Phase::Won;
        if self.session.score > self.session.high_score {
            self.session.high_score = self.session.score;
        }

        match self.config.mode() {
            Mode::Memory => {
                self.session.message = format!("You win! Score: {}", self.session.score);
                self.timers.arm(
                    TimerKind::AutoRestart,
                    Schedule::Once(self.config.timings().restart_ms),
                );
            }
            Mode::Shuffle => self.session.message = String::from("You win!"),
        }
        log::debug!("won with score {}", self.session.score);
    }

    fn lose(&mut self, message: &str) {
        self.timers.cancel_all();
        self.mismatched = None;
        self.dealt = None;
        self.session.pending_first_pick = None;
        self.session.phase = Phase::Lost;
        self.session.message = String::from(message);
        log::debug!("lost: {}", message);
    }
}
