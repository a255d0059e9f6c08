use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

use crate::*;

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TimerKind {
    /// One-second countdown.
    Countdown,
    /// Repeating re-randomization during shuffle agitation.
    Agitation,
    /// End of the agitation sub-phase.
    AgitationEnd,
    /// End of the memory-mode preview.
    PreviewEnd,
    /// Turns a mismatched pair back face-down.
    MismatchFlipBack,
    /// Starts a new round after a memory-mode win.
    AutoRestart,
}

impl TimerKind {
    pub const ALL: [TimerKind; 6] = [
        Self::Countdown,
        Self::Agitation,
        Self::AgitationEnd,
        Self::PreviewEnd,
        Self::MismatchFlipBack,
        Self::AutoRestart,
    ];

    const fn slot(self) -> usize {
        match self {
            Self::Countdown => 0,
            Self::Agitation => 1,
            Self::AgitationEnd => 2,
            Self::PreviewEnd => 3,
            Self::MismatchFlipBack => 4,
            Self::AutoRestart => 5,
        }
    }
}

/// Identifies one arming of a timer. A token fired after its slot was
/// re-armed or cancelled is stale.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TimerToken {
    pub kind: TimerKind,
    pub generation: u32,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Schedule {
    Once(Millis),
    Every(Millis),
}

impl Schedule {
    pub const fn delay(self) -> Millis {
        match self {
            Self::Once(ms) | Self::Every(ms) => ms,
        }
    }

    pub const fn is_repeating(self) -> bool {
        matches!(self, Self::Every(_))
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum TimerCommand {
    Arm { token: TimerToken, schedule: Schedule },
    Cancel(TimerToken),
}

pub type TimerCommands = SmallVec<[TimerCommand; 8]>;

#[derive(Copy, Clone, Debug, PartialEq)]
struct Armed {
    token: TimerToken,
    schedule: Schedule,
}

/// At most one armed timer per kind, plus the queue of commands the
/// clock still has to apply.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Timers {
    slots: [Option<Armed>; TimerKind::ALL.len()],
    generation: u32,
    pending: TimerCommands,
}

impl Timers {
    pub fn arm(&mut self, kind: TimerKind, schedule: Schedule) -> TimerToken {
        self.cancel(kind);
        self.generation = self.generation.wrapping_add(1);
        let token = TimerToken {
            kind,
            generation: self.generation,
        };
        self.slots[kind.slot()] = Some(Armed { token, schedule });
        self.pending.push(TimerCommand::Arm { token, schedule });
        log::trace!("arm {:?} ({:?})", token, schedule);
        token
    }

    pub fn cancel(&mut self, kind: TimerKind) {
        if let Some(armed) = self.slots[kind.slot()].take() {
            self.pending.push(TimerCommand::Cancel(armed.token));
            log::trace!("cancel {:?}", armed.token);
        }
    }

    pub fn cancel_all(&mut self) {
        for kind in TimerKind::ALL {
            self.cancel(kind);
        }
    }

    pub fn is_armed(&self, kind: TimerKind) -> bool {
        self.slots[kind.slot()].is_some()
    }

    pub fn armed_token(&self, kind: TimerKind) -> Option<TimerToken> {
        self.slots[kind.slot()].map(|armed| armed.token)
    }

    /// Accepts a firing if `token` is the live arming of its kind. One-shot
    /// timers are disarmed by firing.
    pub fn fire(&mut self, token: TimerToken) -> Result<()> {
        let slot = &mut self.slots[token.kind.slot()];
        match *slot {
            Some(armed) if armed.token == token => {
                if !armed.schedule.is_repeating() {
                    *slot = None;
                }
                Ok(())
            }
            _ => Err(GameError::StaleTimer),
        }
    }

    pub fn take_commands(&mut self) -> TimerCommands {
        core::mem::take(&mut self.pending)
    }
}
