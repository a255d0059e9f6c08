use clap::{Parser, ValueEnum};
use fruitmatch_core as game;

#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
pub(crate) enum ModeArg {
    Memory,
    Shuffle,
}

impl From<ModeArg> for game::Mode {
    fn from(mode: ModeArg) -> Self {
        match mode {
            ModeArg::Memory => game::Mode::Memory,
            ModeArg::Shuffle => game::Mode::Shuffle,
        }
    }
}

/// Options read from the page's URL fragment, e.g. `#--mode=shuffle&-vv`.
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
pub(crate) struct Args {
    /// What log level to use
    #[command(flatten)]
    pub verbose: clap_verbosity_flag::Verbosity,

    /// Game variant
    #[arg(short, long, value_enum, default_value_t = ModeArg::Memory)]
    pub mode: ModeArg,

    /// Grid side length
    #[arg(long)]
    pub size: Option<u8>,

    /// Countdown in seconds
    #[arg(long)]
    pub timer: Option<u32>,

    /// Mismatch budget (attempts in shuffle mode)
    #[arg(long)]
    pub mismatches: Option<u32>,

    /// Force a seed instead of random
    #[arg(short, long)]
    pub seed: Option<u64>,
}

impl Args {
    pub(crate) fn from_fragment(fragment: &str) -> Result<Self, clap::Error> {
        let args = fragment.split(['#', '&']).filter(|arg| !arg.is_empty());
        Self::try_parse_from(std::iter::once("fruitmatch").chain(args))
    }

    /// Builds the game configuration, falling back to the mode's preset when
    /// the requested combination is invalid.
    pub(crate) fn game_config(&self) -> game::GameConfig {
        let mode = game::Mode::from(self.mode);
        let preset = game::GameConfig::preset(mode);
        let timer = self.timer.unwrap_or(preset.timer_secs());
        let mismatches = self.mismatches.unwrap_or(preset.max_mismatches());

        match self.size {
            None => preset
                .with_timer_secs(timer)
                .with_max_mismatches(mismatches),
            Some(size) => game::GameConfig::try_new(
                mode,
                size,
                &game::FRUITS[..alphabet_len(mode, size)],
                timer,
                mismatches,
            )
            .unwrap_or_else(|err| {
                log::error!("invalid {} config for size {}: {}", mode.name(), size, err);
                preset
            }),
        }
    }
}

/// Shuffle tables always use four fruits. Pair grids take one fruit per pair.
fn alphabet_len(mode: game::Mode, size: u8) -> usize {
    match mode {
        game::Mode::Shuffle => 4,
        game::Mode::Memory => (usize::from(size) * usize::from(size) / 2).clamp(1, game::FRUITS.len()),
    }
}
