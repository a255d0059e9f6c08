use alloc::string::String;
use alloc::vec::Vec;
use serde::{Deserialize, Serialize};

use crate::*;

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct CellSnapshot {
    pub coords: Coord2,
    /// `None` while the card is face-down.
    pub symbol: Option<String>,
    pub face_up: bool,
    pub matched: bool,
    pub interactive: bool,
}

/// Everything a renderer needs for one frame.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Snapshot {
    pub mode: Mode,
    pub side: Coord,
    pub cells: Vec<CellSnapshot>,
    pub phase: Phase,
    pub seconds_remaining: u32,
    pub score: u32,
    pub streak: u32,
    pub high_score: u32,
    pub mismatch_count: u32,
    pub attempts_left: u32,
    pub message: String,
    pub status_line: String,
    pub start_enabled: bool,
    pub reshuffle_enabled: bool,
    pub reset_enabled: bool,
}

impl Snapshot {
    pub fn from_engine(engine: &GameEngine) -> Self {
        let config = engine.config();
        let session = engine.session();
        let cells = engine
            .grid()
            .iter()
            .map(|(coords, card)| CellSnapshot {
                coords,
                symbol: card
                    .face_up
                    .then(|| String::from(config.symbol_name(card.symbol))),
                face_up: card.face_up,
                matched: card.matched,
                interactive: engine.can_interact_at(coords),
            })
            .collect();

        Self {
            mode: config.mode(),
            side: engine.grid().side(),
            cells,
            phase: session.phase,
            seconds_remaining: session.seconds_remaining,
            score: session.score,
            streak: session.streak,
            high_score: session.high_score,
            mismatch_count: session.mismatch_count,
            attempts_left: engine.attempts_left(),
            message: session.message.clone(),
            status_line: engine.status_line(),
            start_enabled: engine.can_start(),
            reshuffle_enabled: engine.can_reshuffle(),
            reset_enabled: engine.can_reset(),
        }
    }

    pub fn cell(&self, coords: Coord2) -> Option<&CellSnapshot> {
        if coords.0 >= self.side || coords.1 >= self.side {
            return None;
        }
        self.cells
            .get(usize::from(coords.0) * usize::from(self.side) + usize::from(coords.1))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn idle_snapshot_hides_symbols_and_offers_start() {
        let engine = GameEngine::new(GameConfig::memory(), 11);
        let snapshot = Snapshot::from_engine(&engine);

        assert_eq!(snapshot.cells.len(), 16);
        assert!(snapshot.cells.iter().all(|cell| cell.symbol.is_none()));
        assert!(snapshot.cells.iter().all(|cell| !cell.interactive));
        assert!(snapshot.start_enabled);
        assert!(!snapshot.reset_enabled);
    }

    #[test]
    fn playing_snapshot_names_face_up_symbols() {
        let mut engine = GameEngine::new(GameConfig::memory(), 11);
        let grid = Grid::from_symbols(4, &[0, 0, 1, 1, 2, 2, 3, 3, 4, 4, 5, 5, 6, 6, 7, 7]).unwrap();
        engine.start_with_grid(grid).unwrap();
        let preview = engine.timers().armed_token(TimerKind::PreviewEnd).unwrap();
        engine.on_timer(preview).unwrap();
        engine.on_cell_click((3, 3)).unwrap();

        let snapshot = Snapshot::from_engine(&engine);
        let cell = snapshot.cell((3, 3)).unwrap();
        assert_eq!(cell.symbol.as_deref(), Some("strawberry"));
        assert!(!cell.interactive);
        assert!(snapshot.cell((0, 0)).unwrap().interactive);
        assert!(snapshot.cell((4, 0)).is_none());
        assert!(!snapshot.start_enabled);
    }

    #[test]
    fn snapshot_serializes_for_the_renderer() {
        let engine = GameEngine::new(GameConfig::shuffle(), 11);
        let json = serde_json::to_value(Snapshot::from_engine(&engine)).unwrap();

        assert_eq!(json["mode"], "Shuffle");
        assert_eq!(json["side"], 3);
        assert_eq!(json["cells"].as_array().unwrap().len(), 9);
    }
}
