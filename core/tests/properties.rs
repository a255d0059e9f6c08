use fruitmatch_core::*;
use proptest::prelude::*;

/// Enough distinct symbols for an 8x8 pair grid.
fn large_alphabet() -> Vec<String> {
    (0..4)
        .flat_map(|round| FRUITS.iter().map(move |fruit| format!("{fruit}-{round}")))
        .collect()
}

fn playing_memory(side: u8, seed: u64, max_mismatches: u32) -> (GameEngine, ManualClock) {
    let config =
        GameConfig::try_new(Mode::Memory, side, &large_alphabet(), 600, max_mismatches).unwrap();
    let preview_ms = config.timings().preview_ms;
    let mut engine = GameEngine::new(config, seed);
    let mut clock = ManualClock::new();
    engine.start().unwrap();
    clock.advance(&mut engine, preview_ms);
    assert_eq!(engine.phase(), Phase::Playing);
    (engine, clock)
}

proptest! {
    /// Property: a fresh memory grid holds every symbol in play exactly twice
    #[test]
    fn memory_grid_is_paired(side in prop::sample::select(vec![2u8, 4, 6, 8]), seed in any::<u64>()) {
        let (engine, _) = playing_memory(side, seed, 10);
        let counts = engine.grid().symbol_counts();

        prop_assert_eq!(counts.len(), usize::from(side) * usize::from(side) / 2);
        prop_assert!(counts.values().all(|&count| count == 2));
    }

    /// Property: clicks on face-up or matched cards never change phase, score or mismatches
    #[test]
    fn clicking_revealed_cards_is_idempotent(seed in any::<u64>(), clicks in prop::collection::vec((0u8..4, 0u8..4), 1..40)) {
        let (mut engine, mut clock) = playing_memory(4, seed, 1000);
        let mismatch_ms = engine.config().timings().mismatch_ms;
        for coords in clicks {
            let card = engine.grid()[coords];
            let playing = engine.phase() == Phase::Playing;
            let before = (engine.phase(), engine.session().score, engine.session().mismatch_count);
            let outcome = engine.on_cell_click(coords);
            if playing && (card.face_up || card.matched) {
                prop_assert_eq!(outcome, Err(GameError::CardUnavailable));
                prop_assert_eq!(
                    (engine.phase(), engine.session().score, engine.session().mismatch_count),
                    before
                );
            }
            clock.advance(&mut engine, mismatch_ms);
        }
    }

    /// Property: the mismatch counter stops at the budget
    #[test]
    fn mismatches_never_exceed_budget(seed in any::<u64>(), budget in 1u32..6, clicks in prop::collection::vec((0u8..4, 0u8..4), 1..80)) {
        let (mut engine, mut clock) = playing_memory(4, seed, budget);
        for coords in clicks {
            let _ = engine.on_cell_click(coords);
            prop_assert!(engine.session().mismatch_count <= budget);
            clock.advance(&mut engine, 500);
        }
        if engine.session().mismatch_count == budget {
            prop_assert_eq!(engine.phase(), Phase::Lost);
        }
    }

    /// Property: while a mismatch is resolving no click is accepted
    #[test]
    fn lock_rejects_every_click(seed in any::<u64>(), probe in (0u8..4, 0u8..4)) {
        let (mut engine, _) = playing_memory(4, seed, 10);
        let first = (0, 0);
        let symbol = engine.grid()[first].symbol;
        let second = iter_coords(4)
            .find(|&coords| engine.grid()[coords].symbol != symbol)
            .unwrap();

        engine.on_cell_click(first).unwrap();
        prop_assert_eq!(engine.on_cell_click(second), Ok(ClickOutcome::Mismatched));
        let before = engine.session().clone();

        prop_assert_eq!(engine.on_cell_click(probe), Err(GameError::InputLocked));
        prop_assert_eq!(engine.session(), &before);
    }

    /// Property: a shuffle round always ends in a terminal phase within its attempts
    #[test]
    fn shuffle_rounds_terminate(seed in any::<u64>()) {
        let config = GameConfig::shuffle();
        let agitation_ms = config.timings().agitation_ms;
        let attempts = config.max_mismatches();
        let mut engine = GameEngine::new(config, seed);
        let mut clock = ManualClock::new();
        engine.start().unwrap();

        for _ in 0..attempts {
            clock.advance(&mut engine, agitation_ms);
            for coords in iter_coords(3) {
                let _ = engine.on_cell_click(coords);
            }
            if engine.can_reshuffle() {
                engine.reshuffle().unwrap();
            }
        }

        prop_assert!(engine.phase().is_terminal());
        prop_assert!(!engine.timers().is_armed(TimerKind::Countdown));
    }
}
