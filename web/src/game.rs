use crate::utils::*;
use bitflags::bitflags;
use fruitmatch_core as game;
use game::{Snapshot, TimerCommand, TimerKind, TimerToken};
use gloo::timers::callback::{Interval, Timeout};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use yew::prelude::*;

pub trait HasUpdate {
    fn has_update(self) -> bool;
}

impl<E> HasUpdate for Result<game::StartOutcome, E> {
    fn has_update(self) -> bool {
        self.map_or(false, |outcome| outcome.has_update())
    }
}

impl<E> HasUpdate for Result<game::ClickOutcome, E> {
    fn has_update(self) -> bool {
        self.map_or(false, |outcome| outcome.has_update())
    }
}

impl<E: std::fmt::Display> HasUpdate for Result<game::TimerOutcome, E> {
    fn has_update(self) -> bool {
        match self {
            Ok(outcome) => outcome.has_update(),
            Err(err) => {
                log::trace!("timer ignored: {}", err);
                false
            }
        }
    }
}

bitflags! {
    #[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
    struct MouseButtons: u16 {
        const LEFT    = 1;
        const RIGHT   = 1 << 1;
        const MIDDLE  = 1 << 2;
        const BACK    = 1 << 3;
        const FORWARD = 1 << 4;
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
pub(crate) struct CardPointerState {
    pos: game::Coord2,
    buttons: MouseButtons,
}

#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
pub(crate) enum CardMsg {
    Update(CardPointerState),
    Leave,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub(crate) enum Msg {
    CardEvent(CardMsg),
    /// Start a round, or reshuffle after a failed line check.
    Start,
    Reset,
    Timer(TimerToken),
}

/// Card to flip when every button has been released, if the press was a
/// plain left click.
fn released_card(pressed: Option<CardPointerState>) -> Option<game::Coord2> {
    match pressed {
        Some(CardPointerState {
            pos,
            buttons: MouseButtons::LEFT,
        }) => Some(pos),
        _ => None,
    }
}

fn card_classes(cell: &game::CellSnapshot, pressed: bool) -> Vec<String> {
    let mut names = vec!["card".to_string()];
    match &cell.symbol {
        Some(symbol) => {
            names.push("face-up".to_string());
            names.push(format!("fruit-{}", symbol));
        }
        None => names.push("face-down".to_string()),
    }
    if cell.matched {
        names.push("matched".to_string());
    }
    if !cell.interactive {
        names.push("locked".to_string());
    }
    if pressed && cell.interactive {
        names.push("pressed".to_string());
    }
    names
}

fn card_image(cell: &game::CellSnapshot) -> String {
    match &cell.symbol {
        Some(symbol) => format!("{}.png", symbol),
        None => "card-back.png".to_string(),
    }
}

const fn phase_class(phase: game::Phase) -> &'static str {
    use game::Phase::*;
    match phase {
        Idle => "not-started",
        Revealing => "revealing",
        Playing => "in-progress",
        Resolving => "resolving",
        Won => "win",
        Lost => "lose",
    }
}

fn start_label(snapshot: &Snapshot) -> &'static str {
    match snapshot.phase {
        _ if snapshot.reshuffle_enabled => "Shuffle",
        game::Phase::Idle => "Start",
        _ => "Play again",
    }
}

#[derive(Properties, Clone, PartialEq)]
struct CardProps {
    cell: game::CellSnapshot,
    #[prop_or_default]
    pressed: bool,
    callback: Callback<CardMsg>,
}

#[function_component(CardView)]
fn card_component(props: &CardProps) -> Html {
    let CardProps {
        cell,
        pressed,
        callback,
    } = props.clone();
    let pos = cell.coords;
    let class = classes!(card_classes(&cell, pressed));
    let src = card_image(&cell);
    let alt = cell.symbol.clone().unwrap_or_else(|| "card".to_string());

    let pointer = move |label: &'static str| {
        let callback = callback.clone();
        Callback::from(move |e: MouseEvent| {
            let buttons = MouseButtons::from_bits_truncate(e.buttons());
            callback.emit(CardMsg::Update(CardPointerState { pos, buttons }));
            log::trace!("{:?} mouse {} ({:?})", pos, label, buttons);
        })
    };
    let interactive = cell.interactive;
    let onmousedown = interactive.then(|| pointer("down"));
    let onmouseup = interactive.then(|| pointer("up"));
    let onmouseenter = interactive.then(|| pointer("enter"));
    let onmouseleave = interactive.then(|| {
        let callback = props.callback.clone();
        Callback::from(move |_: MouseEvent| {
            callback.emit(CardMsg::Leave);
            log::trace!("{:?} mouse leave", pos);
        })
    });

    html! {
        <td {class} {onmousedown} {onmouseup} {onmouseenter} {onmouseleave}>
            <img {src} {alt}/>
        </td>
    }
}

enum ScheduledTimer {
    Repeating(TimerToken, Interval),
    OneShot(TimerToken, Timeout),
}

impl ScheduledTimer {
    fn token(&self) -> TimerToken {
        match self {
            Self::Repeating(token, _) | Self::OneShot(token, _) => *token,
        }
    }
}

impl std::fmt::Debug for ScheduledTimer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_tuple("ScheduledTimer").field(&self.token()).finish()
    }
}

#[derive(Properties, Debug, Clone, PartialEq)]
pub(crate) struct GameProps {
    pub config: game::GameConfig,
    pub seed: u64,
}

#[derive(Debug)]
pub(crate) struct GameView {
    engine: game::GameEngine,
    current_card_state: Option<CardPointerState>,
    // dropping a gloo handle cancels it
    timers: HashMap<TimerKind, ScheduledTimer>,
}

impl GameView {
    fn apply_timer_commands(&mut self, ctx: &Context<Self>) {
        for command in self.engine.take_timer_commands() {
            match command {
                TimerCommand::Arm { token, schedule } => {
                    let link = ctx.link().clone();
                    let fire = move || link.send_message(Msg::Timer(token));
                    let scheduled = match schedule {
                        game::Schedule::Every(ms) => {
                            ScheduledTimer::Repeating(token, Interval::new(ms, fire))
                        }
                        game::Schedule::Once(ms) => {
                            ScheduledTimer::OneShot(token, Timeout::new(ms, fire))
                        }
                    };
                    self.timers.insert(token.kind, scheduled);
                }
                TimerCommand::Cancel(token) => {
                    if self
                        .timers
                        .get(&token.kind)
                        .is_some_and(|scheduled| scheduled.token() == token)
                    {
                        self.timers.remove(&token.kind);
                    }
                }
            }
        }
    }

    fn start_or_reshuffle(&mut self) -> bool {
        if self.engine.can_start() {
            log::debug!("start");
            self.engine.start().has_update()
        } else if self.engine.can_reshuffle() {
            log::debug!("reshuffle");
            self.engine.reshuffle().has_update()
        } else {
            false
        }
    }

    fn flip_card(&mut self, coords: game::Coord2) -> bool {
        match self.engine.on_cell_click(coords) {
            Ok(outcome) => {
                log::debug!("flip {:?}: {:?}", coords, outcome);
                outcome.has_update()
            }
            Err(err) => {
                log::trace!("flip {:?} ignored: {}", coords, err);
                false
            }
        }
    }

    fn is_pressed(&self, coords: game::Coord2) -> bool {
        released_card(self.current_card_state) == Some(coords)
    }
}

impl Component for GameView {
    type Message = Msg;
    type Properties = GameProps;

    fn create(ctx: &Context<Self>) -> Self {
        let GameProps { config, seed } = ctx.props().clone();
        Self {
            engine: game::GameEngine::new(config, seed),
            current_card_state: None,
            timers: HashMap::new(),
        }
    }

    fn update(&mut self, ctx: &Context<Self>, msg: Self::Message) -> bool {
        use CardMsg::*;
        use Msg::*;

        let updated = match msg {
            CardEvent(Leave) => {
                log::trace!("card leave");
                self.current_card_state.take().is_some()
            }
            CardEvent(Update(card_state)) => {
                log::trace!("card update: {:?}", card_state);
                if card_state.buttons.is_empty() {
                    match released_card(self.current_card_state.take()) {
                        Some(pos) => {
                            self.flip_card(pos);
                            true
                        }
                        None => false,
                    }
                } else {
                    self.current_card_state.replace(card_state) != Some(card_state)
                }
            }
            Start => self.start_or_reshuffle(),
            Reset => match self.engine.reset() {
                Ok(()) => true,
                Err(err) => {
                    log::trace!("reset ignored: {}", err);
                    false
                }
            },
            Timer(token) => self.engine.on_timer(token).has_update(),
        };

        self.apply_timer_commands(ctx);
        updated
    }

    fn view(&self, ctx: &Context<Self>) -> Html {
        let snapshot = Snapshot::from_engine(&self.engine);
        let side = snapshot.side;
        let start_enabled = snapshot.start_enabled || snapshot.reshuffle_enabled;
        let right_counter = match snapshot.mode {
            game::Mode::Memory => snapshot.score as i32,
            game::Mode::Shuffle => snapshot.attempts_left as i32,
        };

        let cb_start = ctx.link().callback(|e: MouseEvent| {
            e.stop_propagation();
            Msg::Start
        });
        let cb_reset = ctx.link().callback(|_| Msg::Reset);

        html! {
            <div class={classes!("fruitmatch", snapshot.mode.name())}>
                <nav>
                    <aside>{format_for_counter(snapshot.seconds_remaining as i32)}</aside>
                    <span>
                        <button class={phase_class(snapshot.phase)} onclick={cb_start} disabled={!start_enabled}>
                            {start_label(&snapshot)}
                        </button>
                    </span>
                    <aside>{format_for_counter(right_counter)}</aside>
                </nav>
                <table class={classes!(matches!(snapshot.phase, game::Phase::Playing).then_some("playable"))}>
                    {
                        for (0..side).map(|row| html! {
                            <tr>
                                {
                                    for (0..side).filter_map(|col| snapshot.cell((row, col))).map(|cell| {
                                        let pressed = self.is_pressed(cell.coords);
                                        let callback = ctx.link().callback(Msg::CardEvent);
                                        html! {
                                            <CardView cell={cell.clone()} {pressed} {callback}/>
                                        }
                                    })
                                }
                            </tr>
                        })
                    }
                </table>
                <footer>
                    <button onclick={cb_reset} disabled={!snapshot.reset_enabled}>{"Reset"}</button>
                    <p>{snapshot.status_line.clone()}</p>
                    <small>{format!("Best: {}", snapshot.high_score)}</small>
                </footer>
            </div>
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cell(symbol: Option<&str>, matched: bool, interactive: bool) -> game::CellSnapshot {
        game::CellSnapshot {
            coords: (0, 0),
            symbol: symbol.map(str::to_string),
            face_up: symbol.is_some(),
            matched,
            interactive,
        }
    }

    #[test]
    fn left_press_release_flips_the_pressed_card() {
        let pressed = CardPointerState {
            pos: (1, 2),
            buttons: MouseButtons::LEFT,
        };
        assert_eq!(released_card(Some(pressed)), Some((1, 2)));
    }

    #[test]
    fn chorded_or_right_press_flips_nothing() {
        let chord = CardPointerState {
            pos: (1, 2),
            buttons: MouseButtons::LEFT | MouseButtons::RIGHT,
        };
        let right = CardPointerState {
            pos: (1, 2),
            buttons: MouseButtons::RIGHT,
        };
        assert_eq!(released_card(Some(chord)), None);
        assert_eq!(released_card(Some(right)), None);
        assert_eq!(released_card(None), None);
    }

    #[test]
    fn face_down_card_shows_back() {
        let cell = cell(None, false, true);
        assert_eq!(card_classes(&cell, false), ["card", "face-down"]);
        assert_eq!(card_image(&cell), "card-back.png");
    }

    #[test]
    fn matched_card_is_locked_and_named() {
        let cell = cell(Some("cherry"), true, false);
        assert_eq!(
            card_classes(&cell, true),
            ["card", "face-up", "fruit-cherry", "matched", "locked"]
        );
        assert_eq!(card_image(&cell), "cherry.png");
    }

    #[test]
    fn start_button_label_follows_phase() {
        let mut engine = game::GameEngine::new(game::GameConfig::memory(), 1);
        assert_eq!(start_label(&Snapshot::from_engine(&engine)), "Start");

        engine.start().unwrap();
        assert_eq!(start_label(&Snapshot::from_engine(&engine)), "Play again");
        assert_eq!(phase_class(engine.phase()), "revealing");
    }

    #[test]
    fn stale_timer_is_not_an_update() {
        let mut engine = game::GameEngine::new(game::GameConfig::memory(), 1);
        engine.start().unwrap();
        let token = engine.timers().armed_token(TimerKind::PreviewEnd).unwrap();

        assert!(engine.on_timer(token).has_update());
        assert!(!engine.on_timer(token).has_update());
    }
}
