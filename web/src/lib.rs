use clap::Parser;
use wasm_bindgen::prelude::*;

mod game;
mod settings;
mod utils;

#[wasm_bindgen(start)]
pub fn run_app() -> Result<(), JsValue> {
    use gloo::utils::{document, window};

    #[cfg(feature = "console_error_panic_hook")]
    {
        console_error_panic_hook::set_once();
    }

    let location_hash = window().location().hash().unwrap_or_default();
    let (args, parse_error) = match settings::Args::from_fragment(&location_hash) {
        Ok(args) => (args, None),
        Err(err) => (settings::Args::parse_from(["fruitmatch"]), Some(err)),
    };

    let log_level = args.verbose.log_level().unwrap_or(log::Level::Warn);
    console_log::init_with_level(log_level).map_err(|err| JsValue::from_str(&err.to_string()))?;
    if let Some(err) = parse_error {
        log::error!("could not parse {:?}: {}", location_hash, err);
    }

    let seed = args.seed.unwrap_or_else(utils::js_random_seed);
    let config = args.game_config();
    log::debug!("{} mode, seed: {}", config.mode().name(), seed);

    let root = document()
        .get_element_by_id("game")
        .ok_or_else(|| JsValue::from_str("could not find id=\"game\" element"))?;

    yew::Renderer::<game::GameView>::with_root_and_props(root, game::GameProps { config, seed })
        .render();
    log::debug!("App started");
    Ok(())
}
