//! Dodge Arena entry point
//!
//! Runs a headless demo match: the human slot is driven by the autopilot and
//! frames of uneven length are fed through the fixed stepper.
//!
//! Usage: `dodge-arena [config.json]`

use dodge_arena::MatchConfig;
use dodge_arena::sim::{FixedStepper, GamePhase, MatchState, TickInput};

/// Give up after this much simulated time
const MAX_MATCH_SECS: f32 = 180.0;

/// Frame lengths cycled to mimic an uneven display clock
const FRAME_TIMES: [f32; 4] = [1.0 / 60.0, 1.0 / 45.0, 1.0 / 75.0, 1.0 / 30.0];

fn load_config() -> Result<MatchConfig, String> {
    match std::env::args().nth(1) {
        Some(path) => {
            let json = std::fs::read_to_string(&path)
                .map_err(|e| format!("Failed to read {}: {}", path, e))?;
            MatchConfig::from_json(&json).map_err(|e| e.to_string())
        }
        None => Ok(MatchConfig::default()),
    }
}

fn main() {
    env_logger::init();
    log::info!("Dodge Arena (headless) starting...");

    let config = match load_config() {
        Ok(config) => config,
        Err(e) => {
            log::error!("{}", e);
            std::process::exit(1);
        }
    };

    let mut state = match MatchState::new(&config) {
        Ok(state) => state,
        Err(e) => {
            log::error!("Invalid match config: {}", e);
            std::process::exit(1);
        }
    };

    let mut stepper = FixedStepper::default();
    let input = TickInput {
        autopilot: true,
        ..Default::default()
    };

    let mut elapsed = 0.0;
    let mut frame = 0;
    while state.phase != GamePhase::Over && elapsed < MAX_MATCH_SECS {
        let frame_dt = FRAME_TIMES[frame % FRAME_TIMES.len()];
        let (_, report) = stepper.advance(&mut state, &input, frame_dt);
        for kill in &report.kills {
            log::info!(
                "[{:>6.2}s] {} eliminated {}",
                state.clock,
                state.players[kill.killer as usize].nickname,
                state.players[kill.victim as usize].nickname
            );
        }
        elapsed += frame_dt;
        frame += 1;
    }

    let score = state.score();
    match state.outcome {
        Some(outcome) => log::info!("Result: {:?}", outcome),
        None => log::info!("No result after {:.0}s", MAX_MATCH_SECS),
    }
    match serde_json::to_string(&score) {
        Ok(json) => println!("{}", json),
        Err(e) => log::error!("Failed to serialize score: {}", e),
    }
}
