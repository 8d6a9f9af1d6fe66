//! Parksim entry point
//!
//! Native builds run a headless demo session: the autopilot drives each level
//! until it parks or runs out of time. The browser build starts from
//! `platform::web` instead.

#[cfg(not(target_arch = "wasm32"))]
fn main() -> Result<(), parksim::sim::CatalogError> {
    use parksim::Game;
    use parksim::sim::{Command, LevelCatalog, ProgressionState};

    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    log::info!("Parksim (native demo) starting...");

    let catalog = match std::env::args().nth(1) {
        Some(path) => {
            log::info!("Loading levels from {}", path);
            LevelCatalog::load(&path)?
        }
        None => LevelCatalog::builtin()?,
    };

    let mut game = Game::new(catalog);
    game.command(Command::Start);

    while let Some(index) = game.progression().playing_level() {
        if !demo::drive_level(&mut game) {
            log::warn!(
                "Autopilot could not park level {} within its time budget",
                index + 1
            );
            break;
        }
        if matches!(game.progression().state, ProgressionState::Success { .. }) {
            game.command(Command::Advance);
        }
    }

    let hud = game.hud();
    log::info!(
        "{} (session: {:.1}s, {} bumps)",
        hud.banner,
        hud.total_elapsed,
        hud.total_bumps
    );
    Ok(())
}

#[cfg(not(target_arch = "wasm32"))]
mod demo {
    use parksim::Game;
    use parksim::sim::autopilot::{autopilot, time_budget};

    /// Demo frame rate
    const FRAME_DT: f32 = 1.0 / 60.0;

    /// Let the autopilot drive until the level ends; false on timeout
    pub fn drive_level(game: &mut Game) -> bool {
        let Some(budget) = game.level().map(time_budget) else {
            return false;
        };
        let mut t = 0.0;
        let mut next_report = 1.0;

        while game.progression().playing_level().is_some() {
            if t >= budget {
                return false;
            }
            let (Some(car), Some(level), Some(volumes)) =
                (game.vehicle(), game.level(), game.volumes())
            else {
                return false;
            };
            let intent = autopilot(car, level, volumes);
            game.set_intent(intent);
            game.update(FRAME_DT);
            t += FRAME_DT;

            if t >= next_report {
                let hud = game.hud();
                log::debug!(
                    "t={:.1}s speed={:.2} heading={:.0}° bumps={}",
                    hud.elapsed,
                    hud.speed,
                    hud.heading_degrees,
                    hud.bumps
                );
                next_report += 1.0;
            }
        }
        game.set_intent(Default::default());
        true
    }
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is platform::web::wasm_main, this is just to satisfy the compiler
}
