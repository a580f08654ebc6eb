//! Snowball Fight entry point
//!
//! Runs a headless demo match: both avatars are driven by the seeded demo AI
//! at the fixed simulation tick until someone is hit or time runs out.

#[cfg(not(target_arch = "wasm32"))]
const SETTINGS_PATH: &str = "snowball-fight.json";

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    use snowball_fight::Settings;
    use snowball_fight::consts::*;
    use snowball_fight::renderer::RenderFrame;
    use snowball_fight::sim::{MatchEvent, MatchState, ProjectileEvent, TickInput, tick};

    env_logger::init();
    log::info!("Snowball Fight (headless demo) starting...");

    let path = std::env::args().nth(1).unwrap_or_else(|| SETTINGS_PATH.to_string());
    let settings = Settings::load_or_default(&path);
    let mut state = MatchState::new(settings.tuning.clone(), settings.seed);

    let input = TickInput {
        idle_mode: true,
        ..Default::default()
    };

    // Feed 60 Hz frames through the fixed-step accumulator
    let frame_dt: f32 = 1.0 / 60.0;
    let mut accumulator = 0.0;
    let mut ticks = 0u32;
    let mut throws = 0u32;
    let mut deposits = 0u32;

    'frames: while ticks < settings.demo_ticks {
        accumulator += frame_dt;
        let mut substeps = 0;
        while accumulator >= SIM_DT && substeps < MAX_SUBSTEPS {
            tick(&mut state, &input, SIM_DT);
            accumulator -= SIM_DT;
            substeps += 1;
            ticks += 1;

            for event in &state.events {
                match event {
                    MatchEvent::Thrown { .. } => throws += 1,
                    MatchEvent::ProjectileStopped { event, .. } => {
                        if let ProjectileEvent::HitWall { deposit } | ProjectileEvent::HitSnow { deposit } =
                            event
                            && deposit.is_accepted()
                        {
                            deposits += 1;
                        }
                    }
                    _ => {}
                }
            }

            if state.winner().is_some() {
                break 'frames;
            }
        }
    }

    let frame = RenderFrame::build(&state);
    log::info!(
        "{} ticks, {} throws, {} deposits, {} snow columns drawn",
        ticks,
        throws,
        deposits,
        frame.snow.len()
    );
    match state.winner() {
        Some(winner) => println!("{} wins after {} ticks", winner.name(), ticks),
        None => println!("No winner after {} ticks", ticks),
    }
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // The headless demo only targets native builds
}
