//! Pocket Arcade headless demo
//!
//! Runs each game for a while under a fixed-timestep loop with a simple
//! autoplayer, logging game events and printing the final snapshot.
//!
//! Usage: `pocket-arcade [settings.json] [seed] [game]`

use pocket_arcade::audio::{AudioManager, LogSink};
use pocket_arcade::consts::{MAX_SUBSTEPS, SIM_DT};
use pocket_arcade::sim::GameKind;
use pocket_arcade::{Arcade, ConfigError, Settings};

/// Simulated render frame time (a slightly uneven 50 Hz display)
const FRAME_DT: [f32; 3] = [0.019, 0.020, 0.021];

/// Seconds of play per game
const PLAY_SECONDS: f32 = 20.0;

/// Demo driver holding the arcade and the frame accumulator
struct Demo {
    arcade: Arcade,
    accumulator: f32,
    ticks: u64,
}

impl Demo {
    fn new(arcade: Arcade) -> Self {
        Self {
            arcade,
            accumulator: 0.0,
            ticks: 0,
        }
    }

    /// Run simulation ticks for one render frame
    fn update(&mut self, dt: f32) {
        let dt = dt.min(0.1);
        self.accumulator += dt;

        let mut substeps = 0;
        while self.accumulator >= SIM_DT && substeps < MAX_SUBSTEPS {
            if self.wants_press() {
                self.arcade.press();
            }
            self.arcade.tick();
            self.ticks += 1;
            self.accumulator -= SIM_DT;
            substeps += 1;
        }

        for (kind, event) in self.arcade.drain_events() {
            log::info!("[{}] {:?}", kind.as_str(), event);
        }
    }

    /// Autoplayer: decide whether to press on this tick
    fn wants_press(&self) -> bool {
        match self.arcade.focused() {
            // Tap every third of a second
            Some(GameKind::Balloon) => self.ticks % 20 == 0,
            // Drop when well aligned with the top of the stack
            Some(GameKind::Stacking) => {
                let stacking = self.arcade.stacking();
                match (stacking.current(), stacking.stack().last()) {
                    (Some(block), Some(top)) => {
                        (block.offset.x - top.offset.x).abs() < stacking.block_size() * 0.1
                            && self.ticks % 7 == 0
                    }
                    (Some(_), None) => self.ticks % 90 == 0,
                    _ => false,
                }
            }
            // Pick the highlighted option when it matches, or now and then at random
            Some(GameKind::Matching) => {
                let matching = self.arcade.matching();
                matching.highlighted_shape() == matching.target() || self.ticks % 211 == 0
            }
            None => false,
        }
    }

    fn play(&mut self, kind: GameKind, seconds: f32) {
        self.arcade.open(kind);
        let mut elapsed = 0.0;
        let mut frame = 0;
        while elapsed < seconds {
            let dt = FRAME_DT[frame % FRAME_DT.len()];
            self.update(dt);
            elapsed += dt;
            frame += 1;
        }

        match self.arcade.snapshot_json() {
            Ok(Some(json)) => println!("{} final state:\n{:#}", kind.as_str(), json),
            Ok(None) => {}
            Err(e) => log::warn!("Snapshot failed: {}", e),
        }
        self.arcade.close();
    }
}

fn run() -> Result<(), ConfigError> {
    let mut args = std::env::args().skip(1);
    let settings = match args.next() {
        Some(path) => Settings::load_or_default(path),
        None => Settings::default(),
    };
    let seed = args
        .next()
        .and_then(|s| s.parse::<u64>().ok())
        .unwrap_or(0x5EED);

    let games: Vec<GameKind> = match args.next() {
        Some(name) => match GameKind::from_name(&name) {
            Some(kind) => vec![kind],
            None => {
                log::warn!("Unknown game '{}', playing all of them", name);
                GameKind::ALL.to_vec()
            }
        },
        None => GameKind::ALL.to_vec(),
    };

    let audio = AudioManager::new(Box::new(LogSink)).with_settings(&settings.audio);
    let arcade = Arcade::new(&settings, seed)?.with_audio(audio);
    log::info!("Game initialized with seed: {}", seed);

    let mut demo = Demo::new(arcade);
    for kind in games {
        demo.play(kind, PLAY_SECONDS);
    }
    Ok(())
}

fn main() {
    env_logger::init();
    log::info!("Pocket Arcade (headless) starting...");

    if let Err(e) = run() {
        log::error!("{}", e);
        std::process::exit(1);
    }
}
