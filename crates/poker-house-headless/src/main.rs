use std::process::ExitCode;

use poker_house::input::queue::Key;
use poker_house::{GameConfig, GameEvent, InputEvent, PokerHouse};
use poker_house_headless::{init_logging, load_config, SessionRunner};

const DEFAULT_FRAMES: u32 = 600;
const FRAME_DT: f32 = 1.0 / 60.0;

/// Scripted input: (frame, event). Turns to the pistol, picks it up, turns
/// back toward the dealer and empties the magazine.
fn script() -> Vec<(u32, InputEvent)> {
    let tap = |frame: u32, key: Key| {
        [
            (frame, InputEvent::KeyDown { key }),
            (frame + 1, InputEvent::KeyUp { key }),
        ]
    };
    let mut events = vec![(10, InputEvent::MouseMove { dx: 500.0, dy: 310.0 })];
    events.extend(tap(20, Key::Interact));
    events.push((40, InputEvent::MouseMove { dx: -500.0, dy: -310.0 }));
    for i in 0..6 {
        events.extend(tap(60 + i * 30, Key::Use));
    }
    events.push((300, InputEvent::KeyDown { key: Key::Forward }));
    events.push((360, InputEvent::KeyUp { key: Key::Forward }));
    events
}

fn main() -> ExitCode {
    init_logging();

    let mut args = std::env::args().skip(1);
    let config = match args.next() {
        Some(path) => match load_config(&path) {
            Ok(config) => config,
            Err(e) => {
                log::error!("{}", e);
                return ExitCode::FAILURE;
            }
        },
        None => GameConfig::default(),
    };
    let frames = match args.next().map(|s| s.parse::<u32>()) {
        Some(Ok(n)) => n,
        Some(Err(e)) => {
            log::error!("invalid frame count: {}", e);
            return ExitCode::FAILURE;
        }
        None => DEFAULT_FRAMES,
    };

    let mut runner = SessionRunner::new(PokerHouse::new(config));
    runner.init();

    let script = script();
    let mut steps = 0;
    let mut kills = 0;
    let mut shots = 0;
    for frame in 0..frames {
        for (_, event) in script.iter().filter(|(f, _)| *f == frame) {
            runner.push_input(*event);
        }
        steps += runner.tick(FRAME_DT);
        for event in runner.events() {
            log::debug!("frame {}: {:?}", frame, event);
            match event {
                GameEvent::Shot { .. } => shots += 1,
                GameEvent::Killed { .. } => kills += 1,
                _ => {}
            }
        }
    }

    let ctx = runner.context();
    log::info!("ran {} frames ({} steps)", frames, steps);
    log::info!("entities: {}, draw instances: {}", ctx.scene.len(), runner.instance_count());
    log::info!("shots: {}, kills: {}", shots, kills);
    if let Some(player) = runner.game().player() {
        let held = player.inventory(ctx).map_or(0, |inv| inv.len());
        log::info!(
            "player alive: {}, seated: {}, stacks held: {}, insanity: {:.2}",
            player.is_alive(ctx),
            player.is_seated(ctx),
            held,
            player.insanity().insanity()
        );
    }
    log::info!("trip active: {}", ctx.effects.trip.is_active());
    ExitCode::SUCCESS
}
