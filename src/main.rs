/// Entry point and frame loop.

mod config;
mod domain;
mod sim;
mod ui;

use std::fs::File;
use std::time::{Duration, Instant};

use crossterm::event::KeyCode;

use config::GameConfig;
use domain::character::default_roster;
use domain::entity::FrameInput;
use sim::game::GameLoop;
use ui::asset::AssetProvider;
use ui::canvas::Viewport;
use ui::gamepad::GamepadState;
use ui::input::InputState;
use ui::renderer::Renderer;

fn main() {
    let config = GameConfig::load();
    init_logging(&config);
    for note in &config.notes {
        log::warn!("config: {note}");
    }

    let seed = config.round.seed.unwrap_or_else(rand::random);
    log::info!(
        "starting: {}s rounds, {} fps, assets in {}, seed {seed}",
        config.round.duration_secs,
        config.display.frame_rate,
        config.assets_dir.display()
    );

    let mut game = GameLoop::new(default_roster(), &config, seed);
    let mut assets = AssetProvider::new(&config.assets_dir);
    let mut renderer = Renderer::new(*game.field());

    let enhanced = match renderer.init() {
        Ok(enhanced) => enhanced,
        Err(e) => {
            log::error!("terminal init failed: {e}");
            eprintln!("Terminal init failed: {e}");
            return;
        }
    };

    let result = game_loop(&mut game, &mut renderer, &mut assets, &config, enhanced);

    if let Err(e) = renderer.cleanup() {
        eprintln!("Terminal cleanup failed: {e}");
    }

    if let Err(e) = result {
        log::error!("game loop aborted: {e}");
        eprintln!("Game error: {e}");
    }

    log::info!("shutdown");
    println!();
    println!("Thanks for playing Coin Collector!");
}

/// The terminal belongs to the game, so log records go to a file.
/// `RUST_LOG` overrides the default `info` filter.
fn init_logging(config: &GameConfig) {
    let file = match File::create(&config.log_file) {
        Ok(f) => f,
        Err(e) => {
            eprintln!("Logging disabled: cannot create {}: {e}", config.log_file.display());
            return;
        }
    };
    let _ = env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .target(env_logger::Target::Pipe(Box::new(file)))
        .try_init();
}

fn game_loop(
    game: &mut GameLoop,
    renderer: &mut Renderer,
    assets: &mut AssetProvider,
    config: &GameConfig,
    enhanced: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    let mut kb = InputState::new();
    kb.honor_release = enhanced;
    let mut gp = GamepadState::new();
    gp.load_button_config(&config.gamepad);
    if gp.connected {
        log::info!("gamepad detected");
    }
    let frame_time = Duration::from_secs_f64(1.0 / config.display.frame_rate as f64);

    while game.is_running() {
        let frame_start = Instant::now();

        kb.drain_events();
        gp.update();

        let input = read_frame_input(&kb, &gp, &renderer.viewport());
        game.advance(Instant::now(), &input);
        if !game.is_running() {
            break;
        }

        renderer.render(game, assets)?;

        if let Some(rest) = frame_time.checked_sub(frame_start.elapsed()) {
            std::thread::sleep(rest);
        }
    }

    Ok(())
}

// ── Key tables ──

const KEYS_LEFT: &[KeyCode] = &[KeyCode::Left, KeyCode::Char('a'), KeyCode::Char('A')];
const KEYS_RIGHT: &[KeyCode] = &[KeyCode::Right, KeyCode::Char('d'), KeyCode::Char('D')];
const KEYS_JUMP: &[KeyCode] = &[KeyCode::Char(' '), KeyCode::Up, KeyCode::Char('w'), KeyCode::Char('W')];
const KEYS_CONFIRM: &[KeyCode] = &[KeyCode::Enter];
const KEYS_QUIT: &[KeyCode] = &[KeyCode::Esc];

/// Merge keyboard, mouse and gamepad into one frame snapshot.
/// Mouse cells are converted to playfield pixels through the viewport.
fn read_frame_input(kb: &InputState, gp: &GamepadState, view: &Viewport) -> FrameInput {
    let to_point = |&(col, row): &(u16, u16)| view.to_point(col, row);
    FrameInput {
        left: kb.any_held(KEYS_LEFT) || kb.any_pressed(KEYS_LEFT) || gp.left_held(),
        right: kb.any_held(KEYS_RIGHT) || kb.any_pressed(KEYS_RIGHT) || gp.right_held(),
        jump: kb.any_held(KEYS_JUMP) || kb.any_pressed(KEYS_JUMP) || gp.jump_held(),

        nav_left: kb.any_pressed(KEYS_LEFT) || gp.nav_left_pressed(),
        nav_right: kb.any_pressed(KEYS_RIGHT) || gp.nav_right_pressed(),
        confirm: kb.any_pressed(KEYS_CONFIRM) || gp.confirm_pressed(),
        quit: kb.ctrl_c_pressed() || kb.any_pressed(KEYS_QUIT) || gp.quit_pressed(),

        pointer: kb.pointer().as_ref().map(to_point),
        clicks: kb.clicks().iter().map(to_point).collect(),
    }
}
