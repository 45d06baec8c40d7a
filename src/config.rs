/// External configuration loader.
///
/// Reads `config.toml` from the executable's directory (or CWD).
/// Falls back to sensible defaults if the file is missing or incomplete.
/// Problems are kept in `notes` and logged once the logger is up
/// (the terminal belongs to the game by then, so nothing goes to stderr).

use serde::Deserialize;
use std::path::PathBuf;

// ── Public Config Struct ──

#[derive(Clone, Debug)]
pub struct GameConfig {
    pub round: RoundConfig,
    pub physics: PhysicsConfig,
    pub display: DisplayConfig,
    pub gamepad: GamepadConfig,
    pub assets_dir: PathBuf,
    pub log_file: PathBuf,
    pub notes: Vec<String>,
}

#[derive(Clone, Debug)]
pub struct RoundConfig {
    pub duration_secs: u32,
    pub summary_secs: u32,
    pub coin_reward: u32,
    /// One coin per `spawn_one_in` frames on average. 0 disables spawning.
    pub spawn_one_in: u32,
    /// Fixed RNG seed; `None` seeds from the clock.
    pub seed: Option<u64>,
}

#[derive(Clone, Debug)]
pub struct PhysicsConfig {
    pub player_size: f32,
    pub player_speed: f32,
    pub jump_velocity: f32,  // negative = upward
    pub gravity: f32,
    pub coin_size: f32,
    pub coin_fall_speed: f32,
}

#[derive(Clone, Debug)]
pub struct DisplayConfig {
    pub frame_rate: u32,
    pub playfield_width: f32,
    pub playfield_height: f32,
}

#[derive(Clone, Debug)]
pub struct GamepadConfig {
    pub jump: Vec<String>,
    pub confirm: Vec<String>,
    pub quit: Vec<String>,
}

// ── TOML Schema (with serde defaults) ──

#[derive(Deserialize, Debug, Default)]
struct TomlConfig {
    #[serde(default)]
    round: TomlRound,
    #[serde(default)]
    physics: TomlPhysics,
    #[serde(default)]
    display: TomlDisplay,
    #[serde(default)]
    gamepad: TomlGamepad,
    #[serde(default)]
    general: TomlGeneral,
}

#[derive(Deserialize, Debug)]
struct TomlRound {
    #[serde(default = "default_duration")]
    duration_secs: u32,
    #[serde(default = "default_summary")]
    summary_secs: u32,
    #[serde(default = "default_reward")]
    coin_reward: u32,
    #[serde(default = "default_spawn_one_in")]
    spawn_one_in: u32,
    #[serde(default)]
    seed: Option<u64>,
}

#[derive(Deserialize, Debug)]
struct TomlPhysics {
    #[serde(default = "default_player_size")]
    player_size: f32,
    #[serde(default = "default_player_speed")]
    player_speed: f32,
    #[serde(default = "default_jump_velocity")]
    jump_velocity: f32,
    #[serde(default = "default_gravity")]
    gravity: f32,
    #[serde(default = "default_coin_size")]
    coin_size: f32,
    #[serde(default = "default_coin_fall")]
    coin_fall_speed: f32,
}

#[derive(Deserialize, Debug)]
struct TomlDisplay {
    #[serde(default = "default_frame_rate")]
    frame_rate: u32,
    #[serde(default = "default_width")]
    playfield_width: f32,
    #[serde(default = "default_height")]
    playfield_height: f32,
}

#[derive(Deserialize, Debug)]
struct TomlGamepad {
    #[serde(default = "default_jump_buttons")]
    jump: Vec<String>,
    #[serde(default = "default_confirm_buttons")]
    confirm: Vec<String>,
    #[serde(default = "default_quit_buttons")]
    quit: Vec<String>,
}

#[derive(Deserialize, Debug)]
struct TomlGeneral {
    #[serde(default = "default_assets_dir")]
    assets_dir: String,
    #[serde(default = "default_log_file")]
    log_file: String,
}

// ── Defaults ──

fn default_duration() -> u32 { 45 }
fn default_summary() -> u32 { 3 }
fn default_reward() -> u32 { 10 }
fn default_spawn_one_in() -> u32 { 30 }   // ~2 coins/s at 60 fps

fn default_player_size() -> f32 { 50.0 }
fn default_player_speed() -> f32 { 8.0 }
fn default_jump_velocity() -> f32 { -18.0 }
fn default_gravity() -> f32 { 0.8 }
fn default_coin_size() -> f32 { 45.0 }
fn default_coin_fall() -> f32 { 5.0 }

fn default_frame_rate() -> u32 { 60 }
fn default_width() -> f32 { 800.0 }
fn default_height() -> f32 { 600.0 }

fn default_jump_buttons() -> Vec<String> { vec!["A".into()] }
fn default_confirm_buttons() -> Vec<String> { vec!["Start".into(), "A".into()] }
fn default_quit_buttons() -> Vec<String> { vec!["Select".into()] }

fn default_assets_dir() -> String { "assets".into() }
fn default_log_file() -> String { "coin-collector.log".into() }

impl Default for TomlRound {
    fn default() -> Self {
        TomlRound {
            duration_secs: default_duration(),
            summary_secs: default_summary(),
            coin_reward: default_reward(),
            spawn_one_in: default_spawn_one_in(),
            seed: None,
        }
    }
}

impl Default for TomlPhysics {
    fn default() -> Self {
        TomlPhysics {
            player_size: default_player_size(),
            player_speed: default_player_speed(),
            jump_velocity: default_jump_velocity(),
            gravity: default_gravity(),
            coin_size: default_coin_size(),
            coin_fall_speed: default_coin_fall(),
        }
    }
}

impl Default for TomlDisplay {
    fn default() -> Self {
        TomlDisplay {
            frame_rate: default_frame_rate(),
            playfield_width: default_width(),
            playfield_height: default_height(),
        }
    }
}

impl Default for TomlGamepad {
    fn default() -> Self {
        TomlGamepad {
            jump: default_jump_buttons(),
            confirm: default_confirm_buttons(),
            quit: default_quit_buttons(),
        }
    }
}

impl Default for TomlGeneral {
    fn default() -> Self {
        TomlGeneral {
            assets_dir: default_assets_dir(),
            log_file: default_log_file(),
        }
    }
}

impl Default for RoundConfig {
    fn default() -> Self {
        let t = TomlRound::default();
        RoundConfig {
            duration_secs: t.duration_secs,
            summary_secs: t.summary_secs,
            coin_reward: t.coin_reward,
            spawn_one_in: t.spawn_one_in,
            seed: t.seed,
        }
    }
}

impl Default for PhysicsConfig {
    fn default() -> Self {
        let t = TomlPhysics::default();
        PhysicsConfig {
            player_size: t.player_size,
            player_speed: t.player_speed,
            jump_velocity: t.jump_velocity,
            gravity: t.gravity,
            coin_size: t.coin_size,
            coin_fall_speed: t.coin_fall_speed,
        }
    }
}

impl Default for DisplayConfig {
    fn default() -> Self {
        let t = TomlDisplay::default();
        DisplayConfig {
            frame_rate: t.frame_rate,
            playfield_width: t.playfield_width,
            playfield_height: t.playfield_height,
        }
    }
}

// ── Loading ──

impl GameConfig {
    /// Load config from `config.toml`.
    /// Search order: (1) exe directory, (2) current working directory.
    /// Missing file or missing keys gracefully fall back to defaults.
    pub fn load() -> Self {
        let search_dirs = candidate_dirs();
        let mut notes = Vec::new();
        let toml_cfg = load_toml(&search_dirs, &mut notes);

        // Resolve assets directory against the search dirs, like config.toml itself
        let assets_str = &toml_cfg.general.assets_dir;
        let assets_dir = if PathBuf::from(assets_str).is_absolute() {
            PathBuf::from(assets_str)
        } else {
            search_dirs.iter()
                .map(|d| d.join(assets_str))
                .find(|p| p.is_dir())
                .unwrap_or_else(|| PathBuf::from(assets_str))
        };

        let mut cfg = Self::from_schema(toml_cfg, assets_dir);
        cfg.notes.extend(notes);
        cfg
    }

    /// Parse a config document directly. Unknown keys are ignored,
    /// missing keys take their defaults. Paths are used as written.
    pub fn from_toml_str(text: &str) -> Result<Self, toml::de::Error> {
        let toml_cfg: TomlConfig = toml::from_str(text)?;
        let assets_dir = PathBuf::from(&toml_cfg.general.assets_dir);
        Ok(Self::from_schema(toml_cfg, assets_dir))
    }

    fn from_schema(t: TomlConfig, assets_dir: PathBuf) -> Self {
        let mut notes = Vec::new();

        let mut display = DisplayConfig {
            frame_rate: t.display.frame_rate,
            playfield_width: t.display.playfield_width,
            playfield_height: t.display.playfield_height,
        };
        if display.frame_rate == 0 {
            notes.push("display.frame_rate must be positive; using 60".to_string());
            display.frame_rate = default_frame_rate();
        }

        let mut physics = PhysicsConfig {
            player_size: t.physics.player_size,
            player_speed: t.physics.player_speed,
            jump_velocity: t.physics.jump_velocity,
            gravity: t.physics.gravity,
            coin_size: t.physics.coin_size,
            coin_fall_speed: t.physics.coin_fall_speed,
        };
        // The player must fit on the playfield with the 10px ground margin
        if physics.player_size <= 0.0
            || physics.player_size + 10.0 > display.playfield_height
            || physics.player_size > display.playfield_width
        {
            notes.push(format!(
                "physics.player_size {} does not fit the playfield; using {}",
                physics.player_size, default_player_size()
            ));
            physics.player_size = default_player_size();
        }
        if physics.coin_size <= 0.0 || physics.coin_size > display.playfield_width {
            notes.push(format!(
                "physics.coin_size {} does not fit the playfield; using {}",
                physics.coin_size, default_coin_size()
            ));
            physics.coin_size = default_coin_size();
        }

        GameConfig {
            round: RoundConfig {
                duration_secs: t.round.duration_secs,
                summary_secs: t.round.summary_secs,
                coin_reward: t.round.coin_reward,
                spawn_one_in: t.round.spawn_one_in,
                seed: t.round.seed,
            },
            physics,
            display,
            gamepad: GamepadConfig {
                jump: t.gamepad.jump,
                confirm: t.gamepad.confirm,
                quit: t.gamepad.quit,
            },
            assets_dir,
            log_file: PathBuf::from(t.general.log_file),
            notes,
        }
    }
}

impl Default for GameConfig {
    fn default() -> Self {
        let t = TomlConfig::default();
        let assets_dir = PathBuf::from(&t.general.assets_dir);
        Self::from_schema(t, assets_dir)
    }
}

/// Candidate directories to search: exe dir + CWD (deduplicated).
fn candidate_dirs() -> Vec<PathBuf> {
    let mut dirs = vec![];

    if let Ok(exe) = std::env::current_exe() {
        let resolved = exe.canonicalize().unwrap_or(exe);
        if let Some(parent) = resolved.parent() {
            dirs.push(parent.to_path_buf());
        }
    }

    if let Ok(cwd) = std::env::current_dir() {
        if !dirs.iter().any(|d| d == &cwd) {
            dirs.push(cwd);
        }
    }

    if dirs.is_empty() {
        dirs.push(PathBuf::from("."));
    }

    dirs
}

/// Search for config.toml in candidate directories.
fn load_toml(search_dirs: &[PathBuf], notes: &mut Vec<String>) -> TomlConfig {
    for dir in search_dirs {
        let path = dir.join("config.toml");
        if path.exists() {
            match std::fs::read_to_string(&path) {
                Ok(text) => match toml::from_str::<TomlConfig>(&text) {
                    Ok(cfg) => return cfg,
                    Err(e) => {
                        notes.push(format!("{} parse error: {e}; using default settings", path.display()));
                        return TomlConfig::default();
                    }
                },
                Err(e) => {
                    notes.push(format!("could not read {}: {e}", path.display()));
                }
            }
        }
    }
    TomlConfig::default()
}
