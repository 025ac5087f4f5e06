/// External configuration loader.
///
/// Reads `config.toml` from `--config`, or else from the executable's
/// directory, the CWD, or the data directories. Falls back to sensible
/// defaults if the file is missing or incomplete. Command-line flags
/// override file values.

use std::path::{Path, PathBuf};

use clap::Parser;
use serde::Deserialize;

// ── Command Line ──

#[derive(Parser, Debug, Default)]
#[command(name = "heartmaze", version, about = "Valentine's Maze in your terminal")]
pub struct Cli {
    /// Path to config.toml (skips the directory search)
    #[arg(long)]
    pub config: Option<PathBuf>,
    /// Maze file to play instead of the built-in maze
    #[arg(long)]
    pub maze: Option<PathBuf>,
    /// Glyph skin (TOML) for walls, walkway, player and hearts
    #[arg(long)]
    pub skin: Option<PathBuf>,
    /// Write a debug log (heartmaze.log unless [general] log_file is set)
    #[arg(long)]
    pub debug: bool,
}

// ── Public Config Struct ──

#[derive(Clone, Debug)]
pub struct GameConfig {
    pub maze_file: Option<PathBuf>,
    pub skin_file: Option<PathBuf>,
    pub log_file: Option<PathBuf>,
    pub debug: bool,
    pub frame_ms: u64,
    pub gamepad: GamepadConfig,
    /// Problems found while loading; reported once logging is up.
    pub warnings: Vec<String>,
}

#[derive(Clone, Debug)]
pub struct GamepadConfig {
    pub confirm: Vec<String>,
    pub restart: Vec<String>,
    pub cancel: Vec<String>,
}

// ── TOML Schema (with serde defaults) ──

#[derive(Deserialize, Debug, Default)]
struct TomlConfig {
    #[serde(default)]
    general: TomlGeneral,
    #[serde(default)]
    assets: TomlAssets,
    #[serde(default)]
    gamepad: TomlGamepad,
}

#[derive(Deserialize, Debug)]
struct TomlGeneral {
    #[serde(default)]
    maze_file: Option<String>,
    #[serde(default)]
    log_file: Option<String>,
    #[serde(default = "default_frame_ms")]
    frame_ms: u64,
}

#[derive(Deserialize, Debug, Default)]
struct TomlAssets {
    #[serde(default)]
    skin_file: Option<String>,
}

#[derive(Deserialize, Debug)]
struct TomlGamepad {
    #[serde(default = "default_confirm")]
    confirm: Vec<String>,
    #[serde(default = "default_restart")]
    restart: Vec<String>,
    #[serde(default = "default_cancel")]
    cancel: Vec<String>,
}

// ── Defaults ──

fn default_frame_ms() -> u64 { 16 }

fn default_confirm() -> Vec<String> { vec!["Start".into(), "A".into()] }
fn default_restart() -> Vec<String> { vec!["Select".into()] }
fn default_cancel() -> Vec<String> { vec!["B".into()] }

const DEFAULT_LOG_FILE: &str = "heartmaze.log";

impl Default for TomlGeneral {
    fn default() -> Self {
        TomlGeneral {
            maze_file: None,
            log_file: None,
            frame_ms: default_frame_ms(),
        }
    }
}

impl Default for TomlGamepad {
    fn default() -> Self {
        TomlGamepad {
            confirm: default_confirm(),
            restart: default_restart(),
            cancel: default_cancel(),
        }
    }
}

// ── Loading ──

impl GameConfig {
    /// Load config for the given command line.
    /// Missing file or missing keys gracefully fall back to defaults.
    pub fn load(cli: &Cli) -> Self {
        let search_dirs = candidate_dirs();
        let mut warnings = vec![];

        let toml_cfg = match &cli.config {
            Some(path) => load_toml_file(path, &mut warnings).unwrap_or_default(),
            None => load_toml(&search_dirs, &mut warnings),
        };
        Self::from_parts(cli, toml_cfg, &search_dirs, warnings)
    }

    fn from_parts(cli: &Cli, toml_cfg: TomlConfig, search_dirs: &[PathBuf], warnings: Vec<String>) -> Self {
        let resolve = |s: &String| resolve_path(Path::new(s), search_dirs);

        let maze_file = cli.maze.clone().or_else(|| toml_cfg.general.maze_file.as_ref().map(resolve));
        let skin_file = cli.skin.clone().or_else(|| toml_cfg.assets.skin_file.as_ref().map(resolve));
        let log_file = toml_cfg.general.log_file.map(PathBuf::from).or_else(|| {
            cli.debug.then(|| PathBuf::from(DEFAULT_LOG_FILE))
        });

        GameConfig {
            maze_file,
            skin_file,
            log_file,
            debug: cli.debug,
            frame_ms: toml_cfg.general.frame_ms.max(1),
            gamepad: GamepadConfig {
                confirm: toml_cfg.gamepad.confirm,
                restart: toml_cfg.gamepad.restart,
                cancel: toml_cfg.gamepad.cancel,
            },
            warnings,
        }
    }
}

/// Relative paths are looked up in the candidate dirs; the first that
/// exists wins. Otherwise the path is used as given (relative to CWD).
fn resolve_path(path: &Path, search_dirs: &[PathBuf]) -> PathBuf {
    if path.is_absolute() {
        return path.to_path_buf();
    }
    search_dirs.iter()
        .map(|d| d.join(path))
        .find(|p| p.exists())
        .unwrap_or_else(|| path.to_path_buf())
}

/// Candidate directories to search: exe dir + CWD + data paths (deduplicated).
fn candidate_dirs() -> Vec<PathBuf> {
    let mut dirs = vec![];

    // 1. Directory of the running executable
    if let Ok(exe) = std::env::current_exe() {
        // Resolve symlinks so a linked binary still finds data next to the real one.
        let resolved = exe.canonicalize().unwrap_or(exe);
        if let Some(parent) = resolved.parent() {
            dirs.push(parent.to_path_buf());
        }
    }

    // 2. Current working directory
    if let Ok(cwd) = std::env::current_dir() {
        if !dirs.iter().any(|d| d == &cwd) {
            dirs.push(cwd);
        }
    }

    // 3. XDG data home (~/.local/share/heartmaze)
    if let Ok(home) = std::env::var("HOME") {
        let xdg = PathBuf::from(&home).join(".local/share/heartmaze");
        if xdg.is_dir() && !dirs.iter().any(|d| d == &xdg) {
            dirs.push(xdg);
        }
    }

    // 4. System data directory
    let sys = PathBuf::from("/usr/share/heartmaze");
    if sys.is_dir() && !dirs.iter().any(|d| d == &sys) {
        dirs.push(sys);
    }

    // 5. Fallback
    if dirs.is_empty() {
        dirs.push(PathBuf::from("."));
    }

    dirs
}

/// Search for config.toml in candidate directories.
fn load_toml(search_dirs: &[PathBuf], warnings: &mut Vec<String>) -> TomlConfig {
    for dir in search_dirs {
        let path = dir.join("config.toml");
        if path.exists() {
            if let Some(cfg) = load_toml_file(&path, warnings) {
                return cfg;
            }
        }
    }
    TomlConfig::default()
}

fn load_toml_file(path: &Path, warnings: &mut Vec<String>) -> Option<TomlConfig> {
    match std::fs::read_to_string(path) {
        Ok(text) => match parse_toml(&text) {
            Ok(cfg) => Some(cfg),
            Err(e) => {
                warnings.push(format!("{} parse error: {e}. Using default settings.", path.display()));
                Some(TomlConfig::default())
            }
        },
        Err(e) => {
            warnings.push(format!("could not read {}: {e}", path.display()));
            None
        }
    }
}

fn parse_toml(text: &str) -> Result<TomlConfig, toml::de::Error> {
    toml::from_str::<TomlConfig>(text)
}
