/// Glyph skins: optional replacements for the renderer's built-in shapes.
///
/// A skin is a small TOML file:
///   ```toml
///   [player]
///   glyph = "🧍"
///   wide = true
///
///   [wall]
///   glyph = "▓▓"
///   fg = [255, 158, 175]
///   ```
///
/// Loading runs on a background thread and is delivered over a channel.
/// The renderer polls once per frame and draws shapes until a skin
/// arrives; a skin that fails to load is logged and never arrives.
/// Nothing here touches game state.

use std::path::{Path, PathBuf};
use std::sync::mpsc::{self, Receiver, TryRecvError};
use std::thread;

use log::{info, warn};
use serde::Deserialize;
use thiserror::Error;

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum SpriteKind {
    Wall,
    Walkway,
    Player,
    Goal,
    Hazard,
}

/// One drawable: up to two terminal columns of text.
#[derive(Deserialize, Clone, Debug, PartialEq, Eq)]
pub struct Sprite {
    pub glyph: String,
    /// The glyph is a single double-width character (emoji).
    #[serde(default)]
    pub wide: bool,
    /// Foreground RGB; terminal default when absent.
    #[serde(default)]
    pub fg: Option<[u8; 3]>,
}

#[derive(Deserialize, Clone, Debug, Default, PartialEq, Eq)]
pub struct Skin {
    #[serde(default)]
    pub wall: Option<Sprite>,
    #[serde(default)]
    pub walkway: Option<Sprite>,
    #[serde(default)]
    pub player: Option<Sprite>,
    #[serde(default)]
    pub goal: Option<Sprite>,
    #[serde(default)]
    pub hazard: Option<Sprite>,
}

impl Skin {
    pub fn sprite(&self, kind: SpriteKind) -> Option<&Sprite> {
        match kind {
            SpriteKind::Wall => self.wall.as_ref(),
            SpriteKind::Walkway => self.walkway.as_ref(),
            SpriteKind::Player => self.player.as_ref(),
            SpriteKind::Goal => self.goal.as_ref(),
            SpriteKind::Hazard => self.hazard.as_ref(),
        }
    }

    /// Drop sprites that cannot fit a two-column cell.
    fn sanitize(mut self) -> Self {
        for (name, slot) in [
            ("wall", &mut self.wall),
            ("walkway", &mut self.walkway),
            ("player", &mut self.player),
            ("goal", &mut self.goal),
            ("hazard", &mut self.hazard),
        ] {
            let fits = slot.as_ref().map_or(true, |s| {
                let n = s.glyph.chars().count();
                if s.wide { n == 1 } else { (1..=2).contains(&n) }
            });
            if !fits {
                warn!("skin sprite '{name}' does not fit a cell, using shape");
                *slot = None;
            }
        }
        self
    }
}

#[derive(Debug, Error)]
pub enum SkinError {
    #[error("could not read skin {}: {source}", path.display())]
    Io { path: PathBuf, source: std::io::Error },
    #[error("skin {} is not valid: {source}", path.display())]
    Parse { path: PathBuf, source: toml::de::Error },
}

pub fn parse_skin(text: &str, path: &Path) -> Result<Skin, SkinError> {
    toml::from_str::<Skin>(text)
        .map(Skin::sanitize)
        .map_err(|source| SkinError::Parse { path: path.to_path_buf(), source })
}

pub fn load_skin(path: &Path) -> Result<Skin, SkinError> {
    let text = std::fs::read_to_string(path)
        .map_err(|source| SkinError::Io { path: path.to_path_buf(), source })?;
    parse_skin(&text, path)
}

/// Fire-and-forget skin loading.
pub struct SkinLoader {
    rx: Option<Receiver<Result<Skin, SkinError>>>,
}

impl SkinLoader {
    /// Start loading `path` in the background. `None` means no skin.
    pub fn spawn(path: Option<PathBuf>) -> Self {
        let Some(path) = path else {
            return SkinLoader { rx: None };
        };
        let (tx, rx) = mpsc::channel();
        thread::spawn(move || {
            // Receiver may be gone if the game already quit.
            let _ = tx.send(load_skin(&path));
        });
        SkinLoader { rx: Some(rx) }
    }

    /// Non-blocking. Yields the skin once, when it has arrived.
    pub fn poll(&mut self) -> Option<Skin> {
        let rx = self.rx.as_ref()?;
        match rx.try_recv() {
            Ok(Ok(skin)) => {
                info!("skin loaded");
                self.rx = None;
                Some(skin)
            }
            Ok(Err(e)) => {
                warn!("{e}; using shapes");
                self.rx = None;
                None
            }
            Err(TryRecvError::Empty) => None,
            Err(TryRecvError::Disconnected) => {
                self.rx = None;
                None
            }
        }
    }
}
