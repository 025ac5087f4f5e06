/// Presentation layer: double-buffered, diff-based terminal renderer.
///
/// How it works:
///   1. Build the next frame into `front` buffer (array of Cell)
///   2. Compare each cell with `back` buffer (previous frame)
///   3. Only emit terminal commands for cells that changed
///   4. All commands are batched with `queue!`, flushed once at the end
///   5. Swap front/back
///
/// Every maze sprite has a shape fallback. A loaded skin replaces the
/// shapes it defines; the rest stay shapes. The renderer only reads the
/// game snapshot and the maze, it never drives the game.

use std::io::{self, BufWriter, Write};

use crossterm::{
    cursor::{self, MoveTo},
    execute, queue,
    style::{Color, Print, ResetColor, SetBackgroundColor, SetForegroundColor},
    terminal::{self, Clear, ClearType},
};

use crate::domain::entity::Position;
use crate::domain::maze::Maze;
use crate::domain::tile::Tile;
use crate::sim::world::{GameState, Phase};
use super::assets::{Skin, Sprite, SpriteKind};

// ── Palette ──

const PINK_WALL: Color = Color::Rgb { r: 255, g: 158, b: 175 };
const PINK_EDGE: Color = Color::Rgb { r: 255, g: 209, b: 217 };
const PINK_PLAYER: Color = Color::Rgb { r: 255, g: 77, b: 109 };
const PINK_TITLE: Color = Color::Rgb { r: 255, g: 128, b: 170 };
const WALKWAY: Color = Color::Rgb { r: 255, g: 255, b: 255 };
const HEART_DARK: Color = Color::Rgb { r: 51, g: 51, b: 51 };
const PANEL_BG: Color = Color::Rgb { r: 255, g: 230, b: 236 };

// ── Cell: the unit of the back-buffer ──

#[derive(Clone, Copy, PartialEq, Eq)]
struct Cell {
    ch: [u8; 16],  // up to 16 bytes (supports ZWJ emoji sequences)
    ch_len: u8,
    fg: Color,
    bg: Color,
    wide: bool,    // true = this char occupies 2 terminal columns
    cont: bool,    // true = continuation of previous wide char (skip render)
}

impl Cell {
    /// Explicit background for all "empty" terminal cells, so gaps between
    /// rows never show the terminal's own default colour.
    const BASE_BG: Color = Color::Rgb { r: 40, g: 22, b: 34 };

    const BLANK: Cell = Cell {
        ch: [b' ', 0,0,0, 0,0,0,0, 0,0,0,0, 0,0,0,0],
        ch_len: 1,
        fg: Color::White,
        bg: Cell::BASE_BG,
        wide: false,
        cont: false,
    };

    /// Sentinel cell used to invalidate the back buffer.
    /// Different from any real cell, so every position will be diff'd.
    const INVALID: Cell = Cell {
        ch: [b'?', 0,0,0, 0,0,0,0, 0,0,0,0, 0,0,0,0],
        ch_len: 1,
        fg: Color::Magenta,
        bg: Color::Magenta,
        wide: false,
        cont: false,
    };

    fn wide_cont(bg: Color) -> Cell {
        Cell { ch: [0; 16], ch_len: 0, bg: Self::norm_bg(bg), cont: true, ..Self::BLANK }
    }

    /// Normalize bg: Color::Reset → BASE_BG so that every cell gets an
    /// explicit background color (never terminal-default).
    #[inline]
    fn norm_bg(bg: Color) -> Color {
        match bg {
            Color::Reset => Self::BASE_BG,
            other => other,
        }
    }

    fn from_char(c: char, fg: Color, bg: Color) -> Self {
        let mut cell = Self::BLANK;
        let len = c.encode_utf8(&mut cell.ch).len() as u8;
        cell.ch_len = len;
        cell.fg = fg;
        cell.bg = Self::norm_bg(bg);
        cell
    }

    fn from_char_wide(c: char, fg: Color, bg: Color) -> Self {
        let mut cell = Self::from_char(c, fg, bg);
        cell.wide = true;
        cell
    }

    fn as_str(&self) -> &str {
        std::str::from_utf8(&self.ch[..self.ch_len as usize]).unwrap_or(" ")
    }
}

// ── FrameBuffer: a 2D grid of Cells ──

struct FrameBuffer {
    width: usize,
    height: usize,
    cells: Vec<Cell>,
}

impl FrameBuffer {
    fn new(w: usize, h: usize) -> Self {
        FrameBuffer {
            width: w,
            height: h,
            cells: vec![Cell::BLANK; w * h],
        }
    }

    fn resize(&mut self, w: usize, h: usize) {
        if self.width != w || self.height != h {
            self.width = w;
            self.height = h;
            self.cells = vec![Cell::BLANK; w * h];
        }
    }

    fn clear(&mut self) {
        self.cells.fill(Cell::BLANK);
    }

    fn set(&mut self, x: usize, y: usize, cell: Cell) {
        if x < self.width && y < self.height {
            self.cells[y * self.width + x] = cell;
        }
    }

    fn get(&self, x: usize, y: usize) -> Cell {
        if x < self.width && y < self.height {
            self.cells[y * self.width + x]
        } else {
            Cell::BLANK
        }
    }

    /// Write a string at (x, y) with given colors. Each char occupies 1 column.
    fn put_str(&mut self, x: usize, y: usize, s: &str, fg: Color, bg: Color) {
        for (i, ch) in s.chars().enumerate() {
            if x + i >= self.width { break; }
            self.set(x + i, y, Cell::from_char(ch, fg, bg));
        }
    }

    /// Write a string horizontally centred on row y.
    fn put_centered(&mut self, y: usize, s: &str, fg: Color, bg: Color) {
        let x = self.width.saturating_sub(s.chars().count()) / 2;
        self.put_str(x, y, s, fg, bg);
    }

    #[cfg(test)]
    fn row_text(&self, y: usize) -> String {
        (0..self.width)
            .map(|x| self.get(x, y))
            .filter(|c| !c.cont)
            .map(|c| c.as_str().to_string())
            .collect()
    }
}

// ── What to draw ──

/// Which screen the UI has routed to.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum Screen {
    Maze,
    Success,
}

/// Everything one frame needs, borrowed read-only.
pub struct View<'a> {
    pub screen: Screen,
    pub state: GameState,
    pub maze: &'a Maze,
    pub gamepad: bool,
}

// ── Renderer ──

/// Each maze cell is two terminal columns wide.
const CELL_W: usize = 2;

/// Vertical offsets
const TITLE_ROW: usize = 1;
const MAP_ROW: usize = 3;

pub struct Renderer {
    writer: BufWriter<io::Stdout>,
    front: FrameBuffer,
    back: FrameBuffer,
    term_w: usize,
    term_h: usize,
    last_screen: Option<Screen>,
    skin: Option<Skin>,
}

impl Renderer {
    pub fn new() -> Self {
        Renderer {
            writer: BufWriter::with_capacity(16384, io::stdout()),
            front: FrameBuffer::new(0, 0),
            back: FrameBuffer::new(0, 0),
            term_w: 0,
            term_h: 0,
            last_screen: None,
            skin: None,
        }
    }

    pub fn init(&mut self) -> io::Result<()> {
        terminal::enable_raw_mode()?;
        execute!(
            self.writer,
            terminal::EnterAlternateScreen,
            cursor::Hide,
            SetBackgroundColor(Cell::BASE_BG),
            Clear(ClearType::All)
        )?;

        let (tw, th) = terminal::size().unwrap_or((80, 24));
        self.term_w = tw as usize;
        self.term_h = th as usize;
        self.front.resize(self.term_w, self.term_h);
        self.back.resize(self.term_w, self.term_h);
        // Force full repaint on first frame: back ≠ front for every cell.
        self.back.cells.fill(Cell::INVALID);

        Ok(())
    }

    pub fn cleanup(&mut self) -> io::Result<()> {
        execute!(
            self.writer,
            ResetColor,
            cursor::Show,
            terminal::LeaveAlternateScreen
        )?;
        terminal::disable_raw_mode()
    }

    /// Swap in a skin; the next frame repaints everything.
    pub fn set_skin(&mut self, skin: Skin) {
        self.skin = Some(skin);
        self.back.cells.fill(Cell::INVALID);
    }

    pub fn render(&mut self, view: &View) -> io::Result<()> {
        // Detect terminal resize
        let (tw, th) = terminal::size().unwrap_or((80, 24));
        if tw as usize != self.term_w || th as usize != self.term_h {
            self.term_w = tw as usize;
            self.term_h = th as usize;
            self.front.resize(self.term_w, self.term_h);
            self.back.resize(self.term_w, self.term_h);
            // Force full repaint after resize.
            self.back.cells.fill(Cell::INVALID);
            queue!(self.writer, SetBackgroundColor(Cell::BASE_BG), Clear(ClearType::All))?;
        }

        // Screen change → clear for clean transition
        if self.last_screen != Some(view.screen) {
            self.back.cells.fill(Cell::INVALID);
            queue!(self.writer, SetBackgroundColor(Cell::BASE_BG), Clear(ClearType::All))?;
            self.last_screen = Some(view.screen);
        }

        self.compose(view);

        // Diff and emit
        self.flush_diff()?;

        // Swap: current front becomes next back
        std::mem::swap(&mut self.front, &mut self.back);

        Ok(())
    }

    // ── Diff flush: only write changed cells ──

    fn flush_diff(&mut self) -> io::Result<()> {
        let mut last_fg = Color::White;
        let mut last_bg = Cell::BASE_BG;
        let mut need_move = true;
        let mut last_x: usize = 0;
        let mut last_y: usize = 0;

        // Explicit base colors; ResetColor would fall back to the terminal default.
        queue!(self.writer,
            SetForegroundColor(Color::White),
            SetBackgroundColor(Cell::BASE_BG),
        )?;

        for y in 0..self.front.height {
            let mut x = 0;
            while x < self.front.width {
                let cell = self.front.get(x, y);
                let prev = self.back.get(x, y);

                // Skip continuation cells (right half of wide emoji)
                if cell.cont {
                    if cell != prev { need_move = true; }
                    x += 1;
                    continue;
                }

                // For wide cells, also check if the continuation changed
                let cont_changed = cell.wide
                    && x + 1 < self.front.width
                    && self.front.get(x + 1, y) != self.back.get(x + 1, y);

                if cell == prev && !cont_changed {
                    need_move = true;
                    x += 1;
                    continue;
                }

                // Position cursor if needed
                if need_move || x != last_x + 1 || y != last_y {
                    queue!(self.writer, MoveTo(x as u16, y as u16))?;
                    need_move = false;
                }

                // Set colors only if changed
                if cell.fg != last_fg {
                    queue!(self.writer, SetForegroundColor(cell.fg))?;
                    last_fg = cell.fg;
                }
                if cell.bg != last_bg {
                    queue!(self.writer, SetBackgroundColor(cell.bg))?;
                    last_bg = cell.bg;
                }

                queue!(self.writer, Print(cell.as_str()))?;

                if cell.wide {
                    // Wide char printed: cursor advanced 2 columns
                    last_x = x + 1;
                    x += 2;
                } else {
                    last_x = x;
                    x += 1;
                }
                last_y = y;
            }
        }

        self.writer.flush()
    }

    // ── Compose: build front buffer content ──

    fn compose(&mut self, view: &View) {
        self.front.clear();
        match view.screen {
            Screen::Maze => self.compose_maze(view),
            Screen::Success => self.compose_success(),
        }
    }

    fn compose_maze(&mut self, view: &View) {
        let (rows, cols) = view.state.dimensions;
        let origin_x = self.front.width.saturating_sub(cols * CELL_W) / 2;

        self.front.put_centered(TITLE_ROW, "♥ Will You Be My Valentine? ♥", PINK_TITLE, Color::Reset);

        for (gy, row) in view.maze.grid().rows().enumerate() {
            for (gx, &tile) in row.iter().enumerate() {
                let kind = self.sprite_at(view, gx, gy, tile);
                self.compose_sprite(kind, origin_x + gx * CELL_W, MAP_ROW + gy);
            }
        }

        // ── HUD row ──
        let hud_row = MAP_ROW + rows + 1;
        let status = match view.state.phase {
            Phase::Idle => format!("Press ENTER to start at {}", view.state.spawn),
            Phase::Playing => "Find the white heart. Avoid the black one!".to_string(),
            Phase::Won => "You found it!".to_string(),
            Phase::Lost => "Oh no, the black heart...".to_string(),
        };
        self.front.put_centered(hud_row, &status, Color::White, Color::Reset);

        // ── Help bar ──
        let help_row = hud_row + 2;
        let help = if view.gamepad {
            "←↑→↓/WASD/D-pad: Move   R: Restart   Q: Quit   [pad]"
        } else {
            "←↑→↓/WASD: Move   R: Restart   Q: Quit"
        };
        self.front.put_centered(help_row, help, Color::DarkGrey, Color::Reset);

        // ── Overlays ──
        let box_top = MAP_ROW + (rows / 2).saturating_sub(2);
        match view.state.phase {
            Phase::Idle => self.compose_box(
                box_top,
                &["Valentine's Maze", "", "▸ ENTER  Start Game"],
                PINK_PLAYER,
            ),
            Phase::Lost => self.compose_box(
                box_top,
                &["Game Over!", "", "▸ ENTER  Restart"],
                HEART_DARK,
            ),
            Phase::Playing | Phase::Won => {}
        }
    }

    /// The sprite for one maze cell: player over landmarks over tiles.
    fn sprite_at(&self, view: &View, gx: usize, gy: usize, tile: Tile) -> SpriteKind {
        let here = Position::new(gx, gy);
        if view.state.player == here {
            SpriteKind::Player
        } else if view.maze.goal() == here {
            SpriteKind::Goal
        } else if view.maze.hazard() == here {
            SpriteKind::Hazard
        } else if tile.is_wall() {
            SpriteKind::Wall
        } else {
            SpriteKind::Walkway
        }
    }

    /// Write one maze cell (two columns) at (col, row).
    fn compose_sprite(&mut self, kind: SpriteKind, col: usize, row: usize) {
        let bg = match kind {
            SpriteKind::Wall => PINK_WALL,
            _ => WALKWAY,
        };

        if let Some(sprite) = self.skin.as_ref().and_then(|s| s.sprite(kind)).cloned() {
            self.compose_skinned(&sprite, bg, col, row);
            return;
        }

        // Shape fallback
        let (c0, c1, fg) = match kind {
            SpriteKind::Wall    => ('░', '░', PINK_EDGE),
            SpriteKind::Walkway => (' ', ' ', WALKWAY),
            SpriteKind::Player  => ('(', ')', PINK_PLAYER),
            SpriteKind::Goal    => ('♡', ' ', PINK_PLAYER),
            SpriteKind::Hazard  => ('♥', ' ', HEART_DARK),
        };
        self.front.set(col, row, Cell::from_char(c0, fg, bg));
        self.front.set(col + 1, row, Cell::from_char(c1, fg, bg));
    }

    fn compose_skinned(&mut self, sprite: &Sprite, bg: Color, col: usize, row: usize) {
        let fg = sprite.fg.map_or(Color::Black, |[r, g, b]| Color::Rgb { r, g, b });
        let mut chars = sprite.glyph.chars();
        let c0 = chars.next().unwrap_or(' ');
        if sprite.wide {
            self.front.set(col, row, Cell::from_char_wide(c0, fg, bg));
            self.front.set(col + 1, row, Cell::wide_cont(bg));
        } else {
            let c1 = chars.next().unwrap_or(' ');
            self.front.set(col, row, Cell::from_char(c0, fg, bg));
            self.front.set(col + 1, row, Cell::from_char(c1, fg, bg));
        }
    }

    /// A centred panel with a border, one text line per entry.
    fn compose_box(&mut self, top: usize, lines: &[&str], fg: Color) {
        let inner = lines.iter().map(|l| l.chars().count()).max().unwrap_or(0) + 4;
        let left = self.front.width.saturating_sub(inner + 2) / 2;

        let horiz = "─".repeat(inner);
        self.front.put_str(left, top, &format!("╭{horiz}╮"), fg, PANEL_BG);
        for (i, line) in lines.iter().enumerate() {
            let pad = inner - line.chars().count();
            let text = format!("│{}{}{}│", " ".repeat(pad / 2), line, " ".repeat(pad - pad / 2));
            self.front.put_str(left, top + 1 + i, &text, fg, PANEL_BG);
        }
        self.front.put_str(left, top + 1 + lines.len(), &format!("╰{horiz}╯"), fg, PANEL_BG);
    }

    fn compose_success(&mut self) {
        let heart = [
            " ♥♥♥♥♥   ♥♥♥♥♥ ",
            "♥♥♥♥♥♥♥ ♥♥♥♥♥♥♥",
            "♥♥♥♥♥♥♥♥♥♥♥♥♥♥♥",
            " ♥♥♥♥♥♥♥♥♥♥♥♥♥ ",
            "   ♥♥♥♥♥♥♥♥♥   ",
            "     ♥♥♥♥♥     ",
            "       ♥       ",
        ];
        for (i, line) in heart.iter().enumerate() {
            self.front.put_centered(2 + i, line, PINK_PLAYER, Color::Reset);
        }
        let base = 3 + heart.len();
        self.front.put_centered(base, "Will You Be My Valentine?", PINK_TITLE, Color::Reset);
        self.front.put_centered(base + 2, "You found the white heart. Yes! ♥", Color::White, Color::Reset);
        self.front.put_centered(base + 4, "▸ ENTER: Play again    ▸ Q: Quit", Color::Rgb { r: 255, g: 200, b: 220 }, Color::Reset);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::game::Game;
    use crate::sim::level;

    fn renderer() -> Renderer {
        let mut r = Renderer::new();
        r.front.resize(80, 30);
        r
    }

    fn board_text(r: &Renderer, maze: &Maze) -> Vec<String> {
        let (rows, _) = maze.dimensions();
        (0..rows).map(|y| r.front.row_text(MAP_ROW + y)).collect()
    }

    fn screen_contains(r: &Renderer, needle: &str) -> bool {
        (0..r.front.height).any(|y| r.front.row_text(y).contains(needle))
    }

    #[test]
    fn idle_shows_start_overlay() {
        let maze = level::builtin().unwrap();
        let game = Game::new(maze.clone());
        let mut r = renderer();
        r.compose(&View { screen: Screen::Maze, state: game.state(), maze: &maze, gamepad: false });
        assert!(screen_contains(&r, "Valentine's Maze"));
        assert!(screen_contains(&r, "Start Game"));
    }

    #[test]
    fn playing_draws_shapes_for_every_sprite() {
        let maze = level::builtin().unwrap();
        let mut game = Game::new(maze.clone());
        let state = game.start().state;
        let mut r = renderer();
        r.compose(&View { screen: Screen::Maze, state, maze: &maze, gamepad: false });

        let board = board_text(&r, &maze);
        assert!(board[4].contains("()"), "player on row 4: {}", board[4]);
        assert!(board[8].contains('♡'), "goal on row 8: {}", board[8]);
        assert!(board[1].contains('♥'), "hazard on row 1: {}", board[1]);
        assert!(board[0].chars().all(|c| c == '░' || c == ' '));
        assert!(!screen_contains(&r, "Start Game"));
    }

    #[test]
    fn lost_shows_game_over() {
        let maze = level::builtin().unwrap();
        let state = GameState {
            phase: Phase::Lost,
            player: maze.hazard(),
            spawn: maze.spawn(),
            dimensions: maze.dimensions(),
        };
        let mut r = renderer();
        r.compose(&View { screen: Screen::Maze, state, maze: &maze, gamepad: false });
        assert!(screen_contains(&r, "Game Over!"));
        assert!(screen_contains(&r, "Restart"));
    }

    #[test]
    fn success_screen_asks_the_question() {
        let maze = level::builtin().unwrap();
        let state = GameState {
            phase: Phase::Won,
            player: maze.goal(),
            spawn: maze.spawn(),
            dimensions: maze.dimensions(),
        };
        let mut r = renderer();
        r.compose(&View { screen: Screen::Success, state, maze: &maze, gamepad: false });
        assert!(screen_contains(&r, "Will You Be My Valentine?"));
        assert!(screen_contains(&r, "Play again"));
    }

    #[test]
    fn skin_replaces_only_defined_sprites() {
        let maze = level::parse_maze("P.GX").unwrap();
        let mut r = renderer();
        r.set_skin(Skin {
            player: Some(Sprite { glyph: "@".into(), wide: false, fg: None }),
            ..Skin::default()
        });
        let state = GameState {
            phase: Phase::Playing,
            player: Position::new(0, 0),
            spawn: Position::new(0, 0),
            dimensions: maze.dimensions(),
        };
        r.compose(&View { screen: Screen::Maze, state, maze: &maze, gamepad: false });
        let row = r.front.row_text(MAP_ROW);
        assert!(row.contains("@ "), "{row}");
        assert!(row.contains('♡'), "{row}");
        assert!(!row.contains("()"), "{row}");
    }

    #[test]
    fn wide_sprite_uses_continuation_cell() {
        let maze = level::parse_maze("P.GX").unwrap();
        let mut r = renderer();
        r.set_skin(Skin {
            goal: Some(Sprite { glyph: "💖".into(), wide: true, fg: None }),
            ..Skin::default()
        });
        let state = GameState {
            phase: Phase::Playing,
            player: Position::new(0, 0),
            spawn: Position::new(0, 0),
            dimensions: maze.dimensions(),
        };
        r.compose(&View { screen: Screen::Maze, state, maze: &maze, gamepad: false });
        let origin_x = (80 - 4 * CELL_W) / 2;
        let goal_col = origin_x + 2 * CELL_W;
        assert!(r.front.get(goal_col, MAP_ROW).wide);
        assert!(r.front.get(goal_col + 1, MAP_ROW).cont);
    }
}
