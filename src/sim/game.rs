/// The game state machine: the only thing that changes game state.
///
/// Phases:
///   Idle ──start──▶ Playing ──move(goal)──▶ Won
///                     │  ▲                   │
///           move(hazard) └──start/restart────┤
///                     ▼                      │
///                    Lost ──start/restart────┘
///
/// `start` and `restart` are accepted in every phase and always land on
/// `Playing` at the spawn cell. `move_player` only does anything in
/// `Playing`; elsewhere it is reported as ignored.
///
/// Move legality lives in `domain::rules`; this module only applies
/// what the rules allow and updates the phase.

use log::{debug, info};

use crate::domain::entity::{PlayerState, Step};
use crate::domain::maze::Maze;
use crate::domain::rules::{self, MoveResult, Outcome};
use super::event::GameEvent;
use super::world::{CommandResult, GameState, Phase};

pub struct Game {
    maze: Maze,
    player: PlayerState,
    phase: Phase,
}

impl Game {
    /// A fresh session: `Idle`, player on the spawn cell.
    pub fn new(maze: Maze) -> Self {
        let player = PlayerState::new(maze.spawn());
        Game { maze, player, phase: Phase::Idle }
    }

    // ══════════════════════════════════════════════════════════════
    // Commands
    // ══════════════════════════════════════════════════════════════

    pub fn start(&mut self) -> CommandResult {
        self.reset();
        debug!("start: playing at {}", self.player.current());
        self.result(GameEvent::Started)
    }

    /// Same effect as `start`; offered separately for the post-game prompt.
    pub fn restart(&mut self) -> CommandResult {
        let from = self.phase;
        self.reset();
        debug!("restart from {from:?}: playing at {}", self.player.current());
        self.result(GameEvent::Restarted)
    }

    /// Apply one step. Accepts a `MoveDir` or a raw `Step`.
    pub fn move_player(&mut self, step: impl Into<Step>) -> CommandResult {
        let step = step.into();
        if self.phase != Phase::Playing {
            debug!("move {step:?} ignored in {:?}", self.phase);
            return self.result(GameEvent::Ignored { phase: self.phase });
        }

        let from = self.player.current();
        let event = match rules::try_move(from, step, &self.maze) {
            MoveResult::Rejected(reason) => {
                debug!("move {step:?} from {from} blocked: {reason}");
                GameEvent::Blocked { at: from, reason }
            }
            MoveResult::Moved { to, outcome } => {
                self.player.set(to);
                match outcome {
                    Outcome::Open => GameEvent::Moved { from, to },
                    Outcome::Goal => {
                        self.phase = Phase::Won;
                        info!("goal reached at {to}");
                        GameEvent::GoalReached { at: to }
                    }
                    Outcome::Hazard => {
                        self.phase = Phase::Lost;
                        info!("hazard reached at {to}");
                        GameEvent::HazardReached { at: to }
                    }
                }
            }
        };
        self.result(event)
    }

    // ══════════════════════════════════════════════════════════════
    // Queries
    // ══════════════════════════════════════════════════════════════

    pub fn state(&self) -> GameState {
        GameState {
            phase: self.phase,
            player: self.player.current(),
            spawn: self.player.spawn(),
            dimensions: self.maze.dimensions(),
        }
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn maze(&self) -> &Maze {
        &self.maze
    }

    // ── Internal ──

    fn reset(&mut self) {
        self.player.reset(self.player.spawn());
        self.phase = Phase::Playing;
    }

    fn result(&self, event: GameEvent) -> CommandResult {
        CommandResult { state: self.state(), event }
    }
}

// ══════════════════════════════════════════════════════════════
// Unit tests
// ══════════════════════════════════════════════════════════════
