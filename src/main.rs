/// Entry point and game loop.

mod config;
mod domain;
mod sim;
mod ui;

use std::fs::File;
use std::time::Duration;

use clap::Parser;
use log::{info, warn};
use simplelog::{LevelFilter, WriteLogger};

use config::{Cli, GameConfig};
use domain::entity::MoveDir;
use sim::event::GameEvent;
use sim::game::Game;
use sim::level::load_maze;
use sim::world::Phase;
use ui::assets::SkinLoader;
use ui::gamepad::GamepadState;
use ui::input::{InputState, KEYS_CONFIRM, KEYS_QUIT, KEYS_RESTART};
use ui::renderer::{Renderer, Screen, View};

fn main() {
    let cli = Cli::parse();
    let config = GameConfig::load(&cli);

    setup_logging(&config);
    for w in &config.warnings {
        eprintln!("Warning: {w}");
        warn!("{w}");
    }

    // A bad maze is fatal, and must be reported before the terminal is taken over.
    let maze = match load_maze(config.maze_file.as_deref()) {
        Ok(m) => m,
        Err(e) => {
            eprintln!("Cannot load maze: {e}");
            std::process::exit(1);
        }
    };

    let mut game = Game::new(maze);
    let mut skins = SkinLoader::spawn(config.skin_file.clone());
    let mut renderer = Renderer::new();

    if let Err(e) = renderer.init() {
        eprintln!("Terminal init failed: {e}");
        return;
    }

    let result = game_loop(&mut game, &mut renderer, &mut skins, &config);

    if let Err(e) = renderer.cleanup() {
        eprintln!("Terminal cleanup failed: {e}");
    }

    if let Err(e) = result {
        eprintln!("Game error: {e}");
    }

    info!("bye");
    println!();
    println!("Thanks for playing Valentine's Maze! ♥");
}

/// File logger; the terminal belongs to the renderer.
fn setup_logging(config: &GameConfig) {
    let Some(path) = &config.log_file else {
        return;
    };
    let level = if config.debug { LevelFilter::Debug } else { LevelFilter::Info };
    match File::create(path) {
        Ok(file) => {
            let cfg = simplelog::ConfigBuilder::new()
                .set_target_level(LevelFilter::Error)
                .build();
            if WriteLogger::init(level, cfg, file).is_ok() {
                info!("logging to {} at {level}", path.display());
            }
        }
        Err(e) => eprintln!("Warning: cannot open log file {}: {e}", path.display()),
    }
}

fn game_loop(
    game: &mut Game,
    renderer: &mut Renderer,
    skins: &mut SkinLoader,
    config: &GameConfig,
) -> Result<(), Box<dyn std::error::Error>> {
    let mut kb = InputState::new();
    let mut gp = GamepadState::new();
    gp.load_button_config(&config.gamepad);
    let frame = Duration::from_millis(config.frame_ms);
    let mut screen = Screen::Maze;

    loop {
        kb.drain_events();
        gp.update();

        if kb.ctrl_c_pressed() || kb.any_pressed(KEYS_QUIT) || gp.cancel_pressed() {
            break;
        }

        let cmds = Commands {
            confirm: kb.any_pressed(KEYS_CONFIRM) || gp.confirm_pressed(),
            restart: kb.any_pressed(KEYS_RESTART) || gp.restart_pressed(),
            moves: kb.directions().chain(gp.directions()).collect(),
        };
        for event in apply_commands(game, &cmds) {
            if event.is_noop() {
                continue;
            }
            screen = route(screen, &event);
        }

        if let Some(skin) = skins.poll() {
            renderer.set_skin(skin);
        }

        renderer.render(&View {
            screen,
            state: game.state(),
            maze: game.maze(),
            gamepad: gp.connected,
        })?;
        std::thread::sleep(frame);
    }

    Ok(())
}

// ── Command handling ──

/// This frame's input, already merged across keyboard and gamepad.
#[derive(Default)]
struct Commands {
    confirm: bool,
    restart: bool,
    moves: Vec<MoveDir>,
}

/// Issue the frame's commands to the game, returning what happened.
fn apply_commands(game: &mut Game, cmds: &Commands) -> Vec<GameEvent> {
    let mut events = vec![];
    match game.phase() {
        Phase::Idle => {
            if cmds.confirm {
                events.push(game.start().event);
            } else if cmds.restart {
                events.push(game.restart().event);
            }
        }
        Phase::Won | Phase::Lost => {
            if cmds.confirm || cmds.restart {
                events.push(game.restart().event);
            }
        }
        Phase::Playing => {
            if cmds.restart {
                events.push(game.restart().event);
                return events;
            }
            for &dir in &cmds.moves {
                let result = game.move_player(dir);
                events.push(result.event);
                if result.state.phase.is_terminal() {
                    break;
                }
            }
        }
    }
    events
}

/// Which screen to show after an event.
fn route(screen: Screen, event: &GameEvent) -> Screen {
    match event {
        GameEvent::GoalReached { .. } => Screen::Success,
        GameEvent::Started | GameEvent::Restarted => Screen::Maze,
        _ => screen,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::level;

    fn game() -> Game {
        Game::new(level::builtin().unwrap())
    }

    fn moves(dirs: &[MoveDir]) -> Commands {
        Commands { moves: dirs.to_vec(), ..Commands::default() }
    }

    #[test]
    fn moves_before_start_do_nothing() {
        let mut g = game();
        let events = apply_commands(&mut g, &moves(&[MoveDir::Left]));
        assert!(events.is_empty());
        assert_eq!(g.phase(), Phase::Idle);
        assert_eq!(g.state().player, g.maze().spawn());
    }

    #[test]
    fn confirm_starts_then_moves_apply() {
        let mut g = game();
        let events = apply_commands(&mut g, &Commands { confirm: true, ..Commands::default() });
        assert_eq!(events, vec![GameEvent::Started]);

        apply_commands(&mut g, &moves(&[MoveDir::Left, MoveDir::Down]));
        // Left opens onto (5,4); Down from there is a wall.
        assert_eq!(g.state().player, domain::entity::Position::new(5, 4));
    }

    #[test]
    fn reaching_goal_routes_to_success_and_restart_returns() {
        use MoveDir::*;
        let mut g = game();
        g.start();
        let path = [Right, Up, Right, Right, Right, Right, Down, Down, Down, Down, Down, Left];
        let events = apply_commands(&mut g, &moves(&path));

        // Moves after the goal are not applied.
        assert!(matches!(events.last(), Some(GameEvent::GoalReached { .. })));
        assert_eq!(g.phase(), Phase::Won);

        let screen = events.iter().fold(Screen::Maze, route);
        assert_eq!(screen, Screen::Success);

        let events = apply_commands(&mut g, &Commands { confirm: true, ..Commands::default() });
        assert_eq!(events, vec![GameEvent::Restarted]);
        assert_eq!(events.iter().fold(screen, route), Screen::Maze);
        assert_eq!(g.phase(), Phase::Playing);
    }

    #[test]
    fn losing_stays_on_maze_screen() {
        use MoveDir::*;
        let mut g = game();
        g.start();
        let events = apply_commands(&mut g, &moves(&[Left, Left, Left, Up, Left, Left, Up, Up]));
        assert!(matches!(events.last(), Some(GameEvent::HazardReached { .. })));
        assert_eq!(g.phase(), Phase::Lost);
        assert_eq!(events.iter().fold(Screen::Maze, route), Screen::Maze);
    }

    #[test]
    fn restart_wins_over_moves() {
        let mut g = game();
        g.start();
        let cmds = Commands { restart: true, moves: vec![MoveDir::Left], ..Commands::default() };
        assert_eq!(apply_commands(&mut g, &cmds), vec![GameEvent::Restarted]);
        assert_eq!(g.state().player, g.maze().spawn());
    }
}
