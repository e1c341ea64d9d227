//! Delve dungeon engine driver
//!
//! Generates a floor, prints it, and optionally walks it with a simple
//! automatic explorer.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::{debug, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use delve_core::action::Command;
use delve_core::collab::{AudioCues, Cue, RoomRenderer};
use delve_core::dungeon::Room;
use delve_core::minimap::{MiniMap, Viewport};
use delve_core::puzzle::PuzzleState;
use delve_core::world::EngineConfig;
use delve_core::{GameLoop, GameRng, Interaction, LoopEvent};

/// Dungeon floor generator and explorer
#[derive(Parser, Debug)]
#[command(name = "delve")]
#[command(
    author,
    version,
    about = "Delve - generate and explore a dungeon floor",
    long_about = None
)]
struct Args {
    /// RNG seed; random when omitted
    #[arg(short = 's', long = "seed")]
    seed: Option<u64>,

    /// Floor number (drives enemy tiers and boss floors)
    #[arg(short = 'f', long = "floor", default_value_t = 1)]
    floor: u32,

    /// Minimum room count
    #[arg(short = 'r', long = "rooms")]
    rooms: Option<usize>,

    /// Engine configuration file (JSON)
    #[arg(short = 'c', long = "config")]
    config: Option<PathBuf>,

    /// Print the generated floor as JSON
    #[arg(long = "json")]
    json: bool,

    /// Explore for up to N door transitions
    #[arg(short = 'w', long = "walk")]
    walk: Option<u32>,

    /// Debug logging
    #[arg(short = 'v', long = "verbose")]
    verbose: bool,
}

/// Renderer that only logs what it is asked to draw
struct LogRenderer;

impl RoomRenderer for LogRenderer {
    fn fade_out(&mut self, duration_ms: u32) {
        debug!(duration_ms, "fade out");
    }

    fn fade_in(&mut self, duration_ms: u32) {
        debug!(duration_ms, "fade in");
    }

    fn rebuild_room(&mut self, room: &Room) {
        let contents: Vec<_> = room.contents.iter().map(|c| c.kind.tag()).collect();
        debug!(room = %room.id, kind = %room.room_type, ?contents, "draw room");
    }

    fn show_puzzle(&mut self, state: &PuzzleState) {
        debug!(kind = %state.kind(), "draw puzzle");
    }

    fn hide_puzzle(&mut self) {
        debug!("hide puzzle");
    }
}

struct LogAudio;

impl AudioCues for LogAudio {
    fn play(&mut self, cue: Cue) {
        debug!(%cue, "play");
    }
}

type Game = GameLoop<LogRenderer, LogAudio>;

fn main() -> Result<()> {
    let args = Args::parse();

    let default_filter = if args.verbose { "debug" } else { "info" };
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| default_filter.into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let mut config = match &args.config {
        Some(path) => EngineConfig::load_from_file(path)
            .with_context(|| format!("loading {}", path.display()))?,
        None => EngineConfig::default(),
    };
    if let Some(rooms) = args.rooms {
        config.dungeon.min_rooms = rooms;
        config.dungeon.max_rooms = config.dungeon.max_rooms.max(rooms);
    }

    let mut game = GameLoop::new(config, args.floor, args.seed, LogRenderer, LogAudio)
        .context("generating floor")?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&game.state().floor)?);
        return Ok(());
    }

    print_floor(&game);
    if let Some(steps) = args.walk {
        explore(&mut game, steps, args.seed);
    }
    Ok(())
}

fn print_floor(game: &Game) {
    let floor = &game.state().floor;
    println!(
        "Floor {}: {} rooms, start {}, exit {}",
        floor.floor_number,
        floor.len(),
        floor.start_room_id,
        floor.exit_room_id
    );
    for room in floor.rooms.values() {
        let doors: Vec<String> = room
            .connections
            .iter()
            .map(|(dir, id)| format!("{dir}:{id}"))
            .collect();
        let contents: Vec<&str> = room.contents.iter().map(|c| c.kind.tag()).collect();
        println!(
            "  {:>4} {:<9} ({:>2},{:>2})  doors [{}]  contents [{}]",
            room.id.to_string(),
            room.room_type.to_string(),
            room.grid_x,
            room.grid_y,
            doors.join(" "),
            contents.join(" ")
        );
    }
    println!();
    println!("{}", MiniMap::to_ascii(floor, game.current_room_id()));
}

/// Wander from door to door, using everything in each room
fn explore(game: &mut Game, steps: u32, seed: Option<u64>) {
    let mut rng = GameRng::from_seed_or_entropy(seed);
    for _ in 0..steps {
        clear_room(game);
        if game.exit_reached() || game.state().is_dead() {
            break;
        }

        let doors: Vec<_> = game
            .state()
            .current_room()
            .map(|r| r.connections.keys().copied().collect())
            .unwrap_or_default();
        let Some(&direction) = rng.choose(&doors) else {
            break;
        };
        game.use_door(direction);
        while game.rooms().is_transitioning() {
            game.update(16);
        }
    }

    let state = game.state();
    info!(
        room = %game.current_room_id(),
        gold = state.gold(),
        xp = state.xp(),
        health = state.health(),
        exit = game.exit_reached(),
        "exploration finished"
    );
    println!();
    println!(
        "{}",
        MiniMap::to_ascii(&state.floor, game.current_room_id())
    );
    let map = game.minimap(Viewport::default());
    println!(
        "{} rooms on the map, {} links, gold {}, xp {}, health {}/{}",
        map.rooms.len(),
        map.links.len(),
        state.gold(),
        state.xp(),
        state.health(),
        state.max_health()
    );
}

/// Search for secrets, then use every content entry of the current room
fn clear_room(game: &mut Game) {
    let Some(room) = game.state().current_room() else {
        return;
    };
    let (w, h) = (game.config().room_width, game.config().room_height);
    let spots: Vec<(f32, f32)> = room
        .contents
        .iter()
        .filter(|c| c.is_hidden_secret())
        .map(|c| c.position_in(w, h))
        .collect();
    for (x, y) in spots {
        let pos = game.state().player_pos();
        game.move_player(x - pos.x, y - pos.y);
        game.handle(Command::Interact);
    }

    let count = game.state().current_room().map_or(0, |r| r.contents.len());
    for index in 0..count {
        let result = game.interact_content(index);
        match result {
            Interaction::Encounter { tier } => {
                if let Some(xp) = game.defeat_enemy(index) {
                    println!("  defeated a {tier} enemy (+{xp} xp)");
                }
            }
            Interaction::PuzzleStarted(_) => solve_puzzle(game),
            Interaction::Gold(gold) => println!("  found {gold} gold"),
            Interaction::Damage(damage) => println!("  trap! -{damage} health"),
            Interaction::Dialogue { name, dialogue } => println!("  {name}: \"{dialogue}\""),
            Interaction::Secret(claim) => println!("  secret: {claim:?}"),
            Interaction::ExitReached => {
                println!("  reached the exit");
                return;
            }
            _ => {}
        }
    }
}

fn solve_puzzle(game: &mut Game) {
    let commands = match game.puzzles().state() {
        Some(PuzzleState::Riddle(riddle)) => {
            println!("  riddle: {}", riddle.question);
            let mut cmds = vec![Command::Down; riddle.correct_index];
            cmds.push(Command::Confirm);
            cmds
        }
        Some(PuzzleState::SequenceLock(lock)) => {
            println!("  sequence lock of {}", lock.pattern.len());
            lock.pattern.iter().map(|d| Command::from_direction(*d)).collect()
        }
        None => return,
    };
    // Wait out the memorize window
    let memorize = game.config().memorize_ms;
    game.update(memorize);
    for cmd in commands {
        if let LoopEvent::PuzzleEnded(outcome) = game.handle(cmd) {
            println!("  puzzle: {outcome:?}");
        }
    }
}
