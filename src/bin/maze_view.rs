//! First-person maze viewer.
//!
//! ```bash
//! cargo run --release --bin maze_view -- [maze_dir] [--scale 2] [--fps 30]
//! ```
//!
//! Without a directory the built-in demo maze is shown.  ↑/W and ↓/S walk,
//! ←/→ turn, Esc quits.  Set `RUST_LOG=info` to see quiz prompts.

use clap::Parser;
use minifb::{Key, Scale, Window, WindowOptions};
use std::path::PathBuf;
use std::time::{Duration, Instant};

use raymaze::{
    assets::{self, LoadedMaze},
    engine::{Engine, ViewConfig},
    renderer::Software,
    sim::{InputCmd, MoveEvent, PlayerController},
    world::AngleTable,
};

#[derive(Parser, Debug)]
#[command(author, version, about)]
struct Opts {
    /// Directory holding Walls.txt, maze.ron and the images
    #[arg(value_name = "DIR")]
    maze_dir: Option<PathBuf>,

    /// Window pixels per frame-buffer pixel (1, 2, 4 or 8)
    #[arg(long, default_value_t = 2)]
    scale: u8,

    #[arg(long, default_value_t = 30)]
    fps: usize,
}

fn window_scale(n: u8) -> Scale {
    match n {
        0 | 1 => Scale::X1,
        2 | 3 => Scale::X2,
        4..=7 => Scale::X4,
        _ => Scale::X8,
    }
}

fn main() -> anyhow::Result<()> {
    env_logger::init();
    let opts = Opts::parse();

    let view = ViewConfig::default();
    let tables = AngleTable::new(view.width);

    let LoadedMaze {
        maze,
        bank,
        skins,
        scenario,
    } = match &opts.maze_dir {
        Some(dir) => assets::load_maze_dir(dir, &tables)?,
        None => assets::demo()?,
    };

    let mut controller = PlayerController::new(&tables, scenario.start(), view.player_speed);
    let mut engine = Engine::new(Software::default(), maze, bank, skins, view);
    engine.apply_destination(scenario.start());

    let title = match &opts.maze_dir {
        Some(dir) => format!("Maze: {}", dir.display()),
        None => "Maze: demo".to_string(),
    };
    let mut win = Window::new(
        &title,
        view.width,
        view.height,
        WindowOptions {
            scale: window_scale(opts.scale),
            ..WindowOptions::default()
        },
    )?;
    win.set_target_fps(opts.fps);

    // ────────────────── benchmarking state ──────────────────────────────
    let mut acc_time = Duration::ZERO;
    let mut acc_frames = 0usize;
    let mut last_print = Instant::now();

    while win.is_open() && !win.is_key_down(Key::Escape) {
        let t0 = Instant::now();

        /* --------------- one InputCmd per frame --------------------------- */
        let mut cmd = InputCmd::default();
        if win.is_key_down(Key::Up) || win.is_key_down(Key::W) {
            cmd.forward += 1.0;
        }
        if win.is_key_down(Key::Down) || win.is_key_down(Key::S) {
            cmd.forward -= 1.0;
        }
        if win.is_key_down(Key::Left) || win.is_key_down(Key::A) {
            cmd.turn += 1.0;
        }
        if win.is_key_down(Key::Right) || win.is_key_down(Key::D) {
            cmd.turn -= 1.0;
        }

        for event in controller.apply(cmd, engine.maze(), &scenario) {
            match event {
                MoveEvent::TrapEntered(entry) => {
                    if let Some(trap) = scenario.traps.get(entry.index) {
                        engine.enter_trap(trap, scenario.destinations());
                    }
                }
                MoveEvent::Teleported { destination } => {
                    log::debug!("teleported to destination {destination}");
                }
                MoveEvent::QuestionActivated(id) => {
                    if let Some(q) = engine.maze().book().get(id) {
                        log::info!("question {}:\n{}", id as char, q.prompt());
                    }
                }
                MoveEvent::Answered { question, slot } => {
                    log::info!("question {} answered {}", question as char, slot.as_char());
                }
            }
        }

        /* draw */
        let player = *controller.player();
        let mut shown = Ok(());
        engine.render_frame(
            player.pos,
            player.angle,
            controller.active_question(),
            |fb, w, h| {
                acc_time += t0.elapsed();
                acc_frames += 1;
                shown = win.update_with_buffer(fb, w, h);
            },
        );
        shown?;

        if last_print.elapsed() >= Duration::from_secs(3) {
            let avg_ms = acc_time.as_secs_f64() * 1000.0 / acc_frames.max(1) as f64;
            log::info!("avg frame: {:.2} ms  ({:.1} FPS)", avg_ms, 1000.0 / avg_ms);
            acc_time = Duration::ZERO;
            acc_frames = 0;
            last_print = Instant::now();
        }
    }
    Ok(())
}
