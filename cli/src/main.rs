use anyhow::Context;
use chrono::Utc;
use clap::Parser;
use std::io::{BufRead, Write};
use std::ops::ControlFlow;
use sweeper_core::{Board, GameConfig};

use command::{Command, Preset};
use session::GameSession;
use shell::Shell;

mod command;
mod records;
mod session;
mod shell;
mod view;

#[derive(Parser, Debug)]
#[command(version, about = "Minesweeper on the terminal", long_about = None)]
struct Args {
    /// What log level to use
    #[command(flatten)]
    verbose: clap_verbosity_flag::Verbosity,

    /// Board as WIDTH HEIGHT [MINES], each dimension at most 255; falls back to 16x16
    /// with 40 mines
    #[arg(num_args = 0..=3, value_name = "WIDTH HEIGHT MINES")]
    board: Vec<String>,

    /// Use a preset board instead
    #[arg(short, long, value_enum)]
    preset: Option<Preset>,

    /// Force a seed instead of random
    #[arg(short, long)]
    seed: Option<u64>,
}

impl Args {
    fn game_config(&self) -> GameConfig {
        if let Some(preset) = self.preset {
            return preset.config();
        }
        if self.board.is_empty() {
            return GameConfig::default();
        }
        command::board_from_args(&self.board).unwrap_or_else(|| {
            log::warn!(
                "Invalid board {:?} (dimensions must be 1 to 255), using the default",
                self.board
            );
            GameConfig::default()
        })
    }
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    env_logger::Builder::new()
        .filter_level(args.verbose.log_level_filter())
        .init();

    let config = args.game_config();
    let seed = args.seed.unwrap_or_else(rand::random);
    log::debug!("seed: {}, config: {:?}", seed, config);

    let mut shell = Shell::new(GameSession::new(Board::new(config, seed)));
    let mut stdout = std::io::stdout().lock();
    writeln!(stdout, "{}", shell.screen(Utc::now()))?;

    for line in std::io::stdin().lock().lines() {
        let line = line.context("Could not read command")?;
        if line.trim().is_empty() {
            continue;
        }

        let text = match Command::parse(&line) {
            Ok(command) => match shell.execute(command, Utc::now()) {
                ControlFlow::Continue(text) => text,
                ControlFlow::Break(()) => break,
            },
            Err(err) => err.to_string(),
        };
        writeln!(stdout, "{}", text)?;
        stdout.flush()?;
    }

    log::debug!("App exited");
    Ok(())
}
