use clap::ValueEnum;
use sweeper_core::{Button, CellCount, Coord, Coord2, GameConfig};
use thiserror::Error;

#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
pub(crate) enum Preset {
    Beginner,
    Intermediate,
    Expert,
}

impl Preset {
    pub fn config(self) -> GameConfig {
        match self {
            Self::Beginner => GameConfig::BEGINNER,
            Self::Intermediate => GameConfig::INTERMEDIATE,
            Self::Expert => GameConfig::EXPERT,
        }
    }
}

/// Mines used when only a width and height are given.
const DEFAULT_MINES: u16 = 40;

/// Reads `WIDTH HEIGHT [MINES]`, all positive. `None` for anything else, including a
/// dimension above `Coord::MAX`. Mine counts of any size are clamped by [`GameConfig::new`].
pub(crate) fn board_from_args<S: AsRef<str>>(args: &[S]) -> Option<GameConfig> {
    let (width, height, mines) = match args {
        [width, height] => (width, height, None),
        [width, height, mines] => (width, height, Some(mines)),
        _ => return None,
    };

    let width: Coord = width.as_ref().parse().ok().filter(|&w| w > 0)?;
    let height: Coord = height.as_ref().parse().ok().filter(|&h| h > 0)?;
    let mines = match mines {
        Some(mines) => {
            let mines: u64 = mines.as_ref().parse().ok().filter(|&m| m > 0)?;
            CellCount::try_from(mines).unwrap_or(CellCount::MAX)
        }
        None => DEFAULT_MINES,
    };
    Some(GameConfig::new((width, height), mines))
}

#[derive(Error, Debug, PartialEq, Eq)]
pub(crate) enum CommandError {
    #[error("Unknown command {0:?}, try \"help\"")]
    Unknown(String),
    #[error("Expected {0}")]
    MissingArgument(&'static str),
    #[error("Not a number: {0:?}")]
    InvalidNumber(String),
    #[error("Invalid board, expected a preset or WIDTH HEIGHT [MINES]")]
    InvalidBoard,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub(crate) enum Command {
    Release(Coord2, Button),
    Hold(Coord2),
    Probe(Coord2),
    /// `None` keeps the current configuration.
    New(Option<GameConfig>),
    Dump,
    Scores,
    Help,
    Quit,
}

pub(crate) const HELP: &str = "\
commands:
  reveal|r X Y     uncover a tile, or chord on a satisfied number
  flag|f X Y       place or remove a flag
  middle|m X Y     middle click (does nothing)
  hold|h X Y       preview which tiles a press would open
  probe X Y        debug mine probe (needs the mine-probe feature)
  new [PRESET | W H [M]]
                   start a new game (presets: beginner, intermediate, expert)
  restart          new game with the same board
  dump             print the board as JSON
  scores           best results this session
  quit|q";

impl Command {
    pub fn parse(line: &str) -> Result<Self, CommandError> {
        let mut words = line.split_whitespace();
        let Some(name) = words.next() else {
            return Err(CommandError::MissingArgument("a command"));
        };
        let args: Vec<&str> = words.collect();

        Ok(match name.to_ascii_lowercase().as_str() {
            "reveal" | "r" => Self::Release(parse_coords(&args)?, Button::Primary),
            "flag" | "f" => Self::Release(parse_coords(&args)?, Button::Secondary),
            "middle" | "m" => Self::Release(parse_coords(&args)?, Button::Middle),
            "hold" | "h" => Self::Hold(parse_coords(&args)?),
            "probe" => Self::Probe(parse_coords(&args)?),
            "new" | "n" => Self::New(parse_board(&args)?),
            "restart" => Self::New(None),
            "dump" => Self::Dump,
            "scores" => Self::Scores,
            "help" | "?" => Self::Help,
            "quit" | "q" | "exit" => Self::Quit,
            _ => return Err(CommandError::Unknown(name.to_string())),
        })
    }
}

fn parse_coords(args: &[&str]) -> Result<Coord2, CommandError> {
    let [x, y] = args else {
        return Err(CommandError::MissingArgument("X Y"));
    };
    Ok((parse_axis(x)?, parse_axis(y)?))
}

/// Anything that does not fit a coordinate lands off the board, where the engine ignores it.
fn parse_axis(word: &str) -> Result<Coord, CommandError> {
    let value: i64 = word
        .parse()
        .map_err(|_| CommandError::InvalidNumber(word.to_string()))?;
    Ok(Coord::try_from(value).unwrap_or(Coord::MAX))
}

fn parse_board(args: &[&str]) -> Result<Option<GameConfig>, CommandError> {
    match args {
        [] => Ok(None),
        [preset] => Preset::from_str(preset, true)
            .map(|preset| Some(preset.config()))
            .map_err(|_| CommandError::InvalidBoard),
        _ => board_from_args(args)
            .map(Some)
            .ok_or(CommandError::InvalidBoard),
    }
}
