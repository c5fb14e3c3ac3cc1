use chrono::prelude::*;
use std::fmt::Write;
use std::ops::ControlFlow;
use sweeper_core::InteractOutcome;

use crate::command::{Command, HELP};
use crate::records::Records;
use crate::session::GameSession;
use crate::view::BoardView;

/// Applies commands to the session and produces the text to show for each.
#[derive(Debug)]
pub(crate) struct Shell {
    pub session: GameSession,
    pub records: Records,
}

impl Shell {
    pub fn new(session: GameSession) -> Self {
        Self {
            session,
            records: Records::default(),
        }
    }

    pub fn screen(&self, now: DateTime<Utc>) -> String {
        BoardView::capture(&self.session, now).render()
    }

    pub fn execute(&mut self, command: Command, now: DateTime<Utc>) -> ControlFlow<(), String> {
        log::trace!("command: {:?}", command);

        let text = match command {
            Command::Release(coords, button) => {
                let outcome = self.session.release(coords, button, now);
                let mut text = self.screen(now);
                if outcome == InteractOutcome::Won {
                    self.on_win(now, &mut text);
                }
                text
            }
            Command::Hold(coords) => {
                self.session.hold(coords);
                self.screen(now)
            }
            Command::Probe(coords) => {
                let has_mine = self.session.board.has_mine_at(coords);
                format!("{:?}: {}", coords, if has_mine { "mine" } else { "no mine" })
            }
            Command::New(config) => {
                match config {
                    Some(config) => self.session.new_game(config),
                    None => self.session.restart(),
                }
                self.screen(now)
            }
            Command::Dump => {
                let view = BoardView::capture(&self.session, now);
                serde_json::to_string(&view).unwrap_or_else(|err| format!("dump failed: {err}"))
            }
            Command::Scores => self.scores(),
            Command::Help => HELP.to_string(),
            Command::Quit => return ControlFlow::Break(()),
        };
        ControlFlow::Continue(text)
    }

    fn on_win(&mut self, now: DateTime<Utc>, text: &mut String) {
        let Some(record) = self.session.record(now) else {
            return;
        };
        let config = self.session.board.config();
        if self.records.submit(config, record) {
            let _ = write!(text, "\nnew best: {}s in {} clicks", record.secs, record.clicks);
        } else if let Some(best) = self.records.best(config) {
            let _ = write!(text, "\nbest: {}s in {} clicks", best.secs, best.clicks);
        }
    }

    fn scores(&self) -> String {
        let entries = self.records.entries();
        if entries.is_empty() {
            return "no wins yet".to_string();
        }

        let mut text = String::new();
        for (config, record) in entries {
            let _ = writeln!(
                text,
                "{}x{} {} mines: {}s, {} clicks",
                config.size.0, config.size.1, config.mines, record.secs, record.clicks
            );
        }
        text.truncate(text.trim_end().len());
        text
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sweeper_core::{Board, Button, GameConfig, GameState, MineLayout};

    fn t0() -> DateTime<Utc> {
        DateTime::<Utc>::from_timestamp_millis(0).unwrap()
    }

    fn shell() -> Shell {
        let layout = MineLayout::from_mine_coords((2, 1), &[(0, 0)]).unwrap();
        Shell::new(GameSession::new(Board::from_layout(layout, 3)))
    }

    #[test]
    fn win_is_recorded_once_per_improvement() {
        let mut shell = shell();

        let ControlFlow::Continue(text) =
            shell.execute(Command::Release((1, 0), Button::Primary), t0())
        else {
            panic!("unexpected quit");
        };

        assert!(text.ends_with("new best: 0s in 1 clicks"));
        assert_eq!(
            shell.execute(Command::Scores, t0()),
            ControlFlow::Continue("2x1 1 mines: 0s, 1 clicks".to_string())
        );
    }

    #[test]
    fn repeat_win_shows_standing_best() {
        let mut shell = shell();
        let _ = shell.execute(Command::Release((1, 0), Button::Primary), t0());

        // Any release on a finished board starts the next game.
        let _ = shell.execute(Command::Release((1, 0), Button::Primary), t0());
        let ControlFlow::Continue(text) =
            shell.execute(Command::Release((1, 0), Button::Primary), t0())
        else {
            panic!("unexpected quit");
        };

        assert_eq!(shell.session.board.state(), GameState::Won);
        assert!(text.ends_with("\nbest: 0s in 1 clicks"));
        assert!(!text.contains("new best"));
    }

    #[test]
    fn new_game_replaces_board() {
        let mut shell = shell();

        let _ = shell.execute(Command::New(Some(GameConfig::BEGINNER)), t0());

        assert_eq!(shell.session.board.config(), GameConfig::BEGINNER);
        assert_eq!(shell.session.board.state(), GameState::NotStarted);
    }

    #[test]
    fn dump_is_json() {
        let mut shell = shell();

        let ControlFlow::Continue(json) = shell.execute(Command::Dump, t0()) else {
            panic!("unexpected quit");
        };
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();

        assert_eq!(value["state"], "NotStarted");
        assert_eq!(value["rows"][0][1], "Covered");
    }

    #[test]
    fn quit_breaks() {
        assert_eq!(shell().execute(Command::Quit, t0()), ControlFlow::Break(()));
    }
}
