use chrono::prelude::*;
use sweeper_core::{Board, Button, Coord2, GameConfig, InteractOutcome};

use crate::records::Record;

/// One board plus the bookkeeping a player sees around it: timer and click counter.
#[derive(Clone, Debug)]
pub(crate) struct GameSession {
    pub board: Board,
    pub started_at: Option<DateTime<Utc>>,
    pub ended_at: Option<DateTime<Utc>>,
    pub click_count: u32,
}

impl GameSession {
    pub fn new(board: Board) -> Self {
        Self {
            board,
            started_at: None,
            ended_at: None,
            click_count: 0,
        }
    }

    pub fn elapsed_secs(&self, now: DateTime<Utc>) -> u32 {
        if let Some(started_at) = self.started_at {
            (self.ended_at.unwrap_or(now) - started_at)
                .num_seconds()
                .max(0) as u32
        } else {
            0
        }
    }

    /// Button held down over `coords`: show what releasing it would affect.
    pub fn hold(&mut self, coords: Coord2) {
        self.board.telegraph(coords);
    }

    /// Button released over `coords`. After a win or loss this starts the next game instead.
    pub fn release(
        &mut self,
        coords: Coord2,
        button: Button,
        now: DateTime<Utc>,
    ) -> InteractOutcome {
        self.board.clear_telegraph();

        if self.board.is_finished() {
            self.restart();
            return InteractOutcome::NoChange;
        }

        let outcome = self.board.interact(coords, button);
        self.on_outcome(outcome, now);
        outcome
    }

    pub fn restart(&mut self) {
        self.board.restart();
        self.reset_clock();
    }

    pub fn new_game(&mut self, config: GameConfig) {
        self.board.initialize(config);
        self.reset_clock();
    }

    /// Time and clicks of a won game.
    pub fn record(&self, now: DateTime<Utc>) -> Option<Record> {
        (self.board.state() == sweeper_core::GameState::Won).then(|| Record {
            secs: self.elapsed_secs(now),
            clicks: self.click_count,
        })
    }

    fn on_outcome(&mut self, outcome: InteractOutcome, now: DateTime<Utc>) {
        if !outcome.has_update() {
            return;
        }

        self.click_count += 1;
        if self.started_at.is_none() {
            log::debug!("started at {}", now);
            self.started_at = Some(now);
        }
        if outcome.is_final() {
            log::debug!("ended at {}", now);
            self.ended_at = Some(now);
        }
    }

    fn reset_clock(&mut self) {
        self.started_at = None;
        self.ended_at = None;
        self.click_count = 0;
    }
}
