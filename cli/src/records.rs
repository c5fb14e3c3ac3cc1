use std::collections::HashMap;
use sweeper_core::GameConfig;

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub(crate) struct Record {
    pub secs: u32,
    pub clicks: u32,
}

impl Record {
    /// Faster wins; equal times go to fewer clicks.
    pub fn beats(&self, other: &Record) -> bool {
        (self.secs, self.clicks) < (other.secs, other.clicks)
    }
}

/// Best results per board configuration, kept for the lifetime of the process.
#[derive(Clone, Debug, Default)]
pub(crate) struct Records {
    best: HashMap<GameConfig, Record>,
}

impl Records {
    pub fn best(&self, config: GameConfig) -> Option<Record> {
        self.best.get(&config).copied()
    }

    /// Stores `record` if it is the first or best for `config`, returning whether it was.
    pub fn submit(&mut self, config: GameConfig, record: Record) -> bool {
        match self.best.get(&config) {
            Some(best) if !record.beats(best) => false,
            _ => {
                log::info!("New best for {:?}: {:?}", config, record);
                self.best.insert(config, record);
                true
            }
        }
    }

    /// All entries, largest boards first.
    pub fn entries(&self) -> Vec<(GameConfig, Record)> {
        let mut entries: Vec<_> = self.best.iter().map(|(&c, &r)| (c, r)).collect();
        entries.sort_by_key(|(config, _)| {
            (
                std::cmp::Reverse(config.total_cells()),
                std::cmp::Reverse(config.mines),
            )
        });
        entries
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn keeps_only_improvements() {
        let mut records = Records::default();
        let config = GameConfig::BEGINNER;

        assert!(records.submit(config, Record { secs: 30, clicks: 20 }));
        assert!(!records.submit(config, Record { secs: 31, clicks: 5 }));
        assert!(!records.submit(config, Record { secs: 30, clicks: 20 }));
        assert!(records.submit(config, Record { secs: 30, clicks: 12 }));

        assert_eq!(records.best(config), Some(Record { secs: 30, clicks: 12 }));
        assert_eq!(records.best(GameConfig::EXPERT), None);
    }

    #[test]
    fn entries_are_keyed_by_config() {
        let mut records = Records::default();
        records.submit(GameConfig::BEGINNER, Record { secs: 9, clicks: 9 });
        records.submit(GameConfig::EXPERT, Record { secs: 99, clicks: 99 });

        let configs: Vec<_> = records.entries().into_iter().map(|(c, _)| c).collect();
        assert_eq!(configs, [GameConfig::EXPERT, GameConfig::BEGINNER]);
    }
}
