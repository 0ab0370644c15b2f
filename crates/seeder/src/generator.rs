use std::collections::HashSet;

use chrono::{DateTime, Duration, Utc};
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use storage::ScoreStore;

use crate::{Result, SeederError};

const FIRST_NAMES: &[&str] = &[
    "Ada", "Alan", "Barbara", "Brian", "Claude", "Dennis", "Donald", "Edsger", "Frances",
    "Grace", "Guido", "Hedy", "Ivan", "John", "Ken", "Katherine", "Linus", "Margaret",
    "Niklaus", "Radia", "Rob", "Sophie", "Tim", "Whitfield",
];

const LAST_NAMES: &[&str] = &[
    "Allen", "Backus", "Berners", "Dijkstra", "Hamilton", "Hopper", "Johnson", "Kay",
    "Kernighan", "Knuth", "Lamarr", "Liskov", "Lovelace", "McCarthy", "Perlman", "Pike",
    "Ritchie", "Shannon", "Sutherland", "Thompson", "Torvalds", "Turing", "Wilson", "Wirth",
];

/// How far back generated update times reach.
const HISTORY_DAYS: i64 = 365;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Submission {
    pub name: String,
    pub score: i64,
    pub at: DateTime<Utc>,
}

/// Produces random player submissions spread over the past year.
pub struct ScoreGenerator {
    rng: StdRng,
    max_score: i64,
    now: DateTime<Utc>,
}

impl ScoreGenerator {
    /// A fixed `rng_seed` makes runs reproducible.
    pub fn new(max_score: i64, rng_seed: Option<u64>, now: DateTime<Utc>) -> Result<Self> {
        if max_score < 0 {
            return Err(SeederError::InvalidArgument(format!(
                "max score must be non-negative, got {}",
                max_score
            )));
        }

        let rng = match rng_seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };

        Ok(Self {
            rng,
            max_score,
            now,
        })
    }

    pub fn next_submission(&mut self) -> Submission {
        let first = FIRST_NAMES.choose(&mut self.rng).copied().unwrap_or("Player");
        let last = LAST_NAMES.choose(&mut self.rng).copied().unwrap_or("One");
        let tag: u16 = self.rng.gen_range(1..10_000);

        let age = Duration::seconds(self.rng.gen_range(0..HISTORY_DAYS * 24 * 60 * 60));

        Submission {
            name: format!("{}{}{}", first, last, tag),
            score: self.rng.gen_range(0..=self.max_score),
            at: self.now - age,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SeedSummary {
    pub submitted: usize,
    pub players: usize,
}

/// Upserts `count` generated submissions. Repeated names merge by best score.
pub async fn seed(
    store: &dyn ScoreStore,
    generator: &mut ScoreGenerator,
    count: usize,
) -> Result<SeedSummary> {
    let mut names = HashSet::new();

    for i in 0..count {
        let submission = generator.next_submission();
        store
            .upsert_score(&submission.name, submission.score, submission.at)
            .await?;
        names.insert(submission.name);

        if (i + 1) % 1000 == 0 {
            tracing::info!("Seeded {}/{} submissions", i + 1, count);
        }
    }

    Ok(SeedSummary {
        submitted: count,
        players: names.len(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use storage::InMemoryScoreStore;
    use storage::models::{Period, ScoreScan, Slice};

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 10, 19, 12, 0, 0).unwrap()
    }

    #[test]
    fn test_same_seed_same_submissions() {
        let mut a = ScoreGenerator::new(1_000, Some(7), now()).unwrap();
        let mut b = ScoreGenerator::new(1_000, Some(7), now()).unwrap();

        for _ in 0..50 {
            assert_eq!(a.next_submission(), b.next_submission());
        }
    }

    #[test]
    fn test_submissions_stay_within_bounds() {
        let mut generator = ScoreGenerator::new(500, Some(42), now()).unwrap();

        for _ in 0..1_000 {
            let submission = generator.next_submission();
            assert!((0..=500).contains(&submission.score));
            assert!(submission.at <= now());
            assert!(submission.at > now() - Duration::days(HISTORY_DAYS));
            assert!(!submission.name.is_empty());
        }
    }

    #[test]
    fn test_negative_max_score_is_rejected() {
        assert!(matches!(
            ScoreGenerator::new(-1, None, now()),
            Err(SeederError::InvalidArgument(_))
        ));
    }

    #[tokio::test]
    async fn test_seed_fills_the_store() {
        let store = InMemoryScoreStore::new();
        let mut generator = ScoreGenerator::new(10_000, Some(1), now()).unwrap();

        let summary = seed(&store, &mut generator, 200).await.unwrap();

        assert_eq!(summary.submitted, 200);
        assert_eq!(summary.players, store.len());

        let all = store
            .scan_scores(&ScoreScan::new(Period::AllTime, Slice::all()))
            .await
            .unwrap();
        assert_eq!(all.len(), summary.players);
        assert!(all.windows(2).all(|pair| pair[0].score >= pair[1].score));
    }
}
