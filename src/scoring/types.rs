use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

pub type DayTimestamp = i64;
pub type SubmissionCount = u32;
/// Day-start timestamp → submissions made that day
pub type SubmissionCalendar = BTreeMap<DayTimestamp, SubmissionCount>;

/// Problem difficulty as reported by LeetCode
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Difficulty {
    Easy,
    Medium,
    Hard,
}

impl Difficulty {
    pub const ALL: [Difficulty; 3] = [Difficulty::Easy, Difficulty::Medium, Difficulty::Hard];

    /// Parse the platform's difficulty label; "All" and unknown labels yield `None`
    pub fn from_label(label: &str) -> Option<Self> {
        match label.trim().to_ascii_lowercase().as_str() {
            "easy" => Some(Difficulty::Easy),
            "medium" => Some(Difficulty::Medium),
            "hard" => Some(Difficulty::Hard),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            Difficulty::Easy => "Easy",
            Difficulty::Medium => "Medium",
            Difficulty::Hard => "Hard",
        }
    }

    pub fn weight(&self) -> u64 {
        match self {
            Difficulty::Easy => 1,
            Difficulty::Medium => 3,
            Difficulty::Hard => 7,
        }
    }
}

/// Solved-problem counts split by difficulty
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DifficultyCounts {
    pub easy: u32,
    pub medium: u32,
    pub hard: u32,
}

impl DifficultyCounts {
    pub fn new(easy: u32, medium: u32, hard: u32) -> Self {
        Self { easy, medium, hard }
    }

    pub fn total(&self) -> u32 {
        self.easy.saturating_add(self.medium).saturating_add(self.hard)
    }

    /// Total that fails instead of saturating
    pub fn checked_total(&self) -> Option<u32> {
        self.easy.checked_add(self.medium)?.checked_add(self.hard)
    }

    pub fn get(&self, difficulty: Difficulty) -> u32 {
        match difficulty {
            Difficulty::Easy => self.easy,
            Difficulty::Medium => self.medium,
            Difficulty::Hard => self.hard,
        }
    }

    pub fn add(&mut self, difficulty: Difficulty, amount: u32) {
        match difficulty {
            Difficulty::Easy => self.easy += amount,
            Difficulty::Medium => self.medium += amount,
            Difficulty::Hard => self.hard += amount,
        }
    }

    /// Counts with `amount` added to one bucket, or `None` if the bucket or the total overflows
    pub fn checked_add(&self, difficulty: Difficulty, amount: u32) -> Option<Self> {
        let mut next = *self;
        let bucket = match difficulty {
            Difficulty::Easy => &mut next.easy,
            Difficulty::Medium => &mut next.medium,
            Difficulty::Hard => &mut next.hard,
        };
        *bucket = bucket.checked_add(amount)?;
        next.checked_total()?;
        Some(next)
    }

    /// Bucket with the highest count; ties go to the easier difficulty
    pub fn best_represented(&self) -> Difficulty {
        Difficulty::ALL
            .into_iter()
            .fold(Difficulty::Easy, |best, candidate| {
                if self.get(candidate) > self.get(best) {
                    candidate
                } else {
                    best
                }
            })
    }
}
