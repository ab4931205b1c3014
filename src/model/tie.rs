use serde::{Deserialize, Serialize};
use std::fmt;

use super::student::{Roster, StudentId};

/// Label of an enriched tie. Friendship is split by reciprocity and
/// disrespect into an aggressor/target pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TieLabel {
    MutualFriend,
    OnewayFriend,
    Advice,
    Feedback,
    Moretime,
    Influential,
    Bully,
    Victim,
}

impl TieLabel {
    pub fn as_str(&self) -> &'static str {
        match self {
            TieLabel::MutualFriend => "mutual_friend",
            TieLabel::OnewayFriend => "oneway_friend",
            TieLabel::Advice => "advice",
            TieLabel::Feedback => "feedback",
            TieLabel::Moretime => "moretime",
            TieLabel::Influential => "influential",
            TieLabel::Bully => "bully",
            TieLabel::Victim => "victim",
        }
    }
}

impl fmt::Display for TieLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Directed, weighted tie between two student indices.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Tie {
    pub source: usize,
    pub target: usize,
    pub label: TieLabel,
    pub weight: f64,
}

/// Tie in student-id space, for reports.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TieRow {
    pub source: StudentId,
    pub target: StudentId,
    pub label: TieLabel,
    pub weight: f64,
}

impl Tie {
    pub fn to_row(&self, roster: &Roster) -> Option<TieRow> {
        Some(TieRow {
            source: roster.id(self.source)?.clone(),
            target: roster.id(self.target)?.clone(),
            label: self.label,
            weight: self.weight,
        })
    }
}
