use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::ClassforgeError;

/// Relation types the link oracle predicts between two students.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RelationType {
    Friends,
    Advice,
    Moretime,
    Influential,
    Disrespect,
    Feedback,
}

impl RelationType {
    /// The full relation set, in the order the trained link model emits it.
    pub const ALL: [RelationType; 6] = [
        RelationType::Friends,
        RelationType::Advice,
        RelationType::Moretime,
        RelationType::Influential,
        RelationType::Disrespect,
        RelationType::Feedback,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            RelationType::Friends => "friends",
            RelationType::Advice => "advice",
            RelationType::Moretime => "moretime",
            RelationType::Influential => "influential",
            RelationType::Disrespect => "disrespect",
            RelationType::Feedback => "feedback",
        }
    }
}

impl fmt::Display for RelationType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for RelationType {
    type Err = ClassforgeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "friends" => Ok(RelationType::Friends),
            "advice" => Ok(RelationType::Advice),
            "moretime" => Ok(RelationType::Moretime),
            "influential" => Ok(RelationType::Influential),
            "disrespect" => Ok(RelationType::Disrespect),
            "feedback" => Ok(RelationType::Feedback),
            other => Err(ClassforgeError::InvalidConfig(format!("unknown relation type '{}'", other))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_relation_round_trips_through_str() {
        for rel in RelationType::ALL {
            assert_eq!(rel.as_str().parse::<RelationType>().unwrap(), rel);
        }
        assert!("enemies".parse::<RelationType>().is_err());
    }

    #[test]
    fn test_serde_names_match_feature_prefixes() {
        let json = serde_json::to_string(&RelationType::Moretime).unwrap();
        assert_eq!(json, "\"moretime\"");
    }
}
