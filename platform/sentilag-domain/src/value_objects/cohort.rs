use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// User population partition; each cohort is aggregated and correlated on its own.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Cohort {
    Normal,
    Expert,
}

impl Cohort {
    pub const ALL: [Cohort; 2] = [Cohort::Normal, Cohort::Expert];

    pub fn as_str(&self) -> &'static str {
        match self {
            Cohort::Normal => "normal",
            Cohort::Expert => "expert",
        }
    }
}

impl fmt::Display for Cohort {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Cohort {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_lowercase().as_str() {
            "normal" => Ok(Cohort::Normal),
            "expert" => Ok(Cohort::Expert),
            _ => Err(format!("unsupported cohort: {value}")),
        }
    }
}
