use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// The closed set of question strategies.
///
/// Strategy selection happens once, at configuration time. Tags that don't name a known strategy
/// resolve to [Strategy::Mixed] rather than failing the run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase", from = "String")]
pub enum Strategy {
    Historical,
    Mathematical,
    Geographical,
    Hypothetical,
    Technical,
    Mixed,
}

impl Strategy {
    /// Resolve a strategy tag, falling back to the mixed composite for unknown tags.
    pub fn from_tag(tag: &str) -> Self {
        match tag {
            "historical" => Strategy::Historical,
            "mathematical" => Strategy::Mathematical,
            "geographical" => Strategy::Geographical,
            "hypothetical" => Strategy::Hypothetical,
            "technical" => Strategy::Technical,
            "mixed" => Strategy::Mixed,
            other => {
                log::debug!("Unknown question strategy '{}', falling back to mixed", other);
                Strategy::Mixed
            }
        }
    }

    /// The concrete strategies that [Strategy::Mixed] samples from.
    pub(crate) const CONCRETE: [Strategy; 5] = [
        Strategy::Historical,
        Strategy::Mathematical,
        Strategy::Geographical,
        Strategy::Hypothetical,
        Strategy::Technical,
    ];
}

// Routes deserialization through the tag fallback, so a config file with an unknown strategy
// resolves to mixed instead of failing the run.
impl From<String> for Strategy {
    fn from(tag: String) -> Self {
        Strategy::from_tag(&tag)
    }
}

impl FromStr for Strategy {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Strategy::from_tag(s))
    }
}

impl fmt::Display for Strategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let tag = match self {
            Strategy::Historical => "historical",
            Strategy::Mathematical => "mathematical",
            Strategy::Geographical => "geographical",
            Strategy::Hypothetical => "hypothetical",
            Strategy::Technical => "technical",
            Strategy::Mixed => "mixed",
        };
        write!(f, "{}", tag)
    }
}
