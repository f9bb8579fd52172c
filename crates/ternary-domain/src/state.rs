//! Decision state module - the three outcomes of an evaluation

use serde::{Deserialize, Serialize};
use std::fmt;

/// Outcome of a ternary evaluation
///
/// Numeric codes follow the audit format: PROCEED = +1, HOLD = 0, HALT = -1.
///
/// The state also forms a Kleene (strong) three-valued logic with PROCEED as
/// true, HALT as false and HOLD as unknown, so several decisions can be
/// combined with [`and`](DecisionState::and), [`or`](DecisionState::or) and
/// [`not`](DecisionState::not).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DecisionState {
    /// Conditions are clear and verified: act
    #[serde(rename = "PROCEED")]
    Proceed,

    /// Deliberate deferral under uncertainty (epistemic hold)
    #[serde(rename = "EPISTEMIC_HOLD", alias = "HOLD")]
    Hold,

    /// Conditions fail or evidence is insufficient: do not act
    #[serde(rename = "HALT")]
    Halt,
}

impl DecisionState {
    /// All states, in code order (+1, 0, -1)
    pub const ALL: [DecisionState; 3] = [DecisionState::Proceed, DecisionState::Hold, DecisionState::Halt];

    /// Integer code of the state
    pub fn value(&self) -> i8 {
        match self {
            DecisionState::Proceed => 1,
            DecisionState::Hold => 0,
            DecisionState::Halt => -1,
        }
    }

    /// State for an integer code
    pub fn from_value(value: i8) -> Option<Self> {
        match value {
            1 => Some(DecisionState::Proceed),
            0 => Some(DecisionState::Hold),
            -1 => Some(DecisionState::Halt),
            _ => None,
        }
    }

    /// Canonical state name
    pub fn as_str(&self) -> &'static str {
        match self {
            DecisionState::Proceed => "PROCEED",
            DecisionState::Hold => "EPISTEMIC_HOLD",
            DecisionState::Halt => "HALT",
        }
    }

    /// Parse a state name (case-insensitive, `HOLD` accepted for the hold state)
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_uppercase().as_str() {
            "PROCEED" => Some(DecisionState::Proceed),
            "EPISTEMIC_HOLD" | "HOLD" => Some(DecisionState::Hold),
            "HALT" => Some(DecisionState::Halt),
            _ => None,
        }
    }

    /// Kleene conjunction: HALT dominates, then HOLD
    pub fn and(self, other: Self) -> Self {
        use DecisionState::*;
        match (self, other) {
            (Halt, _) | (_, Halt) => Halt,
            (Hold, _) | (_, Hold) => Hold,
            _ => Proceed,
        }
    }

    /// Kleene disjunction: PROCEED dominates, then HOLD
    pub fn or(self, other: Self) -> Self {
        use DecisionState::*;
        match (self, other) {
            (Proceed, _) | (_, Proceed) => Proceed,
            (Hold, _) | (_, Hold) => Hold,
            _ => Halt,
        }
    }

    /// Kleene negation: HOLD stays HOLD
    #[allow(clippy::should_implement_trait)]
    pub fn not(self) -> Self {
        match self {
            DecisionState::Proceed => DecisionState::Halt,
            DecisionState::Hold => DecisionState::Hold,
            DecisionState::Halt => DecisionState::Proceed,
        }
    }

    /// Fold a sequence of states with [`and`](Self::and); an empty sequence is PROCEED
    pub fn all<I: IntoIterator<Item = Self>>(states: I) -> Self {
        states.into_iter().fold(DecisionState::Proceed, Self::and)
    }

    /// Fold a sequence of states with [`or`](Self::or); an empty sequence is HALT
    pub fn any<I: IntoIterator<Item = Self>>(states: I) -> Self {
        states.into_iter().fold(DecisionState::Halt, Self::or)
    }
}

impl fmt::Display for DecisionState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for DecisionState {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s).ok_or_else(|| format!("Invalid decision state: {}", s))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use DecisionState::*;

    #[test]
    fn test_codes_roundtrip() {
        for state in DecisionState::ALL {
            assert_eq!(DecisionState::from_value(state.value()), Some(state));
        }
        assert_eq!(DecisionState::from_value(2), None);
    }

    #[test]
    fn test_parse() {
        assert_eq!(DecisionState::parse("proceed"), Some(Proceed));
        assert_eq!(DecisionState::parse("HOLD"), Some(Hold));
        assert_eq!(DecisionState::parse("Epistemic_Hold"), Some(Hold));
        assert_eq!(DecisionState::parse("halt"), Some(Halt));
        assert!("maybe".parse::<DecisionState>().is_err());
    }

    #[test]
    fn test_kleene_and() {
        assert_eq!(Proceed.and(Proceed), Proceed);
        assert_eq!(Proceed.and(Hold), Hold);
        assert_eq!(Hold.and(Halt), Halt);
        assert_eq!(Hold.and(Hold), Hold);
    }

    #[test]
    fn test_kleene_or() {
        assert_eq!(Halt.or(Halt), Halt);
        assert_eq!(Halt.or(Hold), Hold);
        assert_eq!(Hold.or(Proceed), Proceed);
    }

    #[test]
    fn test_kleene_not() {
        assert_eq!(Proceed.not(), Halt);
        assert_eq!(Halt.not(), Proceed);
        assert_eq!(Hold.not(), Hold);
    }

    #[test]
    fn test_de_morgan() {
        for a in DecisionState::ALL {
            for b in DecisionState::ALL {
                assert_eq!(a.and(b).not(), a.not().or(b.not()));
            }
        }
    }

    #[test]
    fn test_folds() {
        assert_eq!(DecisionState::all([Proceed, Hold, Proceed]), Hold);
        assert_eq!(DecisionState::any([Halt, Hold]), Hold);
        assert_eq!(DecisionState::all([]), Proceed);
        assert_eq!(DecisionState::any([]), Halt);
    }

    #[test]
    fn test_serde_names() {
        assert_eq!(serde_json::to_string(&Hold).unwrap(), "\"EPISTEMIC_HOLD\"");
        let parsed: DecisionState = serde_json::from_str("\"HOLD\"").unwrap();
        assert_eq!(parsed, Hold);
    }
}
