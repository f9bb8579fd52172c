//! Signal module - named inputs to an evaluation and their weights

use serde::de::{MapAccess, Visitor};
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

/// A single signal reading: either a number or an explicit "missing" marker
///
/// Missing data is a first-class case, never an error.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SignalValue {
    /// A numeric reading (conventionally in [-1, 1] or [0, 1])
    Present(f64),

    /// The signal is known to exist but has no reading
    Missing,
}

impl SignalValue {
    /// Get the numeric value, if present
    pub fn value(&self) -> Option<f64> {
        match self {
            SignalValue::Present(v) => Some(*v),
            SignalValue::Missing => None,
        }
    }

    /// Check whether the signal is missing
    pub fn is_missing(&self) -> bool {
        matches!(self, SignalValue::Missing)
    }
}

impl From<f64> for SignalValue {
    fn from(value: f64) -> Self {
        SignalValue::Present(value)
    }
}

impl From<Option<f64>> for SignalValue {
    fn from(value: Option<f64>) -> Self {
        match value {
            Some(v) => SignalValue::Present(v),
            None => SignalValue::Missing,
        }
    }
}

impl FromStr for SignalValue {
    type Err = String;

    /// Parse a reading from text
    ///
    /// Accepts any float, or one of `null`, `none`, `missing`, `-` for a missing signal.
    ///
    /// # Examples
    ///
    /// ```
    /// use ternary_domain::SignalValue;
    ///
    /// assert_eq!("0.7".parse::<SignalValue>().unwrap(), SignalValue::Present(0.7));
    /// assert_eq!("null".parse::<SignalValue>().unwrap(), SignalValue::Missing);
    /// assert!("high".parse::<SignalValue>().is_err());
    /// ```
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        match trimmed.to_lowercase().as_str() {
            "null" | "none" | "missing" | "-" => return Ok(SignalValue::Missing),
            _ => {}
        }
        trimmed
            .parse::<f64>()
            .map(SignalValue::Present)
            .map_err(|_| format!("Signal value '{}' is not numeric", trimmed))
    }
}

impl fmt::Display for SignalValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SignalValue::Present(v) => write!(f, "{}", v),
            SignalValue::Missing => write!(f, "missing"),
        }
    }
}

/// A named signal reading
#[derive(Debug, Clone, PartialEq)]
pub struct Signal {
    /// Signal name (unique within a set, join key with [`Weights`])
    pub name: String,
    /// The reading
    pub value: SignalValue,
}

/// An insertion-ordered set of uniquely named signals
///
/// Iteration order is insertion order; the missing-signal list of an
/// evaluation follows it. Re-inserting a name replaces its value in place.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SignalSet {
    signals: Vec<Signal>,
}

impl SignalSet {
    /// Create an empty signal set
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a signal, replacing any existing reading with the same name
    pub fn insert(&mut self, name: impl Into<String>, value: impl Into<SignalValue>) {
        let name = name.into();
        let value = value.into();
        match self.signals.iter_mut().find(|s| s.name == name) {
            Some(existing) => existing.value = value,
            None => self.signals.push(Signal { name, value }),
        }
    }

    /// Builder-style insert
    ///
    /// # Examples
    ///
    /// ```
    /// use ternary_domain::{SignalSet, SignalValue};
    ///
    /// let signals = SignalSet::new()
    ///     .with("market_sentiment", 0.3)
    ///     .with("volume", SignalValue::Missing);
    /// assert_eq!(signals.len(), 2);
    /// assert_eq!(signals.missing_names(), vec!["volume"]);
    /// ```
    pub fn with(mut self, name: impl Into<String>, value: impl Into<SignalValue>) -> Self {
        self.insert(name, value);
        self
    }

    /// Look up a signal by name
    pub fn get(&self, name: &str) -> Option<SignalValue> {
        self.signals.iter().find(|s| s.name == name).map(|s| s.value)
    }

    /// Check whether a signal name is part of the set
    pub fn contains(&self, name: &str) -> bool {
        self.signals.iter().any(|s| s.name == name)
    }

    /// Number of signals (present and missing)
    pub fn len(&self) -> usize {
        self.signals.len()
    }

    /// Check if the set holds no signals
    pub fn is_empty(&self) -> bool {
        self.signals.is_empty()
    }

    /// Iterate signals in insertion order
    pub fn iter(&self) -> impl Iterator<Item = &Signal> {
        self.signals.iter()
    }

    /// Names of missing signals, in insertion order
    pub fn missing_names(&self) -> Vec<&str> {
        self.signals
            .iter()
            .filter(|s| s.value.is_missing())
            .map(|s| s.name.as_str())
            .collect()
    }
}

impl<N: Into<String>, V: Into<SignalValue>> FromIterator<(N, V)> for SignalSet {
    fn from_iter<I: IntoIterator<Item = (N, V)>>(iter: I) -> Self {
        let mut set = SignalSet::new();
        for (name, value) in iter {
            set.insert(name, value);
        }
        set
    }
}

impl Serialize for SignalSet {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.signals.len()))?;
        for signal in &self.signals {
            map.serialize_entry(&signal.name, &signal.value.value())?;
        }
        map.end()
    }
}

impl<'de> Deserialize<'de> for SignalSet {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct SignalSetVisitor;

        impl<'de> Visitor<'de> for SignalSetVisitor {
            type Value = SignalSet;

            fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
                f.write_str("a map of signal name to number or null")
            }

            fn visit_map<A: MapAccess<'de>>(self, mut access: A) -> Result<Self::Value, A::Error> {
                let mut set = SignalSet::new();
                while let Some((name, value)) = access.next_entry::<String, Option<f64>>()? {
                    set.insert(name, value);
                }
                Ok(set)
            }
        }

        deserializer.deserialize_map(SignalSetVisitor)
    }
}

/// Importance factors keyed by signal name
///
/// Lookup is open-world: names without an explicit weight default to 1.0,
/// and weights for names absent from a signal set are ignored.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Weights {
    weights: BTreeMap<String, f64>,
}

/// Weight applied to signals with no explicit entry
pub const DEFAULT_WEIGHT: f64 = 1.0;

impl Weights {
    /// Create an empty weight map (every signal weighs [`DEFAULT_WEIGHT`])
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the weight for a signal name
    pub fn set(&mut self, name: impl Into<String>, weight: f64) {
        self.weights.insert(name.into(), weight);
    }

    /// Builder-style set
    pub fn with(mut self, name: impl Into<String>, weight: f64) -> Self {
        self.set(name, weight);
        self
    }

    /// Weight for a signal, defaulting to [`DEFAULT_WEIGHT`]
    pub fn weight_for(&self, name: &str) -> f64 {
        self.weights.get(name).copied().unwrap_or(DEFAULT_WEIGHT)
    }

    /// Number of explicit weights
    pub fn len(&self) -> usize {
        self.weights.len()
    }

    /// Check if no explicit weights are set
    pub fn is_empty(&self) -> bool {
        self.weights.is_empty()
    }

    /// Iterate explicit weights in name order
    pub fn iter(&self) -> impl Iterator<Item = (&str, f64)> {
        self.weights.iter().map(|(k, v)| (k.as_str(), *v))
    }

    /// Weight names that match no signal in the given set
    pub fn unknown_names(&self, signals: &SignalSet) -> Vec<&str> {
        self.weights
            .keys()
            .filter(|name| !signals.contains(name))
            .map(String::as_str)
            .collect()
    }
}

impl<N: Into<String>> FromIterator<(N, f64)> for Weights {
    fn from_iter<I: IntoIterator<Item = (N, f64)>>(iter: I) -> Self {
        let mut weights = Weights::new();
        for (name, weight) in iter {
            weights.set(name, weight);
        }
        weights
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_signal_value() {
        assert_eq!("0.5".parse::<SignalValue>().unwrap(), SignalValue::Present(0.5));
        assert_eq!(" -1 ".parse::<SignalValue>().unwrap(), SignalValue::Present(-1.0));
        assert_eq!("NULL".parse::<SignalValue>().unwrap(), SignalValue::Missing);
        assert_eq!("missing".parse::<SignalValue>().unwrap(), SignalValue::Missing);
        assert_eq!("-".parse::<SignalValue>().unwrap(), SignalValue::Missing);
    }

    #[test]
    fn test_parse_non_numeric_value() {
        let err = "bullish".parse::<SignalValue>().unwrap_err();
        assert!(err.contains("bullish"));
    }

    #[test]
    fn test_insert_replaces_in_place() {
        let mut signals = SignalSet::new().with("a", 0.1).with("b", 0.2);
        signals.insert("a", SignalValue::Missing);

        let names: Vec<&str> = signals.iter().map(|s| s.name.as_str()).collect();
        assert_eq!(names, vec!["a", "b"]);
        assert_eq!(signals.get("a"), Some(SignalValue::Missing));
        assert_eq!(signals.len(), 2);
    }

    #[test]
    fn test_missing_names_follow_insertion_order() {
        let signals = SignalSet::new()
            .with("z", SignalValue::Missing)
            .with("m", 0.4)
            .with("a", SignalValue::Missing);
        assert_eq!(signals.missing_names(), vec!["z", "a"]);
    }

    #[test]
    fn test_weights_default_to_one() {
        let weights = Weights::new().with("technical", 3.0);
        assert_eq!(weights.weight_for("technical"), 3.0);
        assert_eq!(weights.weight_for("volume"), DEFAULT_WEIGHT);
    }

    #[test]
    fn test_unknown_weight_names() {
        let signals = SignalSet::new().with("technical", 0.2);
        let weights = Weights::new().with("technical", 2.0).with("tecnical", 1.0);
        assert_eq!(weights.unknown_names(&signals), vec!["tecnical"]);
    }

    #[test]
    fn test_signal_set_json_keeps_order() {
        let signals = SignalSet::new().with("b", 0.5).with("a", SignalValue::Missing);
        let json = serde_json::to_string(&signals).unwrap();
        assert_eq!(json, r#"{"b":0.5,"a":null}"#);

        let parsed: SignalSet = serde_json::from_str(r#"{"x":-0.2,"y":null}"#).unwrap();
        assert_eq!(parsed.get("x"), Some(SignalValue::Present(-0.2)));
        assert_eq!(parsed.get("y"), Some(SignalValue::Missing));
    }
}
