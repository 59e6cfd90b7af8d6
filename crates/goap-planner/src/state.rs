//! Symbolic world state representation for GOAP planning

use std::cmp::Ordering;
use std::collections::BTreeSet;
use std::fmt::{self, Write as _};
use std::hash::{Hash, Hasher};

use goap_core::EntityId;

/// A single fact value about the world
#[derive(Debug, Clone)]
pub enum Fact {
    Bool(bool),
    Number(f64),
    Text(String),
    Entity(EntityId),
}

impl Fact {
    fn tag(&self) -> u8 {
        match self {
            Fact::Bool(_) => 0,
            Fact::Number(_) => 1,
            Fact::Text(_) => 2,
            Fact::Entity(_) => 3,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Fact::Bool(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_number(&self) -> Option<f64> {
        match self {
            Fact::Number(v) => Some(*v),
            _ => None,
        }
    }

    /// Unambiguous, type-tagged rendering used for state de-duplication
    fn write_canonical(&self, out: &mut String) {
        // Writing to a String cannot fail.
        let _ = match self {
            Fact::Bool(v) => write!(out, "b:{v}"),
            Fact::Number(v) => write!(out, "n:{:016x}", v.to_bits()),
            Fact::Text(v) => write!(out, "s:{v:?}"),
            Fact::Entity(v) => write!(out, "e:{v}"),
        };
    }
}

// Numbers compare by total order so facts can live in ordered sets and hash maps.
impl PartialEq for Fact {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for Fact {}

impl PartialOrd for Fact {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Fact {
    fn cmp(&self, other: &Self) -> Ordering {
        match (self, other) {
            (Fact::Bool(a), Fact::Bool(b)) => a.cmp(b),
            (Fact::Number(a), Fact::Number(b)) => a.total_cmp(b),
            (Fact::Text(a), Fact::Text(b)) => a.cmp(b),
            (Fact::Entity(a), Fact::Entity(b)) => a.cmp(b),
            _ => self.tag().cmp(&other.tag()),
        }
    }
}

impl Hash for Fact {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.tag().hash(state);
        match self {
            Fact::Bool(v) => v.hash(state),
            Fact::Number(v) => v.to_bits().hash(state),
            Fact::Text(v) => v.hash(state),
            Fact::Entity(v) => v.hash(state),
        }
    }
}

impl fmt::Display for Fact {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Fact::Bool(v) => write!(f, "{v}"),
            Fact::Number(v) => write!(f, "{v}"),
            Fact::Text(v) => write!(f, "{v:?}"),
            Fact::Entity(v) => write!(f, "#{v}"),
        }
    }
}

impl From<bool> for Fact {
    fn from(v: bool) -> Self {
        Fact::Bool(v)
    }
}

impl From<f64> for Fact {
    fn from(v: f64) -> Self {
        Fact::Number(v)
    }
}

impl From<f32> for Fact {
    fn from(v: f32) -> Self {
        Fact::Number(v as f64)
    }
}

impl From<i32> for Fact {
    fn from(v: i32) -> Self {
        Fact::Number(v as f64)
    }
}

impl From<&str> for Fact {
    fn from(v: &str) -> Self {
        Fact::Text(v.to_string())
    }
}

impl From<String> for Fact {
    fn from(v: String) -> Self {
        Fact::Text(v)
    }
}

impl From<EntityId> for Fact {
    fn from(v: EntityId) -> Self {
        Fact::Entity(v)
    }
}

/// A (key, value) pair. Equality covers both halves.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Assertion {
    pub key: String,
    pub value: Fact,
}

impl Assertion {
    pub fn new(key: impl Into<String>, value: impl Into<Fact>) -> Self {
        Self {
            key: key.into(),
            value: value.into(),
        }
    }
}

impl fmt::Display for Assertion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.key, self.value)
    }
}

/// Set of assertions describing the world or a goal condition
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct State {
    assertions: BTreeSet<Assertion>,
}

impl State {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a State with a single bool fact
    pub fn from_bool(key: &str, val: bool) -> Self {
        let mut state = Self::new();
        state.set_bool(key, val);
        state
    }

    /// Builder form of [`State::set`]
    pub fn with(mut self, key: impl Into<String>, value: impl Into<Fact>) -> Self {
        self.set(key, value);
        self
    }

    /// Replace every assertion under `key` with the given value
    pub fn set(&mut self, key: impl Into<String>, value: impl Into<Fact>) {
        let assertion = Assertion::new(key, value);
        self.remove(&assertion.key);
        self.assertions.insert(assertion);
    }

    /// Add an assertion as-is. Other values under the same key are kept.
    pub fn insert(&mut self, assertion: Assertion) -> bool {
        self.assertions.insert(assertion)
    }

    /// Remove every assertion under `key`. Returns whether anything was removed.
    pub fn remove(&mut self, key: &str) -> bool {
        let before = self.assertions.len();
        self.assertions.retain(|a| a.key != key);
        before != self.assertions.len()
    }

    pub fn set_bool(&mut self, key: &str, val: bool) {
        self.set(key, Fact::Bool(val));
    }

    pub fn get_bool(&self, key: &str) -> Option<bool> {
        self.get(key).and_then(Fact::as_bool)
    }

    pub fn set_number(&mut self, key: &str, val: f64) {
        self.set(key, Fact::Number(val));
    }

    pub fn get_number(&self, key: &str) -> Option<f64> {
        self.get(key).and_then(Fact::as_number)
    }

    /// First value stored under `key`
    pub fn get(&self, key: &str) -> Option<&Fact> {
        self.assertions
            .iter()
            .find(|a| a.key == key)
            .map(|a| &a.value)
    }

    pub fn contains(&self, assertion: &Assertion) -> bool {
        self.assertions.contains(assertion)
    }

    /// Check that every assertion in `required` is present here by exact
    /// key and value. Missing facts are treated as not satisfied.
    pub fn satisfies(&self, required: &State) -> bool {
        required.assertions.iter().all(|a| self.assertions.contains(a))
    }

    /// Apply effects in place: each effect key replaces whatever this
    /// state held under that key.
    pub fn apply(&mut self, effects: &State) {
        for effect in &effects.assertions {
            self.remove(&effect.key);
            self.assertions.insert(effect.clone());
        }
    }

    /// Copy of this state with `effects` applied
    pub fn applied(&self, effects: &State) -> State {
        let mut next = self.clone();
        next.apply(effects);
        next
    }

    /// Canonical string for this state. Equal states give equal keys.
    pub fn canonical_key(&self) -> String {
        let mut out = String::new();
        for assertion in &self.assertions {
            // keys are quoted so separators inside them cannot collide
            let _ = write!(out, "{:?}=", assertion.key);
            assertion.value.write_canonical(&mut out);
            out.push(';');
        }
        out
    }

    pub fn iter(&self) -> impl Iterator<Item = &Assertion> {
        self.assertions.iter()
    }

    /// Number of assertions
    pub fn len(&self) -> usize {
        self.assertions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.assertions.is_empty()
    }
}

impl fmt::Display for State {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut first = true;
        for assertion in &self.assertions {
            if !first {
                f.write_str(", ")?;
            }
            first = false;
            write!(f, "{assertion}")?;
        }
        Ok(())
    }
}

impl<K: Into<String>, V: Into<Fact>> FromIterator<(K, V)> for State {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut state = State::new();
        for (key, value) in iter {
            state.set(key, value);
        }
        state
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_set_get_bool() {
        let mut ws = State::new();
        ws.set_bool("hungry", true);
        assert_eq!(ws.get_bool("hungry"), Some(true));
        assert_eq!(ws.get_bool("missing"), None);
    }

    #[test]
    fn test_set_get_number() {
        let mut ws = State::new();
        ws.set_number("health", 100.0);
        assert_eq!(ws.get_number("health"), Some(100.0));
        assert_eq!(ws.get_bool("health"), None);
    }

    #[test]
    fn test_equality_covers_key_and_value() {
        assert_eq!(Assertion::new("a", true), Assertion::new("a", true));
        assert_ne!(Assertion::new("a", true), Assertion::new("a", false));
        assert_ne!(Assertion::new("a", 1), Assertion::new("b", 1));
        assert_ne!(Assertion::new("a", 1), Assertion::new("a", "1"));
    }

    #[test]
    fn test_satisfies_empty() {
        let ws = State::new();
        let required = State::new();
        assert!(ws.satisfies(&required));
    }

    #[test]
    fn test_satisfies_matching() {
        let ws = State::new().with("at_home", true).with("hungry", false);
        let required = State::from_bool("at_home", true);
        assert!(ws.satisfies(&required));
    }

    #[test]
    fn test_satisfies_missing() {
        let ws = State::new();
        let required = State::from_bool("at_home", true);
        assert!(!ws.satisfies(&required));
    }

    #[test]
    fn test_satisfies_wrong_value() {
        let ws = State::from_bool("at_home", false);
        let required = State::from_bool("at_home", true);
        assert!(!ws.satisfies(&required));
    }

    #[test]
    fn test_insert_keeps_both_values() {
        let mut ws = State::new();
        ws.insert(Assertion::new("door", "open"));
        ws.insert(Assertion::new("door", "locked"));
        assert_eq!(ws.len(), 2);
        assert!(ws.satisfies(&State::new().with("door", "open")));
        assert!(ws.satisfies(&State::new().with("door", "locked")));
    }

    #[test]
    fn test_apply_replaces_by_key() {
        let mut ws = State::new();
        ws.insert(Assertion::new("hungry", true));
        ws.insert(Assertion::new("hungry", "very"));
        ws.set_bool("tired", true);

        let effects = State::new().with("hungry", false).with("full", true);
        let next = ws.applied(&effects);

        assert_eq!(next.iter().filter(|a| a.key == "hungry").count(), 1);
        assert_eq!(next.get_bool("hungry"), Some(false));
        assert_eq!(next.get_bool("full"), Some(true));
        assert_eq!(next.get_bool("tired"), Some(true));
        // the source state is untouched
        assert_eq!(ws.len(), 3);
    }

    #[test]
    fn test_canonical_key_escapes_separators_in_keys() {
        let tricky = State::from_bool("a=b:true;c", true);
        let plain = State::new().with("a", true).with("c", true);
        assert_ne!(tricky, plain);
        assert_ne!(tricky.canonical_key(), plain.canonical_key());
    }

    #[test]
    fn test_canonical_key_is_order_independent() {
        let a = State::new().with("x", true).with("y", 2.5);
        let b = State::new().with("y", 2.5).with("x", true);
        assert_eq!(a.canonical_key(), b.canonical_key());
    }

    #[test]
    fn test_canonical_key_distinguishes_types() {
        let text = State::new().with("x", "true");
        let flag = State::new().with("x", true);
        assert_ne!(text.canonical_key(), flag.canonical_key());
    }

    #[test]
    fn test_display() {
        let ws = State::new().with("a", true).with("b", 3);
        assert_eq!(ws.to_string(), "a:true, b:3");
    }
}
