use super::*;
use std::collections::HashMap;
use std::fmt;

pub(crate) const NUMERIC_KEY_SENTINEL: char = '#';
pub(crate) const TEXTUAL_KEY_SENTINEL: char = '\'';
pub(crate) const INTERNAL_SET_TAG_KEY: &str = "\u{0}\u{0}cc_fallback_set";

/// Set protocol the environment hands out. A host set type advertises which
/// operations it actually supports by returning [`Error::NotImplemented`]
/// from the rest; detection turns that into a boolean capability signal.
pub trait AssociativeSet: fmt::Debug {
    fn add(&mut self, value: Value) -> Result<()>;
    fn has(&self, value: &Value) -> bool;
    /// Iteration over stored member values.
    fn values(&self) -> Result<Box<dyn Iterator<Item = Value> + '_>>;
    /// Enumeration of stored member values through a callback.
    fn for_each(&self, visit: &mut dyn FnMut(&Value)) -> Result<()>;
    fn delete(&mut self, value: &Value) -> Result<bool>;
    fn clear(&mut self) -> Result<()>;
    fn size(&self) -> Result<usize>;
}

/// Accepted member kinds. Everything else is rejected at `add`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum ElementKind {
    Numeric,
    Textual,
}

impl ElementKind {
    pub(crate) fn sentinel(self) -> char {
        match self {
            Self::Numeric => NUMERIC_KEY_SENTINEL,
            Self::Textual => TEXTUAL_KEY_SENTINEL,
        }
    }
}

pub(crate) fn classify_element(value: &Value) -> Option<ElementKind> {
    match value {
        Value::Number(_) | Value::Float(_) => Some(ElementKind::Numeric),
        Value::String(_) => Some(ElementKind::Textual),
        _ => None,
    }
}

// Numeric and textual keys live in disjoint domains even when the textual
// forms coincide: Number(5) maps to "#5", String("5") to "'5". Any new
// element kind must keep its key domain disjoint from these two.
pub(crate) fn element_key(value: &Value) -> Option<String> {
    classify_element(value).map(|kind| format!("{}{}", kind.sentinel(), value.as_string()))
}

fn is_element_key(key: &str) -> bool {
    key.starts_with(NUMERIC_KEY_SENTINEL) || key.starts_with(TEXTUAL_KEY_SENTINEL)
}

/// String-keyed entry list with a key index, the shape the rest of the
/// runtime uses for plain property storage.
#[derive(Debug, Clone, Default)]
pub(crate) struct KeyedStore {
    pub(crate) entries: Vec<(String, Value)>,
    pub(crate) index_by_key: HashMap<String, usize>,
}

impl KeyedStore {
    pub(crate) fn set_entry(&mut self, key: String, value: Value) {
        if let Some(index) = self.index_by_key.get(&key).copied() {
            if let Some((_, existing)) = self.entries.get_mut(index) {
                *existing = value;
                return;
            }
        }
        let index = self.entries.len();
        self.entries.push((key.clone(), value));
        self.index_by_key.insert(key, index);
    }

    pub(crate) fn contains_key(&self, key: &str) -> bool {
        self.index_by_key.contains_key(key)
    }
}

/// Minimal add/has/iterate set installed when the host provides no usable
/// set type. Members are restricted to numeric and textual values.
#[derive(Debug, Clone)]
pub struct FallbackSet {
    pub(crate) store: KeyedStore,
}

impl FallbackSet {
    pub fn new() -> Self {
        let mut store = KeyedStore::default();
        // tag entry must never surface as a member
        store.set_entry(INTERNAL_SET_TAG_KEY.to_string(), Value::Bool(true));
        Self { store }
    }

    pub fn add(&mut self, value: Value) -> Result<&mut Self> {
        let Some(key) = element_key(&value) else {
            return Err(Error::UnsupportedElement {
                kind: value.type_name(),
            });
        };
        self.store.set_entry(key, value);
        Ok(self)
    }

    pub fn has(&self, value: &Value) -> bool {
        element_key(value).is_some_and(|key| self.store.contains_key(&key))
    }

    /// Restartable iteration in insertion order: every call walks the live
    /// store from the start. Entries whose keys lack a sentinel prefix are
    /// foreign to the set and skipped.
    pub fn values(&self) -> impl Iterator<Item = &Value> {
        self.store
            .entries
            .iter()
            .filter(|(key, _)| is_element_key(key))
            .map(|(_, value)| value)
    }
}

impl Default for FallbackSet {
    fn default() -> Self {
        Self::new()
    }
}

impl AssociativeSet for FallbackSet {
    fn add(&mut self, value: Value) -> Result<()> {
        FallbackSet::add(self, value).map(|_| ())
    }

    fn has(&self, value: &Value) -> bool {
        FallbackSet::has(self, value)
    }

    fn values(&self) -> Result<Box<dyn Iterator<Item = Value> + '_>> {
        Ok(Box::new(FallbackSet::values(self).cloned()))
    }

    fn for_each(&self, _visit: &mut dyn FnMut(&Value)) -> Result<()> {
        Err(Error::NotImplemented("for_each"))
    }

    fn delete(&mut self, _value: &Value) -> Result<bool> {
        Err(Error::NotImplemented("delete"))
    }

    fn clear(&mut self) -> Result<()> {
        Err(Error::NotImplemented("clear"))
    }

    fn size(&self) -> Result<usize> {
        Err(Error::NotImplemented("size"))
    }
}

/// Bridges a host set that enumerates but cannot iterate: `values` is
/// synthesized from `for_each`, every other operation stays the host's.
#[derive(Debug)]
pub struct EnumeratedSetAdapter {
    inner: Box<dyn AssociativeSet>,
}

impl EnumeratedSetAdapter {
    pub fn new(inner: Box<dyn AssociativeSet>) -> Self {
        Self { inner }
    }
}

impl AssociativeSet for EnumeratedSetAdapter {
    fn add(&mut self, value: Value) -> Result<()> {
        self.inner.add(value)
    }

    fn has(&self, value: &Value) -> bool {
        self.inner.has(value)
    }

    fn values(&self) -> Result<Box<dyn Iterator<Item = Value> + '_>> {
        let mut collected = Vec::new();
        self.inner.for_each(&mut |value| collected.push(value.clone()))?;
        Ok(Box::new(collected.into_iter()))
    }

    fn for_each(&self, visit: &mut dyn FnMut(&Value)) -> Result<()> {
        self.inner.for_each(visit)
    }

    fn delete(&mut self, value: &Value) -> Result<bool> {
        self.inner.delete(value)
    }

    fn clear(&mut self) -> Result<()> {
        self.inner.clear()
    }

    fn size(&self) -> Result<usize> {
        self.inner.size()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn numeric_and_textual_members_never_collide() -> Result<()> {
        let mut set = FallbackSet::new();
        set.add(Value::Number(5))?.add(Value::String("5".into()))?;

        assert!(set.has(&Value::Number(5)));
        assert!(set.has(&Value::String("5".into())));

        let members: Vec<Value> = set.values().cloned().collect();
        assert_eq!(members, vec![Value::Number(5), Value::String("5".into())]);
        Ok(())
    }

    #[test]
    fn integral_float_and_number_share_one_member_slot() -> Result<()> {
        let mut set = FallbackSet::new();
        set.add(Value::Number(5))?.add(Value::Float(5.0))?;

        assert_eq!(set.values().count(), 1);
        assert!(set.has(&Value::Float(5.0)));
        Ok(())
    }

    #[test]
    fn adding_twice_keeps_a_single_member() -> Result<()> {
        let mut set = FallbackSet::new();
        set.add(Value::String("cue".into()))?
            .add(Value::String("cue".into()))?;
        assert_eq!(set.values().count(), 1);
        Ok(())
    }

    #[test]
    fn unsupported_element_fails_add_but_not_has() {
        let mut set = FallbackSet::new();
        assert_eq!(
            FallbackSet::add(&mut set, Value::Bool(true)).err(),
            Some(Error::UnsupportedElement { kind: "boolean" })
        );
        assert_eq!(
            FallbackSet::add(&mut set, Value::Null).err(),
            Some(Error::UnsupportedElement { kind: "null" })
        );
        assert!(!set.has(&Value::Undefined));
        assert!(!set.has(&Value::Bool(true)));
        assert_eq!(set.values().count(), 0);
    }

    #[test]
    fn iteration_skips_foreign_store_entries() -> Result<()> {
        let mut set = FallbackSet::new();
        set.add(Value::Number(1))?;
        set.store
            .set_entry("intruder".to_string(), Value::String("x".into()));

        let members: Vec<Value> = set.values().cloned().collect();
        assert_eq!(members, vec![Value::Number(1)]);
        Ok(())
    }

    #[test]
    fn iteration_restarts_from_the_beginning() -> Result<()> {
        let mut set = FallbackSet::new();
        set.add(Value::Number(1))?.add(Value::Number(2))?;

        let first: Vec<Value> = set.values().cloned().collect();
        let second: Vec<Value> = set.values().cloned().collect();
        assert_eq!(first, second);
        assert_eq!(first.len(), 2);
        Ok(())
    }

    #[test]
    fn unsupported_operations_fail_loudly() {
        let mut set = FallbackSet::new();
        let set: &mut dyn AssociativeSet = &mut set;
        assert_eq!(
            set.delete(&Value::Number(5)).err(),
            Some(Error::NotImplemented("delete"))
        );
        assert_eq!(set.clear().err(), Some(Error::NotImplemented("clear")));
        assert_eq!(set.size().err(), Some(Error::NotImplemented("size")));
        assert_eq!(
            set.for_each(&mut |_| {}).err(),
            Some(Error::NotImplemented("for_each"))
        );
    }

    #[test]
    fn delete_fails_even_for_present_members() -> Result<()> {
        let mut set = FallbackSet::new();
        set.add(Value::Number(5))?;
        let set: &mut dyn AssociativeSet = &mut set;
        assert_eq!(
            set.delete(&Value::Number(5)).err(),
            Some(Error::NotImplemented("delete"))
        );
        Ok(())
    }

    #[test]
    fn trait_iteration_matches_inherent_iteration() -> Result<()> {
        let mut set = FallbackSet::new();
        set.add(Value::String("a".into()))?.add(Value::Number(3))?;

        let via_trait: Vec<Value> = {
            let set: &dyn AssociativeSet = &set;
            set.values()?.collect()
        };
        let inherent: Vec<Value> = set.values().cloned().collect();
        assert_eq!(via_trait, inherent);
        Ok(())
    }
}
