use std::collections::BTreeMap;

use rand::Rng;

/// Name-keyed store of prototype instances, spawning runtime objects by
/// cloning. One generic type serves groups, effects, and easing functions.
#[derive(Clone, Debug, Default)]
pub struct Registry<T> {
    prototypes: BTreeMap<String, T>,
}

impl<T: Clone> Registry<T> {
    pub fn new() -> Self {
        Self {
            prototypes: BTreeMap::new(),
        }
    }

    /// Registers `proto` under `name`. A duplicate name fails without side
    /// effects and hands the rejected instance back to the caller.
    pub fn add_prototype(&mut self, name: impl Into<String>, proto: T) -> Result<(), T> {
        let name = name.into();
        if self.prototypes.contains_key(&name) {
            return Err(proto);
        }
        self.prototypes.insert(name, proto);
        Ok(())
    }

    /// Detaches and returns the named prototype; `None` if absent.
    pub fn remove_prototype(&mut self, name: &str) -> Option<T> {
        self.prototypes.remove(name)
    }

    /// Clones the named prototype. `None` for an unknown name; checking is
    /// the caller's responsibility.
    pub fn create(&self, name: &str) -> Option<T> {
        self.prototypes.get(name).cloned()
    }

    /// Clones a uniformly chosen prototype; `None` when the registry is empty.
    pub fn create_random<R: Rng + ?Sized>(&self, rng: &mut R) -> Option<T> {
        if self.prototypes.is_empty() {
            return None;
        }
        let pick = rng.gen_range(0..self.prototypes.len());
        self.prototypes.values().nth(pick).cloned()
    }

    /// Registered names in sorted order.
    pub fn names(&self) -> Vec<String> {
        self.prototypes.keys().cloned().collect()
    }

    pub fn len(&self) -> usize {
        self.prototypes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.prototypes.is_empty()
    }
}
