use rand::{SeedableRng, rngs::StdRng};

use crate::{
    ease::EaseFn,
    effect::Effect,
    group::{Group, GroupKind},
    registry::Registry,
};

/// Everything the console and engine operate on: the root of the group tree,
/// the three prototype registries, and a seeded rng for the random-creation
/// commands. Constructed explicitly and passed where needed; there are no
/// process-wide singletons.
pub struct Scene {
    pub root: Group,
    pub groups: Registry<Group>,
    pub effects: Registry<Effect>,
    pub eases: Registry<EaseFn>,
    pub rng: StdRng,
}

impl Scene {
    pub fn new(seed: u64) -> Self {
        Self {
            root: Group::new(GroupKind::Plain, "root"),
            groups: Registry::new(),
            effects: Registry::new(),
            eases: Registry::new(),
            rng: StdRng::seed_from_u64(seed),
        }
    }
}
