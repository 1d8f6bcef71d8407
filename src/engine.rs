use crate::{
    group::Group,
    stage::{ElementId, Stage},
};

/// Per-frame traversal of the group tree. Effects are scoped lexically: an
/// effect attached at a group applies to that group's own elements and to
/// every element below it, root-to-leaf, so coarse outer effects land before
/// finer inner ones.
pub struct Engine;

impl Engine {
    /// Runs one tick with `dt` elapsed seconds. Skips everything when the
    /// root is disabled; otherwise visits enabled groups depth-first,
    /// advancing each visited group's fade envelope and driving every
    /// in-scope enabled effect against every element of the visited group.
    ///
    /// Disabled subtrees are pruned whole: no element under them changes and
    /// no fade envelope below them advances.
    #[tracing::instrument(level = "trace", skip(root, stage))]
    pub fn tick(root: &mut Group, stage: &mut dyn Stage, dt: f64) {
        if !root.is_enabled() {
            return;
        }
        Self::process(root, &mut Vec::new(), stage, dt);
    }

    /// Visits the group at `path` (relative to `root`), then its enabled
    /// children. The ancestor chain is re-resolved from the root per prefix;
    /// the tree is structurally frozen for the whole tick, so resolution
    /// cannot miss.
    fn process(root: &mut Group, path: &mut Vec<usize>, stage: &mut dyn Stage, dt: f64) {
        let Some(current) = group_at_mut(root, path) else {
            return;
        };

        // The group's own envelope advances once per visit; a fade-out that
        // just ran out disables the group and prunes its subtree now.
        current.fade_mut().tick(dt);
        if !current.is_enabled() {
            return;
        }

        let ids: Vec<ElementId> = current.elements().to_vec();
        let depth = path.len();

        for (index, id) in ids.into_iter().enumerate() {
            for prefix in 0..=depth {
                let Some(ancestor) = group_at_mut(root, &path[..prefix]) else {
                    continue;
                };
                for effect in ancestor.effects_mut() {
                    if !effect.is_enabled() {
                        continue;
                    }
                    let Some(element) = stage.element_mut(id) else {
                        continue;
                    };
                    effect.drive(element, dt, index);
                }
            }
        }

        let child_count = group_at_mut(root, path).map_or(0, |g| g.children().len());
        for child in 0..child_count {
            let enabled = group_at_mut(root, path)
                .and_then(|g| g.child(child))
                .is_some_and(Group::is_enabled);
            if enabled {
                path.push(child);
                Self::process(root, path, stage, dt);
                path.pop();
            }
        }
    }
}

fn group_at_mut<'a>(root: &'a mut Group, path: &[usize]) -> Option<&'a mut Group> {
    let mut group = root;
    for &index in path {
        group = group.child_mut(index)?;
    }
    Some(group)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        effect::Effect,
        group::GroupKind,
        stage::{MemoryStage, Stage},
    };

    fn solo(stage: &mut MemoryStage, name: &str) -> Group {
        let mut g = Group::new(GroupKind::Solo, name);
        g.setup(stage).unwrap();
        g
    }

    #[test]
    fn ancestor_effect_reaches_descendant_elements() {
        let mut stage = MemoryStage::new();
        let mut root = Group::new(GroupKind::Plain, "root");
        let leaf = solo(&mut stage, "leaf");
        let leaf_id = leaf.elements()[0];
        root.add_child(leaf);

        let mut spin = Effect::spin();
        spin.params_mut()[0] = 1.0;
        root.add_effect(spin);

        Engine::tick(&mut root, &mut stage, 0.5);
        assert!((stage.element(leaf_id).unwrap().rotation - 0.5).abs() < 1e-9);
    }

    #[test]
    fn disabled_root_freezes_the_whole_scene() {
        let mut stage = MemoryStage::new();
        let mut root = solo(&mut stage, "root");
        let id = root.elements()[0];
        root.add_effect(Effect::spin());
        root.set_enabled(false);

        Engine::tick(&mut root, &mut stage, 1.0);
        assert_eq!(stage.element(id).unwrap().rotation, 0.0);
    }

    #[test]
    fn disabled_child_subtree_is_pruned() {
        let mut stage = MemoryStage::new();
        let mut root = Group::new(GroupKind::Plain, "root");
        let mut child = solo(&mut stage, "child");
        let child_id = child.elements()[0];
        child.set_enabled(false);
        root.add_child(child);
        root.add_effect(Effect::spin());

        Engine::tick(&mut root, &mut stage, 1.0);
        assert_eq!(stage.element(child_id).unwrap().rotation, 0.0);
    }

    #[test]
    fn sibling_scopes_do_not_leak() {
        let mut stage = MemoryStage::new();
        let mut root = Group::new(GroupKind::Plain, "root");
        let mut left = solo(&mut stage, "left");
        let right = solo(&mut stage, "right");
        let left_id = left.elements()[0];
        let right_id = right.elements()[0];

        let mut spin = Effect::spin();
        spin.params_mut()[0] = 1.0;
        left.add_effect(spin);
        root.add_child(left);
        root.add_child(right);

        Engine::tick(&mut root, &mut stage, 1.0);
        assert!((stage.element(left_id).unwrap().rotation - 1.0).abs() < 1e-9);
        assert_eq!(stage.element(right_id).unwrap().rotation, 0.0);
    }

    #[test]
    fn group_fade_out_disables_its_subtree() {
        let mut stage = MemoryStage::new();
        let mut root = Group::new(GroupKind::Plain, "root");
        let mut child = solo(&mut stage, "child");
        let child_id = child.elements()[0];

        let mut spin = Effect::spin();
        spin.params_mut()[0] = 1.0;
        child.add_effect(spin);
        child
            .fade_mut()
            .fade_out(0.3, crate::ease::EaseFn::new(crate::ease::EaseKind::Linear));
        root.add_child(child);

        // three ticks exhaust the fade; the fourth proves the subtree froze
        for _ in 0..3 {
            Engine::tick(&mut root, &mut stage, 0.2);
        }
        assert!(!root.child(0).unwrap().is_enabled());

        let frozen = stage.element(child_id).unwrap().rotation;
        Engine::tick(&mut root, &mut stage, 0.2);
        assert_eq!(stage.element(child_id).unwrap().rotation, frozen);
    }
}
