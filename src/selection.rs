use std::fmt::Write as _;

use crate::{
    error::{KaleidoError, KaleidoResult},
    group::Group,
};

/// What the cursor currently points at. Root counts as a group for every
/// group-scoped command; the distinction only matters for navigation.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Focus {
    Root,
    Group,
    Effect,
}

/// The operator's position in the tree: a path of child indices from the
/// root (empty = the root itself) plus an optional selected effect on the
/// current group. Indices instead of references keep the cursor from
/// aliasing into the tree; the console re-validates on every move.
#[derive(Clone, Debug, Default)]
pub struct Selection {
    path: Vec<usize>,
    effect: Option<usize>,
}

impl Selection {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn focus(&self) -> Focus {
        if self.effect.is_some() {
            Focus::Effect
        } else if self.path.is_empty() {
            Focus::Root
        } else {
            Focus::Group
        }
    }

    /// True in ROOT and GROUP focus; group-scoped commands use this.
    pub fn on_group(&self) -> bool {
        self.effect.is_none()
    }

    pub fn path(&self) -> &[usize] {
        &self.path
    }

    pub fn selected_effect(&self) -> Option<usize> {
        self.effect
    }

    /// Resolves the current group within `root`.
    pub fn group<'a>(&self, root: &'a Group) -> &'a Group {
        let mut group = root;
        for &index in &self.path {
            match group.child(index) {
                Some(child) => group = child,
                None => return group,
            }
        }
        group
    }

    pub fn group_mut<'a>(&self, root: &'a mut Group) -> &'a mut Group {
        let mut group = root;
        for &index in &self.path {
            // the console is the only mutator, and it keeps the path valid
            if group.child_mut(index).is_none() {
                break;
            }
            group = group.child_mut(index).unwrap();
        }
        group
    }

    /// Descends into the child at `index`, clearing any effect selection.
    pub fn select_child(&mut self, root: &Group, index: usize) -> KaleidoResult<()> {
        let current = self.group(root);
        if index >= current.children().len() {
            return Err(KaleidoError::lookup(format!(
                "child index {index} exceeds the {} children of '{}'",
                current.children().len(),
                current.name()
            )));
        }
        self.effect = None;
        self.path.push(index);
        Ok(())
    }

    /// Selects the effect at `index` on the current group.
    pub fn select_effect(&mut self, root: &Group, index: usize) -> KaleidoResult<()> {
        let current = self.group(root);
        if index >= current.effects().len() {
            return Err(KaleidoError::lookup(format!(
                "effect index {index} exceeds the {} effects of '{}'",
                current.effects().len(),
                current.name()
            )));
        }
        self.effect = Some(index);
        Ok(())
    }

    /// One step up: effect selection clears first, then the path pops. A
    /// no-op at the root.
    pub fn level_up(&mut self) {
        if self.effect.take().is_some() {
            return;
        }
        self.path.pop();
    }

    /// Back to the root, clearing everything.
    pub fn go_root(&mut self) {
        self.path.clear();
        self.effect = None;
    }

    /// Called by the console after it detaches the currently selected node;
    /// moves the cursor to the parent and reports the index the node held.
    pub(crate) fn pop_current(&mut self) -> Option<usize> {
        self.effect = None;
        self.path.pop()
    }

    pub(crate) fn clear_effect(&mut self) {
        self.effect = None;
    }

    /// The prompt string: a `c <name>::` token per non-root group on the
    /// path, a `t <name>:` token for a selected effect, and a trailing
    /// space. The root contributes nothing, so at the root this is `" "`.
    pub fn context_string(&self, root: &Group) -> String {
        let mut out = String::new();
        let mut group = root;
        for &index in &self.path {
            let Some(child) = group.child(index) else {
                break;
            };
            group = child;
            let _ = write!(out, "c {}::", group.name());
        }

        if let Some(index) = self.effect
            && let Some(effect) = group.effects().get(index)
        {
            let _ = write!(out, "t {}:", effect.name());
        }

        out.push(' ');
        out
    }
}
