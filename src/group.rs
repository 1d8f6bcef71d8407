use std::f64::consts::TAU;

use kurbo::Vec2;

use crate::{
    effect::Effect,
    error::KaleidoResult,
    fade::Fade,
    stage::{ElementId, Placement, Stage},
};

/// Closed set of group prototypes. The kind decides what [`Group::setup`]
/// builds: the group's own elements and, for composite kinds, fixed child
/// groups.
#[derive(Clone, Debug)]
pub enum GroupKind {
    /// No elements of its own; a pure grouping node. The root is one.
    Plain,
    /// A single element at the origin.
    Solo,
    /// `count` elements spaced around a circle, each turned to face outward.
    Ring { count: usize, radius: f64 },
    /// `count` elements stacked along the y axis.
    Column { count: usize, spacing: f64 },
    /// One center element plus a fixed ring child and column child.
    Cascade,
}

/// A named tree node owning visual elements, child groups, and an ordered
/// effect list, with its own fade envelope. Groups are cloned from registry
/// prototypes; a prototype has never been set up, so cloning it never aliases
/// stage elements.
#[derive(Clone, Debug)]
pub struct Group {
    name: String,
    kind: GroupKind,
    elements: Vec<ElementId>,
    children: Vec<Group>,
    effects: Vec<Effect>,
    fade: Fade,
}

impl Group {
    pub fn new(kind: GroupKind, name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            kind,
            elements: Vec::new(),
            children: Vec::new(),
            effects: Vec::new(),
            fade: Fade::new(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn set_name(&mut self, name: impl Into<String>) {
        self.name = name.into();
    }

    pub fn fade(&self) -> &Fade {
        &self.fade
    }

    pub fn fade_mut(&mut self) -> &mut Fade {
        &mut self.fade
    }

    pub fn is_enabled(&self) -> bool {
        self.fade.is_enabled()
    }

    pub fn set_enabled(&mut self, enabled: bool) {
        self.fade.set_enabled(enabled);
    }

    /// Builds the kind's elements and fixed children, then recursively sets
    /// up every child already present. Call exactly once per instance,
    /// immediately after cloning from a prototype, before the group joins
    /// traversal.
    pub fn setup(&mut self, stage: &mut dyn Stage) -> KaleidoResult<()> {
        self.populate(stage)?;
        for child in &mut self.children {
            child.setup(stage)?;
        }
        Ok(())
    }

    fn populate(&mut self, stage: &mut dyn Stage) -> KaleidoResult<()> {
        match self.kind {
            GroupKind::Plain => {}
            GroupKind::Solo => {
                self.spawn_element(stage, Placement::default());
            }
            GroupKind::Ring { count, radius } => {
                for i in 0..count {
                    let angle = TAU * i as f64 / count.max(1) as f64;
                    let at = Vec2::new(angle.cos(), angle.sin()) * radius;
                    self.spawn_element(stage, Placement::new(at, angle));
                }
            }
            GroupKind::Column { count, spacing } => {
                for i in 0..count {
                    let at = Vec2::new(0.0, i as f64 * spacing);
                    self.spawn_element(stage, Placement::new(at, 0.0));
                }
            }
            GroupKind::Cascade => {
                self.spawn_element(stage, Placement::default());
                self.children.push(Group::new(
                    GroupKind::Ring {
                        count: 6,
                        radius: 90.0,
                    },
                    "ring",
                ));
                self.children.push(Group::new(
                    GroupKind::Column {
                        count: 4,
                        spacing: 40.0,
                    },
                    "column",
                ));
            }
        }
        Ok(())
    }

    fn spawn_element(&mut self, stage: &mut dyn Stage, placement: Placement) {
        let index = self.elements.len();
        let label = format!("{}.{index}", self.name);
        let id = stage.create_element(Some(&label), placement);
        self.elements.push(id);
    }

    pub fn elements(&self) -> &[ElementId] {
        &self.elements
    }

    pub fn children(&self) -> &[Group] {
        &self.children
    }

    pub fn child(&self, index: usize) -> Option<&Group> {
        self.children.get(index)
    }

    pub fn child_mut(&mut self, index: usize) -> Option<&mut Group> {
        self.children.get_mut(index)
    }

    pub fn add_child(&mut self, child: Group) {
        self.children.push(child);
    }

    /// Detaches and returns the child at `index`; the caller decides whether
    /// to keep it or [`Group::dispose`] it. `None` when out of range.
    pub fn remove_child_at(&mut self, index: usize) -> Option<Group> {
        (index < self.children.len()).then(|| self.children.remove(index))
    }

    pub fn effects(&self) -> &[Effect] {
        &self.effects
    }

    pub fn effect_mut(&mut self, index: usize) -> Option<&mut Effect> {
        self.effects.get_mut(index)
    }

    pub(crate) fn effects_mut(&mut self) -> &mut [Effect] {
        &mut self.effects
    }

    pub fn add_effect(&mut self, effect: Effect) {
        self.effects.push(effect);
    }

    /// Inserts at `position`; past the end appends.
    pub fn add_effect_at(&mut self, effect: Effect, position: usize) {
        let position = position.min(self.effects.len());
        self.effects.insert(position, effect);
    }

    /// Detaches and returns the effect at `index`, transferring ownership to
    /// the caller. `None` when out of range.
    pub fn remove_effect_at(&mut self, index: usize) -> Option<Effect> {
        (index < self.effects.len()).then(|| self.effects.remove(index))
    }

    /// Destroys every stage element owned by this group and, recursively, by
    /// its children. Effects and child groups die with the value itself.
    pub fn dispose(self, stage: &mut dyn Stage) {
        for id in self.elements {
            stage.destroy_element(id);
        }
        for child in self.children {
            child.dispose(stage);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::stage::MemoryStage;

    #[test]
    fn solo_setup_creates_one_element() {
        let mut stage = MemoryStage::new();
        let mut g = Group::new(GroupKind::Solo, "dot");
        g.setup(&mut stage).unwrap();
        assert_eq!(g.elements().len(), 1);
        assert_eq!(stage.len(), 1);

        let e = stage.element(g.elements()[0]).unwrap();
        assert_eq!(e.name.as_deref(), Some("dot.0"));
    }

    #[test]
    fn ring_setup_places_elements_on_the_circle() {
        let mut stage = MemoryStage::new();
        let mut g = Group::new(
            GroupKind::Ring {
                count: 4,
                radius: 10.0,
            },
            "ring",
        );
        g.setup(&mut stage).unwrap();
        assert_eq!(g.elements().len(), 4);

        let first = stage.element(g.elements()[0]).unwrap();
        assert!((first.translate.x - 10.0).abs() < 1e-9);
        assert!(first.translate.y.abs() < 1e-9);

        let third = stage.element(g.elements()[2]).unwrap();
        assert!((third.translate.x + 10.0).abs() < 1e-9);
    }

    #[test]
    fn cascade_setup_recurses_into_fixed_children() {
        let mut stage = MemoryStage::new();
        let mut g = Group::new(GroupKind::Cascade, "cascade");
        g.setup(&mut stage).unwrap();

        assert_eq!(g.elements().len(), 1);
        assert_eq!(g.children().len(), 2);
        assert_eq!(g.child(0).unwrap().elements().len(), 6);
        assert_eq!(g.child(1).unwrap().elements().len(), 4);
        assert_eq!(stage.len(), 11);
    }

    #[test]
    fn prototype_clone_owns_nothing_on_the_stage() {
        let proto = Group::new(GroupKind::Solo, "dot");
        let clone = proto.clone();
        assert!(clone.elements().is_empty());
        assert!(clone.children().is_empty());
    }

    #[test]
    fn remove_child_transfers_ownership_without_destroying() {
        let mut stage = MemoryStage::new();
        let mut parent = Group::new(GroupKind::Plain, "parent");
        let mut child = Group::new(GroupKind::Solo, "child");
        child.setup(&mut stage).unwrap();
        parent.add_child(child);

        let detached = parent.remove_child_at(0).unwrap();
        assert_eq!(stage.len(), 1, "removal alone must not destroy elements");

        detached.dispose(&mut stage);
        assert_eq!(stage.len(), 0);

        assert!(parent.remove_child_at(0).is_none());
    }

    #[test]
    fn effect_insertion_past_the_end_appends() {
        let mut g = Group::new(GroupKind::Plain, "g");
        g.add_effect(Effect::spin());
        g.add_effect_at(Effect::drift(), 99);
        g.add_effect_at(Effect::zoom(), 0);

        let names: Vec<_> = g.effects().iter().map(|e| e.name().to_owned()).collect();
        assert_eq!(names, ["zoom", "spin", "drift"]);
    }

    #[test]
    fn remove_effect_by_index() {
        let mut g = Group::new(GroupKind::Plain, "g");
        g.add_effect(Effect::spin());
        g.add_effect(Effect::drift());

        let removed = g.remove_effect_at(0).unwrap();
        assert_eq!(removed.name(), "spin");
        assert_eq!(g.effects().len(), 1);
        assert!(g.remove_effect_at(5).is_none());
    }

    #[test]
    fn dispose_destroys_the_whole_subtree_of_elements() {
        let mut stage = MemoryStage::new();
        let mut g = Group::new(GroupKind::Cascade, "cascade");
        g.setup(&mut stage).unwrap();
        assert_eq!(stage.len(), 11);

        g.dispose(&mut stage);
        assert_eq!(stage.len(), 0);
    }
}
