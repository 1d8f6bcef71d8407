use kurbo::Vec2;

/// Creation transform for a visual element: where it sits relative to the
/// stage origin and how it is turned.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Placement {
    pub translate: Vec2,
    pub rotation: f64,
}

impl Placement {
    pub fn new(translate: Vec2, rotation: f64) -> Self {
        Self {
            translate,
            rotation,
        }
    }
}

/// Opaque handle to a visual element owned by a [`Stage`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct ElementId(pub(crate) usize);

/// Live visual state of one element. Effects mutate these fields every tick;
/// whatever renders the stage reads them back after the tick.
#[derive(Clone, Debug)]
pub struct Element {
    pub name: Option<String>,
    pub translate: Vec2,
    pub rotation: f64,
    pub scale: Vec2,
    pub opacity: f64,
}

impl Element {
    fn new(name: Option<String>, placement: Placement) -> Self {
        Self {
            name,
            translate: placement.translate,
            rotation: placement.rotation,
            scale: Vec2::new(1.0, 1.0),
            opacity: 1.0,
        }
    }
}

/// The visual-backend boundary. Groups create their elements through it and
/// are responsible for destroying them again; the engine resolves handles to
/// mutate element state during traversal.
pub trait Stage {
    fn create_element(&mut self, name: Option<&str>, placement: Placement) -> ElementId;

    /// Destroying an unknown or already-destroyed handle is a no-op.
    fn destroy_element(&mut self, id: ElementId);

    fn element(&self, id: ElementId) -> Option<&Element>;

    fn element_mut(&mut self, id: ElementId) -> Option<&mut Element>;
}

/// In-process stage: a slab of element slots with free-list reuse. The
/// default backend for the binary and the one the tests observe.
#[derive(Debug, Default)]
pub struct MemoryStage {
    slots: Vec<Option<Element>>,
    free: Vec<usize>,
}

impl MemoryStage {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of live elements.
    pub fn len(&self) -> usize {
        self.slots.iter().filter(|s| s.is_some()).count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn iter(&self) -> impl Iterator<Item = (ElementId, &Element)> {
        self.slots
            .iter()
            .enumerate()
            .filter_map(|(i, s)| s.as_ref().map(|e| (ElementId(i), e)))
    }
}

impl Stage for MemoryStage {
    fn create_element(&mut self, name: Option<&str>, placement: Placement) -> ElementId {
        let element = Element::new(name.map(str::to_owned), placement);
        match self.free.pop() {
            Some(slot) => {
                self.slots[slot] = Some(element);
                ElementId(slot)
            }
            None => {
                self.slots.push(Some(element));
                ElementId(self.slots.len() - 1)
            }
        }
    }

    fn destroy_element(&mut self, id: ElementId) {
        if let Some(slot) = self.slots.get_mut(id.0)
            && slot.take().is_some()
        {
            self.free.push(id.0);
        }
    }

    fn element(&self, id: ElementId) -> Option<&Element> {
        self.slots.get(id.0).and_then(|s| s.as_ref())
    }

    fn element_mut(&mut self, id: ElementId) -> Option<&mut Element> {
        self.slots.get_mut(id.0).and_then(|s| s.as_mut())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn create_and_resolve() {
        let mut stage = MemoryStage::new();
        let id = stage.create_element(Some("dot"), Placement::new(Vec2::new(3.0, 4.0), 0.5));

        let e = stage.element(id).unwrap();
        assert_eq!(e.name.as_deref(), Some("dot"));
        assert_eq!(e.translate, Vec2::new(3.0, 4.0));
        assert_eq!(e.rotation, 0.5);
        assert_eq!(e.scale, Vec2::new(1.0, 1.0));
        assert_eq!(e.opacity, 1.0);
    }

    #[test]
    fn destroy_frees_the_slot_for_reuse() {
        let mut stage = MemoryStage::new();
        let a = stage.create_element(None, Placement::default());
        let b = stage.create_element(None, Placement::default());
        assert_eq!(stage.len(), 2);

        stage.destroy_element(a);
        assert_eq!(stage.len(), 1);
        assert!(stage.element(a).is_none());

        let c = stage.create_element(None, Placement::default());
        assert_eq!(c, a);
        assert_eq!(stage.len(), 2);
        assert!(stage.element(b).is_some());
    }

    #[test]
    fn double_destroy_is_a_noop() {
        let mut stage = MemoryStage::new();
        let a = stage.create_element(None, Placement::default());
        stage.destroy_element(a);
        stage.destroy_element(a);
        assert_eq!(stage.len(), 0);

        let b = stage.create_element(None, Placement::default());
        let c = stage.create_element(None, Placement::default());
        assert_ne!(b, c);
    }
}
