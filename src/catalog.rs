use crate::{
    ease::{EaseFn, EaseKind},
    effect::Effect,
    group::{Group, GroupKind},
    scene::Scene,
};

/// Registers the built-in prototype sets on a fresh scene: one entry per
/// easing curve, effect kind, and group kind. Call once at startup, before
/// the console takes over.
pub fn register_builtin(scene: &mut Scene) {
    for kind in [
        EaseKind::Linear,
        EaseKind::SmoothStep,
        EaseKind::Sine,
        EaseKind::Ripple,
    ] {
        let name = match kind {
            EaseKind::Linear => "linear",
            EaseKind::SmoothStep => "smoothstep",
            EaseKind::Sine => "sine",
            EaseKind::Ripple => "ripple",
        };
        let _ = scene.eases.add_prototype(name, EaseFn::new(kind));
    }

    for effect in [
        Effect::spin(),
        Effect::drift(),
        Effect::pulse(),
        Effect::zoom(),
    ] {
        let name = effect.name().to_owned();
        let _ = scene.effects.add_prototype(name, effect);
    }

    for (name, kind) in [
        ("solo", GroupKind::Solo),
        (
            "ring",
            GroupKind::Ring {
                count: 8,
                radius: 120.0,
            },
        ),
        (
            "column",
            GroupKind::Column {
                count: 5,
                spacing: 50.0,
            },
        ),
        ("cascade", GroupKind::Cascade),
    ] {
        let _ = scene.groups.add_prototype(name, Group::new(kind, name));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builtin_sets_are_registered() {
        let mut scene = Scene::new(0);
        register_builtin(&mut scene);

        assert_eq!(scene.eases.names(), ["linear", "ripple", "sine", "smoothstep"]);
        assert_eq!(scene.effects.names(), ["drift", "pulse", "spin", "zoom"]);
        assert_eq!(scene.groups.names(), ["cascade", "column", "ring", "solo"]);
    }

    #[test]
    fn registration_is_idempotent() {
        let mut scene = Scene::new(0);
        register_builtin(&mut scene);
        register_builtin(&mut scene);
        assert_eq!(scene.groups.len(), 4);
    }
}
