use kurbo::Vec2;

use crate::{fade::Fade, stage::Element};

/// Concrete per-frame mutations. Every kind scales its step by the elapsed
/// time and the combined influence, so effects compose additively over ticks
/// regardless of frame rate.
#[derive(Clone, Debug)]
pub enum EffectKind {
    /// Turns each element at `params[0]` radians per second.
    Spin,
    /// Translates each element along (`params[0]`, `params[1]`) units per second.
    Drift,
    /// Oscillates element scale. `params[0]` is the rate in radians per
    /// second, `params[1]` the depth, `params[2]` a per-element phase offset
    /// keyed on the element's index within its group.
    Pulse { phase: f64 },
    /// Pushes element positions radially away from the origin (or toward it
    /// for negative rates) at `params[0]` per second.
    Zoom,
}

/// A named, cloneable unit of per-frame mutation with an influence scalar in
/// [0,1], tweakable parameters, and its own fade envelope. Owned by exactly
/// one group; spawned by cloning a registry prototype.
#[derive(Clone, Debug)]
pub struct Effect {
    name: String,
    kind: EffectKind,
    influence: f64,
    params: Vec<f64>,
    param_notes: Vec<&'static str>,
    fade: Fade,
}

impl Effect {
    fn new(
        name: impl Into<String>,
        kind: EffectKind,
        params: Vec<f64>,
        param_notes: Vec<&'static str>,
    ) -> Self {
        debug_assert_eq!(params.len(), param_notes.len());
        Self {
            name: name.into(),
            kind,
            influence: 1.0,
            params,
            param_notes,
            fade: Fade::new(),
        }
    }

    pub fn spin() -> Self {
        Self::new(
            "spin",
            EffectKind::Spin,
            vec![3.0],
            vec!["rotation speed (rad/s)"],
        )
    }

    pub fn drift() -> Self {
        Self::new(
            "drift",
            EffectKind::Drift,
            vec![40.0, 0.0],
            vec!["x velocity (units/s)", "y velocity (units/s)"],
        )
    }

    pub fn pulse() -> Self {
        Self::new(
            "pulse",
            EffectKind::Pulse { phase: 0.0 },
            vec![2.0, 0.4, 0.7],
            vec![
                "pulse rate (rad/s)",
                "pulse depth",
                "phase offset per element",
            ],
        )
    }

    pub fn zoom() -> Self {
        Self::new("zoom", EffectKind::Zoom, vec![0.5], vec!["expansion rate (1/s)"])
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn set_name(&mut self, name: impl Into<String>) {
        self.name = name.into();
    }

    pub fn influence(&self) -> f64 {
        self.influence
    }

    /// Clamps to [0,1]. A non-positive value disables the effect; a positive
    /// one re-enables it.
    pub fn set_influence(&mut self, influence: f64) {
        if influence > 0.0 {
            self.influence = influence.min(1.0);
            self.fade.set_enabled(true);
        } else {
            self.influence = 0.0;
            self.fade.set_enabled(false);
        }
    }

    pub fn params(&self) -> &[f64] {
        &self.params
    }

    /// Tweakable parameters; the slot layout per kind is documented on
    /// [`EffectKind`] and mirrored in [`Effect::param_notes`].
    pub fn params_mut(&mut self) -> &mut [f64] {
        &mut self.params
    }

    /// `param_notes()[i]` describes `params()[i]`.
    pub fn param_notes(&self) -> &[&'static str] {
        &self.param_notes
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

    /// Advances the fade envelope by `dt` and applies the kind's mutation to
    /// `element` with the combined influence. Does nothing when disabled,
    /// including the tick on which a fade-out completes. `index` is the
    /// element's position within its owning group.
    pub fn drive(&mut self, element: &mut Element, dt: f64, index: usize) {
        if !self.fade.is_enabled() {
            return;
        }

        let envelope = self.fade.tick(dt);
        if !self.fade.is_enabled() {
            return;
        }

        let inf = self.influence * envelope;
        match &mut self.kind {
            EffectKind::Spin => {
                element.rotation += self.params[0] * dt * inf;
            }
            EffectKind::Drift => {
                element.translate += Vec2::new(self.params[0], self.params[1]) * (dt * inf);
            }
            EffectKind::Pulse { phase } => {
                *phase += self.params[0] * dt;
                let sway = (*phase + index as f64 * self.params[2]).sin();
                let factor = 1.0 + self.params[1] * sway * dt * inf;
                element.scale *= factor;
            }
            EffectKind::Zoom => {
                element.translate *= 1.0 + self.params[0] * dt * inf;
            }
        }
    }
}
