use std::f64::consts::PI;

/// Base curve of an easing function. Inputs are in seconds of fade time, not
/// normalized to [0,1]; the surrounding [`EaseFn`] stretch factors map the
/// fade duration onto the curve's natural domain.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub enum EaseKind {
    Linear,
    SmoothStep,
    Sine,
    /// Cosine wave whose amplitude grows with its input; settles to 0 at 0.
    Ripple,
}

impl EaseKind {
    pub fn base(self, x: f64) -> f64 {
        match self {
            Self::Linear => x,
            Self::SmoothStep => {
                let t = x.clamp(0.0, 1.0);
                t * t * (3.0 - 2.0 * t)
            }
            Self::Sine => (x * PI * 0.5).sin(),
            Self::Ripple => (1.0 - (x * 10.0).cos()) * 0.5 * x,
        }
    }
}

/// An easing function: a base curve with adjustable input/output stretch and
/// offset. `eval(x) = base(x * x_stretch + x_offset) * y_stretch + y_offset`.
///
/// Fade commands divide `x_stretch` by the fade duration so the curve's unit
/// domain spans the whole fade.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct EaseFn {
    kind: EaseKind,
    x_stretch: f64,
    y_stretch: f64,
    x_offset: f64,
    y_offset: f64,
}

impl EaseFn {
    pub fn new(kind: EaseKind) -> Self {
        Self {
            kind,
            x_stretch: 1.0,
            y_stretch: 1.0,
            x_offset: 0.0,
            y_offset: 0.0,
        }
    }

    pub fn kind(&self) -> EaseKind {
        self.kind
    }

    pub fn eval(&self, x: f64) -> f64 {
        self.kind.base(x * self.x_stretch + self.x_offset) * self.y_stretch + self.y_offset
    }

    pub fn x_stretch(&self) -> f64 {
        self.x_stretch
    }

    pub fn y_stretch(&self) -> f64 {
        self.y_stretch
    }

    pub fn x_offset(&self) -> f64 {
        self.x_offset
    }

    pub fn y_offset(&self) -> f64 {
        self.y_offset
    }

    pub fn set_x_stretch(&mut self, stretch: f64) {
        self.x_stretch = stretch;
    }

    pub fn set_y_stretch(&mut self, stretch: f64) {
        self.y_stretch = stretch;
    }

    pub fn set_x_offset(&mut self, offset: f64) {
        self.x_offset = offset;
    }

    pub fn set_y_offset(&mut self, offset: f64) {
        self.y_offset = offset;
    }
}
