use crate::ease::EaseFn;

/// Enabled/fading-in/fading-out state machine embedded in every group and
/// effect. At most one fade direction is active at a time; starting one
/// cancels the other and replaces that direction's easing function.
///
/// `fade_time` counts up from 0 while fading in and down from the fade
/// duration while fading out.
#[derive(Clone, Debug, Default)]
pub struct Fade {
    enabled: bool,
    fading_in: bool,
    fading_out: bool,
    fade_time: f64,
    fade_in_time: f64,
    fade_in_fn: Option<EaseFn>,
    fade_out_fn: Option<EaseFn>,
}

impl Fade {
    pub fn new() -> Self {
        Self {
            enabled: true,
            ..Default::default()
        }
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    /// Disabling cancels any fade in progress outright; it does not pause it.
    pub fn set_enabled(&mut self, enabled: bool) {
        self.enabled = enabled;
        if !enabled {
            self.fading_in = false;
            self.fading_out = false;
        }
    }

    pub fn is_fading_in(&self) -> bool {
        self.fading_in
    }

    pub fn is_fading_out(&self) -> bool {
        self.fading_out
    }

    /// Starts fading in over `duration` seconds, shaped by `ease`. Enables
    /// the owner immediately; the previous fade-in easing function (if any)
    /// is discarded. A non-positive duration completes on the next tick.
    pub fn fade_in(&mut self, duration: f64, ease: EaseFn) {
        self.enabled = true;
        self.fading_out = false;
        self.fading_in = true;
        self.fade_time = 0.0;
        self.fade_in_time = duration;
        self.fade_in_fn = Some(ease);
    }

    /// Starts fading out over `duration` seconds, shaped by `ease`. The owner
    /// stays enabled until the fade runs out, at which point the next tick
    /// disables it.
    pub fn fade_out(&mut self, duration: f64, ease: EaseFn) {
        self.fading_in = false;
        self.fading_out = true;
        self.fade_time = duration;
        self.fade_out_fn = Some(ease);
    }

    /// Advances the envelope by `dt` seconds and returns the current
    /// influence multiplier: the eased value mid-fade, 1 when idle or once a
    /// fade-in has run its course, 0 when a fade-out completes (which also
    /// disables the owner).
    pub fn tick(&mut self, dt: f64) -> f64 {
        if self.fading_in {
            self.fade_time += dt;
            if self.fade_time <= self.fade_in_time {
                self.fade_in_fn
                    .as_ref()
                    .map_or(1.0, |f| f.eval(self.fade_time))
            } else {
                self.fading_in = false;
                1.0
            }
        } else if self.fading_out {
            if self.fade_time >= dt {
                self.fade_time -= dt;
                self.fade_out_fn
                    .as_ref()
                    .map_or(1.0, |f| f.eval(self.fade_time))
            } else {
                self.set_enabled(false);
                0.0
            }
        } else {
            1.0
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ease::EaseKind;

    fn unit_ease(duration: f64) -> EaseFn {
        let mut f = EaseFn::new(EaseKind::Linear);
        f.set_x_stretch(1.0 / duration);
        f
    }

    #[test]
    fn starts_enabled_and_idle() {
        let mut fade = Fade::new();
        assert!(fade.is_enabled());
        assert!(!fade.is_fading_in());
        assert!(!fade.is_fading_out());
        assert_eq!(fade.tick(0.1), 1.0);
    }

    #[test]
    fn fade_in_ramps_then_settles_at_one() {
        let mut fade = Fade::new();
        fade.fade_in(1.0, unit_ease(1.0));

        let a = fade.tick(0.25);
        let b = fade.tick(0.25);
        assert!(a > 0.0 && a < 1.0);
        assert!(b > a && b < 1.0);

        fade.tick(0.25);
        fade.tick(0.25);
        // past the duration: the flag clears and the multiplier pins to 1
        assert_eq!(fade.tick(0.25), 1.0);
        assert!(!fade.is_fading_in());
        assert!(fade.is_enabled());
    }

    #[test]
    fn fade_in_enables_a_disabled_owner() {
        let mut fade = Fade::new();
        fade.set_enabled(false);
        fade.fade_in(1.0, unit_ease(1.0));
        assert!(fade.is_enabled());
        assert!(fade.is_fading_in());
    }

    #[test]
    fn fade_out_runs_down_and_disables() {
        let mut fade = Fade::new();
        fade.fade_out(1.0, unit_ease(1.0));

        let mut last = 1.0;
        for _ in 0..3 {
            let m = fade.tick(0.25);
            assert!(m > 0.0 && m < 1.0);
            assert!(m < last);
            last = m;
        }

        fade.tick(0.25);
        assert_eq!(fade.tick(0.25), 0.0);
        assert!(!fade.is_enabled());
        assert!(!fade.is_fading_out());
    }

    #[test]
    fn restart_overrides_previous_fade_in() {
        let mut fade = Fade::new();
        fade.fade_in(10.0, unit_ease(10.0));
        fade.tick(5.0);

        // second call behaves as if the first never happened
        fade.fade_in(1.0, unit_ease(1.0));
        let m = fade.tick(0.5);
        assert!((m - 0.5).abs() < 1e-9);
    }

    #[test]
    fn fade_directions_are_exclusive() {
        let mut fade = Fade::new();
        fade.fade_in(1.0, unit_ease(1.0));
        fade.fade_out(1.0, unit_ease(1.0));
        assert!(!fade.is_fading_in());
        assert!(fade.is_fading_out());

        fade.fade_in(1.0, unit_ease(1.0));
        assert!(fade.is_fading_in());
        assert!(!fade.is_fading_out());
    }

    #[test]
    fn disable_cancels_fade_outright() {
        let mut fade = Fade::new();
        fade.fade_in(1.0, unit_ease(1.0));
        fade.set_enabled(false);
        assert!(!fade.is_fading_in());

        // re-enabling does not resume the cancelled fade
        fade.set_enabled(true);
        assert!(!fade.is_fading_in());
        assert_eq!(fade.tick(0.1), 1.0);
    }

    #[test]
    fn non_positive_duration_completes_immediately() {
        let mut fade = Fade::new();
        fade.fade_in(0.0, unit_ease(1.0));
        fade.tick(0.1);
        assert_eq!(fade.tick(0.1), 1.0);
        assert!(!fade.is_fading_in());
    }
}
