use crate::foundation::core::Vec3;

/// Animation state of one target line.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize)]
#[serde(rename_all = "snake_case")]
pub enum LineState {
    /// Growing from the source towards a newly acquired target.
    #[default]
    NewTarget,
    /// Target lost; retracting towards the source.
    Dying,
    /// Source became non-renderable or died; retracting and ignoring target changes until the
    /// condition clears.
    Dying2,
    /// Sliding from the previous target to a new one.
    Switching,
    /// Settled on the current target.
    Idle,
    /// Terminal. Reserved; never entered by the state machine.
    Dead,
}

impl LineState {
    /// Return `true` for the retracting states.
    pub fn is_dying(self) -> bool {
        matches!(self, Self::Dying | Self::Dying2)
    }

    /// Return `true` for states that track a live target.
    pub fn needs_target(self) -> bool {
        matches!(self, Self::NewTarget | Self::Switching | Self::Idle)
    }
}

fn sign(v: f64) -> i8 {
    i8::from(v > 0.0) - i8::from(v < 0.0)
}

/// Timer blending an endpoint between its third-person position and the camera while the camera
/// moves into or out of first person.
///
/// The ramp takes [`FirstPersonBlend::RAMP_SECONDS`], twice as fast entering first person and half
/// as fast leaving it. The timer restarts whenever the transition direction flips.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct FirstPersonBlend {
    elapsed: Option<f64>,
    last_transition: f64,
}

impl FirstPersonBlend {
    /// Nominal ramp duration.
    pub const RAMP_SECONDS: f64 = 0.49;

    /// Return `true` while a blend is in progress.
    pub fn is_running(&self) -> bool {
        self.elapsed.is_some()
    }

    /// Advance a running timer.
    pub fn advance(&mut self, dt: f64) {
        if let Some(e) = self.elapsed.as_mut() {
            *e += dt;
        }
    }

    /// Blended position for an endpoint.
    pub fn blend(&mut self, normal: Vec3, camera: Vec3, transition: f64, first_person: bool) -> Vec3 {
        if transition == 0.0 {
            self.elapsed = None;
            return if first_person { camera } else { normal };
        }

        if !self.is_running() || sign(transition) != sign(self.last_transition) {
            self.elapsed = Some(0.0);
        }
        self.last_transition = transition;

        let speed = if transition < 0.0 { 0.5 } else { 2.0 };
        let t = (self.elapsed.unwrap_or(0.0) / Self::RAMP_SECONDS * speed).min(1.0);
        if transition > 0.0 {
            normal.lerp(camera, t)
        } else {
            camera.lerp(normal, t)
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/line/state.rs"]
mod tests;
