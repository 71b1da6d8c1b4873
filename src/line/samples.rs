use crate::config::LinesConfig;
use crate::foundation::core::{Point, Size, Vec3};
use crate::foundation::math::point_to_line_distance;
use crate::host::ScreenProjection;

/// One projected curve sample.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct LinePoint {
    /// Screen position.
    pub pos: Point,
    /// Projected on screen.
    pub visible: bool,
    /// Forward dot product against the camera axis.
    pub dot: f64,
    /// Inside the camera's view cone.
    pub in_view: bool,
}

/// Curve samples of one line, reused across frames.
#[derive(Clone, Debug, Default)]
pub struct SampleBuffer {
    points: Vec<LinePoint>,
}

impl SampleBuffer {
    /// Number of samples.
    pub fn len(&self) -> usize {
        self.points.len()
    }

    /// Return `true` when the buffer holds no samples.
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Resize to `count` samples. Returns `true` when the size changed.
    pub fn resize(&mut self, count: usize) -> bool {
        if self.points.len() == count {
            return false;
        }
        self.points.clear();
        self.points.resize(count, LinePoint::default());
        true
    }

    /// Curve parameter of sample `index`.
    pub fn parameter(&self, index: usize) -> f64 {
        match self.points.len() {
            0 | 1 => 0.0,
            n => index as f64 / (n - 1) as f64,
        }
    }

    /// Samples in curve order.
    pub fn points(&self) -> &[LinePoint] {
        &self.points
    }

    /// Mutable samples in curve order.
    pub fn points_mut(&mut self) -> &mut [LinePoint] {
        &mut self.points
    }
}

/// Everything the adaptive sample count depends on.
#[derive(Clone, Copy, Debug)]
pub struct SampleCountInputs {
    /// Source endpoint, world space.
    pub start: Vec3,
    /// Destination endpoint, world space.
    pub end: Vec3,
    /// Source projection from the last draw.
    pub screen_start: ScreenProjection,
    /// Apex projection from the last draw.
    pub screen_mid: ScreenProjection,
    /// Destination projection from the last draw.
    pub screen_end: ScreenProjection,
    /// Camera forward axis.
    pub camera_forward: Vec3,
    /// Camera is in first person.
    pub first_person: bool,
    /// Viewport size in pixels.
    pub viewport: Size,
    /// Lines rendered in the previous frame.
    pub rendered_lines: usize,
}

/// Number of curve samples for one line.
///
/// With dynamic sampling the count grows with the line's length (on screen, including the apex
/// bulge, or in world space), shrinks as more lines are drawn, grows for lines crossing the view
/// and for thick lines, and doubles in first person. The result is clamped to the configured
/// bounds and made odd so one sample sits on the apex.
pub fn target_sample_count(config: &LinesConfig, inputs: &SampleCountInputs) -> i64 {
    let min = i64::from(config.sample_count_min);
    let cfg_max = i64::from(config.sample_count_max);

    let count = if config.dynamic_sample_count {
        let r = inputs.rendered_lines.max(1) as i64;
        let mut max = cfg_max.max(min + 3);
        max = max.min(11 * max / r);

        let mut count = if config.screen_space_lod {
            let (s, e) = (inputs.screen_start.pos, inputs.screen_end.pos);
            let mut distance = s.distance(e);
            if inputs.screen_mid.on_screen {
                distance += point_to_line_distance(inputs.screen_mid.pos, s, e) * 2.0;
            }
            let density = inputs.viewport.width / (max - min).max(1) as f64 * 0.75;
            if density > 0.0 {
                min + (distance / density).floor() as i64
            } else {
                min
            }
        } else {
            min + (1.5 + (inputs.end - inputs.start).length()).floor() as i64 * 2
        };

        if config.view_angle_sampling {
            let dir = (inputs.end - inputs.start).normalize_or_zero();
            let facing = dir.dot(inputs.camera_forward).abs();
            count = (count as f64 * (1.0 + (1.0 - facing) * 0.25)) as i64;
        }

        count = count.min(max);
        count = (count as f64 * config.thickness_scalar()).floor() as i64;
        if inputs.first_person {
            count *= 2;
        }
        count
    } else {
        i64::from(config.sample_count)
    };

    let count = count.clamp(min, cfg_max.max(min));
    if count % 2 == 0 { count - 1 } else { count }
}

#[cfg(test)]
#[path = "../../tests/unit/line/samples.rs"]
mod tests;
