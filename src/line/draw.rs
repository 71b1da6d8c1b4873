//! Draw primitives emitted by target lines.
//!
//! The core never rasterizes; a renderer consumes [`DrawCommand`]s, binding the named texture and
//! applying the clip rectangle.

use std::f64::consts::{FRAC_PI_2, PI};

use kurbo::{CubicBez, QuadBez};

use crate::animation::curve::CurveKind;
use crate::config::LinesConfig;
use crate::foundation::core::{Point, Rect, Rgba8, Vec2, alpha_from_f64};
use crate::foundation::math::lerp;
use crate::host::ScreenProjection;
use crate::line::samples::LinePoint;

/// Texture slot for textured primitives.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize)]
#[serde(rename_all = "snake_case")]
pub enum LineTexture {
    /// Line body strip.
    Line,
    /// Outline strip.
    Outline,
}

/// One renderer instruction.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum DrawCommand {
    /// Solid quadratic curve.
    QuadBezier {
        /// Curve in screen space.
        curve: QuadBez,
        /// Stroke color.
        color: Rgba8,
        /// Stroke width.
        thickness: f64,
        /// Clip rectangle, if any.
        clip: Option<Rect>,
    },
    /// Solid cubic curve.
    CubicBezier {
        /// Curve in screen space.
        curve: CubicBez,
        /// Stroke color.
        color: Rgba8,
        /// Stroke width.
        thickness: f64,
        /// Clip rectangle, if any.
        clip: Option<Rect>,
    },
    /// Textured quad along one curve segment.
    TexturedQuad {
        /// Texture to bind.
        texture: LineTexture,
        /// Corners in winding order; UVs are (0,0), (0,1), (1,1), (1,0).
        corners: [Point; 4],
        /// Tint.
        color: Rgba8,
        /// Clip rectangle, if any.
        clip: Option<Rect>,
    },
    /// End cap sprite, drawn with the edge texture.
    Cap {
        /// Sprite bounds.
        rect: Rect,
        /// Tint.
        color: Rgba8,
        /// Clip rectangle, if any.
        clip: Option<Rect>,
    },
}

impl DrawCommand {
    /// Clip rectangle of this command.
    pub fn clip(&self) -> Option<Rect> {
        match self {
            Self::QuadBezier { clip, .. }
            | Self::CubicBezier { clip, .. }
            | Self::TexturedQuad { clip, .. }
            | Self::Cap { clip, .. } => *clip,
        }
    }

    /// Tint of this command.
    pub fn color(&self) -> Rgba8 {
        match self {
            Self::QuadBezier { color, .. }
            | Self::CubicBezier { color, .. }
            | Self::TexturedQuad { color, .. }
            | Self::Cap { color, .. } => *color,
        }
    }
}

/// Screen-space geometry and colors of one line for one frame.
#[derive(Clone, Copy, Debug)]
pub struct LineGeometry<'a> {
    /// Source projection.
    pub start: ScreenProjection,
    /// Apex projection.
    pub mid: ScreenProjection,
    /// Destination projection.
    pub end: ScreenProjection,
    /// Curve samples.
    pub points: &'a [LinePoint],
    /// Curve kind.
    pub curve: CurveKind,
    /// Line color after alpha effects.
    pub color: Rgba8,
    /// Outline color after alpha effects.
    pub outline: Rgba8,
}

fn unit(v: Vec2) -> Vec2 {
    let len = v.hypot();
    if len > 0.0 && len.is_finite() {
        v / len
    } else {
        Vec2::ZERO
    }
}

/// Emit an outline then a line stroke as one solid Bézier each.
pub fn emit_solid(
    geo: &LineGeometry<'_>,
    config: &LinesConfig,
    clip: Option<Rect>,
    out: &mut Vec<DrawCommand>,
) {
    let (s, m, e) = (geo.start.pos, geo.mid.pos, geo.end.pos);
    let strokes = [
        (geo.outline, config.outline_thickness),
        (geo.color, config.line_thickness),
    ];
    for (color, thickness) in strokes {
        if thickness <= 0.0 {
            continue;
        }
        out.push(match geo.curve {
            CurveKind::Quadratic => DrawCommand::QuadBezier {
                curve: QuadBez::new(s, m, e),
                color,
                thickness,
                clip,
            },
            CurveKind::Cubic => DrawCommand::CubicBezier {
                curve: CubicBez::new(s, m, m, e),
                color,
                thickness,
                clip,
            },
        });
    }
}

/// Line and outline colors at curve parameter `t` with pulsing and fade-to-end applied.
pub fn segment_colors(
    config: &LinesConfig,
    color: Rgba8,
    outline: Rgba8,
    t: f64,
    runtime: f64,
) -> (Rgba8, Rgba8) {
    let mut colors = [color, outline];

    if config.pulsing_effect {
        let phase = -runtime * config.wave_frequency_scalar + t * PI + FRAC_PI_2;
        let amplitude_scale = 1.0 - config.wave_amplitude_offset;
        for c in &mut colors {
            let max = f64::from(c.a);
            let min = max * 0.5;
            let a = (phase.sin() * (max - min) * amplitude_scale + min).clamp(min, max);
            *c = c.with_alpha(alpha_from_f64(a));
        }
    }

    if config.fade_to_end {
        let a = f64::from(colors[1].a);
        colors[1] = colors[1].with_alpha(alpha_from_f64(lerp(a, a * config.fade_to_end_scalar, t)));
    }

    (colors[0], colors[1])
}

/// Emit textured segment quads followed by the end caps.
///
/// Segments with both samples off screen are skipped. Segments touching a sample outside the view
/// cone, or fully transparent, count as occluded; an occluded first or last segment suppresses the
/// corresponding cap.
pub fn emit_textured(
    geo: &LineGeometry<'_>,
    config: &LinesConfig,
    runtime: f64,
    clip: Option<Rect>,
    out: &mut Vec<DrawCommand>,
) {
    let pts = geo.points;
    let n = pts.len();
    if n < 2 {
        return;
    }
    let step = 1.0 / (n - 1) as f64;
    let thickness = config.line_thickness * 2.0;
    let outline_thickness = config.outline_thickness * 2.0;

    let mut first_occluded = false;
    let mut last_occluded = false;

    for (i, pair) in pts.windows(2).enumerate() {
        let (a, b) = (pair[0], pair[1]);
        if !a.visible && !b.visible {
            continue;
        }

        if !a.in_view || !b.in_view {
            if i == 0 {
                first_occluded = true;
            } else if i == n - 2 {
                last_occluded = true;
            }
            continue;
        }

        let dir = unit(b.pos - a.pos);
        let normal = Vec2::new(-dir.y, dir.x);
        let perp = normal * thickness;
        let perp_outline = normal * outline_thickness;

        let (color, outline) =
            segment_colors(config, geo.color, geo.outline, i as f64 * step, runtime);

        let occluded = color.a == 0 || thickness == 0.0;
        if i == 0 {
            first_occluded = occluded;
        }
        if i == n - 2 {
            last_occluded = occluded;
        }
        if occluded {
            continue;
        }

        out.push(DrawCommand::TexturedQuad {
            texture: LineTexture::Line,
            corners: [a.pos - perp, b.pos - perp, b.pos + perp, a.pos + perp],
            color,
            clip,
        });
        if outline.a != 0 && outline_thickness != 0.0 {
            out.push(DrawCommand::TexturedQuad {
                texture: LineTexture::Outline,
                corners: [
                    a.pos - perp_outline,
                    b.pos - perp_outline,
                    b.pos + perp_outline,
                    a.pos + perp_outline,
                ],
                color: outline,
                clip,
            });
        }
    }

    emit_caps(geo, config, thickness, first_occluded, last_occluded, clip, out);
}

fn cap_rect(at: Point, dir: Vec2, thickness: f64) -> Rect {
    let spread = Vec2::new(thickness * 0.45, thickness * 0.45);
    Rect::from_points(at - dir - spread, at + dir + spread)
}

fn emit_caps(
    geo: &LineGeometry<'_>,
    config: &LinesConfig,
    thickness: f64,
    first_occluded: bool,
    last_occluded: bool,
    clip: Option<Rect>,
    out: &mut Vec<DrawCommand>,
) {
    let pts = geo.points;
    let n = pts.len();

    if geo.start.on_screen && !first_occluded {
        let dir = unit(pts[1].pos - pts[0].pos);
        out.push(DrawCommand::Cap {
            rect: cap_rect(pts[0].pos, dir, thickness),
            color: geo.color,
            clip,
        });
    }

    if geo.end.on_screen && !last_occluded {
        let dir = unit(pts[n - 1].pos - pts[n - 2].pos);
        let color = if config.fade_to_end {
            geo.color.scale_alpha(config.fade_to_end_scalar)
        } else {
            geo.color
        };
        out.push(DrawCommand::Cap {
            rect: cap_rect(pts[n - 1].pos, dir, thickness),
            color,
            clip,
        });
    }
}

#[cfg(test)]
#[path = "../../tests/unit/line/draw.rs"]
mod tests;
