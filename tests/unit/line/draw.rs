use super::*;

const LINE: Rgba8 = Rgba8::new(200, 40, 40, 192);
const OUTLINE: Rgba8 = Rgba8::new(0, 0, 0, 128);

fn proj(x: f64, y: f64, on_screen: bool) -> ScreenProjection {
    ScreenProjection {
        pos: Point::new(x, y),
        on_screen,
    }
}

fn pt(x: f64, y: f64) -> LinePoint {
    LinePoint {
        pos: Point::new(x, y),
        visible: true,
        dot: 1.0,
        in_view: true,
    }
}

fn plain() -> LinesConfig {
    LinesConfig {
        pulsing_effect: false,
        fade_to_end: false,
        ..LinesConfig::default()
    }
}

fn geometry(points: &[LinePoint], curve: CurveKind) -> LineGeometry<'_> {
    LineGeometry {
        start: proj(0.0, 0.0, true),
        mid: proj(10.0, -5.0, true),
        end: proj(20.0, 0.0, true),
        points,
        curve,
        color: LINE,
        outline: OUTLINE,
    }
}

fn caps(out: &[DrawCommand]) -> Vec<Rect> {
    out.iter()
        .filter_map(|c| match c {
            DrawCommand::Cap { rect, .. } => Some(*rect),
            _ => None,
        })
        .collect()
}

fn quads(out: &[DrawCommand], texture: LineTexture) -> usize {
    out.iter()
        .filter(|c| matches!(c, DrawCommand::TexturedQuad { texture: t, .. } if *t == texture))
        .count()
}

#[test]
fn solid_quadratic_draws_outline_under_line() {
    let geo = geometry(&[], CurveKind::Quadratic);
    let mut out = Vec::new();
    emit_solid(&geo, &plain(), None, &mut out);

    assert_eq!(out.len(), 2);
    match out[0] {
        DrawCommand::QuadBezier {
            curve,
            color,
            thickness,
            ..
        } => {
            assert_eq!(curve.p1, Point::new(10.0, -5.0));
            assert_eq!(color, OUTLINE);
            assert_eq!(thickness, 20.0);
        }
        other => panic!("unexpected {other:?}"),
    }
    assert_eq!(out[1].color(), LINE);
}

#[test]
fn solid_cubic_doubles_the_apex() {
    let geo = geometry(&[], CurveKind::Cubic);
    let cfg = LinesConfig {
        outline_thickness: 0.0,
        ..plain()
    };
    let clip = Some(Rect::new(0.0, 0.0, 5.0, 5.0));
    let mut out = Vec::new();
    emit_solid(&geo, &cfg, clip, &mut out);

    assert_eq!(out.len(), 1);
    let DrawCommand::CubicBezier { curve, .. } = out[0] else {
        panic!("expected a cubic");
    };
    assert_eq!(curve.p1, curve.p2);
    assert_eq!(out[0].clip(), clip);
}

#[test]
fn textured_emits_quads_and_both_caps() {
    let pts = [pt(0.0, 0.0), pt(10.0, 0.0), pt(20.0, 0.0)];
    let geo = geometry(&pts, CurveKind::Quadratic);
    let mut out = Vec::new();
    emit_textured(&geo, &plain(), 0.0, None, &mut out);

    assert_eq!(quads(&out, LineTexture::Line), 2);
    assert_eq!(quads(&out, LineTexture::Outline), 2);
    assert_eq!(caps(&out).len(), 2);

    let DrawCommand::TexturedQuad { corners, .. } = out[0] else {
        panic!("expected a quad first");
    };
    assert_eq!(
        corners,
        [
            Point::new(0.0, -32.0),
            Point::new(10.0, -32.0),
            Point::new(10.0, 32.0),
            Point::new(0.0, 32.0),
        ]
    );
}

#[test]
fn segments_with_both_ends_off_screen_are_skipped() {
    let mut pts = [pt(0.0, 0.0), pt(10.0, 0.0), pt(20.0, 0.0), pt(30.0, 0.0)];
    pts[1].visible = false;
    pts[2].visible = false;
    let geo = geometry(&pts, CurveKind::Quadratic);
    let mut out = Vec::new();
    emit_textured(&geo, &plain(), 0.0, None, &mut out);

    assert_eq!(quads(&out, LineTexture::Line), 2);
}

#[test]
fn out_of_view_start_suppresses_begin_cap() {
    let mut pts = [pt(0.0, 0.0), pt(10.0, 0.0), pt(20.0, 0.0)];
    pts[0].in_view = false;
    let geo = geometry(&pts, CurveKind::Quadratic);
    let mut out = Vec::new();
    emit_textured(&geo, &plain(), 0.0, None, &mut out);

    assert_eq!(quads(&out, LineTexture::Line), 1);
    let caps = caps(&out);
    assert_eq!(caps.len(), 1);
    assert!(caps[0].contains(Point::new(20.0, 0.0)));
}

#[test]
fn off_screen_end_has_no_end_cap() {
    let pts = [pt(0.0, 0.0), pt(10.0, 0.0), pt(20.0, 0.0)];
    let mut geo = geometry(&pts, CurveKind::Quadratic);
    geo.end.on_screen = false;
    let mut out = Vec::new();
    emit_textured(&geo, &plain(), 0.0, None, &mut out);

    let caps = caps(&out);
    assert_eq!(caps.len(), 1);
    assert!(caps[0].contains(Point::new(0.0, 0.0)));
}

#[test]
fn transparent_line_emits_nothing() {
    let pts = [pt(0.0, 0.0), pt(10.0, 0.0), pt(20.0, 0.0)];
    let mut geo = geometry(&pts, CurveKind::Quadratic);
    geo.color = LINE.with_alpha(0);
    let mut out = Vec::new();
    emit_textured(&geo, &plain(), 0.0, None, &mut out);
    assert!(out.is_empty());
}

#[test]
fn single_sample_emits_nothing() {
    let pts = [pt(0.0, 0.0)];
    let geo = geometry(&pts, CurveKind::Quadratic);
    let mut out = Vec::new();
    emit_textured(&geo, &plain(), 0.0, None, &mut out);
    assert!(out.is_empty());
}

#[test]
fn every_command_carries_the_clip() {
    let pts = [pt(0.0, 0.0), pt(10.0, 0.0), pt(20.0, 0.0)];
    let geo = geometry(&pts, CurveKind::Quadratic);
    let clip = Some(Rect::new(0.0, -50.0, 12.0, 50.0));
    let mut out = Vec::new();
    emit_textured(&geo, &LinesConfig::default(), 1.5, clip, &mut out);
    assert!(!out.is_empty());
    assert!(out.iter().all(|c| c.clip() == clip));
}

#[test]
fn pulsing_alpha_stays_between_half_and_full() {
    let cfg = LinesConfig {
        fade_to_end: false,
        ..LinesConfig::default()
    };
    for step in 0..40 {
        let t = f64::from(step) / 39.0;
        let runtime = f64::from(step) * 0.37;
        let (line, outline) = segment_colors(&cfg, LINE, OUTLINE, t, runtime);
        assert!((96..=192).contains(&line.a), "line alpha {}", line.a);
        assert!((64..=128).contains(&outline.a), "outline alpha {}", outline.a);
        assert_eq!((line.r, line.g, line.b), (LINE.r, LINE.g, LINE.b));
    }
}

#[test]
fn fade_to_end_thins_the_outline_only() {
    let cfg = LinesConfig {
        pulsing_effect: false,
        ..LinesConfig::default()
    };
    let (line, outline) = segment_colors(&cfg, LINE, OUTLINE, 0.0, 0.0);
    assert_eq!((line.a, outline.a), (192, 128));
    let (line, outline) = segment_colors(&cfg, LINE, OUTLINE, 1.0, 0.0);
    assert_eq!((line.a, outline.a), (192, 25));
}

#[test]
fn end_cap_fades_with_fade_to_end() {
    let pts = [pt(0.0, 0.0), pt(10.0, 0.0), pt(20.0, 0.0)];
    let geo = geometry(&pts, CurveKind::Quadratic);
    let cfg = LinesConfig {
        pulsing_effect: false,
        ..LinesConfig::default()
    };
    let mut out = Vec::new();
    emit_textured(&geo, &cfg, 0.0, None, &mut out);

    let cap_colors: Vec<Rgba8> = out
        .iter()
        .filter(|c| matches!(c, DrawCommand::Cap { .. }))
        .map(DrawCommand::color)
        .collect();
    assert_eq!(cap_colors, vec![LINE, LINE.scale_alpha(0.2)]);
}
