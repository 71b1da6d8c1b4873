use super::*;

fn on(x: f64, y: f64) -> ScreenProjection {
    ScreenProjection {
        pos: Point::new(x, y),
        on_screen: true,
    }
}

fn world_inputs(length: f64) -> SampleCountInputs {
    SampleCountInputs {
        start: Vec3::ZERO,
        end: Vec3::new(length, 0.0, 0.0),
        screen_start: ScreenProjection::default(),
        screen_mid: ScreenProjection::default(),
        screen_end: ScreenProjection::default(),
        camera_forward: Vec3::new(1.0, 0.0, 0.0),
        first_person: false,
        viewport: Size::new(1800.0, 1000.0),
        rendered_lines: 1,
    }
}

fn world_config() -> LinesConfig {
    LinesConfig {
        screen_space_lod: false,
        view_angle_sampling: false,
        ..LinesConfig::default()
    }
}

#[test]
fn buffer_resize_reports_changes() {
    let mut b = SampleBuffer::default();
    assert!(b.is_empty());
    assert!(b.resize(5));
    assert!(!b.resize(5));
    assert_eq!(b.len(), 5);
    assert_eq!(b.parameter(0), 0.0);
    assert_eq!(b.parameter(2), 0.5);
    assert_eq!(b.parameter(4), 1.0);
}

#[test]
fn fixed_count_is_clamped_and_made_odd() {
    let mut cfg = LinesConfig {
        dynamic_sample_count: false,
        ..LinesConfig::default()
    };
    let inputs = world_inputs(1.0);
    assert_eq!(target_sample_count(&cfg, &inputs), 23);

    cfg.sample_count = 10;
    assert_eq!(target_sample_count(&cfg, &inputs), 9);

    cfg.sample_count = 2;
    assert_eq!(target_sample_count(&cfg, &inputs), 5);
}

#[test]
fn world_length_drives_the_count() {
    let cfg = world_config();
    assert_eq!(target_sample_count(&cfg, &world_inputs(2.0)), 11);
    assert_eq!(target_sample_count(&cfg, &world_inputs(3.0)), 13);
    assert_eq!(target_sample_count(&cfg, &world_inputs(10.0)), 23);
}

#[test]
fn count_never_shrinks_with_length() {
    let cfg = world_config();
    let mut last = 0;
    for i in 0..60 {
        let n = target_sample_count(&cfg, &world_inputs(f64::from(i) * 0.25));
        assert!(n >= last);
        assert_eq!(n % 2, 1);
        last = n;
    }
}

#[test]
fn many_rendered_lines_lower_the_ceiling() {
    let cfg = world_config();
    let mut inputs = world_inputs(10.0);
    inputs.rendered_lines = 22;
    assert_eq!(target_sample_count(&cfg, &inputs), 11);
}

#[test]
fn first_person_doubles_then_clamps() {
    let cfg = world_config();
    let mut inputs = world_inputs(2.0);
    inputs.first_person = true;
    assert_eq!(target_sample_count(&cfg, &inputs), 21);
}

#[test]
fn crossing_lines_get_more_samples() {
    let cfg = LinesConfig {
        screen_space_lod: false,
        ..LinesConfig::default()
    };
    let mut inputs = world_inputs(2.0);
    inputs.camera_forward = Vec3::new(0.0, 0.0, 1.0);
    assert_eq!(target_sample_count(&cfg, &inputs), 13);

    inputs.camera_forward = Vec3::new(1.0, 0.0, 0.0);
    assert_eq!(target_sample_count(&cfg, &inputs), 11);
}

#[test]
fn screen_length_counts_the_apex_bulge() {
    let cfg = LinesConfig {
        view_angle_sampling: false,
        ..LinesConfig::default()
    };
    let mut inputs = world_inputs(0.0);
    inputs.screen_start = on(0.0, 0.0);
    inputs.screen_end = on(750.0, 0.0);
    assert_eq!(target_sample_count(&cfg, &inputs), 15);

    inputs.screen_mid = on(375.0, 100.0);
    assert_eq!(target_sample_count(&cfg, &inputs), 17);
}
