use super::*;

const ALL: [DeathAnimation; 3] = [
    DeathAnimation::Linear,
    DeathAnimation::Square,
    DeathAnimation::Cube,
];

#[test]
fn endpoints_are_stable() {
    for anim in ALL {
        assert_eq!(anim.apply(2.0, 0.0, 0.0), 2.0);
        assert_eq!(anim.apply(2.0, 0.0, 1.0), 0.0);
    }
}

#[test]
fn progress_is_clamped() {
    for anim in ALL {
        assert_eq!(anim.apply(2.0, 0.0, -3.0), 2.0);
        assert_eq!(anim.apply(2.0, 0.0, 7.0), 0.0);
    }
}

#[test]
fn collapse_is_monotonic_spot_check() {
    for anim in ALL {
        let a = anim.apply(1.0, 0.0, 0.25);
        let b = anim.apply(1.0, 0.0, 0.5);
        let c = anim.apply(1.0, 0.0, 0.75);
        assert!(a > b);
        assert!(b > c);
    }
}

#[test]
fn serde_names_are_snake_case() {
    let s = serde_json::to_string(&DeathAnimation::Square).unwrap();
    assert_eq!(s, "\"square\"");
}
