use super::*;
use crate::foundation::core::{Point, Size};

fn total_area(rs: &[Rect]) -> f64 {
    rs.iter().map(|r| r.area()).sum()
}

fn pairwise_disjoint(rs: &[Rect]) -> bool {
    rs.iter()
        .enumerate()
        .all(|(i, a)| rs[i + 1..].iter().all(|b| !a.overlaps_area(b)))
}

#[test]
fn centered_hole_leaves_four_strips() {
    let bbox = Rect::new(0.0, 0.0, 100.0, 100.0);
    let hole = Rect::from_origin_size(Point::new(25.0, 25.0), Size::new(50.0, 50.0));
    let regions = compute_drawable_regions(bbox, &[hole]);

    assert_eq!(regions.len(), 4);
    assert!(pairwise_disjoint(&regions));
    assert!(regions.iter().all(|r| !r.overlaps_area(&hole)));
    assert!(regions.iter().all(|r| bbox.contains_rect(*r)));
    assert!((total_area(&regions) + hole.area() - bbox.area()).abs() < 1e-9);
}

#[test]
fn full_cover_leaves_nothing() {
    let bbox = Rect::new(10.0, 10.0, 50.0, 50.0);
    let regions = compute_drawable_regions(bbox, &[Rect::new(0.0, 0.0, 100.0, 100.0)]);
    assert!(regions.is_empty());
}

#[test]
fn disjoint_rect_keeps_the_box() {
    let bbox = Rect::new(0.0, 0.0, 10.0, 10.0);
    let regions = compute_drawable_regions(bbox, &[Rect::new(50.0, 50.0, 60.0, 60.0)]);
    assert_eq!(regions, vec![bbox]);
}

#[test]
fn edge_contact_does_not_split() {
    let bbox = Rect::new(0.0, 0.0, 10.0, 10.0);
    let regions = compute_drawable_regions(bbox, &[Rect::new(10.0, 0.0, 20.0, 10.0)]);
    assert_eq!(regions, vec![bbox]);
}

#[test]
fn every_hole_applies_to_every_region() {
    let bbox = Rect::new(0.0, 0.0, 100.0, 100.0);
    // The second hole spans strips produced by the first one.
    let holes = [
        Rect::new(40.0, 40.0, 60.0, 60.0),
        Rect::new(0.0, 0.0, 100.0, 20.0),
        Rect::new(80.0, 0.0, 100.0, 100.0),
    ];
    let regions = compute_drawable_regions(bbox, &holes);

    assert!(pairwise_disjoint(&regions));
    for hole in &holes {
        assert!(regions.iter().all(|r| !r.overlaps_area(hole)));
    }
    // 100x100 minus the top band (2000), the right band below it (1600) and the centre (400).
    assert!((total_area(&regions) - (10_000.0 - 2000.0 - 1600.0 - 400.0)).abs() < 1e-9);
}

#[test]
fn hole_on_a_corner_leaves_two_strips() {
    let bbox = Rect::new(0.0, 0.0, 100.0, 100.0);
    let regions = compute_drawable_regions(bbox, &[Rect::new(50.0, 50.0, 150.0, 150.0)]);
    assert_eq!(regions.len(), 2);
    assert!((total_area(&regions) - 7500.0).abs() < 1e-9);
}
