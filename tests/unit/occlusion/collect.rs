use super::*;

fn el(name: &str, rect: Rect) -> UiElement {
    UiElement {
        name: name.to_string(),
        rect,
        visible: true,
        interactive: true,
        filled: false,
    }
}

#[test]
fn small_hidden_and_passive_elements_are_skipped() {
    let mut passive = el("_Passive", Rect::new(0.0, 0.0, 100.0, 100.0));
    passive.interactive = false;
    let mut filled = passive.clone();
    filled.filled = true;
    let mut hidden = el("_Hidden", Rect::new(0.0, 0.0, 100.0, 100.0));
    hidden.visible = false;

    let rects = collect_opaque_rects(
        &[
            el("_Small", Rect::new(0.0, 0.0, 31.0, 100.0)),
            passive,
            filled,
            hidden,
            el("_Big", Rect::new(200.0, 200.0, 264.0, 264.0)),
        ],
        32.0,
        false,
    );
    assert_eq!(
        rects,
        vec![
            Rect::new(0.0, 0.0, 100.0, 100.0),
            Rect::new(200.0, 200.0, 264.0, 264.0)
        ]
    );
}

#[test]
fn nameplates_never_occlude() {
    let rects = collect_opaque_rects(
        &[el("NamePlate", Rect::new(0.0, 0.0, 100.0, 100.0))],
        32.0,
        true,
    );
    assert!(rects.is_empty());
}

#[test]
fn alliance_lists_only_occlude_inside_an_alliance() {
    let els = [
        el("_AllianceList1", Rect::new(0.0, 0.0, 100.0, 100.0)),
        el("_AllianceList2", Rect::new(0.0, 200.0, 100.0, 300.0)),
    ];
    assert!(collect_opaque_rects(&els, 32.0, false).is_empty());
    assert_eq!(collect_opaque_rects(&els, 32.0, true).len(), 2);
}

#[test]
fn flipped_rects_are_normalized() {
    let rects = collect_opaque_rects(&[el("_W", Rect::new(100.0, 100.0, 0.0, 0.0))], 32.0, false);
    assert_eq!(rects, vec![Rect::new(0.0, 0.0, 100.0, 100.0)]);
}
