use super::*;
use crate::rules::flags::{ClassJob, JobMask, Membership};

fn line(r: u8) -> LineColor {
    LineColor::new(Rgba8::new(r, 0, 0, 0xFF), true, false)
}

fn player() -> TargetDescriptor {
    TargetDescriptor::for_player(Some(ClassJob::Paladin), Membership::default())
}

#[test]
fn auto_priority_sums_bit_indices_and_job_masks() {
    let rule = ColorRule::new(
        TargetDescriptor::new(AttributeFlags::PLAYER),
        TargetDescriptor::new(AttributeFlags::ENEMY),
        line(1),
    );
    assert_eq!(rule.effective_priority(), 3);

    let with_jobs = ColorRule::new(
        TargetDescriptor::new(AttributeFlags::PLAYER)
            .with_jobs(JobMask::EMPTY.with(ClassJob::Bard)),
        TargetDescriptor::new(AttributeFlags::ENEMY),
        line(1),
    );
    assert_eq!(with_jobs.effective_priority(), 4);

    let any = ColorRule::new(TargetDescriptor::any(), TargetDescriptor::any(), line(1));
    assert_eq!(any.effective_priority(), 0);
}

#[test]
fn adding_a_bit_never_lowers_auto_priority() {
    let base = TargetDescriptor::new(AttributeFlags::PLAYER);
    let before = ColorRule::new(base, TargetDescriptor::any(), line(1)).effective_priority();
    for i in 0..AttributeFlags::BIT_COUNT {
        let mut flags = base.flags;
        flags.insert(AttributeFlags::from_bits(1 << i));
        let after = ColorRule::new(TargetDescriptor::new(flags), TargetDescriptor::any(), line(1))
            .effective_priority();
        assert!(after >= before);
    }
}

#[test]
fn explicit_priority_wins_over_auto() {
    let rule = ColorRule::new(TargetDescriptor::any(), TargetDescriptor::any(), line(1))
        .with_priority(42);
    assert_eq!(rule.effective_priority(), 42);
    assert_eq!(rule.priority_for(false), Some(42));
    assert_eq!(rule.priority_for(true), None);
}

#[test]
fn explicit_priority_beats_catch_all() {
    let mut set = RuleSet::new();
    let b = set.insert(
        ColorRule::new(TargetDescriptor::any(), TargetDescriptor::any(), line(2)).with_priority(0),
    ).unwrap();
    let a = set.insert(
        ColorRule::new(
            TargetDescriptor::new(AttributeFlags::PLAYER),
            TargetDescriptor::new(AttributeFlags::ENEMY),
            line(1),
        )
        .with_priority(10),
    ).unwrap();

    let best = set
        .select_best(false, &player(), &TargetDescriptor::for_enemy())
        .map(|r| r.id);
    assert_eq!(best, Some(a));

    let best = set.select_best(false, &player(), &player()).map(|r| r.id);
    assert_eq!(best, Some(b));
}

#[test]
fn ties_resolve_by_insertion_order() {
    let mut set = RuleSet::new();
    let first = set.insert(
        ColorRule::new(TargetDescriptor::any(), TargetDescriptor::any(), line(1)).with_priority(5),
    ).unwrap();
    set.insert(
        ColorRule::new(TargetDescriptor::any(), TargetDescriptor::any(), line(2)).with_priority(5),
    ).unwrap();
    let best = set.select_best(false, &player(), &player()).unwrap();
    assert_eq!(best.id, first);
}

#[test]
fn focus_rules_are_separate_from_primary_rules() {
    let mut set = RuleSet::new();
    let focus = set.insert(
        ColorRule::new(TargetDescriptor::any(), TargetDescriptor::any(), line(1))
            .with_priority(100)
            .for_focus_target(),
    ).unwrap();
    let primary = set.insert(
        ColorRule::new(TargetDescriptor::any(), TargetDescriptor::any(), line(2)).with_priority(1),
    ).unwrap();
    assert_eq!(set.select_best(false, &player(), &player()).unwrap().id, primary);
    assert_eq!(set.select_best(true, &player(), &player()).unwrap().id, focus);
}

#[test]
fn update_resorts_and_keeps_id() {
    let mut set = RuleSet::new();
    let low = set.insert(
        ColorRule::new(TargetDescriptor::any(), TargetDescriptor::any(), line(1)).with_priority(1),
    ).unwrap();
    set.insert(
        ColorRule::new(TargetDescriptor::any(), TargetDescriptor::any(), line(2)).with_priority(2),
    ).unwrap();
    assert!(set.update(low, |r| {
        r.priority = 9;
        r.id = RuleId(999);
    }));
    assert_eq!(set.iter().next().unwrap().id, low);
    assert!(!set.update(RuleId(12345), |_| {}));
}

#[test]
fn remove_drops_the_rule() {
    let mut set = RuleSet::defaults();
    let n = set.len();
    let id = set.iter().next().unwrap().id;
    assert!(set.remove(id).is_some());
    assert_eq!(set.len(), n - 1);
    assert!(set.get(id).is_none());
    assert!(set.remove(id).is_none());
}

#[test]
fn no_match_yields_none() {
    let mut set = RuleSet::new();
    set.insert(ColorRule::new(
        TargetDescriptor::new(AttributeFlags::ENEMY),
        TargetDescriptor::new(AttributeFlags::ENEMY),
        line(1),
    ))
    .unwrap();
    assert!(set.select_best(false, &player(), &player()).is_none());
}

#[test]
fn defaults_color_enemy_lines_and_hide_catch_all() {
    let set = RuleSet::defaults();
    assert_eq!(set.len(), 6);

    let enemy = TargetDescriptor::for_enemy();
    let r = set.select_best(false, &enemy, &player()).unwrap();
    assert_eq!(r.line.color, Rgba8::new(0xFF, 0x00, 0x00, 0xC0));
    assert!(r.line.use_quad);

    let npc = TargetDescriptor::for_npc();
    let r = set.select_best(false, &npc, &npc).unwrap();
    assert!(!r.line.visible);
}

#[test]
fn deserialization_reassigns_missing_and_duplicate_ids() {
    let json = r#"[
        {"id": 3, "from": {"flags": 2}, "to": {"flags": 4}},
        {"id": 3, "from": {"flags": 1}, "to": {"flags": 1}, "priority": 0},
        {"from": {"flags": 1}, "to": {"flags": 1}, "priority": 0}
    ]"#;
    let set: RuleSet = serde_json::from_str(json).unwrap();
    let mut ids: Vec<u64> = set.iter().map(|r| r.id.0).collect();
    ids.sort_unstable();
    ids.dedup();
    assert_eq!(ids.len(), 3);
    assert!(set.get(RuleId(3)).is_some());

    let back = serde_json::to_string(&set).unwrap();
    let again: RuleSet = serde_json::from_str(&back).unwrap();
    assert_eq!(again, set);
}

#[test]
fn largest_stored_id_is_renumbered_on_load() {
    let json = r#"[
        { "id": 18446744073709551615, "from": { "flags": 2 }, "to": { "flags": 4 } },
        { "id": 7, "from": { "flags": 4 }, "to": { "flags": 2 } }
    ]"#;
    let mut set: RuleSet = serde_json::from_str(json).unwrap();
    let mut ids: Vec<u64> = set.iter().map(|r| r.id.0).collect();
    ids.sort_unstable();
    assert_eq!(ids, vec![1, 2]);

    let id = set
        .insert(ColorRule::new(
            TargetDescriptor::new(AttributeFlags::NPC),
            TargetDescriptor::new(AttributeFlags::NPC),
            line(3),
        ))
        .unwrap();
    assert_eq!(id, RuleId(3));
}

#[test]
fn insert_reports_exhausted_ids() {
    let rule = |n| {
        ColorRule::new(
            TargetDescriptor::new(AttributeFlags::NPC),
            TargetDescriptor::new(AttributeFlags::NPC),
            line(n),
        )
    };
    let mut stored = rule(1);
    stored.id = RuleId(u64::MAX - 2);
    let mut set = RuleSet::from_rules([stored]);
    assert_eq!(set.get(RuleId(u64::MAX - 2)).map(|r| r.id), Some(RuleId(u64::MAX - 2)));

    assert_eq!(set.insert(rule(2)).unwrap(), RuleId(u64::MAX - 1));
    let err = set.insert(rule(3)).unwrap_err();
    assert!(matches!(err, LinesError::Validation(_)));
    assert_eq!(set.len(), 2);
}
