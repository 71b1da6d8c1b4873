use super::*;

#[test]
fn normalization_drops_parent_roles_only_when_refined() {
    let f = AttributeFlags::DPS | AttributeFlags::MELEE;
    assert_eq!(f.normalized(), AttributeFlags::MELEE);

    let f = AttributeFlags::DPS | AttributeFlags::TANK;
    assert_eq!(f.normalized(), f);

    let f = AttributeFlags::HEALER | AttributeFlags::SHIELD_HEALER | AttributeFlags::PLAYER;
    assert_eq!(
        f.normalized(),
        AttributeFlags::SHIELD_HEALER | AttributeFlags::PLAYER
    );
}

#[test]
fn index_sum_weights_specific_bits() {
    assert_eq!(AttributeFlags::ANY.index_sum(), 0);
    assert_eq!(AttributeFlags::PLAYER.index_sum(), 1);
    assert_eq!(
        (AttributeFlags::PLAYER | AttributeFlags::SHIELD_HEALER).index_sum(),
        16
    );
}

#[test]
fn job_bits_are_unique_and_fit() {
    let all: JobMask = ClassJob::ALL.into_iter().collect();
    assert_eq!(all.bits().count_ones(), 43);
    for (i, job) in ClassJob::ALL.into_iter().enumerate() {
        assert_eq!(job.id() as usize, i);
        assert_eq!(ClassJob::from_id(i as u32), Some(job));
    }
    assert_eq!(ClassJob::from_id(43), None);
}

#[test]
fn every_job_has_exactly_one_base_role() {
    let bases = [
        AttributeFlags::DPS,
        AttributeFlags::HEALER,
        AttributeFlags::TANK,
        AttributeFlags::CRAFTER_GATHERER,
    ];
    for job in ClassJob::ALL {
        let roles = job.role_flags();
        let n = bases.iter().filter(|b| roles.contains(**b)).count();
        assert_eq!(n, 1, "{job:?}");
    }
}

#[test]
fn player_descriptor_carries_role_and_membership() {
    let d = TargetDescriptor::for_player(
        Some(ClassJob::Scholar),
        Membership {
            is_self: true,
            party: true,
            alliance: false,
        },
    );
    assert!(d.flags.contains(AttributeFlags::ANY | AttributeFlags::PLAYER));
    assert!(d.flags.contains(AttributeFlags::SELF | AttributeFlags::PARTY));
    assert!(!d.flags.intersects(AttributeFlags::ALLIANCE));
    assert!(
        d.flags
            .contains(AttributeFlags::HEALER | AttributeFlags::SHIELD_HEALER)
    );
    assert!(d.jobs.contains(ClassJob::Scholar));
    assert!(!d.jobs.contains(ClassJob::Sage));
}

#[test]
fn flags_serialize_as_plain_integers() {
    let d = TargetDescriptor::new(AttributeFlags::PLAYER).with_jobs(JobMask::from_bits(4));
    let s = serde_json::to_string(&d).unwrap();
    assert_eq!(s, r#"{"flags":2,"jobs":4}"#);
}
