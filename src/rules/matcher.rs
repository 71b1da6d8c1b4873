use crate::rules::flags::{AttributeFlags, TargetDescriptor};

/// Decide whether `candidate` satisfies the rule side `goal`.
///
/// - `ANY` on the goal matches everything.
/// - A non-empty goal job mask only constrains player candidates, which must share a job.
/// - Parent role bits made redundant by a refinement are dropped from the goal.
/// - Otherwise at least one attribute bit other than `ANY` must be set on both sides.
pub fn evaluate(goal: &TargetDescriptor, candidate: &TargetDescriptor) -> bool {
    if goal.flags.contains(AttributeFlags::ANY) {
        return true;
    }

    if !goal.jobs.is_empty()
        && candidate.flags.contains(AttributeFlags::PLAYER)
        && !goal.jobs.intersects(candidate.jobs)
    {
        return false;
    }

    let mut goal_flags = goal.flags.normalized();
    goal_flags.remove(AttributeFlags::ANY);
    goal_flags.intersects(candidate.flags)
}

#[cfg(test)]
#[path = "../../tests/unit/rules/matcher.rs"]
mod tests;
