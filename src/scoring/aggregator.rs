use crate::tournament::SkillRecord;

/// Fold one evaluation into a slot's running total.
///
/// `count` always grows by one; `sum` tracks the exact total and saturates
/// instead of overflowing.
pub fn apply_evaluation(record: SkillRecord, delta: i64) -> SkillRecord {
    SkillRecord {
        sum: record.sum.saturating_add(delta),
        count: record.count.saturating_add(1),
    }
}
