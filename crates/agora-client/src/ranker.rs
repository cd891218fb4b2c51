//! Display order of replies.
//!
//! Replies are grouped by author role (instructors, then monitors, then
//! students, then anything unrecognized) and, within a group, newest first.
//! Replies without a timestamp go after dated ones in their group. Full
//! ties keep their input order, so the result is deterministic.

use std::cmp::Ordering;

use agora_shared::{Question, Reply, Role};

/// Sort key of a role; lower displays first.
pub fn priority(role: &Role) -> u8 {
    match role {
        Role::Instructor => 0,
        Role::Monitor => 1,
        Role::Student => 2,
        Role::Unknown(_) => 3,
    }
}

/// Ordering used by [`rank`].
pub fn compare(a: &Reply, b: &Reply) -> Ordering {
    priority(&a.author.role)
        .cmp(&priority(&b.author.role))
        // `None < Some`, so comparing b to a puts dated replies first
        .then_with(|| b.created_at.cmp(&a.created_at))
}

/// Ranked copy of `replies`. The input is left untouched.
pub fn rank(replies: &[Reply]) -> Vec<Reply> {
    let mut ranked = replies.to_vec();
    // stable
    ranked.sort_by(compare);
    ranked
}

/// Replies of `question` in display order.
pub fn ranked_replies(question: &Question) -> Vec<Reply> {
    rank(&question.replies)
}
