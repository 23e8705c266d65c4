//! Processing order for the greedy allocator.

use crate::task::Task;

/// Sort tasks by priority descending, tie-broken by deadline ascending.
///
/// The sort is stable, so equal (priority, deadline) pairs keep their input
/// order. Higher-priority and earlier-deadline tasks are placed first and
/// get first pick of their preferred slots.
pub fn rank_tasks(tasks: &mut [Task]) {
    tasks.sort_by(|a, b| {
        b.priority
            .cmp(&a.priority)
            .then_with(|| a.deadline.cmp(&b.deadline))
    });
}
