//! Circular reference detection for formula cells.
//!
//! When a formula is evaluated, we trace the chain of cell references it
//! reaches (A1 references B1, B1 references C1, ...) and reject it if the
//! chain ever comes back to a key already on the current trace path.
//! The walk is an explicit depth-first traversal so deep chains cannot
//! overflow the stack.

use std::collections::HashSet;

use super::{CellRef, Grid};

/// Detect a circular reference reachable from `start`.
///
/// Returns `Some(path)` where `path` is the trace from `start` ending with the
/// key that was revisited, or None if every chain terminates.
pub fn detect_cycle(start: &CellRef, grid: &Grid) -> Option<Vec<CellRef>> {
    let mut path = vec![*start];
    let mut on_path = HashSet::from([*start]);
    // Keys whose whole reference chain is known to terminate.
    let mut cleared = HashSet::new();
    // Index of the next dependency to follow, one per key on the path.
    let mut cursors = vec![0usize];

    while let Some(current) = path.last().copied() {
        let depth = path.len() - 1;
        let deps = grid
            .get(&current)
            .map(|cell| cell.depends_on.as_slice())
            .unwrap_or(&[]);

        let Some(next) = deps.get(cursors[depth]).copied() else {
            path.pop();
            cursors.pop();
            on_path.remove(&current);
            cleared.insert(current);
            continue;
        };
        cursors[depth] += 1;

        if on_path.contains(&next) {
            path.push(next);
            return Some(path);
        }
        if cleared.contains(&next) {
            continue;
        }

        path.push(next);
        on_path.insert(next);
        cursors.push(0);
    }

    None
}

/// Render a trace path as `A1 -> B1 -> A1`.
pub fn format_path(path: &[CellRef]) -> String {
    path.iter()
        .map(|cell| cell.to_string())
        .collect::<Vec<_>>()
        .join(" -> ")
}
