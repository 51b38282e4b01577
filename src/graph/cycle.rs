//! Dependency cycle detection.

use std::collections::{btree_set, HashMap};

use crate::model::{TaskGraph, TaskId};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Mark {
    Unvisited,
    OnStack,
    Finished,
}

/// Finds the first dependency cycle in the graph, if any.
///
/// Depth-first search with three-colour marking, iterative so deep chains
/// cannot overflow the call stack. Roots and dependencies are visited in
/// ascending id order, so the reported cycle is deterministic. The chain
/// starts and ends at the task where the cycle closes, e.g.
/// `[T1, T2, T1]`. Edges to unknown ids are ignored here; validation
/// reports them separately.
///
/// Runs in `O(tasks + edges)`.
#[must_use]
pub fn find_cycle(graph: &TaskGraph) -> Option<Vec<TaskId>> {
    let index = graph.by_id();
    let mut marks: HashMap<&TaskId, Mark> = HashMap::with_capacity(index.len());

    for (&root_id, &root) in &index {
        if marks.get(root_id).copied().unwrap_or(Mark::Unvisited) != Mark::Unvisited {
            continue;
        }

        let mut path: Vec<&TaskId> = vec![root_id];
        let mut frames: Vec<btree_set::Iter<'_, TaskId>> = vec![root.depends_on.iter()];
        marks.insert(root_id, Mark::OnStack);

        while let Some(frame) = frames.last_mut() {
            let next = frame.next();
            match next {
                Some(dep) => {
                    let Some(&dep_task) = index.get(dep) else {
                        continue;
                    };
                    match marks.get(dep).copied().unwrap_or(Mark::Unvisited) {
                        Mark::Unvisited => {
                            marks.insert(&dep_task.id, Mark::OnStack);
                            path.push(&dep_task.id);
                            frames.push(dep_task.depends_on.iter());
                        }
                        Mark::OnStack => {
                            let start = path.iter().position(|id| *id == dep).unwrap_or_default();
                            let mut chain: Vec<TaskId> =
                                path[start..].iter().map(|id| (*id).clone()).collect();
                            chain.push(dep.clone());
                            return Some(chain);
                        }
                        Mark::Finished => {}
                    }
                }
                None => {
                    frames.pop();
                    if let Some(done) = path.pop() {
                        marks.insert(done, Mark::Finished);
                    }
                }
            }
        }
    }

    None
}
