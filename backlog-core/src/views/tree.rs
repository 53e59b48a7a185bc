use std::collections::HashMap;

use crate::models::{Record, TreeNode, TreeView, Warning};
use crate::snapshot::Snapshot;

use super::item_view;

#[derive(Clone, Copy, PartialEq, Eq)]
enum Mark {
    Unvisited,
    InProgress,
    Done,
}

/// Build the parent/child hierarchy of a product's canonical work items.
///
/// Unresolvable parents and every member of a parent cycle end up at the
/// root, each with a warning. Children keep discovery order.
pub fn build_tree(snapshot: &Snapshot) -> TreeView {
    let items: Vec<&Record> = snapshot.canonical_work_items().map(|(_, r)| r).collect();
    let local: HashMap<&str, usize> = items
        .iter()
        .enumerate()
        .map(|(i, r)| (r.id.as_str(), i))
        .collect();

    let mut warnings = snapshot.warnings().to_vec();

    let mut parent: Vec<Option<usize>> = items
        .iter()
        .map(|record| {
            let declared = record.parent.as_deref().filter(|p| !p.is_empty())?;
            let resolved = local.get(declared).copied();
            if resolved.is_none() {
                warnings.push(Warning::OrphanParent {
                    id: record.id.clone(),
                    parent: declared.to_string(),
                });
            }
            resolved
        })
        .collect();

    for cycle in find_cycles(&parent) {
        for &member in &cycle {
            parent[member] = None;
        }
        let ids: Vec<String> = cycle.iter().map(|&i| items[i].id.clone()).collect();
        tracing::debug!(product = snapshot.product(), ids = ?ids, "Breaking parent cycle");
        warnings.push(Warning::ParentCycle { ids });
    }

    let mut children: Vec<Vec<usize>> = vec![Vec::new(); items.len()];
    let mut roots = Vec::new();
    for (i, p) in parent.iter().enumerate() {
        match p {
            Some(p) => children[*p].push(i),
            None => roots.push(i),
        }
    }

    fn build_subtree(
        i: usize,
        items: &[&Record],
        children: &[Vec<usize>],
        snapshot: &Snapshot,
    ) -> TreeNode {
        TreeNode {
            item: item_view(snapshot, items[i], false),
            children: children[i]
                .iter()
                .map(|&c| build_subtree(c, items, children, snapshot))
                .collect(),
        }
    }

    TreeView {
        roots: roots
            .into_iter()
            .map(|i| build_subtree(i, &items, &children, snapshot))
            .collect(),
        warnings,
    }
}

/// Every cycle in a parent array, members in parent-chain order starting from
/// the first one reached in discovery order.
fn find_cycles(parent: &[Option<usize>]) -> Vec<Vec<usize>> {
    let mut marks = vec![Mark::Unvisited; parent.len()];
    let mut cycles = Vec::new();

    for start in 0..parent.len() {
        if marks[start] != Mark::Unvisited {
            continue;
        }

        let mut chain = Vec::new();
        let mut current = Some(start);
        while let Some(node) = current {
            if marks[node] != Mark::Unvisited {
                break;
            }
            marks[node] = Mark::InProgress;
            chain.push(node);
            current = parent[node];
        }

        if let Some(node) = current {
            if marks[node] == Mark::InProgress {
                if let Some(at) = chain.iter().position(|&n| n == node) {
                    cycles.push(chain[at..].to_vec());
                }
            }
        }

        for node in chain {
            marks[node] = Mark::Done;
        }
    }

    cycles
}
