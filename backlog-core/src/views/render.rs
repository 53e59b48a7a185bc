//! Plain-text rendering of tree and kanban views for terminals.

use crate::models::{ItemView, KanbanView, Lane, TreeNode, TreeView};

/// Get the symbol for the lane an item's state falls into.
fn state_symbol(state: &str) -> char {
    match Lane::for_state(state) {
        Lane::Backlog => '◇',
        Lane::Ready => '○',
        Lane::InProgress => '◐',
        Lane::Blocked => '■',
        Lane::Review => '◑',
        Lane::Done => '●',
        Lane::Other => '?',
    }
}

fn label(item: &ItemView) -> String {
    format!("{} {} {}", state_symbol(&item.state), item.id, item.title)
}

/// Render a tree as ASCII art with state symbols.
///
/// ```text
/// ◐ E-1 Offline mode
/// ├── ● F-1 Sync queue
/// │   └── ○ T-3 Retry policy
/// └── ◇ F-2 Conflict UI
/// ```
pub fn render_tree(tree: &TreeView) -> String {
    let mut output = String::new();
    for root in &tree.roots {
        output.push_str(&label(&root.item));
        output.push('\n');
        render_children(&mut output, root, "");
    }
    output
}

fn render_children(output: &mut String, node: &TreeNode, prefix: &str) {
    for (i, child) in node.children.iter().enumerate() {
        let is_last = i == node.children.len() - 1;
        let branch = if is_last { "└── " } else { "├── " };
        output.push_str(prefix);
        output.push_str(branch);
        output.push_str(&label(&child.item));
        output.push('\n');

        let continuation = if is_last { "    " } else { "│   " };
        render_children(output, child, &format!("{prefix}{continuation}"));
    }
}

/// Render a board as one block per lane.
pub fn render_kanban(board: &KanbanView) -> String {
    let mut output = String::new();
    for lane in &board.lanes {
        output.push_str(&format!("{} ({})\n", lane.lane.as_str(), lane.items.len()));
        for item in &lane.items {
            output.push_str(&format!("  {}  {}\n", item.id, item.title));
        }
    }
    output
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{KanbanLane, RecordKind};

    fn item(id: &str, title: &str, state: &str) -> ItemView {
        ItemView {
            id: id.to_string(),
            source_kind: RecordKind::WorkItem,
            item_type: "Task".to_string(),
            title: title.to_string(),
            state: state.to_string(),
            parent: None,
            created: None,
            updated: None,
            path: format!("items/task/{id}.md"),
            valid: true,
            parse_error: None,
            duplicate_count: 1,
            content: None,
        }
    }

    fn node(item: ItemView, children: Vec<TreeNode>) -> TreeNode {
        TreeNode { item, children }
    }

    #[test]
    fn test_single_root() {
        let tree = TreeView {
            roots: vec![node(item("E-1", "Auth", "Proposed"), vec![])],
            warnings: vec![],
        };
        assert_eq!(render_tree(&tree), "◇ E-1 Auth\n");
    }

    #[test]
    fn test_nested_children() {
        let tree = TreeView {
            roots: vec![node(
                item("E-1", "Auth", "InProgress"),
                vec![
                    node(
                        item("F-1", "OAuth", "Ready"),
                        vec![node(item("T-1", "Google", "Done"), vec![])],
                    ),
                    node(item("F-2", "Legacy", "weird"), vec![]),
                ],
            )],
            warnings: vec![],
        };
        assert_eq!(
            render_tree(&tree),
            "◐ E-1 Auth\n├── ○ F-1 OAuth\n│   └── ● T-1 Google\n└── ? F-2 Legacy\n"
        );
    }

    #[test]
    fn test_kanban_lists_every_lane() {
        let board = KanbanView {
            lanes: Lane::ALL
                .iter()
                .map(|&lane| KanbanLane {
                    lane,
                    items: if lane == Lane::Ready {
                        vec![item("T-1", "Wire cache", "ready")]
                    } else {
                        vec![]
                    },
                })
                .collect(),
            warnings: vec![],
        };
        let output = render_kanban(&board);
        assert!(output.starts_with("Backlog (0)\nReady (1)\n  T-1  Wire cache\n"));
        assert_eq!(output.lines().count(), 8);
    }
}
