use crate::trace_node::TraceNode;

/// Walks the painted rows in order. The position is shared by the whole traversal, not per subtree.
struct VisibleCursor {
    position: usize,
    target: usize,
}

impl VisibleCursor {
    fn search<'a>(&mut self, siblings: &'a [TraceNode]) -> Option<&'a TraceNode> {
        for node in siblings {
            if node.hidden {
                continue;
            }
            if self.position == self.target {
                return Some(node);
            }
            self.position += 1;

            if node.container && node.open {
                if let Some(found) = self.search(&node.children) {
                    return Some(found);
                }
            }
        }
        None
    }
}

/// Find the node painted on row `index` of a tree widget showing the children of `root`.
///
/// The widget only counts rows it paints:
/// hidden nodes are skipped and the children of closed containers are not counted.
/// `root` itself is not a row.
///
/// Returns `None` when `index` is not a painted row.
///
/// # Example
///
/// ```
/// # use tui_trace_tree::{parse_str, resolve};
/// let root = parse_str("<trace><a><b/></a><c/></trace>", true)?;
/// assert_eq!(resolve(&root, 1).map(|node| node.display_label()), Some("b"));
/// assert_eq!(resolve(&root, 3), None);
/// # Ok::<(), tui_trace_tree::Error>(())
/// ```
#[must_use]
pub fn resolve(root: &TraceNode, index: usize) -> Option<&TraceNode> {
    let mut cursor = VisibleCursor {
        position: 0,
        target: index,
    };
    let found = cursor.search(&root.children);
    if found.is_none() {
        tracing::trace!(
            index,
            visible = cursor.position,
            "visible index is not a painted row"
        );
    }
    found
}

#[cfg(test)]
fn labels(root: &TraceNode) -> Vec<&str> {
    (0..)
        .map_while(|index| resolve(root, index))
        .map(TraceNode::display_label)
        .collect()
}

#[test]
fn all_open_visits_every_visible_node() {
    let root = TraceNode::example(true);
    assert_eq!(
        labels(&root),
        [
            "Sitemap",
            "invocations",
            "Generator",
            "Transformer",
            "match",
            "text",
            "Serializer",
        ]
    );
}

#[test]
fn resolves_ids_of_example() {
    let root = TraceNode::example(true);
    let ids = (0..7)
        .map(|index| resolve(&root, index).map(TraceNode::id))
        .collect::<Vec<_>>();
    assert_eq!(
        ids,
        [
            Some(1),
            Some(2),
            Some(3),
            Some(17),
            Some(21),
            Some(22),
            Some(23)
        ]
    );
}

#[test]
fn closed_invocations_skip_their_children() {
    let root = TraceNode::example(false);
    assert_eq!(
        labels(&root),
        ["Sitemap", "invocations", "match", "text", "Serializer"]
    );
}

#[test]
fn closing_a_container_equals_removing_its_subtree() {
    let mut root = TraceNode::example(true);
    root.find_mut(21).unwrap().set_open(false);
    assert_eq!(
        labels(&root),
        [
            "Sitemap",
            "invocations",
            "Generator",
            "Transformer",
            "match",
            "Serializer",
        ]
    );

    root.find_mut(1).unwrap().set_open(false);
    assert_eq!(labels(&root), ["Sitemap", "Serializer"]);
}

#[test]
fn counter_continues_after_nested_subtree() {
    // Resetting the position per subtree would return "a1" for index 3
    let root = crate::parse_str("<r><a><a1/><a2/></a><b><b1/></b></r>", true).unwrap();
    assert_eq!(labels(&root), ["a", "a1", "a2", "b", "b1"]);
    assert_eq!(resolve(&root, 3).map(TraceNode::display_label), Some("b"));
}

#[test]
fn hidden_nodes_are_never_returned() {
    let root = TraceNode::example(true);
    let visible = root.visible_len();
    for index in 0..visible {
        let node = resolve(&root, index).unwrap();
        assert!(!node.is_hidden());
        assert!(!matches!(
            node.category(),
            "arguments" | "result" | "properties" | "profiler"
        ));
    }
}

#[test]
fn hidden_siblings_do_not_shift_positions() {
    let root = crate::parse_str(
        "<r><invocation name=\"i\"><arguments><x>1</x></arguments></invocation><result><v>1</v></result><last/></r>",
        true,
    )
    .unwrap();
    assert_eq!(labels(&root), ["i", "last"]);
}

#[test]
fn out_of_range_is_none() {
    let root = TraceNode::example(true);
    assert_eq!(resolve(&root, 7), None);
    assert_eq!(resolve(&root, usize::MAX), None);
}

#[test]
fn empty_root_has_no_rows() {
    let root = crate::parse_str("<r/>", true).unwrap();
    assert_eq!(resolve(&root, 0), None);
}

#[test]
fn pipeline_index_zero_is_invocations() {
    let root = crate::parse_str(
        r#"<pipeline><invocations open="x"><invocation name="Generator" executionTime="5"><arguments><arg1>hello</arg1></arguments></invocation></invocations></pipeline>"#,
        true,
    )
    .unwrap();
    assert_eq!(
        resolve(&root, 0).map(TraceNode::display_label),
        Some("invocations")
    );
    assert_eq!(
        resolve(&root, 1).map(TraceNode::display_label),
        Some("Generator")
    );
    assert_eq!(resolve(&root, 2), None);
}
