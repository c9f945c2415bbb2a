use crate::trace_node::TraceNode;

/// Open or close every container below `root` whose display label is `label`.
///
/// The search stops at the first node along each path whose label matches,
/// so a matching container nested inside another matching node keeps its state.
/// Everything else is searched regardless of being hidden or closed.
///
/// Returns how many nodes actually changed their state.
///
/// # Example
///
/// ```
/// # use tui_trace_tree::{parse_str, toggle_by_label};
/// let mut root = parse_str("<trace><invocations><invocation/></invocations></trace>", false)?;
/// assert_eq!(toggle_by_label(&mut root, "invocations", true), 1);
/// assert!(root.children()[0].is_open());
/// # Ok::<(), tui_trace_tree::Error>(())
/// ```
pub fn toggle_by_label(root: &mut TraceNode, label: &str, open: bool) -> usize {
    let changed = toggle_children(&mut root.children, label, open);
    tracing::debug!(label, open, changed, "toggled containers by label");
    changed
}

fn toggle_children(siblings: &mut [TraceNode], label: &str, open: bool) -> usize {
    siblings
        .iter_mut()
        .map(|node| {
            if node.display_label == label {
                usize::from(node.set_open(open))
            } else {
                toggle_children(&mut node.children, label, open)
            }
        })
        .sum()
}

#[cfg(test)]
fn open_states(root: &TraceNode) -> Vec<(usize, bool)> {
    crate::flatten(root)
        .into_iter()
        .map(|row| (row.node.id(), row.node.is_open()))
        .collect()
}

#[test]
fn opens_invocations() {
    let mut root = TraceNode::example(false);
    assert!(!root.find(2).unwrap().is_open());
    assert_eq!(toggle_by_label(&mut root, "invocations", true), 1);
    assert!(root.find(2).unwrap().is_open());
    assert_eq!(root, TraceNode::example(true));
}

#[test]
fn toggle_is_idempotent() {
    let mut once = TraceNode::example(false);
    toggle_by_label(&mut once, "invocations", true);

    let mut twice = TraceNode::example(false);
    toggle_by_label(&mut twice, "invocations", true);
    assert_eq!(toggle_by_label(&mut twice, "invocations", true), 0);

    assert_eq!(once, twice);
}

#[test]
fn finds_matches_inside_closed_subtrees() {
    let mut root = TraceNode::example(true);
    root.find_mut(1).unwrap().set_open(false);
    assert_eq!(toggle_by_label(&mut root, "invocations", false), 1);
    assert!(!root.find(2).unwrap().is_open());
    assert!(!root.find(1).unwrap().is_open());
}

#[test]
fn finds_matches_inside_hidden_nodes() {
    let mut root = crate::parse_str(
        "<trace><result><wrapper><inner>1</inner></wrapper></result></trace>",
        true,
    )
    .unwrap();
    assert_eq!(toggle_by_label(&mut root, "wrapper", false), 1);
    let wrapper = &root.children()[0].children()[0];
    assert!(!wrapper.is_open());
}

#[test]
fn first_match_along_a_path_stops_the_search() {
    let mut root = crate::parse_str(
        "<trace><group><group><leaf>1</leaf></group></group></trace>",
        true,
    )
    .unwrap();
    assert_eq!(toggle_by_label(&mut root, "group", false), 1);
    let outer = &root.children()[0];
    assert!(!outer.is_open());
    assert!(outer.children()[0].is_open());
}

#[test]
fn matching_non_container_stops_the_search() {
    let mut root = crate::parse_str(
        r#"<trace><invocation name="x"><wrap name="x"><leaf>1</leaf></wrap></invocation></trace>"#,
        true,
    )
    .unwrap();
    assert_eq!(toggle_by_label(&mut root, "x", false), 0);
    assert!(root.children()[0].children()[0].is_open());
}

#[test]
fn root_itself_is_not_toggled() {
    let mut root = crate::parse_str("<trace><a>1</a></trace>", true).unwrap();
    assert_eq!(toggle_by_label(&mut root, "trace", false), 0);
    assert!(root.is_open());
}

#[test]
fn closing_match_hides_rows() {
    let mut root = TraceNode::example(true);
    toggle_by_label(&mut root, "match", false);
    assert_eq!(
        open_states(&root),
        [
            (1, true),
            (2, true),
            (3, false),
            (17, false),
            (21, false),
            (23, false)
        ]
    );
}
