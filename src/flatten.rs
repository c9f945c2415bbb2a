use crate::trace_node::TraceNode;

/// A [`TraceNode`] painted as a row, together with its indentation level.
#[must_use]
#[derive(Debug)]
pub struct Flattened<'a> {
    depth: usize,
    pub node: &'a TraceNode,
}

impl<'a> Flattened<'a> {
    /// Zero based depth. Depth 0 means a direct child of the root with 0 indentation.
    #[must_use]
    pub const fn depth(&self) -> usize {
        self.depth
    }
}

/// Get a flat list of all painted rows below `root`.
///
/// Hidden nodes are left out and closed containers do not contribute their children.
/// Row `n` of the result is the node [`resolve`](crate::resolve()) returns for index `n`.
#[must_use]
pub fn flatten(root: &TraceNode) -> Vec<Flattened<'_>> {
    let mut result = Vec::new();
    flatten_into(&mut result, &root.children, 0);
    result
}

fn flatten_into<'a>(result: &mut Vec<Flattened<'a>>, siblings: &'a [TraceNode], depth: usize) {
    for node in siblings.iter().filter(|node| !node.hidden) {
        result.push(Flattened { depth, node });
        if node.container && node.open {
            flatten_into(result, &node.children, depth + 1);
        }
    }
}

#[test]
fn depth_works() {
    let root = TraceNode::example(true);
    let depths = flatten(&root)
        .iter()
        .map(Flattened::depth)
        .collect::<Vec<_>>();
    assert_eq!(depths, [0, 1, 2, 2, 1, 2, 0]);
}

#[cfg(test)]
fn containers_of(node: &TraceNode, ids: &mut Vec<usize>) {
    for child in node.children() {
        if child.is_container() {
            ids.push(child.id());
        }
        containers_of(child, ids);
    }
}

#[test]
fn flatten_agrees_with_resolve_for_every_open_state() {
    let template = TraceNode::example(true);
    let mut containers = Vec::new();
    containers_of(&template, &mut containers);
    // Argument, property and result entries wrap their text, so they count as well
    assert_eq!(containers, [1, 2, 5, 7, 9, 10, 12, 13, 15, 19, 21]);

    for mask in 0..(1_u32 << containers.len()) {
        let mut root = template.clone();
        for (bit, id) in containers.iter().enumerate() {
            let open = mask & (1 << bit) != 0;
            root.find_mut(*id).unwrap().set_open(open);
        }

        let flattened = flatten(&root);
        assert_eq!(flattened.len(), root.visible_len());
        for (index, row) in flattened.iter().enumerate() {
            let resolved = crate::resolve(&root, index).unwrap();
            assert!(std::ptr::eq(resolved, row.node), "mask {mask} index {index}");
        }
        assert!(crate::resolve(&root, flattened.len()).is_none());
    }
}

#[test]
fn flatten_closed_sitemap_is_top_level() {
    let mut root = TraceNode::example(true);
    root.find_mut(1).unwrap().set_open(false);
    let labels = flatten(&root)
        .into_iter()
        .map(|flattened| flattened.node.display_label())
        .collect::<Vec<_>>();
    assert_eq!(labels, ["Sitemap", "Serializer"]);
}
