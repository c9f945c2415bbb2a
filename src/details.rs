use crate::trace_node::TraceNode;

/// One key/value pair shown for a selected invocation.
///
/// `kind` is the category of the entry the row was taken from (like `java.lang.String`)
/// and can be used to pick an icon or style.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "json", derive(serde::Serialize, serde::Deserialize))]
pub struct DetailRow {
    pub key: String,
    pub value: String,
    pub kind: String,
}

impl DetailRow {
    fn from_entry(entry: &TraceNode) -> Self {
        Self {
            key: entry.display_label().to_owned(),
            value: entry.text_content().unwrap_or_default().to_owned(),
            kind: entry.category().to_owned(),
        }
    }
}

/// Lists the arguments, properties, result and profiler of an invocation.
///
/// The order is fixed: all arguments, all properties, the result, the profiler.
/// Missing parts add no rows, a node without any of them results in an empty `Vec`.
///
/// # Example
///
/// ```
/// # use tui_trace_tree::{extract_details, parse_str};
/// let invocation = parse_str(
///     r#"<invocation name="Generator"><arguments><arg name="src">index.xml</arg></arguments></invocation>"#,
///     true,
/// )?;
/// let rows = extract_details(&invocation);
/// assert_eq!(rows[0].key, "src");
/// assert_eq!(rows[0].value, "index.xml");
/// assert_eq!(rows[0].kind, "arg");
/// # Ok::<(), tui_trace_tree::Error>(())
/// ```
#[must_use]
pub fn extract_details(selected: &TraceNode) -> Vec<DetailRow> {
    let mut rows = Vec::new();

    for group in ["arguments", "properties"] {
        if let Some(group) = selected.child_by_label(group) {
            rows.extend(group.children().iter().map(DetailRow::from_entry));
        }
    }

    if let Some(entry) = selected
        .child_by_label("result")
        .and_then(|result| result.child(0))
    {
        rows.push(DetailRow::from_entry(entry));
    }

    if let Some(profiler) = selected.child_by_label("profiler") {
        rows.push(DetailRow {
            key: "profiler".to_owned(),
            value: profiler.text_content().unwrap_or_default().to_owned(),
            kind: "profiler".to_owned(),
        });
    }

    rows
}

#[cfg(test)]
fn pairs(rows: &[DetailRow]) -> Vec<(&str, &str)> {
    rows.iter()
        .map(|row| (row.key.as_str(), row.value.as_str()))
        .collect()
}

#[test]
fn arguments_properties_result_profiler_in_order() {
    let root = TraceNode::example(true);
    let rows = extract_details(root.find(3).unwrap());
    assert_eq!(
        pairs(&rows),
        [
            ("x", "1"),
            ("y", "2"),
            ("debug", "true"),
            ("value", "42"),
            (
                "profiler",
                "org.apache.cocoon.profiling.profiler.GeneratorProfiler"
            ),
        ]
    );
    let kinds = rows.iter().map(|row| row.kind.as_str()).collect::<Vec<_>>();
    assert_eq!(
        kinds,
        [
            "java.lang.String",
            "java.lang.String",
            "java.lang.Boolean",
            "java.lang.Integer",
            "profiler",
        ]
    );
}

#[test]
fn order_does_not_follow_document_order() {
    let invocation = crate::parse_str(
        "<invocation><result><r>42</r></result><properties><debug>true</debug></properties><arguments><x>1</x><y>2</y></arguments></invocation>",
        true,
    )
    .unwrap();
    assert_eq!(
        pairs(&extract_details(&invocation)),
        [("x", "1"), ("y", "2"), ("debug", "true"), ("r", "42")]
    );
}

#[test]
fn empty_arguments_only_yield_profiler() {
    let root = TraceNode::example(true);
    let rows = extract_details(root.find(17).unwrap());
    assert_eq!(
        pairs(&rows),
        [(
            "profiler",
            "org.apache.cocoon.profiling.profiler.TransformerProfiler"
        )]
    );
}

#[test]
fn entry_without_text_has_empty_value() {
    let invocation = crate::parse_str(
        r#"<invocation><arguments><null-value name="a"/><nested name="b"><inner>1</inner></nested></arguments></invocation>"#,
        true,
    )
    .unwrap();
    let rows = extract_details(&invocation);
    assert_eq!(pairs(&rows), [("a", ""), ("b", "")]);
    assert_eq!(rows[0].kind, "null-value");
}

#[test]
fn empty_result_adds_no_row() {
    let invocation =
        crate::parse_str("<invocation><result/><profiler/></invocation>", true).unwrap();
    assert_eq!(pairs(&extract_details(&invocation)), [("profiler", "")]);
}

#[test]
fn result_only_uses_first_entry() {
    let invocation = crate::parse_str(
        "<invocation><result><first>1</first><second>2</second></result></invocation>",
        true,
    )
    .unwrap();
    assert_eq!(pairs(&extract_details(&invocation)), [("first", "1")]);
}

#[test]
fn node_without_details_is_empty() {
    let root = TraceNode::example(true);
    assert!(extract_details(&root).is_empty());
    assert!(extract_details(root.find(22).unwrap()).is_empty());
}
