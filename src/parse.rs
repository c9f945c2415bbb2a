use crate::trace_node::{NodeKind, TraceNode};

/// Tags which exist to carry invocation details and are never painted as rows.
const HIDDEN_TAGS: [&str; 4] = ["arguments", "result", "properties", "profiler"];

/// Tags which are never containers, even with children.
/// Their children are shown by [`extract_details`](crate::extract_details) instead.
const NEVER_CONTAINER_TAGS: [&str; 2] = ["invocation", "arguments"];

const XML_NAMESPACE: &str = "http://www.w3.org/XML/1998/namespace";

struct Parser {
    next_id: usize,
    open_invocations: bool,
}

impl Parser {
    fn take_id(&mut self) -> usize {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    fn node(&mut self, markup: roxmltree::Node) -> Option<TraceNode> {
        if markup.is_element() {
            Some(self.element(markup))
        } else if markup.is_text() {
            markup.text().and_then(|text| self.text(text))
        } else {
            // Comments and processing instructions are not part of a trace
            None
        }
    }

    fn element(&mut self, markup: roxmltree::Node) -> TraceNode {
        let id = self.take_id();
        let tag_name = markup.tag_name();
        let tag = qualified_name(markup, tag_name.namespace(), tag_name.name());

        let mut display_label = tag.clone();
        let mut category = tag.clone();
        let mut attribute_summary = declared_namespaces(markup);
        let mut execution_time = None;
        for attribute in markup.attributes() {
            let value = attribute.value();
            let name = qualified_name(markup, attribute.namespace(), attribute.name());
            match name.as_str() {
                "name" | "method" => {
                    display_label = value.to_owned();
                    if value == "Sitemap" {
                        category = "sitemap".to_owned();
                    }
                }
                "executionTime" => execution_time = Some(value.to_owned()),
                "id" => {}
                name => attribute_summary.push_str(&format!("{name}=\"{value}\" ")),
            }
        }
        let tag = tag.as_str();

        let children = markup
            .children()
            .filter_map(|child| self.node(child))
            .collect::<Vec<_>>();

        let container = !children.is_empty() && !NEVER_CONTAINER_TAGS.contains(&tag);
        let open = container && (tag != "invocations" || self.open_invocations);

        TraceNode {
            id,
            kind: NodeKind::Element,
            display_label,
            category,
            attribute_summary,
            execution_time,
            hidden: HIDDEN_TAGS.contains(&tag),
            container,
            open,
            children,
        }
    }

    fn text(&mut self, text: &str) -> Option<TraceNode> {
        if is_all_whitespace(text) {
            return None;
        }
        Some(TraceNode {
            id: self.take_id(),
            kind: NodeKind::Text,
            display_label: "text".to_owned(),
            category: "text".to_owned(),
            attribute_summary: text.to_owned(),
            execution_time: None,
            hidden: false,
            container: false,
            open: false,
            children: Vec::new(),
        })
    }
}

/// Name as written in the markup, `prefix:local` for namespaced names.
fn qualified_name(markup: roxmltree::Node, namespace: Option<&str>, local: &str) -> String {
    let prefix = namespace.and_then(|uri| {
        if uri == XML_NAMESPACE {
            Some("xml")
        } else {
            markup.lookup_prefix(uri)
        }
    });
    match prefix {
        Some(prefix) if !prefix.is_empty() => format!("{prefix}:{local}"),
        _ => local.to_owned(),
    }
}

/// `xmlns` declarations made on this element as `name="value" ` pairs.
///
/// roxmltree lists every namespace in scope, so the ones inherited from the parent are left out.
fn declared_namespaces(markup: roxmltree::Node) -> String {
    let parent = markup.parent_element();
    let mut declarations = String::new();
    for namespace in markup.namespaces() {
        if namespace.name() == Some("xml") {
            continue;
        }
        let inherited = parent.is_some_and(|parent| {
            parent
                .namespaces()
                .any(|other| other.name() == namespace.name() && other.uri() == namespace.uri())
        });
        if inherited {
            continue;
        }
        let uri = namespace.uri();
        match namespace.name() {
            Some(prefix) => declarations.push_str(&format!("xmlns:{prefix}=\"{uri}\" ")),
            None => declarations.push_str(&format!("xmlns=\"{uri}\" ")),
        }
    }
    declarations
}

/// Only the XML whitespace characters count, other unicode spaces are content.
fn is_all_whitespace(text: &str) -> bool {
    text.chars().all(|c| matches!(c, '\t' | '\n' | '\r' | ' '))
}

/// Build the [`TraceNode`] tree of an already parsed profiling document.
///
/// Ids are handed out in pre-order starting at 0 for the root element.
/// `open_invocations` is the initial state of every `invocations` container.
///
/// Never fails: unknown tags become plain element nodes and whitespace-only text is dropped.
#[must_use]
pub fn parse(document: &roxmltree::Document, open_invocations: bool) -> TraceNode {
    let mut parser = Parser {
        next_id: 0,
        open_invocations,
    };
    let root = parser.element(document.root_element());
    tracing::debug!(
        nodes = parser.next_id,
        open_invocations,
        "parsed profiling trace"
    );
    root
}

/// Parse profiling markup text into a [`TraceNode`] tree.
///
/// # Errors
///
/// Errors when `text` is not well-formed XML.
///
/// # Example
///
/// ```
/// # use tui_trace_tree::parse_str;
/// let root = parse_str("<pipeline><invocations/></pipeline>", true)?;
/// assert_eq!(root.display_label(), "pipeline");
/// assert_eq!(root.children().len(), 1);
/// # Ok::<(), tui_trace_tree::Error>(())
/// ```
pub fn parse_str(text: &str, open_invocations: bool) -> crate::Result<TraceNode> {
    let document = roxmltree::Document::parse(text)?;
    Ok(parse(&document, open_invocations))
}

#[cfg(test)]
const PIPELINE: &str = r#"<pipeline><invocations open="x"><invocation name="Generator" executionTime="5"><arguments><arg1>hello</arg1></arguments></invocation></invocations></pipeline>"#;

#[test]
fn pipeline_parses_three_levels() {
    let root = parse_str(PIPELINE, true).unwrap();
    assert_eq!(root.display_label(), "pipeline");
    assert!(root.is_container());

    let invocations = &root.children()[0];
    assert_eq!(invocations.display_label(), "invocations");
    assert_eq!(invocations.attribute_summary(), "open=\"x\" ");
    assert!(invocations.is_container());
    assert!(invocations.is_open());

    let invocation = &invocations.children()[0];
    assert_eq!(invocation.display_label(), "Generator");
    assert_eq!(invocation.category(), "invocation");
    assert_eq!(invocation.execution_time(), Some("5"));
    assert_eq!(invocation.attribute_summary(), "");
    assert!(!invocation.is_container());
    assert!(!invocation.is_open());

    let arguments = &invocation.children()[0];
    assert!(arguments.is_hidden());
    assert!(!arguments.is_container());
    let argument = &arguments.children()[0];
    assert_eq!(argument.display_label(), "arg1");
    assert_eq!(argument.text_content(), Some("hello"));
}

#[test]
fn invocations_follow_open_default() {
    let root = parse_str(PIPELINE, false).unwrap();
    let invocations = &root.children()[0];
    assert!(invocations.is_container());
    assert!(!invocations.is_open());
}

#[test]
fn ids_are_pre_order_and_reset_per_parse() {
    let first = parse_str(PIPELINE, true).unwrap();
    let second = parse_str(PIPELINE, true).unwrap();
    assert_eq!(first, second);

    let mut ids = Vec::new();
    let mut stack = vec![&first];
    while let Some(node) = stack.pop() {
        ids.push(node.id());
        stack.extend(node.children().iter().rev());
    }
    assert_eq!(ids, [0, 1, 2, 3, 4, 5]);
}

#[test]
fn whitespace_text_is_dropped() {
    let root = parse_str("<a>\n\t <b>  </b>\r\n <c> x </c></a>", true).unwrap();
    let labels = root
        .children()
        .iter()
        .map(TraceNode::display_label)
        .collect::<Vec<_>>();
    assert_eq!(labels, ["b", "c"]);

    let b = &root.children()[0];
    assert!(b.children().is_empty());
    assert!(!b.is_container());

    let text = &root.children()[1].children()[0];
    assert!(text.is_text());
    assert_eq!(text.display_label(), "text");
    assert_eq!(text.category(), "text");
    assert_eq!(text.attribute_summary(), " x ");
    assert!(!text.is_container());
}

#[test]
fn non_breaking_space_is_content() {
    let root = parse_str("<a>\u{a0}</a>", true).unwrap();
    assert_eq!(root.children().len(), 1);
}

#[test]
fn cdata_becomes_text() {
    let root = parse_str("<a><![CDATA[<raw>]]></a>", true).unwrap();
    assert_eq!(root.text_content(), Some("<raw>"));
}

#[test]
fn attributes_project_into_fields() {
    let root = parse_str(
        r#"<node id="7" name="Sitemap" executionTime="12" uri="/a" cached="false"/>"#,
        true,
    )
    .unwrap();
    assert_eq!(root.display_label(), "Sitemap");
    assert_eq!(root.category(), "sitemap");
    assert_eq!(root.execution_time(), Some("12"));
    assert_eq!(root.attribute_summary(), "uri=\"/a\" cached=\"false\" ");
}

#[test]
fn method_overrides_label_without_sitemap_category() {
    let root = parse_str(r#"<call method="invoke"/>"#, true).unwrap();
    assert_eq!(root.display_label(), "invoke");
    assert_eq!(root.category(), "call");
    assert_eq!(root.execution_time(), None);
}

#[test]
fn hidden_tags_are_flagged() {
    let root = parse_str(
        "<invocation><arguments/><properties/><result/><profiler/><other/></invocation>",
        true,
    )
    .unwrap();
    let hidden = root
        .children()
        .iter()
        .map(TraceNode::is_hidden)
        .collect::<Vec<_>>();
    assert_eq!(hidden, [true, true, true, true, false]);
}

#[test]
fn unknown_tags_with_children_are_open_containers() {
    let root = parse_str("<whatever><x>1</x></whatever>", false).unwrap();
    assert!(root.is_container());
    assert!(root.is_open());
    assert!(!root.children()[0].is_hidden());
}

#[test]
fn comments_are_skipped() {
    let root = parse_str("<a><!-- note --><b/></a>", true).unwrap();
    assert_eq!(root.children().len(), 1);
    assert_eq!(root.node_count(), 2);
}

#[test]
fn namespaced_names_keep_their_prefix() {
    let root = parse_str(
        r#"<p:pipeline xmlns:p="urn:p" p:extra="1" other="2"><p:invocation p:name="Gen"/></p:pipeline>"#,
        true,
    )
    .unwrap();
    assert_eq!(root.display_label(), "p:pipeline");
    assert_eq!(root.category(), "p:pipeline");
    assert_eq!(
        root.attribute_summary(),
        "xmlns:p=\"urn:p\" p:extra=\"1\" other=\"2\" "
    );

    let child = &root.children()[0];
    assert_eq!(child.display_label(), "p:invocation");
    assert_eq!(child.category(), "p:invocation");
    assert_eq!(child.attribute_summary(), "p:name=\"Gen\" ");
}

#[test]
fn default_namespace_is_declared_once() {
    let root = parse_str(
        r#"<trace xmlns="urn:t"><invocation name="Gen" xml:lang="en"/></trace>"#,
        true,
    )
    .unwrap();
    assert_eq!(root.display_label(), "trace");
    assert_eq!(root.attribute_summary(), "xmlns=\"urn:t\" ");

    let child = &root.children()[0];
    assert_eq!(child.display_label(), "Gen");
    assert_eq!(child.category(), "invocation");
    assert_eq!(child.attribute_summary(), "xml:lang=\"en\" ");
    assert!(!child.is_container());
}

#[test]
fn adjacent_text_and_cdata_form_one_text_node() {
    let root = parse_str("<a>x<![CDATA[y]]><b/>z</a>", true).unwrap();
    let children = root
        .children()
        .iter()
        .map(|child| (child.id(), child.display_label(), child.attribute_summary()))
        .collect::<Vec<_>>();
    assert_eq!(children, [(1, "text", "xy"), (2, "b", ""), (3, "text", "z")]);
}

#[test]
fn malformed_markup_errors() {
    let result = parse_str("<a><b></a>", true);
    assert!(matches!(result, Err(crate::Error::Xml(_))));
}
