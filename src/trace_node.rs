/// Whether a [`TraceNode`] came from a markup element or from text content.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "json", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "json", serde(rename_all = "lowercase"))]
pub enum NodeKind {
    Element,
    Text,
}

/// One node of a parsed profiling trace.
///
/// Created by [`parse`](crate::parse()) and owned by its parent (the root is owned by the caller).
/// Every field is projected once from the markup while parsing, nothing here looks at the markup again.
///
/// # Flags
///
/// - `hidden` nodes (`arguments`, `result`, `properties`, `profiler`) are never painted as rows.
///   They stay in the tree so [`extract_details`](crate::extract_details) can read them.
/// - `container` nodes can be opened and closed.
///   `invocation` and `arguments` nodes are never containers, even with children.
/// - `open` only matters for containers.
///
/// # Example
///
/// ```
/// # use tui_trace_tree::{parse_str, NodeKind};
/// let root = parse_str(r#"<pipeline><step name="Generator" executionTime="5"/></pipeline>"#, false)?;
/// let step = &root.children()[0];
/// assert_eq!(step.kind(), NodeKind::Element);
/// assert_eq!(step.display_label(), "Generator");
/// assert_eq!(step.execution_time(), Some("5"));
/// # Ok::<(), tui_trace_tree::Error>(())
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "json", derive(serde::Serialize, serde::Deserialize))]
pub struct TraceNode {
    pub(super) id: usize,
    pub(super) kind: NodeKind,
    pub(super) display_label: String,
    pub(super) category: String,
    pub(super) attribute_summary: String,
    pub(super) execution_time: Option<String>,
    pub(super) hidden: bool,
    pub(super) container: bool,
    pub(super) open: bool,
    pub(super) children: Vec<TraceNode>,
}

impl TraceNode {
    /// Pre-order position inside the parsed document, starting at 0.
    #[must_use]
    pub const fn id(&self) -> usize {
        self.id
    }

    #[must_use]
    pub const fn kind(&self) -> NodeKind {
        self.kind
    }

    #[must_use]
    pub const fn is_text(&self) -> bool {
        matches!(self.kind, NodeKind::Text)
    }

    /// Text of the primary cell.
    ///
    /// The tag name unless a `name` or `method` attribute overrides it. `"text"` for text nodes.
    #[must_use]
    pub fn display_label(&self) -> &str {
        &self.display_label
    }

    /// Classification used for styling: the tag name, `"sitemap"` or `"text"`.
    #[must_use]
    pub fn category(&self) -> &str {
        &self.category
    }

    /// All remaining attributes as `name="value" ` pairs.
    ///
    /// For text nodes this holds the raw text content instead.
    #[must_use]
    pub fn attribute_summary(&self) -> &str {
        &self.attribute_summary
    }

    #[must_use]
    pub fn execution_time(&self) -> Option<&str> {
        self.execution_time.as_deref()
    }

    #[must_use]
    pub const fn is_hidden(&self) -> bool {
        self.hidden
    }

    #[must_use]
    pub const fn is_container(&self) -> bool {
        self.container
    }

    #[must_use]
    pub const fn is_open(&self) -> bool {
        self.open
    }

    /// Open or close this node.
    ///
    /// Returns `true` when the state changed.
    /// Nodes which are not containers can not be opened and always return `false`.
    pub fn set_open(&mut self, open: bool) -> bool {
        if !self.container || self.open == open {
            return false;
        }
        self.open = open;
        true
    }

    #[must_use]
    pub fn children(&self) -> &[Self] {
        &self.children
    }

    /// Get a reference to a child by index.
    #[must_use]
    pub fn child(&self, index: usize) -> Option<&Self> {
        self.children.get(index)
    }

    /// First direct child with the given display label.
    #[must_use]
    pub fn child_by_label(&self, label: &str) -> Option<&Self> {
        self.children
            .iter()
            .find(|child| child.display_label == label)
    }

    /// Text content of the first text child, if any.
    #[must_use]
    pub fn text_content(&self) -> Option<&str> {
        self.children
            .iter()
            .find(|child| child.is_text())
            .map(|child| child.attribute_summary.as_str())
    }

    /// Search this node and its descendants in pre-order for the given id.
    #[must_use]
    pub fn find(&self, id: usize) -> Option<&Self> {
        if self.id == id {
            return Some(self);
        }
        self.children.iter().find_map(|child| child.find(id))
    }

    /// Mutable version of [`find`](Self::find).
    #[must_use]
    pub fn find_mut(&mut self, id: usize) -> Option<&mut Self> {
        if self.id == id {
            return Some(self);
        }
        self.children.iter_mut().find_map(|child| child.find_mut(id))
    }

    /// Amount of nodes in this subtree including itself.
    #[must_use]
    pub fn node_count(&self) -> usize {
        1 + self.children.iter().map(Self::node_count).sum::<usize>()
    }

    /// Amount of rows a tree widget paints below this node.
    ///
    /// Equals the length of [`flatten`](crate::flatten()).
    #[must_use]
    pub fn visible_len(&self) -> usize {
        self.children
            .iter()
            .filter(|child| !child.hidden)
            .map(|child| {
                if child.container && child.open {
                    1 + child.visible_len()
                } else {
                    1
                }
            })
            .sum()
    }
}

#[cfg(test)]
impl TraceNode {
    /// Trace used throughout the tests.
    ///
    /// Visible rows with everything open:
    ///
    /// ```text
    /// 0 sitemap          (id 1)
    /// 1   invocations    (id 2)
    /// 2     Generator    (id 3, not a container)
    /// 3     Transformer  (id 17)
    /// 4   match          (id 21)
    /// 5     text         (id 22)
    /// 6 Serializer       (id 23)
    /// ```
    ///
    /// The detail entries below Generator (ids 5, 7, 10 and 13) wrap their text and are containers too.
    /// They sit inside hidden nodes, so opening or closing them never changes the rows.
    pub(crate) fn example(open_invocations: bool) -> Self {
        crate::parse_str(EXAMPLE_TRACE, open_invocations).expect("example trace is valid xml")
    }
}

#[cfg(test)]
pub(crate) const EXAMPLE_TRACE: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<cocoon-profiling id="42">
  <node name="Sitemap" executionTime="12.5" uri="/hello">
    <invocations>
      <invocation name="Generator" executionTime="5">
        <arguments>
          <java.lang.String name="x">1</java.lang.String>
          <java.lang.String name="y">2</java.lang.String>
        </arguments>
        <properties>
          <java.lang.Boolean name="debug">true</java.lang.Boolean>
        </properties>
        <result>
          <java.lang.Integer name="value">42</java.lang.Integer>
        </result>
        <profiler>org.apache.cocoon.profiling.profiler.GeneratorProfiler</profiler>
      </invocation>
      <invocation method="Transformer" executionTime="3">
        <arguments/>
        <profiler>org.apache.cocoon.profiling.profiler.TransformerProfiler</profiler>
      </invocation>
    </invocations>
    <match pattern="hello" matched="true"><![CDATA[ matched ]]></match>
  </node>
  <node name="Serializer" executionTime="1"/>
</cocoon-profiling>"#;

#[test]
fn set_open_only_changes_containers() {
    let mut root = TraceNode::example(true);
    let sitemap = root.find_mut(1).unwrap();
    assert!(sitemap.set_open(false));
    assert!(!sitemap.set_open(false));
    assert!(!sitemap.is_open());

    let generator = root.find_mut(3).unwrap();
    assert_eq!(generator.display_label(), "Generator");
    assert!(!generator.set_open(true));
    assert!(!generator.is_open());
}

#[test]
fn find_walks_pre_order_ids() {
    let root = TraceNode::example(true);
    assert_eq!(root.find(0).map(TraceNode::display_label), Some("cocoon-profiling"));
    assert_eq!(root.find(23).map(TraceNode::display_label), Some("Serializer"));
    assert_eq!(root.find(24), None);
    assert_eq!(root.node_count(), 24);
}

#[test]
fn detail_entries_with_text_are_containers() {
    let root = TraceNode::example(true);
    for id in [5, 7, 10, 13] {
        let entry = root.find(id).unwrap();
        assert!(entry.is_container(), "id {id}");
        assert_eq!(entry.children().len(), 1);
    }
    assert!(!root.find(18).unwrap().is_container());
}

#[test]
fn visible_len_counts_open_rows() {
    assert_eq!(TraceNode::example(true).visible_len(), 7);
    assert_eq!(TraceNode::example(false).visible_len(), 5);
}

#[cfg(feature = "json")]
#[test]
fn serializes_for_rendering_hosts() {
    let root = crate::parse_str(r#"<trace><step name="a">1</step></trace>"#, true).unwrap();
    let json = serde_json::to_value(&root).unwrap();
    assert_eq!(json["children"][0]["display_label"], "a");
    assert_eq!(json["children"][0]["children"][0]["kind"], "text");
    let back: TraceNode = serde_json::from_value(json).unwrap();
    assert_eq!(back, root);
}

#[test]
fn child_by_label_and_text_content() {
    let root = TraceNode::example(true);
    let generator = root.find(3).unwrap();
    let profiler = generator.child_by_label("profiler").unwrap();
    assert_eq!(
        profiler.text_content(),
        Some("org.apache.cocoon.profiling.profiler.GeneratorProfiler")
    );
    assert!(generator.child_by_label("missing").is_none());
}
