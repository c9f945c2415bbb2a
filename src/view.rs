/*!
Projection of traces into ratatui text.

Nothing here paints: hosts place the returned [`Line`]s and [`Row`]s into whichever ratatui widgets they use.
*/

use std::borrow::Cow;

use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Cell, Row};
use unicode_width::UnicodeWidthStr;

use crate::details::DetailRow;
use crate::flatten::{flatten, Flattened};
use crate::trace_node::TraceNode;

pub const INVOCATION: Style = Style::new().fg(Color::Yellow);
pub const INVOCATIONS: Style = Style::new().fg(Color::Yellow).add_modifier(Modifier::BOLD);
pub const SITEMAP: Style = Style::new().fg(Color::Magenta).add_modifier(Modifier::BOLD);
pub const TEXT: Style = Style::new().fg(Color::Green);
pub const PROFILER: Style = Style::new().fg(Color::DarkGray);
pub const KEY: Style = Style::new().fg(Color::Blue);
pub const EXECUTION_TIME: Style = Style::new().fg(Color::Cyan);
pub const ATTRIBUTES: Style = Style::new().fg(Color::DarkGray);

pub const TIME_SEPARATOR: Span = Span {
    content: Cow::Borrowed(": "),
    style: Style::new().fg(Color::DarkGray),
};

/// Symbols in front of the display label.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Symbols {
    /// Container with its children currently visible.
    pub open: &'static str,
    /// Container with its children currently not visible.
    pub closed: &'static str,
    /// Everything which can not be opened.
    pub leaf: &'static str,
}

impl Default for Symbols {
    fn default() -> Self {
        Self {
            open: "\u{25bc} ",   // Arrow down
            closed: "\u{25b6} ", // Arrow to right
            leaf: "  ",
        }
    }
}

#[must_use]
pub fn category_style(category: &str) -> Style {
    match category {
        "invocation" => INVOCATION,
        "invocations" => INVOCATIONS,
        "sitemap" => SITEMAP,
        "text" => TEXT,
        "profiler" => PROFILER,
        _ => Style::new(),
    }
}

/// Style of the key cell of a [`DetailRow`].
#[must_use]
pub fn kind_style(kind: &str) -> Style {
    match kind {
        "profiler" => PROFILER,
        "text" => TEXT,
        _ => KEY,
    }
}

/// One painted row of the trace tree.
#[must_use]
pub fn node_line<'a>(row: &Flattened<'a>, symbols: &Symbols) -> Line<'a> {
    let node = row.node;
    let symbol = if !node.is_container() {
        symbols.leaf
    } else if node.is_open() {
        symbols.open
    } else {
        symbols.closed
    };

    let mut spans = vec![
        Span::raw("  ".repeat(row.depth())),
        Span::raw(symbol),
        Span::styled(node.display_label(), category_style(node.category())),
    ];
    if let Some(time) = node.execution_time() {
        spans.push(TIME_SEPARATOR);
        spans.push(Span::styled(time, EXECUTION_TIME));
    }
    let summary = node.attribute_summary();
    if !summary.is_empty() {
        let style = if node.is_text() { TEXT } else { ATTRIBUTES };
        spans.push(Span::raw(" "));
        spans.push(Span::styled(summary, style));
    }
    Line::from(spans)
}

/// All painted rows below `root`.
///
/// Line `n` belongs to the node [`resolve`](crate::resolve()) returns for `n`.
#[must_use]
pub fn tree_lines<'a>(root: &'a TraceNode, symbols: &Symbols) -> Vec<Line<'a>> {
    flatten(root)
        .iter()
        .map(|row| node_line(row, symbols))
        .collect()
}

/// Key and value cells of a detail table.
#[must_use]
pub fn detail_row(row: &DetailRow) -> Row<'_> {
    Row::new([
        Cell::from(Span::styled(row.key.as_str(), kind_style(&row.kind))),
        Cell::from(row.value.as_str()),
    ])
}

/// Display width of the widest key, useful as the first column constraint.
#[must_use]
pub fn key_column_width(rows: &[DetailRow]) -> u16 {
    let width = rows
        .iter()
        .map(|row| row.key.width())
        .max()
        .unwrap_or_default();
    u16::try_from(width).unwrap_or(u16::MAX)
}

#[cfg(test)]
fn plain(line: &Line) -> String {
    line.spans
        .iter()
        .map(|span| span.content.as_ref())
        .collect()
}

#[test]
fn lines_show_depth_symbol_label_and_time() {
    let root = TraceNode::example(true);
    let lines = tree_lines(&root, &Symbols::default())
        .iter()
        .map(plain)
        .collect::<Vec<_>>();
    assert_eq!(
        lines,
        [
            "\u{25bc} Sitemap: 12.5 uri=\"/hello\" ",
            "  \u{25bc} invocations",
            "      Generator: 5",
            "      Transformer: 3",
            "  \u{25bc} match pattern=\"hello\" matched=\"true\" ",
            "      text  matched ",
            "  Serializer: 1",
        ]
    );
}

#[test]
fn closed_container_uses_closed_symbol() {
    let root = TraceNode::example(false);
    let symbols = Symbols {
        open: "-",
        closed: "+",
        leaf: ".",
    };
    let lines = tree_lines(&root, &symbols);
    assert_eq!(plain(&lines[1]), "  +invocations");
}

#[test]
fn label_is_styled_by_category() {
    let root = TraceNode::example(true);
    let lines = tree_lines(&root, &Symbols::default());
    assert_eq!(lines[0].spans[2].style, SITEMAP);
    assert_eq!(lines[1].spans[2].style, INVOCATIONS);
    assert_eq!(lines[2].spans[2].style, INVOCATION);
    assert_eq!(lines[5].spans[4].style, TEXT);
}

#[test]
fn key_column_fits_widest_key() {
    let rows = [
        DetailRow {
            key: "x".to_owned(),
            value: "1".to_owned(),
            kind: "java.lang.String".to_owned(),
        },
        DetailRow {
            key: "größe".to_owned(),
            value: "2".to_owned(),
            kind: "java.lang.Integer".to_owned(),
        },
    ];
    assert_eq!(key_column_width(&rows), 5);
    assert_eq!(key_column_width(&[]), 0);
}

#[test]
fn detail_rows_render_as_table() {
    use ratatui::buffer::Buffer;
    use ratatui::layout::{Constraint, Rect};
    use ratatui::widgets::{Table, Widget};

    let root = TraceNode::example(true);
    let rows = crate::extract_details(root.find(3).unwrap());
    let area = Rect::new(0, 0, 20, 5);
    let mut buffer = Buffer::empty(area);
    let table = Table::new(
        rows.iter().map(detail_row),
        [Constraint::Length(key_column_width(&rows)), Constraint::Fill(1)],
    );
    Widget::render(table, area, &mut buffer);

    let first_line = (0..area.width)
        .map(|x| buffer.get(x, 0).symbol())
        .collect::<String>();
    assert!(first_line.starts_with("x        1"), "{first_line:?}");
    assert_eq!(buffer.get(0, 0).fg, Color::Blue);
}
