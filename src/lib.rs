#![forbid(unsafe_code)]
#![warn(clippy::pedantic, clippy::nursery)]

/*!
Model of server side profiling traces for collapsible tree views.

A profiling trace is parsed into a [`TraceNode`] tree with [`parse`] or [`parse_str`].
Tree widgets only count the rows they paint, so [`resolve`] maps such a visible index back to its [`TraceNode`].
The arguments, properties, result and profiler of a selected invocation are listed by [`extract_details`].
[`toggle_by_label`] opens or closes containers by name without parsing again.

[`ProfilingSession`] ties these together for a host showing one trace at a time.
The [`view`] module projects the tree and the details into ratatui text.

# Example

```
# use tui_trace_tree::{extract_details, parse_str, resolve};
let root = parse_str(
    r#"<pipeline>
        <invocations>
            <invocation name="Generator" executionTime="5">
                <arguments><arg1>hello</arg1></arguments>
            </invocation>
        </invocations>
    </pipeline>"#,
    true,
)?;

let selected = resolve(&root, 1).expect("row 1 is painted");
assert_eq!(selected.display_label(), "Generator");

let details = extract_details(selected);
assert_eq!(details[0].key, "arg1");
assert_eq!(details[0].value, "hello");
# Ok::<(), tui_trace_tree::Error>(())
```
*/

mod details;
mod error;
mod flatten;
mod parse;
mod preferences;
mod resolve;
mod session;
mod toggle;
mod trace_node;
pub mod view;

pub use crate::details::{extract_details, DetailRow};
pub use crate::error::{Error, Result};
pub use crate::flatten::{flatten, Flattened};
pub use crate::parse::{parse, parse_str};
pub use crate::preferences::{
    Preference, Preferences, ProfilingLocation, DEFAULT_PROFILING_BASE, NO_PROFILING_DATA,
    PROFILING_ID_HEADER, PROFILING_URL_HEADER,
};
pub use crate::resolve::resolve;
pub use crate::session::{PreferenceEffect, ProfilingSession};
pub use crate::toggle::toggle_by_label;
pub use crate::trace_node::{NodeKind, TraceNode};

#[test]
fn invocation_details_follow_fixed_order() {
    let invocation = parse_str(
        r#"<invocation name="Generator">
            <result><result-entry-label>42</result-entry-label></result>
            <properties><debug>true</debug></properties>
            <arguments><x>1</x><y>2</y></arguments>
        </invocation>"#,
        true,
    )
    .unwrap();
    let rows = extract_details(&invocation)
        .into_iter()
        .map(|row| (row.key, row.value))
        .collect::<Vec<_>>();
    assert_eq!(
        rows,
        [
            ("x".to_owned(), "1".to_owned()),
            ("y".to_owned(), "2".to_owned()),
            ("debug".to_owned(), "true".to_owned()),
            ("result-entry-label".to_owned(), "42".to_owned()),
        ]
    );
}
