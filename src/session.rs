use crate::details::{extract_details, DetailRow};
use crate::preferences::{Preference, Preferences, ProfilingLocation, NO_PROFILING_DATA};
use crate::trace_node::TraceNode;

/// What the host has to do after a preference changed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PreferenceEffect {
    /// The value did not change.
    Unchanged,
    /// The current tree was updated in place.
    Retoggled,
    /// The trace has to be fetched again with [`ProfilingSession::request_url`].
    RefetchRequired,
}

/// Everything one profiling view works with.
///
/// The host owns the session and feeds it fetched documents and selection events.
/// A newly loaded document replaces the previous tree and selection entirely.
#[derive(Debug, Default, Clone)]
pub struct ProfilingSession {
    location: Option<ProfilingLocation>,
    preferences: Preferences,
    tree: Option<TraceNode>,
    selected: Option<usize>,
    details: Vec<DetailRow>,
}

impl ProfilingSession {
    #[must_use]
    pub fn new(preferences: Preferences) -> Self {
        Self {
            preferences,
            ..Self::default()
        }
    }

    #[must_use]
    pub const fn preferences(&self) -> &Preferences {
        &self.preferences
    }

    #[must_use]
    pub const fn location(&self) -> Option<&ProfilingLocation> {
        self.location.as_ref()
    }

    /// Forget the current trace and point the session to another one.
    pub fn set_location(&mut self, location: Option<ProfilingLocation>) {
        self.location = location;
        self.clear();
    }

    /// Point the session to the profiling data announced by a response.
    ///
    /// Returns the URL to fetch the trace from.
    ///
    /// # Errors
    ///
    /// Returns [`NO_PROFILING_DATA`] as the message for the user when the response carries no profiling headers.
    /// The session is left without a location then.
    pub fn locate<'h, I>(&mut self, request_href: &str, headers: I) -> Result<String, &'static str>
    where
        I: IntoIterator<Item = (&'h str, &'h str)>,
    {
        let location = ProfilingLocation::from_response(request_href, headers);
        if location.is_none() {
            tracing::debug!(request_href, "response carries no profiling headers");
        }
        self.set_location(location);
        self.request_url().ok_or(NO_PROFILING_DATA)
    }

    /// URL the host fetches the trace from, `None` without a location.
    #[must_use]
    pub fn request_url(&self) -> Option<String> {
        self.location
            .as_ref()
            .map(|location| location.request_url(&self.preferences))
    }

    #[must_use]
    pub const fn tree(&self) -> Option<&TraceNode> {
        self.tree.as_ref()
    }

    /// Replace the current tree with a freshly fetched document.
    ///
    /// # Errors
    ///
    /// Errors when `markup` is not well-formed XML. The previous tree is dropped either way.
    pub fn load_document(&mut self, markup: &str) -> crate::Result<&TraceNode> {
        self.clear();
        let tree = crate::parse_str(markup, self.preferences.open_invocations)?;
        Ok(self.tree.insert(tree))
    }

    /// Message shown to the user when fetching the trace failed with a non-success status.
    pub fn fetch_failed(&mut self, status: u16) -> String {
        tracing::warn!(status, "profiling request failed");
        self.clear();
        format!("The profiling request responsed with statuscode {status}!")
    }

    fn clear(&mut self) {
        self.tree = None;
        self.selected = None;
        self.details.clear();
    }

    /// Handle a selection event of the tree widget.
    ///
    /// Returns the details of the newly selected node.
    /// An index which is not a painted row clears the selection and returns no details.
    pub fn select_visible_index(&mut self, index: usize) -> &[DetailRow] {
        let node = self
            .tree
            .as_ref()
            .and_then(|tree| crate::resolve(tree, index));
        self.selected = node.map(TraceNode::id);
        self.details = node.map(extract_details).unwrap_or_default();
        &self.details
    }

    #[must_use]
    pub fn selected(&self) -> Option<&TraceNode> {
        let id = self.selected?;
        self.tree.as_ref()?.find(id)
    }

    /// Detail rows of the current selection.
    #[must_use]
    pub fn details(&self) -> &[DetailRow] {
        &self.details
    }

    /// Open a closed or close an open selected container.
    ///
    /// Returns `true` when the tree changed.
    pub fn toggle_selected(&mut self) -> bool {
        let Some(id) = self.selected else {
            return false;
        };
        self.tree
            .as_mut()
            .and_then(|tree| tree.find_mut(id))
            .is_some_and(|node| {
                let open = !node.is_open();
                node.set_open(open)
            })
    }

    /// Change a preference and apply it.
    ///
    /// Opening invocations is applied to the current tree, the others need a new fetch.
    pub fn set_preference(&mut self, preference: Preference, value: bool) -> PreferenceEffect {
        if !self.preferences.set(preference, value) {
            return PreferenceEffect::Unchanged;
        }
        if preference.requires_refetch() {
            return PreferenceEffect::RefetchRequired;
        }
        if let Some(tree) = self.tree.as_mut() {
            crate::toggle_by_label(tree, "invocations", value);
        }
        PreferenceEffect::Retoggled
    }

    pub fn set_open_invocations(&mut self, open: bool) -> PreferenceEffect {
        self.set_preference(Preference::OpenInvocations, open)
    }

    pub fn set_sitemap_enabled(&mut self, enabled: bool) -> PreferenceEffect {
        self.set_preference(Preference::SitemapEnabled, enabled)
    }

    pub fn set_show_unmatched_matchers(&mut self, show: bool) -> PreferenceEffect {
        self.set_preference(Preference::ShowUnmatchedMatchers, show)
    }
}

#[cfg(test)]
fn loaded(open_invocations: bool) -> ProfilingSession {
    let mut session = ProfilingSession::new(Preferences {
        open_invocations,
        ..Preferences::default()
    });
    session
        .load_document(crate::trace_node::EXAMPLE_TRACE)
        .unwrap();
    session
}

#[test]
fn selecting_invocation_yields_details() {
    let mut session = loaded(true);
    let keys = session
        .select_visible_index(2)
        .iter()
        .map(|row| row.key.clone())
        .collect::<Vec<_>>();
    assert_eq!(keys, ["x", "y", "debug", "value", "profiler"]);
    assert_eq!(
        session.selected().map(TraceNode::display_label),
        Some("Generator")
    );
}

#[test]
fn selecting_outside_clears() {
    let mut session = loaded(true);
    session.select_visible_index(2);
    assert!(session.select_visible_index(99).is_empty());
    assert!(session.selected().is_none());
    assert!(session.details().is_empty());
}

#[test]
fn selecting_without_document_is_noop() {
    let mut session = ProfilingSession::default();
    assert!(session.select_visible_index(0).is_empty());
    assert!(!session.toggle_selected());
}

#[test]
fn open_invocations_retoggles_current_tree() {
    let mut session = loaded(false);
    assert_eq!(session.tree().unwrap().visible_len(), 5);
    assert_eq!(
        session.set_open_invocations(true),
        PreferenceEffect::Retoggled
    );
    assert_eq!(session.tree().unwrap().visible_len(), 7);
    assert_eq!(
        session.set_open_invocations(true),
        PreferenceEffect::Unchanged
    );
}

#[test]
fn server_side_preferences_need_refetch() {
    let mut session = loaded(true);
    session.set_location(Some(ProfilingLocation::new("http://host/p/1")));
    assert_eq!(
        session.set_sitemap_enabled(true),
        PreferenceEffect::RefetchRequired
    );
    assert_eq!(
        session.set_show_unmatched_matchers(true),
        PreferenceEffect::RefetchRequired
    );
    assert_eq!(
        session.request_url().as_deref(),
        Some("http://host/p/1?sitemap=true&matcher=true")
    );
}

#[test]
fn locate_uses_profiling_headers() {
    let mut session = loaded(true);
    let url = session
        .locate(
            "http://host/app/page",
            [(crate::PROFILING_URL_HEADER, "profiling/3")],
        )
        .unwrap();
    assert_eq!(url, "http://host/app/profiling/3?sitemap=false&matcher=false");
    assert_eq!(
        session.location().map(ProfilingLocation::xml_url),
        Some("http://host/app/profiling/3")
    );
    assert!(session.tree().is_none());
}

#[test]
fn locate_without_headers_reports_missing_data() {
    let mut session = loaded(true);
    session.set_location(Some(ProfilingLocation::new("http://host/p/1")));
    assert_eq!(
        session.locate("http://host/app/page", [("Content-Type", "text/html")]),
        Err("No profiling data available for this request!")
    );
    assert_eq!(session.location(), None);
    assert_eq!(session.request_url(), None);
}

#[test]
fn toggle_selected_collapses_container() {
    let mut session = loaded(true);
    session.select_visible_index(0);
    assert!(session.toggle_selected());
    assert_eq!(session.tree().unwrap().visible_len(), 2);
    assert!(session.toggle_selected());
    assert_eq!(session.tree().unwrap().visible_len(), 7);
}

#[test]
fn toggle_selected_ignores_invocations() {
    let mut session = loaded(true);
    session.select_visible_index(2);
    assert!(!session.toggle_selected());
}

#[test]
fn reload_replaces_tree_and_selection() {
    let mut session = loaded(true);
    session.select_visible_index(2);
    session.load_document("<trace><only/></trace>").unwrap();
    assert!(session.selected().is_none());
    assert_eq!(session.tree().unwrap().node_count(), 2);

    assert!(session.load_document("<broken>").is_err());
    assert!(session.tree().is_none());
}

#[test]
fn fetch_failure_message() {
    let mut session = loaded(true);
    assert_eq!(
        session.fetch_failed(404),
        "The profiling request responsed with statuscode 404!"
    );
    assert!(session.tree().is_none());
}
