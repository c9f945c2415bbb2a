/// Host wide settings of the profiling view.
///
/// Loaded and stored by the host. With the `json` feature they can be kept as JSON.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "json", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "json", serde(default))]
pub struct Preferences {
    /// Ask the server to include the sitemap nodes.
    pub sitemap_enabled: bool,
    /// Initial state of `invocations` containers.
    pub open_invocations: bool,
    /// Ask the server to include matchers which did not match.
    pub show_unmatched_matchers: bool,
}

/// A single entry of [`Preferences`], used for menus.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Preference {
    SitemapEnabled,
    OpenInvocations,
    ShowUnmatchedMatchers,
}

impl Preference {
    pub const ALL: [Self; 3] = [
        Self::SitemapEnabled,
        Self::OpenInvocations,
        Self::ShowUnmatchedMatchers,
    ];

    /// Checkbox label in the options menu.
    #[must_use]
    pub const fn menu_label(self) -> &'static str {
        match self {
            Self::SitemapEnabled => "(c3p) Show Sitemap",
            Self::OpenInvocations => "(c3p) Open Invocations",
            Self::ShowUnmatchedMatchers => "(c3p) Show Unmached Matchers",
        }
    }

    /// Whether a change needs the trace to be fetched again.
    ///
    /// Only [`OpenInvocations`](Self::OpenInvocations) can be applied to the current tree.
    #[must_use]
    pub const fn requires_refetch(self) -> bool {
        !matches!(self, Self::OpenInvocations)
    }
}

impl Preferences {
    #[must_use]
    pub const fn get(&self, preference: Preference) -> bool {
        match preference {
            Preference::SitemapEnabled => self.sitemap_enabled,
            Preference::OpenInvocations => self.open_invocations,
            Preference::ShowUnmatchedMatchers => self.show_unmatched_matchers,
        }
    }

    /// Returns `true` when the value changed.
    pub fn set(&mut self, preference: Preference, value: bool) -> bool {
        let field = match preference {
            Preference::SitemapEnabled => &mut self.sitemap_enabled,
            Preference::OpenInvocations => &mut self.open_invocations,
            Preference::ShowUnmatchedMatchers => &mut self.show_unmatched_matchers,
        };
        let changed = *field != value;
        *field = value;
        changed
    }

    /// Read preferences stored with [`to_json`](Self::to_json). Missing fields keep their default.
    ///
    /// # Errors
    ///
    /// Errors when `json` is not a valid preferences object.
    #[cfg(feature = "json")]
    pub fn from_json(json: &str) -> crate::Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// # Errors
    ///
    /// Errors when serialization fails.
    #[cfg(feature = "json")]
    pub fn to_json(&self) -> crate::Result<String> {
        Ok(serde_json::to_string(self)?)
    }
}

/// Response header with the id of the profiling data of a request.
pub const PROFILING_ID_HEADER: &str = "X-Cocoon-Profiling-ID";
/// Response header with the profiling URL relative to the request.
pub const PROFILING_URL_HEADER: &str = "X-Cocoon-Profiling-URL";
/// Where profiling data is found when the server only sends an id.
pub const DEFAULT_PROFILING_BASE: &str = "http://localhost:8888/controller/profiling/";
/// Message shown to the user when a response carries no profiling headers.
pub const NO_PROFILING_DATA: &str = "No profiling data available for this request!";

/// Where the profiling trace of one request can be fetched.
///
/// Fetching itself is up to the host.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ProfilingLocation {
    url: String,
}

impl ProfilingLocation {
    #[must_use]
    pub fn new(url: impl Into<String>) -> Self {
        Self { url: url.into() }
    }

    /// Find the profiling location in the response headers of a profiled request.
    ///
    /// A URL header is resolved against the directory of `request_href` and takes precedence over an id header.
    /// Returns `None` when the response carries no profiling headers.
    ///
    /// # Example
    ///
    /// ```
    /// # use tui_trace_tree::ProfilingLocation;
    /// let location = ProfilingLocation::from_response(
    ///     "http://example.com/app/page.html",
    ///     [("X-Cocoon-Profiling-URL", "profiling/7")],
    /// );
    /// assert_eq!(location.unwrap().xml_url(), "http://example.com/app/profiling/7");
    /// ```
    #[must_use]
    pub fn from_response<'h, I>(request_href: &str, headers: I) -> Option<Self>
    where
        I: IntoIterator<Item = (&'h str, &'h str)>,
    {
        let mut id = None;
        let mut url = None;
        for (name, value) in headers {
            if name == PROFILING_ID_HEADER {
                id = Some(value);
            } else if name == PROFILING_URL_HEADER {
                url = Some(value);
            }
        }

        if let Some(url) = url {
            let directory_end = request_href.rfind('/').map_or(0, |index| index + 1);
            Some(Self::new(format!("{}{url}", &request_href[..directory_end])))
        } else {
            id.map(|id| Self::new(format!("{DEFAULT_PROFILING_BASE}{id}")))
        }
    }

    /// The profiling document itself.
    #[must_use]
    pub fn xml_url(&self) -> &str {
        &self.url
    }

    /// The URL to fetch the trace with the query derived from `preferences`.
    #[must_use]
    pub fn request_url(&self, preferences: &Preferences) -> String {
        format!(
            "{}?sitemap={}&matcher={}",
            self.url, preferences.sitemap_enabled, preferences.show_unmatched_matchers
        )
    }

    /// Rendered picture of the trace.
    #[must_use]
    pub fn picture_url(&self) -> String {
        format!("{}.png", self.url)
    }
}

#[test]
fn defaults_are_all_disabled() {
    let preferences = Preferences::default();
    assert!(Preference::ALL
        .into_iter()
        .all(|preference| !preferences.get(preference)));
}

#[test]
fn set_reports_changes() {
    let mut preferences = Preferences::default();
    assert!(preferences.set(Preference::OpenInvocations, true));
    assert!(!preferences.set(Preference::OpenInvocations, true));
    assert!(preferences.open_invocations);
    assert!(!preferences.sitemap_enabled);
}

#[test]
fn only_open_invocations_is_applied_in_place() {
    let refetch = Preference::ALL
        .into_iter()
        .filter(|preference| preference.requires_refetch())
        .collect::<Vec<_>>();
    assert_eq!(
        refetch,
        [Preference::SitemapEnabled, Preference::ShowUnmatchedMatchers]
    );
}

#[test]
fn url_header_wins_over_id() {
    let location = ProfilingLocation::from_response(
        "http://localhost:8080/app/sub/page",
        [
            (PROFILING_ID_HEADER, "123"),
            (PROFILING_URL_HEADER, "controller/profiling/123"),
        ],
    )
    .unwrap();
    assert_eq!(
        location.xml_url(),
        "http://localhost:8080/app/sub/controller/profiling/123"
    );
}

#[test]
fn id_header_uses_default_base() {
    let location =
        ProfilingLocation::from_response("http://example.com/", [(PROFILING_ID_HEADER, "abc")])
            .unwrap();
    assert_eq!(
        location.xml_url(),
        "http://localhost:8888/controller/profiling/abc"
    );
}

#[test]
fn no_headers_no_location() {
    let location = ProfilingLocation::from_response(
        "http://example.com/",
        [("Content-Type", "text/html")],
    );
    assert_eq!(location, None);
}

#[test]
fn request_url_carries_preferences() {
    let location = ProfilingLocation::new("http://host/profiling/1");
    let preferences = Preferences {
        sitemap_enabled: true,
        open_invocations: true,
        show_unmatched_matchers: false,
    };
    assert_eq!(
        location.request_url(&preferences),
        "http://host/profiling/1?sitemap=true&matcher=false"
    );
    assert_eq!(location.picture_url(), "http://host/profiling/1.png");
}

#[cfg(feature = "json")]
#[test]
fn json_roundtrip_keeps_missing_fields_default() {
    let preferences = Preferences::from_json(r#"{"open_invocations":true}"#).unwrap();
    assert_eq!(
        preferences,
        Preferences {
            open_invocations: true,
            ..Preferences::default()
        }
    );
    let json = preferences.to_json().unwrap();
    assert_eq!(Preferences::from_json(&json).unwrap(), preferences);
}

#[cfg(feature = "json")]
#[test]
fn json_rejects_garbage() {
    assert!(matches!(
        Preferences::from_json("[1, 2]"),
        Err(crate::Error::Json(_))
    ));
}
