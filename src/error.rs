/// Everything that can go wrong before a trace is in memory.
///
/// Working with an already parsed [`TraceNode`](crate::TraceNode) tree never fails.
#[derive(thiserror::Error, Debug)]
pub enum Error {
    /// The profiling markup is not well-formed XML.
    #[error("profiling markup is not well-formed: {0}")]
    Xml(#[from] roxmltree::Error),

    /// Preferences could not be read or written as JSON.
    #[cfg(feature = "json")]
    #[error("preferences json: {0}")]
    Json(#[from] serde_json::Error),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
