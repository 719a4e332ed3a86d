use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum TraversalError {
    /// An iframe hop whose `contentDocument` is inaccessible; traversal
    /// must not descend into it (§4.1 failure semantics).
    #[error("cross-origin boundary at iframe hop {hop}")]
    CrossOriginBoundary { hop: usize },

    /// An iframe chain hop that cannot be matched by id, name, src, or
    /// index in the current document.
    #[error("iframe hop {hop} could not be resolved")]
    IframeHopNotFound { hop: usize },

    /// A shadow host xpath in the chain did not resolve to an element
    /// exposing a shadow root.
    #[error("shadow host '{xpath}' could not be resolved")]
    ShadowHostNotFound { xpath: String },

    /// Iframe discovery recursion exceeded the configured depth bound.
    #[error("iframe discovery exceeded max depth {max_depth}")]
    MaxDepthExceeded { max_depth: usize },
}
