use async_trait::async_trait;
use core_types::{BoundingBox, IframeInfo};

use crate::errors::TraversalError;

/// Opaque handle to a DOM node or document, meaningful only to the
/// [`DomPort`] implementation that issued it.
pub type NodeRef = String;

/// One entry produced by iframe discovery: `{iframe, document-or-null,
/// isCrossOrigin, depth, parent}` (§4.1).
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct IframeRecord {
    pub iframe: NodeRef,
    pub document: Option<NodeRef>,
    pub is_cross_origin: bool,
    pub depth: usize,
    pub parent: Option<NodeRef>,
}

/// The seam between replay core logic and a live page.
///
/// A production implementation drives a browser's content-script DOM APIs
/// (`composedPath`, `MutationObserver`, `document.evaluate`, ...); the
/// `InMemoryDom` test double in this crate builds a small hand-authored
/// tree satisfying the same contract.
#[async_trait]
pub trait DomPort: Send + Sync {
    /// The top-level document's node reference.
    fn root_document(&self) -> NodeRef;

    /// Recursively walks from `root`, returning one [`IframeRecord`] per
    /// discovered iframe. Stops descending into cross-origin iframes and
    /// bounds recursion at `max_depth`.
    async fn discover_iframes(
        &self,
        root: &NodeRef,
        max_depth: usize,
    ) -> Result<Vec<IframeRecord>, TraversalError>;

    /// The shadow root of `node`, when open-mode or exposed via the
    /// `__realShadowRoot` side channel. `None` when the element has no
    /// shadow root or it is closed and un-exposed.
    async fn shadow_root_of(&self, node: &NodeRef) -> Option<NodeRef>;

    /// Navigates an iframe chain (matching each hop by id, then name, then
    /// src, then index — first hit wins) landing in the target document.
    async fn resolve_iframe_chain(
        &self,
        from: &NodeRef,
        chain: &[IframeInfo],
    ) -> Result<NodeRef, TraversalError>;

    /// Walks a shadow-host xpath list, piercing into each host's shadow
    /// root in turn, landing in the innermost root's context.
    async fn resolve_shadow_chain(
        &self,
        from: &NodeRef,
        shadow_host_xpaths: &[String],
    ) -> Result<NodeRef, TraversalError>;

    /// Evaluates an xpath expression against `context`, returning the
    /// first match.
    async fn evaluate_xpath(&self, context: &NodeRef, xpath: &str) -> Option<NodeRef>;

    /// Evaluates a CSS selector against `context`. A non-unique match is
    /// left to the caller to treat as strategy failure (§4.2).
    async fn query_selector_all(&self, context: &NodeRef, selector: &str) -> Vec<NodeRef>;

    /// `querySelectorDeep`: CSS selector search descending into every
    /// reachable shadow root and same-origin iframe below `context`.
    async fn query_selector_all_deep(&self, context: &NodeRef, selector: &str) -> Vec<NodeRef>;

    /// All nodes reachable from `context` carrying the given attribute
    /// equal to `value` (used by the id/name/aria/placeholder/data-attr
    /// strategies, which are all "exact attribute match" in spirit).
    async fn find_by_attribute(&self, context: &NodeRef, attr: &str, value: &str) -> Vec<NodeRef>;

    /// All nodes of the given tag reachable from `context`, for strategies
    /// that rank candidates themselves (fuzzyText, boundingBox).
    async fn find_by_tag(&self, context: &NodeRef, tag: &str) -> Vec<NodeRef>;

    fn tag_of(&self, node: &NodeRef) -> Option<String>;
    fn text_of(&self, node: &NodeRef) -> Option<String>;
    fn bounding_of(&self, node: &NodeRef) -> Option<BoundingBox>;
    fn is_attached(&self, node: &NodeRef) -> bool;
    fn is_disabled(&self, node: &NodeRef) -> bool;

    /// "Visible" per §4.2: `display` not `none`, `visibility` not
    /// `hidden`, `opacity` not `0`. A zero-size rect does not disqualify.
    fn is_visible(&self, node: &NodeRef) -> bool;
}
