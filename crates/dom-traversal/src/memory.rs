use std::collections::HashMap;

use async_trait::async_trait;
use core_types::{BoundingBox, IframeInfo};

use crate::errors::TraversalError;
use crate::port::{DomPort, IframeRecord, NodeRef};

#[derive(Clone, Debug)]
enum IframeContent {
    SameOrigin(String),
    CrossOrigin,
}

#[derive(Clone, Debug)]
struct Node {
    tag: String,
    attrs: HashMap<String, String>,
    classes: Vec<String>,
    text: Option<String>,
    children: Vec<String>,
    bounding: Option<BoundingBox>,
    display_none: bool,
    visibility_hidden: bool,
    opacity_zero: bool,
    disabled: bool,
    attached: bool,
}

impl Node {
    fn new(tag: impl Into<String>) -> Self {
        Self {
            tag: tag.into(),
            attrs: HashMap::new(),
            classes: Vec::new(),
            text: None,
            children: Vec::new(),
            bounding: None,
            display_none: false,
            visibility_hidden: false,
            opacity_zero: false,
            disabled: false,
            attached: true,
        }
    }
}

/// Declarative description of one node, used to build an [`InMemoryDom`]
/// by hand in tests.
#[derive(Clone, Debug)]
pub struct NodeSpec {
    id: String,
    node: Node,
}

impl NodeSpec {
    pub fn new(id: impl Into<String>, tag: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            node: Node::new(tag),
        }
    }

    pub fn attr(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.node.attrs.insert(key.into(), value.into());
        self
    }

    pub fn class(mut self, class: impl Into<String>) -> Self {
        self.node.classes.push(class.into());
        self
    }

    pub fn text(mut self, text: impl Into<String>) -> Self {
        self.node.text = Some(text.into());
        self
    }

    pub fn bounding(mut self, bounding: BoundingBox) -> Self {
        self.node.bounding = Some(bounding);
        self
    }

    pub fn hidden_display_none(mut self) -> Self {
        self.node.display_none = true;
        self
    }

    pub fn hidden_visibility(mut self) -> Self {
        self.node.visibility_hidden = true;
        self
    }

    pub fn hidden_opacity(mut self) -> Self {
        self.node.opacity_zero = true;
        self
    }

    pub fn disabled(mut self) -> Self {
        self.node.disabled = true;
        self
    }

    pub fn detached(mut self) -> Self {
        self.node.attached = false;
        self
    }
}

/// A hand-built DOM tree implementing [`DomPort`], for unit tests across
/// this workspace. Not a general-purpose HTML parser: xpath and CSS
/// matching support the handful of selector shapes the finder strategies
/// actually issue.
#[derive(Clone, Debug)]
pub struct InMemoryDom {
    nodes: HashMap<String, Node>,
    order: Vec<String>,
    shadow_of: HashMap<String, String>,
    iframe_content: HashMap<String, IframeContent>,
    root: String,
}

#[derive(Default)]
pub struct InMemoryDomBuilder {
    nodes: HashMap<String, Node>,
    order: Vec<String>,
    shadow_of: HashMap<String, String>,
    iframe_content: HashMap<String, IframeContent>,
    root: Option<String>,
}

impl InMemoryDomBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers `spec` as a child of `parent` (or as the document root
    /// when `parent` is `None`).
    pub fn node(mut self, parent: Option<&str>, spec: NodeSpec) -> Self {
        let NodeSpec { id, node } = spec;
        if let Some(parent_id) = parent {
            if let Some(parent_node) = self.nodes.get_mut(parent_id) {
                parent_node.children.push(id.clone());
            }
        } else {
            self.root = Some(id.clone());
        }
        self.order.push(id.clone());
        self.nodes.insert(id, node);
        self
    }

    pub fn shadow_root(mut self, host_id: &str, spec: NodeSpec) -> Self {
        let NodeSpec { id, node } = spec;
        self.order.push(id.clone());
        self.nodes.insert(id.clone(), node);
        self.shadow_of.insert(host_id.to_string(), id);
        self
    }

    pub fn iframe_same_origin(mut self, iframe_id: &str, content_root: NodeSpec) -> Self {
        let NodeSpec { id, node } = content_root;
        self.order.push(id.clone());
        self.nodes.insert(id.clone(), node);
        self.iframe_content
            .insert(iframe_id.to_string(), IframeContent::SameOrigin(id));
        self
    }

    pub fn iframe_cross_origin(mut self, iframe_id: &str) -> Self {
        self.iframe_content
            .insert(iframe_id.to_string(), IframeContent::CrossOrigin);
        self
    }

    pub fn build(self) -> InMemoryDom {
        InMemoryDom {
            nodes: self.nodes,
            order: self.order,
            shadow_of: self.shadow_of,
            iframe_content: self.iframe_content,
            root: self.root.expect("InMemoryDomBuilder requires a root node"),
        }
    }
}

impl InMemoryDom {
    pub fn builder() -> InMemoryDomBuilder {
        InMemoryDomBuilder::new()
    }

    /// Every node id in the tree, in insertion order. Lets a caller that
    /// owns both this double and an `ActionPort` double (the CLI's
    /// `AppContext`, for one) mirror each node's attached/visible/disabled
    /// flags into the action side without hand-duplicating the fixture.
    pub fn node_ids(&self) -> &[String] {
        &self.order
    }

    /// DFS from `context`, descending into same-origin iframe content
    /// documents and shadow roots but never cross-origin iframes —
    /// equivalent to `querySelectorDeep`'s reach.
    fn deep_descendants(&self, context: &str) -> Vec<String> {
        let mut out = Vec::new();
        let mut stack = vec![context.to_string()];
        let mut visited = std::collections::HashSet::new();
        while let Some(id) = stack.pop() {
            if !visited.insert(id.clone()) {
                continue;
            }
            let Some(node) = self.nodes.get(&id) else {
                continue;
            };
            if id != context {
                out.push(id.clone());
            }
            let mut next: Vec<String> = node.children.iter().rev().cloned().collect();
            if let Some(shadow_id) = self.shadow_of.get(&id) {
                next.push(shadow_id.clone());
            }
            if let Some(IframeContent::SameOrigin(doc_root)) = self.iframe_content.get(&id) {
                next.push(doc_root.clone());
            }
            stack.extend(next);
        }
        out
    }

    /// DFS from `context` within the same document — no shadow or iframe
    /// crossing — preserving document order.
    fn local_descendants(&self, context: &str) -> Vec<String> {
        let mut out = Vec::new();
        fn walk(nodes: &HashMap<String, Node>, id: &str, out: &mut Vec<String>) {
            let Some(node) = nodes.get(id) else { return };
            for child in &node.children {
                out.push(child.clone());
                walk(nodes, child, out);
            }
        }
        walk(&self.nodes, context, &mut out);
        out
    }

    fn iframes_in_document(&self, doc_root: &str) -> Vec<String> {
        self.local_descendants(doc_root)
            .into_iter()
            .filter(|id| self.nodes.get(id).map(|n| n.tag == "iframe").unwrap_or(false))
            .collect()
    }

    fn matches_selector(&self, id: &str, selector: &str) -> bool {
        let Some(node) = self.nodes.get(id) else {
            return false;
        };
        let selector = selector.trim();
        if let Some(rest) = selector.strip_prefix('#') {
            return node.attrs.get("id").map(|v| v == rest).unwrap_or(false);
        }
        if let Some(rest) = selector.strip_prefix('.') {
            return node.classes.iter().any(|c| c == rest);
        }
        if selector.starts_with('[') && selector.ends_with(']') {
            let inner = &selector[1..selector.len() - 1];
            if let Some((key, value)) = inner.split_once('=') {
                let value = value.trim_matches(|c| c == '\'' || c == '"');
                return node.attrs.get(key).map(|v| v == value).unwrap_or(false);
            }
            return node.attrs.contains_key(inner);
        }
        node.tag == selector
    }

    /// Minimal xpath support: `//tag`, `//tag[@attr='value']`, and
    /// `//tag[text()='value']`. Enough for the bundles the finder and its
    /// tests issue; not a general XPath evaluator.
    fn matches_xpath_step(&self, id: &str, step: &str) -> bool {
        let Some(node) = self.nodes.get(id) else {
            return false;
        };
        let step = step.trim_start_matches('/');
        let (tag_part, predicate) = match step.find('[') {
            Some(idx) => (&step[..idx], Some(&step[idx..])),
            None => (step, None),
        };
        if !tag_part.is_empty() && tag_part != "*" && node.tag != tag_part {
            return false;
        }
        match predicate {
            None => true,
            Some(pred) => {
                let pred = pred.trim_start_matches('[').trim_end_matches(']');
                if let Some(rest) = pred.strip_prefix('@') {
                    if let Some((key, value)) = rest.split_once('=') {
                        let value = value.trim_matches(|c| c == '\'' || c == '"');
                        return node.attrs.get(key).map(|v| v == value).unwrap_or(false);
                    }
                    return false;
                }
                if let Some(rest) = pred.strip_prefix("text()=") {
                    let value = rest.trim_matches(|c| c == '\'' || c == '"');
                    return node.text.as_deref() == Some(value);
                }
                false
            }
        }
    }
}

#[async_trait]
impl DomPort for InMemoryDom {
    fn root_document(&self) -> NodeRef {
        self.root.clone()
    }

    async fn discover_iframes(
        &self,
        root: &NodeRef,
        max_depth: usize,
    ) -> Result<Vec<IframeRecord>, TraversalError> {
        let mut out = Vec::new();
        self.discover_iframes_rec(root, None, 0, max_depth, &mut out)?;
        Ok(out)
    }

    async fn shadow_root_of(&self, node: &NodeRef) -> Option<NodeRef> {
        self.shadow_of.get(node).cloned()
    }

    async fn resolve_iframe_chain(
        &self,
        from: &NodeRef,
        chain: &[IframeInfo],
    ) -> Result<NodeRef, TraversalError> {
        let mut current_doc = from.clone();
        for (hop, info) in chain.iter().enumerate() {
            let iframes = self.iframes_in_document(&current_doc);
            let matched = iframes
                .iter()
                .find(|id| {
                    info.id
                        .as_ref()
                        .map(|v| self.nodes[*id].attrs.get("id") == Some(v))
                        .unwrap_or(false)
                })
                .or_else(|| {
                    iframes.iter().find(|id| {
                        info.name
                            .as_ref()
                            .map(|v| self.nodes[*id].attrs.get("name") == Some(v))
                            .unwrap_or(false)
                    })
                })
                .or_else(|| {
                    iframes.iter().find(|id| {
                        info.src
                            .as_ref()
                            .map(|v| self.nodes[*id].attrs.get("src") == Some(v))
                            .unwrap_or(false)
                    })
                })
                .or_else(|| iframes.get(info.index))
                .cloned();

            let Some(iframe_id) = matched else {
                return Err(TraversalError::IframeHopNotFound { hop });
            };

            match self.iframe_content.get(&iframe_id) {
                Some(IframeContent::SameOrigin(doc_root)) => {
                    current_doc = doc_root.clone();
                }
                Some(IframeContent::CrossOrigin) | None => {
                    return Err(TraversalError::CrossOriginBoundary { hop });
                }
            }
        }
        Ok(current_doc)
    }

    async fn resolve_shadow_chain(
        &self,
        from: &NodeRef,
        shadow_host_xpaths: &[String],
    ) -> Result<NodeRef, TraversalError> {
        let mut context = from.clone();
        for xpath in shadow_host_xpaths {
            let host = self
                .evaluate_xpath(&context, xpath)
                .await
                .ok_or_else(|| TraversalError::ShadowHostNotFound {
                    xpath: xpath.clone(),
                })?;
            context = self
                .shadow_root_of(&host)
                .await
                .ok_or_else(|| TraversalError::ShadowHostNotFound {
                    xpath: xpath.clone(),
                })?;
        }
        Ok(context)
    }

    async fn evaluate_xpath(&self, context: &NodeRef, xpath: &str) -> Option<NodeRef> {
        let step = xpath.rsplit('/').next().unwrap_or(xpath);
        self.deep_descendants(context)
            .into_iter()
            .find(|id| self.matches_xpath_step(id, step))
    }

    async fn query_selector_all(&self, context: &NodeRef, selector: &str) -> Vec<NodeRef> {
        self.local_descendants(context)
            .into_iter()
            .filter(|id| self.matches_selector(id, selector))
            .collect()
    }

    async fn query_selector_all_deep(&self, context: &NodeRef, selector: &str) -> Vec<NodeRef> {
        self.deep_descendants(context)
            .into_iter()
            .filter(|id| self.matches_selector(id, selector))
            .collect()
    }

    async fn find_by_attribute(&self, context: &NodeRef, attr: &str, value: &str) -> Vec<NodeRef> {
        self.deep_descendants(context)
            .into_iter()
            .filter(|id| self.nodes[id].attrs.get(attr).map(|v| v == value).unwrap_or(false))
            .collect()
    }

    async fn find_by_tag(&self, context: &NodeRef, tag: &str) -> Vec<NodeRef> {
        self.deep_descendants(context)
            .into_iter()
            .filter(|id| self.nodes[id].tag == tag)
            .collect()
    }

    fn tag_of(&self, node: &NodeRef) -> Option<String> {
        self.nodes.get(node).map(|n| n.tag.clone())
    }

    fn text_of(&self, node: &NodeRef) -> Option<String> {
        self.nodes.get(node).and_then(|n| n.text.clone())
    }

    fn bounding_of(&self, node: &NodeRef) -> Option<BoundingBox> {
        self.nodes.get(node).and_then(|n| n.bounding.clone())
    }

    fn is_attached(&self, node: &NodeRef) -> bool {
        self.nodes.get(node).map(|n| n.attached).unwrap_or(false)
    }

    fn is_disabled(&self, node: &NodeRef) -> bool {
        self.nodes.get(node).map(|n| n.disabled).unwrap_or(true)
    }

    fn is_visible(&self, node: &NodeRef) -> bool {
        self.nodes
            .get(node)
            .map(|n| !n.display_none && !n.visibility_hidden && !n.opacity_zero)
            .unwrap_or(false)
    }
}

impl InMemoryDom {
    fn discover_iframes_rec(
        &self,
        doc_root: &str,
        parent: Option<String>,
        depth: usize,
        max_depth: usize,
        out: &mut Vec<IframeRecord>,
    ) -> Result<(), TraversalError> {
        if depth > max_depth {
            return Err(TraversalError::MaxDepthExceeded { max_depth });
        }
        for iframe_id in self.iframes_in_document(doc_root) {
            match self.iframe_content.get(&iframe_id) {
                Some(IframeContent::SameOrigin(nested_root)) => {
                    out.push(IframeRecord {
                        iframe: iframe_id.clone(),
                        document: Some(nested_root.clone()),
                        is_cross_origin: false,
                        depth,
                        parent: parent.clone(),
                    });
                    self.discover_iframes_rec(
                        nested_root,
                        Some(iframe_id.clone()),
                        depth + 1,
                        max_depth,
                        out,
                    )?;
                }
                _ => {
                    out.push(IframeRecord {
                        iframe: iframe_id.clone(),
                        document: None,
                        is_cross_origin: true,
                        depth,
                        parent: parent.clone(),
                    });
                }
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn simple_dom() -> InMemoryDom {
        InMemoryDom::builder()
            .node(None, NodeSpec::new("html", "html"))
            .node(Some("html"), NodeSpec::new("btn", "button").attr("id", "submit"))
            .build()
    }

    #[tokio::test]
    async fn find_by_attribute_matches_id() {
        let dom = simple_dom();
        let found = dom.find_by_attribute(&dom.root_document(), "id", "submit").await;
        assert_eq!(found, vec!["btn".to_string()]);
    }

    #[tokio::test]
    async fn cross_origin_iframe_blocks_chain_resolution() {
        let dom = InMemoryDom::builder()
            .node(None, NodeSpec::new("html", "html"))
            .node(Some("html"), NodeSpec::new("f1", "iframe"))
            .iframe_cross_origin("f1")
            .build();

        let chain = vec![IframeInfo::new(0)];
        let err = dom
            .resolve_iframe_chain(&dom.root_document(), &chain)
            .await
            .unwrap_err();
        assert_eq!(err, TraversalError::CrossOriginBoundary { hop: 0 });
    }

    #[tokio::test]
    async fn same_origin_iframe_chain_resolves_into_nested_document() {
        let dom = InMemoryDom::builder()
            .node(None, NodeSpec::new("html", "html"))
            .node(Some("html"), NodeSpec::new("f1", "iframe").attr("id", "payment"))
            .iframe_same_origin(
                "f1",
                NodeSpec::new("nested-html", "html"),
            )
            .build();

        let mut chain = vec![IframeInfo::new(0)];
        chain[0].id = Some("payment".to_string());
        let doc = dom
            .resolve_iframe_chain(&dom.root_document(), &chain)
            .await
            .unwrap();
        assert_eq!(doc, "nested-html");
    }

    #[tokio::test]
    async fn shadow_chain_pierces_open_shadow_root() {
        let dom = InMemoryDom::builder()
            .node(None, NodeSpec::new("html", "html"))
            .node(Some("html"), NodeSpec::new("host", "my-widget"))
            .shadow_root("host", NodeSpec::new("shadow", "shadow-root"))
            .node(Some("shadow"), NodeSpec::new("inner-btn", "button").attr("id", "go"))
            .build();

        let ctx = dom
            .resolve_shadow_chain(&dom.root_document(), &["//my-widget".to_string()])
            .await
            .unwrap();
        assert_eq!(ctx, "shadow");
        let found = dom.find_by_attribute(&ctx, "id", "go").await;
        assert_eq!(found, vec!["inner-btn".to_string()]);
    }

    #[tokio::test]
    async fn visibility_reflects_css_like_flags() {
        let dom = InMemoryDom::builder()
            .node(None, NodeSpec::new("html", "html"))
            .node(Some("html"), NodeSpec::new("a", "div"))
            .node(Some("html"), NodeSpec::new("b", "div").hidden_display_none())
            .build();
        assert!(dom.is_visible(&"a".to_string()));
        assert!(!dom.is_visible(&"b".to_string()));
    }
}
