use std::collections::HashSet;
use std::sync::Arc;
use std::time::{Duration, Instant};

use async_trait::async_trait;
use core_types::LocatorBundle;
use dom_traversal::{DomPort, NodeRef, TraversalError};
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};

use crate::errors::{FinderDiagnostics, FinderError};
use crate::strategy::Strategy;

#[derive(Clone, Debug)]
pub struct FinderOptions {
    pub timeout_ms: u64,
    pub retry_interval_ms: u64,
    pub max_retries: u32,
    pub fuzzy_match_threshold: f64,
    pub bounding_box_threshold_px: f64,
    pub strategy_priority: Vec<Strategy>,
    /// Advisory only — the finder does not reject below-threshold matches
    /// itself (§9 open question b); callers may do so using the returned
    /// confidence.
    pub min_confidence: f64,
}

impl Default for FinderOptions {
    fn default() -> Self {
        Self {
            timeout_ms: 2_000,
            retry_interval_ms: 150,
            max_retries: 13,
            fuzzy_match_threshold: 0.4,
            bounding_box_threshold_px: 200.0,
            strategy_priority: Strategy::default_priority(),
            min_confidence: 0.5,
        }
    }
}

#[derive(Clone, Debug)]
pub struct FindOutcome {
    pub element: NodeRef,
    pub strategy: Strategy,
    pub confidence: f64,
    pub retry_attempts: u32,
}

#[async_trait]
pub trait ElementFinder: Send + Sync {
    async fn find(
        &self,
        bundle: &LocatorBundle,
        target_document: &NodeRef,
        options: &FinderOptions,
        cancel: &CancellationToken,
    ) -> Result<FindOutcome, FinderError>;
}

pub struct DefaultElementFinder<D: DomPort> {
    dom: Arc<D>,
}

impl<D: DomPort> DefaultElementFinder<D> {
    pub fn new(dom: Arc<D>) -> Self {
        Self { dom }
    }

    /// Resolves the bundle's iframe/shadow chain to the context the
    /// `xpath` strategy must evaluate in. Other strategies operate
    /// against `target_document` directly (§9 note: only xpath is
    /// documented as chain-aware in the source).
    async fn xpath_context(&self, bundle: &LocatorBundle) -> Result<NodeRef, FinderError> {
        let mut ctx = self.dom.root_document();
        if !bundle.iframe_chain.is_empty() {
            ctx = self
                .dom
                .resolve_iframe_chain(&ctx, &bundle.iframe_chain)
                .await
                .map_err(map_traversal_err)?;
        }
        if !bundle.shadow_hosts.is_empty() {
            ctx = self
                .dom
                .resolve_shadow_chain(&ctx, &bundle.shadow_hosts)
                .await
                .map_err(map_traversal_err)?;
        }
        Ok(ctx)
    }

    async fn try_strategy(
        &self,
        strategy: Strategy,
        bundle: &LocatorBundle,
        target_document: &NodeRef,
        options: &FinderOptions,
    ) -> Result<Option<NodeRef>, FinderError> {
        let candidates: Vec<NodeRef> = match strategy {
            Strategy::Xpath => {
                let Some(xpath) = &bundle.xpath else {
                    return Ok(None);
                };
                let ctx = self.xpath_context(bundle).await?;
                return Ok(self.dom.evaluate_xpath(&ctx, xpath).await);
            }
            Strategy::Id => {
                let Some(id) = &bundle.id else { return Ok(None) };
                self.dom.find_by_attribute(target_document, "id", id).await
            }
            Strategy::Name => {
                let Some(name) = &bundle.name else { return Ok(None) };
                self.dom
                    .find_by_attribute(target_document, "name", name)
                    .await
                    .into_iter()
                    .filter(|n| self.dom.tag_of(n).as_deref() == Some(bundle.tag.as_str()))
                    .collect()
            }
            Strategy::Aria => {
                let Some(aria) = &bundle.aria else { return Ok(None) };
                self.dom
                    .find_by_attribute(target_document, "aria-label", aria)
                    .await
            }
            Strategy::Placeholder => {
                let Some(placeholder) = &bundle.placeholder else {
                    return Ok(None);
                };
                self.dom
                    .find_by_attribute(target_document, "placeholder", placeholder)
                    .await
            }
            Strategy::DataAttributes => {
                if bundle.data_attrs.is_empty() {
                    return Ok(None);
                }
                let mut matches: Option<HashSet<NodeRef>> = None;
                for (key, value) in &bundle.data_attrs {
                    let hit: HashSet<NodeRef> = self
                        .dom
                        .find_by_attribute(target_document, key, value)
                        .await
                        .into_iter()
                        .collect();
                    matches = Some(match matches {
                        None => hit,
                        Some(prev) => prev.intersection(&hit).cloned().collect(),
                    });
                }
                matches.unwrap_or_default().into_iter().collect()
            }
            Strategy::Css => {
                let Some(css) = &bundle.css else { return Ok(None) };
                self.dom.query_selector_all_deep(target_document, css).await
            }
            Strategy::FuzzyText => {
                let Some(text) = &bundle.text else { return Ok(None) };
                let candidates = self.dom.find_by_tag(target_document, &bundle.tag).await;
                return Ok(best_fuzzy_match(
                    &*self.dom,
                    &candidates,
                    text,
                    options.fuzzy_match_threshold,
                ));
            }
            Strategy::BoundingBox => {
                let Some(bounding) = &bundle.bounding else {
                    return Ok(None);
                };
                let candidates = self.dom.find_by_tag(target_document, &bundle.tag).await;
                return Ok(best_bounding_match(
                    &*self.dom,
                    &candidates,
                    bounding,
                    options.bounding_box_threshold_px,
                ));
            }
        };

        // A strategy returning more than one candidate must disambiguate
        // internally or is treated as a failure for that strategy (§4.2).
        match candidates.len() {
            0 => Ok(None),
            1 => Ok(Some(candidates.into_iter().next().unwrap())),
            _ => Ok(None),
        }
    }

    async fn run_pipeline(
        &self,
        bundle: &LocatorBundle,
        target_document: &NodeRef,
        options: &FinderOptions,
    ) -> (Option<(Strategy, NodeRef)>, FinderDiagnostics) {
        let mut diagnostics = FinderDiagnostics::default();
        for &strategy in &options.strategy_priority {
            diagnostics.strategies_attempted.push(strategy.name().to_string());
            match self.try_strategy(strategy, bundle, target_document, options).await {
                Ok(Some(node)) if self.dom.is_attached(&node) => {
                    diagnostics.candidate_counts.insert(strategy.name().to_string(), 1);
                    return (Some((strategy, node)), diagnostics);
                }
                Ok(Some(_)) => {
                    diagnostics.candidate_counts.insert(strategy.name().to_string(), 1);
                }
                Ok(None) => {
                    diagnostics.candidate_counts.insert(strategy.name().to_string(), 0);
                }
                Err(e) => {
                    warn!(strategy = strategy.name(), error = %e, "strategy failed");
                    diagnostics.candidate_counts.insert(strategy.name().to_string(), 0);
                }
            }
        }
        (None, diagnostics)
    }
}

#[async_trait]
impl<D: DomPort> ElementFinder for DefaultElementFinder<D> {
    async fn find(
        &self,
        bundle: &LocatorBundle,
        target_document: &NodeRef,
        options: &FinderOptions,
        cancel: &CancellationToken,
    ) -> Result<FindOutcome, FinderError> {
        let deadline = Instant::now() + Duration::from_millis(options.timeout_ms);
        let mut attempt = 0u32;
        let mut last_diagnostics = FinderDiagnostics::default();

        loop {
            if cancel.is_cancelled() {
                return Err(FinderError::Aborted);
            }

            let (found, diagnostics) = self.run_pipeline(bundle, target_document, options).await;
            last_diagnostics = diagnostics;

            if let Some((strategy, node)) = found {
                let visibility_factor = if self.dom.is_visible(&node) { 1.0 } else { 0.5 };
                let confidence = strategy.base_confidence() * visibility_factor;
                debug!(strategy = strategy.name(), confidence, "resolved element");
                return Ok(FindOutcome {
                    element: node,
                    strategy,
                    confidence,
                    retry_attempts: attempt,
                });
            }

            if attempt >= options.max_retries || Instant::now() >= deadline {
                break;
            }
            attempt += 1;
            tokio::time::sleep(Duration::from_millis(options.retry_interval_ms)).await;
        }

        Err(FinderError::ElementNotFound(last_diagnostics))
    }
}

fn map_traversal_err(err: TraversalError) -> FinderError {
    match err {
        TraversalError::CrossOriginBoundary { hop } => {
            FinderError::CrossOriginBoundary(format!("cross-origin at hop {hop}"))
        }
        other => FinderError::ChainResolutionFailed(other.to_string()),
    }
}

fn tokenize(text: &str) -> HashSet<String> {
    text.to_lowercase()
        .split_whitespace()
        .map(|s| s.to_string())
        .collect()
}

fn jaccard_similarity(a: &HashSet<String>, b: &HashSet<String>) -> f64 {
    if a.is_empty() && b.is_empty() {
        return 1.0;
    }
    let intersection = a.intersection(b).count();
    let union = a.union(b).count();
    if union == 0 {
        0.0
    } else {
        intersection as f64 / union as f64
    }
}

fn best_fuzzy_match<D: DomPort + ?Sized>(
    dom: &D,
    candidates: &[NodeRef],
    text: &str,
    threshold: f64,
) -> Option<NodeRef> {
    let target_tokens = tokenize(text);
    candidates
        .iter()
        .filter_map(|node| {
            let node_text = dom.text_of(node)?;
            let score = jaccard_similarity(&target_tokens, &tokenize(&node_text));
            Some((node.clone(), score))
        })
        .filter(|(_, score)| *score >= threshold)
        .max_by(|a, b| a.1.partial_cmp(&b.1).unwrap_or(std::cmp::Ordering::Equal))
        .map(|(node, _)| node)
}

fn best_bounding_match<D: DomPort + ?Sized>(
    dom: &D,
    candidates: &[NodeRef],
    target: &core_types::BoundingBox,
    threshold_px: f64,
) -> Option<NodeRef> {
    let (tx, ty) = target.centroid();
    candidates
        .iter()
        .filter_map(|node| {
            let bounding = dom.bounding_of(node)?;
            let (cx, cy) = bounding.centroid();
            let distance = ((cx - tx).powi(2) + (cy - ty).powi(2)).sqrt();
            Some((node.clone(), distance))
        })
        .filter(|(_, distance)| *distance <= threshold_px)
        .min_by(|a, b| a.1.partial_cmp(&b.1).unwrap_or(std::cmp::Ordering::Equal))
        .map(|(node, _)| node)
}
