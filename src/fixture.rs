//! DOM fixtures: a JSON node-tree format the CLI loads into an
//! [`dom_traversal::InMemoryDom`] for demos and local testing. Production
//! embedding supplies a live [`dom_traversal::DomPort`] directly through
//! the library API instead of going through this format (§1 scope note:
//! real DOM access is a host responsibility).

use std::collections::HashMap;

use core_types::BoundingBox;
use dom_traversal::{InMemoryDom, NodeSpec};
use serde::Deserialize;

use crate::errors::{AppError, AppResult};

#[derive(Clone, Debug, Deserialize)]
pub struct FixtureBounding {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

#[derive(Clone, Copy, Debug, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "kebab-case")]
pub enum FixtureHidden {
    DisplayNone,
    Visibility,
    Opacity,
}

/// One node in fixture order; parents must precede their children.
#[derive(Clone, Debug, Deserialize)]
pub struct FixtureNode {
    pub id: String,
    pub tag: String,
    pub parent: Option<String>,
    #[serde(default)]
    pub attrs: HashMap<String, String>,
    #[serde(default)]
    pub classes: Vec<String>,
    pub text: Option<String>,
    pub bounding: Option<FixtureBounding>,
    pub hidden: Option<FixtureHidden>,
    #[serde(default)]
    pub disabled: bool,
    #[serde(default)]
    pub detached: bool,
}

#[derive(Clone, Debug, Deserialize)]
pub struct DomFixture {
    pub nodes: Vec<FixtureNode>,
}

pub fn load_fixture(path: &std::path::Path) -> AppResult<InMemoryDom> {
    let content = std::fs::read_to_string(path).map_err(|err| AppError::Io {
        path: path.display().to_string(),
        reason: err.to_string(),
    })?;
    let fixture: DomFixture = serde_json::from_str(&content).map_err(|err| AppError::Parse {
        kind: "dom fixture",
        path: path.display().to_string(),
        reason: err.to_string(),
    })?;
    build_fixture(fixture)
}

pub fn build_fixture(fixture: DomFixture) -> AppResult<InMemoryDom> {
    if fixture.nodes.is_empty() {
        return Err(AppError::InvalidFixture(
            "<fixture>".to_string(),
            "must declare at least one node".to_string(),
        ));
    }

    let mut builder = InMemoryDom::builder();
    for node in &fixture.nodes {
        let mut spec = NodeSpec::new(node.id.clone(), node.tag.clone());
        for (key, value) in &node.attrs {
            spec = spec.attr(key.clone(), value.clone());
        }
        for class in &node.classes {
            spec = spec.class(class.clone());
        }
        if let Some(text) = &node.text {
            spec = spec.text(text.clone());
        }
        if let Some(bounding) = &node.bounding {
            let bounding = BoundingBox::new(bounding.x, bounding.y, bounding.width, bounding.height)
                .map_err(|err| AppError::InvalidFixture(node.id.clone(), err.to_string()))?;
            spec = spec.bounding(bounding);
        }
        match node.hidden {
            Some(FixtureHidden::DisplayNone) => spec = spec.hidden_display_none(),
            Some(FixtureHidden::Visibility) => spec = spec.hidden_visibility(),
            Some(FixtureHidden::Opacity) => spec = spec.hidden_opacity(),
            None => {}
        }
        if node.disabled {
            spec = spec.disabled();
        }
        if node.detached {
            spec = spec.detached();
        }
        builder = builder.node(node.parent.as_deref(), spec);
    }
    Ok(builder.build())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn a_single_root_node_builds() {
        let fixture = DomFixture {
            nodes: vec![FixtureNode {
                id: "html".into(),
                tag: "html".into(),
                parent: None,
                attrs: HashMap::new(),
                classes: Vec::new(),
                text: None,
                bounding: None,
                hidden: None,
                disabled: false,
                detached: false,
            }],
        };
        assert!(build_fixture(fixture).is_ok());
    }

    #[test]
    fn empty_fixture_is_rejected() {
        let fixture = DomFixture { nodes: Vec::new() };
        assert!(build_fixture(fixture).is_err());
    }
}
