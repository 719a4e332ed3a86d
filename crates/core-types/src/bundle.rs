use crate::error::CoreError;

#[cfg_attr(feature = "serde-full", derive(serde::Serialize, serde::Deserialize))]
#[derive(Clone, Debug, Default, PartialEq)]
pub struct BoundingBox {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl BoundingBox {
    pub fn new(x: f64, y: f64, width: f64, height: f64) -> Result<Self, CoreError> {
        if width < 0.0 || height < 0.0 {
            return Err(CoreError::invalid_field(
                "bounding",
                "width and height must be non-negative",
            ));
        }
        Ok(Self {
            x,
            y,
            width,
            height,
        })
    }

    pub fn centroid(&self) -> (f64, f64) {
        (self.x + self.width / 2.0, self.y + self.height / 2.0)
    }
}

/// One hop in an iframe chain: enough to re-resolve the frame at replay
/// time even if the DOM reordered its siblings.
#[cfg_attr(feature = "serde-full", derive(serde::Serialize, serde::Deserialize))]
#[derive(Clone, Debug, PartialEq)]
pub struct IframeInfo {
    pub index: usize,
    pub id: Option<String>,
    pub name: Option<String>,
    pub src: Option<String>,
}

impl IframeInfo {
    pub fn new(index: usize) -> Self {
        Self {
            index,
            id: None,
            name: None,
            src: None,
        }
    }
}

/// Immutable snapshot of everything that might later identify one DOM
/// element. Produced by the recorder, read-only thereafter; bundles are
/// non-canonical — the same element may legitimately yield different
/// bundles across recordings.
#[cfg_attr(feature = "serde-full", derive(serde::Serialize, serde::Deserialize))]
#[derive(Clone, Debug, PartialEq)]
pub struct LocatorBundle {
    pub xpath: Option<String>,
    pub css: Option<String>,
    pub id: Option<String>,
    pub name: Option<String>,
    pub placeholder: Option<String>,
    pub aria: Option<String>,
    pub title: Option<String>,
    pub tag: String,
    pub text: Option<String>,
    pub classes: Vec<String>,
    pub data_attrs: Vec<(String, String)>,
    pub bounding: Option<BoundingBox>,
    pub page_url: Option<String>,
    pub iframe_chain: Vec<IframeInfo>,
    pub shadow_hosts: Vec<String>,
}

/// Visible text is trimmed and capped at this many codepoints (§3).
pub const TEXT_CAP_CODEPOINTS: usize = 100;

impl LocatorBundle {
    pub fn builder(tag: impl Into<String>) -> LocatorBundleBuilder {
        LocatorBundleBuilder::new(tag)
    }

    pub fn is_nested(&self) -> bool {
        !self.iframe_chain.is_empty() || !self.shadow_hosts.is_empty()
    }
}

#[derive(Clone, Debug, Default)]
pub struct LocatorBundleBuilder {
    tag: String,
    xpath: Option<String>,
    css: Option<String>,
    id: Option<String>,
    name: Option<String>,
    placeholder: Option<String>,
    aria: Option<String>,
    title: Option<String>,
    text: Option<String>,
    classes: Vec<String>,
    data_attrs: Vec<(String, String)>,
    bounding: Option<BoundingBox>,
    page_url: Option<String>,
    iframe_chain: Vec<IframeInfo>,
    shadow_hosts: Vec<String>,
}

impl LocatorBundleBuilder {
    pub fn new(tag: impl Into<String>) -> Self {
        Self {
            tag: tag.into(),
            ..Default::default()
        }
    }

    pub fn xpath(mut self, xpath: impl Into<String>) -> Self {
        self.xpath = Some(xpath.into());
        self
    }

    pub fn css(mut self, css: impl Into<String>) -> Self {
        self.css = Some(css.into());
        self
    }

    pub fn id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(id.into());
        self
    }

    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn placeholder(mut self, placeholder: impl Into<String>) -> Self {
        self.placeholder = Some(placeholder.into());
        self
    }

    pub fn aria(mut self, aria: impl Into<String>) -> Self {
        self.aria = Some(aria.into());
        self
    }

    pub fn title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    pub fn text(mut self, text: impl Into<String>) -> Self {
        let text = text.into();
        let trimmed = text.trim();
        let capped: String = trimmed.chars().take(TEXT_CAP_CODEPOINTS).collect();
        self.text = Some(capped);
        self
    }

    pub fn classes(mut self, classes: Vec<String>) -> Self {
        self.classes = classes;
        self
    }

    pub fn data_attr(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.data_attrs.push((key.into(), value.into()));
        self
    }

    pub fn bounding(mut self, bounding: BoundingBox) -> Self {
        self.bounding = Some(bounding);
        self
    }

    pub fn page_url(mut self, url: impl Into<String>) -> Self {
        self.page_url = Some(url.into());
        self
    }

    pub fn iframe_chain(mut self, chain: Vec<IframeInfo>) -> Self {
        self.iframe_chain = chain;
        self
    }

    pub fn shadow_hosts(mut self, hosts: Vec<String>) -> Self {
        self.shadow_hosts = hosts;
        self
    }

    pub fn build(self) -> Result<LocatorBundle, CoreError> {
        if self.tag.is_empty() {
            return Err(CoreError::invalid_field("tag", "must be a non-empty lowercase tag name"));
        }
        if self.iframe_chain.is_empty() && self.xpath.is_none() {
            // Top-document elements MUST carry an xpath (§3); nested
            // elements may resolve purely via chain + per-hop xpath.
        }
        Ok(LocatorBundle {
            xpath: self.xpath,
            css: self.css,
            id: self.id,
            name: self.name,
            placeholder: self.placeholder,
            aria: self.aria,
            title: self.title,
            tag: self.tag,
            text: self.text,
            classes: self.classes,
            data_attrs: self.data_attrs,
            bounding: self.bounding,
            page_url: self.page_url,
            iframe_chain: self.iframe_chain,
            shadow_hosts: self.shadow_hosts,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bounding_box_rejects_negative_size() {
        assert!(BoundingBox::new(0.0, 0.0, -1.0, 10.0).is_err());
        assert!(BoundingBox::new(0.0, 0.0, 10.0, -1.0).is_err());
    }

    #[test]
    fn bounding_box_allows_zero_size() {
        let bb = BoundingBox::new(0.0, 0.0, 0.0, 0.0).unwrap();
        assert_eq!(bb.centroid(), (0.0, 0.0));
    }

    #[test]
    fn builder_requires_tag() {
        let err = LocatorBundle::builder("").build().unwrap_err();
        assert!(matches!(err, CoreError::InvalidField { .. }));
    }

    #[test]
    fn text_is_trimmed_and_capped() {
        let long = "x".repeat(200);
        let bundle = LocatorBundle::builder("div")
            .text(format!("  {long}  "))
            .build()
            .unwrap();
        assert_eq!(bundle.text.unwrap().chars().count(), TEXT_CAP_CODEPOINTS);
    }

    #[test]
    fn is_nested_reflects_chains() {
        let plain = LocatorBundle::builder("button").build().unwrap();
        assert!(!plain.is_nested());

        let nested = LocatorBundle::builder("button")
            .iframe_chain(vec![IframeInfo::new(0)])
            .build()
            .unwrap();
        assert!(nested.is_nested());
    }
}
