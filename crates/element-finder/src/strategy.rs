/// One of the nine independent ways to resolve a bundle to a live
/// element, in the default priority order (§4.2).
#[cfg_attr(feature = "serde-full", derive(serde::Serialize, serde::Deserialize))]
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Strategy {
    Xpath,
    Id,
    Name,
    Aria,
    Placeholder,
    DataAttributes,
    Css,
    FuzzyText,
    BoundingBox,
}

impl Strategy {
    pub fn name(&self) -> &'static str {
        match self {
            Strategy::Xpath => "xpath",
            Strategy::Id => "id",
            Strategy::Name => "name",
            Strategy::Aria => "aria",
            Strategy::Placeholder => "placeholder",
            Strategy::DataAttributes => "dataAttributes",
            Strategy::Css => "css",
            Strategy::FuzzyText => "fuzzyText",
            Strategy::BoundingBox => "boundingBox",
        }
    }

    pub fn base_confidence(&self) -> f64 {
        match self {
            Strategy::Xpath => 1.00,
            Strategy::Id => 0.90,
            Strategy::Name => 0.80,
            Strategy::Aria => 0.75,
            Strategy::Placeholder => 0.70,
            Strategy::DataAttributes => 0.65,
            Strategy::Css => 0.60,
            Strategy::FuzzyText => 0.40,
            Strategy::BoundingBox => 0.30,
        }
    }

    /// Default priority order; callers may override via
    /// `FinderOptions::strategy_priority`.
    pub fn default_priority() -> Vec<Strategy> {
        vec![
            Strategy::Xpath,
            Strategy::Id,
            Strategy::Name,
            Strategy::Aria,
            Strategy::Placeholder,
            Strategy::DataAttributes,
            Strategy::Css,
            Strategy::FuzzyText,
            Strategy::BoundingBox,
        ]
    }

    pub fn from_name(name: &str) -> Option<Strategy> {
        Self::default_priority().into_iter().find(|s| s.name() == name)
    }
}
