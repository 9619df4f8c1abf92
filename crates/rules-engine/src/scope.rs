//! Scope predicates
//!
//! One [`ScopeConfig`] variant per filter dimension. Every variant treats
//! an empty configuration as "no constraint", so a rule with nothing
//! configured matches every item.

use regex::{Regex, RegexBuilder};
use rules_common::{CatalogItem, ItemId, StockStatus, TermId};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

/// Filter dimension
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Dimension {
    /// Category membership
    Category,
    /// Tag membership
    Tag,
    /// Effective price range
    Price,
    /// Stock status
    Stock,
    /// Title pattern
    Title,
    /// Explicit item ids
    Product,
    /// Attribute term membership
    Attribute,
}

impl Dimension {
    /// Every dimension, in default evaluation order
    pub const ALL: [Dimension; 7] = [
        Self::Product,
        Self::Stock,
        Self::Category,
        Self::Tag,
        Self::Attribute,
        Self::Price,
        Self::Title,
    ];

    /// Stable name used as storage key
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Category => "category",
            Self::Tag => "tag",
            Self::Price => "price",
            Self::Stock => "stock",
            Self::Title => "title",
            Self::Product => "product",
            Self::Attribute => "attribute",
        }
    }

    /// Configuration fields this dimension reads
    pub const fn fields(&self) -> &'static [&'static str] {
        match self {
            Self::Category | Self::Tag | Self::Attribute => &[fields::TERMS],
            Self::Product => &[fields::ITEMS],
            Self::Stock => &[fields::STATUSES],
            Self::Price => &[fields::OPERATOR, fields::MIN, fields::MAX],
            Self::Title => &[fields::OPERATOR, fields::PATTERN, fields::CASE_SENSITIVE],
        }
    }

    /// Whether `field` belongs to this dimension
    pub fn has_field(&self, field: &str) -> bool {
        self.fields().contains(&field)
    }
}

impl fmt::Display for Dimension {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Dimension {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "category" => Ok(Self::Category),
            "tag" => Ok(Self::Tag),
            "price" => Ok(Self::Price),
            "stock" => Ok(Self::Stock),
            "title" => Ok(Self::Title),
            "product" => Ok(Self::Product),
            "attribute" => Ok(Self::Attribute),
            other => Err(format!("unknown dimension: {other}")),
        }
    }
}

/// Stored field names
pub mod fields {
    /// Term id list (category, tag, attribute)
    pub const TERMS: &str = "terms";
    /// Item id list (product)
    pub const ITEMS: &str = "items";
    /// Stock status list
    pub const STATUSES: &str = "statuses";
    /// Comparison operator (price, title)
    pub const OPERATOR: &str = "operator";
    /// Lower price bound
    pub const MIN: &str = "min";
    /// Upper price bound
    pub const MAX: &str = "max";
    /// Title pattern
    pub const PATTERN: &str = "pattern";
    /// Title case sensitivity
    pub const CASE_SENSITIVE: &str = "case_sensitive";
}

/// Ordered set of dimensions the evaluator consults
///
/// Built once at start-up. A deployment that does not offer, say, the
/// attribute filter registers the remaining dimensions only.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ScopeRegistry {
    dimensions: Vec<Dimension>,
}

impl ScopeRegistry {
    /// Registry with every dimension
    pub fn standard() -> Self {
        Self {
            dimensions: Dimension::ALL.to_vec(),
        }
    }

    /// Registry with the given dimensions, duplicates dropped
    pub fn only(dimensions: impl IntoIterator<Item = Dimension>) -> Self {
        let mut seen = BTreeSet::new();
        let dimensions = dimensions
            .into_iter()
            .filter(|d| seen.insert(*d))
            .collect();
        Self { dimensions }
    }

    /// Registered dimensions in evaluation order
    pub fn iter(&self) -> impl Iterator<Item = Dimension> + '_ {
        self.dimensions.iter().copied()
    }

    /// Number of registered dimensions
    pub fn len(&self) -> usize {
        self.dimensions.len()
    }

    /// Check if empty
    pub fn is_empty(&self) -> bool {
        self.dimensions.is_empty()
    }
}

impl Default for ScopeRegistry {
    fn default() -> Self {
        Self::standard()
    }
}

/// Per-evaluation settings shared by all predicates
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MatchContext {
    /// Currency decimal precision
    pub decimals: u32,
}

impl MatchContext {
    /// Context for a currency with `decimals` digits
    pub const fn new(decimals: u32) -> Self {
        Self { decimals }
    }

    /// Half of the smallest currency unit
    pub fn tolerance(&self) -> f64 {
        0.5 * 10f64.powi(-(self.decimals.min(12) as i32))
    }
}

impl Default for MatchContext {
    fn default() -> Self {
        Self::new(2)
    }
}

/// Term set scope (category, tag, attribute)
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TermScope {
    /// Configured terms; empty means any
    pub terms: BTreeSet<TermId>,
}

impl TermScope {
    /// Scope over the given term ids
    pub fn new(terms: impl IntoIterator<Item = u64>) -> Self {
        Self {
            terms: terms.into_iter().map(TermId::new).collect(),
        }
    }

    /// OR semantics: any shared term is enough
    fn matches_set(&self, item_terms: &BTreeSet<TermId>) -> bool {
        self.terms.is_empty() || !self.terms.is_disjoint(item_terms)
    }

    fn matches_attributes(&self, item: &CatalogItem) -> bool {
        self.terms.is_empty() || self.terms.iter().any(|t| item.has_attribute_term(t))
    }
}

/// Price comparison operator
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PriceOperator {
    /// Strictly above `min`
    GreaterThan,
    /// Strictly below `max`
    LessThan,
    /// Inside `[min, max]`
    Between,
    /// Equal to `min`
    EqualTo,
}

impl Default for PriceOperator {
    fn default() -> Self {
        Self::Between
    }
}

impl FromStr for PriceOperator {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "greater_than" => Ok(Self::GreaterThan),
            "less_than" => Ok(Self::LessThan),
            "between" => Ok(Self::Between),
            "equal_to" => Ok(Self::EqualTo),
            other => Err(format!("unknown price operator: {other}")),
        }
    }
}

/// Price range scope
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PriceScope {
    /// Comparison operator
    pub operator: PriceOperator,
    /// Lower bound (also the operand of `greater_than` and `equal_to`)
    pub min: Option<f64>,
    /// Upper bound (also the operand of `less_than`)
    pub max: Option<f64>,
}

impl PriceScope {
    /// Inclusive range
    pub fn between(min: f64, max: f64) -> Self {
        Self {
            operator: PriceOperator::Between,
            min: Some(min),
            max: Some(max),
        }
    }

    /// Strictly above
    pub fn greater_than(amount: f64) -> Self {
        Self {
            operator: PriceOperator::GreaterThan,
            min: Some(amount),
            max: None,
        }
    }

    /// Strictly below
    pub fn less_than(amount: f64) -> Self {
        Self {
            operator: PriceOperator::LessThan,
            min: None,
            max: Some(amount),
        }
    }

    /// Equal within currency precision
    pub fn equal_to(amount: f64) -> Self {
        Self {
            operator: PriceOperator::EqualTo,
            min: Some(amount),
            max: None,
        }
    }

    /// True when the operator has none of the bounds it needs
    pub fn is_unconstrained(&self) -> bool {
        match self.operator {
            PriceOperator::GreaterThan | PriceOperator::EqualTo => self.min.is_none(),
            PriceOperator::LessThan => self.max.is_none(),
            PriceOperator::Between => self.min.is_none() && self.max.is_none(),
        }
    }

    fn matches_price(&self, price: Option<f64>, eps: f64) -> bool {
        if self.is_unconstrained() {
            return true;
        }
        let Some(price) = price.filter(|p| p.is_finite()) else {
            return false;
        };

        match self.operator {
            PriceOperator::GreaterThan => self.min.is_some_and(|min| price > min + eps),
            PriceOperator::LessThan => self.max.is_some_and(|max| price < max - eps),
            PriceOperator::EqualTo => self.min.is_some_and(|min| (price - min).abs() <= eps),
            PriceOperator::Between => {
                let above = self.min.map_or(true, |min| price >= min - eps);
                let below = self.max.map_or(true, |max| price <= max + eps);
                above && below
            }
        }
    }
}

/// Stock status scope
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StockScope {
    /// Allowed statuses; empty means any
    pub statuses: BTreeSet<StockStatus>,
}

impl StockScope {
    /// Scope allowing the given statuses
    pub fn new(statuses: impl IntoIterator<Item = StockStatus>) -> Self {
        Self {
            statuses: statuses.into_iter().collect(),
        }
    }
}

/// Title comparison operator
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TitleOperator {
    /// Substring present
    Contains,
    /// Substring absent
    NotContains,
    /// Prefix
    StartsWith,
    /// Suffix
    EndsWith,
    /// Regular expression search
    Regex,
}

impl Default for TitleOperator {
    fn default() -> Self {
        Self::Contains
    }
}

impl FromStr for TitleOperator {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "contains" => Ok(Self::Contains),
            "not_contains" => Ok(Self::NotContains),
            "starts_with" => Ok(Self::StartsWith),
            "ends_with" => Ok(Self::EndsWith),
            "regex" => Ok(Self::Regex),
            other => Err(format!("unknown title operator: {other}")),
        }
    }
}

/// Title pattern scope
///
/// The comparison needle and, for [`TitleOperator::Regex`], the compiled
/// regex are prepared once at construction. A resolved scope sits in the
/// config cache, so each stored pattern is compiled once per cache entry
/// rather than once per item.
#[derive(Debug, Clone, Default)]
pub struct TitleScope {
    operator: TitleOperator,
    pattern: String,
    case_sensitive: bool,
    needle: String,
    regex: Option<Regex>,
}

impl TitleScope {
    /// Case-insensitive scope
    pub fn new(operator: TitleOperator, pattern: impl Into<String>) -> Self {
        Self::with_options(operator, pattern, false)
    }

    /// Scope with explicit case handling
    pub fn with_options(
        operator: TitleOperator,
        pattern: impl Into<String>,
        case_sensitive: bool,
    ) -> Self {
        let pattern = pattern.into();
        let needle = if case_sensitive {
            pattern.clone()
        } else {
            pattern.to_lowercase()
        };
        let regex = if operator == TitleOperator::Regex && !pattern.is_empty() {
            compile(&pattern, case_sensitive)
        } else {
            None
        };

        Self {
            operator,
            pattern,
            case_sensitive,
            needle,
            regex,
        }
    }

    /// Switch to case-sensitive comparison
    pub fn case_sensitive(self) -> Self {
        Self::with_options(self.operator, self.pattern, true)
    }

    /// Comparison operator
    pub fn operator(&self) -> TitleOperator {
        self.operator
    }

    /// Pattern as stored; empty means any
    pub fn pattern(&self) -> &str {
        &self.pattern
    }

    /// Whether comparison keeps case
    pub fn is_case_sensitive(&self) -> bool {
        self.case_sensitive
    }

    /// Compiled regex; `None` unless the operator is `regex` and the
    /// pattern compiled
    pub fn compiled_regex(&self) -> Option<&Regex> {
        self.regex.as_ref()
    }

    fn matches_title(&self, title: &str) -> bool {
        if self.pattern.is_empty() {
            return true;
        }
        if self.operator == TitleOperator::Regex {
            return self.regex.as_ref().is_some_and(|re| re.is_match(title));
        }

        let lowered;
        let title = if self.case_sensitive {
            title
        } else {
            lowered = title.to_lowercase();
            lowered.as_str()
        };

        match self.operator {
            TitleOperator::Contains => title.contains(&self.needle),
            TitleOperator::NotContains => !title.contains(&self.needle),
            TitleOperator::StartsWith => title.starts_with(&self.needle),
            TitleOperator::EndsWith => title.ends_with(&self.needle),
            TitleOperator::Regex => false,
        }
    }
}

impl PartialEq for TitleScope {
    fn eq(&self, other: &Self) -> bool {
        self.operator == other.operator
            && self.pattern == other.pattern
            && self.case_sensitive == other.case_sensitive
    }
}

impl Eq for TitleScope {}

/// Malformed admin input must never break evaluation: it becomes a
/// non-matching scope, reported once here.
fn compile(pattern: &str, case_sensitive: bool) -> Option<Regex> {
    match RegexBuilder::new(pattern)
        .case_insensitive(!case_sensitive)
        .build()
    {
        Ok(re) => Some(re),
        Err(e) => {
            tracing::warn!(%pattern, error = %e, "Invalid title regex, treating as non-match");
            None
        }
    }
}

/// Explicit item id scope
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProductScope {
    /// Configured items; empty means any
    pub items: BTreeSet<ItemId>,
}

impl ProductScope {
    /// Scope over the given item ids
    pub fn new(items: impl IntoIterator<Item = u64>) -> Self {
        Self {
            items: items.into_iter().map(ItemId::new).collect(),
        }
    }
}

/// Resolved configuration of one dimension for one rule
#[derive(Debug, Clone, PartialEq)]
pub enum ScopeConfig {
    /// Category terms
    Category(TermScope),
    /// Tag terms
    Tag(TermScope),
    /// Price range
    Price(PriceScope),
    /// Stock statuses
    Stock(StockScope),
    /// Title pattern
    Title(TitleScope),
    /// Explicit items
    Product(ProductScope),
    /// Attribute terms
    Attribute(TermScope),
}

impl ScopeConfig {
    /// Default (empty) configuration of a dimension
    pub fn unconstrained(dimension: Dimension) -> Self {
        match dimension {
            Dimension::Category => Self::Category(TermScope::default()),
            Dimension::Tag => Self::Tag(TermScope::default()),
            Dimension::Price => Self::Price(PriceScope::default()),
            Dimension::Stock => Self::Stock(StockScope::default()),
            Dimension::Title => Self::Title(TitleScope::default()),
            Dimension::Product => Self::Product(ProductScope::default()),
            Dimension::Attribute => Self::Attribute(TermScope::default()),
        }
    }

    /// Dimension of this configuration
    pub const fn dimension(&self) -> Dimension {
        match self {
            Self::Category(_) => Dimension::Category,
            Self::Tag(_) => Dimension::Tag,
            Self::Price(_) => Dimension::Price,
            Self::Stock(_) => Dimension::Stock,
            Self::Title(_) => Dimension::Title,
            Self::Product(_) => Dimension::Product,
            Self::Attribute(_) => Dimension::Attribute,
        }
    }

    /// True when this configuration places no constraint on items
    pub fn is_unconstrained(&self) -> bool {
        match self {
            Self::Category(s) | Self::Tag(s) | Self::Attribute(s) => s.terms.is_empty(),
            Self::Price(s) => s.is_unconstrained(),
            Self::Stock(s) => s.statuses.is_empty(),
            Self::Title(s) => s.pattern().is_empty(),
            Self::Product(s) => s.items.is_empty(),
        }
    }

    /// Check item against this configuration
    #[inline]
    pub fn matches(&self, item: &CatalogItem, ctx: &MatchContext) -> bool {
        match self {
            Self::Category(s) => s.matches_set(&item.categories),
            Self::Tag(s) => s.matches_set(&item.tags),
            Self::Attribute(s) => s.matches_attributes(item),
            Self::Price(s) => s.matches_price(item.effective_price(), ctx.tolerance()),
            Self::Stock(s) => s.statuses.is_empty() || s.statuses.contains(&item.stock_status),
            Self::Title(s) => s.matches_title(&item.title),
            Self::Product(s) => s.items.is_empty() || s.items.contains(&item.id),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ctx() -> MatchContext {
        MatchContext::default()
    }

    fn priced(price: f64) -> CatalogItem {
        CatalogItem::new(1, "Widget").with_price(price)
    }

    #[test]
    fn test_unconstrained_matches_everything() {
        let items = [
            CatalogItem::new(1, ""),
            CatalogItem::new(2, "Pro Model")
                .with_price(0.0)
                .with_stock(StockStatus::OutOfStock)
                .in_categories([1])
                .tagged([2])
                .with_attribute("pa_color", [3]),
        ];

        for dimension in Dimension::ALL {
            let config = ScopeConfig::unconstrained(dimension);
            assert!(config.is_unconstrained());
            assert_eq!(config.dimension(), dimension);
            for item in &items {
                assert!(config.matches(item, &ctx()), "{dimension} should pass");
            }
        }
    }

    #[test]
    fn test_price_between_inclusive() {
        let scope = ScopeConfig::Price(PriceScope::between(10.0, 20.0));
        assert!(scope.matches(&priced(15.0), &ctx()));
        assert!(scope.matches(&priced(10.0), &ctx()));
        assert!(scope.matches(&priced(20.0), &ctx()));
        assert!(!scope.matches(&priced(20.01), &ctx()));
        assert!(!scope.matches(&priced(9.99), &ctx()));
    }

    #[test]
    fn test_price_tolerance_absorbs_float_noise() {
        let scope = ScopeConfig::Price(PriceScope::equal_to(0.3));
        assert!(scope.matches(&priced(0.1 + 0.2), &ctx()));
        assert!(!scope.matches(&priced(0.31), &ctx()));
    }

    #[test]
    fn test_price_strict_operators() {
        let above = ScopeConfig::Price(PriceScope::greater_than(50.0));
        assert!(above.matches(&priced(50.01), &ctx()));
        assert!(!above.matches(&priced(50.0), &ctx()));

        let below = ScopeConfig::Price(PriceScope::less_than(50.0));
        assert!(below.matches(&priced(49.99), &ctx()));
        assert!(!below.matches(&priced(50.0), &ctx()));
    }

    #[test]
    fn test_price_open_ended_between() {
        let scope = ScopeConfig::Price(PriceScope {
            operator: PriceOperator::Between,
            min: Some(100.0),
            max: None,
        });
        assert!(scope.matches(&priced(1_000.0), &ctx()));
        assert!(!scope.matches(&priced(99.0), &ctx()));
    }

    #[test]
    fn test_price_uses_effective_price() {
        let scope = ScopeConfig::Price(PriceScope::less_than(20.0));
        let variable = CatalogItem::new(7, "Shirt").with_variations([35.0, 19.0]);
        assert!(scope.matches(&variable, &ctx()));

        let on_sale = priced(25.0).with_sale_price(15.0);
        assert!(scope.matches(&on_sale, &ctx()));
    }

    #[test]
    fn test_configured_price_rejects_unpriced_item() {
        let scope = ScopeConfig::Price(PriceScope::greater_than(0.0));
        assert!(!scope.matches(&CatalogItem::new(3, "Free sample"), &ctx()));
    }

    #[test]
    fn test_category_intersection() {
        let scope = ScopeConfig::Category(TermScope::new([5, 7]));
        let hit = CatalogItem::new(1, "A").in_categories([7, 9]);
        let miss = CatalogItem::new(2, "B").in_categories([1, 2]);
        assert!(scope.matches(&hit, &ctx()));
        assert!(!scope.matches(&miss, &ctx()));
    }

    #[test]
    fn test_tag_and_attribute_terms() {
        let item = CatalogItem::new(1, "Lamp")
            .tagged([40])
            .with_attribute("pa_color", [11, 12])
            .with_attribute("pa_size", [21]);

        assert!(ScopeConfig::Tag(TermScope::new([40, 41])).matches(&item, &ctx()));
        assert!(!ScopeConfig::Tag(TermScope::new([41])).matches(&item, &ctx()));
        assert!(ScopeConfig::Attribute(TermScope::new([21])).matches(&item, &ctx()));
        assert!(!ScopeConfig::Attribute(TermScope::new([30, 31])).matches(&item, &ctx()));
    }

    #[test]
    fn test_stock_membership() {
        let scope = ScopeConfig::Stock(StockScope::new([
            StockStatus::InStock,
            StockStatus::OnBackorder,
        ]));
        let backorder = CatalogItem::new(1, "A").with_stock(StockStatus::OnBackorder);
        let gone = CatalogItem::new(2, "B").with_stock(StockStatus::OutOfStock);
        assert!(scope.matches(&backorder, &ctx()));
        assert!(!scope.matches(&gone, &ctx()));
    }

    #[test]
    fn test_title_contains_case_handling() {
        let item = CatalogItem::new(1, "Pro Model");
        let insensitive = ScopeConfig::Title(TitleScope::new(TitleOperator::Contains, "pro"));
        let sensitive = ScopeConfig::Title(
            TitleScope::new(TitleOperator::Contains, "pro").case_sensitive(),
        );
        assert!(insensitive.matches(&item, &ctx()));
        assert!(!sensitive.matches(&item, &ctx()));
    }

    #[test]
    fn test_title_operators() {
        let item = CatalogItem::new(1, "Deluxe Coffee Grinder");
        let check = |op, pattern: &str| {
            ScopeConfig::Title(TitleScope::new(op, pattern)).matches(&item, &ctx())
        };

        assert!(check(TitleOperator::StartsWith, "deluxe"));
        assert!(!check(TitleOperator::StartsWith, "coffee"));
        assert!(check(TitleOperator::EndsWith, "GRINDER"));
        assert!(check(TitleOperator::NotContains, "tea"));
        assert!(!check(TitleOperator::NotContains, "coffee"));
        assert!(check(TitleOperator::Regex, r"^deluxe\s+\w+"));
    }

    #[test]
    fn test_title_regex_case_sensitivity() {
        let item = CatalogItem::new(1, "Pro Model");
        let insensitive = ScopeConfig::Title(TitleScope::new(TitleOperator::Regex, "^pro"));
        let sensitive = ScopeConfig::Title(
            TitleScope::new(TitleOperator::Regex, "^pro").case_sensitive(),
        );
        assert!(insensitive.matches(&item, &ctx()));
        assert!(!sensitive.matches(&item, &ctx()));
    }

    #[test]
    fn test_title_malformed_regex_is_non_match() {
        let item = CatalogItem::new(1, "[abc");
        let title = TitleScope::new(TitleOperator::Regex, "[abc");
        assert!(title.compiled_regex().is_none());
        assert!(!ScopeConfig::Title(title).matches(&item, &ctx()));
    }

    #[test]
    fn test_title_regex_compiled_at_construction() {
        let config = ScopeConfig::Title(TitleScope::new(TitleOperator::Regex, r"^pro\b"));
        let ScopeConfig::Title(scope) = &config else {
            panic!("expected title scope");
        };
        let before = scope.compiled_regex().map(|re| re as *const Regex);
        assert!(before.is_some());

        assert!(config.matches(&CatalogItem::new(1, "Pro Model"), &ctx()));
        assert!(config.matches(&CatalogItem::new(2, "pro kit"), &ctx()));
        assert!(!config.matches(&CatalogItem::new(3, "Prototype"), &ctx()));
        assert_eq!(scope.compiled_regex().map(|re| re as *const Regex), before);

        assert!(TitleScope::new(TitleOperator::Contains, "pro").compiled_regex().is_none());
        assert!(TitleScope::new(TitleOperator::Regex, "").compiled_regex().is_none());
    }

    #[test]
    fn test_explicit_ids() {
        let scope = ScopeConfig::Product(ProductScope::new([3, 4]));
        assert!(scope.matches(&CatalogItem::new(4, "A"), &ctx()));
        assert!(!scope.matches(&CatalogItem::new(5, "B"), &ctx()));
    }

    #[test]
    fn test_registry_drops_duplicates() {
        let registry = ScopeRegistry::only([Dimension::Price, Dimension::Tag, Dimension::Price]);
        assert_eq!(registry.iter().collect::<Vec<_>>(), vec![Dimension::Price, Dimension::Tag]);
        assert_eq!(ScopeRegistry::standard().len(), 7);
    }

    #[test]
    fn test_dimension_names_round_trip() {
        for dimension in Dimension::ALL {
            assert_eq!(dimension.as_str().parse::<Dimension>(), Ok(dimension));
        }
        assert!(Dimension::Price.has_field("min"));
        assert!(!Dimension::Price.has_field("terms"));
    }
}
