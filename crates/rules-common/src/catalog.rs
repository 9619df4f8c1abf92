//! Catalog item model and accessor
//!
//! The matcher only reads items. Anything that can hand out a
//! [`CatalogItem`] by id can back the engine through [`Catalog`].

use crate::{ItemId, TermId};
use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet, HashMap};
use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

/// Stock status of an item
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StockStatus {
    /// Available
    InStock,
    /// Not available
    OutOfStock,
    /// Orderable, ships later
    OnBackorder,
}

impl StockStatus {
    /// Stable name used in stored configuration
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::InStock => "in_stock",
            Self::OutOfStock => "out_of_stock",
            Self::OnBackorder => "on_backorder",
        }
    }
}

impl Default for StockStatus {
    fn default() -> Self {
        Self::InStock
    }
}

impl fmt::Display for StockStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for StockStatus {
    type Err = String;

    /// Accepts both the snake_case names and the host store's
    /// `instock` / `outofstock` / `onbackorder` spellings.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "in_stock" | "instock" => Ok(Self::InStock),
            "out_of_stock" | "outofstock" => Ok(Self::OutOfStock),
            "on_backorder" | "onbackorder" => Ok(Self::OnBackorder),
            other => Err(format!("unknown stock status: {other}")),
        }
    }
}

/// Item kind, decides how the effective price is resolved
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ItemKind {
    /// Single purchasable item
    Simple,
    /// Parent of priced variations
    Variable,
    /// Bundle of independently priced children
    Grouped,
}

impl Default for ItemKind {
    fn default() -> Self {
        Self::Simple
    }
}

/// Catalog item as seen by the matcher
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CatalogItem {
    /// Item id
    pub id: ItemId,
    /// Display title
    pub title: String,
    /// Item kind
    #[serde(default)]
    pub kind: ItemKind,
    /// Regular price
    #[serde(default)]
    pub regular_price: Option<f64>,
    /// Sale price, wins over the regular price when set
    #[serde(default)]
    pub sale_price: Option<f64>,
    /// Prices of variations (variable items)
    #[serde(default)]
    pub variation_prices: Vec<f64>,
    /// Prices of children (grouped items)
    #[serde(default)]
    pub child_prices: Vec<f64>,
    /// Stock status
    #[serde(default)]
    pub stock_status: StockStatus,
    /// Category term ids
    #[serde(default)]
    pub categories: BTreeSet<TermId>,
    /// Tag term ids
    #[serde(default)]
    pub tags: BTreeSet<TermId>,
    /// Attribute term ids keyed by attribute taxonomy
    #[serde(default)]
    pub attributes: BTreeMap<String, BTreeSet<TermId>>,
    /// Long description
    #[serde(default)]
    pub description: String,
    /// Featured flag
    #[serde(default)]
    pub featured: bool,
    /// Gallery image ids
    #[serde(default)]
    pub gallery: Vec<u64>,
}

impl CatalogItem {
    /// Create a simple in-stock item with no price and no terms
    pub fn new(id: impl Into<ItemId>, title: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            kind: ItemKind::Simple,
            regular_price: None,
            sale_price: None,
            variation_prices: Vec::new(),
            child_prices: Vec::new(),
            stock_status: StockStatus::InStock,
            categories: BTreeSet::new(),
            tags: BTreeSet::new(),
            attributes: BTreeMap::new(),
            description: String::new(),
            featured: false,
            gallery: Vec::new(),
        }
    }

    /// Set regular price
    pub fn with_price(mut self, price: f64) -> Self {
        self.regular_price = Some(price);
        self
    }

    /// Set sale price
    pub fn with_sale_price(mut self, price: f64) -> Self {
        self.sale_price = Some(price);
        self
    }

    /// Make this a variable item with the given variation prices
    pub fn with_variations(mut self, prices: impl IntoIterator<Item = f64>) -> Self {
        self.kind = ItemKind::Variable;
        self.variation_prices = prices.into_iter().collect();
        self
    }

    /// Make this a grouped item with the given child prices
    pub fn with_children(mut self, prices: impl IntoIterator<Item = f64>) -> Self {
        self.kind = ItemKind::Grouped;
        self.child_prices = prices.into_iter().collect();
        self
    }

    /// Set stock status
    pub fn with_stock(mut self, status: StockStatus) -> Self {
        self.stock_status = status;
        self
    }

    /// Add category terms
    pub fn in_categories(mut self, terms: impl IntoIterator<Item = u64>) -> Self {
        self.categories.extend(terms.into_iter().map(TermId::new));
        self
    }

    /// Add tag terms
    pub fn tagged(mut self, terms: impl IntoIterator<Item = u64>) -> Self {
        self.tags.extend(terms.into_iter().map(TermId::new));
        self
    }

    /// Add terms of one attribute taxonomy
    pub fn with_attribute(
        mut self,
        taxonomy: impl Into<String>,
        terms: impl IntoIterator<Item = u64>,
    ) -> Self {
        self.attributes
            .entry(taxonomy.into())
            .or_default()
            .extend(terms.into_iter().map(TermId::new));
        self
    }

    /// Set description
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    /// Current price: sale price when set, otherwise regular price
    pub fn current_price(&self) -> Option<f64> {
        self.sale_price.or(self.regular_price)
    }

    /// Price used for price-range matching
    ///
    /// Variable items use their cheapest variation and grouped items their
    /// cheapest child. Either falls back to the item's own price when it
    /// has no priced children.
    pub fn effective_price(&self) -> Option<f64> {
        let min = match self.kind {
            ItemKind::Simple => None,
            ItemKind::Variable => min_finite(&self.variation_prices),
            ItemKind::Grouped => min_finite(&self.child_prices),
        };
        min.or_else(|| self.current_price())
    }

    /// Whether the item carries any of the attribute terms
    pub fn has_attribute_term(&self, term: &TermId) -> bool {
        self.attributes.values().any(|terms| terms.contains(term))
    }
}

fn min_finite(prices: &[f64]) -> Option<f64> {
    prices
        .iter()
        .copied()
        .filter(|p| p.is_finite())
        .fold(None, |acc: Option<f64>, p| Some(acc.map_or(p, |a| a.min(p))))
}

/// Read-only item accessor
pub trait Catalog: Send + Sync {
    /// Look up item by id; `None` when the item no longer exists
    fn item(&self, id: ItemId) -> Option<Arc<CatalogItem>>;
}

/// In-memory catalog (for testing, fixtures and development)
pub struct InMemoryCatalog {
    items: RwLock<HashMap<ItemId, Arc<CatalogItem>>>,
}

impl InMemoryCatalog {
    /// Create empty catalog
    pub fn new() -> Self {
        Self {
            items: RwLock::new(HashMap::new()),
        }
    }

    /// Create catalog holding the given items
    pub fn with_items(items: impl IntoIterator<Item = CatalogItem>) -> Self {
        let catalog = Self::new();
        for item in items {
            catalog.insert(item);
        }
        catalog
    }

    /// Insert or replace an item
    pub fn insert(&self, item: CatalogItem) {
        self.items.write().insert(item.id, Arc::new(item));
    }

    /// Remove an item, returning it if it existed
    pub fn remove(&self, id: ItemId) -> Option<Arc<CatalogItem>> {
        self.items.write().remove(&id)
    }

    /// Number of items
    pub fn len(&self) -> usize {
        self.items.read().len()
    }

    /// Check if empty
    pub fn is_empty(&self) -> bool {
        self.items.read().is_empty()
    }

    /// All item ids, ascending
    pub fn ids(&self) -> Vec<ItemId> {
        let mut ids: Vec<_> = self.items.read().keys().copied().collect();
        ids.sort();
        ids
    }
}

impl Default for InMemoryCatalog {
    fn default() -> Self {
        Self::new()
    }
}

impl Catalog for InMemoryCatalog {
    fn item(&self, id: ItemId) -> Option<Arc<CatalogItem>> {
        self.items.read().get(&id).cloned()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_effective_price_simple() {
        let item = CatalogItem::new(1, "Mug").with_price(12.0);
        assert_eq!(item.effective_price(), Some(12.0));

        let on_sale = item.with_sale_price(9.5);
        assert_eq!(on_sale.effective_price(), Some(9.5));
    }

    #[test]
    fn test_effective_price_variable_uses_cheapest_variation() {
        let item = CatalogItem::new(2, "Shirt")
            .with_price(30.0)
            .with_variations([25.0, 18.0, f64::NAN, 22.0]);
        assert_eq!(item.effective_price(), Some(18.0));
    }

    #[test]
    fn test_effective_price_grouped_falls_back_without_children() {
        let grouped = CatalogItem::new(3, "Bundle").with_children([40.0, 15.0]);
        assert_eq!(grouped.effective_price(), Some(15.0));

        let empty = CatalogItem::new(4, "Empty bundle")
            .with_price(5.0)
            .with_children([]);
        assert_eq!(empty.effective_price(), Some(5.0));

        assert_eq!(CatalogItem::new(5, "Unpriced").effective_price(), None);
    }

    #[test]
    fn test_stock_status_parsing() {
        assert_eq!("instock".parse::<StockStatus>(), Ok(StockStatus::InStock));
        assert_eq!("on_backorder".parse::<StockStatus>(), Ok(StockStatus::OnBackorder));
        assert!("sold".parse::<StockStatus>().is_err());
    }

    #[test]
    fn test_item_deserializes_with_defaults() {
        let item: CatalogItem =
            serde_json::from_str(r#"{"id": 10, "title": "Lamp", "categories": [3]}"#).unwrap();
        assert_eq!(item.kind, ItemKind::Simple);
        assert_eq!(item.stock_status, StockStatus::InStock);
        assert!(item.categories.contains(&TermId::new(3)));
    }

    #[test]
    fn test_in_memory_catalog() {
        let catalog = InMemoryCatalog::with_items([
            CatalogItem::new(1, "A"),
            CatalogItem::new(2, "B"),
        ]);
        assert_eq!(catalog.len(), 2);
        assert_eq!(catalog.item(ItemId::new(2)).unwrap().title, "B");

        catalog.remove(ItemId::new(2));
        assert!(catalog.item(ItemId::new(2)).is_none());
        assert_eq!(catalog.ids(), vec![ItemId::new(1)]);
    }
}
