//! Rule actions and the item view they produce
//!
//! Actions of matching rules are folded onto an [`ItemView`] in rule
//! priority order. The catalog item itself is never modified.

use rules_common::{CatalogItem, ItemId, RuleId};
use serde::{Deserialize, Serialize};

/// Where description content goes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ContentPosition {
    /// Prepend to the existing description
    Before,
    /// Append to the existing description
    After,
    /// Replace the description
    Replace,
}

impl Default for ContentPosition {
    fn default() -> Self {
        Self::After
    }
}

/// Gallery update mode
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GalleryMode {
    /// Add images after the existing ones
    Append,
    /// Replace the gallery
    Replace,
}

impl Default for GalleryMode {
    fn default() -> Self {
        Self::Append
    }
}

/// Price change
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "value", rename_all = "snake_case")]
pub enum PriceAdjustment {
    /// Relative change in percent (`-10` is ten percent off)
    Percent(f64),
    /// Absolute amount added (negative to subtract)
    Fixed(f64),
    /// New price
    Set(f64),
}

impl PriceAdjustment {
    /// Apply to a price, rounding to `decimals` and clamping at zero
    ///
    /// `None` stays `None` except for [`PriceAdjustment::Set`].
    pub fn apply(&self, price: Option<f64>, decimals: u32) -> Option<f64> {
        let adjusted = match *self {
            Self::Set(value) => value,
            Self::Percent(pct) => price? * (1.0 + pct / 100.0),
            Self::Fixed(amount) => price? + amount,
        };
        Some(round_to(adjusted.max(0.0), decimals))
    }
}

fn round_to(value: f64, decimals: u32) -> f64 {
    let factor = 10f64.powi(decimals.min(12) as i32);
    (value * factor).round() / factor
}

/// Mutation applied to an item when its rule matches
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum RuleAction {
    /// Conditional description content
    Description {
        /// Content to insert
        content: String,
        /// Insert position
        #[serde(default)]
        position: ContentPosition,
    },
    /// Price modification
    Price {
        /// Adjustment to apply
        adjustment: PriceAdjustment,
    },
    /// Title decoration
    Title {
        /// Text placed before the title
        #[serde(default)]
        prefix: String,
        /// Text placed after the title
        #[serde(default)]
        suffix: String,
    },
    /// Featured flag override
    Featured {
        /// New flag
        featured: bool,
    },
    /// Gallery images
    Gallery {
        /// Image ids
        image_ids: Vec<u64>,
        /// Append or replace
        #[serde(default)]
        mode: GalleryMode,
    },
}

/// Item as presented after applying rule actions
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ItemView {
    /// Item id
    pub id: ItemId,
    /// Title
    pub title: String,
    /// Description
    pub description: String,
    /// Effective price
    pub price: Option<f64>,
    /// Featured flag
    pub featured: bool,
    /// Gallery image ids
    pub gallery: Vec<u64>,
    /// Rules whose actions were applied, in application order
    pub applied_rules: Vec<RuleId>,
}

impl ItemView {
    /// Untouched view of an item
    pub fn from_item(item: &CatalogItem) -> Self {
        Self {
            id: item.id,
            title: item.title.clone(),
            description: item.description.clone(),
            price: item.effective_price(),
            featured: item.featured,
            gallery: item.gallery.clone(),
            applied_rules: Vec::new(),
        }
    }

    /// Apply every action of one rule, in declaration order
    pub fn apply_rule(&mut self, rule: RuleId, actions: &[RuleAction], decimals: u32) {
        for action in actions {
            self.apply(action, decimals);
        }
        self.applied_rules.push(rule);
    }

    /// Apply one action
    pub fn apply(&mut self, action: &RuleAction, decimals: u32) {
        match action {
            RuleAction::Description { content, position } => match position {
                ContentPosition::Before => self.description.insert_str(0, content),
                ContentPosition::After => self.description.push_str(content),
                ContentPosition::Replace => self.description = content.clone(),
            },
            RuleAction::Price { adjustment } => {
                self.price = adjustment.apply(self.price, decimals);
            }
            RuleAction::Title { prefix, suffix } => {
                self.title = format!("{prefix}{}{suffix}", self.title);
            }
            RuleAction::Featured { featured } => self.featured = *featured,
            RuleAction::Gallery { image_ids, mode } => match mode {
                GalleryMode::Append => {
                    for id in image_ids {
                        if !self.gallery.contains(id) {
                            self.gallery.push(*id);
                        }
                    }
                }
                GalleryMode::Replace => self.gallery = image_ids.clone(),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn view() -> ItemView {
        ItemView::from_item(
            &CatalogItem::new(1, "Kettle")
                .with_price(40.0)
                .with_description("Boils water."),
        )
    }

    #[test]
    fn test_price_adjustments() {
        assert_eq!(PriceAdjustment::Percent(-10.0).apply(Some(40.0), 2), Some(36.0));
        assert_eq!(PriceAdjustment::Fixed(-5.5).apply(Some(40.0), 2), Some(34.5));
        assert_eq!(PriceAdjustment::Fixed(-50.0).apply(Some(40.0), 2), Some(0.0));
        assert_eq!(PriceAdjustment::Set(19.99).apply(None, 2), Some(19.99));
        assert_eq!(PriceAdjustment::Percent(20.0).apply(None, 2), None);
    }

    #[test]
    fn test_description_positions() {
        let mut v = view();
        v.apply(
            &RuleAction::Description {
                content: "Sale! ".into(),
                position: ContentPosition::Before,
            },
            2,
        );
        v.apply(
            &RuleAction::Description {
                content: " Ships free.".into(),
                position: ContentPosition::After,
            },
            2,
        );
        assert_eq!(v.description, "Sale! Boils water. Ships free.");

        v.apply(
            &RuleAction::Description {
                content: "Gone.".into(),
                position: ContentPosition::Replace,
            },
            2,
        );
        assert_eq!(v.description, "Gone.");
    }

    #[test]
    fn test_title_featured_gallery() {
        let mut v = view();
        v.apply_rule(
            RuleId::new(3),
            &[
                RuleAction::Title {
                    prefix: "[New] ".into(),
                    suffix: String::new(),
                },
                RuleAction::Featured { featured: true },
                RuleAction::Gallery {
                    image_ids: vec![10, 11],
                    mode: GalleryMode::Append,
                },
                RuleAction::Gallery {
                    image_ids: vec![11, 12],
                    mode: GalleryMode::Append,
                },
            ],
            2,
        );

        assert_eq!(v.title, "[New] Kettle");
        assert!(v.featured);
        assert_eq!(v.gallery, vec![10, 11, 12]);
        assert_eq!(v.applied_rules, vec![RuleId::new(3)]);
    }

    #[test]
    fn test_action_deserializes_from_tagged_json() {
        let action: RuleAction = serde_json::from_str(
            r#"{"type": "price", "adjustment": {"kind": "percent", "value": -15}}"#,
        )
        .unwrap();
        assert_eq!(
            action,
            RuleAction::Price {
                adjustment: PriceAdjustment::Percent(-15.0)
            }
        );
    }
}
