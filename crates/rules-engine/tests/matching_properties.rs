//! Property and scenario tests for rule matching

use proptest::prelude::*;
use rules_common::{CatalogItem, InMemoryCatalog, ItemId, RuleId, StockStatus};
use rules_engine::scope::fields;
use rules_engine::{
    ConfigStore, Dimension, InMemoryConfigStore, MatchContext, RuleEngine, ScopeConfig,
};
use serde_json::json;
use std::sync::Arc;

fn stock_status() -> impl Strategy<Value = StockStatus> {
    prop_oneof![
        Just(StockStatus::InStock),
        Just(StockStatus::OutOfStock),
        Just(StockStatus::OnBackorder),
    ]
}

prop_compose! {
    fn arb_item()(
        id in 1u64..10_000,
        title in "[A-Za-z0-9 ]{0,24}",
        price in proptest::option::of(0.0f64..10_000.0),
        stock in stock_status(),
        categories in proptest::collection::vec(1u64..50, 0..5),
        tags in proptest::collection::vec(1u64..50, 0..5),
        colors in proptest::collection::vec(1u64..50, 0..3),
    ) -> CatalogItem {
        let mut item = CatalogItem::new(id, title)
            .with_stock(stock)
            .in_categories(categories)
            .tagged(tags)
            .with_attribute("pa_color", colors);
        item.regular_price = price;
        item
    }
}

proptest! {
    #[test]
    fn unconstrained_scopes_accept_any_item(item in arb_item(), decimals in 0u32..5) {
        let ctx = MatchContext::new(decimals);
        for dimension in Dimension::ALL {
            prop_assert!(ScopeConfig::unconstrained(dimension).matches(&item, &ctx));
        }
    }

    #[test]
    fn rules_without_scope_match_every_item(item in arb_item(), rule in 1u64..1_000) {
        let id = item.id;
        let engine = RuleEngine::new(
            Arc::new(InMemoryCatalog::with_items([item])),
            Arc::new(InMemoryConfigStore::new()),
        );
        prop_assert!(engine.rule_matches(id, RuleId::new(rule)));
    }
}

#[test]
fn malformed_regex_from_storage_does_not_match() {
    let config = Arc::new(InMemoryConfigStore::new());
    let rule = RuleId::new(1);
    config.write(Dimension::Title, rule, fields::OPERATOR, json!("regex")).unwrap();
    config.write(Dimension::Title, rule, fields::PATTERN, json!("[unterminated")).unwrap();

    let engine = RuleEngine::new(
        Arc::new(InMemoryCatalog::with_items([CatalogItem::new(1, "[unterminated")])),
        config,
    );
    assert!(!engine.rule_matches(ItemId::new(1), rule));
}

#[test]
fn save_then_match_sees_new_configuration() {
    let engine = RuleEngine::new(
        Arc::new(InMemoryCatalog::with_items([
            CatalogItem::new(1, "Trail Shoe").with_price(89.0),
        ])),
        Arc::new(InMemoryConfigStore::new()),
    );
    let rule = RuleId::new(7);
    let item = ItemId::new(1);

    engine.write_scope_field(Dimension::Price, rule, fields::OPERATOR, json!("less_than")).unwrap();
    engine.write_scope_field(Dimension::Price, rule, fields::MAX, json!(50)).unwrap();
    assert!(!engine.rule_matches(item, rule));

    engine.write_scope_field(Dimension::Price, rule, fields::MAX, json!("100.00")).unwrap();
    assert!(engine.rule_matches(item, rule));
}
