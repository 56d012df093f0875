//! Bid-to-plan projection.
//!
//! A priced bid's current version is projected one time into a new
//! production plan: the bid's trade picks the plan's active section,
//! client contact fields carry over, the grand total becomes the plan's
//! sale price, and each bid line item becomes a plan line item with a
//! stable, human-traceable `field_key`.
//!
//! This module is the pure mapping only; loading the bid, creating the
//! plan row, and the convert-at-most-once guard live with the callers.

use serde::Serialize;

use crate::trade::{SectionFlags, Trade};
use crate::types::DbId;

/// Maximum length of a slug-derived field key.
const MAX_FIELD_KEY_LEN: usize = 50;

/// The bid fields the projection reads.
#[derive(Debug, Clone)]
pub struct BidSnapshot {
    pub trade: Trade,
    pub client_name: String,
    pub client_email: Option<String>,
    pub client_phone: Option<String>,
    pub client_address: Option<String>,
    pub grand_total: f64,
}

/// One line item of the bid's current version, in (section, sort_order)
/// order as loaded from storage.
#[derive(Debug, Clone)]
pub struct BidItemSnapshot {
    pub description: String,
    pub quantity: f64,
    pub unit: Option<String>,
    pub line_total: f64,
    pub price_list_item_id: Option<DbId>,
}

/// Plan header fields produced by the projection.
#[derive(Debug, Serialize)]
pub struct PlanDraft {
    pub flags: SectionFlags,
    pub client_name: String,
    pub client_email: Option<String>,
    pub client_phone: Option<String>,
    pub client_address: Option<String>,
    pub sale_price: f64,
}

/// One derived plan line item.
#[derive(Debug, Serialize)]
pub struct PlanItemDraft {
    pub section: &'static str,
    pub field_key: String,
    pub options: Option<serde_json::Value>,
    pub description: String,
    pub amount: f64,
    pub sort_order: i32,
    pub price_list_item_id: Option<DbId>,
}

/// Project a bid and its current line items into plan drafts.
pub fn bid_to_plan(bid: &BidSnapshot, items: &[BidItemSnapshot]) -> (PlanDraft, Vec<PlanItemDraft>) {
    let section = bid.trade.plan_section();

    let draft = PlanDraft {
        flags: SectionFlags::for_trade(bid.trade),
        client_name: bid.client_name.clone(),
        client_email: bid.client_email.clone(),
        client_phone: bid.client_phone.clone(),
        client_address: bid.client_address.clone(),
        sale_price: bid.grand_total,
    };

    let item_drafts = items
        .iter()
        .enumerate()
        .map(|(index, item)| project_item(section, index, item))
        .collect();

    (draft, item_drafts)
}

fn project_item(section: &'static str, index: usize, item: &BidItemSnapshot) -> PlanItemDraft {
    let (field_key, options) = if item.price_list_item_id.is_some() {
        let key = format!("{}_catalog_{}", section, index + 1);
        let options = serde_json::json!({
            "quantity": item.quantity,
            "unit": item.unit,
            "unit_price": unit_price(item.line_total, item.quantity),
        });
        (key, Some(options))
    } else {
        (slugify(&item.description), None)
    };

    PlanItemDraft {
        section,
        field_key,
        options,
        description: item.description.clone(),
        amount: item.line_total,
        sort_order: index as i32,
        price_list_item_id: item.price_list_item_id,
    }
}

/// Unit price for a catalog-linked item. A zero or negative quantity is
/// treated as 1 so the stored price stays finite.
fn unit_price(line_total: f64, quantity: f64) -> f64 {
    if quantity > 0.0 {
        line_total / quantity
    } else {
        line_total
    }
}

/// Lowercase, strip non-alphanumerics, spaces to underscores, capped at
/// 50 characters. Keeps field keys for custom items stable and readable.
pub fn slugify(description: &str) -> String {
    let mut slug = String::new();
    for ch in description.chars() {
        if slug.len() >= MAX_FIELD_KEY_LEN {
            break;
        }
        if ch.is_ascii_alphanumeric() {
            slug.extend(ch.to_lowercase());
        } else if ch == ' ' && !slug.ends_with('_') && !slug.is_empty() {
            slug.push('_');
        }
    }
    while slug.ends_with('_') {
        slug.pop();
    }
    slug
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bid(trade: Trade, grand_total: f64) -> BidSnapshot {
        BidSnapshot {
            trade,
            client_name: "Dana Whitfield".into(),
            client_email: Some("dana@example.com".into()),
            client_phone: None,
            client_address: Some("14 Larch Ave".into()),
            grand_total,
        }
    }

    fn catalog_item(description: &str, quantity: f64, line_total: f64) -> BidItemSnapshot {
        BidItemSnapshot {
            description: description.into(),
            quantity,
            unit: Some("sq".into()),
            line_total,
            price_list_item_id: Some(7),
        }
    }

    fn custom_item(description: &str, line_total: f64) -> BidItemSnapshot {
        BidItemSnapshot {
            description: description.into(),
            quantity: 1.0,
            unit: None,
            line_total,
            price_list_item_id: None,
        }
    }

    #[test]
    fn roof_bid_scenario() {
        let (draft, items) = bid_to_plan(
            &bid(Trade::Roof, 12500.0),
            &[
                catalog_item("Architectural shingles", 3.0, 450.0),
                custom_item("Flashing repair", 200.0),
            ],
        );

        assert!(draft.flags.has_roof);
        assert_eq!(draft.sale_price, 12500.0);

        assert_eq!(items.len(), 2);
        assert_eq!(items[0].section, "roof");
        assert_eq!(items[0].field_key, "roof_catalog_1");
        let options = items[0].options.as_ref().unwrap();
        assert_eq!(options["unit_price"], 150.0);
        assert_eq!(options["quantity"], 3.0);

        assert_eq!(items[1].section, "roof");
        assert_eq!(items[1].field_key, "flashing_repair");
        assert!(items[1].options.is_none());
        assert_eq!(items[1].amount, 200.0);
        assert_eq!(items[1].sort_order, 1);
    }

    #[test]
    fn fascia_soffit_lands_in_siding() {
        let (draft, items) = bid_to_plan(
            &bid(Trade::FasciaSoffit, 3100.0),
            &[custom_item("Soffit vent replacement", 3100.0)],
        );
        assert!(draft.flags.has_siding);
        assert!(!draft.flags.has_roof);
        assert_eq!(items[0].section, "siding");
    }

    #[test]
    fn zero_quantity_guards_unit_price() {
        let (_, items) = bid_to_plan(
            &bid(Trade::Gutters, 900.0),
            &[catalog_item("Downspout run", 0.0, 900.0)],
        );
        let options = items[0].options.as_ref().unwrap();
        assert_eq!(options["unit_price"], 900.0);
    }

    #[test]
    fn empty_item_list_projects_empty_plan() {
        let (draft, items) = bid_to_plan(&bid(Trade::Windows, 0.0), &[]);
        assert!(draft.flags.has_windows);
        assert!(items.is_empty());
    }

    #[test]
    fn slugify_strips_and_caps() {
        assert_eq!(slugify("Flashing repair"), "flashing_repair");
        assert_eq!(slugify("Tear-off & haul away (2 layers)"), "tearoff_haul_away_2_layers");
        assert_eq!(slugify("  Spaced   out  "), "spaced_out");
        let long = "x".repeat(80);
        assert_eq!(slugify(&long).len(), MAX_FIELD_KEY_LEN);
    }
}
