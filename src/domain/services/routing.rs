use chrono::NaiveDate;

use crate::domain::{
    entities::{buyers::BuyerEntity, leads::LeadEntity},
    value_objects::routing::RoutingContext,
};

/// Lowercases and collapses whitespace to underscores so free-text service
/// names match the keys stored on buyers ("Interior Painting" ->
/// "interior_painting").
pub fn normalize_service(service: &str) -> String {
    service
        .to_lowercase()
        .split_whitespace()
        .collect::<Vec<_>>()
        .join("_")
}

/// Picks at most one buyer for a scored lead.
///
/// A candidate must be active, accept the lead's score and service, have
/// headroom under its daily cap (the counter reads as 0 when its date is not
/// today), hold enough credit for one delivery, and match the postal prefix
/// when both sides carry one. The survivor with the highest
/// `min_score * 100 - delivered_today` wins: stricter buyers get preference,
/// and among equals volume spreads toward whoever has received less today.
/// Equal priorities resolve to the earlier buyer in directory order; the
/// stable sort makes that tie-break a contract, not an accident.
pub fn select_buyer(
    buyers: &[BuyerEntity],
    lead: &LeadEntity,
    ctx: &RoutingContext,
    today: NaiveDate,
) -> Option<BuyerEntity> {
    let service_key = normalize_service(&lead.service);

    let mut candidates: Vec<(i64, &BuyerEntity)> = Vec::new();
    for buyer in buyers {
        if !buyer.active {
            continue;
        }
        if lead.normalized_score < buyer.min_score {
            continue;
        }
        if !buyer.services.is_empty() && !buyer.services.iter().any(|s| *s == service_key) {
            continue;
        }
        if buyer.effective_delivered_today(today) >= buyer.daily_cap {
            continue;
        }
        if buyer.credit_cents < buyer.price_per_lead_cents {
            continue;
        }
        if let Some(postal_code) = ctx.postal_code.as_deref() {
            if !buyer.postal_prefixes.is_empty() {
                let postal_code = postal_code.to_uppercase();
                let matched = buyer
                    .postal_prefixes
                    .iter()
                    .any(|prefix| postal_code.starts_with(&prefix.to_uppercase()));
                if !matched {
                    continue;
                }
            }
        }

        let priority = i64::from(buyer.min_score) * 100 - i64::from(buyer.delivered_today);
        candidates.push((priority, buyer));
    }

    candidates.sort_by(|a, b| b.0.cmp(&a.0));
    candidates.first().map(|(_, buyer)| (*buyer).clone())
}
