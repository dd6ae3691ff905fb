pub mod budget_bands;
pub mod delivery_methods;
pub mod delivery_statuses;
pub mod drip_templates;
pub mod lead_statuses;
pub mod transaction_kinds;
pub mod urgency_tiers;
