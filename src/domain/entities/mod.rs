pub mod billing_transactions;
pub mod buyers;
pub mod drip_events;
pub mod lead_deliveries;
pub mod leads;
