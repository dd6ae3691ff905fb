pub mod billing;
pub mod buyers;
pub mod drip_queue;
pub mod lead_deliveries;
pub mod leads;
