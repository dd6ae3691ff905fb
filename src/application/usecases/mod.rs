pub mod billing;
pub mod buyer_admin;
pub mod drip;
pub mod lead_delivery;
pub mod lead_intake;
pub mod leads;
