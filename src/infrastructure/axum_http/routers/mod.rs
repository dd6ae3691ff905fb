pub mod analytics;
pub mod billing;
pub mod buyers;
pub mod drip;
pub mod leads;
