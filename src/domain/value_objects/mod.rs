pub mod billing;
pub mod buyers;
pub mod deliveries;
pub mod enums;
pub mod ids;
pub mod leads;
pub mod routing;
pub mod scoring;
