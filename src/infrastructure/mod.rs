pub mod analytics;
pub mod axum_http;
pub mod background_worker;
pub mod ledger;
pub mod notification;
