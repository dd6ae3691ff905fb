pub mod drip_worker;
