pub mod health_handlers;
pub mod media_handlers;
pub mod recycle_bin_handlers;
