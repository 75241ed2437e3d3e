pub mod lookup;
pub mod media_service;
pub mod recycle_bin_query_service;
pub mod scope;
