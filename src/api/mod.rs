pub mod abilities;
pub mod endpoints;
pub mod http;
pub mod live_match;
pub mod models;
pub mod static_data;
pub mod videos;
