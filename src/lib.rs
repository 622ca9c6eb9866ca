pub mod analysis;
pub mod api;
pub mod config;
pub mod presenter;
pub mod session;
pub mod storage;
pub mod theme;
pub mod utils;
