pub mod analysis;
pub mod complaint;
pub mod config;
pub mod notify;
pub mod storage;
pub mod web;
