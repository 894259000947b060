pub mod config;
pub mod logging;

pub mod dispatch;
pub mod fetch;
pub mod filename;
pub mod materials;
pub mod proxy;
