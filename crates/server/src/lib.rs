pub mod api;
pub mod metrics;
pub mod onebot;
pub mod state;
