pub mod category;
pub mod chain;
pub mod chart;
pub mod filter;
pub mod settings;
pub mod stats;
