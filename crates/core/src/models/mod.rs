pub mod analytics;
pub mod chart;
pub mod currency;
pub mod order;
pub mod settings;
