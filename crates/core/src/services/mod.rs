pub mod analytics_service;
pub mod chart_service;
pub mod currency_service;
pub mod order_service;
