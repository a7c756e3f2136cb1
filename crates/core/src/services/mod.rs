pub mod bucket_service;
pub mod chart_service;
pub mod flow_service;
pub mod format_service;
pub mod polling_service;
