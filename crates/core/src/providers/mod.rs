pub mod query;
pub mod traits;

// HTTP implementation
pub mod cloud_functions;
