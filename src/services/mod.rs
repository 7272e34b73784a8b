pub mod api_client;
pub mod auth_service;
pub mod candidature_service;
pub mod statistics_service;
pub mod user_data_service;
