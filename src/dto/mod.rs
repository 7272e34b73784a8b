pub mod auth_dto;
pub mod candidature_dto;
