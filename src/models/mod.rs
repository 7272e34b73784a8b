pub mod candidature;
pub mod enums;
pub mod statistics;
pub mod user;

pub use candidature::{Candidature, CandidatureField};
pub use enums::{
    ApplicationStatus, ContactChannel, ContractType, Priority, RemunerationType, TeleworkType,
};
