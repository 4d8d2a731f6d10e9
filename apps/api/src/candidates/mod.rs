// Candidate portal: identity capture, login validation and the domain catalogue.

pub mod domains;
pub mod handlers;
pub mod models;
pub mod validation;

pub use models::CandidateIdentity;
