use crate::candidates::CandidateIdentity;
use crate::errors::AppError;

pub const MIN_PHONE_LEN: usize = 10;

/// Validates login fields and returns the identity with whitespace trimmed.
///
/// FAIL conditions:
/// - any of name, phone, registration number blank
/// - phone shorter than 10 characters
pub fn validate_identity(identity: &CandidateIdentity) -> Result<CandidateIdentity, AppError> {
    let full_name = identity.full_name.trim();
    let phone = identity.phone.trim();
    let registration_no = identity.registration_no.trim();

    if full_name.is_empty() || phone.is_empty() || registration_no.is_empty() {
        return Err(AppError::Validation("Please fill in all fields".to_string()));
    }

    if phone.chars().count() < MIN_PHONE_LEN {
        return Err(AppError::Validation(
            "Please enter a valid phone number".to_string(),
        ));
    }

    Ok(CandidateIdentity {
        full_name: full_name.to_string(),
        phone: phone.to_string(),
        registration_no: registration_no.to_string(),
        domain: identity.domain.clone(),
    })
}
