use serde::{Deserialize, Serialize};

/// Who is sitting the assessment. Captured at login; the domain is attached
/// once at domain selection and the identity is not modified afterwards.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CandidateIdentity {
    pub full_name: String,
    pub phone: String,
    pub registration_no: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub domain: Option<String>,
}

impl CandidateIdentity {
    pub fn with_domain(self, domain: impl Into<String>) -> Self {
        Self {
            domain: Some(domain.into()),
            ..self
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_domain_is_omitted_until_selected() {
        let identity = CandidateIdentity {
            full_name: "Asha Rao".to_string(),
            phone: "9876543210".to_string(),
            registration_no: "REG001".to_string(),
            domain: None,
        };
        let json = serde_json::to_value(&identity).unwrap();
        assert!(json.get("domain").is_none());

        let json = serde_json::to_value(identity.with_domain("Finance")).unwrap();
        assert_eq!(json["domain"], "Finance");
    }
}
