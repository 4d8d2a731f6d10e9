use serde::Serialize;

/// A professional field a candidate can be assessed in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Domain {
    pub id: &'static str,
    pub title: &'static str,
    pub description: &'static str,
}

pub const DOMAINS: &[Domain] = &[
    Domain { id: "hr", title: "HR Services", description: "Human Resource Management" },
    Domain { id: "finance", title: "Finance", description: "Financial Operations & Analysis" },
    Domain { id: "company-secretary", title: "Company Secretary", description: "Corporate Governance & Compliance" },
    Domain { id: "software-dev", title: "Software Developer", description: "Full Stack Development" },
    Domain { id: "qa-tester", title: "QA Tester", description: "Quality Assurance & Testing" },
    Domain { id: "management", title: "Management Services", description: "Business Operations & Strategy" },
    Domain { id: "business-analyst", title: "Business Analyst", description: "Data Analysis & Insights" },
    Domain { id: "frontend", title: "Frontend Developer", description: "UI/UX & Web Development" },
    Domain { id: "backend", title: "Backend Developer", description: "Server-side & APIs" },
    Domain { id: "data-science", title: "Data Science", description: "ML & Data Engineering" },
    Domain { id: "cybersecurity", title: "Cybersecurity", description: "Security & Threat Analysis" },
    Domain { id: "marketing", title: "Digital Marketing", description: "Marketing & Growth" },
];

/// Resolves a domain by id or title, ignoring case and surrounding whitespace.
pub fn resolve_domain(input: &str) -> Option<&'static Domain> {
    let needle = input.trim();
    if needle.is_empty() {
        return None;
    }
    DOMAINS
        .iter()
        .find(|d| d.id.eq_ignore_ascii_case(needle) || d.title.eq_ignore_ascii_case(needle))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolve_by_title_and_id() {
        assert_eq!(resolve_domain("Backend Developer").unwrap().id, "backend");
        assert_eq!(resolve_domain("backend").unwrap().title, "Backend Developer");
    }

    #[test]
    fn test_resolve_is_case_insensitive() {
        assert_eq!(resolve_domain("  qa tester ").unwrap().id, "qa-tester");
    }

    #[test]
    fn test_unknown_domain() {
        assert!(resolve_domain("Astronaut").is_none());
        assert!(resolve_domain("   ").is_none());
    }

    #[test]
    fn test_ids_are_unique() {
        let mut ids: Vec<_> = DOMAINS.iter().map(|d| d.id).collect();
        ids.sort_unstable();
        ids.dedup();
        assert_eq!(ids.len(), DOMAINS.len());
    }
}
