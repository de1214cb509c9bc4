use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use super::error::DomainError;

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub(crate) struct PersonalInfo {
    pub(crate) name: String,
    pub(crate) role: String,
    pub(crate) bio: String,
    pub(crate) email: String,
    pub(crate) github: String,
    pub(crate) linkedin: String,
    pub(crate) resume_url: Option<String>,
    pub(crate) profile_image: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub(crate) struct SkillItem {
    pub(crate) name: String,
    pub(crate) level: i32,
    pub(crate) description: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub(crate) struct SkillCategory {
    pub(crate) category: String,
    pub(crate) icon: String,
    pub(crate) skills: Vec<SkillItem>,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub(crate) struct Project {
    pub(crate) title: String,
    pub(crate) subtitle: String,
    pub(crate) description: String,
    pub(crate) image: Option<String>,
    pub(crate) tech_stack: Vec<String>,
    pub(crate) demo_url: Option<String>,
    pub(crate) repo_url: Option<String>,
    pub(crate) year: String,
    pub(crate) impact: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub(crate) struct Experience {
    pub(crate) company: String,
    pub(crate) role: String,
    #[serde(rename = "type")]
    pub(crate) kind: String,
    pub(crate) duration: String,
    pub(crate) location: String,
    pub(crate) description: String,
    pub(crate) achievements: Vec<String>,
    pub(crate) technologies: Vec<String>,
}

/// The whole portfolio is one document; reads return it section by section.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub(crate) struct Portfolio {
    pub(crate) personal_info: PersonalInfo,
    pub(crate) skills: Vec<SkillCategory>,
    pub(crate) projects: Vec<Project>,
    pub(crate) experience: Vec<Experience>,
}

impl Portfolio {
    pub(crate) fn validate(self) -> Result<Self, DomainError> {
        if self.personal_info.name.trim().is_empty() {
            return Err(DomainError::Validation {
                field: "personal_info.name",
                message: "must not be empty",
            });
        }
        Ok(self)
    }
}

#[cfg(test)]
mod tests {
    use super::{PersonalInfo, Portfolio};

    pub(crate) fn sample_portfolio(name: &str) -> Portfolio {
        Portfolio {
            personal_info: PersonalInfo {
                name: name.to_string(),
                role: "Software Engineer".to_string(),
                bio: "bio".to_string(),
                email: "me@example.com".to_string(),
                github: "https://github.com/me".to_string(),
                linkedin: "https://linkedin.com/in/me".to_string(),
                resume_url: None,
                profile_image: None,
            },
            skills: Vec::new(),
            projects: Vec::new(),
            experience: Vec::new(),
        }
    }

    #[test]
    fn validate_rejects_blank_name() {
        assert!(sample_portfolio("  ").validate().is_err());
        assert!(sample_portfolio("Jane").validate().is_ok());
    }

    #[test]
    fn experience_kind_serializes_as_type() {
        let mut portfolio = sample_portfolio("Jane");
        portfolio.experience.push(super::Experience {
            company: "Acme".to_string(),
            role: "Engineer".to_string(),
            kind: "Full-time".to_string(),
            duration: "2020-2024".to_string(),
            location: "Remote".to_string(),
            description: "work".to_string(),
            achievements: Vec::new(),
            technologies: Vec::new(),
        });
        let json = serde_json::to_value(&portfolio).expect("serializes");
        assert_eq!(json["experience"][0]["type"], "Full-time");
    }
}
