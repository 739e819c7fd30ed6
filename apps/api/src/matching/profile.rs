//! Candidate profile produced by the extraction call.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Résumé sections the extraction prompt asks for, in output order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProfileSection {
    Exp,
    Language,
    Education,
    ProfSkillAdvanced,
    ProfSkillBasic,
    SoftSkill,
    Certs,
    Achievements,
    RelevantProjects,
    Activities,
}

impl ProfileSection {
    pub const ALL: [ProfileSection; 10] = [
        ProfileSection::Exp,
        ProfileSection::Language,
        ProfileSection::Education,
        ProfileSection::ProfSkillAdvanced,
        ProfileSection::ProfSkillBasic,
        ProfileSection::SoftSkill,
        ProfileSection::Certs,
        ProfileSection::Achievements,
        ProfileSection::RelevantProjects,
        ProfileSection::Activities,
    ];

    pub const fn key(self) -> &'static str {
        match self {
            ProfileSection::Exp => "exp",
            ProfileSection::Language => "language",
            ProfileSection::Education => "education",
            ProfileSection::ProfSkillAdvanced => "prof_skill_advanced",
            ProfileSection::ProfSkillBasic => "prof_skill_basic",
            ProfileSection::SoftSkill => "soft_skill",
            ProfileSection::Certs => "certs",
            ProfileSection::Achievements => "achievements",
            ProfileSection::RelevantProjects => "relevant_projects",
            ProfileSection::Activities => "activities",
        }
    }

    /// Extraction principle for sections that need one. Skill sections are self-describing.
    pub const fn principle(self) -> Option<&'static str> {
        match self {
            ProfileSection::Exp => Some(
                "Specifying years of experience for each specific roles, jobs and areas. \
                 Don't need to specify the total years of experience.",
            ),
            ProfileSection::Language => Some("All information about non-native language levels"),
            ProfileSection::Education => Some(
                "All information about educational background, including degrees obtained \
                 and institutions attended.",
            ),
            ProfileSection::Certs => Some(
                "All certifications about courses like coursera, licenses, or professional \
                 qualifications.",
            ),
            ProfileSection::Achievements => {
                Some("All achievements, awards, or recognitions received.")
            }
            ProfileSection::RelevantProjects => Some(
                "All projects that are relevant to the job position, including roles and \
                 contributions.",
            ),
            ProfileSection::Activities => {
                Some("All extracurricular activities or community involvement.")
            }
            ProfileSection::ProfSkillAdvanced
            | ProfileSection::ProfSkillBasic
            | ProfileSection::SoftSkill => None,
        }
    }

    /// Label used in the extraction prompt's principle list.
    pub const fn label(self) -> &'static str {
        match self {
            ProfileSection::Exp => "Experience",
            ProfileSection::Language => "Language",
            ProfileSection::Education => "Education",
            ProfileSection::ProfSkillAdvanced => "Advanced Professional Skills",
            ProfileSection::ProfSkillBasic => "Basic Professional Skills",
            ProfileSection::SoftSkill => "Soft Skills",
            ProfileSection::Certs => "Certs",
            ProfileSection::Achievements => "Achievements",
            ProfileSection::RelevantProjects => "Relevant Projects",
            ProfileSection::Activities => "Activities",
        }
    }
}

/// Structured résumé extraction. Opaque to the scoring core: it is forwarded verbatim
/// to the scoring call and never inspected field by field.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CandidateProfile(Map<String, Value>);

impl CandidateProfile {
    /// Accepts any JSON object; anything else is not a profile.
    pub fn from_value(value: Value) -> Option<Self> {
        match value {
            Value::Object(fields) => Some(Self(fields)),
            _ => None,
        }
    }

    pub fn as_map(&self) -> &Map<String, Value> {
        &self.0
    }
}
