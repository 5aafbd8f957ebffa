use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Identifier wrapper for student accounts.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct StudentId(pub String);

/// Identifier wrapper for published opportunities.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct OpportunityId(pub String);

/// Identifier wrapper for applications linking a student to an opportunity.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ApplicationId(pub String);

/// Identifier assigned by the result store to each persisted match.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct MatchResultId(pub String);

impl fmt::Display for StudentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl fmt::Display for OpportunityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl fmt::Display for ApplicationId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Reserved-seat category shared by students and opportunities.
///
/// Labels are matched exactly; the empty label means "no category" and is modelled as
/// `None` on the owning record rather than as a variant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AffirmativeCategory {
    General,
    Sc,
    St,
    Obc,
    Pwd,
}

impl AffirmativeCategory {
    pub const ALL: [AffirmativeCategory; 5] = [
        AffirmativeCategory::General,
        AffirmativeCategory::Sc,
        AffirmativeCategory::St,
        AffirmativeCategory::Obc,
        AffirmativeCategory::Pwd,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            AffirmativeCategory::General => "General",
            AffirmativeCategory::Sc => "SC",
            AffirmativeCategory::St => "ST",
            AffirmativeCategory::Obc => "OBC",
            AffirmativeCategory::Pwd => "PWD",
        }
    }

    /// Parses an optional label, treating the empty string as no category.
    pub fn parse_optional(raw: &str) -> Result<Option<Self>, UnknownCategory> {
        if raw.is_empty() {
            return Ok(None);
        }
        raw.parse().map(Some)
    }
}

impl fmt::Display for AffirmativeCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for AffirmativeCategory {
    type Err = UnknownCategory;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|category| category.label() == s)
            .ok_or_else(|| UnknownCategory(s.to_string()))
    }
}

impl Serialize for AffirmativeCategory {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.label())
    }
}

impl<'de> Deserialize<'de> for AffirmativeCategory {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        raw.parse().map_err(serde::de::Error::custom)
    }
}

/// Deserializes `null`, a missing field, or `""` as no category.
pub fn deserialize_optional_category<'de, D>(
    deserializer: D,
) -> Result<Option<AffirmativeCategory>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<String>::deserialize(deserializer)?;
    match raw {
        Some(value) => {
            AffirmativeCategory::parse_optional(&value).map_err(serde::de::Error::custom)
        }
        None => Ok(None),
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown affirmative category '{0}' (expected General, SC, ST, OBC or PWD)")]
pub struct UnknownCategory(pub String);

/// Student profile fields consumed by the scoring engine.
///
/// `skills` and `location_preferences` are free-text, comma-separated lists exactly as the
/// student entered them; normalization happens at scoring time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Student {
    pub id: StudentId,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub skills: Option<String>,
    #[serde(default)]
    pub location_preferences: Option<String>,
    #[serde(default, deserialize_with = "deserialize_optional_category")]
    pub category: Option<AffirmativeCategory>,
}

/// Published internship as seen by the scoring engine.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Opportunity {
    pub id: OpportunityId,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub company: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub sector: Option<String>,
    #[serde(default)]
    pub location: Option<String>,
    #[serde(default, deserialize_with = "deserialize_optional_category")]
    pub affirmative_category: Option<AffirmativeCategory>,
}

/// Link between a student and the opportunity they applied to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Application {
    pub id: ApplicationId,
    pub student_id: StudentId,
    pub opportunity_id: OpportunityId,
}

/// Application with its linked records looked up by the store.
///
/// Either side is `None` when the referenced record no longer exists.
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedApplication {
    pub application_id: ApplicationId,
    pub student: Option<Student>,
    pub opportunity: Option<Opportunity>,
}

impl ResolvedApplication {
    /// Both linked records, when the application is scoreable.
    pub fn pair(&self) -> Option<(&Student, &Opportunity)> {
        match (&self.student, &self.opportunity) {
            (Some(student), Some(opportunity)) => Some((student, opportunity)),
            _ => None,
        }
    }
}
