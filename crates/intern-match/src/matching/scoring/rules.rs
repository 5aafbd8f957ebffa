use super::super::domain::{Opportunity, Student};
use super::tokens::{normalize_scalar, optional_token_set, token_set};
use super::ScoreBreakdown;

/// Computes the four unweighted sub-metrics for a pair.
pub(crate) fn breakdown(student: &Student, opportunity: &Opportunity) -> ScoreBreakdown {
    ScoreBreakdown {
        skill_overlap: skill_overlap(student, opportunity),
        sector_match: indicator(sector_match(student, opportunity)),
        location_match: indicator(location_match(student, opportunity)),
        affirmative: indicator(affirmative_match(student, opportunity)),
    }
}

/// Share of the student's skills found in the opportunity's description and sector tags.
///
/// Description prose and sector tags form a single keyword pool, so a skill matches when
/// it equals a whole comma-separated fragment of either field.
fn skill_overlap(student: &Student, opportunity: &Opportunity) -> f64 {
    let student_skills = optional_token_set(student.skills.as_deref());
    if student_skills.is_empty() {
        return 0.0;
    }

    let pool = format!(
        "{},{}",
        opportunity.description.as_deref().unwrap_or_default(),
        opportunity.sector.as_deref().unwrap_or_default()
    );
    let keywords = token_set(&pool);

    let common = student_skills.intersection(&keywords).count();
    common as f64 / student_skills.len() as f64
}

/// Skills double as sector interests; any shared tag counts.
fn sector_match(student: &Student, opportunity: &Opportunity) -> bool {
    let interests = optional_token_set(student.skills.as_deref());
    let sectors = optional_token_set(opportunity.sector.as_deref());
    interests.iter().any(|interest| sectors.contains(interest))
}

fn location_match(student: &Student, opportunity: &Opportunity) -> bool {
    let preferences = optional_token_set(student.location_preferences.as_deref());
    let location = normalize_scalar(opportunity.location.as_deref());
    preferences.contains(&location)
}

fn affirmative_match(student: &Student, opportunity: &Opportunity) -> bool {
    match (opportunity.affirmative_category, student.category) {
        (Some(reserved), Some(category)) => reserved == category,
        _ => false,
    }
}

fn indicator(hit: bool) -> f64 {
    if hit {
        1.0
    } else {
        0.0
    }
}
