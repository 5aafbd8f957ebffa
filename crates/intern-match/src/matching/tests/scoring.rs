use super::common::*;
use crate::matching::domain::{AffirmativeCategory, Opportunity, Student};
use crate::matching::{round_score, MatchWeights, ScoreBreakdown, ScoringEngine};

#[test]
fn worked_example_scores_three_quarters() {
    let outcome = engine().score(&scenario_student(), &scenario_opportunity());

    assert_close(outcome.breakdown.skill_overlap, 0.5);
    assert_eq!(outcome.breakdown.sector_match, 1.0);
    assert_eq!(outcome.breakdown.location_match, 1.0);
    assert_eq!(outcome.breakdown.affirmative, 1.0);
    assert_close(outcome.score, 0.75);
}

#[test]
fn empty_skills_zero_out_skill_and_sector_terms() {
    let student = Student {
        skills: Some(String::new()),
        ..scenario_student()
    };
    let heavy = ScoringEngine::new(MatchWeights {
        skill: 5.0,
        sector: 5.0,
        location: 0.0,
        affirmative: 0.0,
    });

    let outcome = heavy.score(&student, &scenario_opportunity());

    assert_eq!(outcome.breakdown.skill_overlap, 0.0);
    assert_eq!(outcome.breakdown.sector_match, 0.0);
    assert_eq!(outcome.score, 0.0);
}

#[test]
fn missing_fields_are_treated_as_empty() {
    let student = Student {
        skills: None,
        location_preferences: None,
        category: None,
        ..scenario_student()
    };
    let opportunity = Opportunity {
        description: None,
        sector: None,
        location: None,
        affirmative_category: None,
        ..scenario_opportunity()
    };

    let outcome = engine().score(&student, &opportunity);

    assert_eq!(
        outcome.breakdown,
        ScoreBreakdown {
            skill_overlap: 0.0,
            sector_match: 0.0,
            location_match: 0.0,
            affirmative: 0.0,
        }
    );
    assert_eq!(outcome.score, 0.0);
}

#[test]
fn skill_overlap_stays_within_unit_interval() {
    let cases = [
        ("python", "python", "python"),
        ("python, python, PYTHON", "python", ""),
        ("a, b, c", "a", "b, c, d, e"),
        ("rust, go", "", ""),
        ("x", "y, z", "w"),
    ];

    for (skills, description, sector) in cases {
        let student = student("stu-bounds", skills, "");
        let opportunity = opportunity("opp-bounds", description, sector, "");
        let overlap = engine().score(&student, &opportunity).breakdown.skill_overlap;
        assert!(
            (0.0..=1.0).contains(&overlap),
            "overlap {overlap} out of range for {skills:?}"
        );
    }
}

#[test]
fn skill_overlap_counts_deduplicated_skills() {
    let student = student("stu-dup", "Python, python , sql", "");
    let opportunity = opportunity("opp-dup", "python", "", "");

    let outcome = engine().score(&student, &opportunity);

    assert_close(outcome.breakdown.skill_overlap, 0.5);
}

#[test]
fn description_fragments_only_match_whole_comma_tokens() {
    let student = student("stu-prose", "python", "");
    let prose = opportunity("opp-prose", "work on python services", "Backend", "");
    let listed = opportunity("opp-listed", "work on services, python", "Backend", "");

    assert_eq!(engine().score(&student, &prose).breakdown.skill_overlap, 0.0);
    assert_eq!(engine().score(&student, &listed).breakdown.skill_overlap, 1.0);
}

#[test]
fn sector_match_uses_skills_as_interests() {
    let student = student("stu-sector", "finance, excel", "");
    let opportunity = opportunity("opp-sector", "spreadsheets", "Finance, Web Development", "");

    let outcome = engine().score(&student, &opportunity);

    assert_eq!(outcome.breakdown.sector_match, 1.0);
    assert_close(outcome.breakdown.skill_overlap, 0.5);
}

#[test]
fn location_requires_exact_normalized_match() {
    let student = student("stu-loc", "", " Bengaluru , Remote");
    let exact = opportunity("opp-exact", "", "", "  BENGALURU ");
    let partial = opportunity("opp-partial", "", "", "Bengaluru North");

    assert_eq!(engine().score(&student, &exact).breakdown.location_match, 1.0);
    assert_eq!(engine().score(&student, &partial).breakdown.location_match, 0.0);
}

#[test]
fn affirmative_requires_both_categories_to_agree() {
    let mut student = scenario_student();
    let mut opportunity = scenario_opportunity();
    assert_eq!(engine().score(&student, &opportunity).breakdown.affirmative, 1.0);

    student.category = Some(AffirmativeCategory::Obc);
    assert_eq!(engine().score(&student, &opportunity).breakdown.affirmative, 0.0);

    student.category = None;
    assert_eq!(engine().score(&student, &opportunity).breakdown.affirmative, 0.0);

    student.category = Some(AffirmativeCategory::Sc);
    opportunity.affirmative_category = None;
    assert_eq!(engine().score(&student, &opportunity).breakdown.affirmative, 0.0);
}

#[test]
fn scoring_is_deterministic() {
    let engine = engine();
    let first = engine.score(&scenario_student(), &scenario_opportunity());
    let second = engine.score(&scenario_student(), &scenario_opportunity());
    assert_eq!(first, second);
}

#[test]
fn doubling_a_weight_doubles_its_contribution() {
    let student = student("stu-linear", "python, react, sql", "Pune");
    let opportunity = opportunity("opp-linear", "python", "Data", "Mumbai");
    let base = MatchWeights {
        skill: 0.3,
        sector: 0.0,
        location: 0.0,
        affirmative: 0.0,
    };
    let doubled = MatchWeights {
        skill: 0.6,
        ..base
    };

    let breakdown = engine().score(&student, &opportunity).breakdown;
    let single = breakdown.weighted_sum(&base);
    let double = breakdown.weighted_sum(&doubled);

    assert_close(double, 2.0 * single);
    assert_close(ScoringEngine::new(base).score(&student, &opportunity).score, 0.1);
    assert_close(ScoringEngine::new(doubled).score(&student, &opportunity).score, 0.2);
}

#[test]
fn oversized_weights_are_not_normalized() {
    let generous = ScoringEngine::new(MatchWeights {
        skill: 1.0,
        sector: 1.0,
        location: 1.0,
        affirmative: 1.0,
    });

    let outcome = generous.score(&scenario_student(), &scenario_opportunity());

    assert_close(outcome.score, 3.5);
    assert_close(outcome.breakdown.skill_overlap, 0.5);
}

#[test]
fn score_is_rounded_but_breakdown_is_not() {
    let student = student("stu-third", "python, react, sql", "");
    let opportunity = opportunity("opp-third", "python", "", "");

    let outcome = engine().score(&student, &opportunity);

    assert_close(outcome.breakdown.skill_overlap, 1.0 / 3.0);
    assert_close(outcome.score, 0.17);
}

#[test]
fn rounded_scores_have_at_most_two_decimals() {
    for raw in [0.0, 0.125, 0.333_333, 0.666_666, 0.755, 1.0 / 7.0, 2.499_9] {
        let rounded = round_score(raw);
        let scaled = rounded * 100.0;
        assert_close(scaled, scaled.round());
    }
    assert_close(round_score(0.125), 0.13);
    assert_close(round_score(-0.125), -0.13);
}

#[test]
fn explanation_uses_camel_case_keys() {
    let outcome = engine().score(&scenario_student(), &scenario_opportunity());
    let explanation = outcome.breakdown.explanation().expect("breakdown encodes");
    let parsed: serde_json::Value = serde_json::from_str(&explanation).expect("valid json");
    let object = parsed.as_object().expect("json object");

    let mut keys: Vec<&str> = object.keys().map(String::as_str).collect();
    keys.sort_unstable();
    assert_eq!(
        keys,
        vec!["affirmative", "locationMatch", "sectorMatch", "skillOverlap"]
    );
    assert_eq!(object["skillOverlap"].as_f64(), Some(0.5));
    assert_eq!(object["affirmative"].as_f64(), Some(1.0));
}

#[test]
fn default_weights_sum_to_one() {
    assert_close(MatchWeights::default().sum(), 1.0);
}
