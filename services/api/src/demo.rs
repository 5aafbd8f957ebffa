use crate::infra::{load_dataset, InMemoryApplicationStore, InMemoryMatchResultRepository};
use clap::Args;
use intern_match::config::AppConfig;
use intern_match::error::AppError;
use intern_match::matching::{
    AffirmativeCategory, Application, ApplicationId, MatchDataset, MatchResultView, MatchScore,
    MatchWeights, MatchingService, Opportunity, OpportunityId, ScoringEngine, Student, StudentId,
};
use std::path::PathBuf;
use std::sync::Arc;

#[derive(Args, Debug, Default)]
pub(crate) struct ScoreArgs {
    /// Comma-separated student skills, e.g. "python, sql"
    #[arg(long, default_value = "")]
    pub(crate) skills: String,
    /// Comma-separated preferred locations
    #[arg(long, default_value = "")]
    pub(crate) locations: String,
    /// Student category (General, SC, ST, OBC, PWD)
    #[arg(long, value_parser = parse_category)]
    pub(crate) category: Option<AffirmativeCategory>,
    /// Opportunity description
    #[arg(long, default_value = "")]
    pub(crate) description: String,
    /// Comma-separated opportunity sector tags
    #[arg(long, default_value = "")]
    pub(crate) sector: String,
    /// Opportunity location
    #[arg(long, default_value = "")]
    pub(crate) location: String,
    /// Category the opportunity reserves places for
    #[arg(long, value_parser = parse_category)]
    pub(crate) reserved_for: Option<AffirmativeCategory>,
}

#[derive(Args, Debug, Default)]
pub(crate) struct DemoArgs {
    /// JSON dataset to use instead of the bundled sample data
    #[arg(long)]
    pub(crate) seed: Option<PathBuf>,
    /// Number of ranked results to print
    #[arg(long, default_value_t = 10)]
    pub(crate) top: usize,
}

fn parse_category(raw: &str) -> Result<AffirmativeCategory, String> {
    raw.parse::<AffirmativeCategory>()
        .map_err(|err| err.to_string())
}

pub(crate) fn run_score(args: ScoreArgs) -> Result<(), AppError> {
    let config = AppConfig::load()?;
    let engine = ScoringEngine::new(config.matching.weights);
    let (student, opportunity) = adhoc_pair(args);

    let outcome = engine.score(&student, &opportunity);
    render_score(engine.weights(), &outcome);
    Ok(())
}

pub(crate) fn run_demo(args: DemoArgs) -> Result<(), AppError> {
    let DemoArgs { seed, top } = args;
    let config = AppConfig::load()?;

    let dataset = match seed {
        Some(path) => load_dataset(Some(path.as_path()))?,
        None => sample_dataset(),
    };

    println!("Internship matching demo");
    println!(
        "- {} students | {} opportunities | {} applications",
        dataset.students.len(),
        dataset.opportunities.len(),
        dataset.applications.len()
    );

    let applications = Arc::new(InMemoryApplicationStore::from_dataset(dataset));
    let results = Arc::new(InMemoryMatchResultRepository::default());
    let service = MatchingService::new(
        applications,
        results,
        ScoringEngine::new(config.matching.weights),
    );

    let summary = service.run()?;
    println!(
        "- Batch run scored {} of {} applications ({} skipped)",
        summary.created_results,
        summary.processed_applications,
        summary.skipped()
    );

    let views = service.all_results()?;
    println!("\nTop {} matches", top.min(views.len()));
    for (rank, view) in views.iter().take(top).enumerate() {
        println!("  {:>2}. {}", rank + 1, ranking_line(view));
    }

    Ok(())
}

fn adhoc_pair(args: ScoreArgs) -> (Student, Opportunity) {
    let ScoreArgs {
        skills,
        locations,
        category,
        description,
        sector,
        location,
        reserved_for,
    } = args;

    let student = Student {
        id: StudentId("cli-student".to_string()),
        name: "Command line student".to_string(),
        email: String::new(),
        skills: Some(skills),
        location_preferences: Some(locations),
        category,
    };
    let opportunity = Opportunity {
        id: OpportunityId("cli-opportunity".to_string()),
        title: "Command line opportunity".to_string(),
        company: String::new(),
        description: Some(description),
        sector: Some(sector),
        location: Some(location),
        affirmative_category: reserved_for,
    };

    (student, opportunity)
}

fn render_score(weights: &MatchWeights, outcome: &MatchScore) {
    let breakdown = &outcome.breakdown;
    println!("Match score: {:.2}", outcome.score);
    println!(
        "  - skill overlap:    {:.3} x {:.2}",
        breakdown.skill_overlap, weights.skill
    );
    println!(
        "  - sector match:     {:.3} x {:.2}",
        breakdown.sector_match, weights.sector
    );
    println!(
        "  - location match:   {:.3} x {:.2}",
        breakdown.location_match, weights.location
    );
    println!(
        "  - affirmative:      {:.3} x {:.2}",
        breakdown.affirmative, weights.affirmative
    );
}

fn ranking_line(view: &MatchResultView) -> String {
    let student = view
        .student
        .as_ref()
        .map(|student| student.name.as_str())
        .unwrap_or("(removed student)");
    let opportunity = view
        .opportunity
        .as_ref()
        .map(|opportunity| format!("{} @ {}", opportunity.title, opportunity.company))
        .unwrap_or_else(|| "(removed opportunity)".to_string());

    format!("{:.2}  {student} -> {opportunity}", view.score)
}

/// Sample platform data where every student has applied to every opportunity.
pub(crate) fn sample_dataset() -> MatchDataset {
    let students = vec![
        sample_student(
            "stu-alice",
            "Alice Student",
            "python, machine learning, data analysis",
            "Bengaluru, Remote",
            AffirmativeCategory::General,
        ),
        sample_student(
            "stu-bob",
            "Bob Student",
            "javascript, react, nodejs",
            "Mumbai, Pune",
            AffirmativeCategory::Sc,
        ),
        sample_student(
            "stu-chandra",
            "Chandra Student",
            "java, spring boot, sql",
            "Hyderabad",
            AffirmativeCategory::St,
        ),
        sample_student(
            "stu-divya",
            "Divya Student",
            "python, react, django, sql",
            "Bengaluru",
            AffirmativeCategory::Obc,
        ),
        sample_student(
            "stu-esha",
            "Esha Student",
            "ui/ux design, figma, prototyping",
            "Remote",
            AffirmativeCategory::Pwd,
        ),
    ];

    let opportunities = vec![
        Opportunity {
            id: OpportunityId("opp-ai-research".to_string()),
            title: "AI Research Intern".to_string(),
            company: "Innotech Solutions".to_string(),
            description: Some(
                "Work on cutting-edge AI research projects, focusing on natural language \
                 processing and computer vision."
                    .to_string(),
            ),
            sector: Some("AI, Machine Learning".to_string()),
            location: Some("Bengaluru".to_string()),
            affirmative_category: Some(AffirmativeCategory::Sc),
        },
        Opportunity {
            id: OpportunityId("opp-env-data".to_string()),
            title: "Environmental Data Analyst Intern".to_string(),
            company: "GreenWorks Environmental".to_string(),
            description: Some(
                "Analyze environmental data to identify trends and inform sustainability \
                 strategies."
                    .to_string(),
            ),
            sector: Some("Environment, Data Analysis".to_string()),
            location: Some("Mumbai".to_string()),
            affirmative_category: None,
        },
        Opportunity {
            id: OpportunityId("opp-frontend".to_string()),
            title: "Frontend Developer Intern (Fintech)".to_string(),
            company: "Finova Capital".to_string(),
            description: Some(
                "Develop responsive and user-friendly interfaces for our fintech platform \
                 using React and modern JavaScript."
                    .to_string(),
            ),
            sector: Some("Finance, Web Development".to_string()),
            location: Some("Pune".to_string()),
            affirmative_category: Some(AffirmativeCategory::Obc),
        },
        Opportunity {
            id: OpportunityId("opp-health-pm".to_string()),
            title: "Healthcare Product Manager Intern".to_string(),
            company: "HealthIQ Labs".to_string(),
            description: Some(
                "Assist in the product lifecycle management for our new healthtech \
                 solutions, conducting market research and gathering requirements."
                    .to_string(),
            ),
            sector: Some("Health, Product Management".to_string()),
            location: Some("Hyderabad".to_string()),
            affirmative_category: None,
        },
        Opportunity {
            id: OpportunityId("opp-ux".to_string()),
            title: "UX Designer Intern (EdTech)".to_string(),
            company: "EduSpark Innovations".to_string(),
            description: Some(
                "Design intuitive and engaging user experiences for educational \
                 applications, from wireframing to high-fidelity prototypes."
                    .to_string(),
            ),
            sector: Some("Education, UX/UI Design".to_string()),
            location: Some("Remote".to_string()),
            affirmative_category: Some(AffirmativeCategory::Pwd),
        },
    ];

    let mut applications = Vec::with_capacity(students.len() * opportunities.len());
    for student in &students {
        for opportunity in &opportunities {
            applications.push(Application {
                id: ApplicationId(format!("app-{:03}", applications.len() + 1)),
                student_id: student.id.clone(),
                opportunity_id: opportunity.id.clone(),
            });
        }
    }

    MatchDataset {
        students,
        opportunities,
        applications,
    }
}

fn sample_student(
    id: &str,
    name: &str,
    skills: &str,
    locations: &str,
    category: AffirmativeCategory,
) -> Student {
    let handle = name
        .split_whitespace()
        .next()
        .unwrap_or(id)
        .to_ascii_lowercase();

    Student {
        id: StudentId(id.to_string()),
        name: name.to_string(),
        email: format!("{handle}@student.com"),
        skills: Some(skills.to_string()),
        location_preferences: Some(locations.to_string()),
        category: Some(category),
    }
}
