use clap::{Args, Parser, Subcommand};
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use wellness_core::*;

#[derive(Parser)]
#[command(name = "wellness")]
#[command(about = "Health metrics and wellness recommendations", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Override data directory
    #[arg(long, global = true)]
    data_dir: Option<PathBuf>,

    /// Use a specific config file instead of the default location
    #[arg(long, global = true)]
    config: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Commands {
    /// Compute BMI, health score and recommendations for a profile
    Assess {
        #[command(flatten)]
        profile: ProfileArgs,

        /// Print the assessment as JSON
        #[arg(long)]
        json: bool,

        /// Do not record the assessment in the journal
        #[arg(long)]
        no_log: bool,
    },

    /// Manage stored profiles
    Profile {
        #[command(subcommand)]
        command: ProfileCommand,
    },

    /// Export the assessment journal to CSV
    Export {
        /// Output file (defaults to <data-dir>/assessments.csv)
        #[arg(long)]
        output: Option<PathBuf>,

        /// Only export assessments recorded for this profile
        #[arg(long)]
        email: Option<String>,
    },
}

#[derive(Subcommand)]
enum ProfileCommand {
    /// Create or replace a profile
    Set {
        #[arg(long)]
        email: String,

        #[command(flatten)]
        profile: ProfileArgs,

        #[arg(long)]
        json: bool,
    },

    /// Update some fields of an existing profile
    Update {
        #[arg(long)]
        email: String,

        #[command(flatten)]
        patch: PatchArgs,

        #[arg(long)]
        json: bool,
    },

    /// Show a stored profile and its latest assessment
    Show {
        #[arg(long)]
        email: String,

        #[arg(long)]
        json: bool,
    },
}

#[derive(Args)]
struct ProfileArgs {
    /// Age in years
    #[arg(long)]
    age: u32,

    /// Height in centimetres
    #[arg(long)]
    height: f64,

    /// Weight in kilograms
    #[arg(long)]
    weight: f64,

    /// Average hours of sleep per night
    #[arg(long)]
    sleep: f64,

    /// Glasses of water per day
    #[arg(long)]
    water: u32,

    /// Activity level (sedentary, light, moderate, active)
    #[arg(long)]
    activity: String,
}

impl ProfileArgs {
    fn into_profile(self) -> HealthProfile {
        HealthProfile {
            age_years: self.age,
            height_cm: self.height,
            weight_kg: self.weight,
            sleep_hours: self.sleep,
            water_glasses: self.water,
            activity_level: ActivityLevel::parse(&self.activity),
        }
    }
}

#[derive(Args)]
struct PatchArgs {
    #[arg(long)]
    age: Option<u32>,

    #[arg(long)]
    height: Option<f64>,

    #[arg(long)]
    weight: Option<f64>,

    #[arg(long)]
    sleep: Option<f64>,

    #[arg(long)]
    water: Option<u32>,

    #[arg(long)]
    activity: Option<String>,
}

impl PatchArgs {
    fn into_patch(self) -> ProfilePatch {
        ProfilePatch {
            age_years: self.age,
            height_cm: self.height,
            weight_kg: self.weight,
            sleep_hours: self.sleep,
            water_glasses: self.water,
            activity_level: self.activity.as_deref().map(ActivityLevel::parse),
        }
    }
}

fn main() -> ExitCode {
    // Initialize logging
    wellness_core::logging::init();

    let cli = Cli::parse();

    let config = match load_config(cli.config.as_deref()) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Error: {}", e);
            return ExitCode::from(1);
        }
    };

    match run(cli, &config) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::debug!("Command failed: {:?}", e);
            eprintln!("Error: {}", e.public_message(config.development));
            match e.kind() {
                ErrorKind::Client => ExitCode::from(2),
                ErrorKind::Internal => ExitCode::from(1),
            }
        }
    }
}

fn load_config(path: Option<&Path>) -> Result<Config> {
    match path {
        Some(path) => Config::load_from(path),
        None => Config::load(),
    }
}

fn run(cli: Cli, config: &Config) -> Result<()> {
    let data_dir = cli
        .data_dir
        .unwrap_or_else(|| config.data.data_dir.clone());

    match cli.command {
        Commands::Assess {
            profile,
            json,
            no_log,
        } => cmd_assess(&data_dir, profile.into_profile(), json, no_log, config),
        Commands::Profile { command } => cmd_profile(&data_dir, command, config),
        Commands::Export { output, email } => cmd_export(&data_dir, output, email.as_deref()),
    }
}

fn store_path(data_dir: &Path) -> PathBuf {
    data_dir.join("profiles.json")
}

fn journal_path(data_dir: &Path) -> PathBuf {
    data_dir.join("assessments.jsonl")
}

fn cmd_assess(
    data_dir: &Path,
    profile: HealthProfile,
    json: bool,
    no_log: bool,
    config: &Config,
) -> Result<()> {
    validate(&profile, &config.validation)?;
    let assessment = assess(&profile)?;

    if !no_log {
        let mut journal = JsonlJournal::new(journal_path(data_dir));
        journal.append(&AssessmentRecord::new(
            None,
            profile,
            assessment.clone(),
        ))?;
    }

    if json {
        println!("{}", serde_json::to_string_pretty(&assessment)?);
    } else {
        display_assessment(&assessment);
    }
    Ok(())
}

fn cmd_profile(data_dir: &Path, command: ProfileCommand, config: &Config) -> Result<()> {
    let mut store = JsonProfileStore::new(store_path(data_dir), config.validation.clone());

    match command {
        ProfileCommand::Set {
            email,
            profile,
            json,
        } => {
            let stored = store.upsert(&email, profile.into_profile())?;
            record_stored(data_dir, &stored)?;

            if json {
                println!("{}", serde_json::to_string_pretty(&stored)?);
            } else {
                println!("✓ Profile saved for {}", stored.email);
                display_assessment(&stored.assessment);
            }
        }

        ProfileCommand::Update { email, patch, json } => {
            let patch = patch.into_patch();
            let stored = store.patch(&email, &patch)?;
            if patch.affects_assessment() {
                record_stored(data_dir, &stored)?;
            }

            if json {
                println!("{}", serde_json::to_string_pretty(&stored)?);
            } else {
                println!("✓ Profile updated for {}", stored.email);
                display_assessment(&stored.assessment);
            }
        }

        ProfileCommand::Show { email, json } => {
            let stored = store
                .get(&email)?
                .ok_or_else(|| Error::NotFound(format!("no profile for {}", email.trim())))?;

            if json {
                println!("{}", serde_json::to_string_pretty(&stored)?);
            } else {
                display_profile(&stored);
                display_assessment(&stored.assessment);
            }
        }
    }

    Ok(())
}

fn record_stored(data_dir: &Path, stored: &StoredProfile) -> Result<()> {
    let mut journal = JsonlJournal::new(journal_path(data_dir));
    journal.append(&AssessmentRecord::new(
        Some(stored.email.clone()),
        stored.profile.clone(),
        stored.assessment.clone(),
    ))
}

fn cmd_export(data_dir: &Path, output: Option<PathBuf>, email: Option<&str>) -> Result<()> {
    let journal = JsonlJournal::new(journal_path(data_dir));
    if !journal.path().exists() {
        println!("No assessments recorded - nothing to export.");
        return Ok(());
    }

    let csv_path = output.unwrap_or_else(|| data_dir.join("assessments.csv"));
    let summary = export_journal(&journal, &csv_path, email)?;

    println!("✓ Exported {} assessments", summary.rows);
    println!("  CSV: {}", csv_path.display());
    if summary.skipped > 0 {
        println!("  Skipped {} unreadable journal lines", summary.skipped);
    }
    Ok(())
}

fn display_profile(stored: &StoredProfile) {
    let p = &stored.profile;
    println!();
    println!("  {}", stored.email);
    println!("  Updated: {}", stored.updated_at.format("%Y-%m-%d %H:%M UTC"));
    println!(
        "  Age {} | {} cm | {} kg | {} h sleep | {} glasses | {}",
        p.age_years, p.height_cm, p.weight_kg, p.sleep_hours, p.water_glasses, p.activity_level
    );
}

fn display_assessment(assessment: &HealthAssessment) {
    println!();
    println!("  BMI: {:.2} ({})", assessment.bmi, assessment.bmi_category);
    println!("  Health score: {}/100", assessment.health_score);
    println!();
    println!("  Recommendations:");

    for rec in &assessment.recommendations {
        println!(
            "  → [{}] {}: {}",
            priority_label(rec.priority),
            topic_label(rec.topic),
            rec.message
        );
    }

    println!();
}

fn priority_label(priority: Priority) -> &'static str {
    match priority {
        Priority::Low => "low",
        Priority::Medium => "medium",
        Priority::High => "high",
    }
}

fn topic_label(topic: Topic) -> &'static str {
    match topic {
        Topic::Bmi => "BMI",
        Topic::Sleep => "Sleep",
        Topic::Hydration => "Hydration",
        Topic::Activity => "Activity",
        Topic::General => "General",
    }
}
