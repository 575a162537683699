use clap::{Args, Parser, Subcommand};
use prime_core::engine::PCSK9_LDL_THRESHOLD;
use prime_core::*;
use std::path::{Path, PathBuf};

#[derive(Parser)]
#[command(name = "prime-risk")]
#[command(
    about = "PRIME SMART-2 recurrent cardiovascular risk calculator",
    long_about = None
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Override config file location
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Log engine details (debug level) to stderr
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Estimate baseline and treated 10-year risk for one patient
    Assess(AssessArgs),

    /// Assess a JSON array of requests and print a JSON array of results
    Batch {
        /// JSON file containing [{"profile": ..., "treatment": ...}, ...]
        #[arg(long)]
        input: PathBuf,
    },

    /// List the evidence behind risk factors and treatment effects
    Evidence,

    /// Write the default configuration file
    InitConfig {
        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },
}

#[derive(Args)]
struct AssessArgs {
    /// Age in years (30-90)
    #[arg(long, default_value_t = 65)]
    age: u32,

    /// Sex (male, female)
    #[arg(long, default_value = "male")]
    sex: Sex,

    /// Diabetes mellitus
    #[arg(long)]
    diabetes: bool,

    /// Current smoker
    #[arg(long)]
    smoker: bool,

    /// eGFR in mL/min/1.73m² (15-120)
    #[arg(long, default_value_t = 60.0)]
    egfr: f64,

    /// Coronary artery disease
    #[arg(long)]
    coronary: bool,

    /// Cerebrovascular disease
    #[arg(long)]
    cerebrovascular: bool,

    /// Peripheral artery disease
    #[arg(long)]
    peripheral: bool,

    /// LDL-C in mmol/L
    #[arg(long, default_value_t = 3.0)]
    ldl: f64,

    /// Systolic blood pressure in mmHg
    #[arg(long, default_value_t = 140.0)]
    sbp: f64,

    /// Statin intensity (none, moderate, high) [default from config]
    #[arg(long)]
    statin: Option<StatinIntensity>,

    /// Add ezetimibe 10mg daily [default from config]
    #[arg(long, overrides_with = "no_ezetimibe")]
    ezetimibe: bool,

    /// Leave out ezetimibe even if the config selects it
    #[arg(long, overrides_with = "ezetimibe")]
    no_ezetimibe: bool,

    /// Add a PCSK9 inhibitor [default from config]
    #[arg(long, overrides_with = "no_pcsk9")]
    pcsk9: bool,

    /// Leave out the PCSK9 inhibitor even if the config selects it
    #[arg(long, overrides_with = "pcsk9")]
    no_pcsk9: bool,

    /// Target systolic blood pressure in mmHg [default from config]
    #[arg(long)]
    target_sbp: Option<f64>,

    /// Print the assessment as JSON
    #[arg(long)]
    json: bool,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    if cli.verbose {
        prime_core::logging::init_with_level("debug");
    } else {
        prime_core::logging::init();
    }

    match cli.command {
        Commands::Assess(args) => {
            let config = load_config(cli.config.as_deref())?;
            cmd_assess(args, &config)
        }
        Commands::Batch { input } => {
            let config = load_config(cli.config.as_deref())?;
            cmd_batch(&input, &config)
        }
        Commands::Evidence => cmd_evidence(),
        Commands::InitConfig { force } => cmd_init_config(cli.config.as_deref(), force),
    }
}

fn load_config(path: Option<&Path>) -> Result<Config> {
    match path {
        Some(path) => Config::load_from(path),
        None => Config::load(),
    }
}

fn cmd_assess(args: AssessArgs, config: &Config) -> Result<()> {
    let beds = VascularBeds {
        coronary: args.coronary,
        cerebrovascular: args.cerebrovascular,
        peripheral: args.peripheral,
    };

    let profile = PatientProfile {
        age: args.age,
        sex: args.sex,
        diabetes: args.diabetes,
        current_smoker: args.smoker,
        egfr: args.egfr,
        vascular_bed_count: beds.count(),
        ldl: args.ldl,
        sbp: args.sbp,
    };

    let defaults = &config.treatment;
    let selection = TreatmentSelection {
        statin_intensity: args.statin.unwrap_or(defaults.statin),
        ezetimibe: flag_or_default(args.ezetimibe, args.no_ezetimibe, defaults.ezetimibe),
        pcsk9_inhibitor: flag_or_default(args.pcsk9, args.no_pcsk9, defaults.pcsk9_inhibitor),
        target_sbp: args.target_sbp.unwrap_or(defaults.target_sbp),
    };

    if selection.pcsk9_inhibitor && profile.ldl < PCSK9_LDL_THRESHOLD {
        eprintln!(
            "Note: PCSK9 inhibitors are usually offered only when LDL-C >= {} mmol/L",
            PCSK9_LDL_THRESHOLD
        );
    }

    let assessment = assess(&profile, &selection, &config.tiers)?;

    let format = if args.json {
        OutputFormat::Json
    } else {
        config.output.format
    };

    match format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&assessment)?),
        OutputFormat::Text => display_assessment(&assessment),
    }

    Ok(())
}

/// Resolve an on/off flag pair against the configured default
fn flag_or_default(on: bool, off: bool, default: bool) -> bool {
    match (on, off) {
        (true, _) => true,
        (_, true) => false,
        _ => default,
    }
}

fn cmd_batch(input: &Path, config: &Config) -> Result<()> {
    let contents = std::fs::read_to_string(input)?;
    let requests: Vec<AssessmentRequest> = serde_json::from_str(&contents)?;

    tracing::info!("Assessing {} requests from {:?}", requests.len(), input);

    let assessments = requests
        .iter()
        .enumerate()
        .map(|(idx, request)| {
            assess(&request.profile, &request.treatment, &config.tiers)
                .map_err(|e| Error::Other(format!("Request {}: {}", idx, e)))
        })
        .collect::<Result<Vec<_>>>()?;

    println!("{}", serde_json::to_string_pretty(&assessments)?);
    Ok(())
}

fn cmd_evidence() -> Result<()> {
    println!("Risk model: {}", MODEL_CITATION);
    println!();

    for evidence in all_evidence() {
        println!("  • {}", evidence.effect);
        println!("    {}", evidence.source);
    }

    Ok(())
}

fn cmd_init_config(path: Option<&Path>, force: bool) -> Result<()> {
    let target = path
        .map(Path::to_path_buf)
        .unwrap_or_else(Config::default_config_path);

    if target.exists() && !force {
        return Err(Error::Config(format!(
            "{} already exists (use --force to overwrite)",
            target.display()
        )));
    }

    match path {
        Some(path) => Config::default().save_to(path)?,
        None => Config::default().save()?,
    }
    println!("✓ Wrote default config to {}", target.display());
    Ok(())
}

fn display_assessment(assessment: &RiskAssessment) {
    let result = &assessment.result;

    println!("\n╭─────────────────────────────────────────╮");
    println!("│  PRIME SMART-2 CVD RISK ASSESSMENT");
    println!("╰─────────────────────────────────────────╯");
    println!();
    println!(
        "  Baseline 10-year risk:          {:.1}%",
        result.baseline_risk_percent
    );
    println!(
        "  Projected risk with treatments: {:.1}% (-{:.1}%)",
        result.projected_risk_percent, result.absolute_risk_reduction_percent
    );
    println!(
        "  Relative risk reduction:        {}%",
        result.relative_risk_reduction_percent
    );
    println!();
    println!("  {}", assessment.category.label());
    for recommendation in &assessment.recommendations {
        println!("  → {}", recommendation);
    }

    let topics = relevant_evidence(assessment);
    if !topics.is_empty() {
        println!();
        for topic in topics {
            if let Some(evidence) = evidence_for(topic) {
                println!("  ℹ {}", evidence.summary());
            }
        }
    }

    println!();
    println!("  Model: {}", MODEL_CITATION);
    println!(
        "  {} · Supports clinical discussion, does not replace professional judgment.",
        chrono::Local::now().format("%Y-%m-%d")
    );
    println!();
}

fn relevant_evidence(assessment: &RiskAssessment) -> Vec<EvidenceTopic> {
    let mut topics = Vec::new();

    if assessment.profile.current_smoker {
        topics.push(EvidenceTopic::Smoking);
    }
    if assessment.treatment.statin_intensity == StatinIntensity::High {
        topics.push(EvidenceTopic::StatinHigh);
    }
    if assessment.treatment.ezetimibe || assessment.treatment.pcsk9_inhibitor {
        topics.push(EvidenceTopic::Ldl);
    }
    if assessment.treatment.target_sbp < engine::INTENSIVE_SBP_TARGET {
        topics.push(EvidenceTopic::Sbp);
    }

    topics
}
