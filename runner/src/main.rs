// ═══════════════════════════════════════════════════════════════════════
// Runner — CLI entry point for drawing, validating, auditing and saving
// ═══════════════════════════════════════════════════════════════════════

use clap::{Parser, Subcommand};
use std::process::ExitCode;
use teamdraw_engine::shuffle::draw_rng;
use teamdraw_engine::{
    audit, draw_adhoc, parse_roster, parse_settings, run_draw, validate, AdhocConfig, Configuration,
    DrawError, Formation, Partition, Player, Role, ValidationReport,
};
use teamdraw_store::{Store, StoreError};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "teamdraw", about = "Balanced random team draws by role and skill tier")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Show the per-team capacities of a DEF-MID-FW formation
    Formation {
        descriptor: String,
    },
    /// List the standard formations
    Formations,
    /// Check that a roster can fill every team
    Validate {
        #[arg(short, long)]
        roster: String,
        #[arg(short, long)]
        config: String,
    },
    /// Validate, then draw teams
    Draw {
        #[arg(short, long)]
        roster: String,
        #[arg(short, long)]
        config: String,
        /// Overrides the seed in the config file
        #[arg(short, long)]
        seed: Option<u64>,
        /// Print the partition as JSON
        #[arg(long)]
        json: bool,
    },
    /// Quick draw from pre-grouped name lists
    Adhoc {
        #[arg(short, long)]
        config: String,
        #[arg(short, long)]
        seed: Option<u64>,
    },
    /// Run many seeded draws and summarise their balance
    Audit {
        #[arg(short, long)]
        roster: String,
        #[arg(short, long)]
        config: String,
        #[arg(short = 'n', long, default_value_t = 1000)]
        runs: usize,
        #[arg(short, long, default_value_t = 42)]
        seed: u64,
    },
    /// Draw and save the result, replacing any previous draw for the context
    Save {
        #[arg(short, long, default_value = "draws.db")]
        db: String,
        #[arg(short = 'x', long)]
        context: String,
        #[arg(short, long)]
        roster: String,
        #[arg(short, long)]
        config: String,
        #[arg(short, long)]
        seed: Option<u64>,
    },
    /// List saved draws, or print one
    Show {
        #[arg(short, long, default_value = "draws.db")]
        db: String,
        #[arg(short = 'x', long)]
        context: Option<String>,
    },
}

/// Why a command failed; decides the exit code.
enum Failure {
    Shortfall(ValidationReport),
    Other(String),
}

impl From<DrawError> for Failure {
    fn from(e: DrawError) -> Self {
        match e {
            DrawError::InsufficientRoster(report) => Failure::Shortfall(report),
            other => Failure::Other(other.to_string()),
        }
    }
}

impl From<StoreError> for Failure {
    fn from(e: StoreError) -> Self {
        Failure::Other(e.to_string())
    }
}

impl From<serde_json::Error> for Failure {
    fn from(e: serde_json::Error) -> Self {
        Failure::Other(format!("json: {}", e))
    }
}

type CmdResult = Result<(), Failure>;

fn main() -> ExitCode {
    init_logging();
    let cli = Cli::parse();

    let outcome = match cli.command {
        Commands::Formation { descriptor } => cmd_formation(&descriptor),
        Commands::Formations => cmd_formations(),
        Commands::Validate { roster, config } => cmd_validate(&roster, &config),
        Commands::Draw { roster, config, seed, json } => cmd_draw(&roster, &config, seed, json),
        Commands::Adhoc { config, seed } => cmd_adhoc(&config, seed),
        Commands::Audit { roster, config, runs, seed } => cmd_audit(&roster, &config, runs, seed),
        Commands::Save { db, context, roster, config, seed } => cmd_save(&db, &context, &roster, &config, seed),
        Commands::Show { db, context } => cmd_show(&db, context.as_deref()),
    };

    match outcome {
        Ok(()) => ExitCode::SUCCESS,
        Err(Failure::Shortfall(report)) => {
            eprintln!("Not enough players: {}", report);
            ExitCode::from(2)
        }
        Err(Failure::Other(msg)) => {
            eprintln!("Error: {}", msg);
            ExitCode::FAILURE
        }
    }
}

/// Logs go to stderr so stdout stays clean for JSON output.
fn init_logging() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("warn,teamdraw_engine=info,teamdraw_store=info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

// ── Input ──────────────────────────────────────────────────────────────

fn read(path: &str) -> Result<String, Failure> {
    std::fs::read_to_string(path).map_err(|e| Failure::Other(format!("cannot read {}: {}", path, e)))
}

fn load_inputs(roster_path: &str, config_path: &str, seed: Option<u64>) -> Result<(Vec<Player>, Configuration), Failure> {
    let roster = parse_roster(&read(roster_path)?)?;
    let mut config = parse_settings(&read(config_path)?)?;
    if let Some(seed) = seed {
        config = config.with_seed(seed);
    }
    Ok((roster, config))
}

// ── Commands ───────────────────────────────────────────────────────────

fn cmd_formation(descriptor: &str) -> CmdResult {
    let f: Formation = descriptor.parse()?;
    let cap = f.capacity();
    println!("Formation {} -- {} players per team", f, f.total());
    for role in Role::ALL {
        println!("  {:4} {}", role.to_string(), cap.get(role));
    }
    Ok(())
}

fn cmd_formations() -> CmdResult {
    println!("{:<8} {:<18} {:>6}", "Shape", "Style", "Total");
    println!("{}", "-".repeat(34));
    for preset in Formation::presets() {
        let f: Formation = preset.descriptor.parse()?;
        println!("{:<8} {:<18} {:>6}", preset.descriptor, preset.label, f.total());
    }
    Ok(())
}

fn cmd_validate(roster_path: &str, config_path: &str) -> CmdResult {
    let (roster, config) = load_inputs(roster_path, config_path, None)?;
    let report = validate(&roster, &config);
    println!("{:<5} {:>9} {:>10}", "Role", "Required", "Available");
    for role in Role::ALL {
        let required = config.capacity.get(role) * config.team_count;
        let available = report.available.get(&role).copied().unwrap_or(0);
        let flag = if report.shortfalls.contains_key(&role) { "  <-- short" } else { "" };
        println!("{:<5} {:>9} {:>10}{}", role.to_string(), required, available, flag);
    }
    println!("Total {:>9} {:>10}", report.total_required, report.total_available);
    report.into_result()?;
    println!("\nRoster is sufficient for {} teams.", config.team_count);
    Ok(())
}

fn cmd_draw(roster_path: &str, config_path: &str, seed: Option<u64>, json: bool) -> CmdResult {
    let (roster, config) = load_inputs(roster_path, config_path, seed)?;
    let partition = run_draw(&roster, &config)?;
    if json {
        println!("{}", serde_json::to_string_pretty(&partition)?);
    } else {
        print_partition(&partition);
    }
    Ok(())
}

fn cmd_adhoc(config_path: &str, seed: Option<u64>) -> CmdResult {
    let config: AdhocConfig = serde_json::from_str(&read(config_path)?)?;
    let result = draw_adhoc(&config, &mut draw_rng(seed))?;
    println!("{}", serde_json::to_string_pretty(&result)?);
    Ok(())
}

fn cmd_audit(roster_path: &str, config_path: &str, runs: usize, seed: u64) -> CmdResult {
    let (roster, config) = load_inputs(roster_path, config_path, None)?;
    println!("=== Audit: {} draws, {} teams, seating={} ===\n", runs, config.team_count, config.seating);

    let summary = audit(&roster, &config, runs, seed)?;
    println!("  Draws with overflow : {} ({:.1}%)",
        summary.runs_with_overflow,
        summary.runs_with_overflow as f64 / summary.runs as f64 * 100.0);
    println!("  Players overflowed  : {}", summary.overflow_entities);
    println!("  Max group spread    : {}", summary.max_group_spread);
    println!("\n  Tier-1 players per draw:");
    for (i, share) in summary.top_tier_share.iter().enumerate() {
        println!("    Team {:>2}: {:.3}", i + 1, share);
    }
    Ok(())
}

fn cmd_save(db_path: &str, context: &str, roster_path: &str, config_path: &str, seed: Option<u64>) -> CmdResult {
    let (roster, config) = load_inputs(roster_path, config_path, seed)?;
    let partition = run_draw(&roster, &config)?;
    print_partition(&partition);

    let mut store = Store::open(db_path)?;
    let rows = store.save_partition(context, &partition, config.seed)?;
    println!("\nSaved {} assignments for {:?} to {}", rows, context, db_path);
    Ok(())
}

fn cmd_show(db_path: &str, context: Option<&str>) -> CmdResult {
    let store = Store::open(db_path)?;
    match context {
        Some(ctx) => {
            let partition = store.load_partition(ctx)?;
            print_partition(&partition);
        }
        None => {
            let records = store.contexts()?;
            if records.is_empty() {
                println!("No saved draws. Use `teamdraw save` first.");
                return Ok(());
            }
            println!("{:<20} {:>6} {:>7} {:>9} {:<20}", "Context", "Teams", "Seated", "Overflow", "Drawn at");
            println!("{}", "-".repeat(66));
            for r in &records {
                println!("{:<20} {:>6} {:>7} {:>9} {:<20}", r.context, r.team_count, r.seated, r.overflow, r.drawn_at);
            }
        }
    }
    Ok(())
}

// ── Output ─────────────────────────────────────────────────────────────

fn print_partition(partition: &Partition) {
    for team in &partition.teams {
        match &team.color {
            Some(color) => println!("Team {} ({})", team.index, color),
            None => println!("Team {}", team.index),
        }
        for (role, players) in &team.roster {
            let names: Vec<String> = players.iter().map(|p| format!("{} [{}]", p.name, p.tier)).collect();
            println!("  {:4} {}", role.to_string(), names.join(", "));
        }
        println!();
    }
    if partition.has_overflow() {
        println!("Not seated ({}):", partition.overflow.len());
        for p in &partition.overflow {
            println!("  {} ({}, tier {})", p.name, p.role, p.tier);
        }
    }
}
