//! Kinship CLI - atoms, compounds and the pivot rows between them

mod commands;

use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;
use kinship::config::{self, KinshipConfig};
use kinship::output::{emit_error, is_quiet, OutputMode};
use kinship::Database;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

#[derive(Parser)]
#[command(name = "kinship")]
#[command(version)]
#[command(about = "Many-to-many sibling relations over pivot tables")]
#[command(long_about = r#"
Kinship manages a small chemistry schema to exercise sibling relations:
  • atoms and compounds are plain entities
  • atom_compound is the default pivot between them
  • protons is a hand-written join table between the same pair

Example usage:
  kinship init
  kinship add-atom Hydrogen
  kinship add-compound Water
  kinship attach --atom 1 --compound 1
  kinship siblings --atom 1 --sql
"#)]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Path to the database file
    #[arg(short, long, global = true)]
    database: Option<PathBuf>,

    /// Path to the config file
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Print results as JSON
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: Commands,
}

/// Join table used by relation commands
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Through {
    /// Generic pivot table `atom_compound`
    Pivot,
    /// Custom join table `protons`
    Protons,
}

#[derive(Subcommand)]
enum Commands {
    /// Create the demo tables
    Init,

    /// Insert an atom
    AddAtom {
        name: String,
    },

    /// Insert a compound
    AddCompound {
        name: String,
    },

    /// Relate an atom to a compound
    Attach {
        #[arg(short, long)]
        atom: i64,

        #[arg(short = 'm', long)]
        compound: i64,

        #[arg(short, long, value_enum, default_value = "pivot")]
        through: Through,
    },

    /// Remove every relation between an atom and a compound
    Detach {
        #[arg(short, long)]
        atom: i64,

        #[arg(short = 'm', long)]
        compound: i64,

        #[arg(short, long, value_enum, default_value = "pivot")]
        through: Through,
    },

    /// Check whether an atom and a compound are related
    Related {
        #[arg(short, long)]
        atom: i64,

        #[arg(short = 'm', long)]
        compound: i64,

        #[arg(short, long, value_enum, default_value = "pivot")]
        through: Through,
    },

    /// List the compounds of an atom, or the atoms of a compound
    Siblings {
        #[arg(short, long, conflicts_with = "compound", required_unless_present = "compound")]
        atom: Option<i64>,

        #[arg(short = 'm', long)]
        compound: Option<i64>,

        #[arg(short, long, value_enum, default_value = "pivot")]
        through: Through,

        /// Print the traversal query instead of running it
        #[arg(long)]
        sql: bool,
    },

    /// Row counts for every demo table
    Stats,

    /// Drop the demo tables
    Drop,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let settings = config::load_config(cli.config.as_deref())?.unwrap_or_default();

    init_logging(cli.verbose, &settings);

    let output_mode = OutputMode::select(cli.json, is_quiet());
    let database_path = resolve_database(cli.database, &settings)?;
    config::ensure_db_dir(&database_path)?;
    tracing::debug!("Opening database {}", database_path.display());
    let db = Database::open(&database_path)?;

    let result = match cli.command {
        Commands::Init => commands::run_init(&db, output_mode),
        Commands::AddAtom { name } => commands::run_add_atom(&db, &name, output_mode),
        Commands::AddCompound { name } => commands::run_add_compound(&db, &name, output_mode),
        Commands::Attach { atom, compound, through } => {
            commands::run_attach(&db, atom, compound, through, output_mode)
        }
        Commands::Detach { atom, compound, through } => {
            commands::run_detach(&db, atom, compound, through, output_mode)
        }
        Commands::Related { atom, compound, through } => {
            commands::run_related(&db, atom, compound, through, output_mode)
        }
        Commands::Siblings { atom, compound, through, sql } => {
            commands::run_siblings(&db, atom, compound, through, sql, output_mode)
        }
        Commands::Stats => commands::run_stats(&db, output_mode),
        Commands::Drop => commands::run_drop(&db, output_mode),
    };

    if let Err(err) = result {
        if output_mode.is_json() {
            emit_error(&err)?;
        } else {
            kinship::ui::error(&format!("{:#}", err));
        }
        std::process::exit(1);
    }
    Ok(())
}

fn init_logging(verbose: bool, settings: &KinshipConfig) {
    let filter = if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new(settings.log.as_deref().unwrap_or("info"))
    };

    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(filter)
        .init();
}

fn resolve_database(flag: Option<PathBuf>, settings: &KinshipConfig) -> anyhow::Result<PathBuf> {
    if let Some(path) = flag {
        return Ok(path);
    }
    if let Some(path) = &settings.database {
        return Ok(PathBuf::from(path));
    }
    Ok(config::default_database_path_in(&std::env::current_dir()?))
}
