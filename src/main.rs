use anyhow::Result;
use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use skillplan::commands::{compose, cost, search, share, slots, CommandContext};
use skillplan::plan::CostFormula;

#[derive(Parser)]
#[command(name = "skillplan")]
#[command(about = "Plan skill purchases: search the catalog, price a build, save and share it", long_about = None)]
#[command(version)]
struct Cli {
    /// Config file (default: <config dir>/skillplan/skillplan.toml)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Skill catalog CSV, overriding the configured one
    #[arg(long, global = true)]
    catalog: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Search the catalog by name or reading
    Search {
        /// Text to match; empty lists everything
        #[arg(default_value = "")]
        query: String,

        /// Only skills of this category
        #[arg(long, short)]
        category: Option<String>,

        /// Maximum number of results
        #[arg(long, short)]
        limit: Option<usize>,
    },

    /// Show one skill with its costs and child skills
    Show {
        /// Skill id
        id: String,
    },

    /// Compute the effective cost of a skill
    Cost {
        /// Base cost
        base: u32,

        /// Hint level (0-5)
        #[arg(long, default_value_t = 0)]
        hint: u8,

        /// Apply the special discount
        #[arg(long)]
        special: bool,

        /// Discount formula (default: from config)
        #[arg(long, value_enum)]
        formula: Option<FormulaArg>,
    },

    /// Build a plan from skills given as `name`, `id` or `name@hint`
    Compose {
        /// Skills to add, in order
        #[arg(required = true)]
        skills: Vec<String>,

        /// Apply the special discount
        #[arg(long)]
        special: bool,

        /// Save the plan to this slot
        #[arg(long)]
        save: Option<usize>,

        /// Title stored with the saved plan
        #[arg(long)]
        title: Option<String>,

        /// Print a share link for the plan
        #[arg(long)]
        share: bool,

        /// Print the long share link without shortening it
        #[arg(long)]
        no_shorten: bool,
    },

    /// Manage saved plan slots
    Slots {
        #[command(subcommand)]
        command: SlotsCommands,
    },

    /// Create and read share links
    Share {
        #[command(subcommand)]
        command: ShareCommands,
    },
}

#[derive(Subcommand)]
enum SlotsCommands {
    /// List every slot with a short preview
    List,

    /// Show the plan saved in a slot
    Show {
        /// Slot number
        index: usize,
    },

    /// Delete the plan saved in a slot
    Clear {
        /// Slot number
        index: usize,
    },
}

#[derive(Subcommand)]
enum ShareCommands {
    /// Print a share link for a saved slot
    Encode {
        /// Slot number
        slot: usize,

        /// Print the long link without shortening it
        #[arg(long)]
        no_shorten: bool,
    },

    /// Read a share link or payload
    Decode {
        /// Share URL or bare payload
        input: String,

        /// Save the decoded plan to this slot
        #[arg(long)]
        save: Option<usize>,

        /// Title for the saved plan (default: the shared title)
        #[arg(long)]
        title: Option<String>,
    },
}

#[derive(Clone, Copy, ValueEnum)]
enum FormulaArg {
    Additive,
    Sequential,
}

impl From<FormulaArg> for CostFormula {
    fn from(arg: FormulaArg) -> Self {
        match arg {
            FormulaArg::Additive => CostFormula::Additive,
            FormulaArg::Sequential => CostFormula::Sequential,
        }
    }
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::registry()
        .with(
            fmt::layer()
                .with_target(false)
                .without_time()
                .with_writer(std::io::stderr),
        )
        .with(filter)
        .init();
}

fn main() -> Result<()> {
    init_tracing();
    let cli = Cli::parse();
    let ctx = CommandContext::load(cli.config.as_deref(), cli.catalog)?;

    match cli.command {
        Commands::Search {
            query,
            category,
            limit,
        } => search::execute(&ctx, &query, category.as_deref(), limit),
        Commands::Show { id } => search::show(&ctx, &id),
        Commands::Cost {
            base,
            hint,
            special,
            formula,
        } => {
            let formula = formula.map(CostFormula::from).unwrap_or(ctx.config.cost.formula);
            cost::execute(base, hint, special, formula)
        }
        Commands::Compose {
            skills,
            special,
            save,
            title,
            share,
            no_shorten,
        } => {
            let options = compose::ComposeOptions {
                special,
                save,
                title,
                share,
                shorten: !no_shorten,
            };
            compose::execute(&ctx, &skills, &options)
        }
        Commands::Slots { command } => match command {
            SlotsCommands::List => slots::list(&ctx),
            SlotsCommands::Show { index } => slots::show(&ctx, index),
            SlotsCommands::Clear { index } => slots::clear(&ctx, index),
        },
        Commands::Share { command } => match command {
            ShareCommands::Encode { slot, no_shorten } => share::encode(&ctx, slot, !no_shorten),
            ShareCommands::Decode { input, save, title } => {
                share::decode(&ctx, &input, save, title.as_deref())
            }
        },
    }
}
