use clap::{Parser, Subcommand};

mod commands;

#[derive(Parser)]
#[command(name = "dayflow", version, about = "Dayflow personal task planner")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Task management
    Task {
        #[command(subcommand)]
        action: commands::task::TaskAction,
    },
    /// Protected time window management
    Constraint {
        #[command(subcommand)]
        action: commands::constraint::ConstraintAction,
    },
    /// Scheduling runs and schedule views
    Schedule {
        #[command(subcommand)]
        action: commands::schedule::ScheduleAction,
    },
    /// List scheduling conflicts
    Conflicts {
        /// Also propose remediation options
        #[arg(long)]
        propose: bool,
    },
    /// Workload analytics
    Analyze {
        #[command(subcommand)]
        action: commands::analyze::AnalyzeAction,
    },
    /// Export the committed schedule
    Export {
        #[command(subcommand)]
        action: commands::export::ExportAction,
    },
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Task { action } => commands::task::run(action),
        Commands::Constraint { action } => commands::constraint::run(action),
        Commands::Schedule { action } => commands::schedule::run(action),
        Commands::Conflicts { propose } => commands::conflicts::run(propose),
        Commands::Analyze { action } => commands::analyze::run(action),
        Commands::Export { action } => commands::export::run(action),
    };

    if let Err(err) = result {
        eprintln!("Error: {err}");
        std::process::exit(1);
    }
}
