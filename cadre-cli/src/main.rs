use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::process::ExitCode;

mod commands;

#[derive(Parser, Debug)]
#[command(name = "cadre", version = "0.1.0")]
#[command(about = "Cadre CLI - route requests through role agents")]
struct Cli {
    /// TOML settings file; environment variables are used when absent
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Split a request into sub-tasks and run each on the role agents
    Plan {
        request: String,
        #[arg(long, default_value = "cli")]
        session: String,
        /// Backend provider for every agent (default: configured provider)
        #[arg(long)]
        provider: Option<String>,
    },
    /// Send one message to a single agent
    Chat {
        message: String,
        #[arg(long, default_value = "travel_planner")]
        agent_type: String,
        #[arg(long)]
        provider: Option<String>,
        #[arg(long, default_value = "cli")]
        session: String,
    },
    /// List the tools bound to a role
    Tools {
        #[arg(long, default_value = "travel_planner")]
        agent_type: String,
    },
    /// Show the sub-tasks a request expands into
    Analyze { request: String },
}

fn main() -> ExitCode {
    // JSON logs go to stderr so stdout stays machine readable.
    let env_filter = tracing_subscriber::EnvFilter::from_default_env();
    let env_filter = match "info".parse() {
        Ok(directive) => env_filter.add_directive(directive),
        Err(_) => env_filter,
    };

    let _ = tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .json()
        .try_init();

    let cli = Cli::parse();

    let settings = match commands::load_settings(cli.config.as_deref()) {
        Ok(settings) => settings,
        Err(err) => {
            tracing::error!(error = %err, "Invalid configuration");
            eprintln!("configuration error: {err}");
            return ExitCode::from(2);
        }
    };

    let outcome = match cli.command {
        Commands::Plan {
            request,
            session,
            provider,
        } => commands::plan(settings, &request, &session, provider.as_deref()),
        Commands::Chat {
            message,
            agent_type,
            provider,
            session,
        } => commands::chat(settings, &message, &agent_type, provider.as_deref(), &session),
        Commands::Tools { agent_type } => commands::tools(&agent_type),
        Commands::Analyze { request } => commands::analyze(settings, &request),
    };

    match outcome {
        Ok(value) => {
            commands::print_json(&value);
            ExitCode::SUCCESS
        }
        Err(err) => {
            tracing::error!(error = %err, "Command failed");
            eprintln!("{err}");
            ExitCode::FAILURE
        }
    }
}
