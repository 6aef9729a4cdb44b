mod commands;
mod logging;
mod utils;

use anyhow::Result;
use clap::{ArgGroup, Parser, Subcommand, ValueEnum};

use calendarlight_core::LightAction;

#[derive(Parser, Debug)]
#[command(name = "calendarlight")]
#[command(version, about = "Control USB connected presence lights via Google Calendar.")]
#[command(arg_required_else_help = true)]
struct Cli {
    /// Enable debugging output.
    #[arg(short = 'D', long, global = true)]
    debug: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Sign in to Google Calendar
    Login,
    /// Manage the calendars that drive the lights
    Config {
        #[command(subcommand)]
        command: ConfigCommand,
    },
    /// Watch the configured calendars and keep the lights in sync
    Run {
        /// Only drive these lights (indices from `calendarlight lights`)
        #[arg(short, long = "light")]
        lights: Vec<usize>,
    },
    /// List attached lights
    Lights,
    /// Run calendarlight in the background as a macOS launchd agent
    Service {
        #[command(subcommand)]
        command: ServiceCommand,
    },
}

#[derive(Subcommand, Debug)]
enum ConfigCommand {
    /// Show configured calendars
    List,
    /// Add one of your Google calendars
    Add,
    /// Stop watching a calendar
    Remove,
    /// Set the light used for a calendar's events without a light config
    #[command(group(
        ArgGroup::new("change")
            .required(true)
            .multiple(true)
            .args(["color", "dim", "action", "clear"])
    ))]
    Edit {
        /// Color name or hex code (e.g. "blue", "#ff8800")
        #[arg(long)]
        color: Option<String>,

        /// Brightness in percent (0-100)
        #[arg(long)]
        dim: Option<i64>,

        /// Whether events turn the light on or off
        #[arg(long, value_enum)]
        action: Option<ActionArg>,

        /// Remove the calendar's light config
        #[arg(long, conflicts_with_all = ["color", "dim", "action"])]
        clear: bool,
    },
}

#[derive(Subcommand, Debug)]
enum ServiceCommand {
    /// Write the launchd agent definition
    Install,
    /// Load the agent (starts `calendarlight run` now and at login)
    Start,
    /// Unload the agent
    Stop,
}

#[derive(ValueEnum, Clone, Copy, Debug)]
enum ActionArg {
    On,
    Off,
}

impl From<ActionArg> for LightAction {
    fn from(arg: ActionArg) -> Self {
        match arg {
            ActionArg::On => LightAction::On,
            ActionArg::Off => LightAction::Off,
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    logging::init(cli.debug);
    tracing::info!("version {}", env!("CARGO_PKG_VERSION"));
    tracing::info!("    cmd={:?}", cli.command);

    match cli.command {
        Commands::Login => commands::login::run().await,
        Commands::Config { command } => match command {
            ConfigCommand::List => commands::config::list(),
            ConfigCommand::Add => commands::config::add().await,
            ConfigCommand::Remove => commands::config::remove(),
            ConfigCommand::Edit {
                color,
                dim,
                action,
                clear,
            } => commands::config::edit(commands::config::LightChange {
                color,
                dim,
                action: action.map(Into::into),
                clear,
            }),
        },
        Commands::Run { lights } => commands::run::run(&lights).await,
        Commands::Lights => commands::lights::run(),
        Commands::Service { command } => match command {
            ServiceCommand::Install => commands::service::install(),
            ServiceCommand::Start => commands::service::start().await,
            ServiceCommand::Stop => commands::service::stop().await,
        },
    }
}
