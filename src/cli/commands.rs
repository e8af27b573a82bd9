use clap::{Args, Parser, Subcommand};

use crate::ops::analytics::MAX_WINDOW_MONTHS;

#[derive(Parser)]
#[command(name = "ux", about = concat!("uxdebt v", env!("CARGO_PKG_VERSION"), " - track the UX debt in your product"), version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Output as JSON
    #[arg(long, global = true)]
    pub json: bool,

    /// Use the .uxdebt/ directory at (or above) this path
    #[arg(short = 'C', long = "data-dir", global = true)]
    pub data_dir: Option<String>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Create a .uxdebt/ directory here
    Init(InitArgs),
    /// Store the email shown as the current user
    Login(LoginArgs),
    /// Forget the current user
    Logout,
    /// Show the current user
    Whoami,
    /// Manage projects
    Project(ProjectCmd),
    /// Log a new debt item
    Add(AddArgs),
    /// List debt items as a table
    List(FilterArgs),
    /// Show debt items grouped by status
    Board(FilterArgs),
    /// Show a debt item
    Show(IdArg),
    /// Move a debt item to its next status
    Advance(IdArg),
    /// Set a debt item's status
    Status(StatusArgs),
    /// Delete a debt item
    Rm(IdArg),
    /// Show analytics
    Stats(StatsArgs),
    /// Read or change config.toml
    Config(ConfigCmd),
    /// Show the recovery log
    Recovery(RecoveryArgs),
}

// ---------------------------------------------------------------------------
// Setup and identity
// ---------------------------------------------------------------------------

#[derive(Args)]
pub struct InitArgs {
    /// Seed sample projects and debt items
    #[arg(long)]
    pub demo: bool,
    /// Reinitialize even if .uxdebt/ already exists
    #[arg(long)]
    pub force: bool,
}

#[derive(Args)]
pub struct LoginArgs {
    /// Email address to show as the current user
    pub email: String,
}

// ---------------------------------------------------------------------------
// Projects
// ---------------------------------------------------------------------------

#[derive(Args)]
pub struct ProjectCmd {
    #[command(subcommand)]
    pub action: Option<ProjectAction>,
}

#[derive(Subcommand)]
pub enum ProjectAction {
    /// Create a project
    Add(ProjectAddArgs),
    /// List projects with item counts
    List,
    /// Delete a project
    Rm(ProjectRmArgs),
}

#[derive(Args)]
pub struct ProjectAddArgs {
    /// Display name
    pub name: String,
    #[arg(long, short = 'd')]
    pub description: Option<String>,
}

#[derive(Args)]
pub struct ProjectRmArgs {
    /// Project ID
    pub id: String,
    /// Also delete the project's debt items
    #[arg(long)]
    pub with_items: bool,
}

// ---------------------------------------------------------------------------
// Debt items
// ---------------------------------------------------------------------------

#[derive(Args)]
pub struct AddArgs {
    /// Project ID
    #[arg(long, short = 'p')]
    pub project: Option<String>,
    #[arg(long, short = 't')]
    pub title: Option<String>,
    /// Screen or component where the issue appears
    #[arg(long)]
    pub screen: Option<String>,
    /// visual, accessibility, copy, or usability
    #[arg(long = "type")]
    pub kind: Option<String>,
    /// high, medium, or low
    #[arg(long, short = 's')]
    pub severity: Option<String>,
    #[arg(long)]
    pub description: Option<String>,
    #[arg(long)]
    pub recommendation: Option<String>,
    /// Who found the issue (default: the logged-in email)
    #[arg(long)]
    pub logged_by: Option<String>,
    /// Screenshot path, link, or data URI
    #[arg(long)]
    pub screenshot: Option<String>,
    /// Figma link
    #[arg(long)]
    pub figma: Option<String>,
}

#[derive(Args)]
pub struct FilterArgs {
    /// Only these projects (repeatable)
    #[arg(long, short = 'p')]
    pub project: Vec<String>,
    #[arg(long, short = 's')]
    pub severity: Option<String>,
    #[arg(long = "type")]
    pub kind: Option<String>,
    #[arg(long)]
    pub status: Option<String>,
    /// Case-insensitive text to look for
    #[arg(long, short = 'q')]
    pub search: Option<String>,
}

#[derive(Args)]
pub struct IdArg {
    /// Debt item ID (e.g. UX-001)
    pub id: String,
}

#[derive(Args)]
pub struct StatusArgs {
    /// Debt item ID
    pub id: String,
    /// open, in-progress, fixed, or resolved
    pub status: String,
}

// ---------------------------------------------------------------------------
// Analytics, config, recovery
// ---------------------------------------------------------------------------

#[derive(Args)]
pub struct StatsArgs {
    /// all, 30d, 90d, or 1y
    #[arg(long, default_value = "all")]
    pub range: String,
    /// Only this project
    #[arg(long, short = 'p')]
    pub project: Option<String>,
    /// Months in the trend, 1-120 (default: analytics.window_months)
    #[arg(long, value_parser = clap::value_parser!(u32).range(1..=MAX_WINDOW_MONTHS as i64))]
    pub months: Option<u32>,
}

#[derive(Args)]
pub struct ConfigCmd {
    #[command(subcommand)]
    pub action: ConfigAction,
}

#[derive(Subcommand)]
pub enum ConfigAction {
    /// Print a value (e.g. ids.prefix)
    Get(ConfigGetArgs),
    /// Change a value, keeping the file's comments
    Set(ConfigSetArgs),
}

#[derive(Args)]
pub struct ConfigGetArgs {
    pub key: String,
}

#[derive(Args)]
pub struct ConfigSetArgs {
    pub key: String,
    pub value: String,
}

#[derive(Args)]
pub struct RecoveryArgs {
    /// Maximum number of entries to show (default: 10)
    #[arg(long)]
    pub limit: Option<usize>,
    /// Print the path to the recovery log instead
    #[arg(long)]
    pub path: bool,
}
