mod init;
pub use init::cmd_init;

use std::path::Path;

use crate::cli::commands::*;
use crate::cli::output::*;
use crate::io::config_io;
use crate::io::data_dir::resolve_data_dir;
use crate::io::recovery::{read_recovery_entries, recovery_log_path};
use crate::io::session;
use crate::io::store::FileStore;
use crate::model::*;
use crate::ops::analytics::{AnalyticsScope, TimeRange};
use crate::ops::board::group_by_status;
use crate::service::Tracker;

/// Default number of recovery entries shown
const RECOVERY_LIMIT: usize = 10;

// ---------------------------------------------------------------------------
// Dispatch
// ---------------------------------------------------------------------------

pub fn dispatch(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    let json = cli.json;
    let override_dir = cli.data_dir;
    let data_dir = || resolve_data_dir(override_dir.as_deref());
    // Everything past the identity commands needs a login
    let context = || -> Result<Context, Box<dyn std::error::Error>> {
        let data_dir = data_dir()?;
        let user = session::require_identity(&data_dir)?;
        let config = config_io::read_config(&data_dir)?;
        Ok(Context {
            tracker: open_tracker(&data_dir, &config),
            data_dir,
            config,
            user,
            json,
        })
    };

    let Some(cmd) = cli.command else {
        return Err("no command given (try `ux --help`)".into());
    };

    match cmd {
        // Setup and identity
        Commands::Init(args) => cmd_init(args, override_dir.as_deref()),
        Commands::Login(args) => cmd_login(&data_dir()?, args, json),
        Commands::Logout => cmd_logout(&data_dir()?),
        Commands::Whoami => cmd_whoami(&data_dir()?, json),

        // Read commands
        Commands::List(args) => cmd_list(&context()?, args),
        Commands::Board(args) => cmd_board(&context()?, args),
        Commands::Show(args) => cmd_show(&context()?, args),
        Commands::Stats(args) => cmd_stats(&context()?, args),
        Commands::Recovery(args) => cmd_recovery(&context()?, args),

        // Write commands
        Commands::Project(args) => cmd_project(&mut context()?, args),
        Commands::Add(args) => cmd_add(&mut context()?, args),
        Commands::Advance(args) => cmd_advance(&mut context()?, args),
        Commands::Status(args) => cmd_status(&mut context()?, args),
        Commands::Rm(args) => cmd_rm(&mut context()?, args),
        Commands::Config(args) => {
            // Skips read_config so a rejected value can still be fixed
            let data_dir = data_dir()?;
            session::require_identity(&data_dir)?;
            cmd_config(&data_dir, args)
        }
    }
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// Everything a logged-in command runs against
struct Context {
    data_dir: std::path::PathBuf,
    config: AppConfig,
    user: UserIdentity,
    tracker: Tracker<FileStore>,
    json: bool,
}

/// Open the collections in `data_dir`, printing any load warnings.
pub fn open_tracker(data_dir: &Path, config: &AppConfig) -> Tracker<FileStore> {
    let mut tracker = Tracker::open(FileStore::new(data_dir), config.ids.prefix.clone());
    for warning in tracker.take_warnings() {
        eprintln!("warning: {}", warning);
    }
    tracker
}

/// Build a filter from command-line flags
fn build_filter(args: &FilterArgs) -> Result<FilterSpec, ParseChoiceError> {
    Ok(FilterSpec {
        project_ids: args.project.iter().cloned().collect(),
        severity: args.severity.as_deref().map(str::parse).transpose()?,
        kind: args.kind.as_deref().map(str::parse).transpose()?,
        status: args.status.as_deref().map(str::parse).transpose()?,
        search: args.search.clone().unwrap_or_default(),
    })
}

fn print_lines(lines: &[String]) {
    for line in lines {
        println!("{}", line);
    }
}

// ---------------------------------------------------------------------------
// Identity
// ---------------------------------------------------------------------------

fn cmd_login(data_dir: &Path, args: LoginArgs, json: bool) -> Result<(), Box<dyn std::error::Error>> {
    let user = session::login(data_dir, &args.email)?;
    if json {
        print_user_json(&user)?;
    } else {
        println!("Logged in as {}", user.email);
    }
    Ok(())
}

fn cmd_logout(data_dir: &Path) -> Result<(), Box<dyn std::error::Error>> {
    if session::logout(data_dir) {
        println!("Logged out");
    } else {
        println!("Not logged in");
    }
    Ok(())
}

fn cmd_whoami(data_dir: &Path, json: bool) -> Result<(), Box<dyn std::error::Error>> {
    let user = session::require_identity(data_dir)?;
    if json {
        print_user_json(&user)?;
    } else {
        println!("{} ({})", user.greeting(), user.email);
    }
    Ok(())
}

fn print_user_json(user: &UserIdentity) -> Result<(), Box<dyn std::error::Error>> {
    let out = UserJson {
        email: &user.email,
        handle: user.handle(),
        initials: user.initials(),
    };
    println!("{}", serde_json::to_string_pretty(&out)?);
    Ok(())
}

// ---------------------------------------------------------------------------
// Read commands
// ---------------------------------------------------------------------------

fn cmd_list(ctx: &Context, args: FilterArgs) -> Result<(), Box<dyn std::error::Error>> {
    let spec = build_filter(&args)?;
    let projects = ctx.tracker.projects();
    let items = ctx.tracker.visible(&spec);

    if ctx.json {
        let out: Vec<ItemJson> = items.iter().map(|i| item_to_json(i, projects)).collect();
        println!("{}", serde_json::to_string_pretty(&out)?);
        return Ok(());
    }

    print_lines(&format_item_table(&items, projects));
    if !spec.is_empty() {
        println!();
        println!(
            "{} of {} items match {}",
            items.len(),
            ctx.tracker.items().len(),
            spec.describe()
        );
    }
    Ok(())
}

fn cmd_board(ctx: &Context, args: FilterArgs) -> Result<(), Box<dyn std::error::Error>> {
    let spec = build_filter(&args)?;
    let projects = ctx.tracker.projects();
    let items = ctx.tracker.visible(&spec);
    let board = group_by_status(&items);

    if ctx.json {
        println!(
            "{}",
            serde_json::to_string_pretty(&board_to_json(&board, projects))?
        );
    } else {
        print_lines(&format_board(&board, projects));
    }
    Ok(())
}

fn cmd_show(ctx: &Context, args: IdArg) -> Result<(), Box<dyn std::error::Error>> {
    let item = ctx.tracker.item(&args.id)?;
    let projects = ctx.tracker.projects();
    if ctx.json {
        println!(
            "{}",
            serde_json::to_string_pretty(&item_to_json(item, projects))?
        );
    } else {
        print_lines(&format_item_detail(item, projects));
    }
    Ok(())
}

fn cmd_stats(ctx: &Context, args: StatsArgs) -> Result<(), Box<dyn std::error::Error>> {
    let range: TimeRange = args.range.parse()?;
    let project_label = match &args.project {
        Some(id) => ctx.tracker.project(id)?.name.clone(),
        None => "all projects".to_string(),
    };
    let scope = AnalyticsScope {
        range,
        project_id: args.project,
    };
    let months = args.months.unwrap_or(ctx.config.analytics.window_months);
    let analytics = ctx.tracker.analytics(&scope, months);

    if ctx.json {
        println!("{}", serde_json::to_string_pretty(&analytics)?);
    } else {
        let label = format!("{}, {}", range.label(), project_label);
        print_lines(&format_analytics(&analytics, &label));
    }
    Ok(())
}

fn cmd_recovery(ctx: &Context, args: RecoveryArgs) -> Result<(), Box<dyn std::error::Error>> {
    if args.path {
        println!("{}", recovery_log_path(&ctx.data_dir).display());
        return Ok(());
    }

    let limit = args.limit.unwrap_or(RECOVERY_LIMIT);
    let entries = read_recovery_entries(&ctx.data_dir, Some(limit));
    if ctx.json {
        let out: Vec<RecoveryEntryJson> = entries.iter().map(recovery_entry_to_json).collect();
        println!("{}", serde_json::to_string_pretty(&out)?);
        return Ok(());
    }

    if entries.is_empty() {
        println!("No recovery entries.");
        return Ok(());
    }
    for (i, entry) in entries.iter().enumerate() {
        if i > 0 {
            println!();
        }
        print_lines(&format_recovery_entry(entry));
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Write commands
// ---------------------------------------------------------------------------

fn cmd_project(ctx: &mut Context, args: ProjectCmd) -> Result<(), Box<dyn std::error::Error>> {
    match args.action {
        None | Some(ProjectAction::List) => cmd_project_list(ctx),
        Some(ProjectAction::Add(a)) => cmd_project_add(ctx, a),
        Some(ProjectAction::Rm(a)) => cmd_project_rm(ctx, a),
    }
}

fn cmd_project_list(ctx: &Context) -> Result<(), Box<dyn std::error::Error>> {
    let projects = ctx.tracker.projects();
    let summaries = ctx.tracker.project_summaries();

    if ctx.json {
        let out: Vec<ProjectJson> = projects
            .iter()
            .zip(&summaries)
            .map(|(project, summary)| ProjectJson {
                project,
                counts: summary_to_json(summary),
            })
            .collect();
        println!("{}", serde_json::to_string_pretty(&out)?);
    } else {
        print_lines(&format_project_list(projects, &summaries));
    }
    Ok(())
}

fn cmd_project_add(ctx: &mut Context, args: ProjectAddArgs) -> Result<(), Box<dyn std::error::Error>> {
    let project = ctx
        .tracker
        .create_project(&args.name, args.description.as_deref())?;
    if ctx.json {
        println!("{}", serde_json::to_string_pretty(&project)?);
    } else {
        println!("Created project {} ({})", project.name, project.id);
    }
    Ok(())
}

fn cmd_project_rm(ctx: &mut Context, args: ProjectRmArgs) -> Result<(), Box<dyn std::error::Error>> {
    let orphaned = ctx
        .tracker
        .items()
        .iter()
        .filter(|i| i.project_id == args.id)
        .count();
    let (project, removed) = ctx.tracker.remove_project(&args.id, args.with_items)?;

    if removed.is_empty() {
        println!("Removed project {} ({})", project.name, project.id);
    } else {
        println!(
            "Removed project {} ({}) and {} debt items",
            project.name,
            project.id,
            removed.len()
        );
    }
    if !args.with_items && orphaned > 0 {
        eprintln!(
            "note: {} debt items still reference {} and now show under \"{}\"",
            orphaned, project.id, UNKNOWN_PROJECT
        );
    }
    Ok(())
}

fn cmd_add(ctx: &mut Context, args: AddArgs) -> Result<(), Box<dyn std::error::Error>> {
    let draft = DebtDraft {
        project_id: args.project.unwrap_or_default(),
        title: args.title.unwrap_or_default(),
        screen: args.screen.unwrap_or_default(),
        kind: args.kind.as_deref().map(str::parse).transpose()?,
        severity: args.severity.as_deref().map(str::parse).transpose()?,
        description: args.description.unwrap_or_default(),
        recommendation: args.recommendation.unwrap_or_default(),
        logged_by: args.logged_by.unwrap_or_else(|| ctx.user.email.clone()),
        screenshot: args.screenshot,
        figma_link: args.figma,
    };

    let project_id = draft.project_id.trim();
    if !project_id.is_empty() && ctx.tracker.project(project_id).is_err() {
        eprintln!("warning: no project with id {}", project_id);
    }

    let item = ctx.tracker.create(draft)?;
    if ctx.json {
        let projects = ctx.tracker.projects();
        println!(
            "{}",
            serde_json::to_string_pretty(&item_to_json(&item, projects))?
        );
    } else {
        println!("Created {}: {}", item.id, item.title);
    }
    Ok(())
}

fn print_transition(
    json: bool,
    item: &DebtItem,
    before: DebtStatus,
) -> Result<(), Box<dyn std::error::Error>> {
    if json {
        println!("{}", serde_json::to_string_pretty(item)?);
    } else if before == item.status {
        println!("{} is already {}", item.id, item.status);
    } else {
        println!("{}: {} → {}", item.id, before, item.status);
    }
    Ok(())
}

fn cmd_advance(ctx: &mut Context, args: IdArg) -> Result<(), Box<dyn std::error::Error>> {
    let before = ctx.tracker.item(&args.id)?.status;
    let item = ctx.tracker.advance(&args.id)?;
    print_transition(ctx.json, &item, before)
}

fn cmd_status(ctx: &mut Context, args: StatusArgs) -> Result<(), Box<dyn std::error::Error>> {
    let target: DebtStatus = args.status.parse()?;
    let before = ctx.tracker.item(&args.id)?.status;
    let item = ctx.tracker.set_status(&args.id, target)?;
    print_transition(ctx.json, &item, before)
}

fn cmd_rm(ctx: &mut Context, args: IdArg) -> Result<(), Box<dyn std::error::Error>> {
    match ctx.tracker.remove(&args.id)? {
        Some(item) => {
            println!("Removed {}: {}", item.id, item.title);
            Ok(())
        }
        None => Err(format!("item not found: {}", args.id).into()),
    }
}

fn cmd_config(data_dir: &Path, args: ConfigCmd) -> Result<(), Box<dyn std::error::Error>> {
    let mut doc = config_io::read_config_doc(data_dir)?;
    match args.action {
        ConfigAction::Get(a) => match config_io::get_value(&doc, &a.key)? {
            Some(value) => println!("{}", value),
            None => return Err(format!("{} is not set", a.key).into()),
        },
        ConfigAction::Set(a) => {
            config_io::set_value(&mut doc, &a.key, &a.value)?;
            config_io::write_config(data_dir, &doc)?;
            println!("{} = {}", a.key, a.value);
        }
    }
    Ok(())
}
