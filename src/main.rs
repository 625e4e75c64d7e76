use std::env;
use std::fs;
use std::io::{self, Read, Write};
use std::path::Path;
use std::process;

use chrono::{Local, NaiveDate};

use sprintmd::augment;
use sprintmd::color::{self, emoji};
use sprintmd::config::{self, Command, Config};
use sprintmd::preview;
use sprintmd::watch;

const VERSION: &str = env!("CARGO_PKG_VERSION");

fn main() {
    let args: Vec<String> = env::args().collect();
    let cli = config::parse_args(args);

    if cli.help {
        print_help();
        return;
    }

    if cli.version {
        println!("sprintmd {}", VERSION);
        return;
    }

    let config = Config::load(&cli);
    color::set_enabled(config.color);

    let today_override = cli
        .today
        .as_deref()
        .and_then(|raw| config::parse_date_setting(raw, "--today"));

    // Default command is Render if none specified
    let command = cli.command.clone().unwrap_or(Command::Render);

    // Register Ctrl+C handler for the watch loop
    if command == Command::Preview && cli.watch {
        if let Err(e) = watch::register_handler() {
            eprintln!("warning: {}", e);
        }
    }

    let result = match command {
        Command::Render => cmd_render(&config, today_override),
        Command::Preview => cmd_preview(&config, today_override, cli.watch),
        Command::Status => cmd_status(&config, today_override),
        Command::Init => cmd_init(&config, today_override),
    };

    if let Err(e) = result {
        eprintln!("error: {}", e);
        process::exit(1);
    }
}

fn print_help() {
    println!(
        r#"sprintmd - sprint-aware markdown plan annotator

USAGE:
    sprintmd [OPTIONS] [COMMAND]

COMMANDS:
    render            Print the annotated plan markdown (default)
    preview           Render the annotated plan for the terminal
    status            Show the derived schedule values
    init              Write a starter sprintmd.toml and plan

OPTIONS:
    -h, --help              Show this help message
    -V, --version           Show version
    -c, --config <PATH>     Path to config file (default: sprintmd.toml)
    --plan <PATH>           Path to plan file, "-" for stdin (default: sprint.md)
    --start-date <DATE>     First day of the first sprint (yyyy-MM-dd)
    --start-sprint <N>      Sprint number carried by the first sprint
    --cadence <N>           Business days per sprint
    --today <DATE>          Pretend today is DATE (yyyy-MM-dd)
    --watch                 With preview: re-render when the plan changes
    --no-color              Disable colored output

The annotation pass block-quotes the section of the plan belonging to
the active sprint day, expands phrases like "previous sprint" or "next
sprint" into numbered references, and prepends a banner naming the
current sprint. Weekends never advance the schedule.

EXAMPLES:
    sprintmd init                          Create sprintmd.toml and sprint.md
    sprintmd render > annotated.md         Annotate the plan to stdout
    sprintmd --plan - render < plan.md     Annotate stdin
    sprintmd preview --watch               Live preview while editing the plan
    sprintmd --today 2026-09-03 status     Inspect the schedule on a date
"#
    );
}

/// The date annotations are computed against. Read once per render so
/// every derived value agrees.
fn resolve_today(today_override: Option<NaiveDate>) -> NaiveDate {
    today_override.unwrap_or_else(|| Local::now().date_naive())
}

/// Read the plan, or stdin when the configured path is "-".
fn read_plan(config: &Config) -> Result<String, String> {
    if config.plan_file == "-" {
        let mut content = String::new();
        io::stdin()
            .read_to_string(&mut content)
            .map_err(|e| format!("failed to read stdin: {}", e))?;
        return Ok(content);
    }
    fs::read_to_string(&config.plan_file)
        .map_err(|e| format!("failed to read {}: {}", config.plan_file, e))
}

/// Print the annotated plan markdown.
fn cmd_render(config: &Config, today_override: Option<NaiveDate>) -> Result<(), String> {
    let content = read_plan(config)?;
    let today = resolve_today(today_override);
    let annotated = augment::augment(&content, &config.schedule(), today);
    print!("{}", annotated);
    io::stdout()
        .flush()
        .map_err(|e| format!("failed to write output: {}", e))?;
    Ok(())
}

/// Render the annotated plan for the terminal, optionally re-rendering
/// whenever the plan file changes.
fn cmd_preview(
    config: &Config,
    today_override: Option<NaiveDate>,
    watch_mode: bool,
) -> Result<(), String> {
    if !watch_mode {
        let content = read_plan(config)?;
        let today = resolve_today(today_override);
        let annotated = augment::augment(&content, &config.schedule(), today);
        println!("{}", preview::render(&annotated, config.color));
        return Ok(());
    }

    if config.plan_file == "-" {
        return Err("cannot watch stdin; use --plan with a file path".to_string());
    }

    let schedule = config.schedule();
    let mut first = true;
    watch::watch(&config.plan_file, |content| {
        // Re-resolved per render so a watch running past midnight
        // stays on the right day.
        let today = resolve_today(today_override);
        if !first {
            let stamp = Local::now().format("%Y-%m-%d %H:%M:%S");
            println!();
            println!(
                "{}",
                color::timestamp(&format!("--- {} changed at {} ---", config.plan_file, stamp))
            );
        }
        first = false;
        let annotated = augment::augment(content, &schedule, today);
        println!("{}", preview::render(&annotated, config.color));
        Ok(())
    })
}

/// Show the derived schedule values.
fn cmd_status(config: &Config, today_override: Option<NaiveDate>) -> Result<(), String> {
    let today = resolve_today(today_override);
    let schedule = config.schedule();

    println!(
        "{} {} ({})",
        emoji::SPRINT,
        color::label("Sprint status"),
        config.plan_file
    );
    if config.plan_file != "-" && !Path::new(&config.plan_file).exists() {
        println!(
            "  {}",
            color::warning("plan file not found; run 'sprintmd init'")
        );
    }

    println!("  Today:        {}", color::number(today.format("%Y-%m-%d")));
    match schedule.start_date {
        Some(date) => println!("  Start date:   {}", color::number(date.format("%Y-%m-%d"))),
        None => println!("  Start date:   {}", color::warning("(not set)")),
    }
    match schedule.start_sprint {
        Some(n) => println!("  Start sprint: {}", color::number(n)),
        None => println!("  Start sprint: {}", color::warning("(not set)")),
    }
    match schedule.cadence {
        Some(n) => println!("  Cadence:      {} business days", color::number(n)),
        None => println!("  Cadence:      {}", color::warning("(not set)")),
    }

    if let Some(days) = schedule.days_since_start(today) {
        println!("  Elapsed:      {} business days", color::number(days));
    }
    match (schedule.active_day_number(today), schedule.cadence) {
        (Some(day), Some(cadence)) => {
            println!("  Active day:   {} of {}", color::number(day), cadence);
        }
        _ => println!(
            "  Active day:   {}",
            color::warning("(needs start date and cadence)")
        ),
    }
    match schedule.current_sprint_number(today) {
        Some(n) => {
            let previous = if n > 0 { (n - 1).to_string() } else { "N/A".to_string() };
            println!(
                "  Sprint:       {} (previous {}, next {})",
                color::number(n),
                previous,
                n + 1
            );
        }
        None => println!(
            "  Sprint:       {}",
            color::warning("(needs start date, start sprint, and cadence)")
        ),
    }

    Ok(())
}

/// Write a starter config and plan.
fn cmd_init(config: &Config, today_override: Option<NaiveDate>) -> Result<(), String> {
    if config.plan_file == "-" {
        return Err("cannot init stdin; use --plan with a file path".to_string());
    }

    println!("Initializing sprintmd project...");
    let today = resolve_today(today_override);
    let start_date = config.start_date.unwrap_or(today);

    let config_path = Path::new("sprintmd.toml");
    if config_path.exists() {
        println!("  Config already exists: sprintmd.toml");
    } else {
        fs::write(config_path, Config::starter_toml(start_date))
            .map_err(|e| format!("failed to create sprintmd.toml: {}", e))?;
        println!(
            "  {} {}",
            emoji::CHECK,
            color::success(&format!(
                "Created sprintmd.toml (start date {})",
                start_date.format("%Y-%m-%d")
            ))
        );
    }

    let plan_path = Path::new(&config.plan_file);
    if plan_path.exists() {
        println!("  Plan already exists: {}", config.plan_file);
    } else {
        ensure_parent_dir(plan_path)?;
        fs::write(plan_path, Config::starter_plan())
            .map_err(|e| format!("failed to create {}: {}", config.plan_file, e))?;
        println!(
            "  {} {}",
            emoji::CHECK,
            color::success(&format!("Created {}", config.plan_file))
        );
    }

    println!("\nRun 'sprintmd status' to check the schedule.");
    Ok(())
}

fn ensure_parent_dir(path: &Path) -> Result<(), String> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)
                .map_err(|e| format!("failed to create directory {}: {}", parent.display(), e))?;
        }
    }
    Ok(())
}
