//! Configuration loading for sprintmd.
//!
//! Supports sprintmd.toml, CLI flags, and environment variables.
//! Precedence (highest to lowest): CLI flags > env vars > config file > defaults.

use std::env;
use std::fs;
use std::path::Path;

use chrono::NaiveDate;

use crate::schedule::SprintSchedule;

/// Sprintmd configuration.
///
/// The schedule fields stay optional all the way down: anything missing
/// or unparseable is left unset and the derived values simply switch
/// off, so a half-filled config still renders the plan.
#[derive(Debug, Clone)]
pub struct Config {
    /// First day of the first sprint (yyyy-MM-dd).
    pub start_date: Option<NaiveDate>,
    /// Sprint number on the start date.
    pub start_sprint: Option<u32>,
    /// Business days per sprint.
    pub cadence: Option<u32>,
    /// Path to the plan markdown file ("-" reads stdin).
    pub plan_file: String,
    /// Colorize terminal output.
    pub color: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            start_date: None,
            start_sprint: None,
            cadence: None,
            plan_file: "sprint.md".to_string(),
            color: true,
        }
    }
}

impl Config {
    /// Load configuration from all sources with proper precedence.
    ///
    /// Precedence: CLI args > env vars > config file > defaults.
    pub fn load(cli_args: &CliArgs) -> Self {
        let mut config = Self::default();

        // Load from config file if present
        if let Some(ref path) = cli_args.config {
            match Self::load_from_file(path) {
                Ok(file_config) => config.merge_from(&file_config),
                Err(e) => eprintln!("warning: {}", e),
            }
        } else if Path::new("sprintmd.toml").exists() {
            match Self::load_from_file("sprintmd.toml") {
                Ok(file_config) => config.merge_from(&file_config),
                Err(e) => eprintln!("warning: {}", e),
            }
        }

        // Apply environment variables
        config.apply_env();

        // Apply CLI args (highest precedence)
        config.apply_cli(cli_args);

        config
    }

    /// The schedule described by this config.
    pub fn schedule(&self) -> SprintSchedule {
        SprintSchedule {
            start_date: self.start_date,
            start_sprint: self.start_sprint,
            cadence: self.cadence,
        }
    }

    /// Load configuration from a TOML file.
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(&path).map_err(|e| ConfigError::Io(e.to_string()))?;
        Self::parse_toml(&content)
    }

    /// Parse TOML content into configuration.
    pub fn parse_toml(content: &str) -> Result<Self, ConfigError> {
        let mut config = Self::default();
        let mut current_section = String::new();

        for line in content.lines() {
            let line = line.trim();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }

            // Handle section headers like [sprint]
            if line.starts_with('[') && line.ends_with(']') {
                current_section = line[1..line.len() - 1].to_string();
                continue;
            }

            if let Some((key, value)) = parse_toml_line(line) {
                // Build full key with section prefix
                let full_key = if current_section.is_empty() {
                    key.to_string()
                } else {
                    format!("{}.{}", current_section, key)
                };

                match full_key.as_str() {
                    "sprint.start_date" => {
                        let raw = value.trim_matches('"');
                        let date = NaiveDate::parse_from_str(raw, "%Y-%m-%d").map_err(|_| {
                            ConfigError::Parse(format!("invalid sprint.start_date: {}", raw))
                        })?;
                        config.start_date = Some(date);
                    }
                    "sprint.start_sprint" => {
                        let n = value.parse().map_err(|_| {
                            ConfigError::Parse(format!("invalid sprint.start_sprint: {}", value))
                        })?;
                        config.start_sprint = Some(n);
                    }
                    "sprint.cadence" => {
                        let n: u32 = value.parse().map_err(|_| {
                            ConfigError::Parse(format!("invalid sprint.cadence: {}", value))
                        })?;
                        if n == 0 {
                            eprintln!("warning: sprint.cadence must be positive; ignoring 0");
                        } else {
                            config.cadence = Some(n);
                        }
                    }
                    "files.plan" => {
                        config.plan_file = value.trim_matches('"').to_string();
                    }
                    "output.color" => {
                        config.color = value == "true";
                    }
                    _ => {} // Ignore unknown keys
                }
            }
        }

        Ok(config)
    }

    /// Apply environment variables.
    fn apply_env(&mut self) {
        if let Ok(val) = env::var("SPRINTMD_START_DATE") {
            if let Some(date) = parse_date_setting(&val, "SPRINTMD_START_DATE") {
                self.start_date = Some(date);
            }
        }
        if let Ok(val) = env::var("SPRINTMD_START_SPRINT") {
            if let Some(n) = parse_sprint_setting(&val, "SPRINTMD_START_SPRINT") {
                self.start_sprint = Some(n);
            }
        }
        if let Ok(val) = env::var("SPRINTMD_CADENCE") {
            if let Some(n) = parse_cadence_setting(&val, "SPRINTMD_CADENCE") {
                self.cadence = Some(n);
            }
        }
        if let Ok(val) = env::var("SPRINTMD_PLAN") {
            self.plan_file = val;
        }
        if let Ok(val) = env::var("SPRINTMD_COLOR") {
            match val.as_str() {
                "true" | "1" => self.color = true,
                "false" | "0" => self.color = false,
                _ => {}
            }
        }
    }

    /// Apply CLI arguments.
    fn apply_cli(&mut self, args: &CliArgs) {
        if let Some(ref raw) = args.start_date {
            if let Some(date) = parse_date_setting(raw, "--start-date") {
                self.start_date = Some(date);
            }
        }
        if let Some(ref raw) = args.start_sprint {
            if let Some(n) = parse_sprint_setting(raw, "--start-sprint") {
                self.start_sprint = Some(n);
            }
        }
        if let Some(ref raw) = args.cadence {
            if let Some(n) = parse_cadence_setting(raw, "--cadence") {
                self.cadence = Some(n);
            }
        }
        if let Some(ref path) = args.plan {
            self.plan_file = path.clone();
        }
        if args.no_color {
            self.color = false;
        }
    }

    /// Merge values from another config (for file-based config).
    fn merge_from(&mut self, other: &Self) {
        self.start_date = other.start_date;
        self.start_sprint = other.start_sprint;
        self.cadence = other.cadence;
        self.plan_file = other.plan_file.clone();
        self.color = other.color;
    }

    /// Generate sprintmd.toml content for a schedule starting on
    /// `start_date`.
    pub fn starter_toml(start_date: NaiveDate) -> String {
        format!(
            r#"# Sprintmd configuration

[sprint]
start_date = "{}"  # yyyy-MM-dd
start_sprint = 1
cadence = 10  # business days per sprint

[files]
plan = "sprint.md"

[output]
color = true
"#,
            start_date.format("%Y-%m-%d")
        )
    }

    /// Starter plan for a standard ten-business-day sprint. The day
    /// markers line up with the default cadence in `starter_toml`.
    pub fn starter_plan() -> &'static str {
        r#"**Day 1:** Functional Team Business Level Testing of current sprint in `uat`

**Day 2:** Sprint Review of previous sprint

**Day 3:** _N/A_

**Day 4:** Backlog Prioritization

**Day 5:** _N/A_

**Day 6:**

- Target Dev complete EOD for current sprint
- Target Authoring complete EOD for current sprint

**Day 7:** `uat` cut off for current sprint (any story not in `qa` by EOD will be considered not being done in this sprint and should probably get pushed to the next)

**Day 8**: _N/A_

**Day 9**:
- Backlog Prioritization
- Planning Poker

**Day 10:**

- Target UAT Sign Off of previous sprint (how does this impact our `prod` deployment?)
- `prod` deployment for prior sprint, and notify prod team (Will need to evaluate on a sprint by sprint basis to determine if any dependencies will hold anything up)
- 1 PM Sprint Cut Off of current sprint
- `uat` Deployment of current sprint (Notify BA team when this is done so they can start their testing)
"#
    }
}

/// Parse a `yyyy-MM-dd` date setting. Invalid input is reported on
/// stderr and treated as unset; empty input is unset without a report.
pub fn parse_date_setting(raw: &str, origin: &str) -> Option<NaiveDate> {
    if raw.is_empty() {
        return None;
    }
    match NaiveDate::parse_from_str(raw, "%Y-%m-%d") {
        Ok(date) => Some(date),
        Err(_) => {
            eprintln!(
                "warning: ignoring {} value '{}' (expected yyyy-MM-dd)",
                origin, raw
            );
            None
        }
    }
}

fn parse_sprint_setting(raw: &str, origin: &str) -> Option<u32> {
    if raw.is_empty() {
        return None;
    }
    match raw.parse() {
        Ok(n) => Some(n),
        Err(_) => {
            eprintln!(
                "warning: ignoring {} value '{}' (expected a non-negative integer)",
                origin, raw
            );
            None
        }
    }
}

fn parse_cadence_setting(raw: &str, origin: &str) -> Option<u32> {
    if raw.is_empty() {
        return None;
    }
    match raw.parse() {
        Ok(0) | Err(_) => {
            eprintln!(
                "warning: ignoring {} value '{}' (expected a positive integer)",
                origin, raw
            );
            None
        }
        Ok(n) => Some(n),
    }
}

/// CLI arguments parsed from command line.
#[derive(Debug, Default)]
pub struct CliArgs {
    /// Subcommand to execute.
    pub command: Option<Command>,
    /// Path to config file.
    pub config: Option<String>,
    /// Path to the plan markdown file.
    pub plan: Option<String>,
    /// Schedule start date (yyyy-MM-dd).
    pub start_date: Option<String>,
    /// Sprint number on the start date.
    pub start_sprint: Option<String>,
    /// Business days per sprint.
    pub cadence: Option<String>,
    /// Override for "today" (yyyy-MM-dd).
    pub today: Option<String>,
    /// Keep re-rendering the preview as the plan changes.
    pub watch: bool,
    /// Disable colored output.
    pub no_color: bool,
    /// Show help.
    pub help: bool,
    /// Show version.
    pub version: bool,
}

/// Sprintmd subcommands.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Print the annotated plan markdown.
    Render,
    /// Render the annotated plan for the terminal.
    Preview,
    /// Show the derived schedule values.
    Status,
    /// Write a starter config and plan.
    Init,
}

impl Command {
    /// Parse command from string.
    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "render" => Some(Self::Render),
            "preview" => Some(Self::Preview),
            "status" => Some(Self::Status),
            "init" => Some(Self::Init),
            _ => None,
        }
    }
}

/// Configuration errors.
#[derive(Debug)]
pub enum ConfigError {
    /// I/O error reading config file.
    Io(String),
    /// Parse error in config file.
    Parse(String),
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Io(msg) => write!(f, "config I/O error: {}", msg),
            Self::Parse(msg) => write!(f, "config parse error: {}", msg),
        }
    }
}

impl std::error::Error for ConfigError {}

/// Parse a TOML line into key-value pair.
fn parse_toml_line(line: &str) -> Option<(&str, &str)> {
    let parts: Vec<&str> = line.splitn(2, '=').collect();
    if parts.len() != 2 {
        return None;
    }
    Some((parts[0].trim(), parts[1].trim()))
}

/// Parse CLI arguments from an iterator.
pub fn parse_args<I>(args: I) -> CliArgs
where
    I: IntoIterator<Item = String>,
{
    let mut cli = CliArgs::default();
    let mut args = args.into_iter();

    // Skip program name
    args.next();

    while let Some(arg) = args.next() {
        match arg.as_str() {
            "-h" | "--help" => cli.help = true,
            "-V" | "--version" => cli.version = true,
            "-c" | "--config" => cli.config = args.next(),
            "--plan" => cli.plan = args.next(),
            "--start-date" => cli.start_date = args.next(),
            "--start-sprint" => cli.start_sprint = args.next(),
            "--cadence" => cli.cadence = args.next(),
            "--today" => cli.today = args.next(),
            "--watch" => cli.watch = true,
            "--no-color" => cli.no_color = true,
            _ if !arg.starts_with('-') && cli.command.is_none() => {
                cli.command = Command::from_str(&arg);
            }
            _ => {} // Ignore unknown flags
        }
    }

    cli
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    // Environment variables are process-global; tests that set or read
    // them serialize here.
    static ENV_LOCK: Mutex<()> = Mutex::new(());

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    #[test]
    fn test_config_default() {
        let config = Config::default();
        assert_eq!(config.start_date, None);
        assert_eq!(config.start_sprint, None);
        assert_eq!(config.cadence, None);
        assert_eq!(config.plan_file, "sprint.md");
        assert!(config.color);
    }

    #[test]
    fn test_config_parse_toml() {
        let toml = r#"
[sprint]
start_date = "2026-08-03"
start_sprint = 2
cadence = 10

[files]
plan = "plans/team.md"

[output]
color = false
"#;
        let config = Config::parse_toml(toml).unwrap();
        assert_eq!(config.start_date, Some(d(2026, 8, 3)));
        assert_eq!(config.start_sprint, Some(2));
        assert_eq!(config.cadence, Some(10));
        assert_eq!(config.plan_file, "plans/team.md");
        assert!(!config.color);
    }

    #[test]
    fn test_parse_toml_rejects_bad_date() {
        let toml = "[sprint]\nstart_date = \"03/08/2026\"\n";
        match Config::parse_toml(toml) {
            Err(ConfigError::Parse(msg)) => assert!(msg.contains("start_date")),
            other => panic!("expected parse error, got {:?}", other),
        }
    }

    #[test]
    fn test_parse_toml_rejects_bad_cadence() {
        let toml = "[sprint]\ncadence = \"fortnight\"\n";
        assert!(Config::parse_toml(toml).is_err());
    }

    #[test]
    fn test_parse_toml_ignores_zero_cadence() {
        let toml = "[sprint]\ncadence = 0\n";
        let config = Config::parse_toml(toml).unwrap();
        assert_eq!(config.cadence, None);
    }

    #[test]
    fn test_parse_toml_ignores_unknown_keys() {
        let toml = "[sprint]\ncadence = 5\nvelocity = 99\n";
        let config = Config::parse_toml(toml).unwrap();
        assert_eq!(config.cadence, Some(5));
    }

    #[test]
    fn test_starter_toml_round_trips() {
        let toml = Config::starter_toml(d(2026, 8, 3));
        let config = Config::parse_toml(&toml).unwrap();
        assert_eq!(config.start_date, Some(d(2026, 8, 3)));
        assert_eq!(config.start_sprint, Some(1));
        assert_eq!(config.cadence, Some(10));
        assert_eq!(config.plan_file, "sprint.md");
        assert!(config.color);
    }

    #[test]
    fn test_parse_date_setting() {
        assert_eq!(parse_date_setting("2026-08-03", "t"), Some(d(2026, 8, 3)));
        assert_eq!(parse_date_setting("", "t"), None);
        assert_eq!(parse_date_setting("08/03/2026", "t"), None);
        assert_eq!(parse_date_setting("2026-02-30", "t"), None);
    }

    #[test]
    fn test_cadence_setting_requires_positive() {
        assert_eq!(parse_cadence_setting("10", "t"), Some(10));
        assert_eq!(parse_cadence_setting("0", "t"), None);
        assert_eq!(parse_cadence_setting("-3", "t"), None);
        assert_eq!(parse_cadence_setting("", "t"), None);
    }

    #[test]
    fn test_sprint_setting_allows_zero() {
        assert_eq!(parse_sprint_setting("0", "t"), Some(0));
        assert_eq!(parse_sprint_setting("-1", "t"), None);
    }

    #[test]
    fn test_apply_env() {
        let _guard = ENV_LOCK.lock().unwrap_or_else(|e| e.into_inner());
        env::set_var("SPRINTMD_CADENCE", "15");
        env::set_var("SPRINTMD_START_SPRINT", "4");
        let mut config = Config::default();
        config.apply_env();
        env::remove_var("SPRINTMD_CADENCE");
        env::remove_var("SPRINTMD_START_SPRINT");
        assert_eq!(config.cadence, Some(15));
        assert_eq!(config.start_sprint, Some(4));
    }

    #[test]
    fn test_cli_overrides_file_values() {
        let mut config = Config::parse_toml("[sprint]\ncadence = 10\n").unwrap();
        let cli = CliArgs {
            cadence: Some("5".to_string()),
            no_color: true,
            ..Default::default()
        };
        config.apply_cli(&cli);
        assert_eq!(config.cadence, Some(5));
        assert!(!config.color);
    }

    #[test]
    fn test_invalid_cli_value_leaves_field_unset() {
        let mut config = Config::default();
        let cli = CliArgs {
            start_date: Some("next tuesday".to_string()),
            ..Default::default()
        };
        config.apply_cli(&cli);
        assert_eq!(config.start_date, None);
    }

    #[test]
    fn test_parse_args_command() {
        let args = vec!["sprintmd".to_string(), "render".to_string()];
        let cli = parse_args(args);
        assert_eq!(cli.command, Some(Command::Render));
    }

    #[test]
    fn test_parse_args_flags() {
        let args = vec![
            "sprintmd".to_string(),
            "--start-date".to_string(),
            "2026-08-03".to_string(),
            "--cadence".to_string(),
            "10".to_string(),
            "--watch".to_string(),
            "preview".to_string(),
        ];
        let cli = parse_args(args);
        assert_eq!(cli.command, Some(Command::Preview));
        assert_eq!(cli.start_date, Some("2026-08-03".to_string()));
        assert_eq!(cli.cadence, Some("10".to_string()));
        assert!(cli.watch);
    }

    #[test]
    fn test_parse_args_config_and_today() {
        let args = vec![
            "sprintmd".to_string(),
            "-c".to_string(),
            "custom.toml".to_string(),
            "--today".to_string(),
            "2026-09-03".to_string(),
            "status".to_string(),
        ];
        let cli = parse_args(args);
        assert_eq!(cli.config, Some("custom.toml".to_string()));
        assert_eq!(cli.today, Some("2026-09-03".to_string()));
        assert_eq!(cli.command, Some(Command::Status));
    }

    #[test]
    fn test_parse_args_help_and_version() {
        let cli = parse_args(vec!["sprintmd".to_string(), "--help".to_string()]);
        assert!(cli.help);
        let cli = parse_args(vec!["sprintmd".to_string(), "-V".to_string()]);
        assert!(cli.version);
    }

    #[test]
    fn test_parse_args_stdin_plan() {
        let args = vec![
            "sprintmd".to_string(),
            "--plan".to_string(),
            "-".to_string(),
            "render".to_string(),
        ];
        let cli = parse_args(args);
        assert_eq!(cli.plan, Some("-".to_string()));
        assert_eq!(cli.command, Some(Command::Render));
    }

    #[test]
    fn test_command_from_str() {
        assert_eq!(Command::from_str("render"), Some(Command::Render));
        assert_eq!(Command::from_str("preview"), Some(Command::Preview));
        assert_eq!(Command::from_str("status"), Some(Command::Status));
        assert_eq!(Command::from_str("init"), Some(Command::Init));
        assert_eq!(Command::from_str("unknown"), None);
    }

    #[test]
    fn test_schedule_bridge() {
        let config = Config::parse_toml("[sprint]\nstart_date = \"2026-08-03\"\nstart_sprint = 2\ncadence = 10\n").unwrap();
        let schedule = config.schedule();
        assert_eq!(schedule.current_sprint_number(d(2026, 9, 3)), Some(4));
    }
}
