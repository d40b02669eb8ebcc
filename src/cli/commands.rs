//! Command definitions for the worktrack CLI.
//!
//! Uses clap derive macro for argument parsing.

use std::path::PathBuf;

use chrono::NaiveDate;
use clap::{Args, Parser, Subcommand};

use crate::report::TaskFilter;
use crate::timer::validate;
use crate::types::{canonical_category, EmployeeType, TaskStatus};

// ============================================================================
// CLI Structure
// ============================================================================

/// worktrack - task timers, deadline alerts and team reports
#[derive(Parser, Debug)]
#[command(
    name = "worktrack",
    version,
    about = "Task timers, deadline alerts and team reports",
    long_about = "Log daily tasks, run start/pause/finish timers against them and\n\
                  see what the team is working on. Data lives in a local JSON file.",
    propagate_version = true
)]
pub struct Cli {
    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Act as this user (profile id or email); defaults to $WORKTRACK_USER
    #[arg(long = "as", global = true, value_name = "USER")]
    pub as_user: Option<String>,

    /// Data file to use instead of the configured one
    #[arg(long, global = true, value_name = "PATH")]
    pub data: Option<PathBuf>,

    /// Enable verbose output for debugging
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

// ============================================================================
// Subcommands
// ============================================================================

/// Available subcommands
#[derive(Subcommand, Debug, Clone)]
pub enum Commands {
    /// Fill the data file with demo users and tasks
    Seed {
        /// Overwrite existing data
        #[arg(long)]
        force: bool,
    },

    /// Create a task
    Add(AddArgs),

    /// List tasks (your own, or everyone's for admins)
    List(ListArgs),

    /// Start the timer of a task, pausing any other running timer
    Start(TaskRef),

    /// Pause the timer of a task
    Pause(TaskRef),

    /// Mark a task finished and stop its timer
    Finish(TaskRef),

    /// Edit a task
    Edit(EditArgs),

    /// Delete a task and its time sessions
    Delete(TaskRef),

    /// Show your day: running timer, today's tasks and totals
    Status,

    /// Team totals and breakdowns for a day (admin)
    Summary(SummaryArgs),

    /// Who is working on what right now
    Team,

    /// Export tasks as CSV (admin)
    Export(ExportArgs),

    /// Manage employee records (admin)
    Employees {
        #[command(subcommand)]
        action: Option<EmployeesCommand>,
    },

    /// Watch running tasks and warn as they approach their target
    Watch(WatchArgs),

    /// Generate shell completion scripts
    Completions {
        /// Shell type for completion script
        #[arg(value_enum)]
        shell: clap_complete::Shell,
    },
}

/// Employee record actions
#[derive(Subcommand, Debug, Clone)]
pub enum EmployeesCommand {
    /// List employees
    List,

    /// Rename an employee or change their type
    Edit {
        /// Profile id or email
        user: String,

        /// New display name
        #[arg(long)]
        name: Option<String>,

        /// New employee type, e.g. "Video Editor"
        #[arg(long = "type", value_parser = parse_employee_type)]
        employee_type: Option<EmployeeType>,
    },

    /// Activate or deactivate an employee
    Toggle {
        /// Profile id or email
        user: String,
    },
}

// ============================================================================
// Arguments
// ============================================================================

/// A task, by id or unique id prefix
#[derive(Args, Debug, Clone)]
pub struct TaskRef {
    /// Task id (a unique prefix is enough)
    pub task: String,
}

/// Arguments for the add command
#[derive(Args, Debug, Clone)]
pub struct AddArgs {
    /// Task title
    #[arg(value_parser = validate_title)]
    pub title: String,

    /// Longer description
    #[arg(short, long, default_value = "", value_parser = validate_description)]
    pub description: String,

    /// Category, e.g. Development, Design, Marketing, Content, SEO, Sales,
    /// Meeting or Other; defaults to the configured one
    #[arg(short, long, value_parser = parse_category)]
    pub category: Option<String>,

    /// Day the task belongs to (YYYY-MM-DD); defaults to today
    #[arg(long, value_parser = parse_date)]
    pub date: Option<NaiveDate>,

    /// Target duration in minutes (1-1440)
    #[arg(
        short,
        long,
        value_parser = clap::value_parser!(u32).range(1..=1440)
    )]
    pub target: Option<u32>,

    /// Assign the task to another user (admin)
    #[arg(long = "for", value_name = "USER")]
    pub for_user: Option<String>,
}

/// Filters shared by list and export
#[derive(Args, Debug, Clone, Default)]
pub struct FilterArgs {
    /// Only tasks dated on this day (YYYY-MM-DD)
    #[arg(long, value_parser = parse_date, conflicts_with = "today")]
    pub date: Option<NaiveDate>,

    /// Only tasks dated today
    #[arg(long)]
    pub today: bool,

    /// Only tasks of this user (profile id or email)
    #[arg(long, value_name = "USER")]
    pub user: Option<String>,

    /// Only tasks of employees of this type
    #[arg(long = "type", value_parser = parse_employee_type)]
    pub employee_type: Option<EmployeeType>,

    /// Only tasks in this status (not-started, in-progress, finished)
    #[arg(long, value_parser = parse_status)]
    pub status: Option<TaskStatus>,
}

impl FilterArgs {
    /// Builds the filter; `user_id` is the already resolved `--user`.
    pub fn to_filter(&self, today: NaiveDate, user_id: Option<String>) -> TaskFilter {
        TaskFilter {
            date: if self.today { Some(today) } else { self.date },
            user_id,
            employee_type: self.employee_type,
            status: self.status,
        }
    }
}

/// Arguments for the list command
#[derive(Args, Debug, Clone)]
pub struct ListArgs {
    #[command(flatten)]
    pub filter: FilterArgs,
}

/// Arguments for the edit command
#[derive(Args, Debug, Clone)]
pub struct EditArgs {
    /// Task id (a unique prefix is enough)
    pub task: String,

    #[arg(long, value_parser = validate_title)]
    pub title: Option<String>,

    #[arg(short, long, value_parser = validate_description)]
    pub description: Option<String>,

    #[arg(short, long, value_parser = parse_category)]
    pub category: Option<String>,

    #[arg(long, value_parser = parse_date)]
    pub date: Option<NaiveDate>,

    /// New target duration in minutes (1-1440)
    #[arg(
        short,
        long,
        value_parser = clap::value_parser!(u32).range(1..=1440),
        conflicts_with = "clear_target"
    )]
    pub target: Option<u32>,

    /// Remove the target duration
    #[arg(long)]
    pub clear_target: bool,
}

/// Arguments for the summary command
#[derive(Args, Debug, Clone)]
pub struct SummaryArgs {
    /// Day to summarize (YYYY-MM-DD); defaults to today
    #[arg(long, value_parser = parse_date)]
    pub date: Option<NaiveDate>,
}

/// Arguments for the export command
#[derive(Args, Debug, Clone)]
pub struct ExportArgs {
    #[command(flatten)]
    pub filter: FilterArgs,

    /// Write to this file instead of stdout
    #[arg(short, long)]
    pub output: Option<PathBuf>,
}

/// Arguments for the watch command
#[derive(Args, Debug, Clone)]
pub struct WatchArgs {
    /// Seconds between checks (1-3600); defaults to the configured interval
    #[arg(
        short,
        long,
        value_parser = clap::value_parser!(u64).range(1..=3600)
    )]
    pub interval: Option<u64>,

    /// Watch every user's tasks (admin)
    #[arg(long)]
    pub all: bool,
}

// ============================================================================
// Validation Functions
// ============================================================================

fn validate_title(s: &str) -> Result<String, String> {
    validate::title(s).map_err(|e| e.to_string())
}

fn validate_description(s: &str) -> Result<String, String> {
    validate::description(s).map_err(|e| e.to_string())
}

fn parse_category(s: &str) -> Result<String, String> {
    validate::category(s)
        .map(|c| canonical_category(&c))
        .map_err(|e| e.to_string())
}

fn parse_date(s: &str) -> Result<NaiveDate, String> {
    NaiveDate::parse_from_str(s.trim(), "%Y-%m-%d")
        .map_err(|_| format!("expected a date like 2026-10-19, got '{s}'"))
}

fn parse_status(s: &str) -> Result<TaskStatus, String> {
    s.parse()
}

fn parse_employee_type(s: &str) -> Result<EmployeeType, String> {
    s.parse()
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    // ------------------------------------------------------------------------
    // Cli Tests
    // ------------------------------------------------------------------------

    mod cli_tests {
        use super::*;

        #[test]
        fn test_parse_no_args() {
            let cli = Cli::parse_from(["worktrack"]);
            assert!(cli.command.is_none());
            assert!(!cli.verbose);
            assert!(cli.as_user.is_none());
        }

        #[test]
        fn test_parse_global_flags_after_subcommand() {
            let cli = Cli::parse_from(["worktrack", "status", "--as", "john", "-v"]);
            assert!(matches!(cli.command, Some(Commands::Status)));
            assert_eq!(cli.as_user.as_deref(), Some("john"));
            assert!(cli.verbose);
        }

        #[test]
        fn test_parse_timer_commands() {
            let cli = Cli::parse_from(["worktrack", "start", "ab12"]);
            assert!(matches!(cli.command, Some(Commands::Start(ref t)) if t.task == "ab12"));
            let cli = Cli::parse_from(["worktrack", "pause", "ab12"]);
            assert!(matches!(cli.command, Some(Commands::Pause(_))));
            let cli = Cli::parse_from(["worktrack", "finish", "ab12"]);
            assert!(matches!(cli.command, Some(Commands::Finish(_))));
        }

        #[test]
        fn test_parse_completions_bash() {
            let cli = Cli::parse_from(["worktrack", "completions", "bash"]);
            match cli.command {
                Some(Commands::Completions { shell }) => {
                    assert_eq!(shell, clap_complete::Shell::Bash);
                }
                _ => panic!("Expected Completions command"),
            }
        }

        #[test]
        fn test_parse_employees_default_action() {
            let cli = Cli::parse_from(["worktrack", "employees"]);
            assert!(matches!(cli.command, Some(Commands::Employees { action: None })));
        }

        #[test]
        fn test_parse_employees_edit() {
            let cli = Cli::parse_from([
                "worktrack",
                "employees",
                "edit",
                "john",
                "--type",
                "video-editor",
            ]);
            match cli.command {
                Some(Commands::Employees {
                    action: Some(EmployeesCommand::Edit { user, employee_type, name }),
                }) => {
                    assert_eq!(user, "john");
                    assert_eq!(employee_type, Some(EmployeeType::VideoEditor));
                    assert!(name.is_none());
                }
                _ => panic!("Expected Employees Edit command"),
            }
        }
    }

    // ------------------------------------------------------------------------
    // Add / Edit Arguments Tests
    // ------------------------------------------------------------------------

    mod task_args_tests {
        use super::*;

        #[test]
        fn test_parse_add_with_options() {
            let cli = Cli::parse_from([
                "worktrack",
                "add",
                "  Build login page ",
                "-c",
                "Development",
                "--date",
                "2026-10-19",
                "-t",
                "90",
            ]);
            match cli.command {
                Some(Commands::Add(args)) => {
                    assert_eq!(args.title, "Build login page");
                    assert_eq!(args.category.as_deref(), Some("Development"));
                    assert_eq!(args.date, NaiveDate::from_ymd_opt(2026, 10, 19));
                    assert_eq!(args.target, Some(90));
                    assert_eq!(args.description, "");
                }
                _ => panic!("Expected Add command"),
            }
        }

        #[test]
        fn test_add_rejects_blank_title() {
            assert!(Cli::try_parse_from(["worktrack", "add", "   "]).is_err());
        }

        #[test]
        fn test_add_rejects_long_title() {
            let title = "a".repeat(crate::error::MAX_TITLE_LEN + 1);
            let err = Cli::try_parse_from(["worktrack", "add", title.as_str()]).unwrap_err();
            assert!(err.to_string().contains("at most"));
        }

        #[test]
        fn test_category_is_normalized() {
            let cli = Cli::parse_from(["worktrack", "add", "x", "-c", "design"]);
            match cli.command {
                Some(Commands::Add(args)) => assert_eq!(args.category.as_deref(), Some("Design")),
                _ => panic!("Expected Add command"),
            }
            assert!(Cli::try_parse_from(["worktrack", "edit", "ab", "-c", "  "]).is_err());
        }

        #[test]
        fn test_add_rejects_zero_target() {
            assert!(Cli::try_parse_from(["worktrack", "add", "x", "-t", "0"]).is_err());
        }

        #[test]
        fn test_add_rejects_bad_date() {
            assert!(Cli::try_parse_from(["worktrack", "add", "x", "--date", "19/10/2026"]).is_err());
        }

        #[test]
        fn test_edit_target_conflicts_with_clear() {
            assert!(Cli::try_parse_from([
                "worktrack",
                "edit",
                "ab",
                "-t",
                "5",
                "--clear-target"
            ])
            .is_err());
        }
    }

    // ------------------------------------------------------------------------
    // Filter Tests
    // ------------------------------------------------------------------------

    mod filter_tests {
        use super::*;

        #[test]
        fn test_list_filters() {
            let cli = Cli::parse_from([
                "worktrack",
                "list",
                "--today",
                "--status",
                "in-progress",
                "--type",
                "Developer",
            ]);
            let today = NaiveDate::from_ymd_opt(2026, 10, 19).unwrap();
            match cli.command {
                Some(Commands::List(args)) => {
                    let filter = args.filter.to_filter(today, None);
                    assert_eq!(filter.date, Some(today));
                    assert_eq!(filter.status, Some(TaskStatus::InProgress));
                    assert_eq!(filter.employee_type, Some(EmployeeType::Developer));
                }
                _ => panic!("Expected List command"),
            }
        }

        #[test]
        fn test_date_conflicts_with_today() {
            assert!(Cli::try_parse_from([
                "worktrack",
                "list",
                "--today",
                "--date",
                "2026-10-19"
            ])
            .is_err());
        }

        #[test]
        fn test_unknown_status_rejected() {
            assert!(Cli::try_parse_from(["worktrack", "list", "--status", "paused"]).is_err());
        }
    }
}
