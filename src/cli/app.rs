//! Command execution against the local data file.
//!
//! Every command reloads the data it needs, so separate invocations always
//! act on the latest state.

use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use chrono::Timelike;
use tokio::sync::watch;

use crate::config::{Config, SinkKind};
use crate::error::TrackError;
use crate::notifier::{ConsoleSink, DeadlineNotifier, LogSink, NotificationSink};
use crate::profiles::ProfileManager;
use crate::report::{
    export_csv, greeting, AdminSummary, ChartData, EmployeeSummary, TaskFilter, TeamActivity,
};
use crate::store::{demo_dataset, JsonFileStore, ProfileRepository, TaskQuery, TaskRepository};
use crate::timer::{Clock, SystemClock, TimerController};
use crate::types::{Actor, NewTask, Profile, Task, TaskUpdate};

use super::commands::{AddArgs, EditArgs, EmployeesCommand, ExportArgs, FilterArgs, WatchArgs};
use super::display::Display;

/// Environment variable consulted when `--as` is not given.
pub const USER_ENV: &str = "WORKTRACK_USER";

/// How often `watch` checks the data file for writes by other invocations.
const EXTERNAL_CHANGE_POLL: std::time::Duration = std::time::Duration::from_secs(1);

/// Which timer action to run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimerAction {
    Start,
    Pause,
    Finish,
}

/// CLI application state.
pub struct App {
    config: Config,
    store: JsonFileStore,
    clock: SystemClock,
    user: Option<String>,
}

impl App {
    /// Creates the app; `data` overrides the configured data file.
    pub fn new(config: Config, data: Option<PathBuf>, user: Option<String>) -> Self {
        let path = data.unwrap_or_else(|| config.data_file.clone());
        tracing::debug!(path = %path.display(), "using data file");
        let user = user.or_else(|| std::env::var(USER_ENV).ok().filter(|u| !u.is_empty()));
        Self {
            config,
            store: JsonFileStore::new(path),
            clock: SystemClock,
            user,
        }
    }

    fn controller(&self) -> TimerController<&JsonFileStore, SystemClock> {
        TimerController::new(&self.store, self.clock)
    }

    fn profiles(&self) -> ProfileManager<&JsonFileStore> {
        ProfileManager::new(&self.store)
    }

    /// Resolves the acting user's profile.
    async fn me(&self) -> Result<Profile> {
        let Some(key) = self.user.as_deref() else {
            bail!("no user selected; pass --as <USER> or set {USER_ENV}");
        };
        let profile = self
            .profiles()
            .resolve(key)
            .await?
            .with_context(|| format!("unknown user '{key}'; run `worktrack seed` for demo users"))?;
        if !profile.is_active {
            bail!("user '{}' is deactivated", profile.id);
        }
        Ok(profile)
    }

    async fn actor(&self) -> Result<Actor> {
        Ok(Actor::from(&self.me().await?))
    }

    async fn require_admin(&self, action: &'static str) -> Result<Actor> {
        let actor = self.actor().await?;
        if !actor.is_admin() {
            return Err(TrackError::Forbidden { action }.into());
        }
        Ok(actor)
    }

    async fn resolve_user(&self, key: &str) -> Result<Profile> {
        self.profiles()
            .resolve(key)
            .await?
            .with_context(|| format!("unknown user '{key}'"))
    }

    /// Tasks the actor may see: all for admins, otherwise their own.
    fn visible(actor: &Actor) -> TaskQuery {
        if actor.is_admin() {
            TaskQuery::all()
        } else {
            TaskQuery::for_user(actor.user_id.clone())
        }
    }

    /// Finds a visible task by id or unique id prefix.
    async fn find_task(&self, actor: &Actor, key: &str) -> Result<Task> {
        let tasks = self.store.list_tasks(&Self::visible(actor)).await?;
        if let Some(task) = tasks.iter().find(|t| t.id == key) {
            return Ok(task.clone());
        }
        let mut matches = tasks.into_iter().filter(|t| t.id.starts_with(key));
        match (matches.next(), matches.next()) {
            (Some(task), None) => Ok(task),
            (None, _) => bail!("no task matches '{key}'"),
            (Some(_), Some(_)) => bail!("'{key}' matches several tasks; use more characters"),
        }
    }

    // ========================================================================
    // Commands
    // ========================================================================

    pub async fn seed(&self, force: bool) -> Result<()> {
        let current = self.store.load().await?;
        if !force && (!current.tasks.is_empty() || !current.profiles.is_empty()) {
            bail!(
                "{} already has data; pass --force to overwrite it",
                self.store.path().display()
            );
        }
        let data = demo_dataset(self.clock.now_ms(), self.clock.today());
        self.store
            .replace(&data)
            .await
            .context("Failed to write demo data")?;

        println!("* Seeded {}", self.store.path().display());
        println!(
            "  {} users, {} tasks. Try: worktrack status --as john",
            data.profiles.len(),
            data.tasks.len()
        );
        Ok(())
    }

    pub async fn add(&self, args: AddArgs) -> Result<()> {
        let actor = self.actor().await?;
        let owner = match args.for_user.as_deref() {
            Some(key) => self.resolve_user(key).await?.id,
            None => actor.user_id.clone(),
        };
        let task = NewTask {
            user_id: owner,
            title: args.title,
            description: args.description,
            category: args
                .category
                .unwrap_or_else(|| self.config.default_category.clone()),
            date: args.date.unwrap_or_else(|| self.clock.today()),
            target_minutes: args.target,
        };

        let created = self.controller().create_task(&actor, task).await?;
        Display::show_task_created(&created);
        Ok(())
    }

    pub async fn list(&self, filter: &FilterArgs) -> Result<()> {
        let actor = self.actor().await?;
        let filter = self.filter(filter).await?;
        let tasks = self.store.list_tasks(&Self::visible(&actor)).await?;
        let profiles = self.store.list_profiles().await?;

        let tasks = filter.apply(&tasks, &profiles);
        let owners = actor.is_admin().then_some(profiles.as_slice());
        Display::show_task_list(&tasks, owners, self.clock.now_ms());
        Ok(())
    }

    pub async fn timer(&self, action: TimerAction, key: &str) -> Result<()> {
        let actor = self.actor().await?;
        let task = self.find_task(&actor, key).await?;
        let controller = self.controller();

        let outcome = match action {
            TimerAction::Start => controller.start(&actor, &task.id).await?,
            TimerAction::Pause => controller.pause(&actor, &task.id).await?,
            TimerAction::Finish => controller.finish(&actor, &task.id).await?,
        };
        Display::show_timer_outcome(&task, &outcome);
        if !outcome.is_changed() {
            tracing::debug!(task_id = %task.id, "timer unchanged, nothing written");
        }
        Ok(())
    }

    pub async fn edit(&self, args: EditArgs) -> Result<()> {
        let actor = self.actor().await?;
        let task = self.find_task(&actor, &args.task).await?;
        let update = TaskUpdate {
            title: args.title,
            description: args.description,
            category: args.category,
            date: args.date,
            target_minutes: if args.clear_target {
                Some(None)
            } else {
                args.target.map(Some)
            },
        };

        let updated = self.controller().update_task(&actor, &task.id, update).await?;
        Display::show_task_updated(&updated, self.clock.now_ms());
        Ok(())
    }

    pub async fn delete(&self, key: &str) -> Result<()> {
        let actor = self.actor().await?;
        let task = self.find_task(&actor, key).await?;
        let deleted = self.controller().delete_task(&actor, &task.id).await?;
        Display::show_task_deleted(&task.id, deleted);
        Ok(())
    }

    pub async fn status(&self) -> Result<()> {
        let me = self.me().await?;
        let tasks = self.store.list_tasks(&TaskQuery::for_user(me.id.clone())).await?;
        let now = self.clock.now_ms();
        let today = self.clock.today();

        let summary = EmployeeSummary::compute(&tasks, &me.id, today, now);
        let todays: Vec<Task> = tasks.into_iter().filter(|t| t.date == today).collect();
        let hour = chrono::Local::now().hour();
        Display::show_status(&me.name, greeting(hour), &summary, &todays, now);
        Ok(())
    }

    pub async fn summary(&self, day: Option<chrono::NaiveDate>) -> Result<()> {
        self.require_admin("view team reports").await?;
        let day = day.unwrap_or_else(|| self.clock.today());
        let now = self.clock.now_ms();
        let tasks = self.store.list_tasks(&TaskQuery::all()).await?;
        let profiles = self.store.list_profiles().await?;

        let summary = AdminSummary::compute(&tasks, &profiles, day, now);
        let on_day = TaskFilter {
            date: Some(day),
            ..TaskFilter::default()
        }
        .apply(&tasks, &profiles);
        let charts = ChartData::compute(&on_day, now);
        Display::show_summary(day, &summary, &charts);
        Ok(())
    }

    pub async fn team(&self) -> Result<()> {
        self.actor().await?;
        let tasks = self.store.list_tasks(&TaskQuery::all()).await?;
        let profiles = self.store.list_profiles().await?;
        let team = TeamActivity::compute(&tasks, &profiles, self.clock.today());
        Display::show_team(&team);
        Ok(())
    }

    pub async fn export(&self, args: &ExportArgs) -> Result<()> {
        self.require_admin("view team reports").await?;
        let filter = self.filter(&args.filter).await?;
        let tasks = self.store.list_tasks(&TaskQuery::all()).await?;
        let profiles = self.store.list_profiles().await?;

        let rows = filter.apply(&tasks, &profiles);
        let csv = export_csv(&rows, &profiles, self.clock.now_ms());
        match &args.output {
            Some(path) => {
                tokio::fs::write(path, csv)
                    .await
                    .with_context(|| format!("Failed to write {}", path.display()))?;
                eprintln!("* Exported {} tasks to {}", rows.len(), path.display());
            }
            None => print!("{csv}"),
        }
        Ok(())
    }

    pub async fn employees(&self, action: Option<EmployeesCommand>) -> Result<()> {
        let actor = self.actor().await?;
        let manager = self.profiles();

        match action.unwrap_or(EmployeesCommand::List) {
            EmployeesCommand::List => {
                self.require_admin("view employee records").await?;
                Display::show_employees(&manager.employees().await?);
            }
            EmployeesCommand::Edit {
                user,
                name,
                employee_type,
            } => {
                let id = self.resolve_user(&user).await?.id;
                let update = crate::types::ProfileUpdate {
                    name,
                    employee_type,
                };
                let profile = manager.update(&actor, &id, update).await?;
                Display::show_employee_updated(&profile);
            }
            EmployeesCommand::Toggle { user } => {
                let id = self.resolve_user(&user).await?.id;
                let active = manager.toggle_active(&actor, &id).await?;
                Display::show_employee_toggled(&id, active);
            }
        }
        Ok(())
    }

    pub async fn watch(&self, args: &WatchArgs) -> Result<()> {
        let actor = self.actor().await?;
        if args.all && !actor.is_admin() {
            return Err(TrackError::Forbidden {
                action: "watch other users' tasks",
            }
            .into());
        }
        let query = if args.all {
            TaskQuery::all()
        } else {
            TaskQuery::for_user(actor.user_id.clone())
        };
        let period = args
            .interval
            .map(std::time::Duration::from_secs)
            .unwrap_or_else(|| self.config.notify_interval());

        eprintln!(
            "Watching {} every {}s (Ctrl-C to stop)",
            if args.all { "all tasks" } else { "your tasks" },
            period.as_secs()
        );
        match self.config.sink {
            SinkKind::Log => self.watch_with(LogSink, &query, period).await,
            SinkKind::Console => self.watch_with(ConsoleSink, &query, period).await,
        }
        Ok(())
    }

    async fn watch_with<S: NotificationSink>(
        &self,
        sink: S,
        query: &TaskQuery,
        period: std::time::Duration,
    ) {
        let mut notifier = DeadlineNotifier::new(sink);
        let (tx, rx) = watch::channel(false);
        let stop = async move {
            if let Err(e) = tokio::signal::ctrl_c().await {
                tracing::warn!(error = %e, "failed to listen for Ctrl-C");
                return;
            }
            let _ = tx.send(true);
        };
        let changes = self.store.changes().subscribe();
        tokio::join!(
            notifier.run(&self.store, &self.clock, query, period, changes, rx.clone()),
            self.store.watch_external(EXTERNAL_CHANGE_POLL, rx),
            stop
        );
    }

    async fn filter(&self, args: &FilterArgs) -> Result<TaskFilter> {
        let user_id = match args.user.as_deref() {
            Some(key) => Some(self.resolve_user(key).await?.id),
            None => None,
        };
        Ok(args.to_filter(self.clock.today(), user_id))
    }
}
