use clap::Parser;
use dayplan_cli::cli::{Cli, Command, collect_config_overrides};
use dayplan_core::config::{ConfigOverrides, PlannerSettings};
use dayplan_core::error::AppError;
use dayplan_core::model::{Category, ScheduledItem, Task};
use dayplan_core::planner::DayPlan;
use dayplan_core::task_api::{self, NewTask, TaskPatch};
use dayplan_core::time_range::{day_of, minutes_to_time};
use tabled::{Table, Tabled};
use time::OffsetDateTime;

#[derive(Tabled)]
struct PlanRow {
    day: u32,
    start: String,
    end: String,
    title: String,
    category: String,
    kind: &'static str,
}

impl PlanRow {
    fn from_item(item: &ScheduledItem) -> Self {
        Self {
            day: day_of(item.start),
            start: minutes_to_time(item.start),
            end: minutes_to_time(item.end),
            title: item.title.clone(),
            category: item.category.to_string(),
            kind: if item.is_blocker { "blocker" } else { "task" },
        }
    }
}

fn print_task_json(task: &Task) -> Result<(), AppError> {
    let json = serde_json::to_string(task).map_err(|err| AppError::invalid_data(err.to_string()))?;
    println!("{json}");
    Ok(())
}

fn print_tasks_plain(tasks: &[Task]) {
    for task in tasks {
        let id = task.id.as_deref().unwrap_or("-");
        let deadline = task
            .deadline
            .as_deref()
            .filter(|value| !value.is_empty())
            .unwrap_or("-");
        let status = if task.done { "done" } else { "open" };
        if task.category.is_blocker() {
            println!(
                "{} | {} | {} | {} | {}",
                id, task.title, task.category, task.description, status
            );
        } else {
            println!(
                "{} | {} | {} | {} min | {} | {}",
                id,
                task.title,
                task.category,
                task.planned_minutes(),
                deadline,
                status
            );
        }
    }
}

fn print_plan(plan: &DayPlan, day: Option<u32>, json: bool) -> Result<(), AppError> {
    let items: Vec<&ScheduledItem> = match day {
        Some(day) => plan.items_for_day(day),
        None => plan.items.iter().collect(),
    };

    if json {
        let payload = serde_json::json!({
            "work_start": plan.work_start,
            "work_end": plan.work_end,
            "days": plan.days,
            "items": items,
            "unscheduled": plan.unscheduled,
        });
        println!("{payload}");
        return Ok(());
    }

    println!("Work window: {} - {}", plan.work_start, plan.work_end);
    if items.is_empty() {
        println!("Nothing planned.");
    } else {
        let rows: Vec<PlanRow> = items.into_iter().map(PlanRow::from_item).collect();
        println!("{}", Table::new(rows));
    }

    for leftover in &plan.unscheduled {
        println!(
            "Unscheduled: {} ({} min left)",
            leftover.title, leftover.remaining
        );
    }

    Ok(())
}

fn print_settings(settings: &PlannerSettings, json: bool) -> Result<(), AppError> {
    if json {
        let json = serde_json::to_string(settings)
            .map_err(|err| AppError::invalid_data(err.to_string()))?;
        println!("{json}");
    } else {
        println!("work_start: {}", settings.work_start);
        println!("work_end: {}", settings.work_end);
        println!("breakfast: {}", settings.breakfast);
        println!("lunch: {}", settings.lunch);
        println!("dinner: {}", settings.dinner);
        println!("days: {}", settings.days);
    }
    Ok(())
}

fn normalize_parse_error(err: clap::Error) -> AppError {
    let rendered = err.to_string();
    let first_line = rendered.lines().next().unwrap_or("invalid command").trim();
    let message = first_line
        .strip_prefix("error: ")
        .unwrap_or(first_line)
        .to_string();
    AppError::invalid_input(message)
}

fn config_overrides(cli: &Cli) -> Result<ConfigOverrides, AppError> {
    collect_config_overrides(&cli.config_override).map_err(AppError::invalid_input)
}

fn run_command(cli: Cli) -> Result<(), AppError> {
    let overrides = config_overrides(&cli)?;

    match cli.command {
        Command::Add {
            title,
            description,
            category,
            deadline,
            duration,
            priority,
            frequency,
        } => {
            let title = match title {
                Some(value) if !value.trim().is_empty() => value,
                _ => return Err(AppError::invalid_input("title is required")),
            };

            let task = task_api::add_task(NewTask {
                title,
                description: description.unwrap_or_default(),
                category: Category::from_label(&category),
                priority,
                deadline,
                duration,
                frequency,
            })?;
            if cli.json {
                print_task_json(&task)?;
            } else {
                println!(
                    "Added task: {} ({})",
                    task.title,
                    task.id.as_deref().unwrap_or("-")
                );
            }
        }
        Command::Edit {
            id,
            title,
            description,
            category,
            deadline,
            duration,
            priority,
            frequency,
        } => {
            let patch = TaskPatch {
                title,
                description,
                category: category.as_deref().map(Category::from_label),
                priority,
                deadline,
                duration,
                frequency,
            };
            let task = task_api::edit_task(&id, patch)?;
            if cli.json {
                print_task_json(&task)?;
            } else {
                println!("Updated task: {} ({})", task.title, id.trim());
            }
        }
        Command::Delete { id } => {
            let task = task_api::delete_task(&id)?;
            if cli.json {
                print_task_json(&task)?;
            } else {
                println!("Deleted task: {} ({})", task.title, id.trim());
            }
        }
        Command::Done { id } => {
            let task = task_api::complete_task(&id)?;
            if cli.json {
                print_task_json(&task)?;
            } else {
                println!("Completed task: {} ({})", task.title, id.trim());
            }
        }
        Command::List => {
            let tasks = task_api::list_tasks()?;
            if cli.json {
                let json = serde_json::to_string(&tasks)
                    .map_err(|err| AppError::invalid_data(err.to_string()))?;
                println!("{json}");
            } else {
                print_tasks_plain(&tasks);
            }
        }
        Command::Block {
            title,
            start,
            end,
            personal,
        } => {
            let task = task_api::set_day_block(&title, &start, &end, personal)?;
            if cli.json {
                print_task_json(&task)?;
            } else {
                println!("Blocked {}: {}", task.title, task.description);
            }
        }
        Command::Plan { days, day } => {
            let overrides = ConfigOverrides {
                days: days.or(overrides.days),
                ..overrides
            };
            let result = task_api::plan(&overrides, OffsetDateTime::now_utc())?;
            if let Some(err) = result.config_error.as_ref() {
                eprintln!("WARNING: config ignored: {err}");
            }
            print_plan(&result.plan, day, cli.json)?;
        }
        Command::Settings => {
            let settings = task_api::current_settings(&overrides)?;
            print_settings(&settings, cli.json)?;
        }
    }

    Ok(())
}

fn init_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();
}

fn main() {
    init_tracing();

    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(err) if !err.use_stderr() => {
            // --help and --version
            print!("{err}");
            return;
        }
        Err(err) => {
            eprintln!("ERROR: {}", normalize_parse_error(err));
            std::process::exit(1);
        }
    };

    if let Err(err) = run_command(cli) {
        tracing::debug!(code = err.code(), "command failed");
        eprintln!("ERROR: {}", err);
        std::process::exit(1);
    }
}
