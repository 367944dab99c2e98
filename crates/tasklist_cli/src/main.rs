use clap::{CommandFactory, Parser};
use std::io::{self, BufRead};
use std::sync::Arc;
use tabled::settings::Style;
use tabled::{Table, Tabled};
use tasklist_cli::cli::{Cli, Command};
use tasklist_core::config::{self, Config, Palette, Theme};
use tasklist_core::error::AppError;
use tasklist_core::model::Task;
use tasklist_core::stats::TaskStats;
use tasklist_core::storage::json_store::FileStore;
use tasklist_core::store::{LoadStatus, TaskStore};
use tracing_subscriber::EnvFilter;

fn status_label(completed: bool) -> &'static str {
    if completed { "completed" } else { "pending" }
}

#[derive(Tabled)]
struct TaskRow {
    #[tabled(rename = "ID")]
    id: String,
    #[tabled(rename = "Title")]
    title: String,
    #[tabled(rename = "Status")]
    status: String,
    #[tabled(rename = "Created")]
    created: String,
}

fn print_tasks_table(tasks: &[Task], palette: &Palette) {
    if tasks.is_empty() {
        println!("No tasks yet.");
        return;
    }

    let rows: Vec<TaskRow> = tasks
        .iter()
        .map(|task| TaskRow {
            id: task.id.clone(),
            title: if task.completed {
                palette.mutedize(&task.title)
            } else {
                task.title.clone()
            },
            status: if task.completed {
                palette.mutedize(status_label(true))
            } else {
                palette.accentize(status_label(false))
            },
            created: task.created_at.clone(),
        })
        .collect();

    println!("{}", Table::new(rows).with(Style::sharp()));
}

fn print_tasks_json(tasks: &[Task]) {
    let payload: Vec<serde_json::Value> = tasks.iter().map(task_json).collect();
    println!("{}", serde_json::Value::Array(payload));
}

fn task_json(task: &Task) -> serde_json::Value {
    serde_json::json!({
        "id": task.id,
        "title": task.title,
        "description": task.description,
        "completed": task.completed,
        "createdAt": task.created_at,
    })
}

fn print_task_json(task: &Task) {
    println!("{}", task_json(task));
}

fn print_task_details(task: &Task, palette: &Palette) {
    println!("{} {}", palette.mutedize("Id:"), task.id);
    println!("{} {}", palette.mutedize("Title:"), task.title);
    println!("{} {}", palette.mutedize("Description:"), task.description);
    println!(
        "{} {}",
        palette.mutedize("Status:"),
        status_label(task.completed)
    );
    println!("{} {}", palette.mutedize("Created:"), task.created_at);
}

fn progress_bar(completion_rate: f64) -> String {
    const WIDTH: usize = 20;
    let filled = ((completion_rate / 100.0) * WIDTH as f64).round() as usize;
    let filled = filled.min(WIDTH);
    format!("[{}{}]", "#".repeat(filled), "-".repeat(WIDTH - filled))
}

fn print_stats(stats: &TaskStats, palette: &Palette) {
    println!(
        "{} {}",
        palette.mutedize("Total tasks:"),
        palette.accentize(&stats.total.to_string())
    );
    println!(
        "{} {}",
        palette.mutedize("Completed:"),
        palette.accentize(&stats.completed.to_string())
    );
    println!(
        "{} {}",
        palette.mutedize("Pending:"),
        palette.accentize(&stats.pending.to_string())
    );
    println!(
        "{} {} {}",
        palette.mutedize("Completion rate:"),
        palette.accentize(&format!("{:.1}%", stats.completion_rate)),
        progress_bar(stats.completion_rate)
    );
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

fn split_command_line(line: &str) -> Result<Vec<String>, AppError> {
    let mut args = Vec::new();
    let mut current = String::new();
    let mut in_quotes = false;
    let mut escape = false;

    for ch in line.chars() {
        if escape {
            if ch != '"' && ch != '\\' {
                current.push('\\');
            }
            current.push(ch);
            escape = false;
            continue;
        }

        if in_quotes && ch == '\\' {
            escape = true;
            continue;
        }

        if ch == '"' {
            in_quotes = !in_quotes;
            continue;
        }

        if ch.is_whitespace() && !in_quotes {
            if !current.is_empty() {
                args.push(current.clone());
                current.clear();
            }
            continue;
        }

        current.push(ch);
    }

    if in_quotes {
        return Err(AppError::invalid_input("unterminated quote in command"));
    }

    if !current.is_empty() {
        args.push(current);
    }

    Ok(args)
}

fn print_help() {
    let mut cmd = Cli::command();
    let help = cmd.render_help();
    println!("{help}");
}

fn resolve_palette(cli_theme: Option<&str>, config: &Config) -> Palette {
    let theme = match cli_theme {
        Some(name) => Theme::from_name(name),
        None => config.theme(),
    };
    theme.palette()
}

fn open_store() -> Result<TaskStore, AppError> {
    let adapter = FileStore::from_env()?;
    let mut store = TaskStore::new(Arc::new(adapter));
    store.load();

    if store.status() == LoadStatus::Failed {
        let reason = store.load_error().unwrap_or("unknown failure").to_string();
        return Err(AppError::storage_unavailable(format!(
            "could not load tasks: {reason}"
        )));
    }

    Ok(store)
}

fn run_command(cli: Cli, store: &mut TaskStore, config: &Config) -> Result<(), AppError> {
    let palette = resolve_palette(cli.theme.as_deref(), config);

    match cli.command {
        Command::Add { title, description } => {
            let title = match title {
                Some(value) if !value.trim().is_empty() => value,
                _ => return Err(AppError::invalid_input("title is required")),
            };

            let task = store.add(&title, description.as_deref().unwrap_or(""))?;
            if cli.json {
                print_task_json(&task);
            } else {
                println!("Added task: {} ({})", task.title, task.id);
            }
        }
        Command::List => {
            if cli.json {
                print_tasks_json(store.tasks());
            } else {
                print_tasks_table(store.tasks(), &palette);
            }
        }
        Command::Show { id } => match store.get(id.trim()) {
            Some(task) => {
                if cli.json {
                    print_task_json(task);
                } else {
                    print_task_details(task, &palette);
                }
            }
            None => println!("No task with id {id}"),
        },
        Command::Toggle { id } => match store.toggle(id.trim()) {
            Some(task) => {
                if cli.json {
                    print_task_json(&task);
                } else if task.completed {
                    println!("Completed task: {} ({})", task.title, task.id);
                } else {
                    println!("Reopened task: {} ({})", task.title, task.id);
                }
            }
            None => println!("No task with id {id}"),
        },
        Command::Edit {
            id,
            new_title,
            description,
        } => match store.edit(
            id.trim(),
            &new_title,
            description.as_deref().unwrap_or(""),
        )? {
            Some(task) => {
                if cli.json {
                    print_task_json(&task);
                } else {
                    println!("Updated task: {} ({})", task.title, task.id);
                }
            }
            None => println!("No task with id {id}"),
        },
        Command::Delete { id } => match store.delete(id.trim()) {
            Some(task) => {
                if cli.json {
                    print_task_json(&task);
                } else {
                    println!("Deleted task: {} ({})", task.title, task.id);
                }
            }
            None => println!("No task with id {id}"),
        },
        Command::Stats => {
            let stats = store.stats();
            if cli.json {
                println!(
                    "{}",
                    serde_json::to_string(&stats)
                        .map_err(|err| AppError::invalid_data(err.to_string()))?
                );
            } else {
                print_stats(&stats, &palette);
            }
        }
    }

    Ok(())
}

fn run_interactive(store: &mut TaskStore, config: &Config) -> Result<(), AppError> {
    let mut input = String::new();
    let stdin = io::stdin();
    let mut stdin_lock = stdin.lock();

    loop {
        input.clear();
        let bytes = stdin_lock
            .read_line(&mut input)
            .map_err(|err| AppError::storage_unavailable(err.to_string()))?;

        if bytes == 0 {
            break;
        }

        let line = input.trim();
        if line.is_empty() {
            continue;
        }

        if line.eq_ignore_ascii_case("exit") || line.eq_ignore_ascii_case("quit") {
            break;
        }

        if line == "help" || line == "?" {
            print_help();
            continue;
        }

        let args = match split_command_line(line) {
            Ok(args) => args,
            Err(err) => {
                eprintln!("ERROR: {err}");
                continue;
            }
        };

        if args.is_empty() {
            continue;
        }

        let mut argv = Vec::with_capacity(args.len() + 1);
        argv.push("tasklist".to_string());
        argv.extend(args);

        let cli = match Cli::try_parse_from(argv) {
            Ok(cli) => cli,
            Err(err) => {
                eprintln!("ERROR: {}", normalize_parse_error(err));
                continue;
            }
        };

        if let Err(err) = run_command(cli, store, config) {
            eprintln!("ERROR: {err}");
        }
    }

    Ok(())
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn load_config() -> Config {
    let loaded = config::load_config_with_fallback();
    if let Some(err) = loaded.error {
        eprintln!("WARNING: using default config: {err}");
    }
    loaded.config
}

fn main() {
    init_tracing();
    let config = load_config();

    let mut args = std::env::args_os();
    args.next();
    if args.next().is_none() {
        let mut store = match open_store() {
            Ok(store) => store,
            Err(err) => {
                eprintln!("ERROR: {err}");
                std::process::exit(1);
            }
        };

        if let Err(err) = run_interactive(&mut store, &config) {
            store.flush();
            eprintln!("ERROR: {err}");
            std::process::exit(1);
        }
        store.flush();
        return;
    }

    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(err) => {
            eprintln!("ERROR: {}", normalize_parse_error(err));
            std::process::exit(1);
        }
    };

    let mut store = match open_store() {
        Ok(store) => store,
        Err(err) => {
            eprintln!("ERROR: {err}");
            std::process::exit(1);
        }
    };

    let result = run_command(cli, &mut store, &config);
    store.flush();

    if let Err(err) = result {
        eprintln!("ERROR: {err}");
        std::process::exit(1);
    }
}
