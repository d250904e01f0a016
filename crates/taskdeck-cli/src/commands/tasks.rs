//! Task management commands.

use std::collections::BTreeMap;

use anyhow::Result;

use taskdeck_client::TaskDraft;

use crate::config::Config;
use crate::output::{self, OutputFormat};

use super::{build_clients, require_login};

/// List all tasks.
pub async fn task_list(config: &Config, format: &OutputFormat) -> Result<()> {
    let clients = build_clients(config)?;

    match clients.tasks.list().await {
        Ok(outcome) => {
            if let Some(mut tasks) = require_login(outcome, format) {
                tasks.sort_by_key(|t| t.position);
                output::print_tasks(&tasks, format);
            }
        }
        Err(e) => output::print_error(&e.to_string(), format),
    }
    Ok(())
}

/// Show one task in detail.
pub async fn task_show(config: &Config, id: i64, format: &OutputFormat) -> Result<()> {
    let clients = build_clients(config)?;

    match clients.tasks.get(id).await {
        Ok(outcome) => {
            if let Some(task) = require_login(outcome, format) {
                output::print_task(&task, format);
            }
        }
        Err(e) => output::print_error(&e.to_string(), format),
    }
    Ok(())
}

/// Create a task.
pub async fn task_add(
    config: &Config,
    title: &str,
    description: Option<&str>,
    status: &str,
    format: &OutputFormat,
) -> Result<()> {
    let clients = build_clients(config)?;

    let draft = TaskDraft {
        title: title.to_string(),
        description: description.unwrap_or_default().to_string(),
        status: status.to_string(),
    };

    match clients.tasks.create(&draft).await {
        Ok(outcome) => {
            if let Some(task) = require_login(outcome, format) {
                output::print_success(&format!("Created task #{}", task.id), format);
            }
        }
        Err(e) => output::print_error(&e.to_string(), format),
    }
    Ok(())
}

/// Update a task's fields.
pub async fn task_update(
    config: &Config,
    id: i64,
    title: Option<&str>,
    description: Option<&str>,
    status: Option<&str>,
    format: &OutputFormat,
) -> Result<()> {
    let clients = build_clients(config)?;

    let current = match clients.tasks.get(id).await {
        Ok(outcome) => match require_login(outcome, format) {
            Some(task) => task,
            None => return Ok(()),
        },
        Err(e) => {
            output::print_error(&e.to_string(), format);
            return Ok(());
        }
    };

    let draft = TaskDraft {
        title: title.map(str::to_string).unwrap_or(current.title),
        description: description
            .map(str::to_string)
            .unwrap_or(current.description),
        status: status.map(str::to_string).unwrap_or(current.status),
    };

    match clients.tasks.update(id, &draft).await {
        Ok(outcome) => {
            if let Some(task) = require_login(outcome, format) {
                output::print_success(&format!("Updated task #{}", task.id), format);
            }
        }
        Err(e) => output::print_error(&e.to_string(), format),
    }
    Ok(())
}

/// Mark a task completed.
pub async fn task_done(config: &Config, id: i64, format: &OutputFormat) -> Result<()> {
    let clients = build_clients(config)?;

    match clients.tasks.update_status(id, "completed").await {
        Ok(outcome) => {
            if require_login(outcome, format).is_some() {
                output::print_success(&format!("Task #{} completed", id), format);
            }
        }
        Err(e) => output::print_error(&e.to_string(), format),
    }
    Ok(())
}

/// Delete a task.
pub async fn task_rm(config: &Config, id: i64, format: &OutputFormat) -> Result<()> {
    let clients = build_clients(config)?;

    match clients.tasks.delete(id).await {
        Ok(outcome) => {
            if require_login(outcome, format).is_some() {
                output::print_success(&format!("Deleted task #{}", id), format);
            }
        }
        Err(e) => output::print_error(&e.to_string(), format),
    }
    Ok(())
}

/// Move a task to a new position in the list.
pub async fn task_move(
    config: &Config,
    id: i64,
    position: i64,
    format: &OutputFormat,
) -> Result<()> {
    let clients = build_clients(config)?;

    // Reposition the whole list locally, then persist the full mapping so
    // the server keeps positions dense.
    let mut tasks = match clients.tasks.list().await {
        Ok(outcome) => match require_login(outcome, format) {
            Some(tasks) => tasks,
            None => return Ok(()),
        },
        Err(e) => {
            output::print_error(&e.to_string(), format);
            return Ok(());
        }
    };

    tasks.sort_by_key(|t| t.position);
    let Some(index) = tasks.iter().position(|t| t.id == id) else {
        output::print_error(&format!("No task with id {}", id), format);
        return Ok(());
    };
    let task = tasks.remove(index);
    let target = (position.max(0) as usize).min(tasks.len());
    tasks.insert(target, task);

    let positions: BTreeMap<i64, i64> = tasks
        .iter()
        .enumerate()
        .map(|(i, t)| (t.id, i as i64))
        .collect();

    match clients.tasks.update_positions(&positions).await {
        Ok(outcome) => {
            if require_login(outcome, format).is_some() {
                output::print_success(&format!("Moved task #{} to position {}", id, target), format);
            }
        }
        Err(e) => output::print_error(&e.to_string(), format),
    }
    Ok(())
}

/// Show per-user task statistics.
pub async fn task_stats(config: &Config, format: &OutputFormat) -> Result<()> {
    let clients = build_clients(config)?;

    match clients.tasks.statistics().await {
        Ok(outcome) => {
            if let Some(stats) = require_login(outcome, format) {
                match format {
                    OutputFormat::Json => {
                        println!(
                            "{}",
                            serde_json::json!({
                                "total_tasks": stats.total_tasks,
                                "completed_tasks": stats.completed_tasks,
                                "pending_tasks": stats.pending_tasks,
                                "in_progress_tasks": stats.in_progress_tasks,
                            })
                        );
                    }
                    OutputFormat::Text => {
                        output::print_heading("Task statistics");
                        output::print_row("Total", &stats.total_tasks.to_string());
                        output::print_row("Completed", &stats.completed_tasks.to_string());
                        output::print_row("In progress", &stats.in_progress_tasks.to_string());
                        output::print_row("Pending", &stats.pending_tasks.to_string());
                    }
                }
            }
        }
        Err(e) => output::print_error(&e.to_string(), format),
    }
    Ok(())
}
