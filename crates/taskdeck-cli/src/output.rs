//! Output formatting for the CLI.

use clap::ValueEnum;
use taskdeck_client::Task;

/// Output format.
#[derive(Debug, Clone, Copy, Default, ValueEnum)]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}

/// Print a success message.
pub fn print_success(message: &str, format: &OutputFormat) {
    match format {
        OutputFormat::Text => println!("{}", message),
        OutputFormat::Json => {
            println!(r#"{{"status":"success","message":"{}"}}"#, message);
        }
    }
}

/// Print an error message.
pub fn print_error(message: &str, format: &OutputFormat) {
    match format {
        OutputFormat::Text => eprintln!("Error: {}", message),
        OutputFormat::Json => {
            eprintln!(r#"{{"status":"error","message":"{}"}}"#, message);
        }
    }
}

/// Print a table row.
pub fn print_row(label: &str, value: &str) {
    println!("  {:<14} {}", format!("{}:", label), value);
}

/// Print a divider line.
pub fn print_divider() {
    println!("{}", "-".repeat(50));
}

/// Print a heading.
pub fn print_heading(text: &str) {
    println!("\n{}", text);
    print_divider();
}

/// Print a task list in the specified format.
pub fn print_tasks(tasks: &[Task], format: &OutputFormat) {
    match format {
        OutputFormat::Json => {
            if let Ok(json) = serde_json::to_string_pretty(tasks) {
                println!("{}", json);
            }
        }
        OutputFormat::Text => {
            if tasks.is_empty() {
                println!("No tasks.");
                return;
            }
            println!("{:<6} {:<12} {}", "ID", "STATUS", "TITLE");
            for task in tasks {
                println!("{:<6} {:<12} {}", task.id, task.status, task.title);
            }
        }
    }
}

/// Print a single task in detail.
pub fn print_task(task: &Task, format: &OutputFormat) {
    match format {
        OutputFormat::Json => {
            if let Ok(json) = serde_json::to_string_pretty(task) {
                println!("{}", json);
            }
        }
        OutputFormat::Text => {
            print_heading(&format!("Task #{}", task.id));
            print_row("Title", &task.title);
            print_row("Status", &task.status);
            if !task.description.is_empty() {
                print_row("Description", &task.description);
            }
            if let Some(created) = &task.created_at {
                print_row("Created", &created.to_rfc3339());
            }
            if let Some(updated) = &task.updated_at {
                print_row("Updated", &updated.to_rfc3339());
            }
        }
    }
}
