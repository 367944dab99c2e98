use clap::{Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(name = "tasklist", author, version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Output JSON
    #[arg(long, global = true)]
    pub json: bool,

    /// Color theme for rendered output (plain, noir, solarized)
    #[arg(long, global = true, value_name = "THEME")]
    pub theme: Option<String>,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Add a new task
    ///
    /// Example: tasklist add "Buy milk"
    /// Example: tasklist add "Buy milk" "2% from the corner store"
    Add {
        title: Option<String>,
        description: Option<String>,
    },
    /// List all tasks
    ///
    /// Example: tasklist list
    List,
    /// Show details of a task
    ///
    /// Example: tasklist show 6f9d3b1c-...
    Show {
        id: String,
    },
    /// Toggle a task between pending and completed
    ///
    /// Example: tasklist toggle 6f9d3b1c-...
    Toggle {
        id: String,
    },
    /// Edit a task's title and description
    ///
    /// Example: tasklist edit 6f9d3b1c-... "Buy milk and eggs"
    Edit {
        id: String,
        new_title: String,
        description: Option<String>,
    },
    /// Delete a task
    ///
    /// Example: tasklist delete 6f9d3b1c-...
    Delete {
        id: String,
    },
    /// Show aggregate completion statistics
    ///
    /// Example: tasklist stats
    Stats,
}
