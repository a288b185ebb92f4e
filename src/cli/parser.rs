use clap::{Parser, Subcommand};

/// Command-line interface definition for shoptrack
#[derive(Parser)]
#[command(
    name = "shoptrack",
    version = env!("CARGO_PKG_VERSION"),
    about = "Shop time tracking: one running timer per worker, approval locking, exception scans",
    long_about = None
)]
pub struct Cli {
    /// Override database path (useful for tests or custom DB)
    #[arg(global = true, long = "db")]
    pub db: Option<String>,

    /// Run in test mode (no config file update)
    #[arg(global = true, long = "test", hide = true)]
    pub test: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Initialize the database and configuration
    Init,

    /// Manage the configuration file (view or reset)
    Config {
        #[arg(long = "print", help = "Print the current configuration")]
        print_config: bool,

        #[arg(long = "reset", help = "Write a fresh default configuration file")]
        reset: bool,
    },

    /// Manage the database (migrations, integrity checks, etc.)
    Db {
        #[arg(long = "migrate", help = "Run pending database migrations")]
        migrate: bool,

        #[arg(long = "check", help = "Check database integrity")]
        check: bool,

        #[arg(long = "info", help = "Show schema version and row counts")]
        info: bool,
    },

    /// Register a worker
    Worker {
        name: String,

        #[arg(long = "role", default_value = "mechanic", help = "mechanic, manager or admin")]
        role: String,
    },

    /// Manage work orders
    Order {
        #[command(subcommand)]
        action: OrderAction,
    },

    /// Manage tasks under a work order
    Task {
        #[command(subcommand)]
        action: TaskAction,
    },

    /// Start a timer for a worker on a task (switches automatically)
    Start {
        worker_id: i64,
        task_id: i64,
    },

    /// Stop a worker's running timer
    Stop {
        worker_id: i64,

        #[arg(long = "reason", help = "Why the timer is being stopped")]
        reason: String,

        #[arg(long = "notes", help = "Free-text notes for the entry")]
        notes: Option<String>,

        #[arg(long = "goodwill", help = "Mark the interval as non-billable goodwill")]
        goodwill: bool,
    },

    /// Show a worker's running timer, if any
    Status {
        worker_id: i64,
    },

    /// List time entries under a work order
    Entries {
        work_order_id: i64,
    },

    /// Soft-delete a time entry (locked entries must be unlocked first)
    Del {
        entry_id: i64,
        actor_id: i64,
    },

    /// Move a time entry to another approval state
    Transition {
        entry_id: i64,
        actor_id: i64,

        /// Target state: submitted, approved or locked. Use "approved" on a
        /// locked entry (with --reason) to unlock it for correction.
        target: String,

        #[arg(long = "reason", help = "Justification (mandatory when unlocking)")]
        reason: Option<String>,
    },

    /// Approve every draft/submitted entry under a work order
    ApproveAll {
        work_order_id: i64,
        actor_id: i64,
    },

    /// Replace the tracked duration of an entry (mandatory reason)
    Adjust {
        entry_id: i64,
        actor_id: i64,
        new_duration_secs: i64,

        #[arg(long = "reason")]
        reason: String,
    },

    /// Run the exception scan (stale timers, premature billing, ...)
    Scan {
        #[arg(long = "hours", help = "Override the stale-timer threshold in hours")]
        hours: Option<i64>,

        #[arg(long = "limit", help = "Max rows listed per bucket")]
        limit: Option<i64>,
    },

    /// Print the audit trail (append-only, newest first)
    Audit {
        #[arg(long = "entity", help = "Filter by entity type (time_entry, work_order)")]
        entity: Option<String>,

        #[arg(long = "id", help = "Filter by entity id")]
        id: Option<i64>,

        #[arg(long = "limit")]
        limit: Option<i64>,
    },

    /// Billable totals for a work order (approved/locked, non-goodwill)
    Billable {
        work_order_id: i64,

        #[arg(long = "csv", help = "Also write the billable entries to a CSV file")]
        csv: Option<String>,
    },
}

#[derive(Subcommand)]
pub enum OrderAction {
    /// Create a work order
    Add {
        code: String,

        #[arg(long = "title", default_value = "")]
        title: String,
    },

    /// Set the order status (not_started, in_progress, ready_to_bill, billed)
    Status { id: i64, status: String },

    /// Soft-delete a work order
    Del { id: i64 },
}

#[derive(Subcommand)]
pub enum TaskAction {
    /// Create a task under a work order, assigned to a worker
    Add {
        work_order_id: i64,
        worker_id: i64,

        #[arg(long = "title", default_value = "")]
        title: String,
    },

    /// Mark a task as done
    Done { id: i64 },

    /// Soft-delete a task
    Del { id: i64 },
}
