pub mod approval_state;
pub mod audit;
pub mod scan;
pub mod task;
pub mod time_entry;
pub mod work_order;
pub mod worker;

pub use approval_state::ApprovalState;
pub use audit::{AuditAction, AuditLogEntry};
pub use task::Task;
pub use time_entry::TimeEntry;
pub use work_order::{WorkOrder, WorkOrderStatus};
pub use worker::{Role, Worker};
