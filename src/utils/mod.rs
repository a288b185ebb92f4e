pub mod table;
pub mod time;

pub use time::fmt_duration;
