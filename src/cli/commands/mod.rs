pub mod adjust;
pub mod approve_all;
pub mod audit;
pub mod billable;
pub mod config;
pub mod db;
pub mod del;
pub mod entries;
pub mod init;
pub mod order;
pub mod scan;
pub mod start;
pub mod status;
pub mod stop;
pub mod task;
pub mod transition;
pub mod worker;
