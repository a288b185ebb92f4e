pub mod approval;
pub mod billing;
pub mod clock;
pub mod scanner;
pub mod timer;
