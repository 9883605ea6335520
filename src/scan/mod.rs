//! Scan passes and their scheduling

pub mod job;
pub mod scanner;
pub mod scheduler;

pub use job::DetectionJob;
pub use job::ScanJob;
pub use scanner::ScanOptions;
pub use scanner::Scanner;
pub use scheduler::RunMode;
pub use scheduler::Scheduler;
pub use scheduler::SchedulerState;
