pub mod commands;
pub mod report_commands;

pub use commands::Cli;
pub use report_commands::ReportCommandHandler;
