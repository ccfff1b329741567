//! UI widgets for the log viewer

pub mod header;
pub mod log_line;
pub mod log_view;
