pub mod prompt;
pub mod reporter;
pub mod status_line;
