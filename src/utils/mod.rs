pub mod logging;
pub mod shell;
