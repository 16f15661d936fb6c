pub mod errors;
pub mod parser;
pub mod process;
pub mod repl;
pub mod shell;

pub use repl::Repl;
pub use shell::Shell;
