/*
[INPUT]:  Terminal or piped user input
[OUTPUT]: Interactive command loop driving the bot
[POS]:    CLI layer - module wiring
[UPDATE]: When adding CLI submodules
*/

pub mod interactive;
pub mod prompt;

pub use interactive::{Command, run_interactive};
pub use prompt::{LinePrompter, Prompter, TerminalPrompter, stdin_prompter};
