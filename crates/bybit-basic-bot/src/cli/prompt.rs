/*
[INPUT]:  Prompt text and a line source (terminal or any reader)
[OUTPUT]: One trimmed line of user input per prompt
[POS]:    CLI input layer
[UPDATE]: When changing how prompts are shown or input is read
*/

use std::io::{self, BufRead, IsTerminal, Write};

use dialoguer::Input;
use dialoguer::theme::ColorfulTheme;

/// Source of answers for the interactive loop.
///
/// End of input is reported as an [`io::ErrorKind::UnexpectedEof`] error.
pub trait Prompter {
    fn prompt(&mut self, message: &str) -> io::Result<String>;
}

/// Reads answers line by line, echoing the prompt to `output`
pub struct LinePrompter<R, W> {
    input: R,
    output: W,
}

impl<R: BufRead, W: Write> LinePrompter<R, W> {
    pub fn new(input: R, output: W) -> Self {
        Self { input, output }
    }

    pub fn into_output(self) -> W {
        self.output
    }
}

impl<R: BufRead, W: Write> Prompter for LinePrompter<R, W> {
    fn prompt(&mut self, message: &str) -> io::Result<String> {
        write!(self.output, "{message}: ")?;
        self.output.flush()?;

        let mut line = String::new();
        if self.input.read_line(&mut line)? == 0 {
            return Err(io::Error::new(io::ErrorKind::UnexpectedEof, "end of input"));
        }
        Ok(line.trim().to_string())
    }
}

/// `dialoguer` prompts on an interactive terminal
pub struct TerminalPrompter {
    theme: ColorfulTheme,
}

impl Default for TerminalPrompter {
    fn default() -> Self {
        Self {
            theme: ColorfulTheme::default(),
        }
    }
}

impl Prompter for TerminalPrompter {
    fn prompt(&mut self, message: &str) -> io::Result<String> {
        let answer: String = Input::with_theme(&self.theme)
            .with_prompt(message)
            .allow_empty(true)
            .interact_text()
            .map_err(|dialoguer::Error::IO(err)| err)?;
        Ok(answer.trim().to_string())
    }
}

/// Terminal prompts when stdin is a TTY, plain line reads otherwise
pub fn stdin_prompter() -> Box<dyn Prompter> {
    if io::stdin().is_terminal() {
        Box::new(TerminalPrompter::default())
    } else {
        Box::new(LinePrompter::new(io::stdin().lock(), io::stdout()))
    }
}

impl<P: Prompter + ?Sized> Prompter for Box<P> {
    fn prompt(&mut self, message: &str) -> io::Result<String> {
        (**self).prompt(message)
    }
}
