//! Interactive shell: load data once, then match patterns line by line.

use crate::format::JsonFormatter;
use anyhow::Context;
use mqlite::{Compiler, Error};
use rustyline::error::ReadlineError;
use rustyline::DefaultEditor;
use serde_json::Value;

const PROMPT: &str = "mqlite> ";

const HELP: &str = "\
Enter a JSON pattern on one line to match it against the loaded data.

  [{\"name\": null}]                        project a field from every element
  [{\"name\": null, \"age >\": 30}]           filter with a constraint
  [{\"name\": null, \"__sort__\": \"name\"}]  sort list results

Commands: help, quit, exit. Ctrl-D also exits.";

/// What the shell prints for one input line.
#[derive(Debug, PartialEq)]
pub enum Reply {
    /// Blank line: print nothing.
    Empty,
    /// A formatted match result.
    Output(String),
    /// The pattern matched nothing.
    NoMatch,
    /// Usage text.
    Help,
    /// Leave the shell.
    Quit,
    /// A decode, compile or match error. The shell keeps running.
    Error(String),
}

/// Shell state: the loaded data and how to compile and print.
pub struct Shell {
    data: Value,
    compiler: Compiler,
    formatter: JsonFormatter,
}

impl Shell {
    pub fn new(data: Value, compiler: Compiler, formatter: JsonFormatter) -> Self {
        Self {
            data,
            compiler,
            formatter,
        }
    }

    /// Handle one input line.
    pub fn execute(&self, line: &str) -> Reply {
        let line = line.trim();
        match line {
            "" => Reply::Empty,
            "help" | "?" => Reply::Help,
            "quit" | "exit" => Reply::Quit,
            pattern => match self.evaluate(pattern) {
                Ok(Some(result)) => match self.formatter.dump(&result) {
                    Ok(text) => Reply::Output(text),
                    Err(err) => Reply::Error(err.to_string()),
                },
                Ok(None) => Reply::NoMatch,
                Err(err) => Reply::Error(err.to_string()),
            },
        }
    }

    fn evaluate(&self, text: &str) -> Result<Option<Value>, Error> {
        let source: Value = serde_json::from_str(text)?;
        let matcher = self.compiler.compile(&source)?;
        Ok(matcher.evaluate(&self.data)?)
    }

    /// Run the read-eval-print loop until `quit` or end of input.
    pub fn run(&self) -> anyhow::Result<()> {
        let mut editor = DefaultEditor::new().context("failed to start line editor")?;
        println!("Type help for examples, quit to exit");

        loop {
            match editor.readline(PROMPT) {
                Ok(line) => {
                    if !line.trim().is_empty() {
                        let _ = editor.add_history_entry(line.as_str());
                    }
                    match self.execute(&line) {
                        Reply::Empty => {}
                        Reply::Output(text) => println!("{text}"),
                        Reply::NoMatch => println!("(no match)"),
                        Reply::Help => println!("{HELP}"),
                        Reply::Quit => return Ok(()),
                        Reply::Error(msg) => eprintln!("error: {msg}"),
                    }
                }
                Err(ReadlineError::Interrupted | ReadlineError::Eof) => return Ok(()),
                Err(err) => return Err(err).context("failed to read line"),
            }
        }
    }
}
