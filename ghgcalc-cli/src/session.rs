//! Interactive session: one command per line, results accumulate in the history.
//!
//! ```text
//! > eval 0.1 100 | 40 | 10 | 5
//! Resource consumption, t: 65.0000
//! > expr E * GWP; E = 10; GWP = 28
//! Custom expression, t CO2-eq: 280.0000
//! > export results.csv
//! ```

use anyhow::{anyhow, bail, Result};
use std::io::{BufRead, Write};
use std::path::PathBuf;

use ghgcalc_core::{FormulaDispatcher, Settings};

use crate::report;

pub const HELP: &str = "\
Commands:
  categories                     list the formula categories
  list <category>                list the formulas of a category
  show <id>                      describe a formula and its inputs
  eval <id> <field> | <field>    evaluate a formula, fields separated by '|'
  expr <expression> [; a = 1]    evaluate a free-text expression
  history                        show every result of the session
  export [path]                  write the history to a CSV file
  fuels                          show the fuel reference table
  help                           show this message
  quit                           leave the session
";

#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    Help,
    Categories,
    List(String),
    Show(String),
    Eval { id: String, fields: Vec<String> },
    Expr { expression: String, bindings: String },
    History,
    Export(Option<PathBuf>),
    Fuels,
    Quit,
}

impl Command {
    /// `Ok(None)` for a blank line.
    pub fn parse(line: &str) -> Result<Option<Self>> {
        let line = line.trim();
        if line.is_empty() {
            return Ok(None);
        }
        let (name, rest) = match line.split_once(char::is_whitespace) {
            Some((name, rest)) => (name, rest.trim()),
            None => (line, ""),
        };
        let required = |what: &str| -> Result<String> {
            if rest.is_empty() {
                Err(anyhow!("`{name}` needs {what}"))
            } else {
                Ok(rest.to_string())
            }
        };

        let command = match name {
            "help" | "?" => Command::Help,
            "categories" => Command::Categories,
            "list" => Command::List(required("a category")?),
            "show" => Command::Show(required("a formula id")?),
            "eval" => {
                let rest = required("a formula id")?;
                let (id, fields) = match rest.split_once(char::is_whitespace) {
                    Some((id, fields)) => (id, fields),
                    None => (rest.as_str(), ""),
                };
                let fields = if fields.trim().is_empty() {
                    Vec::new()
                } else {
                    fields.split('|').map(|f| f.trim().to_string()).collect()
                };
                Command::Eval {
                    id: id.to_string(),
                    fields,
                }
            }
            "expr" => {
                let rest = required("an expression")?;
                let (expression, bindings) = rest.split_once(';').unwrap_or((rest.as_str(), ""));
                Command::Expr {
                    expression: expression.trim().to_string(),
                    bindings: bindings.to_string(),
                }
            }
            "history" => Command::History,
            "export" => Command::Export((!rest.is_empty()).then(|| PathBuf::from(rest))),
            "fuels" => Command::Fuels,
            "quit" | "exit" => Command::Quit,
            other => bail!("unknown command `{other}`, type `help`"),
        };
        Ok(Some(command))
    }
}

pub struct Session<'r> {
    dispatcher: FormulaDispatcher<'r>,
    settings: Settings,
}

impl<'r> Session<'r> {
    pub fn new(dispatcher: FormulaDispatcher<'r>, settings: Settings) -> Self {
        Self {
            dispatcher,
            settings,
        }
    }

    pub fn dispatcher(&self) -> &FormulaDispatcher<'r> {
        &self.dispatcher
    }

    /// Read commands until `quit` or end of input. Command errors are reported
    /// and the session carries on.
    pub fn run<R: BufRead, W: Write>(&mut self, input: R, out: &mut W) -> Result<()> {
        writeln!(out, "Type `help` for the list of commands.")?;
        for line in input.lines() {
            let line = line?;
            let command = match Command::parse(&line) {
                Ok(Some(Command::Quit)) => break,
                Ok(Some(command)) => command,
                Ok(None) => continue,
                Err(e) => {
                    writeln!(out, "error: {e}")?;
                    continue;
                }
            };
            if let Err(e) = self.execute(command, out) {
                writeln!(out, "error: {e}")?;
            }
        }
        Ok(())
    }

    pub fn execute<W: Write>(&mut self, command: Command, out: &mut W) -> Result<()> {
        let registry = self.dispatcher.registry();
        match command {
            Command::Help => write!(out, "{HELP}")?,
            Command::Categories => write!(out, "{}", report::CategoryListing(registry))?,
            Command::List(category) => {
                let formulas = registry.list_formulas(&category)?;
                write!(out, "{}", report::FormulaListing(&formulas))?;
            }
            Command::Show(id) => write!(out, "{}", report::FormulaDetails(registry.get(&id)?))?,
            Command::Eval { id, fields } => {
                let result = self.dispatcher.evaluate(&id, fields.as_slice())?;
                writeln!(out, "{result}")?;
            }
            Command::Expr {
                expression,
                bindings,
            } => {
                let result = self.dispatcher.evaluate_expression(&expression, &bindings)?;
                writeln!(out, "{result}")?;
            }
            Command::History => {
                let precision = self.dispatcher.precision();
                for (i, value) in self.dispatcher.history().values().iter().enumerate() {
                    writeln!(out, "{:>3}. {:.*}", i + 1, precision, value)?;
                }
            }
            Command::Export(path) => {
                let path = path.unwrap_or_else(|| self.settings.export_path.clone());
                self.dispatcher.export_csv(&path)?;
                writeln!(
                    out,
                    "Exported {} results to {}",
                    self.dispatcher.history().len(),
                    path.display()
                )?;
            }
            Command::Fuels => write!(out, "{}", report::FuelTable(registry.fuels()))?,
            Command::Quit => {}
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ghgcalc_formulas::FORMULA_REGISTRY;

    fn run(script: &str, settings: Settings) -> (String, Vec<f64>) {
        let dispatcher = FormulaDispatcher::with_settings(&FORMULA_REGISTRY, &settings);
        let mut session = Session::new(dispatcher, settings);
        let mut out = Vec::new();
        session.run(script.as_bytes(), &mut out).unwrap();
        let history = session.dispatcher().history().values().to_vec();
        (String::from_utf8(out).unwrap(), history)
    }

    #[test]
    fn test_parse_eval() {
        assert_eq!(
            Command::parse("eval 0.1 100 | 40 |10| 5").unwrap(),
            Some(Command::Eval {
                id: "0.1".into(),
                fields: vec!["100".into(), "40".into(), "10".into(), "5".into()],
            })
        );
        assert_eq!(
            Command::parse("eval 8.18 1 2 3").unwrap(),
            Some(Command::Eval {
                id: "8.18".into(),
                fields: vec!["1 2 3".into()],
            })
        );
    }

    #[test]
    fn test_parse_expr_and_export() {
        assert_eq!(
            Command::parse("expr a * b; a = 2; b = 3").unwrap(),
            Some(Command::Expr {
                expression: "a * b".into(),
                bindings: " a = 2; b = 3".into(),
            })
        );
        assert_eq!(Command::parse("export").unwrap(), Some(Command::Export(None)));
        assert_eq!(Command::parse("   ").unwrap(), None);
        assert!(Command::parse("list").is_err());
        assert!(Command::parse("frobnicate").is_err());
    }

    #[test]
    fn test_session_keeps_going_after_errors() {
        let script = "\
eval 0.1 100 | 40 | 10 | 5
eval 6.1 0
eval 0.2 abc | CH4
bogus
eval 0.2 10 | CH4
history
quit
eval 0.3 1
";
        let (text, history) = run(script, Settings::default());
        assert_eq!(history, vec![65.0, 280.0]);
        assert!(text.contains("Resource consumption, t: 65.0000"));
        assert!(text.contains("error: Formula 6.1 could not be computed"));
        assert!(text.contains("error: Invalid number for 'Emission of the gas, t': 'abc'"));
        assert!(text.contains("  1. 65.0000\n  2. 280.0000\n"));
    }

    #[test]
    fn test_session_export_uses_settings_path() {
        let dir = tempfile::tempdir().unwrap();
        let settings = Settings {
            export_path: dir.path().join("session.csv"),
            precision: 2,
            ..Settings::default()
        };
        let (text, _) = run("expr 2 * x; x = 21\nexport\n", settings);
        assert!(text.contains("Custom expression, t CO2-eq: 42.00"));
        let csv = std::fs::read_to_string(dir.path().join("session.csv")).unwrap();
        assert_eq!(csv, "Calculation #,Value (t CO2-eq)\n1,42\n");
    }
}
