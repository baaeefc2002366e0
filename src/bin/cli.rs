//! librarydb - interactive shell

use std::path::Path;

use anyhow::Context;
use librarydb::catalog::Schema;
use librarydb::executor::ExecutionEngine;
use librarydb::library::{self, Library, NewBook, NewIssue, Student};
use librarydb::storage::Tuple;
use librarydb::Config;
use rustyline::error::ReadlineError;
use rustyline::DefaultEditor;
use tracing::{debug, warn};
use tracing_subscriber::EnvFilter;

/// Print help message
fn print_help() {
    println!(
        r#"
Commands:
  .help              Show this help message
  .quit              Save and exit
  .init              Create the library database (students, books, issues)
  .databases         List all databases
  .tables            List tables of the current database
  .schema [table]    Show table schema
  .rows <table>      Show the rows of a table
  .add-student <roll_no> [| name]
  .add-book <title> | <author>
  .issue <roll_no> | <book title>

Statements (end with ';'):
  CREATE DATABASE [IF NOT EXISTS] name;
  DROP DATABASE [IF EXISTS] name;
  USE name;
  CREATE TABLE [IF NOT EXISTS] name (col TYPE [AUTO_INCREMENT] [PRIMARY KEY] [NOT NULL], ...);
  DROP TABLE [IF EXISTS] name;
"#
    );
}

/// Format rows as a table
fn format_results(schema: &Schema, rows: &[&Tuple]) -> String {
    let columns = schema.column_names();
    let mut widths: Vec<usize> = columns.iter().map(|c| c.len()).collect();

    for row in rows {
        for (i, value) in row.values().iter().enumerate() {
            if i < widths.len() {
                widths[i] = widths[i].max(value.to_string().len());
            }
        }
    }

    let separator: String = widths
        .iter()
        .map(|w| "-".repeat(*w + 2))
        .collect::<Vec<_>>()
        .join("+");
    let separator = format!("+{}+\n", separator);

    let mut output = String::new();
    output.push_str(&separator);
    let header: String = columns
        .iter()
        .zip(&widths)
        .map(|(c, w)| format!(" {:^width$} ", c, width = *w))
        .collect::<Vec<_>>()
        .join("|");
    output.push_str(&format!("|{}|\n", header));
    output.push_str(&separator);

    for row in rows {
        let row_str: String = row
            .values()
            .iter()
            .zip(&widths)
            .map(|(v, w)| format!(" {:>width$} ", v.to_string(), width = *w))
            .collect::<Vec<_>>()
            .join("|");
        output.push_str(&format!("|{}|\n", row_str));
    }

    if !rows.is_empty() {
        output.push_str(&separator);
    }
    output.push_str(&format!("{} row(s)\n", rows.len()));
    output
}

/// Execute the statements of a script, printing each result
fn execute_sql(sql: &str, engine: &mut ExecutionEngine) {
    match engine.execute_script(sql) {
        Ok(results) => {
            for result in results {
                println!("{}", result.message);
            }
        }
        Err(e) => eprintln!("{}", e),
    }
}

/// Split the text after a dot command into `|`-separated fields
fn fields(cmd: &str) -> Vec<&str> {
    match cmd.split_once(char::is_whitespace) {
        Some((_, rest)) => rest.split('|').map(str::trim).collect(),
        None => Vec::new(),
    }
}

/// Run the row-adding dot commands against the library database
fn add_row(command: &str, args: &[&str], engine: &mut ExecutionEngine) -> librarydb::Result<String> {
    let mut library = Library::attach(engine)?;
    let arg = |i: usize| args.get(i).copied().filter(|s| !s.is_empty());
    match (command, arg(0)) {
        (".add-student", Some(roll_no)) => {
            library.add_student(&Student::new(roll_no, arg(1)))?;
            Ok(format!("Student '{}' added", roll_no))
        }
        (".add-book", Some(title)) => {
            let book = library.add_book(&NewBook {
                title: Some(title.to_string()),
                author: arg(1).map(str::to_string),
            })?;
            Ok(format!("Book {} added", book.id))
        }
        (".issue", Some(roll_no)) => {
            let issue = library.record_issue(&NewIssue {
                roll_no: Some(roll_no.to_string()),
                book_title: arg(1).map(str::to_string),
            })?;
            Ok(format!("Issue {} recorded", issue.id))
        }
        _ => Ok(format!("Usage: {} <value> [| value]", command)),
    }
}

/// Handle special dot commands. Returns false when the shell should exit.
fn handle_special_command(cmd: &str, engine: &mut ExecutionEngine) -> bool {
    let parts: Vec<&str> = cmd.split_whitespace().collect();

    match parts.first().copied() {
        Some(".help") => print_help(),
        Some(".quit") | Some(".exit") => return false,
        Some(".init") => match library::install(engine) {
            Ok(()) => println!("Library schema installed; current database is '{}'", library::LIBRARY_DATABASE),
            Err(e) => eprintln!("{}", e),
        },
        Some(".databases") => {
            let names = engine.list_databases();
            if names.is_empty() {
                println!("No databases found.");
            }
            for name in names {
                let marker = if engine.current_database_name() == Some(name.as_str()) {
                    "*"
                } else {
                    " "
                };
                println!("{} {}", marker, name);
            }
        }
        Some(".tables") => match engine.current_database() {
            Ok(db) => {
                let tables = db.list_tables();
                if tables.is_empty() {
                    println!("No tables found.");
                } else {
                    println!("Tables:");
                    for table in tables {
                        println!("  {}", table);
                    }
                }
            }
            Err(e) => eprintln!("{}", e),
        },
        Some(".schema") => match engine.current_database() {
            Ok(db) => {
                let names = match parts.get(1) {
                    Some(name) => vec![name.to_string()],
                    None => db.list_tables(),
                };
                for name in names {
                    match db.catalog().get_table_info(&name) {
                        Ok(info) => println!("{}", info),
                        Err(e) => eprintln!("{}", e),
                    }
                }
            }
            Err(e) => eprintln!("{}", e),
        },
        Some(".rows") => {
            let Some(name) = parts.get(1) else {
                eprintln!("Usage: .rows <table>");
                return true;
            };
            match engine.current_database().and_then(|db| db.table(name)) {
                Ok(table) => {
                    let rows: Vec<&Tuple> = table.scan().collect();
                    print!("{}", format_results(table.schema(), &rows));
                }
                Err(e) => eprintln!("{}", e),
            }
        }
        Some(command @ (".add-student" | ".add-book" | ".issue")) => {
            match add_row(command, &fields(cmd), engine) {
                Ok(message) => println!("{}", message),
                Err(e) => eprintln!("{}", e),
            }
        }
        Some(cmd) => {
            eprintln!("Unknown command: {}", cmd);
            eprintln!("Type '.help' for available commands.");
        }
        None => {}
    }
    true
}

/// Main REPL loop
fn run_repl(engine: &mut ExecutionEngine, history: Option<&Path>) -> anyhow::Result<()> {
    let mut editor = DefaultEditor::new().context("failed to initialize line editor")?;
    if let Some(path) = history {
        if editor.load_history(path).is_err() {
            debug!(path = %path.display(), "no shell history loaded");
        }
    }

    println!("librarydb shell. Type '.help' for help, '.init' to create the library schema.");
    if !engine.is_persistent() {
        println!("Running in memory; pass --data-dir to keep data.");
    }

    let mut input_buffer = String::new();

    loop {
        let prompt = if input_buffer.is_empty() {
            match engine.current_database_name() {
                Some(db) => format!("librarydb ({})> ", db),
                None => "librarydb> ".to_string(),
            }
        } else {
            "...> ".to_string()
        };

        let line = match editor.readline(&prompt) {
            Ok(line) => line,
            Err(ReadlineError::Interrupted) => {
                input_buffer.clear();
                continue;
            }
            Err(ReadlineError::Eof) => break,
            Err(e) => return Err(e).context("failed to read input"),
        };

        let trimmed = line.trim();
        if trimmed.is_empty() {
            continue;
        }
        if let Err(e) = editor.add_history_entry(trimmed) {
            debug!(error = %e, "failed to record history entry");
        }

        if input_buffer.is_empty() && trimmed.starts_with('.') {
            if !handle_special_command(trimmed, engine) {
                break;
            }
            continue;
        }

        input_buffer.push_str(&line);
        input_buffer.push('\n');

        if trimmed.ends_with(';') {
            let sql = std::mem::take(&mut input_buffer);
            execute_sql(&sql, engine);
        }
    }

    if let Some(path) = history {
        if let Err(e) = editor.save_history(path) {
            warn!(path = %path.display(), error = %e, "failed to save shell history");
        }
    }
    Ok(())
}

fn main() -> anyhow::Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let config = Config::from_env()
        .apply_args(std::env::args().skip(1))
        .map_err(anyhow::Error::msg)?;

    let mut engine = ExecutionEngine::open(&config).context("failed to open data directory")?;

    match &config.script {
        Some(path) => {
            let sql = std::fs::read_to_string(path)
                .with_context(|| format!("failed to read {}", path.display()))?;
            let results = engine.execute_script(&sql)?;
            for result in results {
                println!("{}", result.message);
            }
        }
        None => run_repl(&mut engine, config.history_file.as_deref())?,
    }

    engine.flush().context("failed to save databases")?;
    println!("Goodbye!");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fields() {
        assert_eq!(
            fields(".add-book Intro to Algorithms | Cormen"),
            vec!["Intro to Algorithms", "Cormen"]
        );
        assert!(fields(".add-book").is_empty());
    }

    #[test]
    fn test_add_rows_runs_library_scenario() {
        let mut engine = ExecutionEngine::in_memory();
        assert!(add_row(".add-student", &["S001"], &mut engine).is_err());

        library::install(&mut engine).unwrap();
        let run = |engine: &mut ExecutionEngine, line: &str| {
            let command = line.split_whitespace().next().unwrap();
            add_row(command, &fields(line), engine).unwrap()
        };
        assert_eq!(run(&mut engine, ".add-student S001 | Alice"), "Student 'S001' added");
        assert_eq!(run(&mut engine, ".add-book Intro to Algorithms | Cormen"), "Book 1 added");
        assert_eq!(run(&mut engine, ".issue S001 | Intro to Algorithms"), "Issue 1 recorded");

        let library = Library::attach(&mut engine).unwrap();
        assert_eq!(
            library.student("S001").unwrap(),
            Some(Student::new("S001", Some("Alice")))
        );
        assert_eq!(library.books().unwrap()[0].author.as_deref(), Some("Cormen"));
    }
}
