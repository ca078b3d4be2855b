//! Line-oriented interactive session.
//!
//! Each filter command replaces the displayed rows and re-renders them,
//! the terminal counterpart of re-filtering on every keystroke.

use std::{
    io::{BufRead, Write},
    path::PathBuf,
};

use globset::GlobMatcher;
use tracing::debug;

use crate::{
    error::Result,
    export::ExportOptions,
    render,
    session::Session,
    walker,
};

pub const PROMPT: &str = "litrev> ";

const HELP: &str = "\
commands:
  load <path>...    replace the loaded documents (files or folders);
                    quote paths that contain spaces
  filter [text]     filter rows by metadata; empty shows all rows
  search <text>     show documents whose text contains <text>
  show              print the current rows again
  export <file>     write the current rows as CSV
  status            summarize what is loaded and shown
  help              show this message
  quit              leave the shell";

/// A parsed shell command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ShellCommand {
    Load(Vec<PathBuf>),
    Filter(String),
    Search(String),
    Show,
    Export(PathBuf),
    Status,
    Help,
    Quit,
}

impl ShellCommand {
    /// Parse one input line. Blank lines parse to `None`.
    pub fn parse(line: &str) -> std::result::Result<Option<Self>, String> {
        let line = line.trim();
        if line.is_empty() {
            return Ok(None);
        }
        let (word, rest) = match line.split_once(char::is_whitespace) {
            Some((word, rest)) => (word, rest.trim()),
            None => (line, ""),
        };

        let command = match word.to_ascii_lowercase().as_str() {
            "load" | "open" => {
                if rest.is_empty() {
                    return Err("usage: load <path>...".to_string());
                }
                let paths = split_args(rest)?;
                ShellCommand::Load(paths.into_iter().map(PathBuf::from).collect())
            }
            "filter" | "f" => ShellCommand::Filter(rest.to_string()),
            "search" | "s" => ShellCommand::Search(rest.to_string()),
            "show" | "ls" => ShellCommand::Show,
            "export" => match split_args(rest)?.as_slice() {
                [path] => ShellCommand::Export(PathBuf::from(path)),
                _ => return Err("usage: export <file>".to_string()),
            },
            "status" => ShellCommand::Status,
            "help" | "?" => ShellCommand::Help,
            "quit" | "exit" | "q" => ShellCommand::Quit,
            other => {
                return Err(format!(
                    "unknown command '{other}' (type 'help' for a list)"
                ));
            }
        };
        Ok(Some(command))
    }
}

/// Split command arguments on whitespace. Single or double quotes group
/// a path that contains spaces.
fn split_args(rest: &str) -> std::result::Result<Vec<String>, String> {
    let mut args = Vec::new();
    let mut current = String::new();
    let mut in_arg = false;
    let mut quote = None;

    for ch in rest.chars() {
        match quote {
            Some(q) if ch == q => quote = None,
            Some(_) => current.push(ch),
            None if ch == '"' || ch == '\'' => {
                quote = Some(ch);
                in_arg = true;
            }
            None if ch.is_whitespace() => {
                if in_arg {
                    args.push(std::mem::take(&mut current));
                    in_arg = false;
                }
            }
            None => {
                current.push(ch);
                in_arg = true;
            }
        }
    }
    if quote.is_some() {
        return Err("unterminated quote".to_string());
    }
    if in_arg {
        args.push(current);
    }
    Ok(args)
}

/// Settings that apply to every command in a shell session.
#[derive(Debug, Clone, Default)]
pub struct ShellOptions {
    pub glob: Option<GlobMatcher>,
    pub export: ExportOptions,
}

/// Read commands from `input` until `quit` or end of input.
///
/// Command failures are reported on `out` and the loop keeps going; only
/// failing to read `input` or write `out` ends the session early.
pub fn run<R: BufRead, W: Write>(
    session: &mut Session,
    input: R,
    out: &mut W,
    options: &ShellOptions,
) -> Result<()> {
    write!(out, "{PROMPT}")?;
    out.flush()?;

    for line in input.lines() {
        let line = line?;
        match ShellCommand::parse(&line) {
            Ok(Some(ShellCommand::Quit)) => break,
            Ok(Some(command)) => {
                debug!(?command, "shell command");
                if let Err(e) = execute(session, command, out, options) {
                    writeln!(out, "{e}")?;
                }
            }
            Ok(None) => {}
            Err(message) => writeln!(out, "{message}")?,
        }
        write!(out, "{PROMPT}")?;
        out.flush()?;
    }
    writeln!(out)?;
    Ok(())
}

fn execute<W: Write>(
    session: &mut Session,
    command: ShellCommand,
    out: &mut W,
    options: &ShellOptions,
) -> Result<()> {
    match command {
        ShellCommand::Load(inputs) => {
            let paths = walker::expand_inputs(&inputs, options.glob.as_ref())?;
            let report = session.load(&paths);
            for failure in &report.failures {
                writeln!(out, "skipped {failure}")?;
            }
            for id in &report.no_metadata {
                writeln!(out, "no metadata found in {id}")?;
            }
            show(session, out)?;
        }
        ShellCommand::Filter(query) => {
            session.filter_metadata(&query);
            show(session, out)?;
        }
        ShellCommand::Search(query) => {
            session.search_full_text(&query)?;
            show(session, out)?;
        }
        ShellCommand::Show => show(session, out)?,
        ShellCommand::Export(path) => {
            let rows = session.export(&path, options.export)?;
            writeln!(out, "exported {rows} row(s) to {}", path.display())?;
        }
        ShellCommand::Status => {
            let corpus = session.corpus();
            writeln!(
                out,
                "{} document(s) with metadata, {} without; showing {} ({})",
                corpus.len(),
                corpus.without_metadata().len(),
                session.current().len(),
                session.active_filter()
            )?;
        }
        ShellCommand::Help => writeln!(out, "{HELP}")?,
        ShellCommand::Quit => {}
    }
    Ok(())
}

fn show<W: Write>(session: &Session, out: &mut W) -> Result<()> {
    let rows = session.current();
    let records = rows.records();
    render::write_human(out, &records, session.active_filter())?;
    writeln!(out, "{}", session.active_filter().status_line(records.len()))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use std::path::Path;

    use super::*;
    use crate::{extract::ExtractorRegistry, header::HeaderParser};

    #[test]
    fn parses_commands() {
        assert_eq!(ShellCommand::parse("   "), Ok(None));
        assert_eq!(
            ShellCommand::parse("load a.md  papers/"),
            Ok(Some(ShellCommand::Load(vec![
                PathBuf::from("a.md"),
                PathBuf::from("papers/")
            ])))
        );
        assert_eq!(
            ShellCommand::parse("filter  sleep study "),
            Ok(Some(ShellCommand::Filter("sleep study".to_string())))
        );
        assert_eq!(
            ShellCommand::parse("filter"),
            Ok(Some(ShellCommand::Filter(String::new())))
        );
        assert_eq!(
            ShellCommand::parse("SEARCH rem"),
            Ok(Some(ShellCommand::Search("rem".to_string())))
        );
        assert_eq!(
            ShellCommand::parse("export out/review.csv"),
            Ok(Some(ShellCommand::Export(PathBuf::from("out/review.csv"))))
        );
        assert_eq!(ShellCommand::parse("q"), Ok(Some(ShellCommand::Quit)));
    }

    #[test]
    fn quoted_paths_keep_spaces() {
        assert_eq!(
            ShellCommand::parse(r#"load "My Papers/2021" 'a b.md' c.md"#),
            Ok(Some(ShellCommand::Load(vec![
                PathBuf::from("My Papers/2021"),
                PathBuf::from("a b.md"),
                PathBuf::from("c.md"),
            ])))
        );
        assert_eq!(
            ShellCommand::parse(r#"export "out dir/review.csv""#),
            Ok(Some(ShellCommand::Export(PathBuf::from(
                "out dir/review.csv"
            ))))
        );
        assert!(ShellCommand::parse(r#"load "unterminated"#).is_err());
        assert!(ShellCommand::parse("export a.csv b.csv").is_err());
    }

    #[test]
    fn rejects_bad_commands() {
        assert!(ShellCommand::parse("load").is_err());
        assert!(ShellCommand::parse("export").is_err());
        assert!(ShellCommand::parse("frobnicate").is_err());
    }

    fn write(dir: &Path, name: &str, content: &str) {
        std::fs::write(dir.join(name), content).unwrap();
    }

    #[test]
    fn session_round_trip() {
        let tmp = tempfile::tempdir().unwrap();
        let papers = tmp.path().join("papers");
        std::fs::create_dir(&papers).unwrap();
        write(&papers, "a.md", "---\nYear: 2020\nTitle: Sleep\n---\nREM.");
        write(&papers, "b.md", "---\nYear: 2019\nTitle: Diet\n---\nFood.");
        write(&papers, "c.txt", "no header");
        let out_csv = tmp.path().join("out.csv");

        let script = format!(
            "load {}\nfilter diet\nsearch\nsearch rem\nexport {}\nstatus\nbogus\nquit\nshow\n",
            papers.display(),
            out_csv.display()
        );

        let mut session = Session::new(
            ExtractorRegistry::with_defaults(),
            HeaderParser::default(),
        );
        let mut out = Vec::new();
        run(
            &mut session,
            script.as_bytes(),
            &mut out,
            &ShellOptions::default(),
        )
        .unwrap();
        let text = String::from_utf8(out).unwrap();

        assert!(text.contains("no metadata found in c.txt"));
        assert!(text.contains("Loaded 2 files with metadata"));
        assert!(text.contains("Found 1 matches in metadata"));
        assert!(text.contains("please enter a search term"));
        assert!(text.contains("Found 1 documents containing 'rem'"));
        assert!(text.contains("exported 1 row(s)"));
        assert!(text.contains("2 document(s) with metadata, 1 without; showing 1"));
        assert!(text.contains("unknown command 'bogus'"));

        let csv = std::fs::read_to_string(&out_csv).unwrap();
        assert!(csv.contains("Sleep"));
        assert!(!csv.contains("Diet"));
    }

    #[test]
    fn export_with_nothing_loaded_reports() {
        let tmp = tempfile::tempdir().unwrap();
        let script = format!("export {}\n", tmp.path().join("x.csv").display());
        let mut session = Session::default();
        let mut out = Vec::new();
        run(
            &mut session,
            script.as_bytes(),
            &mut out,
            &ShellOptions::default(),
        )
        .unwrap();
        assert!(String::from_utf8(out).unwrap().contains("no data to export"));
    }
}
