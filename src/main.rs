use std::{
    io::{BufWriter, Write},
    process::ExitCode,
};

use clap::Parser;
use litrev::{
    ExtractorRegistry,
    HeaderParser,
    IngestReport,
    Session,
    error::{self, Error},
    export::{self, ExportOptions},
    render::{self, OutputFormat},
    shell::{self, ShellOptions},
    walker,
};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

mod cli;

use cli::{Cli, Command, LoadArgs, ScanArgs, ShellArgs};

fn init_tracing(verbose: u8, quiet: bool) {
    let filter = if let Ok(env) = std::env::var("LITREV_LOG") {
        EnvFilter::new(env)
    } else if quiet {
        EnvFilter::new("warn")
    } else {
        match verbose {
            0 => EnvFilter::new("info"),
            1 => EnvFilter::new("debug"),
            _ => EnvFilter::new("trace"),
        }
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .without_time()
        .init();
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.verbose, cli.quiet);

    let result = match cli.command {
        Command::Scan(args) => cmd_scan(&args),
        Command::Shell(args) => cmd_shell(&args),
        Command::Completions(args) => {
            args.generate();
            Ok(())
        }
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("error: {e}");
            ExitCode::FAILURE
        }
    }
}

/// Settings resolved from the shared load flags.
struct LoadSettings {
    parser: HeaderParser,
    glob: Option<globset::GlobMatcher>,
    export: ExportOptions,
}

fn resolve_load_args(args: &LoadArgs) -> error::Result<LoadSettings> {
    Ok(LoadSettings {
        parser: HeaderParser::new(args.delimiter.as_str())?,
        glob: args
            .glob
            .as_deref()
            .map(walker::compile_glob)
            .transpose()?,
        export: ExportOptions {
            separator: export::parse_separator(&args.separator)?,
            with_file: args.with_file,
        },
    })
}

fn report_ingest(report: &IngestReport) {
    if report.success_count == 0 && report.skipped_count > 0 {
        warn!("none of the {} file(s) could be read", report.skipped_count);
    }
}

fn cmd_scan(args: &ScanArgs) -> error::Result<()> {
    let settings = resolve_load_args(&args.load)?;
    let paths = walker::expand_inputs(&args.paths, settings.glob.as_ref())?;

    let mut session =
        Session::new(ExtractorRegistry::with_defaults(), settings.parser);
    let report = session.load(&paths);
    report_ingest(&report);

    if let Some(query) = &args.filter {
        session.filter_metadata(query);
    } else if let Some(query) = &args.search {
        session.search_full_text(query)?;
    }

    let rows = session.current();
    let records = rows.records();
    eprintln!("{}", session.active_filter().status_line(records.len()));

    let stdout = std::io::stdout();
    let mut out = BufWriter::new(stdout.lock());
    match args.format {
        OutputFormat::Table => {
            render::write_human(&mut out, &records, session.active_filter())?
        }
        OutputFormat::Json => {
            render::write_json(&mut out, &records, session.active_filter())?
        }
        OutputFormat::Csv => {
            render::write_csv(&mut out, &records, settings.export)?
        }
    }
    out.flush()?;

    if let Some(path) = &args.export {
        match session.export(path, settings.export) {
            Ok(count) => {
                info!("exported {count} row(s) to {}", path.display())
            }
            Err(Error::NothingToExport) => {
                warn!("no data to export; {} not written", path.display())
            }
            Err(e) => return Err(e),
        }
    }

    Ok(())
}

fn cmd_shell(args: &ShellArgs) -> error::Result<()> {
    let settings = resolve_load_args(&args.load)?;
    let mut session =
        Session::new(ExtractorRegistry::with_defaults(), settings.parser);

    if !args.paths.is_empty() {
        let paths =
            walker::expand_inputs(&args.paths, settings.glob.as_ref())?;
        let report = session.load(&paths);
        report_ingest(&report);
        let status =
            session.active_filter().status_line(report.rows_with_metadata);
        eprintln!("{status}");
    }

    let options = ShellOptions {
        glob: settings.glob,
        export: settings.export,
    };
    let stdin = std::io::stdin();
    let stdout = std::io::stdout();
    shell::run(&mut session, stdin.lock(), &mut stdout.lock(), &options)
}
