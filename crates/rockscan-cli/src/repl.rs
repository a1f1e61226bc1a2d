//! Interactive scanning session.

use crate::cli::ReplArgs;
use crate::commands::build_analyzer;
use crate::config::{base_dir, Config};
use crate::error::{CliError, Result};
use crate::output::Formatter;
use rockscan_analyzer::Analyzer;
use rockscan_capture::{CaptureSurface, FileDevice};
use rockscan_domain::traits::{VideoDevice, VisionProvider};
use rockscan_domain::{AccessTier, BasinId, FieldLogEntry, OperatingMode, BASINS};
use rockscan_llm::LlmError;
use rockscan_session::{FieldNotes, Session, SessionObserver, SessionState};
use rustyline::error::ReadlineError;
use rustyline::DefaultEditor;
use std::path::PathBuf;
use tracing::debug;

/// Run the interactive REPL.
pub async fn run_repl(args: ReplArgs, config: &Config, formatter: &Formatter) -> Result<()> {
    let analyzer = build_analyzer(config)?;
    let mut session = open_session(args.device, config, formatter)?;
    session.subscribe(Box::new(StatusPrinter {
        formatter: formatter.clone(),
    }));

    println!(
        "{}",
        formatter.info("Rockscan REPL - Type 'help' for commands, 'exit' to quit")
    );
    println!("{}", formatter.format_settings(session.settings()));
    println!();

    let editor_config = rustyline::Config::builder()
        .max_history_size(config.settings.history_size)
        .map_err(editor_error)?
        .build();
    let mut editor = DefaultEditor::with_config(editor_config).map_err(editor_error)?;

    let history_path = get_history_path()?;
    let _ = editor.load_history(&history_path);

    if let Err(e) = session.start() {
        eprintln!("{}", formatter.error(&e.to_string()));
    }

    loop {
        let prompt = format!(
            "rockscan [{}/{}]> ",
            session.settings().mode.as_str(),
            session.settings().tier.as_str()
        );

        match editor.readline(&prompt) {
            Ok(line) => {
                let line = line.trim();

                if line.is_empty() {
                    continue;
                }

                editor.add_history_entry(line).ok();

                match parse_repl_command(line) {
                    Ok(ReplCommand::Exit) => {
                        println!("{}", formatter.info("Goodbye!"));
                        break;
                    }
                    Ok(ReplCommand::Help) => {
                        print_help(formatter);
                    }
                    Ok(cmd) => {
                        if let Err(e) =
                            execute_repl_command(cmd, &mut session, &analyzer, formatter).await
                        {
                            eprintln!("{}", formatter.error(&e.to_string()));
                        }
                    }
                    Err(e) => {
                        eprintln!("{}", formatter.error(&e.to_string()));
                    }
                }
            }
            Err(ReadlineError::Interrupted) => {
                println!("{}", formatter.info("Use 'exit' to quit"));
            }
            Err(ReadlineError::Eof) => {
                break;
            }
            Err(err) => {
                eprintln!("{}", formatter.error(&format!("Error: {}", err)));
                break;
            }
        }
    }

    session.teardown();
    editor.save_history(&history_path).ok();

    Ok(())
}

/// Build a session over the configured frame source.
///
/// Without a source the session still starts; acquisition then fails as a
/// missing camera and can be retried.
fn open_session(
    device: Option<PathBuf>,
    config: &Config,
    formatter: &Formatter,
) -> Result<Session<FileDevice>> {
    let device = device
        .or_else(|| config.capture.device.clone())
        .map(FileDevice::new)
        .unwrap_or_else(FileDevice::unconfigured);
    let surface = CaptureSurface::new(device, config.capture.constraints()?);
    println!("{}", formatter.info(&describe_source(&surface)));

    Ok(Session::new(surface, config.defaults.scan_settings()?))
}

fn describe_source(surface: &CaptureSurface<FileDevice>) -> String {
    let constraints = surface.constraints();
    match surface.device().path() {
        Some(path) => format!(
            "Camera: {} (ideal {}x{})",
            path.display(),
            constraints.ideal_width,
            constraints.ideal_height
        ),
        None => "No camera configured: pass --device <path> or set [capture] device".to_string(),
    }
}

/// Prints a status line on every transition.
struct StatusPrinter {
    formatter: Formatter,
}

impl SessionObserver for StatusPrinter {
    fn on_transition(&self, state: &SessionState) {
        debug!("Session is now {}", state.name());
        // The teardown transition happens on exit; nothing to show.
        if !matches!(state, SessionState::Idle) {
            println!("{}", self.formatter.format_status(state));
        }
    }

    fn on_log_appended(&self, entry: &FieldLogEntry) {
        println!(
            "{}",
            self.formatter
                .success(&format!("Logged {} [{}]", entry.unit, entry.id.short()))
        );
    }
}

/// REPL command type.
#[derive(Debug, PartialEq)]
enum ReplCommand {
    Exit,
    Help,
    Scan,
    Retry,
    Dismiss,
    Status,
    Basins,
    Mode(OperatingMode),
    Tier(AccessTier),
    Basin(BasinId),
    Log,
    LogAdd(FieldNotes),
}

/// Parse a REPL command line.
fn parse_repl_command(line: &str) -> Result<ReplCommand> {
    let parts: Vec<&str> = line.split_whitespace().collect();

    if parts.is_empty() {
        return Err(CliError::InvalidInput("Empty command".to_string()));
    }

    match parts[0] {
        "exit" | "quit" | "q" => Ok(ReplCommand::Exit),
        "help" | "?" => Ok(ReplCommand::Help),
        "scan" | "s" => Ok(ReplCommand::Scan),
        "retry" => Ok(ReplCommand::Retry),
        "dismiss" | "close" => Ok(ReplCommand::Dismiss),
        "status" => Ok(ReplCommand::Status),
        "basins" => Ok(ReplCommand::Basins),
        "mode" => parse_setting(&parts[1..], "mode <field|lab>", OperatingMode::parse)
            .map(ReplCommand::Mode),
        "tier" => parse_setting(&parts[1..], "tier <student|researcher>", AccessTier::parse)
            .map(ReplCommand::Tier),
        "basin" => parse_setting(&parts[1..], "basin <id>", BasinId::parse).map(ReplCommand::Basin),
        "log" => parse_log_command(&parts[1..]),
        _ => Err(CliError::InvalidInput(format!(
            "Unknown command: {}. Type 'help' for available commands.",
            parts[0]
        ))),
    }
}

fn parse_setting<T>(args: &[&str], usage: &str, parse: fn(&str) -> Option<T>) -> Result<T> {
    let value = args
        .first()
        .ok_or_else(|| CliError::InvalidInput(format!("Usage: {}", usage)))?;
    parse(value).ok_or_else(|| {
        CliError::InvalidInput(format!("Unknown value '{}'. Usage: {}", value, usage))
    })
}

fn parse_log_command(args: &[&str]) -> Result<ReplCommand> {
    match args.first() {
        None | Some(&"list") => Ok(ReplCommand::Log),
        Some(&"add") => {
            // log add [unit=X] [lithology=X] [thickness] [notes...]
            let mut notes = FieldNotes::default();
            let mut rest = Vec::new();

            for arg in &args[1..] {
                if let Some(unit) = arg.strip_prefix("unit=") {
                    notes.unit = Some(unit.to_string());
                } else if let Some(lithology) = arg.strip_prefix("lithology=") {
                    notes.lithology = Some(lithology.to_string());
                } else if notes.thickness.is_none() && rest.is_empty() {
                    notes.thickness = Some(arg.to_string());
                } else {
                    rest.push(*arg);
                }
            }
            if !rest.is_empty() {
                notes.notes = Some(rest.join(" "));
            }

            Ok(ReplCommand::LogAdd(notes))
        }
        Some(other) => Err(CliError::InvalidInput(format!(
            "Unknown log action: {}",
            other
        ))),
    }
}

/// Execute a REPL command against the session.
async fn execute_repl_command<D, P>(
    cmd: ReplCommand,
    session: &mut Session<D>,
    analyzer: &Analyzer<P>,
    formatter: &Formatter,
) -> Result<()>
where
    D: VideoDevice,
    P: VisionProvider<Error = LlmError> + Send + Sync,
{
    match cmd {
        ReplCommand::Scan => {
            if !session.scan(analyzer).await {
                println!(
                    "{}",
                    formatter.warning(&format!(
                        "Nothing to scan while {}",
                        session.state().name()
                    ))
                );
            }
            print_result(session, formatter)?;
        }
        ReplCommand::Retry => session.retry()?,
        ReplCommand::Dismiss => session.dismiss()?,
        ReplCommand::Status => {
            println!("{}", formatter.format_status(session.state()));
            println!("{}", formatter.format_settings(session.settings()));
        }
        ReplCommand::Basins => {
            println!(
                "{}",
                formatter.format_basins(&BASINS, Some(session.settings().basin))?
            );
        }
        ReplCommand::Mode(mode) => {
            session.set_mode(mode);
            println!("{}", formatter.format_settings(session.settings()));
        }
        ReplCommand::Tier(tier) => {
            session.set_tier(tier);
            println!("{}", formatter.format_settings(session.settings()));
            // The tier gates what a displayed result shows.
            print_result(session, formatter)?;
        }
        ReplCommand::Basin(basin) => {
            session.set_basin(basin);
            println!("{}", formatter.format_settings(session.settings()));
        }
        ReplCommand::Log => {
            println!("{}", formatter.format_log(session.log())?);
        }
        ReplCommand::LogAdd(notes) => {
            session.add_to_log(notes)?;
        }
        ReplCommand::Exit | ReplCommand::Help => {}
    }

    Ok(())
}

fn print_result<D: VideoDevice>(session: &Session<D>, formatter: &Formatter) -> Result<()> {
    if let Some(result) = session.state().result() {
        println!();
        println!("{}", formatter.format_report(result, session.settings().tier)?);
        println!();
    }
    Ok(())
}

fn editor_error(e: ReadlineError) -> CliError {
    CliError::Io(std::io::Error::new(
        std::io::ErrorKind::Other,
        format!("Failed to initialize editor: {}", e),
    ))
}

fn get_history_path() -> Result<PathBuf> {
    let dir = base_dir()?;
    std::fs::create_dir_all(&dir)?;
    Ok(dir.join("history.txt"))
}

fn print_help(formatter: &Formatter) {
    println!("{}", formatter.info("Available commands:"));
    println!();
    println!("  scan, s                        - Capture a still and analyze it");
    println!("  retry                          - Recover from a failure");
    println!("  dismiss                        - Close the current report");
    println!("  status                         - Show session state and settings");
    println!("  mode <field|lab>               - Set imaging mode");
    println!("  tier <student|researcher>      - Set access tier");
    println!("  basin <id>                     - Set regional basin");
    println!("  basins                         - List the basin catalog");
    println!("  log                            - Show the field log");
    println!("  log add [unit=X] [lithology=X] [thickness] [notes...]");
    println!("                                 - Record the current result");
    println!("  help, ?                        - Show this help");
    println!("  exit, quit, q                  - Exit REPL");
    println!();
}
