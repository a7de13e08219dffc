//! `main.rs` contains the command-line interface for aphorist. It collects the
//! values and options, sets up the logger, assembles the configuration, and
//! passes the configuration to the main function.
#[macro_use]
extern crate slog;

use ansi_term::Color;
use aphorist::config::{AphoristCommand, AphoristConfig, CheckConfig, ConvertConfig};
use clap::{crate_version, value_parser, Arg, Command};
use slog::{debug, Drain, Level};
use std::{fs::OpenOptions, process, sync::Mutex};

fn main() {
    // Get the command-line arguments and options
    let matches = Command::new("aphorist")
        .version(crate_version!())
        .about("Converts aphorism transcriptions into TEI XML with a critical apparatus")
        .subcommand_negates_reqs(true)
        .arg(
            Arg::new("input")
                .value_name("INPUT")
                .help("The transcription to convert, or a directory of .txt transcriptions")
                .index(1)
                .required(true),
        )
        .arg(
            Arg::new("output_dir")
                .value_name("OUTPUT DIR")
                .help("Where the XML files are written")
                .index(2)
                .default_value("XML"),
        )
        .arg(
            Arg::new("template")
                .short('t')
                .long("template")
                .value_name("TEMPLATE FILE")
                .takes_value(true)
                .help("The XML template (must contain #INSERTBODY#)"),
        )
        .arg(
            Arg::new("settings")
                .short('s')
                .long("settings")
                .value_name("SETTINGS FILE")
                .takes_value(true)
                .help("A RON file with XML layout settings"),
        )
        .arg(
            Arg::new("debug")
                .short('d')
                .long("debug")
                .takes_value(false)
                .help("Outputs debug log to aphorist-log.json")
                .hide_short_help(true)
                .hide_long_help(true),
        )
        .arg(
            Arg::new("verbose")
                .short('v')
                .long("verbose")
                .value_name("NUMBER")
                .help("Verbosity level between 0 and 5")
                .takes_value(true)
                .value_parser(value_parser!(u8).range(0..=5))
                .default_value("1")
                .hide_short_help(true)
                .hide_long_help(true),
        )
        .subcommand(
            Command::new("check")
                .about("Checks the footnotes of a transcription without converting it")
                .arg(
                    Arg::new("input")
                        .value_name("INPUT FILE")
                        .help("A transcription, or a file of footnotes only")
                        .index(1)
                        .required(true),
                )
                .arg(
                    Arg::new("json")
                        .short('j')
                        .long("json")
                        .takes_value(false)
                        .help("Prints every classified footnote as JSON"),
                ),
        )
        .subcommand(Command::new("settings").about("For creating a blank settings file"))
        .get_matches();

    // Setup the logger.
    //
    // If the debug flag is set, the log is also output to a file
    // `aphorist-log.json`.
    let debug = matches.is_present("debug");
    let min_log_level = match matches.get_one::<u8>("verbose").copied().unwrap_or(1) {
        0 => Level::Critical,
        1 => Level::Error,
        2 => Level::Warning,
        3 => Level::Info,
        4 => Level::Debug,
        _ => Level::Trace,
    };

    let term_decorator = slog_term::TermDecorator::new().build();
    let term_drain = slog_term::CompactFormat::new(term_decorator).build().fuse();
    let term_drain = term_drain.filter_level(min_log_level).fuse();

    let _guard: slog_scope::GlobalLoggerGuard = if debug {
        // Setup the file AND terminal loggers
        let log_file = match OpenOptions::new()
            .create(true)
            .write(true)
            .truncate(true)
            .open("./aphorist-log.json")
        {
            Ok(f) => f,
            Err(e) => {
                eprintln!(
                    "{} Unable to open aphorist-log.json: {}",
                    Color::Red.paint("ERRO"),
                    e
                );
                process::exit(1);
            }
        };
        let file_drain = slog_json::Json::new(log_file)
            .set_pretty(true)
            .add_default_keys()
            .build()
            .fuse();
        let file_drain = file_drain.filter_level(Level::Trace).fuse();
        let dual_logger = slog::Logger::root(
            Mutex::new(slog::Duplicate(term_drain, file_drain)).fuse(),
            o!("version" => crate_version!()),
        );
        slog_scope::set_global_logger(dual_logger)
    } else {
        // Setup just the terminal logger
        let term_logger = slog::Logger::root(
            Mutex::new(term_drain).fuse(),
            o!("version" => crate_version!()),
        );
        slog_scope::set_global_logger(term_logger)
    };

    debug!(slog_scope::logger(), "Logger setup");

    // Setup the configuration.
    let config = match matches.subcommand() {
        Some(("settings", _)) => AphoristConfig::new(AphoristCommand::NewSettingsFile, None),
        Some(("check", check)) => {
            // Required by clap, so always present.
            let input = check.value_of("input").unwrap_or_default();
            AphoristConfig::new(
                AphoristCommand::Check(CheckConfig::new(input, check.is_present("json"))),
                None,
            )
        }
        _ => {
            let input = matches.value_of("input").unwrap_or_default();
            let output_dir = matches.value_of("output_dir").unwrap_or("XML");
            let convert_config = ConvertConfig::new(
                input,
                output_dir,
                matches.value_of("template"),
                matches.value_of("settings"),
            );
            AphoristConfig::new(AphoristCommand::Main, Some(convert_config))
        }
    };

    // Run the program.
    if let Err(e) = aphorist::aphorist(config) {
        error!(slog_scope::logger(), "{}", e);
        eprintln!("{} {}", Color::Red.paint("ERRO"), e);
        process::exit(1);
    }
}
