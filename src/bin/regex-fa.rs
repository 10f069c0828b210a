//! Command-line front end for the regex → NFA → DFA → minimal DFA pipeline.
//!
//! Usage:
//!   regex-fa `<REGEX>` [--config `<YAML>`] [--stage all|nfa|dfa|min-dfa] [--ast] [--verbose]
//!
//! The selected automata are written to stdout as JSON; diagnostics go to stderr.
use regex_fa::config::ConversionConfig;
use regex_fa::converter::{Conversion, Converter};
use regex_fa::error_handling::Result;
use regex_fa::export::{to_json_string, ExportMap};

use clap::{Arg, ArgAction, Command};
use std::rc::Rc;

fn select_stage(conversion: &Conversion, stage: &str) -> Result<ExportMap> {
    match stage {
        "nfa" => conversion.get_nfa().to_export(),
        "dfa" => conversion.get_dfa().to_export(),
        "min-dfa" => conversion.get_min_dfa().to_export(),
        _ => conversion.to_export(),
    }
}

fn run(regex: &str, config_path: Option<&String>, stage: &str, print_ast: bool, verbose: bool) -> Result<()> {
    let config = match config_path {
        Some(path) => ConversionConfig::parse_from_file(path)?,
        None => Rc::new(ConversionConfig::default()),
    };
    let converter = Converter::new(config);
    let conversion = converter.convert(regex)?;

    if print_ast {
        eprint!("{}", conversion.get_ast());
    }
    if verbose {
        eprintln!("{:?}", conversion);
    }

    println!("{}", to_json_string(&select_stage(&conversion, stage)?)?);
    Ok(())
}

fn main() {
    let matches = Command::new("regex-fa")
        .version(regex_fa::version())
        .about("Convert a regular expression into an epsilon-NFA, a DFA and a minimal DFA")
        .arg(
            Arg::new("regex")
                .help("The regular expression to convert")
                .required(true)
                .value_name("REGEX"),
        )
        .arg(
            Arg::new("config")
                .long("config")
                .short('c')
                .help("Path to a YAML file with conversion limits")
                .value_name("CONFIG_FILE"),
        )
        .arg(
            Arg::new("stage")
                .long("stage")
                .short('s')
                .help("Which automaton to print")
                .value_parser(["all", "nfa", "dfa", "min-dfa"])
                .default_value("all"),
        )
        .arg(
            Arg::new("ast")
                .long("ast")
                .help("Print the parsed syntax tree to stderr")
                .action(ArgAction::SetTrue),
        )
        .arg(
            Arg::new("verbose")
                .long("verbose")
                .short('v')
                .help("Dump every pipeline stage to stderr")
                .action(ArgAction::SetTrue),
        )
        .get_matches();

    let regex: &String = matches.get_one("regex").expect("regex is required");
    let stage: &String = matches.get_one("stage").expect("stage has a default");
    let config_path: Option<&String> = matches.get_one("config");

    if let Err(e) = run(
        regex,
        config_path,
        stage,
        matches.get_flag("ast"),
        matches.get_flag("verbose"),
    ) {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}
