//! strand CLI
//!
//! A command line front end for the strand text utilities: split text on
//! separators, walk delimiter structure, number and filter lines, or
//! re-flow paragraphs to a margin.
//!
//! Usage:
//!   strand split [--sep <sep>]... [--keep] [--separate] [--json] [file]
//!   strand delimiters [--json] [file]
//!   strand lines [--strip] [--number] [--grep <pattern>] [file]
//!   strand wrap [--margin <n>] [--code-indent <n>] [file]
//!
//! Reads from stdin when no file is given. Output is colored when
//! stdout is a terminal.

use std::fs;
use std::io::{self, Read, Write};

use clap::{Arg, ArgAction, Command};
use termcolor::{Color, ColorChoice, ColorSpec, StandardStream, WriteColor};

use strand::{
    lines, multisplit, split_delimiters, split_text_with_code, wrap_words, Keep, LinesOptions,
    Separators, SplitTextOptions, Strip,
};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let matches = Command::new("strand")
        .version(env!("CARGO_PKG_VERSION"))
        .about("Text splitting and re-flow utilities")
        .subcommand_required(true)
        .subcommand(
            Command::new("split")
                .about("Split input on one or more separators")
                .arg(
                    Arg::new("sep")
                        .long("sep")
                        .value_name("SEPARATOR")
                        .help("Separator string; repeatable. Defaults to whitespace")
                        .action(ArgAction::Append),
                )
                .arg(
                    Arg::new("keep")
                        .long("keep")
                        .help("Keep separators attached to the preceding piece")
                        .action(ArgAction::SetTrue),
                )
                .arg(
                    Arg::new("separate")
                        .long("separate")
                        .help("Treat adjacent separators individually")
                        .action(ArgAction::SetTrue),
                )
                .arg(
                    Arg::new("strip")
                        .long("strip")
                        .help("Strip leading and trailing separators first")
                        .action(ArgAction::SetTrue),
                )
                .arg(
                    Arg::new("json")
                        .long("json")
                        .help("Emit a JSON array")
                        .action(ArgAction::SetTrue),
                )
                .arg(Arg::new("file").help("Input file (stdin when absent)").index(1)),
        )
        .subcommand(
            Command::new("delimiters")
                .about("Walk nested (), [], {} and quoted sections")
                .arg(
                    Arg::new("json")
                        .long("json")
                        .help("Emit a JSON array of [body, open, close] triples")
                        .action(ArgAction::SetTrue),
                )
                .arg(Arg::new("file").help("Input file (stdin when absent)").index(1)),
        )
        .subcommand(
            Command::new("lines")
                .about("Number and filter lines")
                .arg(
                    Arg::new("strip")
                        .long("strip")
                        .help("Strip leading and trailing whitespace")
                        .action(ArgAction::SetTrue),
                )
                .arg(
                    Arg::new("number")
                        .long("number")
                        .help("Prefix each line with its line number")
                        .action(ArgAction::SetTrue),
                )
                .arg(
                    Arg::new("grep")
                        .long("grep")
                        .value_name("PATTERN")
                        .help("Only print lines matching the pattern"),
                )
                .arg(Arg::new("file").help("Input file (stdin when absent)").index(1)),
        )
        .subcommand(
            Command::new("wrap")
                .about("Re-flow paragraphs, preserving indented code blocks")
                .arg(
                    Arg::new("margin")
                        .long("margin")
                        .value_name("COLUMNS")
                        .help("Maximum line width (defaults to the terminal width, or 79)"),
                )
                .arg(
                    Arg::new("code-indent")
                        .long("code-indent")
                        .value_name("COLUMNS")
                        .help("Indent at which paragraphs count as code")
                        .default_value("4"),
                )
                .arg(Arg::new("file").help("Input file (stdin when absent)").index(1)),
        )
        .get_matches();

    match matches.subcommand() {
        Some(("split", sub)) => run_split(sub),
        Some(("delimiters", sub)) => run_delimiters(sub),
        Some(("lines", sub)) => run_lines(sub),
        Some(("wrap", sub)) => run_wrap(sub),
        _ => unreachable!("subcommand is required"),
    }
}

fn read_input(matches: &clap::ArgMatches) -> Result<String, Box<dyn std::error::Error>> {
    match matches.get_one::<String>("file") {
        Some(path) => Ok(fs::read_to_string(path)?),
        None => {
            let mut buffer = String::new();
            io::stdin().read_to_string(&mut buffer)?;
            Ok(buffer)
        }
    }
}

fn stdout_stream() -> StandardStream {
    let choice = if atty::is(atty::Stream::Stdout) {
        ColorChoice::Auto
    } else {
        ColorChoice::Never
    };
    StandardStream::stdout(choice)
}

fn run_split(matches: &clap::ArgMatches) -> Result<(), Box<dyn std::error::Error>> {
    let input = read_input(matches)?;
    let separators: Vec<String> = matches
        .get_many::<String>("sep")
        .map(|values| values.cloned().collect())
        .unwrap_or_default();

    let keep = if matches.get_flag("keep") {
        Keep::Attached
    } else {
        Keep::Discard
    };
    let strip = if matches.get_flag("strip") {
        Strip::Both
    } else {
        Strip::No
    };

    let refs: Vec<&str> = separators.iter().map(String::as_str).collect();
    let builder = if refs.is_empty() {
        multisplit(input.as_str(), Separators::<str>::whitespace())
    } else {
        multisplit(input.as_str(), refs.as_slice())
    };
    let pieces = builder
        .keep(keep)
        .separate(matches.get_flag("separate"))
        .strip(strip)
        .segments()?;

    if matches.get_flag("json") {
        println!("{}", serde_json::to_string_pretty(&pieces)?);
        return Ok(());
    }

    let mut out = stdout_stream();
    for piece in pieces {
        writeln!(out, "{piece}")?;
    }
    Ok(())
}

fn run_delimiters(matches: &clap::ArgMatches) -> Result<(), Box<dyn std::error::Error>> {
    let input = read_input(matches)?;
    let triples = split_delimiters(input.as_str()).triples()?;

    if matches.get_flag("json") {
        let rows: Vec<[&str; 3]> = triples
            .iter()
            .map(|(body, open, close)| [body.as_str(), open.as_str(), close.as_str()])
            .collect();
        println!("{}", serde_json::to_string_pretty(&rows)?);
        return Ok(());
    }

    let mut out = stdout_stream();
    let mut depth = 0usize;
    for (body, open, close) in triples {
        if !close.is_empty() {
            depth = depth.saturating_sub(1);
        }
        write!(out, "{}", "  ".repeat(depth))?;
        out.set_color(ColorSpec::new().set_fg(Some(Color::White)))?;
        write!(out, "{body:?}")?;
        out.reset()?;
        if !open.is_empty() {
            out.set_color(ColorSpec::new().set_fg(Some(Color::Green)).set_bold(true))?;
            write!(out, " {open}")?;
            out.reset()?;
            depth += 1;
        }
        if !close.is_empty() {
            out.set_color(ColorSpec::new().set_fg(Some(Color::Red)).set_bold(true))?;
            write!(out, " {close}")?;
            out.reset()?;
        }
        writeln!(out)?;
    }
    Ok(())
}

fn run_lines(matches: &clap::ArgMatches) -> Result<(), Box<dyn std::error::Error>> {
    let input = read_input(matches)?;
    let stream = lines(&input, LinesOptions::default())?;

    let stream: Box<dyn Iterator<Item = strand::LineResult>> = if matches.get_flag("strip") {
        Box::new(strand::lines_strip(stream, None))
    } else {
        Box::new(stream)
    };
    let stream: Box<dyn Iterator<Item = strand::LineResult>> =
        match matches.get_one::<String>("grep") {
            Some(pattern) => Box::new(strand::lines_grep(stream, pattern, false)?),
            None => stream,
        };

    let number = matches.get_flag("number");
    let mut out = stdout_stream();
    for item in stream {
        let (info, line) = item?;
        if number {
            out.set_color(ColorSpec::new().set_fg(Some(Color::Cyan)))?;
            write!(out, "{:>6}  ", info.line_number)?;
            out.reset()?;
        }
        writeln!(out, "{line}")?;
    }
    Ok(())
}

fn run_wrap(matches: &clap::ArgMatches) -> Result<(), Box<dyn std::error::Error>> {
    let input = read_input(matches)?;

    let margin = match matches.get_one::<String>("margin") {
        Some(raw) => raw.parse::<usize>()?,
        None => terminal_size::terminal_size()
            .map(|(width, _)| width.0 as usize)
            .unwrap_or(79),
    };
    let code_indent = matches
        .get_one::<String>("code-indent")
        .map(|raw| raw.parse::<usize>())
        .transpose()?
        .unwrap_or(4);

    let words = split_text_with_code(
        &input,
        SplitTextOptions {
            code_indent,
            ..SplitTextOptions::default()
        },
    );
    let wrapped = wrap_words(&words, margin, true)?;
    println!("{wrapped}");
    Ok(())
}
