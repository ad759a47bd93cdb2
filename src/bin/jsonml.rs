//! Command-line interface for jsonml
//! Converts between HTML, XML and JsonML text.
//!
//! Usage:
//!   jsonml [PATH] --from html|xml|jsonml --to jsonml|html|xml [--config FILE] [--pretty]
//!
//! PATH defaults to standard input when omitted or `-`.

use clap::{Arg, ArgAction, Command};
use jsonml::config::Loader;
use jsonml::{ConversionConfig, Converter, Dialect, MarkupNode};
use std::io::Read;
use tracing_subscriber::EnvFilter;

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let matches = Command::new("jsonml")
        .version(env!("CARGO_PKG_VERSION"))
        .about("Convert between HTML, XML and JsonML")
        .arg(
            Arg::new("path")
                .help("Input file, or '-' for standard input")
                .index(1),
        )
        .arg(
            Arg::new("from")
                .long("from")
                .short('f')
                .help("Input format")
                .value_parser(["html", "xml", "jsonml"])
                .default_value("html"),
        )
        .arg(
            Arg::new("to")
                .long("to")
                .short('t')
                .help("Output format")
                .value_parser(["jsonml", "html", "xml"])
                .default_value("jsonml"),
        )
        .arg(
            Arg::new("config")
                .long("config")
                .short('c')
                .help("TOML file layered over the default settings"),
        )
        .arg(
            Arg::new("pretty")
                .long("pretty")
                .help("Pretty-print JsonML output")
                .action(ArgAction::SetTrue),
        )
        .get_matches();

    let path = matches.get_one::<String>("path").map(String::as_str);
    let from = matches
        .get_one::<String>("from")
        .map(String::as_str)
        .unwrap_or("html");
    let to = matches
        .get_one::<String>("to")
        .map(String::as_str)
        .unwrap_or("jsonml");
    let config_path = matches.get_one::<String>("config");
    let pretty = matches.get_flag("pretty");

    let mut loader = Loader::new();
    if let Some(config_path) = config_path {
        loader = loader.with_file(config_path);
    }
    let settings = loader.build().unwrap_or_else(|e| {
        eprintln!("Error loading configuration: {}", e);
        std::process::exit(1);
    });
    let config = ConversionConfig::new(settings);

    let input = read_input(path).unwrap_or_else(|e| {
        eprintln!("Error reading input: {}", e);
        std::process::exit(1);
    });

    let output = match (from, to) {
        ("html" | "xml", "jsonml") => {
            let markup = read_markup(&input, dialect(from), &config);
            encode(markup.as_ref(), pretty)
        }
        ("html" | "xml", _) => {
            let markup = read_markup(&input, dialect(from), &config);
            markup
                .and_then(|markup| Converter::new(dialect(to), config).write_to_text(&markup, None))
                .unwrap_or_default()
        }
        ("jsonml", "html" | "xml") => {
            let markup = MarkupNode::from_json_str(&input).unwrap_or_else(|e| {
                eprintln!("Error decoding JsonML: {} ({})", e, e.detail());
                std::process::exit(1);
            });
            Converter::new(dialect(to), config)
                .write_to_text(&markup, None)
                .unwrap_or_default()
        }
        (from, to) => {
            eprintln!("Conversion from '{}' to '{}' is not supported", from, to);
            eprintln!("Supported: html|xml -> jsonml|html|xml, jsonml -> html|xml");
            std::process::exit(1);
        }
    };

    println!("{}", output);
}

fn dialect(format: &str) -> Dialect {
    match format {
        "xml" => Dialect::Xml,
        _ => Dialect::Html,
    }
}

fn read_input(path: Option<&str>) -> std::io::Result<String> {
    match path {
        None | Some("-") => {
            let mut buffer = String::new();
            std::io::stdin().read_to_string(&mut buffer)?;
            Ok(buffer)
        }
        Some(path) => std::fs::read_to_string(path),
    }
}

fn read_markup(input: &str, dialect: Dialect, config: &ConversionConfig) -> Option<MarkupNode> {
    Converter::new(dialect, config.clone()).read_text(input.trim(), None)
}

fn encode(markup: Option<&MarkupNode>, pretty: bool) -> String {
    let result = if pretty {
        serde_json::to_string_pretty(&markup)
    } else {
        serde_json::to_string(&markup)
    };
    result.unwrap_or_else(|e| {
        eprintln!("Error encoding JsonML: {}", e);
        std::process::exit(1);
    })
}
