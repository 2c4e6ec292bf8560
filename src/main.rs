use std::fs;
use std::path::PathBuf;
use std::process;

use clap::Parser;
use mdplist_reader::{to_json_string, MdplistReader, ParseOptions, StridePolicy};

/// Convert an mdplist file to json
#[derive(Debug, Parser)]
#[command(name = "mdplist", version)]
struct Args {
    /// Path to the file to process
    filename: PathBuf,

    /// Fail on container footers that do not divide into whole records
    #[arg(long)]
    strict: bool,

    /// Indent the JSON output
    #[arg(long)]
    pretty: bool,

    /// Where to write the JSON (defaults to the input path with a .json extension)
    #[arg(short, long)]
    output: Option<PathBuf>,
}

fn main() {
    let args = Args::parse();
    let input = &args.filename;

    if !input.exists() {
        eprintln!("Error: File '{}' not found.", input.display());
        process::exit(1);
    }

    let options = ParseOptions {
        stride_policy: if args.strict {
            StridePolicy::Strict
        } else {
            StridePolicy::Lenient
        },
        ..ParseOptions::default()
    };

    let document = match MdplistReader::open(input, options).and_then(|reader| reader.parse()) {
        Ok(document) => document,
        Err(e) => {
            eprintln!("Error processing file: {}", e);
            process::exit(1);
        }
    };

    for diagnostic in &document.diagnostics {
        eprintln!("Warning: {}", diagnostic);
    }

    let output = args
        .output
        .unwrap_or_else(|| input.with_extension("json"));

    let written = to_json_string(&document.root, args.pretty)
        .map_err(|e| e.to_string())
        .and_then(|json| fs::write(&output, json).map_err(|e| e.to_string()));
    match written {
        Ok(()) => println!("Processed data written to: {}", output.display()),
        Err(e) => {
            eprintln!("Error writing to file: {}", e);
            process::exit(1);
        }
    }
}
