//! Command-line front end.
//!
//! Thin wrapper over the library: parse a document, optionally validate it
//! against a rules file, print the issues. Parse failures and fatal rule
//! errors render through miette's fancy reporter.

use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;

use crate::syntax::parse_file;
use crate::unparse::unparse;
use crate::validate::process;

#[derive(Debug, Parser)]
#[command(
    name = "denada",
    version,
    about = "Parse and validate denada documents."
)]
pub struct DenadaArgs {
    /// The denada document to parse.
    pub file: PathBuf,

    /// Validate the document against this rules file.
    #[arg(long)]
    pub rules: Option<PathBuf>,

    /// Print the canonical form of the parsed document.
    #[arg(long)]
    pub unparse: bool,
}

/// Run the CLI. Returns a failure exit code when validation found issues.
pub fn run(args: DenadaArgs) -> miette::Result<ExitCode> {
    let tree = parse_file(&args.file)?;

    if args.unparse {
        print!("{}", unparse(&tree));
    }

    if let Some(rules_path) = &args.rules {
        let rules = parse_file(rules_path)?;
        let validation = process(&tree, &rules)?;
        for issue in &validation.issues {
            println!("{issue}");
        }
        if !validation.is_conformant() {
            eprintln!(
                "{}: {} issue(s) found",
                args.file.display(),
                validation.issues.len()
            );
            return Ok(ExitCode::FAILURE);
        }
    }

    Ok(ExitCode::SUCCESS)
}
