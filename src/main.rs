use clap::{Parser, Subcommand};
use freedict_editor::sanity::{self, SanityCheck};
use freedict_editor::values::{Typology, display_label};
use freedict_editor::{Document, EditorConfig, EditorError, XPathSession};
use std::path::PathBuf;
use std::process::ExitCode;

/// Checks FreeDict TEI dictionaries and prints their value tables.
#[derive(Parser, Debug)]
#[command(version, about)]
struct Cli {
    /// JSON configuration file
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Run the sanity checks and validate typology codes
    Check {
        dictionary: PathBuf,

        /// Extra check as an XPath expression selecting offending nodes
        #[arg(short = 'x', long = "xpath")]
        extra: Vec<String>,

        /// Skip validating pos, gen, usg and xr codes
        #[arg(long, default_value_t = false)]
        no_values: bool,
    },
    /// Print the headwords of every entry matched by an expression
    Headwords {
        dictionary: PathBuf,

        #[arg(short = 'x', long = "xpath", default_value = "//entry")]
        xpath: String,
    },
    /// Print value tables as label<TAB>code lines
    Values {
        /// One of pos, gen, num, domain, register, xr; all when omitted
        typology: Option<Typology>,

        /// Show labels without their mnemonic marker
        #[arg(long, default_value_t = false)]
        plain: bool,
    },
}

fn run(cli: Cli) -> Result<bool, EditorError> {
    let config = match &cli.config {
        Some(path) => EditorConfig::load(path)?,
        None => EditorConfig::default(),
    };
    let session = XPathSession::from_config(&config)?;

    match cli.command {
        Command::Check {
            dictionary,
            extra,
            no_values,
        } => {
            let doc = Document::load(&dictionary)?;
            let mut checks = config.checks();
            checks.extend(
                extra
                    .iter()
                    .enumerate()
                    .map(|(i, xpath)| SanityCheck::new(&format!("Custom check {}", i + 1), xpath)),
            );
            let mut clean = true;
            for report in sanity::run_checks(&session, &doc, &checks, config.headword_length)? {
                println!("{}: {} offender(s)", report.check, report.offenders.len());
                for offender in &report.offenders {
                    let headword = offender.headword.as_deref().unwrap_or("<no headword>");
                    println!("  {}", headword);
                }
                clean &= report.passed();
            }
            if !no_values {
                let tables = config.value_tables()?;
                let violations = sanity::check_values(&session, &doc, &tables)?;
                println!("Unknown typology codes: {}", violations.len());
                for v in &violations {
                    println!("  {}: '{}'", v.typology, v.value);
                }
                clean &= violations.is_empty();
            }
            Ok(clean)
        }
        Command::Headwords { dictionary, xpath } => {
            let doc = Document::load(&dictionary)?;
            for entry in session.find_node_set(&doc, &xpath)? {
                match session.entry_orths_to_string(&doc, entry, config.headword_length) {
                    Ok(headword) => println!("{}", headword),
                    Err(EditorError::NoOrthNodes(_)) => log::warn!("Entry {:?} has no form/orth", entry),
                    Err(e) => return Err(e),
                }
            }
            Ok(true)
        }
        Command::Values { typology, plain } => {
            let tables = config.value_tables()?;
            let selected: Vec<Typology> = match typology {
                Some(t) => vec![t],
                None => Typology::ALL.to_vec(),
            };
            for t in selected {
                println!("# {}", t);
                for value in tables.get(t) {
                    let label = if plain {
                        display_label(&value.label)
                    } else {
                        value.label.to_string()
                    };
                    println!("{}\t{}", label, value.value);
                }
            }
            Ok(true)
        }
    }
}

fn main() -> ExitCode {
    env_logger::init();
    match run(Cli::parse()) {
        Ok(true) => ExitCode::SUCCESS,
        Ok(false) => ExitCode::from(1),
        Err(e) => {
            eprintln!("Error: {}", e);
            ExitCode::from(2)
        }
    }
}
