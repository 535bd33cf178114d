//! sheetxml CLI - spreadsheet to XML conversion tool

use anyhow::{Context, Result};
use clap::{ArgAction, Parser, Subcommand};
use sheetxml::prelude::*;
use sheetxml::{read_document, write_document};
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "sheetxml")]
#[command(
    author,
    version,
    about = "Convert spreadsheets to diffable XML and back"
)]
struct Cli {
    /// More log output (-v info, -vv debug, -vvv trace); RUST_LOG overrides
    #[arg(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Convert a spreadsheet (xlsx, xlsm, xls) to XML
    #[command(alias = "xml")]
    ToXml {
        /// Input spreadsheet file
        input: PathBuf,

        /// Output XML file (default: stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Spaces per indentation level; 0 writes a single line
        #[arg(long, default_value = "4")]
        indent: usize,
    },

    /// Convert an XML file back to an xlsx workbook
    #[command(alias = "excel")]
    ToExcel {
        /// Input XML file
        input: PathBuf,

        /// Output xlsx file
        #[arg(short, long)]
        output: PathBuf,
    },

    /// Show the sheets and row counts of a spreadsheet or XML file
    Info {
        /// Input file
        input: PathBuf,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    match cli.command {
        Commands::ToXml {
            input,
            output,
            indent,
        } => to_xml(&input, output.as_deref(), indent),
        Commands::ToExcel { input, output } => to_excel(&input, &output),
        Commands::Info { input } => show_info(&input),
    }
}

fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level)))
        .with_writer(io::stderr)
        .init();
}

fn write_options(indent: usize) -> XmlWriteOptions {
    XmlWriteOptions {
        indent_size: indent,
        ..XmlWriteOptions::default()
    }
}

fn to_xml(input: &Path, output: Option<&Path>, indent: usize) -> Result<()> {
    let workbook =
        open_workbook(input).with_context(|| format!("Failed to open '{}'", input.display()))?;
    tracing::info!(sheets = workbook.sheet_count(), "read {}", input.display());

    let document = to_tree(&workbook);
    let options = write_options(indent);

    if let Some(output_path) = output {
        write_document(&document, output_path, &options)
            .with_context(|| format!("Failed to write '{}'", output_path.display()))?;
        eprintln!(
            "Wrote {} sheets to '{}'",
            workbook.sheet_count(),
            output_path.display()
        );
    } else {
        let mut stdout = io::stdout().lock();
        XmlWriter::write(&document, &mut stdout, &options).context("Failed to write to stdout")?;
        stdout.flush().context("Failed to write to stdout")?;
    }

    Ok(())
}

fn to_excel(input: &Path, output: &Path) -> Result<()> {
    xml_to_excel(input, output).with_context(|| {
        format!(
            "Failed to convert '{}' to '{}'",
            input.display(),
            output.display()
        )
    })?;
    eprintln!("Wrote '{}'", output.display());
    Ok(())
}

/// Open either side of the conversion as a workbook
fn load_any(input: &Path) -> Result<Workbook> {
    let is_xml = input
        .extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| e.eq_ignore_ascii_case("xml"));

    let workbook = if is_xml {
        let document = read_document(input)?;
        to_workbook(&document)?
    } else {
        open_workbook(input)?
    };
    Ok(workbook)
}

fn show_info(input: &Path) -> Result<()> {
    let workbook =
        load_any(input).with_context(|| format!("Failed to open '{}'", input.display()))?;

    println!("File: {}", input.display());
    println!("Sheets: {}", workbook.sheet_count());

    for (i, sheet) in workbook.worksheets().enumerate() {
        println!();
        println!("  Sheet {}: \"{}\"", i, sheet.name());
        println!("    Rows: {} (extent {})", sheet.row_count(), sheet.row_end());
        println!("    Cells: {}", sheet.cell_count());
    }

    Ok(())
}
