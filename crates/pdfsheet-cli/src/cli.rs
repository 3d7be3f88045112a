use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};
use pdfsheet::pdfsheet_core::DetectOptions;

/// Convert tables in PDF documents into XLSX workbooks.
#[derive(Debug, Parser)]
#[command(name = "pdfsheet", about, version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

/// Available subcommands.
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Convert a PDF into an XLSX workbook, one sheet per detected table
    Convert {
        /// Path to the input PDF file
        #[arg(value_name = "INPUT.pdf")]
        input: PathBuf,

        /// Path to the output XLSX file
        #[arg(value_name = "OUTPUT.xlsx")]
        output: PathBuf,

        /// Page range (e.g. '1,3-5'). Default: all pages
        #[arg(long)]
        pages: Option<String>,

        /// Summary output format
        #[arg(long, value_enum, default_value_t = SummaryFormat::Text)]
        format: SummaryFormat,

        /// Horizontal tolerance for column alignment (default: 3.0)
        #[arg(long, default_value_t = 3.0)]
        x_tolerance: f64,

        /// Vertical tolerance for row grouping (default: 3.0)
        #[arg(long, default_value_t = 3.0)]
        y_tolerance: f64,

        /// Minimum separation between column boundaries (default: 12.0)
        #[arg(long, default_value_t = 12.0)]
        column_gap: f64,

        /// Minimum rows for a region to count as a table (default: 2)
        #[arg(long, default_value_t = 2)]
        min_rows: usize,

        /// Minimum columns for a region to count as a table (default: 2)
        #[arg(long, default_value_t = 2)]
        min_columns: usize,
    },

    /// Preview detected and cleaned tables without writing a workbook
    Tables {
        /// Path to the input PDF file
        #[arg(value_name = "INPUT.pdf")]
        input: PathBuf,

        /// Page range (e.g. '1,3-5'). Default: all pages
        #[arg(long)]
        pages: Option<String>,

        /// Output format
        #[arg(long, value_enum, default_value_t = TableFormat::Grid)]
        format: TableFormat,

        /// Horizontal tolerance for column alignment (default: 3.0)
        #[arg(long, default_value_t = 3.0)]
        x_tolerance: f64,

        /// Vertical tolerance for row grouping (default: 3.0)
        #[arg(long, default_value_t = 3.0)]
        y_tolerance: f64,

        /// Minimum separation between column boundaries (default: 12.0)
        #[arg(long, default_value_t = 12.0)]
        column_gap: f64,

        /// Minimum rows for a region to count as a table (default: 2)
        #[arg(long, default_value_t = 2)]
        min_rows: usize,

        /// Minimum columns for a region to count as a table (default: 2)
        #[arg(long, default_value_t = 2)]
        min_columns: usize,
    },
}

/// Output format for the conversion summary.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum SummaryFormat {
    /// Human-readable summary
    Text,
    /// JSON summary
    Json,
}

/// Output format for table previews.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum TableFormat {
    /// Aligned grid with | separators
    Grid,
    /// Comma-separated values, one blank line between tables
    Csv,
    /// JSON array of tables
    Json,
}

/// Fold the tolerance flags into detection options.
pub fn detect_options(
    x_tolerance: f64,
    y_tolerance: f64,
    column_gap: f64,
    min_rows: usize,
    min_columns: usize,
) -> DetectOptions {
    DetectOptions {
        x_tolerance,
        y_tolerance,
        column_gap,
        min_rows,
        min_columns,
        ..DetectOptions::default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_convert_defaults() {
        let cli = Cli::parse_from(["pdfsheet", "convert", "in.pdf", "out.xlsx"]);
        match cli.command {
            Commands::Convert {
                input,
                output,
                pages,
                format,
                x_tolerance,
                min_rows,
                ..
            } => {
                assert_eq!(input, PathBuf::from("in.pdf"));
                assert_eq!(output, PathBuf::from("out.xlsx"));
                assert_eq!(pages, None);
                assert_eq!(format, SummaryFormat::Text);
                assert_eq!(x_tolerance, 3.0);
                assert_eq!(min_rows, 2);
            }
            other => panic!("expected Convert, got {other:?}"),
        }
    }

    #[test]
    fn parse_convert_with_flags() {
        let cli = Cli::parse_from([
            "pdfsheet", "convert", "in.pdf", "out.xlsx", "--pages", "1,3-5", "--format", "json",
            "--column-gap", "20",
        ]);
        match cli.command {
            Commands::Convert {
                pages,
                format,
                column_gap,
                ..
            } => {
                assert_eq!(pages.as_deref(), Some("1,3-5"));
                assert_eq!(format, SummaryFormat::Json);
                assert_eq!(column_gap, 20.0);
            }
            other => panic!("expected Convert, got {other:?}"),
        }
    }

    #[test]
    fn parse_tables_formats() {
        for (arg, expected) in [
            ("grid", TableFormat::Grid),
            ("csv", TableFormat::Csv),
            ("json", TableFormat::Json),
        ] {
            let cli = Cli::parse_from(["pdfsheet", "tables", "in.pdf", "--format", arg]);
            match cli.command {
                Commands::Tables { format, .. } => assert_eq!(format, expected),
                other => panic!("expected Tables, got {other:?}"),
            }
        }
    }

    #[test]
    fn missing_output_is_a_parse_error() {
        assert!(Cli::try_parse_from(["pdfsheet", "convert", "in.pdf"]).is_err());
    }

    #[test]
    fn detect_options_carry_flag_values() {
        let opts = detect_options(1.0, 2.0, 15.0, 3, 4);
        assert_eq!(opts.x_tolerance, 1.0);
        assert_eq!(opts.y_tolerance, 2.0);
        assert_eq!(opts.column_gap, 15.0);
        assert_eq!(opts.min_rows, 3);
        assert_eq!(opts.min_columns, 4);
        // row_gap_factor keeps its default
        assert_eq!(opts.row_gap_factor, 2.5);
    }
}
