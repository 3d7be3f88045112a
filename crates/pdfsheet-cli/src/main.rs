mod cli;
mod convert_cmd;
mod page_range;
mod shared;
mod tables_cmd;

use clap::Parser;
use cli::Cli;

fn main() {
    env_logger::init();

    let cli = Cli::parse();

    let result = match cli.command {
        cli::Commands::Convert {
            ref input,
            ref output,
            ref pages,
            ref format,
            x_tolerance,
            y_tolerance,
            column_gap,
            min_rows,
            min_columns,
        } => convert_cmd::run(
            input,
            output,
            pages.as_deref(),
            format,
            &cli::detect_options(x_tolerance, y_tolerance, column_gap, min_rows, min_columns),
        ),
        cli::Commands::Tables {
            ref input,
            ref pages,
            ref format,
            x_tolerance,
            y_tolerance,
            column_gap,
            min_rows,
            min_columns,
        } => tables_cmd::run(
            input,
            pages.as_deref(),
            format,
            &cli::detect_options(x_tolerance, y_tolerance, column_gap, min_rows, min_columns),
        ),
    };

    if let Err(code) = result {
        std::process::exit(code);
    }
}
