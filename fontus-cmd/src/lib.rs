//! Command implementations for the Fontus CLI.
//!
//! Provides subcommands for projecting water samples onto a Piper diagram,
//! listing series styles, computing irrigation indices and exporting the
//! diagram frame.

use clap::Subcommand;

pub mod input;
pub mod irrigation;
pub mod layout;
pub mod piper;
pub mod settings;
pub mod styles;

#[derive(Subcommand)]
pub enum Command {
    /// Project samples onto the Piper diagram
    Piper {
        /// Input samples CSV, one row per sample
        #[arg(short = 's', long)]
        samples_csv: String,

        /// Output path for the projected points
        #[arg(short = 'o', long)]
        output: String,

        /// Settings JSON file
        #[arg(short = 'c', long)]
        config: Option<String>,

        /// Output path for the excluded samples and their reasons
        #[arg(short = 'e', long)]
        exclusions_csv: Option<String>,

        /// Write one JSON document (frame, points, legend) instead of CSV
        #[arg(long)]
        json: bool,
    },

    /// Print the color and marker assigned to each group value
    Styles {
        /// Input samples CSV
        #[arg(short = 's', long)]
        samples_csv: String,

        /// Settings JSON file
        #[arg(short = 'c', long)]
        config: Option<String>,

        /// Group field to style (defaults to the configured legend field)
        #[arg(short = 'f', long)]
        field: Option<String>,
    },

    /// Compute SAR and RSC irrigation indices
    Irrigation {
        /// Input samples CSV
        #[arg(short = 's', long)]
        samples_csv: String,

        /// Output path for the indices CSV
        #[arg(short = 'o', long)]
        output: String,

        /// Settings JSON file
        #[arg(short = 'c', long)]
        config: Option<String>,
    },

    /// Write the diagram frame (outlines, grid, extent) as JSON
    Layout {
        /// Output path for the frame JSON
        #[arg(short = 'o', long)]
        output: String,

        /// Settings JSON file
        #[arg(short = 'c', long)]
        config: Option<String>,
    },
}

pub fn run(command: Command) -> anyhow::Result<()> {
    match command {
        Command::Piper {
            samples_csv,
            output,
            config,
            exclusions_csv,
            json,
        } => piper::run_piper(
            &samples_csv,
            &output,
            config.as_deref(),
            exclusions_csv.as_deref(),
            json,
        ),
        Command::Styles {
            samples_csv,
            config,
            field,
        } => styles::run_styles(&samples_csv, config.as_deref(), field.as_deref()),
        Command::Irrigation {
            samples_csv,
            output,
            config,
        } => irrigation::run_irrigation(&samples_csv, &output, config.as_deref()),
        Command::Layout { output, config } => layout::run_layout(&output, config.as_deref()),
    }
}
