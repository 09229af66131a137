//! The `layout` command: write the empty diagram frame.

use crate::settings::Settings;
use fontus_piper::PiperLayout;
use log::info;
use std::fs::File;
use std::io::BufWriter;

pub fn run_layout(output: &str, config: Option<&str>) -> anyhow::Result<()> {
    let settings = Settings::load(config)?;
    let layout = PiperLayout::validated(settings.gap)?;
    let frame = layout.frame();
    serde_json::to_writer_pretty(BufWriter::new(File::create(output)?), &frame)?;
    info!("Wrote diagram frame with {} grid lines to {}", frame.grid.len(), output);
    Ok(())
}
