//! The `piper` command: project samples and write plot-ready points.

use crate::input::read_samples;
use crate::settings::Settings;
use fontus_piper::{DiagramFrame, Exclusion, PiperBatch, PiperPipeline, ProjectedPoint, SampleProjection};
use fontus_style::{MarkerKind, StyleAssignment, StyleReport, Styler};
use fontus_utils::numeric::round_to;
use log::{info, warn};
use serde::Serialize;
use std::collections::BTreeSet;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

/// Decimal places kept for coordinates and percentages in output files.
const OUTPUT_DIGITS: u32 = 4;

/// Leading columns of the points CSV.
const POINT_COLUMNS: [&str; 7] = ["sample_id", "role", "x", "y", "ion_balance_pct", "color", "marker"];

/// Column holding the plot group value when plots are split.
const PLOT_GROUP_COLUMN: &str = "plot_group";

/// Series style of every projected sample.
#[derive(Debug, Clone)]
pub enum SeriesStyles {
    /// No legend field: one shared style
    Single { color: String, marker: MarkerKind },
    /// One style per value of the legend field
    ByField {
        field: String,
        report: StyleReport,
        max_legend_items: usize,
    },
}

impl SeriesStyles {
    pub fn new(batch: &PiperBatch, legend_field: Option<&str>, styler: &Styler) -> anyhow::Result<SeriesStyles> {
        match legend_field {
            None => {
                let (color, marker) = styler.single_series()?;
                Ok(SeriesStyles::Single { color, marker })
            }
            Some(field) => {
                let values = batch.distinct_values(field);
                let report = styler.assign(&values)?;
                info!("Assigned {} series styles for {:?}", report.assignments.len(), field);
                Ok(SeriesStyles::ByField {
                    field: field.to_string(),
                    report,
                    max_legend_items: styler.max_legend_items,
                })
            }
        }
    }

    /// Color and marker of a projected sample; `None` when the sample has no
    /// value for the legend field.
    pub fn style_of(&self, projection: &SampleProjection) -> Option<(&str, MarkerKind)> {
        match self {
            SeriesStyles::Single { color, marker } => Some((color.as_str(), *marker)),
            SeriesStyles::ByField { field, report, .. } => projection
                .group(field)
                .and_then(|value| report.get(value))
                .map(|a| (a.color.as_str(), a.marker)),
        }
    }

    /// Legend entries under the legend cap.
    pub fn legend(&self) -> Vec<StyleAssignment> {
        match self {
            SeriesStyles::Single { .. } => Vec::new(),
            SeriesStyles::ByField {
                report,
                max_legend_items,
                ..
            } => report.legend(*max_legend_items).items.to_vec(),
        }
    }
}

/// Projections grouped into plots. Without a `group_plot_by` field the whole
/// batch is one plot.
pub fn plot_groups(batch: &PiperBatch, group_plot_by: Option<&str>) -> Vec<(Option<String>, Vec<SampleProjection>)> {
    match group_plot_by {
        None => vec![(None, batch.projections.clone())],
        Some(field) => {
            let partition = batch.partition_by(field);
            partition
                .groups
                .into_iter()
                .map(|group| (Some(group.value), group.projections))
                .collect()
        }
    }
}

/// Write one CSV row per projected point.
///
/// Columns: `sample_id,role,x,y,ion_balance_pct,color,marker`, then
/// `plot_group` when plots are split, then every group field of the batch.
/// Group fields named like one of the leading columns are left out.
pub fn write_points_csv<W: Write>(
    writer: W,
    plots: &[(Option<String>, Vec<SampleProjection>)],
    styles: &SeriesStyles,
) -> anyhow::Result<()> {
    let split = plots.iter().any(|(group, _)| group.is_some());
    let mut fields: BTreeSet<&str> = plots
        .iter()
        .flat_map(|(_, projections)| projections.iter())
        .flat_map(|p| p.groups.keys().map(String::as_str))
        .collect();
    fields.retain(|field| {
        let reserved = POINT_COLUMNS.contains(field) || (split && *field == PLOT_GROUP_COLUMN);
        if reserved {
            warn!("Group field {:?} clashes with a points column and is not written", field);
        }
        !reserved
    });

    let mut wtr = csv::Writer::from_writer(writer);
    let mut header = POINT_COLUMNS.to_vec();
    if split {
        header.push(PLOT_GROUP_COLUMN);
    }
    header.extend(fields.iter());
    wtr.write_record(&header)?;

    for (group, projections) in plots {
        for projection in projections {
            let (color, marker) = match styles.style_of(projection) {
                Some((color, marker)) => (color.to_string(), marker.to_string()),
                None => (String::new(), String::new()),
            };
            let balance = round_to(projection.ion_balance_pct, OUTPUT_DIGITS).to_string();
            for point in projection.points() {
                let mut record = vec![
                    point.sample_id.clone(),
                    point.role.to_string(),
                    round_to(point.x, OUTPUT_DIGITS).to_string(),
                    round_to(point.y, OUTPUT_DIGITS).to_string(),
                    balance.clone(),
                    color.clone(),
                    marker.clone(),
                ];
                if split {
                    record.push(group.clone().unwrap_or_default());
                }
                for field in &fields {
                    record.push(point.groups.get(*field).cloned().unwrap_or_default());
                }
                wtr.write_record(&record)?;
            }
        }
    }
    wtr.flush()?;
    Ok(())
}

#[derive(Debug, Serialize)]
struct ExclusionRow<'a> {
    sample_id: &'a str,
    reason: String,
}

/// Write the excluded samples with the reason for each.
pub fn write_exclusions_csv<W: Write>(writer: W, exclusions: &[Exclusion]) -> anyhow::Result<()> {
    let mut wtr = csv::Writer::from_writer(writer);
    for exclusion in exclusions {
        wtr.serialize(ExclusionRow {
            sample_id: &exclusion.sample_id,
            reason: exclusion.reason.to_string(),
        })?;
    }
    wtr.flush()?;
    Ok(())
}

#[derive(Debug, Serialize)]
struct PlotJson {
    group: Option<String>,
    points: Vec<ProjectedPoint>,
}

#[derive(Debug, Serialize)]
struct PiperJson<'a> {
    frame: DiagramFrame,
    plots: Vec<PlotJson>,
    legend: Vec<StyleAssignment>,
    exclusions: Vec<ExclusionRow<'a>>,
}

/// Write the whole result, frame geometry included, as one JSON document.
pub fn write_piper_json<W: Write>(
    writer: W,
    frame: DiagramFrame,
    plots: &[(Option<String>, Vec<SampleProjection>)],
    styles: &SeriesStyles,
    exclusions: &[Exclusion],
) -> anyhow::Result<()> {
    let document = PiperJson {
        frame,
        plots: plots
            .iter()
            .map(|(group, projections)| PlotJson {
                group: group.clone(),
                points: projections.iter().flat_map(|p| p.points()).collect(),
            })
            .collect(),
        legend: styles.legend(),
        exclusions: exclusions
            .iter()
            .map(|e| ExclusionRow {
                sample_id: &e.sample_id,
                reason: e.reason.to_string(),
            })
            .collect(),
    };
    serde_json::to_writer_pretty(writer, &document)?;
    Ok(())
}

/// Run the `piper` command.
pub fn run_piper(
    samples_csv: &str,
    output: &str,
    config: Option<&str>,
    exclusions_csv: Option<&str>,
    json: bool,
) -> anyhow::Result<()> {
    let settings = Settings::load(config)?;
    let registry = settings.registry(config.and_then(|c| Path::new(c).parent()))?;
    let pipeline = PiperPipeline::new(&registry, settings.piper_options())?;
    let styler = settings.styler()?;

    let samples = read_samples(samples_csv, &settings)?;
    let batch = pipeline.project_batch(&samples);
    let styles = SeriesStyles::new(&batch, settings.legend_field.as_deref(), &styler)?;
    let plots = plot_groups(&batch, settings.group_plot_by.as_deref());

    let out = BufWriter::new(File::create(output)?);
    if json {
        write_piper_json(out, pipeline.layout().frame(), &plots, &styles, &batch.exclusions)?;
    } else {
        write_points_csv(out, &plots, &styles)?;
    }

    match exclusions_csv {
        Some(path) => {
            write_exclusions_csv(BufWriter::new(File::create(path)?), &batch.exclusions)?;
            info!("Wrote {} exclusions to {}", batch.exclusions.len(), path);
        }
        None if !batch.exclusions.is_empty() => {
            warn!(
                "{} samples were excluded; pass --exclusions-csv to keep the report",
                batch.exclusions.len()
            );
        }
        None => {}
    }

    info!(
        "Piper complete: {} samples in {} plot(s). Output: {}",
        batch.projections.len(),
        plots.len(),
        output
    );
    Ok(())
}
