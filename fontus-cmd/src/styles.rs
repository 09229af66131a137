//! The `styles` command: print the series style table.

use crate::input::read_samples;
use crate::settings::Settings;
use fontus_chem::Sample;
use fontus_style::{distinct_values, StyleReport, Styler};
use log::warn;
use std::io::Write;

/// Style every distinct value of `field` across the samples.
pub fn style_samples(samples: &[Sample], field: &str, styler: &Styler) -> anyhow::Result<StyleReport> {
    let values = distinct_values(samples.iter().filter_map(|s| s.group(field)));
    if values.is_empty() {
        warn!("No sample has a value for {:?}", field);
    }
    Ok(styler.assign(&values)?)
}

/// Write the style table as CSV: `group_value,color,marker,in_legend`.
pub fn write_style_table<W: Write>(writer: W, report: &StyleReport, max_legend_items: usize) -> anyhow::Result<()> {
    let mut wtr = csv::Writer::from_writer(writer);
    wtr.write_record(["group_value", "color", "marker", "in_legend"])?;
    for (i, assignment) in report.assignments.iter().enumerate() {
        let in_legend = if i < max_legend_items { "true" } else { "false" };
        wtr.write_record([
            assignment.group_value.as_str(),
            assignment.color.as_str(),
            assignment.marker.as_str(),
            in_legend,
        ])?;
    }
    wtr.flush()?;
    Ok(())
}

/// Run the `styles` command. `field` overrides the configured legend field.
pub fn run_styles(samples_csv: &str, config: Option<&str>, field: Option<&str>) -> anyhow::Result<()> {
    let settings = Settings::load(config)?;
    let styler = settings.styler()?;
    let stdout = std::io::stdout();

    let Some(field) = field.or(settings.legend_field.as_deref()) else {
        let (color, marker) = styler.single_series()?;
        writeln!(stdout.lock(), "no legend field set; all samples use {} {}", color, marker)?;
        return Ok(());
    };

    let samples = read_samples(samples_csv, &settings)?;
    let report = style_samples(&samples, field, &styler)?;
    write_style_table(stdout.lock(), &report, styler.max_legend_items)?;
    if let Some(overflow) = report.overflow {
        warn!("{}", overflow);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use fontus_style::StyleConfig;

    #[test]
    fn test_style_table() {
        let samples = vec![
            Sample::new("1").with_group("aquifer", "deep"),
            Sample::new("2").with_group("aquifer", "shallow"),
            Sample::new("3"),
            Sample::new("4").with_group("aquifer", "deep"),
        ];
        let styler = StyleConfig {
            max_legend_items: 1,
            ..StyleConfig::default()
        }
        .build()
        .unwrap();
        let report = style_samples(&samples, "aquifer", &styler).unwrap();
        assert_eq!(report.assignments.len(), 2);
        assert_eq!(style_samples(&samples, "Aquifer", &styler).unwrap(), report);

        let mut buf = Vec::new();
        write_style_table(&mut buf, &report, styler.max_legend_items).unwrap();
        let text = String::from_utf8(buf).unwrap();
        assert_eq!(
            text,
            "group_value,color,marker,in_legend\ndeep,#1f77b4,circle,true\nshallow,#1f77b4,square,false\n"
        );
    }
}
