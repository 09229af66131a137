//! Per-sample projection pipeline and batch assembly.
//!
//! Each sample flows through meq conversion, normalisation, the two ternary
//! projections and the diamond projection independently of every other
//! sample. A batch run keeps going past bad samples and reports them next to
//! the projected ones.

use crate::composition::{normalize, AnionEquivalents, CationEquivalents, GroupComposition};
use crate::diamond::project_diamond;
use crate::error::{BatchError, SampleError};
use crate::layout::{PiperLayout, DEFAULT_GAP};
use crate::ternary::{project_ternary, Point};
use chrono::NaiveDate;
use fontus_chem::{field_key, AlkalinityUnit, CarbonateBasis, IonKey, IonRegistry, IonSpec, Sample};
use log::{info, warn};
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// Dataset-level settings of the geometry engine.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PiperOptions {
    pub carbonate_basis: CarbonateBasis,
    pub alkalinity_unit: AlkalinityUnit,
    /// Horizontal gap between the cation and anion triangles
    pub gap: f64,
}

impl Default for PiperOptions {
    fn default() -> Self {
        PiperOptions {
            carbonate_basis: CarbonateBasis::default(),
            alkalinity_unit: AlkalinityUnit::default(),
            gap: DEFAULT_GAP,
        }
    }
}

/// Which of the three diagram regions a point belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum PointRole {
    CationPoint,
    AnionPoint,
    ProjectedPoint,
}

impl fmt::Display for PointRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PointRole::CationPoint => write!(f, "cation-point"),
            PointRole::AnionPoint => write!(f, "anion-point"),
            PointRole::ProjectedPoint => write!(f, "projected-point"),
        }
    }
}

/// One plot-ready marker.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProjectedPoint {
    pub sample_id: String,
    pub role: PointRole,
    pub x: f64,
    pub y: f64,
    pub groups: BTreeMap<String, String>,
}

/// Everything the engine derives for one eligible sample.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SampleProjection {
    pub sample_id: String,
    pub groups: BTreeMap<String, String>,
    pub date: Option<NaiveDate>,
    pub cations: GroupComposition,
    pub anions: GroupComposition,
    pub ion_balance_pct: f64,
    pub cation_point: Point,
    pub anion_point: Point,
    pub diamond_point: Point,
}

impl SampleProjection {
    /// The cation, anion and diamond markers of this sample.
    pub fn points(&self) -> [ProjectedPoint; 3] {
        let point = |role: PointRole, p: Point| ProjectedPoint {
            sample_id: self.sample_id.clone(),
            role,
            x: p.x,
            y: p.y,
            groups: self.groups.clone(),
        };
        [
            point(PointRole::CationPoint, self.cation_point),
            point(PointRole::AnionPoint, self.anion_point),
            point(PointRole::ProjectedPoint, self.diamond_point),
        ]
    }

    pub fn group(&self, field: &str) -> Option<&str> {
        self.groups.get(&field_key(field)).map(String::as_str)
    }
}

/// A sample left out of the diagram, and why.
#[derive(Debug, Clone, PartialEq)]
pub struct Exclusion {
    pub sample_id: String,
    pub reason: SampleError,
}

/// How the carbonate end member is read from a sample.
#[derive(Debug, Clone, Copy, PartialEq)]
enum CarbonateSource {
    Hco3Co3 { hco3: IonSpec, co3: IonSpec },
    AlkalinityMass(IonSpec),
    AlkalinityMeq,
}

/// Registry entries resolved once per batch.
#[derive(Debug, Clone, Copy, PartialEq)]
struct ResolvedIons {
    ca: IonSpec,
    mg: IonSpec,
    na: IonSpec,
    k: IonSpec,
    cl: IonSpec,
    so4: IonSpec,
    carbonate: CarbonateSource,
}

impl ResolvedIons {
    fn resolve(registry: &IonRegistry, options: &PiperOptions) -> Result<Self, BatchError> {
        let carbonate = match (options.carbonate_basis, options.alkalinity_unit) {
            (CarbonateBasis::Hco3Co3, _) => CarbonateSource::Hco3Co3 {
                hco3: *registry.get(IonKey::Hco3)?,
                co3: *registry.get(IonKey::Co3)?,
            },
            (CarbonateBasis::Alkalinity, AlkalinityUnit::MgPerLCaCO3) => {
                CarbonateSource::AlkalinityMass(*registry.get(IonKey::Alk)?)
            }
            (CarbonateBasis::Alkalinity, AlkalinityUnit::MeqPerL) => CarbonateSource::AlkalinityMeq,
        };
        Ok(ResolvedIons {
            ca: *registry.get(IonKey::Ca)?,
            mg: *registry.get(IonKey::Mg)?,
            na: *registry.get(IonKey::Na)?,
            k: *registry.get(IonKey::K)?,
            cl: *registry.get(IonKey::Cl)?,
            so4: *registry.get(IonKey::So4)?,
            carbonate,
        })
    }
}

fn checked(ion: IonKey, value: f64) -> Result<f64, SampleError> {
    if value.is_finite() && value >= 0.0 {
        Ok(value)
    } else {
        Err(SampleError::InvalidConcentration { ion, value })
    }
}

fn required_meq(sample: &Sample, spec: &IonSpec) -> Result<f64, SampleError> {
    let mass = sample
        .concentration(spec.key)
        .ok_or(SampleError::MissingIon(spec.key))?;
    optional_meq(mass, spec)
}

fn optional_meq(mass: f64, spec: &IonSpec) -> Result<f64, SampleError> {
    spec.to_meq(mass).map_err(|_| SampleError::InvalidConcentration {
        ion: spec.key,
        value: mass,
    })
}

/// Projects samples onto the Piper diagram.
#[derive(Debug, Clone)]
pub struct PiperPipeline {
    layout: PiperLayout,
    ions: ResolvedIons,
}

impl PiperPipeline {
    /// Resolve every ion the diagram needs and validate the layout.
    ///
    /// Registry and layout problems are batch-fatal and surface here, before
    /// any sample is processed.
    pub fn new(registry: &IonRegistry, options: PiperOptions) -> Result<Self, BatchError> {
        let layout = PiperLayout::validated(options.gap)?;
        let ions = ResolvedIons::resolve(registry, &options)?;
        Ok(PiperPipeline { layout, ions })
    }

    pub fn layout(&self) -> &PiperLayout {
        &self.layout
    }

    fn cation_equivalents(&self, sample: &Sample) -> Result<CationEquivalents, SampleError> {
        let ions = &self.ions;
        let ca = required_meq(sample, &ions.ca)?;
        let mg = required_meq(sample, &ions.mg)?;
        let na = required_meq(sample, &ions.na)?;
        let k = match sample.concentration(IonKey::K) {
            Some(mass) => optional_meq(mass, &ions.k)?,
            None => 0.0,
        };
        Ok(CationEquivalents { ca, mg, na_k: na + k })
    }

    fn anion_equivalents(&self, sample: &Sample) -> Result<AnionEquivalents, SampleError> {
        let ions = &self.ions;
        let cl = required_meq(sample, &ions.cl)?;
        let so4 = required_meq(sample, &ions.so4)?;
        let carbonate = match &ions.carbonate {
            CarbonateSource::Hco3Co3 { hco3, co3 } => {
                let hco3 = required_meq(sample, hco3)?;
                let co3 = match sample.concentration(IonKey::Co3) {
                    Some(mass) => optional_meq(mass, co3)?,
                    None => 0.0,
                };
                hco3 + co3
            }
            CarbonateSource::AlkalinityMass(alk) => required_meq(sample, alk)?,
            CarbonateSource::AlkalinityMeq => {
                let value = sample
                    .concentration(IonKey::Alk)
                    .ok_or(SampleError::MissingIon(IonKey::Alk))?;
                checked(IonKey::Alk, value)?
            }
        };
        Ok(AnionEquivalents { carbonate, cl, so4 })
    }

    /// Run one sample through the whole transform.
    pub fn project_sample(&self, sample: &Sample) -> Result<SampleProjection, SampleError> {
        let cation_meq = self.cation_equivalents(sample)?;
        let anion_meq = self.anion_equivalents(sample)?;
        let composition = normalize(&cation_meq, &anion_meq)?;

        let cation_point = project_ternary(&composition.cations.percentages, &self.layout.cation_triangle());
        let anion_point = project_ternary(&composition.anions.percentages, &self.layout.anion_triangle());
        let diamond_point = project_diamond(cation_point, anion_point);

        Ok(SampleProjection {
            sample_id: sample.id.clone(),
            groups: sample.groups.clone(),
            date: sample.date,
            cations: composition.cations,
            anions: composition.anions,
            ion_balance_pct: composition.ion_balance_pct,
            cation_point,
            anion_point,
            diamond_point,
        })
    }

    /// Project a whole batch. Input order is preserved in both the projected
    /// samples and the exclusions.
    pub fn project_batch(&self, samples: &[Sample]) -> PiperBatch {
        let results: Vec<Result<SampleProjection, Exclusion>> = samples
            .par_iter()
            .map(|sample| {
                self.project_sample(sample).map_err(|reason| Exclusion {
                    sample_id: sample.id.clone(),
                    reason,
                })
            })
            .collect();

        let mut batch = PiperBatch::default();
        for result in results {
            match result {
                Ok(projection) => batch.projections.push(projection),
                Err(exclusion) => {
                    warn!("piper: excluded sample {}: {}", exclusion.sample_id, exclusion.reason);
                    batch.exclusions.push(exclusion);
                }
            }
        }
        info!(
            "piper: projected {} of {} samples, {} excluded",
            batch.projections.len(),
            samples.len(),
            batch.exclusions.len()
        );
        batch
    }
}

/// Result of a batch run.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PiperBatch {
    pub projections: Vec<SampleProjection>,
    pub exclusions: Vec<Exclusion>,
}

/// Projections sharing one value of a grouping field.
#[derive(Debug, Clone, PartialEq)]
pub struct PlotGroup {
    pub value: String,
    pub projections: Vec<SampleProjection>,
}

/// A batch split into one plot per group value.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Partition {
    /// Groups in order of first appearance
    pub groups: Vec<PlotGroup>,
    /// Projections without a value for the field
    pub ungrouped: Vec<SampleProjection>,
}

impl PiperBatch {
    /// All markers of the batch, three per projected sample.
    pub fn points(&self) -> impl Iterator<Item = ProjectedPoint> + '_ {
        self.projections.iter().flat_map(|p| p.points())
    }

    pub fn is_empty(&self) -> bool {
        self.projections.is_empty()
    }

    /// Distinct values of a grouping field in order of first appearance.
    pub fn distinct_values(&self, field: &str) -> Vec<String> {
        let mut values: Vec<String> = Vec::new();
        for value in self.projections.iter().filter_map(|p| p.group(field)) {
            if !values.iter().any(|v| v == value) {
                values.push(value.to_string());
            }
        }
        values
    }

    /// Split the projected samples by the value of `field`.
    pub fn partition_by(&self, field: &str) -> Partition {
        let mut partition = Partition::default();
        for projection in &self.projections {
            match projection.group(field) {
                Some(value) => match partition.groups.iter_mut().find(|g| g.value == value) {
                    Some(group) => group.projections.push(projection.clone()),
                    None => partition.groups.push(PlotGroup {
                        value: value.to_string(),
                        projections: vec![projection.clone()],
                    }),
                },
                None => partition.ungrouped.push(projection.clone()),
            }
        }
        if !partition.ungrouped.is_empty() {
            warn!(
                "piper: {} samples have no value for {:?} and are not in any plot group",
                partition.ungrouped.len(),
                field
            );
        }
        partition
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ternary::SIN60;
    use fontus_chem::IonGroup;
    use fontus_utils::numeric::approx_eq;

    fn pipeline() -> PiperPipeline {
        PiperPipeline::new(&IonRegistry::default(), PiperOptions::default()).unwrap()
    }

    fn full_sample(id: &str) -> Sample {
        Sample::new(id)
            .with_concentration(IonKey::Ca, 62.0)
            .with_concentration(IonKey::Mg, 18.5)
            .with_concentration(IonKey::Na, 31.0)
            .with_concentration(IonKey::K, 3.2)
            .with_concentration(IonKey::Cl, 44.0)
            .with_concentration(IonKey::So4, 71.0)
            .with_concentration(IonKey::Hco3, 215.0)
    }

    #[test]
    fn test_calcium_bicarbonate_end_member() {
        let sample = Sample::new("end-member")
            .with_concentration(IonKey::Ca, 40.08)
            .with_concentration(IonKey::Mg, 0.0)
            .with_concentration(IonKey::Na, 0.0)
            .with_concentration(IonKey::Cl, 0.0)
            .with_concentration(IonKey::So4, 0.0)
            .with_concentration(IonKey::Hco3, 61.0168);
        let projection = pipeline().project_sample(&sample).unwrap();

        assert!(approx_eq(projection.cations.total_meq, 40.08 / 40.078 * 2.0, 1e-12));
        assert_eq!(projection.cation_point, Point::new(0.0, 0.0));
        assert_eq!(projection.anion_point, Point::new(120.0, 0.0));
        // q1 = 0, q2 = tan60·120, x = q2 / (2·tan60) = 60
        assert!(approx_eq(projection.diamond_point.x, 60.0, 1e-9));
        assert!(approx_eq(projection.diamond_point.y, 120.0 * SIN60, 1e-9));
    }

    #[test]
    fn test_points_carry_id_and_groups() {
        let sample = full_sample("S1").with_group("station", "Well A");
        let projection = pipeline().project_sample(&sample).unwrap();
        let points = projection.points();
        let roles: Vec<PointRole> = points.iter().map(|p| p.role).collect();
        assert_eq!(
            roles,
            vec![PointRole::CationPoint, PointRole::AnionPoint, PointRole::ProjectedPoint]
        );
        for point in &points {
            assert_eq!(point.sample_id, "S1");
            assert_eq!(point.groups.get("station").map(String::as_str), Some("Well A"));
        }
    }

    #[test]
    fn test_projection_lands_in_its_regions() {
        let pipeline = pipeline();
        let projection = pipeline.project_sample(&full_sample("S1")).unwrap();
        let layout = pipeline.layout();
        assert!(layout.cation_triangle().contains(projection.cation_point, 1e-9));
        assert!(layout.anion_triangle().contains(projection.anion_point, 1e-9));
        assert!(layout.diamond_contains(projection.diamond_point, 1e-9));
    }

    #[test]
    fn test_projection_is_repeatable() {
        let pipeline = pipeline();
        let sample = full_sample("S1");
        let first = pipeline.project_sample(&sample).unwrap();
        let second = pipeline.project_sample(&sample).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_potassium_and_carbonate_are_merged() {
        let pipeline = pipeline();
        let without = Sample::new("a")
            .with_concentration(IonKey::Ca, 40.078)
            .with_concentration(IonKey::Mg, 24.305)
            .with_concentration(IonKey::Na, 22.99)
            .with_concentration(IonKey::Cl, 35.45)
            .with_concentration(IonKey::So4, 96.0)
            .with_concentration(IonKey::Hco3, 61.0168);
        let with = without
            .clone()
            .with_concentration(IonKey::K, 39.098)
            .with_concentration(IonKey::Co3, 30.004);
        let a = pipeline.project_sample(&without).unwrap();
        let b = pipeline.project_sample(&with).unwrap();
        // ca 2, mg 2, na 1 (+ k 1)
        assert!(approx_eq(a.cations.total_meq, 5.0, 1e-9));
        assert!(approx_eq(b.cations.total_meq, 6.0, 1e-9));
        assert!(approx_eq(b.cations.percentages.b(), 2.0 / 6.0 * 100.0, 1e-9));
        // hco3 1 (+ co3 1), cl 1, so4 2
        assert!(approx_eq(b.anions.total_meq, 5.0, 1e-9));
        assert!(approx_eq(b.anions.percentages.a(), 40.0, 1e-9));
    }

    #[test]
    fn test_alkalinity_basis_ignores_hco3() {
        let options = PiperOptions {
            carbonate_basis: CarbonateBasis::Alkalinity,
            ..PiperOptions::default()
        };
        let pipeline = PiperPipeline::new(&IonRegistry::default(), options).unwrap();
        let sample = full_sample("S1").with_concentration(IonKey::Alk, 150.0);
        let projection = pipeline.project_sample(&sample).unwrap();
        let cl = 44.0 / 35.45;
        let so4 = 71.0 / 96.0 * 2.0;
        assert!(approx_eq(projection.anions.total_meq, 3.0 + cl + so4, 1e-9));

        let no_alk = full_sample("S2");
        assert_eq!(
            pipeline.project_sample(&no_alk),
            Err(SampleError::MissingIon(IonKey::Alk))
        );
    }

    #[test]
    fn test_alkalinity_in_meq() {
        let options = PiperOptions {
            carbonate_basis: CarbonateBasis::Alkalinity,
            alkalinity_unit: AlkalinityUnit::MeqPerL,
            ..PiperOptions::default()
        };
        let pipeline = PiperPipeline::new(&IonRegistry::default(), options).unwrap();
        let sample = full_sample("S1").with_concentration(IonKey::Alk, 3.0);
        let projection = pipeline.project_sample(&sample).unwrap();
        let cl = 44.0 / 35.45;
        let so4 = 71.0 / 96.0 * 2.0;
        assert!(approx_eq(projection.anions.total_meq, 3.0 + cl + so4, 1e-9));
    }

    #[test]
    fn test_missing_so4_is_excluded() {
        let mut sample = full_sample("no-so4");
        sample.concentrations.remove(&IonKey::So4);
        let batch = pipeline().project_batch(&[full_sample("ok"), sample]);
        assert_eq!(batch.projections.len(), 1);
        assert_eq!(
            batch.exclusions,
            vec![Exclusion {
                sample_id: "no-so4".to_string(),
                reason: SampleError::MissingIon(IonKey::So4),
            }]
        );
    }

    #[test]
    fn test_bad_samples_do_not_abort_batch() {
        let negative = full_sample("neg").with_concentration(IonKey::Mg, -2.0);
        let zero_anions = full_sample("zero")
            .with_concentration(IonKey::Cl, 0.0)
            .with_concentration(IonKey::So4, 0.0)
            .with_concentration(IonKey::Hco3, 0.0);
        let nan = full_sample("nan").with_concentration(IonKey::Na, f64::NAN);
        let samples = vec![full_sample("a"), negative, zero_anions, nan, full_sample("b")];
        let batch = pipeline().project_batch(&samples);

        let ids: Vec<&str> = batch.projections.iter().map(|p| p.sample_id.as_str()).collect();
        assert_eq!(ids, vec!["a", "b"]);
        assert_eq!(batch.exclusions.len(), 3);
        assert_eq!(
            batch.exclusions[0].reason,
            SampleError::InvalidConcentration {
                ion: IonKey::Mg,
                value: -2.0
            }
        );
        assert_eq!(batch.exclusions[1].reason, SampleError::DegenerateGroup(IonGroup::Anion));
        assert_eq!(batch.exclusions[2].sample_id, "nan");
        assert_eq!(batch.points().count(), 6);
    }

    #[test]
    fn test_registry_without_required_ion_is_fatal() {
        let registry = IonRegistry::parse_registry_csv("key,formula_weight,valence\nca,40.078,2\n").unwrap();
        let result = PiperPipeline::new(&registry, PiperOptions::default());
        assert!(matches!(result, Err(BatchError::InvalidIon(_))));
    }

    #[test]
    fn test_negative_gap_is_fatal() {
        let options = PiperOptions {
            gap: -5.0,
            ..PiperOptions::default()
        };
        let result = PiperPipeline::new(&IonRegistry::default(), options);
        assert!(matches!(result, Err(BatchError::InvalidLayout(_))));
    }

    #[test]
    fn test_ion_balance_is_informational() {
        let unbalanced = full_sample("unbalanced").with_concentration(IonKey::Na, 900.0);
        let batch = pipeline().project_batch(&[unbalanced]);
        assert_eq!(batch.projections.len(), 1);
        assert!(batch.projections[0].ion_balance_pct > 50.0);
        assert!(batch.projections[0].ion_balance_pct <= 100.0);
    }

    #[test]
    fn test_distinct_values_and_partition() {
        let samples = vec![
            full_sample("1").with_group("station", "B"),
            full_sample("2").with_group("station", "A"),
            full_sample("3"),
            full_sample("4").with_group("station", "B"),
        ];
        let batch = pipeline().project_batch(&samples);
        assert_eq!(batch.distinct_values("station"), vec!["B".to_string(), "A".to_string()]);

        let partition = batch.partition_by("station");
        assert_eq!(partition, batch.partition_by("Station"));
        assert_eq!(partition.groups.len(), 2);
        assert_eq!(partition.groups[0].value, "B");
        let ids: Vec<&str> = partition.groups[0]
            .projections
            .iter()
            .map(|p| p.sample_id.as_str())
            .collect();
        assert_eq!(ids, vec!["1", "4"]);
        assert_eq!(partition.ungrouped.len(), 1);
        assert_eq!(partition.ungrouped[0].sample_id, "3");
    }

    #[test]
    fn test_parallel_batch_matches_sequential() {
        let pipeline = pipeline();
        let samples: Vec<Sample> = (0..200)
            .map(|i| full_sample(&i.to_string()).with_concentration(IonKey::Cl, 10.0 + i as f64))
            .collect();
        let batch = pipeline.project_batch(&samples);
        let sequential: Vec<SampleProjection> = samples
            .iter()
            .map(|s| pipeline.project_sample(s).unwrap())
            .collect();
        assert_eq!(batch.projections, sequential);
    }
}
