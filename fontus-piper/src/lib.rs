//! Piper diagram geometry engine.
//!
//! Turns the major-ion concentrations of water samples into the coordinates
//! of a Piper plot: one point in the cation triangle, one in the anion
//! triangle and one in the central diamond.
//!
//! ```
//! use fontus_chem::{IonKey, IonRegistry, Sample};
//! use fontus_piper::{PiperOptions, PiperPipeline, PointRole};
//!
//! let pipeline = PiperPipeline::new(&IonRegistry::default(), PiperOptions::default()).unwrap();
//! let sample = Sample::new("well-7")
//!     .with_concentration(IonKey::Ca, 40.078)
//!     .with_concentration(IonKey::Mg, 0.0)
//!     .with_concentration(IonKey::Na, 0.0)
//!     .with_concentration(IonKey::Cl, 0.0)
//!     .with_concentration(IonKey::So4, 0.0)
//!     .with_concentration(IonKey::Hco3, 61.0168);
//!
//! let batch = pipeline.project_batch(&[sample]);
//! assert!(batch.exclusions.is_empty());
//! let cation = batch.points().find(|p| p.role == PointRole::CationPoint).unwrap();
//! assert_eq!((cation.x, cation.y), (0.0, 0.0));
//! ```

pub mod composition;
pub mod diamond;
pub mod error;
pub mod layout;
pub mod pipeline;
pub mod ternary;

pub use composition::{ion_balance_pct, normalize, GroupComposition, SampleComposition, TernaryComposition};
pub use diamond::project_diamond;
pub use error::{BatchError, SampleError};
pub use layout::{DiagramFrame, PiperLayout};
pub use pipeline::{
    Exclusion, Partition, PiperBatch, PiperOptions, PiperPipeline, PlotGroup, PointRole, ProjectedPoint,
    SampleProjection,
};
pub use ternary::{project_ternary, Point, TriangleLayout};
