//! Normalisation of charge-equivalents to per-group percentages.

use crate::error::SampleError;
use fontus_chem::IonGroup;
use serde::Serialize;

/// Tolerance on the 100% sum accepted by [`TernaryComposition::from_percentages`].
pub const PERCENT_SUM_TOLERANCE: f64 = 1e-6;

/// A three-part percentage breakdown summing to 100.
///
/// `a`, `b` and `c` are the shares of the left, right and top apex of a
/// triangle respectively.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct TernaryComposition {
    a: f64,
    b: f64,
    c: f64,
}

impl TernaryComposition {
    /// Validate a caller-supplied composition: all parts finite and
    /// non-negative, summing to 100.
    pub fn from_percentages(a: f64, b: f64, c: f64) -> Option<Self> {
        let parts = [a, b, c];
        if parts.iter().any(|p| !p.is_finite() || *p < 0.0) {
            return None;
        }
        if (a + b + c - 100.0).abs() > PERCENT_SUM_TOLERANCE {
            return None;
        }
        Some(TernaryComposition { a, b, c })
    }

    pub fn a(&self) -> f64 {
        self.a
    }

    pub fn b(&self) -> f64 {
        self.b
    }

    pub fn c(&self) -> f64 {
        self.c
    }
}

/// Charge-equivalent totals and percentages of one ion group in a sample.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct GroupComposition {
    pub group: IonGroup,
    /// Sum of the group's charge-equivalents in meq/L
    pub total_meq: f64,
    pub percentages: TernaryComposition,
}

impl GroupComposition {
    /// Build the composition from the three end-member meq/L values, in
    /// apex order (left, right, top).
    ///
    /// Fails with `DegenerateGroup` when the group total is not positive.
    pub fn from_meq(group: IonGroup, a_meq: f64, b_meq: f64, c_meq: f64) -> Result<Self, SampleError> {
        let total_meq = a_meq + b_meq + c_meq;
        if total_meq.is_nan() || total_meq <= 0.0 {
            return Err(SampleError::DegenerateGroup(group));
        }
        let percentages = TernaryComposition {
            a: a_meq / total_meq * 100.0,
            b: b_meq / total_meq * 100.0,
            c: c_meq / total_meq * 100.0,
        };
        Ok(GroupComposition {
            group,
            total_meq,
            percentages,
        })
    }
}

/// Cation end members in meq/L. Potassium is already folded into `na_k`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CationEquivalents {
    pub ca: f64,
    pub mg: f64,
    pub na_k: f64,
}

impl CationEquivalents {
    /// Ca at the left apex, Na+K at the right, Mg at the top.
    pub fn composition(&self) -> Result<GroupComposition, SampleError> {
        GroupComposition::from_meq(IonGroup::Cation, self.ca, self.na_k, self.mg)
    }
}

/// Anion end members in meq/L. Carbonate is HCO3+CO3 or alkalinity.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AnionEquivalents {
    pub carbonate: f64,
    pub cl: f64,
    pub so4: f64,
}

impl AnionEquivalents {
    /// Carbonate at the left apex, Cl at the right, SO4 at the top.
    pub fn composition(&self) -> Result<GroupComposition, SampleError> {
        GroupComposition::from_meq(IonGroup::Anion, self.carbonate, self.cl, self.so4)
    }
}

/// Charge-balance error in percent:
/// `(cations - anions) / (cations + anions) * 100`.
///
/// Informational only; returns 0 when both totals are zero.
pub fn ion_balance_pct(cation_total_meq: f64, anion_total_meq: f64) -> f64 {
    let sum = cation_total_meq + anion_total_meq;
    if sum == 0.0 {
        return 0.0;
    }
    (cation_total_meq - anion_total_meq) / sum * 100.0
}

/// Both group compositions of a sample plus its ion balance.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct SampleComposition {
    pub cations: GroupComposition,
    pub anions: GroupComposition,
    pub ion_balance_pct: f64,
}

/// Normalise a sample's cation and anion equivalents.
pub fn normalize(cations: &CationEquivalents, anions: &AnionEquivalents) -> Result<SampleComposition, SampleError> {
    let cations = cations.composition()?;
    let anions = anions.composition()?;
    Ok(SampleComposition {
        ion_balance_pct: ion_balance_pct(cations.total_meq, anions.total_meq),
        cations,
        anions,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use fontus_utils::numeric::approx_eq;

    #[test]
    fn test_group_percentages_sum_to_100() {
        let comp = CationEquivalents {
            ca: 2.0,
            mg: 1.003,
            na_k: 0.77,
        }
        .composition()
        .unwrap();
        let p = comp.percentages;
        assert!(approx_eq(p.a() + p.b() + p.c(), 100.0, 1e-9));
        assert!(approx_eq(comp.total_meq, 3.773, 1e-12));
        assert!(approx_eq(p.a(), 2.0 / 3.773 * 100.0, 1e-12));
    }

    #[test]
    fn test_degenerate_group() {
        let anions = AnionEquivalents {
            carbonate: 0.0,
            cl: 0.0,
            so4: 0.0,
        };
        assert_eq!(anions.composition(), Err(SampleError::DegenerateGroup(IonGroup::Anion)));
    }

    #[test]
    fn test_normalize_reports_cations_first() {
        let cations = CationEquivalents {
            ca: 0.0,
            mg: 0.0,
            na_k: 0.0,
        };
        let anions = AnionEquivalents {
            carbonate: 0.0,
            cl: 0.0,
            so4: 0.0,
        };
        assert_eq!(
            normalize(&cations, &anions),
            Err(SampleError::DegenerateGroup(IonGroup::Cation))
        );
    }

    #[test]
    fn test_ion_balance() {
        assert_eq!(ion_balance_pct(2.0, 2.0), 0.0);
        assert!(approx_eq(ion_balance_pct(3.0, 1.0), 50.0, 1e-12));
        assert!(approx_eq(ion_balance_pct(1.0, 3.0), -50.0, 1e-12));
        assert_eq!(ion_balance_pct(5.0, 0.0), 100.0);
        assert_eq!(ion_balance_pct(0.0, 5.0), -100.0);
        assert_eq!(ion_balance_pct(0.0, 0.0), 0.0);
    }

    #[test]
    fn test_ion_balance_is_bounded_and_antisymmetric() {
        let totals = [0.0, 0.1, 1.0, 2.5, 10.0, 250.0];
        for c in totals {
            for a in totals {
                let balance = ion_balance_pct(c, a);
                assert!((-100.0..=100.0).contains(&balance));
                assert!(approx_eq(balance, -ion_balance_pct(a, c), 1e-12));
            }
        }
    }

    #[test]
    fn test_from_percentages_validation() {
        assert!(TernaryComposition::from_percentages(20.0, 30.0, 50.0).is_some());
        assert!(TernaryComposition::from_percentages(20.0, 30.0, 49.0).is_none());
        assert!(TernaryComposition::from_percentages(-5.0, 55.0, 50.0).is_none());
        assert!(TernaryComposition::from_percentages(f64::NAN, 50.0, 50.0).is_none());
    }
}
