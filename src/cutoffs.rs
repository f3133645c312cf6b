//! Purity adjusted log2 ratio cutoffs for discrete copy number calling
//!

use serde::{Deserialize, Serialize};

use crate::cna_state::CnaState;
use crate::errors::CnaError;

pub const DEFAULT_CUTOFF_MARGIN: f64 = 0.5;
pub const DEFAULT_AMP_COPY_NUMBER: f64 = 6.0;

/// Lowest copy number allowed as the amplification reference
const MIN_AMP_COPY_NUMBER: f64 = 4.0;

const NORMAL_COPY_NUMBER: f64 = 2.0;

#[derive(Clone, Debug, Deserialize, Serialize)]
pub struct CutoffSettings {
    /// Fraction of the distance from each copy state toward its neighbor at which the cutoff is placed
    pub margin: f64,

    /// Tumor copy number treated as the amplification reference state
    pub amp_copy_number: f64,
}

impl Default for CutoffSettings {
    fn default() -> Self {
        Self {
            margin: DEFAULT_CUTOFF_MARGIN,
            amp_copy_number: DEFAULT_AMP_COPY_NUMBER,
        }
    }
}

impl CutoffSettings {
    pub fn validate(&self) -> Result<(), CnaError> {
        if !(self.margin > 0.0 && self.margin < 1.0) {
            return Err(CnaError::InvalidCutoffSettings(format!(
                "margin must be in the range (0,1), observed: {}",
                self.margin
            )));
        }
        if !(self.amp_copy_number.is_finite() && self.amp_copy_number >= MIN_AMP_COPY_NUMBER) {
            return Err(CnaError::InvalidCutoffSettings(format!(
                "amplification copy number must be at least {MIN_AMP_COPY_NUMBER}, observed: {}",
                self.amp_copy_number
            )));
        }
        Ok(())
    }
}

/// Log2 ratio thresholds bounding the copy number states of one sample
///
/// Invariant: log_r_hmzd < log_r_htzd < log_r_neutral <= log_r_gain < log_r_amp
///
#[derive(Clone, Debug, Deserialize, PartialEq, Serialize)]
pub struct Cutoffs {
    pub purity: f64,
    pub log_r_hmzd: f64,
    pub log_r_htzd: f64,
    pub log_r_neutral: f64,
    pub log_r_gain: f64,
    pub log_r_amp: f64,
}

impl Cutoffs {
    /// Map a log2 ratio onto a copy number state
    ///
    /// Each state interval is closed on the lower bound and open on the upper bound.
    ///
    pub fn classify(&self, log2_value: f64) -> CnaState {
        if log2_value < self.log_r_hmzd {
            CnaState::DeepDeletion
        } else if log2_value < self.log_r_htzd {
            CnaState::ShallowDeletion
        } else if log2_value < self.log_r_gain {
            CnaState::Neutral
        } else if log2_value < self.log_r_amp {
            CnaState::Gain
        } else {
            CnaState::Amplification
        }
    }

    /// Cutoff names and values in increasing order, as written to the cutoff table
    pub fn named_values(&self) -> [(&'static str, f64); 5] {
        [
            ("LOG_R_HMZD", self.log_r_hmzd),
            ("LOG_R_HTZD", self.log_r_htzd),
            ("LOG_R_NEUTRAL", self.log_r_neutral),
            ("LOG_R_GAIN", self.log_r_gain),
            ("LOG_R_AMP", self.log_r_amp),
        ]
    }

    fn is_strictly_ordered(&self) -> bool {
        self.log_r_hmzd < self.log_r_htzd
            && self.log_r_htzd < self.log_r_neutral
            && self.log_r_neutral <= self.log_r_gain
            && self.log_r_gain < self.log_r_amp
    }
}

/// Expected log2 ratio of a region with `tumor_copy_number` copies in the tumor fraction of a
/// sample, with the normal fraction held at two copies
///
fn expected_log2_ratio(purity: f64, tumor_copy_number: f64) -> f64 {
    ((1.0 - purity) + purity * tumor_copy_number / NORMAL_COPY_NUMBER).log2()
}

/// Compute log2 ratio cutoffs for the given tumor purity
///
/// Each cutoff is the expected log2 ratio of a copy number placed `margin` of the way from one
/// copy state toward its neighbor, so normal cell contamination compresses all cutoffs toward 0.
///
pub fn compute_cutoffs(purity: f64, settings: &CutoffSettings) -> Result<Cutoffs, CnaError> {
    if !(purity > 0.0 && purity <= 1.0) {
        return Err(CnaError::InvalidPurity(purity));
    }
    settings.validate()?;

    let margin = settings.margin;
    let amp_cn = settings.amp_copy_number;
    let cutoffs = Cutoffs {
        purity,
        log_r_hmzd: expected_log2_ratio(purity, margin),
        log_r_htzd: expected_log2_ratio(purity, 1.0 + margin),
        log_r_neutral: expected_log2_ratio(purity, NORMAL_COPY_NUMBER),
        log_r_gain: expected_log2_ratio(purity, 3.0 - margin),
        log_r_amp: expected_log2_ratio(purity, amp_cn - margin * (amp_cn - 3.0)),
    };

    if !cutoffs.is_strictly_ordered() {
        return Err(CnaError::DegenerateCutoffs {
            purity,
            hmzd: cutoffs.log_r_hmzd,
            htzd: cutoffs.log_r_htzd,
            gain: cutoffs.log_r_gain,
            amp: cutoffs.log_r_amp,
        });
    }
    Ok(cutoffs)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn purity_grid() -> Vec<f64> {
        (1..=100).map(|x| x as f64 / 100.0).collect()
    }

    #[test]
    fn test_half_purity_values() {
        let cutoffs = compute_cutoffs(0.5, &CutoffSettings::default()).unwrap();
        approx::assert_ulps_eq!(cutoffs.log_r_hmzd, 0.625f64.log2(), max_ulps = 4);
        approx::assert_ulps_eq!(cutoffs.log_r_htzd, 0.875f64.log2(), max_ulps = 4);
        approx::assert_ulps_eq!(cutoffs.log_r_neutral, 0.0, max_ulps = 4);
        approx::assert_ulps_eq!(cutoffs.log_r_gain, 1.125f64.log2(), max_ulps = 4);
        approx::assert_ulps_eq!(cutoffs.log_r_amp, 1.625f64.log2(), max_ulps = 4);
    }

    #[test]
    fn test_full_purity_values() {
        let cutoffs = compute_cutoffs(1.0, &CutoffSettings::default()).unwrap();
        approx::assert_ulps_eq!(cutoffs.log_r_hmzd, -2.0, max_ulps = 4);
        approx::assert_ulps_eq!(cutoffs.log_r_htzd, 0.75f64.log2(), max_ulps = 4);
        approx::assert_ulps_eq!(cutoffs.log_r_gain, 1.25f64.log2(), max_ulps = 4);
        approx::assert_ulps_eq!(cutoffs.log_r_amp, 2.25f64.log2(), max_ulps = 4);
    }

    #[test]
    fn test_cutoff_order() {
        let settings = CutoffSettings::default();
        for purity in purity_grid().into_iter().chain([1e-6, 0.001]) {
            let c = compute_cutoffs(purity, &settings).unwrap();
            assert!(c.log_r_hmzd < c.log_r_htzd, "purity {purity}");
            assert!(c.log_r_htzd < 0.0, "purity {purity}");
            assert!(0.0 <= c.log_r_gain, "purity {purity}");
            assert!(c.log_r_gain < c.log_r_amp, "purity {purity}");
        }
    }

    #[test]
    fn test_cutoff_magnitude_increases_with_purity() {
        let settings = CutoffSettings::default();
        let grid = purity_grid();
        for pair in grid.windows(2) {
            let c1 = compute_cutoffs(pair[0], &settings).unwrap();
            let c2 = compute_cutoffs(pair[1], &settings).unwrap();
            assert!(c1.log_r_gain.abs() <= c2.log_r_gain.abs());
            assert!(c1.log_r_htzd.abs() <= c2.log_r_htzd.abs());
            assert!(c1.log_r_hmzd.abs() <= c2.log_r_hmzd.abs());
            assert!(c1.log_r_amp.abs() <= c2.log_r_amp.abs());
        }
    }

    #[test]
    fn test_invalid_purity() {
        let settings = CutoffSettings::default();
        for purity in [0.0, -0.2, 1.01, f64::NAN, f64::INFINITY] {
            let result = compute_cutoffs(purity, &settings);
            assert!(matches!(result, Err(CnaError::InvalidPurity(_))));
        }
    }

    #[test]
    fn test_degenerate_purity() {
        let result = compute_cutoffs(1e-300, &CutoffSettings::default());
        assert!(matches!(result, Err(CnaError::DegenerateCutoffs { .. })));
    }

    #[test]
    fn test_invalid_settings() {
        let settings = CutoffSettings {
            margin: 1.0,
            ..Default::default()
        };
        assert!(matches!(
            compute_cutoffs(0.5, &settings),
            Err(CnaError::InvalidCutoffSettings(_))
        ));

        let settings = CutoffSettings {
            amp_copy_number: 3.0,
            ..Default::default()
        };
        assert!(matches!(
            compute_cutoffs(0.5, &settings),
            Err(CnaError::InvalidCutoffSettings(_))
        ));
    }

    #[test]
    fn test_classify_boundaries() {
        let c = compute_cutoffs(0.5, &CutoffSettings::default()).unwrap();

        // Lower bound is closed, upper bound is open
        assert_eq!(c.classify(c.log_r_hmzd - 1e-9), CnaState::DeepDeletion);
        assert_eq!(c.classify(c.log_r_hmzd), CnaState::ShallowDeletion);
        assert_eq!(c.classify(c.log_r_htzd), CnaState::Neutral);
        assert_eq!(c.classify(0.0), CnaState::Neutral);
        assert_eq!(c.classify(c.log_r_gain), CnaState::Gain);
        assert_eq!(c.classify(c.log_r_amp), CnaState::Amplification);
        assert_eq!(c.classify(f64::MAX), CnaState::Amplification);
        assert_eq!(c.classify(f64::MIN), CnaState::DeepDeletion);
    }

    #[test]
    fn test_classify_is_monotonic() {
        let c = compute_cutoffs(0.7, &CutoffSettings::default()).unwrap();
        let mut last = CnaState::DeepDeletion;
        for i in -400..=400 {
            let state = c.classify(i as f64 / 100.0);
            assert!(state >= last);
            last = state;
        }
        assert_eq!(last, CnaState::Amplification);
    }
}
