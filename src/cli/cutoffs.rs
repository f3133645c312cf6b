use clap::Args;
use serde::{Deserialize, Serialize};
use simple_error::{SimpleResult, bail};

use crate::cutoffs::{CutoffSettings, DEFAULT_AMP_COPY_NUMBER, DEFAULT_CUTOFF_MARGIN};

/// Options controlling the conversion of purity into log2 ratio cutoffs
#[derive(Args, Clone, Deserialize, Serialize)]
pub struct CutoffArgs {
    /// Fraction of the distance from each copy number state toward its neighbor at which the
    /// calling cutoff is placed. Must be in the range (0,1).
    #[arg(long = "cutoff-margin", default_value_t = DEFAULT_CUTOFF_MARGIN)]
    pub margin: f64,

    /// Tumor copy number used as the amplification reference state
    #[arg(long, default_value_t = DEFAULT_AMP_COPY_NUMBER)]
    pub amp_copy_number: f64,
}

impl CutoffArgs {
    pub fn to_cutoff_settings(&self) -> CutoffSettings {
        CutoffSettings {
            margin: self.margin,
            amp_copy_number: self.amp_copy_number,
        }
    }
}

#[derive(Args)]
pub struct CutoffsSettings {
    /// Tumor purity, in the range (0,1]
    #[arg(long)]
    pub purity: f64,

    #[command(flatten)]
    pub cutoff_args: CutoffArgs,
}

pub fn validate_cutoff_args(args: &CutoffArgs) -> SimpleResult<()> {
    if let Err(err) = args.to_cutoff_settings().validate() {
        bail!("{err}");
    }
    Ok(())
}

/// Validate settings and update to parameters that can't be processed automatically by clap.
///
/// Assumes that the logger is not setup
///
pub fn validate_and_fix_cutoffs_settings(
    settings: CutoffsSettings,
) -> SimpleResult<CutoffsSettings> {
    if !(settings.purity > 0.0 && settings.purity <= 1.0) {
        bail!(
            "--purity argument must be in the range (0,1], observed: {}",
            settings.purity
        );
    }
    validate_cutoff_args(&settings.cutoff_args)?;
    Ok(settings)
}
