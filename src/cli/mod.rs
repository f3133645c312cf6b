mod call;
mod cutoffs;
mod shared;
mod utils;

use camino::Utf8Path;
use clap::{Parser, Subcommand};
use simple_error::{SimpleResult, bail};

pub use self::call::{CallSettings, write_call_settings};
use self::call::validate_and_fix_call_settings;
pub use self::cutoffs::CutoffsSettings;
use self::cutoffs::validate_and_fix_cutoffs_settings;
use self::shared::validate_and_fix_shared_settings;
pub use self::shared::SharedSettings;

#[derive(Subcommand)]
pub enum Commands {
    /// Call gene and chromosome arm copy number states for one tumor sample from its segmented
    /// log2 copy ratios and purity
    Call(CallSettings),

    /// Print the purity-adjusted log2 ratio cutoffs for a given purity
    Cutoffs(CutoffsSettings),
}

#[derive(Parser)]
#[command(
    author,
    version,
    about,
    help_template = "\
{before-help}{name} {version}
{author-with-newline}{about-with-newline}
{usage-heading} {usage}

{all-args}{after-help}"
)]
#[clap(propagate_version = true, rename_all = "kebab_case")]
pub struct Settings {
    #[command(flatten)]
    pub shared: SharedSettings,

    #[command(subcommand)]
    pub command: Commands,
}

impl Settings {
    /// Output directory of the selected command, if it writes one
    pub fn get_output_dir(&self) -> Option<&Utf8Path> {
        match &self.command {
            Commands::Call(x) => Some(&x.output_dir),
            Commands::Cutoffs(_) => None,
        }
    }
}

/// Checks if a directory does not exist
///
pub fn check_novel_dirname(dirname: &Utf8Path, label: &str) -> SimpleResult<()> {
    if dirname.exists() {
        bail!("{label} already exists: '{dirname}'");
    }
    Ok(())
}

/// Validate settings and update parameters that can't be processed by clap
///
pub fn validate_and_fix_settings_impl(mut settings: Settings) -> SimpleResult<Settings> {
    settings.shared = validate_and_fix_shared_settings(settings.shared)?;

    settings.command = match settings.command {
        Commands::Call(x) => {
            let x = validate_and_fix_call_settings(x)?;
            Commands::Call(x)
        }
        Commands::Cutoffs(x) => {
            let x = validate_and_fix_cutoffs_settings(x)?;
            Commands::Cutoffs(x)
        }
    };

    Ok(settings)
}

/// Validate settings and update to parameters that can't be processed automatically by clap.
///
pub fn validate_and_fix_settings(settings: Settings) -> Settings {
    match validate_and_fix_settings_impl(settings) {
        Ok(x) => x,
        Err(msg) => {
            eprintln!("Invalid command-line setting: {msg}");
            std::process::exit(exitcode::USAGE);
        }
    }
}

pub fn parse_settings() -> Settings {
    Settings::parse()
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition() {
        Settings::command().debug_assert();
    }

    #[test]
    fn test_parse_cutoffs_command() {
        let settings =
            Settings::try_parse_from(["cnacall", "cutoffs", "--purity", "0.5", "--cutoff-margin", "0.4"])
                .unwrap();
        let Commands::Cutoffs(x) = &settings.command else {
            panic!("Unexpected command");
        };
        assert_eq!(x.purity, 0.5);
        assert_eq!(x.cutoff_args.margin, 0.4);
        assert!(settings.get_output_dir().is_none());
    }

    #[test]
    fn test_call_purity_group() {
        let base_args = vec![
            "cnacall",
            "call",
            "--segments",
            "s.seg",
            "--genes",
            "g.bed",
            "--cancer-genes",
            "c.txt",
            "--centromeres",
            "cen.txt",
        ];

        // Purity must come from exactly one source
        assert!(Settings::try_parse_from(base_args.clone()).is_err());

        let mut args = base_args.clone();
        args.extend(["--purity", "0.3", "--purity-file", "p.txt"]);
        assert!(Settings::try_parse_from(args).is_err());

        let mut args = base_args.clone();
        args.extend(["--purity", "0.3"]);
        let settings = Settings::try_parse_from(args).unwrap();
        let Commands::Call(x) = &settings.command else {
            panic!("Unexpected command");
        };
        assert_eq!(x.purity_input.purity, Some(0.3));
        assert_eq!(settings.get_output_dir(), Some(Utf8Path::new("cnacall_call_output")));
        assert_eq!(x.genome_size.get(), 3_000_000_000);

        let mut args = base_args.clone();
        args.extend(["--purity", "0.3", "--genome-size", "0"]);
        assert!(Settings::try_parse_from(args).is_err());
    }
}
