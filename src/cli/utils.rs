use camino::{Utf8Path, Utf8PathBuf};
use simple_error::{SimpleResult, bail};

/// Check a required input filename
///
/// Assumes no logger has been configured yet
///
pub fn check_required_filename(filename: &Utf8Path, label: &str) -> SimpleResult<()> {
    if filename.as_str().is_empty() {
        bail!("Must specify {label} file");
    }
    if !filename.exists() {
        bail!("Can't find specified {label} file: '{filename}'");
    }
    if !filename.is_file() {
        bail!("Specified {label} file path does not appear to be a file: '{filename}'");
    }
    Ok(())
}

/// Resolve a reference data path against an optional base directory
///
/// Absolute paths, and all paths when no base directory is given, are returned unchanged.
///
pub fn resolve_data_path(data_dir: Option<&Utf8Path>, filename: &Utf8Path) -> Utf8PathBuf {
    match data_dir {
        Some(data_dir) if filename.is_relative() => data_dir.join(filename),
        _ => filename.to_path_buf(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolve_data_path() {
        let data_dir = Utf8Path::new("/ref/data");
        assert_eq!(
            resolve_data_path(Some(data_dir), Utf8Path::new("genes.bed")),
            Utf8PathBuf::from("/ref/data/genes.bed")
        );
        assert_eq!(
            resolve_data_path(Some(data_dir), Utf8Path::new("/abs/genes.bed")),
            Utf8PathBuf::from("/abs/genes.bed")
        );
        assert_eq!(
            resolve_data_path(None, Utf8Path::new("genes.bed")),
            Utf8PathBuf::from("genes.bed")
        );
    }

    #[test]
    fn test_check_required_filename() {
        let dir = tempfile::tempdir().unwrap();
        let dir_path = Utf8Path::from_path(dir.path()).unwrap();
        assert!(check_required_filename(&dir_path.join("not_there.txt"), "test").is_err());
        assert!(check_required_filename(dir_path, "test").is_err());

        let filename = dir_path.join("there.txt");
        std::fs::write(&filename, "x").unwrap();
        assert!(check_required_filename(&filename, "test").is_ok());
    }
}
