use std::path::{Path, PathBuf};

/// Prefix of every report title and output file name.
pub const REPORT_PREFIX: &str = "OVERVIEW_";

/// Name used for a report when none is given.
pub const DEFAULT_REPORT_NAME: &str = "Unknown";

/// Display name of an input file: its stem, without directory or extension.
pub fn display_name(path: &Path) -> String {
    path.file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}

/// Title drawn on each chart page.
pub fn report_title(name: &str) -> String {
    format!("{REPORT_PREFIX}{name}")
}

/// `<output_dir>/OVERVIEW_<name>.<extension>`
pub fn output_path(output_dir: &Path, name: &str, extension: &str) -> PathBuf {
    output_dir.join(format!("{}.{extension}", report_title(name)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_name_strips_directory_and_extension() {
        assert_eq!(
            display_name(Path::new("results/ENRON/CHAIN_predictType=LABEL.csv")),
            "CHAIN_predictType=LABEL"
        );
        assert_eq!(display_name(Path::new("plain")), "plain");
    }

    #[test]
    fn test_output_path() {
        assert_eq!(
            output_path(Path::new("out"), "yeast", "html"),
            PathBuf::from("out/OVERVIEW_yeast.html")
        );
        assert_eq!(report_title("yeast"), "OVERVIEW_yeast");
    }
}
