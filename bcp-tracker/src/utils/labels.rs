//! Display labels for check names.

use regex::Regex;
use std::sync::OnceLock;

#[allow(clippy::expect_used)]
fn capitals() -> &'static Regex {
    static CAPITALS: OnceLock<Regex> = OnceLock::new();
    CAPITALS.get_or_init(|| Regex::new("([A-Z])").expect("literal pattern"))
}

/// Turns a camelCase check name into a label.
///
/// A space goes before every capital, the first letter is upper-cased and a
/// split `Q C` is joined back into `QC`.
///
/// ```
/// use bcp_tracker::utils::check_label;
///
/// assert_eq!(check_label("ultimaSequencingQC"), "Ultima Sequencing QC");
/// ```
#[must_use]
pub fn check_label(name: &str) -> String {
    let spaced = capitals().replace_all(name, " $1");
    let mut chars = spaced.chars();
    let capitalized: String = match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    };
    capitalized.replace("Q C", "QC")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bcp_check_labels() {
        assert_eq!(check_label("spreadsheetCompleted"), "Spreadsheet Completed");
        assert_eq!(check_label("psomagenOrderGenerated"), "Psomagen Order Generated");
        assert_eq!(check_label("cellrangerQC"), "Cellranger QC");
        assert_eq!(check_label("md5sumComparisons"), "Md5sum Comparisons");
        assert_eq!(check_label("curatedH5adGeneration"), "Curated H5ad Generation");
    }

    #[test]
    fn test_edge_cases() {
        assert_eq!(check_label(""), "");
        assert_eq!(check_label("done"), "Done");
        assert_eq!(check_label("readCount"), "Read Count");
    }
}
