//! Analyzed-services list: one directory-style service reference per line.

use std::path::Path;

use meshtrace_core::errors::ScanError;

/// Parse an analyzed-services list. Blank lines are skipped, a leading `./`
/// and trailing `/` are stripped, and duplicates keep their first position.
pub fn parse_analyzed_services(text: &str) -> Vec<String> {
    let mut services: Vec<String> = Vec::new();
    for line in text.lines() {
        let trimmed = line.trim();
        let name = trimmed
            .strip_prefix("./")
            .unwrap_or(trimmed)
            .trim_end_matches('/');
        if name.is_empty() || services.iter().any(|s| s == name) {
            continue;
        }
        services.push(name.to_string());
    }
    services
}

/// Load the analyzed-services list. A missing list is the one input whose
/// absence halts the run.
pub fn load_analyzed_services(path: &Path) -> Result<Vec<String>, ScanError> {
    if !path.is_file() {
        return Err(ScanError::MissingInput {
            path: path.to_path_buf(),
        });
    }
    let text = std::fs::read_to_string(path).map_err(|source| ScanError::IoError {
        path: path.to_path_buf(),
        source,
    })?;
    Ok(parse_analyzed_services(&text))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strips_directory_markers_and_blank_lines() {
        let text = "./ts-order-service\n\n  ts-travel-service/ \n./ts-order-service\n";
        assert_eq!(
            parse_analyzed_services(text),
            vec!["ts-order-service".to_string(), "ts-travel-service".to_string()]
        );
    }

    #[test]
    fn missing_list_is_missing_input() {
        let dir = tempfile::TempDir::new().unwrap();
        let err = load_analyzed_services(&dir.path().join("analyzed_services.txt")).unwrap_err();
        assert!(matches!(err, ScanError::MissingInput { .. }));
    }
}
