/// Deterministic artifact name: `Activity_Report_<year1>_<year2>.<ext>`.
///
/// Path separators in the year fields are replaced so the name always
/// stays a single file name.
pub fn export_file_name(year1: &str, year2: &str, extension: &str) -> String {
    format!(
        "Activity_Report_{}_{}.{}",
        sanitize(year1),
        sanitize(year2),
        extension
    )
}

fn sanitize(part: &str) -> String {
    part.trim()
        .chars()
        .map(|c| if matches!(c, '/' | '\\' | '\0') { '-' } else { c })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_file_name_from_years() {
        assert_eq!(export_file_name("24", "25", "pdf"), "Activity_Report_24_25.pdf");
    }

    #[test]
    fn test_empty_years_still_deterministic() {
        assert_eq!(export_file_name("", "", "pdf"), "Activity_Report__.pdf");
    }

    #[test]
    fn test_separators_replaced() {
        assert_eq!(
            export_file_name("../24", "25\\x", "txt"),
            "Activity_Report_..-24_25-x.txt"
        );
    }
}
