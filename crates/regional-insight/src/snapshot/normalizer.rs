/// Cleans a CSV header exported from spreadsheets: drops byte-order marks and zero-width
/// spaces, removes whitespace around path separators and collapses the rest. Case is kept
/// because some upstream field names are capitalised.
pub(crate) fn normalize_header(value: &str) -> String {
    let cleaned = value.replace(['\u{feff}', '\u{200b}'], "");
    cleaned
        .split('.')
        .map(|segment| segment.split_whitespace().collect::<Vec<_>>().join(" "))
        .collect::<Vec<_>>()
        .join(".")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strips_invisible_characters() {
        assert_eq!(
            normalize_header("\u{feff}disease.\u{200b}infectious_cases"),
            "disease.infectious_cases"
        );
    }

    #[test]
    fn keeps_case_and_trims_segments() {
        assert_eq!(
            normalize_header(" infrastructure . State_electricity_company "),
            "infrastructure.State_electricity_company"
        );
    }
}
