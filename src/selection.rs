use crate::dataset::Dataset;

/// The institution a viewer is currently looking at
///
/// A `Selection` can only be created from a dataset, and only for an
/// institution that dataset contains. Each browser session carries its own
/// value, so there is no shared "current" selection on the server.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Selection(String);

impl Selection {
    /// First institution of the table, or `None` for an empty dataset
    pub fn initial(dataset: &Dataset) -> Option<Self> {
        dataset.institutions().first().cloned().map(Selection)
    }

    /// Switch to `institution` if the dataset knows it
    pub fn choose(dataset: &Dataset, institution: &str) -> Option<Self> {
        dataset
            .has_institution(institution)
            .then(|| Selection(institution.to_string()))
    }

    /// The remembered value when it is still valid, otherwise the initial one
    pub fn resolve(dataset: &Dataset, remembered: Option<&str>) -> Option<Self> {
        remembered
            .and_then(|name| Self::choose(dataset, name))
            .or_else(|| Self::initial(dataset))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dataset::{Record, Schema};
    use chrono::NaiveDate;

    fn dataset() -> Dataset {
        let schema = Schema {
            date_column: "Tarih".to_string(),
            institution_column: "Kurum".to_string(),
            series: vec!["riders".to_string()],
        };
        let date = NaiveDate::from_ymd_opt(2021, 1, 1).unwrap();
        let records = ["Metro", "ESHOT", "Metro"]
            .into_iter()
            .map(|i| Record {
                date,
                institution: i.to_string(),
                counts: vec![Some(1.0)],
            })
            .collect();
        Dataset::new(schema, records)
    }

    #[test]
    fn starts_at_first_institution() {
        let ds = dataset();
        assert_eq!(Selection::initial(&ds).unwrap().as_str(), "Metro");
    }

    #[test]
    fn only_known_institutions_can_be_chosen() {
        let ds = dataset();
        assert_eq!(Selection::choose(&ds, "ESHOT").unwrap().as_str(), "ESHOT");
        assert!(Selection::choose(&ds, "İzdeniz").is_none());
        assert!(Selection::choose(&ds, "").is_none());
    }

    #[test]
    fn resolve_falls_back_to_initial() {
        let ds = dataset();
        assert_eq!(Selection::resolve(&ds, Some("ESHOT")).unwrap().as_str(), "ESHOT");
        assert_eq!(Selection::resolve(&ds, Some("gone")).unwrap().as_str(), "Metro");
        assert_eq!(Selection::resolve(&ds, None).unwrap().as_str(), "Metro");
    }

    #[test]
    fn empty_dataset_has_no_selection() {
        let ds = Dataset::new(dataset().schema().clone(), Vec::new());
        assert!(Selection::initial(&ds).is_none());
        assert!(Selection::resolve(&ds, Some("Metro")).is_none());
    }
}
