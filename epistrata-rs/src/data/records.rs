use crate::prelude::Real;
use serde::{Deserialize, Serialize};

/// One day of raw counters for a state, as produced by the upstream
/// normalization step.
///
/// All counters are reals: some of them are interpolated upstream (e.g.,
/// cumulative deaths) and the CSV feeds store them as floats.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct DailyRecord {
    pub date: String,

    /// Cumulative number of people with at least one dose.
    #[serde(rename = "Administered_Dose1_Recip")]
    pub first_doses: Real,

    /// Cumulative number of people with a complete primary series.
    #[serde(rename = "Series_Complete_Yes")]
    pub fully_vaccinated: Real,

    /// Cumulative number of booster doses.
    #[serde(rename = "Additional_Doses")]
    pub boosters: Real,

    #[serde(rename = "Daily Cases")]
    pub daily_cases: Real,

    #[serde(rename = "Active Cases")]
    pub active_cases: Real,

    #[serde(rename = "Total Recovered")]
    pub total_recovered: Real,

    #[serde(rename = "New Recoveries")]
    pub new_recoveries: Real,

    /// Cumulative deaths, linearly interpolated over reporting gaps.
    #[serde(rename = "Total Deaths (Linear)")]
    pub total_deaths: Real,

    #[serde(rename = "Daily Deaths")]
    pub daily_deaths: Real,

    /// Inpatient beds occupied by COVID patients.
    #[serde(rename = "inpatient_beds_used_covid")]
    pub inpatient_beds: Real,
}

impl DailyRecord {
    /// An empty record for the given date. Mostly useful to build synthetic
    /// series with struct update syntax.
    pub fn on(date: &str) -> Self {
        DailyRecord {
            date: date.to_string(),
            ..Default::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn deserialize_ignores_extra_columns() {
        let data = "\
date,Administered_Dose1_Recip,Series_Complete_Yes,Additional_Doses,Daily Cases,Active Cases,\
Total Recovered,New Recoveries,Total Deaths (Linear),Daily Deaths,inpatient_beds_used_covid,extra
2021-05-01,10,5,1.0,3,40,100,2,7.5,1,12,foo
";
        let mut reader = csv::Reader::from_reader(data.as_bytes());
        let rows: Vec<DailyRecord> = reader.deserialize().collect::<Result<_, _>>().unwrap();
        assert_eq!(rows.len(), 1);
        let row = &rows[0];
        assert_eq!(row.date, "2021-05-01");
        assert_eq!(row.first_doses, 10.0);
        assert_eq!(row.total_deaths, 7.5);
        assert_eq!(row.inpatient_beds, 12.0);
    }
}
