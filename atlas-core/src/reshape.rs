//! Wide-to-long reshaping.
//!
//! A pure transformation: every `(country, year)` cell of the wide table
//! becomes exactly one [`TimeSeriesRecord`], empty cells included. The long
//! form is therefore a bijection on `(country, year)` pairs with the cross
//! product of countries and declared years.

use crate::load::WideTable;
use crate::records::TimeSeriesRecord;

impl WideTable {
    /// Convert to long `(country, year, value)` form.
    pub fn into_long(self) -> Vec<TimeSeriesRecord> {
        let mut records = Vec::with_capacity(self.rows.len() * self.years.len());
        for row in self.rows {
            for (year, value) in self.years.iter().zip(row.values) {
                records.push(TimeSeriesRecord {
                    country: row.country.clone(),
                    year: *year,
                    value,
                });
            }
        }
        records
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use crate::load::read_wide_csv;

    const FIXTURE: &str = "\
preamble,row
preamble,row
Country Name,Country Code,1960,1961
Aruba,ABW,,2.0
Chile,CHL,3.0,4.0
";

    #[test]
    fn long_form_is_bijective_on_country_year() {
        let table = read_wide_csv(FIXTURE.as_bytes(), "fixture").unwrap();
        let long = table.into_long();

        let pairs: HashSet<(String, u16)> = long
            .iter()
            .map(|record| (record.country.clone(), record.year))
            .collect();

        // No duplicates, and exactly the countries x years cross product.
        assert_eq!(pairs.len(), long.len());
        assert_eq!(pairs.len(), 2 * 2);
        for country in ["Aruba", "Chile"] {
            for year in [1960, 1961] {
                assert!(pairs.contains(&(country.to_string(), year)));
            }
        }
    }

    #[test]
    fn empty_cells_are_preserved_as_null() {
        let table = read_wide_csv(FIXTURE.as_bytes(), "fixture").unwrap();
        let long = table.into_long();

        let aruba_1960 = long
            .iter()
            .find(|record| record.country == "Aruba" && record.year == 1960)
            .unwrap();
        assert_eq!(aruba_1960.value, None);

        let chile_1961 = long
            .iter()
            .find(|record| record.country == "Chile" && record.year == 1961)
            .unwrap();
        assert_eq!(chile_1961.value, Some(4.0));
    }
}
