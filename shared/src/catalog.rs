//! In-memory list helpers used by the resource managers.
//!
//! The browser keeps a local copy of each collection. These functions filter that
//! copy for display and merge server responses into it without re-fetching.

use crate::{City, Continent, Country, Resource};

/// Case-insensitive substring match; an empty search matches everything.
pub fn matches_search(name: &str, search: &str) -> bool {
    name.to_lowercase().contains(&search.to_lowercase())
}

/// True when any of the given names matches the search text.
pub fn matches_any(names: &[&str], search: &str) -> bool {
    names.iter().any(|name| matches_search(name, search))
}

/// Records whose name matches `search` and, when `parent` is set, whose parent id equals it.
pub fn filter_records<R: Resource>(records: &[R], search: &str, parent: Option<i64>) -> Vec<R> {
    records
        .iter()
        .filter(|record| matches_search(record.name(), search))
        .filter(|record| parent.map_or(true, |id| record.parent_id() == Some(id)))
        .cloned()
        .collect()
}

/// Replace the record with the same id, or append it when absent.
pub fn upsert<R: Resource>(records: &mut Vec<R>, record: R) {
    match records.iter_mut().find(|existing| existing.id() == record.id()) {
        Some(existing) => *existing = record,
        None => records.push(record),
    }
}

pub fn remove_by_id<R: Resource>(records: &mut Vec<R>, id: i64) {
    records.retain(|record| record.id() != id);
}

pub fn find_by_id<R: Resource>(records: &[R], id: i64) -> Option<&R> {
    records.iter().find(|record| record.id() == id)
}

/// Headline numbers for the dashboard
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CatalogStats {
    pub continents: usize,
    pub countries: usize,
    pub cities: usize,
    /// Sum of country populations
    pub total_population: i64,
}

impl CatalogStats {
    pub fn compute(continents: &[Continent], countries: &[Country], cities: &[City]) -> Self {
        Self {
            continents: continents.len(),
            countries: countries.len(),
            cities: cities.len(),
            total_population: countries.iter().map(|country| country.population).sum(),
        }
    }
}

/// A city together with the names of the country and continent it belongs to.
#[derive(Debug, Clone, PartialEq)]
pub struct PlacedCity {
    pub city: City,
    pub country_name: Option<String>,
    pub continent_name: Option<String>,
}

impl PlacedCity {
    pub fn matches(&self, search: &str) -> bool {
        let mut names = vec![self.city.name.as_str()];
        names.extend(self.country_name.as_deref());
        names.extend(self.continent_name.as_deref());
        matches_any(&names, search)
    }
}

/// Join each city with its country and continent names; dangling ids yield `None`.
pub fn place_cities(
    cities: &[City],
    countries: &[Country],
    continents: &[Continent],
) -> Vec<PlacedCity> {
    cities
        .iter()
        .map(|city| {
            let country = find_by_id(countries, city.country_id);
            let continent =
                country.and_then(|country| find_by_id(continents, country.continent_id));
            PlacedCity {
                city: city.clone(),
                country_name: country.map(|country| country.name.clone()),
                continent_name: continent.map(|continent| continent.name.clone()),
            }
        })
        .collect()
}

/// Thousands-separated integer, e.g. `213.000.000` with `'.'`.
pub fn group_digits(value: i64, separator: char) -> String {
    let digits = value.unsigned_abs().to_string();
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3 + 1);
    for (index, digit) in digits.chars().enumerate() {
        if index > 0 && (digits.len() - index) % 3 == 0 {
            grouped.push(separator);
        }
        grouped.push(digit);
    }
    if value < 0 {
        grouped.insert(0, '-');
    }
    grouped
}

#[cfg(test)]
mod tests {
    use super::*;

    fn city(id: i64, name: &str, country_id: i64) -> City {
        City {
            id,
            name: name.to_string(),
            population: 1_000_000,
            latitude: 0.0,
            longitude: 0.0,
            country_id,
        }
    }

    fn country(id: i64, name: &str, continent_id: i64, population: i64) -> Country {
        Country {
            id,
            name: name.to_string(),
            language: "Inglês".to_string(),
            coin: "Naira".to_string(),
            flag: "🏳".to_string(),
            population,
            continent_id,
        }
    }

    #[test]
    fn test_search_is_case_insensitive_substring() {
        let cities = vec![
            city(1, "Bahia", 2),
            city(2, "Brasília", 2),
            city(3, "Lagos", 5),
            city(4, "Nairóbi", 20),
        ];

        let names: Vec<String> = filter_records(&cities, "ia", None)
            .into_iter()
            .map(|c| c.name)
            .collect();
        assert_eq!(names, vec!["Bahia", "Brasília"]);

        let upper: Vec<i64> = filter_records(&cities, "IA", None).iter().map(|c| c.id).collect();
        assert_eq!(upper, vec![1, 2]);

        // "Nairóbi" holds "ai", not "ia"
        let nai: Vec<i64> = filter_records(&cities, "nai", None).iter().map(|c| c.id).collect();
        assert_eq!(nai, vec![4]);
    }

    #[test]
    fn test_empty_search_matches_everything() {
        let cities = vec![city(1, "Bahia", 2), city(2, "Lagos", 5)];
        assert_eq!(filter_records(&cities, "", None).len(), 2);
    }

    #[test]
    fn test_search_handles_accented_capitals() {
        assert!(matches_search("África do Sul", "áfrica"));
        assert!(matches_search("Tóquio", "TÓQ"));
        assert!(!matches_search("Lagos", "ia"));
    }

    #[test]
    fn test_parent_filter_combines_with_search() {
        let cities = vec![city(1, "Bahia", 2), city(2, "Brasília", 2), city(3, "Nairóbi", 20)];

        let in_brazil: Vec<i64> = filter_records(&cities, "ia", Some(2))
            .iter()
            .map(|c| c.id)
            .collect();
        assert_eq!(in_brazil, vec![1, 2]);

        let nowhere = filter_records(&cities, "ia", Some(99));
        assert!(nowhere.is_empty());
    }

    #[test]
    fn test_upsert_replaces_or_appends() {
        let mut cities = vec![city(1, "Bahia", 2)];

        upsert(&mut cities, city(1, "Salvador", 2));
        assert_eq!(cities.len(), 1);
        assert_eq!(cities[0].name, "Salvador");

        upsert(&mut cities, city(7, "Recife", 2));
        assert_eq!(cities.iter().map(|c| c.id).collect::<Vec<_>>(), vec![1, 7]);
    }

    #[test]
    fn test_remove_by_id_leaves_others() {
        let mut cities = vec![city(1, "Bahia", 2), city(2, "Lagos", 5)];
        remove_by_id(&mut cities, 1);
        assert_eq!(cities, vec![city(2, "Lagos", 5)]);

        remove_by_id(&mut cities, 42);
        assert_eq!(cities.len(), 1);
    }

    #[test]
    fn test_stats_sum_country_population() {
        let continents = vec![Continent {
            id: 5,
            name: "África".to_string(),
            description: "Segundo maior continente em área e população".to_string(),
        }];
        let countries = vec![
            country(5, "Nigéria", 5, 206_000_000),
            country(20, "Quênia", 5, 53_700_000),
        ];
        let cities = vec![city(1, "Lagos", 5)];

        let stats = CatalogStats::compute(&continents, &countries, &cities);
        assert_eq!(stats.continents, 1);
        assert_eq!(stats.countries, 2);
        assert_eq!(stats.cities, 1);
        assert_eq!(stats.total_population, 259_700_000);
    }

    #[test]
    fn test_place_cities_resolves_names() {
        let continents = vec![Continent {
            id: 5,
            name: "África".to_string(),
            description: "Segundo maior continente em área e população".to_string(),
        }];
        let countries = vec![country(20, "Quênia", 5, 53_700_000)];
        let cities = vec![city(1, "Nairóbi", 20), city(2, "Atlântida", 404)];

        let placed = place_cities(&cities, &countries, &continents);
        assert_eq!(placed[0].country_name.as_deref(), Some("Quênia"));
        assert_eq!(placed[0].continent_name.as_deref(), Some("África"));
        assert!(placed[0].matches("áfr"));
        assert!(placed[0].matches("quê"));

        assert_eq!(placed[1].country_name, None);
        assert_eq!(placed[1].continent_name, None);
        assert!(!placed[1].matches("áfr"));
    }

    #[test]
    fn test_group_digits() {
        assert_eq!(group_digits(213_000_000, '.'), "213.000.000");
        assert_eq!(group_digits(999, '.'), "999");
        assert_eq!(group_digits(1_000, ','), "1,000");
        assert_eq!(group_digits(0, '.'), "0");
        assert_eq!(group_digits(-4_397_000, '.'), "-4.397.000");
    }
}
