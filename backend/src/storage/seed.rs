//! Demonstration catalog loaded into an empty database.

use shared::{
    City, Continent, Country, CreateCityRequest, CreateContinentRequest, CreateCountryRequest,
};
use tracing::info;

use super::{DbConnection, Repository};

const CONTINENTS: &[(&str, &str)] = &[
    ("América do Norte", "Continente localizado no hemisfério norte"),
    ("América do Sul", "Continente localizado no hemisfério sul"),
    ("Europa", "Continente localizado no hemisfério norte"),
    ("Ásia", "Maior continente em área e população"),
    ("África", "Segundo maior continente em área e população"),
    ("Oceania", "Continente insular"),
    ("América Central", "Região que conecta as Américas do Norte e Sul"),
    ("Caribe", "Região insular das Caraíbas"),
    ("Escandinávia", "Região nórdica da Europa"),
    ("Oriente Médio", "Região que conecta Ásia, África e Europa"),
    ("Sudeste Asiático", "Sub-região da Ásia"),
    ("África Subsaariana", "Região da África ao sul do Saara"),
    ("Bálcãs", "Região no sudeste da Europa"),
    ("América Anglo-Saxônica", "Países de língua inglesa das Américas"),
    ("América Latina", "Países de línguas românicas das Américas"),
    ("Europa Oriental", "Parte oriental do continente europeu"),
    ("Europa Ocidental", "Parte ocidental do continente europeu"),
    ("Norte da África", "Região do norte do continente africano"),
    ("Ásia Central", "Região central do continente asiático"),
    ("Antártida", "Continente mais meridional"),
];

/// (name, language, currency, flag, population, 1-based continent position)
const COUNTRIES: &[(&str, &str, &str, &str, i64, usize)] = &[
    ("Estados Unidos", "Inglês", "Dólar Americano", "🇺🇸", 331_000_000, 1),
    ("Brasil", "Português", "Real", "🇧🇷", 213_000_000, 2),
    ("França", "Francês", "Euro", "🇫🇷", 67_000_000, 3),
    ("Japão", "Japonês", "Iene", "🇯🇵", 125_000_000, 4),
    ("Nigéria", "Inglês", "Naira", "🇳🇬", 206_000_000, 5),
    ("Austrália", "Inglês", "Dólar Australiano", "🇦🇺", 25_600_000, 6),
    ("Argentina", "Espanhol", "Peso Argentino", "🇦🇷", 45_100_000, 2),
    ("Alemanha", "Alemão", "Euro", "🇩🇪", 83_100_000, 3),
    ("China", "Mandarim", "Yuan", "🇨🇳", 1_402_000_000, 4),
    ("Egito", "Árabe", "Libra Egípcia", "🇪🇬", 104_000_000, 5),
    ("Nova Zelândia", "Inglês", "Dólar Neozelandês", "🇳🇿", 5_000_000, 6),
    ("Canadá", "Inglês e Francês", "Dólar Canadense", "🇨🇦", 38_000_000, 1),
    ("México", "Espanhol", "Peso Mexicano", "🇲🇽", 128_000_000, 1),
    ("Itália", "Italiano", "Euro", "🇮🇹", 59_500_000, 3),
    ("Índia", "Hindi e Inglês", "Rupia Indiana", "🇮🇳", 1_380_000_000, 4),
    ("África do Sul", "Africâner e Inglês", "Rand", "🇿🇦", 60_000_000, 5),
    ("Chile", "Espanhol", "Peso Chileno", "🇨🇱", 19_100_000, 2),
    ("Reino Unido", "Inglês", "Libra Esterlina", "🇬🇧", 67_200_000, 3),
    ("Coreia do Sul", "Coreano", "Won Sul-Coreano", "🇰🇷", 51_700_000, 4),
    ("Quênia", "Suaíli e Inglês", "Xelim Queniano", "🇰🇪", 53_700_000, 5),
];

/// (name, population, latitude, longitude, 1-based country position)
const CITIES: &[(&str, i64, f64, f64, usize)] = &[
    ("Nova York", 8_419_000, 40.7128, -74.0060, 1),
    ("São Paulo", 12_300_000, -23.5505, -46.6333, 2),
    ("Paris", 2_148_000, 48.8566, 2.3522, 3),
    ("Tóquio", 13_960_000, 35.6762, 139.6503, 4),
    ("Lagos", 14_900_000, 6.5244, 3.3792, 5),
    ("Sydney", 5_312_000, -33.8688, 151.2093, 6),
    ("Buenos Aires", 2_890_000, -34.6037, -58.3816, 7),
    ("Berlim", 3_645_000, 52.5200, 13.4050, 8),
    ("Pequim", 21_540_000, 39.9042, 116.4074, 9),
    ("Cairo", 9_500_000, 30.0444, 31.2357, 10),
    ("Auckland", 1_657_000, -36.8509, 174.7645, 11),
    ("Toronto", 2_732_000, 43.6532, -79.3832, 12),
    ("Cidade do México", 9_200_000, 19.4326, -99.1332, 13),
    ("Roma", 2_873_000, 41.9028, 12.4964, 14),
    ("Mumbai", 12_480_000, 19.0760, 72.8777, 15),
    ("Cidade do Cabo", 4_337_000, -33.9249, 18.4241, 16),
    ("Santiago", 6_211_000, -33.4489, -70.6693, 17),
    ("Londres", 8_982_000, 51.5074, -0.1278, 18),
    ("Seul", 9_776_000, 37.5665, 126.9780, 19),
    ("Nairóbi", 4_397_000, -1.2864, 36.8172, 20),
];

/// Rows written by [`seed_catalog`]
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SeedSummary {
    pub continents: usize,
    pub countries: usize,
    pub cities: usize,
}

/// Insert the demonstration catalog unless continents already exist.
///
/// Parents are referenced by their position in the tables above and resolved to
/// the ids the store assigns, so seeding also works after earlier deletes. All
/// rows go in one transaction; a failure leaves the catalog empty.
pub async fn seed_catalog(db: &DbConnection) -> sqlx::Result<SeedSummary> {
    let continents = Repository::<Continent>::new(db.clone());
    if !continents.find_all().await?.is_empty() {
        info!("Catalog already populated, skipping seed");
        return Ok(SeedSummary::default());
    }

    let mut tx = db.pool().begin().await?;

    let mut continent_ids = Vec::with_capacity(CONTINENTS.len());
    for (name, description) in CONTINENTS {
        let created = Repository::<Continent>::insert_with(
            &mut *tx,
            &CreateContinentRequest {
                name: name.to_string(),
                description: description.to_string(),
            },
        )
        .await?;
        continent_ids.push(created.id);
    }

    let mut country_ids = Vec::with_capacity(COUNTRIES.len());
    for (name, language, coin, flag, population, continent) in COUNTRIES {
        let created = Repository::<Country>::insert_with(
            &mut *tx,
            &CreateCountryRequest {
                name: name.to_string(),
                language: language.to_string(),
                coin: coin.to_string(),
                flag: flag.to_string(),
                population: *population,
                continent_id: continent_ids[continent - 1],
            },
        )
        .await?;
        country_ids.push(created.id);
    }

    for (name, population, latitude, longitude, country) in CITIES {
        Repository::<City>::insert_with(
            &mut *tx,
            &CreateCityRequest {
                name: name.to_string(),
                population: *population,
                latitude: *latitude,
                longitude: *longitude,
                country_id: country_ids[country - 1],
            },
        )
        .await?;
    }

    tx.commit().await?;

    let summary = SeedSummary {
        continents: CONTINENTS.len(),
        countries: COUNTRIES.len(),
        cities: CITIES.len(),
    };
    info!(
        "Seeded {} continents, {} countries, {} cities",
        summary.continents, summary.countries, summary.cities
    );
    Ok(summary)
}

#[cfg(test)]
mod tests {
    use super::*;
    use shared::catalog::place_cities;

    #[test]
    fn test_parent_positions_are_in_range() {
        for (name, _, _, _, _, continent) in COUNTRIES {
            assert!((1..=CONTINENTS.len()).contains(continent), "{} has no continent", name);
        }
        for (name, _, _, _, country) in CITIES {
            assert!((1..=COUNTRIES.len()).contains(country), "{} has no country", name);
        }
    }

    #[tokio::test]
    async fn test_seed_populates_empty_database() {
        let db = DbConnection::init_test().await.expect("Failed to create test database");

        let summary = seed_catalog(&db).await.expect("Seeding failed");
        assert_eq!(summary, SeedSummary { continents: 20, countries: 20, cities: 20 });

        let continents = Repository::<Continent>::new(db.clone()).find_all().await.unwrap();
        let countries = Repository::<Country>::new(db.clone()).find_all().await.unwrap();
        let cities = Repository::<City>::new(db).find_all().await.unwrap();
        assert_eq!(continents.len(), 20);
        assert_eq!(countries.len(), 20);
        assert_eq!(cities.len(), 20);

        let placed = place_cities(&cities, &countries, &continents);
        let sao_paulo = placed.iter().find(|p| p.city.name == "São Paulo").unwrap();
        assert_eq!(sao_paulo.country_name.as_deref(), Some("Brasil"));
        assert_eq!(sao_paulo.continent_name.as_deref(), Some("América do Sul"));

        let nairobi = placed.iter().find(|p| p.city.name == "Nairóbi").unwrap();
        assert_eq!(nairobi.country_name.as_deref(), Some("Quênia"));
        assert_eq!(nairobi.continent_name.as_deref(), Some("África"));
    }

    #[tokio::test]
    async fn test_failed_seed_leaves_no_partial_catalog() {
        let db = DbConnection::init_test().await.expect("Failed to create test database");
        let (last_city, ..) = CITIES[CITIES.len() - 1];
        sqlx::query(&format!(
            "CREATE TRIGGER reject_city BEFORE INSERT ON cities WHEN NEW.cit_name = '{}' \
             BEGIN SELECT RAISE(ABORT, 'rejected'); END",
            last_city
        ))
        .execute(db.pool())
        .await
        .unwrap();

        assert!(seed_catalog(&db).await.is_err());
        assert!(Repository::<Continent>::new(db.clone()).find_all().await.unwrap().is_empty());
        assert!(Repository::<Country>::new(db.clone()).find_all().await.unwrap().is_empty());

        // The next boot sees an empty catalog and seeds it in full
        sqlx::query("DROP TRIGGER reject_city").execute(db.pool()).await.unwrap();
        let summary = seed_catalog(&db).await.unwrap();
        assert_eq!(summary.cities, CITIES.len());
    }

    #[tokio::test]
    async fn test_seed_skips_populated_database() {
        let db = DbConnection::init_test().await.expect("Failed to create test database");
        seed_catalog(&db).await.unwrap();

        let again = seed_catalog(&db).await.unwrap();
        assert_eq!(again, SeedSummary::default());

        let continents = Repository::<Continent>::new(db).find_all().await.unwrap();
        assert_eq!(continents.len(), 20);
    }
}
