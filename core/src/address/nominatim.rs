//! OpenStreetMap Nominatim address provider.
//!
//! Looks up a real place in a major city of the requested country and
//! formats it with the same per-country layout as the local synthesizer.
//! Results are cached per (country, bucket) so repeated orders to the same
//! destination don't hammer the public endpoint.

use super::{
    formats::AddressParts, local::LocalAddressSynthesizer, AddressError, AddressProvider,
};
use crate::rng::StreamRng;
use serde::Deserialize;
use std::collections::HashMap;
use std::time::Duration;

#[derive(Debug, Clone)]
pub struct NominatimConfig {
    pub base_url: String,
    pub user_agent: String,
    pub timeout: Duration,
    /// Pause after a live fetch while the cache is still small.
    pub rate_limit_delay: Duration,
    /// No politeness pause once the cache holds this many entries.
    pub polite_below: usize,
    /// Cache key spread per country.
    pub cache_buckets: i64,
}

impl Default for NominatimConfig {
    fn default() -> Self {
        Self {
            base_url: "https://nominatim.openstreetmap.org/search".into(),
            user_agent: concat!("orderseed/", env!("CARGO_PKG_VERSION")).into(),
            timeout: Duration::from_secs(10),
            rate_limit_delay: Duration::from_secs(1),
            polite_below: 50,
            cache_buckets: 100,
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct NominatimPlace {
    #[serde(default)]
    pub display_name: String,
    #[serde(default)]
    pub address: NominatimAddress,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct NominatimAddress {
    pub house_number: Option<String>,
    pub road: Option<String>,
    pub city: Option<String>,
    pub town: Option<String>,
    pub village: Option<String>,
    pub county: Option<String>,
    pub state: Option<String>,
    pub postcode: Option<String>,
    pub country: Option<String>,
}

pub struct NominatimProvider {
    client: reqwest::blocking::Client,
    config: NominatimConfig,
    local: LocalAddressSynthesizer,
    cache: HashMap<(String, i64), String>,
}

impl NominatimProvider {
    pub fn new(config: NominatimConfig, local: LocalAddressSynthesizer) -> Result<Self, AddressError> {
        let client = reqwest::blocking::Client::builder()
            .user_agent(config.user_agent.clone())
            .timeout(config.timeout)
            .build()?;
        Ok(Self {
            client,
            config,
            local,
            cache: HashMap::new(),
        })
    }

    pub fn cached(&self) -> usize {
        self.cache.len()
    }

    fn fetch(&self, country: &str, rng: &mut StreamRng) -> Result<String, AddressError> {
        let query = search_query(country, rng);
        let places: Vec<NominatimPlace> = self
            .client
            .get(&self.config.base_url)
            .query(&[
                ("q", query.as_str()),
                ("format", "json"),
                ("limit", "1"),
                ("addressdetails", "1"),
            ])
            .send()?
            .error_for_status()?
            .json()?;
        let place = places
            .into_iter()
            .next()
            .ok_or_else(|| AddressError::NoResult(country.to_string()))?;
        format_place(&place, country, &self.local, rng)
    }
}

impl AddressProvider for NominatimProvider {
    fn name(&self) -> &'static str {
        "nominatim"
    }

    fn resolve(&mut self, country: &str, rng: &mut StreamRng) -> Result<String, AddressError> {
        let key = (country.to_string(), rng.int_inclusive(1, self.config.cache_buckets));
        if let Some(hit) = self.cache.get(&key) {
            return Ok(hit.clone());
        }
        let address = self.fetch(country, rng)?;
        self.cache.insert(key, address.clone());
        if self.cache.len() < self.config.polite_below {
            std::thread::sleep(self.config.rate_limit_delay);
        }
        Ok(address)
    }
}

/// Turn a Nominatim result into a shipping address for `country`.
///
/// Rejects results from another country and cities that are obviously
/// street names. Missing pieces are filled from the local tables.
pub fn format_place(
    place: &NominatimPlace,
    country: &str,
    local: &LocalAddressSynthesizer,
    rng: &mut StreamRng,
) -> Result<String, AddressError> {
    let addr = &place.address;

    if let Some(returned) = addr.country.as_deref().filter(|c| !c.is_empty()) {
        if !country_matches(country, returned) {
            return Err(AddressError::CountryMismatch {
                requested: country.to_string(),
                returned: returned.to_string(),
            });
        }
    }

    let city = addr
        .city
        .as_deref()
        .or(addr.town.as_deref())
        .or(addr.village.as_deref())
        .unwrap_or_default();
    if looks_like_street(city) {
        return Err(AddressError::SuspectCity(city.to_string()));
    }

    let street = match (addr.house_number.as_deref(), addr.road.as_deref()) {
        (Some(number), Some(road)) => format!("{number} {road}"),
        (None, Some(road)) => format!("{} {road}", local.house_number(country, rng)),
        _ => local.street_address(country, rng),
    };
    let city = if city.is_empty() {
        local.region_and_city(country, rng).1
    } else {
        city.to_string()
    };
    let region_field = if country == "United Kingdom" {
        addr.county.clone().or_else(|| addr.state.clone())
    } else {
        addr.state.clone()
    };
    let region = region_field.or_else(|| local.random_region(country, rng));
    let postal = match addr.postcode.clone() {
        Some(code) => code,
        None => local.postal_code(country, rng),
    };

    Ok(local.render(
        country,
        &AddressParts {
            street,
            city,
            region,
            postal,
        },
    ))
}

/// Nominatim often answers with native-language country names.
pub fn country_matches(requested: &str, returned: &str) -> bool {
    let requested = requested.to_lowercase();
    let returned = returned.to_lowercase();
    if requested.contains(&returned) || returned.contains(&requested) {
        return true;
    }
    let aliases: &[&str] = match requested.as_str() {
        "germany" => &["deutsch"],
        "italy" => &["ital"],
        "spain" => &["espa"],
        "japan" => &["日本"],
        "south korea" => &["korea", "한국", "대한"],
        "netherlands" => &["neder", "holland"],
        "switzerland" => &["schweiz", "suisse", "svizzera"],
        _ => &[],
    };
    aliases.iter().any(|alias| returned.contains(alias))
}

fn looks_like_street(city: &str) -> bool {
    const STREET_WORDS: &[&str] = &["strada", "via", "rue", "straße", "calle"];
    let lower = city.to_lowercase();
    STREET_WORDS.iter().any(|w| lower.contains(w))
}

/// Search string for a random major city of `country`.
fn search_query(country: &str, rng: &mut StreamRng) -> String {
    let cities: &[&str] = match country {
        "Canada" => &[
            "Toronto, Ontario", "Vancouver, British Columbia", "Montreal, Quebec",
            "Calgary, Alberta", "Ottawa, Ontario", "Edmonton, Alberta", "Winnipeg, Manitoba",
            "Quebec City, Quebec", "Mississauga, Ontario", "Hamilton, Ontario",
        ],
        "United States" => &[
            "New York, NY", "Los Angeles, CA", "Chicago, IL", "Houston, TX", "Phoenix, AZ",
            "Philadelphia, PA", "San Antonio, TX", "San Diego, CA", "Dallas, TX", "Austin, TX",
            "Jacksonville, FL", "Columbus, OH", "Charlotte, NC", "San Francisco, CA",
        ],
        "United Kingdom" => &[
            "London, England", "Manchester, England", "Birmingham, England", "Liverpool, England",
            "Leeds, England", "Bristol, England", "Glasgow, Scotland", "Edinburgh, Scotland",
            "Cardiff, Wales", "Belfast, Northern Ireland",
        ],
        "Germany" => &[
            "Berlin", "Hamburg", "München", "Köln", "Frankfurt", "Stuttgart", "Düsseldorf",
            "Leipzig", "Dresden", "Hannover",
        ],
        "France" => &[
            "Paris", "Marseille", "Lyon", "Toulouse", "Nice", "Nantes", "Strasbourg",
            "Montpellier", "Bordeaux", "Lille",
        ],
        "Italy" => &[
            "Rome, Lazio", "Milan, Lombardy", "Naples, Campania", "Turin, Piedmont",
            "Palermo, Sicily", "Bologna, Emilia-Romagna", "Florence, Tuscany", "Venice, Veneto",
        ],
        "Spain" => &[
            "Madrid, Community of Madrid", "Barcelona, Catalonia", "Valencia, Valencian Community",
            "Seville, Andalusia", "Zaragoza, Aragon", "Málaga, Andalusia", "Bilbao, Basque Country",
        ],
        "Japan" => &[
            "Tokyo, Tokyo", "Yokohama, Kanagawa", "Osaka, Osaka", "Nagoya, Aichi",
            "Sapporo, Hokkaido", "Fukuoka, Fukuoka", "Kobe, Hyogo", "Kyoto, Kyoto",
        ],
        "Australia" => &[
            "Sydney, New South Wales", "Melbourne, Victoria", "Brisbane, Queensland",
            "Perth, Western Australia", "Adelaide, South Australia",
            "Canberra, Australian Capital Territory", "Hobart, Tasmania",
        ],
        _ => return format!("major city, {country}"),
    };
    format!("{}, {country}", rng.pick(cities))
}
