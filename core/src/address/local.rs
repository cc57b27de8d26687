//! Local address synthesizer.
//!
//! Builds addresses purely from the country format tables and the caller's
//! rng stream. Two calls with the same country and equally seeded streams
//! yield the same string.

use super::formats::{
    AddressParts, CountryFormat, StreetFormat, StreetTemplate, COUNTRY_FORMATS, GENERIC_CITIES,
    GENERIC_DOMAINS, GENERIC_PHONE, GENERIC_POSTAL, GENERIC_STREET,
};
use crate::rng::StreamRng;
use std::collections::HashMap;

#[derive(Debug, Clone)]
pub struct LocalAddressSynthesizer {
    formats: HashMap<String, CountryFormat>,
}

impl Default for LocalAddressSynthesizer {
    fn default() -> Self {
        Self::standard()
    }
}

impl LocalAddressSynthesizer {
    /// Synthesizer loaded with every built-in country format.
    pub fn standard() -> Self {
        let mut synth = Self {
            formats: HashMap::new(),
        };
        for format in COUNTRY_FORMATS {
            synth.register(*format);
        }
        synth
    }

    /// Add or replace the format used for `format.country`.
    pub fn register(&mut self, format: CountryFormat) {
        self.formats.insert(format.country.to_string(), format);
    }

    pub fn format_for(&self, country: &str) -> Option<&CountryFormat> {
        self.formats.get(country)
    }

    /// Full shipping address for `country`. Unknown countries get
    /// `"{street}, {city}, {postal}, {country}"`.
    pub fn synthesize(&self, country: &str, rng: &mut StreamRng) -> String {
        let street = self.street_address(country, rng);
        let postal = self.postal_code(country, rng);
        let (region, city) = self.region_and_city(country, rng);
        self.render(
            country,
            &AddressParts {
                street,
                city,
                region,
                postal,
            },
        )
    }

    /// Apply the country's layout to already-resolved parts.
    pub fn render(&self, country: &str, parts: &AddressParts) -> String {
        match self.format_for(country) {
            Some(format) => format.layout.render(parts, format.label),
            None => super::formats::AddressLayout::Generic.render(parts, country),
        }
    }

    pub fn street_address(&self, country: &str, rng: &mut StreamRng) -> String {
        let street = self
            .format_for(country)
            .map(|f| f.street)
            .unwrap_or(GENERIC_STREET);
        render_street(&street, rng)
    }

    /// A plausible house number for the country's street style.
    pub fn house_number(&self, country: &str, rng: &mut StreamRng) -> String {
        let max = self
            .format_for(country)
            .map(|f| f.street.number_max)
            .unwrap_or(GENERIC_STREET.number_max);
        rng.int_inclusive(1, max).to_string()
    }

    pub fn postal_code(&self, country: &str, rng: &mut StreamRng) -> String {
        let patterns = self
            .format_for(country)
            .map(|f| f.postal_patterns)
            .unwrap_or(GENERIC_POSTAL);
        fill_pattern(*rng.pick(patterns), rng)
    }

    pub fn phone_number(&self, country: &str, rng: &mut StreamRng) -> String {
        let pattern = self
            .format_for(country)
            .map(|f| f.phone_pattern)
            .unwrap_or(GENERIC_PHONE);
        fill_pattern(pattern, rng)
    }

    pub fn email_domain(&self, country: &str, rng: &mut StreamRng) -> &'static str {
        let domains = self
            .format_for(country)
            .map(|f| f.email_domains)
            .unwrap_or(GENERIC_DOMAINS);
        *rng.pick(domains)
    }

    pub fn random_region(&self, country: &str, rng: &mut StreamRng) -> Option<String> {
        let format = self.format_for(country)?;
        Some(rng.pick(format.regions).name.to_string())
    }

    /// Region (when the country has a table) and a city inside it.
    pub fn region_and_city(&self, country: &str, rng: &mut StreamRng) -> (Option<String>, String) {
        match self.format_for(country) {
            Some(format) => {
                let region = rng.pick(format.regions);
                let city = rng.pick(region.cities);
                (Some(region.name.to_string()), city.to_string())
            }
            None => (None, rng.pick(GENERIC_CITIES).to_string()),
        }
    }
}

fn render_street(street: &StreetFormat, rng: &mut StreamRng) -> String {
    let number = rng.int_inclusive(1, street.number_max);
    let name = rng.pick(street.names);
    let kind = rng.pick(street.kinds);
    let line = match street.template {
        StreetTemplate::NumberNameKind => format!("{number} {name} {kind}"),
        StreetTemplate::NameKindNumber => format!("{name}{kind} {number}"),
        StreetTemplate::NumberKindName => format!("{number} {kind} {name}"),
        StreetTemplate::KindNameNumber => format!("{kind} {name} {number}"),
        StreetTemplate::Block => {
            let block = rng.int_inclusive(1, 20);
            let unit = rng.int_inclusive(1, 40);
            format!("{name} {number}-{block}-{unit}")
        }
    };
    line.trim().to_string()
}

/// Expand `#` to a digit and `?` to an uppercase letter.
fn fill_pattern(pattern: &str, rng: &mut StreamRng) -> String {
    pattern
        .chars()
        .map(|c| match c {
            '#' => char::from(b'0' + rng.next_u64_below(10) as u8),
            '?' => char::from(b'A' + rng.next_u64_below(26) as u8),
            other => other,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rng::{RngBank, StreamSlot};

    fn rng(seed: u64) -> StreamRng {
        RngBank::new(seed).for_stream(StreamSlot::Addresses)
    }

    #[test]
    fn canadian_postal_code_shape() {
        let synth = LocalAddressSynthesizer::standard();
        let mut rng = rng(4);
        for _ in 0..50 {
            let code = synth.postal_code("Canada", &mut rng);
            let chars: Vec<char> = code.chars().collect();
            assert_eq!(chars.len(), 7, "{code}");
            assert!(chars[0].is_ascii_uppercase() && chars[1].is_ascii_digit());
            assert_eq!(chars[3], ' ');
        }
    }

    #[test]
    fn us_addresses_end_with_usa() {
        let synth = LocalAddressSynthesizer::standard();
        let mut rng = rng(8);
        for _ in 0..20 {
            let address = synth.synthesize("United States", &mut rng);
            assert!(address.ends_with(", USA"), "{address}");
            assert_eq!(address.split(", ").count(), 4, "{address}");
        }
    }

    #[test]
    fn german_addresses_put_postal_code_before_city() {
        let synth = LocalAddressSynthesizer::standard();
        let mut rng = rng(15);
        let address = synth.synthesize("Germany", &mut rng);
        let fields: Vec<&str> = address.split(", ").collect();
        assert_eq!(fields.len(), 4, "{address}");
        let (postal, _city) = fields[1].split_once(' ').unwrap();
        assert_eq!(postal.len(), 5);
        assert!(postal.chars().all(|c| c.is_ascii_digit()));
        assert_eq!(fields[3], "Germany");
    }

    #[test]
    fn unknown_country_uses_generic_layout() {
        let synth = LocalAddressSynthesizer::standard();
        let address = synth.synthesize("Atlantis", &mut rng(16));
        let fields: Vec<&str> = address.split(", ").collect();
        assert_eq!(fields.len(), 4, "{address}");
        assert_eq!(fields[3], "Atlantis");
        assert!(GENERIC_CITIES.contains(&fields[1]));
    }

    #[test]
    fn street_lines_have_no_stray_whitespace() {
        let synth = LocalAddressSynthesizer::standard();
        let mut rng = rng(23);
        for _ in 0..50 {
            let street = synth.street_address("South Korea", &mut rng);
            assert_eq!(street, street.trim());
            assert!(!street.contains("  "));
        }
    }

    #[test]
    fn registered_format_replaces_builtin() {
        let mut synth = LocalAddressSynthesizer::standard();
        let mut format = *synth.format_for("Canada").unwrap();
        format.label = "CA";
        synth.register(format);
        let address = synth.synthesize("Canada", &mut rng(42));
        assert!(address.ends_with(", CA"), "{address}");
    }

    #[test]
    fn email_domains_come_from_the_country_table() {
        let synth = LocalAddressSynthesizer::standard();
        let mut rng = rng(15);
        let german = synth.format_for("Germany").unwrap().email_domains;
        for _ in 0..50 {
            assert!(german.contains(&synth.email_domain("Germany", &mut rng)));
            assert!(GENERIC_DOMAINS.contains(&synth.email_domain("Atlantis", &mut rng)));
            let code = synth.postal_code("Atlantis", &mut rng);
            assert!(code.len() == 5 && code.chars().all(|c| c.is_ascii_digit()), "{code}");
        }
    }
}
