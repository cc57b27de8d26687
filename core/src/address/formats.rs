//! Per-country address formatting strategies.
//!
//! Each supported country maps to one `CountryFormat`: the field order of
//! the rendered address, how street lines look, postal and phone patterns,
//! and a pool of regions with their cities. Adding a country means adding
//! a table entry; the synthesizer never branches on country names.
//!
//! Patterns: `#` is a digit, `?` an uppercase letter, anything else literal.

/// Field order of a rendered shipping address.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AddressLayout {
    /// `{street}, {city}, {region} {postal}, {label}`
    RegionPostal,
    /// `{street}, {postal} {city}, {region}, {label}`
    PostalCity,
    /// `{street}, {city}, {region}, {postal}, {label}`
    RegionThenPostal,
    /// `{street}, {city}, {postal}, {label}`
    Generic,
}

/// Parts of an address before layout is applied.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AddressParts {
    pub street: String,
    pub city: String,
    pub region: Option<String>,
    pub postal: String,
}

impl AddressLayout {
    pub fn render(&self, parts: &AddressParts, label: &str) -> String {
        let AddressParts {
            street,
            city,
            region,
            postal,
        } = parts;
        match (self, region) {
            (Self::RegionPostal, Some(region)) => {
                format!("{street}, {city}, {region} {postal}, {label}")
            }
            (Self::PostalCity, Some(region)) => {
                format!("{street}, {postal} {city}, {region}, {label}")
            }
            (Self::RegionThenPostal, Some(region)) => {
                format!("{street}, {city}, {region}, {postal}, {label}")
            }
            _ => format!("{street}, {city}, {postal}, {label}"),
        }
    }
}

/// How a street line is assembled from a name, a kind and a number.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StreetTemplate {
    /// `123 Maple Street`
    NumberNameKind,
    /// `Hauptstraße 12` (kind glued to the name)
    NameKindNumber,
    /// `14 rue Victor Hugo`
    NumberKindName,
    /// `Via Roma 8`
    KindNameNumber,
    /// `Shibuya 2-14-3`
    Block,
}

#[derive(Debug, Clone, Copy)]
pub struct StreetFormat {
    pub template: StreetTemplate,
    pub names: &'static [&'static str],
    pub kinds: &'static [&'static str],
    pub number_max: i64,
}

#[derive(Debug, Clone, Copy)]
pub struct Region {
    pub name: &'static str,
    pub cities: &'static [&'static str],
}

#[derive(Debug, Clone, Copy)]
pub struct CountryFormat {
    /// Name used by the configuration tables ("United States").
    pub country: &'static str,
    /// Name printed at the end of an address ("USA").
    pub label: &'static str,
    pub layout: AddressLayout,
    pub street: StreetFormat,
    pub postal_patterns: &'static [&'static str],
    pub phone_pattern: &'static str,
    pub regions: &'static [Region],
    /// Domains used for generated email addresses.
    pub email_domains: &'static [&'static str],
}

const EN_STREETS: &[&str] = &[
    "Maple", "Oak", "Cedar", "Pine", "Elm", "Main", "King", "Queen", "Church", "Park",
    "Lakeview", "Hillcrest", "Victoria", "Wellington", "Highland", "River", "Sunset", "Willow",
];
const EN_KINDS: &[&str] = &["Street", "Avenue", "Road", "Drive", "Lane", "Boulevard", "Way", "Crescent"];
const UK_KINDS: &[&str] = &["Street", "Road", "Lane", "Close", "Gardens", "Terrace", "Grove", "Mews"];
const DE_STREETS: &[&str] = &[
    "Haupt", "Bahnhof", "Schiller", "Goethe", "Garten", "Linden", "Berg", "Kirch", "Wald",
    "Mozart", "Rosen", "Friedrich",
];
const DE_KINDS: &[&str] = &["straße", "weg", "allee", "gasse", "ring"];
const NL_STREETS: &[&str] = &["Kerk", "Molen", "Dorps", "School", "Prinsen", "Heren", "Keizers", "Linden"];
const NL_KINDS: &[&str] = &["straat", "weg", "laan", "gracht", "plein"];
const FR_STREETS: &[&str] = &[
    "Victor Hugo", "de la République", "Jean Jaurès", "Pasteur", "de la Paix", "du Moulin",
    "des Lilas", "Gambetta", "de Verdun", "Voltaire",
];
const FR_KINDS: &[&str] = &["rue", "avenue", "boulevard", "place", "chemin"];
const IT_STREETS: &[&str] = &[
    "Roma", "Garibaldi", "Mazzini", "Cavour", "Dante", "Verdi", "Marconi", "Matteotti", "Vittorio Veneto",
];
const IT_KINDS: &[&str] = &["Via", "Viale", "Piazza", "Corso"];
const ES_STREETS: &[&str] = &[
    "Mayor", "de Alcalá", "del Sol", "de la Constitución", "de Cervantes", "Real", "de San Juan",
    "del Carmen",
];
const ES_KINDS: &[&str] = &["Calle", "Avenida", "Paseo", "Plaza"];
const JP_DISTRICTS: &[&str] = &["Shibuya", "Shinjuku", "Minato", "Chuo", "Nakano", "Kita", "Naka", "Higashi"];
const KR_STREETS: &[&str] = &["Sejong-daero", "Teheran-ro", "Jong-ro", "Hangang-daero", "Dongho-ro", "Gangnam-daero"];
const NO_KINDS: &[&str] = &[""];

pub const GENERIC_STREET: StreetFormat = StreetFormat {
    template: StreetTemplate::NumberNameKind,
    names: EN_STREETS,
    kinds: EN_KINDS,
    number_max: 9999,
};
pub const GENERIC_CITIES: &[&str] = &["Capital City", "Port Town", "Riverside", "Northfield", "Lakeside"];
pub const GENERIC_POSTAL: &[&str] = &["#####"];
pub const GENERIC_PHONE: &str = "+1 ### ### ####";
pub const GENERIC_DOMAINS: &[&str] = &["example.com", "mail.com", "inbox.net"];

pub static COUNTRY_FORMATS: &[CountryFormat] = &[
    CountryFormat {
        country: "Canada",
        label: "Canada",
        layout: AddressLayout::RegionPostal,
        street: StreetFormat {
            template: StreetTemplate::NumberNameKind,
            names: EN_STREETS,
            kinds: EN_KINDS,
            number_max: 9999,
        },
        postal_patterns: &["?#? #?#"],
        phone_pattern: "(###) ###-####",
        regions: &[
            Region { name: "ON", cities: &["Toronto", "Ottawa", "Mississauga", "Brampton", "Hamilton"] },
            Region { name: "BC", cities: &["Vancouver", "Surrey", "Burnaby", "Richmond"] },
            Region { name: "AB", cities: &["Calgary", "Edmonton", "Red Deer"] },
            Region { name: "QC", cities: &["Montreal", "Quebec City", "Laval", "Gatineau"] },
            Region { name: "MB", cities: &["Winnipeg"] },
            Region { name: "NS", cities: &["Halifax"] },
            Region { name: "SK", cities: &["Saskatoon", "Regina"] },
        ],
        email_domains: &["gmail.com", "outlook.com", "rogers.com", "shaw.ca", "sympatico.ca"],
    },
    CountryFormat {
        country: "United States",
        label: "USA",
        layout: AddressLayout::RegionPostal,
        street: StreetFormat {
            template: StreetTemplate::NumberNameKind,
            names: EN_STREETS,
            kinds: EN_KINDS,
            number_max: 99999,
        },
        postal_patterns: &["#####"],
        phone_pattern: "(###) ###-####",
        regions: &[
            Region { name: "CA", cities: &["Los Angeles", "San Francisco", "San Diego", "San Jose"] },
            Region { name: "NY", cities: &["New York", "Buffalo", "Rochester", "Syracuse"] },
            Region { name: "TX", cities: &["Houston", "Dallas", "Austin", "San Antonio"] },
            Region { name: "FL", cities: &["Miami", "Orlando", "Tampa", "Jacksonville"] },
            Region { name: "IL", cities: &["Chicago"] },
            Region { name: "AZ", cities: &["Phoenix"] },
            Region { name: "PA", cities: &["Philadelphia"] },
        ],
        email_domains: &["gmail.com", "yahoo.com", "outlook.com", "aol.com", "icloud.com"],
    },
    CountryFormat {
        country: "United Kingdom",
        label: "United Kingdom",
        layout: AddressLayout::RegionThenPostal,
        street: StreetFormat {
            template: StreetTemplate::NumberNameKind,
            names: EN_STREETS,
            kinds: UK_KINDS,
            number_max: 250,
        },
        postal_patterns: &["?# #??", "?## #??", "??# #??", "??## #??"],
        phone_pattern: "+44 #### ######",
        regions: &[
            Region {
                name: "England",
                cities: &["London", "Manchester", "Birmingham", "Liverpool", "Leeds", "Bristol"],
            },
            Region { name: "Scotland", cities: &["Glasgow", "Edinburgh"] },
            Region { name: "Wales", cities: &["Cardiff", "Swansea"] },
            Region { name: "Northern Ireland", cities: &["Belfast"] },
        ],
        email_domains: &["gmail.com", "btinternet.com", "hotmail.co.uk", "sky.com"],
    },
    CountryFormat {
        country: "Germany",
        label: "Germany",
        layout: AddressLayout::PostalCity,
        street: StreetFormat {
            template: StreetTemplate::NameKindNumber,
            names: DE_STREETS,
            kinds: DE_KINDS,
            number_max: 180,
        },
        postal_patterns: &["#####"],
        phone_pattern: "+49 ### #######",
        regions: &[
            Region { name: "Baden-Württemberg", cities: &["Stuttgart", "Karlsruhe", "Mannheim"] },
            Region { name: "Bayern", cities: &["München", "Nürnberg", "Augsburg"] },
            Region { name: "Berlin", cities: &["Berlin"] },
            Region { name: "Hamburg", cities: &["Hamburg"] },
            Region { name: "Hessen", cities: &["Frankfurt", "Wiesbaden"] },
            Region { name: "Nordrhein-Westfalen", cities: &["Köln", "Düsseldorf", "Dortmund", "Essen"] },
            Region { name: "Sachsen", cities: &["Leipzig", "Dresden"] },
        ],
        email_domains: &["web.de", "gmx.de", "t-online.de", "gmail.com"],
    },
    CountryFormat {
        country: "France",
        label: "France",
        layout: AddressLayout::PostalCity,
        street: StreetFormat {
            template: StreetTemplate::NumberKindName,
            names: FR_STREETS,
            kinds: FR_KINDS,
            number_max: 150,
        },
        postal_patterns: &["#####"],
        phone_pattern: "+33 # ## ## ## ##",
        regions: &[
            Region { name: "Île-de-France", cities: &["Paris"] },
            Region { name: "Provence-Alpes-Côte d'Azur", cities: &["Marseille", "Nice"] },
            Region { name: "Auvergne-Rhône-Alpes", cities: &["Lyon"] },
            Region { name: "Occitanie", cities: &["Toulouse", "Montpellier"] },
            Region { name: "Hauts-de-France", cities: &["Lille"] },
            Region { name: "Nouvelle-Aquitaine", cities: &["Bordeaux"] },
        ],
        email_domains: &["orange.fr", "free.fr", "laposte.net", "gmail.com"],
    },
    CountryFormat {
        country: "Italy",
        label: "Italy",
        layout: AddressLayout::PostalCity,
        street: StreetFormat {
            template: StreetTemplate::KindNameNumber,
            names: IT_STREETS,
            kinds: IT_KINDS,
            number_max: 200,
        },
        postal_patterns: &["#####"],
        phone_pattern: "+39 ### #######",
        regions: &[
            Region { name: "Lazio", cities: &["Rome"] },
            Region { name: "Lombardy", cities: &["Milan"] },
            Region { name: "Campania", cities: &["Naples"] },
            Region { name: "Piedmont", cities: &["Turin"] },
            Region { name: "Sicily", cities: &["Palermo", "Catania"] },
            Region { name: "Emilia-Romagna", cities: &["Bologna"] },
            Region { name: "Tuscany", cities: &["Florence"] },
        ],
        email_domains: &["libero.it", "virgilio.it", "gmail.com"],
    },
    CountryFormat {
        country: "Spain",
        label: "Spain",
        layout: AddressLayout::PostalCity,
        street: StreetFormat {
            template: StreetTemplate::KindNameNumber,
            names: ES_STREETS,
            kinds: ES_KINDS,
            number_max: 200,
        },
        postal_patterns: &["#####"],
        phone_pattern: "+34 ### ### ###",
        regions: &[
            Region { name: "Community of Madrid", cities: &["Madrid"] },
            Region { name: "Catalonia", cities: &["Barcelona"] },
            Region { name: "Valencian Community", cities: &["Valencia"] },
            Region { name: "Andalusia", cities: &["Seville", "Málaga"] },
        ],
        email_domains: &["telefonica.net", "hotmail.es", "gmail.com"],
    },
    CountryFormat {
        country: "Japan",
        label: "Japan",
        layout: AddressLayout::RegionThenPostal,
        street: StreetFormat {
            template: StreetTemplate::Block,
            names: JP_DISTRICTS,
            kinds: NO_KINDS,
            number_max: 30,
        },
        postal_patterns: &["###-####"],
        phone_pattern: "+81 ##-####-####",
        regions: &[
            Region { name: "Tokyo", cities: &["Tokyo"] },
            Region { name: "Kanagawa", cities: &["Yokohama", "Kawasaki"] },
            Region { name: "Osaka", cities: &["Osaka", "Sakai"] },
            Region { name: "Aichi", cities: &["Nagoya"] },
            Region { name: "Hokkaido", cities: &["Sapporo"] },
        ],
        email_domains: &["docomo.ne.jp", "yahoo.co.jp", "gmail.com"],
    },
    CountryFormat {
        country: "Australia",
        label: "Australia",
        layout: AddressLayout::RegionThenPostal,
        street: StreetFormat {
            template: StreetTemplate::NumberNameKind,
            names: EN_STREETS,
            kinds: EN_KINDS,
            number_max: 500,
        },
        postal_patterns: &["####"],
        phone_pattern: "+61 # #### ####",
        regions: &[
            Region { name: "New South Wales", cities: &["Sydney"] },
            Region { name: "Victoria", cities: &["Melbourne"] },
            Region { name: "Queensland", cities: &["Brisbane", "Gold Coast"] },
            Region { name: "Western Australia", cities: &["Perth"] },
            Region { name: "South Australia", cities: &["Adelaide"] },
            Region { name: "Australian Capital Territory", cities: &["Canberra"] },
        ],
        email_domains: &["bigpond.com", "optusnet.com.au", "gmail.com"],
    },
    CountryFormat {
        country: "Netherlands",
        label: "Netherlands",
        layout: AddressLayout::RegionThenPostal,
        street: StreetFormat {
            template: StreetTemplate::NameKindNumber,
            names: NL_STREETS,
            kinds: NL_KINDS,
            number_max: 300,
        },
        postal_patterns: &["#### ??"],
        phone_pattern: "+31 ## ### ####",
        regions: &[
            Region { name: "North Holland", cities: &["Amsterdam"] },
            Region { name: "South Holland", cities: &["Rotterdam", "The Hague"] },
            Region { name: "Utrecht", cities: &["Utrecht"] },
            Region { name: "North Brabant", cities: &["Eindhoven"] },
        ],
        email_domains: &["ziggo.nl", "kpnmail.nl", "gmail.com"],
    },
    CountryFormat {
        country: "Switzerland",
        label: "Switzerland",
        layout: AddressLayout::RegionThenPostal,
        street: StreetFormat {
            template: StreetTemplate::NameKindNumber,
            names: DE_STREETS,
            kinds: DE_KINDS,
            number_max: 120,
        },
        postal_patterns: &["####"],
        phone_pattern: "+41 ## ### ## ##",
        regions: &[
            Region { name: "Zürich", cities: &["Zurich"] },
            Region { name: "Geneva", cities: &["Geneva"] },
            Region { name: "Basel-Stadt", cities: &["Basel"] },
            Region { name: "Bern", cities: &["Bern"] },
            Region { name: "Vaud", cities: &["Lausanne"] },
        ],
        email_domains: &["bluewin.ch", "gmx.ch", "gmail.com"],
    },
    CountryFormat {
        country: "South Korea",
        label: "South Korea",
        layout: AddressLayout::RegionThenPostal,
        street: StreetFormat {
            template: StreetTemplate::NumberNameKind,
            names: KR_STREETS,
            kinds: NO_KINDS,
            number_max: 400,
        },
        postal_patterns: &["#####"],
        phone_pattern: "+82 ##-####-####",
        regions: &[
            Region { name: "Seoul", cities: &["Seoul"] },
            Region { name: "Busan", cities: &["Busan"] },
            Region { name: "Incheon", cities: &["Incheon"] },
        ],
        email_domains: &["naver.com", "daum.net", "gmail.com"],
    },
];
