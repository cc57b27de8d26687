//! Deterministic customer name generation using curated per-locale lists.
//!
//! Names follow the customer's home country so a German customer reads as
//! German. All generation is deterministic (same stream = same names).

use crate::rng::StreamRng;

/// Deterministic name generator using curated name lists
pub struct NameGenerator;

struct NameLists {
    first: &'static [&'static str],
    last: &'static [&'static str],
}

const ENGLISH: NameLists = NameLists {
    first: &[
        "James", "John", "Robert", "Michael", "William", "David", "Richard", "Joseph", "Thomas",
        "Daniel", "Matthew", "Andrew", "Ryan", "Ethan", "Noah", "Liam", "Owen", "Nathan", "Mary",
        "Patricia", "Jennifer", "Linda", "Elizabeth", "Sarah", "Emily", "Emma", "Olivia", "Chloe",
        "Hannah", "Grace", "Sophie", "Charlotte", "Megan", "Jessica", "Lauren", "Madison",
    ],
    last: &[
        "Smith", "Johnson", "Williams", "Brown", "Jones", "Miller", "Davis", "Wilson", "Anderson",
        "Taylor", "Thomas", "Moore", "Martin", "Lee", "Thompson", "White", "Harris", "Clark",
        "Lewis", "Walker", "Young", "King", "Wright", "Scott", "Green", "Baker", "Campbell",
        "Mitchell", "Roberts", "Evans", "Turner", "Murphy", "Cooper", "Reed", "MacDonald", "Tremblay",
    ],
};

const GERMAN: NameLists = NameLists {
    first: &[
        "Lukas", "Leon", "Finn", "Jonas", "Paul", "Felix", "Maximilian", "Tobias", "Jan", "Stefan",
        "Anna", "Lena", "Mia", "Hannah", "Laura", "Julia", "Sophie", "Katharina", "Sabine", "Jürgen",
    ],
    last: &[
        "Müller", "Schmidt", "Schneider", "Fischer", "Weber", "Meyer", "Wagner", "Becker", "Schulz",
        "Hoffmann", "Koch", "Richter", "Klein", "Wolf", "Schröder", "Neumann", "Zimmermann", "Krüger",
    ],
};

const FRENCH: NameLists = NameLists {
    first: &[
        "Louis", "Gabriel", "Jules", "Hugo", "Arthur", "Lucas", "Théo", "Raphaël", "Nathan", "Léo",
        "Emma", "Jade", "Louise", "Alice", "Chloé", "Léa", "Manon", "Camille", "Inès", "Zoé",
    ],
    last: &[
        "Martin", "Bernard", "Dubois", "Thomas", "Robert", "Richard", "Petit", "Durand", "Leroy",
        "Moreau", "Simon", "Laurent", "Lefèbvre", "Michel", "Garcia", "David", "Bertrand", "Roux",
    ],
};

impl NameGenerator {
    /// Generate a full name (first + last) for a customer living in `country`.
    pub fn generate_full_name(country: &str, rng: &mut StreamRng) -> (String, String) {
        let lists = Self::lists_for(country);
        let first = rng.pick(lists.first);
        let last = rng.pick(lists.last);
        (first.to_string(), last.to_string())
    }

    /// Login-style handle derived from a name, ASCII only.
    pub fn generate_user_name(first: &str, last: &str, rng: &mut StreamRng) -> String {
        let first = ascii_fold(first);
        let last = ascii_fold(last);
        match rng.next_u64_below(4) {
            0 => format!("{first}.{last}"),
            1 => format!("{}{last}", &first[..first.len().min(1)]),
            2 => format!("{first}_{last}"),
            _ => format!("{first}{}", rng.int_inclusive(1, 99)),
        }
    }

    fn lists_for(country: &str) -> &'static NameLists {
        match country {
            "Germany" | "Switzerland" => &GERMAN,
            "France" => &FRENCH,
            _ => &ENGLISH,
        }
    }
}

/// Lowercase ASCII rendering of a name; drops anything that can't be mapped.
pub fn ascii_fold(name: &str) -> String {
    let mut out = String::with_capacity(name.len());
    for c in name.chars().flat_map(char::to_lowercase) {
        match c {
            'a'..='z' | '0'..='9' => out.push(c),
            'ä' => out.push_str("ae"),
            'ö' => out.push_str("oe"),
            'ü' => out.push_str("ue"),
            'ß' => out.push_str("ss"),
            'à' | 'á' | 'â' => out.push('a'),
            'è' | 'é' | 'ê' | 'ë' => out.push('e'),
            'î' | 'ï' | 'í' => out.push('i'),
            'ô' | 'ó' => out.push('o'),
            'ù' | 'û' | 'ú' => out.push('u'),
            'ç' => out.push('c'),
            _ => {}
        }
    }
    out
}
