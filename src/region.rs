//! Nigerian states and report regions

use crate::error::ValidationError;
use std::fmt;
use std::str::FromStr;

/// The 36 states plus the Federal Capital Territory, recorded as Abuja
pub const NIGERIAN_STATES: [&str; 37] = [
    "Abia",
    "Abuja",
    "Adamawa",
    "Akwa Ibom",
    "Anambra",
    "Bauchi",
    "Bayelsa",
    "Benue",
    "Borno",
    "Cross River",
    "Delta",
    "Ebonyi",
    "Edo",
    "Ekiti",
    "Enugu",
    "Gombe",
    "Imo",
    "Jigawa",
    "Kaduna",
    "Kano",
    "Katsina",
    "Kebbi",
    "Kogi",
    "Kwara",
    "Lagos",
    "Nasarawa",
    "Niger",
    "Ogun",
    "Ondo",
    "Osun",
    "Oyo",
    "Plateau",
    "Rivers",
    "Sokoto",
    "Taraba",
    "Yobe",
    "Zamfara",
];

/// Other names for the capital territory, stored as Abuja
const ABUJA_ALIASES: [&str; 2] = ["FCT", "Federal Capital Territory"];

/// Resolve a state name case-insensitively to its canonical spelling
pub fn canonical_state(name: &str) -> Option<&'static str> {
    let name = name.trim();
    if ABUJA_ALIASES.iter().any(|a| a.eq_ignore_ascii_case(name)) {
        return Some("Abuja");
    }
    NIGERIAN_STATES
        .iter()
        .copied()
        .find(|s| s.eq_ignore_ascii_case(name))
}

/// Geographic scope of a report
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Region {
    /// All of Nigeria
    All,
    /// A single state
    State(&'static str),
}

impl FromStr for Region {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.trim().eq_ignore_ascii_case("all") {
            return Ok(Region::All);
        }
        canonical_state(s)
            .map(Region::State)
            .ok_or_else(|| ValidationError::UnknownState(s.to_string()))
    }
}

impl fmt::Display for Region {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Region::All => f.write_str("all"),
            Region::State(name) => f.write_str(name),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_all() {
        assert_eq!("all".parse::<Region>().unwrap(), Region::All);
        assert_eq!("ALL".parse::<Region>().unwrap(), Region::All);
    }

    #[test]
    fn test_parse_state_case_insensitive() {
        assert_eq!("lagos".parse::<Region>().unwrap(), Region::State("Lagos"));
        assert_eq!(
            "cross river".parse::<Region>().unwrap(),
            Region::State("Cross River")
        );
    }

    #[test]
    fn test_capital_territory_aliases() {
        assert_eq!(canonical_state("FCT"), Some("Abuja"));
        assert_eq!(canonical_state(" fct "), Some("Abuja"));
        assert_eq!(canonical_state("federal capital territory"), Some("Abuja"));
        assert_eq!("Fct".parse::<Region>().unwrap(), Region::State("Abuja"));
    }

    #[test]
    fn test_unknown_state() {
        let err = "Atlantis".parse::<Region>().unwrap_err();
        assert_eq!(err, ValidationError::UnknownState("Atlantis".to_string()));
    }

    #[test]
    fn test_display() {
        assert_eq!(Region::All.to_string(), "all");
        assert_eq!(Region::State("Oyo").to_string(), "Oyo");
    }

    #[test]
    fn test_states_sorted_and_unique() {
        let mut sorted = NIGERIAN_STATES.to_vec();
        sorted.sort();
        sorted.dedup();
        assert_eq!(sorted.len(), NIGERIAN_STATES.len());
        assert_eq!(sorted, NIGERIAN_STATES.to_vec());
    }
}
