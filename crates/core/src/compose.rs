//! Name and address composition.
//!
//! Property and tenant forms edit names and addresses as separate parts but older records hold
//! them as single strings. These functions convert between the two. They are pure.
//!
//! Splitting a composed string is lossy: a blank middle name and a middle name that was never
//! set both come back as `None`, and a composed address cannot be split at all. Only
//! `split_name(compose_name(..))` is guaranteed to round-trip, and only for single-token parts.

use crate::constants::ADDRESS_SEPARATOR;
use serde::{Deserialize, Serialize};

/// The parts of a person's name.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NameParts {
    pub first: String,
    pub middle: Option<String>,
    pub last: Option<String>,
}

/// Split a full name on whitespace.
///
/// One token is a first name; two are first and last; with three or more the first and last
/// tokens are first and last name and everything between is the middle name, joined with
/// single spaces.
pub fn split_name(full_name: &str) -> NameParts {
    let tokens: Vec<&str> = full_name.split_whitespace().collect();
    match tokens.as_slice() {
        [] => NameParts::default(),
        [first] => NameParts {
            first: (*first).to_owned(),
            middle: None,
            last: None,
        },
        [first, last] => NameParts {
            first: (*first).to_owned(),
            middle: None,
            last: Some((*last).to_owned()),
        },
        [first, middle @ .., last] => NameParts {
            first: (*first).to_owned(),
            middle: Some(middle.join(" ")),
            last: Some((*last).to_owned()),
        },
    }
}

/// Join name parts into a display name, skipping blank middle and last names.
pub fn compose_name(first: &str, middle: Option<&str>, last: Option<&str>) -> String {
    let mut name = first.trim().to_owned();
    for part in [middle, last].into_iter().flatten() {
        let part = part.trim();
        if !part.is_empty() {
            name.push(' ');
            name.push_str(part);
        }
    }
    name.trim().to_owned()
}

impl NameParts {
    pub fn compose(&self) -> String {
        compose_name(&self.first, self.middle.as_deref(), self.last.as_deref())
    }
}

/// The parts of a postal address, in display order.
///
/// `barangay` is the sub-area below city level; `province` doubles as state.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AddressParts {
    #[serde(default)]
    pub full_address: Option<String>,
    #[serde(default)]
    pub unit: String,
    #[serde(default)]
    pub street: String,
    #[serde(default)]
    pub barangay: String,
    #[serde(default)]
    pub city: String,
    #[serde(default)]
    pub province: String,
    #[serde(default)]
    pub postal_code: String,
}

impl AddressParts {
    /// A non-blank `full_address` wins verbatim; otherwise the non-blank parts are joined with
    /// `", "` in fixed order.
    pub fn compose(&self) -> String {
        if let Some(full) = self.full_address.as_deref() {
            if !full.trim().is_empty() {
                return full.to_owned();
            }
        }

        [
            &self.unit,
            &self.street,
            &self.barangay,
            &self.city,
            &self.province,
            &self.postal_code,
        ]
        .into_iter()
        .map(|part| part.trim())
        .filter(|part| !part.is_empty())
        .collect::<Vec<_>>()
        .join(ADDRESS_SEPARATOR)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn split_single_token_is_first_name_only() {
        assert_eq!(
            split_name("  Cher "),
            NameParts {
                first: "Cher".into(),
                middle: None,
                last: None
            }
        );
    }

    #[test]
    fn split_two_tokens() {
        let parts = split_name("Jane Doe");
        assert_eq!(parts.first, "Jane");
        assert_eq!(parts.middle, None);
        assert_eq!(parts.last.as_deref(), Some("Doe"));
    }

    #[test]
    fn split_many_tokens_collapses_middle() {
        let parts = split_name("Maria  Clara   de los   Santos");
        assert_eq!(parts.first, "Maria");
        assert_eq!(parts.middle.as_deref(), Some("Clara de los"));
        assert_eq!(parts.last.as_deref(), Some("Santos"));
    }

    #[test]
    fn split_blank_is_empty() {
        assert_eq!(split_name("   "), NameParts::default());
    }

    #[test]
    fn compose_skips_blank_parts() {
        assert_eq!(compose_name(" Jane ", Some("  "), Some(" Doe")), "Jane Doe");
        assert_eq!(compose_name("Jane", None, None), "Jane");
        assert_eq!(compose_name("Jane", Some("Q"), None), "Jane Q");
    }

    #[test]
    fn split_of_compose_round_trips_single_token_parts() {
        let cases = [
            ("Jane", None, None),
            ("Jane", None, Some("Doe")),
            ("Jane", Some("Quinn"), Some("Doe")),
        ];
        for (first, middle, last) in cases {
            let parts = split_name(&compose_name(first, middle, last));
            assert_eq!(parts.first, first);
            assert_eq!(parts.middle.as_deref(), middle);
            assert_eq!(parts.last.as_deref(), last);
        }
    }

    #[test]
    fn address_join_omits_blanks() {
        let address = AddressParts {
            street: "Main St".into(),
            city: "Metro".into(),
            ..Default::default()
        };
        assert_eq!(address.compose(), "Main St, Metro");
    }

    #[test]
    fn address_join_keeps_fixed_order() {
        let address = AddressParts {
            unit: "Unit 4B".into(),
            street: "12 Rizal Ave".into(),
            barangay: "San Isidro".into(),
            city: "Makati".into(),
            province: "Metro Manila".into(),
            postal_code: "1200".into(),
            ..Default::default()
        };
        assert_eq!(
            address.compose(),
            "Unit 4B, 12 Rizal Ave, San Isidro, Makati, Metro Manila, 1200"
        );
    }

    #[test]
    fn explicit_full_address_wins_unless_blank() {
        let mut address = AddressParts {
            full_address: Some("Lot 7, Phase 2".into()),
            street: "ignored".into(),
            ..Default::default()
        };
        assert_eq!(address.compose(), "Lot 7, Phase 2");

        address.full_address = Some("   ".into());
        assert_eq!(address.compose(), "ignored");
    }

    #[test]
    fn all_blank_address_is_empty() {
        assert_eq!(AddressParts::default().compose(), "");
    }
}
