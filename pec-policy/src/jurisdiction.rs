//! Aggregate region expansion and location admissibility.

use std::collections::BTreeSet;

use pec_primitives::DataResidency;

const EU_MEMBERS: [&str; 27] = [
    "AT", "BE", "BG", "HR", "CY", "CZ", "DK", "EE", "FI", "FR", "DE", "GR", "HU", "IE", "IT",
    "LV", "LT", "LU", "MT", "NL", "PL", "PT", "RO", "SK", "SI", "ES", "SE",
];

const EEA_NON_EU: [&str; 3] = ["IS", "LI", "NO"];

/// Countries holding an EU adequacy decision.
const ADEQUACY_DECISIONS: [&str; 14] = [
    "AD", "AR", "CA", "CH", "FO", "GB", "GG", "IL", "IM", "JE", "JP", "KR", "NZ", "UY",
];

/// Shorthand codes denoting a union of concrete location codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AggregateRegion {
    /// European Union member states.
    Eu,
    /// European Economic Area: the EU plus Iceland, Liechtenstein and Norway.
    Eea,
    /// The EEA plus every country holding an adequacy decision.
    Adequacy,
}

impl AggregateRegion {
    /// Recognises an aggregate code, ignoring case and surrounding whitespace.
    #[must_use]
    pub fn from_code(code: &str) -> Option<Self> {
        match code.trim().to_ascii_uppercase().as_str() {
            "EU" => Some(Self::Eu),
            "EEA" => Some(Self::Eea),
            "ADEQUACY" => Some(Self::Adequacy),
            _ => None,
        }
    }

    /// Returns the concrete member codes.
    #[must_use]
    pub fn members(self) -> BTreeSet<&'static str> {
        let mut members: BTreeSet<&'static str> = EU_MEMBERS.into_iter().collect();
        if matches!(self, Self::Eea | Self::Adequacy) {
            members.extend(EEA_NON_EU);
        }
        if self == Self::Adequacy {
            members.extend(ADEQUACY_DECISIONS);
        }
        members
    }
}

/// Expands a code into the concrete location codes it denotes.
///
/// Aggregate codes expand to their members; anything else is returned as a
/// single uppercased code.
#[must_use]
pub fn expand(code: &str) -> BTreeSet<String> {
    match AggregateRegion::from_code(code) {
        Some(region) => region.members().into_iter().map(str::to_owned).collect(),
        None => BTreeSet::from([normalise(code)]),
    }
}

fn normalise(code: &str) -> String {
    code.trim().to_ascii_uppercase()
}

fn expand_all<'a, I>(codes: I) -> BTreeSet<String>
where
    I: IntoIterator<Item = &'a String>,
{
    codes.into_iter().flat_map(|code| expand(code)).collect()
}

/// Outcome of checking one declared location.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LocationVerdict {
    /// Location is in the required set and not prohibited.
    Allowed,
    /// Location is in the prohibited set.
    Prohibited,
    /// Location is in neither set, or only missing from the required set.
    NotRequired,
}

impl LocationVerdict {
    /// Returns `true` for [`LocationVerdict::Allowed`].
    #[must_use]
    pub const fn is_allowed(self) -> bool {
        matches!(self, Self::Allowed)
    }
}

/// Expanded residency sets for one evaluation.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ResidencyScope {
    allowed: BTreeSet<String>,
    prohibited: BTreeSet<String>,
}

impl ResidencyScope {
    /// Expands both sides of a residency constraint.
    #[must_use]
    pub fn from_residency(residency: &DataResidency) -> Self {
        Self {
            allowed: expand_all(&residency.required),
            prohibited: expand_all(&residency.prohibited),
        }
    }

    /// Checks a single declared location. Prohibition wins over allowance and
    /// absence from both sets is not allowed.
    #[must_use]
    pub fn check(&self, location: &str) -> LocationVerdict {
        let location = normalise(location);
        if self.prohibited.contains(&location) {
            LocationVerdict::Prohibited
        } else if self.allowed.contains(&location) {
            LocationVerdict::Allowed
        } else {
            LocationVerdict::NotRequired
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn residency(required: &[&str], prohibited: &[&str]) -> DataResidency {
        DataResidency {
            required: required.iter().map(|c| (*c).to_owned()).collect(),
            prohibited: prohibited.iter().map(|c| (*c).to_owned()).collect(),
        }
    }

    #[test]
    fn aggregates_are_nested_supersets() {
        let eu = AggregateRegion::Eu.members();
        let eea = AggregateRegion::Eea.members();
        let adequacy = AggregateRegion::Adequacy.members();

        assert_eq!(eu.len(), 27);
        assert_eq!(eea.len(), 30);
        assert_eq!(adequacy.len(), 44);
        assert!(eu.is_subset(&eea));
        assert!(eea.is_subset(&adequacy));
        assert!(adequacy.contains("JP"));
        assert!(!eea.contains("CH"));
    }

    #[test]
    fn expand_recognises_aggregates_case_insensitively() {
        assert_eq!(expand("eu").len(), 27);
        assert!(expand(" Eea ").contains("NO"));
        assert_eq!(expand("us"), BTreeSet::from(["US".to_owned()]));
    }

    #[test]
    fn prohibition_overrides_allowance() {
        let scope = ResidencyScope::from_residency(&residency(&["EU"], &["DE"]));
        assert_eq!(scope.check("DE"), LocationVerdict::Prohibited);
        assert_eq!(scope.check("fr"), LocationVerdict::Allowed);
        assert_eq!(scope.check("US"), LocationVerdict::NotRequired);
    }

    #[test]
    fn empty_scope_fails_closed() {
        let scope = ResidencyScope::default();
        assert!(!scope.check("DE").is_allowed());
    }

    proptest! {
        #[test]
        fn prohibited_member_is_never_allowed(index in 0usize..44, lower in any::<bool>()) {
            let members: Vec<_> = AggregateRegion::Adequacy.members().into_iter().collect();
            let code = members[index];
            let scope = ResidencyScope::from_residency(&residency(&["ADEQUACY", code], &[code]));
            let probe = if lower { code.to_ascii_lowercase() } else { code.to_owned() };
            prop_assert_eq!(scope.check(&probe), LocationVerdict::Prohibited);
        }

        #[test]
        fn aggregate_prohibition_overrides_concrete_allowance(index in 0usize..27) {
            let code = EU_MEMBERS[index];
            let scope = ResidencyScope::from_residency(&residency(&[code, "EEA"], &["EU"]));
            prop_assert_eq!(scope.check(code), LocationVerdict::Prohibited);
        }
    }
}
