//! Best-effort fare estimation.
//!
//! Fare rules are matched against the routes used and the zones traversed.
//! When no rule applies, a zone-count tier table is consulted. Either way
//! the cheapest candidate wins; an unpriceable trip is reported as
//! [`FareOutcome::Unresolved`] rather than as an error.

use std::collections::{BTreeMap, BTreeSet};

use crate::schedule::{FareAttribute, FareRule};

/// A fare valid for trips spanning up to `zones` zones.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct FareTier {
    pub zones: u32,
    pub fare_id: String,
    pub price: f64,
    pub currency: String,
}

/// How the selected fare was found.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum FareProvenance {
    MatchedRule,
    ZoneFallback,
}

/// Descriptor of the fare charged for a trip.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SelectedFare {
    pub fare_id: String,
    pub price: f64,
    pub currency: String,
    pub provenance: FareProvenance,
}

/// Result of fare estimation.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum FareOutcome {
    /// The trip uses no transit.
    NotApplicable,
    Selected(SelectedFare),
    /// Transit was used but neither a rule nor a tier applies.
    Unresolved,
}

impl FareOutcome {
    /// Price charged; zero unless a fare was selected.
    pub fn cost(&self) -> f64 {
        match self {
            FareOutcome::Selected(fare) => fare.price,
            FareOutcome::NotApplicable | FareOutcome::Unresolved => 0.0,
        }
    }

    pub fn selected(&self) -> Option<&SelectedFare> {
        match self {
            FareOutcome::Selected(fare) => Some(fare),
            _ => None,
        }
    }
}

/// Fare attributes, rules and zone tiers of one network.
#[derive(Debug, Clone, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct FareTable {
    attributes: BTreeMap<String, FareAttribute>,
    rules: Vec<FareRule>,
    tiers: Vec<FareTier>,
}

impl FareTable {
    /// Creates a table and derives zone tiers from fare ids that carry a
    /// zone count (`Z3`, `andante-4`, ...).
    pub fn new(attributes: Vec<FareAttribute>, rules: Vec<FareRule>) -> Self {
        let tiers = attributes
            .iter()
            .filter_map(|attr| {
                Some(FareTier {
                    zones: zone_count_of(&attr.fare_id)?,
                    fare_id: attr.fare_id.clone(),
                    price: attr.price,
                    currency: attr.currency.clone(),
                })
            })
            .collect();
        let attributes = attributes
            .into_iter()
            .map(|attr| (attr.fare_id.clone(), attr))
            .collect();
        Self {
            attributes,
            rules,
            tiers,
        }
    }

    /// Replaces the derived zone tiers.
    pub fn with_tiers(mut self, tiers: Vec<FareTier>) -> Self {
        self.tiers = tiers;
        self
    }

    pub fn tiers(&self) -> &[FareTier] {
        &self.tiers
    }

    pub fn rules(&self) -> &[FareRule] {
        &self.rules
    }

    pub fn is_empty(&self) -> bool {
        self.attributes.is_empty() && self.tiers.is_empty()
    }

    /// Estimates the fare of a transit trip.
    ///
    /// `routes` are the route ids ridden and `zones` the distinct zones
    /// traversed in order; the first and last zone are the boarding and
    /// alighting zones. A rule constraint on a side the trip has no zone
    /// for is not checked.
    pub fn estimate(&self, routes: &BTreeSet<String>, zones: &[String]) -> FareOutcome {
        if let Some(attr) = self.cheapest_matching_rule(routes, zones) {
            return FareOutcome::Selected(SelectedFare {
                fare_id: attr.fare_id.clone(),
                price: attr.price,
                currency: attr.currency.clone(),
                provenance: FareProvenance::MatchedRule,
            });
        }

        let needed = zones.len().max(1) as u32;
        self.tiers
            .iter()
            .filter(|tier| tier.zones >= needed)
            .min_by(|a, b| a.price.total_cmp(&b.price).then_with(|| a.fare_id.cmp(&b.fare_id)))
            .map_or(FareOutcome::Unresolved, |tier| {
                FareOutcome::Selected(SelectedFare {
                    fare_id: tier.fare_id.clone(),
                    price: tier.price,
                    currency: tier.currency.clone(),
                    provenance: FareProvenance::ZoneFallback,
                })
            })
    }

    fn cheapest_matching_rule(
        &self,
        routes: &BTreeSet<String>,
        zones: &[String],
    ) -> Option<&FareAttribute> {
        let boarding = zones.first();
        let alighting = zones.last();
        let zone_set: BTreeSet<&str> = zones.iter().map(String::as_str).collect();

        let side_matches = |required: &Option<String>, actual: Option<&String>| match (required, actual) {
            (Some(req), Some(act)) => req == act,
            _ => true,
        };

        self.rules
            .iter()
            .filter(|rule| {
                rule.route_id
                    .as_ref()
                    .map_or(true, |route| routes.contains(route))
            })
            .filter(|rule| side_matches(&rule.origin_id, boarding))
            .filter(|rule| side_matches(&rule.destination_id, alighting))
            .filter(|rule| {
                rule.contains_id
                    .as_deref()
                    .map_or(true, |zone| zone_set.contains(zone))
            })
            .filter_map(|rule| self.attributes.get(&rule.fare_id))
            .min_by(|a, b| a.price.total_cmp(&b.price).then_with(|| a.fare_id.cmp(&b.fare_id)))
    }
}

/// First run of ASCII digits in a fare id, if any.
fn zone_count_of(fare_id: &str) -> Option<u32> {
    let start = fare_id.find(|c: char| c.is_ascii_digit())?;
    let digits: String = fare_id[start..]
        .chars()
        .take_while(char::is_ascii_digit)
        .collect();
    digits.parse().ok().filter(|&n| n > 0)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn attr(id: &str, price: f64) -> FareAttribute {
        FareAttribute {
            fare_id: id.into(),
            price,
            currency: "EUR".into(),
        }
    }

    fn zones(z: &[&str]) -> Vec<String> {
        z.iter().map(|s| s.to_string()).collect()
    }

    fn routes(r: &[&str]) -> BTreeSet<String> {
        r.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_zone_count_parsing() {
        assert_eq!(zone_count_of("Z3"), Some(3));
        assert_eq!(zone_count_of("andante-12x"), Some(12));
        assert_eq!(zone_count_of("single"), None);
        assert_eq!(zone_count_of("Z0"), None);
    }

    #[test]
    fn test_cheapest_matching_rule() {
        let table = FareTable::new(
            vec![attr("single", 2.0), attr("metro-day", 1.5), attr("bus-only", 1.0)],
            vec![
                FareRule {
                    fare_id: "single".into(),
                    ..Default::default()
                },
                FareRule {
                    fare_id: "metro-day".into(),
                    route_id: Some("A".into()),
                    ..Default::default()
                },
                FareRule {
                    fare_id: "bus-only".into(),
                    route_id: Some("200".into()),
                    ..Default::default()
                },
            ],
        );
        let outcome = table.estimate(&routes(&["A"]), &zones(&["C1"]));
        let fare = outcome.selected().unwrap();
        assert_eq!(fare.fare_id, "metro-day");
        assert_eq!(fare.provenance, FareProvenance::MatchedRule);
        assert_eq!(outcome.cost(), 1.5);
    }

    #[test]
    fn test_origin_destination_contains() {
        let table = FareTable::new(
            vec![attr("od", 1.2), attr("via", 0.9)],
            vec![
                FareRule {
                    fare_id: "od".into(),
                    origin_id: Some("C1".into()),
                    destination_id: Some("C3".into()),
                    ..Default::default()
                },
                FareRule {
                    fare_id: "via".into(),
                    contains_id: Some("C9".into()),
                    ..Default::default()
                },
            ],
        );
        let hit = table.estimate(&routes(&["A"]), &zones(&["C1", "C2", "C3"]));
        assert_eq!(hit.selected().unwrap().fare_id, "od");

        let miss = table.estimate(&routes(&["A"]), &zones(&["C3", "C1"]));
        assert_eq!(miss, FareOutcome::Unresolved);
    }

    #[test]
    fn test_zone_fallback_cheapest_covering_tier() {
        let table = FareTable::new(vec![attr("Z2", 1.4), attr("Z3", 1.8), attr("Z4", 2.2)], vec![]);
        let outcome = table.estimate(&routes(&["200"]), &zones(&["C1", "C2", "C3"]));
        let fare = outcome.selected().unwrap();
        assert_eq!(fare.fare_id, "Z3");
        assert_eq!(fare.provenance, FareProvenance::ZoneFallback);
    }

    #[test]
    fn test_no_zones_counts_as_one() {
        let table = FareTable::new(vec![attr("Z2", 1.4)], vec![]);
        assert_eq!(table.estimate(&routes(&["200"]), &[]).cost(), 1.4);
    }

    #[test]
    fn test_unresolved_when_nothing_covers() {
        let table = FareTable::new(vec![attr("Z2", 1.4)], vec![]);
        let outcome = table.estimate(&routes(&["200"]), &zones(&["a", "b", "c"]));
        assert_eq!(outcome, FareOutcome::Unresolved);
        assert_eq!(outcome.cost(), 0.0);
        assert!(FareTable::default().is_empty());
    }

    #[test]
    fn test_explicit_tiers() {
        let table = FareTable::default().with_tiers(vec![FareTier {
            zones: 9,
            fare_id: "flat".into(),
            price: 3.0,
            currency: "EUR".into(),
        }]);
        assert_eq!(table.estimate(&routes(&["x"]), &zones(&["a"])).cost(), 3.0);
    }
}
