//! Pin-to-pad comparison of a symbol against its resolved footprint.

use std::collections::{BTreeMap, BTreeSet};

use serde::Serialize;

use crate::library::FootprintLibraryIndex;
use crate::symbol::Symbol;

/// Classification of one verification result. The three states are mutually
/// exclusive and exhaustive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Status {
    #[serde(rename = "OK")]
    Ok,
    #[serde(rename = "MISMATCH")]
    Mismatch,
    #[serde(rename = "FOOTPRINT_NOT_FOUND")]
    FootprintNotFound,
}

/// Outcome of comparing one symbol against its resolved footprint.
#[derive(Debug, Clone)]
pub struct VerificationResult {
    pub symbol_name: String,
    pub footprint_reference: String,
    pub symbol_pin_count: usize,
    pub footprint_pad_count: usize,
    /// Symbol pins with no matching pad.
    pub pins_without_pads: BTreeSet<String>,
    /// Footprint pads with no matching pin.
    pub pads_without_pins: BTreeSet<String>,
    pub footprint_found: bool,
    /// Pin number → occurrence count, restricted to counts above one.
    pub duplicate_pins: BTreeMap<String, u32>,
}

impl VerificationResult {
    /// Footprint resolved and both difference sets empty. Repeated pins are
    /// a warning and never affect this.
    pub fn matches(&self) -> bool {
        self.footprint_found
            && self.pins_without_pads.is_empty()
            && self.pads_without_pins.is_empty()
    }

    pub fn has_warnings(&self) -> bool {
        !self.duplicate_pins.is_empty()
    }

    pub fn status(&self) -> Status {
        if !self.footprint_found {
            Status::FootprintNotFound
        } else if self.matches() {
            Status::Ok
        } else {
            Status::Mismatch
        }
    }
}

/// Compare a symbol's pins against the pads of its resolved footprint.
///
/// Pure function of its inputs. Duplicate-pin detection runs whether or not
/// the footprint resolves; an unresolved footprint reports every pin as
/// missing a pad and no pad as missing a pin.
pub fn verify(symbol: &Symbol, index: &FootprintLibraryIndex) -> VerificationResult {
    let duplicate_pins = symbol
        .pin_occurrences
        .iter()
        .filter(|&(_, &count)| count > 1)
        .map(|(pin, &count)| (pin.clone(), count))
        .collect();

    let Some(footprint) = index.resolve(&symbol.footprint) else {
        return VerificationResult {
            symbol_name: symbol.name.clone(),
            footprint_reference: symbol.footprint.clone(),
            symbol_pin_count: symbol.pin_numbers.len(),
            footprint_pad_count: 0,
            pins_without_pads: symbol.pin_numbers.clone(),
            pads_without_pins: BTreeSet::new(),
            footprint_found: false,
            duplicate_pins,
        };
    };

    let pins_without_pads = symbol
        .pin_numbers
        .difference(&footprint.pad_numbers)
        .cloned()
        .collect();
    let pads_without_pins = footprint
        .pad_numbers
        .difference(&symbol.pin_numbers)
        .cloned()
        .collect();

    VerificationResult {
        symbol_name: symbol.name.clone(),
        footprint_reference: symbol.footprint.clone(),
        symbol_pin_count: symbol.pin_numbers.len(),
        footprint_pad_count: footprint.pad_numbers.len(),
        pins_without_pads,
        pads_without_pins,
        footprint_found: true,
        duplicate_pins,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::footprint::Footprint;
    use crate::library::FootprintLibrary;

    fn symbol(name: &str, footprint: &str, pins: &[&str]) -> Symbol {
        let mut sym = Symbol {
            name: name.to_owned(),
            footprint: footprint.to_owned(),
            ..Symbol::default()
        };
        for pin in pins {
            sym.pin_numbers.insert((*pin).to_owned());
            *sym.pin_occurrences.entry((*pin).to_owned()).or_insert(0) += 1;
        }
        sym
    }

    fn index_with(footprints: &[(&str, &[&str])]) -> FootprintLibraryIndex {
        let mut library = FootprintLibrary::new("Test");
        for (name, pads) in footprints {
            library.insert(Footprint {
                name: (*name).to_owned(),
                pad_numbers: pads.iter().map(|p| (*p).to_owned()).collect(),
            });
        }
        let mut index = FootprintLibraryIndex::default();
        index.register(library);
        index
    }

    #[test]
    fn matching_pins_and_pads_verify_ok() {
        let index = index_with(&[("R_0603", &["1", "2"])]);
        let result = verify(&symbol("R1", "R_0603", &["1", "2"]), &index);

        assert_eq!(result.status(), Status::Ok);
        assert!(result.matches());
        assert!(result.pins_without_pads.is_empty());
        assert!(result.pads_without_pins.is_empty());
        assert!(result.footprint_found);
    }

    #[test]
    fn unresolved_footprint_reports_every_pin() {
        let index = index_with(&[("R_0603", &["1", "2"])]);
        let result = verify(&symbol("U2", "QFN_16", &["1", "2", "3"]), &index);

        assert_eq!(result.status(), Status::FootprintNotFound);
        assert!(!result.footprint_found);
        assert_eq!(result.footprint_pad_count, 0);
        assert_eq!(result.pins_without_pads.len(), 3);
        assert!(result.pads_without_pins.is_empty());
    }

    #[test]
    fn extra_pads_are_a_mismatch() {
        let index = index_with(&[("C_0805", &["1", "2", "3"])]);
        let result = verify(&symbol("C1", "C_0805", &["1", "2"]), &index);

        assert_eq!(result.status(), Status::Mismatch);
        assert!(!result.matches());
        assert_eq!(
            result.pads_without_pins,
            BTreeSet::from(["3".to_owned()])
        );
        assert!(result.pins_without_pads.is_empty());
    }

    #[test]
    fn duplicate_pins_warn_without_breaking_a_match() {
        let index = index_with(&[("SOT_23", &["1", "2"])]);
        let mut sym = symbol("Q1", "SOT_23", &["1", "2"]);
        *sym.pin_occurrences.get_mut("1").unwrap() = 2;

        let result = verify(&sym, &index);
        assert_eq!(result.status(), Status::Ok);
        assert!(result.has_warnings());
        assert_eq!(result.duplicate_pins.get("1"), Some(&2));
    }

    #[test]
    fn duplicates_are_detected_even_without_a_footprint() {
        let index = index_with(&[]);
        let mut sym = symbol("U9", "Missing", &["7"]);
        *sym.pin_occurrences.get_mut("7").unwrap() = 3;

        let result = verify(&sym, &index);
        assert_eq!(result.status(), Status::FootprintNotFound);
        assert_eq!(result.duplicate_pins.get("7"), Some(&3));
    }
}
