//! Pad extraction from `.kicad_mod` footprint documents.

use std::collections::BTreeSet;

use crate::sexpr;

/// A physical land-pattern definition with its pad numbers.
#[derive(Debug, Clone)]
pub struct Footprint {
    /// Lookup key. Taken from the footprint's file stem, never from the
    /// internal name field: that is what symbol references resolve against.
    pub name: String,
    pub pad_numbers: BTreeSet<String>,
}

/// Extract the pad numbers of one footprint document.
///
/// Pads are matched at any depth. Pads with an empty name (unnumbered
/// mechanical pads) are skipped, and a document with no pads at all is
/// still a valid footprint.
pub fn parse_footprint(name: &str, input: &str) -> Footprint {
    let forms = sexpr::parse_document(input);
    let mut pad_numbers = BTreeSet::new();
    for root in &forms {
        for pad in root.descendants("pad") {
            match pad.string_arg(0) {
                Some(number) if !number.is_empty() => {
                    pad_numbers.insert(number.to_owned());
                }
                _ => {}
            }
        }
    }
    Footprint {
        name: name.to_owned(),
        pad_numbers,
    }
}
