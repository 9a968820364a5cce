//! Symbol extraction from `.kicad_sym` library documents.

use std::collections::{BTreeMap, BTreeSet};

use crate::sexpr::{self, SExpr};

/// Property names recognised as a vendor part-number tag (case-sensitive).
const PART_NUMBER_PROPERTIES: [&str; 2] = ["LCSC", "LCSC Part"];

/// A schematic component definition with its pins and footprint reference.
#[derive(Debug, Clone, Default)]
pub struct Symbol {
    pub name: String,
    /// `Library:Footprint` or bare footprint reference; empty when unassigned.
    pub footprint: String,
    pub pin_numbers: BTreeSet<String>,
    /// Pin number → times it appeared in the definition. Counts above one
    /// mark intentionally repeated pins (ganged power/ground), which is a
    /// warning but never a mismatch.
    pub pin_occurrences: BTreeMap<String, u32>,
    /// Vendor part number, informational only.
    pub part_number: Option<String>,
}

/// Extract every top-level symbol from a symbol library document, in
/// document order.
///
/// Unit bodies (`NAME_<unit>_<style>`) never become symbols of their own:
/// nested ones are walked as part of their parent, and unit bodies emitted
/// as top-level siblings are folded into the preceding symbol. A document
/// without symbols yields an empty vec.
pub fn parse_symbol_library(input: &str) -> Vec<Symbol> {
    let forms = sexpr::parse_document(input);
    let mut symbols = Vec::new();
    for root in &forms {
        if root.label() == Some("symbol") {
            // bare symbol fragment without a library wrapper
            add_definition(root, &mut symbols);
        } else {
            for def in root.children("symbol") {
                add_definition(def, &mut symbols);
            }
        }
    }
    symbols
}

fn add_definition(def: &SExpr, symbols: &mut Vec<Symbol>) {
    let Some(name) = def.string_arg(0) else {
        return;
    };
    if has_unit_suffix(name) {
        // line-oriented exporters sometimes emit unit bodies as siblings of
        // the parent; their pins still belong to it
        if let Some(parent) = symbols.last_mut() {
            collect_pins(def, parent);
        }
        return;
    }
    symbols.push(parse_symbol(name, def));
}

fn parse_symbol(name: &str, def: &SExpr) -> Symbol {
    let mut footprint = None;
    let mut part_number = None;
    for property in def.descendants("property") {
        let (Some(key), Some(value)) = (property.string_arg(0), property.string_arg(1)) else {
            continue;
        };
        if key == "Footprint" {
            footprint.get_or_insert_with(|| value.to_owned());
        } else if PART_NUMBER_PROPERTIES.contains(&key) {
            part_number.get_or_insert_with(|| value.to_owned());
        }
    }

    let mut symbol = Symbol {
        name: name.to_owned(),
        footprint: footprint.unwrap_or_default(),
        part_number,
        ..Symbol::default()
    };
    collect_pins(def, &mut symbol);
    symbol
}

// Pin declarations cannot nest, so every `(pin ...)` in the subtree is one
// declaration no matter how deep the unit body holding it sits.
fn collect_pins(def: &SExpr, symbol: &mut Symbol) {
    for pin in def.descendants("pin") {
        if let Some(number) = pin.value("number") {
            symbol.pin_numbers.insert(number.to_owned());
            *symbol.pin_occurrences.entry(number.to_owned()).or_insert(0) += 1;
        }
    }
}

/// True for names like `R1_0_1`: a trailing `_<digits>_<digits>` marks an
/// alternate unit/body of the parent symbol.
fn has_unit_suffix(name: &str) -> bool {
    let mut parts = name.rsplitn(3, '_');
    let (Some(style), Some(unit), Some(_)) = (parts.next(), parts.next(), parts.next()) else {
        return false;
    };
    !style.is_empty()
        && !unit.is_empty()
        && style.bytes().all(|b| b.is_ascii_digit())
        && unit.bytes().all(|b| b.is_ascii_digit())
}
