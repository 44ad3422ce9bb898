//! Testing utilities for the checks workspace
//!
//! Shared fixtures, documents and proptest strategies.

#![allow(missing_docs)]

use checks_catalog::{Catalog, Checklist, Step};
use proptest::prelude::*;

/// Document with two checklists, one in each default mode
pub const SAMPLE_DOCUMENT: &str = r##"version: "1.0"
checklists:
  - id: before-start
    titulo: Before start
    categoria: Normal
    color: "#1E88E5"
    pasos:
      - id: fuel
        texto: Fuel valve open
        icono: fuel
      - id: altimeter
        texto: Altimeter set
        altitud: ft
        qnh: hPa
      - id: time
        texto: Note block time
        utctime: true
        log: Block off
  - id: shutdown
    titulo: Shutdown
    categoria: Normal
    full-list: true
    pasos:
      - id: avionics
        texto: Avionics off
      - id: master
        texto: Master off
"##;

/// Document with one bad checklist and one bad step
pub const PARTIAL_DOCUMENT: &str = r#"checklists:
  - id: ok
    pasos:
      - id: s1
        texto: Good step
      - id: s2
  - "not a mapping"
  - id: also-ok
    pasos: []
"#;

/// Plain step
pub fn step(id: &str, text: &str) -> Step {
    Step::new(id, text)
}

/// Checklist with `count` plain steps named `s0..`
pub fn checklist_with_steps(id: &str, count: usize) -> Checklist {
    (0..count).fold(Checklist::new(id), |checklist, i| {
        checklist.with_step(Step::new(format!("s{i}"), format!("Step {i}")))
    })
}

/// Plain checklist that defaults to full-list mode
pub fn full_list_checklist(id: &str, count: usize) -> Checklist {
    checklist_with_steps(id, count).with_full_list(true)
}

/// Two-checklist catalog built in code
pub fn sample_catalog() -> Catalog {
    Catalog::new(vec![
        checklist_with_steps("a", 3).with_title("Alpha"),
        full_list_checklist("b", 12).with_title("Bravo"),
    ])
}

/// Text that survives a document round-trip unchanged and is never blank
pub fn arb_text() -> impl Strategy<Value = String> {
    "[a-zA-Z][a-zA-Z0-9_-]{0,8}( [a-zA-Z0-9]{1,6}){0,2}"
}

/// Absent or non-blank text
pub fn arb_optional_text() -> impl Strategy<Value = Option<String>> {
    prop::option::of(arb_text())
}

/// Step with the given id and arbitrary optional fields
pub fn arb_step(id: String) -> impl Strategy<Value = Step> {
    (
        arb_text(),
        arb_optional_text(),
        prop::option::of(prop_oneof![Just("m".to_string()), Just("ft".to_string())]),
        prop::option::of(prop_oneof![Just("hPa".to_string()), Just("inHg".to_string())]),
        arb_optional_text(),
        arb_optional_text(),
        any::<bool>(),
        any::<bool>(),
        arb_optional_text(),
    )
        .prop_map(
            move |(text, icon, altitude, qnh, link, app, local_time, utc_time, log)| Step {
                id: id.clone(),
                text,
                icon,
                altitude,
                qnh,
                link,
                app,
                local_time,
                utc_time,
                log,
            },
        )
}

/// Checklist with the given id and uniquely named steps
pub fn arb_checklist(id: String) -> impl Strategy<Value = Checklist> {
    (0usize..6)
        .prop_flat_map(|count| {
            (0..count)
                .map(|i| arb_step(format!("s{i}")))
                .collect::<Vec<_>>()
        })
        .prop_flat_map(move |steps| {
            let id = id.clone();
            (
                arb_text(),
                arb_optional_text(),
                prop::option::of(any::<bool>()),
                prop::option::of("#[0-9A-F]{6}"),
            )
                .prop_map(move |(title, category, full_list, color)| Checklist {
                    id: id.clone(),
                    title,
                    category,
                    full_list,
                    color,
                    steps: steps.clone(),
                })
        })
}

/// Catalog with unique ids whose optional fields are either absent or non-blank
pub fn arb_catalog() -> impl Strategy<Value = Catalog> {
    (0usize..5).prop_flat_map(|count| {
        (0..count)
            .map(|i| arb_checklist(format!("checklist-{i}")))
            .collect::<Vec<_>>()
            .prop_map(Catalog::new)
    })
}
