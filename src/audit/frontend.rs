//! Frontend audit: one structural marker per stage

use super::probe::FetchedPage;
use super::report::Finding;

/// Score when the stage marker is present
pub const MARKER_PRESENT: u8 = 100;

/// Score when the stage marker is missing
pub const MARKER_MISSING: u8 = 20;

struct StageMarker {
    needles: &'static [&'static str],
    passed: &'static str,
    advisory: &'static str,
}

const MARKERS: [StageMarker; 8] = [
    StageMarker {
        needles: &["<title"],
        passed: "Page has a document title.",
        advisory: "Add a <title> element so your page identifies itself in browser tabs and search results.",
    },
    StageMarker {
        needles: &["name=\"viewport\"", "name='viewport'", "name=viewport"],
        passed: "Responsive viewport is configured.",
        advisory: "Add <meta name=\"viewport\" content=\"width=device-width, initial-scale=1\"> so the layout adapts to mobile screens.",
    },
    StageMarker {
        needles: &["<nav"],
        passed: "Navigation landmark found.",
        advisory: "Add a <nav> element so visitors can move between sections of your site.",
    },
    StageMarker {
        needles: &["<form"],
        passed: "Form found.",
        advisory: "Add a <form> that collects user input; this stage is about handling forms.",
    },
    StageMarker {
        needles: &["alt="],
        passed: "Images carry alternative text.",
        advisory: "Give your images alt text (alt=\"...\") so screen readers can describe them.",
    },
    StageMarker {
        needles: &["<script"],
        passed: "JavaScript is wired into the page.",
        advisory: "Include JavaScript (<script>) to make the page interactive.",
    },
    StageMarker {
        needles: &["aria-"],
        passed: "ARIA attributes found.",
        advisory: "Add ARIA attributes (aria-label, aria-expanded, ...) to improve accessibility.",
    },
    StageMarker {
        needles: &["<footer"],
        passed: "Footer found; the page layout is complete.",
        advisory: "Add a <footer> to complete your capstone page layout.",
    },
];

/// Score a fetched page for a stage (1-8). The HTTP status is ignored.
pub fn score(stage: u8, page: &FetchedPage) -> Finding {
    let index = usize::from(stage.clamp(1, 8) - 1);
    let marker = &MARKERS[index];
    let body = page.body.to_ascii_lowercase();

    if marker.needles.iter().any(|needle| body.contains(needle)) {
        Finding::new(MARKER_PRESENT, marker.passed)
    } else {
        Finding::new(MARKER_MISSING, marker.advisory)
    }
}

/// Advisory text shown when a stage's marker is missing
pub fn advisory(stage: u8) -> &'static str {
    MARKERS[usize::from(stage.clamp(1, 8) - 1)].advisory
}
