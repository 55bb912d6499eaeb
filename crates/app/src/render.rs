use std::fmt::Write as _;

use learn_core::model::{ComponentLookup, Theme};
use learn_core::navigation::Exit;
use services::{NavOutcome, PathOverview, TopicView};

pub fn overview(overview: &PathOverview, theme: Theme) -> String {
    let mut out = String::new();
    let _ = writeln!(
        out,
        "Learning path [{}]  {}/{} complete ({}%)",
        theme.as_str(),
        overview.completed(),
        overview.total(),
        overview.percent_complete()
    );

    for phase in &overview.phases {
        let _ = writeln!(
            out,
            "\n{} ({}/{})",
            phase.title,
            phase.completed(),
            phase.topics.len()
        );
        for topic in &phase.topics {
            let mark = if topic.completed { "x" } else { " " };
            let cursor = if topic.is_current { ">" } else { " " };
            let _ = writeln!(
                out,
                "  [{mark}]{cursor} {:>2}. {:<32} {}",
                topic.step, topic.title, topic.address
            );
        }
    }
    out
}

pub fn topic(view: &TopicView) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "Step {} of {} - {}", view.step, view.total, view.phase_title);
    let done = if view.completed { "  (completed)" } else { "" };
    let _ = writeln!(out, "{}  [{}]{done}", view.title, view.address);
    if !view.description.is_empty() {
        let _ = writeln!(out, "\n{}", view.description);
    }
    let illustration = match &view.component {
        ComponentLookup::Found(key) => key.to_string(),
        ComponentLookup::NotFound => "generic".to_owned(),
    };
    let _ = writeln!(out, "\nIllustration: {illustration}");
    out
}

/// Short line describing where a navigation request ended up.
pub fn outcome(outcome: &NavOutcome) -> Option<String> {
    match outcome {
        NavOutcome::Viewing { .. } => None,
        NavOutcome::Exited(Exit::Roadmap) => Some("End of the path. Back to the roadmap.".into()),
        NavOutcome::Exited(Exit::Home) => {
            Some("Back at the start. Run `learn next` to begin.".into())
        }
        NavOutcome::Redirected(address) => {
            Some(format!("No topic at {address}. Showing the roadmap."))
        }
        NavOutcome::UnknownPhase(phase) => Some(format!(
            "No topic or phase named `{phase}`. Showing the roadmap."
        )),
    }
}
