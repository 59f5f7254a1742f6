use std::fmt::Write;

use crate::emit::report::{SuggestionEntry, SuggestionReport};

/// Emit a report as plain text, one ranked recipe per block.
pub fn emit_text(report: &SuggestionReport) -> String {
    let mut out = String::new();

    writeln!(out, "Ingredients: {}", report.ingredients.join(", ")).unwrap();

    if report.matches.is_empty() {
        writeln!(out, "No matching recipes.").unwrap();
        return out;
    }

    writeln!(
        out,
        "Matches: {} (showing {})",
        report.matches_total,
        report.matches.len()
    )
    .unwrap();

    for entry in &report.matches {
        writeln!(out).unwrap();
        emit_entry(&mut out, entry);
    }

    out
}

fn emit_entry(out: &mut String, entry: &SuggestionEntry) {
    let noun = if entry.overlap == 1 {
        "ingredient"
    } else {
        "ingredients"
    };
    writeln!(
        out,
        "{}. {} ({} shared {noun})",
        entry.rank, entry.name, entry.overlap
    )
    .unwrap();
    if !entry.shared.is_empty() {
        writeln!(out, "   have:    {}", entry.shared.join(", ")).unwrap();
    }
    if !entry.missing.is_empty() {
        writeln!(out, "   missing: {}", entry.missing.join(", ")).unwrap();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn report(matches: Vec<SuggestionEntry>) -> SuggestionReport {
        SuggestionReport {
            ingredients: vec!["egg".into(), "salt".into()],
            matches_total: matches.len(),
            matches,
        }
    }

    #[test]
    fn emits_ranked_entries() {
        let out = emit_text(&report(vec![
            SuggestionEntry {
                rank: 1,
                name: "Omelette".into(),
                overlap: 2,
                shared: vec!["egg".into(), "salt".into()],
                missing: vec![],
            },
            SuggestionEntry {
                rank: 2,
                name: "Salad".into(),
                overlap: 1,
                shared: vec!["salt".into()],
                missing: vec!["tomato".into()],
            },
        ]));
        assert!(out.starts_with("Ingredients: egg, salt\n"));
        assert!(out.contains("Matches: 2 (showing 2)"));
        assert!(out.contains("1. Omelette (2 shared ingredients)"));
        assert!(out.contains("2. Salad (1 shared ingredient)"));
        assert!(out.contains("   missing: tomato"));
        assert!(!out.contains("missing: \n"));
    }

    #[test]
    fn emits_no_match_line() {
        let out = emit_text(&report(vec![]));
        assert!(out.contains("No matching recipes."));
        assert!(!out.contains("Matches:"));
    }
}
