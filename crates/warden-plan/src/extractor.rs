// extractor.rs — A small, deterministic, rule-based free-text extractor.
//
// This is not a natural-language model and is not trying to be one: it
// is a conservative filter. Anything it cannot classify becomes
// `ActionCategory::Unknown`, which the validator always escalates. See
// crate docs for why this must stay rule-based (determinism is a tested
// invariant).

use regex::Regex;
use std::sync::OnceLock;

use warden_constraint::ActionCategory;

use crate::action::ExtractedAction;

struct Rule {
    pattern: &'static str,
    category: ActionCategory,
}

// Checked in order; the first match wins. Shell execution and network
// fetch rules are listed first because their verbs ("delete", "remove")
// often overlap with plain file-deletion phrasing, and the more
// dangerous interpretation should win when a command fragment is present.
const RULES: &[Rule] = &[
    Rule {
        pattern: r"(?i)\b(rm\s+-rf|sudo|chmod|curl\s.*\|\s*sh|wget\s.*\|\s*sh|\bexec\b)",
        category: ActionCategory::ShellExec,
    },
    Rule {
        pattern: r"(?i)\b(run|execute)\b",
        category: ActionCategory::ShellExec,
    },
    Rule {
        pattern: r"(?i)\b(curl|fetch|download from|http request|post to|get request)\b",
        category: ActionCategory::NetworkRequest,
    },
    Rule {
        pattern: r"(?i)\b(delete|remove)\b",
        category: ActionCategory::FileDelete,
    },
    Rule {
        pattern: r"(?i)\b(write|create|save)\b",
        category: ActionCategory::FileWrite,
    },
    Rule {
        pattern: r"(?i)\b(edit|modify|refactor|update)\b",
        category: ActionCategory::CodeEdit,
    },
    Rule {
        pattern: r"(?i)\bread\b",
        category: ActionCategory::FileRead,
    },
    Rule {
        pattern: r"(?i)\b(use tool|call tool|invoke)\b",
        category: ActionCategory::ToolUse,
    },
];

fn compiled_rules() -> &'static Vec<(Regex, ActionCategory)> {
    static COMPILED: OnceLock<Vec<(Regex, ActionCategory)>> = OnceLock::new();
    COMPILED.get_or_init(|| {
        RULES
            .iter()
            .map(|r| (Regex::new(r.pattern).expect("rule patterns are fixed and valid"), r.category))
            .collect()
    })
}

/// The first whitespace-delimited, path-like token in `description`
/// (contains a `/`, or ends in a short alphanumeric extension), if any.
/// Deny/allow-list matching needs an actual target descriptor, not the
/// whole free-text phrase — a command fragment like `"rm -rf"` has no
/// such token and falls back to the full phrase, which is exactly what
/// substring deny-list matching on shell commands wants anyway.
fn extract_target_token(description: &str) -> Option<&str> {
    description
        .split_whitespace()
        .find(|tok| crate::action::is_path_like(tok))
        .map(|tok| tok.trim_matches(|c: char| matches!(c, '"' | '\'' | ',' | ';')))
}

/// Classify one step description into an [`ExtractedAction`]. The target
/// is a path-like token pulled out of the description when one is
/// present (e.g. `./src/foo.rs` in "write file ./src/foo.rs"); otherwise
/// the trimmed description itself, so substring matchers (deny-list
/// command fragments) still have the full phrase to work with.
pub fn classify_step(description: &str) -> ExtractedAction {
    let trimmed = description.trim();
    let target = extract_target_token(trimmed).unwrap_or(trimmed);
    for (re, category) in compiled_rules() {
        if re.is_match(trimmed) {
            return ExtractedAction::new(*category, target);
        }
    }
    ExtractedAction::new(ActionCategory::Unknown, target)
}

/// Split a free-text task into individual step descriptions. Splits on
/// sentence-ending punctuation and newlines; a task with no separators
/// becomes a single step.
pub fn split_into_steps(task: &str) -> Vec<String> {
    static SPLITTER: OnceLock<Regex> = OnceLock::new();
    let splitter = SPLITTER.get_or_init(|| Regex::new(r"[\.\n;]+").expect("fixed pattern"));
    splitter
        .split(task)
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn classifies_read() {
        let action = classify_step("read file src/main.py");
        assert_eq!(action.category, ActionCategory::FileRead);
    }

    #[test]
    fn classifies_destructive_shell_over_plain_delete() {
        let action = classify_step("delete all files with rm -rf");
        assert_eq!(action.category, ActionCategory::ShellExec);
    }

    #[test]
    fn classifies_write() {
        let action = classify_step("write a new config file");
        assert_eq!(action.category, ActionCategory::FileWrite);
    }

    #[test]
    fn target_extraction_pulls_out_path_like_token() {
        let action = classify_step("write file ./src/foo.rs");
        assert_eq!(action.target, "./src/foo.rs");
    }

    #[test]
    fn target_falls_back_to_whole_phrase_without_a_path_token() {
        let action = classify_step("delete all files with rm -rf");
        assert_eq!(action.target, "delete all files with rm -rf");
    }

    #[test]
    fn classifies_network() {
        let action = classify_step("curl https://example.com/api");
        assert_eq!(action.category, ActionCategory::NetworkRequest);
    }

    #[test]
    fn unclassifiable_text_is_unknown() {
        let action = classify_step("ponder the meaning of the universe");
        assert_eq!(action.category, ActionCategory::Unknown);
    }

    #[test]
    fn split_into_steps_handles_multiple_sentences() {
        let steps = split_into_steps("read file a.py. read file b.py.");
        assert_eq!(steps, vec!["read file a.py", "read file b.py"]);
    }

    #[test]
    fn split_into_steps_single_step_task() {
        let steps = split_into_steps("read file test.py");
        assert_eq!(steps, vec!["read file test.py"]);
    }
}
