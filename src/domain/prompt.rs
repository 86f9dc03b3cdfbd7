use crate::domain::change::ChangeSet;
use crate::error::{AppError, AppResult};

pub const DIFF_PLACEHOLDER: &str = "{diff}";
pub const FILES_PLACEHOLDER: &str = "{files}";

/// Diffs beyond this many characters are cut before substitution to stay
/// inside model token limits.
pub const MAX_DIFF_CHARS: usize = 4000;
const TRUNCATION_MARKER: &str = "\n... (truncated)";

const BUILT_IN_TEMPLATE: &str = "\
The following are changes from a Git repository. Write a clear and concise
commit message describing them.

Format the message like this:
- First line: summary of the change as `type: subject`
- Second line: blank
- Remaining lines: further detail, only when the change warrants it

Use one of these types:
- feat: a new feature
- fix: a bug fix
- docs: documentation changes
- style: formatting changes that do not affect behavior
- refactor: code restructuring
- test: adding or adjusting tests
- chore: build process or tooling changes

{language}

Changed files:
{files}

Changes (diff):
{diff}

Output only the commit message:
";

/// Language the generated message body should use.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MessageLanguage {
    #[default]
    English,
    Korean,
}

impl MessageLanguage {
    pub fn as_str(&self) -> &'static str {
        match self {
            MessageLanguage::English => "en",
            MessageLanguage::Korean => "ko",
        }
    }

    pub fn from_str(value: &str) -> Option<Self> {
        match value.trim().to_lowercase().as_str() {
            "en" => Some(MessageLanguage::English),
            "ko" => Some(MessageLanguage::Korean),
            _ => None,
        }
    }

    fn instruction(&self) -> &'static str {
        match self {
            MessageLanguage::English => "Write the entire message in English.",
            MessageLanguage::Korean => {
                "Keep the summary line in English; write the body in Korean."
            }
        }
    }
}

/// The fully assembled request text sent to the language model.
#[derive(Debug, Clone)]
pub struct Prompt(String);

impl Prompt {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

#[derive(Debug, Clone)]
pub struct PromptTemplate {
    text: String,
}

impl PromptTemplate {
    /// The default Conventional Commits template.
    pub fn built_in(language: MessageLanguage) -> Self {
        Self {
            text: BUILT_IN_TEMPLATE.replace("{language}", language.instruction()),
        }
    }

    /// Wraps user-supplied template text. Both placeholders must be present;
    /// nothing else about the text is validated.
    pub fn from_text(text: String) -> AppResult<Self> {
        for placeholder in [DIFF_PLACEHOLDER, FILES_PLACEHOLDER] {
            if !text.contains(placeholder) {
                return Err(AppError::Template(format!(
                    "template is missing the {placeholder} placeholder"
                )));
            }
        }
        Ok(Self { text })
    }

    pub fn render(&self, changes: &ChangeSet) -> Prompt {
        let files = changes.files.join("\n");
        let diff = truncate_diff(&changes.diff);
        Prompt(
            self.text
                .replace(FILES_PLACEHOLDER, &files)
                .replace(DIFF_PLACEHOLDER, &diff),
        )
    }
}

fn truncate_diff(diff: &str) -> String {
    if diff.chars().count() <= MAX_DIFF_CHARS {
        return diff.to_string();
    }
    let mut cut: String = diff.chars().take(MAX_DIFF_CHARS).collect();
    cut.push_str(TRUNCATION_MARKER);
    cut
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_changes() -> ChangeSet {
        ChangeSet {
            files: vec!["src/main.rs".to_string(), "Cargo.toml".to_string()],
            diff: "+fn main() {}\n-fn old() {}".to_string(),
        }
    }

    #[test]
    fn substitutes_both_placeholders() {
        let template =
            PromptTemplate::from_text("files:\n{files}\ndiff:\n{diff}\nend".to_string()).unwrap();
        let prompt = template.render(&sample_changes());
        assert_eq!(
            prompt.as_str(),
            "files:\nsrc/main.rs\nCargo.toml\ndiff:\n+fn main() {}\n-fn old() {}\nend"
        );
        assert!(!prompt.as_str().contains(FILES_PLACEHOLDER));
        assert!(!prompt.as_str().contains(DIFF_PLACEHOLDER));
    }

    #[test]
    fn file_list_and_diff_survive_rendering_verbatim() {
        let changes = sample_changes();
        let template = PromptTemplate::built_in(MessageLanguage::English);
        let prompt = template.render(&changes);
        assert!(prompt.as_str().contains(&changes.files.join("\n")));
        assert!(prompt.as_str().contains(&changes.diff));
    }

    #[test]
    fn rejects_template_without_placeholders() {
        assert!(PromptTemplate::from_text("only {diff} here".to_string()).is_err());
        assert!(PromptTemplate::from_text("only {files} here".to_string()).is_err());
        assert!(PromptTemplate::from_text("neither".to_string()).is_err());
    }

    #[test]
    fn truncates_oversized_diffs() {
        let changes = ChangeSet {
            files: vec!["big.rs".to_string()],
            diff: "x".repeat(MAX_DIFF_CHARS + 100),
        };
        let template = PromptTemplate::from_text("{files} {diff}".to_string()).unwrap();
        let prompt = template.render(&changes);
        assert!(prompt.as_str().ends_with("... (truncated)"));
        assert!(prompt.as_str().len() < MAX_DIFF_CHARS + 100);
    }

    #[test]
    fn built_in_template_carries_language_instruction() {
        let korean = PromptTemplate::built_in(MessageLanguage::Korean);
        let prompt = korean.render(&sample_changes());
        assert!(prompt.as_str().contains("write the body in Korean"));
        assert!(!prompt.as_str().contains("{language}"));
    }

    #[test]
    fn parses_language_codes() {
        assert_eq!(MessageLanguage::from_str("en"), Some(MessageLanguage::English));
        assert_eq!(MessageLanguage::from_str("KO"), Some(MessageLanguage::Korean));
        assert_eq!(MessageLanguage::from_str("fr"), None);
    }
}
