/// Which changes the inspector should describe.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DiffScope {
    /// Only changes staged for the next commit (`git diff --staged`).
    Staged,
    /// Everything the working tree differs from HEAD, staged or not.
    WorkingTree,
}

/// One invocation's worth of repository changes: the changed file paths in
/// diff order plus the unified diff text.
#[derive(Debug, Clone, Default)]
pub struct ChangeSet {
    pub files: Vec<String>,
    pub diff: String,
}

impl ChangeSet {
    pub fn is_empty(&self) -> bool {
        self.diff.trim().is_empty() || self.files.is_empty()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileCategory {
    Source,
    Tests,
    Docs,
    Config,
    Other,
}

impl FileCategory {
    pub fn as_str(&self) -> &'static str {
        match self {
            FileCategory::Source => "source",
            FileCategory::Tests => "tests",
            FileCategory::Docs => "docs",
            FileCategory::Config => "config",
            FileCategory::Other => "other",
        }
    }

    pub fn of(path: &str) -> Self {
        let lower = path.to_lowercase();
        let file_name = lower.rsplit('/').next().unwrap_or(&lower);
        let extension = file_name.rsplit_once('.').map(|(_, ext)| ext);

        let in_test_dir = lower
            .split('/')
            .any(|segment| segment == "tests" || segment == "test");
        if in_test_dir || file_name.starts_with("test_") || file_name.ends_with("_test.rs") {
            return FileCategory::Tests;
        }

        if lower.split('/').any(|segment| segment == "docs" || segment == "doc") {
            return FileCategory::Docs;
        }

        match extension {
            Some("md" | "rst" | "adoc" | "txt") => FileCategory::Docs,
            Some("toml" | "yaml" | "yml" | "json" | "ini" | "cfg" | "lock") => FileCategory::Config,
            Some(
                "rs" | "py" | "js" | "jsx" | "ts" | "tsx" | "go" | "java" | "kt" | "rb" | "c"
                | "cc" | "cpp" | "h" | "hpp" | "sh" | "sql",
            ) => FileCategory::Source,
            _ if file_name == "dockerfile" || file_name == "makefile" => FileCategory::Config,
            _ => FileCategory::Other,
        }
    }
}

const CATEGORY_ORDER: [FileCategory; 5] = [
    FileCategory::Source,
    FileCategory::Tests,
    FileCategory::Docs,
    FileCategory::Config,
    FileCategory::Other,
];

/// Groups changed paths by category, in a fixed category order, preserving the
/// original path order inside each group. Empty categories are omitted.
pub fn categorize(files: &[String]) -> Vec<(FileCategory, Vec<&str>)> {
    CATEGORY_ORDER
        .iter()
        .filter_map(|category| {
            let members = files
                .iter()
                .filter(|path| FileCategory::of(path) == *category)
                .map(String::as_str)
                .collect::<Vec<_>>();
            if members.is_empty() {
                None
            } else {
                Some((*category, members))
            }
        })
        .collect()
}
