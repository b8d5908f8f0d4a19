use colored::{ColoredString, Colorize};

const LABEL_WIDTH: usize = 8;

/// How a staged file relates to the working tree copy
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Default)]
pub enum WorkspaceChangeType {
    #[default]
    None,
    Untracked,
    Modified,
    Deleted,
}

/// How a staged file relates to the HEAD tree
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Default)]
pub enum IndexChangeType {
    #[default]
    None,
    Added,
    Modified,
    Deleted,
}

/// Changes of one file against both comparison bases
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Default)]
pub struct FileChange {
    pub(crate) workspace_change: WorkspaceChangeType,
    pub(crate) index_change: IndexChangeType,
}

/// A single line in one of the status sections
///
/// Index changes print green, workspace changes red, untracked files get
/// no label at all. Labels are padded so paths line up.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
pub enum FileChangeType {
    Untracked,
    Workspace(WorkspaceChangeType),
    Index(IndexChangeType),
}

impl FileChangeType {
    fn label(&self) -> ColoredString {
        match self {
            FileChangeType::Untracked => "".normal(),
            FileChangeType::Workspace(change) => match change {
                WorkspaceChangeType::Modified => "modified:   ".red(),
                WorkspaceChangeType::Deleted => "deleted:    ".red(),
                WorkspaceChangeType::None | WorkspaceChangeType::Untracked => "".normal(),
            },
            FileChangeType::Index(change) => match change {
                IndexChangeType::Added => "new file:   ".green(),
                IndexChangeType::Modified => "modified:   ".green(),
                IndexChangeType::Deleted => "deleted:    ".green(),
                IndexChangeType::None => "".normal(),
            },
        }
    }
}

impl std::fmt::Display for FileChangeType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:>width$}{}", "", self.label(), width = LABEL_WIDTH)
    }
}
