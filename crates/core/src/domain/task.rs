// Task Domain Model

use super::error::{DomainError, Result};
use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

/// Serialized form of a unit of work.
///
/// The queue only ever stores tokens; the value a token was rendered from
/// is dropped right after submission.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct TaskToken(String);

impl TaskToken {
    pub fn new(s: impl Into<String>) -> Self {
        Self(s.into())
    }

    /// Render any displayable task into a token (called once per submission)
    pub fn render<T: fmt::Display + ?Sized>(task: &T) -> Self {
        Self(task.to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }
}

impl fmt::Display for TaskToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// What to do with a file
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CipherAction {
    Encrypt,
    Decrypt,
}

impl fmt::Display for CipherAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CipherAction::Encrypt => write!(f, "ENCRYPT"),
            CipherAction::Decrypt => write!(f, "DECRYPT"),
        }
    }
}

impl FromStr for CipherAction {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "ENCRYPT" => Ok(CipherAction::Encrypt),
            "DECRYPT" => Ok(CipherAction::Decrypt),
            other => Err(DomainError::InvalidToken(format!(
                "unknown action '{}'",
                other
            ))),
        }
    }
}

/// A file-level task: `<path>,<ACTION>` in token form
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileTask {
    pub path: PathBuf,
    pub action: CipherAction,
}

impl FileTask {
    pub fn new(path: impl Into<PathBuf>, action: CipherAction) -> Self {
        Self {
            path: path.into(),
            action,
        }
    }
}

impl fmt::Display for FileTask {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{},{}", self.path.display(), self.action)
    }
}

impl FromStr for FileTask {
    type Err = DomainError;

    /// Splits at the last comma, so paths may themselves contain commas
    fn from_str(s: &str) -> Result<Self> {
        let (path, action) = s
            .rsplit_once(',')
            .ok_or_else(|| DomainError::InvalidToken(format!("missing action in '{}'", s)))?;

        if path.is_empty() {
            return Err(DomainError::InvalidToken(format!("empty path in '{}'", s)));
        }

        Ok(Self {
            path: PathBuf::from(path),
            action: action.parse()?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_file_task_token_form() {
        let task = FileTask::new("data/a.txt", CipherAction::Encrypt);
        assert_eq!(TaskToken::render(&task).as_str(), "data/a.txt,ENCRYPT");
    }

    #[test]
    fn test_file_task_parse_keeps_commas_in_path() {
        let task: FileTask = "dir,with,commas/b.bin,DECRYPT".parse().unwrap();
        assert_eq!(task.path, PathBuf::from("dir,with,commas/b.bin"));
        assert_eq!(task.action, CipherAction::Decrypt);
    }

    #[test]
    fn test_file_task_parse_rejects_bad_tokens() {
        assert!("no-action-here".parse::<FileTask>().is_err());
        assert!(",ENCRYPT".parse::<FileTask>().is_err());

        let err = "a.txt,SHRED".parse::<FileTask>().unwrap_err();
        assert!(err.to_string().contains("unknown action"));
    }

    #[test]
    fn test_token_render_from_str() {
        let token = TaskToken::render("plain");
        assert_eq!(token, TaskToken::new("plain"));
        assert_eq!(token.to_string(), "plain");
    }
}
