//! Repository locator
//!
//! Resolves a repository URL into the owner/name pair the host API expects.

use crate::error::RepoRefError;

/// Owner/name pair identifying a repository on the source-control host
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RepoRef {
    pub owner: String,
    pub name: String,
}

impl RepoRef {
    /// Extract the last two path segments of a repository URL as (owner, name)
    ///
    /// A trailing `.git` on the name is stripped. Fails when the URL is empty
    /// or has fewer than two non-empty trailing segments. Pure, no I/O.
    pub fn parse(url: &str) -> Result<Self, RepoRefError> {
        let trimmed = url.trim().trim_end_matches('/');
        if trimmed.is_empty() {
            return Err(RepoRefError::EmptyUrl);
        }

        let parts: Vec<&str> = trimmed.split('/').collect();
        if parts.len() < 2 {
            return Err(RepoRefError::MissingSegments(url.to_string()));
        }

        let owner = parts[parts.len() - 2];
        let name = parts[parts.len() - 1].trim_end_matches(".git");
        if owner.is_empty() || name.is_empty() {
            return Err(RepoRefError::MissingSegments(url.to_string()));
        }

        Ok(Self {
            owner: owner.to_string(),
            name: name.to_string(),
        })
    }
}

impl std::fmt::Display for RepoRef {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}/{}", self.owner, self.name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_github_url() {
        let repo = RepoRef::parse("https://github.com/rust-lang/rust").unwrap();
        assert_eq!(repo.owner, "rust-lang");
        assert_eq!(repo.name, "rust");
    }

    #[test]
    fn test_parse_strips_git_suffix() {
        let repo = RepoRef::parse("https://github.com/user/repo.git").unwrap();
        assert_eq!(repo.owner, "user");
        assert_eq!(repo.name, "repo");
    }

    #[test]
    fn test_parse_trailing_slash() {
        let repo = RepoRef::parse("https://github.com/user/repo/").unwrap();
        assert_eq!(repo.owner, "user");
        assert_eq!(repo.name, "repo");
    }

    #[test]
    fn test_parse_takes_last_two_segments() {
        // The locator is host-agnostic: any URL with two trailing segments works.
        let repo = RepoRef::parse("https://host.example/group/sub/project").unwrap();
        assert_eq!(repo.owner, "sub");
        assert_eq!(repo.name, "project");
    }

    #[test]
    fn test_parse_empty_url() {
        assert!(matches!(RepoRef::parse(""), Err(RepoRefError::EmptyUrl)));
        assert!(matches!(RepoRef::parse("   "), Err(RepoRefError::EmptyUrl)));
    }

    #[test]
    fn test_parse_too_few_segments() {
        assert!(matches!(
            RepoRef::parse("repo-with-no-slash"),
            Err(RepoRefError::MissingSegments(_))
        ));
        // "https://x" splits into an empty owner segment
        assert!(matches!(
            RepoRef::parse("https://x"),
            Err(RepoRefError::MissingSegments(_))
        ));
    }

    #[test]
    fn test_display() {
        let repo = RepoRef::parse("https://github.com/dialite/sage").unwrap();
        assert_eq!(repo.to_string(), "dialite/sage");
    }
}
