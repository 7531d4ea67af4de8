use std::fmt;

use crate::error::{McetError, McetResult};

const FORBIDDEN: [char; 6] = ['.', '#', '$', '[', ']', '/'];

/// Slash-separated location in the store, e.g. `attendance/jo@x_edu/2025-03-07`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub struct StorePath {
    segments: Vec<String>,
}

impl StorePath {
    pub fn root() -> Self {
        StorePath::default()
    }

    /// Parse a `/`-joined path. Empty segments are rejected.
    pub fn parse(path: &str) -> McetResult<Self> {
        let path = path.trim_matches('/');
        if path.is_empty() {
            return Ok(StorePath::root());
        }
        path.split('/')
            .try_fold(StorePath::root(), |acc, segment| acc.child(segment))
    }

    pub fn child(&self, segment: impl AsRef<str>) -> McetResult<Self> {
        let segment = segment.as_ref();
        validate_segment(segment)?;

        let mut segments = self.segments.clone();
        segments.push(segment.to_string());
        Ok(StorePath { segments })
    }

    pub fn segments(&self) -> &[String] {
        &self.segments
    }

    pub fn is_root(&self) -> bool {
        self.segments.is_empty()
    }
}

fn validate_segment(segment: &str) -> McetResult<()> {
    if segment.is_empty() {
        return Err(McetError::InvalidArgument("empty store path segment".into()));
    }
    if let Some(c) = segment
        .chars()
        .find(|c| FORBIDDEN.contains(c) || c.is_control())
    {
        return Err(McetError::InvalidArgument(format!(
            "store path segment '{}' contains forbidden character {:?}",
            segment, c
        )));
    }
    Ok(())
}

impl fmt::Display for StorePath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "/{}", self.segments.join("/"))
    }
}
