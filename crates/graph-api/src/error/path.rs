/// Response path of a field error, from the root down to the failing field.
#[derive(Debug, PartialEq, Eq, PartialOrd, Ord, Clone, Default, serde::Serialize)]
#[serde(transparent)]
pub struct ErrorPath(Vec<ErrorPathSegment>);

impl std::ops::Deref for ErrorPath {
    type Target = Vec<ErrorPathSegment>;
    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl std::ops::DerefMut for ErrorPath {
    fn deref_mut(&mut self) -> &mut Self::Target {
        &mut self.0
    }
}

impl From<Vec<ErrorPathSegment>> for ErrorPath {
    fn from(segments: Vec<ErrorPathSegment>) -> Self {
        ErrorPath(segments)
    }
}

impl ErrorPath {
    #[must_use]
    pub(crate) fn child(&self, segment: impl Into<ErrorPathSegment>) -> ErrorPath {
        let mut path = self.clone();
        path.push(segment.into());
        path
    }
}

#[derive(Debug, PartialEq, Eq, PartialOrd, Ord, Clone, serde::Serialize)]
#[serde(untagged)]
pub enum ErrorPathSegment {
    Field(String),
    Index(usize),
}

impl From<&str> for ErrorPathSegment {
    fn from(key: &str) -> Self {
        ErrorPathSegment::Field(key.to_owned())
    }
}

impl From<usize> for ErrorPathSegment {
    fn from(index: usize) -> Self {
        ErrorPathSegment::Index(index)
    }
}

impl std::fmt::Display for ErrorPath {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        for (i, segment) in self.0.iter().enumerate() {
            if i > 0 {
                f.write_str(".")?;
            }
            match segment {
                ErrorPathSegment::Field(key) => f.write_str(key)?,
                ErrorPathSegment::Index(index) => write!(f, "{index}")?,
            }
        }
        Ok(())
    }
}
