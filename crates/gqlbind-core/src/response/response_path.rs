use crate::response::PathSegment;

/// Location of a value within a decoded response, rooted at `data`.
///
/// Displays as `data.hero.friends[0].name`.
#[derive(Clone, Debug, Default, Eq, Hash, PartialEq)]
pub struct ResponsePath(Vec<PathSegment>);
impl ResponsePath {
    pub fn root() -> Self {
        Self(vec![])
    }

    pub fn join(&self, segment: impl Into<PathSegment>) -> Self {
        let mut segments = self.0.clone();
        segments.push(segment.into());
        Self(segments)
    }

    pub(crate) fn push(&mut self, segment: impl Into<PathSegment>) {
        self.0.push(segment.into());
    }

    pub(crate) fn pop(&mut self) {
        self.0.pop();
    }

    pub fn segments(&self) -> &[PathSegment] {
        self.0.as_slice()
    }
}
impl std::fmt::Display for ResponsePath {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "data")?;
        for segment in &self.0 {
            match segment {
                PathSegment::Index(idx) => write!(f, "[{idx}]")?,
                PathSegment::Key(key) => write!(f, ".{key}")?,
            }
        }
        Ok(())
    }
}
