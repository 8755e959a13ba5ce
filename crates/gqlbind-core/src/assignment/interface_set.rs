use std::collections::BTreeSet;

/// A set of interface names, kept sorted so that error messages are stable.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct InterfaceSet(BTreeSet<String>);
impl InterfaceSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn contains(&self, interface_name: &str) -> bool {
        self.0.contains(interface_name)
    }

    pub fn insert(&mut self, interface_name: impl Into<String>) -> bool {
        self.0.insert(interface_name.into())
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }
}
impl<S: Into<String>> std::iter::FromIterator<S> for InterfaceSet {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        Self(iter.into_iter().map(Into::into).collect())
    }
}
impl std::fmt::Display for InterfaceSet {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{{")?;
        for (idx, name) in self.0.iter().enumerate() {
            if idx > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{name}")?;
        }
        write!(f, "}}")
    }
}
