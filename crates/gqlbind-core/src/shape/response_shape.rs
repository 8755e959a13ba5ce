use crate::shape::ObjectShape;

/// The shape of a whole response: an [`ObjectShape`] for the operation's
/// root type.
#[derive(Clone, Debug, PartialEq)]
pub struct ResponseShape {
    root: ObjectShape,
}
impl ResponseShape {
    pub fn new(root: ObjectShape) -> Self {
        Self { root }
    }

    pub fn root(&self) -> &ObjectShape {
        &self.root
    }

    pub fn selection_text(&self) -> String {
        self.root.selection_text()
    }
}
