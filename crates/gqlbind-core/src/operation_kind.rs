/// The kind of operation a [`RequestTemplate`](crate::document::RequestTemplate)
/// performs. Decides which root type of the schema the request selects from and
/// which transport is able to execute it.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum OperationKind {
    Mutation,
    Query,
    Subscription,
}
impl OperationKind {
    /// Parse the keyword used in an operation header (`query`, `mutation`,
    /// `subscription`).
    pub fn from_keyword(keyword: &str) -> Option<Self> {
        match keyword {
            "mutation" => Some(Self::Mutation),
            "query" => Some(Self::Query),
            "subscription" => Some(Self::Subscription),
            _ => None,
        }
    }

    /// The keyword that introduces an operation of this kind.
    pub fn keyword(&self) -> &'static str {
        match self {
            Self::Mutation => "mutation",
            Self::Query => "query",
            Self::Subscription => "subscription",
        }
    }
}
impl std::fmt::Display for OperationKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.keyword())
    }
}
