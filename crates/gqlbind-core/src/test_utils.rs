use crate::schema::SchemaRegistry;

pub(crate) const STAR_WARS_SDL: &str = r#"
schema {
  query: Query
  mutation: Mutation
  subscription: Subscription
}

scalar DateTime
scalar JSON

enum Episode { NEWHOPE EMPIRE JEDI }

interface Node {
  id: ID!
}

interface Character implements Node {
  id: ID!
  name: String
  friends: [Character]
  appearsIn: [Episode]!
}

type Human implements Character & Node {
  id: ID!
  name: String
  friends: [Character]
  appearsIn: [Episode]!
  homePlanet: String
}

type Droid implements Character & Node {
  id: ID!
  name: String
  friends: [Character]
  appearsIn: [Episode]!
  primaryFunction: String
}

union SearchResult = Human | Droid

input ReviewInput {
  stars: Int!
  commentary: String
  episodes: [Episode!]
  meta: JSON
}

type Review {
  stars: Int!
  commentary: String
  createdAt: DateTime
}

type Query {
  hero(episode: Episode): Character
  human(id: ID!): Human
  droid(id: ID!): Droid
  search(text: String!, limit: Int = 10): [SearchResult]
  withoutParameters: [Character]
  withListOfList: [[Float]]
  reviews(episode: Episode!, since: DateTime): [Review!]!
}

type Mutation {
  createReview(episode: Episode!, review: ReviewInput!): Review
}

type Subscription {
  reviewAdded(episode: Episode): Review
}
"#;

pub(crate) fn star_wars_registry() -> SchemaRegistry {
    SchemaRegistry::builder()
        .load_str(None, STAR_WARS_SDL)
        .expect("schema parses")
        .build()
        .expect("schema builds")
}
