//! A hand-written stand-in for the code a client generator emits for the
//! Star Wars schema: response shapes, typed results and interface-typed
//! field bindings.

use crate::assignment::AssignmentTypeError;
use crate::assignment::FieldBinding;
use crate::assignment::ImplementsInterfaces;
use crate::assignment::InterfaceSet;
use crate::binder::BoundRequest;
use crate::decoder::DecodingError;
use crate::response::FromResponseValue;
use crate::response::ResponseEnvelope;
use crate::response::ResponsePath;
use crate::response::ResponseValue;
use crate::response::TypedObject;
use crate::schema::SchemaRegistry;
use crate::shape::ObjectShape;
use crate::shape::ResponseShape;
use crate::shape::ShapeNode;
use crate::transport::QueryTransport;
use crate::transport::TransportError;
use chrono::DateTime;
use chrono::FixedOffset;
use std::sync::Arc;
use std::sync::Mutex;

pub(super) const STAR_WARS_SDL: &str = r#"
scalar DateTime

enum Episode { NEWHOPE EMPIRE JEDI }

interface Node { id: ID! }

interface Character implements Node {
  id: ID!
  name: String
  appearsIn: [Episode]!
}

interface Pilot { starships: [String!] }

type Human implements Character & Node & Pilot {
  id: ID!
  name: String
  appearsIn: [Episode]!
  homePlanet: String
  starships: [String!]
}

type Droid implements Character & Node {
  id: ID!
  name: String
  appearsIn: [Episode]!
  primaryFunction: String
}

type Review {
  stars: Int!
  commentary: String
  createdAt: DateTime
}

type Query {
  hero(episode: Episode): Character
  withoutParameters: [Character]
}

type Subscription {
  reviewAdded(episode: Episode): Review
}
"#;

pub(super) fn registry() -> Arc<SchemaRegistry> {
    let registry = SchemaRegistry::builder()
        .load_str(None, STAR_WARS_SDL)
        .and_then(|builder| builder.build())
        .expect("star wars schema builds");
    Arc::new(registry)
}

fn character_shape() -> ObjectShape {
    ObjectShape::polymorphic("Character")
        .with_leaf("id", "ID")
        .with_leaf("name", "String")
        .with_list("appearsIn", ShapeNode::leaf("Episode"))
        .with_variant(ObjectShape::new("Human").with_leaf("homePlanet", "String"))
        .with_variant(ObjectShape::new("Droid").with_leaf("primaryFunction", "String"))
}

pub(super) fn hero_shape() -> ResponseShape {
    ResponseShape::new(ObjectShape::new("Query").with_object("hero", character_shape()))
}

pub(super) fn without_parameters_shape() -> ResponseShape {
    ResponseShape::new(
        ObjectShape::new("Query").with_list("withoutParameters", ShapeNode::Object(character_shape())),
    )
}

pub(super) fn review_added_shape() -> ResponseShape {
    ResponseShape::new(
        ObjectShape::new("Subscription").with_object(
            "reviewAdded",
            ObjectShape::new("Review")
                .with_leaf("stars", "Int")
                .with_leaf("commentary", "String")
                .with_leaf("createdAt", "DateTime"),
        ),
    )
}

fn object<'a>(value: &'a ResponseValue, path: &ResponsePath) -> Result<&'a TypedObject, DecodingError> {
    value.as_object().ok_or_else(|| DecodingError::UnexpectedValue {
        expected: "an object".to_string(),
        found: value.kind_name(),
        path: path.clone(),
    })
}

#[derive(Clone, Debug, PartialEq)]
pub(super) struct Human {
    pub appears_in: Vec<Option<String>>,
    pub home_planet: Option<String>,
    pub id: String,
    pub name: Option<String>,
}
impl FromResponseValue for Human {
    fn from_response_value(value: &ResponseValue, path: &ResponsePath) -> Result<Self, DecodingError> {
        let object = object(value, path)?;
        Ok(Self {
            appears_in: object.get_at("appearsIn", path)?,
            home_planet: object.get_at("homePlanet", path)?,
            id: object.get_at("id", path)?,
            name: object.get_at("name", path)?,
        })
    }
}

#[derive(Clone, Debug, PartialEq)]
pub(super) struct Droid {
    pub appears_in: Vec<Option<String>>,
    pub id: String,
    pub name: Option<String>,
    pub primary_function: Option<String>,
}
impl FromResponseValue for Droid {
    fn from_response_value(value: &ResponseValue, path: &ResponsePath) -> Result<Self, DecodingError> {
        let object = object(value, path)?;
        Ok(Self {
            appears_in: object.get_at("appearsIn", path)?,
            id: object.get_at("id", path)?,
            name: object.get_at("name", path)?,
            primary_function: object.get_at("primaryFunction", path)?,
        })
    }
}

/// The closed set of `Character` implementations known to the client.
#[derive(Clone, Debug, PartialEq)]
pub(super) enum Character {
    Droid(Droid),
    Human(Human),
}
impl FromResponseValue for Character {
    fn from_response_value(value: &ResponseValue, path: &ResponsePath) -> Result<Self, DecodingError> {
        match object(value, path)?.typename() {
            "Droid" => Droid::from_response_value(value, path).map(Self::Droid),
            "Human" => Human::from_response_value(value, path).map(Self::Human),
            typename => Err(DecodingError::UnknownDiscriminator {
                path: path.clone(),
                type_name: "Character".to_string(),
                typename: typename.to_string(),
            }),
        }
    }
}
impl ImplementsInterfaces for Character {
    fn concrete_type_name(&self) -> &str {
        match self {
            Self::Droid(_) => "Droid",
            Self::Human(_) => "Human",
        }
    }

    fn implements_interface(&self, interface_name: &str) -> bool {
        match self {
            Self::Droid(_) => matches!(interface_name, "Character" | "Node"),
            Self::Human(_) => matches!(interface_name, "Character" | "Node" | "Pilot"),
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub(super) struct Review {
    pub commentary: Option<String>,
    pub created_at: Option<DateTime<FixedOffset>>,
    pub stars: i32,
}
impl FromResponseValue for Review {
    fn from_response_value(value: &ResponseValue, path: &ResponsePath) -> Result<Self, DecodingError> {
        let object = object(value, path)?;
        Ok(Self {
            commentary: object.get_at("commentary", path)?,
            created_at: object.get_at("createdAt", path)?,
            stars: object.get_at("stars", path)?,
        })
    }
}

/// A generated holder type with two `Character`-typed fields. The generator
/// narrowed `pilot`'s binding to characters that are also pilots.
#[derive(Debug, Default)]
pub(super) struct Squadron {
    leader: Option<Character>,
    pilot: Option<Character>,
}
impl Squadron {
    fn leader_binding() -> FieldBinding {
        FieldBinding::new("Squadron", "leader", InterfaceSet::from_iter(["Character", "Node"]))
    }

    fn pilot_binding() -> FieldBinding {
        FieldBinding::new(
            "Squadron",
            "pilot",
            InterfaceSet::from_iter(["Character", "Node", "Pilot"]),
        )
    }

    pub fn leader(&self) -> Option<&Character> {
        self.leader.as_ref()
    }

    pub fn pilot(&self) -> Option<&Character> {
        self.pilot.as_ref()
    }

    pub fn set_leader(&mut self, leader: Option<Character>) -> Result<(), AssignmentTypeError> {
        Self::leader_binding().check_assign(leader.as_ref())?;
        self.leader = leader;
        Ok(())
    }

    pub fn set_pilot(&mut self, pilot: Option<Character>) -> Result<(), AssignmentTypeError> {
        Self::pilot_binding().check_assign(pilot.as_ref())?;
        self.pilot = pilot;
        Ok(())
    }
}

/// Answers every request with the same envelope and remembers what it was
/// sent.
#[derive(Debug)]
pub(super) struct ReplayTransport {
    response: serde_json::Value,
    sent: Mutex<Vec<BoundRequest>>,
}
impl ReplayTransport {
    pub fn new(response: serde_json::Value) -> Self {
        Self {
            response,
            sent: Mutex::new(vec![]),
        }
    }

    pub fn sent(&self) -> Vec<BoundRequest> {
        self.sent.lock().map(|sent| sent.clone()).unwrap_or_default()
    }
}
impl QueryTransport for ReplayTransport {
    async fn send(&self, request: &BoundRequest) -> Result<ResponseEnvelope, TransportError> {
        if let Ok(mut sent) = self.sent.lock() {
            sent.push(request.clone());
        }
        serde_json::from_value(self.response.clone())
            .map_err(|err| TransportError::InvalidResponse(err.to_string()))
    }
}
