use crate::assignment::InterfaceSet;
use crate::response::FromResponseValue;
use crate::response::ResponsePath;
use crate::response::ResponseValue;
use crate::response::TypedObject;
use crate::tests::star_wars_client;
use crate::tests::star_wars_client::Character;
use crate::tests::star_wars_client::Squadron;
use crate::Value;

fn character(typename: &str, id: &str) -> Character {
    let object = TypedObject::new(typename)
        .with_field("id", ResponseValue::from(Value::from(id)))
        .with_field("name", ResponseValue::Null)
        .with_field("appearsIn", ResponseValue::List(vec![]))
        .with_field("homePlanet", ResponseValue::Null)
        .with_field("primaryFunction", ResponseValue::Null);
    Character::from_response_value(&ResponseValue::Object(object), &ResponsePath::root()).unwrap()
}

#[test]
fn setter_accepts_values_implementing_every_required_interface() {
    let mut squadron = Squadron::default();

    squadron.set_leader(Some(character("Droid", "2001"))).unwrap();
    squadron.set_pilot(Some(character("Human", "1000"))).unwrap();

    assert!(matches!(squadron.leader(), Some(Character::Droid(droid)) if droid.id == "2001"));
    assert!(matches!(squadron.pilot(), Some(Character::Human(human)) if human.id == "1000"));
}

#[test]
fn setter_rejects_a_variant_missing_a_required_interface() {
    let mut squadron = Squadron::default();
    squadron.set_pilot(Some(character("Human", "1000"))).unwrap();

    let err = squadron.set_pilot(Some(character("Droid", "2001"))).unwrap_err();

    assert_eq!(err.concrete_type, "Droid");
    assert_eq!(err.owner_type, "Squadron");
    assert_eq!(err.field_name, "pilot");
    assert_eq!(err.missing, InterfaceSet::from_iter(["Pilot"]));
    assert_eq!(
        err.to_string(),
        "`Squadron.pilot` requires {Character, Node, Pilot} but `Droid` does not implement {Pilot}",
    );
    // A rejected assignment leaves the field as it was.
    assert!(matches!(squadron.pilot(), Some(Character::Human(_))));
}

#[test]
fn setter_accepts_clearing_the_field() {
    let mut squadron = Squadron::default();
    squadron.set_pilot(Some(character("Human", "1000"))).unwrap();

    squadron.set_pilot(None).unwrap();

    assert!(squadron.pilot().is_none());
}

#[test]
fn declared_binding_matches_the_schema() {
    let registry = star_wars_client::registry();

    let binding = registry.declared_binding("Query", "hero").unwrap();

    assert_eq!(binding.owner_type(), "Query");
    assert_eq!(binding.field_name(), "hero");
    assert_eq!(binding.required(), &InterfaceSet::from_iter(["Character", "Node"]));
    binding.check_assign(Some(&character("Droid", "2001"))).unwrap();
}
