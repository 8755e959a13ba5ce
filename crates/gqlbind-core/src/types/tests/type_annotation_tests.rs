use crate::types::TypeAnnotation;

#[test]
fn display_renders_nested_lists_and_non_null_markers() {
    let annot = TypeAnnotation::list_of(
        TypeAnnotation::list_of(TypeAnnotation::named("Float")),
    ).non_null();

    assert_eq!(annot.to_string(), "[[Float]]!");
    assert_eq!(annot.innermost_name(), "Float");
    assert!(!annot.nullable());
}

#[test]
fn parse_round_trips_through_display() {
    for text in ["Int", "Int!", "[String]", "[String!]!", "[[Float]]", "[[Episode!]!]"] {
        let annot: TypeAnnotation = text.parse().expect("valid type annotation");
        assert_eq!(annot.to_string(), text);
    }
}

#[test]
fn parse_tolerates_whitespace_and_newlines() {
    let annot: TypeAnnotation = " [ \n Episode ! ] ! ".parse().unwrap();
    assert_eq!(annot.to_string(), "[Episode!]!");
}

#[test]
fn parse_rejects_unbalanced_brackets() {
    assert!("[Int".parse::<TypeAnnotation>().is_err());
    assert!("Int]".parse::<TypeAnnotation>().is_err());
    assert!("".parse::<TypeAnnotation>().is_err());
}

#[test]
fn nullability_toggles_only_outermost_level() {
    let annot = TypeAnnotation::list_of(TypeAnnotation::named("ID").non_null())
        .non_null();
    let nullable = annot.clone().into_nullable();

    assert!(nullable.nullable());
    assert!(!nullable.list_item().unwrap().nullable());
    assert_eq!(nullable.to_string(), "[ID!]");
}
