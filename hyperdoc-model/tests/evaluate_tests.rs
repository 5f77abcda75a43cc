use hyperdoc_model::{evaluate, identify, Cardinality, Entity, Expr, Link, Schema, SchemaRegistry};
use hyperdoc_types::{Context, DeclarationError, ResourceKey};
use pretty_assertions::assert_eq;
use serde_json::{json, Value};

fn registry() -> SchemaRegistry {
    let mut registry = SchemaRegistry::new();
    registry
        .register(
            "user",
            Schema::builder()
                .type_name("users")
                .attributes(&["name", "age"])
                .property("controller_name", Expr::context("name"))
                .property("message_from_above", Expr::context("message"))
                .link("self", Expr::format("http://foo.bar.com/{id}"))
                .link("empty", Value::Null)
                .collection("friends", "user")
                .with_context(Context::from_iter([("message", "Merged into parent's context")]))
                .entity("manager", "manager")
                .meta("nation", "zulu")
                .build(),
        )
        .register(
            "manager",
            Schema::builder()
                .type_name("managers")
                .attributes(&["name", "age"])
                .link("self", Expr::format("http://foo.bar.com/{id}"))
                .build(),
        );
    registry
}

fn user() -> Value {
    json!({
        "id": 1,
        "name": "Ismael",
        "age": 35,
        "friends": [{"id": 2, "name": "Joe", "age": 33, "friends": []}],
        "manager": {"id": 3, "name": "Jane", "age": 40}
    })
}

fn context() -> Context {
    Context::from_iter([("name", "some_controller")])
}

// ── Identity ─────────────────────────────────────────────────────

#[test]
fn identify_uses_schema_type_and_subject_id() {
    let registry = registry();
    let key = identify(registry.get("user").unwrap(), &user()).unwrap();
    assert_eq!(key, ResourceKey::new("users", "1"));
}

#[test]
fn identify_without_type_uses_empty_type() {
    let schema = Schema::builder().build();
    let key = identify(&schema, &json!({"id": "abc"})).unwrap();
    assert_eq!(key, ResourceKey::new("", "abc"));
}

#[test]
fn identify_without_id_errs() {
    let registry = registry();
    let err = identify(registry.get("user").unwrap(), &json!({"name": "x"})).unwrap_err();
    assert_eq!(
        err,
        DeclarationError::MissingIdentifier { type_name: "users".into() }
    );
}

#[test]
fn identify_null_id_errs() {
    let registry = registry();
    assert!(identify(registry.get("user").unwrap(), &json!({"id": null})).is_err());
}

// ── Properties & context ─────────────────────────────────────────

#[test]
fn properties_follow_declaration_order() {
    let evaluation = registry().evaluate("user", &user(), &context()).unwrap();
    let names: Vec<&str> = evaluation.properties.keys().map(String::as_str).collect();
    assert_eq!(
        names,
        vec!["name", "age", "controller_name", "message_from_above"]
    );
}

#[test]
fn properties_read_subject_and_context() {
    let evaluation = registry().evaluate("user", &user(), &context()).unwrap();
    assert_eq!(evaluation.properties["name"], json!("Ismael"));
    assert_eq!(evaluation.properties["age"], json!(35));
    assert_eq!(evaluation.properties["controller_name"], json!("some_controller"));
    assert_eq!(evaluation.properties["message_from_above"], json!(null));
}

#[test]
fn identifier_keeps_original_value() {
    let evaluation = registry().evaluate("user", &user(), &context()).unwrap();
    assert_eq!(evaluation.id, json!(1));
    assert_eq!(evaluation.key.id(), "1");
}

#[test]
fn later_property_replaces_value_in_place() {
    let schema = Schema::builder()
        .property("a", "first")
        .property("b", "b")
        .property("a", "second")
        .build();
    let evaluation = evaluate(&SchemaRegistry::new(), &schema, &json!({"id": 1}), &Context::new())
        .unwrap();
    let pairs: Vec<(&str, &Value)> = evaluation
        .properties
        .iter()
        .map(|(k, v)| (k.as_str(), v))
        .collect();
    assert_eq!(pairs, vec![("a", &json!("second")), ("b", &json!("b"))]);
}

#[test]
fn computed_property_sees_subject_and_context() {
    let schema = Schema::builder()
        .property_with("greeting", |subject, ctx| {
            let name = subject.read("name").unwrap_or(Value::Null);
            let from = ctx.get("name").cloned().unwrap_or(Value::Null);
            json!(format!("{} via {}", name.as_str().unwrap_or("?"), from.as_str().unwrap_or("?")))
        })
        .build();
    let evaluation = evaluate(&SchemaRegistry::new(), &schema, &user(), &context()).unwrap();
    assert_eq!(
        evaluation.properties["greeting"],
        json!("Ismael via some_controller")
    );
}

#[test]
fn object_expression_evaluates_members() {
    let schema = Schema::builder()
        .property(
            "summary",
            Expr::object([("who", Expr::attr("name")), ("where", Expr::context("name"))]),
        )
        .build();
    let evaluation = evaluate(&SchemaRegistry::new(), &schema, &user(), &context()).unwrap();
    assert_eq!(
        evaluation.properties["summary"],
        json!({"who": "Ismael", "where": "some_controller"})
    );
}

// ── Links ────────────────────────────────────────────────────────

#[test]
fn explicit_and_relationship_links() {
    let evaluation = registry().evaluate("user", &user(), &context()).unwrap();
    assert_eq!(
        evaluation.links.get("self"),
        Some(&Link::Href("http://foo.bar.com/1".into()))
    );
    assert_eq!(evaluation.links.get("empty"), Some(&Link::Empty));
    assert_eq!(
        evaluation.links.get("friends"),
        Some(&Link::to_many("users", ["2"]))
    );
    assert_eq!(
        evaluation.links.get("manager"),
        Some(&Link::to_one("managers", "3"))
    );
    let names: Vec<&str> = evaluation.links.keys().map(String::as_str).collect();
    assert_eq!(names, vec!["self", "empty", "friends", "manager"]);
}

#[test]
fn invalid_link_fails_evaluation() {
    let schema = Schema::builder().type_name("users").link("self", json!(["45"])).build();
    let err = evaluate(&SchemaRegistry::new(), &schema, &user(), &context()).unwrap_err();
    assert_eq!(err, DeclarationError::SequenceLink { name: "self".into() });
}

#[test]
fn explicit_link_declared_after_association_wins() {
    let mut registry = registry();
    let schema = Schema::builder()
        .type_name("users")
        .entity("manager", "manager")
        .link("manager", "/managers/custom")
        .build();
    registry.register("custom", schema);
    let evaluation = registry.evaluate("custom", &user(), &context()).unwrap();
    assert_eq!(
        evaluation.links.get("manager"),
        Some(&Link::Href("/managers/custom".into()))
    );
    assert_eq!(evaluation.nested.len(), 1);
}

#[test]
fn explicit_link_declared_before_association_wins() {
    let mut registry = registry();
    let schema = Schema::builder()
        .type_name("users")
        .link("manager", "/managers/custom")
        .entity("manager", "manager")
        .build();
    registry.register("custom", schema);
    let evaluation = registry.evaluate("custom", &user(), &context()).unwrap();
    assert_eq!(
        evaluation.links.get("manager"),
        Some(&Link::Href("/managers/custom".into()))
    );
}

#[test]
fn format_placeholders_fall_back_to_context() {
    let registry = SchemaRegistry::from_json(
        r#"{
            "user": {
                "type": "users",
                "declarations": [
                    {"kind": "link", "name": "self", "value": {"format": "{base_url}/users/{id}"}},
                    {"kind": "link", "name": "search", "value": {"format": "{base_url}/users{?q}"}}
                ]
            }
        }"#,
    )
    .unwrap();
    let context = context().with("base_url", "https://api.example.com");
    let evaluation = registry.evaluate("user", &user(), &context).unwrap();
    assert_eq!(
        evaluation.links.get("self"),
        Some(&Link::Href("https://api.example.com/users/1".into()))
    );
    assert_eq!(
        evaluation.links.get("search"),
        Some(&Link::Href("https://api.example.com/users{?q}".into()))
    );
}

// ── Nested declarations ──────────────────────────────────────────

#[test]
fn nested_declarations_carry_members_and_context() {
    let evaluation = registry().evaluate("user", &user(), &context()).unwrap();
    assert_eq!(evaluation.nested.len(), 2);

    let friends = &evaluation.nested[0];
    assert_eq!(friends.name, "friends");
    assert_eq!(friends.cardinality, Cardinality::Many);
    assert_eq!(friends.schema, "user");
    assert_eq!(friends.members[0].0, ResourceKey::new("users", "2"));
    assert_eq!(friends.context.get("name"), Some(&json!("some_controller")));
    assert_eq!(
        friends.context.get("message"),
        Some(&json!("Merged into parent's context"))
    );

    let manager = &evaluation.nested[1];
    assert_eq!(manager.cardinality, Cardinality::One);
    assert_eq!(manager.context, context());
}

#[test]
fn null_entity_is_skipped() {
    let mut subject = user();
    subject["manager"] = Value::Null;
    let evaluation = registry().evaluate("user", &subject, &context()).unwrap();
    assert!(!evaluation.links.contains_key("manager"));
    assert!(evaluation.nested.iter().all(|n| n.name != "manager"));
}

#[test]
fn missing_and_empty_collections_are_skipped() {
    for friends in [Value::Null, json!([])] {
        let mut subject = user();
        subject["friends"] = friends;
        let evaluation = registry().evaluate("user", &subject, &context()).unwrap();
        assert!(!evaluation.links.contains_key("friends"));
        assert!(evaluation.nested.iter().all(|n| n.name != "friends"));
    }
}

#[test]
fn unknown_nested_schema_errs() {
    let mut registry = SchemaRegistry::new();
    registry.register("user", Schema::builder().type_name("users").entity("manager", "ghost").build());
    let err = registry.evaluate("user", &user(), &context()).unwrap_err();
    assert_eq!(err, DeclarationError::UnknownSchema { name: "ghost".into() });
}

#[test]
fn nested_member_without_id_errs() {
    let mut subject = user();
    subject["manager"] = json!({"name": "anonymous"});
    let err = registry().evaluate("user", &subject, &context()).unwrap_err();
    assert_eq!(
        err,
        DeclarationError::MissingIdentifier { type_name: "managers".into() }
    );
}

#[test]
fn entity_declaration_over_to_many_takes_first_member() {
    let mut registry = registry();
    registry.register(
        "first_friend",
        Schema::builder().type_name("users").entity_from("best_friend", "friends", "user", Context::new()).build(),
    );
    let mut subject = user();
    subject["friends"] = json!([{"id": 7}, {"id": 8}]);
    let evaluation = registry.evaluate("first_friend", &subject, &context()).unwrap();
    assert_eq!(
        evaluation.links.get("best_friend"),
        Some(&Link::to_one("users", "7"))
    );
}

// ── Meta & entity conversion ─────────────────────────────────────

#[test]
fn meta_accumulates() {
    let schema = Schema::builder().meta("a", json!(1)).meta("b", json!(2)).build();
    let evaluation = evaluate(&SchemaRegistry::new(), &schema, &user(), &context()).unwrap();
    assert_eq!(evaluation.meta.len(), 2);
    assert_eq!(evaluation.meta["b"], json!(2));
}

#[test]
fn entity_from_evaluation_keeps_relations() {
    let evaluation = registry().evaluate("user", &user(), &context()).unwrap();
    let entity = Entity::from(evaluation);
    assert_eq!(entity.key(), &ResourceKey::new("users", "1"));
    assert_eq!(entity.type_name(), Some("users"));
    assert_eq!(entity.relations().len(), 2);
    assert_eq!(entity.relations()[0].targets, vec![ResourceKey::new("users", "2")]);
    assert_eq!(entity.relations()[1].name, "manager");
    assert_eq!(entity.meta()["nation"], json!("zulu"));
}

#[test]
fn into_parts_hands_over_nested_evaluations() {
    let evaluation = registry().evaluate("user", &user(), &context()).unwrap();
    let expected = Entity::from(evaluation.clone());
    let (entity, nested) = evaluation.into_parts();
    assert_eq!(entity, expected);
    let names: Vec<&str> = nested.iter().map(|n| n.name.as_str()).collect();
    assert_eq!(names, ["friends", "manager"]);
    assert_eq!(nested[0].members[0].0, ResourceKey::new("users", "2"));
}

#[test]
fn take_link_templates_removes_only_templates() {
    let schema = Schema::builder()
        .link("self", "/users/1")
        .link(
            "user.friends",
            json!({"related": "http://foo.bar.com/{user.id}/friends", "templated": true}),
        )
        .build();
    let evaluation = evaluate(&SchemaRegistry::new(), &schema, &user(), &context()).unwrap();
    let mut entity = Entity::from(evaluation);
    let templates = entity.take_link_templates();
    assert_eq!(templates.len(), 1);
    assert!(templates["user.friends"].is_templated());
    assert_eq!(entity.links().len(), 1);
    assert!(entity.link("self").is_some());
}
