use docfilter::*;

fn main() -> Result<()> {
    // 1. Define the field catalog
    let catalog = FieldCatalog::from_json(
        r#"{
            "age": {"field": "age", "value_type": "int"},
            "v": {"field": "v", "path": "map_events", "value_type": "string"},
            "visits": {"field": "timebucket_visits"}
        }"#,
    )?;
    let compiler = FilterCompiler::new(&catalog);

    // 2. Build predicate nodes, as an upstream parser would
    let predicates = vec![
        Node::binary(Node::ident("age"), Operator::Ge, Node::int(21)),
        Node::binary(Node::ident("v"), Operator::Like, Node::string("hel*")),
        Node::between(Node::ident("age"), Node::int(18), Node::int(30)),
        Node::func(
            "timewindow",
            vec![Node::ident("visits"), Node::int(1), Node::int(3), Node::int(16916)],
        ),
        Node::binary(Node::ident("missing"), Operator::Lt, Node::int(1)),
    ];

    // 3. Compile each one; a failure only affects its own predicate
    for node in &predicates {
        match compiler.compile(node) {
            Ok(filter) => println!("{}\n  => {}", node, filter.to_json_string()?),
            Err(e) => println!("{}\n  => error: {}", node, e),
        }
    }
    Ok(())
}
