use bound_dom::{
	error::Error,
	object::{assign, set_path, Object, Prototype},
	path::{resolve, Path},
	reference::{Reference, ValueSource},
	template::{concat, if_, if_else, literal, path},
	value::{Symbol, Value},
};

#[test]
fn assign_copies_left_to_right() {
	let a = Object::new().with("first", "Yehuda");
	let b = Object::new().with("last", "Katz");
	let c = Object::new().with("company", "Tilde Inc.").with("last", "Katz!");

	let result = assign(&a, &[Value::from(b.clone()), c.into()]).unwrap();
	assert!(result.ptr_eq(&a));
	assert_eq!(&*a.keys().iter().map(|key| &**key).collect::<Vec<_>>(), ["first", "last", "company"]);
	assert_eq!(a.get("last").as_str(), Some("Katz!"));
	assert_eq!(b.len(), 1, "Sources must not be modified");
}

#[test]
fn assign_skips_falsy_sources() {
	let target = Object::new();
	assign(&target, &[Value::Undefined, Value::Null, false.into(), 0.into(), "".into(), Object::new().with("a", 1).into()]).unwrap();
	assert_eq!(target.keys().len(), 1);
}

#[test]
fn assign_rejects_non_objects() {
	let target = Object::new();
	let error = assign(&target, &[Value::from(Object::new().with("a", 1)), "string".into()]).unwrap_err();
	assert_eq!(error, Error::NonObjectSource { found: "string" });
	assert_eq!(error.to_string(), "Tried to retrieve keys of a non-Object (found string)");
	assert!(target.has("a"));

	assert!(matches!(assign(&target, &[Value::from(true)]), Err(Error::NonObjectSource { found: "boolean" })));
	assert!(matches!(assign(&target, &[Value::from(Symbol::new(None))]), Err(Error::NonObjectSource { found: "symbol" })));
}

#[test]
fn assign_copies_computed_properties_as_values() {
	let source = Object::new().with("n", 1).with_computed("double", |this| match this.get("n") {
		Value::Number(n) => (n * 2.0).into(),
		_ => Value::Undefined,
	});
	let target = assign(&Object::new(), &[Value::from(source.clone())]).unwrap();
	source.set("n", 5);
	assert!(matches!(target.get("double"), Value::Number(n) if n == 2.0));
	assert!(matches!(source.get("double"), Value::Number(n) if n == 10.0));
}

#[test]
fn paths() {
	let path: Path = "a.b.c".parse().unwrap();
	assert_eq!(path.segments().iter().map(|segment| &**segment).collect::<Vec<_>>(), ["a", "b", "c"]);
	assert_eq!(path.to_string(), "a.b.c");

	for invalid in ["", ".a", "a.", "a..b"] {
		assert_eq!(invalid.parse::<Path>().unwrap_err(), Error::InvalidPath { path: invalid.to_owned() });
	}
}

#[test]
fn resolution_never_fails() {
	let context: Value = Object::new()
		.with("a", Object::new().with("b", true))
		.with("n", Value::Null)
		.into();
	for (path, expected) in [("a.b", Some(true)), ("a.b.c", None), ("a.x.y", None), ("n.x", None), ("missing", None)] {
		let value = resolve(&context, &path.parse().unwrap());
		match expected {
			Some(expected) => assert!(matches!(value, Value::Boolean(b) if b == expected), "{}", path),
			None => assert!(matches!(value, Value::Undefined), "{}: {:?}", path, value),
		}
	}
	assert!(matches!(resolve(&Value::from(1), &"a".parse().unwrap()), Value::Undefined));
}

#[test]
fn set_path_writes_through_objects() {
	let root = Object::new().with("a", Object::new().with("b", Object::new()));
	set_path(&root, &"a.b.c".parse().unwrap(), "deep").unwrap();
	assert_eq!(root.current_value(&"a.b.c".parse().unwrap()).as_str(), Some("deep"));

	assert_eq!(
		set_path(&root, &"a.b.c.d".parse().unwrap(), 1),
		Err(Error::SetOnNonObject { path: "a.b.c".to_owned() })
	);
	assert_eq!(set_path(&root, &"x.y".parse().unwrap(), 1), Err(Error::SetOnNonObject { path: "x".to_owned() }));
}

#[test]
fn null_prototype_objects() {
	let dictionary = Object::null_prototype().with("message", "hello");
	assert_eq!(dictionary.prototype(), Prototype::Null);
	assert_eq!(Object::new().prototype(), Prototype::Object);
	assert_eq!(dictionary.get("message").as_str(), Some("hello"));
	assert!(matches!(dictionary.get("toString"), Value::Undefined));
}

#[test]
fn computed_properties_track_their_dependencies() {
	let m = Object::new()
		.with("message", "hello")
		.with_computed("formattedMessage", |this| this.get("message").as_str().map(str::to_uppercase).into());
	assert_eq!(m.get("formattedMessage").as_str(), Some("HELLO"));
	m.set("message", "goodbye");
	assert_eq!(m.get("formattedMessage").as_str(), Some("GOODBYE"));
	m.set("formattedMessage", "overridden");
	assert_eq!(m.get("formattedMessage").as_str(), Some("overridden"));
}

#[test]
fn same_value() {
	let object = Object::new();
	let symbol = Symbol::new(Some("s"));
	assert!(Value::from(f64::NAN).same_value(&f64::NAN.into()));
	assert!(!Value::from(0.0).same_value(&(-0.0).into()));
	assert!(Value::from("a").same_value(&"a".into()));
	assert!(Value::from(object.clone()).same_value(&object.into()));
	assert!(!Value::from(Object::new()).same_value(&Object::new().into()));
	assert!(Value::from(symbol.clone()).same_value(&symbol.into()));
	assert!(!Value::from(Symbol::new(Some("s"))).same_value(&Symbol::new(Some("s")).into()));
	assert!(!Value::Null.same_value(&Value::Undefined));
}

#[test]
fn references_report_changes() {
	let context = Object::new().with("name", "Max");
	let mut reference = Reference::new(path("name"));
	assert_eq!(reference.initialize(&context).as_text(), Some("Max"));

	assert!(!reference.revalidate(&context));
	assert_eq!(reference.revision(), 0);

	context.set("name", "Moritz");
	assert!(reference.revalidate(&context));
	assert_eq!(reference.rendered().as_text(), Some("Moritz"));
	assert_eq!(reference.revision(), 1);

	// A new but equal object still counts as a change.
	let context = Object::new().with("value", Object::new());
	let mut reference = Reference::new(path("value"));
	reference.initialize(&context);
	context.set("value", Object::new());
	assert!(reference.revalidate(&context));
}

#[test]
fn helpers() {
	let context = Object::new().with("yes", true).with("no", 0).with("name", "Max");
	let evaluate = |expression: bound_dom::reference::Expression| expression.evaluate(&context);

	assert_eq!(evaluate(if_(path("yes"), literal("a"))).as_str(), Some("a"));
	assert!(matches!(evaluate(if_(path("no"), literal("a"))), Value::Undefined));
	assert_eq!(evaluate(if_else(path("no"), literal("a"), literal("b"))).as_str(), Some("b"));

	assert_eq!(evaluate(concat([literal("Hi, "), path("name"), path("missing"), literal("!")])).as_str(), Some("Hi, Max!"));
	assert!(matches!(evaluate(concat([literal(""), path("missing"), literal("")])), Value::Undefined));
	assert_eq!(evaluate(concat([path("no"), literal(false)])).as_str(), Some("0false"));

	let expression = if_else(path("a"), concat([path("b"), literal(1)]), path("c"));
	assert_eq!(expression.paths().map(Path::as_str).collect::<Vec<_>>(), ["a", "b", "c"]);
}
