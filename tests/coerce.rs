use bound_dom::{
	coerce::{escape_attribute, escape_text, is_truthy, number_to_string, render, DisplayVisitor, Displayable, Rendered},
	object::Object,
	value::{Symbol, Value},
};
use chrono::{FixedOffset, TimeZone};

fn text(value: impl Into<Value>) -> String {
	match render(&value.into()) {
		Rendered::Text(text) => text,
		Rendered::Nothing => panic!("Expected text but found nothing."),
	}
}

#[test]
fn primitives() {
	for (value, expected) in [
		(Value::from(0), "0"),
		(Value::from(-0.0), "0"),
		(Value::from(1), "1"),
		(Value::from(-1), "-1"),
		(Value::from(0.5), "0.5"),
		(Value::from(f64::NAN), "NaN"),
		(Value::from(f64::INFINITY), "Infinity"),
		(Value::from(f64::NEG_INFINITY), "-Infinity"),
		(Value::from(true), "true"),
		(Value::from(false), "false"),
		(Value::from(""), ""),
		(Value::from("<b>"), "<b>"),
	] {
		assert_eq!(render(&value), Rendered::Text(expected.to_owned()), "{:?}", value);
	}
}

#[test]
fn nullish_is_nothing() {
	assert_eq!(render(&Value::Undefined), Rendered::Nothing);
	assert_eq!(render(&Value::Null), Rendered::Nothing);
	assert_eq!(render(&Value::from(None::<&str>)), Rendered::Nothing);
	assert!(render(&Value::Null).is_nothing());
	assert_eq!(render(&Value::Null).as_str_or_empty(), "");
}

#[test]
fn large_and_small_numbers() {
	assert_eq!(number_to_string(1e21), "1e+21");
	assert_eq!(number_to_string(1.5e300), "1.5e+300");
	assert_eq!(number_to_string(1e20), "100000000000000000000");
	assert_eq!(number_to_string(0.000_001), "0.000001");
	assert_eq!(number_to_string(1e-7), "1e-7");
	assert_eq!(number_to_string(-2.5e-9), "-2.5e-9");
	assert_eq!(number_to_string(123_456.789), "123456.789");
}

#[test]
fn objects() {
	assert_eq!(text(Object::new().with("foo", "bar")), "[object Object]");
	assert_eq!(text(Object::null_prototype()), "[object Object]");
	assert_eq!(text(Object::new().with_to_string(|_| "foo".to_owned())), "foo");
	assert_eq!(text(Object::new().with_value_of(|_| Value::from(1))), "[object Object]");
	assert_eq!(
		text(Object::new().with("name", "Max").with_to_string(|this| format!("Hi, {}!", this.get("name").as_str().unwrap_or_default()))),
		"Hi, Max!"
	);
}

#[test]
fn symbols_and_dates() {
	assert_eq!(text(Symbol::new(Some("debug"))), "Symbol(debug)");
	assert_eq!(text(Symbol::new(None)), "Symbol()");

	let date = FixedOffset::east_opt(2 * 3600).unwrap().with_ymd_and_hms(2016, 7, 4, 13, 5, 9).unwrap();
	assert_eq!(text(date), "Mon Jul 04 2016 13:05:09 GMT+0200");
}

#[test]
fn displayable_classification() {
	struct Kind;
	impl DisplayVisitor for Kind {
		type Output = &'static str;
		fn visit_primitive(&mut self, _: &Value) -> Self::Output {
			"primitive"
		}
		fn visit_structured(&mut self, _: &Object) -> Self::Output {
			"structured"
		}
		fn visit_custom(&mut self, _: &Object) -> Self::Output {
			"custom"
		}
	}

	assert_eq!(Displayable::of(&Value::from(1)).accept(&mut Kind), "primitive");
	assert_eq!(Displayable::of(&Object::null_prototype().into()).accept(&mut Kind), "structured");
	assert_eq!(Displayable::of(&Object::new().with_value_of(|_| Value::Null).into()).accept(&mut Kind), "structured");
	assert_eq!(Displayable::of(&Object::new().with_to_string(|_| String::new()).into()).accept(&mut Kind), "custom");
}

#[test]
fn truthiness() {
	for falsy in [Value::Undefined, Value::Null, false.into(), 0.into(), (-0.0).into(), f64::NAN.into(), "".into()] {
		assert!(!is_truthy(&falsy), "{:?}", falsy);
	}
	for truthy in [Value::from(true), 1.into(), "0".into(), " ".into(), Object::new().into(), Object::null_prototype().into(), Symbol::new(None).into()] {
		assert!(is_truthy(&truthy), "{:?}", truthy);
	}
}

#[test]
fn escaping() {
	assert_eq!(escape_text("a < b & c > \"d\""), "a &lt; b &amp; c &gt; \"d\"");
	assert_eq!(escape_attribute("a < b & c > \"d\""), "a < b &amp; c > &quot;d&quot;");
	assert!(matches!(escape_text("plain"), std::borrow::Cow::Borrowed("plain")));
	assert_eq!(escape_text("\u{a0}"), "&nbsp;");
}
