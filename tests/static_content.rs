use harness_::Harness;

use bound_dom::{
	object::Object,
	template::{comment, element, text, Template},
};

#[test]
fn it_can_render_a_static_text_node() {
	let mut harness = Harness::render(&Template::new([text("hello")]), Object::new());
	let text1 = harness.assert_text_node(harness.first_child(), "hello");

	harness.rerender();

	let text2 = harness.assert_text_node(harness.first_child(), "hello");
	assert_eq!(text1, text2);
}

#[test]
fn it_can_render_a_static_element() {
	let mut harness = Harness::render(&Template::new([element("p").child(text("hello")).into()]), Object::new());
	let p1 = harness.assert_element(harness.first_child(), "p", &[], "hello");
	let text1 = harness.assert_text_node(harness.renderer.document().first_child(p1), "hello");

	harness.rerender();

	let p2 = harness.assert_element(harness.first_child(), "p", &[], "hello");
	let text2 = harness.assert_text_node(harness.renderer.document().first_child(p2), "hello");
	assert_eq!(p1, p2);
	assert_eq!(text1, text2);
}

const STATIC_TEMPLATE: &str = "
      <div class=\"header\">
        <h1>Welcome to Ember.js</h1>
      </div>
      <div class=\"body\">
        <h2>Why you should use Ember.js?</h2>
        <ol>
          <li>It's great</li>
          <li>It's awesome</li>
          <li>It's Ember.js</li>
        </ol>
      </div>
      <div class=\"footer\">
        Ember.js is free, open source and always will be.
      </div>
    ";

#[test]
fn it_can_render_a_static_template() {
	let mut harness = Harness::render(&Template::from_static_markup(STATIC_TEMPLATE, 64).unwrap(), Object::new());
	harness.assert_html(STATIC_TEMPLATE);

	harness.assert_stable_rerender();
	harness.assert_html(STATIC_TEMPLATE);
}

#[test]
fn static_templates_have_no_content_nodes() {
	let mut harness = Harness::render(&Template::from_static_markup(STATIC_TEMPLATE, 64).unwrap(), Object::new());
	assert!(harness.renderer.emitter().unwrap().content().is_empty());
	assert_eq!(harness.rerender().visited, 0);
}

#[test]
fn comments_and_attributes() {
	let mut harness = Harness::render(
		&Template::new([comment(" a comment "), element("input").attribute("type", "checkbox").attribute("checked", "").into()]),
		Object::new(),
	);
	harness.assert_html(r#"<!-- a comment --><input type="checkbox" checked="">"#);
	harness.assert_stable_rerender();
}

#[test]
fn text_is_escaped_when_serialized() {
	let harness = Harness::render(&Template::new([element("p").attribute("title", "\"a\" & b").child(text("<b>&</b>")).into()]), Object::new());
	harness.assert_html(r#"<p title="&quot;a&quot; &amp; b">&lt;b&gt;&amp;&lt;/b&gt;</p>"#);
	harness.assert_text("<b>&</b>");
}
