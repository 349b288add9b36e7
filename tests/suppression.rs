use sharp_clippy::create_default_engine;
use sharp_clippy::parser::Document;

#[test]
fn pragma_disable_suppresses_region() {
    let engine = create_default_engine();

    let src = r#"
class B { public virtual void M() { } public virtual void N() { } }
class D : B {
#pragma warning disable hides_inherited_member
    public void M() { }
#pragma warning restore hides_inherited_member
    public void N() { }
}
"#;

    let diags = engine.lint_source(src).expect("linting should succeed");
    assert_eq!(diags.len(), 1, "{diags:#?}");
    assert_eq!(diags[0].message_args[0], "D.N()");
}

#[test]
fn pragma_without_ids_disables_everything() {
    let engine = create_default_engine();

    let src = r#"
#pragma warning disable
class B { public virtual void M() { } }
class D : B { public void M() { } int F(bool a) => a ? 1 : (a ? 2 : 3); }
"#;

    let diags = engine.lint_source(src).expect("linting should succeed");
    assert!(diags.is_empty(), "{diags:#?}");
}

#[test]
fn pragma_for_other_lint_does_not_suppress() {
    let engine = create_default_engine();

    let src = r#"
class B { public virtual void M() { } }
class D : B {
#pragma warning disable nested_conditional_expression
    public void M() { }
}
"#;

    let diags = engine.lint_source(src).expect("linting should succeed");
    assert_eq!(diags.len(), 1);
    assert_eq!(diags[0].id(), "hides_inherited_member");
}

#[test]
fn pragma_text_in_comments_and_strings_is_ignored() {
    let engine = create_default_engine();

    let src = r#"
class B { public virtual void M() { } }
class D : B {
    /*
#pragma warning disable hides_inherited_member
    */
    string banner = @"
#pragma warning disable hides_inherited_member
";
    public void M() { }
}
"#;

    let diags = engine.lint_source(src).expect("linting should succeed");
    assert_eq!(diags.len(), 1, "{diags:#?}");
    assert_eq!(diags[0].id(), "hides_inherited_member");
}

#[test]
fn diagnostic_record_serializes_for_host() {
    let src = "class B { public virtual void M() { } }\nclass D : B { public void M() { } }\n";
    let doc = Document::parse_named("Sample.cs", src).unwrap();
    let diags = create_default_engine().lint_document(&doc).unwrap();
    assert_eq!(diags.len(), 1);

    insta::assert_snapshot!(diags[0].to_json().unwrap(), @r#"{"id":"hides_inherited_member","category":"compiler","severity":"warning","message":"'D.M()' hides inherited member 'B.M()'. To make the current member override that implementation, add the override keyword. Otherwise add the new keyword.","location":{"file":"Sample.cs","span":{"start":66,"len":1},"start":{"line":2,"column":27},"end":{"line":2,"column":28}},"additional_locations":[{"file":"Sample.cs","span":{"start":30,"len":1},"start":{"line":1,"column":31},"end":{"line":1,"column":32}}],"properties":{"base_type":"B"}}"#);
}
