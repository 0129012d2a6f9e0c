mod common;

use common::{detached_body, tag_of};
use query::{select, wrap, Document, DomError};
use vdom::build;

#[test]
fn test_append_nodes() {
    let doc = Document::new();
    let start = wrap(&doc, detached_body(&doc));
    let p = doc.create_element("p");
    let div = doc.create_element("div");

    start.append(p).unwrap();
    let last = start.append(div).unwrap().unwrap();

    assert_eq!(last.get(), div);
    assert_eq!(start.children("").unwrap()[1].get(), div);
}

#[test]
fn test_append_builders() {
    let doc = Document::new();
    let start = wrap(&doc, detached_body(&doc));
    let p = build(&doc, "p").unwrap();
    let div = build(&doc, "div").unwrap();

    start.append(&p).unwrap();
    start.append(&div).unwrap();

    assert_eq!(start.children("").unwrap()[1].get(), div.to_node());
}

#[test]
fn test_prepend_nodes() {
    let doc = Document::new();
    let start = wrap(&doc, detached_body(&doc));
    let p = doc.create_element("p");
    let div = doc.create_element("div");

    start.prepend(p).unwrap();
    let first = start.prepend(div).unwrap().unwrap();

    assert_eq!(first.get(), div);
    assert_eq!(start.children("").unwrap()[0].get(), div);
}

#[test]
fn test_prepend_builders() {
    let doc = Document::new();
    let start = wrap(&doc, detached_body(&doc));
    let p = build(&doc, "p").unwrap();
    let div = build(&doc, "div").unwrap();

    start.prepend(&p).unwrap();
    start.prepend(&div).unwrap();

    assert_eq!(start.children("").unwrap()[0].get(), div.to_node());
}

#[test]
fn test_prepend_then_before() {
    let doc = Document::new();
    let start = wrap(&doc, detached_body(&doc));
    let p = doc.create_element("p");
    let div = build(&doc, "div").unwrap();

    let inserted = start.prepend(p).unwrap().unwrap().before(&div).unwrap();

    assert_eq!(inserted.map(|h| h.get()), Some(div.to_node()));
    assert_eq!(start.children("").unwrap()[0].get(), div.to_node());
}

#[test]
fn test_prepend_then_after() {
    let doc = Document::new();
    let start = wrap(&doc, detached_body(&doc));
    let p = build(&doc, "p").unwrap();
    let div = doc.create_element("div");

    let inserted = start.prepend(&p).unwrap().unwrap().after(div).unwrap();

    assert_eq!(inserted.map(|h| h.get()), Some(div));
    assert_eq!(start.children("").unwrap()[1].get(), div);
}

#[test]
fn test_markup_insertion_keeps_order() {
    let doc = Document::new();
    let list = wrap(&doc, doc.create_element("ul"));
    list.append("<li>3</li>").unwrap();
    let first = list.prepend("<li>1</li><li>2</li>").unwrap().unwrap();

    assert_eq!(doc.text_content(first.get()).unwrap(), "1");
    assert_eq!(doc.inner_html(list.get()).unwrap(), "<li>1</li><li>2</li><li>3</li>");
}

#[test]
fn test_after_with_duplicate_siblings_returns_inserted_node() {
    let doc = Document::new();
    let list = wrap(&doc, doc.create_element("ul"));
    list.render("<li class=\"x\">a</li><li class=\"x\">b</li>").unwrap();

    let first = list.children("").unwrap().remove(0);
    let extra = doc.create_element("li");
    doc.tree_mut().add_class(extra, "x").unwrap();

    let inserted = first.after(extra).unwrap().unwrap();
    assert_eq!(inserted.get(), extra);
    assert_eq!(tag_of(&doc, inserted.get()), "li");
    assert_eq!(list.children(".x").unwrap()[1].get(), extra);
}

#[test]
fn test_inserting_moves_existing_node() {
    let doc = Document::parse("<div id=\"a\"><p id=\"p\">x</p></div><div id=\"b\"></div>").unwrap();
    let b = wrap(&doc, common::by_id(&doc, "b"));
    let p = common::by_id(&doc, "p");

    b.append(p).unwrap();
    assert_eq!(doc.inner_html(common::by_id(&doc, "a")).unwrap(), "");
    assert_eq!(doc.inner_html(b.get()).unwrap(), "<p id=\"p\">x</p>");
}

#[test]
fn test_inserting_ancestor_is_rejected() {
    let doc = Document::new();
    let outer = wrap(&doc, doc.create_element("div"));
    let inner = outer.append(doc.create_element("span")).unwrap().unwrap();
    assert!(matches!(
        inner.append(outer.get()),
        Err(DomError::HierarchyRequest(_))
    ));
}

#[test]
fn test_builder_from_another_document_is_rejected() {
    let doc = Document::new();
    let other = Document::new();
    let start = wrap(&doc, detached_body(&doc));
    let foreign = build(&other, "p").unwrap();
    assert!(matches!(start.append(foreign), Err(DomError::WrongDocument)));
}

const TABLE: &str = "<table><tbody id=\"rows\"><tr><td>a</td></tr></tbody></table>";

#[test]
fn test_table_rows_parse_inside_the_target() {
    let doc = Document::parse(TABLE).unwrap();
    let rows = select(&doc, "#rows").unwrap().remove(0);

    let last = rows.append("<tr><td>b</td></tr>").unwrap().unwrap();
    assert_eq!(tag_of(&doc, last.get()), "tr");
    assert_eq!(
        doc.inner_html(rows.get()).unwrap(),
        "<tr><td>a</td></tr><tr><td>b</td></tr>"
    );

    let first = rows.prepend("<tr><td>z</td></tr>").unwrap().unwrap();
    assert_eq!(doc.text_content(first.get()).unwrap(), "z");
}

#[test]
fn test_sibling_rows_parse_inside_the_parent() {
    let doc = Document::parse(TABLE).unwrap();
    let row = select(&doc, "#rows > tr").unwrap().remove(0);

    let before = row.before("<tr><td>0</td></tr>").unwrap().unwrap();
    let after = row.after("<tr><td>1</td></tr>").unwrap().unwrap();
    assert_eq!(tag_of(&doc, before.get()), "tr");
    assert_eq!(tag_of(&doc, after.get()), "tr");
    assert_eq!(select(&doc, "#rows > tr").unwrap().len(), 3);
}

#[test]
fn test_leading_comment_is_kept() {
    let doc = Document::new();
    let start = wrap(&doc, detached_body(&doc));

    start.append("<!-- note --><p>x</p>").unwrap();
    assert_eq!(doc.inner_html(start.get()).unwrap(), "<!-- note --><p>x</p>");
}

#[test]
fn test_leading_whitespace_is_kept() {
    let doc = Document::parse("<p id=\"greeting\">world</p>").unwrap();
    let p = select(&doc, "#greeting").unwrap().remove(0);

    p.prepend(" hello ").unwrap();
    assert_eq!(doc.text_content(p.get()).unwrap(), " hello world");
}
