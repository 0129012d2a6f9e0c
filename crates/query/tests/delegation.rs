mod common;

use std::cell::RefCell;
use std::rc::Rc;

use common::{by_id, LINK_BOX};
use dom::DocumentConfig;
use query::{delegate, delegate_with, wrap, Document, Event, NodeHandle, NodeId, SearchBoundary};

/// Calls seen by a delegated handler: (matched node, event target)
type Calls = Rc<RefCell<Vec<(NodeId, NodeId)>>>;

fn link_box() -> Document {
    let doc = Document::new();
    let body = doc.body().unwrap();
    doc.set_inner_html(body, LINK_BOX).unwrap();
    doc
}

fn recorder() -> (Calls, impl Fn(&NodeHandle, &Event) + 'static) {
    let calls: Calls = Rc::default();
    let log = calls.clone();
    (calls, move |matched: &NodeHandle, event: &Event| {
        log.borrow_mut().push((matched.get(), event.target()));
    })
}

#[test]
fn test_delegated_listener_then_remove() {
    let doc = link_box();
    let (calls, handler) = recorder();
    let body = wrap(&doc, doc.body().unwrap());
    let binding = body.on("click", delegate(".entry-link", handler).unwrap()).unwrap();

    doc.click(by_id(&doc, "ref-link")).unwrap();
    assert!(calls.borrow().is_empty());

    doc.click(by_id(&doc, "btn")).unwrap();
    assert!(calls.borrow().is_empty());

    let link = by_id(&doc, "link-2");
    doc.click(link).unwrap();
    assert_eq!(*calls.borrow(), vec![(link, link)]);

    assert!(binding.remove());
    doc.click(link).unwrap();
    assert_eq!(calls.borrow().len(), 1);
}

#[test]
fn test_delegated_listener_without_matches() {
    let doc = link_box();
    let (calls, handler) = recorder();
    let body = wrap(&doc, doc.body().unwrap());
    let binding = body.on("click", delegate(".applesauce", handler).unwrap()).unwrap();

    for id in ["ref-link", "btn", "link-2"] {
        doc.click(by_id(&doc, id)).unwrap();
    }

    assert!(calls.borrow().is_empty());
    assert!(binding.remove());
}

#[test]
fn test_bound_node_is_excluded_from_matching() {
    let doc = link_box();
    let (calls, handler) = recorder();
    let list = wrap(&doc, by_id(&doc, "list"));
    list.on("click", delegate("ul, li", handler).unwrap()).unwrap();

    let link = by_id(&doc, "link-1");
    doc.click(link).unwrap();

    let li = doc.tree().parent_id(link).unwrap().unwrap();
    assert_eq!(*calls.borrow(), vec![(li, link)]);
}

#[test]
fn test_handler_may_mutate_the_tree() {
    let doc = link_box();
    let body = wrap(&doc, doc.body().unwrap());
    body.on(
        "click",
        delegate(".entry-link", |matched, _| {
            matched.toggle("visited").unwrap();
            matched.after("<span class=\"marker\"></span>").unwrap();
        })
        .unwrap(),
    )
    .unwrap();

    let link = wrap(&doc, by_id(&doc, "link-1"));
    doc.click(link.get()).unwrap();

    assert!(link.has("visited").unwrap());
    assert!(link.next(".marker").unwrap().is_some());
}

#[test]
fn test_boundary_from_document_config() {
    for (boundary, expected) in [(SearchBoundary::IncludeRoot, 1), (SearchBoundary::ExcludeRoot, 0)] {
        let config = DocumentConfig {
            delegation_boundary: boundary,
            ..DocumentConfig::default()
        };
        let doc = Document::with_config(config);
        doc.set_inner_html(doc.body().unwrap(), LINK_BOX).unwrap();

        let (calls, handler) = recorder();
        doc.add_event_listener(doc.root(), "click", delegate("html", handler).unwrap())
            .unwrap();
        doc.click(by_id(&doc, "btn")).unwrap();
        assert_eq!(calls.borrow().len(), expected, "{boundary:?}");
    }
}

#[test]
fn test_fixed_boundary_overrides_config() {
    let doc = link_box();
    let (calls, handler) = recorder();
    doc.add_event_listener(
        doc.root(),
        "click",
        delegate_with("html", SearchBoundary::ExcludeRoot, handler).unwrap(),
    )
    .unwrap();

    doc.click(by_id(&doc, "btn")).unwrap();
    assert!(calls.borrow().is_empty());
}
