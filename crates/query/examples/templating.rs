//! Rendering builder-made components into a page

use query::{select, Document};
use serde_json::json;
use vdom::{build, build_with, text, Child, VNode};

struct User<'a> {
    name: &'a str,
    role: &'a str,
    id: u32,
}

fn user_card(doc: &Document, user: &User<'_>) -> dom::Result<VNode> {
    build_with(
        doc,
        "article.card[itemscope=][itemtype=http://schema.org/Person]",
        &json!({ "class": ["user", user.role], "data": { "user-id": user.id } }),
    )?
    .with_children([
        Some(Child::from(build_with(doc, "h2", &json!({ "itemprop": "name" }))?.set_text(user.name)?)),
        Some(Child::from(text(doc, user.role))),
    ])
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize tracing
    tracing_subscriber::fmt::init();

    let doc = Document::parse("<main><section id=\"users\"><p>Loading...</p></section></main>")?;
    let section = select(&doc, "#users")?.remove(0);

    let users = [
        User { name: "Taylor", role: "admin", id: 1 },
        User { name: "Jordan", role: "editor", id: 2 },
    ];

    section.render(build(&doc, "h1")?.set_text("Users")?)?;
    for user in &users {
        section.append(user_card(&doc, user)?)?;
    }

    println!("{}", doc.outer_html(section.get())?);
    println!("Text: {}", doc.text_content(section.get())?);

    Ok(())
}
