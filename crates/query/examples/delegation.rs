//! Delegated click handling on a todo list

use query::{delegate, select, Document};

const PAGE: &str = r#"<ul id="todos">
  <li><span class="label">Write parser</span> <button class="done">done</button></li>
  <li><span class="label">Write tests</span> <button class="done">done</button></li>
</ul>"#;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize tracing
    tracing_subscriber::fmt::init();

    let doc = Document::parse(PAGE)?;
    let list = select(&doc, "#todos")?.remove(0);

    // One listener on the list covers every current and future button
    let binding = list.on(
        "click",
        delegate("button.done", |button, _event| {
            if let Ok(Some(item)) = button.ancestor("li") {
                let _ = item.toggle("completed");
            }
        })?,
    )?;

    list.append("<li><span class=\"label\">Ship it</span> <button class=\"done\">done</button></li>")?;

    for button in select(&doc, "button.done")? {
        doc.click(button.get())?;
    }
    println!("After clicks:\n{}", doc.outer_html(list.get())?);

    binding.remove();
    let first = select(&doc, "button.done")?.remove(0);
    doc.click(first.get())?;
    if let Some(item) = first.ancestor("li")? {
        println!("Listener removed, first item still: {:?}", item.classes()?);
    }

    Ok(())
}
