#![allow(dead_code)]

use dom::{Document, NodeId};

/// Dashboard page with a desktop and a mobile navigation block
pub const DASHBOARD: &str = r##"<!DOCTYPE html>
<html lang="en">
<head><meta charset="utf-8"><title>Dashboard</title></head>
<body>
<div class="min-h-full">
  <nav class="bg-gray-800">
    <div class="mx-auto max-w-7xl px-4">
      <div class="flex h-16 items-center justify-between">
        <div class="flex items-center">
          <div class="flex-shrink-0">
            <img class="h-8 w-8" src="/logo.svg" alt="Workflow">
          </div>
          <div class="hidden md:block">
            <div class="ml-10 flex items-baseline space-x-4">
              <a href="#" class="one bg-gray-900 text-white" aria-current="page">Dashboard</a>
              <a href="#" class="two text-gray-300">Team</a>
              <a href="#" class="three text-gray-300">Projects</a>
              <a href="#" class="four text-gray-300">Calendar</a>
              <a href="#" class="five text-gray-300">Reports</a>
            </div>
          </div>
        </div>
        <div class="hidden md:block">
          <div class="ml-4 flex items-center md:ml-6">
            <button type="button" class="notifications rounded-full p-1">
              <span class="sr-only">View notifications</span>
              <svg class="h-6 w-6" fill="none" viewBox="0 0 24 24"><path d="M15 17h5l-1.4-1.4"/></svg>
            </button>
            <div class="relative ml-3">
              <button type="button" id="user-menu-button" class="flex rounded-full">
                <img class="h-8 w-8 rounded-full" src="/avatar.png" alt="">
              </button>
              <div class="dropdown" role="menu">
                <a href="#" role="menuitem">Your Profile</a>
                <a href="#" role="menuitem">Settings</a>
                <a href="#" role="menuitem">Sign out</a>
              </div>
            </div>
          </div>
        </div>
        <div class="-mr-2 flex md:hidden">
          <button type="button" class="toggle" aria-controls="mobile-menu">
            <svg class="menu-open h-6 w-6" viewBox="0 0 24 24"><path d="M4 6h16M4 12h16M4 18h16"/></svg>
            <svg class="menu-close hidden h-6 w-6" viewBox="0 0 24 24"><path d="M6 18L18 6M6 6l12 12"/></svg>
          </button>
        </div>
      </div>
    </div>
    <div class="md:hidden" id="mobile-menu">
      <div class="space-y-1 px-2">
        <a href="#" class="block">Dashboard</a>
        <a href="#" class="block">Team</a>
        <a href="#" class="block">Projects</a>
        <a href="#" class="block">Calendar</a>
        <a href="#" class="block">Reports</a>
      </div>
      <div class="border-t pt-4">
        <div class="flex items-center px-5">
          <div class="flex-shrink-0"><img class="h-10 w-10 rounded-full" src="/avatar.png" alt=""></div>
          <div class="ml-3"><div class="name">Tom Cook</div></div>
          <button type="button" class="notifications ml-auto"><svg class="h-6 w-6" viewBox="0 0 24 24"><path d="M15 17h5"/></svg></button>
        </div>
        <div class="mt-3 space-y-1 px-2">
          <a href="#" class="block">Your Profile</a>
          <a href="#" class="block">Settings</a>
          <a href="#" class="block">Sign out</a>
        </div>
      </div>
    </div>
  </nav>
  <header><h1>Dashboard</h1></header>
  <main><div id="content"></div></main>
</div>
</body>
</html>"##;

/// Links and a button nested in a list, for delegation
pub const LINK_BOX: &str = r##"<div id="box">
  <p>Foobar bang <a href="#ref" id="ref-link">boom</a>!</p>
  <ul id="list">
    <li>
      <a class="entry-link" href="#ref1" id="link-1">link one</a>
    </li>
    <li>
      <a class="entry-link" href="#ref2" id="link-2">link one</a>
    </li>
    <li>
      <div id="final">
        <p>Strunken bangi goo!</p>
        <button id="btn">Click me!</button>
      </div>
    </li>
  </ul>
</div>"##;

pub const MENU_LINKS: &str = r##"div.ml-10.flex.items-baseline.space-x-4 a[href="#"]"##;

/// Detached `<body>` element, the usual starting point for insertion tests
pub fn detached_body(doc: &Document) -> NodeId {
    doc.create_element("body")
}

pub fn by_id(doc: &Document, id: &str) -> NodeId {
    doc.query_selector(&format!("#{id}")).unwrap().unwrap()
}

pub fn tag_of(doc: &Document, node: NodeId) -> String {
    doc.tree().get(node).unwrap().node_name.clone()
}
