use configform::{
    Action, ConsolePage, Dispatch, DocumentFormat, EventKind, FormSubmission, PageOptions,
    RequestOutcome, Tag, VisualTree, parse_page_str,
};

const CONSOLE_PAGE: &str = r#"{
  "title": "Receiver Configuration",
  "body": [{
    "tag": "FORM",
    "attributes": {"method": "POST", "action": "/console/config"},
    "children": [
      {"tag": "INPUT", "attributes": {"type": "hidden", "name": "ConfigurationRequest"}},
      {"tag": "TABLE", "attributes": {"id": "routes"}, "geometry": {"left": 100, "top": 100}, "children": [
        {"tag": "TR", "children": [
          {"tag": "TD", "text": "Route 1"},
          {"tag": "TD", "attributes": {"id": "route-cell"}, "geometry": {"left": 2, "top": 3},
           "on": {
             "mouseover": {"action": "show-help", "text": "Directory polled for outgoing messages"},
             "mouseout": {"action": "hide-help"}
           },
           "children": [
             {"tag": "INPUT", "attributes": {"id": "route-1", "type": "text", "size": "32", "name": "Route[1]", "value": "/var/phineas"},
              "geometry": {"left": 5, "top": 5, "width": 10, "height": 20}}
           ]}
        ]},
        {"tag": "TR", "children": [
          {"tag": "TD", "children": [
            {"tag": "BUTTON", "attributes": {"id": "add-route", "type": "button", "name": "Route"}, "text": "Add Route",
             "on": {"click": {"action": "add-field"}}}
          ]}
        ]}
      ]},
      {"tag": "BUTTON", "attributes": {"id": "save", "type": "button", "name": "Save", "value": "Save Configuration"},
       "on": {"click": {"action": "set-request", "value": "Phineas"}}}
    ]
  }]
}"#;

fn load() -> ConsolePage {
    parse_page_str(CONSOLE_PAGE, DocumentFormat::Json).expect("page parses")
}

fn never_confirm(_: &str) -> bool {
    panic!("no prompt expected")
}

fn no_submit(_: FormSubmission) {
    panic!("no submission expected")
}

fn control(page: &ConsolePage, key: &str) -> configform::NodeId {
    page.find_control(key).unwrap_or_else(|| panic!("missing {key}"))
}

#[test]
fn loads_title_and_handlers() {
    let page = load();
    assert_eq!(page.title(), Some("Receiver Configuration"));
    assert_eq!(page.bindings().len(), 4);
    let cell = control(&page, "route-cell");
    assert_eq!(
        page.bindings().action(cell, EventKind::MouseOut),
        Some(&Action::HideHelp)
    );
}

#[test]
fn click_on_add_button_adds_numbered_row() {
    let mut page = load();
    let button = control(&page, "add-route");

    let outcome = page.dispatch(button, EventKind::Click, &mut never_confirm, &mut no_submit);

    let Dispatch::FieldAdded(row) = outcome else {
        panic!("expected a new row, got {outcome:?}");
    };
    let doc = page.document();
    assert_eq!(doc.tag(row), Some(Tag::Tr));
    assert_eq!(doc.text_content(doc.first_child(row).unwrap()), "Route 2");
    let input = page.find_control("Route[2]").expect("new input is named");
    assert_eq!(doc.attribute(input, "size"), Some("32"));
    assert_eq!(doc.next_sibling(row), doc.parent(doc.parent(button).unwrap()));
}

#[test]
fn click_bubbles_from_button_text() {
    let mut page = load();
    let button = control(&page, "add-route");
    let caption = page.document().first_child(button).unwrap();

    let outcome = page.dispatch(caption, EventKind::Click, &mut never_confirm, &mut no_submit);

    assert!(matches!(outcome, Dispatch::FieldAdded(_)));
}

#[test]
fn hover_on_input_shows_help_of_its_cell() {
    let mut page = load();
    let input = control(&page, "route-1");

    let outcome = page.dispatch(input, EventKind::MouseOver, &mut never_confirm, &mut no_submit);

    assert_eq!(outcome, Dispatch::HelpShown);
    let balloon = page.balloon().element().unwrap();
    let doc = page.document();
    assert_eq!(
        doc.text_content(balloon),
        "Directory polled for outgoing messages"
    );
    let style = doc.style(balloon).unwrap();
    assert_eq!((style.left, style.top), (Some(77), Some(113)));

    let outcome = page.dispatch(input, EventKind::MouseOut, &mut never_confirm, &mut no_submit);
    assert_eq!(outcome, Dispatch::HelpHidden);
    assert!(!page.balloon().is_visible(page.document()));
}

#[test]
fn leaving_before_hovering_is_harmless() {
    let mut page = load();
    let cell = control(&page, "route-cell");
    let before = page.document().len();

    let outcome = page.dispatch(cell, EventKind::MouseOut, &mut never_confirm, &mut no_submit);

    assert_eq!(outcome, Dispatch::HelpHidden);
    assert_eq!(page.balloon().element(), None);
    assert_eq!(page.document().len(), before);
}

#[test]
fn declined_save_records_intent() {
    let mut page = load();
    let save = control(&page, "save");
    let mut confirm = |message: &str| {
        assert_eq!(message, "Save Configuration");
        false
    };

    let outcome = page.dispatch(save, EventKind::Click, &mut confirm, &mut no_submit);

    assert_eq!(outcome, Dispatch::Request(RequestOutcome::Declined));
    let field = control(&page, "ConfigurationRequest");
    assert_eq!(page.document().attribute(field, "value"), Some("Save:Phineas"));
}

#[test]
fn confirmed_save_submits_added_rows() {
    let mut page = load();
    let add = control(&page, "add-route");
    page.dispatch(add, EventKind::Click, &mut never_confirm, &mut no_submit);
    let save = control(&page, "save");
    let mut sent = Vec::new();
    let mut confirm = |_: &str| true;
    let mut submitter = |submission: FormSubmission| sent.push(submission);

    let outcome = page.dispatch(save, EventKind::Click, &mut confirm, &mut submitter);

    assert_eq!(outcome, Dispatch::Request(RequestOutcome::Submitted));
    assert_eq!(sent.len(), 1);
    assert_eq!(
        sent[0].encode(),
        "ConfigurationRequest=Save%3APhineas&Route%5B1%5D=%2Fvar%2Fphineas&Route%5B2%5D="
    );
}

#[test]
fn unbound_events_are_ignored() {
    let mut page = load();
    let input = control(&page, "route-1");
    let outcome = page.dispatch(input, EventKind::Click, &mut never_confirm, &mut no_submit);
    assert_eq!(outcome, Dispatch::Ignored);
}

#[test]
fn options_rename_request_field() {
    let spec = r#"{
      "options": {"request_field": "Intent"},
      "body": [{"tag": "FORM", "children": [
        {"tag": "INPUT", "attributes": {"type": "hidden", "name": "Intent"}},
        {"tag": "BUTTON", "attributes": {"id": "go", "name": "Go"},
         "on": {"click": {"action": "set-request", "value": "now"}}}
      ]}]
    }"#;
    let mut page = parse_page_str(spec, DocumentFormat::Json).unwrap();
    assert_eq!(page.options(), &PageOptions::default().with_request_field("Intent"));
    let go = control(&page, "go");
    let mut confirm = |_: &str| false;

    page.dispatch(go, EventKind::Click, &mut confirm, &mut no_submit);

    let field = control(&page, "Intent");
    assert_eq!(page.document().attribute(field, "value"), Some("Go:now"));
}
