//! Integration tests driving the drawer registry the way a host event loop would.

use std::sync::Arc;
use std::time::Duration;

use horizon_drawer::{
    ChangeReason, Document, DrawerConfig, DrawerEvent, DrawerEventKind, DrawerOptions, DrawerRole,
    DrawerState, Drawers, Element, ElementKind, HostDocument, InputEvent, InputType, Key, Verdict,
};
use parking_lot::Mutex;

fn setup() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

/// A small storefront page: a menu button, a cart drawer with a checkout
/// form, and a newsletter drawer that opens by itself.
struct Page {
    drawers: Drawers<Document>,
    menu: horizon_drawer::NodeId,
    cart: horizon_drawer::NodeId,
    close: horizon_drawer::NodeId,
    handle: horizon_drawer::NodeId,
    checkout: horizon_drawer::NodeId,
    email: horizon_drawer::NodeId,
    pay: horizon_drawer::NodeId,
    newsletter: horizon_drawer::NodeId,
}

fn storefront() -> Page {
    let mut doc = Document::new();
    doc.set_ready(false);
    doc.set_viewport_width(375.0);

    let menu = doc.append(doc.root(), Element::new(ElementKind::Button).with_id("menu"));

    let cart = doc.append(
        doc.root(),
        Element::default()
            .with_id("cart")
            .with_attribute("data-animation-duration", "250")
            .with_attribute("data-swipe-threshold", "120"),
    );
    let panel = doc.append(cart, Element::default().with_role(DrawerRole::Panel).with_top(300.0));
    let handle = doc.append(panel, Element::default().with_role(DrawerRole::Handle).with_top(300.0));
    let close = doc.append(
        panel,
        Element::new(ElementKind::Button).with_role(DrawerRole::Dismiss),
    );
    let checkout = doc.append(panel, Element::new(ElementKind::Form));
    let email = doc.append(checkout, Element::new(ElementKind::Input(InputType::Email)));
    doc.append(checkout, Element::new(ElementKind::Input(InputType::Hidden)));
    let pay = doc.append(checkout, Element::new(ElementKind::Button));

    let newsletter = doc.append(
        doc.root(),
        Element::default()
            .with_id("newsletter")
            .with_attribute("data-show-on-load", ""),
    );
    doc.append(newsletter, Element::new(ElementKind::Input(InputType::Text)));

    Page {
        drawers: Drawers::new(doc),
        menu,
        cart,
        close,
        handle,
        checkout,
        email,
        pay,
        newsletter,
    }
}

#[test]
fn test_storefront_session() {
    setup();
    let mut page = storefront();
    let events: Arc<Mutex<Vec<(String, DrawerEventKind, ChangeReason)>>> = Arc::default();
    let sink = events.clone();
    page.drawers.on(move |e: &DrawerEvent| {
        sink.lock().push((e.identifier.clone(), e.kind, e.reason));
    });

    let cart = page
        .drawers
        .get_or_create_by_id("cart", DrawerOptions::new())
        .expect("cart drawer");
    let newsletter = page
        .drawers
        .get_or_create(page.newsletter, DrawerOptions::new().animation_duration(0))
        .expect("newsletter drawer");
    assert_eq!(page.drawers.config(cart).map(|c| c.swipe_threshold), Some(120));

    // The newsletter waits for the page to load, then opens immediately.
    assert_eq!(page.drawers.run_pending(), 0);
    page.drawers.document_mut().set_ready(true);
    page.drawers.dispatch_input(InputEvent::DocumentReady);
    page.drawers.run_pending();
    assert_eq!(page.drawers.state(newsletter), Some(DrawerState::Shown));
    assert_eq!(page.drawers.active(), Some(newsletter));

    // Opening the cart replaces it.
    page.drawers.document_mut().focus(page.menu);
    assert!(page.drawers.show(cart));
    assert_eq!(page.drawers.state(newsletter), Some(DrawerState::Hidden));
    assert_eq!(page.drawers.time_until_next(), Some(Duration::from_millis(250)));
    page.drawers.advance(Duration::from_millis(250));
    assert_eq!(page.drawers.state(cart), Some(DrawerState::Shown));
    assert_eq!(page.drawers.document().focused(), Some(page.email));

    // Tab wraps from the last field back to the first.
    page.drawers.document_mut().focus(page.pay);
    let outcome = page.drawers.dispatch_input(InputEvent::KeyDown {
        key: Key::Tab,
        shift: false,
        target: Some(page.pay),
    });
    assert!(outcome.prevent_default);
    assert_eq!(page.drawers.document().focused(), Some(page.email));

    // Submitting the checkout form reaches the callback.
    let orders = Arc::new(Mutex::new(0usize));
    let counter = orders.clone();
    assert!(page.drawers.handle_form_submit(cart, move |_| *counter.lock() += 1));
    page.drawers.dispatch_input(InputEvent::Submit { form: page.checkout });
    assert_eq!(*orders.lock(), 1);

    // A short drag snaps back, a long one closes the cart.
    for (end, expected) in [(400.0, DrawerState::Shown), (480.0, DrawerState::Hiding)] {
        page.drawers.dispatch_input(InputEvent::TouchStart {
            target: page.handle,
            y: 320.0,
        });
        page.drawers.dispatch_input(InputEvent::TouchMove { y: end });
        page.drawers.dispatch_input(InputEvent::TouchEnd);
        assert_eq!(page.drawers.state(cart), Some(expected));
    }
    assert_eq!(page.drawers.document().focused(), Some(page.menu));
    page.drawers.advance(Duration::from_millis(250));

    let log = events.lock().clone();
    let cart_reasons: Vec<ChangeReason> = log
        .iter()
        .filter(|(id, kind, _)| id == "cart" && kind.is_cancelable())
        .map(|(_, _, reason)| *reason)
        .collect();
    assert_eq!(cart_reasons, vec![ChangeReason::Api, ChangeReason::Swipe]);
    assert!(log.contains(&(
        "newsletter".to_string(),
        DrawerEventKind::Hide,
        ChangeReason::Replaced
    )));
    assert!(log.contains(&(
        "newsletter".to_string(),
        DrawerEventKind::Show,
        ChangeReason::Load
    )));
}

#[test]
fn test_dismiss_control_and_veto() {
    setup();
    let mut page = storefront();
    page.drawers.document_mut().set_ready(true);
    let cart = page
        .drawers
        .get_or_create(page.cart, DrawerConfig::builder().backdrop(false))
        .expect("cart drawer");

    let veto = page
        .drawers
        .on_drawer(cart, |e: &DrawerEvent| {
            if e.reason == ChangeReason::Dismiss {
                Verdict::Cancel
            } else {
                Verdict::Proceed
            }
        })
        .expect("cart drawer");

    page.drawers.show(cart);
    page.drawers.advance(Duration::from_millis(250));

    // Backdrop is disabled, the close button is vetoed.
    page.drawers.dispatch_input(InputEvent::Click { target: page.cart });
    page.drawers.dispatch_input(InputEvent::Click { target: page.close });
    assert_eq!(page.drawers.state(cart), Some(DrawerState::Shown));

    assert!(page.drawers.off_drawer(cart, veto));
    page.drawers.dispatch_input(InputEvent::Click { target: page.close });
    assert_eq!(page.drawers.state(cart), Some(DrawerState::Hiding));

    let drawers = page.drawers;
    let doc = drawers.into_document();
    assert_eq!(doc.visual(page.cart).map(|v| v.visible), Some(false));
}
