//! WebAssembly entry point and DOM-backed surfaces.
//!
//! A thin custom-element class on the JS side owns a [`StarRatingElement`]
//! and forwards `attributeChangedCallback`, property accessors and
//! focus/blur to it.

use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::{Rc, Weak};
use std::sync::atomic::{AtomicU32, Ordering};

use starrating_core::{
    Affordance, CompositeRating, DocumentListeners, FocusOutline, Key, KeyListenerHost,
    ListenerId, OBSERVED_ATTRIBUTES, PlatformEvent, RatingLayout, RatingSurface, RatingTheme,
    STAR_COUNT, StarEvent, StarOrdinal, StarSurface,
};
use starrating_render::STAR_PATH;
use starrating_render::geometry::DESIGN_SIZE;
use wasm_bindgen::JsCast;
use wasm_bindgen::closure::Closure;
use wasm_bindgen::prelude::*;
use web_sys::{CustomEvent, CustomEventInit, Document, Element, Event, HtmlElement, KeyboardEvent};

const SVG_NS: &str = "http://www.w3.org/2000/svg";

static NEXT_CLIP_ID: AtomicU32 = AtomicU32::new(0);

type Rating = CompositeRating<ElementRatingSurface, SvgStarSurface>;

/// Attribute writes waiting to reach the host element.
type PendingReflections = Rc<RefCell<Vec<(String, Option<String>)>>>;

fn set_attr(element: &Element, name: &str, value: &str) {
    if let Err(e) = element.set_attribute(name, value) {
        log::warn!("Failed to set attribute {}: {:?}", name, e);
    }
}

fn remove_attr(element: &Element, name: &str) {
    if let Err(e) = element.remove_attribute(name) {
        log::warn!("Failed to remove attribute {}: {:?}", name, e);
    }
}

fn set_style(element: &HtmlElement, property: &str, value: &str) {
    if let Err(e) = element.style().set_property(property, value) {
        log::warn!("Failed to set style {}: {:?}", property, e);
    }
}

fn remove_style(element: &HtmlElement, property: &str) {
    if let Err(e) = element.style().remove_property(property) {
        log::warn!("Failed to remove style {}: {:?}", property, e);
    }
}

fn create_html(document: &Document, tag: &str) -> Result<HtmlElement, JsValue> {
    document
        .create_element(tag)?
        .dyn_into::<HtmlElement>()
        .map_err(JsValue::from)
}

fn create_svg(document: &Document, tag: &str) -> Result<Element, JsValue> {
    document.create_element_ns(Some(SVG_NS), tag)
}

/// One star: a focusable box holding an SVG with a background rectangle and
/// a value rectangle, both clipped by the star outline.
pub struct SvgStarSurface {
    element: HtmlElement,
    background: Element,
    fill: Element,
}

impl SvgStarSurface {
    fn new(document: &Document) -> Result<Self, JsValue> {
        let element = create_html(document, "span")?;
        set_style(&element, "display", "inline-block");

        let svg = create_svg(document, "svg")?;
        set_attr(&svg, "viewBox", &format!("0 0 {DESIGN_SIZE} {DESIGN_SIZE}"));
        set_attr(&svg, "width", "100%");
        set_attr(&svg, "height", "100%");
        set_attr(&svg, "aria-hidden", "true");

        let clip_id = format!(
            "starrating-clip-{}",
            NEXT_CLIP_ID.fetch_add(1, Ordering::Relaxed)
        );
        let defs = create_svg(document, "defs")?;
        let clip = create_svg(document, "clipPath")?;
        set_attr(&clip, "id", &clip_id);
        let path = create_svg(document, "path")?;
        set_attr(&path, "d", STAR_PATH);
        clip.append_child(&path)?;
        defs.append_child(&clip)?;
        svg.append_child(&defs)?;

        let clip_ref = format!("url(#{clip_id})");
        let background = create_svg(document, "rect")?;
        let fill = create_svg(document, "rect")?;
        for rect in [&background, &fill] {
            set_attr(rect, "height", "100%");
            set_attr(rect, "clip-path", &clip_ref);
            svg.append_child(rect)?;
        }
        set_attr(&background, "width", "100%");
        set_attr(&fill, "width", "0%");

        element.append_child(&svg)?;
        Ok(Self {
            element,
            background,
            fill,
        })
    }
}

impl StarSurface for SvgStarSurface {
    fn set_box_size(&mut self, px: u32) {
        let px = format!("{px}px");
        set_style(&self.element, "width", &px);
        set_style(&self.element, "height", &px);
    }

    fn set_fill_width(&mut self, percent: u32) {
        set_attr(&self.fill, "width", &format!("{percent}%"));
    }

    fn set_fill_color(&mut self, color: &str) {
        set_attr(&self.fill, "fill", color);
    }

    fn set_background_color(&mut self, color: &str) {
        set_attr(&self.background, "fill", color);
    }

    fn set_affordance(&mut self, affordance: &Affordance) {
        if affordance.focusable {
            self.element.set_tab_index(0);
            set_attr(&self.element, "role", "button");
        } else {
            remove_attr(&self.element, "tabindex");
            remove_attr(&self.element, "role");
        }
        set_style(&self.element, "cursor", affordance.cursor.css());
        match affordance.label.text() {
            Some(label) => {
                remove_attr(&self.element, "aria-hidden");
                set_attr(&self.element, "aria-label", &label);
            }
            None => {
                remove_attr(&self.element, "aria-label");
                set_attr(&self.element, "aria-hidden", "true");
            }
        }
    }
}

/// The host element of the composite and the row holding its stars.
///
/// Attribute reflections are queued: setting an observed attribute runs the
/// element's `attributeChangedCallback` synchronously, which must not happen
/// while the rating is borrowed.
pub struct ElementRatingSurface {
    host: HtmlElement,
    row: HtmlElement,
    pending: PendingReflections,
}

impl RatingSurface for ElementRatingSurface {
    fn reflect_attribute(&mut self, name: &str, value: Option<&str>) {
        self.pending
            .borrow_mut()
            .push((name.to_string(), value.map(str::to_string)));
    }

    fn set_label(&mut self, label: &str) {
        set_attr(&self.host, "aria-label", label);
    }

    fn set_focusable(&mut self, focusable: bool) {
        self.host.set_tab_index(if focusable { 0 } else { -1 });
    }

    fn set_layout(&mut self, layout: &RatingLayout) {
        set_style(&self.row, "gap", &format!("{}px", layout.gap_px));
        set_style(&self.host, "border-radius", &format!("{}px", layout.corner_radius_px));
    }

    fn set_outline(&mut self, outline: Option<&FocusOutline>) {
        match outline {
            Some(outline) => {
                set_style(
                    &self.host,
                    "outline",
                    &format!("{}px solid {}", outline.width_px, outline.color),
                );
                set_style(&self.host, "outline-offset", &format!("{}px", outline.offset_px));
            }
            None => {
                remove_style(&self.host, "outline");
                remove_style(&self.host, "outline-offset");
            }
        }
    }
}

/// Document keydown listeners, one per focused star.
struct DomKeyListeners {
    document: Document,
    owner: Weak<Inner>,
    next_id: u64,
    attached: HashMap<ListenerId, Closure<dyn FnMut(KeyboardEvent)>>,
    // A listener can be detached from inside its own invocation, so its
    // closure is kept alive until the next attach.
    retired: Vec<Closure<dyn FnMut(KeyboardEvent)>>,
}

impl KeyListenerHost for DomKeyListeners {
    fn attach(&mut self, ordinal: StarOrdinal) -> ListenerId {
        self.retired.clear();
        let id = ListenerId(self.next_id);
        self.next_id += 1;

        let owner = self.owner.clone();
        let callback = Closure::wrap(Box::new(move |event: KeyboardEvent| {
            if let Some(inner) = owner.upgrade() {
                let key = Key::from_dom(&event.key());
                let dom: &Event = &event;
                inner.star_event(ordinal, PlatformEvent::KeyDown { key }, Some(dom));
            }
        }) as Box<dyn FnMut(KeyboardEvent)>);

        if let Err(e) = self
            .document
            .add_event_listener_with_callback("keydown", callback.as_ref().unchecked_ref())
        {
            log::warn!("Failed to add keydown listener: {:?}", e);
        }
        self.attached.insert(id, callback);
        id
    }

    fn detach(&mut self, id: ListenerId) {
        let Some(callback) = self.attached.remove(&id) else {
            return;
        };
        if let Err(e) = self
            .document
            .remove_event_listener_with_callback("keydown", callback.as_ref().unchecked_ref())
        {
            log::warn!("Failed to remove keydown listener: {:?}", e);
        }
        self.retired.push(callback);
    }
}

struct ElementListener {
    target: HtmlElement,
    kind: &'static str,
    callback: Closure<dyn FnMut(Event)>,
}

struct Inner {
    host: HtmlElement,
    row: HtmlElement,
    stars: [HtmlElement; STAR_COUNT],
    rating: RefCell<Rating>,
    pending: PendingReflections,
    listeners: RefCell<Vec<ElementListener>>,
}

impl Inner {
    fn read<T>(&self, f: impl FnOnce(&Rating) -> T) -> T {
        f(&self.rating.borrow())
    }

    fn update(&self, f: impl FnOnce(&mut Rating)) {
        match self.rating.try_borrow_mut() {
            Ok(mut rating) => f(&mut rating),
            Err(_) => {
                log::warn!("Re-entrant rating update ignored");
                return;
            }
        }
        self.flush_reflections();
    }

    fn flush_reflections(&self) {
        let pending = std::mem::take(&mut *self.pending.borrow_mut());
        for (name, value) in pending {
            match value {
                Some(value) => set_attr(&self.host, &name, &value),
                None => remove_attr(&self.host, &name),
            }
        }
    }

    fn star_event(&self, ordinal: StarOrdinal, event: PlatformEvent, dom: Option<&Event>) {
        let mut events = Vec::new();
        let outcome = match self.rating.try_borrow_mut() {
            Ok(mut rating) => rating.handle_star_event(ordinal, &event, &mut events),
            Err(_) => {
                log::warn!("Star {} event ignored during update", ordinal);
                return;
            }
        };
        self.flush_reflections();

        if let Some(dom) = dom.filter(|_| outcome.prevent_default) {
            dom.prevent_default();
        }
        for event in &events {
            self.dispatch(event);
        }
    }

    fn dispatch(&self, event: &StarEvent) {
        let target = &self.stars[event.ordinal.index()];
        let init = CustomEventInit::new();
        init.set_bubbles(event.bubbles());
        init.set_detail(&JsValue::from(event.detail() as u32));
        match CustomEvent::new_with_event_init_dict(event.name(), &init) {
            Ok(custom) => {
                if let Err(e) = target.dispatch_event(&custom) {
                    log::warn!("Failed to dispatch {}: {:?}", event.name(), e);
                }
            }
            Err(e) => log::warn!("Failed to create {}: {:?}", event.name(), e),
        }
    }
}

impl Drop for Inner {
    fn drop(&mut self) {
        for listener in self.listeners.get_mut().drain(..) {
            if let Err(e) = listener.target.remove_event_listener_with_callback(
                listener.kind,
                listener.callback.as_ref().unchecked_ref(),
            ) {
                log::warn!("Failed to remove {} listener: {:?}", listener.kind, e);
            }
        }
        self.row.remove();
    }
}

fn install_star_listeners(inner: &Rc<Inner>) -> Result<(), JsValue> {
    const KINDS: [(&str, PlatformEvent); 5] = [
        ("focus", PlatformEvent::Focus),
        ("blur", PlatformEvent::Blur),
        ("pointerenter", PlatformEvent::PointerEnter),
        ("pointerleave", PlatformEvent::PointerLeave),
        ("click", PlatformEvent::Click),
    ];

    let mut listeners = inner.listeners.borrow_mut();
    for (element, ordinal) in inner.stars.iter().zip(StarOrdinal::ALL) {
        for (kind, event) in KINDS {
            let owner = Rc::downgrade(inner);
            let callback = Closure::wrap(Box::new(move |dom: Event| {
                if let Some(inner) = owner.upgrade() {
                    inner.star_event(ordinal, event.clone(), Some(&dom));
                }
            }) as Box<dyn FnMut(Event)>);
            element.add_event_listener_with_callback(kind, callback.as_ref().unchecked_ref())?;
            listeners.push(ElementListener {
                target: element.clone(),
                kind,
                callback,
            });
        }
    }
    Ok(())
}

/// Backing object of one `<star-rating>` element.
#[wasm_bindgen]
pub struct StarRatingElement {
    inner: Rc<Inner>,
}

#[wasm_bindgen]
impl StarRatingElement {
    /// Build the five stars inside `host` and start tracking its attributes.
    #[wasm_bindgen(constructor)]
    pub fn new(host: HtmlElement) -> Result<StarRatingElement, JsValue> {
        let document = web_sys::window()
            .and_then(|w| w.document())
            .ok_or_else(|| JsValue::from_str("No document"))?;

        let row = create_html(&document, "span")?;
        set_style(&row, "display", "inline-flex");
        host.append_child(&row)?;

        let mut surfaces = Vec::with_capacity(STAR_COUNT);
        for _ in 0..STAR_COUNT {
            let surface = SvgStarSurface::new(&document)?;
            row.append_child(&surface.element)?;
            surfaces.push(surface);
        }
        let surfaces: [SvgStarSurface; STAR_COUNT] = surfaces
            .try_into()
            .map_err(|_| JsValue::from_str("Star count mismatch"))?;
        let stars = surfaces.each_ref().map(|s| s.element.clone());

        let pending = PendingReflections::default();
        let surface = ElementRatingSurface {
            host: host.clone(),
            row: row.clone(),
            pending: Rc::clone(&pending),
        };

        let inner = Rc::new_cyclic(|owner| {
            let listeners = DocumentListeners::new(DomKeyListeners {
                document,
                owner: owner.clone(),
                next_id: 0,
                attached: HashMap::new(),
                retired: Vec::new(),
            });
            let rating = CompositeRating::with_star_surfaces(
                surface,
                RatingTheme::default(),
                listeners,
                surfaces,
            );
            Inner {
                host,
                row,
                stars,
                rating: RefCell::new(rating),
                pending,
                listeners: RefCell::new(Vec::new()),
            }
        });
        install_star_listeners(&inner)?;
        inner.flush_reflections();

        log::debug!("Star rating element created");
        Ok(StarRatingElement { inner })
    }

    /// Attribute names the custom element should observe.
    #[wasm_bindgen(js_name = observedAttributes)]
    pub fn observed_attributes() -> js_sys::Array {
        OBSERVED_ATTRIBUTES
            .iter()
            .map(|name| JsValue::from_str(name))
            .collect()
    }

    /// Forwarded `attributeChangedCallback`.
    #[wasm_bindgen(js_name = attributeChanged)]
    pub fn attribute_changed(&self, name: &str, _old: Option<String>, value: Option<String>) {
        self.inner
            .update(|rating| rating.attribute_changed(name, value.as_deref()));
    }

    #[wasm_bindgen(getter)]
    pub fn value(&self) -> f64 {
        self.inner.read(|r| r.value())
    }

    #[wasm_bindgen(setter)]
    pub fn set_value(&self, value: f64) {
        self.inner.update(|r| r.set_value(value));
    }

    #[wasm_bindgen(getter)]
    pub fn disabled(&self) -> bool {
        self.inner.read(|r| r.disabled())
    }

    #[wasm_bindgen(setter)]
    pub fn set_disabled(&self, disabled: bool) {
        self.inner.update(|r| r.set_disabled(disabled));
    }

    #[wasm_bindgen(getter = readOnly)]
    pub fn read_only(&self) -> bool {
        self.inner.read(|r| r.read_only())
    }

    #[wasm_bindgen(setter = readOnly)]
    pub fn set_read_only(&self, read_only: bool) {
        self.inner.update(|r| r.set_read_only(read_only));
    }

    #[wasm_bindgen(getter)]
    pub fn size(&self) -> String {
        self.inner.read(|r| r.size().as_str().to_string())
    }

    /// Unknown size tokens are ignored.
    #[wasm_bindgen(setter)]
    pub fn set_size(&self, size: String) {
        self.inner.update(|r| r.set_size_token(&size));
    }

    #[wasm_bindgen(getter)]
    pub fn color(&self) -> String {
        self.inner.read(|r| r.color().to_string())
    }

    #[wasm_bindgen(setter)]
    pub fn set_color(&self, color: String) {
        self.inner.update(|r| r.set_color(&color));
    }

    #[wasm_bindgen(getter = disabledColor)]
    pub fn disabled_color(&self) -> String {
        self.inner.read(|r| r.disabled_color().to_string())
    }

    #[wasm_bindgen(setter = disabledColor)]
    pub fn set_disabled_color(&self, color: String) {
        self.inner.update(|r| r.set_disabled_color(&color));
    }

    #[wasm_bindgen(getter = backgroundColor)]
    pub fn background_color(&self) -> String {
        self.inner.read(|r| r.background_color().to_string())
    }

    #[wasm_bindgen(setter = backgroundColor)]
    pub fn set_background_color(&self, color: String) {
        self.inner.update(|r| r.set_background_color(&color));
    }

    /// Accessible label of the composite.
    #[wasm_bindgen(getter)]
    pub fn label(&self) -> String {
        self.inner.read(|r| r.label().to_string())
    }

    /// Forwarded host `focus` event.
    pub fn focus(&self) {
        self.inner.update(|r| r.focus());
    }

    /// Forwarded host `blur` event.
    pub fn blur(&self) {
        self.inner.update(|r| r.blur());
    }
}

/// Initialize panic reporting and logging for the WASM module.
#[wasm_bindgen(start)]
pub fn start_wasm() {
    console_error_panic_hook::set_once();

    if console_log::init_with_level(log::Level::Info).is_err() {
        web_sys::console::warn_1(&JsValue::from_str("Logger already initialized"));
    }

    log::info!("starrating (WASM) ready");
}
