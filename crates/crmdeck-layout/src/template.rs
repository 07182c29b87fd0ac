#![forbid(unsafe_code)]

//! Template documents: components placed freely on A4 pages.
//!
//! [`TemplateDocument`] owns the placed components, the selection, the page
//! count, any in-flight move/resize gesture, and a bounded undo history.
//! Snapshots are recorded on drops, content and size edits, deletes, page
//! removal, and gesture release. Intermediate gesture updates and style
//! tweaks are applied without recording.
//!
//! The serialized form is [`TemplateData`], the payload hosts save.

use std::fmt;

use crmdeck_core::config::{EngineConfig, GestureLimits};
use crmdeck_core::geometry::{Point, Rect, Size};
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};

use crate::gesture::{ComponentGesture, GestureKind};
use crate::history::History;
use crate::placement::{Obstacle, Placement, PlacementError, Placer};

/// Category of a template component.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum ComponentKind {
    Text,
    Description,
    Table,
    Chart,
    Image,
    Details,
    Calculation,
    /// Kind this build does not know; kept verbatim.
    Other(String),
}

/// Palette offered to template authors, in display order.
pub const COMPONENT_CATALOG: [ComponentKind; 7] = [
    ComponentKind::Text,
    ComponentKind::Description,
    ComponentKind::Table,
    ComponentKind::Chart,
    ComponentKind::Image,
    ComponentKind::Details,
    ComponentKind::Calculation,
];

impl ComponentKind {
    #[must_use]
    pub fn as_str(&self) -> &str {
        match self {
            Self::Text => "text",
            Self::Description => "description",
            Self::Table => "table",
            Self::Chart => "chart",
            Self::Image => "image",
            Self::Details => "details",
            Self::Calculation => "calculation",
            Self::Other(kind) => kind,
        }
    }

    /// Palette label.
    #[must_use]
    pub fn display_name(&self) -> &str {
        match self {
            Self::Text => "Text Component",
            Self::Description => "Description Component",
            Self::Table => "Table Component",
            Self::Chart => "Graph Component",
            Self::Image => "Image Component",
            Self::Details => "Details Component",
            Self::Calculation => "Calculation Component",
            Self::Other(kind) => kind,
        }
    }

    /// Size a freshly dropped component gets.
    #[must_use]
    pub const fn default_size(&self) -> Size {
        match self {
            Self::Text => Size::new(300, 100),
            Self::Table => Size::new(400, 200),
            Self::Details => Size::new(350, 150),
            Self::Image => Size::new(200, 150),
            Self::Chart => Size::new(300, 200),
            Self::Description | Self::Calculation | Self::Other(_) => Size::new(200, 100),
        }
    }

    /// Placeholder content for a freshly dropped component.
    #[must_use]
    pub fn default_content(&self) -> Value {
        match self {
            Self::Text => json!({
                "text": "Lorem ipsum dolor sit amet, consectetur adipiscing elit."
            }),
            Self::Description => json!({
                "description": "Lorem ipsum dolor sit amet, consectetur adipiscing elit. \
                    Nullam quam velit, vulputate eu pharetra nec, mattis ac neque."
            }),
            Self::Table => json!({
                "rows": [
                    { "product": "Item 1", "quantity": 2, "total": "$150.00" },
                    { "product": "Item 2", "quantity": 5, "total": "$150.00" },
                    { "product": "Item 3", "quantity": 10, "total": "$75.00" }
                ]
            }),
            Self::Details => json!({
                "payableTo": "Company Name\n12345 Business St.",
                "billTo": "Client Name\n123 Street"
            }),
            Self::Calculation => json!({ "label": "Sub Total", "value": "$0.00" }),
            Self::Image => json!({ "src": null }),
            Self::Chart => json!({ "type": "bar", "data": [] }),
            Self::Other(_) => json!({}),
        }
    }
}

impl From<String> for ComponentKind {
    fn from(kind: String) -> Self {
        match kind.as_str() {
            "text" => Self::Text,
            "description" => Self::Description,
            "table" => Self::Table,
            "chart" => Self::Chart,
            "image" => Self::Image,
            "details" => Self::Details,
            "calculation" => Self::Calculation,
            _ => Self::Other(kind),
        }
    }
}

impl From<&str> for ComponentKind {
    fn from(kind: &str) -> Self {
        Self::from(kind.to_owned())
    }
}

impl From<ComponentKind> for String {
    fn from(kind: ComponentKind) -> Self {
        match kind {
            ComponentKind::Other(kind) => kind,
            known => known.as_str().to_owned(),
        }
    }
}

impl fmt::Display for ComponentKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Text styling of a component. Missing keys take the defaults.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct TextStyle {
    pub font_family: String,
    pub font_size: u32,
    pub font_weight: String,
    pub font_style: String,
    pub text_decoration: String,
    pub color: String,
    pub background_color: String,
    pub text_align: String,
    pub line_height: f32,
    pub letter_spacing: f32,
    pub text_transform: String,
    pub text_shadow: String,
    pub list_style: String,
    pub margin_left: i32,
    pub margin_right: i32,
    pub margin_top: i32,
    pub margin_bottom: i32,
    pub padding_left: i32,
    pub padding_right: i32,
    pub padding_top: i32,
    pub padding_bottom: i32,
}

impl Default for TextStyle {
    fn default() -> Self {
        Self {
            font_family: "Arial".into(),
            font_size: 12,
            font_weight: "normal".into(),
            font_style: "normal".into(),
            text_decoration: "none".into(),
            color: "#000000".into(),
            background_color: "transparent".into(),
            text_align: "left".into(),
            line_height: 1.5,
            letter_spacing: 0.0,
            text_transform: "none".into(),
            text_shadow: "none".into(),
            list_style: "none".into(),
            margin_left: 0,
            margin_right: 0,
            margin_top: 0,
            margin_bottom: 0,
            padding_left: 0,
            padding_right: 0,
            padding_top: 0,
            padding_bottom: 0,
        }
    }
}

/// A component placed on a template page.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlacedComponent {
    pub id: String,
    #[serde(rename = "type")]
    pub kind: ComponentKind,
    #[serde(default)]
    pub content: Value,
    pub x: i32,
    pub y: i32,
    pub width: i32,
    pub height: i32,
    /// 1-based page number.
    pub page: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub style: Option<TextStyle>,
}

impl PlacedComponent {
    #[must_use]
    pub const fn rect(&self) -> Rect {
        Rect::new(self.x, self.y, self.width, self.height)
    }

    fn set_rect(&mut self, rect: Rect) {
        self.x = rect.x;
        self.y = rect.y;
        self.width = rect.width;
        self.height = rect.height;
    }
}

impl Obstacle for PlacedComponent {
    fn obstacle_id(&self) -> &str {
        &self.id
    }

    fn page(&self) -> u32 {
        self.page
    }

    fn bounds(&self) -> Rect {
        self.rect()
    }
}

/// Saved template payload.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TemplateData {
    pub title: String,
    pub components: Vec<PlacedComponent>,
    pub pages: u32,
}

/// Deterministic `<kind>-<n>` component ids.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ComponentIdAllocator {
    next: u64,
}

impl Default for ComponentIdAllocator {
    fn default() -> Self {
        Self { next: 1 }
    }
}

impl ComponentIdAllocator {
    /// Allocator that will not reissue any numeric suffix found in `ids`.
    #[must_use]
    pub fn after<'a>(ids: impl IntoIterator<Item = &'a str>) -> Self {
        let highest = ids
            .into_iter()
            .filter_map(|id| id.rsplit_once('-'))
            .filter_map(|(_, suffix)| suffix.parse::<u64>().ok())
            .max()
            .unwrap_or(0);
        Self {
            next: highest.saturating_add(1),
        }
    }

    #[must_use]
    pub const fn peek(&self) -> u64 {
        self.next
    }

    pub fn allocate(&mut self, kind: &ComponentKind) -> String {
        let id = format!("{kind}-{}", self.next);
        self.next = self.next.saturating_add(1);
        id
    }
}

/// Result of dropping a new component.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DropOutcome {
    pub id: String,
    pub placement: Placement,
}

/// Template edits that cannot be applied.
#[derive(Debug)]
pub enum DocumentError {
    UnknownComponent { id: String },
    DuplicateComponent { id: String },
    PageOutOfRange { page: u32, total: u32 },
    InvalidSize { size: Size },
    Placement(PlacementError),
    Json(serde_json::Error),
}

impl fmt::Display for DocumentError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UnknownComponent { id } => write!(f, "no component with id {id:?}"),
            Self::DuplicateComponent { id } => write!(f, "component id {id:?} appears twice"),
            Self::PageOutOfRange { page, total } => {
                write!(f, "page {page} is outside the document (1..={total})")
            }
            Self::InvalidSize { size } => write!(
                f,
                "component size must be positive, got {}x{}",
                size.width, size.height
            ),
            Self::Placement(source) => write!(f, "placement rejected: {source}"),
            Self::Json(source) => write!(f, "template JSON error: {source}"),
        }
    }
}

impl std::error::Error for DocumentError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Placement(source) => Some(source),
            Self::Json(source) => Some(source),
            Self::UnknownComponent { .. }
            | Self::DuplicateComponent { .. }
            | Self::PageOutOfRange { .. }
            | Self::InvalidSize { .. } => None,
        }
    }
}

impl From<PlacementError> for DocumentError {
    fn from(source: PlacementError) -> Self {
        Self::Placement(source)
    }
}

/// An editable multi-page template.
#[derive(Debug, Clone)]
pub struct TemplateDocument {
    title: String,
    components: Vec<PlacedComponent>,
    declared_pages: u32,
    selected: Option<String>,
    gesture: Option<ComponentGesture>,
    history: History<Vec<PlacedComponent>>,
    placer: Placer,
    limits: GestureLimits,
    ids: ComponentIdAllocator,
}

impl TemplateDocument {
    /// Empty single-page document.
    #[must_use]
    pub fn new(title: impl Into<String>, config: &EngineConfig) -> Self {
        Self {
            title: title.into(),
            components: Vec::new(),
            declared_pages: 1,
            selected: None,
            gesture: None,
            history: History::new(Vec::new(), config.history_capacity),
            placer: Placer::new(config.page, config.placement),
            limits: config.gestures,
            ids: ComponentIdAllocator::default(),
        }
    }

    /// Load a saved template. The loaded state becomes the history baseline.
    pub fn from_template_data(data: TemplateData, config: &EngineConfig) -> Result<Self, DocumentError> {
        let mut seen = rustc_hash::FxHashSet::default();
        for component in &data.components {
            if !seen.insert(component.id.as_str()) {
                return Err(DocumentError::DuplicateComponent {
                    id: component.id.clone(),
                });
            }
            let size = Size::new(component.width, component.height);
            if size.width <= 0 || size.height <= 0 {
                return Err(DocumentError::InvalidSize { size });
            }
            if component.page == 0 {
                return Err(PlacementError::PageZero.into());
            }
        }
        let ids = ComponentIdAllocator::after(data.components.iter().map(|c| c.id.as_str()));

        let mut document = Self::new(data.title, config);
        document.declared_pages = data.pages.max(1);
        document.history.reset(data.components.clone());
        document.components = data.components;
        document.ids = ids;
        Ok(document)
    }

    /// Parse a saved template payload.
    pub fn from_json(json: &str, config: &EngineConfig) -> Result<Self, DocumentError> {
        let data: TemplateData = serde_json::from_str(json).map_err(DocumentError::Json)?;
        Self::from_template_data(data, config)
    }

    #[must_use]
    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn set_title(&mut self, title: impl Into<String>) {
        self.title = title.into();
    }

    #[must_use]
    pub fn components(&self) -> &[PlacedComponent] {
        &self.components
    }

    #[must_use]
    pub fn component(&self, id: &str) -> Option<&PlacedComponent> {
        self.components.iter().find(|c| c.id == id)
    }

    /// Components on `page`, in insertion order.
    pub fn components_on_page(&self, page: u32) -> impl Iterator<Item = &PlacedComponent> {
        self.components.iter().filter(move |c| c.page == page)
    }

    #[must_use]
    pub const fn placer(&self) -> &Placer {
        &self.placer
    }

    #[must_use]
    pub fn selected(&self) -> Option<&str> {
        self.selected.as_deref()
    }

    #[must_use]
    pub const fn active_gesture(&self) -> Option<&ComponentGesture> {
        self.gesture.as_ref()
    }

    #[must_use]
    pub const fn history(&self) -> &History<Vec<PlacedComponent>> {
        &self.history
    }

    /// Page count: the declared pages or the highest page holding a
    /// component, whichever is larger, and never less than 1.
    #[must_use]
    pub fn total_pages(&self) -> u32 {
        self.components
            .iter()
            .map(|c| c.page)
            .max()
            .unwrap_or(1)
            .max(self.declared_pages)
            .max(1)
    }

    /// Drop a new `kind` component centered on `pointer` on `page`.
    ///
    /// The new component is selected.
    pub fn drop_component(
        &mut self,
        kind: ComponentKind,
        pointer: Point,
        page: u32,
    ) -> Result<DropOutcome, DocumentError> {
        let total = self.total_pages();
        if page > total {
            return Err(DocumentError::PageOutOfRange { page, total });
        }
        let size = kind.default_size();
        let placement = self
            .placer
            .place_at_pointer(pointer, size, page, &self.components)?;

        let id = self.ids.allocate(&kind);
        #[cfg(feature = "tracing")]
        tracing::debug!(
            id = %id,
            page,
            x = placement.position.x,
            y = placement.position.y,
            strategy = ?placement.strategy,
            "component dropped"
        );
        self.components.push(PlacedComponent {
            id: id.clone(),
            content: kind.default_content(),
            kind,
            x: placement.position.x,
            y: placement.position.y,
            width: size.width,
            height: size.height,
            page,
            style: Some(TextStyle::default()),
        });
        self.selected = Some(id.clone());
        self.record();
        Ok(DropOutcome { id, placement })
    }

    /// Select `id`, or clear the selection with `None`.
    pub fn select(&mut self, id: Option<&str>) -> Result<(), DocumentError> {
        match id {
            None => self.selected = None,
            Some(id) => {
                self.index_of(id)?;
                self.selected = Some(id.to_owned());
            }
        }
        Ok(())
    }

    /// Replace a component's content.
    pub fn edit_content(&mut self, id: &str, content: Value) -> Result<(), DocumentError> {
        let index = self.index_of(id)?;
        self.components[index].content = content;
        self.record();
        Ok(())
    }

    /// Set a component's size from a property editor.
    pub fn set_size(&mut self, id: &str, size: Size) -> Result<(), DocumentError> {
        if size.width <= 0 || size.height <= 0 {
            return Err(DocumentError::InvalidSize { size });
        }
        let index = self.index_of(id)?;
        let component = &mut self.components[index];
        if component.width == size.width && component.height == size.height {
            return Ok(());
        }
        component.width = size.width;
        component.height = size.height;
        self.record();
        Ok(())
    }

    /// Adjust a component's text style in place. Not recorded in history.
    pub fn update_style<F>(&mut self, id: &str, update: F) -> Result<(), DocumentError>
    where
        F: FnOnce(&mut TextStyle),
    {
        let index = self.index_of(id)?;
        update(self.components[index].style.get_or_insert_with(TextStyle::default));
        Ok(())
    }

    /// Delete a component, clearing the selection if it was selected.
    pub fn delete(&mut self, id: &str) -> Result<PlacedComponent, DocumentError> {
        let index = self.index_of(id)?;
        if self
            .gesture
            .as_ref()
            .is_some_and(|gesture| gesture.component_id == id)
        {
            self.gesture = None;
        }
        let removed = self.components.remove(index);
        if self.selected.as_deref() == Some(id) {
            self.selected = None;
        }
        self.record();
        Ok(removed)
    }

    /// Append an empty page. Returns the new page count.
    pub fn add_page(&mut self) -> u32 {
        self.declared_pages = self.total_pages().saturating_add(1);
        self.declared_pages
    }

    /// Remove the last page and every component on it.
    ///
    /// A single-page document is left untouched. Returns the number of
    /// components removed.
    pub fn remove_last_page(&mut self) -> usize {
        let last = self.total_pages();
        if last <= 1 {
            return 0;
        }
        let before = self.components.len();
        self.components.retain(|c| c.page != last);
        let removed = before - self.components.len();
        self.declared_pages = last - 1;
        self.drop_dangling_references();
        self.record();
        removed
    }

    /// Start moving `id` from pointer position `pointer`.
    pub fn begin_move(&mut self, id: &str, pointer: Point) -> Result<(), DocumentError> {
        self.begin_gesture(id, GestureKind::Move, pointer)
    }

    /// Start resizing `id` from its bottom-right grip.
    pub fn begin_resize(&mut self, id: &str, pointer: Point) -> Result<(), DocumentError> {
        self.begin_gesture(id, GestureKind::Resize, pointer)
    }

    /// Apply a pointer move to the active gesture. Returns the new rectangle,
    /// or `None` when no gesture is active.
    pub fn update_gesture(&mut self, pointer: Point) -> Option<Rect> {
        let gesture = self.gesture.as_ref()?;
        let rect = gesture.rect_at(pointer, self.placer.geometry().size, &self.limits);
        let index = self.index_of(&gesture.component_id).ok()?;
        self.components[index].set_rect(rect);
        Some(rect)
    }

    /// Release the active gesture, recording a snapshot if it changed the
    /// component. Returns whether a gesture was active.
    pub fn end_gesture(&mut self) -> bool {
        let Some(gesture) = self.gesture.take() else {
            return false;
        };
        let changed = self
            .component(&gesture.component_id)
            .is_some_and(|c| c.rect() != gesture.start_rect);
        if changed {
            self.record();
        }
        true
    }

    /// Abort the active gesture and restore the component's rectangle.
    pub fn cancel_gesture(&mut self) -> bool {
        let Some(gesture) = self.gesture.take() else {
            return false;
        };
        if let Ok(index) = self.index_of(&gesture.component_id) {
            self.components[index].set_rect(gesture.start_rect);
        }
        true
    }

    #[must_use]
    pub fn can_undo(&self) -> bool {
        self.history.can_undo()
    }

    #[must_use]
    pub fn can_redo(&self) -> bool {
        self.history.can_redo()
    }

    /// Restore the previous snapshot. Returns whether anything changed.
    pub fn undo(&mut self) -> bool {
        self.gesture = None;
        let Some(snapshot) = self.history.undo() else {
            return false;
        };
        self.components = snapshot.clone();
        self.drop_dangling_references();
        true
    }

    /// Re-apply the next snapshot. Returns whether anything changed.
    pub fn redo(&mut self) -> bool {
        self.gesture = None;
        let Some(snapshot) = self.history.redo() else {
            return false;
        };
        self.components = snapshot.clone();
        self.drop_dangling_references();
        true
    }

    /// Snapshot of the document as a save payload.
    #[must_use]
    pub fn to_template_data(&self) -> TemplateData {
        TemplateData {
            title: self.title.clone(),
            components: self.components.clone(),
            pages: self.total_pages(),
        }
    }

    pub fn to_json(&self) -> Result<String, DocumentError> {
        serde_json::to_string(&self.to_template_data()).map_err(DocumentError::Json)
    }

    fn begin_gesture(&mut self, id: &str, kind: GestureKind, pointer: Point) -> Result<(), DocumentError> {
        let index = self.index_of(id)?;
        self.end_gesture();
        self.gesture = Some(ComponentGesture::new(
            id,
            kind,
            self.components[index].rect(),
            pointer,
        ));
        Ok(())
    }

    fn index_of(&self, id: &str) -> Result<usize, DocumentError> {
        self.components
            .iter()
            .position(|c| c.id == id)
            .ok_or_else(|| DocumentError::UnknownComponent { id: id.to_owned() })
    }

    fn drop_dangling_references(&mut self) {
        let dangling = self
            .selected
            .as_deref()
            .is_some_and(|id| self.component(id).is_none());
        if dangling {
            self.selected = None;
        }
    }

    fn record(&mut self) {
        self.history.push(self.components.clone());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn document() -> TemplateDocument {
        TemplateDocument::new("Invoice", &EngineConfig::default())
    }

    #[test]
    fn catalog_defaults() {
        assert_eq!(ComponentKind::Text.default_size(), Size::new(300, 100));
        assert_eq!(ComponentKind::Table.default_size(), Size::new(400, 200));
        assert_eq!(ComponentKind::Calculation.default_size(), Size::new(200, 100));
        assert_eq!(ComponentKind::from("signature").default_size(), Size::new(200, 100));
        assert_eq!(COMPONENT_CATALOG.len(), 7);
        assert_eq!(ComponentKind::Chart.display_name(), "Graph Component");
        assert_eq!(ComponentKind::Image.default_content(), json!({ "src": null }));
    }

    #[test]
    fn kind_round_trips_through_strings() {
        let json = serde_json::to_string(&ComponentKind::Details).unwrap();
        assert_eq!(json, r#""details""#);
        let other: ComponentKind = serde_json::from_str(r#""qr-code""#).unwrap();
        assert_eq!(other, ComponentKind::Other("qr-code".into()));
        assert_eq!(other.to_string(), "qr-code");
    }

    #[test]
    fn drop_places_selects_and_records() {
        let mut doc = document();
        let outcome = doc
            .drop_component(ComponentKind::Text, Point::new(400, 500), 1)
            .unwrap();
        assert_eq!(outcome.id, "text-1");
        assert_eq!(outcome.placement.position, Point::new(250, 450));
        assert_eq!(doc.selected(), Some("text-1"));
        assert!(doc.can_undo());

        let placed = doc.component("text-1").unwrap();
        assert_eq!(placed.style, Some(TextStyle::default()));
        assert!(placed.content["text"].as_str().is_some_and(|text| !text.is_empty()));
    }

    #[test]
    fn second_drop_on_same_spot_avoids_overlap() {
        let mut doc = document();
        doc.drop_component(ComponentKind::Image, Point::new(300, 300), 1).unwrap();
        let second = doc
            .drop_component(ComponentKind::Image, Point::new(300, 300), 1)
            .unwrap();
        assert_eq!(second.id, "image-2");
        let first = doc.component("image-1").unwrap().rect();
        let other = doc.component("image-2").unwrap().rect();
        assert!(!first.collides_with(&other, 10));
    }

    #[test]
    fn drop_on_missing_page_is_rejected() {
        let mut doc = document();
        let err = doc
            .drop_component(ComponentKind::Text, Point::new(100, 100), 3)
            .unwrap_err();
        assert!(matches!(err, DocumentError::PageOutOfRange { page: 3, total: 1 }));
        let err = doc
            .drop_component(ComponentKind::Text, Point::new(100, 100), 0)
            .unwrap_err();
        assert!(matches!(err, DocumentError::Placement(PlacementError::PageZero)));
    }

    #[test]
    fn delete_clears_selection_and_undo_restores() {
        let mut doc = document();
        doc.drop_component(ComponentKind::Table, Point::new(400, 400), 1).unwrap();
        doc.delete("table-1").unwrap();
        assert!(doc.components().is_empty());
        assert_eq!(doc.selected(), None);

        assert!(doc.undo());
        assert!(doc.component("table-1").is_some());
        assert!(doc.redo());
        assert!(doc.components().is_empty());
        assert!(matches!(
            doc.delete("table-1"),
            Err(DocumentError::UnknownComponent { .. })
        ));
    }

    #[test]
    fn gesture_updates_are_continuous_but_recorded_once() {
        let mut doc = document();
        doc.drop_component(ComponentKind::Text, Point::new(400, 500), 1).unwrap();
        let recorded = doc.history().len();

        doc.begin_move("text-1", Point::new(400, 500)).unwrap();
        assert_eq!(doc.update_gesture(Point::new(410, 520)), Some(Rect::new(260, 470, 300, 100)));
        assert_eq!(doc.update_gesture(Point::new(450, 560)), Some(Rect::new(300, 510, 300, 100)));
        assert_eq!(doc.history().len(), recorded);
        assert!(doc.end_gesture());
        assert_eq!(doc.history().len(), recorded + 1);

        assert!(doc.undo());
        assert_eq!(doc.component("text-1").unwrap().rect(), Rect::new(250, 450, 300, 100));
    }

    #[test]
    fn cancelled_gesture_restores_rect() {
        let mut doc = document();
        doc.drop_component(ComponentKind::Chart, Point::new(400, 500), 1).unwrap();
        let before = doc.component("chart-1").unwrap().rect();
        doc.begin_resize("chart-1", Point::new(550, 600)).unwrap();
        doc.update_gesture(Point::new(700, 700));
        assert_ne!(doc.component("chart-1").unwrap().rect(), before);
        assert!(doc.cancel_gesture());
        assert_eq!(doc.component("chart-1").unwrap().rect(), before);
        assert_eq!(doc.update_gesture(Point::new(0, 0)), None);
    }

    #[test]
    fn unchanged_gesture_is_not_recorded() {
        let mut doc = document();
        doc.drop_component(ComponentKind::Text, Point::new(400, 500), 1).unwrap();
        let recorded = doc.history().len();
        doc.begin_move("text-1", Point::new(400, 500)).unwrap();
        doc.end_gesture();
        assert_eq!(doc.history().len(), recorded);
    }

    #[test]
    fn style_updates_skip_history() {
        let mut doc = document();
        doc.drop_component(ComponentKind::Text, Point::new(400, 500), 1).unwrap();
        let recorded = doc.history().len();
        doc.update_style("text-1", |style| style.font_size = 18).unwrap();
        assert_eq!(doc.component("text-1").unwrap().style.as_ref().map(|s| s.font_size), Some(18));
        assert_eq!(doc.history().len(), recorded);

        doc.edit_content("text-1", json!({ "text": "Thanks" })).unwrap();
        doc.set_size("text-1", Size::new(320, 120)).unwrap();
        assert_eq!(doc.history().len(), recorded + 2);
        assert!(matches!(
            doc.set_size("text-1", Size::new(0, 5)),
            Err(DocumentError::InvalidSize { .. })
        ));
    }

    #[test]
    fn pages_grow_and_shrink() {
        let mut doc = document();
        assert_eq!(doc.total_pages(), 1);
        assert_eq!(doc.remove_last_page(), 0);
        assert_eq!(doc.add_page(), 2);
        assert_eq!(doc.add_page(), 3);
        doc.drop_component(ComponentKind::Text, Point::new(400, 500), 3).unwrap();
        doc.drop_component(ComponentKind::Text, Point::new(400, 500), 2).unwrap();

        assert_eq!(doc.remove_last_page(), 1);
        assert_eq!(doc.total_pages(), 2);
        assert!(doc.component("text-1").is_none());
        assert_eq!(doc.selected(), Some("text-2"));
        assert!(doc.undo());
        assert!(doc.component("text-1").is_some());
        assert_eq!(doc.total_pages(), 3);
    }

    #[test]
    fn template_data_round_trip_keeps_ids_fresh() {
        let mut doc = document();
        doc.add_page();
        doc.drop_component(ComponentKind::Details, Point::new(400, 500), 2).unwrap();
        let json = doc.to_json().unwrap();

        let value: Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value["pages"], 2);
        assert_eq!(value["components"][0]["type"], "details");

        let mut loaded = TemplateDocument::from_json(&json, &EngineConfig::default()).unwrap();
        assert_eq!(loaded.total_pages(), 2);
        assert!(!loaded.can_undo());
        let next = loaded
            .drop_component(ComponentKind::Details, Point::new(400, 200), 1)
            .unwrap();
        assert_eq!(next.id, "details-2");
    }

    #[test]
    fn loading_rejects_bad_payloads() {
        let config = EngineConfig::default();
        let duplicate = r#"{"title":"t","pages":1,"components":[
            {"id":"a","type":"text","x":0,"y":0,"width":10,"height":10,"page":1},
            {"id":"a","type":"text","x":50,"y":0,"width":10,"height":10,"page":1}]}"#;
        assert!(matches!(
            TemplateDocument::from_json(duplicate, &config),
            Err(DocumentError::DuplicateComponent { .. })
        ));
        let zero = r#"{"title":"t","pages":1,"components":[
            {"id":"a","type":"text","x":0,"y":0,"width":0,"height":10,"page":1}]}"#;
        assert!(matches!(
            TemplateDocument::from_json(zero, &config),
            Err(DocumentError::InvalidSize { .. })
        ));
        assert!(matches!(
            TemplateDocument::from_json("[]", &config),
            Err(DocumentError::Json(_))
        ));
    }

    #[test]
    fn history_capacity_comes_from_config() {
        let config = EngineConfig {
            history_capacity: 3,
            ..EngineConfig::default()
        };
        let mut doc = TemplateDocument::new("t", &config);
        for _ in 0..5 {
            doc.drop_component(ComponentKind::Image, Point::new(400, 500), 1).unwrap();
        }
        let mut undone = 0;
        while doc.undo() {
            undone += 1;
        }
        assert_eq!(undone, 2);
        assert_eq!(doc.components().len(), 3);
    }
}
