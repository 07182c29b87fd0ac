#![forbid(unsafe_code)]

//! Reorderable dashboard widget grid.
//!
//! A [`DashboardBoard`] holds the widgets of one dashboard page in display
//! order. Moving a widget splices it to its new position and then rewrites
//! every widget's grid `(row, col)` from its array position using the
//! board's [`GridWrap`].
//!
//! The board owns the drag session for its widgets, so drag reorders and
//! cancellations go through the same recompute as direct moves.

use crmdeck_core::config::GridWrap;
use crmdeck_core::geometry::Point;
use crmdeck_core::permission::PermissionCheck;
use serde::{Deserialize, Serialize};

use crate::descriptor::{
    DEFAULT_GRID_COLUMNS, DEFAULT_ROW_HEIGHT_PX, DEFAULT_WIDGET_HEIGHT, DEFAULT_WIDGET_WIDTH,
    GridPosition, GridSpec, PageConfig, PageLayout, Widget,
};
use crate::drag::{
    DragAffordance, DragEffect, DragInput, DragInputKind, DragKind, DragSessionMachine,
    DragTransition, WIDGET_KIND,
};
use crate::hover::HoverPolicy;
use crate::registry::{WidgetKind, WidgetRegistry};
use crate::reorder::{OrderedItem, ReorderOutcome, reorder_items};

/// A widget on a board, tagged with the id it was seeded with.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BoardWidget {
    /// Position in the descriptor's widget list. Stable across moves.
    pub seed_id: usize,
    /// Current display index.
    pub index: usize,
    pub widget: Widget,
}

impl BoardWidget {
    /// Column span, falling back to the default when unset or zero.
    #[must_use]
    pub fn span_columns(&self) -> u32 {
        match self.widget.xl.size.width {
            0 => DEFAULT_WIDGET_WIDTH,
            width => width,
        }
    }

    /// Row span, falling back to the default when unset or zero.
    #[must_use]
    pub fn span_rows(&self) -> u32 {
        match self.widget.xl.size.height {
            0 => DEFAULT_WIDGET_HEIGHT,
            height => height,
        }
    }

    #[must_use]
    pub const fn position(&self) -> GridPosition {
        self.widget.xl.position
    }
}

impl OrderedItem for BoardWidget {
    type Id = usize;

    fn id(&self) -> usize {
        self.seed_id
    }

    fn set_index(&mut self, index: usize) {
        self.index = index;
    }
}

/// `(row, col)` for display position `index` under `wrap`.
#[must_use]
pub fn grid_position_for(index: usize, wrap: GridWrap) -> (u32, u32) {
    let per_row = wrap.per_row.max(1) as usize;
    let band = u32::try_from(index / per_row).unwrap_or(u32::MAX);
    let col = u32::try_from(index % per_row).unwrap_or(0) + 1;
    let row = wrap
        .first_row
        .saturating_add(band.saturating_mul(wrap.row_stride));
    (row, col)
}

/// Rewrite every widget's grid position from its list position.
///
/// Spans already present on the position are left untouched.
pub fn assign_grid_positions(widgets: &mut [BoardWidget], wrap: GridWrap) {
    for (index, entry) in widgets.iter_mut().enumerate() {
        let (row, col) = grid_position_for(index, wrap);
        let position = &mut entry.widget.xl.position;
        position.row = row;
        position.col = col;
    }
}

/// Display-ordered widgets of one dashboard page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DashboardBoard {
    title: String,
    layout: PageLayout,
    grid: GridSpec,
    wrap: GridWrap,
    widgets: Vec<BoardWidget>,
    #[serde(skip)]
    drag: DragSessionMachine<usize>,
}

impl DashboardBoard {
    /// Seed a board from a page descriptor, preserving descriptor order and
    /// grid positions.
    #[must_use]
    pub fn from_page(page: &PageConfig, wrap: GridWrap) -> Self {
        let widgets = page
            .widgets
            .iter()
            .enumerate()
            .map(|(seed_id, widget)| BoardWidget {
                seed_id,
                index: seed_id,
                widget: widget.clone(),
            })
            .collect();
        Self {
            title: page.title.clone(),
            layout: page.layout.clone(),
            grid: page.grid,
            wrap,
            widgets,
            drag: DragSessionMachine::new(HoverPolicy::Midpoint),
        }
    }

    /// Replace the hover rule used by widget drags.
    #[must_use]
    pub fn with_hover_policy(mut self, hover_policy: HoverPolicy) -> Self {
        self.drag = DragSessionMachine::with_required(hover_policy, self.drag.required());
        self
    }

    #[must_use]
    pub fn title(&self) -> &str {
        &self.title
    }

    #[must_use]
    pub fn widgets(&self) -> &[BoardWidget] {
        &self.widgets
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.widgets.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.widgets.is_empty()
    }

    /// Grid column count, defaulting when the descriptor carried zero.
    #[must_use]
    pub const fn columns(&self) -> u32 {
        if self.grid.columns == 0 {
            DEFAULT_GRID_COLUMNS
        } else {
            self.grid.columns
        }
    }

    /// Grid row height in pixels, defaulting when the descriptor carried zero.
    #[must_use]
    pub const fn row_height(&self) -> u32 {
        if self.grid.row_height == 0 {
            DEFAULT_ROW_HEIGHT_PX
        } else {
            self.grid.row_height
        }
    }

    #[must_use]
    pub const fn wrap(&self) -> GridWrap {
        self.wrap
    }

    /// Data keys to fetch, in display order.
    pub fn data_keys(&self) -> impl Iterator<Item = &str> {
        self.widgets
            .iter()
            .map(|entry| entry.widget.data_key.as_str())
    }

    /// Resolve each widget's kind through `registry`. Unknown types yield
    /// `None`.
    pub fn resolve_kinds<'a>(
        &'a self,
        registry: &'a WidgetRegistry,
    ) -> impl Iterator<Item = (&'a BoardWidget, Option<&'a WidgetKind>)> + 'a {
        self.widgets
            .iter()
            .map(move |entry| (entry, registry.get(&entry.widget.widget_type)))
    }

    /// Move the widget at `from` to `to` and recompute every grid position.
    ///
    /// Invalid indices leave the board, including its grid positions,
    /// untouched.
    pub fn move_widget(&mut self, from: usize, to: usize) -> ReorderOutcome {
        let outcome = reorder_items(&mut self.widgets, from, to);
        if outcome.is_moved() {
            assign_grid_positions(&mut self.widgets, self.wrap);
        }
        outcome
    }

    #[must_use]
    pub const fn drag_session(&self) -> &DragSessionMachine<usize> {
        &self.drag
    }

    /// Rendering hints for the widget seeded as `seed_id`.
    #[must_use]
    pub fn affordance(&self, seed_id: usize, permissions: &dyn PermissionCheck) -> DragAffordance {
        self.drag.affordance(&seed_id, permissions)
    }

    /// Start dragging the widget at display index `index`.
    ///
    /// Returns `None` when `index` is out of range.
    pub fn begin_drag(
        &mut self,
        index: usize,
        pointer: Point,
        sequence: u64,
        permissions: &dyn PermissionCheck,
    ) -> Option<DragTransition<usize>> {
        let item = self.widgets.get(index)?.seed_id;
        Some(self.handle_drag(
            &DragInput::new(
                sequence,
                DragInputKind::Start {
                    kind: DragKind::from(WIDGET_KIND),
                    item,
                    index,
                    pointer,
                },
            ),
            permissions,
        ))
    }

    /// Feed one drag input and apply its effect to the grid.
    pub fn handle_drag(
        &mut self,
        input: &DragInput<usize>,
        permissions: &dyn PermissionCheck,
    ) -> DragTransition<usize> {
        let transition = self.drag.apply_event(input, permissions);
        self.apply_drag_effect(&transition.effect);
        transition
    }

    /// Cancel an active widget drag and restore the original order.
    pub fn cancel_drag(&mut self) -> Option<DragTransition<usize>> {
        let transition = self.drag.reset()?;
        self.apply_drag_effect(&transition.effect);
        Some(transition)
    }

    fn apply_drag_effect(&mut self, effect: &DragEffect<usize>) {
        match effect {
            DragEffect::Reordered { from, to } => {
                self.move_widget(*from, *to);
            }
            DragEffect::Cancelled {
                source,
                current_index,
                ..
            } => {
                self.move_widget(*current_index, source.origin_index);
            }
            _ => {}
        }
    }

    /// Export the widgets back into descriptor order as displayed.
    #[must_use]
    pub fn to_page(&self) -> PageConfig {
        PageConfig {
            title: self.title.clone(),
            layout: self.layout.clone(),
            grid: self.grid,
            widgets: self
                .widgets
                .iter()
                .map(|entry| entry.widget.clone())
                .collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::descriptor::{WidgetPlacement, WidgetSize};
    use crate::drag::{DragCursor, DragNoopReason};
    use crmdeck_core::geometry::Rect;
    use crmdeck_core::permission::Capabilities;

    fn page(count: usize) -> PageConfig {
        PageConfig {
            title: "Pipeline".into(),
            layout: Default::default(),
            grid: GridSpec::default(),
            widgets: (0..count)
                .map(|i| Widget {
                    widget_type: "table".into(),
                    id: format!("w{i}"),
                    data_key: format!("key{i}"),
                    xl: WidgetPlacement::default(),
                })
                .collect(),
        }
    }

    fn ids(board: &DashboardBoard) -> Vec<&str> {
        board
            .widgets()
            .iter()
            .map(|entry| entry.widget.id.as_str())
            .collect()
    }

    #[test]
    fn default_wrap_fills_rows_one_and_three() {
        let wrap = GridWrap::default();
        assert_eq!(grid_position_for(0, wrap), (1, 1));
        assert_eq!(grid_position_for(3, wrap), (1, 4));
        assert_eq!(grid_position_for(4, wrap), (3, 1));
        assert_eq!(grid_position_for(7, wrap), (3, 4));
        assert_eq!(grid_position_for(8, wrap), (5, 1));
        assert_eq!(grid_position_for(13, wrap), (7, 2));
    }

    #[test]
    fn move_widget_recomputes_grid() {
        let mut board = DashboardBoard::from_page(&page(6), GridWrap::default());
        let outcome = board.move_widget(0, 5);
        assert_eq!(outcome, ReorderOutcome::Moved { from: 0, to: 5 });
        assert_eq!(ids(&board), ["w1", "w2", "w3", "w4", "w5", "w0"]);

        let positions: Vec<(u32, u32)> = board
            .widgets()
            .iter()
            .map(|entry| (entry.position().row, entry.position().col))
            .collect();
        assert_eq!(positions, [(1, 1), (1, 2), (1, 3), (1, 4), (3, 1), (3, 2)]);
        for (index, entry) in board.widgets().iter().enumerate() {
            assert_eq!(entry.index, index);
        }
        assert_eq!(board.widgets()[5].seed_id, 0);
    }

    #[test]
    fn invalid_move_keeps_descriptor_positions() {
        let mut source = page(2);
        source.widgets[0].xl.position = GridPosition::new(4, 9);
        let mut board = DashboardBoard::from_page(&source, GridWrap::default());
        assert!(!board.move_widget(1, 1).is_moved());
        assert!(!board.move_widget(0, 2).is_moved());
        assert_eq!(board.widgets()[0].position(), GridPosition::new(4, 9));
    }

    #[test]
    fn spans_fall_back_to_defaults() {
        let mut source = page(1);
        source.widgets[0].xl.size = WidgetSize {
            width: 0,
            height: 3,
        };
        let board = DashboardBoard::from_page(&source, GridWrap::default());
        assert_eq!(board.widgets()[0].span_columns(), DEFAULT_WIDGET_WIDTH);
        assert_eq!(board.widgets()[0].span_rows(), 3);
    }

    #[test]
    fn zero_grid_values_fall_back() {
        let mut source = page(0);
        source.grid = GridSpec {
            columns: 0,
            row_height: 0,
        };
        let board = DashboardBoard::from_page(&source, GridWrap::default());
        assert_eq!(board.columns(), 12);
        assert_eq!(board.row_height(), 250);
        assert!(board.is_empty());
    }

    #[test]
    fn data_keys_follow_display_order() {
        let mut board = DashboardBoard::from_page(&page(3), GridWrap::default());
        board.move_widget(2, 0);
        let keys: Vec<&str> = board.data_keys().collect();
        assert_eq!(keys, ["key2", "key0", "key1"]);
        assert_eq!(board.to_page().widgets[0].id, "w2");
    }

    fn positions(board: &DashboardBoard) -> Vec<(u32, u32)> {
        board
            .widgets()
            .iter()
            .map(|entry| (entry.position().row, entry.position().col))
            .collect()
    }

    fn hover(seq: u64, index: usize, x: i32) -> DragInput<usize> {
        DragInput::new(
            seq,
            DragInputKind::Hover {
                target_kind: DragKind::from(WIDGET_KIND),
                target_index: index,
                target_bounds: Rect::new(index as i32 * 100, 0, 100, 100),
                pointer: Point::new(x, 50),
            },
        )
    }

    #[test]
    fn drag_drop_recomputes_grid() {
        let mut board = DashboardBoard::from_page(&page(2), GridWrap::default());
        let admin = Capabilities::ADMIN;

        let started = board.begin_drag(0, Point::new(50, 50), 1, &admin).unwrap();
        assert!(matches!(started.effect, DragEffect::Started { .. }));

        // Short of the midpoint: order and grid stay put.
        let held = board.handle_drag(&hover(2, 1, 130), &admin);
        assert!(matches!(held.effect, DragEffect::Hovered { .. }));
        assert_eq!(ids(&board), ["w0", "w1"]);

        let crossed = board.handle_drag(&hover(3, 1, 160), &admin);
        assert_eq!(crossed.effect, DragEffect::Reordered { from: 0, to: 1 });
        assert_eq!(ids(&board), ["w1", "w0"]);
        assert_eq!(positions(&board), [(1, 1), (1, 2)]);

        let dropped = board.handle_drag(
            &DragInput::new(
                4,
                DragInputKind::Drop {
                    target_kind: Some(DragKind::from(WIDGET_KIND)),
                },
            ),
            &admin,
        );
        assert!(matches!(dropped.effect, DragEffect::Dropped { final_index: 1, .. }));
        assert_eq!(ids(&board), ["w1", "w0"]);
        assert_eq!(positions(&board), [(1, 1), (1, 2)]);
        assert_eq!(board.widgets()[0].seed_id, 1);
    }

    #[test]
    fn drag_cancel_restores_order_and_grid() {
        let mut source = page(5);
        source.widgets[0].xl.position = GridPosition::new(9, 9);
        let mut board =
            DashboardBoard::from_page(&source, GridWrap::default()).with_hover_policy(HoverPolicy::Immediate);
        let admin = Capabilities::ADMIN;

        board.begin_drag(0, Point::new(50, 50), 1, &admin);
        board.handle_drag(&hover(2, 4, 401), &admin);
        assert_eq!(ids(&board), ["w1", "w2", "w3", "w4", "w0"]);
        assert_eq!(board.widgets()[4].position(), GridPosition::new(3, 1));

        let cancelled = board.cancel_drag().unwrap();
        assert!(matches!(cancelled.effect, DragEffect::Cancelled { current_index: 4, .. }));
        assert_eq!(ids(&board), ["w0", "w1", "w2", "w3", "w4"]);
        assert_eq!(
            positions(&board),
            [(1, 1), (1, 2), (1, 3), (1, 4), (3, 1)]
        );
        assert!(board.cancel_drag().is_none());
    }

    #[test]
    fn viewer_cannot_drag_widgets() {
        let mut board = DashboardBoard::from_page(&page(3), GridWrap::default());
        let viewer = Capabilities::VIEW;
        let denied = board.begin_drag(2, Point::new(250, 50), 1, &viewer).unwrap();
        assert_eq!(
            denied.effect,
            DragEffect::Noop {
                reason: DragNoopReason::PermissionDenied
            }
        );
        assert!(!board.drag_session().is_active());
        assert_eq!(board.affordance(2, &viewer).cursor, DragCursor::Default);
        assert!(board.begin_drag(7, Point::new(0, 0), 2, &Capabilities::ADMIN).is_none());
    }

    #[test]
    fn kinds_resolve_through_registry() {
        let mut source = page(2);
        source.widgets[1].widget_type = "sparkline".into();
        let board = DashboardBoard::from_page(&source, GridWrap::default());
        let registry = WidgetRegistry::default();
        let kinds: Vec<Option<&WidgetKind>> =
            board.resolve_kinds(&registry).map(|(_, kind)| kind).collect();
        assert_eq!(kinds, [Some(&WidgetKind::Table), None]);
    }
}
