//! Court × sub-slot booking grid.
//!
//! Paints one column per court and one row per 15-minute sub-slot from a
//! `SlotClassifier`, and translates raw pointer input into the
//! `PointerEvent`s the selector understands. Release and window-leave are
//! read from the global input state so a drag can never get stuck when the
//! pointer ends up outside the grid.

use egui::{Align2, Color32, CursorIcon, FontId, Pos2, Rect, Sense, Stroke, Vec2};

use super::palette::GridPalette;
use crate::models::clock::TIME_INTERVAL;
use crate::models::court::Court;
use crate::models::selection::Selection;
use crate::models::time_slot::DayGrid;
use crate::services::classifier::{Placement, SlotClassifier, SlotStatus};
use crate::services::selector::{GridCell, PointerEvent};

pub const SLOT_HEIGHT: f32 = 22.0;
pub const TIME_LABEL_WIDTH: f32 = 56.0;
pub const HEADER_HEIGHT: f32 = 28.0;
pub const MIN_COLUMN_WIDTH: f32 = 110.0;
const BAR_INSET: f32 = 3.0;

/// Screen geometry of the grid for one frame.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GridLayout {
    pub origin: Pos2,
    pub col_width: f32,
    pub columns: usize,
    pub rows: usize,
}

impl GridLayout {
    pub fn new(origin: Pos2, available_width: f32, columns: usize, rows: usize) -> Self {
        let col_width = if columns == 0 {
            MIN_COLUMN_WIDTH
        } else {
            ((available_width - TIME_LABEL_WIDTH) / columns as f32).max(MIN_COLUMN_WIDTH)
        };
        Self {
            origin,
            col_width,
            columns,
            rows,
        }
    }

    pub fn size(&self) -> Vec2 {
        Vec2::new(
            TIME_LABEL_WIDTH + self.col_width * self.columns as f32,
            HEADER_HEIGHT + SLOT_HEIGHT * self.rows as f32,
        )
    }

    pub fn header_rect(&self, column: usize) -> Rect {
        Rect::from_min_size(
            Pos2::new(
                self.origin.x + TIME_LABEL_WIDTH + self.col_width * column as f32,
                self.origin.y,
            ),
            Vec2::new(self.col_width, HEADER_HEIGHT),
        )
    }

    pub fn cell_rect(&self, column: usize, row: usize) -> Rect {
        Rect::from_min_size(
            Pos2::new(
                self.origin.x + TIME_LABEL_WIDTH + self.col_width * column as f32,
                self.origin.y + HEADER_HEIGHT + SLOT_HEIGHT * row as f32,
            ),
            Vec2::new(self.col_width, SLOT_HEIGHT),
        )
    }

    /// (column, row) under `pos`, if it lies on a cell.
    pub fn hit(&self, pos: Pos2) -> Option<(usize, usize)> {
        let x = pos.x - self.origin.x - TIME_LABEL_WIDTH;
        let y = pos.y - self.origin.y - HEADER_HEIGHT;
        if x < 0.0 || y < 0.0 {
            return None;
        }
        let column = (x / self.col_width) as usize;
        let row = (y / SLOT_HEIGHT) as usize;
        (column < self.columns && row < self.rows).then_some((column, row))
    }
}

pub struct BookingGridView<'v, 'a> {
    pub grid: &'v DayGrid,
    pub courts: &'v [Court],
    pub classifier: &'v SlotClassifier<'a>,
    pub selection: Option<&'v Selection>,
    pub dragging: bool,
}

impl<'v, 'a> BookingGridView<'v, 'a> {
    /// Paint the grid and return the pointer events for this frame, in the
    /// order the selector should see them.
    pub(crate) fn show(&self, ui: &mut egui::Ui, palette: &GridPalette) -> Vec<PointerEvent> {
        let layout = GridLayout::new(
            ui.cursor().min,
            ui.available_width(),
            self.courts.len(),
            self.grid.row_count(),
        );
        let (rect, response) = ui.allocate_exact_size(layout.size(), Sense::click_and_drag());
        let layout = GridLayout {
            origin: rect.min,
            ..layout
        };

        let painter = ui.painter_at(rect);
        self.paint_header(&painter, &layout, palette);
        self.paint_cells(&painter, &layout, palette);

        let (pressed, down, released, pointer_gone, pointer) = ui.input(|i| {
            (
                i.pointer.primary_pressed(),
                i.pointer.primary_down(),
                i.pointer.primary_released(),
                i.events.iter().any(|e| matches!(e, egui::Event::PointerGone)),
                i.pointer.interact_pos(),
            )
        });

        let hovered_cell = pointer
            .and_then(|pos| layout.hit(pos))
            .and_then(|(column, row)| self.cell(column, row));

        if let Some(cell) = &hovered_cell {
            if response.hovered() {
                self.hover_feedback(ui, &response, &layout, cell, palette, &painter);
            }
        }

        let mut events = Vec::new();
        if pressed && response.hovered() {
            if let Some(cell) = hovered_cell.clone() {
                events.push(PointerEvent::Down(cell));
            }
        } else if down && self.dragging {
            if let Some(cell) = hovered_cell {
                events.push(PointerEvent::Enter(cell));
            }
        }
        if released {
            events.push(PointerEvent::Up);
        }
        if pointer_gone {
            events.push(PointerEvent::LeaveWindow);
        }

        if self.dragging {
            ui.ctx().set_cursor_icon(CursorIcon::Grabbing);
            ui.ctx().request_repaint();
        }
        events
    }

    fn cell(&self, column: usize, row: usize) -> Option<GridCell> {
        let court = self.courts.get(column)?;
        let sub_slot = self.grid.row_at(row)?;
        Some(GridCell::at(court.id.clone(), sub_slot.time))
    }

    fn paint_header(&self, painter: &egui::Painter, layout: &GridLayout, palette: &GridPalette) {
        for (column, court) in self.courts.iter().enumerate() {
            let rect = layout.header_rect(column);
            painter.text(
                rect.center(),
                Align2::CENTER_CENTER,
                &court.name,
                FontId::proportional(14.0),
                palette.header_text,
            );
            painter.line_segment(
                [rect.left_bottom(), rect.right_bottom()],
                Stroke::new(1.0, palette.hour_line),
            );
        }
    }

    fn paint_cells(&self, painter: &egui::Painter, layout: &GridLayout, palette: &GridPalette) {
        for (row, sub_slot) in self.grid.rows().enumerate() {
            let is_hour_start = sub_slot.minutes == 0;

            if is_hour_start {
                let label_pos = Pos2::new(
                    layout.origin.x + TIME_LABEL_WIDTH - 6.0,
                    layout.cell_rect(0, row).top() + 2.0,
                );
                painter.text(
                    label_pos,
                    Align2::RIGHT_TOP,
                    sub_slot.time.to_string(),
                    FontId::proportional(12.0),
                    palette.time_text,
                );
            }

            for (column, court) in self.courts.iter().enumerate() {
                let rect = layout.cell_rect(column, row);
                let background = if sub_slot.is_available {
                    palette.open_bg
                } else {
                    palette.closed_bg
                };
                painter.rect_filled(rect, 0.0, background);

                let line = if is_hour_start {
                    palette.hour_line
                } else {
                    palette.slot_line
                };
                painter.line_segment([rect.left_top(), rect.right_top()], Stroke::new(1.0, line));
                painter.line_segment(
                    [rect.right_top(), rect.right_bottom()],
                    Stroke::new(1.0, palette.hour_line),
                );

                match self.classifier.classify(&court.id, sub_slot.time) {
                    SlotStatus::Confirmed { booking, placement } => {
                        let is_end = sub_slot.time.saturating_add(TIME_INTERVAL) >= booking.end;
                        let bar = occupied_bar(rect, placement, is_end);
                        paint_bar(painter, bar, palette.booking_fill, palette.booking_accent);
                        if placement.is_start {
                            paint_label(
                                painter,
                                bar,
                                booking.display_title(),
                                &format!("{} - {}", booking.start, booking.end),
                                palette.fill_text,
                            );
                        }
                    }
                    SlotStatus::Blocked { block, placement } => {
                        let is_end = sub_slot.time.saturating_add(TIME_INTERVAL) >= block.end;
                        let bar = occupied_bar(rect, placement, is_end);
                        paint_bar(painter, bar, palette.blocked_fill, palette.blocked_accent);
                        if placement.is_start {
                            paint_label(
                                painter,
                                bar,
                                block.display_reason(),
                                &format!("{} - {}", block.start, block.end),
                                palette.fill_text,
                            );
                        }
                    }
                    SlotStatus::Free => {
                        if self
                            .selection
                            .is_some_and(|selection| selection.includes(&court.id, sub_slot.time))
                        {
                            painter.rect_filled(rect.shrink(1.0), 0.0, palette.selection_fill);
                        }
                    }
                }
            }
        }

        if let Some(selection) = self.selection {
            self.paint_selection_outline(painter, layout, selection, palette);
        }
    }

    fn paint_selection_outline(
        &self,
        painter: &egui::Painter,
        layout: &GridLayout,
        selection: &Selection,
        palette: &GridPalette,
    ) {
        let columns: Vec<usize> = self
            .courts
            .iter()
            .enumerate()
            .filter(|(_, court)| selection.for_court(&court.id).is_some())
            .map(|(column, _)| column)
            .collect();
        let rows: Vec<usize> = self
            .grid
            .rows()
            .enumerate()
            .filter(|(_, sub_slot)| selection.range().contains(sub_slot.time))
            .map(|(row, _)| row)
            .collect();

        let (Some(first_col), Some(last_col), Some(first_row), Some(last_row)) =
            (columns.first(), columns.last(), rows.first(), rows.last())
        else {
            return;
        };
        let outline = layout
            .cell_rect(*first_col, *first_row)
            .union(layout.cell_rect(*last_col, *last_row));
        painter.rect_stroke(outline.shrink(1.0), 2.0, Stroke::new(2.0, palette.selection_border));
    }

    fn hover_feedback(
        &self,
        ui: &egui::Ui,
        response: &egui::Response,
        layout: &GridLayout,
        cell: &GridCell,
        palette: &GridPalette,
        painter: &egui::Painter,
    ) {
        let time = cell.time();
        let status = self.classifier.classify(&cell.court_id, time);

        if status.is_free() && self.grid.is_available(time) && !self.dragging {
            if let Some(column) = self.courts.iter().position(|c| c.id == cell.court_id) {
                if let Some(row) = self.grid.rows().position(|s| s.time == time) {
                    painter.rect_filled(layout.cell_rect(column, row), 0.0, palette.hover_overlay);
                }
            }
            ui.ctx().set_cursor_icon(CursorIcon::PointingHand);
        }

        if self.dragging {
            return;
        }
        let tooltip = match status {
            SlotStatus::Confirmed { booking, .. } => {
                let mut text = format!(
                    "{}\n{} - {}\nPayment: {}",
                    booking.display_title(),
                    booking.start,
                    booking.end,
                    booking.payment_status.label()
                );
                if !booking.participants.is_empty() {
                    text.push_str(&format!("\nParticipants: {}", booking.participants.join(", ")));
                }
                Some(text)
            }
            SlotStatus::Blocked { block, .. } => Some(format!(
                "{}\n{} - {}",
                block.display_reason(),
                block.start,
                block.end
            )),
            SlotStatus::Free => None,
        };
        if let Some(text) = tooltip {
            response.clone().on_hover_ui_at_pointer(|ui| {
                ui.label(text);
            });
        }
    }
}

/// Part of `cell` an occupied interval paints.
///
/// Interior sub-slots fill the cell edge to edge so a block reads as one
/// bar; the outer edges of a block are inset unless another interval
/// touches them, which merges adjacent blocks into a continuous bar.
fn occupied_bar(cell: Rect, placement: Placement, is_end: bool) -> Rect {
    let top = if placement.is_start && !placement.has_adjacent_top {
        BAR_INSET
    } else {
        0.0
    };
    let bottom = if is_end && !placement.has_adjacent_bottom {
        BAR_INSET
    } else {
        0.0
    };
    Rect::from_min_max(
        Pos2::new(cell.left() + BAR_INSET, cell.top() + top),
        Pos2::new(cell.right() - BAR_INSET, cell.bottom() - bottom),
    )
}

fn paint_bar(painter: &egui::Painter, bar: Rect, fill: Color32, accent: Color32) {
    painter.rect_filled(bar, 0.0, fill);
    let accent_rect = Rect::from_min_size(bar.min, Vec2::new(4.0, bar.height()));
    painter.rect_filled(accent_rect, 0.0, accent);
}

fn paint_label(painter: &egui::Painter, bar: Rect, title: &str, range: &str, color: Color32) {
    let left = bar.left() + 8.0;
    painter.text(
        Pos2::new(left, bar.top() + 2.0),
        Align2::LEFT_TOP,
        title,
        FontId::proportional(13.0),
        color,
    );
    painter.text(
        Pos2::new(bar.right() - 4.0, bar.top() + 3.0),
        Align2::RIGHT_TOP,
        range,
        FontId::proportional(10.0),
        color,
    );
}

#[cfg(test)]
mod tests {
    use super::*;

    fn layout() -> GridLayout {
        GridLayout {
            origin: Pos2::new(10.0, 20.0),
            col_width: 120.0,
            columns: 3,
            rows: 8,
        }
    }

    #[test]
    fn test_hit_maps_position_to_cell() {
        let layout = layout();
        let center = layout.cell_rect(2, 5).center();
        assert_eq!(layout.hit(center), Some((2, 5)));
    }

    #[test]
    fn test_hit_ignores_header_and_time_column() {
        let layout = layout();
        assert_eq!(layout.hit(layout.header_rect(0).center()), None);
        assert_eq!(layout.hit(Pos2::new(20.0, 100.0)), None);
        let below = layout.cell_rect(0, 7).center() + Vec2::new(0.0, SLOT_HEIGHT);
        assert_eq!(layout.hit(below), None);
    }

    #[test]
    fn test_columns_never_shrink_below_minimum() {
        let layout = GridLayout::new(Pos2::ZERO, 200.0, 4, 10);
        assert_eq!(layout.col_width, MIN_COLUMN_WIDTH);
        let wide = GridLayout::new(Pos2::ZERO, TIME_LABEL_WIDTH + 800.0, 4, 10);
        assert_eq!(wide.col_width, 200.0);
    }

    #[test]
    fn test_adjacent_edges_are_not_inset() {
        let cell = Rect::from_min_size(Pos2::ZERO, Vec2::new(100.0, SLOT_HEIGHT));
        let lone = Placement {
            is_start: true,
            ..Default::default()
        };
        assert_eq!(occupied_bar(cell, lone, true).top(), BAR_INSET);
        assert_eq!(occupied_bar(cell, lone, true).bottom(), SLOT_HEIGHT - BAR_INSET);

        let merged = Placement {
            is_start: true,
            has_adjacent_top: true,
            has_adjacent_bottom: true,
        };
        assert_eq!(occupied_bar(cell, merged, true).top(), 0.0);
        assert_eq!(occupied_bar(cell, merged, true).bottom(), SLOT_HEIGHT);

        let interior = Placement::default();
        assert_eq!(occupied_bar(cell, interior, false).height(), SLOT_HEIGHT);
    }
}
