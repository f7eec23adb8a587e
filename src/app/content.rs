//! Main viewport for `WorkspaceApp`.
//!
//! Projects the composed scene through the camera rig onto an egui painter:
//! backdrop, orbit ring, employee cards and the focused employee's notes.
//! Hit-testing walks the same projected rects front to back.

use std::f32::consts::TAU;

use eframe::egui;

use taskorbit::color::{palette, Rgba};
use taskorbit::render::animator::{glow_pulse, ORBIT_RADIUS};
use taskorbit::render::{Projected, TextureKind, ViewBasis};
use taskorbit::scene::{self, EmployeeCard, TaskNote};
use taskorbit::store::{TaskStatus, Theme};

use super::{HoverTarget, WorkspaceApp};

/// World size of an employee card (width, height).
const CARD_SIZE: [f32; 2] = [2.5, 3.0];
/// World edge length of a sticky note.
const NOTE_SIZE: f32 = 1.4;
/// Height of the ground the orbit ring is drawn on.
const GROUND_Y: f32 = -2.0;

pub(crate) fn to_color32(c: Rgba) -> egui::Color32 {
    egui::Color32::from_rgba_unmultiplied(c.r, c.g, c.b, c.a)
}

const FULL_UV: egui::Rect = egui::Rect {
    min: egui::Pos2 { x: 0.0, y: 0.0 },
    max: egui::Pos2 { x: 1.0, y: 1.0 },
};

enum Item<'a> {
    Card(&'a EmployeeCard),
    Note(&'a TaskNote),
}

struct Placed<'a> {
    item: Item<'a>,
    rect: egui::Rect,
    depth: f32,
    /// Pixels per world unit at this depth.
    px: f32,
}

impl Placed<'_> {
    fn target(&self) -> HoverTarget {
        match self.item {
            Item::Card(card) => HoverTarget::Card(card.id),
            Item::Note(note) => HoverTarget::Note(note.task_id),
        }
    }
}

fn to_screen(rect: egui::Rect, p: &Projected) -> egui::Pos2 {
    egui::pos2(
        rect.center().x + p.x * rect.width() * 0.5,
        rect.center().y - p.y * rect.height() * 0.5,
    )
}

impl WorkspaceApp {
    pub fn draw_viewport(&mut self, ui: &mut egui::Ui, ctx: &egui::Context) {
        let (response, painter) =
            ui.allocate_painter(ui.available_size(), egui::Sense::click_and_drag());
        let rect = response.rect;

        // Drag to orbit, right-drag to pan, scroll to dolly
        if response.dragged_by(egui::PointerButton::Primary) {
            let delta = response.drag_delta();
            self.rig.orbit(-delta.x * 0.008, -delta.y * 0.008);
        } else if response.dragged_by(egui::PointerButton::Secondary) {
            let delta = response.drag_delta();
            let k = self.rig.distance() * 0.002;
            self.rig.pan(-delta.x * k, delta.y * k);
        }
        if response.hovered() {
            let scroll = ui.input(|i| i.raw_scroll_delta.y);
            if scroll.abs() > 0.1 {
                self.rig.dolly(1.0 - scroll * 0.003);
            }
        }

        let view = self.rig.view(rect.width() / rect.height().max(1.0));
        self.draw_backdrop(&painter, ctx, rect);
        self.draw_ground(&painter, ctx, rect, &view);

        // Compose and project
        let frame = scene::compose(&self.store, &self.clock);
        let mut placed: Vec<Placed> = Vec::new();
        for card in &frame.cards {
            if let Some(p) = view.project(card.position) {
                let px =
                    p.scale * rect.height() * 0.5 * self.hover_scale(HoverTarget::Card(card.id));
                let size = egui::vec2(CARD_SIZE[0] * px * card.sway.cos(), CARD_SIZE[1] * px);
                placed.push(Placed {
                    item: Item::Card(card),
                    rect: egui::Rect::from_center_size(to_screen(rect, &p), size),
                    depth: p.depth,
                    px,
                });
            }
        }
        for note in &frame.notes {
            if let Some(p) = view.project(note.position) {
                let px = p.scale
                    * rect.height()
                    * 0.5
                    * note.scale
                    * self.hover_scale(HoverTarget::Note(note.task_id));
                placed.push(Placed {
                    item: Item::Note(note),
                    rect: egui::Rect::from_center_size(
                        to_screen(rect, &p),
                        egui::vec2(NOTE_SIZE * px, NOTE_SIZE * px),
                    ),
                    depth: p.depth,
                    px,
                });
            }
        }
        placed.sort_by(|a, b| b.depth.total_cmp(&a.depth));

        for item in &placed {
            let hovered = self.hovered == Some(item.target());
            match item.item {
                Item::Card(card) => self.paint_card(&painter, ctx, item, card, hovered),
                Item::Note(note) => self.paint_note(&painter, ctx, item, note, hovered),
            }
        }

        // Hit-test front to back; cards do not react to hover while one is focused
        let any_selected = self.store.ui().selected_employee.is_some();
        let hit_at = |pos: egui::Pos2| {
            placed
                .iter()
                .rev()
                .find(|p| p.rect.contains(pos))
                .map(|p| p.target())
        };
        self.hovered = response
            .hover_pos()
            .and_then(|pos| hit_at(pos))
            .filter(|t| !(any_selected && matches!(t, HoverTarget::Card(_))));

        let clicked = if response.clicked() || response.double_clicked() {
            response.interact_pointer_pos().map(|pos| hit_at(pos))
        } else {
            None
        };

        match clicked {
            Some(Some(HoverTarget::Card(id))) if response.double_clicked() => {
                self.store.open_employee_detail(id);
            }
            Some(Some(HoverTarget::Card(id))) => {
                scene::focus_employee(&mut self.store, &self.clock, id);
            }
            Some(Some(HoverTarget::Note(id))) => self.store.open_task_editor(id),
            Some(None) if any_selected => self.store.reset_camera(),
            _ => {}
        }

        if !self.rig.controls_enabled() {
            let progress = self.rig.intro().progress();
            painter.text(
                rect.center_bottom() - egui::vec2(0.0, 24.0),
                egui::Align2::CENTER_BOTTOM,
                format!("{:.0}%", progress * 100.0),
                egui::FontId::proportional(12.0),
                egui::Color32::from_white_alpha(120),
            );
        }
    }

    fn draw_backdrop(&mut self, painter: &egui::Painter, ctx: &egui::Context, rect: egui::Rect) {
        let base = match self.store.ui().theme {
            Theme::Dark => palette::BACKDROP_DARK,
            Theme::Light => palette::BACKDROP_LIGHT,
        };
        painter.rect_filled(rect, 0.0, to_color32(base));

        let kind = TextureKind::Noise { scale: 4.0, seed: 0x5eed };
        let noise = self.texture(ctx, &kind);
        let uv = egui::Rect::from_min_max(egui::pos2(0.0, 0.0), egui::pos2(4.0, 4.0));
        painter.image(noise, rect, uv, egui::Color32::from_white_alpha(6));
    }

    fn draw_ground(
        &mut self,
        painter: &egui::Painter,
        ctx: &egui::Context,
        rect: egui::Rect,
        view: &ViewBasis,
    ) {
        // Pulsing glow at the hub
        if let Some(hub) = view.project([0.0, GROUND_Y, 0.0]) {
            let glow = self.texture(ctx, &TextureKind::Glow(palette::IN_PROGRESS));
            let r = 4.0 * hub.scale * rect.height() * 0.5;
            let alpha = 40.0 + glow_pulse(60.0, 1.5, self.clock.elapsed);
            painter.image(
                glow,
                egui::Rect::from_center_size(to_screen(rect, &hub), egui::vec2(r * 2.0, r)),
                FULL_UV,
                egui::Color32::from_white_alpha(alpha as u8),
            );
        }

        let ring: Vec<egui::Pos2> = (0..=64)
            .filter_map(|i| {
                let a = i as f32 / 64.0 * TAU;
                view.project([ORBIT_RADIUS * a.cos(), GROUND_Y, ORBIT_RADIUS * a.sin()])
                    .map(|p| to_screen(rect, &p))
            })
            .collect();
        if ring.len() > 1 {
            painter.add(egui::Shape::line(
                ring,
                egui::Stroke::new(1.0, egui::Color32::from_white_alpha(30)),
            ));
        }
    }

    fn paint_card(
        &mut self,
        painter: &egui::Painter,
        ctx: &egui::Context,
        placed: &Placed,
        card: &EmployeeCard,
        hovered: bool,
    ) {
        let r = placed.rect;
        let px = placed.px;

        if card.selected {
            let holo = self.texture(ctx, &TextureKind::Holographic);
            painter.image(holo, r.expand(0.12 * px), FULL_UV, egui::Color32::from_white_alpha(160));
        }

        let fill = if hovered { palette::CARD_HOVER } else { palette::CARD };
        painter.rect_filled(r, 0.1 * px, to_color32(fill.with_alpha(220)));

        let metal = self.texture(ctx, &TextureKind::Metallic { base: palette::NEUTRAL, seed: 7 });
        let header = egui::Rect::from_min_size(r.min, egui::vec2(r.width(), 0.25 * px));
        painter.image(metal, header, FULL_UV, egui::Color32::from_white_alpha(70));

        let border = if hovered { palette::CARD_BORDER_HOVER } else { card.progress.color() };
        let stroke = egui::Stroke::new((0.04 * px).max(1.0), to_color32(border));
        painter.rect_stroke(r, 0.1 * px, stroke);

        let Some(employee) = self.store.employee(card.id) else {
            return;
        };
        let font = |world: f32| egui::FontId::proportional((world * px).max(6.0));
        painter.text(
            r.center_top() + egui::vec2(0.0, 0.7 * px),
            egui::Align2::CENTER_CENTER,
            &employee.avatar,
            font(0.8),
            egui::Color32::WHITE,
        );
        painter.text(
            r.center_top() + egui::vec2(0.0, 1.3 * px),
            egui::Align2::CENTER_CENTER,
            &employee.name,
            font(0.2),
            egui::Color32::WHITE,
        );
        painter.text(
            r.center_top() + egui::vec2(0.0, 1.6 * px),
            egui::Align2::CENTER_CENTER,
            &employee.role,
            font(0.15),
            to_color32(palette::ROLE_TEXT),
        );
        painter.text(
            r.center_bottom() - egui::vec2(0.0, 0.6 * px),
            egui::Align2::CENTER_CENTER,
            format!("{} tasks", card.task_count),
            font(0.15),
            egui::Color32::from_white_alpha(200),
        );
        painter.circle_filled(
            r.center_bottom() - egui::vec2(0.0, 0.3 * px),
            0.08 * px,
            to_color32(card.progress.color()),
        );
    }

    fn paint_note(
        &mut self,
        painter: &egui::Painter,
        ctx: &egui::Context,
        placed: &Placed,
        note: &TaskNote,
        hovered: bool,
    ) {
        if note.scale <= 0.0 {
            return;
        }
        let r = placed.rect;
        let px = placed.px;

        let face = self.texture(ctx, &TextureKind::TaskStatus(note.status));
        painter.image(face, r, FULL_UV, egui::Color32::WHITE);
        let paper = self.texture(ctx, &TextureKind::Paper { roughness: 0.1, seed: 11 });
        painter.image(paper, r, FULL_UV, egui::Color32::from_white_alpha(50));
        if hovered {
            painter.rect_stroke(r, 0.0, egui::Stroke::new(2.0, egui::Color32::WHITE));
        }

        let Some(task) = self.store.task(note.task_id) else {
            return;
        };
        let text = to_color32(palette::NOTE_TEXT);
        let font = |world: f32| egui::FontId::proportional((world * px).max(6.0));
        let title: String = task.title.chars().take(28).collect();
        painter.text(
            r.left_top() + egui::vec2(0.1 * px, 0.15 * px),
            egui::Align2::LEFT_TOP,
            title,
            font(0.13),
            text,
        );
        painter.text(
            r.left_bottom() + egui::vec2(0.1 * px, -0.1 * px),
            egui::Align2::LEFT_BOTTOM,
            task.priority.label(),
            font(0.1),
            text,
        );
        if note.status == TaskStatus::Completed {
            painter.text(
                r.right_bottom() - egui::vec2(0.1 * px, 0.1 * px),
                egui::Align2::RIGHT_BOTTOM,
                "\u{2714}",
                font(0.18),
                text,
            );
        }
    }
}
