use boxnest::geometry::area;
use boxnest::interaction::Highlights;
use boxnest::model::{DiagramState, RawRect, Rectangle};
use eframe::egui;

const SELECTED: egui::Color32 = egui::Color32::from_rgb(40, 90, 200);
const CANDIDATE_PARENT: egui::Color32 = egui::Color32::from_rgb(40, 140, 60);
const CANDIDATE_NESTED: egui::Color32 = egui::Color32::from_rgb(200, 140, 40);

fn to_screen(origin: egui::Pos2, r: &RawRect) -> egui::Rect {
    egui::Rect::from_min_size(
        origin + egui::vec2(r.left, r.top),
        egui::vec2(r.width, r.height),
    )
}

pub(super) fn draw_background(painter: &egui::Painter, rect: egui::Rect) {
    let bg = painter.ctx().style().visuals.extreme_bg_color;
    painter.rect_filled(rect, 0.0, bg);
}

/// Draws every rectangle, larger ones first so children stay visible on top
/// of their containers.
pub(super) fn draw_rects(
    painter: &egui::Painter,
    origin: egui::Pos2,
    state: &DiagramState,
    highlights: &Highlights,
) {
    let mut rects: Vec<&Rectangle> = state.values().collect();
    rects.sort_by(|a, b| area(&b.bounds).total_cmp(&area(&a.bounds)));

    let fill = egui::Color32::from_rgba_unmultiplied(255, 255, 255, 24);
    let normal = egui::Stroke::new(1.0, egui::Color32::from_gray(140));
    for rect in rects {
        let r = to_screen(origin, &rect.bounds);
        painter.rect_filled(r, 0.0, fill);
        let stroke = if highlights.selected == Some(rect.id) {
            egui::Stroke::new(2.0, SELECTED)
        } else if highlights.candidate_parent == Some(rect.id) {
            egui::Stroke::new(2.0, CANDIDATE_PARENT)
        } else if highlights.candidate_nested.contains(&rect.id) {
            egui::Stroke::new(2.0, CANDIDATE_NESTED)
        } else {
            normal
        };
        painter.rect_stroke(r, 0.0, stroke, egui::StrokeKind::Middle);
    }
}

pub(super) fn draw_lasso(painter: &egui::Painter, origin: egui::Pos2, lasso: &RawRect) {
    let r = to_screen(origin, lasso);
    let s = egui::Stroke::new(1.0, egui::Color32::from_rgb(90, 160, 255));
    painter.rect_filled(r, 0.0, egui::Color32::from_rgba_unmultiplied(90, 160, 255, 32));
    painter.rect_stroke(r, 0.0, s, egui::StrokeKind::Middle);
}
