use boxnest::interaction::{Mode, PointerInput};
use boxnest::model::Point;
use eframe::egui;
use log::warn;

use super::DiagramApp;
use super::render::{draw_background, draw_lasso, draw_rects};

impl eframe::App for DiagramApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        let wants_keyboard = ctx.wants_keyboard_input();
        let (save_requested, delete_requested) = ctx.input_mut(|i| {
            let save = i.consume_key(egui::Modifiers::COMMAND, egui::Key::S);
            let delete = !wants_keyboard
                && (i.consume_key(egui::Modifiers::NONE, egui::Key::Delete)
                    || i.consume_key(egui::Modifiers::NONE, egui::Key::Backspace));
            (save, delete)
        });
        if save_requested {
            self.save();
        }
        if delete_requested {
            self.delete_selected();
        }

        egui::TopBottomPanel::top("top_bar").show(ctx, |ui| {
            ui.horizontal(|ui| {
                ui.label("Mode:");
                let mut mode = self.editor.mode();
                ui.selectable_value(&mut mode, Mode::Select, "Select");
                ui.selectable_value(&mut mode, Mode::Draw, "Draw");
                self.set_mode(mode);
                ui.separator();
                ui.add(egui::TextEdit::singleline(&mut self.random_count).desired_width(48.0));
                if ui.button("Add random rectangles").clicked() {
                    self.add_random();
                }
                ui.separator();
                if ui.button("Save (⌘S)").clicked() {
                    self.save();
                }
            });
        });

        egui::TopBottomPanel::bottom("status_bar").show(ctx, |ui| {
            ui.horizontal(|ui| {
                if let Some(status) = &self.status {
                    ui.label(status);
                } else {
                    ui.label("Ready");
                }
                ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                    ui.label(format!("Rectangles: {}", self.editor.state().len()));
                    if let Some(id) = self.editor.selected() {
                        ui.separator();
                        ui.label(format!("Selected: {id}"));
                    }
                });
            });
        });

        egui::CentralPanel::default().show(ctx, |ui| {
            let (rect, response) =
                ui.allocate_exact_size(ui.available_size(), egui::Sense::click_and_drag());
            let canvas_origin = Some(Point::new(rect.min.x, rect.min.y));

            if response.hovered() && self.editor.mode() == Mode::Draw {
                ctx.set_cursor_icon(egui::CursorIcon::Crosshair);
            }

            let (pressed, released, moving, pointer) = ctx.input(|i| {
                (
                    i.pointer.primary_pressed(),
                    i.pointer.primary_released(),
                    i.pointer.is_moving(),
                    i.pointer.interact_pos(),
                )
            });
            if let Some(pos) = pointer {
                let client = Point::new(pos.x, pos.y);
                if pressed && rect.contains(pos) {
                    if let Err(err) = self.editor.pointer_down(PointerInput {
                        client,
                        canvas_origin,
                    }) {
                        warn!(err:% = err; "Gesture aborted");
                        self.status = Some(err.to_string());
                    }
                } else if moving {
                    self.editor.pointer_move(client);
                }
                // a quick click can press and release within one frame
                if released {
                    if let Err(err) = self.editor.pointer_up(client) {
                        warn!(err:% = err; "Gesture aborted");
                        self.status = Some(err.to_string());
                    }
                }
            }

            let painter = ui.painter_at(rect);
            draw_background(&painter, rect);
            draw_rects(
                &painter,
                rect.min,
                self.editor.state(),
                &self.editor.highlights(),
            );
            if let Some(lasso) = self.editor.lasso_box() {
                draw_lasso(&painter, rect.min, &lasso);
            }
        });
    }
}
