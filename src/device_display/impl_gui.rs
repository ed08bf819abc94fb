use crate::device_camera::interface::VideoFrame;
use crate::device_display::interface::DeviceDisplay;
use crate::device_input::interface::InputEvent;
use crate::preview::fit::{fit_rect, FitMode, Rect, Size};
use crate::still_capture::controller::CapturedImage;
use std::error::Error;
use std::sync::mpsc::Sender;
use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;

#[derive(Default)]
struct GuiShared {
    bounds: Size,
    preview: Option<(VideoFrame, Rect)>,
    preview_serial: u64,
    capture: Option<CapturedImage>,
    label: Option<String>,
    status: String,
    capture_enabled: bool,
}

/// Window-backed display. The screen writes into shared state; the egui
/// window only reads it and reports taps back as input events.
pub struct DeviceDisplayGui {
    shared: Arc<Mutex<GuiShared>>,
}

pub struct DisplayWindow {
    shared: Arc<Mutex<GuiShared>>,
    input: Sender<InputEvent>,
    preview_texture: Option<egui::TextureHandle>,
    preview_serial: u64,
    capture_texture: Option<(u64, egui::TextureHandle)>,
}

impl DeviceDisplayGui {
    pub fn new(input: Sender<InputEvent>) -> (Self, DisplayWindow) {
        let shared = Arc::new(Mutex::new(GuiShared {
            bounds: Size::new(640.0, 480.0),
            ..GuiShared::default()
        }));

        let window = DisplayWindow {
            shared: shared.clone(),
            input,
            preview_texture: None,
            preview_serial: 0,
            capture_texture: None,
        };

        (Self { shared }, window)
    }

    /// Blocks until the window is closed. Must run on the main thread.
    pub fn run_window(window: DisplayWindow) -> Result<(), Box<dyn Error + Send + Sync>> {
        let options = eframe::NativeOptions {
            viewport: egui::ViewportBuilder::default()
                .with_inner_size([960.0, 600.0])
                .with_title("Capture Classify"),
            ..Default::default()
        };

        eframe::run_native(
            "Capture Classify",
            options,
            Box::new(|_cc| Box::new(window)),
        )
        .map_err(|e| e.to_string().into())
    }

    fn update(&self, f: impl FnOnce(&mut GuiShared)) {
        f(&mut self.shared.lock().unwrap_or_else(PoisonError::into_inner));
    }
}

impl DeviceDisplay for DeviceDisplayGui {
    fn bounds(&self) -> Size {
        self.shared
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .bounds
    }

    fn show_preview(
        &mut self,
        frame: &VideoFrame,
        rect: Rect,
    ) -> Result<(), Box<dyn Error + Send + Sync>> {
        self.update(|s| {
            s.preview = Some((frame.clone(), rect));
            s.preview_serial += 1;
        });
        Ok(())
    }

    fn show_capture(
        &mut self,
        image: Option<&CapturedImage>,
    ) -> Result<(), Box<dyn Error + Send + Sync>> {
        self.update(|s| s.capture = image.cloned());
        Ok(())
    }

    fn show_label(&mut self, text: Option<&str>) -> Result<(), Box<dyn Error + Send + Sync>> {
        self.update(|s| s.label = text.map(str::to_string));
        Ok(())
    }

    fn show_status(&mut self, text: &str) -> Result<(), Box<dyn Error + Send + Sync>> {
        self.update(|s| s.status = text.to_string());
        Ok(())
    }

    fn set_capture_enabled(&mut self, enabled: bool) -> Result<(), Box<dyn Error + Send + Sync>> {
        self.update(|s| s.capture_enabled = enabled);
        Ok(())
    }
}

fn full_uv() -> egui::Rect {
    egui::Rect::from_min_max(egui::pos2(0.0, 0.0), egui::pos2(1.0, 1.0))
}

fn place(area: egui::Rect, rect: Rect) -> egui::Rect {
    egui::Rect::from_min_size(
        area.min + egui::vec2(rect.x, rect.y),
        egui::vec2(rect.width, rect.height),
    )
}

impl DisplayWindow {
    fn refresh_preview(&mut self, ctx: &egui::Context, frame: &VideoFrame, serial: u64) {
        if serial == self.preview_serial && self.preview_texture.is_some() {
            return;
        }
        self.preview_serial = serial;

        let image = egui::ColorImage::from_rgb(
            [frame.width as usize, frame.height as usize],
            &frame.rgb,
        );
        match &mut self.preview_texture {
            Some(texture) => texture.set(image, egui::TextureOptions::LINEAR),
            None => {
                self.preview_texture =
                    Some(ctx.load_texture("preview", image, egui::TextureOptions::LINEAR))
            }
        }
    }

    fn refresh_capture(&mut self, ctx: &egui::Context, capture: Option<&CapturedImage>) {
        let Some(capture) = capture else {
            self.capture_texture = None;
            return;
        };
        if matches!(&self.capture_texture, Some((id, _)) if *id == capture.request_id) {
            return;
        }

        // Undecodable stills keep the previous texture.
        if let Ok(decoded) = image::load_from_memory(&capture.bytes) {
            let rgb = decoded.to_rgb8();
            let image = egui::ColorImage::from_rgb(
                [rgb.width() as usize, rgb.height() as usize],
                rgb.as_raw(),
            );
            let texture = ctx.load_texture("capture", image, egui::TextureOptions::LINEAR);
            self.capture_texture = Some((capture.request_id, texture));
        }
    }
}

impl eframe::App for DisplayWindow {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        let (preview, serial, capture, label, status, capture_enabled) = {
            let shared = self.shared.lock().unwrap_or_else(PoisonError::into_inner);
            (
                shared.preview.clone(),
                shared.preview_serial,
                shared.capture.clone(),
                shared.label.clone(),
                shared.status.clone(),
                shared.capture_enabled,
            )
        };

        if let Some((frame, _)) = &preview {
            self.refresh_preview(ctx, frame, serial);
        }
        self.refresh_capture(ctx, capture.as_ref());

        egui::TopBottomPanel::bottom("controls").show(ctx, |ui| {
            ui.horizontal(|ui| {
                let button = ui.add_enabled(capture_enabled, egui::Button::new("Take Photo"));
                if button.clicked() {
                    let _ = self.input.send(InputEvent::TakePhoto);
                }
                ui.label(&status);
            });
            ui.label(
                egui::RichText::new(label.as_deref().unwrap_or("-"))
                    .monospace()
                    .size(18.0),
            );
        });

        egui::SidePanel::right("capture")
            .min_width(240.0)
            .show(ctx, |ui| {
                let area = ui.available_rect_before_wrap();
                if let Some((_, texture)) = &self.capture_texture {
                    let size = texture.size_vec2();
                    let rect = fit_rect(
                        Size::new(size.x, size.y),
                        Size::new(area.width(), area.height()),
                        FitMode::Aspect,
                    );
                    ui.painter().image(
                        texture.id(),
                        place(area, rect),
                        full_uv(),
                        egui::Color32::WHITE,
                    );
                }
            });

        let mut bounds = None;
        egui::CentralPanel::default().show(ctx, |ui| {
            let area = ui.available_rect_before_wrap();
            bounds = Some(Size::new(area.width(), area.height()));
            ui.painter().rect_filled(area, 0.0, egui::Color32::BLACK);

            if let (Some(texture), Some((_, rect))) = (&self.preview_texture, &preview) {
                ui.painter()
                    .image(texture.id(), place(area, *rect), full_uv(), egui::Color32::WHITE);
            }
        });

        if let Some(bounds) = bounds {
            self.shared
                .lock()
                .unwrap_or_else(PoisonError::into_inner)
                .bounds = bounds;
        }

        ctx.request_repaint_after(Duration::from_millis(30));
    }
}
