//! `WorkspaceApp`: the top-level egui application state.
//!
//! This module declares the `WorkspaceApp` struct, its constructor and the
//! `eframe::App` impl. Drawing is split across the sibling sub-modules:
//!
//! - `toolbar`: search, filter, theme and view controls
//! - `content`: the projected 3D viewport and its interaction
//! - `panels`: HUD stats, overlay card, employee detail and the task form

pub mod content;
pub mod panels;
pub mod toolbar;

use std::collections::HashMap;
use std::time::Instant;

use eframe::egui;

use taskorbit::config::ViewerConfig;
use taskorbit::render::{CameraRig, Disposable, ProceduralTexture, TextureCache, TextureKind};
use taskorbit::scene::SceneClock;
use taskorbit::store::{FileStorage, Theme, WorkspaceStore};

use panels::TaskDraft;

/// An uploaded egui texture; dropping the handle frees it on the GPU.
pub struct GpuTexture(pub egui::TextureHandle);

impl Disposable for GpuTexture {
    fn dispose(self) {
        log::trace!("Freeing texture {:?}", self.0.id());
    }
}

/// Key of something under the pointer whose scale is being eased.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HoverTarget {
    Card(taskorbit::store::EmployeeId),
    Note(taskorbit::store::TaskId),
}

// ─── Application state ───────────────────────────────────────────────────────

pub struct WorkspaceApp {
    pub store: WorkspaceStore,
    pub config: ViewerConfig,
    pub clock: SceneClock,
    pub rig: CameraRig,
    pub images: TextureCache<ProceduralTexture>,
    pub textures: TextureCache<GpuTexture>,
    pub hover_scales: HashMap<HoverTarget, f32>,
    pub hovered: Option<HoverTarget>,
    /// Draft behind the open task form, paired with the task it edits.
    pub draft: Option<(Option<taskorbit::store::TaskId>, TaskDraft)>,
    pub confirm_delete: bool,
    pub show_stats: bool,
    pub last_frame: Instant,
}

impl WorkspaceApp {
    pub fn new(config: ViewerConfig) -> Self {
        let storage = FileStorage::in_dir(&config.data_dir);
        log::info!("Workspace snapshot: {}", storage.path().display());
        Self::with_store(WorkspaceStore::open(Box::new(storage)), config)
    }

    pub fn with_store(store: WorkspaceStore, config: ViewerConfig) -> Self {
        Self {
            store,
            config,
            clock: SceneClock::new(),
            rig: CameraRig::new(),
            images: TextureCache::new(),
            textures: TextureCache::new(),
            hover_scales: HashMap::new(),
            hovered: None,
            draft: None,
            confirm_delete: false,
            show_stats: true,
            last_frame: Instant::now(),
        }
    }

    /// Upload (once) and return the egui texture for `kind`.
    pub fn texture(&mut self, ctx: &egui::Context, kind: &TextureKind) -> egui::TextureId {
        let size = self.config.texture_size;
        let key = kind.key(size);
        let images = &mut self.images;
        self.textures
            .get_or_create(&key, || {
                let tex = images.get_or_create(&key, || kind.generate(size));
                let image = egui::ColorImage::from_rgba_unmultiplied(
                    [tex.image.width() as usize, tex.image.height() as usize],
                    tex.image.as_raw(),
                );
                let wrap_mode = match tex.wrap {
                    taskorbit::render::texture::Wrap::Clamp => egui::TextureWrapMode::ClampToEdge,
                    taskorbit::render::texture::Wrap::Repeat => egui::TextureWrapMode::Repeat,
                };
                let options = egui::TextureOptions {
                    wrap_mode,
                    ..egui::TextureOptions::LINEAR
                };
                GpuTexture(ctx.load_texture(key.clone(), image, options))
            })
            .0
            .id()
    }

    fn advance(&mut self) {
        let now = Instant::now();
        let dt = now.duration_since(self.last_frame).as_secs_f32().min(0.1);
        self.last_frame = now;

        let ui = self.store.ui();
        let selected = ui.selected_employee;
        let focus = selected.map(|_| (ui.camera_target, ui.camera_position));
        self.clock.tick(dt, selected);
        self.rig.update(dt, focus);

        let hovered = self.hovered;
        for (key, scale) in self.hover_scales.iter_mut() {
            *scale = taskorbit::render::animator::hover_scale_step(*scale, hovered == Some(*key));
        }
        if let Some(key) = hovered {
            self.hover_scales.entry(key).or_insert(1.0);
        }
    }

    pub fn hover_scale(&self, key: HoverTarget) -> f32 {
        self.hover_scales.get(&key).copied().unwrap_or(1.0)
    }
}

impl eframe::App for WorkspaceApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.advance();

        // Apply dark/light visuals
        match self.store.ui().theme {
            Theme::Dark => ctx.set_visuals(egui::Visuals::dark()),
            Theme::Light => ctx.set_visuals(egui::Visuals::light()),
        }

        // Top toolbar
        egui::TopBottomPanel::top("toolbar").show(ctx, |ui| {
            self.draw_toolbar(ui);
        });

        if let Some(err) = self.store.last_persistence_error() {
            let message = format!("Changes are not being saved: {}", err);
            egui::TopBottomPanel::bottom("persistence").show(ctx, |ui| {
                ui.colored_label(egui::Color32::from_rgb(255, 160, 0), message);
            });
        }

        // Team list + stats side panel
        if self.show_stats {
            egui::SidePanel::right("stats")
                .default_width(240.0)
                .show(ctx, |ui| {
                    self.draw_stats_panel(ui);
                });
        }

        // Main viewport
        let ctx_clone = ctx.clone();
        egui::CentralPanel::default()
            .frame(egui::Frame::none())
            .show(ctx, |ui| {
                self.draw_viewport(ui, &ctx_clone);
            });

        self.draw_overlay(ctx);
        self.draw_employee_window(ctx);
        self.draw_task_window(ctx);

        ctx.request_repaint();
    }

    fn on_exit(&mut self, _gl: Option<&eframe::glow::Context>) {
        self.textures.dispose_all();
        self.images.dispose_all();
        log::info!("Viewer closed at revision {}", self.store.revision());
    }
}
