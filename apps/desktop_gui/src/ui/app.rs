use chrono::{Local, TimeZone};
use client_core::{DraftField, PostSession};
use crossbeam_channel::{Receiver, Sender};
use eframe::egui;
use shared::domain::Post;

use crate::backend_bridge::commands::BackendCommand;
use crate::controller::events::{UiError, UiErrorCategory, UiEvent};
use crate::controller::orchestration::{dispatch_backend_command, submit_draft};
use crate::controller::reducer::{apply_ui_event, StatusUpdate};

const BLOG_TITLE: &str = "Crypto Blog";

#[derive(Debug, Clone)]
struct StatusBanner {
    message: String,
}

impl StatusBanner {
    fn from_error(err: &UiError) -> Self {
        Self {
            message: format!("{} error. {}", err_label(err.category()), err.display()),
        }
    }
}

fn err_label(category: UiErrorCategory) -> &'static str {
    match category {
        UiErrorCategory::Transport => "Transport",
        UiErrorCategory::Validation => "Validation",
        UiErrorCategory::Unknown => "Unexpected",
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ModalAction {
    None,
    Submit,
    Cancel,
}

pub fn post_byline(post: &Post) -> String {
    let posted = Local.timestamp_nanos(post.timestamp.0);
    format!("By {} on {}", post.author, posted.format("%Y-%m-%d %H:%M"))
}

pub struct BlogApp {
    cmd_tx: Sender<BackendCommand>,
    ui_rx: Receiver<UiEvent>,
    server_url: String,
    session: PostSession,
    status: String,
    status_banner: Option<StatusBanner>,
}

impl BlogApp {
    pub fn new(
        cmd_tx: Sender<BackendCommand>,
        ui_rx: Receiver<UiEvent>,
        server_url: String,
    ) -> Self {
        let mut app = Self {
            cmd_tx,
            ui_rx,
            server_url,
            session: PostSession::new(),
            status: "Loading posts...".to_string(),
            status_banner: None,
        };
        app.request_refresh();
        app
    }

    fn request_refresh(&mut self) {
        dispatch_backend_command(&self.cmd_tx, BackendCommand::RefreshPosts, &mut self.status);
    }

    fn process_ui_events(&mut self) {
        while let Ok(event) = self.ui_rx.try_recv() {
            match apply_ui_event(&mut self.session, event) {
                StatusUpdate::Info(message) => self.status = message,
                StatusUpdate::Error(err) => {
                    self.status = err.display();
                    self.status_banner = Some(StatusBanner::from_error(&err));
                }
            }
        }
    }

    fn show_status_banner(&mut self, ui: &mut egui::Ui) {
        if let Some(banner) = self.status_banner.clone() {
            egui::Frame::NONE
                .fill(egui::Color32::from_rgb(111, 53, 53))
                .stroke(egui::Stroke::new(1.0, egui::Color32::from_rgb(175, 96, 96)))
                .corner_radius(8.0)
                .inner_margin(egui::Margin::symmetric(10, 8))
                .show(ui, |ui| {
                    ui.horizontal_wrapped(|ui| {
                        ui.label(egui::RichText::new(&banner.message).color(egui::Color32::WHITE));
                        ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                            if ui.button("Dismiss").clicked() {
                                self.status_banner = None;
                            }
                        });
                    });
                });
            ui.add_space(8.0);
        }
    }

    fn show_header(&mut self, ctx: &egui::Context) {
        egui::TopBottomPanel::top("blog_header").show(ctx, |ui| {
            ui.add_space(6.0);
            ui.horizontal(|ui| {
                ui.heading(BLOG_TITLE);
                ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                    if ui.button("Create New Post").clicked() {
                        self.session.open_modal();
                    }
                    if ui.button("Refresh").clicked() {
                        self.request_refresh();
                    }
                });
            });
            ui.add_space(6.0);
        });
    }

    fn show_status_bar(&self, ctx: &egui::Context) {
        egui::TopBottomPanel::bottom("status_bar").show(ctx, |ui| {
            ui.horizontal(|ui| {
                ui.weak(&self.server_url);
                ui.separator();
                ui.label(&self.status);
            });
        });
    }

    fn show_posts(&mut self, ctx: &egui::Context) {
        egui::CentralPanel::default().show(ctx, |ui| {
            self.show_status_banner(ui);

            if self.session.posts().is_empty() {
                ui.centered_and_justified(|ui| {
                    ui.weak("No posts yet.");
                });
                return;
            }

            egui::ScrollArea::vertical()
                .auto_shrink([false, false])
                .show(ui, |ui| {
                    for post in self.session.posts() {
                        show_post_card(ui, post);
                        ui.add_space(8.0);
                    }
                });
        });
    }

    fn show_create_post_modal(&mut self, ctx: &egui::Context) {
        if !self.session.modal.is_open() {
            return;
        }

        let modal = egui::Modal::new(egui::Id::new("create_post_modal"))
            .show(ctx, |ui| self.create_post_form(ui));

        let action = if modal.should_close() {
            ModalAction::Cancel
        } else {
            modal.inner
        };

        match action {
            ModalAction::Submit => submit_draft(&mut self.session, &self.cmd_tx, &mut self.status),
            ModalAction::Cancel => self.session.cancel_modal(),
            ModalAction::None => {}
        }
    }

    fn create_post_form(&mut self, ui: &mut egui::Ui) -> ModalAction {
        ui.set_width(420.0);
        ui.heading("Create New Post");
        ui.add_space(8.0);

        let submitting = self.session.is_submitting();
        for field in DraftField::ALL {
            ui.label(field.label());
            let value = self.session.form.value_mut(field);
            let edit = match field {
                DraftField::Body => egui::TextEdit::multiline(value).desired_rows(6),
                DraftField::Title | DraftField::Author => egui::TextEdit::singleline(value),
            };
            ui.add_enabled(!submitting, edit.desired_width(f32::INFINITY));
            if let Some(error) = self.session.form.error(field) {
                ui.colored_label(egui::Color32::from_rgb(220, 80, 80), error);
            }
            ui.add_space(6.0);
        }

        let mut action = ModalAction::None;
        ui.horizontal(|ui| {
            let label = if submitting { "Submitting..." } else { "Submit" };
            if ui.add_enabled(!submitting, egui::Button::new(label)).clicked() {
                action = ModalAction::Submit;
            }
            if ui.button("Cancel").clicked() {
                action = ModalAction::Cancel;
            }
        });
        action
    }
}

fn show_post_card(ui: &mut egui::Ui, post: &Post) {
    egui::Frame::group(ui.style())
        .corner_radius(8.0)
        .inner_margin(egui::Margin::symmetric(12, 10))
        .show(ui, |ui| {
            ui.set_width(ui.available_width());
            ui.label(egui::RichText::new(&post.title).strong().size(18.0));
            ui.weak(post_byline(post));
            ui.add_space(4.0);
            ui.label(&post.body);
        });
}

impl eframe::App for BlogApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.process_ui_events();

        self.show_header(ctx);
        self.show_status_bar(ctx);
        self.show_posts(ctx);
        self.show_create_post_modal(ctx);

        ctx.request_repaint_after(std::time::Duration::from_millis(100));
    }
}
