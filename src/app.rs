//! Main application UI and state management.
//! Handles materials, their flashcard decks, and learning sessions.

use chrono::{DateTime, Local, Utc};
use eframe::egui;
use study_hub::database::Store;
use study_hub::export::json::{export_json_to_path, import_json};
use study_hub::generator::ModelOutputGenerator;
use study_hub::models::{Flashcard, LearningSession, Material, MaterialKind, ReviewSession, Score};
use study_hub::service::DeckStats;
use study_hub::{Config, StudyService};
use uuid::Uuid;

/// Application screen states
#[derive(Default)]
enum AppScreen {
    #[default]
    Main,
    LearningSession,
}

/// What the deck panel needs to draw one material.
struct MaterialRow {
    material: Material,
    stats: DeckStats,
}

/// Main application state
pub struct MyApp {
    service: StudyService<Box<dyn Store>>,
    config: Config,

    show_confirmation_dialog: bool,
    allowed_to_close: bool,

    materials: Vec<MaterialRow>,
    selected_material: Option<Uuid>,
    selected_cards: Vec<Flashcard>,
    sessions: Vec<ReviewSession>,

    new_material_name: String,
    new_material_content: String,
    current_question: String,
    current_answer: String,

    current_screen: AppScreen,
    learning_session: Option<LearningSession>,

    show_result_dialog: bool,
    result_message: String,
}

/// Formats a timestamp as a local YYYY-MM-DD string
fn format_date(time: DateTime<Utc>) -> String {
    let datetime: DateTime<Local> = time.into();
    datetime.format("%Y-%m-%d").to_string()
}

impl eframe::App for MyApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        match self.current_screen {
            AppScreen::Main => self.render_main_screen(ctx),
            AppScreen::LearningSession => self.render_learning_screen(ctx),
        }

        // Handle window close requests with confirmation dialog
        if ctx.input(|i| i.viewport().close_requested()) && !self.allowed_to_close {
            ctx.send_viewport_cmd(egui::ViewportCommand::CancelClose);
            self.show_confirmation_dialog = true;
        }

        if self.show_confirmation_dialog {
            egui::Window::new("Do you want to quit?")
                .collapsible(false)
                .resizable(false)
                .show(ctx, |ui| {
                    ui.horizontal(|ui| {
                        if ui.button("No").clicked() {
                            self.show_confirmation_dialog = false;
                            self.allowed_to_close = false;
                        }

                        if ui.button("Yes").clicked() {
                            self.end_learning_session();
                            self.show_confirmation_dialog = false;
                            self.allowed_to_close = true;
                            ui.ctx().send_viewport_cmd(egui::ViewportCommand::Close);
                        }
                    });
                });
        }

        if self.show_result_dialog {
            egui::Window::new("Study Hub")
                .collapsible(false)
                .resizable(false)
                .show(ctx, |ui| {
                    ui.label(&self.result_message);
                    ui.add_space(10.0);
                    if ui.button("OK").clicked() {
                        self.show_result_dialog = false;
                    }
                });
        }
    }
}

impl MyApp {
    pub fn new(service: StudyService<Box<dyn Store>>, config: Config) -> Self {
        let mut app = Self {
            service,
            config,
            show_confirmation_dialog: false,
            allowed_to_close: false,
            materials: Vec::new(),
            selected_material: None,
            selected_cards: Vec::new(),
            sessions: Vec::new(),
            new_material_name: String::new(),
            new_material_content: String::new(),
            current_question: String::new(),
            current_answer: String::new(),
            current_screen: AppScreen::Main,
            learning_session: None,
            show_result_dialog: false,
            result_message: String::new(),
        };
        app.refresh();
        app.selected_material = app.materials.first().map(|row| row.material.id);
        app.refresh_selected_cards();
        app
    }

    fn show_message(&mut self, message: String) {
        self.result_message = message;
        self.show_result_dialog = true;
    }

    fn report_error(&mut self, context: &str, err: impl std::fmt::Display) {
        log::error!("{}: {}", context, err);
        self.show_message(format!("{}: {}", context, err));
    }

    /// Reloads materials, their deck statistics and the session history from the store.
    fn refresh(&mut self) {
        match self.service.sessions() {
            Ok(sessions) => self.sessions = sessions,
            Err(e) => return self.report_error("Failed to load sessions", e),
        }

        let materials = match self.service.materials() {
            Ok(materials) => materials,
            Err(e) => return self.report_error("Failed to load materials", e),
        };

        let mut rows = Vec::with_capacity(materials.len());
        for material in materials {
            match self.service.stats(Some(material.id)) {
                Ok(stats) => rows.push(MaterialRow { material, stats }),
                Err(e) => return self.report_error("Failed to load flashcards", e),
            }
        }
        self.materials = rows;
    }

    fn refresh_selected_cards(&mut self) {
        let cards = match self.selected_material {
            Some(id) => self.service.flashcards(Some(id)),
            None => Ok(Vec::new()),
        };
        match cards {
            Ok(cards) => self.selected_cards = cards,
            Err(e) => self.report_error("Failed to load flashcards", e),
        }
    }

    /// Renders the main screen with material and deck management
    fn render_main_screen(&mut self, ctx: &egui::Context) {
        egui::CentralPanel::default().show(ctx, |ui| {
            ui.label(format!("Today: {}", format_date(Utc::now())));
            ui.separator();

            ui.heading("Add Study Material");
            ui.horizontal(|ui| {
                ui.label("Name:");
                ui.text_edit_singleline(&mut self.new_material_name);
            });
            ui.label("Content:");
            ui.add(egui::TextEdit::multiline(&mut self.new_material_content).desired_rows(3));
            if ui.button("Add Material").clicked() && !self.new_material_name.is_empty() {
                let material = Material::new(
                    std::mem::take(&mut self.new_material_name),
                    MaterialKind::Text,
                    std::mem::take(&mut self.new_material_content),
                );
                match self.service.add_material(material) {
                    Ok(material) => {
                        self.selected_material = Some(material.id);
                        self.refresh();
                        self.refresh_selected_cards();
                    }
                    Err(e) => self.report_error("Failed to add material", e),
                }
            }

            ui.separator();

            ui.heading(format!("Materials ({})", self.materials.len()));

            // Actions are applied after rendering to avoid borrowing conflicts
            let mut action_select: Option<Uuid> = None;
            let mut action_learn: Option<Uuid> = None;
            let mut action_generate: Option<Uuid> = None;
            let mut action_export: Option<Uuid> = None;
            let mut action_import: Option<Uuid> = None;
            let mut action_delete: Option<Uuid> = None;

            egui::ScrollArea::vertical()
                .id_salt("materials_list")
                .max_height(180.0)
                .show(ui, |ui| {
                    for (i, row) in self.materials.iter().enumerate() {
                        let id = row.material.id;
                        let is_selected = self.selected_material == Some(id);
                        let stats = row.stats;

                        ui.horizontal(|ui| {
                            if ui
                                .selectable_label(
                                    is_selected,
                                    format!(
                                        "{}. {} ({} cards, {} due)",
                                        i + 1,
                                        row.material.name,
                                        stats.total,
                                        stats.due_today
                                    ),
                                )
                                .clicked()
                            {
                                action_select = Some(id);
                            }

                            if ui.button("Learn").clicked() {
                                action_learn = Some(id);
                            }
                        });

                        if is_selected {
                            ui.label(format!(
                                "   Mastered: {}  Learning: {}  Difficult: {}",
                                stats.mastered, stats.learning, stats.difficult
                            ));
                            ui.horizontal(|ui| {
                                if ui.button("Import Generated Cards").clicked() {
                                    action_generate = Some(id);
                                }
                                if ui.button("Import Deck").clicked() {
                                    action_import = Some(id);
                                }
                                if ui.button("Export Deck").clicked() {
                                    action_export = Some(id);
                                }
                                if ui.button("Delete").clicked() {
                                    action_delete = Some(id);
                                }
                            });
                        }
                    }
                });

            if let Some(id) = action_select {
                self.selected_material = Some(id);
                self.refresh_selected_cards();
            }
            if let Some(id) = action_learn {
                self.start_learning_session(id);
            }
            if let Some(id) = action_generate {
                self.handle_generated_import(id);
            }
            if let Some(id) = action_import {
                self.handle_deck_import(id);
            }
            if let Some(id) = action_export {
                self.handle_export(id);
            }
            if let Some(id) = action_delete {
                self.handle_delete_material(id);
            }

            ui.separator();

            if let Some(material_id) = self.selected_material {
                self.render_deck(ui, material_id);
            } else {
                ui.label("Select a material to add flashcards");
            }

            ui.separator();
            self.render_session_history(ui);
        });
    }

    /// Flashcard list and the form for adding cards by hand
    fn render_deck(&mut self, ui: &mut egui::Ui, material_id: Uuid) {
        ui.horizontal(|ui| {
            ui.label("Question:");
            ui.text_edit_singleline(&mut self.current_question);
        });
        ui.horizontal(|ui| {
            ui.label("Answer:");
            ui.text_edit_singleline(&mut self.current_answer);
        });
        if ui.button("Add Flashcard").clicked()
            && !self.current_question.is_empty()
            && !self.current_answer.is_empty()
        {
            let question = std::mem::take(&mut self.current_question);
            let answer = std::mem::take(&mut self.current_answer);
            match self.service.add_default_flashcard(material_id, question, answer) {
                Ok(_) => {
                    self.refresh();
                    self.refresh_selected_cards();
                }
                Err(e) => self.report_error("Failed to add flashcard", e),
            }
        }

        ui.heading(format!("Flashcards ({})", self.selected_cards.len()));

        let mut action_delete: Option<Uuid> = None;
        egui::ScrollArea::vertical()
            .id_salt("flashcards_list")
            .max_height(200.0)
            .show(ui, |ui| {
                for (i, card) in self.selected_cards.iter().enumerate() {
                    ui.group(|ui| {
                        ui.label(format!("{}. Q: {}", i + 1, card.question));
                        ui.label(format!("   A: {}", card.answer));
                        ui.horizontal(|ui| {
                            ui.label(format!(
                                "   Next review: {} (every {} days)",
                                format_date(card.next_review_date),
                                card.interval_days
                            ));
                            if ui.small_button("Delete").clicked() {
                                action_delete = Some(card.id);
                            }
                        });
                    });
                }
            });

        if let Some(id) = action_delete {
            match self.service.delete_flashcard(id) {
                Ok(()) => {
                    self.refresh();
                    self.refresh_selected_cards();
                }
                Err(e) => self.report_error("Failed to delete flashcard", e),
            }
        }
    }

    fn render_session_history(&mut self, ui: &mut egui::Ui) {
        ui.heading(format!("Review Sessions ({})", self.sessions.len()));
        let mut action_delete: Option<Uuid> = None;
        egui::ScrollArea::vertical()
            .id_salt("sessions_list")
            .max_height(120.0)
            .show(ui, |ui| {
                for session in self.sessions.iter().rev() {
                    let name = self
                        .materials
                        .iter()
                        .find(|row| row.material.id == session.material_id)
                        .map(|row| row.material.name.as_str())
                        .unwrap_or("(deleted material)");
                    ui.horizontal(|ui| {
                        ui.label(format!(
                            "{}  {}: {}/{} cards in {}m {}s",
                            format_date(session.date),
                            name,
                            session.cards_completed,
                            session.total_cards,
                            session.duration / 60,
                            session.duration % 60
                        ));
                        if ui.small_button("x").clicked() {
                            action_delete = Some(session.id);
                        }
                    });
                }
            });

        if let Some(id) = action_delete {
            match self.service.delete_session(id) {
                Ok(()) => self.refresh(),
                Err(e) => self.report_error("Failed to delete session", e),
            }
        }
    }

    /// Renders the learning session screen with flashcard review interface
    fn render_learning_screen(&mut self, ctx: &egui::Context) {
        let mut action_back = false;
        let mut graded: Option<Flashcard> = None;

        egui::CentralPanel::default().show(ctx, |ui| {
            let Some(session) = &mut self.learning_session else {
                action_back = true;
                return;
            };

            ui.heading(format!("Learning: {}", session.material_name));
            ui.label(session.phase_message());
            ui.label(format!(
                "Progress: {} / {} passed ({} remaining)",
                session.learned_count(),
                session.total_count(),
                session.remaining_count()
            ));

            ui.add_space(20.0);

            if session.is_completed() {
                ui.heading("Congratulations!");
                ui.label("You've completed all due cards for today!");
                ui.add_space(20.0);
                if ui.button("Back to Main Screen").clicked() {
                    action_back = true;
                }
                return;
            }

            let Some(card) = session.current_card() else {
                return;
            };
            // Clone values to avoid borrowing issues
            let show_answer = session.show_answer;
            let is_learned = card.is_learned;
            let question = card.flashcard.question.clone();
            let answer = card.flashcard.answer.clone();

            ui.group(|ui| {
                ui.set_min_height(200.0);
                ui.vertical_centered(|ui| {
                    ui.add_space(20.0);
                    ui.heading("Question:");
                    ui.label(&question);
                    ui.add_space(20.0);
                    if show_answer {
                        ui.heading("Answer:");
                        ui.label(&answer);
                    } else {
                        ui.label("(Click 'Show Answer' to reveal)");
                    }
                    ui.add_space(20.0);
                });
            });

            ui.add_space(20.0);

            let mut action_toggle = false;
            let mut action_grade: Option<i32> = None;

            if !show_answer && ui.button("Show Answer").clicked() {
                action_toggle = true;
            }

            // Quality rating buttons (0-5), only after revealing the answer
            if show_answer && !is_learned {
                ui.label("Rate your recall:");
                ui.horizontal(|ui| {
                    for (score, label) in [(0, "0 - Blackout"), (1, "1 - Wrong"), (2, "2 - Wrong (familiar)")] {
                        if ui.button(label).clicked() {
                            action_grade = Some(score);
                        }
                    }
                });
                ui.horizontal(|ui| {
                    for (score, label) in [(3, "3 - Difficult"), (4, "4 - Hesitated"), (5, "5 - Perfect")] {
                        if ui.button(label).clicked() {
                            action_grade = Some(score);
                        }
                    }
                });
            }

            ui.add_space(20.0);

            if ui.button("Back to Main Screen").clicked() {
                action_back = true;
            }

            if action_toggle {
                session.toggle_answer();
            }
            if let Some(value) = action_grade {
                if let Ok(score) = Score::new(value) {
                    graded = session.grade_current_card(score, Utc::now());
                    session.next_card();
                }
            }
        });

        if let Some(card) = graded {
            if let Err(e) = self.service.store_reviewed(&[card]) {
                self.report_error("Failed to save review", e);
            }
        }
        if action_back {
            self.end_learning_session();
            self.current_screen = AppScreen::Main;
        }
    }

    /// Starts a learning session with the material's cards due today
    fn start_learning_session(&mut self, material_id: Uuid) {
        let Some(row) = self.materials.iter().find(|row| row.material.id == material_id) else {
            return;
        };
        let name = row.material.name.clone();

        match self.service.due_flashcards(Some(material_id)) {
            Ok(due) if due.is_empty() => {
                self.show_message(format!("No cards in '{}' are due today.", name));
            }
            Ok(due) => {
                log::info!("starting session for '{}' with {} due cards", name, due.len());
                self.learning_session = Some(LearningSession::new_from_due_cards(
                    material_id,
                    name,
                    due,
                    Utc::now(),
                ));
                self.current_screen = AppScreen::LearningSession;
            }
            Err(e) => self.report_error("Failed to load due cards", e),
        }
    }

    /// Records the running session, if any, and refreshes the deck view
    fn end_learning_session(&mut self) {
        if let Some(session) = self.learning_session.take() {
            let record = session.finish(Utc::now());
            if let Err(e) = self.service.save_session(record) {
                self.report_error("Failed to record session", e);
            }
            self.refresh();
            self.refresh_selected_cards();
        }
    }

    /// Turns a saved language model response into flashcards for the material
    fn handle_generated_import(&mut self, material_id: Uuid) {
        let Some(path) = rfd::FileDialog::new()
            .add_filter("Model output", &["json", "txt"])
            .pick_file()
        else {
            return;
        };

        let result = ModelOutputGenerator::from_file(&path).map_err(study_hub::Error::from).and_then(|generator| {
            let content = self.service.material(material_id)?.content;
            self.service
                .generate_flashcards(&generator, material_id, &content, self.config.flashcard_count)
        });

        match result {
            Ok(cards) => {
                self.show_message(format!("Added {} flashcards.", cards.len()));
                self.refresh();
                self.refresh_selected_cards();
            }
            Err(e) => self.report_error("Failed to generate flashcards", e),
        }
    }

    /// Handles deck export to JSON file
    fn handle_export(&mut self, material_id: Uuid) {
        let name = self
            .materials
            .iter()
            .find(|row| row.material.id == material_id)
            .map(|row| row.material.name.clone())
            .unwrap_or_else(|| "deck".to_string());

        let Some(path) = rfd::FileDialog::new()
            .set_file_name(format!("{}.json", name))
            .add_filter("JSON files", &["json"])
            .save_file()
        else {
            return;
        };

        let result = self
            .service
            .export_deck(material_id)
            .and_then(|deck| export_json_to_path(&deck, &path).map_err(Into::into));
        match result {
            Ok(()) => self.show_message(format!("Deck '{}' exported successfully!", name)),
            Err(e) => self.report_error("Export failed", e),
        }
    }

    /// Handles deck import from JSON file into the selected material
    fn handle_deck_import(&mut self, material_id: Uuid) {
        let Some(path) = rfd::FileDialog::new()
            .add_filter("JSON files", &["json"])
            .pick_file()
        else {
            return;
        };

        let result = import_json(&path)
            .map_err(study_hub::Error::from)
            .and_then(|deck| self.service.import_deck(&deck, material_id));
        match result {
            Ok(cards) => {
                self.show_message(format!("Deck imported successfully with {} cards!", cards.len()));
                self.refresh();
                self.refresh_selected_cards();
            }
            Err(e) => self.show_message(format!(
                "Import failed: {}\n\nPlease check if the file has correct structure:\n{{\n  \"materialId\": \"...\",\n  \"flashcards\": [...]\n}}",
                e
            )),
        }
    }

    fn handle_delete_material(&mut self, material_id: Uuid) {
        match self.service.delete_material(material_id) {
            Ok(()) => {
                if self.selected_material == Some(material_id) {
                    self.selected_material = None;
                }
                self.refresh();
                self.refresh_selected_cards();
            }
            Err(e) => self.report_error("Failed to delete material", e),
        }
    }
}
