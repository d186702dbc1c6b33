use rand::rngs::SmallRng;
use rand::{RngCore, SeedableRng};

use citedr::config::Config;
use citedr::content::{Catalog, DEFAULT_RANKS, QuestionKind};
use citedr::session::{Advance, LevelResult, LevelSession, Response};
use citedr::store::{JsonStore, ProgressTracker, Recorded, SaveStatus};

use crate::ui::components::question_view::{BuildFocus, QuestionCursor};
use crate::ui::theme::Theme;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AppScreen {
    Welcome,
    LevelSelect,
    Question,
    LevelComplete,
}

pub struct App {
    pub screen: AppScreen,
    pub catalog: Catalog,
    pub tracker: ProgressTracker<JsonStore>,
    pub session: Option<LevelSession>,
    pub last_result: Option<LevelResult>,
    pub last_recorded: Option<Recorded>,
    pub level_selected: usize,
    pub cursor: QuestionCursor,
    /// One-line feedback for rejected actions and storage problems.
    pub status: Option<String>,
    pub theme: &'static Theme,
    pub config: Config,
    pub should_quit: bool,
    rng: SmallRng,
}

impl App {
    pub fn new(config: Config, catalog: Catalog, theme: &'static Theme) -> Self {
        let store = JsonStore::new(&config.data_dir);
        let tracker = ProgressTracker::load(store, &catalog, DEFAULT_RANKS);
        let level_selected = tracker.progress().frontier_index();

        Self {
            screen: AppScreen::Welcome,
            catalog,
            tracker,
            session: None,
            last_result: None,
            last_recorded: None,
            level_selected,
            cursor: QuestionCursor::default(),
            status: None,
            theme,
            config,
            should_quit: false,
            rng: SmallRng::from_entropy(),
        }
    }

    pub fn go_to_levels(&mut self) {
        self.screen = AppScreen::LevelSelect;
        self.status = None;
    }

    // --- Level select ---

    pub fn select_prev_level(&mut self) {
        self.level_selected = self.level_selected.saturating_sub(1);
    }

    pub fn select_next_level(&mut self) {
        if self.level_selected < self.catalog.last_index() {
            self.level_selected += 1;
        }
    }

    fn session_rng(&mut self) -> Option<SmallRng> {
        self.config
            .shuffle_segments
            .then(|| SmallRng::seed_from_u64(self.rng.next_u64()))
    }

    pub fn start_level(&mut self, index: usize) {
        if !self.tracker.progress().is_selectable(index) {
            self.status = Some("That level is still locked.".to_string());
            return;
        }
        let Some(level) = self.catalog.get(index).cloned() else {
            return;
        };
        let rng = self.session_rng();
        match LevelSession::start(level, rng) {
            Ok(session) => {
                self.session = Some(session);
                self.level_selected = index;
                self.cursor = QuestionCursor::default();
                self.status = None;
                self.screen = AppScreen::Question;
            }
            Err(e) => self.status = Some(e.to_string()),
        }
    }

    /// Leave the current level. Nothing is recorded.
    pub fn exit_level(&mut self) {
        if let Some(session) = self.session.take() {
            session.exit();
        }
        self.go_to_levels();
    }

    // --- Question interaction ---

    fn item_count(&self) -> usize {
        let Some(response) = self.session.as_ref().and_then(|s| s.response()) else {
            return 0;
        };
        match response {
            Response::Choice(_) => self
                .session
                .as_ref()
                .and_then(|s| s.question())
                .map(|q| match &q.kind {
                    QuestionKind::MultipleChoice(choice) => choice.options.len(),
                    _ => 0,
                })
                .unwrap_or(0),
            Response::Build(resp) => match self.cursor.focus {
                BuildFocus::Pool => resp.available().len(),
                BuildFocus::Built => resp.built().len(),
            },
            Response::Simulation(resp) => resp.editable_tokens().count(),
        }
    }

    fn open_option_count(&self) -> Option<usize> {
        match self.session.as_ref()?.response()? {
            Response::Simulation(resp) => {
                let id = resp.open_token()?;
                resp.token(id).map(|t| t.options.len())
            }
            _ => None,
        }
    }

    fn clamp_cursor(&mut self) {
        let count = self.item_count();
        self.cursor.item = self.cursor.item.min(count.saturating_sub(1));
    }

    pub fn move_cursor(&mut self, forward: bool) {
        if let Some(count) = self.open_option_count() {
            self.cursor.option = step(self.cursor.option, count, forward);
            return;
        }
        let count = self.item_count();
        self.cursor.item = step(self.cursor.item, count, forward);
    }

    /// Switch between the segment pool and the built citation.
    pub fn toggle_build_focus(&mut self) {
        let is_build = matches!(
            self.session.as_ref().and_then(|s| s.response()),
            Some(Response::Build(_))
        );
        if !is_build {
            return;
        }
        self.cursor.focus = match self.cursor.focus {
            BuildFocus::Pool => BuildFocus::Built,
            BuildFocus::Built => BuildFocus::Pool,
        };
        self.cursor.item = 0;
    }

    /// Space: select the option, move the segment, or open/choose on a token.
    pub fn activate(&mut self) {
        let cursor = self.cursor;
        let Some(session) = self.session.as_mut() else {
            return;
        };
        if !session.is_active() {
            return;
        }

        let result = match session.response() {
            Some(Response::Choice(_)) => session.select_option(cursor.item),
            Some(Response::Build(resp)) => match cursor.focus {
                BuildFocus::Pool => match resp.available().get(cursor.item) {
                    Some(segment) => {
                        let id = segment.id;
                        session.place_segment(id)
                    }
                    None => Ok(()),
                },
                BuildFocus::Built => session.unplace_segment(cursor.item).map(|_| ()),
            },
            Some(Response::Simulation(resp)) => {
                let token = resp.editable_tokens().nth(cursor.item).map(|t| {
                    let option = t.options.get(cursor.option).cloned();
                    (t.id.clone(), option)
                });
                let open = resp.open_token().map(str::to_string);
                match token {
                    Some((id, Some(option))) if open.as_deref() == Some(id.as_str()) => {
                        session.choose_token_option(&id, &option)
                    }
                    Some((id, _)) => {
                        self.cursor.option = 0;
                        session.toggle_selector(&id)
                    }
                    None => Ok(()),
                }
            }
            None => Ok(()),
        };

        self.status = result.err().map(|e| e.to_string());
        self.clamp_cursor();
    }

    /// Esc inside a question: close an open selector first, otherwise leave.
    pub fn cancel(&mut self) {
        if self.open_option_count().is_some()
            && let Some(session) = self.session.as_mut()
            && session.is_active()
        {
            self.status = session.close_selector().err().map(|e| e.to_string());
            return;
        }
        self.exit_level();
    }

    /// Enter: submit an active question or move past an answered one.
    pub fn confirm(&mut self) {
        let Some(session) = self.session.as_mut() else {
            return;
        };
        if session.is_active() {
            self.status = session.submit().err().map(|e| e.to_string());
            return;
        }
        match session.advance() {
            Ok(Advance::Next(_)) => {
                self.cursor = QuestionCursor::default();
                self.status = None;
            }
            Ok(Advance::Complete(result)) => self.finish_level(result),
            Err(e) => self.status = Some(e.to_string()),
        }
    }

    fn finish_level(&mut self, result: LevelResult) {
        self.session = None;
        match self
            .tracker
            .record_completion(&self.catalog, &result.level_id, result.points)
        {
            Ok(recorded) => {
                self.status = match &recorded.saved {
                    SaveStatus::Saved => None,
                    SaveStatus::Failed(reason) => Some(format!("Progress not saved: {reason}")),
                };
                self.last_recorded = Some(recorded);
            }
            Err(e) => {
                tracing::error!(error = %e, "completion rejected");
                self.status = Some(e.to_string());
                self.last_recorded = None;
            }
        }
        self.level_selected = self.tracker.progress().frontier_index();
        self.last_result = Some(result);
        self.screen = AppScreen::LevelComplete;
    }

    // --- Level complete ---

    /// Index of the level after the one just finished, if it may be entered.
    pub fn next_level_index(&self) -> Option<usize> {
        let result = self.last_result.as_ref()?;
        let next = self.catalog.level_position(&result.level_id)? + 1;
        (next < self.catalog.len() && self.tracker.progress().is_selectable(next)).then_some(next)
    }

    pub fn start_next_level(&mut self) {
        if let Some(next) = self.next_level_index() {
            self.start_level(next);
        }
    }

    pub fn replay_level(&mut self) {
        let index = self
            .last_result
            .as_ref()
            .and_then(|r| self.catalog.level_position(&r.level_id));
        if let Some(index) = index {
            self.start_level(index);
        }
    }
}

fn step(current: usize, count: usize, forward: bool) -> usize {
    if count == 0 {
        return 0;
    }
    if forward {
        (current + 1) % count
    } else if current == 0 {
        count - 1
    } else {
        current - 1
    }
}
