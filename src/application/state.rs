//! Application state for the terminal onboarding wizard.
//!
//! [`App`] wraps the [`OnboardingForm`] controller with everything the
//! terminal needs on top of it: which input has focus, the cursor inside it,
//! the help overlay, and the account-creation call running in the
//! background.

use std::sync::mpsc::{self, Receiver, TryRecvError};
use std::sync::Arc;
use std::thread;

use tracing::{error, info};

use crate::application::form::{OnboardingForm, Phase};
use crate::domain::{choices_for, digits_only, Field, SubmissionError, SubmissionResult};
use crate::infrastructure::{AccountReceipt, AccountService, SimulatedAccountService};

/// Longest value accepted by the date inputs (`YYYY-MM-DD`).
const DATE_INPUT_LEN: usize = 10;

/// Represents the current mode of the application.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppMode {
    /// The wizard itself: step pages, submission and completion screen
    Form,
    /// Help screen is displayed
    Help,
}

/// Main application state containing the form controller and UI state.
///
/// # Examples
///
/// ```
/// use trackifi_onboarding::application::App;
/// use trackifi_onboarding::domain::Field;
///
/// let app = App::default();
/// assert_eq!(app.focused_field(), Field::FirstName);
/// assert_eq!(app.cursor_position, 0);
/// ```
pub struct App {
    /// Form controller holding values, errors and the step position
    pub form: OnboardingForm,
    /// Current application mode
    pub mode: AppMode,
    /// Index of the focused input within the current step
    pub focus: usize,
    /// Cursor position within the focused input, in characters
    pub cursor_position: usize,
    /// Whether the password input shows its text
    pub show_password: bool,
    /// Scroll position in help text
    pub help_scroll: usize,
    /// Temporary status message to display
    pub status_message: Option<String>,
    /// Product name used in headings
    pub brand_name: String,
    /// Frame counter driving the submission spinner
    pub tick: usize,
    /// Set when the user asked to leave
    pub should_quit: bool,
    service: Arc<dyn AccountService>,
    pending: Option<Receiver<SubmissionResult<AccountReceipt>>>,
}

impl Default for App {
    fn default() -> Self {
        Self::new(Arc::new(SimulatedAccountService::default()), "TrackiFi")
    }
}

impl App {
    pub fn new(service: Arc<dyn AccountService>, brand_name: impl Into<String>) -> Self {
        Self {
            form: OnboardingForm::new(),
            mode: AppMode::Form,
            focus: 0,
            cursor_position: 0,
            show_password: false,
            help_scroll: 0,
            status_message: None,
            brand_name: brand_name.into(),
            tick: 0,
            should_quit: false,
            service,
            pending: None,
        }
    }

    /// The input that receives typed characters.
    pub fn focused_field(&self) -> Field {
        let fields = self.form.current_step().fields();
        fields[self.focus.min(fields.len() - 1)]
    }

    fn focused_value(&self) -> &str {
        self.form.data().get(self.focused_field())
    }

    fn focused_len(&self) -> usize {
        self.focused_value().chars().count()
    }

    fn focus_index(&mut self, index: usize) {
        self.focus = index;
        self.cursor_position = self.focused_len();
    }

    pub fn focus_next(&mut self) {
        let count = self.form.current_step().fields().len();
        self.focus_index((self.focus + 1) % count);
    }

    pub fn focus_previous(&mut self) {
        let count = self.form.current_step().fields().len();
        self.focus_index((self.focus + count - 1) % count);
    }

    /// Moves focus to the first input on the page that has an error.
    fn focus_first_error(&mut self) {
        let fields = self.form.current_step().fields();
        if let Some(index) = fields.iter().position(|f| self.form.errors().contains(*f)) {
            self.focus_index(index);
        }
    }

    /// Inserts a typed character into the focused input.
    ///
    /// Choice inputs treat a space as "select next option". The amount input
    /// keeps digits only, and date inputs keep digits and dashes.
    pub fn insert_char(&mut self, c: char) {
        let field = self.focused_field();
        if field.is_choice() {
            if c == ' ' {
                self.select_next_choice();
            }
            return;
        }

        let accepted = match field {
            Field::TargetAmount => c.is_ascii_digit(),
            Field::StartDate | Field::EndDate => {
                (c.is_ascii_digit() || c == '-') && self.focused_len() < DATE_INPUT_LEN
            }
            _ => !c.is_control(),
        };
        if !accepted {
            return;
        }

        let mut value = self.focused_value().to_string();
        let at = byte_index(&value, self.cursor_position);
        value.insert(at, c);
        self.set_focused_value(value);
        self.cursor_position += 1;
    }

    pub fn backspace(&mut self) {
        if self.focused_field().is_choice() || self.cursor_position == 0 {
            return;
        }
        let mut value = self.focused_value().to_string();
        let at = byte_index(&value, self.cursor_position - 1);
        value.remove(at);
        self.set_focused_value(value);
        self.cursor_position -= 1;
    }

    pub fn delete(&mut self) {
        if self.focused_field().is_choice() || self.cursor_position >= self.focused_len() {
            return;
        }
        let mut value = self.focused_value().to_string();
        let at = byte_index(&value, self.cursor_position);
        value.remove(at);
        self.set_focused_value(value);
    }

    /// Inserts pasted text at the cursor, filtered the same way as typing.
    pub fn paste(&mut self, text: &str) {
        let field = self.focused_field();
        if field.is_choice() {
            return;
        }
        let cleaned: String = match field {
            Field::TargetAmount => digits_only(text),
            _ => text.chars().filter(|c| !c.is_control()).collect(),
        };
        for c in cleaned.chars() {
            self.insert_char(c);
        }
    }

    /// The amount input is shown with separators, so its cursor stays at
    /// the end of the value.
    fn cursor_pinned(&self) -> bool {
        self.focused_field() == Field::TargetAmount
    }

    pub fn move_cursor_left(&mut self) {
        if self.focused_field().is_choice() {
            self.select_previous_choice();
        } else if !self.cursor_pinned() && self.cursor_position > 0 {
            self.cursor_position -= 1;
        }
    }

    pub fn move_cursor_right(&mut self) {
        if self.focused_field().is_choice() {
            self.select_next_choice();
        } else if !self.cursor_pinned() && self.cursor_position < self.focused_len() {
            self.cursor_position += 1;
        }
    }

    pub fn move_cursor_home(&mut self) {
        if !self.cursor_pinned() {
            self.cursor_position = 0;
        }
    }

    pub fn move_cursor_end(&mut self) {
        self.cursor_position = self.focused_len();
    }

    pub fn select_next_choice(&mut self) {
        self.cycle_choice(true);
    }

    pub fn select_previous_choice(&mut self) {
        self.cycle_choice(false);
    }

    fn cycle_choice(&mut self, forward: bool) {
        let field = self.focused_field();
        let choices = choices_for(field);
        if choices.is_empty() {
            return;
        }
        let current = choices.iter().position(|c| c.id == self.focused_value());
        let next = match (current, forward) {
            (None, true) => 0,
            (None, false) => choices.len() - 1,
            (Some(i), true) => (i + 1) % choices.len(),
            (Some(i), false) => (i + choices.len() - 1) % choices.len(),
        };
        self.set_focused_value(choices[next].id.to_string());
    }

    fn set_focused_value(&mut self, value: String) {
        let field = self.focused_field();
        self.form.update_fields([(field, value)]);
    }

    pub fn toggle_password_visibility(&mut self) {
        self.show_password = !self.show_password;
    }

    /// The "Continue" / "Complete Setup" action.
    pub fn continue_step(&mut self) {
        self.status_message = None;
        match self.form.phase() {
            Phase::Step(step) if step.is_last() => self.start_submission(),
            Phase::Step(_) => {
                if self.form.advance() {
                    self.focus_index(0);
                } else {
                    self.focus_first_error();
                }
            }
            Phase::Submitting | Phase::Complete => {}
        }
    }

    /// The "Back" action.
    pub fn go_back(&mut self) {
        let before = self.form.current_step();
        self.form.retreat();
        if self.form.current_step() != before {
            self.status_message = None;
            self.focus_index(0);
        }
    }

    /// Starts the account-creation call on a worker thread.
    pub fn start_submission(&mut self) {
        if self.pending.is_some() {
            return;
        }
        let Some(request) = self.form.begin_submission() else {
            self.focus_first_error();
            return;
        };

        let (tx, rx) = mpsc::channel();
        let service = Arc::clone(&self.service);
        thread::spawn(move || {
            let result = service.create_account(&request);
            // The receiver only goes away when the app is shutting down
            let _ = tx.send(result);
        });
        self.pending = Some(rx);
    }

    /// Whether an account-creation call is still running.
    pub fn has_pending_submission(&self) -> bool {
        self.pending.is_some()
    }

    /// Applies the account service's answer if it has arrived.
    pub fn poll_submission(&mut self) {
        let Some(rx) = self.pending.as_ref() else {
            return;
        };
        let result = match rx.try_recv() {
            Ok(result) => result,
            Err(TryRecvError::Empty) => return,
            Err(TryRecvError::Disconnected) => {
                error!("submission worker exited without a result");
                Err(SubmissionError::Unavailable(
                    "the request was interrupted".to_string(),
                ))
            }
        };
        self.pending = None;
        self.form.finish_submission(result);
        if let Some(receipt) = self.form.receipt() {
            info!(email = %receipt.email, "welcome screen shown");
            self.status_message = Some(format!(
                "Welcome to {}! Your account has been created successfully.",
                self.brand_name
            ));
        }
    }

    /// Advances the spinner and checks on the background submission.
    pub fn on_tick(&mut self) {
        self.tick = self.tick.wrapping_add(1);
        self.poll_submission();
    }

    /// "Go to Dashboard" on the completion screen: starts over.
    pub fn restart(&mut self) {
        self.form.reset();
        self.focus = 0;
        self.cursor_position = 0;
        self.show_password = false;
        self.status_message = None;
    }

    pub fn open_help(&mut self) {
        self.mode = AppMode::Help;
        self.help_scroll = 0;
    }

    pub fn close_help(&mut self) {
        self.mode = AppMode::Form;
    }

    pub fn quit(&mut self) {
        self.should_quit = true;
    }
}

/// Byte offset of the `char_index`-th character, or the end of `s`.
fn byte_index(s: &str, char_index: usize) -> usize {
    s.char_indices()
        .nth(char_index)
        .map(|(i, _)| i)
        .unwrap_or(s.len())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::StepId;
    use std::time::{Duration, Instant};

    struct OfflineService;

    impl AccountService for OfflineService {
        fn create_account(
            &self,
            _request: &crate::infrastructure::AccountRequest,
        ) -> SubmissionResult<AccountReceipt> {
            Err(SubmissionError::Unavailable("no network".to_string()))
        }
    }

    fn instant_app() -> App {
        App::new(Arc::new(SimulatedAccountService::new(Duration::ZERO)), "TrackiFi")
    }

    fn type_text(app: &mut App, text: &str) {
        for c in text.chars() {
            app.insert_char(c);
        }
    }

    fn wait_for_submission(app: &mut App) {
        let deadline = Instant::now() + Duration::from_secs(5);
        while app.has_pending_submission() && Instant::now() < deadline {
            app.on_tick();
            thread::sleep(Duration::from_millis(5));
        }
    }

    fn fill_to_goals(app: &mut App) {
        type_text(app, "Ada");
        app.focus_next();
        type_text(app, "Lovelace");
        app.focus_next();
        type_text(app, "ada@example.com");
        app.focus_next();
        type_text(app, "analytical");
        app.continue_step();
        assert_eq!(app.form.current_step(), StepId::Income);

        type_text(app, "Engineer");
        app.focus_next();
        app.select_next_choice();
        app.continue_step();
        assert_eq!(app.form.current_step(), StepId::Goals);

        app.select_next_choice();
        app.focus_next();
        type_text(app, "10000");
        app.focus_next();
        type_text(app, "2025-06-01");
        app.focus_next();
        type_text(app, "2026-01-01");
    }

    #[test]
    fn test_app_default() {
        let app = App::default();
        assert_eq!(app.mode, AppMode::Form);
        assert_eq!(app.focus, 0);
        assert_eq!(app.cursor_position, 0);
        assert!(!app.show_password);
        assert!(app.status_message.is_none());
        assert!(!app.should_quit);
        assert_eq!(app.brand_name, "TrackiFi");
        assert!(!app.has_pending_submission());
    }

    #[test]
    fn test_typing_updates_focused_field() {
        let mut app = instant_app();
        type_text(&mut app, "Ada");
        assert_eq!(app.form.data().first_name, "Ada");
        assert_eq!(app.cursor_position, 3);

        app.move_cursor_left();
        app.insert_char('l');
        assert_eq!(app.form.data().first_name, "Adla");

        app.backspace();
        assert_eq!(app.form.data().first_name, "Ada");
        app.move_cursor_home();
        app.delete();
        assert_eq!(app.form.data().first_name, "da");
        assert_eq!(app.cursor_position, 0);
    }

    #[test]
    fn test_editing_multibyte_text() {
        let mut app = instant_app();
        type_text(&mut app, "Zoë");
        app.backspace();
        assert_eq!(app.form.data().first_name, "Zo");
        app.move_cursor_home();
        app.insert_char('É');
        assert_eq!(app.form.data().first_name, "ÉZo");
    }

    #[test]
    fn test_focus_wraps() {
        let mut app = instant_app();
        app.focus_previous();
        assert_eq!(app.focused_field(), Field::ContactNumber);
        app.focus_next();
        assert_eq!(app.focused_field(), Field::FirstName);
    }

    #[test]
    fn test_failed_continue_focuses_first_error() {
        let mut app = instant_app();
        type_text(&mut app, "Ada");
        app.focus_next();
        type_text(&mut app, "Lovelace");
        app.focus_next();
        app.focus_next();
        app.focus_next();

        app.continue_step();
        assert_eq!(app.form.current_step(), StepId::Credentials);
        assert_eq!(app.focused_field(), Field::Email);
    }

    #[test]
    fn test_typing_clears_field_error() {
        let mut app = instant_app();
        app.continue_step();
        assert!(app.form.errors().contains(Field::FirstName));
        type_text(&mut app, "A");
        assert!(!app.form.errors().contains(Field::FirstName));
        assert!(app.form.errors().contains(Field::LastName));
    }

    #[test]
    fn test_choice_cycling() {
        let mut app = instant_app();
        app.form.update_fields([
            (Field::FirstName, "Ada"),
            (Field::LastName, "Lovelace"),
            (Field::Email, "ada@example.com"),
            (Field::Password, "analytical"),
        ]);
        app.continue_step();
        app.focus_next();
        assert_eq!(app.focused_field(), Field::IncomeSource);

        app.select_previous_choice();
        assert_eq!(app.form.data().income_source, "mixed");
        app.move_cursor_right();
        assert_eq!(app.form.data().income_source, "employment");
        app.insert_char(' ');
        assert_eq!(app.form.data().income_source, "freelance");
        app.insert_char('x');
        app.backspace();
        assert_eq!(app.form.data().income_source, "freelance");
    }

    #[test]
    fn test_amount_and_date_inputs_filter_characters() {
        let mut app = instant_app();
        fill_to_goals(&mut app);

        app.focus_index(1);
        assert_eq!(app.focused_field(), Field::TargetAmount);
        app.insert_char(',');
        app.insert_char('5');
        assert_eq!(app.form.data().target_amount, "100005");
        app.paste("$1,000");
        assert_eq!(app.form.data().target_amount, "1000051000");

        app.focus_index(2);
        app.insert_char('x');
        app.insert_char('1');
        assert_eq!(app.form.data().start_date, "2025-06-01");
    }

    #[test]
    fn test_amount_cursor_stays_at_end() {
        let mut app = instant_app();
        fill_to_goals(&mut app);
        app.focus_index(1);
        assert_eq!(app.cursor_position, 5);

        app.move_cursor_home();
        app.move_cursor_left();
        app.move_cursor_right();
        assert_eq!(app.cursor_position, 5);

        app.insert_char('9');
        assert_eq!(app.form.data().target_amount, "100009");
        app.backspace();
        assert_eq!(app.form.data().target_amount, "10000");
    }

    #[test]
    fn test_paste_inserts_at_cursor() {
        let mut app = instant_app();
        type_text(&mut app, "Ada");
        app.move_cursor_home();
        app.paste("Lady\n");
        assert_eq!(app.form.data().first_name, "LadyAda");
        assert_eq!(app.cursor_position, 4);
    }

    #[test]
    fn test_back_moves_focus_to_top() {
        let mut app = instant_app();
        fill_to_goals(&mut app);
        app.go_back();
        assert_eq!(app.form.current_step(), StepId::Income);
        assert_eq!(app.focus, 0);
        assert_eq!(app.cursor_position, "Engineer".len());
    }

    #[test]
    fn test_background_submission_completes() {
        let mut app = instant_app();
        fill_to_goals(&mut app);

        app.continue_step();
        assert!(app.form.is_submitting());
        assert!(app.has_pending_submission());

        // Second press while in flight is ignored
        app.continue_step();

        wait_for_submission(&mut app);
        assert!(app.form.is_complete());
        assert!(!app.form.is_submitting());
        let receipt = app.form.receipt().unwrap();
        assert_eq!(receipt.goal.target_amount, Some(10000));
        assert_eq!(receipt.goal.goal_type, "savings");
        assert!(app.status_message.as_ref().unwrap().contains("Welcome to TrackiFi"));
    }

    #[test]
    fn test_background_submission_failure() {
        let mut app = App::new(Arc::new(OfflineService), "TrackiFi");
        fill_to_goals(&mut app);

        app.continue_step();
        wait_for_submission(&mut app);

        assert!(!app.form.is_complete());
        assert!(!app.form.is_submitting());
        assert_eq!(app.form.current_step(), StepId::Goals);
        assert_eq!(
            app.form.submission_error(),
            Some("Account service unavailable: no network")
        );
    }

    #[test]
    fn test_restart_after_completion() {
        let mut app = instant_app();
        fill_to_goals(&mut app);
        app.continue_step();
        wait_for_submission(&mut app);
        assert!(app.form.is_complete());

        app.restart();
        assert!(app.form.data().is_empty());
        assert_eq!(app.form.current_step(), StepId::Credentials);
        assert_eq!(app.focus, 0);
        assert!(app.status_message.is_none());
    }

    #[test]
    fn test_help_mode() {
        let mut app = instant_app();
        app.help_scroll = 4;
        app.open_help();
        assert_eq!(app.mode, AppMode::Help);
        assert_eq!(app.help_scroll, 0);
        app.close_help();
        assert_eq!(app.mode, AppMode::Form);
    }

    #[test]
    fn test_byte_index() {
        assert_eq!(byte_index("abc", 1), 1);
        assert_eq!(byte_index("éa", 1), 2);
        assert_eq!(byte_index("abc", 10), 3);
    }
}
