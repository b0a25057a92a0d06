use crate::application::{App, AppMode, Phase};
use crossterm::event::{KeyCode, KeyModifiers};

pub struct InputHandler;

impl InputHandler {
    pub fn handle_key_event(app: &mut App, key: KeyCode, modifiers: KeyModifiers) {
        if modifiers.contains(KeyModifiers::CONTROL)
            && matches!(key, KeyCode::Char('c') | KeyCode::Char('q'))
        {
            app.quit();
            return;
        }

        match app.mode {
            AppMode::Help => Self::handle_help_mode(app, key),
            AppMode::Form => match app.form.phase() {
                Phase::Step(_) => Self::handle_step_mode(app, key, modifiers),
                Phase::Submitting => {}
                Phase::Complete => Self::handle_complete_mode(app, key),
            },
        }
    }

    pub fn handle_paste(app: &mut App, text: &str) {
        if matches!(app.mode, AppMode::Form) && matches!(app.form.phase(), Phase::Step(_)) {
            app.paste(text);
        }
    }

    fn handle_step_mode(app: &mut App, key: KeyCode, modifiers: KeyModifiers) {
        if modifiers.contains(KeyModifiers::CONTROL) {
            if let KeyCode::Char('r') = key {
                app.toggle_password_visibility();
            }
            return;
        }

        match key {
            KeyCode::Enter => app.continue_step(),
            KeyCode::Esc => app.go_back(),
            KeyCode::Tab | KeyCode::Down => app.focus_next(),
            KeyCode::BackTab | KeyCode::Up => app.focus_previous(),
            KeyCode::Left => app.move_cursor_left(),
            KeyCode::Right => app.move_cursor_right(),
            KeyCode::Home => app.move_cursor_home(),
            KeyCode::End => app.move_cursor_end(),
            KeyCode::Backspace => app.backspace(),
            KeyCode::Delete => app.delete(),
            KeyCode::F(1) => app.open_help(),
            KeyCode::Char(c) => app.insert_char(c),
            _ => {}
        }
    }

    fn handle_complete_mode(app: &mut App, key: KeyCode) {
        match key {
            KeyCode::Enter => app.restart(),
            KeyCode::Char('q') | KeyCode::Esc => app.quit(),
            KeyCode::F(1) | KeyCode::Char('?') => app.open_help(),
            _ => {}
        }
    }

    fn handle_help_mode(app: &mut App, key: KeyCode) {
        match key {
            KeyCode::Esc | KeyCode::F(1) | KeyCode::Char('?') | KeyCode::Char('q') => {
                app.close_help();
            }
            KeyCode::Up | KeyCode::Char('k') => {
                if app.help_scroll > 0 {
                    app.help_scroll -= 1;
                }
            }
            KeyCode::Down | KeyCode::Char('j') => {
                app.help_scroll += 1;
            }
            KeyCode::PageUp => {
                app.help_scroll = app.help_scroll.saturating_sub(5);
            }
            KeyCode::PageDown => {
                app.help_scroll += 5;
            }
            KeyCode::Home => {
                app.help_scroll = 0;
            }
            _ => {}
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{Field, StepId};
    use crate::infrastructure::SimulatedAccountService;
    use std::sync::Arc;
    use std::time::Duration;

    fn instant_app() -> App {
        App::new(Arc::new(SimulatedAccountService::new(Duration::ZERO)), "TrackiFi")
    }

    fn press(app: &mut App, key: KeyCode) {
        InputHandler::handle_key_event(app, key, KeyModifiers::NONE);
    }

    fn type_text(app: &mut App, text: &str) {
        for c in text.chars() {
            press(app, KeyCode::Char(c));
        }
    }

    #[test]
    fn test_typing_q_is_text_not_quit() {
        let mut app = instant_app();
        type_text(&mut app, "Quinn q");
        assert_eq!(app.form.data().first_name, "Quinn q");
        assert!(!app.should_quit);
    }

    #[test]
    fn test_ctrl_q_and_ctrl_c_quit() {
        let mut app = instant_app();
        InputHandler::handle_key_event(&mut app, KeyCode::Char('q'), KeyModifiers::CONTROL);
        assert!(app.should_quit);

        let mut app = instant_app();
        app.open_help();
        InputHandler::handle_key_event(&mut app, KeyCode::Char('c'), KeyModifiers::CONTROL);
        assert!(app.should_quit);
    }

    #[test]
    fn test_navigation_keys() {
        let mut app = instant_app();
        press(&mut app, KeyCode::Tab);
        assert_eq!(app.focused_field(), Field::LastName);
        press(&mut app, KeyCode::Up);
        press(&mut app, KeyCode::BackTab);
        assert_eq!(app.focused_field(), Field::ContactNumber);
        press(&mut app, KeyCode::Down);
        assert_eq!(app.focused_field(), Field::FirstName);
    }

    #[test]
    fn test_enter_validates_and_esc_goes_back() {
        let mut app = instant_app();
        press(&mut app, KeyCode::Enter);
        assert!(app.form.errors().contains(Field::FirstName));

        app.form.update_fields([
            (Field::FirstName, "Ada"),
            (Field::LastName, "Lovelace"),
            (Field::Email, "ada@example.com"),
            (Field::Password, "analytical"),
        ]);
        press(&mut app, KeyCode::Enter);
        assert_eq!(app.form.current_step(), StepId::Income);

        press(&mut app, KeyCode::Esc);
        assert_eq!(app.form.current_step(), StepId::Credentials);
        press(&mut app, KeyCode::Esc);
        assert_eq!(app.form.current_step(), StepId::Credentials);
    }

    #[test]
    fn test_ctrl_r_toggles_password() {
        let mut app = instant_app();
        InputHandler::handle_key_event(&mut app, KeyCode::Char('r'), KeyModifiers::CONTROL);
        assert!(app.show_password);
        assert!(app.form.data().first_name.is_empty());
    }

    #[test]
    fn test_help_mode_keys() {
        let mut app = instant_app();
        press(&mut app, KeyCode::F(1));
        assert_eq!(app.mode, AppMode::Help);

        press(&mut app, KeyCode::Down);
        press(&mut app, KeyCode::PageDown);
        assert_eq!(app.help_scroll, 6);
        press(&mut app, KeyCode::Up);
        assert_eq!(app.help_scroll, 5);
        press(&mut app, KeyCode::PageUp);
        assert_eq!(app.help_scroll, 0);

        // Typed text does not leak into the form while help is open
        press(&mut app, KeyCode::Char('x'));
        assert!(app.form.data().first_name.is_empty());

        press(&mut app, KeyCode::Char('q'));
        assert_eq!(app.mode, AppMode::Form);
        assert!(!app.should_quit);
    }

    #[test]
    fn test_paste_into_amount() {
        let mut app = instant_app();
        app.form.update_fields([
            (Field::FirstName, "Ada"),
            (Field::LastName, "Lovelace"),
            (Field::Email, "ada@example.com"),
            (Field::Password, "analytical"),
        ]);
        press(&mut app, KeyCode::Enter);
        app.form.update_fields([(Field::Occupation, "Engineer"), (Field::IncomeSource, "mixed")]);
        press(&mut app, KeyCode::Enter);
        press(&mut app, KeyCode::Tab);
        assert_eq!(app.focused_field(), Field::TargetAmount);

        InputHandler::handle_paste(&mut app, "$12,500");
        assert_eq!(app.form.data().target_amount, "12500");
    }
}
