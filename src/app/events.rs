// ABOUTME: Event handling system for keyboard input and wizard actions

use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use tracing::debug;

use crate::app::AppState;
use crate::wizard::{WizardPhase, WizardStep};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AppEvent {
    Quit,
    // Text input editing
    InputChar(char),
    PasteText(String),
    Backspace,
    Delete,
    CursorLeft,
    CursorRight,
    CursorHome,
    CursorEnd,
    // Navigation
    Confirm,
    Back,
    SkipFiles,
    ClearFiles,
    /// Show the whole prompt without waiting for the reveal
    FinishReveal,
    StartOver,
}

pub struct EventHandler;

impl EventHandler {
    pub fn handle_key_event(key_event: KeyEvent, state: &AppState) -> Option<AppEvent> {
        // Drop release reports; repeats pass through so held keys keep typing
        if key_event.kind == KeyEventKind::Release {
            return None;
        }

        let ctrl = key_event.modifiers.contains(KeyModifiers::CONTROL);

        // Global shortcuts
        match key_event.code {
            KeyCode::Char('c' | 'q') if ctrl => return Some(AppEvent::Quit),
            _ => {}
        }

        match state.phase() {
            WizardPhase::Succeeded => Self::handle_success_keys(key_event),
            WizardPhase::Step(WizardStep::Review) => Self::handle_review_keys(key_event, state),
            WizardPhase::Step(step) => Self::handle_input_keys(key_event, step, ctrl),
        }
    }

    fn handle_success_keys(key_event: KeyEvent) -> Option<AppEvent> {
        match key_event.code {
            KeyCode::Char('n' | 'N') => Some(AppEvent::StartOver),
            KeyCode::Char('q') | KeyCode::Esc => Some(AppEvent::Quit),
            _ => None,
        }
    }

    fn handle_review_keys(key_event: KeyEvent, state: &AppState) -> Option<AppEvent> {
        // Locked while the submission is running
        if state.controller.state().submission_status.is_in_flight() {
            return None;
        }
        match key_event.code {
            KeyCode::Enter => Some(AppEvent::Confirm),
            KeyCode::Esc | KeyCode::Left => Some(AppEvent::Back),
            KeyCode::Char(' ') => Some(AppEvent::FinishReveal),
            _ => None,
        }
    }

    fn handle_input_keys(key_event: KeyEvent, step: WizardStep, ctrl: bool) -> Option<AppEvent> {
        if ctrl {
            return match key_event.code {
                KeyCode::Char('s') if step == WizardStep::FileAttachment => {
                    Some(AppEvent::SkipFiles)
                }
                KeyCode::Char('x') if step == WizardStep::FileAttachment => {
                    Some(AppEvent::ClearFiles)
                }
                KeyCode::Char('a') => Some(AppEvent::CursorHome),
                KeyCode::Char('e') => Some(AppEvent::CursorEnd),
                _ => None,
            };
        }

        match key_event.code {
            KeyCode::Enter => Some(AppEvent::Confirm),
            KeyCode::Esc => Some(AppEvent::Back),
            KeyCode::Tab => Some(AppEvent::FinishReveal),
            KeyCode::Backspace => Some(AppEvent::Backspace),
            KeyCode::Delete => Some(AppEvent::Delete),
            KeyCode::Left => Some(AppEvent::CursorLeft),
            KeyCode::Right => Some(AppEvent::CursorRight),
            KeyCode::Home => Some(AppEvent::CursorHome),
            KeyCode::End => Some(AppEvent::CursorEnd),
            KeyCode::Char(c) => Some(AppEvent::InputChar(c)),
            _ => None,
        }
    }

    pub fn process_event(event: AppEvent, state: &mut AppState) {
        debug!("Processing event {:?}", event);

        match event {
            AppEvent::Quit => state.should_quit = true,
            AppEvent::InputChar(c) => {
                if let Some(input) = state.active_input_mut() {
                    input.insert_char(c);
                }
            }
            AppEvent::PasteText(text) => {
                if let Some(input) = state.active_input_mut() {
                    input.insert_str(&text);
                }
            }
            AppEvent::Backspace => {
                if let Some(input) = state.active_input_mut() {
                    input.backspace();
                }
            }
            AppEvent::Delete => {
                if let Some(input) = state.active_input_mut() {
                    input.delete();
                }
            }
            AppEvent::CursorLeft => {
                if let Some(input) = state.active_input_mut() {
                    input.cursor_left();
                }
            }
            AppEvent::CursorRight => {
                if let Some(input) = state.active_input_mut() {
                    input.cursor_right();
                }
            }
            AppEvent::CursorHome => {
                if let Some(input) = state.active_input_mut() {
                    input.cursor_home();
                }
            }
            AppEvent::CursorEnd => {
                if let Some(input) = state.active_input_mut() {
                    input.cursor_end();
                }
            }
            AppEvent::Confirm => state.confirm_step(),
            AppEvent::Back => state.go_back(),
            AppEvent::SkipFiles => state.skip_files(),
            AppEvent::ClearFiles => state.clear_files(),
            AppEvent::FinishReveal => state.reveal.finish(),
            AppEvent::StartOver => state.start_over(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::AppConfig;

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    fn ctrl(c: char) -> KeyEvent {
        KeyEvent::new(KeyCode::Char(c), KeyModifiers::CONTROL)
    }

    fn quiet_state() -> AppState {
        let mut config = AppConfig::default();
        config.reveal.enabled = false;
        AppState::new(&config)
    }

    #[test]
    fn test_ctrl_c_quits_everywhere() {
        let state = quiet_state();
        assert_eq!(
            EventHandler::handle_key_event(ctrl('c'), &state),
            Some(AppEvent::Quit)
        );
    }

    #[test]
    fn test_release_reports_are_dropped_and_repeats_kept() {
        let state = quiet_state();
        let release =
            KeyEvent::new_with_kind(KeyCode::Char('x'), KeyModifiers::NONE, KeyEventKind::Release);
        assert_eq!(EventHandler::handle_key_event(release, &state), None);

        let repeat =
            KeyEvent::new_with_kind(KeyCode::Backspace, KeyModifiers::NONE, KeyEventKind::Repeat);
        assert_eq!(
            EventHandler::handle_key_event(repeat, &state),
            Some(AppEvent::Backspace)
        );
    }

    #[test]
    fn test_typing_maps_to_input() {
        let state = quiet_state();
        assert_eq!(
            EventHandler::handle_key_event(key(KeyCode::Char('q')), &state),
            Some(AppEvent::InputChar('q'))
        );
        assert_eq!(
            EventHandler::handle_key_event(key(KeyCode::Enter), &state),
            Some(AppEvent::Confirm)
        );
    }

    #[test]
    fn test_skip_only_on_file_step() {
        let mut state = quiet_state();
        assert_eq!(EventHandler::handle_key_event(ctrl('s'), &state), None);

        state.controller.submit_step1("ABC").unwrap();
        state
            .controller
            .submit_step2("a sufficiently long description")
            .unwrap();
        assert_eq!(
            EventHandler::handle_key_event(ctrl('s'), &state),
            Some(AppEvent::SkipFiles)
        );
    }

    #[test]
    fn test_process_input_events() {
        let mut state = quiet_state();
        for c in "ABD".chars() {
            EventHandler::process_event(AppEvent::InputChar(c), &mut state);
        }
        EventHandler::process_event(AppEvent::Backspace, &mut state);
        EventHandler::process_event(AppEvent::InputChar('C'), &mut state);
        assert_eq!(state.inputs.project_name.value(), "ABC");

        EventHandler::process_event(AppEvent::Confirm, &mut state);
        assert_eq!(state.current_step(), WizardStep::AnalysisDescription);
        assert!(state.inputs.analysis_description.is_empty());
    }

    #[test]
    fn test_back_keeps_typed_text() {
        let mut state = quiet_state();
        state.inputs.project_name.set("ABC");
        EventHandler::process_event(AppEvent::Confirm, &mut state);
        state.inputs.analysis_description.set("half typed");

        EventHandler::process_event(AppEvent::Back, &mut state);
        assert_eq!(state.current_step(), WizardStep::ProjectName);
        assert_eq!(state.inputs.project_name.value(), "ABC");
        assert_eq!(state.inputs.analysis_description.value(), "half typed");
    }
}
