// ABOUTME: Main analysis wizard component
// Renders header progress, the active step, notifications and the navigation footer

use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, Clear, List, ListItem, Paragraph, Wrap},
    Frame,
};

use crate::app::{AppState, TextInput};
use crate::notifications::NotificationType;
use crate::wizard::validation::{MIN_DESCRIPTION_LEN, MIN_PROJECT_NAME_LEN};
use crate::wizard::{state::format_size, FileSizePolicy, SubmissionStatus, WizardPhase, WizardStep};

// Color palette from TUI style guide
const CORNFLOWER_BLUE: Color = Color::Rgb(100, 149, 237);
const GOLD: Color = Color::Rgb(255, 215, 0);
const SELECTION_GREEN: Color = Color::Rgb(100, 200, 100);
const DARK_BG: Color = Color::Rgb(25, 25, 35);
const PANEL_BG: Color = Color::Rgb(30, 30, 40);
const SOFT_WHITE: Color = Color::Rgb(220, 220, 230);
const MUTED_GRAY: Color = Color::Rgb(120, 120, 140);
const SUBDUED_BORDER: Color = Color::Rgb(60, 60, 80);
const ERROR_RED: Color = Color::Rgb(220, 80, 80);
const WARNING_YELLOW: Color = Color::Rgb(220, 180, 80);

const SPINNER: &[&str] = &["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏"];

/// The analysis wizard component
pub struct WizardComponent;

impl WizardComponent {
    pub fn new() -> Self {
        Self
    }

    /// Main render function
    pub fn render(&self, frame: &mut Frame, area: Rect, state: &AppState) {
        frame.render_widget(Clear, area);

        let container = Block::default().style(Style::default().bg(DARK_BG));
        frame.render_widget(container, area);

        // Main layout: header, content, notification, footer
        let layout = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(5), // Header with progress
                Constraint::Min(10),   // Main content
                Constraint::Length(1), // Notification line
                Constraint::Length(3), // Navigation footer
            ])
            .split(area);

        self.render_header(frame, layout[0], state);
        self.render_step_content(frame, layout[1], state);
        self.render_notification(frame, layout[2], state);
        self.render_navigation(frame, layout[3], state);
    }

    fn render_header(&self, frame: &mut Frame, area: Rect, state: &AppState) {
        let block = Block::default()
            .borders(Borders::BOTTOM)
            .border_type(BorderType::Rounded)
            .border_style(Style::default().fg(CORNFLOWER_BLUE))
            .style(Style::default().bg(PANEL_BG));

        let inner = block.inner(area);
        frame.render_widget(block, area);

        let header_layout = Layout::default()
            .direction(Direction::Vertical)
            .margin(1)
            .constraints([Constraint::Length(1), Constraint::Length(1)])
            .split(inner);

        let title = Paragraph::new(Line::from(vec![
            Span::styled("🔬 ", Style::default()),
            Span::styled(
                "New Analysis",
                Style::default().fg(GOLD).add_modifier(Modifier::BOLD),
            ),
        ]))
        .alignment(Alignment::Center);
        frame.render_widget(title, header_layout[0]);

        self.render_progress(frame, header_layout[1], state);
    }

    /// Render step progress dots
    fn render_progress(&self, frame: &mut Frame, area: Rect, state: &AppState) {
        let steps = WizardStep::all();
        let current_idx = match state.phase() {
            WizardPhase::Step(step) => step.number() - 1,
            // Every step is done
            WizardPhase::Succeeded => steps.len(),
        };

        let mut spans = vec![Span::styled("  ", Style::default())];

        for (idx, step) in steps.iter().enumerate() {
            let (icon, style) = if idx < current_idx {
                ("●", Style::default().fg(SELECTION_GREEN))
            } else if idx == current_idx {
                ("◉", Style::default().fg(GOLD).add_modifier(Modifier::BOLD))
            } else {
                ("○", Style::default().fg(MUTED_GRAY))
            };

            spans.push(Span::styled(icon, style));
            spans.push(Span::styled(" ", Style::default()));
            spans.push(Span::styled(
                step.title(),
                if idx == current_idx {
                    Style::default().fg(SOFT_WHITE)
                } else {
                    Style::default().fg(MUTED_GRAY)
                },
            ));

            if idx < steps.len() - 1 {
                spans.push(Span::styled(" → ", Style::default().fg(SUBDUED_BORDER)));
            }
        }

        let progress = Paragraph::new(Line::from(spans)).alignment(Alignment::Center);
        frame.render_widget(progress, area);
    }

    fn render_step_content(&self, frame: &mut Frame, area: Rect, state: &AppState) {
        match state.phase() {
            WizardPhase::Step(WizardStep::ProjectName) => self.render_text_step(
                frame,
                area,
                state,
                WizardStep::ProjectName,
                &state.inputs.project_name,
                MIN_PROJECT_NAME_LEN,
            ),
            WizardPhase::Step(WizardStep::AnalysisDescription) => self.render_text_step(
                frame,
                area,
                state,
                WizardStep::AnalysisDescription,
                &state.inputs.analysis_description,
                MIN_DESCRIPTION_LEN,
            ),
            WizardPhase::Step(WizardStep::FileAttachment) => self.render_files(frame, area, state),
            WizardPhase::Step(WizardStep::Review) => self.render_review(frame, area, state),
            WizardPhase::Succeeded => self.render_success(frame, area, state),
        }
    }

    fn step_block(title: &str) -> Block<'_> {
        Block::default()
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded)
            .border_style(Style::default().fg(CORNFLOWER_BLUE))
            .style(Style::default().bg(PANEL_BG))
            .title(format!(" {title} "))
            .title_style(Style::default().fg(GOLD).add_modifier(Modifier::BOLD))
    }

    /// The revealed prompt line, with a trailing caret while it is still growing
    fn prompt_line(state: &AppState) -> Line<'_> {
        let mut spans = vec![Span::styled(
            state.reveal.visible(),
            Style::default().fg(SOFT_WHITE).add_modifier(Modifier::BOLD),
        )];
        if !state.reveal.is_complete() {
            spans.push(Span::styled("▌", Style::default().fg(GOLD)));
        }
        Line::from(spans)
    }

    fn input_field(input: &TextInput) -> Paragraph<'_> {
        let (before, after) = input.split_at_cursor();
        Paragraph::new(Line::from(vec![
            Span::styled(before, Style::default().fg(SOFT_WHITE)),
            Span::styled("│", Style::default().fg(GOLD)),
            Span::styled(after, Style::default().fg(SOFT_WHITE)),
        ]))
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_type(BorderType::Rounded)
                .border_style(Style::default().fg(GOLD))
                .style(Style::default().bg(DARK_BG)),
        )
    }

    fn render_text_step(
        &self,
        frame: &mut Frame,
        area: Rect,
        state: &AppState,
        step: WizardStep,
        input: &TextInput,
        min_len: usize,
    ) {
        let block = Self::step_block(step.title());
        let inner = block.inner(area);
        frame.render_widget(block, area);

        let content_layout = Layout::default()
            .direction(Direction::Vertical)
            .margin(2)
            .constraints([
                Constraint::Length(2), // Prompt
                Constraint::Length(3), // Input field
                Constraint::Length(1), // Character counter
                Constraint::Min(0),
            ])
            .split(inner);

        frame.render_widget(Paragraph::new(Self::prompt_line(state)), content_layout[0]);
        frame.render_widget(Self::input_field(input), content_layout[1]);

        let typed = input.value().trim().chars().count();
        let counter_style = if typed >= min_len {
            Style::default().fg(SELECTION_GREEN)
        } else {
            Style::default().fg(MUTED_GRAY)
        };
        let counter = Paragraph::new(Span::styled(
            format!("{typed} characters (minimum {min_len})"),
            counter_style,
        ));
        frame.render_widget(counter, content_layout[2]);
    }

    fn render_files(&self, frame: &mut Frame, area: Rect, state: &AppState) {
        let block = Self::step_block(WizardStep::FileAttachment.title());
        let inner = block.inner(area);
        frame.render_widget(block, area);

        let content_layout = Layout::default()
            .direction(Direction::Vertical)
            .margin(2)
            .constraints([
                Constraint::Length(2), // Prompt
                Constraint::Length(1), // Description
                Constraint::Length(3), // Input field
                Constraint::Min(3),    // Selected files
            ])
            .split(inner);

        frame.render_widget(Paragraph::new(Self::prompt_line(state)), content_layout[0]);

        let policy = match state.controller.file_policy() {
            FileSizePolicy::Unlimited => String::new(),
            capped @ FileSizePolicy::MaxBytes(_) => format!(" • {}", capped.describe()),
        };
        let desc = Paragraph::new(Line::from(vec![
            Span::styled("File paths ", Style::default().fg(SOFT_WHITE)),
            Span::styled(format!("(comma-separated){policy}"), Style::default().fg(MUTED_GRAY)),
        ]));
        frame.render_widget(desc, content_layout[1]);

        frame.render_widget(Self::input_field(&state.inputs.file_paths), content_layout[2]);

        let selected = &state.controller.state().selected_files;
        if selected.is_empty() {
            let empty = Paragraph::new(Span::styled(
                "No files selected. Attachments are optional.",
                Style::default().fg(MUTED_GRAY),
            ));
            frame.render_widget(empty, content_layout[3]);
        } else {
            let items: Vec<ListItem> = selected
                .iter()
                .map(|file| {
                    ListItem::new(Line::from(vec![
                        Span::styled("  ✓ ", Style::default().fg(SELECTION_GREEN)),
                        Span::styled(file.name.as_str(), Style::default().fg(SOFT_WHITE)),
                        Span::styled(
                            format!("  {}", file.display_size()),
                            Style::default().fg(MUTED_GRAY),
                        ),
                    ]))
                })
                .collect();
            let list = List::new(items).style(Style::default().bg(PANEL_BG));
            frame.render_widget(list, content_layout[3]);
        }
    }

    fn render_review(&self, frame: &mut Frame, area: Rect, state: &AppState) {
        let block = Self::step_block(WizardStep::Review.title());
        let inner = block.inner(area);
        frame.render_widget(block, area);

        let wizard = state.controller.state();
        let label = Style::default().fg(GOLD).add_modifier(Modifier::BOLD);
        let value = Style::default().fg(SOFT_WHITE);

        let mut lines = vec![
            Self::prompt_line(state),
            Line::from(""),
            Line::from(vec![
                Span::styled("Project:      ", label),
                Span::styled(wizard.project_name.as_str(), value),
            ]),
            Line::from(vec![
                Span::styled("Description:  ", label),
                Span::styled(wizard.analysis_description.as_str(), value),
            ]),
            Line::from(""),
        ];

        if wizard.selected_files.is_empty() {
            lines.push(Line::from(vec![
                Span::styled("Files:        ", label),
                Span::styled("none", Style::default().fg(MUTED_GRAY)),
            ]));
        } else {
            lines.push(Line::from(vec![
                Span::styled("Files:        ", label),
                Span::styled(
                    format!(
                        "{} file(s), {}",
                        wizard.selected_files.len(),
                        format_size(wizard.total_file_size())
                    ),
                    value,
                ),
            ]));
            for file in &wizard.selected_files {
                lines.push(Line::from(vec![
                    Span::styled("  • ", Style::default().fg(GOLD)),
                    Span::styled(file.name.as_str(), value),
                    Span::styled(
                        format!("  {}", file.display_size()),
                        Style::default().fg(MUTED_GRAY),
                    ),
                ]));
            }
        }

        lines.push(Line::from(""));
        match &wizard.submission_status {
            SubmissionStatus::InFlight => {
                let frame_idx = state.tick_count % SPINNER.len();
                lines.push(Line::from(Span::styled(
                    format!("{} Submitting...", SPINNER[frame_idx]),
                    Style::default().fg(GOLD),
                )));
            }
            SubmissionStatus::Failed(reason) => {
                lines.push(Line::from(vec![
                    Span::styled("❌ ", Style::default()),
                    Span::styled(reason.as_str(), Style::default().fg(ERROR_RED)),
                ]));
                lines.push(Line::from(Span::styled(
                    "Press Enter to retry",
                    Style::default().fg(MUTED_GRAY),
                )));
            }
            SubmissionStatus::Idle | SubmissionStatus::Succeeded => {}
        }

        let summary = Paragraph::new(lines)
            .wrap(Wrap { trim: false })
            .block(Block::default().padding(ratatui::widgets::Padding::uniform(1)));
        frame.render_widget(summary, inner);
    }

    fn render_success(&self, frame: &mut Frame, area: Rect, state: &AppState) {
        let block = Self::step_block("Submitted");
        let inner = block.inner(area);
        frame.render_widget(block, area);

        let wizard = state.controller.state();
        let mut lines = vec![
            Line::from(""),
            Line::from(Span::styled("✅", Style::default())),
            Line::from(""),
            Self::prompt_line(state),
            Line::from(""),
            Line::from(vec![
                Span::styled("Project: ", Style::default().fg(MUTED_GRAY)),
                Span::styled(wizard.project_name.as_str(), Style::default().fg(SOFT_WHITE)),
            ]),
        ];

        if let Some(receipt) = &wizard.receipt {
            lines.push(Line::from(vec![
                Span::styled("Reference: ", Style::default().fg(MUTED_GRAY)),
                Span::styled(receipt.id.as_str(), Style::default().fg(GOLD)),
            ]));
            lines.push(Line::from(vec![
                Span::styled("Submitted: ", Style::default().fg(MUTED_GRAY)),
                Span::styled(
                    receipt
                        .submitted_at
                        .with_timezone(&chrono::Local)
                        .format("%Y-%m-%d %H:%M:%S")
                        .to_string(),
                    Style::default().fg(SOFT_WHITE),
                ),
            ]));
        }

        let body = Paragraph::new(lines).alignment(Alignment::Center);
        frame.render_widget(body, inner);
    }

    fn render_notification(&self, frame: &mut Frame, area: Rect, state: &AppState) {
        let Some(notification) = state.controller.notifications().latest() else {
            return;
        };

        let (icon, color) = match notification.notification_type {
            NotificationType::Success => ("✅", SELECTION_GREEN),
            NotificationType::Error => ("❌", ERROR_RED),
            NotificationType::Info => ("ℹ️", CORNFLOWER_BLUE),
            NotificationType::Warning => ("⚠️", WARNING_YELLOW),
        };

        let toast = Paragraph::new(Line::from(vec![
            Span::styled(icon, Style::default()),
            Span::styled(" ", Style::default()),
            Span::styled(notification.message.as_str(), Style::default().fg(color)),
        ]))
        .alignment(Alignment::Center)
        .style(Style::default().bg(DARK_BG));
        frame.render_widget(toast, area);
    }

    fn render_navigation(&self, frame: &mut Frame, area: Rect, state: &AppState) {
        let block = Block::default()
            .borders(Borders::TOP)
            .border_type(BorderType::Rounded)
            .border_style(Style::default().fg(SUBDUED_BORDER))
            .style(Style::default().bg(DARK_BG));

        let inner = block.inner(area);
        frame.render_widget(block, area);

        let hints: Vec<(&str, &str)> = match state.phase() {
            WizardPhase::Succeeded => vec![("n", "New analysis"), ("q", "Quit")],
            WizardPhase::Step(step) => {
                let mut hints = Vec::new();
                if step.previous().is_some() && state.controller.allows_back_navigation() {
                    hints.push(("Esc", "Back"));
                }
                match step {
                    WizardStep::FileAttachment => {
                        if state.controller.state().selected_files.is_empty() {
                            hints.push(("Enter", "Select / Skip"));
                        } else {
                            hints.push(("Enter", "Select / Continue"));
                            hints.push(("Ctrl+X", "Clear"));
                        }
                        hints.push(("Ctrl+S", "Skip"));
                    }
                    WizardStep::Review => {
                        if !state.controller.state().submission_status.is_in_flight() {
                            hints.push(("Enter", "Submit"));
                        }
                    }
                    WizardStep::ProjectName | WizardStep::AnalysisDescription => {
                        hints.push(("Enter", "Next"));
                    }
                }
                hints.push(("Ctrl+C", "Quit"));
                hints
            }
        };

        let mut spans = vec![Span::styled("  ", Style::default())];
        for (idx, (key, label)) in hints.iter().enumerate() {
            if idx > 0 {
                spans.push(Span::styled("  |  ", Style::default().fg(SUBDUED_BORDER)));
            }
            spans.push(Span::styled("[", Style::default().fg(SUBDUED_BORDER)));
            spans.push(Span::styled(*key, Style::default().fg(GOLD)));
            spans.push(Span::styled("]", Style::default().fg(SUBDUED_BORDER)));
            spans.push(Span::styled(format!(" {label}"), Style::default().fg(MUTED_GRAY)));
        }

        let nav = Paragraph::new(Line::from(spans)).alignment(Alignment::Center);
        frame.render_widget(nav, inner);
    }
}

impl Default for WizardComponent {
    fn default() -> Self {
        Self::new()
    }
}
