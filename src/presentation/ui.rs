use crate::application::{App, AppMode, Phase};
use crate::domain::{
    assess, choices_for, format_amount, Field, StepId, StepStatus, StrengthLevel, SEGMENTS, STEPS,
};
use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph, Wrap},
    Frame,
};

const SPINNER: [&str; 4] = ["|", "/", "-", "\\"];
const INPUT_PREFIX: &str = "  > ";

pub fn render_ui(f: &mut Frame, app: &App) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(4),
            Constraint::Min(0),
            Constraint::Length(3),
        ])
        .split(f.area());

    match app.form.phase() {
        Phase::Complete => {
            render_header(f, app, chunks[0]);
            render_completion(f, app, chunks[1]);
        }
        Phase::Step(_) | Phase::Submitting => {
            render_header(f, app, chunks[0]);
            render_step(f, app, chunks[1]);
        }
    }
    render_status_bar(f, app, chunks[2]);

    if matches!(app.mode, AppMode::Help) {
        render_help_popup(f, app.help_scroll);
    }
}

fn render_header(f: &mut Frame, app: &App, area: Rect) {
    let current = app.form.current_step();
    let complete = app.form.is_complete();

    let mut stepper = Vec::new();
    for (index, step) in STEPS.iter().enumerate() {
        if index > 0 {
            stepper.push(Span::styled(" ─── ", Style::default().fg(Color::DarkGray)));
        }
        let status = if complete {
            StepStatus::Complete
        } else {
            step.status(current)
        };
        let span = match status {
            StepStatus::Complete => Span::styled(
                format!("✓ {}", step.title),
                Style::default().fg(Color::Green),
            ),
            StepStatus::Active => Span::styled(
                format!("● {} {}", step.id.ordinal(), step.title),
                Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD),
            ),
            StepStatus::Pending => Span::styled(
                format!("{} {}", step.id.ordinal(), step.title),
                Style::default().fg(Color::DarkGray),
            ),
        };
        stepper.push(span);
    }

    let progress = if complete {
        "All steps complete".to_string()
    } else {
        format!(
            "Step {} of {} · {}",
            current.ordinal(),
            STEPS.len(),
            current.descriptor().description
        )
    };

    let header = Paragraph::new(vec![
        Line::from(Span::styled(
            format!("{} · Get started", app.brand_name),
            Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD),
        )),
        Line::from(stepper),
        Line::from(Span::styled(progress, Style::default().fg(Color::Gray))),
    ])
    .alignment(Alignment::Center);
    f.render_widget(header, area);
}

/// Where the terminal cursor goes, relative to the body's inner area.
struct CursorSpot {
    line: usize,
    column: usize,
}

fn render_step(f: &mut Frame, app: &App, area: Rect) {
    let step = app.form.current_step();
    let (heading, subheading) = step.heading();
    let locked = app.form.is_submitting();

    let mut lines = vec![
        Line::from(Span::styled(
            heading,
            Style::default().add_modifier(Modifier::BOLD),
        )),
        Line::from(Span::styled(subheading, Style::default().fg(Color::Gray))),
        Line::from(""),
    ];

    if let Some(message) = app.form.submission_error() {
        lines.push(Line::from(Span::styled(
            format!("  ! {}", message),
            Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
        )));
        lines.push(Line::from(""));
    }

    let mut cursor = None;
    for (index, field) in step.fields().iter().enumerate() {
        let focused = index == app.focus && !locked;
        if focused && !field.is_choice() {
            cursor = Some(CursorSpot {
                line: lines.len() + 1,
                column: cursor_column(app, *field),
            });
        }
        push_field(&mut lines, app, *field, focused);
    }

    if step == StepId::Income {
        lines.push(Line::from(Span::styled(
            "We only ask what's necessary to help you reach your financial goals",
            Style::default().fg(Color::DarkGray),
        )));
    }

    let block = Block::default()
        .borders(Borders::ALL)
        .title(format!(" {} ", step.descriptor().title));
    let inner = block.inner(area);
    let scroll = cursor
        .as_ref()
        .map(|spot| (spot.line + 2).saturating_sub(inner.height as usize))
        .unwrap_or(0);

    let body = Paragraph::new(lines)
        .block(block)
        .scroll((scroll as u16, 0));
    f.render_widget(body, area);

    if let Some(spot) = cursor {
        let y = spot.line.saturating_sub(scroll);
        if y < inner.height as usize && spot.column < inner.width as usize {
            f.set_cursor_position((inner.x + spot.column as u16, inner.y + y as u16));
        }
    }
}

fn cursor_column(app: &App, field: Field) -> usize {
    let prefix = Span::raw(INPUT_PREFIX).width();
    let shown = match field {
        // Amount is shown as "$" plus the formatted digits, cursor after them
        Field::TargetAmount => {
            let formatted = format_amount(&app.form.data().target_amount);
            if formatted.is_empty() {
                0
            } else {
                1 + Span::raw(formatted).width()
            }
        }
        Field::Password if !app.show_password => app.cursor_position,
        _ => {
            let value = app.form.data().get(field);
            let before: String = value.chars().take(app.cursor_position).collect();
            Span::raw(before).width()
        }
    };
    prefix + shown
}

fn push_field(lines: &mut Vec<Line<'static>>, app: &App, field: Field, focused: bool) {
    let label_style = if focused {
        Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD)
    } else {
        Style::default()
    };
    let mut label = vec![Span::styled(field.label().to_string(), label_style)];
    if field.is_required() {
        label.push(Span::styled(" *", Style::default().fg(Color::Red)));
    }
    lines.push(Line::from(label));

    let value = app.form.data().get(field);
    if field.is_choice() {
        for choice in choices_for(field) {
            let selected = choice.id == value;
            let marker = if selected { "(•)" } else { "( )" };
            let style = if selected {
                Style::default().fg(Color::Cyan)
            } else {
                Style::default()
            };
            lines.push(Line::from(vec![
                Span::styled(format!("  {} {:<12}", marker, choice.label), style),
                Span::styled(choice.description, Style::default().fg(Color::DarkGray)),
            ]));
        }
    } else {
        let shown = match field {
            Field::Password if !app.show_password => "•".repeat(value.chars().count()),
            Field::TargetAmount => format_amount(value),
            _ => value.to_string(),
        };
        let prefix = if focused { INPUT_PREFIX } else { "    " };
        let line = if shown.is_empty() {
            Line::from(vec![
                Span::raw(prefix),
                Span::styled(field.placeholder(), Style::default().fg(Color::DarkGray)),
            ])
        } else {
            let currency = if field == Field::TargetAmount { "$" } else { "" };
            Line::from(vec![Span::raw(prefix), Span::raw(format!("{}{}", currency, shown))])
        };
        lines.push(line);
    }

    if field == Field::Password {
        if let Some(line) = strength_line(value) {
            lines.push(line);
        }
    }

    match app.form.errors().get(field) {
        Some(message) => lines.push(Line::from(Span::styled(
            format!("    {}", message),
            Style::default().fg(Color::Red),
        ))),
        None => lines.push(Line::from(Span::styled(
            format!("    {}", field.helper_text().unwrap_or("")),
            Style::default().fg(Color::DarkGray),
        ))),
    }
}

fn strength_line(password: &str) -> Option<Line<'static>> {
    let level = assess(password).level;
    let color = match level {
        StrengthLevel::Empty => return None,
        StrengthLevel::Weak => Color::Red,
        StrengthLevel::Fair => Color::LightRed,
        StrengthLevel::Good => Color::Yellow,
        StrengthLevel::Strong => Color::Green,
    };
    let filled = level.segments();
    let bar = format!("{}{}", "■".repeat(filled), "□".repeat(SEGMENTS - filled));
    Some(Line::from(vec![
        Span::styled("    Password strength ", Style::default().fg(Color::DarkGray)),
        Span::styled(bar, Style::default().fg(color)),
        Span::styled(format!(" {}", level.label()), Style::default().fg(color)),
    ]))
}

fn render_completion(f: &mut Frame, app: &App, area: Rect) {
    let data = app.form.data();
    let name = app
        .form
        .receipt()
        .map(|r| r.display_name.clone())
        .unwrap_or_else(|| data.first_name.trim().to_string());

    let mut lines = vec![
        Line::from(""),
        Line::from(Span::styled(
            "✓",
            Style::default().fg(Color::Green).add_modifier(Modifier::BOLD),
        )),
        Line::from(""),
        Line::from(Span::styled(
            "You're all set!",
            Style::default().add_modifier(Modifier::BOLD),
        )),
        Line::from(Span::styled(
            format!(
                "Welcome to {}, {}. Your financial journey starts now.",
                app.brand_name, name
            ),
            Style::default().fg(Color::Gray),
        )),
        Line::from(""),
    ];

    if let Some(receipt) = app.form.receipt() {
        let goal = &receipt.goal;
        let amount = goal
            .target_amount
            .map(|amount| format!("${}", format_amount(&amount.to_string())))
            .unwrap_or_else(|| "-".to_string());
        lines.push(Line::from(Span::styled(
            format!(
                "First goal: {} · {} · {} to {}",
                goal.goal_type, amount, goal.start_date, goal.end_date
            ),
            Style::default().fg(Color::Cyan),
        )));
        lines.push(Line::from(""));
    }

    lines.push(Line::from(Span::styled(
        "[ Enter ] Go to Dashboard",
        Style::default().fg(Color::Black).bg(Color::Cyan),
    )));

    let body = Paragraph::new(lines)
        .alignment(Alignment::Center)
        .wrap(Wrap { trim: true })
        .block(Block::default().borders(Borders::ALL));
    f.render_widget(body, area);
}

fn render_status_bar(f: &mut Frame, app: &App, area: Rect) {
    let status_text = match (app.mode, app.form.phase()) {
        (AppMode::Help, _) => {
            "↑↓/jk: scroll | PgUp/PgDn: fast scroll | Home: top | Esc/q: close help".to_string()
        }
        (AppMode::Form, Phase::Submitting) => format!(
            "{} Creating account...",
            SPINNER[app.tick % SPINNER.len()]
        ),
        (AppMode::Form, Phase::Complete) => match &app.status_message {
            Some(message) => format!("{} | Enter: go to dashboard | q: quit", message),
            None => "Enter: go to dashboard | q: quit".to_string(),
        },
        (AppMode::Form, _) if app.status_message.is_some() => {
            app.status_message.clone().unwrap_or_default()
        }
        (AppMode::Form, Phase::Step(step)) => {
            let action = if step.is_last() {
                "Enter: Complete Setup"
            } else {
                "Enter: Continue"
            };
            let back = if step.previous().is_some() { "Esc: Back | " } else { "" };
            format!(
                "{}{} | Tab/↑↓: field | ←→: choose | Ctrl+R: show password | F1: help | Ctrl+Q: quit",
                back, action
            )
        }
    };

    let status = Paragraph::new(status_text)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(" Your data is encrypted and secure "),
        )
        .style(match app.form.phase() {
            _ if matches!(app.mode, AppMode::Help) => Style::default().fg(Color::Cyan),
            Phase::Submitting => Style::default().fg(Color::Yellow),
            Phase::Complete => Style::default().fg(Color::Green),
            Phase::Step(_) => Style::default(),
        });
    f.render_widget(status, area);
}

fn render_help_popup(f: &mut Frame, scroll: usize) {
    let area = f.area();
    let popup_area = Rect {
        x: area.width / 10,
        y: area.height / 10,
        width: area.width * 4 / 5,
        height: area.height * 4 / 5,
    };

    f.render_widget(Clear, popup_area);

    let help_text = get_help_text();
    let help_lines: Vec<&str> = help_text.lines().collect();
    let visible_height = popup_area.height.saturating_sub(2) as usize;

    let start_line = scroll.min(help_lines.len().saturating_sub(visible_height));
    let end_line = (start_line + visible_height).min(help_lines.len());

    let visible_text = help_lines[start_line..end_line].join("\n");

    let help_widget = Paragraph::new(visible_text)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(format!(
                    "Onboarding Help (Line {}/{})",
                    start_line + 1,
                    help_lines.len()
                ))
                .style(Style::default().fg(Color::Cyan)),
        )
        .style(Style::default().fg(Color::White));

    f.render_widget(help_widget, popup_area);
}

pub fn get_help_text() -> String {
    r#"ACCOUNT SETUP

=== STEPS ===
1. Credentials   Name, email, password, optional contact number
2. Income        Occupation and primary source of income
3. Goals         Goal type, target amount, start and target dates

Each step is checked when you press Enter. Fields with problems are
shown in red; editing a field clears its message until the next check.

=== FIELD RULES ===
First/Last name   Required
Email             Required, must look like name@domain.tld
Password          Required, at least 8 characters
                  The strength bar is advice only
Contact number    Optional, not checked
Occupation        Required
Income source     Pick one: Employment, Freelance, Business, Mixed
Goal type         Pick one: Savings, Investment, Custom
Target amount     Required, digits only (shown with separators)
Start date        Required, YYYY-MM-DD
Target date       Required, YYYY-MM-DD, not before the start date

=== KEYS ===
Enter             Continue / Complete Setup
Esc               Back to the previous step
Tab / Down        Next field
Shift+Tab / Up    Previous field
Left / Right      Move cursor, or change the selected option
Space             Change the selected option
Home / End        Jump to start / end of the field
Ctrl+R            Show or hide the password
F1                Show this help
Ctrl+Q / Ctrl+C   Quit

=== HELP NAVIGATION ===
Up/Down or j/k    Scroll help text up/down one line
Page Up/Down      Scroll help text up/down 5 lines
Home              Jump to top of help text
Esc/F1/q          Close this help window

Nothing you enter is saved after you quit."#
        .to_string()
}
