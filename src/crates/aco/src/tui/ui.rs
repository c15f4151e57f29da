//! Terminal UI rendering with ratatui

use super::app::{App, View};
use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem, Paragraph, Wrap},
    Frame,
};

/// Render the main TUI frame
pub fn draw(f: &mut Frame, app: &App) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .margin(0)
        .constraints([
            Constraint::Length(3),  // Header
            Constraint::Min(1),     // Main content
            Constraint::Length(2),  // Footer/Status
        ])
        .split(f.size());

    draw_header(f, app, chunks[0]);
    draw_main_content(f, app, chunks[1]);
    draw_footer(f, app, chunks[2]);
}

/// Draw the header bar
fn draw_header(f: &mut Frame, app: &App, area: Rect) {
    // Count statuses based on current view
    let stats = match app.view() {
        View::TaskList | View::TaskDetail => {
            let mut pending = 0;
            let mut running = 0;
            let mut completed = 0;
            let mut failed = 0;

            for task in &app.tasks {
                match task.status.as_str() {
                    "pending" => pending += 1,
                    "running" => running += 1,
                    "completed" => completed += 1,
                    "failed" | "cancelled" => failed += 1,
                    _ => {}
                }
            }

            {
                let mut parts = vec![format!(" | {} Tasks:", app.tasks.len())];
                if pending > 0 {
                    parts.push(format!(" ‚è∏{}", pending));
                }
                if running > 0 {
                    parts.push(format!(" ‚ñ∂{}", running));
                }
                if completed > 0 {
                    parts.push(format!(" ‚úî{}", completed));
                }
                if failed > 0 {
                    parts.push(format!(" ‚úó{}", failed));
                }
                parts.join("")
            }
        }
        View::WorkflowList | View::WorkflowDetail => {
            let mut draft = 0;
            let mut active = 0;
            let mut running = 0;

            for workflow in &app.workflows {
                match workflow.status.as_str() {
                    "draft" => draft += 1,
                    "active" => active += 1,
                    "running" => running += 1,
                    _ => {}
                }
            }

            {
                let mut parts = vec![format!(" | {} Workflows:", app.workflows.len())];
                if draft > 0 {
                    parts.push(format!(" ‚óØ{}", draft));
                }
                if active > 0 {
                    parts.push(format!(" ‚óâ{}", active));
                }
                if running > 0 {
                    parts.push(format!(" ‚ñ∂{}", running));
                }
                parts.join("")
            }
        }
        View::ExecutionStream => {
            if let Some(id) = app.executing_id() {
                format!(" | Executing: {} | {} events", id, app.execution_events.len())
            } else {
                String::new()
            }
        }
        _ => String::new(),
    };

    let header_text = format!("ACO - {}{}", app.view(), stats);
    let header = Paragraph::new(header_text)
        .style(Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD))
        .block(Block::default().borders(Borders::BOTTOM))
        .alignment(Alignment::Center);

    f.render_widget(header, area);
}

/// Draw the main content area based on current view
fn draw_main_content(f: &mut Frame, app: &App, area: Rect) {
    match app.view() {
        View::TaskList => draw_task_list(f, app, area),
        View::TaskDetail => draw_task_detail(f, app, area),
        View::WorkflowList => draw_workflow_list(f, app, area),
        View::WorkflowDetail => draw_workflow_detail(f, app, area),
        View::ExecutionStream => draw_execution_stream(f, app, area),
        View::Help => draw_help(f, app, area),
    }
}

/// Draw the task list view
fn draw_task_list(f: &mut Frame, app: &App, area: Rect) {
    let items: Vec<ListItem> = app
        .tasks
        .iter()
        .enumerate()
        .map(|(idx, task)| {
            // Status icon and color
            let (status_icon, status_color) = match task.status.as_str() {
                "pending" => ("‚è∏", Color::Yellow),
                "running" => ("‚ñ∂", Color::Cyan),
                "completed" => ("‚úî", Color::Green),
                "failed" => ("‚úó", Color::Red),
                "cancelled" => ("‚äó", Color::DarkGray),
                _ => ("‚Ä¢", Color::White),
            };

            // Selection indicator
            let selector = if idx == app.selected { "‚ñ∏ " } else { "  " };

            // Task type badge
            let type_badge = match task.task_type.as_str() {
                "execution" => "[EXEC]",
                "workflow" => "[FLOW]",
                "validation" => "[VALD]",
                _ => "[TASK]",
            };

            let line = Line::from(vec![
                Span::raw(selector),
                Span::styled(
                    format!("{} ", status_icon),
                    Style::default().fg(status_color).add_modifier(Modifier::BOLD),
                ),
                Span::styled(
                    type_badge,
                    Style::default().fg(Color::Blue),
                ),
                Span::raw(" "),
                Span::styled(
                    &task.title,
                    if idx == app.selected {
                        Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD)
                    } else {
                        Style::default().fg(Color::White)
                    },
                ),
            ]);

            let style = if idx == app.selected {
                Style::default().bg(Color::DarkGray)
            } else {
                Style::default()
            };

            ListItem::new(line).style(style)
        })
        .collect();

    let title = format!(" Tasks ({}) ", app.tasks.len());
    let list = List::new(items).block(
        Block::default()
            .title(title)
            .borders(Borders::ALL),
    );

    f.render_widget(list, area);
}

/// Draw the task detail view
fn draw_task_detail(f: &mut Frame, app: &App, area: Rect) {
    if let Some(task) = app.selected_task() {
        // Parse status color
        let status_color = match task.status.as_str() {
            "pending" => Color::Yellow,
            "running" => Color::Cyan,
            "completed" => Color::Green,
            "failed" => Color::Red,
            "cancelled" => Color::DarkGray,
            _ => Color::White,
        };

        let content = vec![
            Line::from(vec![
                Span::styled("ID: ", Style::default().add_modifier(Modifier::BOLD)),
                Span::raw(&task.id),
            ]),
            Line::from(""),
            Line::from(vec![
                Span::styled("Title: ", Style::default().add_modifier(Modifier::BOLD)),
                Span::raw(&task.title),
            ]),
            Line::from(""),
            Line::from(vec![
                Span::styled("Description: ", Style::default().add_modifier(Modifier::BOLD)),
            ]),
            Line::from(format!("  {}", task.description)),
            Line::from(""),
            Line::from(vec![
                Span::styled("Status: ", Style::default().add_modifier(Modifier::BOLD)),
                Span::styled(&task.status, Style::default().fg(status_color).add_modifier(Modifier::BOLD)),
            ]),
            Line::from(""),
            Line::from(vec![
                Span::styled("Type: ", Style::default().add_modifier(Modifier::BOLD)),
                Span::raw(&task.task_type),
            ]),
            Line::from(""),
            Line::from(vec![
                Span::styled("Workspace: ", Style::default().add_modifier(Modifier::BOLD)),
            ]),
            Line::from(format!("  {}", task.workspace_path)),
            Line::from(""),
            Line::from(vec![
                Span::styled("Config: ", Style::default().add_modifier(Modifier::BOLD)),
            ]),
            Line::from(format!("  {}", task.config)),
            Line::from(""),
            Line::from(vec![
                Span::styled("Metadata: ", Style::default().add_modifier(Modifier::BOLD)),
            ]),
            Line::from(format!("  {}", task.metadata)),
            Line::from(""),
            Line::from(vec![
                Span::styled("Created: ", Style::default().add_modifier(Modifier::BOLD)),
                Span::raw(&task.created_at),
            ]),
            Line::from(vec![
                Span::styled("Updated: ", Style::default().add_modifier(Modifier::BOLD)),
                Span::raw(&task.updated_at),
            ]),
            Line::from(""),
            Line::from(vec![
                Span::styled("Press ESC to return to task list",
                    Style::default().fg(Color::DarkGray).add_modifier(Modifier::ITALIC)),
            ]),
        ];

        let paragraph = Paragraph::new(content)
            .block(Block::default().title(" Task Details ").borders(Borders::ALL))
            .wrap(Wrap { trim: true });

        f.render_widget(paragraph, area);
    } else {
        let empty_msg = Paragraph::new("No task selected")
            .block(Block::default().title(" Task Details ").borders(Borders::ALL))
            .alignment(Alignment::Center);

        f.render_widget(empty_msg, area);
    }
}

/// Draw the workflow list view
fn draw_workflow_list(f: &mut Frame, app: &App, area: Rect) {
    let items: Vec<ListItem> = app
        .workflows
        .iter()
        .enumerate()
        .map(|(idx, workflow)| {
            // Status icon and color
            let (status_icon, status_color) = match workflow.status.as_str() {
                "draft" => ("‚óØ", Color::DarkGray),
                "active" => ("‚óâ", Color::Green),
                "running" => ("‚ñ∂", Color::Cyan),
                "paused" => ("‚è∏", Color::Yellow),
                "completed" => ("‚úî", Color::Green),
                "failed" => ("‚úó", Color::Red),
                _ => ("‚Ä¢", Color::White),
            };

            // Selection indicator
            let selector = if idx == app.selected { "‚ñ∏ " } else { "  " };

            let line = Line::from(vec![
                Span::raw(selector),
                Span::styled(
                    format!("{} ", status_icon),
                    Style::default().fg(status_color).add_modifier(Modifier::BOLD),
                ),
                Span::styled(
                    "[WORKFLOW]",
                    Style::default().fg(Color::Magenta),
                ),
                Span::raw(" "),
                Span::styled(
                    &workflow.name,
                    if idx == app.selected {
                        Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD)
                    } else {
                        Style::default().fg(Color::White)
                    },
                ),
            ]);

            let style = if idx == app.selected {
                Style::default().bg(Color::DarkGray)
            } else {
                Style::default()
            };

            ListItem::new(line).style(style)
        })
        .collect();

    let title = format!(" Workflows ({}) ", app.workflows.len());
    let list = List::new(items).block(
        Block::default()
            .title(title)
            .borders(Borders::ALL),
    );

    f.render_widget(list, area);
}

/// Draw the workflow detail view
fn draw_workflow_detail(f: &mut Frame, app: &App, area: Rect) {
    if let Some(workflow) = app.selected_workflow() {
        let content = vec![
            Line::from(vec![
                Span::styled("ID: ", Style::default().add_modifier(Modifier::BOLD)),
                Span::raw(&workflow.id),
            ]),
            Line::from(vec![
                Span::styled("Name: ", Style::default().add_modifier(Modifier::BOLD)),
                Span::raw(&workflow.name),
            ]),
            Line::from(vec![
                Span::styled("Status: ", Style::default().add_modifier(Modifier::BOLD)),
                Span::raw(&workflow.status),
            ]),
            Line::from(vec![
                Span::styled("Created: ", Style::default().add_modifier(Modifier::BOLD)),
                Span::raw(&workflow.created_at),
            ]),
        ];

        let paragraph = Paragraph::new(content)
            .block(Block::default().title(" Workflow Details ").borders(Borders::ALL))
            .wrap(Wrap { trim: true });

        f.render_widget(paragraph, area);
    } else {
        let empty_msg = Paragraph::new("No workflow selected")
            .block(
                Block::default()
                    .title(" Workflow Details ")
                    .borders(Borders::ALL),
            )
            .alignment(Alignment::Center);

        f.render_widget(empty_msg, area);
    }
}

/// Draw the execution stream view
fn draw_execution_stream(f: &mut Frame, app: &App, area: Rect) {
    if app.execution_events.is_empty() {
        let empty_msg = vec![
            Line::from(""),
            Line::from(vec![
                Span::styled("No execution in progress",
                    Style::default().fg(Color::DarkGray).add_modifier(Modifier::ITALIC)),
            ]),
            Line::from(""),
            Line::from(vec![
                Span::styled("Press 'e' on a task or workflow to execute it",
                    Style::default().fg(Color::DarkGray)),
            ]),
        ];

        let paragraph = Paragraph::new(empty_msg)
            .block(
                Block::default()
                    .title(" Execution Stream ")
                    .borders(Borders::ALL)
                    .border_type(ratatui::widgets::BorderType::Rounded),
            )
            .alignment(Alignment::Center)
            .wrap(Wrap { trim: true });

        f.render_widget(paragraph, area);
    } else {
        let title = if let Some(id) = app.executing_id() {
            format!(" Execution Stream - {} ", id)
        } else {
            " Execution Stream ".to_string()
        };

        let mut lines: Vec<Line> = Vec::new();

        for event in &app.execution_events {
            // Color code by event type
            let (icon, color) = match event.event_type.as_str() {
                "started" => ("‚ñ∂", Color::Green),
                "progress" => ("‚ãØ", Color::Cyan),
                "output" => ("‚óâ", Color::Yellow),
                "tool_call" => ("üîß", Color::Magenta),
                "tool_result" => ("‚úì", Color::Blue),
                "completed" => ("‚úî", Color::Green),
                "failed" => ("‚úó", Color::Red),
                _ => ("‚Ä¢", Color::White),
            };

            // Extract timestamp (just time part)
            let time = event.timestamp
                .split('T')
                .nth(1)
                .and_then(|t| t.split('.').next())
                .unwrap_or("00:00:00");

            lines.push(Line::from(vec![
                Span::styled(
                    format!("[{}] ", time),
                    Style::default().fg(Color::DarkGray),
                ),
                Span::styled(
                    format!("{} ", icon),
                    Style::default().fg(color).add_modifier(Modifier::BOLD),
                ),
                Span::styled(
                    format!("{}: ", event.event_type.to_uppercase()),
                    Style::default().fg(color).add_modifier(Modifier::BOLD),
                ),
                Span::raw(&event.message),
            ]));
        }

        // Add help text at the bottom
        lines.push(Line::from(""));
        lines.push(Line::from(vec![
            Span::styled(
                "Press ESC to return",
                Style::default().fg(Color::DarkGray).add_modifier(Modifier::ITALIC),
            ),
        ]));

        let paragraph = Paragraph::new(lines)
            .block(
                Block::default()
                    .title(title)
                    .borders(Borders::ALL)
                    .border_type(ratatui::widgets::BorderType::Rounded),
            )
            .wrap(Wrap { trim: false })
            .scroll((app.scroll as u16, 0));

        f.render_widget(paragraph, area);
    }
}

/// Draw the help view
fn draw_help(f: &mut Frame, app: &App, area: Rect) {
    let help_text = vec![
        Line::from(vec![Span::styled(
            "ACO TUI - Keyboard Shortcuts & Status Indicators",
            Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
        )]),
        Line::from(""),
        Line::from(vec![Span::styled("Navigation:", Style::default().add_modifier(Modifier::BOLD))]),
        Line::from("  ‚Üë/‚Üì, j/k    - Navigate up/down (Vim-style also supported)"),
        Line::from("  Enter       - View details / Select item"),
        Line::from("  Esc         - Back / Return to list / Quit"),
        Line::from("  Home, g     - Jump to first item"),
        Line::from("  End, G      - Jump to last item"),
        Line::from("  PgUp        - Scroll up one page (10 items)"),
        Line::from("  PgDn        - Scroll down one page (10 items)"),
        Line::from(""),
        Line::from(vec![Span::styled("View Switching:", Style::default().add_modifier(Modifier::BOLD))]),
        Line::from("  Tab         - Cycle to next view"),
        Line::from("  Shift+Tab   - Cycle to previous view"),
        Line::from("  1           - Tasks List"),
        Line::from("  2           - Workflows List"),
        Line::from("  3           - Execution Stream"),
        Line::from("  4, ?, h, F1 - Help"),
        Line::from(""),
        Line::from(vec![Span::styled("Actions:", Style::default().add_modifier(Modifier::BOLD))]),
        Line::from("  e           - Execute selected task/workflow"),
        Line::from("  r           - Refresh data from server"),
        Line::from(""),
        Line::from(vec![Span::styled("Task Status Indicators:", Style::default().add_modifier(Modifier::BOLD))]),
        Line::from(vec![
            Span::raw("  "),
            Span::styled("‚è∏", Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD)),
            Span::raw(" Pending   "),
            Span::styled("‚ñ∂", Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD)),
            Span::raw(" Running   "),
            Span::styled("‚úî", Style::default().fg(Color::Green).add_modifier(Modifier::BOLD)),
            Span::raw(" Completed"),
        ]),
        Line::from(vec![
            Span::raw("  "),
            Span::styled("‚úó", Style::default().fg(Color::Red).add_modifier(Modifier::BOLD)),
            Span::raw(" Failed    "),
            Span::styled("‚äó", Style::default().fg(Color::DarkGray).add_modifier(Modifier::BOLD)),
            Span::raw(" Cancelled"),
        ]),
        Line::from(""),
        Line::from(vec![Span::styled("Workflow Status Indicators:", Style::default().add_modifier(Modifier::BOLD))]),
        Line::from(vec![
            Span::raw("  "),
            Span::styled("‚óØ", Style::default().fg(Color::DarkGray).add_modifier(Modifier::BOLD)),
            Span::raw(" Draft     "),
            Span::styled("‚óâ", Style::default().fg(Color::Green).add_modifier(Modifier::BOLD)),
            Span::raw(" Active    "),
            Span::styled("‚ñ∂", Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD)),
            Span::raw(" Running"),
        ]),
        Line::from(vec![
            Span::raw("  "),
            Span::styled("‚è∏", Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD)),
            Span::raw(" Paused    "),
            Span::styled("‚úî", Style::default().fg(Color::Green).add_modifier(Modifier::BOLD)),
            Span::raw(" Completed "),
            Span::styled("‚úó", Style::default().fg(Color::Red).add_modifier(Modifier::BOLD)),
            Span::raw(" Failed"),
        ]),
        Line::from(""),
        Line::from(vec![Span::styled("Type Badges:", Style::default().add_modifier(Modifier::BOLD))]),
        Line::from(vec![
            Span::raw("  "),
            Span::styled("[EXEC]", Style::default().fg(Color::Blue)),
            Span::raw(" Execution task  "),
            Span::styled("[FLOW]", Style::default().fg(Color::Blue)),
            Span::raw(" Workflow task"),
        ]),
        Line::from(vec![
            Span::raw("  "),
            Span::styled("[VALD]", Style::default().fg(Color::Blue)),
            Span::raw(" Validation task "),
            Span::styled("[WORKFLOW]", Style::default().fg(Color::Magenta)),
            Span::raw(" Workflow"),
        ]),
        Line::from(""),
        Line::from(vec![Span::styled("General:", Style::default().add_modifier(Modifier::BOLD))]),
        Line::from("  q, Ctrl+C   - Quit application"),
        Line::from(""),
        Line::from(vec![Span::styled("Connection:", Style::default().add_modifier(Modifier::BOLD))]),
        Line::from(format!("  Server: {}", app.server_url())),
        Line::from(format!("  Auth: {}", app.auth())),
    ];

    let paragraph = Paragraph::new(help_text)
        .block(
            Block::default()
                .title(" Help ")
                .borders(Borders::ALL)
                .border_type(ratatui::widgets::BorderType::Rounded),
        )
        .wrap(Wrap { trim: true });

    f.render_widget(paragraph, area);
}

/// Draw the footer with status and error messages
fn draw_footer(f: &mut Frame, app: &App, area: Rect) {
    let status_text = if let Some(error) = app.error() {
        format!(" ERROR: {} ", error)
    } else {
        format!(" {} ", app.status())
    };

    let status_style = if app.error().is_some() {
        Style::default().bg(Color::Red).fg(Color::White)
    } else {
        Style::default().bg(Color::DarkGray).fg(Color::White)
    };

    let status = Paragraph::new(status_text)
        .style(status_style)
        .alignment(Alignment::Left);

    f.render_widget(status, area);
}
