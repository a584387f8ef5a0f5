use ratatui::{
    Frame,
    layout::{Constraint, Layout, Rect},
    style::{Color, Modifier, Style, Stylize},
    text::{Line, Span, Text},
    widgets::{Block, Borders, Paragraph, Wrap},
};
use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

use crate::app::App;
use crate::state::{
    Message, MessageKind, BOT_LABEL, HEADER_TITLE, INPUT_PLACEHOLDER, INTERPRETATION_LABEL,
    PROCESSING_CAPTION, SUBMIT_BUSY_LABEL, SUBMIT_LABEL, USER_LABEL,
};

const SPINNER: [&str; 10] = ["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏"];
const SUBMIT_WIDTH: u16 = 13;

pub fn render(app: &mut App, frame: &mut Frame) {
    let area = frame.area();

    let [header_area, chat_area, input_row, footer_area] = Layout::vertical([
        Constraint::Length(1),
        Constraint::Min(0),
        Constraint::Length(3),
        Constraint::Length(1),
    ])
    .areas(area);

    render_header(app, frame, header_area);
    render_chat(app, frame, chat_area);
    render_input(app, frame, input_row);
    render_footer(frame, footer_area);
}

/// Lines for one conversation entry, including its trailing blank separator
pub fn message_lines(message: &Message) -> Vec<Line<'_>> {
    let mut lines = Vec::new();

    match message.kind {
        MessageKind::User => {
            lines.push(Line::from(Span::styled(
                USER_LABEL,
                Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD),
            )));
            lines.push(Line::from(message.content.as_str()));
        }
        MessageKind::Interpretation => {
            lines.push(Line::from(Span::styled(
                INTERPRETATION_LABEL,
                Style::default().fg(Color::Magenta).add_modifier(Modifier::ITALIC),
            )));
            lines.push(Line::from(Span::styled(
                message.content.as_str(),
                Style::default().add_modifier(Modifier::ITALIC),
            )));
        }
        MessageKind::Bot => {
            lines.push(Line::from(Span::styled(
                BOT_LABEL,
                Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD),
            )));
            // One block per line of the answer
            for line in message.content.split('\n') {
                lines.push(Line::from(line));
            }
        }
        MessageKind::Error => {
            lines.push(Line::from(Span::styled(
                message.content.as_str(),
                Style::default().fg(Color::Red),
            )));
        }
    }

    lines.push(Line::default());
    lines
}

pub fn submit_label(busy: bool) -> &'static str {
    if busy {
        SUBMIT_BUSY_LABEL
    } else {
        SUBMIT_LABEL
    }
}

fn render_header(app: &App, frame: &mut Frame, area: Rect) {
    let title = Line::from(vec![
        Span::styled(format!(" {} ", HEADER_TITLE), Style::default().fg(Color::Cyan).bold()),
        Span::styled(
            format!("v{} ", env!("CARGO_PKG_VERSION")),
            Style::default().fg(Color::Gray),
        ),
        Span::styled(app.client.endpoint().to_string(), Style::default().fg(Color::Gray)),
    ]);

    let header = Paragraph::new(title).style(Style::default().bg(Color::DarkGray));
    frame.render_widget(header, area);
}

fn render_chat(app: &mut App, frame: &mut Frame, area: Rect) {
    // Inner size minus borders
    let inner_height = area.height.saturating_sub(2);
    let inner_width = area.width.saturating_sub(2);
    app.chat_height = inner_height;

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::DarkGray));

    let text = if app.log.is_empty() && !app.busy {
        Text::from(Span::styled(INPUT_PLACEHOLDER, Style::default().fg(Color::DarkGray)))
    } else {
        let mut lines: Vec<Line> = app.log.entries().iter().flat_map(message_lines).collect();

        if app.busy {
            let spinner = SPINNER[app.animation_frame as usize % SPINNER.len()];
            lines.push(Line::from(vec![
                Span::styled(format!("{} ", spinner), Style::default().fg(Color::Yellow)),
                Span::styled(
                    PROCESSING_CAPTION,
                    Style::default().fg(Color::DarkGray).add_modifier(Modifier::ITALIC),
                ),
            ]));
        }

        Text::from(lines)
    };

    let chat = Paragraph::new(text).wrap(Wrap { trim: false });

    // Count rows with the same word wrapping the paragraph renders with
    let total_rows = u16::try_from(chat.line_count(inner_width)).unwrap_or(u16::MAX);
    let max_scroll = total_rows.saturating_sub(inner_height);
    if app.follow_bottom || app.chat_scroll >= max_scroll {
        app.chat_scroll = max_scroll;
        app.follow_bottom = true;
    }

    let chat = chat.block(block).scroll((app.chat_scroll, 0));

    frame.render_widget(chat, area);
}

fn render_input(app: &App, frame: &mut Frame, area: Rect) {
    let [input_area, submit_area] =
        Layout::horizontal([Constraint::Min(0), Constraint::Length(SUBMIT_WIDTH)]).areas(area);

    let border_color = if app.busy { Color::DarkGray } else { Color::Yellow };
    let input_block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(border_color));

    let inner_width = input_area.width.saturating_sub(2) as usize;
    let (visible_text, cursor_x) = visible_input(&app.input, app.cursor, inner_width);

    let input = if app.input.is_empty() && !app.busy {
        Paragraph::new(Span::styled(INPUT_PLACEHOLDER, Style::default().fg(Color::DarkGray)))
    } else {
        let style = if app.busy {
            Style::default().fg(Color::DarkGray)
        } else {
            Style::default().fg(Color::Cyan)
        };
        Paragraph::new(visible_text).style(style)
    };
    frame.render_widget(input.block(input_block), input_area);

    let submit_style = if app.busy {
        Style::default().fg(Color::DarkGray).add_modifier(Modifier::DIM)
    } else {
        Style::default().fg(Color::Green).add_modifier(Modifier::BOLD)
    };
    let submit = Paragraph::new(submit_label(app.busy))
        .style(submit_style)
        .centered()
        .block(Block::default().borders(Borders::ALL).border_style(submit_style));
    frame.render_widget(submit, submit_area);

    if !app.busy {
        frame.set_cursor_position((input_area.x + 1 + cursor_x, input_area.y + 1));
    }
}

/// Slice of `input` that fits in `width` columns with the cursor visible,
/// and the cursor's column within that slice.
fn visible_input(input: &str, cursor: usize, width: usize) -> (String, u16) {
    if width == 0 {
        return (String::new(), 0);
    }

    let chars: Vec<char> = input.chars().collect();
    let cursor = cursor.min(chars.len());

    let mut skip = 0;
    let mut before: usize = chars[..cursor].iter().map(|c| c.width().unwrap_or(0)).sum();
    while before >= width && skip < cursor {
        before -= chars[skip].width().unwrap_or(0);
        skip += 1;
    }

    let mut visible = String::new();
    for c in &chars[skip..] {
        if visible.width() + c.width().unwrap_or(0) > width {
            break;
        }
        visible.push(*c);
    }

    (visible, before as u16)
}

fn render_footer(frame: &mut Frame, area: Rect) {
    let key_style = Style::default().fg(Color::Yellow);
    let hint_style = Style::default().fg(Color::DarkGray);

    let hints = Line::from(vec![
        Span::styled(" Enter", key_style),
        Span::styled(" send  ", hint_style),
        Span::styled("PgUp/PgDn", key_style),
        Span::styled(" scroll  ", hint_style),
        Span::styled("Esc", key_style),
        Span::styled(" quit", hint_style),
    ]);

    frame.render_widget(Paragraph::new(hints), area);
}
