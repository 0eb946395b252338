use ratatui::{
    Frame,
    layout::{Alignment, Constraint, Layout, Rect},
    style::{Color, Modifier, Style, Stylize},
    text::{Line, Span, Text},
    widgets::{Block, Borders, Paragraph, Scrollbar, ScrollbarOrientation, ScrollbarState, Wrap},
};
use forum_core::Message;
use crate::app::{cursor_row_col, App, Field};

const GREEN: Color = Color::Rgb(74, 222, 128);
const DIM_GREEN: Color = Color::Rgb(134, 239, 172);
const DARK_GREEN: Color = Color::Rgb(21, 128, 61);
const SCANLINE: Color = Color::Rgb(0, 28, 0);

const CONTENT_INPUT_LINES: u16 = 3;

pub fn render(app: &mut App, frame: &mut Frame) {
    let area = frame.area();
    frame.render_widget(Block::default().style(Style::default().bg(Color::Black).fg(GREEN)), area);

    let error_height = if app.state.error().is_some() { 3 } else { 0 };

    // Header, error banner, message list, compose form, footer
    let [header_area, error_area, list_area, form_area, footer_area] = Layout::vertical([
        Constraint::Length(3),
        Constraint::Length(error_height),
        Constraint::Min(0),
        Constraint::Length(3 + CONTENT_INPUT_LINES + 2),
        Constraint::Length(1),
    ])
    .areas(area);

    render_header(app, frame, header_area);
    if let Some(error) = app.state.error() {
        render_error(error, frame, error_area);
    }
    render_messages(app, frame, list_area);
    render_form(app, frame, form_area);
    render_footer(app, frame, footer_area);
}

fn render_header(app: &App, frame: &mut Frame, area: Rect) {
    let title = Line::from(Span::styled(
        "H A C K E R   F O R U M",
        Style::default().fg(GREEN).add_modifier(Modifier::BOLD),
    ));
    let cursor = if app.animation_frame % 2 == 0 { "_" } else { " " };
    let subtitle = Line::from(vec![
        Span::styled("Conectado ao servidor principal...", Style::default().fg(DIM_GREEN)),
        Span::styled(cursor, Style::default().fg(DIM_GREEN)),
    ]);

    let header = Paragraph::new(vec![title, subtitle])
        .alignment(Alignment::Center)
        .block(
            Block::default()
                .borders(Borders::BOTTOM)
                .border_style(Style::default().fg(DARK_GREEN)),
        );
    frame.render_widget(header, area);
}

fn render_error(error: &str, frame: &mut Frame, area: Rect) {
    let banner = Paragraph::new(error)
        .style(Style::default().fg(Color::White).bg(Color::Rgb(127, 29, 29)))
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(Color::Red)),
        )
        .wrap(Wrap { trim: true });
    frame.render_widget(banner, area);
}

/// Greedy word wrap to `width` columns. Words longer than a line are split.
/// The message list is rendered from these lines as-is, so their count is
/// exactly what the list scrolls over.
fn wrap_line(text: &str, width: usize) -> Vec<String> {
    let width = width.max(1);
    let mut lines = Vec::new();
    let mut current = String::new();
    let mut current_len = 0;

    for word in text.split_whitespace() {
        let mut word: Vec<char> = word.chars().collect();

        if current_len > 0 && current_len + 1 + word.len() <= width {
            current.push(' ');
            current.extend(word.iter());
            current_len += 1 + word.len();
            continue;
        }

        if current_len > 0 {
            lines.push(std::mem::take(&mut current));
            current_len = 0;
        }
        while word.len() > width {
            let rest = word.split_off(width);
            lines.push(word.into_iter().collect());
            word = rest;
        }
        current_len = word.len();
        current = word.into_iter().collect();
    }

    if current_len > 0 || lines.is_empty() {
        lines.push(current);
    }
    lines
}

fn message_lines(msg: &Message, width: u16) -> Vec<Line<'static>> {
    let width = width as usize;
    let author = format!("user@{}", msg.username);
    let when = msg.display_timestamp();
    let author_style = Style::default().fg(DIM_GREEN).bold();
    let when_style = Style::default().fg(DIM_GREEN);

    let author_len = author.chars().count();
    let when_len = when.chars().count();

    let mut lines = Vec::new();
    if author_len + 1 + when_len <= width {
        let gap = width - author_len - when_len;
        lines.push(Line::from(vec![
            Span::styled(author, author_style),
            Span::raw(" ".repeat(gap)),
            Span::styled(when, when_style),
        ]));
    } else {
        // Long usernames get the timestamp on its own line
        lines.extend(wrap_line(&author, width).into_iter().map(|l| Line::from(Span::styled(l, author_style))));
        lines.extend(wrap_line(&when, width).into_iter().map(|l| Line::from(Span::styled(l, when_style))));
    }

    for text_line in msg.content.split('\n') {
        lines.extend(wrap_line(text_line, width).into_iter().map(Line::from));
    }
    lines.push(Line::default());
    lines
}

fn render_messages(app: &mut App, frame: &mut Frame, area: Rect) {
    app.list_area = Some(area);
    app.list_height = area.height.saturating_sub(2);
    let inner_width = area.width.saturating_sub(3);

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(DARK_GREEN))
        .title(format!(" ~/messages ({}) ", app.state.messages().len()));

    if app.state.is_loading() {
        let dots = ".".repeat((app.animation_frame as usize) + 1);
        let loading = Paragraph::new(format!("Carregando mensagens{}", dots))
            .alignment(Alignment::Center)
            .style(Style::default().fg(GREEN))
            .block(block);
        frame.render_widget(loading, area);
        app.total_list_lines = 0;
        return;
    }

    if app.state.messages().is_empty() {
        let empty = Paragraph::new("Nenhuma mensagem encontrada. Seja o primeiro a postar!")
            .alignment(Alignment::Center)
            .style(Style::default().fg(GREEN).add_modifier(Modifier::ITALIC))
            .block(block);
        frame.render_widget(empty, area);
        app.total_list_lines = 0;
        return;
    }

    let lines: Vec<Line> = app
        .state
        .messages()
        .iter()
        .flat_map(|msg| message_lines(msg, inner_width))
        .collect();
    let total = u16::try_from(lines.len()).unwrap_or(u16::MAX);
    app.total_list_lines = total;
    app.list_scroll = app.list_scroll.min(total.saturating_sub(app.list_height));

    let list = Paragraph::new(Text::from(lines))
        .block(block)
        .scroll((app.list_scroll, 0));
    frame.render_widget(list, area);

    // Scan line drifting down the list, background only
    if app.list_height > 0 {
        let row = area.y + 1 + app.scanline % app.list_height;
        let line = Rect::new(area.x + 1, row, area.width.saturating_sub(2), 1);
        frame.buffer_mut().set_style(line, Style::default().bg(SCANLINE));
    }

    if total > app.list_height {
        let mut scrollbar_state = ScrollbarState::new(total.saturating_sub(app.list_height) as usize)
            .position(app.list_scroll as usize);
        frame.render_stateful_widget(
            Scrollbar::new(ScrollbarOrientation::VerticalRight)
                .style(Style::default().fg(DARK_GREEN)),
            area,
            &mut scrollbar_state,
        );
    }
}

fn input_block(title: &'static str, focused: bool) -> Block<'static> {
    let border = if focused { GREEN } else { DARK_GREEN };
    Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(border))
        .title(title)
}

fn render_form(app: &App, frame: &mut Frame, area: Rect) {
    let [username_row, content_area] = Layout::vertical([
        Constraint::Length(3),
        Constraint::Length(CONTENT_INPUT_LINES + 2),
    ])
    .areas(area);

    let [username_area, send_area] = Layout::horizontal([
        Constraint::Min(0),
        Constraint::Length(10),
    ])
    .areas(username_row);

    let form = &app.state.form;

    // Username: single line with horizontal scrolling to keep the cursor visible
    let username_focused = app.focus == Field::Username;
    let inner_width = username_area.width.saturating_sub(2) as usize;
    let scroll_offset = if inner_width == 0 {
        0
    } else {
        (app.username_cursor + 1).saturating_sub(inner_width)
    };
    let username_text = if form.username.is_empty() {
        Text::from(Span::styled("Username", Style::default().fg(Color::DarkGray)))
    } else {
        Text::from(
            form.username
                .chars()
                .skip(scroll_offset)
                .take(inner_width)
                .collect::<String>(),
        )
    };
    frame.render_widget(
        Paragraph::new(username_text)
            .style(Style::default().fg(GREEN))
            .block(input_block(" user ", username_focused)),
        username_area,
    );

    let in_flight = app.state.in_flight_count();
    let send_label = if in_flight > 0 {
        format!("Send ({})", in_flight)
    } else {
        "Send".to_string()
    };
    frame.render_widget(
        Paragraph::new(send_label)
            .alignment(Alignment::Center)
            .style(Style::default().fg(Color::Black).bg(DARK_GREEN).bold())
            .block(Block::default().borders(Borders::ALL).border_style(Style::default().fg(DARK_GREEN))),
        send_area,
    );

    // Content: multi-line, scrolled so the cursor row stays visible
    let content_focused = app.focus == Field::Content;
    let (cursor_row, cursor_col) = cursor_row_col(&form.content, app.content_cursor);
    let visible_rows = CONTENT_INPUT_LINES as usize;
    let row_offset = (cursor_row + 1).saturating_sub(visible_rows);
    let content_width = content_area.width.saturating_sub(2) as usize;
    let col_offset = if content_width == 0 {
        0
    } else {
        (cursor_col + 1).saturating_sub(content_width)
    };

    let content_text = if form.content.is_empty() {
        Text::from(Span::styled(
            "Digite sua mensagem... [ENTER] para enviar",
            Style::default().fg(Color::DarkGray),
        ))
    } else {
        Text::from(
            form.content
                .split('\n')
                .skip(row_offset)
                .take(visible_rows)
                .map(|line| Line::from(line.chars().skip(col_offset).take(content_width).collect::<String>()))
                .collect::<Vec<_>>(),
        )
    };
    frame.render_widget(
        Paragraph::new(content_text)
            .style(Style::default().fg(GREEN))
            .block(input_block(" message ", content_focused)),
        content_area,
    );

    if username_focused {
        let x = (app.username_cursor - scroll_offset) as u16;
        frame.set_cursor_position((username_area.x + 1 + x, username_area.y + 1));
    } else {
        let x = (cursor_col - col_offset) as u16;
        let y = (cursor_row - row_offset) as u16;
        frame.set_cursor_position((content_area.x + 1 + x, content_area.y + 1 + y));
    }
}

fn render_footer(app: &App, frame: &mut Frame, area: Rect) {
    let hints = Line::from(vec![
        Span::styled(" ENTER ", Style::default().bg(DARK_GREEN).fg(Color::Black)),
        Span::raw(" send  "),
        Span::styled(" ALT+ENTER ", Style::default().bg(DARK_GREEN).fg(Color::Black)),
        Span::raw(" newline  "),
        Span::styled(" TAB ", Style::default().bg(DARK_GREEN).fg(Color::Black)),
        Span::raw(" switch field  "),
        Span::styled(" PGUP/PGDN ", Style::default().bg(DARK_GREEN).fg(Color::Black)),
        Span::raw(" scroll  "),
        Span::styled(" ESC ", Style::default().bg(DARK_GREEN).fg(Color::Black)),
        Span::raw(" quit  "),
        Span::styled(app.endpoint().to_string(), Style::default().fg(Color::DarkGray)),
    ]);
    frame.render_widget(Paragraph::new(hints).style(Style::default().fg(DIM_GREEN)), area);
}
