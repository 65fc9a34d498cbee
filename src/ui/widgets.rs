use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph, Wrap},
    Frame,
};

use crate::app::App;
use crate::components::topic_form::SUGGESTIONS;
use crate::components::{AssetPanel, AssetPhase, ThemeView, TopicForm};

/// Parses `#RRGGBB` (or `RRGGBB`, or `#RGB`) into a terminal color.
pub fn parse_hex_color(hex: &str) -> Option<Color> {
    let digits = hex.trim().trim_start_matches('#');
    let expanded: String = match digits.len() {
        3 => digits.chars().flat_map(|c| [c, c]).collect(),
        6 => digits.to_string(),
        _ => return None,
    };
    if !expanded.chars().all(|c| c.is_ascii_hexdigit()) {
        return None;
    }
    let value = u32::from_str_radix(&expanded, 16).ok()?;
    let [_, r, g, b] = value.to_be_bytes();
    Some(Color::Rgb(r, g, b))
}

fn centered_rect(area: Rect, width: u16, height: u16) -> Rect {
    let x = (area.width.saturating_sub(width)) / 2;
    let y = (area.height.saturating_sub(height)) / 2;
    Rect {
        x: area.x + x,
        y: area.y + y,
        width: width.min(area.width),
        height: height.min(area.height),
    }
}

fn section_block(title: &str, color: Color) -> Block<'_> {
    Block::default()
        .borders(Borders::ALL)
        .title(Span::styled(
            format!(" {title} "),
            Style::default().fg(color).add_modifier(Modifier::BOLD),
        ))
        .border_style(Style::default().fg(Color::DarkGray))
}

pub fn render_input_screen(frame: &mut Frame, form: &TopicForm, is_loading: bool, area: Rect) {
    let available_width = area.width.saturating_sub(2).max(1) as usize;
    let input_lines: usize = if form.input.is_empty() {
        1
    } else {
        form.input
            .split('\n')
            .map(|line| line.chars().count().div_ceil(available_width).max(1))
            .sum()
    };
    let max_lines = (area.height as usize / 3).max(1);
    #[allow(clippy::cast_possible_truncation)]
    let input_height = (input_lines.min(max_lines) + 2) as u16;

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Fill(1),              // Banner
            Constraint::Length(input_height), // Topic input
            Constraint::Length(1),            // Status
            Constraint::Length(1),            // Gap
            Constraint::Length(1),            // Suggestions
            Constraint::Fill(1),              // Bottom padding
        ])
        .split(area);

    let banner = vec![
        Line::from(Span::styled(
            "Create something magical",
            Style::default().fg(Color::Magenta).add_modifier(Modifier::BOLD),
        )),
        Line::from(Span::styled(
            "Describe an event theme and get a full identity: concept, palette, playlist and artwork.",
            Style::default().fg(Color::Cyan),
        )),
        Line::from(""),
    ];
    let banner_height = 3;
    let banner_area = Rect {
        x: chunks[0].x,
        y: chunks[0].y + chunks[0].height.saturating_sub(banner_height),
        width: chunks[0].width,
        height: banner_height.min(chunks[0].height),
    };
    frame.render_widget(
        Paragraph::new(banner)
            .alignment(Alignment::Center)
            .wrap(Wrap { trim: true }),
        banner_area,
    );

    let (input_text, input_style) = if form.input.is_empty() {
        (
            "Describe your theme... (e.g. 80s party, beach wedding, startup launch)",
            Style::default().fg(Color::Gray),
        )
    } else {
        (
            form.input.as_str(),
            Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD),
        )
    };
    let border_color = if is_loading { Color::DarkGray } else { Color::Cyan };
    let input = Paragraph::new(input_text)
        .style(input_style)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(" Theme ")
                .border_style(Style::default().fg(border_color)),
        )
        .wrap(Wrap { trim: false });
    frame.render_widget(input, chunks[1]);

    let status = if is_loading {
        Span::styled(
            "Generating theme...",
            Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD),
        )
    } else if form.can_submit(false) {
        Span::styled("Enter: Generate", Style::default().fg(Color::Green))
    } else {
        Span::styled("Type a theme to get started", Style::default().fg(Color::DarkGray))
    };
    frame.render_widget(
        Paragraph::new(Line::from(status)).alignment(Alignment::Right),
        chunks[2],
    );

    let mut chips = vec![Span::styled("Try: ", Style::default().fg(Color::DarkGray))];
    for (i, suggestion) in SUGGESTIONS.iter().enumerate() {
        let style = if form.selected_suggestion() == Some(i) {
            Style::default().fg(Color::Black).bg(Color::Cyan)
        } else {
            Style::default().fg(Color::Gray)
        };
        chips.push(Span::styled(format!(" {suggestion} "), style));
        chips.push(Span::raw("  "));
    }
    frame.render_widget(
        Paragraph::new(Line::from(chips)).alignment(Alignment::Center),
        chunks[4],
    );
}

pub fn render_results_screen(frame: &mut Frame, view: &mut ThemeView, status: Option<&str>, area: Rect) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),  // Header
            Constraint::Length(10), // Concept + playlist
            Constraint::Length(8),  // Asset panels
            Constraint::Min(0),     // Ideas + tips
        ])
        .split(area);

    render_header(frame, view, status, chunks[0]);

    let top = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(66), Constraint::Percentage(34)])
        .split(chunks[1]);
    render_concept(frame, view, top[0]);
    render_playlist(frame, view, top[1]);

    let columns = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Ratio(1, 4); 4])
        .split(chunks[2]);
    for (i, panel) in view.panels().iter().enumerate() {
        render_asset_panel(frame, panel, i == view.selected(), columns[i]);
    }

    render_lists(frame, view, chunks[3]);
}

fn render_header(frame: &mut Frame, view: &ThemeView, status: Option<&str>, area: Rect) {
    let block = Block::default()
        .borders(Borders::BOTTOM)
        .border_style(Style::default().fg(Color::DarkGray));
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let title = Line::from(vec![
        Span::styled("← ", Style::default().fg(Color::DarkGray)),
        Span::styled(
            view.theme().title.clone(),
            Style::default().fg(Color::White).add_modifier(Modifier::BOLD),
        ),
    ]);
    frame.render_widget(Paragraph::new(title), inner);

    let mut right = Vec::new();
    if let Some(status) = status {
        right.push(Span::styled(format!("{status}  "), Style::default().fg(Color::Green)));
    }
    right.push(Span::styled(
        format!("THEME: {}", view.topic().to_uppercase()),
        Style::default().fg(Color::DarkGray),
    ));
    frame.render_widget(
        Paragraph::new(Line::from(right)).alignment(Alignment::Right),
        inner,
    );
}

fn render_concept(frame: &mut Frame, view: &ThemeView, area: Rect) {
    let theme = view.theme();
    let mut lines = vec![
        Line::from(Span::styled(theme.description.clone(), Style::default().fg(Color::Gray))),
        Line::from(""),
        Line::from(Span::styled(
            "COLOR PALETTE",
            Style::default().fg(Color::DarkGray).add_modifier(Modifier::BOLD),
        )),
    ];

    let mut swatches = Vec::new();
    let mut codes = Vec::new();
    for hex in &theme.color_palette {
        let color = parse_hex_color(hex).unwrap_or(Color::Reset);
        swatches.push(Span::styled("████████", Style::default().fg(color)));
        swatches.push(Span::raw(" "));
        codes.push(Span::styled(format!("{hex:<8}"), Style::default().fg(Color::DarkGray)));
        codes.push(Span::raw(" "));
    }
    lines.push(Line::from(swatches));
    lines.push(Line::from(codes));

    let concept = Paragraph::new(lines)
        .block(section_block("Concept", Color::Yellow))
        .wrap(Wrap { trim: false });
    frame.render_widget(concept, area);
}

fn render_playlist(frame: &mut Frame, view: &ThemeView, area: Rect) {
    let lines: Vec<Line> = view
        .theme()
        .music_playlist
        .iter()
        .enumerate()
        .map(|(i, song)| {
            Line::from(vec![
                Span::styled(format!("{:>2}. ", i + 1), Style::default().fg(Color::DarkGray)),
                Span::raw(song.clone()),
            ])
        })
        .collect();

    let playlist = Paragraph::new(lines)
        .block(section_block("Playlist Vibe", Color::Magenta))
        .wrap(Wrap { trim: true });
    frame.render_widget(playlist, area);
}

fn render_asset_panel(frame: &mut Frame, panel: &AssetPanel, selected: bool, area: Rect) {
    let category = panel.category();
    let border_color = if selected { Color::Cyan } else { Color::DarkGray };
    let block = Block::default()
        .borders(Borders::ALL)
        .title(format!(" {} {} ", category.icon(), category.label()))
        .border_style(Style::default().fg(border_color));

    let lines = match panel.phase() {
        AssetPhase::Loading => vec![
            Line::from(""),
            Line::from(Span::styled(
                "Creating art...",
                Style::default().fg(Color::Yellow).add_modifier(Modifier::ITALIC),
            )),
        ],
        AssetPhase::Failed => vec![
            Line::from(""),
            Line::from(Span::styled("Generation failed", Style::default().fg(Color::Red))),
            Line::from(Span::styled("r: try again", Style::default().fg(Color::DarkGray))),
        ],
        AssetPhase::Ready(data_uri) => {
            let mime = data_uri
                .strip_prefix("data:")
                .and_then(|rest| rest.split(';').next())
                .unwrap_or("image");
            // base64 expands 3 bytes into 4 characters
            let approx_kb = data_uri.len() * 3 / 4 / 1024;
            vec![
                Line::from(""),
                Line::from(Span::styled("Image ready", Style::default().fg(Color::Green))),
                Line::from(Span::styled(
                    format!("{mime}, ~{approx_kb} KB"),
                    Style::default().fg(Color::DarkGray),
                )),
                Line::from(Span::styled(
                    "d: save  r: regenerate",
                    Style::default().fg(Color::DarkGray),
                )),
            ]
        }
    };

    let widget = Paragraph::new(lines)
        .alignment(Alignment::Center)
        .block(block)
        .wrap(Wrap { trim: true });
    frame.render_widget(widget, area);
}

fn bullet_lines(items: &[String], bullet_color: Color) -> Vec<Line<'static>> {
    items
        .iter()
        .map(|item| {
            Line::from(vec![
                Span::styled("• ", Style::default().fg(bullet_color)),
                Span::raw(item.clone()),
            ])
        })
        .collect()
}

fn visual_height(lines: &[Line], width: usize) -> usize {
    lines
        .iter()
        .map(|line| line.width().div_ceil(width).max(1))
        .sum()
}

fn render_lists(frame: &mut Frame, view: &mut ThemeView, area: Rect) {
    let columns = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
        .split(area);

    let ideas = bullet_lines(&view.theme().event_ideas, Color::Blue);
    let tips = bullet_lines(&view.theme().decoration_tips, Color::Magenta);

    // Clamp the shared scroll to the taller of the two columns
    let inner_width = columns[0].width.saturating_sub(2).max(1) as usize;
    let total = visual_height(&ideas, inner_width).max(visual_height(&tips, inner_width));
    let visible = area.height.saturating_sub(2) as usize;
    let actual_scroll = view.scroll_offset.min(total.saturating_sub(visible));
    if view.scroll_offset != actual_scroll {
        view.scroll_offset = actual_scroll;
    }
    let scroll = (u16::try_from(actual_scroll).unwrap_or(u16::MAX), 0);

    frame.render_widget(
        Paragraph::new(ideas)
            .block(section_block("Activities & Ideas", Color::Yellow))
            .wrap(Wrap { trim: false })
            .scroll(scroll),
        columns[0],
    );
    frame.render_widget(
        Paragraph::new(tips)
            .block(section_block("Decoration Tips", Color::Magenta))
            .wrap(Wrap { trim: false })
            .scroll(scroll),
        columns[1],
    );
}

pub fn render_notice(frame: &mut Frame, notice: &str, area: Rect) {
    let width = u16::try_from(notice.chars().count())
        .unwrap_or(u16::MAX)
        .saturating_add(12)
        .min(area.width.saturating_sub(4));
    let popup_area = Rect {
        x: area.x + (area.width.saturating_sub(width)) / 2,
        y: area.y + 1,
        width,
        height: 3.min(area.height),
    };

    let toast = Paragraph::new(Line::from(vec![
        Span::styled(notice.to_string(), Style::default().fg(Color::White).add_modifier(Modifier::BOLD)),
        Span::styled("  Esc ✕", Style::default().fg(Color::Gray)),
    ]))
    .alignment(Alignment::Center)
    .block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::Red)),
    )
    .style(Style::default().bg(Color::Red));

    frame.render_widget(Clear, popup_area);
    frame.render_widget(toast, popup_area);
}

pub fn render_help_window(frame: &mut Frame, area: Rect) {
    let help_text = vec![
        Line::from(Span::styled(
            "ThemeForge - Keyboard Shortcuts",
            Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
        )),
        Line::from(""),
        Line::from(Span::styled("General:", Style::default().add_modifier(Modifier::BOLD))),
        Line::from("  Ctrl+H        - Show/hide this help"),
        Line::from("  Esc           - Dismiss error / go back"),
        Line::from("  Ctrl+Q        - Quit application"),
        Line::from("  Ctrl+C        - Quit (press twice)"),
        Line::from(""),
        Line::from(Span::styled("Theme input:", Style::default().add_modifier(Modifier::BOLD))),
        Line::from("  Enter         - Generate theme"),
        Line::from("  Alt+Enter     - New line"),
        Line::from("  Tab           - Next suggestion"),
        Line::from(""),
        Line::from(Span::styled("Results:", Style::default().add_modifier(Modifier::BOLD))),
        Line::from("  Left/Right    - Select asset"),
        Line::from("  r             - Regenerate selected asset"),
        Line::from("  d             - Save selected asset as PNG"),
        Line::from("  Up/Down       - Scroll ideas and tips"),
        Line::from("  Esc           - Back to theme input"),
        Line::from(""),
        Line::from(Span::styled(
            "Press Ctrl+H or Esc to close",
            Style::default().fg(Color::DarkGray),
        )),
    ];

    let help_paragraph = Paragraph::new(help_text)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(" Help ")
                .border_style(Style::default().fg(Color::Cyan)),
        )
        .wrap(Wrap { trim: false });

    let popup_area = centered_rect(area, 60, 24);
    frame.render_widget(Clear, popup_area);
    frame.render_widget(help_paragraph, popup_area);
}

pub fn render_bottom_bar(frame: &mut Frame, app: &App, area: Rect) {
    let (text, style) = if app.exit_pending {
        (
            "Press Ctrl+C again to exit, Esc to cancel",
            Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
        )
    } else if app.results_view().is_some() {
        (
            "Esc: Back | ←/→: Select | r: Regenerate | d: Save | Ctrl+H: Help",
            Style::default().fg(Color::DarkGray),
        )
    } else {
        (
            "Enter: Generate | Tab: Suggestion | Ctrl+H: Help | Ctrl+C: Quit",
            Style::default().fg(Color::DarkGray),
        )
    };

    let bar = Paragraph::new(text)
        .alignment(Alignment::Center)
        .style(style);

    frame.render_widget(bar, area);
}
