use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem, ListState, Paragraph, Wrap},
    Frame,
};

use crate::app::{App, PipelineStatus};

pub fn draw(frame: &mut Frame, app: &App) {
    // Main horizontal split: 1/3 left, 2/3 right
    let main_chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Ratio(1, 3), // Left pane: blog list
            Constraint::Ratio(2, 3), // Right pane: article
        ])
        .split(frame.area());

    // Left pane: header + blog list + status
    let left_chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Title bar
            Constraint::Min(0),    // Blog list
            Constraint::Length(1), // Status line
        ])
        .split(main_chunks[0]);

    // Right pane: title + article content + status
    let right_chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Blog title
            Constraint::Min(0),    // Article content
            Constraint::Length(1), // Pipeline status
        ])
        .split(main_chunks[1]);

    // Render left pane
    render_header(frame, app, left_chunks[0]);
    render_blog_list(frame, app, left_chunks[1]);
    render_left_status(frame, left_chunks[2]);

    // Render right pane
    render_blog_title(frame, app, right_chunks[0]);
    render_article(frame, app, right_chunks[1]);
    render_pipeline_status(frame, app, right_chunks[2]);

    // Render input popups if active
    if app.url_input_active {
        render_url_input(frame, app);
    }
    if app.search_input_active {
        render_search_input(frame, app);
    }

    // Render help popup if active
    if app.show_help {
        render_help(frame);
    }
}

fn render_header(frame: &mut Frame, app: &App, area: Rect) {
    let total = app.blogs.len();
    let unread = app.blogs.iter().filter(|b| !b.read).count();

    let title = if app.search_results.is_some() {
        format!(" BlogStream [tags: {}] ", app.search_query)
    } else {
        " BlogStream ".to_string()
    };
    let stats = format!(" {} Blogs | {} Unread", total, unread);

    let block = Block::default()
        .title(title)
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Cyan));

    let inner = block.inner(area);
    frame.render_widget(block, area);

    let paragraph = Paragraph::new(stats).style(Style::default().fg(Color::White));
    frame.render_widget(paragraph, inner);
}

fn render_blog_list(frame: &mut Frame, app: &App, area: Rect) {
    let blogs = app.visible_blogs();

    let items: Vec<ListItem> = blogs
        .iter()
        .map(|blog| {
            let style = if blog.read {
                Style::default().fg(Color::DarkGray)
            } else {
                Style::default().fg(Color::White)
            };

            let marker = if blog.read { "  " } else { "● " };
            let created = blog
                .created_at
                .map(|dt| dt.format("%Y-%m-%d").to_string())
                .unwrap_or_else(|| "unknown".to_string());

            let line = Line::from(vec![
                Span::styled(marker, Style::default().fg(Color::Yellow)),
                Span::styled(format!("[{created}] "), Style::default().fg(Color::Blue)),
                Span::styled(blog.title.as_str(), style),
            ]);

            ListItem::new(line)
        })
        .collect();

    let empty_hint = if app.search_results.is_some() {
        " No blogs with those tags (Esc to clear) "
    } else {
        " No blogs yet - press n to create one "
    };

    let list = List::new(items)
        .block(Block::default().borders(Borders::ALL).title(if blogs.is_empty() {
            empty_hint
        } else {
            ""
        }))
        .highlight_style(
            Style::default()
                .bg(Color::DarkGray)
                .add_modifier(Modifier::BOLD),
        )
        .highlight_symbol("> ");

    let mut state = ListState::default();
    state.select(Some(app.selected_index));

    frame.render_stateful_widget(list, area, &mut state);
}

fn render_left_status(frame: &mut Frame, area: Rect) {
    let status = "j/k:nav  Enter:read  n:new  s:search  d:delete  ?:help  q:quit";
    let paragraph = Paragraph::new(status).style(Style::default().fg(Color::DarkGray));
    frame.render_widget(paragraph, area);
}

fn render_blog_title(frame: &mut Frame, app: &App, area: Rect) {
    let title = app
        .open_blog
        .as_ref()
        .map(|b| b.title.as_str())
        .unwrap_or("No blog open");

    let block = Block::default()
        .title(" Blog ")
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Green));

    let paragraph = Paragraph::new(title).block(block).wrap(Wrap { trim: true });

    frame.render_widget(paragraph, area);
}

fn render_article(frame: &mut Frame, app: &App, area: Rect) {
    let content = match (&app.open_blog, &app.pipeline_status) {
        (_, PipelineStatus::Running(stage)) => {
            format!("{} {}...", app.spinner_char(), stage.label())
        }
        (Some(blog), _) => blog.content.clone(),
        (None, PipelineStatus::Failed(e)) => format!("Error: {e}"),
        (None, PipelineStatus::NoApiKeys) => format!(
            "API keys not configured.\n\nAdd your keys to:\n{}\n\nExample:\nyoutube_api_key = \"AIza...\"\nopenai_api_key = \"sk-...\"",
            crate::config::Config::config_path().display()
        ),
        (None, _) => "Select a blog and press Enter to read it.".to_string(),
    };

    let block = Block::default()
        .title(" Article ")
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Magenta));

    let paragraph = Paragraph::new(content).block(block).wrap(Wrap { trim: true });

    frame.render_widget(paragraph, area);
}

fn render_pipeline_status(frame: &mut Frame, app: &App, area: Rect) {
    let status = match &app.pipeline_status {
        PipelineStatus::Idle => String::new(),
        PipelineStatus::Running(stage) => format!("⏳ {}...", stage.label()),
        PipelineStatus::Done => "✓ Blog saved".to_string(),
        PipelineStatus::Failed(e) => format!("❌ {e}"),
        PipelineStatus::NoApiKeys => "⚠️  No API keys configured".to_string(),
    };

    let paragraph = Paragraph::new(status).style(Style::default().fg(Color::DarkGray));
    frame.render_widget(paragraph, area);
}

fn render_url_input(frame: &mut Frame, app: &App) {
    let area = centered_rect(60, 20, frame.area());

    let block = Block::default()
        .title(" New Blog - Enter YouTube URL ")
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Yellow));

    let inner = block.inner(area);

    frame.render_widget(ratatui::widgets::Clear, area);
    frame.render_widget(block, area);

    let input_text = format!("> {}_", app.url_input);
    let paragraph = Paragraph::new(input_text).style(Style::default().fg(Color::White));
    frame.render_widget(paragraph, inner);
}

fn render_search_input(frame: &mut Frame, app: &App) {
    let area = centered_rect(60, 20, frame.area());

    let block = Block::default()
        .title(" Search Blogs - Enter tags (comma separated) ")
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Yellow));

    let inner = block.inner(area);

    frame.render_widget(ratatui::widgets::Clear, area);
    frame.render_widget(block, area);

    let input_text = format!("> {}_", app.search_input);
    let paragraph = Paragraph::new(input_text).style(Style::default().fg(Color::White));
    frame.render_widget(paragraph, inner);
}

fn render_help(frame: &mut Frame) {
    let area = centered_rect(50, 60, frame.area());

    let help_text = vec![
        "",
        " Navigation:",
        "   j / ↓    Move down",
        "   k / ↑    Move up",
        "   Enter    Open blog (marks it read)",
        "   Esc      Close blog / clear search",
        "",
        " Actions:",
        "   n        New blog from YouTube URL",
        "   s        Search blogs by tags",
        "   d        Delete blog",
        "",
        " General:",
        "   ?        Toggle this help",
        "   q        Quit",
        "",
        " Press any key to close",
    ];

    let block = Block::default()
        .title(" Help ")
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Cyan));

    let paragraph = Paragraph::new(help_text.join("\n"))
        .block(block)
        .style(Style::default().fg(Color::White));

    frame.render_widget(ratatui::widgets::Clear, area);
    frame.render_widget(paragraph, area);
}

fn centered_rect(percent_x: u16, percent_y: u16, r: Rect) -> Rect {
    let popup_layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(r);

    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(popup_layout[1])[1]
}
