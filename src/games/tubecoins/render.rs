//! TubeCoins screen: balance header, tap button, upgrades, production,
//! achievements, and the notice log.

use std::cell::RefCell;
use std::rc::Rc;

use ratzilla::ratatui::layout::{Alignment, Constraint, Direction, Layout, Rect};
use ratzilla::ratatui::style::{Color, Modifier, Style};
use ratzilla::ratatui::text::{Line, Span};
use ratzilla::ratatui::widgets::{Block, Borders, Paragraph, Wrap};
use ratzilla::ratatui::Frame;

use crate::input::{is_narrow_layout, ClickState};
use crate::widgets::{progress_bar, ClickableList};

use super::actions::{
    BUY_AUTO_UPGRADE, BUY_TAP_UPGRADE, PUBLISH_VIDEO_BASE, RESET_PROGRESS, START_VIDEO, TAP,
};
use super::feed::Feed;
use super::ladder::{self, Track};
use super::logic::format_number;
use super::state::{EconomyState, ProductionState};

/// Videos listed in the production panel, oldest first; the rest wait below.
const MAX_LISTED_VIDEOS: usize = 5;

pub fn render(
    state: &EconomyState,
    feed: &Feed,
    f: &mut Frame,
    area: Rect,
    click_state: &Rc<RefCell<ClickState>>,
) {
    let (main_area, log_area) = if area.width >= 80 {
        let h = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Percentage(58), Constraint::Percentage(42)])
            .split(area);
        (h[0], Some(h[1]))
    } else {
        (area, None)
    };

    let upgrades = upgrade_list(state);
    let production = production_list(state);
    let achievements = achievement_lines(state);

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Length(5),
            Constraint::Length(upgrades.len() as u16 + 2),
            Constraint::Min(production.len().min(4) as u16 + 2),
            Constraint::Length(achievements.len() as u16 + 2),
            Constraint::Length(3),
        ])
        .split(main_area);

    render_header(state, f, chunks[0]);
    render_tap_button(state, f, chunks[1], click_state);
    render_panel(f, chunks[2], upgrades, " Улучшения ", Color::Magenta, click_state);
    render_panel(f, chunks[3], production, " Студия ", Color::Red, click_state);
    render_achievements(f, chunks[4], achievements);
    render_help(f, chunks[5], is_narrow_layout(area.width), click_state);

    if let Some(log_area) = log_area {
        render_log(feed, f, log_area);
    }
}

fn render_header(state: &EconomyState, f: &mut Frame, area: Rect) {
    let line = Line::from(vec![
        Span::styled(
            format!(" 💰 {} ", format_number(state.display_balance())),
            Style::default()
                .fg(Color::Yellow)
                .add_modifier(Modifier::BOLD),
        ),
        Span::styled(
            format!(" +{}/сек ", format_number(state.auto_yield_per_second)),
            Style::default().fg(Color::Green),
        ),
        Span::styled(
            format!(" тапов: {}", format_number(state.total_taps)),
            Style::default().fg(Color::DarkGray),
        ),
    ]);
    let widget = Paragraph::new(line).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::Yellow))
            .title(" TubeCoins "),
    );
    f.render_widget(widget, area);
}

fn render_tap_button(
    state: &EconomyState,
    f: &mut Frame,
    area: Rect,
    click_state: &Rc<RefCell<ClickState>>,
) {
    let lines = vec![
        Line::from(Span::styled(
            "▶ ТАП ◀",
            Style::default()
                .fg(Color::White)
                .add_modifier(Modifier::BOLD),
        )),
        Line::from(Span::styled(
            format!("+{} за тап  [Space]", format_number(state.tap_yield)),
            Style::default().fg(Color::Gray),
        )),
    ];
    let widget = Paragraph::new(lines).alignment(Alignment::Center).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::Red)),
    );
    f.render_widget(widget, area);
    click_state.borrow_mut().add_click_target(area, TAP);
}

fn upgrade_line(state: &EconomyState, track: Track, key: char) -> Line<'static> {
    let level = state.level(track);
    let current = state.yield_of(track);
    let next = ladder::next_yield(track, level, current);
    let cost = state.cost_of(track);
    let affordable = state.display_balance() >= cost;
    let (name, unit) = match track {
        Track::Tap => ("Сила тапа", "/тап"),
        Track::AutoIncome => ("Автодоход", "/сек"),
    };
    let cost_style = if affordable {
        Style::default().fg(Color::Green)
    } else {
        Style::default().fg(Color::DarkGray)
    };
    Line::from(vec![
        Span::styled(
            format!(" [{}] ", key),
            Style::default()
                .fg(Color::Yellow)
                .add_modifier(Modifier::BOLD),
        ),
        Span::raw(format!(
            "{} ур.{}: {}{} → {}{} ",
            name,
            level,
            format_number(current),
            unit,
            format_number(next),
            unit
        )),
        Span::styled(format!("💰{}", format_number(cost)), cost_style),
    ])
}

fn upgrade_list(state: &EconomyState) -> ClickableList<'static> {
    let mut cl = ClickableList::new();
    cl.push_clickable(upgrade_line(state, Track::Tap, '1'), BUY_TAP_UPGRADE);
    cl.push_clickable(upgrade_line(state, Track::AutoIncome, '2'), BUY_AUTO_UPGRADE);
    cl
}

fn production_list(state: &EconomyState) -> ClickableList<'static> {
    let mut cl = ClickableList::new();
    match state.production {
        ProductionState::Idle => cl.push_clickable(
            Line::from(vec![
                Span::styled(
                    " [V] ",
                    Style::default()
                        .fg(Color::Yellow)
                        .add_modifier(Modifier::BOLD),
                ),
                Span::raw("Снять новое видео"),
            ]),
            START_VIDEO,
        ),
        ProductionState::InProgress { progress } => cl.push(Line::from(vec![
            Span::raw(" 🎬 "),
            Span::styled(progress_bar(progress, 20), Style::default().fg(Color::Red)),
            Span::raw(format!(" {}%", progress)),
        ])),
    }

    for (idx, video) in state.videos.iter().enumerate().take(MAX_LISTED_VIDEOS) {
        let line = Line::from(vec![
            Span::styled(" ▶ ", Style::default().fg(Color::Green)),
            Span::raw(format!("{} ", video.title)),
            Span::styled(
                format!("+{}", format_number(video.reward_coins)),
                Style::default().fg(Color::Yellow),
            ),
            Span::styled(" опубликовать", Style::default().fg(Color::DarkGray)),
        ]);
        cl.push_clickable(line, PUBLISH_VIDEO_BASE + idx as u16);
    }
    let hidden = state.videos.len().saturating_sub(MAX_LISTED_VIDEOS);
    if hidden > 0 {
        cl.push(Line::from(Span::styled(
            format!("   …ещё {} в очереди", hidden),
            Style::default().fg(Color::DarkGray),
        )));
    }
    cl
}

fn achievement_lines(state: &EconomyState) -> Vec<Line<'static>> {
    state
        .achievements
        .iter()
        .map(|a| {
            if a.unlocked {
                Line::from(Span::styled(
                    format!(" ★ {}: {}", a.title, a.description),
                    Style::default().fg(Color::Yellow),
                ))
            } else {
                Line::from(Span::styled(
                    format!(
                        " ☆ {} ({}/{})",
                        a.title,
                        format_number(state.total_taps.min(a.target)),
                        format_number(a.target)
                    ),
                    Style::default().fg(Color::DarkGray),
                ))
            }
        })
        .collect()
}

fn render_panel(
    f: &mut Frame,
    area: Rect,
    cl: ClickableList<'static>,
    title: &'static str,
    color: Color,
    click_state: &Rc<RefCell<ClickState>>,
) {
    cl.register_targets(area, &mut click_state.borrow_mut(), 1, 1);
    let widget = Paragraph::new(cl.into_lines()).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(color))
            .title(title),
    );
    f.render_widget(widget, area);
}

fn render_achievements(f: &mut Frame, area: Rect, lines: Vec<Line<'static>>) {
    let widget = Paragraph::new(lines).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::Cyan))
            .title(" Достижения "),
    );
    f.render_widget(widget, area);
}

fn render_log(feed: &Feed, f: &mut Frame, area: Rect) {
    let visible = area.height.saturating_sub(2) as usize;
    let lines: Vec<Line> = feed
        .latest(visible)
        .iter()
        .map(|entry| {
            let style = if entry.is_important {
                Style::default()
                    .fg(Color::Yellow)
                    .add_modifier(Modifier::BOLD)
            } else {
                Style::default().fg(Color::Gray)
            };
            Line::from(Span::styled(entry.text.as_str(), style))
        })
        .collect();
    let widget = Paragraph::new(lines)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(Color::Blue))
                .title(" Лента "),
        )
        .wrap(Wrap { trim: false });
    f.render_widget(widget, area);
}

fn render_help(
    f: &mut Frame,
    area: Rect,
    narrow: bool,
    click_state: &Rc<RefCell<ClickState>>,
) {
    let text = if narrow {
        "[R] сброс"
    } else {
        "Space тап · 1/2 улучшения · V видео · P опубликовать · [R] сброс"
    };
    let widget = Paragraph::new(Line::from(Span::styled(
        text,
        Style::default().fg(Color::DarkGray),
    )))
    .alignment(Alignment::Center)
    .block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::DarkGray)),
    );
    f.render_widget(widget, area);
    click_state.borrow_mut().add_click_target(area, RESET_PROGRESS);
}
