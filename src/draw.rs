use tui::backend::Backend;
use tui::layout::{Alignment, Constraint, Layout, Rect};
use tui::style::{Color, Modifier, Style};
use tui::text::{Line, Span};
use tui::widgets::{Block, BorderType, Borders, Paragraph, Tabs};
use tui::{Frame, Terminal};

use crate::app::{App, MenuItem};
use crate::components::board::{BracketBoard, BracketGrid, GroupCard};
use crate::state::app_state::{MatchSide, SetupPane, SetupState};
use crate::state::network::LoadingState;
use crate::ui::layout::LayoutAreas;
use chrono::Local;
use matchflow_api::Event;

static TABS: &[&str; 5] = &["Dashboard", "Events", "Setup", "Groups", "Teams"];

pub fn draw<B>(terminal: &mut Terminal<B>, app: &mut App, loading: LoadingState)
where
    B: Backend,
{
    let current_size = terminal.size().unwrap_or_default();
    if current_size.width <= 10 || current_size.height <= 10 {
        return;
    }

    let mut layout = LayoutAreas::new(current_size);

    terminal
        .draw(|f| {
            let full_area = f.area();
            if app.state.show_intro {
                draw_intro(f, full_area, app);
                return;
            }

            layout.update(full_area, app.settings.full_screen);

            if !app.settings.full_screen {
                draw_tabs(f, layout.tab_bar, app);
            }

            match app.state.active_tab {
                MenuItem::Dashboard => draw_dashboard(f, layout.main, app),
                MenuItem::Events => draw_events(f, layout.main, app),
                MenuItem::Setup => draw_setup(f, layout.main, app),
                MenuItem::Groups => draw_groups(f, layout.main, app),
                MenuItem::Teams => draw_teams(f, layout.main, app),
                MenuItem::Help => draw_help(f, layout.main),
            }

            if app.state.show_logs {
                draw_logs(f, layout.main);
            }

            if !app.settings.full_screen {
                draw_status_line(f, layout.status, app);
            }

            draw_loading_spinner(f, full_area, loading);
        })
        .unwrap();
}

pub fn default_border<'a>(color: Color) -> Block<'a> {
    Block::default()
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(Style::default().fg(color))
}

fn draw_intro(f: &mut Frame, area: Rect, app: &App) {
    let block = default_border(Color::DarkGray).title(" MatchFlow ");
    let inner = block.inner(area);
    f.render_widget(block, area);

    let [_top_pad, title_area, role_area, prompt_area, _bottom_pad] = Layout::vertical([
        Constraint::Fill(1),
        Constraint::Length(3),
        Constraint::Length(1),
        Constraint::Length(1),
        Constraint::Fill(1),
    ])
    .areas(inner);

    f.render_widget(
        Paragraph::new("MatchFlow\nTournament administration, in the terminal")
            .style(Style::default().fg(Color::Magenta).add_modifier(Modifier::BOLD))
            .alignment(Alignment::Center),
        title_area,
    );
    let role_line = match (&app.state.user_role, app.state.user_id) {
        (Some(role), Some(id)) => format!("signed in as user {id} ({role})"),
        (Some(role), None) => format!("signed in ({role})"),
        _ => "no token — read-only browsing".to_string(),
    };
    f.render_widget(
        Paragraph::new(role_line)
            .style(Style::default().fg(Color::DarkGray))
            .alignment(Alignment::Center),
        role_area,
    );
    f.render_widget(
        Paragraph::new("Press Enter to start")
            .style(Style::default().fg(Color::Gray))
            .alignment(Alignment::Center),
        prompt_area,
    );
}

fn draw_tabs(f: &mut Frame, tab_bar: [Rect; 2], app: &App) {
    let style = Style::default().fg(Color::White);
    let border_type = BorderType::Rounded;

    let tab_index = match app.state.active_tab {
        MenuItem::Dashboard => 0,
        MenuItem::Events => 1,
        MenuItem::Setup => 2,
        MenuItem::Groups => 3,
        MenuItem::Teams => 4,
        MenuItem::Help => 0,
    };

    let titles: Vec<Line> = TABS.iter().map(|t| Line::from(*t)).collect();
    let tabs = Tabs::new(titles)
        .block(
            Block::default()
                .borders(Borders::LEFT | Borders::BOTTOM | Borders::TOP)
                .border_type(border_type),
        )
        .highlight_style(Style::default().add_modifier(Modifier::UNDERLINED))
        .select(tab_index)
        .style(style);
    f.render_widget(tabs, tab_bar[0]);

    let help = Paragraph::new("Help: ? ")
        .alignment(Alignment::Right)
        .block(
            Block::default()
                .borders(Borders::RIGHT | Borders::BOTTOM | Borders::TOP)
                .border_type(border_type),
        )
        .style(style);
    f.render_widget(help, tab_bar[1]);
}

// ---------------------------------------------------------------------------
// Dashboard
// ---------------------------------------------------------------------------

fn draw_dashboard(f: &mut Frame, area: Rect, app: &App) {
    let block = default_border(Color::White).title(" Dashboard ");
    let inner = block.inner(area);
    f.render_widget(block, area);

    let [events_area, subs_area] =
        Layout::horizontal([Constraint::Percentage(60), Constraint::Percentage(40)]).areas(inner);

    draw_upcoming_events(f, events_area, app);
    draw_subscription_summary(f, subs_area, app);
}

fn draw_upcoming_events(f: &mut Frame, area: Rect, app: &App) {
    let today = Local::now().date_naive();
    let mut lines: Vec<Line> = vec![
        Line::from(Span::styled(
            "Upcoming events",
            Style::default().add_modifier(Modifier::BOLD),
        )),
        Line::from(""),
    ];

    let upcoming: Vec<(usize, &Event)> = app
        .state
        .events
        .events
        .iter()
        .enumerate()
        .filter(|(_, e)| e.is_upcoming(today))
        .collect();

    if upcoming.is_empty() {
        lines.push(Line::from(Span::styled(
            "No upcoming events.",
            Style::default().fg(Color::DarkGray),
        )));
    }
    for (idx, event) in upcoming {
        let selected = idx == app.state.events.selected;
        lines.push(event_line(event, selected, today));
    }

    f.render_widget(Paragraph::new(lines), area);
}

fn event_line<'a>(event: &'a Event, selected: bool, today: chrono::NaiveDate) -> Line<'a> {
    let marker = if selected { "> " } else { "  " };
    let date = event
        .start_date
        .map(|d| d.format("%Y-%m-%d").to_string())
        .unwrap_or_else(|| "TBD".to_string());
    let registration = if event.registration_open(today) { "open" } else { "closed" };
    let style = if selected {
        Style::default().fg(Color::White).add_modifier(Modifier::BOLD)
    } else {
        Style::default().fg(Color::Gray)
    };
    Line::from(vec![
        Span::styled(format!("{marker}{date}  "), Style::default().fg(Color::DarkGray)),
        Span::styled(event.name.clone(), style),
        Span::styled(
            format!("  [{}] registration {registration}", event.event_type),
            Style::default().fg(Color::DarkGray),
        ),
    ])
}

fn draw_subscription_summary(f: &mut Frame, area: Rect, app: &App) {
    let mut lines: Vec<Line> = vec![
        Line::from(Span::styled(
            "My registration",
            Style::default().add_modifier(Modifier::BOLD),
        )),
        Line::from(""),
    ];

    match &app.state.dashboard.subscription {
        None => lines.push(Line::from(Span::styled(
            "No tournament subscriptions yet.",
            Style::default().fg(Color::DarkGray),
        ))),
        Some(sub) => {
            lines.push(Line::from(format!(
                "Event {} — status: {}",
                sub.event_id,
                sub.status.label()
            )));
            for entry in &sub.categories {
                let partner = entry
                    .partner_preference
                    .as_deref()
                    .map(|p| format!("  (partner: {p})"))
                    .unwrap_or_default();
                lines.push(Line::from(format!("  - {}{partner}", entry.category_name)));
            }
            lines.push(Line::from(""));
            lines.push(Line::from(Span::styled(
                "w = withdraw from this event",
                Style::default().fg(Color::DarkGray),
            )));
        }
    }

    f.render_widget(Paragraph::new(lines), area);
}

// ---------------------------------------------------------------------------
// Events
// ---------------------------------------------------------------------------

fn draw_events(f: &mut Frame, area: Rect, app: &App) {
    let block = default_border(Color::White).title(" Events ");
    let inner = block.inner(area);
    f.render_widget(block, area);

    if app.state.events.events.is_empty() {
        let msg = if let Some(err) = app.state.last_error.as_deref() {
            format!("Event list failed to load:\n{err}")
        } else {
            "Loading events...".to_string()
        };
        f.render_widget(
            Paragraph::new(msg)
                .style(Style::default().fg(Color::DarkGray))
                .alignment(Alignment::Center),
            inner,
        );
        return;
    }

    let [legend, list] =
        Layout::vertical([Constraint::Length(1), Constraint::Fill(1)]).areas(inner);
    f.render_widget(
        Paragraph::new("Keys: j/k=move  Enter=open tournament  R=reload")
            .style(Style::default().fg(Color::DarkGray)),
        legend,
    );

    let today = Local::now().date_naive();
    let lines: Vec<Line> = app
        .state
        .events
        .events
        .iter()
        .enumerate()
        .map(|(idx, event)| event_line(event, idx == app.state.events.selected, today))
        .collect();
    f.render_widget(Paragraph::new(lines), list);
}

// ---------------------------------------------------------------------------
// Setup editor
// ---------------------------------------------------------------------------

fn draw_setup(f: &mut Frame, area: Rect, app: &App) {
    let block = default_border(Color::White).title(" Tournament Setup ");
    let inner = block.inner(area);
    f.render_widget(block, area);

    let setup = &app.state.setup;
    let warning_height = if setup.shape_feasible() { 0 } else { 1 };
    let [header, legend, warning, content] = Layout::vertical([
        Constraint::Length(1),
        Constraint::Length(1),
        Constraint::Length(warning_height),
        Constraint::Fill(1),
    ])
    .areas(inner);

    let category = app
        .state
        .categories
        .selected_category()
        .map(|c| format!("{} ({})", c.name, c.discipline.label()))
        .or_else(|| {
            app.state
                .categories
                .event_id
                .map(|id| format!("Event {id} — no category yet"))
        })
        .unwrap_or_else(|| "No category selected".to_string());
    let viewer_note = if app.has_creator_access() { "" } else { "  [viewer — edits stay local]" };
    f.render_widget(
        Paragraph::new(format!(
            "{category} | groups: {}  teams/group: {}  qualify/group: {}{viewer_note}",
            setup.group_count, setup.teams_per_group, setup.qualifiers_per_group
        )),
        header,
    );
    f.render_widget(
        Paragraph::new(
            "Keys: Tab=pane  h/j/k/l=move  Enter=edit  r=rename  g=+group  a=+slot  c=clear  \
             x=delete  b=rebuild  m=+match  f=+final  [ ] < > - + =shape  s/o=drafts",
        )
        .style(Style::default().fg(Color::DarkGray)),
        legend,
    );

    if warning_height > 0 {
        f.render_widget(
            Paragraph::new(format!(
                "Qualified teams = {}. Not a power of 2. Suggested bracket size: {}.",
                setup.qualified(),
                setup.bracket_size()
            ))
            .style(Style::default().fg(Color::Yellow)),
            warning,
        );
    }

    let [groups_area, bracket_area] =
        Layout::horizontal([Constraint::Length(32), Constraint::Fill(1)]).areas(content);
    draw_group_phase(f, groups_area, setup, true);
    draw_knockout_phase(f, bracket_area, setup);
}

fn draw_group_phase(f: &mut Frame, area: Rect, setup: &SetupState, compact: bool) {
    let selected_pane = setup.cursor.pane == SetupPane::Groups;
    let border_color = if selected_pane { Color::Magenta } else { Color::DarkGray };
    let block = default_border(border_color).title(" Group Phase ");
    let inner = block.inner(area);
    f.render_widget(block, area);

    if setup.groups.is_empty() {
        f.render_widget(
            Paragraph::new("No groups yet — press b to build the skeleton")
                .style(Style::default().fg(Color::DarkGray)),
            inner,
        );
        return;
    }

    if compact {
        // Single column: show the group under the cursor plus as many
        // following groups as fit.
        let mut y = inner.y;
        for (idx, group) in setup.groups.iter().enumerate().skip(setup.cursor.group) {
            let height = GroupCard::height(group).min((inner.y + inner.height).saturating_sub(y));
            if height < 2 {
                break;
            }
            let card_area = Rect::new(inner.x, y, inner.width, height);
            let selected_slot =
                (selected_pane && idx == setup.cursor.group).then_some(setup.cursor.slot);
            f.render_widget(GroupCard { group, selected_slot }, card_area);
            y += height + 1;
        }
    } else {
        // Grid of columns across the full width.
        let columns = (inner.width / 28).max(1) as usize;
        let column_width = inner.width / columns as u16;
        for (idx, group) in setup.groups.iter().enumerate() {
            let col = idx % columns;
            let row = idx / columns;
            let card_height = GroupCard::height(group) + 1;
            let y = inner.y + row as u16 * card_height;
            if y + 2 > inner.y + inner.height {
                break;
            }
            let card_area = Rect::new(
                inner.x + col as u16 * column_width,
                y,
                column_width.saturating_sub(2),
                card_height.min((inner.y + inner.height).saturating_sub(y)),
            );
            let selected_slot =
                (selected_pane && idx == setup.cursor.group).then_some(setup.cursor.slot);
            f.render_widget(GroupCard { group, selected_slot }, card_area);
        }
    }
}

fn draw_knockout_phase(f: &mut Frame, area: Rect, setup: &SetupState) {
    let selected_pane = setup.cursor.pane == SetupPane::Bracket;
    let border_color = if selected_pane { Color::Magenta } else { Color::DarkGray };
    let block = default_border(border_color).title(" Knockout Phase ");
    let inner = block.inner(area);
    f.render_widget(block, area);

    let rounds = setup.rounds();
    if rounds.is_empty() {
        f.render_widget(
            Paragraph::new("No bracket yet — press b to build the skeleton")
                .style(Style::default().fg(Color::DarkGray)),
            inner,
        );
        return;
    }

    let [labels_area, board_area] =
        Layout::vertical([Constraint::Length(1), Constraint::Fill(1)]).areas(inner);

    let counts: Vec<usize> = rounds.iter().map(|r| r.len()).collect();
    let grid = BracketGrid::compute(&counts, board_area.width);

    // Round labels above each column.
    for (d, round) in rounds.iter().enumerate() {
        let Some(first) = round.first() else { continue };
        let x = labels_area.x + grid.round_cols[d];
        if x >= labels_area.x + labels_area.width {
            break;
        }
        let avail = (labels_area.x + labels_area.width - x) as usize;
        let label: String = first.round.chars().take(avail).collect();
        let style = if selected_pane && d == setup.cursor.round {
            Style::default().fg(Color::White).add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(Color::DarkGray)
        };
        f.buffer_mut().set_string(x, labels_area.y, &label, style);
    }

    // Keep the selected match in view.
    let max_scroll = grid.total_height.saturating_sub(board_area.height);
    let scroll_offset = selected_pane
        .then(|| {
            grid.cells_for_round(setup.cursor.round)
                .get(setup.cursor.match_idx)
                .map(|cell| {
                    let bottom = cell.center_row + 2;
                    bottom.saturating_sub(board_area.height)
                })
                .unwrap_or(0)
        })
        .unwrap_or(0)
        .min(max_scroll);

    f.render_widget(
        BracketBoard {
            rounds: &rounds,
            grid: &grid,
            selected: selected_pane.then_some((setup.cursor.round, setup.cursor.match_idx)),
            selected_away: setup.cursor.side == MatchSide::Away,
            scroll_offset,
        },
        board_area,
    );
}

// ---------------------------------------------------------------------------
// Groups (full-width boards)
// ---------------------------------------------------------------------------

fn draw_groups(f: &mut Frame, area: Rect, app: &App) {
    let block = default_border(Color::White).title(" Groups ");
    let inner = block.inner(area);
    f.render_widget(block, area);

    let [legend, boards] =
        Layout::vertical([Constraint::Length(1), Constraint::Fill(1)]).areas(inner);
    f.render_widget(
        Paragraph::new("Keys: h/j/k/l=move  Enter=edit  r=rename  g=+group  a=+slot  c=clear  x=delete  s/o=drafts")
            .style(Style::default().fg(Color::DarkGray)),
        legend,
    );
    draw_group_phase(f, boards, &app.state.setup, false);
}

// ---------------------------------------------------------------------------
// Teams
// ---------------------------------------------------------------------------

fn draw_teams(f: &mut Frame, area: Rect, app: &App) {
    let block = default_border(Color::White).title(" Teams ");
    let inner = block.inner(area);
    f.render_widget(block, area);

    let [legend, list] =
        Layout::vertical([Constraint::Length(1), Constraint::Fill(1)]).areas(inner);
    f.render_widget(
        Paragraph::new("Keys: j/k=move  Enter=load for selected category  x=delete")
            .style(Style::default().fg(Color::DarkGray)),
        legend,
    );

    if app.state.teams.teams.is_empty() {
        let msg = match app.state.teams.category_id {
            Some(id) => format!("No teams registered for category {id} yet."),
            None => "No teams loaded. Select a category and press Enter.".to_string(),
        };
        f.render_widget(
            Paragraph::new(msg)
                .style(Style::default().fg(Color::DarkGray))
                .alignment(Alignment::Center),
            list,
        );
        return;
    }

    let lines: Vec<Line> = app
        .state
        .teams
        .teams
        .iter()
        .enumerate()
        .map(|(idx, team)| {
            let selected = idx == app.state.teams.selected;
            let marker = if selected { "> " } else { "  " };
            let style = if selected {
                Style::default().fg(Color::White).add_modifier(Modifier::BOLD)
            } else {
                Style::default().fg(Color::Gray)
            };
            let players = if team.players.is_empty() {
                String::new()
            } else {
                format!("  ({})", team.players.join(", "))
            };
            Line::from(vec![
                Span::styled(marker, Style::default().fg(Color::DarkGray)),
                Span::styled(team.name.clone(), style),
                Span::styled(players, Style::default().fg(Color::DarkGray)),
            ])
        })
        .collect();
    f.render_widget(Paragraph::new(lines), list);
}

// ---------------------------------------------------------------------------
// Help / status / chrome
// ---------------------------------------------------------------------------

fn draw_help(f: &mut Frame, area: Rect) {
    let block = default_border(Color::White).title(" Help ");
    let inner = block.inner(area);
    f.render_widget(block, area);

    let text = "q=quit  1=Dashboard  2=Events  3=Setup  4=Groups  5=Teams\n\
                \n\
                Events:  j/k=move  Enter=open tournament  R=reload\n\
                Setup:   Tab=switch pane  h/j/k/l=move  Enter=edit slot  r=rename\n\
                         g=add group  a=add slot  c=clear slot  x=delete\n\
                         b=rebuild skeletons  m=add match  f=add final-round match\n\
                         [ ]=group count  < >=teams per group  - +=qualifiers\n\
                         s=save drafts  o=load drafts  S=push group count to backend\n\
                Teams:   j/k=move  Enter=load  x=delete\n\
                Global:  z=full screen  \"=logs  ?=help  Esc=back";
    f.render_widget(Paragraph::new(text).style(Style::default().fg(Color::Gray)), inner);
}

fn draw_status_line(f: &mut Frame, area: Rect, app: &App) {
    if area.height == 0 {
        return;
    }
    let (text, style) = if let Some(editing) = &app.state.setup.editing {
        (
            format!(" edit: {}▏ (Enter=save, Esc=cancel)", editing.value),
            Style::default().fg(Color::White).add_modifier(Modifier::BOLD),
        )
    } else if let Some(err) = &app.state.last_error {
        (format!(" {err}"), Style::default().fg(Color::Red))
    } else if let Some(status) = &app.state.status {
        (format!(" {status}"), Style::default().fg(Color::Green))
    } else {
        let dirty = if app.state.setup.dirty { " [unsaved draft]" } else { "" };
        (format!(" ready{dirty}"), Style::default().fg(Color::DarkGray))
    };
    f.render_widget(Paragraph::new(text).style(style), area);
}

fn draw_logs(f: &mut Frame, area: Rect) {
    let [_, logs_area] =
        Layout::vertical([Constraint::Percentage(50), Constraint::Percentage(50)]).areas(area);
    let widget = tui_logger::TuiLoggerWidget::default()
        .block(default_border(Color::DarkGray).title(" Logs "))
        .style_error(Style::default().fg(Color::Red))
        .style_warn(Style::default().fg(Color::Yellow))
        .style_info(Style::default().fg(Color::Gray));
    f.render_widget(widget, logs_area);
}

fn draw_loading_spinner(f: &mut Frame, area: Rect, loading: LoadingState) {
    if loading.spinner_char == ' ' {
        return;
    }
    let x = area.x + area.width.saturating_sub(3);
    let spinner_area = Rect::new(x, area.y, 1, 1);
    f.render_widget(
        Paragraph::new(loading.spinner_char.to_string())
            .style(Style::default().fg(Color::Magenta)),
        spinner_area,
    );
}
