use crate::app::{App, MenuItem};
use crate::state::app_state::{SetupPane, SetupState};
use crate::state::messages::NetworkRequest;
use crossterm::event::KeyCode::Char;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use std::sync::Arc;
use tokio::sync::{Mutex, mpsc};

pub async fn handle_key_bindings(
    key_event: KeyEvent,
    app: &Arc<Mutex<App>>,
    network_requests: &mpsc::Sender<NetworkRequest>,
) {
    let mut guard = app.lock().await;

    if guard.state.show_intro {
        match (key_event.code, key_event.modifiers) {
            (KeyCode::Enter, _) => guard.dismiss_intro(),
            (Char('q'), _) | (Char('c'), KeyModifiers::CONTROL) => {
                crate::cleanup_terminal();
                std::process::exit(0);
            }
            _ => {}
        }
        return;
    }

    // Inline editor swallows everything except commit/cancel.
    if guard.state.setup.editing.is_some() {
        handle_edit_mode(key_event, &mut guard.state.setup);
        return;
    }

    match (guard.state.active_tab, key_event.code, key_event.modifiers) {
        // Quit
        (_, Char('q'), _) | (_, Char('c'), KeyModifiers::CONTROL) => {
            crate::cleanup_terminal();
            std::process::exit(0);
        }

        // Tab switching
        (_, Char('1'), _) => guard.update_tab(MenuItem::Dashboard),
        (_, Char('2'), _) => guard.update_tab(MenuItem::Events),
        (_, Char('3'), _) => guard.update_tab(MenuItem::Setup),
        (_, Char('4'), _) => guard.update_tab(MenuItem::Groups),
        (_, Char('5'), _) => guard.update_tab(MenuItem::Teams),
        (_, Char('?'), _) => guard.update_tab(MenuItem::Help),
        (MenuItem::Help, KeyCode::Esc, _) => guard.exit_help(),

        // Events list
        (MenuItem::Events | MenuItem::Dashboard, Char('j') | KeyCode::Down, _) => {
            guard.state.events.navigate_down();
        }
        (MenuItem::Events | MenuItem::Dashboard, Char('k') | KeyCode::Up, _) => {
            guard.state.events.navigate_up();
        }
        // Open the selected event: pull its categories and registration.
        (MenuItem::Events | MenuItem::Dashboard, KeyCode::Enter, _) => {
            if let Some(event_id) = guard.selected_event_id() {
                guard.state.setup.category_id = None;
                guard.update_tab(MenuItem::Setup);
                drop(guard);
                let _ = network_requests
                    .send(NetworkRequest::LoadCategories { event_id })
                    .await;
                let _ = network_requests
                    .send(NetworkRequest::LoadSubscription { event_id })
                    .await;
                return;
            }
        }
        (MenuItem::Dashboard, Char('w'), _) => {
            if let Some(event_id) = guard.selected_event_id() {
                drop(guard);
                let _ = network_requests
                    .send(NetworkRequest::WithdrawSubscription { event_id })
                    .await;
                return;
            }
        }
        (MenuItem::Events | MenuItem::Dashboard, Char('R'), _) => {
            drop(guard);
            let _ = network_requests.send(NetworkRequest::LoadEvents).await;
            return;
        }

        // Setup editor — navigation
        (MenuItem::Setup | MenuItem::Groups, Char('h') | KeyCode::Left, _) => {
            guard.state.setup.cursor_left();
        }
        (MenuItem::Setup | MenuItem::Groups, Char('l') | KeyCode::Right, _) => {
            guard.state.setup.cursor_right();
        }
        (MenuItem::Setup | MenuItem::Groups, Char('j') | KeyCode::Down, _) => {
            guard.state.setup.cursor_down();
        }
        (MenuItem::Setup | MenuItem::Groups, Char('k') | KeyCode::Up, _) => {
            guard.state.setup.cursor_up();
        }
        (MenuItem::Setup, KeyCode::Tab, _) => guard.state.setup.toggle_pane(),

        // Setup editor — shape parameters
        (MenuItem::Setup, Char(']'), _) => guard.state.setup.adjust_group_count(1),
        (MenuItem::Setup, Char('['), _) => guard.state.setup.adjust_group_count(-1),
        (MenuItem::Setup, Char('+') | Char('='), _) => guard.state.setup.adjust_qualifiers(1),
        (MenuItem::Setup, Char('-'), _) => guard.state.setup.adjust_qualifiers(-1),
        (MenuItem::Setup, Char('>'), _) => guard.state.setup.adjust_teams_per_group(1),
        (MenuItem::Setup, Char('<'), _) => guard.state.setup.adjust_teams_per_group(-1),

        // Setup editor — structure mutations
        (MenuItem::Setup | MenuItem::Groups, Char('g'), KeyModifiers::NONE) => {
            guard.state.setup.add_group();
        }
        (MenuItem::Setup | MenuItem::Groups, Char('b'), _) => {
            guard.state.setup.regenerate();
            guard.state.status = Some("Skeletons regenerated".to_string());
        }
        (MenuItem::Setup, Char('m'), _) => guard.state.setup.add_single_match(),
        (MenuItem::Setup, Char('f'), KeyModifiers::NONE) => {
            guard.state.setup.add_final_match();
        }
        (MenuItem::Setup | MenuItem::Groups, Char('a'), _) => {
            if let Some(id) = guard.state.setup.cursor_group().map(|g| g.id.clone()) {
                guard.state.setup.add_team_slot(&id);
            }
        }
        (MenuItem::Setup | MenuItem::Groups, Char('x'), _) => {
            delete_under_cursor(&mut guard);
        }
        (MenuItem::Setup | MenuItem::Groups, Char('c'), KeyModifiers::NONE) => {
            if guard.state.setup.cursor.pane == SetupPane::Groups
                && let Some(id) = guard.state.setup.cursor_group().map(|g| g.id.clone())
            {
                let slot = guard.state.setup.cursor.slot;
                guard.state.setup.clear_group_slot(&id, slot);
            }
        }
        (MenuItem::Setup | MenuItem::Groups, KeyCode::Enter, _) => {
            guard.state.setup.begin_edit();
        }
        (MenuItem::Setup | MenuItem::Groups, Char('r'), KeyModifiers::NONE) => {
            guard.state.setup.begin_rename();
        }

        // Push the locally edited group count back to the backend category.
        (MenuItem::Setup, Char('S'), _) => {
            let category = guard.state.categories.selected_category().cloned().map(|mut c| {
                c.groups = guard.state.setup.group_count as u32;
                c
            });
            if let Some(category) = category {
                drop(guard);
                let _ = network_requests
                    .send(NetworkRequest::SaveCategory { category })
                    .await;
                return;
            }
        }

        // Drafts
        (MenuItem::Setup | MenuItem::Groups, Char('s'), _) => {
            if let Err(e) = guard.save_drafts() {
                guard.state.last_error = Some(e);
            }
        }
        (MenuItem::Setup | MenuItem::Groups, Char('o'), _) => match guard.load_drafts() {
            Ok(true) => guard.state.status = Some("Draft loaded".to_string()),
            Ok(false) => guard.state.status = Some("No draft on disk".to_string()),
            Err(e) => guard.state.last_error = Some(e),
        },

        // Teams
        (MenuItem::Teams, Char('j') | KeyCode::Down, _) => guard.state.teams.navigate_down(),
        (MenuItem::Teams, Char('k') | KeyCode::Up, _) => guard.state.teams.navigate_up(),
        (MenuItem::Teams, KeyCode::Enter, _) => {
            if let Some(category_id) = guard.selected_category_id() {
                drop(guard);
                let _ = network_requests
                    .send(NetworkRequest::LoadTeams { category_id })
                    .await;
                return;
            }
        }
        (MenuItem::Teams, Char('x'), _) => {
            let target = guard
                .state
                .teams
                .selected_team()
                .map(|t| (t.id, t.category_id));
            if let Some((team_id, category_id)) = target {
                drop(guard);
                let _ = network_requests
                    .send(NetworkRequest::DeleteTeam { team_id, category_id })
                    .await;
                return;
            }
        }

        // Global
        (_, Char('z'), _) => guard.toggle_full_screen(),
        (_, Char('"'), _) => guard.toggle_show_logs(),

        _ => {}
    }
}

/// Keystrokes while the inline editor is open.
fn handle_edit_mode(key_event: KeyEvent, setup: &mut SetupState) {
    match key_event.code {
        KeyCode::Enter => setup.commit_edit(),
        KeyCode::Esc => setup.cancel_edit(),
        KeyCode::Backspace => {
            if let Some(buffer) = setup.editing.as_mut() {
                buffer.backspace();
            }
        }
        Char(c) => {
            if let Some(buffer) = setup.editing.as_mut() {
                buffer.push_char(c);
            }
        }
        _ => {}
    }
}

fn delete_under_cursor(app: &mut App) {
    match app.state.setup.cursor.pane {
        SetupPane::Groups => {
            if let Some(id) = app.state.setup.cursor_group().map(|g| g.id.clone()) {
                if !app.state.setup.delete_group(&id) {
                    app.state.status = Some("Cannot delete the last group".to_string());
                }
            }
        }
        SetupPane::Bracket => {
            if let Some(id) = app.state.setup.cursor_match().map(|m| m.id.clone()) {
                app.state.setup.delete_match(&id);
            }
        }
    }
}
