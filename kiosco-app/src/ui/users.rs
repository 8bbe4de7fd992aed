//! User management screen
//!
//! Read-mostly: list, client-side search and an edit modal for the
//! profile fields. Account creation stays on the public signup form.

use crate::ui::app::{App, Entity};
use crate::ui::widgets::{centered_rect, form_field, key_hints, notice_banner};
use crate::ui::Screen;
use crossterm::event::{Event, KeyCode, KeyEvent};
use ratatui::{prelude::*, widgets::*};
use shared::models::{User, UserUpdate};
use tui_input::backend::crossterm::EventHandler;
use tui_input::Input;

pub struct UserForm {
    pub id: i64,
    pub focus: usize,
    pub username: Input,
    pub full_name: Input,
    pub email: Input,
    pub phone: Input,
}

impl UserForm {
    const FIELDS: usize = 4;

    fn from_user(user: &User) -> Self {
        Self {
            id: user.id,
            focus: 0,
            username: Input::new(user.username.clone()),
            full_name: Input::new(user.full_name.clone()),
            email: Input::new(user.email.clone()),
            phone: Input::new(user.phone.clone().unwrap_or_default()),
        }
    }

    fn focused_input(&mut self) -> &mut Input {
        match self.focus {
            0 => &mut self.username,
            1 => &mut self.full_name,
            2 => &mut self.email,
            _ => &mut self.phone,
        }
    }
}

#[derive(Default)]
pub struct UsersView {
    pub users: Vec<User>,
    pub table: TableState,
    pub loading: bool,
    pub error: Option<String>,
    pub search: Input,
    pub searching: bool,
    pub form: Option<UserForm>,
}

impl UsersView {
    pub fn set_users(&mut self, users: Vec<User>) {
        self.users = users;
        let len = self.filtered().len();
        if len == 0 {
            self.table.select(None);
        } else if self.table.selected().is_none_or(|s| s >= len) {
            self.table.select(Some(0));
        }
    }

    pub fn filtered(&self) -> Vec<&User> {
        let term = self.search.value().trim().to_lowercase();
        self.users
            .iter()
            .filter(|u| {
                term.is_empty()
                    || u.username.to_lowercase().contains(&term)
                    || u.full_name.to_lowercase().contains(&term)
                    || u.email.to_lowercase().contains(&term)
            })
            .collect()
    }

    fn selected_user(&self) -> Option<&User> {
        let index = self.table.selected()?;
        self.filtered().get(index).copied()
    }
}

impl App {
    pub fn handle_users_key(&mut self, key: KeyEvent) {
        if self.users.form.is_some() {
            self.handle_user_form_key(key);
            return;
        }

        if self.users.searching {
            match key.code {
                KeyCode::Enter | KeyCode::Esc => self.users.searching = false,
                _ => {
                    self.users.search.handle_event(&Event::Key(key));
                    self.users.table.select(Some(0));
                }
            }
            return;
        }

        match key.code {
            KeyCode::Up => self.move_users_selection(-1),
            KeyCode::Down => self.move_users_selection(1),
            KeyCode::Char('e') | KeyCode::Enter => {
                if let Some(user) = self.users.selected_user() {
                    self.users.form = Some(UserForm::from_user(user));
                }
            }
            KeyCode::Char('/') => {
                self.users.search.reset();
                self.users.searching = true;
            }
            KeyCode::Char('r') => self.spawn_users_fetch(),
            KeyCode::Esc => self.navigate(Screen::Admin),
            _ => {
                self.handle_global_key(key);
            }
        }
    }

    fn move_users_selection(&mut self, delta: i64) {
        let len = self.users.filtered().len();
        if len == 0 {
            return;
        }
        let current = self.users.table.selected().unwrap_or(0) as i64;
        let next = (current + delta).clamp(0, len as i64 - 1) as usize;
        self.users.table.select(Some(next));
    }

    fn handle_user_form_key(&mut self, key: KeyEvent) {
        let Some(form) = self.users.form.as_mut() else {
            return;
        };
        match key.code {
            KeyCode::Esc => self.users.form = None,
            KeyCode::Tab | KeyCode::Down => form.focus = (form.focus + 1) % UserForm::FIELDS,
            KeyCode::BackTab | KeyCode::Up => {
                form.focus = (form.focus + UserForm::FIELDS - 1) % UserForm::FIELDS;
            }
            KeyCode::Enter => self.submit_user_form(),
            _ => {
                form.focused_input().handle_event(&Event::Key(key));
            }
        }
    }

    fn submit_user_form(&mut self) {
        let Some(form) = self.users.form.as_ref() else {
            return;
        };
        let username = form.username.value().trim().to_string();
        let email = form.email.value().trim().to_string();
        if username.is_empty() || email.is_empty() {
            self.notices.error("Usuario y email son obligatorios");
            return;
        }

        let id = form.id;
        let phone = form.phone.value().trim().to_string();
        let update = UserUpdate {
            username: Some(username),
            email: Some(email),
            full_name: Some(form.full_name.value().trim().to_string()),
            phone: (!phone.is_empty()).then_some(phone),
        };
        self.spawn_mutation(Entity::User, move |client| async move {
            client.update_user(id, &update).await.map(|_| ())
        });
        self.users.form = None;
    }

    pub fn draw_users(&mut self, f: &mut Frame) {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(3),
                Constraint::Length(1),
                Constraint::Min(1),
                Constraint::Length(1),
            ])
            .split(f.area());

        let status = if self.users.loading {
            Span::styled(" cargando... ", Style::default().fg(Color::Yellow))
        } else {
            Span::raw("")
        };
        let header = Paragraph::new(Line::from(vec![
            Span::styled(" 👥 Kiosco | Usuarios ", Style::default().fg(Color::Yellow)),
            status,
        ]))
        .block(Block::default().borders(Borders::ALL).border_style(Style::default().fg(Color::Cyan)));
        f.render_widget(header, chunks[0]);

        if let Some(notice) = self.notices.latest() {
            notice_banner(f, chunks[1], notice);
        }

        if let Some(error) = &self.users.error {
            let body = Paragraph::new(vec![
                Line::from(Span::styled(error.as_str(), Style::default().fg(Color::Red))),
                Line::from("Pulsa 'r' para recargar"),
            ])
            .block(Block::default().title(" Usuarios ").borders(Borders::ALL));
            f.render_widget(body, chunks[2]);
        } else {
            let rows: Vec<Row> = self
                .users
                .filtered()
                .iter()
                .map(|u| {
                    Row::new(vec![
                        u.id.to_string(),
                        u.username.clone(),
                        u.full_name.clone(),
                        u.email.clone(),
                        u.role.clone(),
                    ])
                })
                .collect();
            let table = Table::new(
                rows,
                [
                    Constraint::Length(5),
                    Constraint::Percentage(20),
                    Constraint::Percentage(30),
                    Constraint::Percentage(30),
                    Constraint::Percentage(15),
                ],
            )
            .header(
                Row::new(vec!["ID", "Usuario", "Nombre", "Email", "Rol"])
                    .style(Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD)),
            )
            .row_highlight_style(Style::default().bg(Color::DarkGray).add_modifier(Modifier::BOLD))
            .block(Block::default().title(" Usuarios ").borders(Borders::ALL));
            f.render_stateful_widget(table, chunks[2], &mut self.users.table);
        }

        let hints = if self.users.searching {
            "Escribe para filtrar | Enter/Esc terminar"
        } else {
            "e editar | / filtrar | r recargar | Esc panel"
        };
        key_hints(f, chunks[3], hints);

        if let Some(form) = &self.users.form {
            let lines = vec![
                form_field("Usuario", form.username.value(), form.focus == 0),
                form_field("Nombre", form.full_name.value(), form.focus == 1),
                form_field("Email", form.email.value(), form.focus == 2),
                form_field("Teléfono", form.phone.value(), form.focus == 3),
                Line::from(""),
                Line::from(Span::styled(
                    "Tab campo | Enter guardar | Esc cancelar",
                    Style::default().fg(Color::DarkGray),
                )),
            ];
            let area = centered_rect(60, 40, f.area());
            let body = Paragraph::new(lines).block(
                Block::default()
                    .title(" Editar Usuario ")
                    .borders(Borders::ALL)
                    .border_style(Style::default().fg(Color::Yellow)),
            );
            f.render_widget(Clear, area);
            f.render_widget(body, area);
        }
    }
}
