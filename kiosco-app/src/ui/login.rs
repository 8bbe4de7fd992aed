//! Login / signup screen
//!
//! Two modes share one form: login asks for username and password,
//! signup adds the buyer profile fields. Keys follow the normal/editing
//! split used everywhere else; Enter submits from any field.

use crate::ui::app::App;
use crate::ui::widgets::{centered_rect, form_field, key_hints, notice_banner};
use crossterm::event::{Event, KeyCode, KeyEvent};
use ratatui::{prelude::*, widgets::*};
use shared::models::RegisterRequest;
use tui_input::backend::crossterm::EventHandler;
use tui_input::Input;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum AuthMode {
    #[default]
    Login,
    Register,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum InputMode {
    #[default]
    Normal,
    Editing,
}

#[derive(Default)]
pub struct LoginView {
    pub mode: AuthMode,
    pub input_mode: InputMode,
    pub focus: usize,
    pub username: Input,
    pub password: Input,
    pub confirm: Input,
    pub full_name: Input,
    pub email: Input,
    pub phone: Input,
    pub busy: bool,
}

impl LoginView {
    fn field_count(&self) -> usize {
        match self.mode {
            AuthMode::Login => 2,
            AuthMode::Register => 6,
        }
    }

    fn focused_input(&mut self) -> &mut Input {
        match (self.mode, self.focus) {
            (_, 0) => &mut self.username,
            (AuthMode::Login, _) => &mut self.password,
            (AuthMode::Register, 1) => &mut self.full_name,
            (AuthMode::Register, 2) => &mut self.email,
            (AuthMode::Register, 3) => &mut self.phone,
            (AuthMode::Register, 4) => &mut self.password,
            (AuthMode::Register, _) => &mut self.confirm,
        }
    }

    pub fn reset(&mut self) {
        *self = Self::default();
    }

    pub fn switch_to_login(&mut self) {
        self.mode = AuthMode::Login;
        self.focus = 0;
        self.password.reset();
        self.confirm.reset();
    }
}

impl App {
    pub fn handle_login_key(&mut self, key: KeyEvent) {
        match self.login.input_mode {
            InputMode::Normal => match key.code {
                KeyCode::Char('e') | KeyCode::Enter => {
                    self.login.input_mode = InputMode::Editing;
                }
                KeyCode::Char('r') => {
                    self.login.mode = match self.login.mode {
                        AuthMode::Login => AuthMode::Register,
                        AuthMode::Register => AuthMode::Login,
                    };
                    self.login.focus = 0;
                }
                KeyCode::Esc => self.navigate(crate::ui::Screen::Store),
                _ => {
                    self.handle_global_key(key);
                }
            },
            InputMode::Editing => match key.code {
                KeyCode::Esc => self.login.input_mode = InputMode::Normal,
                KeyCode::Tab | KeyCode::Down => {
                    self.login.focus = (self.login.focus + 1) % self.login.field_count();
                }
                KeyCode::BackTab | KeyCode::Up => {
                    let count = self.login.field_count();
                    self.login.focus = (self.login.focus + count - 1) % count;
                }
                KeyCode::Enter => self.submit_auth_form(),
                _ => {
                    self.login.focused_input().handle_event(&Event::Key(key));
                }
            },
        }
    }

    fn submit_auth_form(&mut self) {
        if self.login.busy {
            return;
        }
        let username = self.login.username.value().trim().to_string();
        let password = self.login.password.value().to_string();
        if username.is_empty() || password.is_empty() {
            self.notices.error("Usuario y contraseña son obligatorios");
            return;
        }

        match self.login.mode {
            AuthMode::Login => {
                self.login.busy = true;
                self.spawn_login(username, password);
            }
            AuthMode::Register => {
                let email = self.login.email.value().trim().to_string();
                let full_name = self.login.full_name.value().trim().to_string();
                if email.is_empty() || full_name.is_empty() {
                    self.notices.error("Nombre completo y email son obligatorios");
                    return;
                }
                if self.login.confirm.value() != password {
                    self.notices.error("Las contraseñas no coinciden");
                    return;
                }
                self.login.busy = true;
                self.spawn_register(RegisterRequest {
                    username,
                    full_name,
                    email,
                    phone: self.login.phone.value().trim().to_string(),
                    password,
                });
            }
        }
    }

    pub fn draw_login(&mut self, f: &mut Frame) {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(3),
                Constraint::Length(1),
                Constraint::Min(1),
                Constraint::Length(1),
            ])
            .split(f.area());

        let title = match self.login.mode {
            AuthMode::Login => " Kiosco | Iniciar Sesión ",
            AuthMode::Register => " Kiosco | Crear Cuenta ",
        };
        let header = Paragraph::new(Line::from(vec![
            Span::styled(title, Style::default().fg(Color::Yellow)),
            if self.login.busy {
                Span::styled(" enviando... ", Style::default().fg(Color::Cyan))
            } else {
                Span::raw("")
            },
        ]))
        .block(Block::default().borders(Borders::ALL).border_style(Style::default().fg(Color::Cyan)));
        f.render_widget(header, chunks[0]);

        if let Some(notice) = self.notices.latest() {
            notice_banner(f, chunks[1], notice);
        }

        let editing = self.login.input_mode == InputMode::Editing;
        let focus = self.login.focus;
        let masked = "*".repeat(self.login.password.value().chars().count());
        let masked_confirm = "*".repeat(self.login.confirm.value().chars().count());

        let mut lines = vec![form_field(
            "Usuario",
            self.login.username.value(),
            editing && focus == 0,
        )];
        if self.login.mode == AuthMode::Register {
            lines.push(form_field("Nombre", self.login.full_name.value(), editing && focus == 1));
            lines.push(form_field("Email", self.login.email.value(), editing && focus == 2));
            lines.push(form_field("Teléfono", self.login.phone.value(), editing && focus == 3));
            lines.push(form_field("Contraseña", &masked, editing && focus == 4));
            lines.push(form_field("Confirmar", &masked_confirm, editing && focus == 5));
        } else {
            lines.push(form_field("Contraseña", &masked, editing && focus == 1));
        }

        let area = centered_rect(60, 50, chunks[2]);
        let form = Paragraph::new(lines).block(
            Block::default()
                .title(title)
                .borders(Borders::ALL)
                .border_style(Style::default().fg(Color::Yellow)),
        );
        f.render_widget(Clear, area);
        f.render_widget(form, area);

        let hints = match self.login.input_mode {
            InputMode::Normal => "e editar | r login/registro | Esc tienda | q salir",
            InputMode::Editing => "Tab campo siguiente | Enter enviar | Esc terminar edición",
        };
        key_hints(f, chunks[3], hints);
    }
}
