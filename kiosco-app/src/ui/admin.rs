//! Admin console menu
//!
//! Entry point to the management screens plus a live log pane for
//! watching backend traffic while operating.

use crate::ui::app::App;
use crate::ui::widgets::{key_hints, notice_banner};
use crate::ui::Screen;
use crossterm::event::{KeyCode, KeyEvent};
use ratatui::{prelude::*, widgets::*};
use tui_logger::{TuiLoggerLevelOutput, TuiLoggerWidget, TuiWidgetEvent, TuiWidgetState};

const MENU: &[(&str, Screen)] = &[
    ("Inventario", Screen::Inventory),
    ("Usuarios", Screen::Users),
    ("Ventas", Screen::Sales),
    ("Tienda", Screen::Store),
];

pub struct AdminView {
    pub selected: usize,
    pub logger_state: TuiWidgetState,
}

impl Default for AdminView {
    fn default() -> Self {
        Self {
            selected: 0,
            logger_state: TuiWidgetState::new(),
        }
    }
}

impl App {
    pub fn handle_admin_key(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Up => {
                self.admin_view.selected = self.admin_view.selected.saturating_sub(1);
            }
            KeyCode::Down => {
                if self.admin_view.selected + 1 < MENU.len() {
                    self.admin_view.selected += 1;
                }
            }
            KeyCode::Enter => {
                let (_, screen) = MENU[self.admin_view.selected];
                self.navigate(screen);
            }
            KeyCode::PageUp => self.admin_view.logger_state.transition(TuiWidgetEvent::PrevPageKey),
            KeyCode::PageDown => self.admin_view.logger_state.transition(TuiWidgetEvent::NextPageKey),
            KeyCode::Esc => self.navigate(Screen::Store),
            _ => {
                self.handle_global_key(key);
            }
        }
    }

    pub fn draw_admin(&mut self, f: &mut Frame) {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(3),
                Constraint::Length(1),
                Constraint::Min(1),
                Constraint::Length(1),
            ])
            .split(f.area());

        let label = self.session_label();
        let header = Paragraph::new(Line::from(vec![
            Span::styled(" ⚙ Kiosco | Administración ", Style::default().fg(Color::Yellow)),
            Span::raw(format!("| {} ", label)),
        ]))
        .block(Block::default().borders(Borders::ALL).border_style(Style::default().fg(Color::Cyan)));
        f.render_widget(header, chunks[0]);

        if let Some(notice) = self.notices.latest() {
            notice_banner(f, chunks[1], notice);
        }

        let panes = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Percentage(30), Constraint::Percentage(70)])
            .split(chunks[2]);

        let items: Vec<ListItem> = MENU
            .iter()
            .enumerate()
            .map(|(i, (name, _))| {
                let style = if i == self.admin_view.selected {
                    Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD)
                } else {
                    Style::default()
                };
                ListItem::new(Span::styled(format!("  {}", name), style))
            })
            .collect();
        let menu = List::new(items).block(
            Block::default()
                .title(" Panel ")
                .borders(Borders::ALL)
                .border_style(Style::default().fg(Color::Magenta)),
        );
        f.render_widget(menu, panes[0]);

        let logs = TuiLoggerWidget::default()
            .block(
                Block::default()
                    .title(" Actividad ")
                    .borders(Borders::ALL)
                    .border_style(Style::default().fg(Color::White).add_modifier(Modifier::DIM)),
            )
            .output_separator('|')
            .output_timestamp(Some("%H:%M:%S".to_string()))
            .output_level(Some(TuiLoggerLevelOutput::Abbreviated))
            .output_target(false)
            .output_file(false)
            .output_line(false)
            .style(Style::default().fg(Color::White))
            .state(&self.admin_view.logger_state);
        f.render_widget(logs, panes[1]);

        key_hints(
            f,
            chunks[3],
            "↑/↓ y Enter | PgUp/PgDn logs | Esc tienda | l cerrar sesión | q salir",
        );
    }
}
