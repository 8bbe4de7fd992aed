//! Sales history screen
//!
//! Sale table with a revenue stats panel, a line-item detail modal and
//! record deletion. Stats are recomputed from the fetched list; the
//! backend is never asked for aggregates.

use crate::state::stats::{self, SalesStats};
use crate::ui::app::{App, Entity};
use crate::ui::widgets::{centered_rect, key_hints, money, notice_banner};
use crate::ui::Screen;
use chrono::Utc;
use crossterm::event::{KeyCode, KeyEvent};
use ratatui::{prelude::*, widgets::*};
use shared::models::Sale;

#[derive(Default)]
pub struct SalesView {
    pub sales: Vec<Sale>,
    pub stats: SalesStats,
    pub table: TableState,
    pub loading: bool,
    pub error: Option<String>,
    pub detail: Option<Sale>,
    pub confirm_delete: Option<i64>,
}

impl SalesView {
    pub fn set_sales(&mut self, sales: Vec<Sale>) {
        self.stats = stats::compute(&sales, Utc::now());
        self.sales = sales;
        let len = self.sales.len();
        if len == 0 {
            self.table.select(None);
        } else if self.table.selected().is_none_or(|s| s >= len) {
            self.table.select(Some(0));
        }
    }

    fn selected_sale(&self) -> Option<&Sale> {
        self.sales.get(self.table.selected()?)
    }
}

impl App {
    pub fn handle_sales_key(&mut self, key: KeyEvent) {
        if self.sales.detail.is_some() {
            self.sales.detail = None;
            return;
        }

        if let Some(id) = self.sales.confirm_delete {
            match key.code {
                KeyCode::Char('y') | KeyCode::Enter => {
                    self.sales.confirm_delete = None;
                    self.spawn_mutation(Entity::Sale, move |client| async move {
                        client.delete_sale(id).await
                    });
                }
                _ => self.sales.confirm_delete = None,
            }
            return;
        }

        match key.code {
            KeyCode::Up => self.move_sales_selection(-1),
            KeyCode::Down => self.move_sales_selection(1),
            KeyCode::Enter | KeyCode::Char('v') => {
                self.sales.detail = self.sales.selected_sale().cloned();
            }
            KeyCode::Char('d') => {
                self.sales.confirm_delete = self.sales.selected_sale().and_then(|s| s.id);
            }
            KeyCode::Char('r') => self.spawn_sales_fetch(),
            KeyCode::Esc => self.navigate(Screen::Admin),
            _ => {
                self.handle_global_key(key);
            }
        }
    }

    fn move_sales_selection(&mut self, delta: i64) {
        let len = self.sales.sales.len();
        if len == 0 {
            return;
        }
        let current = self.sales.table.selected().unwrap_or(0) as i64;
        let next = (current + delta).clamp(0, len as i64 - 1) as usize;
        self.sales.table.select(Some(next));
    }

    pub fn draw_sales(&mut self, f: &mut Frame) {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(3),
                Constraint::Length(1),
                Constraint::Min(1),
                Constraint::Length(1),
            ])
            .split(f.area());

        let status = if self.sales.loading {
            Span::styled(" cargando... ", Style::default().fg(Color::Yellow))
        } else {
            Span::raw("")
        };
        let header = Paragraph::new(Line::from(vec![
            Span::styled(" 💰 Kiosco | Ventas ", Style::default().fg(Color::Yellow)),
            status,
        ]))
        .block(Block::default().borders(Borders::ALL).border_style(Style::default().fg(Color::Cyan)));
        f.render_widget(header, chunks[0]);

        if let Some(notice) = self.notices.latest() {
            notice_banner(f, chunks[1], notice);
        }

        let panes = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Percentage(68), Constraint::Percentage(32)])
            .split(chunks[2]);

        if let Some(error) = &self.sales.error {
            let body = Paragraph::new(vec![
                Line::from(Span::styled(error.as_str(), Style::default().fg(Color::Red))),
                Line::from("Pulsa 'r' para recargar"),
            ])
            .block(Block::default().title(" Ventas ").borders(Borders::ALL));
            f.render_widget(body, panes[0]);
        } else {
            let rows: Vec<Row> = self
                .sales
                .sales
                .iter()
                .map(|s| {
                    Row::new(vec![
                        s.id.map(|id| id.to_string()).unwrap_or_else(|| "-".to_string()),
                        s.date.clone().unwrap_or_else(|| "-".to_string()),
                        s.items.len().to_string(),
                        money(s.total),
                    ])
                })
                .collect();
            let table = Table::new(
                rows,
                [
                    Constraint::Length(7),
                    Constraint::Percentage(45),
                    Constraint::Length(8),
                    Constraint::Length(12),
                ],
            )
            .header(
                Row::new(vec!["ID", "Fecha", "Líneas", "Total"])
                    .style(Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD)),
            )
            .row_highlight_style(Style::default().bg(Color::DarkGray).add_modifier(Modifier::BOLD))
            .block(Block::default().title(" Ventas ").borders(Borders::ALL));
            f.render_stateful_widget(table, panes[0], &mut self.sales.table);
        }

        let stats = &self.sales.stats;
        let stats_text = vec![
            Line::from(vec![
                Span::raw("Hoy:       "),
                Span::styled(money(stats.today), Style::default().fg(Color::Green)),
            ]),
            Line::from(vec![
                Span::raw("Este mes:  "),
                Span::styled(money(stats.month), Style::default().fg(Color::Green)),
            ]),
            Line::from(vec![
                Span::raw("Este año:  "),
                Span::styled(money(stats.year), Style::default().fg(Color::Green)),
            ]),
            Line::from(""),
            Line::from(vec![
                Span::raw("Ventas:    "),
                Span::styled(stats.count.to_string(), Style::default().fg(Color::Yellow)),
            ]),
            Line::from(vec![
                Span::raw("Promedio:  "),
                Span::styled(money(stats.average), Style::default().fg(Color::Yellow)),
            ]),
            Line::from(vec![
                Span::raw("Total:     "),
                Span::styled(
                    money(stats.total),
                    Style::default().fg(Color::Green).add_modifier(Modifier::BOLD),
                ),
            ]),
        ];
        let stats_panel = Paragraph::new(stats_text).block(
            Block::default()
                .title(" Resumen ")
                .borders(Borders::ALL)
                .border_style(Style::default().fg(Color::Magenta)),
        );
        f.render_widget(stats_panel, panes[1]);

        key_hints(
            f,
            chunks[3],
            "Enter detalle | d eliminar | r recargar | Esc panel",
        );

        if self.sales.confirm_delete.is_some() {
            let area = centered_rect(44, 20, f.area());
            let body = Paragraph::new(vec![
                Line::from("¿Eliminar este registro de venta?"),
                Line::from("y confirmar | cualquier otra tecla cancela"),
            ])
            .alignment(Alignment::Center)
            .block(
                Block::default()
                    .title(" Confirmar ")
                    .borders(Borders::ALL)
                    .border_style(Style::default().fg(Color::Red)),
            );
            f.render_widget(Clear, area);
            f.render_widget(body, area);
        }

        if let Some(sale) = &self.sales.detail {
            let mut lines = vec![Line::from(format!(
                "Venta {} | {}",
                sale.id.map(|id| format!("#{}", id)).unwrap_or_else(|| "-".to_string()),
                sale.date.as_deref().unwrap_or("-"),
            ))];
            lines.push(Line::from(""));
            for item in &sale.items {
                lines.push(Line::from(format!(
                    "producto {} x{} @ {} = {}",
                    item.product_id,
                    item.quantity,
                    money(item.unit_price),
                    money(item.subtotal)
                )));
            }
            lines.push(Line::from(""));
            lines.push(Line::from(Span::styled(
                format!("Total: {}", money(sale.total)),
                Style::default().fg(Color::Green).add_modifier(Modifier::BOLD),
            )));
            let area = centered_rect(60, 60, f.area());
            let body = Paragraph::new(lines).block(
                Block::default()
                    .title(" Detalle de Venta ")
                    .borders(Borders::ALL)
                    .border_style(Style::default().fg(Color::Yellow)),
            );
            f.render_widget(Clear, area);
            f.render_widget(body, area);
        }
    }
}
