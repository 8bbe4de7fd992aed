//! Storefront screen
//!
//! Catalog table with category and search filters, the cart panel and
//! the checkout confirmation flow. The receipt overlays everything
//! until dismissed.

use crate::state::checkout::CheckoutState;
use crate::ui::app::App;
use crate::ui::widgets::{centered_rect, key_hints, money, notice_banner};
use crossterm::event::{Event, KeyCode, KeyEvent};
use ratatui::{prelude::*, widgets::*};
use tui_input::backend::crossterm::EventHandler;
use tui_input::Input;

#[derive(Default)]
pub struct StoreView {
    pub table: TableState,
    pub cart_open: bool,
    pub cart_selected: usize,
    pub search: Input,
    pub searching: bool,
    pub confirming: bool,
    /// Index into the category cycle; 0 means no category filter.
    pub category_index: usize,
}

impl App {
    pub fn handle_store_key(&mut self, key: KeyEvent) {
        // The receipt swallows every key until dismissed.
        if matches!(self.checkout, CheckoutState::Succeeded(_)) {
            self.checkout = CheckoutState::Idle;
            return;
        }

        if self.store_view.searching {
            match key.code {
                KeyCode::Enter => {
                    let term = self.store_view.search.value().trim().to_string();
                    self.filter.search = (!term.is_empty()).then_some(term);
                    self.store_view.searching = false;
                    self.spawn_catalog_fetch();
                }
                KeyCode::Esc => self.store_view.searching = false,
                _ => {
                    self.store_view.search.handle_event(&Event::Key(key));
                }
            }
            return;
        }

        if self.store_view.confirming {
            match key.code {
                KeyCode::Char('y') | KeyCode::Enter => {
                    self.store_view.confirming = false;
                    self.submit_checkout();
                }
                KeyCode::Char('n') | KeyCode::Esc => self.store_view.confirming = false,
                _ => {}
            }
            return;
        }

        if self.store_view.cart_open {
            self.handle_cart_key(key);
            return;
        }

        match key.code {
            KeyCode::Up => self.select_product(-1),
            KeyCode::Down => self.select_product(1),
            KeyCode::Char('a') | KeyCode::Enter => self.add_selected_to_cart(),
            KeyCode::Char('c') => {
                self.store_view.cart_open = true;
                self.store_view.cart_selected = 0;
            }
            KeyCode::Char('f') => self.cycle_category(),
            KeyCode::Char('/') => {
                self.store_view.search.reset();
                self.store_view.searching = true;
            }
            KeyCode::Char('r') => self.spawn_catalog_fetch(),
            KeyCode::Char('o') => self.open_checkout_confirm(),
            _ => {
                self.handle_global_key(key);
            }
        }
    }

    fn handle_cart_key(&mut self, key: KeyEvent) {
        let ids: Vec<String> = self.cart.lines().map(|l| l.id.clone()).collect();
        let selected_id = ids.get(self.store_view.cart_selected).cloned();

        match key.code {
            KeyCode::Esc | KeyCode::Char('c') => self.store_view.cart_open = false,
            KeyCode::Up => {
                self.store_view.cart_selected = self.store_view.cart_selected.saturating_sub(1);
            }
            KeyCode::Down => {
                if self.store_view.cart_selected + 1 < ids.len() {
                    self.store_view.cart_selected += 1;
                }
            }
            KeyCode::Char('+') => {
                if let Some(id) = selected_id {
                    let stock = self.catalog.find(&id).map(|p| p.stock);
                    if let Err(err) = self.cart.increment(&mut self.store, &id, stock) {
                        self.notices.error(err.to_string());
                    }
                }
            }
            KeyCode::Char('-') => {
                if let Some(id) = selected_id {
                    if let Err(err) = self.cart.decrement(&mut self.store, &id) {
                        self.notices.error(err.to_string());
                    }
                    self.clamp_cart_selection();
                }
            }
            KeyCode::Char('d') => {
                if let Some(id) = selected_id {
                    if let Err(err) = self.cart.remove(&mut self.store, &id) {
                        self.notices.error(err.to_string());
                    }
                    self.clamp_cart_selection();
                }
            }
            KeyCode::Char('e') => {
                if let Err(err) = self.cart.clear(&mut self.store) {
                    self.notices.error(err.to_string());
                }
                self.store_view.cart_selected = 0;
            }
            KeyCode::Char('o') => self.open_checkout_confirm(),
            KeyCode::Char('q') => self.should_quit = true,
            _ => {}
        }
    }

    fn clamp_cart_selection(&mut self) {
        let len = self.cart.len();
        if len == 0 {
            self.store_view.cart_selected = 0;
        } else if self.store_view.cart_selected >= len {
            self.store_view.cart_selected = len - 1;
        }
    }

    fn open_checkout_confirm(&mut self) {
        if self.cart.is_empty() {
            self.notices.error("El carrito está vacío");
            return;
        }
        if matches!(self.checkout, CheckoutState::Submitting) {
            return;
        }
        self.store_view.confirming = true;
    }

    fn select_product(&mut self, delta: i64) {
        let len = self.catalog.products().len();
        if len == 0 {
            return;
        }
        let current = self.store_view.table.selected().unwrap_or(0) as i64;
        let next = (current + delta).clamp(0, len as i64 - 1) as usize;
        self.store_view.table.select(Some(next));
    }

    fn add_selected_to_cart(&mut self) {
        let Some(index) = self.store_view.table.selected() else {
            self.notices.info("Selecciona un producto con ↑/↓");
            return;
        };
        let Some(product) = self.catalog.products().get(index).cloned() else {
            return;
        };
        match self.cart.add(&mut self.store, &product) {
            Ok(quantity) => self
                .notices
                .success(format!("{} x{} en el carrito", product.name, quantity)),
            Err(err) => self.notices.error(err.to_string()),
        }
    }

    fn cycle_category(&mut self) {
        let categories = self.catalog.categories();
        let cycle_len = categories.len() + 1;
        self.store_view.category_index = (self.store_view.category_index + 1) % cycle_len;
        self.filter.category = if self.store_view.category_index == 0 {
            None
        } else {
            categories.get(self.store_view.category_index - 1).cloned()
        };
        self.spawn_catalog_fetch();
    }

    pub fn draw_store(&mut self, f: &mut Frame) {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(3),
                Constraint::Length(1),
                Constraint::Min(1),
                Constraint::Length(1),
            ])
            .split(f.area());

        self.draw_store_header(f, chunks[0]);

        if let Some(notice) = self.notices.latest() {
            notice_banner(f, chunks[1], notice);
        }

        if self.store_view.cart_open {
            let panes = Layout::default()
                .direction(Direction::Horizontal)
                .constraints([Constraint::Percentage(60), Constraint::Percentage(40)])
                .split(chunks[2]);
            self.draw_product_table(f, panes[0]);
            self.draw_cart_panel(f, panes[1]);
        } else {
            self.draw_product_table(f, chunks[2]);
        }

        let hints = if self.store_view.searching {
            "Escribe el término | Enter buscar | Esc cancelar"
        } else if self.store_view.cart_open {
            "+/- cantidad | d quitar | e vaciar | o comprar | Esc cerrar"
        } else {
            "a añadir | c carrito | f categoría | / buscar | o comprar | l sesión | q salir"
        };
        key_hints(f, chunks[3], hints);

        if self.store_view.confirming {
            self.draw_checkout_confirm(f);
        }
        if let CheckoutState::Succeeded(receipt) = &self.checkout {
            let receipt = receipt.clone();
            self.draw_receipt(f, &receipt);
        }
    }

    fn draw_store_header(&mut self, f: &mut Frame, area: Rect) {
        let label = self.session_label();
        let filter_text = match (&self.filter.category, &self.filter.search) {
            (None, None) => String::new(),
            (category, search) => format!(
                " [{}{}]",
                category.as_deref().unwrap_or("todas"),
                search
                    .as_deref()
                    .map(|s| format!(" \"{}\"", s))
                    .unwrap_or_default()
            ),
        };
        let status = if self.catalog.is_loading() {
            Span::styled(" cargando... ", Style::default().fg(Color::Yellow))
        } else if matches!(self.checkout, CheckoutState::Submitting) {
            Span::styled(" procesando compra... ", Style::default().fg(Color::Yellow))
        } else {
            Span::raw("")
        };

        let header = Paragraph::new(Line::from(vec![
            Span::styled(" 🛒 Kiosco ", Style::default().fg(Color::Yellow)),
            Span::raw(format!("| {} ", label)),
            Span::styled(
                format!("| Carrito: {} ({})", self.cart.total_quantity(), money(self.cart.total())),
                Style::default().fg(Color::Green),
            ),
            Span::styled(filter_text, Style::default().fg(Color::Cyan)),
            status,
        ]))
        .block(Block::default().borders(Borders::ALL).border_style(Style::default().fg(Color::Cyan)));
        f.render_widget(header, area);
    }

    fn draw_product_table(&mut self, f: &mut Frame, area: Rect) {
        let title = match self.catalog.error() {
            Some(_) => " Productos (error, r reintenta) ",
            None => " Productos ",
        };
        let block = Block::default()
            .title(title)
            .borders(Borders::ALL)
            .border_style(match self.catalog.error() {
                Some(_) => Style::default().fg(Color::Red),
                None => Style::default().fg(Color::White),
            });

        if let Some(error) = self.catalog.error() {
            let body = Paragraph::new(vec![
                Line::from(Span::styled(error, Style::default().fg(Color::Red))),
                Line::from("Pulsa 'r' para reintentar"),
            ])
            .block(block);
            f.render_widget(body, area);
            return;
        }

        let rows: Vec<Row> = self
            .catalog
            .products()
            .iter()
            .map(|p| {
                let style = if p.is_available() {
                    Style::default()
                } else {
                    Style::default().fg(Color::DarkGray)
                };
                Row::new(vec![
                    p.id.to_string(),
                    p.name.clone(),
                    money(p.price),
                    if p.is_available() { p.stock.to_string() } else { "agotado".to_string() },
                    p.category.clone(),
                ])
                .style(style)
            })
            .collect();

        let table = Table::new(
            rows,
            [
                Constraint::Length(5),
                Constraint::Percentage(40),
                Constraint::Length(10),
                Constraint::Length(9),
                Constraint::Percentage(20),
            ],
        )
        .header(
            Row::new(vec!["ID", "Nombre", "Precio", "Stock", "Categoría"])
                .style(Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD)),
        )
        .row_highlight_style(Style::default().bg(Color::DarkGray).add_modifier(Modifier::BOLD))
        .block(block);

        f.render_stateful_widget(table, area, &mut self.store_view.table);
    }

    fn draw_cart_panel(&mut self, f: &mut Frame, area: Rect) {
        let items: Vec<ListItem> = self
            .cart
            .lines()
            .enumerate()
            .map(|(i, line)| {
                let selected = i == self.store_view.cart_selected;
                let style = if selected {
                    Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD)
                } else {
                    Style::default()
                };
                ListItem::new(Line::from(vec![
                    Span::styled(format!("{} x{} ", line.name, line.quantity), style),
                    Span::styled(money(line.subtotal()), Style::default().fg(Color::Green)),
                ]))
            })
            .collect();

        let title = format!(" Carrito | Total {} ", money(self.cart.total()));
        let list = List::new(items).block(
            Block::default()
                .title(title)
                .borders(Borders::ALL)
                .border_style(Style::default().fg(Color::Green)),
        );
        f.render_widget(list, area);
    }

    fn draw_checkout_confirm(&mut self, f: &mut Frame) {
        let area = centered_rect(50, 30, f.area());
        let body = Paragraph::new(vec![
            Line::from(format!(
                "Confirmar compra de {} artículos",
                self.cart.total_quantity()
            )),
            Line::from(Span::styled(
                format!("Total: {}", money(self.cart.total())),
                Style::default().fg(Color::Green).add_modifier(Modifier::BOLD),
            )),
            Line::from(""),
            Line::from("y confirmar | n cancelar"),
        ])
        .alignment(Alignment::Center)
        .block(
            Block::default()
                .title(" Finalizar Compra ")
                .borders(Borders::ALL)
                .border_style(Style::default().fg(Color::Yellow)),
        );
        f.render_widget(Clear, area);
        f.render_widget(body, area);
    }

    fn draw_receipt(&mut self, f: &mut Frame, receipt: &crate::state::checkout::Receipt) {
        let area = centered_rect(60, 60, f.area());
        let mut lines = vec![
            Line::from(Span::styled(
                "¡Gracias por tu compra!",
                Style::default().fg(Color::Green).add_modifier(Modifier::BOLD),
            )),
            Line::from(format!("Cliente: {}", receipt.customer)),
        ];
        if let Some(id) = receipt.sale_id {
            lines.push(Line::from(format!("Venta #{}", id)));
        }
        lines.push(Line::from(""));
        for line in &receipt.lines {
            lines.push(Line::from(format!(
                "{} x{} @ {} = {}",
                line.name,
                line.quantity,
                money(line.unit_price),
                money(line.subtotal)
            )));
        }
        lines.push(Line::from(""));
        lines.push(Line::from(Span::styled(
            format!("TOTAL: {}", money(receipt.total)),
            Style::default().fg(Color::Green).add_modifier(Modifier::BOLD),
        )));
        lines.push(Line::from("Pulsa cualquier tecla para continuar"));

        let body = Paragraph::new(lines).alignment(Alignment::Center).block(
            Block::default()
                .title(" Recibo ")
                .borders(Borders::ALL)
                .border_style(Style::default().fg(Color::Green)),
        );
        f.render_widget(Clear, area);
        f.render_widget(body, area);
    }
}
