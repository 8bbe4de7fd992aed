//! Inventory management screen
//!
//! Product table with create/edit modal and delete confirmation. The
//! search box filters the fetched list client-side; after any write the
//! list is re-fetched so the server stays authoritative.

use crate::ui::app::{App, Entity};
use crate::ui::widgets::{centered_rect, form_field, key_hints, money, notice_banner};
use crate::ui::Screen;
use crossterm::event::{Event, KeyCode, KeyEvent};
use ratatui::{prelude::*, widgets::*};
use shared::models::{Product, ProductCreate, ProductUpdate};
use tui_input::backend::crossterm::EventHandler;
use tui_input::Input;

/// Create/edit modal state. `id` is `None` for a new product.
pub struct ProductForm {
    pub id: Option<i64>,
    pub focus: usize,
    pub name: Input,
    pub price: Input,
    pub category: Input,
    pub stock: Input,
    pub description: Input,
}

impl ProductForm {
    const FIELDS: usize = 5;

    fn new() -> Self {
        Self {
            id: None,
            focus: 0,
            name: Input::default(),
            price: Input::default(),
            category: Input::default(),
            stock: Input::default(),
            description: Input::default(),
        }
    }

    fn from_product(product: &Product) -> Self {
        Self {
            id: Some(product.id),
            focus: 0,
            name: Input::new(product.name.clone()),
            price: Input::new(format!("{}", product.price)),
            category: Input::new(product.category.clone()),
            stock: Input::new(product.stock.to_string()),
            description: Input::new(product.description.clone()),
        }
    }

    fn focused_input(&mut self) -> &mut Input {
        match self.focus {
            0 => &mut self.name,
            1 => &mut self.price,
            2 => &mut self.category,
            3 => &mut self.stock,
            _ => &mut self.description,
        }
    }
}

#[derive(Default)]
pub struct InventoryView {
    pub products: Vec<Product>,
    pub table: TableState,
    pub loading: bool,
    pub error: Option<String>,
    pub search: Input,
    pub searching: bool,
    pub form: Option<ProductForm>,
    pub confirm_delete: Option<i64>,
}

impl InventoryView {
    pub fn set_products(&mut self, products: Vec<Product>) {
        self.products = products;
        let len = self.filtered().len();
        if len == 0 {
            self.table.select(None);
        } else if self.table.selected().is_none_or(|s| s >= len) {
            self.table.select(Some(0));
        }
    }

    /// Client-side filter over the fetched list.
    pub fn filtered(&self) -> Vec<&Product> {
        let term = self.search.value().trim().to_lowercase();
        self.products
            .iter()
            .filter(|p| {
                term.is_empty()
                    || p.name.to_lowercase().contains(&term)
                    || p.category.to_lowercase().contains(&term)
            })
            .collect()
    }

    fn selected_product(&self) -> Option<&Product> {
        let index = self.table.selected()?;
        self.filtered().get(index).copied()
    }
}

impl App {
    pub fn handle_inventory_key(&mut self, key: KeyEvent) {
        if self.inventory.form.is_some() {
            self.handle_product_form_key(key);
            return;
        }

        if let Some(id) = self.inventory.confirm_delete {
            match key.code {
                KeyCode::Char('y') | KeyCode::Enter => {
                    self.inventory.confirm_delete = None;
                    self.spawn_mutation(Entity::Product, move |client| async move {
                        client.delete_product(id).await
                    });
                }
                _ => self.inventory.confirm_delete = None,
            }
            return;
        }

        if self.inventory.searching {
            match key.code {
                KeyCode::Enter | KeyCode::Esc => self.inventory.searching = false,
                _ => {
                    self.inventory.search.handle_event(&Event::Key(key));
                    self.inventory.table.select(Some(0));
                }
            }
            return;
        }

        match key.code {
            KeyCode::Up => self.move_inventory_selection(-1),
            KeyCode::Down => self.move_inventory_selection(1),
            KeyCode::Char('n') => self.inventory.form = Some(ProductForm::new()),
            KeyCode::Char('e') | KeyCode::Enter => {
                if let Some(product) = self.inventory.selected_product() {
                    self.inventory.form = Some(ProductForm::from_product(product));
                }
            }
            KeyCode::Char('d') => {
                self.inventory.confirm_delete =
                    self.inventory.selected_product().map(|p| p.id);
            }
            KeyCode::Char('/') => {
                self.inventory.search.reset();
                self.inventory.searching = true;
            }
            KeyCode::Char('r') => self.spawn_products_admin_fetch(),
            KeyCode::Esc => self.navigate(Screen::Admin),
            _ => {
                self.handle_global_key(key);
            }
        }
    }

    fn move_inventory_selection(&mut self, delta: i64) {
        let len = self.inventory.filtered().len();
        if len == 0 {
            return;
        }
        let current = self.inventory.table.selected().unwrap_or(0) as i64;
        let next = (current + delta).clamp(0, len as i64 - 1) as usize;
        self.inventory.table.select(Some(next));
    }

    fn handle_product_form_key(&mut self, key: KeyEvent) {
        let Some(form) = self.inventory.form.as_mut() else {
            return;
        };
        match key.code {
            KeyCode::Esc => self.inventory.form = None,
            KeyCode::Tab | KeyCode::Down => form.focus = (form.focus + 1) % ProductForm::FIELDS,
            KeyCode::BackTab | KeyCode::Up => {
                form.focus = (form.focus + ProductForm::FIELDS - 1) % ProductForm::FIELDS;
            }
            KeyCode::Enter => self.submit_product_form(),
            _ => {
                form.focused_input().handle_event(&Event::Key(key));
            }
        }
    }

    fn submit_product_form(&mut self) {
        let Some(form) = self.inventory.form.as_ref() else {
            return;
        };

        let name = form.name.value().trim().to_string();
        if name.is_empty() {
            self.notices.error("El nombre es obligatorio");
            return;
        }
        let Ok(price) = form.price.value().trim().parse::<f64>() else {
            self.notices.error("Precio inválido");
            return;
        };
        if !price.is_finite() || price <= 0.0 {
            self.notices.error("El precio debe ser mayor que cero");
            return;
        }
        let Ok(stock) = form.stock.value().trim().parse::<i64>() else {
            self.notices.error("Stock inválido");
            return;
        };
        if stock < 0 {
            self.notices.error("El stock no puede ser negativo");
            return;
        }
        let category = form.category.value().trim().to_lowercase();
        let description = form.description.value().trim().to_string();

        match form.id {
            None => {
                let create = ProductCreate { name, description, price, stock, category };
                self.spawn_mutation(Entity::Product, move |client| async move {
                    client.create_product(&create).await.map(|_| ())
                });
            }
            Some(id) => {
                let update = ProductUpdate {
                    name: Some(name),
                    description: Some(description),
                    price: Some(price),
                    stock: Some(stock),
                    category: Some(category),
                };
                self.spawn_mutation(Entity::Product, move |client| async move {
                    client.update_product(id, &update).await.map(|_| ())
                });
            }
        }
        self.inventory.form = None;
    }

    pub fn draw_inventory(&mut self, f: &mut Frame) {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(3),
                Constraint::Length(1),
                Constraint::Min(1),
                Constraint::Length(1),
            ])
            .split(f.area());

        let status = if self.inventory.loading {
            Span::styled(" cargando... ", Style::default().fg(Color::Yellow))
        } else {
            Span::raw("")
        };
        let search = self.inventory.search.value();
        let header = Paragraph::new(Line::from(vec![
            Span::styled(" 📦 Kiosco | Inventario ", Style::default().fg(Color::Yellow)),
            if search.is_empty() {
                Span::raw("")
            } else {
                Span::styled(format!("| filtro: \"{}\" ", search), Style::default().fg(Color::Cyan))
            },
            status,
        ]))
        .block(Block::default().borders(Borders::ALL).border_style(Style::default().fg(Color::Cyan)));
        f.render_widget(header, chunks[0]);

        if let Some(notice) = self.notices.latest() {
            notice_banner(f, chunks[1], notice);
        }

        if let Some(error) = &self.inventory.error {
            let body = Paragraph::new(vec![
                Line::from(Span::styled(error.as_str(), Style::default().fg(Color::Red))),
                Line::from("Pulsa 'r' para recargar"),
            ])
            .block(Block::default().title(" Productos ").borders(Borders::ALL));
            f.render_widget(body, chunks[2]);
        } else {
            let rows: Vec<Row> = self
                .inventory
                .filtered()
                .iter()
                .map(|p| {
                    Row::new(vec![
                        p.id.to_string(),
                        p.name.clone(),
                        money(p.price),
                        p.stock.to_string(),
                        p.category.clone(),
                    ])
                })
                .collect();
            let table = Table::new(
                rows,
                [
                    Constraint::Length(5),
                    Constraint::Percentage(35),
                    Constraint::Length(10),
                    Constraint::Length(7),
                    Constraint::Percentage(25),
                ],
            )
            .header(
                Row::new(vec!["ID", "Nombre", "Precio", "Stock", "Categoría"])
                    .style(Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD)),
            )
            .row_highlight_style(Style::default().bg(Color::DarkGray).add_modifier(Modifier::BOLD))
            .block(Block::default().title(" Productos ").borders(Borders::ALL));
            f.render_stateful_widget(table, chunks[2], &mut self.inventory.table);
        }

        let hints = if self.inventory.searching {
            "Escribe para filtrar | Enter/Esc terminar"
        } else {
            "n nuevo | e editar | d eliminar | / filtrar | r recargar | Esc panel"
        };
        key_hints(f, chunks[3], hints);

        if self.inventory.confirm_delete.is_some() {
            let area = centered_rect(44, 20, f.area());
            let body = Paragraph::new(vec![
                Line::from("¿Eliminar este producto?"),
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

        if let Some(form) = &self.inventory.form {
            let title = match form.id {
                None => " Nuevo Producto ",
                Some(_) => " Editar Producto ",
            };
            let lines = vec![
                form_field("Nombre", form.name.value(), form.focus == 0),
                form_field("Precio", form.price.value(), form.focus == 1),
                form_field("Categoría", form.category.value(), form.focus == 2),
                form_field("Stock", form.stock.value(), form.focus == 3),
                form_field("Descripción", form.description.value(), form.focus == 4),
                Line::from(""),
                Line::from(Span::styled(
                    "Tab campo | Enter guardar | Esc cancelar",
                    Style::default().fg(Color::DarkGray),
                )),
            ];
            let area = centered_rect(60, 50, f.area());
            let body = Paragraph::new(lines).block(
                Block::default()
                    .title(title)
                    .borders(Borders::ALL)
                    .border_style(Style::default().fg(Color::Yellow)),
            );
            f.render_widget(Clear, area);
            f.render_widget(body, area);
        }
    }
}
