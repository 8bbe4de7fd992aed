//! Application state and event loop
//!
//! All state lives on the UI thread. Network calls run on spawned tasks
//! and report back through an unbounded channel, drained once per tick;
//! every message carries enough context for the handler to decide
//! whether it is still relevant.

use crate::config::AppConfig;
use crate::notify::Notices;
use crate::state::cart::CartStore;
use crate::state::catalog::{CatalogFilter, CatalogStore};
use crate::state::checkout::{self, CheckoutState, Receipt};
use crate::state::session::SessionStore;
use crate::storage::LocalStore;
use crate::ui::{admin, inventory, login, sales, store, users, Screen};
use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind};
use kiosco_client::{ClientError, HttpClient, LoginResponse};
use ratatui::prelude::*;
use shared::models::{Product, ProductUpdate, Sale, User};
use std::io::Stdout;
use std::time::Duration;
use tokio::sync::mpsc;

/// Which admin entity a completed mutation touched, so the handler
/// knows which list to re-fetch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Entity {
    Product,
    User,
    Sale,
}

/// Results flowing back from spawned network tasks.
pub enum AppMsg {
    Catalog {
        seq: u64,
        filter: CatalogFilter,
        result: Result<Vec<Product>, ClientError>,
    },
    LoginDone(Result<LoginResponse, ClientError>),
    RegisterDone(Result<(), ClientError>),
    SaleSubmitted(Result<Sale, ClientError>),
    ProductsAdmin(Result<Vec<Product>, ClientError>),
    UsersFetched(Result<Vec<User>, ClientError>),
    SalesFetched(Result<Vec<Sale>, ClientError>),
    MutationDone {
        entity: Entity,
        result: Result<(), ClientError>,
    },
}

pub struct App {
    pub client: HttpClient,
    pub store: LocalStore,
    pub session: SessionStore,
    pub cart: CartStore,
    pub catalog: CatalogStore,
    pub filter: CatalogFilter,
    pub checkout: CheckoutState,
    pub notices: Notices,
    pub screen: Screen,
    pub should_quit: bool,

    pub login: login::LoginView,
    pub store_view: store::StoreView,
    pub admin_view: admin::AdminView,
    pub inventory: inventory::InventoryView,
    pub users: users::UsersView,
    pub sales: sales::SalesView,

    /// Receipt snapshot taken when a checkout submission starts.
    pending_receipt: Option<Receipt>,

    tx: mpsc::UnboundedSender<AppMsg>,
    rx: mpsc::UnboundedReceiver<AppMsg>,
}

impl App {
    pub fn new(config: &AppConfig) -> anyhow::Result<Self> {
        let store = LocalStore::open(&config.data_dir)?;
        let mut session = SessionStore::hydrate(&store);
        let cart = CartStore::hydrate(&store);

        let mut api = config.api.clone();
        api.token = session.token().map(str::to_string);
        let client = api.build_client();

        let (tx, rx) = mpsc::unbounded_channel();
        let mut app = Self {
            client,
            store,
            session,
            cart,
            catalog: CatalogStore::default(),
            filter: CatalogFilter::default(),
            checkout: CheckoutState::Idle,
            notices: Notices::default(),
            screen: Screen::Store,
            should_quit: false,
            login: login::LoginView::default(),
            store_view: store::StoreView::default(),
            admin_view: admin::AdminView::default(),
            inventory: inventory::InventoryView::default(),
            users: users::UsersView::default(),
            sales: sales::SalesView::default(),
            pending_receipt: None,
            tx,
            rx,
        };

        // Dropping an invalid token now keeps the first screen honest.
        if app.session.claims(&mut app.store).is_none() {
            app.client.clear_token();
        }
        Ok(app)
    }

    pub async fn run(
        &mut self,
        terminal: &mut Terminal<CrosstermBackend<Stdout>>,
    ) -> anyhow::Result<()> {
        self.spawn_catalog_fetch();

        while !self.should_quit {
            self.notices.prune();
            terminal.draw(|f| self.draw(f))?;

            if event::poll(Duration::from_millis(100))? {
                if let Event::Key(key) = event::read()? {
                    if matches!(key.kind, KeyEventKind::Press | KeyEventKind::Repeat) {
                        self.handle_key(key);
                    }
                }
            }

            while let Ok(msg) = self.rx.try_recv() {
                self.on_message(msg);
            }
        }
        Ok(())
    }

    fn draw(&mut self, f: &mut Frame) {
        match self.screen {
            Screen::Store => self.draw_store(f),
            Screen::Login => self.draw_login(f),
            Screen::Admin => self.draw_admin(f),
            Screen::Inventory => self.draw_inventory(f),
            Screen::Users => self.draw_users(f),
            Screen::Sales => self.draw_sales(f),
        }
    }

    fn handle_key(&mut self, key: KeyEvent) {
        match self.screen {
            Screen::Store => self.handle_store_key(key),
            Screen::Login => self.handle_login_key(key),
            Screen::Admin => self.handle_admin_key(key),
            Screen::Inventory => self.handle_inventory_key(key),
            Screen::Users => self.handle_users_key(key),
            Screen::Sales => self.handle_sales_key(key),
        }
    }

    /// Screen-independent navigation, used by every screen while no text
    /// input is focused. Returns `true` when the key was consumed.
    pub fn handle_global_key(&mut self, key: KeyEvent) -> bool {
        match key.code {
            KeyCode::Char('q') => {
                self.should_quit = true;
                true
            }
            KeyCode::Char('1') => {
                self.navigate(Screen::Store);
                true
            }
            KeyCode::Char('2') => {
                self.navigate(Screen::Admin);
                true
            }
            KeyCode::Char('3') => {
                self.navigate(Screen::Inventory);
                true
            }
            KeyCode::Char('4') => {
                self.navigate(Screen::Users);
                true
            }
            KeyCode::Char('5') => {
                self.navigate(Screen::Sales);
                true
            }
            KeyCode::Char('l') => {
                if self.session.is_authenticated(&mut self.store) {
                    self.logout();
                } else {
                    self.navigate(Screen::Login);
                }
                true
            }
            _ => false,
        }
    }

    /// Move to a screen, enforcing the session gates and kicking off the
    /// data fetch the screen needs.
    pub fn navigate(&mut self, screen: Screen) {
        if screen.requires_auth() {
            if !self.session.require_auth(&mut self.store, screen.slug()) {
                self.client.clear_token();
                self.notices.info("Inicia sesión para continuar");
                self.screen = Screen::Login;
                return;
            }
            if !self.session.is_admin(&mut self.store) {
                self.notices.error("Acceso solo para administradores");
                self.screen = Screen::Store;
                return;
            }
        }

        self.screen = screen;
        match screen {
            Screen::Store => self.spawn_catalog_fetch(),
            Screen::Inventory => self.spawn_products_admin_fetch(),
            Screen::Users => self.spawn_users_fetch(),
            Screen::Sales => self.spawn_sales_fetch(),
            Screen::Admin | Screen::Login => {}
        }
    }

    /// Uniform error policy: a 401 from any call destroys the session
    /// and lands on the login screen; everything else becomes a notice.
    pub fn handle_error(&mut self, err: &ClientError) {
        if err.is_auth_failure() {
            self.force_logout();
        } else {
            self.notices.error(err.display_message());
        }
    }

    /// Session invalidation path (401, expired or malformed token). The
    /// current screen is remembered so login can return to it.
    pub fn force_logout(&mut self) {
        if self.screen.requires_auth() {
            let _ = self
                .store
                .set(crate::storage::KEY_RETURN_TO, self.screen.slug());
        }
        self.session.clear(&mut self.store);
        self.client.clear_token();
        self.checkout = CheckoutState::Idle;
        self.pending_receipt = None;
        self.notices
            .error("Tu sesión ha expirado. Inicia sesión nuevamente.");
        self.screen = Screen::Login;
    }

    /// Explicit logout keeps the cart; only the session goes.
    pub fn logout(&mut self) {
        self.session.clear(&mut self.store);
        self.client.clear_token();
        self.checkout = CheckoutState::Idle;
        self.notices.info("Sesión cerrada");
        self.screen = Screen::Store;
    }

    // --- spawned fetches ---------------------------------------------

    pub fn spawn_catalog_fetch(&mut self) {
        let seq = self.catalog.begin_fetch();
        let filter = self.filter.clone();
        let client = self.client.clone();
        let tx = self.tx.clone();
        tokio::spawn(async move {
            let result = client
                .list_products(filter.category.as_deref(), filter.search.as_deref())
                .await;
            let _ = tx.send(AppMsg::Catalog { seq, filter, result });
        });
    }

    pub fn spawn_products_admin_fetch(&mut self) {
        self.inventory.loading = true;
        let client = self.client.clone();
        let tx = self.tx.clone();
        tokio::spawn(async move {
            let result = client.list_products(None, None).await;
            let _ = tx.send(AppMsg::ProductsAdmin(result));
        });
    }

    pub fn spawn_users_fetch(&mut self) {
        self.users.loading = true;
        let client = self.client.clone();
        let tx = self.tx.clone();
        tokio::spawn(async move {
            let result = client.list_users().await;
            let _ = tx.send(AppMsg::UsersFetched(result));
        });
    }

    pub fn spawn_sales_fetch(&mut self) {
        self.sales.loading = true;
        let client = self.client.clone();
        let tx = self.tx.clone();
        tokio::spawn(async move {
            let result = client.list_sales().await;
            let _ = tx.send(AppMsg::SalesFetched(result));
        });
    }

    pub fn spawn_login(&mut self, username: String, password: String) {
        let client = self.client.clone();
        let tx = self.tx.clone();
        tokio::spawn(async move {
            let result = client.login(&username, &password).await;
            let _ = tx.send(AppMsg::LoginDone(result));
        });
    }

    pub fn spawn_register(&mut self, request: shared::models::RegisterRequest) {
        let client = self.client.clone();
        let tx = self.tx.clone();
        tokio::spawn(async move {
            let result = client.register(&request).await.map(|_| ());
            let _ = tx.send(AppMsg::RegisterDone(result));
        });
    }

    pub fn spawn_mutation<F, Fut>(&mut self, entity: Entity, op: F)
    where
        F: FnOnce(HttpClient) -> Fut + Send + 'static,
        Fut: std::future::Future<Output = Result<(), ClientError>> + Send + 'static,
    {
        let client = self.client.clone();
        let tx = self.tx.clone();
        tokio::spawn(async move {
            let result = op(client).await;
            let _ = tx.send(AppMsg::MutationDone { entity, result });
        });
    }

    // --- checkout -----------------------------------------------------

    pub fn submit_checkout(&mut self) {
        if matches!(self.checkout, CheckoutState::Submitting) {
            return;
        }
        if !self.session.require_auth(&mut self.store, Screen::Store.slug()) {
            self.client.clear_token();
            self.notices.info("Inicia sesión para finalizar la compra");
            self.screen = Screen::Login;
            return;
        }

        let sale = match checkout::validate(&self.cart) {
            Ok(sale) => sale,
            Err(err) => {
                self.notices.error(err.to_string());
                return;
            }
        };

        let customer = self
            .session
            .claims(&mut self.store)
            .map(|c| c.display_name())
            .unwrap_or_else(|| "Cliente".to_string());
        self.pending_receipt = Some(checkout::build_receipt(&self.cart, customer));
        self.checkout = CheckoutState::Submitting;

        let client = self.client.clone();
        let tx = self.tx.clone();
        tokio::spawn(async move {
            let result = client.create_sale(&sale).await;
            let _ = tx.send(AppMsg::SaleSubmitted(result));
        });
    }

    fn on_sale_submitted(&mut self, result: Result<Sale, ClientError>) {
        match result {
            Ok(sale) => {
                // Mirror the backend's stock decrement locally and push
                // the new counters back, best effort.
                let sold: Vec<(i64, i64)> = self
                    .cart
                    .lines()
                    .filter_map(|l| l.id.parse::<i64>().ok().map(|id| (id, l.quantity as i64)))
                    .collect();
                for (id, quantity) in &sold {
                    self.catalog.decrement_stock(*id, *quantity);
                    // Look the product up in the full catalog; an active
                    // filter may keep it out of the displayed list.
                    if let Some(stock) = self.catalog.stock_of(*id) {
                        let update = ProductUpdate::stock(stock);
                        let client = self.client.clone();
                        let id = *id;
                        tokio::spawn(async move {
                            if let Err(e) = client.update_product(id, &update).await {
                                tracing::warn!(id, error = %e, "no se pudo sincronizar el stock");
                            }
                        });
                    }
                }

                if let Err(e) = self.cart.clear(&mut self.store) {
                    tracing::warn!(error = %e, "no se pudo vaciar el carrito persistido");
                }

                let mut receipt = self.pending_receipt.take().unwrap_or_else(|| Receipt {
                    customer: "Cliente".to_string(),
                    lines: Vec::new(),
                    total: sale.total,
                    sale_id: None,
                });
                receipt.sale_id = sale.id;
                self.checkout = CheckoutState::Succeeded(receipt);
                self.notices.success("¡Compra realizada con éxito!");
            }
            Err(err) => {
                // The cart stays intact for a retry.
                self.pending_receipt = None;
                if err.is_auth_failure() {
                    self.force_logout();
                } else {
                    let message = err.display_message();
                    self.notices.error(message.clone());
                    self.checkout = CheckoutState::Failed { message };
                }
            }
        }
    }

    // --- message handling --------------------------------------------

    fn on_message(&mut self, msg: AppMsg) {
        match msg {
            AppMsg::Catalog { seq, filter, result } => {
                let fetched = result.is_ok();
                let result = result.map_err(|e| {
                    if e.is_auth_failure() {
                        // The catalog route is public; a 401 here still
                        // means the token is dead.
                        self.force_logout();
                    }
                    e.display_message()
                });
                // Reconcile only against fresh data; a failed fetch must
                // leave the cart exactly as it was.
                if self.catalog.apply(seq, result, &filter) && fetched {
                    self.reconcile_cart();
                }
            }
            AppMsg::LoginDone(result) => self.on_login_done(result),
            AppMsg::RegisterDone(result) => self.on_register_done(result),
            AppMsg::SaleSubmitted(result) => self.on_sale_submitted(result),
            AppMsg::ProductsAdmin(result) => match result {
                Ok(products) => {
                    self.inventory.loading = false;
                    self.inventory.error = None;
                    self.inventory.set_products(products);
                }
                Err(err) => {
                    self.inventory.loading = false;
                    self.inventory.error = Some(err.display_message());
                    self.handle_error(&err);
                }
            },
            AppMsg::UsersFetched(result) => match result {
                Ok(users) => {
                    self.users.loading = false;
                    self.users.error = None;
                    self.users.set_users(users);
                }
                Err(err) => {
                    self.users.loading = false;
                    self.users.error = Some(err.display_message());
                    self.handle_error(&err);
                }
            },
            AppMsg::SalesFetched(result) => match result {
                Ok(sales) => {
                    self.sales.loading = false;
                    self.sales.error = None;
                    self.sales.set_sales(sales);
                }
                Err(err) => {
                    self.sales.loading = false;
                    self.sales.error = Some(err.display_message());
                    self.handle_error(&err);
                }
            },
            AppMsg::MutationDone { entity, result } => {
                match result {
                    Ok(()) => self.notices.success("Operación realizada"),
                    Err(err) => {
                        self.handle_error(&err);
                        if err.is_auth_failure() {
                            return;
                        }
                    }
                }
                // The server is authoritative after any write; re-fetch
                // instead of patching the local list.
                match entity {
                    Entity::Product => {
                        self.spawn_products_admin_fetch();
                        self.spawn_catalog_fetch();
                    }
                    Entity::User => self.spawn_users_fetch(),
                    Entity::Sale => self.spawn_sales_fetch(),
                }
            }
        }
    }

    fn on_login_done(&mut self, result: Result<LoginResponse, ClientError>) {
        self.login.busy = false;
        match result {
            Ok(response) => {
                if let Err(e) = self.session.set_token(&mut self.store, &response.access_token) {
                    tracing::warn!(error = %e, "no se pudo persistir el token");
                }
                self.client.set_token(&response.access_token);
                self.login.reset();
                self.notices.success("Sesión iniciada");

                let target = self
                    .session
                    .take_return_target(&mut self.store)
                    .and_then(|slug| Screen::from_slug(&slug));
                match target {
                    Some(screen) => self.navigate(screen),
                    None if self.session.is_admin(&mut self.store) => self.navigate(Screen::Admin),
                    None => self.navigate(Screen::Store),
                }
            }
            Err(err) => {
                if matches!(err, ClientError::Unauthorized) {
                    // A 401 from the login route itself is bad credentials.
                    self.notices.error("Usuario o contraseña incorrectos");
                } else {
                    self.notices.error(err.display_message());
                }
            }
        }
    }

    fn on_register_done(&mut self, result: Result<(), ClientError>) {
        self.login.busy = false;
        match result {
            Ok(()) => {
                self.notices.success("Cuenta creada. Ahora inicia sesión.");
                self.login.switch_to_login();
            }
            Err(err) => self.notices.error(err.display_message()),
        }
    }

    fn reconcile_cart(&mut self) {
        match self.cart.reconcile(&mut self.store, self.catalog.full()) {
            Ok(notices) => {
                for notice in notices {
                    self.notices.info(notice.message());
                }
            }
            Err(e) => tracing::warn!(error = %e, "no se pudo reconciliar el carrito"),
        }
    }

    /// Session label for the header.
    pub fn session_label(&mut self) -> String {
        match self.session.claims(&mut self.store) {
            Some(claims) => claims.display_name(),
            None => "Invitado".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::{KEY_RETURN_TO, KEY_TOKEN};
    use base64::{engine::general_purpose::URL_SAFE_NO_PAD, Engine};
    use kiosco_client::ClientConfig;
    use shared::util::now_secs;
    use tempfile::TempDir;

    fn product(id: i64, name: &str, price: f64, stock: i64) -> Product {
        Product {
            id,
            name: name.to_string(),
            description: String::new(),
            price,
            stock,
            category: "general".to_string(),
            image: None,
        }
    }

    fn test_app(dir: &TempDir) -> App {
        let config = AppConfig {
            api: ClientConfig::new("http://localhost:8000"),
            data_dir: dir.path().to_path_buf(),
        };
        App::new(&config).unwrap()
    }

    fn token(payload: serde_json::Value) -> String {
        format!("h.{}.s", URL_SAFE_NO_PAD.encode(serde_json::to_vec(&payload).unwrap()))
    }

    #[test]
    fn failed_catalog_fetch_leaves_the_cart_unchanged() {
        let dir = TempDir::new().unwrap();
        let mut app = test_app(&dir);
        app.cart
            .add(&mut app.store, &product(7, "Atún en Lata", 2.5, 5))
            .unwrap();

        let seq = app.catalog.begin_fetch();
        app.on_message(AppMsg::Catalog {
            seq,
            filter: CatalogFilter::default(),
            result: Err(ClientError::Internal("boom".into())),
        });

        assert_eq!(app.cart.len(), 1);
        assert_eq!(app.cart.get("7").unwrap().quantity, 1);
        // The persisted copy must be intact too.
        let reloaded = CartStore::hydrate(&app.store);
        assert_eq!(reloaded.get("7").unwrap().quantity, 1);
    }

    #[test]
    fn successful_catalog_fetch_still_reconciles_the_cart() {
        let dir = TempDir::new().unwrap();
        let mut app = test_app(&dir);
        app.cart
            .add(&mut app.store, &product(7, "Atún en Lata", 2.5, 5))
            .unwrap();

        // The fresh catalog no longer carries product 7.
        let seq = app.catalog.begin_fetch();
        app.on_message(AppMsg::Catalog {
            seq,
            filter: CatalogFilter::default(),
            result: Ok(vec![product(1, "Arroz", 3.5, 10)]),
        });

        assert!(app.cart.is_empty());
    }

    #[test]
    fn unauthorized_from_an_admin_screen_forces_logout() {
        let dir = TempDir::new().unwrap();
        let mut app = test_app(&dir);
        let valid = token(serde_json::json!({
            "sub": "1", "rol": "administrador", "exp": now_secs() + 3600
        }));
        app.session.set_token(&mut app.store, &valid).unwrap();
        app.client.set_token(&valid);
        app.screen = Screen::Inventory;

        app.handle_error(&ClientError::Unauthorized);

        assert_eq!(app.screen, Screen::Login);
        assert_eq!(app.store.get(KEY_TOKEN), None);
        assert_eq!(app.store.get(KEY_RETURN_TO), Some("inventario"));
        assert!(app.client.token().is_none());
        assert!(app.session.token().is_none());
    }

    #[test]
    fn other_errors_do_not_touch_the_session() {
        let dir = TempDir::new().unwrap();
        let mut app = test_app(&dir);
        let valid = token(serde_json::json!({
            "sub": "1", "rol": "administrador", "exp": now_secs() + 3600
        }));
        app.session.set_token(&mut app.store, &valid).unwrap();
        app.screen = Screen::Inventory;

        app.handle_error(&ClientError::Forbidden("no".into()));

        assert_eq!(app.screen, Screen::Inventory);
        assert!(app.store.get(KEY_TOKEN).is_some());
    }
}
