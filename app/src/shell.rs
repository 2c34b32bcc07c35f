//! Interactive terminal front end over the list and form controllers.
//!
//! Each input line is one user action. The shell forwards it to the owning
//! controller, wires selection changes into the form, and re-renders the
//! whole screen afterwards.

use std::fmt;
use std::str::FromStr;

use inventory_core::{
    Confirm, Field, FormMode, Product, ProductForm, ProductList, ProductService, SubmitOutcome,
    SubmitRejected, Transport,
};
use thiserror::Error;
use tracing::debug;

pub const HELP: &str = "\
commands:
  list                    reload products
  select <id>             edit a product
  clear | new             back to create mode
  set <field> <value>     field is name, description, quantity or price
  submit                  save the form
  cancel                  discard the form
  delete <id>             delete a product (asks first)
  search <name>           find products by name
  low-stock [threshold]   products below a quantity
  help                    show this text
  quit";

#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    List,
    Select(i64),
    Clear,
    Set(Field, String),
    Submit,
    Cancel,
    Delete(i64),
    Search(String),
    LowStock(Option<i32>),
    Help,
    Quit,
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ParseError {
    #[error("unknown command `{0}`, try `help`")]
    Unknown(String),
    #[error("usage: {0}")]
    Usage(&'static str),
}

fn parse_id(arg: &str, usage: &'static str) -> Result<i64, ParseError> {
    arg.trim().parse().map_err(|_| ParseError::Usage(usage))
}

impl FromStr for Command {
    type Err = ParseError;

    fn from_str(line: &str) -> Result<Self, Self::Err> {
        let line = line.trim();
        let (word, rest) = line.split_once(char::is_whitespace).unwrap_or((line, ""));
        let rest = rest.trim();

        match word {
            "list" | "ls" => Ok(Command::List),
            "select" | "edit" => parse_id(rest, "select <id>").map(Command::Select),
            "clear" | "new" => Ok(Command::Clear),
            "set" => {
                const USAGE: &str = "set <name|description|quantity|price> <value>";
                let (field, value) = rest.split_once(char::is_whitespace).unwrap_or((rest, ""));
                let field = match field {
                    "name" => Field::Name,
                    "description" => Field::Description,
                    "quantity" => Field::Quantity,
                    "price" => Field::Price,
                    _ => return Err(ParseError::Usage(USAGE)),
                };
                Ok(Command::Set(field, value.trim().to_string()))
            }
            "submit" | "save" => Ok(Command::Submit),
            "cancel" => Ok(Command::Cancel),
            "delete" | "rm" => parse_id(rest, "delete <id>").map(Command::Delete),
            "search" if !rest.is_empty() => Ok(Command::Search(rest.to_string())),
            "search" => Err(ParseError::Usage("search <name>")),
            "low-stock" if rest.is_empty() => Ok(Command::LowStock(None)),
            "low-stock" => rest
                .parse()
                .map(|n| Command::LowStock(Some(n)))
                .map_err(|_| ParseError::Usage("low-stock [threshold]")),
            "help" | "?" => Ok(Command::Help),
            "quit" | "exit" | "q" => Ok(Command::Quit),
            other => Err(ParseError::Unknown(other.to_string())),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Quit,
}

pub struct Shell<T> {
    service: ProductService<T>,
    list: ProductList,
    form: ProductForm,
    low_stock_threshold: i32,
    results: Option<(String, Vec<Product>)>,
    notice: Option<String>,
}

impl<T: Transport> Shell<T> {
    pub fn new(service: ProductService<T>, low_stock_threshold: i32) -> Self {
        Self {
            service,
            list: ProductList::new(),
            form: ProductForm::new(),
            low_stock_threshold,
            results: None,
            notice: None,
        }
    }

    /// Initial load, as when the screen first appears.
    pub async fn mount(&mut self) {
        self.list.load(&self.service).await;
    }

    pub async fn handle(&mut self, command: Command, confirm: &impl Confirm) -> Flow {
        debug!(?command, "shell command");
        self.notice = None;
        self.results = None;

        match command {
            Command::List => self.list.load(&self.service).await,
            Command::Select(id) => {
                let found = self
                    .list
                    .products()
                    .iter()
                    .find(|p| p.id == Some(id))
                    .cloned();
                match found {
                    Some(product) => {
                        self.list.select(product);
                        self.form.set_product(self.list.selected());
                    }
                    None => self.notice = Some(format!("No product with id {id} in the list.")),
                }
            }
            Command::Clear => {
                self.list.clear_selection();
                self.form.set_product(None);
            }
            Command::Set(field, value) => self.set_field(field, value),
            Command::Submit => match self.form.submit(&self.service).await {
                SubmitOutcome::Saved(_) => {
                    self.list.on_product_saved(&self.service).await;
                    self.form.set_product(self.list.selected());
                }
                SubmitOutcome::Rejected(SubmitRejected::InFlight) => {
                    self.notice = Some("A save is already in progress.".to_string());
                }
                SubmitOutcome::Rejected(SubmitRejected::Invalid(_)) | SubmitOutcome::Failed => {}
            },
            Command::Cancel => {
                self.form.cancel();
                self.list.clear_selection();
            }
            Command::Delete(id) => {
                self.list.delete(&self.service, id, confirm).await;
            }
            Command::Search(name) => {
                let result = self.service.search_products(&name).await;
                self.show_results(format!("matching \"{name}\""), result);
            }
            Command::LowStock(threshold) => {
                let threshold = threshold.unwrap_or(self.low_stock_threshold);
                let result = self.service.low_stock_products(threshold).await;
                self.show_results(format!("below {threshold} in stock"), result);
            }
            Command::Help => self.notice = Some(HELP.to_string()),
            Command::Quit => return Flow::Quit,
        }
        Flow::Continue
    }

    fn set_field(&mut self, field: Field, value: String) {
        let draft = self.form.draft_mut();
        match field {
            Field::Name => draft.name = value,
            Field::Description => draft.description = value,
            // An unparsable number leaves the field empty, which validation reports.
            Field::Quantity => draft.quantity = value.parse().ok(),
            Field::Price => draft.price = value.parse().ok(),
        }
    }

    fn show_results<E: fmt::Display>(&mut self, title: String, result: Result<Vec<Product>, E>) {
        match result {
            Ok(products) => self.results = Some((title, products)),
            Err(error) => {
                tracing::warn!(%error, "product query failed");
                self.notice = Some("Query failed. Please try again.".to_string());
            }
        }
    }

    pub fn render(&self) -> String {
        self.to_string()
    }
}

impl<T> fmt::Display for Shell<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "== Products ==")?;
        if self.list.is_loading() {
            writeln!(f, "(loading...)")?;
        }
        if let Some(error) = self.list.error() {
            writeln!(f, "! {error}")?;
        }
        let selected = self.list.selected().and_then(|p| p.id);
        write!(f, "{}", Table::new(self.list.products(), selected))?;

        if let Some((title, products)) = &self.results {
            writeln!(f, "\n== Products {title} ==")?;
            write!(f, "{}", Table::new(products, None))?;
        }

        writeln!(f)?;
        match self.form.mode() {
            FormMode::Create => writeln!(f, "== New product ==")?,
            FormMode::Edit(id) => writeln!(f, "== Edit product #{id} ==")?,
        }
        if self.form.is_loading() {
            writeln!(f, "(saving...)")?;
        }
        if let Some(error) = self.form.error() {
            writeln!(f, "! {error}")?;
        }
        let draft = self.form.draft();
        let fields = [
            (Field::Name, draft.name.clone()),
            (Field::Description, draft.description.clone()),
            (Field::Quantity, draft.quantity.map(|q| q.to_string()).unwrap_or_default()),
            (Field::Price, draft.price.map(|p| format!("{p:.2}")).unwrap_or_default()),
        ];
        for (field, value) in fields {
            write!(f, "  {:<12} {value}", field.to_string())?;
            if let Some(error) = self.form.field_errors().for_field(field) {
                write!(f, "   <- {error}")?;
            }
            writeln!(f)?;
        }

        if let Some(notice) = &self.notice {
            writeln!(f, "\n{notice}")?;
        }
        Ok(())
    }
}

/// One row per product; `selected` is marked with `>`.
pub struct Table<'a> {
    products: &'a [Product],
    selected: Option<i64>,
}

impl<'a> Table<'a> {
    pub fn new(products: &'a [Product], selected: Option<i64>) -> Self {
        Self { products, selected }
    }
}

impl fmt::Display for Table<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.products.is_empty() {
            return writeln!(f, "  (no products)");
        }
        writeln!(f, "  {:>5}  {:<24} {:>8} {:>10}  description", "id", "name", "qty", "price")?;
        for product in self.products {
            let marker = if self.selected.is_some() && product.id == self.selected { '>' } else { ' ' };
            let id = product.id.map(|id| id.to_string()).unwrap_or_default();
            writeln!(
                f,
                "{marker} {id:>5}  {:<24} {:>8} {:>10.2}  {}",
                product.name,
                product.quantity,
                product.price,
                product.description.as_deref().unwrap_or(""),
            )?;
        }
        Ok(())
    }
}
