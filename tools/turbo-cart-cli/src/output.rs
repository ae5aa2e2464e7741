//! Output formatting for the CLI.

use console::style;
use indicatif::{ProgressBar, ProgressStyle};
use serde::Serialize;
use turbo_cart::{Cart, LineItem};

/// Output handler for CLI messages.
#[derive(Clone)]
pub struct Output {
    verbose: bool,
    json: bool,
}

impl Output {
    /// Create a new output handler.
    pub fn new(verbose: bool, json: bool) -> Self {
        Self { verbose, json }
    }

    /// Print an info message.
    pub fn info(&self, msg: &str) {
        if self.json {
            return;
        }
        println!("{} {}", style("ℹ").blue(), msg);
    }

    /// Print a success message.
    pub fn success(&self, msg: &str) {
        if self.json {
            return;
        }
        println!("{} {}", style("✓").green(), msg);
    }

    /// Print a warning message.
    pub fn warn(&self, msg: &str) {
        if self.json {
            return;
        }
        eprintln!("{} {}", style("⚠").yellow(), msg);
    }

    /// Print an error message.
    pub fn error(&self, msg: &str) {
        if self.json {
            eprintln!("{}", serde_json::json!({ "error": msg }));
            return;
        }
        eprintln!("{} {}", style("✗").red(), style(msg).red());
    }

    /// Print a debug message (only in verbose mode).
    pub fn debug(&self, msg: &str) {
        if !self.verbose || self.json {
            return;
        }
        eprintln!("{} {}", style("→").dim(), style(msg).dim());
    }

    /// Print a header/title.
    pub fn header(&self, msg: &str) {
        if self.json {
            return;
        }
        println!("\n{}", style(msg).bold().underlined());
    }

    /// Print JSON output.
    pub fn json<T: Serialize>(&self, value: &T) {
        if let Ok(json) = serde_json::to_string_pretty(value) {
            println!("{}", json);
        }
    }

    /// Print a key-value pair.
    pub fn kv(&self, key: &str, value: &str) {
        if self.json {
            return;
        }
        println!("  {}: {}", style(key).dim(), value);
    }

    /// Print a table row.
    pub fn table_row(&self, cols: &[&str], widths: &[usize]) {
        if self.json {
            return;
        }
        let formatted: Vec<String> = cols
            .iter()
            .zip(widths.iter())
            .map(|(col, width)| format!("{:width$}", col, width = width))
            .collect();
        println!("  {}", formatted.join("  ").trim_end());
    }

    /// Create a spinner for remote lookups.
    pub fn spinner(&self, msg: &str) -> ProgressBar {
        if self.json {
            return ProgressBar::hidden();
        }

        let pb = ProgressBar::new_spinner();
        if let Ok(spinner_style) = ProgressStyle::default_spinner().template("{spinner:.green} {msg}") {
            pb.set_style(spinner_style);
        }
        pb.set_message(msg.to_string());
        pb.enable_steady_tick(std::time::Duration::from_millis(100));
        pb
    }

    /// Print the cart, as a table or as JSON.
    pub fn cart(&self, cart: &Cart) {
        if self.json {
            self.json(&CartSummary::from(cart));
            return;
        }

        if cart.is_empty() {
            self.info("Cart is empty");
            return;
        }

        const WIDTHS: [usize; 5] = [6, 28, 6, 10, 10];
        self.header("Cart");
        println!(
            "  {}",
            style(format!(
                "{:<6}  {:<28}  {:>6}  {:>10}  {:>10}",
                "ID", "PRODUCT", "QTY", "PRICE", "SUBTOTAL"
            ))
            .dim()
        );
        for item in cart {
            self.table_row(
                &[
                    &item.product_id.to_string(),
                    &truncate(&item.name, WIDTHS[1]),
                    &format!("{:>6}", item.amount),
                    &format!("{:>10}", money(item.price)),
                    &format!("{:>10}", money(item.subtotal())),
                ],
                &WIDTHS,
            );
        }
        println!();
        self.kv("items", &cart.item_count().to_string());
        self.kv("total", &style(money(cart.total())).bold().to_string());
    }

    /// Check if JSON mode is enabled.
    pub fn is_json(&self) -> bool {
        self.json
    }
}

/// JSON view of a cart with its totals.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CartSummary<'a> {
    pub items: &'a [LineItem],
    pub item_count: u64,
    pub total: f64,
}

impl<'a> From<&'a Cart> for CartSummary<'a> {
    fn from(cart: &'a Cart) -> Self {
        Self {
            items: cart.items(),
            item_count: cart.item_count(),
            total: cart.total(),
        }
    }
}

/// Format a price with two decimals.
pub fn money(amount: f64) -> String {
    format!("{:.2}", amount)
}

/// Shorten `text` to `width` characters, marking the cut with an ellipsis.
fn truncate(text: &str, width: usize) -> String {
    if text.chars().count() <= width {
        return text.to_string();
    }
    let mut short: String = text.chars().take(width.saturating_sub(1)).collect();
    short.push('…');
    short
}
