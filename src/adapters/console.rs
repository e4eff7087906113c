use crate::core::{CartLine, Presenter, Product};
use dialoguer::Confirm;

/// Prints to stdout and asks questions on the terminal.
pub struct ConsolePresenter {
    assume_yes: bool,
    show_catalog: bool,
}

impl ConsolePresenter {
    pub fn new(assume_yes: bool) -> Self {
        Self {
            assume_yes,
            show_catalog: false,
        }
    }

    /// The catalog listing is long; it is printed only when asked for.
    pub fn set_show_catalog(&mut self, show: bool) {
        self.show_catalog = show;
    }

    fn confirm(&self, prompt: &str, default: bool) -> bool {
        if self.assume_yes {
            return true;
        }

        match Confirm::new().with_prompt(prompt).default(default).interact() {
            Ok(answer) => answer,
            Err(e) => {
                tracing::warn!("Prompt failed, treating as 'no': {}", e);
                false
            }
        }
    }
}

impl Presenter for ConsolePresenter {
    fn render_catalog(&mut self, products: &[Product]) {
        if !self.show_catalog {
            return;
        }
        if products.is_empty() {
            println!("No products available.");
            return;
        }

        for product in products {
            println!(
                "{:<16} {:<40} ${:>10.2}  stock: {:<4} {:<12} {}",
                product.id,
                truncate(&product.name, 40),
                product.unit_price,
                product.stock,
                product.condition,
                if product.free_shipping {
                    "free shipping"
                } else {
                    "shipping paid by buyer"
                }
            );
        }
    }

    fn render_cart_summary(&mut self, total_items: u32) {
        println!("Cart ({})", total_items);
    }

    fn render_cart_detail(&mut self, lines: &[CartLine], total: f64) {
        if lines.is_empty() {
            println!("The cart is empty.");
        }
        for line in lines {
            println!(
                "{:<16} {:<40} x{:<4} subtotal: ${:.2}",
                line.id,
                truncate(&line.name, 40),
                line.quantity,
                line.subtotal
            );
        }
        println!("Total: ${:.2}", total);
    }

    fn insufficient_stock(&mut self) {
        eprintln!("Error: not enough stock available.");
    }

    fn empty_cart(&mut self) {
        eprintln!("Error: the cart is empty.");
    }

    fn confirm_clear(&mut self) -> bool {
        self.confirm("All products will be removed from the cart. Continue?", false)
    }

    fn cart_cleared(&mut self) {
        println!("Cart emptied: all products were removed from the cart.");
    }

    fn checkout_complete(&mut self, item_count: usize, total: f64) -> bool {
        println!(
            "Purchase complete: you bought {} products for a total of ${:.2}",
            item_count, total
        );
        self.confirm("OK?", true)
    }
}

fn truncate(text: &str, max_chars: usize) -> String {
    if text.chars().count() <= max_chars {
        return text.to_string();
    }
    let mut cut: String = text.chars().take(max_chars.saturating_sub(1)).collect();
    cut.push('…');
    cut
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_truncate_long_names() {
        assert_eq!(truncate("Mouse", 10), "Mouse");
        assert_eq!(truncate("Notebook Pro Max", 8), "Noteboo…");
    }

    #[test]
    fn test_assume_yes_skips_prompts() {
        let mut presenter = ConsolePresenter::new(true);
        assert!(presenter.confirm_clear());
        assert!(presenter.checkout_complete(1, 10.0));
    }
}
