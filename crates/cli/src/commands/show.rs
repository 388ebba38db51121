//! Cart listing.

use rocketshoes_core::{Cart, CurrencyCode, Price};

/// One line per cart item followed by a totals line.
pub fn render(cart: &Cart, currency: CurrencyCode) -> Vec<String> {
    if cart.is_empty() {
        return vec!["Cart is empty".to_string()];
    }

    let mut lines: Vec<String> = cart
        .iter()
        .map(|item| {
            format!(
                "#{} {} - {} x {} = {}",
                item.id,
                item.name,
                item.amount,
                Price::new(item.price, currency),
                Price::new(item.subtotal(), currency),
            )
        })
        .collect();

    lines.push(format!(
        "{} product(s), {} unit(s), total {}",
        cart.len(),
        cart.total_quantity(),
        Price::new(cart.total(), currency),
    ));
    lines
}

/// Log the rendered cart at info level.
pub fn log_cart(cart: &Cart, currency: CurrencyCode) {
    for line in render(cart, currency) {
        tracing::info!("{line}");
    }
}
