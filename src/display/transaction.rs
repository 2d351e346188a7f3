//! Transaction display formatting

use std::collections::HashMap;

use crate::models::{CategoryId, CurrencyFormat, Transaction};

/// Format transactions as a register, newest first as given
pub fn format_transaction_register(
    transactions: &[Transaction],
    category_names: &HashMap<CategoryId, String>,
    format: &CurrencyFormat,
) -> String {
    if transactions.is_empty() {
        return "No transactions found.\n".to_string();
    }

    let mut output = String::new();
    output.push_str(&format!(
        "{:10} {:20} {:>12}  {}\n",
        "Date", "Category", "Amount", "Memo"
    ));
    output.push_str(&"-".repeat(56));
    output.push('\n');

    for txn in transactions {
        let category = category_names
            .get(&txn.category_id)
            .map(String::as_str)
            .unwrap_or("(unknown)");
        output.push_str(&format!(
            "{:10} {:20} {:>12}  {}\n",
            txn.date.format("%Y-%m-%d"),
            truncate(category, 20),
            txn.amount.format_with(format),
            txn.memo
        ));
    }

    output
}

fn truncate(s: &str, max_len: usize) -> String {
    if s.chars().count() <= max_len {
        s.to_string()
    } else {
        let kept: String = s.chars().take(max_len.saturating_sub(3)).collect();
        format!("{}...", kept)
    }
}
