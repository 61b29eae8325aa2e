use crate::api::Transaction;
use crate::utils::Table;

const HEADERS: [&str; 6] = ["ID", "Employee", "Merchant", "Date", "Amount", "Approved"];
const AMOUNT_COLUMN: usize = 4;

pub fn format_amount(amount: f64) -> String {
    if amount < 0.0 {
        format!("-${:.2}", -amount)
    } else {
        format!("${:.2}", amount)
    }
}

/// Transaction list panel; `None` means nothing has been loaded yet
pub fn render(transactions: Option<&[Transaction]>) -> String {
    let transactions = match transactions {
        None => return "Loading transactions...".to_string(),
        Some([]) => return "No transactions found".to_string(),
        Some(transactions) => transactions,
    };

    let mut table = Table::new(&HEADERS).align_right(AMOUNT_COLUMN);
    for tx in transactions {
        table.add_row(vec![
            tx.id.clone(),
            tx.employee.full_name(),
            tx.merchant.clone(),
            tx.date.format("%b %d, %Y").to_string(),
            format_amount(tx.amount),
            if tx.approved { "[x]" } else { "[ ]" }.to_string(),
        ]);
    }

    table.render()
}
