pub const INSTRUCTIONS: &str = "\
Expense Transactions

Browse employee expense transactions. The list starts with every employee;
pick one to narrow it down, or load more pages of the full list.

Commands:
  filter <id | full name | all>   Filter by employee (alias: f)
  more                            View more transactions (alias: m)
  approve <transaction id>        Mark a listed transaction approved
  unapprove <transaction id>      Clear approval of a listed transaction
  help                            Show this panel (aliases: h, ?)
  quit                            Leave (aliases: q, exit)";

pub fn render() -> &'static str {
    INSTRUCTIONS
}
