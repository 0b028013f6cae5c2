//! String formatting utilities.
//!
//! Provides the date, money and reference-number formats printed on documents,
//! and truncation of identifiers for log output.

use chrono::NaiveDate;

/// Utility function to truncate an identifier for display purposes.
///
/// Shows only the first 8 characters followed by ".." for longer strings.
pub fn truncate_id(id: &str) -> String {
	match id.char_indices().nth(8) {
		Some((end, _)) => format!("{}..", &id[..end]),
		None => id.to_string(),
	}
}

/// Formats a date the way documents print it, e.g. "January 05, 2025".
pub fn format_date(date: NaiveDate) -> String {
	date.format("%B %d, %Y").to_string()
}

/// Formats whole dollars with thousands separators, e.g. "$50,000".
pub fn format_currency(amount: u64) -> String {
	let digits = amount.to_string();
	let mut grouped = String::with_capacity(digits.len() + digits.len() / 3 + 1);
	for (i, ch) in digits.chars().enumerate() {
		if i > 0 && (digits.len() - i) % 3 == 0 {
			grouped.push(',');
		}
		grouped.push(ch);
	}
	format!("${}", grouped)
}

/// Builds a dated reference number such as "PO-20250105".
pub fn document_number(prefix: &str, date: NaiveDate) -> String {
	format!("{}-{}", prefix, date.format("%Y%m%d"))
}
