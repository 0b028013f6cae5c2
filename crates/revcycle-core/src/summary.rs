//! Progress, timeline and cost summaries shown next to the current step.

use crate::state::OrderState;
use chrono::NaiveDate;
use revcycle_types::{format_currency, format_date, CostCategory, Step};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Where a step stands relative to the current one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum StepProgress {
	Completed,
	Current,
	Pending,
}

impl fmt::Display for StepProgress {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		let marker = match self {
			StepProgress::Completed => "[x]",
			StepProgress::Current => "[>]",
			StepProgress::Pending => "[ ]",
		};
		f.write_str(marker)
	}
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProgressLine {
	pub step: Step,
	pub name: String,
	pub progress: StepProgress,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Timeline {
	pub start_date: NaiveDate,
	pub current_date: NaiveDate,
	pub expected_delivery: NaiveDate,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CostLine {
	pub category: CostCategory,
	pub amount: u64,
}

/// Everything a sidebar needs besides the documents themselves.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderSummary {
	pub progress: Vec<ProgressLine>,
	pub timeline: Timeline,
	/// Categories with a non-zero amount, in display order.
	pub costs: Vec<CostLine>,
	pub total_cost: u64,
}

impl OrderSummary {
	pub fn from_state(state: &OrderState) -> Self {
		let current = state.current_step();
		let progress = Step::all()
			.map(|step| ProgressLine {
				step,
				name: step.name().to_string(),
				progress: match step.cmp(&current) {
					std::cmp::Ordering::Less => StepProgress::Completed,
					std::cmp::Ordering::Equal => StepProgress::Current,
					std::cmp::Ordering::Greater => StepProgress::Pending,
				},
			})
			.collect();

		let costs = state
			.costs()
			.iter()
			.filter(|(_, amount)| *amount > 0)
			.map(|(category, amount)| CostLine { category, amount })
			.collect();

		Self {
			progress,
			timeline: Timeline {
				start_date: state.start_date(),
				current_date: state.current_date(),
				expected_delivery: state.expected_delivery(),
			},
			costs,
			total_cost: state.costs().total(),
		}
	}
}

impl fmt::Display for OrderSummary {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		writeln!(f, "Progress")?;
		for line in &self.progress {
			writeln!(f, "  {} {}. {}", line.progress, line.step.id(), line.name)?;
		}

		writeln!(f, "Timeline")?;
		writeln!(f, "  Start Date: {}", format_date(self.timeline.start_date))?;
		writeln!(f, "  Current Date: {}", format_date(self.timeline.current_date))?;
		writeln!(
			f,
			"  Expected Delivery: {}",
			format_date(self.timeline.expected_delivery)
		)?;

		writeln!(f, "Cost Summary")?;
		for line in &self.costs {
			writeln!(f, "  {}: {}", line.category, format_currency(line.amount))?;
		}
		if self.total_cost > 0 {
			writeln!(f, "  Total Cost: {}", format_currency(self.total_cost))?;
		}
		Ok(())
	}
}
