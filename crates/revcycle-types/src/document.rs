//! Business documents produced along the revenue cycle.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Identifies a generated business document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum DocumentKey {
	ResponseToInquiry,
	RejectionNotice,
	PurchaseOrder,
	CreditCheckReport,
	InventoryStatusReport,
	BackOrderProcessing,
	PurchaseRequisition,
	VendorPurchaseOrder,
	ProductionOrder,
	PickingTicket,
	PackingSlip,
	BillOfLading,
	CustomerInvoice,
	ArJournalEntry,
	PaymentProcessing,
}

impl DocumentKey {
	/// Document title as shown to the learner.
	pub fn title(&self) -> &'static str {
		match self {
			Self::ResponseToInquiry => "Response to Inquiry",
			Self::RejectionNotice => "Rejected Order Notification",
			Self::PurchaseOrder => "Purchase Order Received",
			Self::CreditCheckReport => "Credit Check Report",
			Self::InventoryStatusReport => "Inventory Status Report",
			Self::BackOrderProcessing => "Back Order Processing",
			Self::PurchaseRequisition => "Purchase Requisition",
			Self::VendorPurchaseOrder => "Purchase Order to Vendor",
			Self::ProductionOrder => "Production Order",
			Self::PickingTicket => "Picking Ticket",
			Self::PackingSlip => "Packing Slip",
			Self::BillOfLading => "Bill of Lading",
			Self::CustomerInvoice => "Invoice",
			Self::ArJournalEntry => "Accounts Receivable Update",
			Self::PaymentProcessing => "Payment Processing",
		}
	}

	/// File name stem used when the document is exported.
	pub fn file_stem(&self) -> &'static str {
		match self {
			Self::ResponseToInquiry => "response_to_inquiry",
			Self::RejectionNotice => "order_rejection_notice",
			Self::PurchaseOrder => "purchase_order",
			Self::CreditCheckReport => "credit_check_report",
			Self::InventoryStatusReport => "inventory_status_report",
			Self::BackOrderProcessing => "back_order_processing",
			Self::PurchaseRequisition => "purchase_requisition",
			Self::VendorPurchaseOrder => "purchase_order_vendor",
			Self::ProductionOrder => "production_order",
			Self::PickingTicket => "picking_ticket",
			Self::PackingSlip => "packing_slip",
			Self::BillOfLading => "bill_of_lading",
			Self::CustomerInvoice => "customer_invoice",
			Self::ArJournalEntry => "ar_journal_entry",
			Self::PaymentProcessing => "payment_processing",
		}
	}
}

impl fmt::Display for DocumentKey {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(self.title())
	}
}

/// A labelled line of a document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DocumentField {
	pub label: String,
	pub value: String,
}

impl DocumentField {
	pub fn new(label: impl Into<String>, value: impl Into<String>) -> Self {
		Self {
			label: label.into(),
			value: value.into(),
		}
	}
}

/// A document derived from the current order state.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RenderedDocument {
	pub key: DocumentKey,
	pub title: String,
	pub fields: Vec<DocumentField>,
}

impl RenderedDocument {
	pub fn new(key: DocumentKey, fields: Vec<DocumentField>) -> Self {
		Self {
			key,
			title: key.title().to_string(),
			fields,
		}
	}

	/// Returns the value of the first field with `label`.
	pub fn field(&self, label: &str) -> Option<&str> {
		self.fields
			.iter()
			.find(|f| f.label == label)
			.map(|f| f.value.as_str())
	}
}

/// A document stored on the order, stamped with the simulated date it was issued.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DocumentRecord {
	pub document: RenderedDocument,
	pub issued_on: NaiveDate,
}

impl DocumentRecord {
	pub fn new(document: RenderedDocument, issued_on: NaiveDate) -> Self {
		Self {
			document,
			issued_on,
		}
	}

	pub fn key(&self) -> DocumentKey {
		self.document.key
	}

	pub fn field(&self, label: &str) -> Option<&str> {
		self.document.field(label)
	}
}
