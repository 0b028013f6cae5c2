//! Business documents derived from the order.
//!
//! Rendering is a pure function of the step and the order: the same inputs
//! always produce the same fields, so presentation can call it for display and
//! for export alike. The engine snapshots the documents of each step it enters
//! into the order's document history.

pub mod export;

pub use export::{export_documents, file_name, to_markdown};

use crate::handlers::{PROCUREMENT_COST, PRODUCTION_COST, PRODUCTION_DAYS, PRODUCTION_SHIPPING_COST};
use crate::state::OrderState;
use chrono::{Days, NaiveDate};
use revcycle_types::{
	document_number, format_currency, format_date, DocumentField, DocumentKey, InventoryStatus,
	RenderedDocument, Step,
};

/// Credit line extended to the customer.
pub const CREDIT_LIMIT: u64 = 100_000;
/// Balance the customer already owes before this order.
pub const OPEN_LIABILITIES: u64 = 30_000;
/// Finished goods on hand according to the inventory report.
pub const UNITS_IN_STOCK: u32 = 120;
/// Vendor price of one bike frame.
pub const FRAME_UNIT_COST: u64 = 400;
/// Days the customer has to pay the invoice.
pub const PAYMENT_TERM_DAYS: u64 = 30;

const SALES_ORDER_ID: &str = "SO-2025-0043";
const INVOICE_NUMBER: &str = "INV-2025-0103";
const SHIPMENT_ID: &str = "SHP-2025-0012";
const RAW_MATERIAL: &str = "Bike Frames (Black)";
const VENDOR: &str = "Premium Bike Frames Ltd.";
const STOCK_LOCATION: &str = "Aisle 7, Shelf 3";
const SHIPMENT_WEIGHT: &str = "1,500 kg";

/// Renders every document belonging to `step`, in display order.
pub fn render_documents(step: Step, state: &OrderState) -> Vec<RenderedDocument> {
	match step {
		Step::Inquiry => {
			let mut documents = vec![response_to_inquiry(state)];
			if let Some(notice) = state.document(DocumentKey::RejectionNotice) {
				documents.push(notice.document.clone());
			}
			documents
		},
		Step::OrderPlacement => vec![purchase_order(state)],
		Step::CreditCheck => vec![credit_check_report(state)],
		Step::Inventory => vec![inventory_status_report(state)],
		Step::BackOrder => vec![back_order_processing(state)],
		Step::Procurement => vec![purchase_requisition(state), vendor_purchase_order(state)],
		Step::Production => vec![production_order(state)],
		Step::Shipping => vec![
			picking_ticket(state),
			packing_slip(state),
			bill_of_lading(state),
		],
		Step::Billing => vec![customer_invoice(state), ar_journal_entry(state)],
		Step::Collections => vec![payment_processing(state)],
	}
}

/// Ordered `(label, value)` fields of all documents of `step`.
pub fn render_document_fields(step: Step, state: &OrderState) -> Vec<DocumentField> {
	render_documents(step, state)
		.into_iter()
		.flat_map(|document| document.fields)
		.collect()
}

/// Freight charged for the order.
///
/// Orders shipped from production are charged the production rate even before
/// the shipping step has booked it.
pub fn shipping_charge(state: &OrderState) -> u64 {
	if state.inventory_status() == InventoryStatus::OutOfStock {
		PRODUCTION_SHIPPING_COST
	} else {
		state.costs().shipping
	}
}

/// Where the shipped goods come from.
pub fn shipping_source(state: &OrderState) -> &'static str {
	if state.inventory_status() == InventoryStatus::OutOfStock {
		"Production"
	} else {
		"Inventory"
	}
}

/// Product value plus the booked shipping cost.
pub fn invoice_total(state: &OrderState) -> u64 {
	state.total_value().saturating_add(state.costs().shipping)
}

/// Notice sent to the customer when credit is refused.
pub fn rejection_notice(state: &OrderState) -> RenderedDocument {
	RenderedDocument::new(
		DocumentKey::RejectionNotice,
		vec![
			DocumentField::new("To", state.customer_name()),
			DocumentField::new("Date", format_date(state.current_date())),
			DocumentField::new("Subject", "Order Status Update"),
			DocumentField::new(
				"Message",
				"We regret to inform you that your order could not be processed at this time.",
			),
			DocumentField::new("Reason", "Credit Check Failed"),
			DocumentField::new(
				"Next Steps",
				"Please contact our credit department for further information.",
			),
		],
	)
}

fn date_after(date: NaiveDate, days: u64) -> String {
	date.checked_add_days(Days::new(days))
		.map(format_date)
		.unwrap_or_else(|| "Not scheduled".to_string())
}

fn units(quantity: u32) -> String {
	format!("{} units", quantity)
}

fn response_to_inquiry(state: &OrderState) -> RenderedDocument {
	RenderedDocument::new(
		DocumentKey::ResponseToInquiry,
		vec![
			DocumentField::new("Date", format_date(state.current_date())),
			DocumentField::new("To", state.customer_name()),
			DocumentField::new("Subject", "Response to Product Inquiry"),
			DocumentField::new("Product", state.product_name()),
			DocumentField::new("Unit Price", format_currency(state.unit_price())),
			DocumentField::new("Available Quantity", units(UNITS_IN_STOCK)),
			DocumentField::new("Delivery Timeframe", "5 business days"),
			DocumentField::new(
				"Next Steps",
				"Please submit a Purchase Order (PO) if these terms are acceptable.",
			),
		],
	)
}

fn purchase_order(state: &OrderState) -> RenderedDocument {
	RenderedDocument::new(
		DocumentKey::PurchaseOrder,
		vec![
			DocumentField::new("PO Number", document_number("PO", state.current_date())),
			DocumentField::new("Customer", state.customer_name()),
			DocumentField::new("Product", state.product_name()),
			DocumentField::new("Quantity", state.quantity().to_string()),
			DocumentField::new("Unit Price", format_currency(state.unit_price())),
			DocumentField::new("Total Value", format_currency(state.total_value())),
			DocumentField::new(
				"Requested Delivery Date",
				format_date(state.expected_delivery()),
			),
			DocumentField::new("Shipping Address", state.shipping_address()),
			DocumentField::new(
				"Next Step",
				"Check customer's credit limit before approving the order.",
			),
		],
	)
}

fn credit_check_report(state: &OrderState) -> RenderedDocument {
	let exposure = OPEN_LIABILITIES.saturating_add(state.total_value());
	RenderedDocument::new(
		DocumentKey::CreditCheckReport,
		vec![
			DocumentField::new("Customer", state.customer_name()),
			DocumentField::new("Date", format_date(state.current_date())),
			DocumentField::new("Credit Limit", format_currency(CREDIT_LIMIT)),
			DocumentField::new("Current Open Liabilities", format_currency(OPEN_LIABILITIES)),
			DocumentField::new("New Order Value", format_currency(state.total_value())),
			DocumentField::new("Total Exposure After Order", format_currency(exposure)),
			DocumentField::new("If Approved", "Order moves to Inventory Check"),
			DocumentField::new("If Rejected", "Generate Rejection Notice"),
		],
	)
}

fn inventory_status_report(state: &OrderState) -> RenderedDocument {
	RenderedDocument::new(
		DocumentKey::InventoryStatusReport,
		vec![
			DocumentField::new("Date", format_date(state.current_date())),
			DocumentField::new("Product", state.product_name()),
			DocumentField::new("Quantity Needed", state.quantity().to_string()),
			DocumentField::new("Available in FG Stock", units(UNITS_IN_STOCK)),
			DocumentField::new("Location", format!("Warehouse {}", STOCK_LOCATION)),
			DocumentField::new("If In Stock", "Proceed to Shipping"),
			DocumentField::new("If Out of Stock", "Create Back Order & Move to Production"),
		],
	)
}

fn back_order_processing(state: &OrderState) -> RenderedDocument {
	RenderedDocument::new(
		DocumentKey::BackOrderProcessing,
		vec![
			DocumentField::new("Date", format_date(state.current_date())),
			DocumentField::new("Order ID", document_number("BO", state.current_date())),
			DocumentField::new("Product", state.product_name()),
			DocumentField::new("Quantity", state.quantity().to_string()),
			DocumentField::new("Raw Material Required", RAW_MATERIAL),
			DocumentField::new("Raw Material Quantity", units(state.quantity())),
			DocumentField::new("If Available", "Proceed with Production"),
			DocumentField::new("If Not Available", "Trigger Procurement Process"),
		],
	)
}

fn purchase_requisition(state: &OrderState) -> RenderedDocument {
	RenderedDocument::new(
		DocumentKey::PurchaseRequisition,
		vec![
			DocumentField::new("PR Number", document_number("PR", state.current_date())),
			DocumentField::new("Date", format_date(state.current_date())),
			DocumentField::new("Item", RAW_MATERIAL),
			DocumentField::new("Quantity", units(state.quantity())),
			DocumentField::new("Required By", format_date(state.expected_delivery())),
			DocumentField::new("Supplier", VENDOR),
			DocumentField::new("Terms", "Net 30"),
			DocumentField::new("Expected Delivery", "10 business days"),
		],
	)
}

fn vendor_purchase_order(state: &OrderState) -> RenderedDocument {
	RenderedDocument::new(
		DocumentKey::VendorPurchaseOrder,
		vec![
			DocumentField::new("PO Number", document_number("PO-V", state.current_date())),
			DocumentField::new("Vendor", VENDOR),
			DocumentField::new("Material", RAW_MATERIAL),
			DocumentField::new("Quantity", units(state.quantity())),
			DocumentField::new("Unit Cost", format_currency(FRAME_UNIT_COST)),
			DocumentField::new("Total Cost", format_currency(PROCUREMENT_COST)),
			DocumentField::new("Delivery Address", "Warehouse Receiving Dock"),
			DocumentField::new("Required By", format_date(state.expected_delivery())),
		],
	)
}

fn production_order(state: &OrderState) -> RenderedDocument {
	RenderedDocument::new(
		DocumentKey::ProductionOrder,
		vec![
			DocumentField::new(
				"Production Order #",
				document_number("MO", state.current_date()),
			),
			DocumentField::new("Date", format_date(state.current_date())),
			DocumentField::new("Product", state.product_name()),
			DocumentField::new("Quantity", units(state.quantity())),
			DocumentField::new("Status", "In Production"),
			DocumentField::new("Start Date", format_date(state.current_date())),
			DocumentField::new(
				"Estimated Completion",
				date_after(state.current_date(), PRODUCTION_DAYS),
			),
			DocumentField::new("Production Cost", format_currency(PRODUCTION_COST)),
		],
	)
}

fn picking_ticket(state: &OrderState) -> RenderedDocument {
	RenderedDocument::new(
		DocumentKey::PickingTicket,
		vec![
			DocumentField::new(
				"Picking Ticket #",
				document_number("PT", state.current_date()),
			),
			DocumentField::new("Sales Order ID", SALES_ORDER_ID),
			DocumentField::new("Customer", state.customer_name()),
			DocumentField::new("Product", state.product_name()),
			DocumentField::new("Quantity", state.quantity().to_string()),
			DocumentField::new("Source", shipping_source(state)),
			DocumentField::new("Location", STOCK_LOCATION),
			DocumentField::new("Status", "Ready for Picking"),
		],
	)
}

fn packing_slip(state: &OrderState) -> RenderedDocument {
	RenderedDocument::new(
		DocumentKey::PackingSlip,
		vec![
			DocumentField::new("Packing Slip #", document_number("PS", state.current_date())),
			DocumentField::new("Customer", state.customer_name()),
			DocumentField::new("Sales Order ID", SALES_ORDER_ID),
			DocumentField::new("Product", state.product_name()),
			DocumentField::new("Quantity", state.quantity().to_string()),
			DocumentField::new("Total Weight", SHIPMENT_WEIGHT),
			DocumentField::new("Packing Date", format_date(state.current_date())),
			DocumentField::new("Status", "Packed"),
		],
	)
}

fn bill_of_lading(state: &OrderState) -> RenderedDocument {
	RenderedDocument::new(
		DocumentKey::BillOfLading,
		vec![
			DocumentField::new("BoL #", document_number("BOL", state.current_date())),
			DocumentField::new("Carrier", "Fast Freight Logistics"),
			DocumentField::new("Shipment ID", SHIPMENT_ID),
			DocumentField::new("Origin", "Bicycle Manufacturer Warehouse, CA"),
			DocumentField::new("Destination", state.shipping_address()),
			DocumentField::new("Product", state.product_name()),
			DocumentField::new("Quantity", state.quantity().to_string()),
			DocumentField::new("Total Weight", SHIPMENT_WEIGHT),
			DocumentField::new("Freight Charges", format_currency(shipping_charge(state))),
			DocumentField::new("Incoterms", "FOB (Free on Board)"),
			DocumentField::new("Insurance", "$200,000 coverage"),
			DocumentField::new("Status", "Ready for Shipment"),
		],
	)
}

fn customer_invoice(state: &OrderState) -> RenderedDocument {
	RenderedDocument::new(
		DocumentKey::CustomerInvoice,
		vec![
			DocumentField::new("Invoice #", INVOICE_NUMBER),
			DocumentField::new("Date", format_date(state.current_date())),
			DocumentField::new("Bill To", state.customer_name()),
			DocumentField::new("Billing Address", state.shipping_address()),
			DocumentField::new("Sales Order ID", SALES_ORDER_ID),
			DocumentField::new("Product", state.product_name()),
			DocumentField::new("Quantity", state.quantity().to_string()),
			DocumentField::new("Unit Price", format_currency(state.unit_price())),
			DocumentField::new("Total Product Cost", format_currency(state.total_value())),
			DocumentField::new("Freight Cost", format_currency(state.costs().shipping)),
			DocumentField::new("Total Invoice Amount", format_currency(invoice_total(state))),
			DocumentField::new("Payment Terms", "Net 30"),
			DocumentField::new("Due Date", date_after(state.current_date(), PAYMENT_TERM_DAYS)),
			DocumentField::new("Status", "Sent to Customer"),
		],
	)
}

fn ar_journal_entry(state: &OrderState) -> RenderedDocument {
	RenderedDocument::new(
		DocumentKey::ArJournalEntry,
		vec![
			DocumentField::new("Date", format_date(state.current_date())),
			DocumentField::new(
				"Debit: Accounts Receivable",
				format_currency(invoice_total(state)),
			),
			DocumentField::new("Credit: Sales Revenue", format_currency(state.total_value())),
			DocumentField::new(
				"Credit: Freight Revenue",
				format_currency(state.costs().shipping),
			),
		],
	)
}

fn payment_processing(state: &OrderState) -> RenderedDocument {
	RenderedDocument::new(
		DocumentKey::PaymentProcessing,
		vec![
			DocumentField::new("Invoice #", INVOICE_NUMBER),
			DocumentField::new("Total Invoice Amount", format_currency(invoice_total(state))),
			DocumentField::new("Due Date", date_after(state.current_date(), PAYMENT_TERM_DAYS)),
			DocumentField::new("Payment Method", "Wire Transfer"),
			DocumentField::new("Payment Terms", "Net 30"),
			DocumentField::new("Bank", "Commerce Bank"),
			DocumentField::new("Account", "XXXXXXXX"),
			DocumentField::new("Reference", INVOICE_NUMBER),
			DocumentField::new("Status", "Awaiting Payment"),
		],
	)
}
