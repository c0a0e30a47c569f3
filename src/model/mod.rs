pub mod buyer;
pub mod invoice_result;
pub mod line_item;
