//! ezPay 电子发票 SDK：开立、作废、查询发票。
//!
//! ```no_run
//! use rust_ezpay_sdk::{
//!     ezpay::{EzpayConfig, EzpaySDK},
//!     model::{buyer::Buyer, line_item::LineItems},
//!     request::invoice_issue_request::InvoiceIssueRequest,
//! };
//!
//! # fn main() -> rust_ezpay_sdk::error::EzpayResult<()> {
//! let config = EzpayConfig::builder("3622183", "abcdefghijklmnopqrstuvwxyz123456", "1234567890abcdef")
//!     .build()?;
//! let sdk = EzpaySDK::new(config);
//!
//! let request = InvoiceIssueRequest::new(
//!     "ORDER001",
//!     Buyer::new("Jane Doe"),
//!     LineItems::single("Plan", 1, "式", 1050)?,
//! );
//! let result = sdk.issue_invoice(&request)?;
//! if result.success {
//!     println!("{}", result.issued_invoice()?.invoice_number);
//! }
//! # Ok(())
//! # }
//! ```

pub mod error;
pub mod ezpay;
pub mod form;
pub mod model;
pub mod request;
pub mod tax;
pub mod time;
pub mod transport;
pub mod util;

#[macro_use]
extern crate log;
