use serde::{Deserialize, Serialize};

use crate::{
    error::{Error, EzpayResult},
    form::PostData,
    model::{buyer::Buyer, line_item::LineItems},
    tax::{self, TaxBreakdown, TaxMode},
};

use super::{common_fields, EzpayRequest};

/// 开立发票
pub const INVOICE_ISSUE: &str = "/Api/invoice_issue";

/// 未指定时的营业税率（%）
pub const DEFAULT_TAX_RATE: u32 = 5;

/// `Status=1`：即时开立
const ISSUE_NOW: &str = "1";
/// `TaxType=1`：应税
const TAX_TYPE_TAXABLE: &str = "1";

#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct InvoiceIssueRequest {
    order_number: String,
    buyer: Buyer,
    items: LineItems,
    tax_rate: u32,
    tax_mode: TaxMode,
}

impl InvoiceIssueRequest {
    pub fn new<S: Into<String>>(order_number: S, buyer: Buyer, items: LineItems) -> Self {
        Self {
            order_number: order_number.into(),
            buyer,
            items,
            tax_rate: DEFAULT_TAX_RATE,
            tax_mode: TaxMode::default(),
        }
    }

    pub fn with_tax_rate(mut self, tax_rate: u32) -> Self {
        self.tax_rate = tax_rate;
        self
    }

    pub fn with_tax_mode(mut self, tax_mode: TaxMode) -> Self {
        self.tax_mode = tax_mode;
        self
    }

    pub fn get_order_number(&self) -> &str {
        &self.order_number
    }

    pub fn get_buyer(&self) -> &Buyer {
        &self.buyer
    }

    pub fn get_items(&self) -> &LineItems {
        &self.items
    }

    pub fn get_tax_rate(&self) -> u32 {
        self.tax_rate
    }

    pub fn get_tax_mode(&self) -> TaxMode {
        self.tax_mode
    }

    pub fn tax_breakdown(&self) -> EzpayResult<TaxBreakdown> {
        tax::calculate(self.items.subtotal()?, self.tax_rate, self.tax_mode)
    }
}

impl EzpayRequest for InvoiceIssueRequest {
    const API: &'static str = INVOICE_ISSUE;
    const VERSION: &'static str = "1.5";

    fn reference(&self) -> &str {
        &self.order_number
    }

    fn post_data(&self, timestamp: u64) -> EzpayResult<PostData> {
        if self.order_number.trim().is_empty() {
            return Err(Error::Params("order number must not be empty".to_owned()));
        }

        let items = self.items.encode()?;
        let tax = tax::calculate(items.subtotal, self.tax_rate, self.tax_mode)?;
        let recipient = self.buyer.get_recipient();
        let carrier = recipient.carrier_fields(self.buyer.get_name());

        let mut data = common_fields::<Self>(timestamp);
        data.add_field("MerchantOrderNo", &self.order_number);
        data.add_field("Status", ISSUE_NOW);
        data.add_field("Category", carrier.category.as_str());
        data.add_field("BuyerName", self.buyer.display_name());
        data.add_field("BuyerUBN", recipient.ubn().unwrap_or_default());
        data.add_field("BuyerEmail", self.buyer.get_email().unwrap_or_default());
        data.add_field("CarrierType", carrier.carrier_type);
        data.add_field("CarrierNum", carrier.carrier_num);
        data.add_field("PrintFlag", carrier.print_flag);
        data.add_field("TaxType", TAX_TYPE_TAXABLE);
        data.add_field("TaxRate", self.tax_rate);
        data.add_field("Amt", tax.untaxed);
        data.add_field("TaxAmt", tax.tax);
        data.add_field("TotalAmt", tax.total);
        data.add_field("ItemName", items.item_name);
        data.add_field("ItemCount", items.item_count);
        data.add_field("ItemUnit", items.item_unit);
        data.add_field("ItemPrice", items.item_price);
        data.add_field("ItemAmt", items.item_amt);

        Ok(data)
    }
}
