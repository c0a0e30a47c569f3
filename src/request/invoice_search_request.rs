use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::{
    error::{Error, EzpayResult},
    form::PostData,
};

use super::{common_fields, EzpayRequest};

/// 查询发票
pub const INVOICE_SEARCH: &str = "/Api/invoice_search";

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq, Default)]
pub struct InvoiceSearchRequest {
    merchant_order_no: String,
    total_amt: u64,
    invoice_number: String,
    random_num: Option<String>,
}

impl InvoiceSearchRequest {
    pub fn new<O: Into<String>, I: Into<String>>(
        merchant_order_no: O,
        total_amt: u64,
        invoice_number: I,
    ) -> Self {
        Self {
            merchant_order_no: merchant_order_no.into(),
            total_amt,
            invoice_number: invoice_number.into(),
            random_num: None,
        }
    }

    /// 以订单编号与金额查询
    pub fn by_order<S: Into<String>>(merchant_order_no: S, total_amt: u64) -> Self {
        Self::new(merchant_order_no, total_amt, "")
    }

    /// 以发票号码与防伪随机码查询
    pub fn by_invoice<S: Into<String>, R: Into<String>>(invoice_number: S, random_num: R) -> Self {
        Self::new("", 0, invoice_number).with_random_num(random_num)
    }

    pub fn with_random_num<S: Into<String>>(mut self, random_num: S) -> Self {
        self.random_num = Some(random_num.into());
        self
    }

    pub fn get_merchant_order_no(&self) -> &str {
        &self.merchant_order_no
    }

    pub fn get_total_amt(&self) -> u64 {
        self.total_amt
    }

    pub fn get_invoice_number(&self) -> &str {
        &self.invoice_number
    }

    pub fn get_random_num(&self) -> Option<&str> {
        self.random_num.as_deref()
    }
}

impl EzpayRequest for InvoiceSearchRequest {
    const API: &'static str = INVOICE_SEARCH;
    const VERSION: &'static str = "1.3";

    fn reference(&self) -> &str {
        if self.invoice_number.is_empty() {
            &self.merchant_order_no
        } else {
            &self.invoice_number
        }
    }

    fn post_data(&self, timestamp: u64) -> EzpayResult<PostData> {
        if self.merchant_order_no.trim().is_empty() && self.invoice_number.trim().is_empty() {
            return Err(Error::Params(
                "either merchant order number or invoice number is required".to_owned(),
            ));
        }

        // 未给防伪随机码时以四位数填充
        let random_num = match &self.random_num {
            Some(r) => r.clone(),
            None => rand::thread_rng().gen_range(1000..=9999).to_string(),
        };

        let mut data = common_fields::<Self>(timestamp);
        data.add_field("MerchantOrderNo", &self.merchant_order_no);
        data.add_field("TotalAmt", self.total_amt);
        data.add_field("InvoiceNumber", &self.invoice_number);
        data.add_field("RandomNum", random_num);

        Ok(data)
    }
}
