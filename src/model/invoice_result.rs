use serde::{Deserialize, Deserializer};
use serde_json::Value;
use time::PrimitiveDateTime;

use crate::{error::EzpayResult, time::parse_create_time};

/// ezPay 的金额有时以数字、有时以字串回传
fn amount<'de, D>(deserializer: D) -> Result<Option<u64>, D::Error>
where
    D: Deserializer<'de>,
{
    match Option::<Value>::deserialize(deserializer)? {
        None | Some(Value::Null) => Ok(None),
        Some(Value::Number(n)) => n
            .as_u64()
            .map(Some)
            .ok_or_else(|| serde::de::Error::custom(format!("invalid amount: {}", n))),
        Some(Value::String(s)) if s.is_empty() => Ok(None),
        Some(Value::String(s)) => s
            .parse()
            .map(Some)
            .map_err(|_| serde::de::Error::custom(format!("invalid amount: {}", s))),
        Some(other) => Err(serde::de::Error::custom(format!(
            "invalid amount: {}",
            other
        ))),
    }
}

/// 开立发票成功后的回传内容
#[derive(Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct IssuedInvoice {
    #[serde(rename = "MerchantID", default)]
    pub merchant_id: String,
    #[serde(rename = "InvoiceTransNo", default)]
    pub invoice_trans_no: String,
    #[serde(rename = "MerchantOrderNo", default)]
    pub merchant_order_no: String,
    #[serde(rename = "InvoiceNumber")]
    pub invoice_number: String,
    #[serde(rename = "RandomNum", default)]
    pub random_num: String,
    #[serde(rename = "TotalAmt", default, deserialize_with = "amount")]
    pub total_amt: Option<u64>,
    #[serde(rename = "CreateTime", default)]
    pub create_time: String,
}

impl IssuedInvoice {
    pub fn created_at(&self) -> EzpayResult<PrimitiveDateTime> {
        parse_create_time(&self.create_time)
    }
}

/// 作废发票成功后的回传内容
#[derive(Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct VoidedInvoice {
    #[serde(rename = "MerchantID", default)]
    pub merchant_id: String,
    #[serde(rename = "InvoiceNumber")]
    pub invoice_number: String,
    #[serde(rename = "CreateTime", default)]
    pub create_time: String,
}

impl VoidedInvoice {
    pub fn created_at(&self) -> EzpayResult<PrimitiveDateTime> {
        parse_create_time(&self.create_time)
    }
}

/// 查询发票的回传内容，只列出常用栏位
#[derive(Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct InvoiceDetail {
    #[serde(rename = "MerchantID", default)]
    pub merchant_id: String,
    #[serde(rename = "InvoiceTransNo", default)]
    pub invoice_trans_no: String,
    #[serde(rename = "MerchantOrderNo", default)]
    pub merchant_order_no: String,
    #[serde(rename = "InvoiceNumber")]
    pub invoice_number: String,
    #[serde(rename = "RandomNum", default)]
    pub random_num: String,
    #[serde(rename = "BuyerName", default)]
    pub buyer_name: String,
    #[serde(rename = "BuyerUBN", default)]
    pub buyer_ubn: String,
    #[serde(rename = "Category", default)]
    pub category: String,
    #[serde(rename = "TaxType", default)]
    pub tax_type: String,
    #[serde(rename = "Amt", default, deserialize_with = "amount")]
    pub amt: Option<u64>,
    #[serde(rename = "TaxAmt", default, deserialize_with = "amount")]
    pub tax_amt: Option<u64>,
    #[serde(rename = "TotalAmt", default, deserialize_with = "amount")]
    pub total_amt: Option<u64>,
    /// 发票状态，1 = 开立，2 = 作废
    #[serde(rename = "InvoiceStatus", default)]
    pub invoice_status: String,
    #[serde(rename = "CreateTime", default)]
    pub create_time: String,
}

impl InvoiceDetail {
    pub fn created_at(&self) -> EzpayResult<PrimitiveDateTime> {
        parse_create_time(&self.create_time)
    }

    pub fn is_voided(&self) -> bool {
        self.invoice_status == "2"
    }
}
