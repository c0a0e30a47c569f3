use serde::{Deserialize, Serialize};

use crate::{
    error::{Error, EzpayResult},
    form::PostData,
};

use super::{common_fields, EzpayRequest};

/// 作废发票
pub const INVOICE_INVALID: &str = "/Api/invoice_invalid";

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct InvoiceInvalidRequest {
    invoice_number: String,
    invalid_reason: String,
}

impl InvoiceInvalidRequest {
    pub fn new<S: Into<String>, R: Into<String>>(invoice_number: S, invalid_reason: R) -> Self {
        Self {
            invoice_number: invoice_number.into(),
            invalid_reason: invalid_reason.into(),
        }
    }

    pub fn get_invoice_number(&self) -> &str {
        &self.invoice_number
    }

    pub fn get_invalid_reason(&self) -> &str {
        &self.invalid_reason
    }
}

impl EzpayRequest for InvoiceInvalidRequest {
    const API: &'static str = INVOICE_INVALID;
    const VERSION: &'static str = "1.0";

    fn reference(&self) -> &str {
        &self.invoice_number
    }

    fn post_data(&self, timestamp: u64) -> EzpayResult<PostData> {
        if self.invoice_number.trim().is_empty() {
            return Err(Error::Params("invoice number must not be empty".to_owned()));
        }

        let mut data = common_fields::<Self>(timestamp);
        data.add_field("InvoiceNumber", &self.invoice_number);
        data.add_field("InvalidReason", &self.invalid_reason);

        Ok(data)
    }
}

#[cfg(test)]
mod tests {
    use super::InvoiceInvalidRequest;
    use crate::request::EzpayRequest;

    #[test]
    fn fields() {
        let data = InvoiceInvalidRequest::new("AB12345678", "客户退货")
            .post_data(1_693_580_767)
            .unwrap();

        assert_eq!(
            data.keys(),
            vec!["RespondType", "Version", "TimeStamp", "InvoiceNumber", "InvalidReason"]
        );
        assert_eq!(data.get("Version"), Some("1.0"));
        assert_eq!(data.get("InvoiceNumber"), Some("AB12345678"));
        assert_eq!(data.get("InvalidReason"), Some("客户退货"));
    }

    #[test]
    fn requires_invoice_number() {
        assert!(InvoiceInvalidRequest::new("", "dup").post_data(0).is_err());
    }
}
