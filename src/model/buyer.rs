use serde::{Deserialize, Serialize};
use urlencoding::encode;

/// 发票类别
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
pub enum Category {
    B2B,
    B2C,
}

impl Category {
    pub fn as_str(&self) -> &str {
        match self {
            Category::B2B => "B2B",
            Category::B2C => "B2C",
        }
    }
}

/// 发票的归属方式
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub enum InvoiceRecipient {
    /// 公司统编，开立 B2B 纸本发票
    UnifiedBusinessNumber(String),
    /// 手机条码载具
    CarrierCode(String),
    /// ezPay 电子发票载具
    DefaultElectronicCarrier,
}

impl Default for InvoiceRecipient {
    fn default() -> Self {
        InvoiceRecipient::DefaultElectronicCarrier
    }
}

/// 由载具决定的四个字段
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CarrierFields {
    pub category: Category,
    pub carrier_type: &'static str,
    pub carrier_num: String,
    pub print_flag: &'static str,
}

fn present(v: Option<&str>) -> Option<&str> {
    v.map(str::trim).filter(|s| !s.is_empty())
}

impl InvoiceRecipient {
    /// 统编优先于载具，两者皆无时使用 ezPay 载具。空字串视为未提供。
    pub fn from_optional(ubn: Option<&str>, carrier: Option<&str>) -> Self {
        if let Some(ubn) = present(ubn) {
            InvoiceRecipient::UnifiedBusinessNumber(ubn.to_owned())
        } else if let Some(code) = present(carrier) {
            InvoiceRecipient::CarrierCode(code.to_owned())
        } else {
            InvoiceRecipient::DefaultElectronicCarrier
        }
    }

    pub fn category(&self) -> Category {
        match self {
            InvoiceRecipient::UnifiedBusinessNumber(_) => Category::B2B,
            _ => Category::B2C,
        }
    }

    pub fn ubn(&self) -> Option<&str> {
        match self {
            InvoiceRecipient::UnifiedBusinessNumber(ubn) => Some(ubn),
            _ => None,
        }
    }

    /// `buyer_name` 仅在 ezPay 载具时作为载具编号（rawurlencode 后）
    pub fn carrier_fields(&self, buyer_name: &str) -> CarrierFields {
        match self {
            InvoiceRecipient::UnifiedBusinessNumber(_) => CarrierFields {
                category: Category::B2B,
                carrier_type: "",
                carrier_num: String::new(),
                print_flag: "Y",
            },
            InvoiceRecipient::CarrierCode(code) => CarrierFields {
                category: Category::B2C,
                carrier_type: "0",
                carrier_num: code.clone(),
                print_flag: "N",
            },
            InvoiceRecipient::DefaultElectronicCarrier => CarrierFields {
                category: Category::B2C,
                carrier_type: "2",
                carrier_num: encode(buyer_name).into_owned(),
                print_flag: "N",
            },
        }
    }
}

/// 买受人
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct Buyer {
    name: String,
    company_title: Option<String>,
    email: Option<String>,
    recipient: InvoiceRecipient,
}

impl Buyer {
    pub fn new<S: Into<String>>(name: S) -> Self {
        Self {
            name: name.into(),
            company_title: None,
            email: None,
            recipient: InvoiceRecipient::default(),
        }
    }

    pub fn with_company_title<S: Into<String>>(mut self, company_title: S) -> Self {
        self.company_title = Some(company_title.into());
        self
    }

    pub fn with_email<S: Into<String>>(mut self, email: S) -> Self {
        self.email = Some(email.into());
        self
    }

    pub fn with_recipient(mut self, recipient: InvoiceRecipient) -> Self {
        self.recipient = recipient;
        self
    }

    pub fn get_name(&self) -> &str {
        &self.name
    }

    pub fn get_email(&self) -> Option<&str> {
        self.email.as_deref()
    }

    pub fn get_company_title(&self) -> Option<&str> {
        self.company_title.as_deref()
    }

    pub fn get_recipient(&self) -> &InvoiceRecipient {
        &self.recipient
    }

    /// `BuyerName`：有公司抬头时用抬头，否则用买受人姓名
    pub fn display_name(&self) -> &str {
        self.company_title.as_deref().unwrap_or(&self.name)
    }
}
