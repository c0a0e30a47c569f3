use std::convert::TryFrom;

use serde::{Deserialize, Serialize};

use crate::error::{EzpayResult, Error};

const SEPARATOR: &str = "|";

/// 发票上的单项商品
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct LineItem {
    name: String,
    count: u64,
    unit: String,
    price: u64,
}

impl LineItem {
    pub fn new<S: Into<String>, U: Into<String>>(name: S, count: u64, unit: U, price: u64) -> Self {
        Self {
            name: name.into(),
            count,
            unit: unit.into(),
            price,
        }
    }

    pub fn get_name(&self) -> &str {
        &self.name
    }

    pub fn get_count(&self) -> u64 {
        self.count
    }

    pub fn get_unit(&self) -> &str {
        &self.unit
    }

    pub fn get_price(&self) -> u64 {
        self.price
    }

    /// 小计，`count * price`
    pub fn amount(&self) -> EzpayResult<u64> {
        self.count.checked_mul(self.price).ok_or_else(|| {
            Error::Params(format!("amount of item `{}` overflows", self.name))
        })
    }
}

/// `Item*` 五个字段的编码结果，各字段依同一顺序以 `|` 串接
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EncodedItems {
    pub item_name: String,
    pub item_count: String,
    pub item_unit: String,
    pub item_price: String,
    pub item_amt: String,
    pub subtotal: u64,
}

/// 至少包含一项商品的有序清单，反序列化时同样经过 [`LineItems::new`] 校验
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(try_from = "Vec<LineItem>")]
pub struct LineItems(Vec<LineItem>);

impl TryFrom<Vec<LineItem>> for LineItems {
    type Error = Error;

    fn try_from(items: Vec<LineItem>) -> EzpayResult<Self> {
        LineItems::new(items)
    }
}

impl LineItems {
    pub fn new(items: Vec<LineItem>) -> EzpayResult<Self> {
        if items.is_empty() {
            return Err(Error::Params("at least one line item is required".to_owned()));
        }

        for item in items.iter() {
            if item.name.contains(SEPARATOR) || item.unit.contains(SEPARATOR) {
                return Err(Error::Params(format!(
                    "line item `{}` must not contain `{}`",
                    item.name, SEPARATOR
                )));
            }
        }

        Ok(Self(items))
    }

    pub fn single<S: Into<String>, U: Into<String>>(
        name: S,
        count: u64,
        unit: U,
        price: u64,
    ) -> EzpayResult<Self> {
        Self::new(vec![LineItem::new(name, count, unit, price)])
    }

    /// 由名称、数量、单位、单价四个平行序列组成清单，四者长度必须相同
    pub fn from_parallel<S: AsRef<str>, U: AsRef<str>>(
        names: &[S],
        counts: &[u64],
        units: &[U],
        prices: &[u64],
    ) -> EzpayResult<Self> {
        let len = names.len();
        if counts.len() != len || units.len() != len || prices.len() != len {
            return Err(Error::Params(format!(
                "line item sequences differ in length: names={}, counts={}, units={}, prices={}",
                len,
                counts.len(),
                units.len(),
                prices.len()
            )));
        }

        let items = names
            .iter()
            .zip(counts)
            .zip(units)
            .zip(prices)
            .map(|(((name, count), unit), price)| {
                LineItem::new(name.as_ref(), *count, unit.as_ref(), *price)
            })
            .collect();

        Self::new(items)
    }

    pub fn items(&self) -> &[LineItem] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn subtotal(&self) -> EzpayResult<u64> {
        self.0.iter().try_fold(0u64, |acc, item| {
            acc.checked_add(item.amount()?)
                .ok_or_else(|| Error::Params("line item subtotal overflows".to_owned()))
        })
    }

    pub fn encode(&self) -> EzpayResult<EncodedItems> {
        let amounts = self
            .0
            .iter()
            .map(LineItem::amount)
            .collect::<EzpayResult<Vec<u64>>>()?;

        let subtotal = self.subtotal()?;

        let join = |values: Vec<String>| values.join(SEPARATOR);

        Ok(EncodedItems {
            item_name: join(self.0.iter().map(|i| i.name.clone()).collect()),
            item_count: join(self.0.iter().map(|i| i.count.to_string()).collect()),
            item_unit: join(self.0.iter().map(|i| i.unit.clone()).collect()),
            item_price: join(self.0.iter().map(|i| i.price.to_string()).collect()),
            item_amt: join(amounts.iter().map(u64::to_string).collect()),
            subtotal,
        })
    }
}
