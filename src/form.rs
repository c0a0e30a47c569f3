use serde::Serialize;
use url::form_urlencoded;

/// 加密前的有序字段，顺序即送出顺序
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PostData {
    fields: Vec<(String, String)>,
}

impl PostData {
    pub fn new() -> Self {
        Self { fields: vec![] }
    }

    pub fn get_fields(&self) -> &[(String, String)] {
        &self.fields
    }

    /// 增加字段
    pub fn add_field<V: ToString>(&mut self, field_name: &str, field_value: V) {
        self.fields
            .push((field_name.to_owned(), field_value.to_string()))
    }

    pub fn get(&self, field_name: &str) -> Option<&str> {
        self.fields
            .iter()
            .find(|(k, _)| k == field_name)
            .map(|(_, v)| v.as_str())
    }

    pub fn keys(&self) -> Vec<&str> {
        self.fields.iter().map(|(k, _)| k.as_str()).collect()
    }

    /// `application/x-www-form-urlencoded` 序列化，空格为 `+`
    pub fn to_query_string(&self) -> String {
        form_urlencoded::Serializer::new(String::new())
            .extend_pairs(self.fields.iter())
            .finish()
    }

    pub fn parse(query: &str) -> Self {
        Self {
            fields: form_urlencoded::parse(query.as_bytes())
                .into_owned()
                .collect(),
        }
    }
}

/// 实际送出的表单：商店代号与加密后的 `PostData_`
#[derive(Serialize, Debug, Clone, PartialEq, Eq)]
pub struct Envelope {
    #[serde(rename = "MerchantID_")]
    pub merchant_id: String,
    #[serde(rename = "PostData_")]
    pub post_data: String,
}

impl Envelope {
    pub fn as_form(&self) -> [(&str, &str); 2] {
        [
            ("MerchantID_", self.merchant_id.as_str()),
            ("PostData_", self.post_data.as_str()),
        ]
    }
}
