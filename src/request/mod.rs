pub mod invoice_issue_request;
pub mod invoice_invalid_request;
pub mod invoice_search_request;

use crate::{error::EzpayResult, form::PostData};

/// 所有请求共用的 `RespondType`
pub const RESPOND_TYPE: &str = "JSON";

/// 一支 ezPay API：路径、版本与加密前的字段
pub trait EzpayRequest {
    /// 相对于 host 的路径，例如 `/Api/invoice_issue`
    const API: &'static str;
    const VERSION: &'static str;

    /// 用于日志的识别字串（订单编号或发票号码）
    fn reference(&self) -> &str;

    /// 组出加密前的字段，`timestamp` 为 unix 秒数
    fn post_data(&self, timestamp: u64) -> EzpayResult<PostData>;
}

/// 每支 API 共同的前三个字段
pub(crate) fn common_fields<R: EzpayRequest + ?Sized>(timestamp: u64) -> PostData {
    let mut data = PostData::new();
    data.add_field("RespondType", RESPOND_TYPE);
    data.add_field("Version", R::VERSION);
    data.add_field("TimeStamp", timestamp);
    data
}
