use std::{fmt, time};

use serde::{de::DeserializeOwned, Deserialize, Serialize};
use serde_json::Value;

use crate::{
    error::{Error, EzpayResult},
    form::Envelope,
    model::invoice_result::{InvoiceDetail, IssuedInvoice, VoidedInvoice},
    request::{
        invoice_invalid_request::InvoiceInvalidRequest,
        invoice_issue_request::InvoiceIssueRequest,
        invoice_search_request::InvoiceSearchRequest, EzpayRequest,
    },
    time::unix_timestamp,
    transport::{Transport, UreqTransport},
    util::aes_encrypt,
};

/// 测试环境
pub const TEST_HOST: &str = "https://cinv.ezpay.com.tw";
/// 正式环境
pub const PRODUCTION_HOST: &str = "https://inv.ezpay.com.tw";

pub const DEFAULT_TIMEOUT: time::Duration = time::Duration::from_secs(30);

const SUCCESS: &str = "SUCCESS";

/// EzpayConfig SDK 配置，建立后不可变
#[derive(Clone)]
pub struct EzpayConfig {
    host: String,
    /// 商店代号
    merchant_id: String,
    /// HashKey，32 字节
    key: String,
    /// HashIV，16 字节
    iv: String,
    timeout: time::Duration,
}

impl EzpayConfig {
    pub fn builder<M: Into<String>, K: Into<String>, I: Into<String>>(
        merchant_id: M,
        key: K,
        iv: I,
    ) -> EzpayConfigBuilder {
        EzpayConfigBuilder::new(merchant_id, key, iv)
    }

    pub fn host(&self) -> &str {
        &self.host
    }

    pub fn merchant_id(&self) -> &str {
        &self.merchant_id
    }

    pub fn timeout(&self) -> time::Duration {
        self.timeout
    }

    fn url(&self, api: &str) -> String {
        format!("{}{}", self.host, api)
    }
}

impl fmt::Debug for EzpayConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EzpayConfig")
            .field("host", &self.host)
            .field("merchant_id", &self.merchant_id)
            .field("key", &"[REDACTED]")
            .field("iv", &"[REDACTED]")
            .field("timeout", &self.timeout)
            .finish()
    }
}

pub struct EzpayConfigBuilder {
    host: String,
    merchant_id: String,
    key: String,
    iv: String,
    timeout: time::Duration,
}

impl EzpayConfigBuilder {
    pub fn new<M: Into<String>, K: Into<String>, I: Into<String>>(
        merchant_id: M,
        key: K,
        iv: I,
    ) -> Self {
        EzpayConfigBuilder {
            host: TEST_HOST.to_owned(),
            merchant_id: merchant_id.into(),
            key: key.into(),
            iv: iv.into(),
            timeout: DEFAULT_TIMEOUT,
        }
    }

    /// 读取 `EZPAY_HOST`、`EZPAY_MERCHANT_ID`、`EZPAY_KEY`、`EZPAY_IV`、`EZPAY_TIMEOUT_SECS`
    pub fn from_env() -> EzpayResult<Self> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    pub(crate) fn from_lookup<F>(lookup: F) -> EzpayResult<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let required = |name: &str| {
            lookup(name)
                .filter(|v| !v.is_empty())
                .ok_or_else(|| Error::Config(format!("{} is not set", name)))
        };

        let mut builder = Self::new(
            required("EZPAY_MERCHANT_ID")?,
            required("EZPAY_KEY")?,
            required("EZPAY_IV")?,
        );

        if let Some(host) = lookup("EZPAY_HOST").filter(|v| !v.is_empty()) {
            builder = builder.with_host(host);
        }

        if let Some(secs) = lookup("EZPAY_TIMEOUT_SECS") {
            let secs = secs.trim().parse::<u64>().map_err(|_| {
                Error::Config(format!("EZPAY_TIMEOUT_SECS is not a number: {}", secs))
            })?;
            builder = builder.with_timeout(time::Duration::from_secs(secs));
        }

        Ok(builder)
    }

    pub fn with_host<S: Into<String>>(mut self, host: S) -> Self {
        self.host = host.into();
        self
    }

    pub fn with_timeout(mut self, timeout: time::Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn build(self) -> EzpayResult<EzpayConfig> {
        if self.merchant_id.trim().is_empty() {
            return Err(Error::Config("merchant id must not be empty".to_owned()));
        }

        if self.key.len() != 32 {
            return Err(Error::Config(format!(
                "hash key must be 32 bytes, got {}",
                self.key.len()
            )));
        }

        if self.iv.len() != 16 {
            return Err(Error::Config(format!(
                "hash iv must be 16 bytes, got {}",
                self.iv.len()
            )));
        }

        let host = self.host.trim().trim_end_matches('/').to_owned();
        if !host.starts_with("http://") && !host.starts_with("https://") {
            return Err(Error::Config(format!("invalid host: {}", self.host)));
        }

        if self.timeout.as_nanos() == 0 {
            return Err(Error::Config("timeout must be positive".to_owned()));
        }

        Ok(EzpayConfig {
            host,
            merchant_id: self.merchant_id,
            key: self.key,
            iv: self.iv,
            timeout: self.timeout,
        })
    }
}

/// 每次呼叫唯一对外的结果。服务端回报的业务失败、网络错误与无法解析的回应都以
/// `success == false` 表示。
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct GatewayResult {
    pub success: bool,
    pub message: String,
    /// ezPay 的 `Status`，网络错误时为 `None`
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<Value>,
}

impl GatewayResult {
    pub fn failure<S: Into<String>>(message: S) -> Self {
        Self {
            success: false,
            message: message.into(),
            status: None,
            data: None,
        }
    }

    /// 将 `data` 反序列化为指定型别
    pub fn data_as<T: DeserializeOwned>(&self) -> EzpayResult<T> {
        match &self.data {
            Some(data) => Ok(serde_json::from_value(data.clone())?),
            None => Err(Error::MalformedResponse(format!(
                "result carries no data: {}",
                self.message
            ))),
        }
    }

    pub fn issued_invoice(&self) -> EzpayResult<IssuedInvoice> {
        self.data_as()
    }

    pub fn voided_invoice(&self) -> EzpayResult<VoidedInvoice> {
        self.data_as()
    }

    pub fn invoice_detail(&self) -> EzpayResult<InvoiceDetail> {
        self.data_as()
    }
}

#[derive(Deserialize, Debug)]
struct ProviderResponse {
    #[serde(rename = "Status")]
    status: String,
    #[serde(rename = "Message", default)]
    message: Option<String>,
    #[serde(rename = "Result", default)]
    result: Option<Value>,
}

/// 本文是否为 ezPay 的回应格式（至少带有 `Status`）
pub(crate) fn is_provider_envelope(body: &str) -> bool {
    serde_json::from_str::<ProviderResponse>(body.trim()).is_ok()
}

/// 解析 `{"Status", "Message", "Result"}`。`Result` 通常是 JSON 字串，也接受已是物件的情况。
pub fn parse_response(body: &str) -> EzpayResult<GatewayResult> {
    let resp: ProviderResponse = serde_json::from_str(body.trim()).map_err(|e| {
        Error::MalformedResponse(format!("{}: {}", e, body))
    })?;

    let message = resp.message.unwrap_or_default();

    if resp.status != SUCCESS {
        return Ok(GatewayResult {
            success: false,
            message: if message.is_empty() {
                resp.status.clone()
            } else {
                message
            },
            status: Some(resp.status),
            data: None,
        });
    }

    let data = match resp.result {
        Some(Value::String(s)) => serde_json::from_str::<Value>(&s)
            .map_err(|e| Error::MalformedResponse(format!("Result is not json: {}", e)))?,
        Some(v @ Value::Object(_)) => v,
        Some(other) => {
            return Err(Error::MalformedResponse(format!(
                "unexpected Result: {}",
                other
            )))
        }
        None => return Err(Error::MalformedResponse("Result is missing".to_owned())),
    };

    Ok(GatewayResult {
        success: true,
        message,
        status: Some(resp.status),
        data: Some(data),
    })
}

pub struct EzpaySDK<T: Transport = UreqTransport> {
    config: EzpayConfig,
    transport: T,
}

impl EzpaySDK<UreqTransport> {
    pub fn new(config: EzpayConfig) -> Self {
        let transport = UreqTransport::new(config.timeout);
        Self { config, transport }
    }
}

impl<T: Transport> EzpaySDK<T> {
    pub fn with_transport(config: EzpayConfig, transport: T) -> Self {
        Self { config, transport }
    }

    pub fn config(&self) -> &EzpayConfig {
        &self.config
    }

    /// 组出加密后的表单
    pub fn envelope<R: EzpayRequest>(&self, request: &R, timestamp: u64) -> EzpayResult<Envelope> {
        let query = request.post_data(timestamp)?.to_query_string();
        trace!("{} post data: {} bytes", R::API, query.len());

        let post_data = aes_encrypt(
            &query,
            self.config.key.as_bytes(),
            self.config.iv.as_bytes(),
        )?;

        Ok(Envelope {
            merchant_id: self.config.merchant_id.clone(),
            post_data,
        })
    }

    /// 送出任一请求。只有设定或参数错误会以 `Err` 回传，其余皆为 [`GatewayResult`]。
    pub fn exec<R: EzpayRequest>(&self, request: &R) -> EzpayResult<GatewayResult> {
        let envelope = self.envelope(request, unix_timestamp()?)?;

        info!(
            "[ezpay] {} ({}) payload: {}",
            R::API,
            request.reference(),
            serde_json::to_string(&envelope)?
        );

        let result = self
            .transport
            .post_form(&self.config.url(R::API), &envelope.as_form())
            .and_then(|body| parse_response(&body));

        match result {
            Ok(result) => {
                if result.success {
                    info!("[ezpay] {} ({}) succeeded", R::API, request.reference());
                } else {
                    info!(
                        "[ezpay] {} ({}) failed: {:?} {}",
                        R::API,
                        request.reference(),
                        result.status,
                        result.message
                    );
                }
                Ok(result)
            }
            Err(e @ Error::Transport(_)) | Err(e @ Error::MalformedResponse(_)) => {
                error!("[ezpay] {} ({}) {}", R::API, request.reference(), e);
                Ok(GatewayResult::failure(e.to_string()))
            }
            Err(e) => Err(e),
        }
    }

    /// 开立发票
    pub fn issue_invoice(&self, request: &InvoiceIssueRequest) -> EzpayResult<GatewayResult> {
        self.exec(request)
    }

    /// 作废发票
    pub fn void_invoice<S: Into<String>, R: Into<String>>(
        &self,
        invoice_number: S,
        reason: R,
    ) -> EzpayResult<GatewayResult> {
        self.exec(&InvoiceInvalidRequest::new(invoice_number, reason))
    }

    /// 查询发票
    pub fn search_invoice(&self, request: &InvoiceSearchRequest) -> EzpayResult<GatewayResult> {
        self.exec(request)
    }
}
