use std::time::Duration;

use crate::{
    error::{Error, EzpayResult},
    ezpay::is_provider_envelope,
};

/// 送出表单并取回回应本文。任何错误都应以 [`Error::Transport`] 回报。
pub trait Transport {
    fn post_form(&self, url: &str, form: &[(&str, &str)]) -> EzpayResult<String>;
}

/// 基于 ureq 的同步传输，整个请求受单一逾时限制
#[derive(Clone)]
pub struct UreqTransport {
    agent: ureq::Agent,
}

impl UreqTransport {
    pub fn new(timeout: Duration) -> Self {
        let agent = ureq::AgentBuilder::new()
            .timeout(timeout)
            .user_agent(&format!("rust_ezpay_sdk/{}", env!("CARGO_PKG_VERSION")))
            .build();

        Self { agent }
    }
}

fn read_body(resp: ureq::Response) -> EzpayResult<String> {
    resp.into_string()
        .map_err(|e| Error::Transport(format!("cannot read response body: {}", e)))
}

impl Transport for UreqTransport {
    /// 非 2xx 回应若本文仍是 ezPay 的 `{"Status", "Message"}` 格式，照常回传本文，
    /// 让呼叫端取得服务端讯息；否则视为传输错误。
    fn post_form(&self, url: &str, form: &[(&str, &str)]) -> EzpayResult<String> {
        debug!("POST {}", url);

        match self.agent.post(url).send_form(form) {
            Ok(resp) => read_body(resp),
            Err(ureq::Error::Status(code, resp)) => {
                let body = read_body(resp)?;
                if is_provider_envelope(&body) {
                    warn!("POST {} answered http status {} with a provider reply", url, code);
                    Ok(body)
                } else {
                    Err(Error::Transport(format!("http status {}: {}", code, body)))
                }
            }
            Err(e) => Err(e.into()),
        }
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use wiremock::matchers::{body_string, header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    use super::{Transport, UreqTransport};
    use crate::error::EzpayResult;

    async fn post(transport: UreqTransport, url: String) -> EzpayResult<String> {
        tokio::task::spawn_blocking(move || {
            transport.post_form(&url, &[("MerchantID_", "3622183"), ("PostData_", "abcdef")])
        })
        .await
        .unwrap()
    }

    #[tokio::test]
    async fn posts_form() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/Api/invoice_search"))
            .and(header("content-type", "application/x-www-form-urlencoded"))
            .and(body_string("MerchantID_=3622183&PostData_=abcdef"))
            .respond_with(ResponseTemplate::new(200).set_body_string(r#"{"Status":"SUCCESS"}"#))
            .expect(1)
            .mount(&server)
            .await;

        let body = post(
            UreqTransport::new(Duration::from_secs(5)),
            format!("{}/Api/invoice_search", server.uri()),
        )
        .await
        .unwrap();

        assert_eq!(body, r#"{"Status":"SUCCESS"}"#);
    }

    #[tokio::test]
    async fn error_status_with_provider_reply_is_passed_through() {
        let server = MockServer::start().await;
        let reply = r#"{"Status":"KEY10002","Message":"資料解密錯誤"}"#;
        Mock::given(method("POST"))
            .and(path("/Api/invoice_issue"))
            .respond_with(ResponseTemplate::new(500).set_body_string(reply))
            .mount(&server)
            .await;

        let body = post(
            UreqTransport::new(Duration::from_secs(5)),
            format!("{}/Api/invoice_issue", server.uri()),
        )
        .await
        .unwrap();

        assert_eq!(body, reply);
    }

    #[tokio::test]
    async fn error_status_without_provider_reply_is_transport_error() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(502).set_body_string("<html>bad gateway</html>"))
            .mount(&server)
            .await;

        let err = post(
            UreqTransport::new(Duration::from_secs(5)),
            format!("{}/Api/invoice_issue", server.uri()),
        )
        .await
        .unwrap_err();

        assert!(err.is_transport(), "{:?}", err);
        assert!(err.to_string().contains("http status 502"), "{}", err);
    }

    #[tokio::test]
    async fn timeout_is_transport_error() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_string(r#"{"Status":"SUCCESS"}"#)
                    .set_delay(Duration::from_secs(2)),
            )
            .mount(&server)
            .await;

        let err = post(
            UreqTransport::new(Duration::from_millis(200)),
            format!("{}/Api/invoice_issue", server.uri()),
        )
        .await
        .unwrap_err();

        assert!(err.is_transport(), "{:?}", err);
    }
}
