//! HTTP 传输 - 基础设施层
//!
//! 持有唯一的 HTTP 客户端与会话 cookie，只暴露"提交一个号码"的能力

use crate::config::Config;
use crate::error::ApiError;
use reqwest::header::{HeaderMap, HeaderValue, COOKIE};
use std::future::Future;
use tracing::debug;

/// 一次请求的原始响应
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawResponse {
    pub status: u16,
    pub body: String,
}

impl RawResponse {
    pub fn new(status: u16, body: impl Into<String>) -> Self {
        Self {
            status,
            body: body.into(),
        }
    }
}

/// 查询传输
///
/// 职责：
/// - 把一个号码提交到查询接口
/// - 不解析响应内容
/// - 不关心重试和冷却
pub trait LookupTransport: Send + Sync {
    fn post_number(
        &self,
        number: &str,
    ) -> impl Future<Output = Result<RawResponse, ApiError>> + Send;
}

/// 基于 reqwest 的传输实现
pub struct ReqwestTransport {
    client: reqwest::Client,
    endpoint: String,
}

impl ReqwestTransport {
    /// 创建新的传输，会话 cookie 附加到本次运行的所有请求上
    ///
    /// # 参数
    /// - `config`: 配置（接口地址、cookie 名称、超时）
    /// - `credential`: 会话 cookie 的值，不做任何校验
    pub fn new(config: &Config, credential: &str) -> Result<Self, ApiError> {
        let mut cookie = HeaderValue::from_str(&format!("{}={}", config.cookie_name, credential))
            .map_err(|e| ApiError::ClientBuildFailed {
                source: Box::new(e),
            })?;
        cookie.set_sensitive(true);

        let mut headers = HeaderMap::new();
        headers.insert(COOKIE, cookie);

        let mut builder = reqwest::Client::builder().default_headers(headers);
        if let Some(timeout) = config.request_timeout() {
            builder = builder.timeout(timeout);
        }

        let client = builder.build().map_err(|e| ApiError::ClientBuildFailed {
            source: Box::new(e),
        })?;

        Ok(Self {
            client,
            endpoint: config.endpoint_url.clone(),
        })
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

impl LookupTransport for ReqwestTransport {
    async fn post_number(&self, number: &str) -> Result<RawResponse, ApiError> {
        debug!("POST {} number={}", self.endpoint, number);

        // form() 会设置 application/x-www-form-urlencoded
        let response = self
            .client
            .post(&self.endpoint)
            .form(&[("number", number)])
            .send()
            .await
            .map_err(|e| ApiError::request_failed(&self.endpoint, e))?;

        let status = response.status().as_u16();
        let body = response
            .text()
            .await
            .map_err(|e| ApiError::ReadBodyFailed {
                endpoint: self.endpoint.clone(),
                source: Box::new(e),
            })?;

        debug!("响应 {}，长度 {} 字节", status, body.len());

        Ok(RawResponse { status, body })
    }
}
