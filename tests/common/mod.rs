//! 测试用的脚本化传输

#![allow(dead_code)]

use mnp_checker::error::ApiError;
use mnp_checker::{LookupTransport, RawResponse};
use std::collections::{HashMap, VecDeque};
use std::sync::{Arc, Mutex};
use std::time::Duration;

/// 一次脚本化的响应
#[derive(Debug, Clone)]
pub struct Step {
    pub latency: Duration,
    pub reply: Result<(u16, String), String>,
}

impl Step {
    pub fn ok_rows(rows: &str) -> Self {
        Self::status(200, &format!("<script>var d = JSON.parse('{}');</script>", rows))
    }

    pub fn missing() -> Self {
        Self::status(200, "<html><body>Please wait</body></html>")
    }

    pub fn status(code: u16, body: &str) -> Self {
        Self {
            latency: Duration::ZERO,
            reply: Ok((code, body.to_string())),
        }
    }

    pub fn transport_error(message: &str) -> Self {
        Self {
            latency: Duration::ZERO,
            reply: Err(message.to_string()),
        }
    }

    pub fn after(mut self, latency: Duration) -> Self {
        self.latency = latency;
        self
    }
}

/// 一行合法的转义载荷
pub fn jio_row(number: &str) -> String {
    format!(
        r#"[[\"{}\",\"Jio\",\"10\",\"Delhi\",\"No\"]]"#,
        number
    )
}

/// 按号码返回预设响应，脚本只剩一步时重复该步
#[derive(Clone, Default)]
pub struct ScriptedTransport {
    scripts: Arc<Mutex<HashMap<String, VecDeque<Step>>>>,
    calls: Arc<Mutex<Vec<String>>>,
}

impl ScriptedTransport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn script(self, number: &str, steps: Vec<Step>) -> Self {
        self.scripts
            .lock()
            .unwrap()
            .insert(number.to_string(), steps.into_iter().collect());
        self
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }

    fn next_step(&self, number: &str) -> Step {
        let mut scripts = self.scripts.lock().unwrap();
        let queue = scripts
            .get_mut(number)
            .unwrap_or_else(|| panic!("no script for {}", number));
        if queue.len() > 1 {
            queue.pop_front().unwrap()
        } else {
            queue.front().cloned().expect("empty script")
        }
    }
}

impl LookupTransport for ScriptedTransport {
    async fn post_number(&self, number: &str) -> Result<RawResponse, ApiError> {
        let step = self.next_step(number);
        self.calls.lock().unwrap().push(number.to_string());

        tokio::time::sleep(step.latency).await;

        match step.reply {
            Ok((status, body)) => Ok(RawResponse::new(status, body)),
            Err(message) => Err(ApiError::request_failed(
                "http://mock",
                std::io::Error::new(std::io::ErrorKind::ConnectionRefused, message),
            )),
        }
    }
}

pub fn numbers(list: &[&str]) -> Vec<String> {
    list.iter().map(|s| s.to_string()).collect()
}
