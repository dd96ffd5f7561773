//! # Fetcher 模块
//!
//! 引导数据的获取：本地 JSON 文件或远端 HTTP 接口。
//! 核心只依赖 [`DataFetcher`] 的结果，不关心来源。

use std::path::{Path, PathBuf};
use std::time::Duration;

use async_trait::async_trait;
use onboarding_runtime::{ContentError, OnboardingResponse};
use thiserror::Error;
use tracing::{debug, info};

use crate::config::AppConfig;

/// 取数错误
#[derive(Debug, Error)]
pub enum FetchError {
    /// 本地文件读取失败
    #[error("读取 {path:?} 失败: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// HTTP 传输失败
    #[error("HTTP 请求失败: {0}")]
    Http(#[from] reqwest::Error),

    /// 服务端返回非成功状态码
    #[error("接口返回状态码 {status}: {body}")]
    Status { status: u16, body: String },

    /// 响应内容无效
    #[error(transparent)]
    Content(#[from] ContentError),
}

/// 引导数据来源
///
/// 与会话运行在同一个任务内，不要求 `Send`。
#[async_trait(?Send)]
pub trait DataFetcher {
    /// 获取一次引导数据
    async fn fetch(&self) -> Result<OnboardingResponse, FetchError>;
}

/// 本地文件来源
#[derive(Debug, Clone)]
pub struct FileFetcher {
    path: PathBuf,
}

impl FileFetcher {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

#[async_trait(?Send)]
impl DataFetcher for FileFetcher {
    async fn fetch(&self) -> Result<OnboardingResponse, FetchError> {
        debug!(path = %self.path.display(), "读取引导数据文件");
        let text = tokio::fs::read_to_string(&self.path)
            .await
            .map_err(|source| FetchError::Io {
                path: self.path.clone(),
                source,
            })?;
        Ok(OnboardingResponse::from_json(&text)?)
    }
}

/// 远端 HTTP 来源
#[derive(Debug, Clone)]
pub struct HttpFetcher {
    url: String,
    client: reqwest::Client,
}

impl HttpFetcher {
    /// 创建带 30 秒超时的客户端；TLS 后端初始化失败时返回错误
    pub fn new(url: impl Into<String>) -> Result<Self, FetchError> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(30))
            .build()?;
        Ok(Self::with_client(url, client))
    }

    pub fn with_client(url: impl Into<String>, client: reqwest::Client) -> Self {
        Self {
            url: url.into(),
            client,
        }
    }

    pub fn url(&self) -> &str {
        &self.url
    }
}

#[async_trait(?Send)]
impl DataFetcher for HttpFetcher {
    async fn fetch(&self) -> Result<OnboardingResponse, FetchError> {
        info!(url = %self.url, "请求引导数据");
        let resp = self.client.get(&self.url).send().await?;

        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            return Err(FetchError::Status {
                status: status.as_u16(),
                body,
            });
        }

        let text = resp.text().await?;
        Ok(OnboardingResponse::from_json(&text)?)
    }
}

/// 按配置选择数据来源
pub fn fetcher_for(config: &AppConfig) -> Result<Box<dyn DataFetcher>, FetchError> {
    Ok(if config.is_remote_source() {
        Box::new(HttpFetcher::new(config.source.clone())?)
    } else {
        Box::new(FileFetcher::new(&config.source))
    })
}
