//! # 服务层（异步入口）
//!
//! ## 设计思路
//!
//! `GeneratorService` 面向交互式调用方：把耗时的解码、降采样与二维码编码
//! 放到阻塞线程池执行，避免阻塞 async 运行时。
//!
//! ## 实现思路
//!
//! - 每个请求领取一个单调递增的票号，新请求自动使旧请求失效。
//! - 失效或被显式取消的请求在下一个阶段边界终止，返回 `Cancelled`，
//!   绝不用旧结果覆盖新结果。
//! - 显式取消按 `request_id` 索引取消标志；`submit` 结束或被丢弃时移除该标志。
//! - 后台任务 panic 报告为 `Internal`，不与取消混淆。

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::{Arc, Mutex};

use super::source::{GenerationOutcome, GenerationRequest};
use super::{GeneratorConfig, GeneratorError, GeneratorHandler, ResampleProfile};
use crate::qr::SymbolEncoder;

/// 请求结束（包括 future 被提前丢弃）时移除自己的取消标志。
struct CancelRegistration<'a> {
    flags: &'a Mutex<HashMap<String, Arc<AtomicBool>>>,
    request_id: String,
    flag: Arc<AtomicBool>,
}

impl Drop for CancelRegistration<'_> {
    fn drop(&mut self) {
        let Ok(mut guard) = self.flags.lock() else {
            return;
        };
        // 同 id 的新请求可能已覆盖该条目，只移除自己注册的标志
        if guard
            .get(&self.request_id)
            .is_some_and(|current| Arc::ptr_eq(current, &self.flag))
        {
            guard.remove(&self.request_id);
        }
    }
}

/// 生成服务状态。
pub struct GeneratorService {
    handler: Arc<GeneratorHandler>,
    latest_ticket: Arc<AtomicU64>,
    cancel_flags: Mutex<HashMap<String, Arc<AtomicBool>>>,
}

impl GeneratorService {
    /// 使用默认配置创建服务。
    ///
    /// # 示例
    /// ```rust,no_run
    /// use qr_matrix::generator::GeneratorService;
    ///
    /// let service = GeneratorService::new()?;
    /// # Ok::<(), qr_matrix::generator::GeneratorError>(())
    /// ```
    pub fn new() -> Result<Self, GeneratorError> {
        Self::with_config(GeneratorConfig::default())
    }

    pub fn with_config(config: GeneratorConfig) -> Result<Self, GeneratorError> {
        Ok(Self::from_handler(GeneratorHandler::new(config)?))
    }

    /// 注入自定义符号编码器。
    pub fn with_encoder(
        config: GeneratorConfig,
        encoder: Arc<dyn SymbolEncoder>,
    ) -> Result<Self, GeneratorError> {
        Ok(Self::from_handler(GeneratorHandler::with_encoder(config, encoder)?))
    }

    fn from_handler(handler: GeneratorHandler) -> Self {
        Self {
            handler: Arc::new(handler),
            latest_ticket: Arc::new(AtomicU64::new(0)),
            cancel_flags: Mutex::new(HashMap::new()),
        }
    }

    pub fn handler(&self) -> &GeneratorHandler {
        &self.handler
    }

    /// 提交一次生成请求。
    ///
    /// 执行期间若有更新的请求提交，或 `request_id` 被取消，返回 `Cancelled`。
    ///
    /// # 示例
    /// ```rust,no_run
    /// use qr_matrix::generator::{GenerationRequest, GeneratorService};
    ///
    /// # async fn demo() -> Result<(), qr_matrix::generator::GeneratorError> {
    /// let service = GeneratorService::new()?;
    /// let outcome = service
    ///     .submit("req-1", GenerationRequest::Text("HELLO".into()))
    ///     .await?;
    /// assert!(outcome.is_some());
    /// # Ok(())
    /// # }
    /// ```
    pub async fn submit(
        &self,
        request_id: impl Into<String>,
        request: GenerationRequest,
    ) -> Result<Option<GenerationOutcome>, GeneratorError> {
        let request_id = request_id.into();
        let ticket = self.latest_ticket.fetch_add(1, Ordering::SeqCst) + 1;
        let cancel_flag = Arc::new(AtomicBool::new(false));
        {
            let mut guard = self
                .cancel_flags
                .lock()
                .map_err(|_| GeneratorError::Config("取消标志锁已中毒".to_string()))?;
            guard.insert(request_id.clone(), Arc::clone(&cancel_flag));
        }
        let _registration = CancelRegistration {
            flags: &self.cancel_flags,
            request_id: request_id.clone(),
            flag: Arc::clone(&cancel_flag),
        };

        log::info!(
            "📨 提交生成请求 - id: {} ticket: {} 类型: {}",
            request_id,
            ticket,
            request.kind().as_str()
        );

        let handler = Arc::clone(&self.handler);
        let latest_ticket = Arc::clone(&self.latest_ticket);
        let flag = Arc::clone(&cancel_flag);
        let joined = tokio::task::spawn_blocking(move || {
            let is_cancelled =
                || flag.load(Ordering::SeqCst) || latest_ticket.load(Ordering::SeqCst) != ticket;
            handler.generate_with_cancel(request, &is_cancelled)
        })
        .await;

        let result = joined.map_err(|e| {
            log::error!("💥 生成任务异常终止 - id: {} : {}", request_id, e);
            GeneratorError::Internal(format!("生成任务异常终止：{}", e))
        })?;

        if result.is_ok() && self.is_stale(ticket, &cancel_flag) {
            log::info!("🛑 请求 {} 已被更新的请求取代，丢弃结果", request_id);
            return Err(GeneratorError::Cancelled(format!(
                "请求 {} 已被更新的请求取代",
                request_id
            )));
        }

        result
    }

    fn is_stale(&self, ticket: u64, cancel_flag: &AtomicBool) -> bool {
        cancel_flag.load(Ordering::SeqCst) || self.latest_ticket.load(Ordering::SeqCst) != ticket
    }

    /// 取消指定请求，返回是否找到该请求。
    pub fn cancel(&self, request_id: &str) -> Result<bool, GeneratorError> {
        let guard = self
            .cancel_flags
            .lock()
            .map_err(|_| GeneratorError::Config("取消标志锁已中毒".to_string()))?;

        if let Some(flag) = guard.get(request_id) {
            flag.store(true, Ordering::SeqCst);
            Ok(true)
        } else {
            Ok(false)
        }
    }

    /// 设置降采样档位。
    pub fn set_profile(&self, profile: &str) -> Result<(), GeneratorError> {
        let profile = ResampleProfile::parse(profile)?;
        self.handler.set_profile(profile)
    }

    /// 获取当前生效档位（字符串）。
    pub fn get_profile(&self) -> Result<String, GeneratorError> {
        let profile = self.handler.get_profile()?;
        Ok(profile.as_str().to_string())
    }
}
