//! 交互流程状态机
//!
//! # 设计思路
//!
//! 生成核心本身无状态，界面层的“选择类型 → 填写输入 → 查看结果”流程
//! 由调用方持有的 `FlowState` 描述：
//!
//! ```text
//! Idle ──select──▶ Configuring { kind, previous } ──complete──▶ Generated(outcome)
//!  ▲                     │   ▲                                    │
//!  └──────reset──────────┘   └──────select(同类型，保留 outcome)───┘
//! ```
//!
//! # 实现思路
//!
//! - 每个迁移先校验当前状态，非法迁移返回 `AppError::Flow`，且不修改状态。
//! - `Generated` 持有完整结果，调用方据此展示二维码与像素画载荷。
//! - 从 `Generated` 重新进入编辑时，上一次结果转存到 `previous`；
//!   重试失败时调用方不调用 `complete`，`outcome()` 仍返回上一次结果，
//!   直到新的 `complete` 成功才被替换。

use crate::error::AppError;
use crate::generator::{GenerationKind, GenerationOutcome};

/// 调用方持有的流程状态。
#[derive(Debug, Clone, Default)]
pub enum FlowState {
    /// 初始状态：尚未选择生成类型。
    #[default]
    Idle,
    /// 已选择类型，等待输入与生成；`previous` 为重试前的结果。
    Configuring {
        kind: GenerationKind,
        previous: Option<Box<GenerationOutcome>>,
    },
    /// 已生成结果。
    Generated(Box<GenerationOutcome>),
}

impl FlowState {
    pub fn kind(&self) -> Option<GenerationKind> {
        match self {
            Self::Idle => None,
            Self::Configuring { kind, .. } => Some(*kind),
            Self::Generated(outcome) => Some(outcome.kind),
        }
    }

    /// 当前可展示的结果（重试期间为上一次结果）。
    pub fn outcome(&self) -> Option<&GenerationOutcome> {
        match self {
            Self::Generated(outcome) => Some(outcome),
            Self::Configuring { previous, .. } => previous.as_deref(),
            Self::Idle => None,
        }
    }

    /// 选择生成类型。
    ///
    /// 没有结果时可选任意类型；已有结果时只能选择同类型（重新生成），
    /// 切换到其他类型需先 `reset`。
    pub fn select(&mut self, kind: GenerationKind) -> Result<(), AppError> {
        if let Some(current) = self.outcome().map(|outcome| outcome.kind) {
            if current != kind {
                return Err(AppError::Flow(format!(
                    "已生成 {} 结果，请先重置再选择 {}",
                    current.as_str(),
                    kind.as_str()
                )));
            }
        }

        let previous = match std::mem::take(self) {
            Self::Idle => None,
            Self::Configuring { previous, .. } => previous,
            Self::Generated(outcome) => Some(outcome),
        };

        log::debug!("🧭 流程状态 → Configuring({})", kind.as_str());
        *self = Self::Configuring { kind, previous };
        Ok(())
    }

    /// 记录一次成功生成，结果类型必须与当前选择一致。
    pub fn complete(&mut self, outcome: GenerationOutcome) -> Result<(), AppError> {
        match self {
            Self::Configuring { kind, .. } if *kind == outcome.kind => {}
            Self::Configuring { kind, .. } => {
                return Err(AppError::Flow(format!(
                    "结果类型 {} 与当前选择 {} 不一致",
                    outcome.kind.as_str(),
                    kind.as_str()
                )));
            }
            Self::Idle => return Err(AppError::Flow("尚未选择生成类型".to_string())),
            Self::Generated(_) => {
                return Err(AppError::Flow("已有生成结果，请重新选择或重置".to_string()));
            }
        }

        log::debug!("🧭 流程状态 → Generated({})", outcome.kind.as_str());
        *self = Self::Generated(Box::new(outcome));
        Ok(())
    }

    /// 回到初始状态，任何状态均可重置。
    pub fn reset(&mut self) {
        log::debug!("🧭 流程状态 → Idle");
        *self = Self::Idle;
    }
}
