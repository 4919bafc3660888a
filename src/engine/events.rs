// ==========================================
// 风险测试选择系统 - 引擎层诊断事件
// ==========================================
// 职责: 定义选择过程的诊断事件与事件接收 trait
// 说明: 诊断既作为返回值收集，也可推送给调用方注入的接收者
//       （替代进程级全局日志/配置单例）
// ==========================================

use crate::domain::types::SolverKind;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

// ==========================================
// 诊断事件
// ==========================================

/// 选择过程诊断事件（序号均为 1 起始）
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SelectionEvent {
    /// 预算超过建议阈值，精确求解器可能无法在实际中完成
    BudgetAdvisory { budget: u64, threshold: u64 },

    /// 用例数超过建议阈值
    ItemCountAdvisory { item_count: usize, threshold: usize },

    /// 因依赖关系被隐式选中
    ImplicitInclusion { ordinal: usize, required_by: usize },

    /// 因依赖被排除而隐式排除
    ImplicitExclusion { ordinal: usize, caused_by: usize },

    /// 人工选中用例预占预算
    BudgetPrebooked { prebooked: u64, remaining: u64 },

    /// 求解器降级
    SolverFallback {
        from: SolverKind,
        to: SolverKind,
        reason: String,
    },
}

impl SelectionEvent {
    /// 转换为字符串标识
    pub fn as_str(&self) -> &str {
        match self {
            SelectionEvent::BudgetAdvisory { .. } => "BudgetAdvisory",
            SelectionEvent::ItemCountAdvisory { .. } => "ItemCountAdvisory",
            SelectionEvent::ImplicitInclusion { .. } => "ImplicitInclusion",
            SelectionEvent::ImplicitExclusion { .. } => "ImplicitExclusion",
            SelectionEvent::BudgetPrebooked { .. } => "BudgetPrebooked",
            SelectionEvent::SolverFallback { .. } => "SolverFallback",
        }
    }

    /// 是否为需要提示用户的建议类事件
    pub fn is_advisory(&self) -> bool {
        matches!(
            self,
            SelectionEvent::BudgetAdvisory { .. }
                | SelectionEvent::ItemCountAdvisory { .. }
                | SelectionEvent::SolverFallback { .. }
        )
    }
}

// ==========================================
// 事件接收 Trait
// ==========================================

/// 诊断事件接收者
///
/// 由调用方实现（如 CLI 打印、界面提示）；引擎只负责发布
pub trait SelectionEventSink: Send + Sync {
    fn publish(&self, event: &SelectionEvent);
}

/// 可选的事件接收者包装 + 事件收集
///
/// 所有事件都会被收集（作为返回值），配置了接收者时同时推送
pub struct EventRecorder {
    sink: Option<Arc<dyn SelectionEventSink>>,
    events: Vec<SelectionEvent>,
}

impl EventRecorder {
    /// 创建带接收者的实例
    pub fn with_sink(sink: Arc<dyn SelectionEventSink>) -> Self {
        Self {
            sink: Some(sink),
            events: Vec::new(),
        }
    }

    /// 创建空实例（只收集，不推送）
    pub fn none() -> Self {
        Self {
            sink: None,
            events: Vec::new(),
        }
    }

    pub fn record(&mut self, event: SelectionEvent) {
        if let Some(sink) = &self.sink {
            sink.publish(&event);
        }
        self.events.push(event);
    }

    pub fn extend<I: IntoIterator<Item = SelectionEvent>>(&mut self, events: I) {
        for event in events {
            self.record(event);
        }
    }

    pub fn events(&self) -> &[SelectionEvent] {
        &self.events
    }

    pub fn into_events(self) -> Vec<SelectionEvent> {
        self.events
    }
}

impl Default for EventRecorder {
    fn default() -> Self {
        Self::none()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    struct CountingSink {
        seen: Mutex<Vec<String>>,
    }

    impl SelectionEventSink for CountingSink {
        fn publish(&self, event: &SelectionEvent) {
            self.seen.lock().unwrap().push(event.as_str().to_string());
        }
    }

    #[test]
    fn test_recorder_without_sink_collects() {
        let mut recorder = EventRecorder::none();
        recorder.record(SelectionEvent::BudgetAdvisory {
            budget: 10_000,
            threshold: 5_000,
        });

        assert_eq!(recorder.events().len(), 1);
        assert!(recorder.events()[0].is_advisory());
    }

    #[test]
    fn test_recorder_forwards_to_sink() {
        let sink = Arc::new(CountingSink {
            seen: Mutex::new(Vec::new()),
        });
        let mut recorder = EventRecorder::with_sink(sink.clone());

        recorder.extend(vec![
            SelectionEvent::ImplicitInclusion {
                ordinal: 1,
                required_by: 3,
            },
            SelectionEvent::BudgetPrebooked {
                prebooked: 4,
                remaining: 6,
            },
        ]);

        assert_eq!(recorder.into_events().len(), 2);
        assert_eq!(
            *sink.seen.lock().unwrap(),
            vec!["ImplicitInclusion".to_string(), "BudgetPrebooked".to_string()]
        );
    }

    #[test]
    fn test_event_serializes_with_type_tag() {
        let event = SelectionEvent::SolverFallback {
            from: SolverKind::Optimal,
            to: SolverKind::Greedy,
            reason: "cells".to_string(),
        };
        let json = serde_json::to_value(&event).unwrap();
        assert_eq!(json["type"], "SOLVER_FALLBACK");
        assert_eq!(json["from"], "OPTIMAL");
    }
}
