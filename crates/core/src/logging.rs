//! 异步事件日志
//!
//! 业务事件日志通道：调用方通过 [`EventLogger`] 非阻塞入队，后台worker
//! 逐条格式化后写出（INFO -> stdout，ERROR -> stderr）。队列容量固定，
//! 队列满时条目被静默丢弃，保证记录日志永远不会阻塞请求处理。
//! 关闭时worker同步排空剩余条目后退出。

use std::collections::BTreeMap;
use std::fmt::Write as _;
use std::io::Write as _;
use std::sync::{Arc, Mutex};

use chrono::{DateTime, Utc};
use tokio::sync::{mpsc, oneshot};
use tokio::task::JoinHandle;

/// 队列默认容量
pub const DEFAULT_BUFFER_SIZE: usize = 128;

/// 事件附加字段，BTreeMap保证按key有序，输出可确定
pub type LogFields = BTreeMap<String, serde_json::Value>;

/// 日志级别
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogLevel {
    Info,
    Error,
}

impl LogLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            LogLevel::Info => "INFO",
            LogLevel::Error => "ERROR",
        }
    }
}

/// 单条日志条目，由worker消费一次后丢弃
#[derive(Debug, Clone)]
pub struct LogEntry {
    pub timestamp: DateTime<Utc>,
    pub level: LogLevel,
    pub message: String,
    pub fields: LogFields,
}

impl LogEntry {
    /// 格式化为单行文本：`[时间] 级别: 消息, k=v, ...`
    pub fn format_line(&self) -> String {
        let mut line = format!(
            "[{}] {}: {}",
            self.timestamp.format("%Y-%m-%d %H:%M:%S"),
            self.level.as_str(),
            self.message
        );
        for (key, value) in &self.fields {
            // 字符串字段不带引号输出
            match value {
                serde_json::Value::String(s) => {
                    let _ = write!(line, ", {key}={s}");
                }
                other => {
                    let _ = write!(line, ", {key}={other}");
                }
            }
        }
        line
    }
}

/// 日志输出端抽象，测试时可替换为收集器
pub trait LogWriter: Send + Sync {
    fn write_entry(&self, entry: &LogEntry);
}

/// 默认输出端：INFO写stdout，ERROR写stderr，写失败忽略
struct StdioWriter;

impl LogWriter for StdioWriter {
    fn write_entry(&self, entry: &LogEntry) {
        let line = entry.format_line();
        match entry.level {
            LogLevel::Error => {
                let _ = writeln!(std::io::stderr().lock(), "{line}");
            }
            LogLevel::Info => {
                let _ = writeln!(std::io::stdout().lock(), "{line}");
            }
        }
    }
}

/// 异步事件日志器
///
/// 状态机：Running -> (shutdown信号) -> Draining -> Stopped。
/// `nop` 变体没有worker，所有调用都是空操作。
pub struct EventLogger {
    tx: Option<mpsc::Sender<LogEntry>>,
    shutdown_tx: Mutex<Option<oneshot::Sender<()>>>,
    worker: Mutex<Option<JoinHandle<()>>>,
}

impl EventLogger {
    /// 创建日志器并启动后台worker。`buffer_size` 为0时使用默认容量。
    ///
    /// 必须在tokio运行时内调用。
    pub fn new(buffer_size: usize) -> Self {
        Self::with_writer(buffer_size, Arc::new(StdioWriter))
    }

    /// 使用指定输出端创建日志器
    pub fn with_writer(buffer_size: usize, writer: Arc<dyn LogWriter>) -> Self {
        let capacity = if buffer_size == 0 {
            DEFAULT_BUFFER_SIZE
        } else {
            buffer_size
        };
        let (tx, rx) = mpsc::channel(capacity);
        let (shutdown_tx, shutdown_rx) = oneshot::channel();
        let handle = tokio::spawn(run_worker(rx, shutdown_rx, writer));

        Self {
            tx: Some(tx),
            shutdown_tx: Mutex::new(Some(shutdown_tx)),
            worker: Mutex::new(Some(handle)),
        }
    }

    /// 无输出日志器，用于测试或不需要日志的场景
    pub fn nop() -> Self {
        Self {
            tx: None,
            shutdown_tx: Mutex::new(None),
            worker: Mutex::new(None),
        }
    }

    pub fn info(&self, message: &str, fields: LogFields) {
        self.enqueue(LogLevel::Info, message, fields);
    }

    pub fn error(&self, message: &str, fields: LogFields) {
        self.enqueue(LogLevel::Error, message, fields);
    }

    fn enqueue(&self, level: LogLevel, message: &str, fields: LogFields) {
        let Some(tx) = &self.tx else {
            return;
        };
        let entry = LogEntry {
            timestamp: Utc::now(),
            level,
            message: message.to_string(),
            fields,
        };
        // 队列满或worker已停止时静默丢弃，绝不阻塞调用方
        let _ = tx.try_send(entry);
    }

    /// 通知worker排空队列并等待其退出。重复调用是空操作。
    pub async fn shutdown(&self) {
        let signal = self.shutdown_tx.lock().ok().and_then(|mut guard| guard.take());
        if let Some(signal) = signal {
            let _ = signal.send(());
        }

        let handle = self.worker.lock().ok().and_then(|mut guard| guard.take());
        if let Some(handle) = handle {
            let _ = handle.await;
        }
    }
}

async fn run_worker(
    mut rx: mpsc::Receiver<LogEntry>,
    mut shutdown_rx: oneshot::Receiver<()>,
    writer: Arc<dyn LogWriter>,
) {
    loop {
        tokio::select! {
            entry = rx.recv() => match entry {
                Some(entry) => writer.write_entry(&entry),
                // 所有发送端已关闭
                None => break,
            },
            _ = &mut shutdown_rx => {
                // 排空已入队的条目后停止
                while let Ok(entry) = rx.try_recv() {
                    writer.write_entry(&entry);
                }
                break;
            }
        }
    }
}
