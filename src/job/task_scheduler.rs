//! 轮询调度模块
//!
//! 以资源为单位注册重复定时任务，统一处理编辑锁挂起与平滑关停，
//! 与具体的刷新业务逻辑解耦。

use std::future::Future;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tracing::{debug, info, warn};

/// 全局编辑锁。
///
/// 点评编辑弹窗打开期间，所有后台刷新一律不发起请求（不是发了再丢弃），
/// 这是系统唯一的"取消"原语：锁不拦截在途调用，只阻止新调用产生。
/// 用显式的acquire/release值替代共享布尔标记
#[derive(Clone, Debug, Default)]
pub struct EditLock {
    held: Arc<AtomicBool>,
}

impl EditLock {
    pub fn new() -> Self {
        EditLock {
            held: Arc::new(AtomicBool::new(false)),
        }
    }

    /// 尝试上锁；已被持有时返回false
    pub fn acquire(&self) -> bool {
        !self.held.swap(true, Ordering::SeqCst)
    }

    pub fn release(&self) {
        self.held.store(false, Ordering::SeqCst);
    }

    pub fn is_held(&self) -> bool {
        self.held.load(Ordering::SeqCst)
    }
}

/// 轮询调度器。
///
/// 单线程协作式定时器：每个资源一个独立的重复计时任务。
/// 任务体在循环内被await，同一资源天然不会并发拉取；
/// 错过的tick直接跳过而不是补发。编辑锁持有期间tick为空转
pub struct TaskScheduler {
    edit_lock: EditLock,
    shutdown_tx: watch::Sender<bool>,
    tasks: Vec<(String, JoinHandle<()>)>,
}

impl TaskScheduler {
    /// 关停时给任务留的退出时限
    const SHUTDOWN_TIMEOUT_SECS: u64 = 5;

    pub fn new(edit_lock: EditLock) -> Self {
        let (shutdown_tx, _) = watch::channel(false);
        TaskScheduler {
            edit_lock,
            shutdown_tx,
            tasks: Vec::new(),
        }
    }

    pub fn edit_lock(&self) -> EditLock {
        self.edit_lock.clone()
    }

    /// 注册一个按固定间隔重复执行的任务。
    /// 首个立即tick被吃掉：启动时的初始同步由调用方自己做
    pub fn add_periodic_task<F, Fut>(&mut self, name: String, interval_ms: u64, mut task: F)
    where
        F: FnMut() -> Fut + Send + 'static,
        Fut: Future<Output = ()> + Send,
    {
        let edit_lock = self.edit_lock.clone();
        let mut shutdown_rx = self.shutdown_tx.subscribe();
        let task_name = name.clone();

        let handle = tokio::spawn(async move {
            let mut ticker = tokio::time::interval(Duration::from_millis(interval_ms));
            ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);
            ticker.tick().await;

            loop {
                tokio::select! {
                    _ = ticker.tick() => {
                        if edit_lock.is_held() {
                            debug!("编辑锁生效，跳过本轮刷新: {}", task_name);
                            continue;
                        }
                        // 在这里await：上一轮没结束前不会进入下一轮
                        task().await;
                    }
                    _ = shutdown_rx.changed() => {
                        info!("停止定时任务: {}", task_name);
                        break;
                    }
                }
            }
        });

        self.tasks.push((name, handle));
    }

    /// 通知全部任务退出并等待收尾；超时的任务记警告后放弃等待
    pub async fn shutdown(&mut self) {
        let _ = self.shutdown_tx.send(true);
        for (name, handle) in self.tasks.drain(..) {
            let timeout = Duration::from_secs(Self::SHUTDOWN_TIMEOUT_SECS);
            match tokio::time::timeout(timeout, handle).await {
                Ok(_) => debug!("定时任务已退出: {}", name),
                Err(_) => warn!(
                    "定时任务未在{}s内退出: {}",
                    Self::SHUTDOWN_TIMEOUT_SECS,
                    name
                ),
            }
        }
    }
}
