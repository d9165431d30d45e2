#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;

use mt_dashboard::dashboard::model::account::AccountSnapshot;
use mt_dashboard::dashboard::model::capital::SymbolColors;
use mt_dashboard::dashboard::model::comment::{Comment, CommentPayload};
use mt_dashboard::dashboard::model::config::{ConfigUpdate, DashboardConfig};
use mt_dashboard::dashboard::model::trade::{Trade, TradeType};
use mt_dashboard::dashboard::remote::api::{AccountAndTrades, DashboardApi};
use mt_dashboard::error::AppError;

/// 脚本化的远端服务：服务端状态放在内存里，行为与真实服务一致
/// （写入落到自身map，整体拉取返回权威全集）
pub struct ScriptedApi {
    pub account: Mutex<AccountAndTrades>,
    pub comments: Mutex<HashMap<String, Comment>>,
    pub config: Mutex<DashboardConfig>,
    pub capital: Mutex<f64>,
    /// 置位后所有写操作返回status=error
    pub fail_writes: AtomicBool,
    /// 置位后所有读操作返回网络错误
    pub fail_reads: AtomicBool,
    pub get_comments_calls: AtomicUsize,
    pub get_trades_calls: AtomicUsize,
    pub create_calls: AtomicUsize,
    pub update_calls: AtomicUsize,
}

impl ScriptedApi {
    pub fn new() -> Arc<Self> {
        Arc::new(ScriptedApi {
            account: Mutex::new(AccountAndTrades {
                account: AccountSnapshot::default(),
                open_trades: Vec::new(),
                closed_trades: Vec::new(),
            }),
            comments: Mutex::new(HashMap::new()),
            config: Mutex::new(DashboardConfig::default()),
            capital: Mutex::new(1000.0),
            fail_writes: AtomicBool::new(false),
            fail_reads: AtomicBool::new(false),
            get_comments_calls: AtomicUsize::new(0),
            get_trades_calls: AtomicUsize::new(0),
            create_calls: AtomicUsize::new(0),
            update_calls: AtomicUsize::new(0),
        })
    }

    pub fn set_trades(&self, open: Vec<Trade>, closed: Vec<Trade>) {
        let mut payload = self.account.lock().unwrap();
        payload.open_trades = open;
        payload.closed_trades = closed;
    }

    pub fn set_balance(&self, balance: f64) {
        self.account.lock().unwrap().account.balance = balance;
    }

    pub fn put_comment(&self, ticket: i64, comment: Comment) {
        self.comments
            .lock()
            .unwrap()
            .insert(ticket.to_string(), comment);
    }

    fn write_result(&self) -> Result<(), AppError> {
        if self.fail_writes.load(Ordering::SeqCst) {
            Err(AppError::Remote("refus du serveur".to_string()))
        } else {
            Ok(())
        }
    }

    fn read_guard(&self) -> Result<(), AppError> {
        if self.fail_reads.load(Ordering::SeqCst) {
            Err(AppError::Network("connexion perdue".to_string()))
        } else {
            Ok(())
        }
    }
}

#[async_trait]
impl DashboardApi for ScriptedApi {
    async fn get_account_and_trades(&self) -> Result<AccountAndTrades, AppError> {
        self.get_trades_calls.fetch_add(1, Ordering::SeqCst);
        self.read_guard()?;
        Ok(self.account.lock().unwrap().clone())
    }

    async fn get_capital_baseline(&self) -> Result<f64, AppError> {
        self.read_guard()?;
        Ok(*self.capital.lock().unwrap())
    }

    async fn get_comments(&self) -> Result<HashMap<String, Comment>, AppError> {
        self.get_comments_calls.fetch_add(1, Ordering::SeqCst);
        self.read_guard()?;
        Ok(self.comments.lock().unwrap().clone())
    }

    async fn get_config(&self) -> Result<DashboardConfig, AppError> {
        self.read_guard()?;
        Ok(self.config.lock().unwrap().clone())
    }

    async fn update_config(&self, update: &ConfigUpdate) -> Result<(), AppError> {
        self.write_result()?;
        self.config.lock().unwrap().apply(update);
        Ok(())
    }

    async fn create_comment(&self, payload: &CommentPayload) -> Result<(), AppError> {
        self.create_calls.fetch_add(1, Ordering::SeqCst);
        self.write_result()?;
        self.comments
            .lock()
            .unwrap()
            .insert(payload.id.to_string(), comment_from_payload(payload));
        Ok(())
    }

    async fn update_comment(&self, payload: &CommentPayload) -> Result<(), AppError> {
        self.update_calls.fetch_add(1, Ordering::SeqCst);
        self.write_result()?;
        let mut comments = self.comments.lock().unwrap();
        let entry = comments
            .entry(payload.id.to_string())
            .or_insert_with(Comment::default);
        entry.text = payload.text.clone();
        entry.satisfaction = payload.satisfaction;
        entry.confiance = payload.confiance;
        entry.attente = payload.attente.clone();
        Ok(())
    }

    async fn delete_comment(&self, ticket: i64) -> Result<(), AppError> {
        self.write_result()?;
        self.comments.lock().unwrap().remove(&ticket.to_string());
        Ok(())
    }

    async fn close_trade(&self, ticket: i64) -> Result<(), AppError> {
        self.write_result()?;
        let mut payload = self.account.lock().unwrap();
        payload.open_trades.retain(|t| t.ticket != ticket);
        Ok(())
    }

    async fn annotate_trade(&self, _ticket: i64) -> Result<(), AppError> {
        self.write_result()
    }

    async fn get_symbol_colors(&self) -> Result<SymbolColors, AppError> {
        self.read_guard()?;
        Ok(SymbolColors::fallback())
    }
}

pub fn comment_from_payload(payload: &CommentPayload) -> Comment {
    Comment {
        text: payload.text.clone(),
        satisfaction: payload.satisfaction,
        confiance: payload.confiance,
        attente: payload.attente.clone(),
        ..Comment::default()
    }
}

pub fn open_trade(ticket: i64, symbol: &str) -> Trade {
    Trade {
        ticket,
        symbol: symbol.to_string(),
        trade_type: TradeType::Buy,
        lots: 0.1,
        open_price: 1.1,
        sl: None,
        tp: None,
        profit: None,
        open_time: "2025.07.01 09:00".to_string(),
        close_time: None,
    }
}

pub fn closed_trade(ticket: i64, symbol: &str, profit: f64, close_time: &str) -> Trade {
    Trade {
        ticket,
        symbol: symbol.to_string(),
        trade_type: TradeType::Buy,
        lots: 0.1,
        open_price: 1.1,
        sl: None,
        tp: None,
        profit: Some(profit),
        open_time: "2025.07.01 09:00".to_string(),
        close_time: Some(close_time.to_string()),
    }
}
