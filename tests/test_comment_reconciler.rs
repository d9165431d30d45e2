mod common;

use std::sync::atomic::Ordering;
use std::sync::Arc;

use common::ScriptedApi;
use mt_dashboard::dashboard::cache::state_store::StateStore;
use mt_dashboard::dashboard::model::comment::{Comment, CommentDraft};
use mt_dashboard::dashboard::reconcile::comment_editor::{CommentReconciler, EditState};
use mt_dashboard::dashboard::remote::api::DashboardApi;
use mt_dashboard::dashboard::task::comments_job;
use mt_dashboard::error::AppError;
use mt_dashboard::job::task_scheduler::EditLock;

fn setup() -> (Arc<ScriptedApi>, Arc<dyn DashboardApi>, Arc<StateStore>, EditLock) {
    let scripted = ScriptedApi::new();
    let api: Arc<dyn DashboardApi> = scripted.clone();
    let store = Arc::new(StateStore::new());
    let lock = EditLock::new();
    (scripted, api, store, lock)
}

fn draft(text: &str, attente: &str, confiance: u8, satisfaction: u8) -> CommentDraft {
    CommentDraft {
        text: text.to_string(),
        attente: attente.to_string(),
        confiance,
        satisfaction,
    }
}

#[tokio::test]
async fn test_begin_edit_takes_lock_and_is_exclusive() {
    let (_scripted, api, store, lock) = setup();
    let mut reconciler = CommentReconciler::new(api, store, lock.clone());

    assert!(reconciler.begin_edit(100).await);
    assert!(lock.is_held());
    // 会话进行中再次开启：无操作
    assert!(!reconciler.begin_edit(200).await);

    reconciler.cancel();
    assert!(!lock.is_held());
    assert!(reconciler.state().is_idle());
}

#[tokio::test]
async fn test_validation_failure_keeps_editing_and_skips_remote() {
    let (scripted, api, store, lock) = setup();
    let mut reconciler = CommentReconciler::new(api, store, lock.clone());

    assert!(reconciler.begin_edit(100).await);
    *reconciler.draft_mut().unwrap() = draft("", "", 3, 2);

    let err = reconciler.save().await.unwrap_err();
    assert!(matches!(err, AppError::Validation(_)));
    // 校验失败：会话还在编辑态、锁未放、远端一次都没被调
    assert!(matches!(reconciler.state(), EditState::Editing { .. }));
    assert!(lock.is_held());
    assert_eq!(scripted.create_calls.load(Ordering::SeqCst), 0);
    assert_eq!(scripted.update_calls.load(Ordering::SeqCst), 0);

    // 评分越界同样被拦
    *reconciler.draft_mut().unwrap() = draft("ok", "", 6, 0);
    assert!(reconciler.save().await.is_err());
    assert_eq!(scripted.create_calls.load(Ordering::SeqCst), 0);

    // attente单独非空即可保存
    *reconciler.draft_mut().unwrap() = draft("", "follow up", 0, 0);
    assert!(reconciler.save().await.is_ok());
}

#[tokio::test]
async fn test_save_creates_when_not_cached() {
    let (scripted, api, store, lock) = setup();
    let mut reconciler = CommentReconciler::new(api, Arc::clone(&store), lock.clone());

    assert!(reconciler.begin_edit(100).await);
    *reconciler.draft_mut().unwrap() = draft("premier trade", "cassure", 4, 3);
    reconciler.save().await.unwrap();

    // 缓存无此ticket -> 走create
    assert_eq!(scripted.create_calls.load(Ordering::SeqCst), 1);
    assert_eq!(scripted.update_calls.load(Ordering::SeqCst), 0);

    // 乐观更新立即可见，锁已释放，状态回到Idle
    let cached = store.comment(100).await.unwrap();
    assert_eq!(cached.text, "premier trade");
    assert_eq!(cached.confiance, 4);
    assert!(!lock.is_held());
    assert!(reconciler.state().is_idle());
}

#[tokio::test]
async fn test_save_updates_and_preserves_server_fields() {
    let (scripted, api, store, lock) = setup();

    let cached = Comment {
        text: "ancien".to_string(),
        date: "2025.07.03 17:11".to_string(),
        status: "read".to_string(),
        printer: "bridge-01".to_string(),
        ..Comment::default()
    };
    store.upsert_comment(100, cached).await;

    let mut reconciler = CommentReconciler::new(api, Arc::clone(&store), lock);
    assert!(reconciler.begin_edit(100).await);
    *reconciler.draft_mut().unwrap() = draft("nouveau", "", 2, 5);
    reconciler.save().await.unwrap();

    // 缓存有此ticket -> 走update
    assert_eq!(scripted.update_calls.load(Ordering::SeqCst), 1);
    assert_eq!(scripted.create_calls.load(Ordering::SeqCst), 0);

    // 保存字段覆盖，服务端维护的字段原样保留
    let merged = store.comment(100).await.unwrap();
    assert_eq!(merged.text, "nouveau");
    assert_eq!(merged.satisfaction, 5);
    assert_eq!(merged.date, "2025.07.03 17:11");
    assert_eq!(merged.status, "read");
    assert_eq!(merged.printer, "bridge-01");
}

#[tokio::test]
async fn test_save_is_idempotent() {
    let (_scripted, api, store, lock) = setup();
    let mut reconciler = CommentReconciler::new(api, Arc::clone(&store), lock);

    let d = draft("meme contenu", "", 3, 3);

    assert!(reconciler.begin_edit(100).await);
    *reconciler.draft_mut().unwrap() = d.clone();
    reconciler.save().await.unwrap();
    let first = store.comment(100).await.unwrap();

    // 同一份已保存内容再对账一次，缓存状态不变
    assert!(reconciler.begin_edit(100).await);
    *reconciler.draft_mut().unwrap() = d;
    reconciler.save().await.unwrap();
    let second = store.comment(100).await.unwrap();

    assert_eq!(first, second);
}

#[tokio::test]
async fn test_remote_failure_keeps_draft_and_cache() {
    let (scripted, api, store, lock) = setup();
    store.upsert_comment(100, Comment::default()).await;

    let mut reconciler = CommentReconciler::new(api, Arc::clone(&store), lock.clone());
    assert!(reconciler.begin_edit(100).await);
    *reconciler.draft_mut().unwrap() = draft("tentative", "", 1, 1);

    scripted.fail_writes.store(true, Ordering::SeqCst);
    let err = reconciler.save().await.unwrap_err();
    assert!(matches!(err, AppError::Remote(_)));

    // 失败不做半提交：缓存没动
    assert_eq!(store.comment(100).await.unwrap(), Comment::default());
    // 草稿保留在编辑态，可改可重试；锁未放
    match reconciler.state() {
        EditState::Editing { draft, .. } => assert_eq!(draft.text, "tentative"),
        other => panic!("attendu Editing, obtenu {:?}", other),
    }
    assert!(lock.is_held());

    // 远端恢复后原草稿直接重试成功
    scripted.fail_writes.store(false, Ordering::SeqCst);
    reconciler.save().await.unwrap();
    assert_eq!(store.comment(100).await.unwrap().text, "tentative");
    assert!(!lock.is_held());
}

#[tokio::test]
async fn test_delete_confirms_then_resyncs() {
    let (scripted, api, store, lock) = setup();

    scripted.put_comment(100, Comment::default());
    scripted.put_comment(200, Comment::default());
    comments_job::refresh_comments(&api, &store).await.unwrap();
    assert!(store.comment(100).await.is_some());

    let calls_before = scripted.get_comments_calls.load(Ordering::SeqCst);
    let mut reconciler = CommentReconciler::new(api, Arc::clone(&store), lock);
    reconciler.delete(100).await.unwrap();

    // 远端确认后缓存删除，并整体重拉一次做对账
    assert!(store.comment(100).await.is_none());
    assert!(store.comment(200).await.is_some());
    assert_eq!(
        scripted.get_comments_calls.load(Ordering::SeqCst),
        calls_before + 1
    );
}

#[tokio::test]
async fn test_delete_failure_leaves_cache() {
    let (scripted, api, store, lock) = setup();
    scripted.put_comment(100, Comment::default());
    comments_job::refresh_comments(&api, &store).await.unwrap();

    scripted.fail_writes.store(true, Ordering::SeqCst);
    let mut reconciler = CommentReconciler::new(api, Arc::clone(&store), lock);
    assert!(reconciler.delete(100).await.is_err());

    // 未确认不动缓存
    assert!(store.comment(100).await.is_some());
}
