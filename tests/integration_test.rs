// Integration tests for userlist-tui

use std::sync::Arc;
use std::time::{Duration, SystemTime, UNIX_EPOCH};

use async_trait::async_trait;
use tokio::runtime::Handle;
use userlist_tui::api::{InMemoryUserApi, Query, User, UserApi};
use userlist_tui::app::{AppState, FetchStatus, Fetcher, FilterField, Keymap, Theme};
use userlist_tui::error::ApiError;

fn temp_path(tag: &str) -> String {
    let mut path = std::env::temp_dir();
    let nonce = SystemTime::now().duration_since(UNIX_EPOCH).unwrap().as_nanos();
    path.push(format!("ult_{}_{}_{}.conf", tag, std::process::id(), nonce));
    path.to_string_lossy().to_string()
}

fn new_app() -> AppState {
    AppState::new(4, Theme::dark(), Keymap::default())
}

// 1) Theme config roundtrip and init
#[test]
fn theme_roundtrip_and_init() {
    let path = temp_path("theme");
    let t = Theme::mocha();
    t.write_file(&path).expect("write theme");
    let t2 = Theme::from_file(&path).expect("read theme");
    assert_eq!(t.text, t2.text);
    assert_eq!(t.error, t2.error);
    assert_eq!(t.header_bg, t2.header_bg);

    let init = temp_path("theme_init");
    let _ = std::fs::remove_file(&init);
    let _created = Theme::load_or_init(&init);
    assert!(std::path::Path::new(&init).exists());

    let _ = std::fs::remove_file(&path);
    let _ = std::fs::remove_file(&init);
}

// 2) Keybinding overrides from file
#[test]
fn keymap_file_overrides_defaults() {
    use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
    use userlist_tui::app::keymap::KeyAction;

    let path = temp_path("keys");
    std::fs::write(&path, "# custom\nRefresh = x\nNextPage = Ctrl+n\ngarbage line\n").unwrap();
    let km = Keymap::from_file(&path).expect("read keymap");
    assert_eq!(
        km.resolve(&KeyEvent::new(KeyCode::Char('x'), KeyModifiers::NONE)),
        Some(KeyAction::Refresh)
    );
    assert_eq!(
        km.resolve(&KeyEvent::new(KeyCode::Char('n'), KeyModifiers::CONTROL)),
        Some(KeyAction::NextPage)
    );
    // defaults still present
    assert_eq!(
        km.resolve(&KeyEvent::new(KeyCode::Char('q'), KeyModifiers::NONE)),
        Some(KeyAction::Quit)
    );

    km.write_file(&path).unwrap();
    let again = Keymap::from_file(&path).unwrap();
    assert_eq!(again.keys_for(KeyAction::Refresh), km.keys_for(KeyAction::Refresh));
    let _ = std::fs::remove_file(&path);
}

// 3) Full cycle against the in-memory backend: load, page, filter, resize
#[tokio::test]
async fn fetch_cycles_drive_the_view() {
    let api: Arc<dyn UserApi> = Arc::new(InMemoryUserApi::sample().with_latency(Duration::ZERO));
    let (fetcher, mut rx) = Fetcher::new(api, Handle::current());
    let mut app = new_app();

    async fn cycle(app: &mut AppState, fetcher: &Fetcher, rx: &mut tokio::sync::mpsc::UnboundedReceiver<userlist_tui::app::FetchOutcome>) {
        let req = app.take_fetch_request().expect("pending fetch");
        fetcher.spawn(req);
        let outcome = rx.recv().await.expect("outcome");
        assert!(app.apply_outcome(outcome));
    }

    cycle(&mut app, &fetcher, &mut rx).await;
    assert_eq!(app.status(), FetchStatus::Loaded);
    assert_eq!(app.view.total_count, 14);
    let info = app.page_info();
    assert_eq!((info.current, info.total), (1, 4));

    app.set_page(2);
    cycle(&mut app, &fetcher, &mut rx).await;
    assert_eq!(app.query.offset, 4);
    assert_eq!(app.view.users[0].name, "Eve");

    // filter change keeps the offset, which now points past the single match
    app.set_filter(FilterField::Name, "bob");
    cycle(&mut app, &fetcher, &mut rx).await;
    assert_eq!(app.view.total_count, 1);
    assert!(app.view.users.is_empty());
    assert_eq!(app.page_info().current, 2);
    assert_eq!(app.page_info().total, 1);

    app.set_page(1);
    cycle(&mut app, &fetcher, &mut rx).await;
    assert_eq!(app.view.users.len(), 1);
    assert_eq!(app.view.users[0].name, "Bob");
}

// 4) Limit change from 4 to 6 at offset 8 leaves the offset alone
#[tokio::test]
async fn limit_change_does_not_realign_offset() {
    let api: Arc<dyn UserApi> = Arc::new(InMemoryUserApi::sample().with_latency(Duration::ZERO));
    let (fetcher, mut rx) = Fetcher::new(api, Handle::current());
    let mut app = new_app();
    app.set_page(3);
    assert_eq!(app.query.offset, 8);
    app.set_limit(6);

    fetcher.spawn(app.take_fetch_request().unwrap());
    app.apply_outcome(rx.recv().await.unwrap());
    assert_eq!(app.query.offset, 8);
    assert_eq!(app.query.limit, 6);
    // items 9..=14 of the sample
    assert_eq!(app.view.users.len(), 6);
    assert_eq!(app.view.users[0].name, "Ivan");
}

// 5) Rejected fetch surfaces the backend message and keeps the last page
#[tokio::test]
async fn rejected_fetch_keeps_previous_users() {
    struct Flaky;

    #[async_trait]
    impl UserApi for Flaky {
        async fn list_users(&self, query: &Query) -> Result<Vec<User>, ApiError> {
            if query.name == "boom" {
                Err(ApiError::Backend("network error".into()))
            } else {
                Ok(vec![User::new(1, "Alice", 30)])
            }
        }

        async fn count_users(&self, _query: &Query) -> Result<u64, ApiError> {
            Ok(1)
        }
    }

    let (fetcher, mut rx) = Fetcher::new(Arc::new(Flaky), Handle::current());
    let mut app = new_app();
    fetcher.spawn(app.take_fetch_request().unwrap());
    app.apply_outcome(rx.recv().await.unwrap());

    app.set_filter(FilterField::Name, "boom");
    fetcher.spawn(app.take_fetch_request().unwrap());
    assert!(app.view.loading);
    app.apply_outcome(rx.recv().await.unwrap());

    assert!(!app.view.loading);
    assert_eq!(app.status(), FetchStatus::Errored);
    assert_eq!(format!("Error: {}", app.view.error.as_deref().unwrap()), "Error: network error");
    assert_eq!(app.view.users, vec![User::new(1, "Alice", 30)]);
}

// 6) A slow earlier cycle cannot overwrite a faster later one
#[tokio::test]
async fn slow_stale_cycle_is_dropped() {
    struct NameLatency;

    #[async_trait]
    impl UserApi for NameLatency {
        async fn list_users(&self, query: &Query) -> Result<Vec<User>, ApiError> {
            if query.name.is_empty() {
                tokio::time::sleep(Duration::from_millis(150)).await;
            }
            Ok(vec![User::new(1, format!("for '{}'", query.name), 1)])
        }

        async fn count_users(&self, _query: &Query) -> Result<u64, ApiError> {
            Ok(1)
        }
    }

    let (fetcher, mut rx) = Fetcher::new(Arc::new(NameLatency), Handle::current());
    let mut app = new_app();
    fetcher.spawn(app.take_fetch_request().unwrap());
    app.set_filter(FilterField::Name, "a");
    fetcher.spawn(app.take_fetch_request().unwrap());

    let first = rx.recv().await.unwrap();
    let second = rx.recv().await.unwrap();
    assert_eq!(first.seq, 2, "fast cycle should arrive first");
    assert!(app.apply_outcome(first));
    assert!(!app.apply_outcome(second));
    assert_eq!(app.view.users[0].name, "for 'a'");
}
