use std::sync::Arc;

use rand::rngs::StdRng;
use rand::SeedableRng;

use chatty_core::catalog::Catalog;
use chatty_core::config::WidgetConfig;
use chatty_core::flows::{ConversationState, OrderStep};
use chatty_core::i18n::Language;
use chatty_core::session::ChatSession;
use chatty_core::storage::{InMemoryStore, JsonFileStore};
use chatty_core::AnalyticsCounters;

fn widget(language: Language) -> WidgetConfig {
    WidgetConfig {
        bot_name: "Chatty".to_string(),
        company_name: "MUSE Studio".to_string(),
        default_language: language,
        history_cap: 50,
    }
}

#[test]
fn quote_order_and_reset_lifecycle() {
    let store = Arc::new(InMemoryStore::new());
    let mut session = ChatSession::with_rng(
        Catalog::builtin(),
        &widget(Language::Ko),
        store,
        StdRng::seed_from_u64(11),
    )
    .expect("session");

    // idle chatter does not move the state machine
    session.handle_message("안녕하세요").expect("greeting");
    session.handle_message("포트폴리오 보여주세요").expect("portfolio");
    assert_eq!(session.state(), ConversationState::Idle);

    // price intent opens a quote, product mentions grow it
    session.handle_message("견적 받고 싶어요").expect("price intent");
    assert_eq!(session.state(), ConversationState::Quoting);
    let card = session.handle_message("하이브리드 앱으로요").expect("product");
    assert!(card.text.contains("하이브리드 앱"));

    // confirmation walks the fixed field sequence, validation gating each step
    session.handle_message("확정").expect("confirm");
    assert_eq!(session.state(), ConversationState::Ordering { step: OrderStep::Name });
    session.handle_message("박지훈").expect("name");
    session.handle_message("쓸모없는 이메일").expect("bad email");
    assert_eq!(session.state(), ConversationState::Ordering { step: OrderStep::Email });
    session.handle_message("park@example.com").expect("email");
    session.handle_message("010-2222-3333").expect("phone");
    let done = session.handle_message("예약 앱 만들어주세요").expect("details");
    assert!(done.text.contains("주문이 접수되었습니다"));
    assert_eq!(session.state(), ConversationState::Idle);

    // reset issues a fresh identity and empties the conversation
    let old_id = session.id().to_string();
    session.reset().expect("reset");
    assert_ne!(session.id(), old_id);
    assert!(session.history().is_empty());
}

#[test]
fn unsupported_language_tag_falls_back_to_default_templates() {
    let language = Language::from_tag("de-DE");
    assert_eq!(language, Language::DEFAULT);

    let mut session = ChatSession::with_rng(
        Catalog::builtin(),
        &widget(language),
        Arc::new(InMemoryStore::new()),
        StdRng::seed_from_u64(5),
    )
    .expect("session");

    let reply = session.handle_message("안녕").expect("greeting");
    assert!(chatty_core::i18n::pack(Language::Ko).greeting.contains(&reply.text.as_str()));
}

#[test]
fn analytics_survive_across_sessions_through_the_file_store() {
    let dir = tempfile::TempDir::new().expect("tempdir");
    let store = Arc::new(JsonFileStore::new(dir.path().join("store.json")));

    {
        let mut session = ChatSession::with_rng(
            Catalog::builtin(),
            &widget(Language::Ko),
            store.clone(),
            StdRng::seed_from_u64(1),
        )
        .expect("first session");
        session.handle_message("견적 문의").expect("quote intent");
    }

    let second = ChatSession::with_rng(
        Catalog::builtin(),
        &widget(Language::Ko),
        store.clone(),
        StdRng::seed_from_u64(2),
    )
    .expect("second session");

    let counters = AnalyticsCounters::load(store.as_ref()).expect("counters");
    assert_eq!(counters.sessions_started, 2);
    assert_eq!(counters.quotes_started, 1);
    assert_eq!(second.history().len(), 0);
}
