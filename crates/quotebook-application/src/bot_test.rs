use super::*;
use crate::test_support::{context, InMemoryQuoteRepository};
use quotebook_core::pager::{RenderedPage, NOTHING_FOUND_LABEL};
use quotebook_core::quote::Quote;
use quotebook_core::search::SearchField;
use quotebook_core::session::prompts;

const GUILD: &str = "guild";
const GENERAL: &str = "general";

fn setup() -> (Arc<InMemoryQuoteRepository>, QuoteBot) {
    let repository = Arc::new(InMemoryQuoteRepository::new());
    let store = Arc::new(QuoteStore::new(repository.clone()));
    (repository, QuoteBot::new(store, &QuotebookConfig::default()))
}

fn menu(user: &str, option: MenuOption) -> InboundEvent {
    InboundEvent::MenuSelected {
        community: GUILD.into(),
        channel: GENERAL.into(),
        user: user.into(),
        option,
    }
}

fn say(id: &str, user: &str, text: &str) -> InboundEvent {
    InboundEvent::TextMessage {
        message: id.into(),
        community: GUILD.into(),
        channel: GENERAL.into(),
        user: user.into(),
        text: text.to_string(),
    }
}

fn texts(outbound: &[Outbound]) -> Vec<&str> {
    outbound
        .iter()
        .filter_map(|o| match o {
            Outbound::SendText { text, .. } => Some(text.as_str()),
            _ => None,
        })
        .collect()
}

fn sent_page(outbound: &[Outbound]) -> &RenderedPage {
    outbound
        .iter()
        .find_map(|o| match o {
            Outbound::SendPage { page, .. } => Some(page),
            _ => None,
        })
        .expect("no page was sent")
}

#[tokio::test]
async fn test_random_on_empty_collection() {
    let (_, bot) = setup();
    let out = bot.handle(menu("alice", MenuOption::Random)).await;
    assert_eq!(texts(&out), vec![NO_QUOTES_YET]);
}

#[tokio::test]
async fn test_random_reports_storage_failure() {
    let (repository, bot) = setup();
    repository.fail_loads(true);
    let out = bot.handle(menu("alice", MenuOption::Random)).await;
    assert_eq!(texts(&out), vec![STORAGE_FAILURE]);
}

#[tokio::test]
async fn test_random_renders_context() {
    let (repository, bot) = setup();
    repository.seed(GUILD, vec![context("carol", "hello")]);
    let out = bot.handle(menu("alice", MenuOption::Random)).await;
    assert_eq!(texts(&out), vec!["\"hello\" - Bob\n(added by carol)"]);
}

#[tokio::test]
async fn test_browse_sends_unindexed_page() {
    let (repository, bot) = setup();
    repository.seed(GUILD, (0..7).map(|i| context("carol", &format!("q{i}"))).collect());

    let out = bot.handle(menu("alice", MenuOption::BrowseAll)).await;
    let page = sent_page(&out);
    assert_eq!(page.title, "All quotes");
    assert_eq!(page.fields.len(), 5);
    assert_eq!(page.control.max_page, 2);
    assert!(!page.control.indexed);
}

#[tokio::test]
async fn test_empty_search_shows_placeholder() {
    let (repository, bot) = setup();
    repository.seed(GUILD, vec![context("carol", "hello")]);

    let query = SearchQuery::new(SearchField::Content, "nope");
    let out = bot.handle(menu("alice", MenuOption::Search(query))).await;
    let page = sent_page(&out);
    assert_eq!(page.fields.len(), 1);
    assert_eq!(page.fields[0].label, NOTHING_FOUND_LABEL);
}

#[tokio::test]
async fn test_buttons_edit_then_delete_page() {
    let (repository, bot) = setup();
    repository.seed(GUILD, (0..6).map(|i| context("carol", &format!("q{i}"))).collect());
    let out = bot.handle(menu("alice", MenuOption::BrowseAll)).await;
    let view = sent_page(&out).control.view;

    let click = |button| InboundEvent::ButtonClicked {
        view,
        user: "alice".into(),
        button,
    };

    match bot.handle(click(NavButton::Next)).await.as_slice() {
        [Outbound::EditPage { page, .. }] => assert_eq!(page.control.page, 2),
        other => panic!("unexpected outbound {other:?}"),
    }
    assert_eq!(
        bot.handle(click(NavButton::Close)).await,
        vec![Outbound::DeletePage { view }]
    );
    assert!(bot.handle(click(NavButton::Prev)).await.is_empty());
}

#[tokio::test]
async fn test_add_flow_commits_and_invalidates() {
    let (repository, bot) = setup();
    let out = bot.handle(menu("alice", MenuOption::AddQuote)).await;
    assert_eq!(texts(&out), vec![prompts::PROMPT_NAME]);

    for (i, text) in ["Bob", "hi", "abc", "no"].into_iter().enumerate() {
        bot.handle(say(&format!("m{i}"), "alice", text)).await;
    }
    let out = bot.handle(say("m-confirm", "alice", "yes")).await;
    assert_eq!(texts(&out), vec![SAVE_OK]);

    let expected = QuoteContext::new("alice", vec![Quote::new("Bob", "hi", None)]).unwrap();
    assert_eq!(repository.stored(GUILD), vec![expected]);
    assert!(!bot.sessions().has_session(&"alice".into()).await);
}

#[tokio::test]
async fn test_add_flow_reports_failed_save() {
    let (repository, bot) = setup();
    repository.fail_saves(true);
    bot.handle(menu("alice", MenuOption::AddQuote)).await;
    for (i, text) in ["Bob", "hi", "1999", "no"].into_iter().enumerate() {
        bot.handle(say(&format!("m{i}"), "alice", text)).await;
    }
    let out = bot.handle(say("m-confirm", "alice", "yes")).await;
    assert_eq!(texts(&out), vec![SAVE_FAILED]);
    assert!(repository.stored(GUILD).is_empty());
}

#[tokio::test]
async fn test_remove_with_nothing_to_delete() {
    let (_, bot) = setup();
    let out = bot.handle(menu("alice", MenuOption::RemoveFromAll)).await;
    assert_eq!(texts(&out), vec![NOTHING_TO_DELETE]);
    assert!(!bot.sessions().has_session(&"alice".into()).await);
}

#[tokio::test]
async fn test_remove_out_of_range_aborts_without_mutation() {
    let (repository, bot) = setup();
    let seeded: Vec<_> = ["a", "b", "c"].iter().map(|t| context("carol", t)).collect();
    repository.seed(GUILD, seeded.clone());

    let out = bot.handle(menu("alice", MenuOption::RemoveFromAll)).await;
    assert!(sent_page(&out).control.indexed);

    let out = bot.handle(say("m1", "alice", "5")).await;
    assert_eq!(texts(&out).len(), 1);
    assert!(texts(&out)[0].contains("Deletion aborted"));
    assert_eq!(repository.stored(GUILD), seeded);
    assert_eq!(repository.save_calls(), 0);
}

#[tokio::test]
async fn test_remove_from_search_deletes_chosen_context() {
    let (repository, bot) = setup();
    repository.seed(
        GUILD,
        vec![context("carol", "keep"), context("dave", "drop"), context("carol", "also")],
    );

    let query = SearchQuery::new(SearchField::Author, "dave");
    bot.handle(menu("alice", MenuOption::RemoveFromSearch(query))).await;

    let out = bot.handle(say("m1", "alice", "0")).await;
    assert_eq!(texts(&out)[1], prompts::REMOVE_PROMPT_CONFIRM);

    let out = bot.handle(say("m2", "alice", "yes")).await;
    assert_eq!(texts(&out), vec![DELETE_OK]);
    assert_eq!(
        repository.stored(GUILD),
        vec![context("carol", "keep"), context("carol", "also")]
    );
}

#[tokio::test]
async fn test_remove_of_vanished_context_is_stale() {
    let (repository, bot) = setup();
    repository.seed(GUILD, vec![context("carol", "gone soon")]);
    bot.handle(menu("alice", MenuOption::RemoveFromAll)).await;
    bot.handle(say("m1", "alice", "0")).await;

    // someone else deletes it in the meantime
    bot.store().write(&GUILD.into(), &[]).await;

    let out = bot.handle(say("m2", "alice", "yes")).await;
    assert_eq!(texts(&out), vec![DELETE_STALE]);
}

#[tokio::test]
async fn test_cancel_menu() {
    let (_, bot) = setup();
    let out = bot.handle(menu("alice", MenuOption::Cancel)).await;
    assert_eq!(texts(&out), vec![NOTHING_TO_CANCEL]);

    bot.handle(menu("alice", MenuOption::AddQuote)).await;
    let out = bot.handle(menu("alice", MenuOption::Cancel)).await;
    assert_eq!(texts(&out), vec![NOTICE_CANCELLED]);
    assert!(bot.handle(say("m1", "alice", "Bob")).await.is_empty());
}

#[tokio::test]
async fn test_expire_idle_sessions_notifies_owner() {
    let (_, bot) = setup();
    bot.handle(menu("alice", MenuOption::AddQuote)).await;

    let later = Instant::now() + std::time::Duration::from_secs(3600);
    assert_eq!(
        bot.expire_idle_sessions(later).await,
        vec![Outbound::text(&ChannelId::from(GENERAL), NOTICE_TIMED_OUT)]
    );
}

#[tokio::test]
async fn test_finished_removal_closes_its_view() {
    let (repository, bot) = setup();
    repository.seed(GUILD, vec![context("carol", "keep"), context("dave", "drop")]);

    for _ in 0..50 {
        bot.handle(menu("alice", MenuOption::BrowseAll)).await;
    }
    assert_eq!(bot.views().len().await, 50);

    let out = bot.handle(menu("alice", MenuOption::RemoveFromAll)).await;
    let view = sent_page(&out).control.view;
    assert_eq!(bot.views().len().await, 51);

    bot.handle(say("m1", "alice", "1")).await;
    let out = bot.handle(say("m2", "alice", "yes")).await;
    assert_eq!(out[0], Outbound::DeletePage { view });
    assert_eq!(texts(&out), vec![DELETE_OK]);
    assert!(!bot.sessions().has_session(&"alice".into()).await);
    assert_eq!(bot.views().len().await, 50);

    let later = Instant::now() + std::time::Duration::from_secs(3600);
    let out = bot.expire_idle_sessions(later).await;
    assert_eq!(out.len(), 50);
    assert!(out.iter().all(|o| matches!(o, Outbound::DeletePage { .. })));
    assert!(bot.views().is_empty().await);
}

#[tokio::test]
async fn test_cancel_closes_removal_view() {
    let (repository, bot) = setup();
    repository.seed(GUILD, vec![context("carol", "hello")]);

    let out = bot.handle(menu("alice", MenuOption::RemoveFromAll)).await;
    let view = sent_page(&out).control.view;
    assert_eq!(
        bot.handle(menu("alice", MenuOption::Cancel)).await,
        vec![
            Outbound::DeletePage { view },
            Outbound::text(&ChannelId::from(GENERAL), NOTICE_CANCELLED),
        ]
    );
    assert!(bot.views().is_empty().await);

    let out = bot.handle(menu("alice", MenuOption::RemoveFromAll)).await;
    let view = sent_page(&out).control.view;
    let out = bot.handle(say("m1", "alice", "cancel")).await;
    assert_eq!(out[0], Outbound::DeletePage { view });
    assert_eq!(texts(&out), vec![NOTICE_CANCELLED]);
    assert!(bot.views().is_empty().await);
}

#[tokio::test]
async fn test_timed_out_removal_closes_its_view() {
    let (repository, bot) = setup();
    repository.seed(GUILD, vec![context("carol", "hello")]);
    let out = bot.handle(menu("alice", MenuOption::RemoveFromAll)).await;
    let view = sent_page(&out).control.view;

    // past the session timeout but well inside the view timeout
    let later = Instant::now() + std::time::Duration::from_secs(400);
    assert_eq!(
        bot.expire_idle_sessions(later).await,
        vec![
            Outbound::text(&ChannelId::from(GENERAL), NOTICE_TIMED_OUT),
            Outbound::DeletePage { view },
        ]
    );
    assert!(bot.views().is_empty().await);
}

#[tokio::test]
async fn test_new_session_closes_replaced_removal_view() {
    let (repository, bot) = setup();
    repository.seed(GUILD, vec![context("carol", "hello")]);
    let out = bot.handle(menu("alice", MenuOption::RemoveFromAll)).await;
    let first = sent_page(&out).control.view;

    let out = bot.handle(menu("alice", MenuOption::RemoveFromAll)).await;
    assert_eq!(out[0], Outbound::DeletePage { view: first });
    let second = sent_page(&out).control.view;
    assert_ne!(first, second);

    let out = bot.handle(menu("alice", MenuOption::AddQuote)).await;
    assert_eq!(out[0], Outbound::DeletePage { view: second });
    assert!(bot.views().is_empty().await);
}

#[tokio::test]
async fn test_browse_views_outlive_sessions_until_idle() {
    let (repository, bot) = setup();
    repository.seed(GUILD, vec![context("carol", "hello")]);
    let out = bot.handle(menu("alice", MenuOption::BrowseAll)).await;
    let view = sent_page(&out).control.view;

    let soon = Instant::now() + std::time::Duration::from_secs(400);
    assert!(bot.expire_idle_sessions(soon).await.is_empty());
    assert_eq!(bot.views().len().await, 1);

    let later = Instant::now() + std::time::Duration::from_secs(1000);
    assert_eq!(
        bot.expire_idle_sessions(later).await,
        vec![Outbound::DeletePage { view }]
    );
}
