//! Tests for split sessions between pages of one context.

use boardcheck_contract::{
    Browser, BrowserContext, FaultLog, GameConfig, GameTarget, MoveDescriptor, Phase, PlayerSeat,
    StateSnapshot,
};
use boardcheck_reference::ReferenceBrowser;
use serde_json::json;
use std::time::Duration;

fn seats() -> Vec<PlayerSeat> {
    vec![PlayerSeat::human("Alice"), PlayerSeat::human("Bob")]
}

async fn state<P: GameTarget>(page: &P) -> StateSnapshot {
    StateSnapshot::parse(&page.render_state_to_text().await.expect("render")).expect("parse")
}

#[tokio::test]
async fn test_guest_follows_host() {
    let browser = ReferenceBrowser::default();
    let context = browser.new_context().await.expect("context");
    let host = context.new_page(FaultLog::new()).await.expect("host");
    let guest = context.new_page(FaultLog::new()).await.expect("guest");
    host.load().await.expect("load host");
    guest.load().await.expect("load guest");

    host.start_game(&GameConfig::split_host(seats()))
        .await
        .expect("host start");
    let room = state(&host).await.room_code.expect("room code");

    guest
        .start_game(&GameConfig::split_guest(seats(), room, 1))
        .await
        .expect("guest start");

    let guest_view = state(&guest).await;
    assert_eq!(guest_view.local_player_id, 1);
    assert!(guest_view.valid_moves.is_empty(), "guest waits for host");

    let first = state(&host).await.valid_moves[0].clone();
    assert!(host.perform_move(&first).await.expect("move").success);

    tokio::time::sleep(Duration::from_millis(100)).await;
    let guest_view = state(&guest).await;
    assert_eq!(guest_view.current_player, 1);
    assert_eq!(guest_view.turn_number, 1);
    assert!(!guest_view.valid_moves.is_empty());

    context.close().await.expect("close");
}

#[tokio::test]
async fn test_host_rejects_guest_turn() {
    let browser = ReferenceBrowser::default();
    let context = browser.new_context().await.expect("context");
    let host = context.new_page(FaultLog::new()).await.expect("host");
    host.load().await.expect("load");
    host.start_game(&GameConfig::split_host(seats()))
        .await
        .expect("start");

    let mv = MoveDescriptor::new(json!({"row": 0, "col": 0}));
    assert!(host.perform_move(&mv).await.expect("first").success);

    let second = host
        .perform_move(&MoveDescriptor::new(json!({"row": 1, "col": 1})))
        .await
        .expect("second");
    assert!(second.is_explained_rejection());
}

#[tokio::test]
async fn test_receive_state_replaces_game() {
    let browser = ReferenceBrowser::default();
    let context = browser.new_context().await.expect("context");
    let source = context.new_page(FaultLog::new()).await.expect("source");
    let sink = context.new_page(FaultLog::new()).await.expect("sink");
    source.load().await.expect("load");
    sink.load().await.expect("load");

    source
        .start_game(&GameConfig::local(seats()))
        .await
        .expect("start");
    let mv = MoveDescriptor::new(json!({"row": 2, "col": 0}));
    source.perform_move(&mv).await.expect("move");

    sink.receive_state(&state(&source).await)
        .await
        .expect("receive");
    let received = state(&sink).await;
    assert_eq!(received.phase, Phase::Playing);
    assert_eq!(received.turn_number, 1);
    assert_eq!(received.board[2][0], json!("X"));
}
