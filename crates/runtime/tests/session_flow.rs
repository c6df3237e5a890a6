//! End-to-end session scenarios: committed card orders resolved against
//! small boards, observed through the event bus.

use game_content::LevelLoader;
use game_core::{ActorId, Card, CardKind, Coordinate, Facing, InterruptCause};
use runtime::{
    DeathCause, Event, GameSession, RuntimeError, SessionConfig, SessionEvent, SessionWorker,
    Topic, TurnEvent,
};
use tokio::sync::broadcast;

const TICK: f32 = 1.0 / 60.0;

const STRIP: &str = r#"(
    name: "strip",
    tiles: [(0, 0, 0), (0, 1, 0), (0, 2, 0), (0, 3, 0)],
    player_start: (at: (0, 0), facing: Some("north")),
    cards: [(kind: "move", distance: 1, copies: 8)],
)"#;

fn session(level_text: &str) -> GameSession {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
    let level = LevelLoader::parse(level_text).expect("level parses");
    GameSession::new(
        level,
        SessionConfig {
            seed: Some(7),
            ..Default::default()
        },
    )
}

/// Ticks until every actor idles; panics if the session never settles.
fn settle(session: &mut GameSession) {
    for _ in 0..10_000 {
        if session.is_idle() {
            return;
        }
        session.tick(TICK);
    }
    panic!("session never settled");
}

fn drain(rx: &mut broadcast::Receiver<Event>) -> Vec<Event> {
    let mut events = Vec::new();
    while let Ok(event) = rx.try_recv() {
        events.push(event);
    }
    events
}

#[test]
fn move_card_reaches_destination_exactly_once() {
    let mut session = session(STRIP);
    let mut turn_rx = session.bus().subscribe(Topic::Turn);

    session
        .play_cards(ActorId::PLAYER, vec![Card::new(CardKind::Move, 1)])
        .unwrap();
    settle(&mut session);

    assert_eq!(
        session.actor(ActorId::PLAYER).unwrap().current_tile,
        Coordinate::new(0, 1)
    );

    let events = drain(&mut turn_rx);
    let reached = events
        .iter()
        .filter(|event| matches!(event, Event::Turn(TurnEvent::ReachedDestination { .. })))
        .count();
    let resolved = events
        .iter()
        .filter(|event| matches!(event, Event::Turn(TurnEvent::ActionsResolved { .. })))
        .count();
    assert_eq!(reached, 1);
    assert_eq!(resolved, 1);
}

#[test]
fn empty_order_emits_nothing() {
    let mut session = session(STRIP);
    let mut turn_rx = session.bus().subscribe(Topic::Turn);

    session.play_cards(ActorId::PLAYER, vec![]).unwrap();
    settle(&mut session);

    assert!(drain(&mut turn_rx).is_empty());
    assert_eq!(
        session.actor(ActorId::PLAYER).unwrap().current_tile,
        Coordinate::ORIGIN
    );
}

#[test]
fn hole_ends_the_turn_with_a_death_event() {
    let mut session = session(
        r#"(
        name: "pit",
        tiles: [(0, 0, 0), (0, 1, -1), (0, 2, 0)],
        player_start: (at: (0, 0), facing: Some("north")),
        cards: [(kind: "move", distance: 1, copies: 4)],
    )"#,
    );
    let mut turn_rx = session.bus().subscribe(Topic::Turn);
    let mut session_rx = session.bus().subscribe(Topic::Session);

    session
        .play_cards(
            ActorId::PLAYER,
            vec![Card::new(CardKind::Move, 1), Card::new(CardKind::Move, 1)],
        )
        .unwrap();
    settle(&mut session);

    // One arrival, from the fall completion; the aborted walk never reports.
    let reached = drain(&mut turn_rx)
        .iter()
        .filter(|event| matches!(event, Event::Turn(TurnEvent::ReachedDestination { .. })))
        .count();
    assert_eq!(reached, 1);

    assert!(drain(&mut session_rx).iter().any(|event| matches!(
        event,
        Event::Session(SessionEvent::ActorDied {
            cause: DeathCause::FellInHole,
            ..
        })
    )));

    let actor = session.actor(ActorId::PLAYER).unwrap();
    assert_eq!(actor.current_tile, Coordinate::new(0, 1));
    assert!(actor.position.y < 0.0);

    // Dead actors cannot commit another order until the level resets.
    let err = session
        .play_cards(ActorId::PLAYER, vec![Card::new(CardKind::Move, 1)])
        .unwrap_err();
    assert!(matches!(err, RuntimeError::ActorDead(_)));
}

#[test]
fn finish_obstacle_completes_the_level() {
    let mut session = session(
        r#"(
        name: "goal",
        tiles: [(0, 0, 0), (0, 1, 0)],
        obstacles: [(at: (0, 1), kind: Finish)],
        player_start: (at: (0, 0), facing: Some("north")),
        cards: [(kind: "move", distance: 1, copies: 1)],
    )"#,
    );
    let mut session_rx = session.bus().subscribe(Topic::Session);

    session
        .play_cards(ActorId::PLAYER, vec![Card::new(CardKind::Move, 1)])
        .unwrap();
    settle(&mut session);

    assert!(session.is_complete());
    assert!(drain(&mut session_rx).iter().any(|event| matches!(
        event,
        Event::Session(SessionEvent::LevelComplete { .. })
    )));
}

#[test]
fn spring_injects_its_jump_card_once() {
    let mut session = session(
        r#"(
        name: "bounce",
        tiles: [(0, 0, 0), (0, 1, 0), (0, 2, 0)],
        obstacles: [
            (at: (0, 1), kind: Spring, card: Some((kind: "jump", distance: 1))),
        ],
        player_start: (at: (0, 0), facing: Some("north")),
        cards: [(kind: "move", distance: 1, copies: 1)],
    )"#,
    );
    let mut obstacle_rx = session.bus().subscribe(Topic::Obstacle);

    session
        .play_cards(ActorId::PLAYER, vec![Card::new(CardKind::Move, 1)])
        .unwrap();
    settle(&mut session);

    // The injected jump carried the actor past the spring tile.
    assert_eq!(
        session.actor(ActorId::PLAYER).unwrap().current_tile,
        Coordinate::new(0, 2)
    );
    assert_eq!(drain(&mut obstacle_rx).len(), 1);
    assert!(
        !session
            .obstacles()
            .obstacle_at(Coordinate::new(0, 1))
            .unwrap()
            .is_active()
    );
}

#[test]
fn ghost_replays_on_an_independent_resolver() {
    let mut session = session(
        r#"(
        name: "duet",
        tiles: [
            (0, 0, 0), (0, 1, 0), (0, 2, 0),
            (3, 0, 0), (3, 1, 0),
        ],
        player_start: (at: (0, 0), facing: Some("north")),
        ghost_start: (at: (3, 0), facing: Some("north")),
        cards: [(kind: "move", distance: 1, copies: 4)],
    )"#,
    );

    session
        .play_cards(
            ActorId::PLAYER,
            vec![Card::new(CardKind::Move, 1), Card::new(CardKind::Move, 1)],
        )
        .unwrap();
    session
        .play_cards(ActorId::GHOST, vec![Card::new(CardKind::Move, 1)])
        .unwrap();
    settle(&mut session);

    assert_eq!(
        session.actor(ActorId::PLAYER).unwrap().current_tile,
        Coordinate::new(0, 2)
    );
    assert_eq!(
        session.actor(ActorId::GHOST).unwrap().current_tile,
        Coordinate::new(3, 1)
    );
}

#[test]
fn wall_interruption_recovers_and_rejects_double_commits() {
    let mut session = session(STRIP);

    session
        .play_cards(ActorId::PLAYER, vec![Card::new(CardKind::Move, 3)])
        .unwrap();
    for _ in 0..5 {
        session.tick(TICK);
    }
    assert!(!session.is_actor_idle(ActorId::PLAYER));

    // A second commit while the first is still resolving is refused.
    let err = session
        .play_cards(ActorId::PLAYER, vec![Card::new(CardKind::Move, 1)])
        .unwrap_err();
    assert!(matches!(err, RuntimeError::TurnInProgress(_)));

    session
        .interrupt(
            ActorId::PLAYER,
            InterruptCause::WallCollision {
                recover: Coordinate::ORIGIN,
            },
        )
        .unwrap();
    settle(&mut session);

    let actor = session.actor(ActorId::PLAYER).unwrap();
    assert_eq!(actor.current_tile, Coordinate::ORIGIN);

    // The turn is over; a fresh order is accepted.
    session
        .play_cards(ActorId::PLAYER, vec![Card::new(CardKind::Move, 1)])
        .unwrap();
    settle(&mut session);
    assert_eq!(
        session.actor(ActorId::PLAYER).unwrap().current_tile,
        Coordinate::new(0, 1)
    );
}

#[test]
fn spike_interruption_kills_the_actor() {
    let mut session = session(STRIP);
    let mut session_rx = session.bus().subscribe(Topic::Session);

    session
        .play_cards(ActorId::PLAYER, vec![Card::new(CardKind::Move, 2)])
        .unwrap();
    for _ in 0..5 {
        session.tick(TICK);
    }
    session
        .interrupt(
            ActorId::PLAYER,
            InterruptCause::SpikeContact {
                recover: Coordinate::new(0, 1),
            },
        )
        .unwrap();

    assert!(drain(&mut session_rx).iter().any(|event| matches!(
        event,
        Event::Session(SessionEvent::ActorDied {
            cause: DeathCause::Spiked,
            ..
        })
    )));
    assert!(session.is_actor_idle(ActorId::PLAYER));
}

#[test]
fn deal_hand_assigns_unique_ids_and_reports_exhaustion() {
    let mut session = session(
        r#"(
        name: "tiny-deck",
        tiles: [(0, 0, 0)],
        player_start: (at: (0, 0)),
        cards: [(kind: "move", distance: 1, copies: 3)],
    )"#,
    );
    let mut session_rx = session.bus().subscribe(Topic::Session);

    let hand = session.deal_hand(5);
    assert_eq!(hand.len(), 3);
    let mut ids: Vec<u64> = hand.iter().map(|dealt| dealt.id.0).collect();
    ids.dedup();
    assert_eq!(ids.len(), 3);
    assert_eq!(session.cards_remaining(), 0);

    assert!(session.deal_hand(2).is_empty());
    assert!(drain(&mut session_rx).iter().any(|event| matches!(
        event,
        Event::Session(SessionEvent::OutOfCards { .. })
    )));
}

#[test]
fn shuffle_preserves_the_level_pool() {
    let mut session = session(STRIP);
    let hand = session.deal_hand(8);
    assert_eq!(hand.len(), 8);
    assert!(
        hand.iter()
            .all(|dealt| dealt.card == Card::new(CardKind::Move, 1))
    );
}

#[test]
fn reset_restores_obstacles_and_actors() {
    let mut session = session(
        r#"(
        name: "retry",
        tiles: [(0, 0, 0), (0, 1, 0), (0, 2, 0)],
        obstacles: [(at: (0, 1), kind: Spring)],
        player_start: (at: (0, 0), facing: Some("north")),
        cards: [(kind: "move", distance: 1, copies: 4)],
    )"#,
    );

    session
        .play_cards(ActorId::PLAYER, vec![Card::new(CardKind::Move, 1)])
        .unwrap();
    settle(&mut session);
    assert!(
        !session
            .obstacles()
            .obstacle_at(Coordinate::new(0, 1))
            .unwrap()
            .is_active()
    );

    session.reset_level();
    assert!(
        session
            .obstacles()
            .obstacle_at(Coordinate::new(0, 1))
            .unwrap()
            .is_active()
    );
    let actor = session.actor(ActorId::PLAYER).unwrap();
    assert_eq!(actor.current_tile, Coordinate::ORIGIN);
    assert_eq!(actor.facing, Facing::North);
}

#[test]
fn snapshot_serializes_logical_state_only() {
    let session = session(
        r#"(
        name: "snap",
        tiles: [(0, 0, 0), (0, 1, 0)],
        obstacles: [(at: (0, 1), kind: Spike)],
        player_start: (at: (0, 0)),
        cards: [(kind: "move", distance: 1, copies: 1)],
    )"#,
    );

    let snapshot = session.snapshot();
    let json = serde_json::to_string(&snapshot).unwrap();
    let restored: runtime::SessionSnapshot = serde_json::from_str(&json).unwrap();
    assert_eq!(restored.seed, session.seed());
    assert_eq!(restored.obstacles.len(), 1);
    assert_eq!(restored.obstacles[0].kind, "spike");
    assert!(restored.obstacles[0].is_active);
    assert_eq!(restored.actors.len(), 1);
    assert!(restored.actors[0].alive);
}

#[tokio::test(start_paused = true)]
async fn worker_drives_the_session_behind_a_handle() {
    let session = session(STRIP);
    let (handle, join) = SessionWorker::spawn(session);
    let mut turn_rx = handle.subscribe(Topic::Turn);

    handle
        .play_cards(ActorId::PLAYER, vec![Card::new(CardKind::Move, 1)])
        .await
        .unwrap();
    tokio::time::sleep(std::time::Duration::from_secs(3)).await;

    let snapshot = handle.snapshot().await.unwrap();
    assert_eq!(snapshot.actors[0].tile, Coordinate::new(0, 1));

    let mut reached = 0;
    while let Ok(event) = turn_rx.try_recv() {
        if matches!(event, Event::Turn(TurnEvent::ReachedDestination { .. })) {
            reached += 1;
        }
    }
    assert_eq!(reached, 1);

    handle.reset_level().await.unwrap();
    let snapshot = handle.snapshot().await.unwrap();
    assert_eq!(snapshot.actors[0].tile, Coordinate::ORIGIN);

    handle.shutdown().await.unwrap();
    join.await.unwrap();
    assert!(handle.snapshot().await.is_err());
}
