use leaflens_cli::reveal::{RevealHandle, RevealSlot};
use std::time::Duration;
use tokio::time::{self, Instant};

const TICK: Duration = Duration::from_millis(25);

#[tokio::test(start_paused = true)]
async fn test_reveal_emits_every_prefix_in_order() {
    let mut handle = RevealHandle::start("Atlas", TICK);

    let mut seen = Vec::new();
    while let Some(prefix) = handle.recv().await {
        seen.push(prefix);
    }

    assert_eq!(seen, vec!["A", "At", "Atl", "Atla", "Atlas"]);
}

#[tokio::test(start_paused = true)]
async fn test_reveal_takes_one_interval_per_character() {
    let start = Instant::now();
    let mut handle = RevealHandle::start("Dune", TICK);
    while handle.recv().await.is_some() {}

    assert_eq!(start.elapsed(), TICK * 4);
}

#[tokio::test(start_paused = true)]
async fn test_restart_cancels_previous_reveal() {
    let mut slot = RevealSlot::new(TICK);
    slot.reveal("Atlas");

    time::sleep(Duration::from_millis(60)).await;
    assert!(slot.poll());
    assert_eq!(slot.shown(), "At");

    slot.reveal("Dune");
    assert_eq!(slot.shown(), "");

    let mut observed = Vec::new();
    for _ in 0..100 {
        time::sleep(Duration::from_millis(5)).await;
        if slot.poll() {
            observed.push(slot.shown().to_string());
        }
        if !slot.is_animating() {
            break;
        }
    }

    assert!(!observed.is_empty());
    assert!(observed.iter().all(|s| "Dune".starts_with(s.as_str())));
    assert_eq!(slot.shown(), "Dune");
    assert!(slot.is_complete());

    // Nothing from the old reveal shows up later
    time::sleep(Duration::from_millis(500)).await;
    assert!(!slot.poll());
    assert_eq!(slot.shown(), "Dune");
}

#[tokio::test(start_paused = true)]
async fn test_cancel_stops_reveal() {
    let mut slot = RevealSlot::new(TICK);
    slot.reveal("Moby Dick");

    time::sleep(Duration::from_millis(30)).await;
    slot.poll();
    assert_eq!(slot.shown(), "M");

    slot.cancel();
    time::sleep(Duration::from_secs(1)).await;

    assert!(!slot.poll());
    assert_eq!(slot.shown(), "M");
    assert!(!slot.is_animating());
    assert!(!slot.is_complete());
}

#[tokio::test(start_paused = true)]
async fn test_slow_consumer_sees_latest_prefix() {
    let mut slot = RevealSlot::new(Duration::from_millis(1));
    slot.reveal("War and Peace");

    time::sleep(Duration::from_millis(100)).await;
    assert!(slot.poll());

    assert_eq!(slot.shown(), "War and Peace");
    assert!(slot.is_complete());
}
