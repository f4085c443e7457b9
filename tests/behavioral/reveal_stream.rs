// ABOUTME: Behavioral tests for the prompt reveal stream and driver

use std::time::Duration;

use analysis_wizard::wizard::{reveal, RevealDriver, RevealTiming};
use futures_util::StreamExt;
use tokio::time::Instant;

fn timing(initial_ms: u64, char_ms: u64) -> RevealTiming {
    RevealTiming::new(Duration::from_millis(initial_ms), Duration::from_millis(char_ms))
}

#[tokio::test(start_paused = true)]
async fn test_prefixes_grow_one_char_at_a_time() {
    let text = "Describe it";
    let prefixes: Vec<String> = reveal(text, timing(300, 30)).collect().await;

    assert_eq!(prefixes.len(), text.chars().count());
    for (idx, prefix) in prefixes.iter().enumerate() {
        assert_eq!(prefix.chars().count(), idx + 1);
        assert!(text.starts_with(prefix.as_str()));
    }
    assert_eq!(prefixes.last().map(String::as_str), Some(text));
}

#[tokio::test(start_paused = true)]
async fn test_total_duration_matches_timing() {
    let start = Instant::now();
    let count = reveal("abcd", timing(300, 30)).count().await;
    let elapsed = start.elapsed();

    assert_eq!(count, 4);
    assert!(elapsed >= Duration::from_millis(420), "finished early: {elapsed:?}");
    assert!(elapsed < Duration::from_millis(500), "finished late: {elapsed:?}");
}

/// Retargeting mid-reveal never shows text from the abandoned prompt
#[tokio::test(start_paused = true)]
async fn test_driver_retarget_discards_old_prompt() {
    let mut driver = RevealDriver::new(timing(0, 10), true);
    driver.set_target("first prompt");

    tokio::time::sleep(Duration::from_millis(35)).await;
    driver.poll();
    assert!("first prompt".starts_with(driver.visible()));

    driver.set_target("second");
    assert_eq!(driver.visible(), "");

    tokio::time::sleep(Duration::from_millis(200)).await;
    driver.poll();
    assert_eq!(driver.visible(), "second");
    assert!(driver.is_complete());
}
