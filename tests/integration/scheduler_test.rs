use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use glucmon::core::glucose::PollScheduler;
use tokio::time::sleep;

fn counting(counter: Arc<AtomicUsize>) -> impl Fn(glucmon::core::glucose::TickContext) -> std::future::Ready<()> {
    move |_| {
        counter.fetch_add(1, Ordering::SeqCst);
        std::future::ready(())
    }
}

#[tokio::test(start_paused = true)]
async fn test_restart_leaves_a_single_schedule() {
    let runs = Arc::new(AtomicUsize::new(0));
    let mut scheduler = PollScheduler::new();

    scheduler
        .start(Duration::from_secs(30), counting(runs.clone()))
        .unwrap();
    sleep(Duration::from_secs(45)).await;
    assert_eq!(scheduler.ticks_fired(), 2);

    scheduler
        .start(Duration::from_secs(60), counting(runs.clone()))
        .unwrap();
    sleep(Duration::from_secs(130)).await;

    // 0s and 30s on the old schedule, then 45s, 105s and 165s on the new one
    assert_eq!(scheduler.ticks_fired(), 5);
    assert_eq!(runs.load(Ordering::SeqCst), 5);
    assert_eq!(scheduler.interval(), Some(Duration::from_secs(60)));
}

#[tokio::test(start_paused = true)]
async fn test_slow_cycle_does_not_delay_next_tick() {
    let runs = Arc::new(AtomicUsize::new(0));
    let finished = Arc::new(AtomicUsize::new(0));
    let mut scheduler = PollScheduler::new();

    let (r, f) = (runs.clone(), finished.clone());
    scheduler
        .start(Duration::from_secs(10), move |_| {
            let (r, f) = (r.clone(), f.clone());
            async move {
                r.fetch_add(1, Ordering::SeqCst);
                sleep(Duration::from_secs(25)).await;
                f.fetch_add(1, Ordering::SeqCst);
            }
        })
        .unwrap();

    sleep(Duration::from_secs(21)).await;
    assert_eq!(runs.load(Ordering::SeqCst), 3);
    assert_eq!(finished.load(Ordering::SeqCst), 0);
}

#[tokio::test(start_paused = true)]
async fn test_in_flight_tick_sees_stop() {
    let observed = Arc::new(parking_lot::Mutex::new(Vec::new()));
    let mut scheduler = PollScheduler::new();

    let seen = observed.clone();
    scheduler
        .start(Duration::from_secs(30), move |ctx| {
            let seen = seen.clone();
            async move {
                sleep(Duration::from_secs(5)).await;
                seen.lock().push(ctx.is_active());
            }
        })
        .unwrap();

    sleep(Duration::from_secs(1)).await;
    scheduler.stop();
    sleep(Duration::from_secs(10)).await;

    assert_eq!(*observed.lock(), vec![false]);
    assert!(!scheduler.is_running());
}
