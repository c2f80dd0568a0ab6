use super::*;

fn policy(max_retries: u32) -> RetryPolicy {
    RetryPolicy {
        max_retries,
        initial_backoff: Duration::from_millis(1),
    }
}

#[test]
fn transient_failures_are_retried_until_success() {
    let mut seen = Vec::new();
    let out = policy(3).run(|n| {
        seen.push(n);
        if n < 2 {
            Err(ProviderError::Transient("429".to_string()))
        } else {
            Ok("audio")
        }
    });
    assert_eq!(out, Ok("audio"));
    assert_eq!(seen, vec![0, 1, 2]);
}

#[test]
fn retries_are_bounded() {
    let mut attempts = 0;
    let out: Result<(), _> = policy(2).run(|_| {
        attempts += 1;
        Err(ProviderError::Transient("timeout".to_string()))
    });
    assert!(out.is_err());
    assert_eq!(attempts, 3);
}

#[test]
fn rejections_are_not_retried() {
    let mut attempts = 0;
    let out: Result<(), _> = policy(5).run(|_| {
        attempts += 1;
        Err(ProviderError::Rejected("bad voice".to_string()))
    });
    assert_eq!(out, Err(ProviderError::Rejected("bad voice".to_string())));
    assert_eq!(attempts, 1);
}

#[test]
fn limiter_spaces_requests() {
    let mut limiter = RateLimiter::new(Duration::from_millis(30));
    assert_eq!(limiter.wait(), Duration::ZERO);
    let start = Instant::now();
    limiter.wait();
    assert!(start.elapsed() >= Duration::from_millis(20));
}

#[test]
fn zero_interval_never_sleeps() {
    let mut limiter = RateLimiter::new(Duration::ZERO);
    limiter.wait();
    assert_eq!(limiter.wait(), Duration::ZERO);
}

#[test]
fn backoff_schedule_doubles_from_initial_delay() {
    let policy = RetryPolicy {
        max_retries: 4,
        initial_backoff: Duration::from_millis(300),
    };
    let delays: Vec<_> = policy.schedule().collect();
    assert_eq!(
        delays,
        vec![
            Duration::from_millis(300),
            Duration::from_millis(600),
            Duration::from_millis(1200),
            Duration::from_millis(2400),
        ]
    );
}

#[test]
fn backoff_schedule_is_capped_at_one_minute() {
    let policy = RetryPolicy {
        max_retries: 12,
        initial_backoff: Duration::from_secs(5),
    };
    let delays: Vec<_> = policy.schedule().collect();
    assert_eq!(delays.len(), 12);
    assert!(delays.iter().all(|d| *d <= Duration::from_secs(60)));
    assert_eq!(delays.last(), Some(&Duration::from_secs(60)));
}

#[test]
fn zero_retries_schedule_nothing() {
    assert_eq!(policy(0).schedule().count(), 0);
    let mut attempts = 0;
    let out: Result<(), _> = policy(0).run(|_| {
        attempts += 1;
        Err(ProviderError::Transient("503".to_string()))
    });
    assert!(out.is_err());
    assert_eq!(attempts, 1);
}
