use super::*;

#[test]
fn display_prefixes_are_stable() {
    assert!(
        TutoError::validation("x")
            .to_string()
            .contains("validation error:")
    );
    assert!(TutoError::media("x").to_string().contains("media error:"));
    assert!(
        TutoError::executor("x")
            .to_string()
            .contains("executor error:")
    );
    assert!(TutoError::capture("x").to_string().contains("capture error:"));
    assert!(
        TutoError::narration("x")
            .to_string()
            .contains("narration error:")
    );
}

#[test]
fn narration_and_capture_are_degraded() {
    assert_eq!(TutoError::narration("x").severity(), Severity::Degraded);
    assert_eq!(TutoError::capture("x").severity(), Severity::Degraded);
    assert!(TutoError::validation("x").is_fatal());
    assert!(TutoError::source_missing("a.js").is_fatal());
    assert!(TutoError::media("x").is_fatal());
}

#[test]
fn step_forwards_severity_and_names_the_step() {
    let err = TutoError::Step {
        index: 3,
        action: "checkoutCommit abc123".to_string(),
        source: Box::new(TutoError::Git {
            command: "git worktree add --detach /tmp/x abc123".to_string(),
            stderr: "fatal: invalid reference: abc123".to_string(),
            exit_code: Some(128),
        }),
    };
    assert!(err.is_fatal());
    let msg = err.to_string();
    assert!(msg.contains("step 3 (checkoutCommit abc123)"));
    assert!(msg.contains("exit code 128"));
    assert!(msg.contains("invalid reference"));

    let degraded = TutoError::Step {
        index: 0,
        action: "narrate".to_string(),
        source: Box::new(TutoError::narration("provider down")),
    };
    assert_eq!(degraded.severity(), Severity::Degraded);
}

#[test]
fn other_preserves_source() {
    let base = std::io::Error::other("boom");
    let err = TutoError::from(base);
    assert!(err.to_string().contains("boom"));
}
