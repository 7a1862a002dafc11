use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use crate::config::EngineConfig;
use crate::native::probe::ToolchainProbe;
use crate::native::testing::toolchain_installed;
use crate::native::workspace::WorkspaceManager;
use crate::orchestrator::Orchestrator;
use crate::scenarios::{self, FISHING_MISSION};
use crate::stubs::compiler::CompilerStub;
use crate::stubs::runner::{RunnerBehavior, RunnerStub};
use crate::verdict::Verdict;

const CORRECT_TOURNAMENT: &str = r#"
public class FishingTournament {
    public boolean checkEligibility(int myBells, boolean isPocketFull) {
        return myBells >= 500 && !isPocketFull;
    }
}
"#;

const OFF_BY_ONE_TOURNAMENT: &str = r#"
public class FishingTournament {
    public boolean checkEligibility(int myBells, boolean isPocketFull) {
        return myBells > 500 && !isPocketFull;
    }
}
"#;

const POCKET_IGNORED_TOURNAMENT: &str = r#"
public class FishingTournament {
    public boolean checkEligibility(int myBells, boolean isPocketFull) {
        return myBells >= 500;
    }
}
"#;

fn is_empty(root: &Path) -> bool {
    std::fs::read_dir(root)
        .map(|mut dir| dir.next().is_none())
        .unwrap_or(true)
}

fn real_orchestrator(root: &Path) -> Orchestrator {
    Orchestrator::from_config(&EngineConfig {
        workspace_root: root.to_path_buf(),
        ..Default::default()
    })
}

#[tokio::test]
async fn test_concurrent_executions_do_not_share_workspaces() {
    let root = tempfile::tempdir().unwrap();
    let orchestrator = Orchestrator::new(
        Arc::new(CompilerStub::new(Ok(()), Duration::from_millis(50))),
        Arc::new(RunnerStub::new(
            RunnerBehavior::EchoWorkspace,
            Duration::from_millis(50),
        )),
        Arc::new(ToolchainProbe::new("true")),
        WorkspaceManager::new(root.path()),
    );
    let scenario = scenarios::lookup(FISHING_MISSION, 1).unwrap();

    let handles = (0..8)
        .map(|i| {
            let orchestrator = orchestrator.clone();
            let source = CORRECT_TOURNAMENT.replace(
                "public boolean",
                &format!("String tag = \"submission-{}\";\n    public boolean", i),
            );
            tokio::spawn(async move {
                orchestrator
                    .execute_mission_code(
                        &source,
                        scenario.harness_source,
                        scenario.target_class_hint,
                        None,
                    )
                    .await
            })
        })
        .collect::<Vec<_>>();

    let results = futures::future::join_all(handles).await;

    for (i, result) in results.into_iter().enumerate() {
        let result = result.unwrap();
        assert!(result.success, "{:?}", result);
        for j in 0..8 {
            let tag = format!("submission-{}", j);
            assert_eq!(result.output.contains(&tag), i == j, "run {} saw {}", i, tag);
        }
        assert!(result.output.contains("Running Unit 2 Step 1 Tests..."));
    }

    assert!(is_empty(root.path()));
}

#[tokio::test]
async fn test_forced_simulation_matches_real_run() {
    if !toolchain_installed() {
        eprintln!("skipping: JDK not installed");
        return;
    }

    let root = tempfile::tempdir().unwrap();
    let real = real_orchestrator(root.path()).with_default_timeout(20_000);
    let simulated = real.clone().with_forced_simulation(true);
    let scenario = scenarios::lookup(FISHING_MISSION, 1).unwrap();

    let cases = [
        (CORRECT_TOURNAMENT, true),
        (OFF_BY_ONE_TOURNAMENT, false),
        (POCKET_IGNORED_TOURNAMENT, false),
    ];
    for (source, expect_pass) in cases {
        for orchestrator in [&real, &simulated] {
            let result = orchestrator
                .execute_mission_code(
                    source,
                    scenario.harness_source,
                    scenario.target_class_hint,
                    None,
                )
                .await;
            let verdict = Verdict::from_result(&result);

            assert_eq!(result.success, expect_pass, "{:?}", result);
            assert_eq!(verdict.passed, expect_pass, "{:?}", result);
            assert_eq!(verdict.transcript[0], "Running Unit 2 Step 1 Tests...");
        }
    }

    assert!(is_empty(root.path()));
}

#[tokio::test]
async fn test_real_run_prints_case_lines() {
    if !toolchain_installed() {
        eprintln!("skipping: JDK not installed");
        return;
    }

    let root = tempfile::tempdir().unwrap();
    let orchestrator = real_orchestrator(root.path()).with_default_timeout(20_000);
    let scenario = scenarios::lookup(FISHING_MISSION, 1).unwrap();

    let result = orchestrator
        .execute_mission_code(
            OFF_BY_ONE_TOURNAMENT,
            scenario.harness_source,
            scenario.target_class_hint,
            None,
        )
        .await;

    assert!(!result.success);
    assert!(result.output.contains("Case 1 (500, false): false"));
    assert!(result.output.contains("TEST_FAILED"));
    assert!(is_empty(root.path()));
}

#[tokio::test]
async fn test_compile_error_reports_diagnostics() {
    if !toolchain_installed() {
        eprintln!("skipping: JDK not installed");
        return;
    }

    let root = tempfile::tempdir().unwrap();
    let orchestrator = real_orchestrator(root.path()).with_default_timeout(20_000);
    let scenario = scenarios::lookup(FISHING_MISSION, 1).unwrap();

    let source = r#"
public class FishingTournament {
    public boolean checkEligibility(int myBells, boolean isPocketFull) {
        return myBells >= 500 && !isPocketFull
    }
}
"#;
    let result = orchestrator
        .execute_mission_code(
            source,
            scenario.harness_source,
            scenario.target_class_hint,
            None,
        )
        .await;

    assert!(!result.success);
    assert_eq!(result.output, "");
    assert!(result.compilation_error.unwrap().contains("FishingTournament.java"));
    assert!(is_empty(root.path()));
}

#[tokio::test]
async fn test_infinite_loop_is_killed() {
    if !toolchain_installed() {
        eprintln!("skipping: JDK not installed");
        return;
    }

    let root = tempfile::tempdir().unwrap();
    let orchestrator = real_orchestrator(root.path());

    let source = r#"
public class Spinner {
    public static void main(String[] args) {
        while (true) {}
    }
}
"#;
    let result = orchestrator.execute_code(source, Some(5_000)).await;

    assert!(!result.success);
    assert_eq!(result.error.as_deref(), Some("Execution timed out after 5000 ms"));
    assert!(result.execution_time_ms >= 5_000);
    assert!(is_empty(root.path()));
}

#[tokio::test]
async fn test_timed_out_mission_keeps_harness_header() {
    if !toolchain_installed() {
        eprintln!("skipping: JDK not installed");
        return;
    }

    let root = tempfile::tempdir().unwrap();
    let orchestrator = real_orchestrator(root.path());
    let scenario = scenarios::lookup(FISHING_MISSION, 3).unwrap();

    let source = r#"
public class GyaradosHunt {
    public void startHunt() {
        int fishInBucket = 0;
        while (fishInBucket < 5) {
        }
    }
}
"#;
    let result = orchestrator
        .execute_mission_code(
            source,
            scenario.harness_source,
            scenario.target_class_hint,
            Some(5_000),
        )
        .await;

    assert!(!result.success);
    assert_eq!(result.output, "Running Unit 2 Step 3 Tests...");
    assert_eq!(result.error.as_deref(), Some("Execution timed out after 5000 ms"));
    assert!(is_empty(root.path()));
}

#[tokio::test]
async fn test_standalone_program_runs() {
    if !toolchain_installed() {
        eprintln!("skipping: JDK not installed");
        return;
    }

    let root = tempfile::tempdir().unwrap();
    let orchestrator = real_orchestrator(root.path()).with_default_timeout(20_000);

    let source = r#"
public class Hello {
    public static void main(String[] args) {
        System.out.println("Hello, island!");
    }
}
"#;
    let result = orchestrator.execute_code(source, None).await;

    assert!(result.success, "{:?}", result);
    assert_eq!(result.output, "Hello, island!");
    assert!(is_empty(root.path()));
}

#[tokio::test]
async fn test_runtime_exec_never_touches_disk() {
    let root = tempfile::tempdir().unwrap();
    let workspaces = root.path().join("workspaces");
    let orchestrator = Orchestrator::from_config(&EngineConfig {
        workspace_root: workspaces.clone(),
        ..Default::default()
    });

    let source = r#"
public class Hello {
    public static void main(String[] args) throws Exception {
        Runtime.getRuntime().exec("id");
    }
}
"#;
    let result = orchestrator.execute_code(source, None).await;

    assert!(!result.success);
    assert!(result.error.unwrap().starts_with("Blocked pattern detected"));
    assert!(!workspaces.exists());
}
