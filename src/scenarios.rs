//! Static table of mission harnesses.
//!
//! Each harness is a complete `Main` class compiled next to the student's
//! file. It prints `TEST_PASSED` only when its own checks hold; otherwise it
//! prints `TEST_FAILED` or `EXECUTION_ERROR` and exits with status 1.

use std::collections::BTreeMap;

use once_cell::sync::Lazy;

use crate::core::domain::{MissionTestScenario, ScenarioKey};

pub const FISHING_MISSION: &str = "unit-2-fishing";
pub const STORE_MISSION: &str = "unit-3-variable-world";

const ELIGIBILITY_HARNESS: &str = r#"
public class Main {
    public static void main(String[] args) {
        try {
            System.out.println("Running Unit 2 Step 1 Tests...");
            FishingTournament ft = new FishingTournament();

            boolean r1 = ft.checkEligibility(500, false);
            System.out.println("Case 1 (500, false): " + r1);

            boolean r2 = ft.checkEligibility(400, false);
            System.out.println("Case 2 (400, false): " + r2);

            boolean r3 = ft.checkEligibility(500, true);
            System.out.println("Case 3 (500, true): " + r3);

            if (r1 && !r2 && !r3) {
                System.out.println("TEST_PASSED");
                System.out.println("Great job! Logic is correct.");
            } else {
                System.out.println("TEST_FAILED");
                System.out.println("Check your if-condition logic again.");
                System.exit(1);
            }
        } catch (Exception e) {
            System.out.println("EXECUTION_ERROR");
            e.printStackTrace();
            System.exit(1);
        }
    }
}
"#;

// Completion alone counts as success here: the random fishing() helper is
// never observed, so a wrong loop still passes. Kept as-is on purpose.
const FISHING_BOT_HARNESS: &str = r#"
public class Main {
    public static void main(String[] args) {
        try {
            System.out.println("Running Unit 2 Step 2 Tests...");
            FishingBot bot = new FishingBot();
            bot.startFishingBot();
            System.out.println("TEST_PASSED");
        } catch (Exception e) {
            System.out.println("EXECUTION_ERROR");
            e.printStackTrace();
            System.exit(1);
        }
    }
}
"#;

const GYARADOS_HARNESS: &str = r#"
public class Main {
    public static void main(String[] args) {
        try {
            System.out.println("Running Unit 2 Step 3 Tests...");
            GyaradosHunt hunt = new GyaradosHunt();
            hunt.startHunt();
            System.out.println("TEST_PASSED");
        } catch (Exception e) {
            System.out.println("EXECUTION_ERROR");
            e.printStackTrace();
            System.exit(1);
        }
    }
}
"#;

const SECURITY_FIX_HARNESS: &str = r#"
public class Main {
    public static void main(String[] args) {
        try {
            System.out.println("Running Unit 2 Step 4 Tests...");
            SecurityFix fix = new SecurityFix();
            fix.fixSecurity();
            System.out.println("TEST_PASSED");
        } catch (Exception e) {
            System.out.println("EXECUTION_ERROR");
            e.printStackTrace();
            System.exit(1);
        }
    }
}
"#;

// Store is judged by inspection only, the harness never runs.
const STRUCTURAL_HARNESS: &str = "public class Main { public static void main(String[] args) {} }";

/// Scenarios keyed by mission, then by step.
static REGISTRY: Lazy<BTreeMap<&'static str, BTreeMap<u32, MissionTestScenario>>> =
    Lazy::new(|| {
        let entries = [
            (FISHING_MISSION, 1, "FishingTournament", ELIGIBILITY_HARNESS),
            (FISHING_MISSION, 2, "FishingBot", FISHING_BOT_HARNESS),
            (FISHING_MISSION, 3, "GyaradosHunt", GYARADOS_HARNESS),
            (FISHING_MISSION, 4, "SecurityFix", SECURITY_FIX_HARNESS),
            (STORE_MISSION, 1, "Store", STRUCTURAL_HARNESS),
            (STORE_MISSION, 2, "Store", STRUCTURAL_HARNESS),
            (STORE_MISSION, 3, "Store", STRUCTURAL_HARNESS),
            (STORE_MISSION, 4, "Store", STRUCTURAL_HARNESS),
        ];

        let mut registry: BTreeMap<_, BTreeMap<_, _>> = BTreeMap::new();
        for (mission_id, step_id, target_class_hint, harness_source) in entries {
            registry.entry(mission_id).or_default().insert(
                step_id,
                MissionTestScenario {
                    target_class_hint,
                    harness_source,
                },
            );
        }
        registry
    });

pub fn lookup(mission_id: &str, step_id: u32) -> Option<&'static MissionTestScenario> {
    REGISTRY.get(mission_id)?.get(&step_id)
}

/// Every registered scenario in (mission, step) order.
pub fn all() -> impl Iterator<Item = (ScenarioKey, &'static MissionTestScenario)> {
    REGISTRY.iter().flat_map(|(&mission_id, steps)| {
        steps.iter().map(move |(&step_id, scenario)| {
            (
                ScenarioKey {
                    mission_id,
                    step_id,
                },
                scenario,
            )
        })
    })
}
