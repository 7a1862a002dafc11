//! Heuristic grading used when the Java toolchain is missing, or when the
//! target class is judged by inspection rather than by running it.
//!
//! Each target owns an ordered table of checks over the source text. Every
//! check contributes its transcript line and the transcript ends with the
//! sentinel. This is an approximation: a source can satisfy the patterns and
//! still be wrong at runtime, or the other way round.

use once_cell::sync::Lazy;
use regex::Regex;

use crate::constants::{SENTINEL_FAILED, SENTINEL_PASSED};
use crate::core::domain::ExecutionResult;

/// Source text prepared for matching.
#[derive(Debug)]
pub struct Source {
    target: String,
    /// Comments removed, string literals kept.
    code: String,
    /// `code` with all whitespace removed.
    compact: String,
}

impl Source {
    pub fn new(raw: &str, target: &str) -> Self {
        let code = strip_comments(raw);
        let compact = code.chars().filter(|c| !c.is_whitespace()).collect();
        Self {
            target: target.to_string(),
            code,
            compact,
        }
    }

    fn contains(&self, needle: &str) -> bool {
        self.code.contains(needle)
    }

    fn compact_contains(&self, needles: &[&str]) -> bool {
        needles.iter().any(|needle| self.compact.contains(needle))
    }
}

struct Check {
    holds: fn(&Source) -> bool,
    pass: Option<&'static str>,
    fail: Option<&'static str>,
}

struct Plan {
    header: &'static str,
    checks: &'static [Check],
    on_pass: &'static [&'static str],
    on_fail: &'static [&'static str],
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SimulatedTarget {
    FishingTournament,
    FishingBot,
    GyaradosHunt,
    SecurityFix,
    Store,
}

impl SimulatedTarget {
    pub fn from_hint(hint: &str) -> Option<Self> {
        match hint {
            "FishingTournament" => Some(Self::FishingTournament),
            "FishingBot" => Some(Self::FishingBot),
            "GyaradosHunt" => Some(Self::GyaradosHunt),
            "SecurityFix" => Some(Self::SecurityFix),
            "Store" => Some(Self::Store),
            _ => None,
        }
    }

    /// Targets whose correctness is decided by inspection even when a real
    /// toolchain is available.
    pub fn is_structural_only(self) -> bool {
        matches!(self, Self::Store)
    }

    fn plan(self, source: &Source) -> &'static Plan {
        match self {
            Self::FishingTournament => &ELIGIBILITY,
            Self::FishingBot => &FISHING_BOT,
            Self::GyaradosHunt => &GYARADOS_HUNT,
            Self::SecurityFix => &SECURITY_FIX,
            // Store steps build on each other, so the newest method wins.
            Self::Store if source.contains("inStock") => &STORE_STOCK,
            Self::Store if source.contains("buyTool") => &STORE_PRECONDITION,
            Self::Store if source.contains("payLoan") => &STORE_SHADOWING,
            Self::Store => &STORE_SCOPE,
        }
    }
}

pub fn is_structural_only(hint: &str) -> bool {
    SimulatedTarget::from_hint(hint).is_some_and(SimulatedTarget::is_structural_only)
}

/// Builds a transcript for `source` as if the harness for `hint` had run.
#[tracing::instrument(skip(source))]
pub fn simulate(source: &str, hint: &str) -> ExecutionResult {
    let Some(target) = SimulatedTarget::from_hint(hint) else {
        tracing::warn!("no simulation table for target class");
        return ExecutionResult {
            success: false,
            output: SENTINEL_FAILED.to_string(),
            error: Some(format!("No simulation available for target class '{}'", hint)),
            ..Default::default()
        };
    };

    let source = Source::new(source, hint);
    let plan = target.plan(&source);

    let mut lines = vec![plan.header.to_string()];
    let mut passed = true;

    if !declares_target(&source) {
        passed = false;
        lines.push(format!("Error: class '{}' not found", source.target));
    }

    for check in plan.checks {
        let holds = (check.holds)(&source);
        passed &= holds;
        let line = if holds { check.pass } else { check.fail };
        lines.extend(line.map(str::to_string));
    }

    if passed {
        lines.push(SENTINEL_PASSED.to_string());
        lines.extend(plan.on_pass.iter().map(|l| l.to_string()));
    } else {
        lines.push(SENTINEL_FAILED.to_string());
        lines.extend(plan.on_fail.iter().map(|l| l.to_string()));
    }

    tracing::debug!(?target, passed, "simulation finished");

    ExecutionResult {
        success: passed,
        output: lines.join("\n"),
        ..Default::default()
    }
}

fn declares_target(source: &Source) -> bool {
    let pattern = format!(r"\bclass\s+{}\b", regex::escape(&source.target));
    Regex::new(&pattern)
        .map(|re| re.is_match(&source.code))
        .unwrap_or(false)
}

static ELIGIBILITY: Plan = Plan {
    header: "Running Unit 2 Step 1 Tests...",
    checks: &[
        Check {
            holds: has_bell_check,
            pass: Some("Case 1 (500, false): true"),
            fail: Some("Case 1 (500, false): false"),
        },
        Check {
            holds: has_bell_check,
            pass: Some("Case 2 (400, false): false"),
            fail: Some("Case 2 (400, false): true"),
        },
        Check {
            holds: has_pocket_check,
            pass: Some("Case 3 (500, true): false"),
            fail: Some("Case 3 (500, true): true"),
        },
    ],
    on_pass: &["Great job! Logic is correct."],
    on_fail: &["Check your if-condition logic again."],
};

static FISHING_BOT: Plan = Plan {
    header: "Running Unit 2 Step 2 Tests...",
    checks: &[
        Check {
            holds: has_counted_for_loop,
            pass: Some("=== For loop bot: 10 casts ==="),
            fail: Some("Error: the for loop must cast exactly 10 times"),
        },
        Check {
            holds: has_catch_while_loop,
            pass: Some("=== While loop bot: fishing until 10 fish ==="),
            fail: Some("Error: the while loop must run until fishCount reaches 10"),
        },
    ],
    on_pass: &[],
    on_fail: &["Finish both bot modes: for (10 casts) and while (10 fish)."],
};

static GYARADOS_HUNT: Plan = Plan {
    header: "Running Unit 2 Step 3 Tests...",
    checks: &[
        Check {
            holds: has_spot_loop,
            pass: Some("Outer loop visits the fishing spots"),
            fail: Some("Error: no outer loop over the 3 fishing spots"),
        },
        Check {
            holds: has_bucket_loop,
            pass: Some("Inner loop fills the bucket with 5 fish"),
            fail: Some("Error: no inner loop catching 5 fish per spot"),
        },
        Check {
            holds: increments_bucket,
            pass: None,
            fail: Some("Error: fishInBucket never grows, the inner loop would not end"),
        },
    ],
    on_pass: &[],
    on_fail: &["Each of the 3 spots (outer) needs 5 fish (inner)."],
};

static SECURITY_FIX: Plan = Plan {
    header: "Running Unit 2 Step 4 Tests...",
    checks: &[
        Check {
            holds: filters_digits,
            pass: Some("Spy fish name decoded"),
            fail: Some("Error: use Character.isDigit to drop the hidden digits"),
        },
        Check {
            holds: sums_digits,
            pass: Some("Vault password computed"),
            fail: Some("Error: the digit sum needs % 10 and / 10"),
        },
    ],
    on_pass: &[],
    on_fail: &[],
};

static STORE_SCOPE: Plan = Plan {
    header: "Inspecting Store (scope)...",
    checks: &[
        Check {
            holds: no_local_bells,
            pass: None,
            fail: Some("Error: 'myBells' is still a local variable"),
        },
        Check {
            holds: has_bells_field,
            pass: Some("Instance variable 'myBells' found"),
            fail: Some("Error: declare 'myBells' as an instance variable"),
        },
    ],
    on_pass: &[],
    on_fail: &[],
};

static STORE_SHADOWING: Plan = Plan {
    header: "Inspecting Store (shadowing)...",
    checks: &[Check {
        holds: pays_loan_from_field,
        pass: Some("Loan payment logic looks correct"),
        fail: Some("Error: value not changing, the parameter hides 'myBells'"),
    }],
    on_pass: &[],
    on_fail: &[],
};

static STORE_PRECONDITION: Plan = Plan {
    header: "Inspecting Store (preconditions)...",
    checks: &[Check {
        holds: guards_purchase,
        pass: Some("Precondition check found"),
        fail: Some("Error: You can buy even with 0 bells"),
    }],
    on_pass: &[],
    on_fail: &[],
};

static STORE_STOCK: Plan = Plan {
    header: "Inspecting Store (stock)...",
    checks: &[
        Check {
            holds: guards_stock,
            pass: Some("Stock check found"),
            fail: Some("Error: sold-out items can still be bought"),
        },
        Check {
            holds: announces_sold_out,
            pass: None,
            fail: Some("Error: print '품절' when the item is out of stock"),
        },
    ],
    on_pass: &[],
    on_fail: &[],
};

fn has_bell_check(s: &Source) -> bool {
    s.compact_contains(&["myBells>=500", "500<=myBells"])
}

fn has_pocket_check(s: &Source) -> bool {
    s.compact_contains(&["&&"])
        && s.compact_contains(&["!isPocketFull", "isPocketFull==false", "false==isPocketFull"])
}

fn has_counted_for_loop(s: &Source) -> bool {
    static FOR_INT_I: Lazy<Regex> =
        Lazy::new(|| Regex::new(r"for\s*\(\s*int\s+i\b").expect("for pattern"));
    s.compact_contains(&["for(inti=0;i<10;i++)", "i<=9"]) || FOR_INT_I.is_match(&s.code)
}

fn has_catch_while_loop(s: &Source) -> bool {
    s.compact_contains(&["while(fishCount<10)", "fishCount<=9"])
}

fn has_spot_loop(s: &Source) -> bool {
    s.contains("for")
}

fn has_bucket_loop(s: &Source) -> bool {
    s.contains("while") && s.compact_contains(&["fishInBucket<5"])
}

fn increments_bucket(s: &Source) -> bool {
    s.compact_contains(&[
        "fishInBucket++",
        "++fishInBucket",
        "fishInBucket+=1",
        "fishInBucket=fishInBucket+1",
    ])
}

fn filters_digits(s: &Source) -> bool {
    s.contains("Character.isDigit")
}

fn sums_digits(s: &Source) -> bool {
    s.compact_contains(&["%10"]) && s.compact_contains(&["/10", "/=10"])
}

static BELLS_DECL: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\bint\s+myBells\b").expect("declaration pattern"));

fn no_local_bells(s: &Source) -> bool {
    !BELLS_DECL
        .find_iter(&s.code)
        .any(|m| nesting_at(&s.code, m.start()).braces >= 2)
}

fn has_bells_field(s: &Source) -> bool {
    BELLS_DECL.find_iter(&s.code).any(|m| {
        let nesting = nesting_at(&s.code, m.start());
        nesting.braces == 1 && nesting.parens == 0
    })
}

fn pays_loan_from_field(s: &Source) -> bool {
    static PARAM: Lazy<Regex> =
        Lazy::new(|| Regex::new(r"payLoan\s*\(\s*int\s+(\w+)\s*\)").expect("payLoan pattern"));

    let Some(param) = PARAM.captures(&s.code).and_then(|c| c.get(1)) else {
        return false;
    };
    let param = regex::escape(param.as_str());

    let pattern = if param == "myBells" {
        // Shadowed: only an explicit `this.` reaches the field.
        r"this\.myBells\s*(-=\s*myBells|=\s*this\.myBells\s*-\s*myBells)".to_string()
    } else {
        format!(
            r"(this\.)?myBells\s*(-=\s*{p}\b|=\s*(this\.)?myBells\s*-\s*{p}\b)",
            p = param
        )
    };

    Regex::new(&pattern)
        .map(|re| re.is_match(&s.code))
        .unwrap_or(false)
}

fn guards_purchase(s: &Source) -> bool {
    static GUARD: Lazy<Regex> = Lazy::new(|| {
        Regex::new(r"if\s*\(\s*((this\.)?myBells\s*>=?\s*cost|cost\s*<=?\s*(this\.)?myBells)")
            .expect("guard pattern")
    });
    GUARD.is_match(&s.code)
}

fn guards_stock(s: &Source) -> bool {
    static GUARD: Lazy<Regex> = Lazy::new(|| {
        Regex::new(r"if\s*\(\s*!?\s*(this\.)?inStock\b").expect("stock pattern")
    });
    GUARD.is_match(&s.code)
}

fn announces_sold_out(s: &Source) -> bool {
    s.contains("품절")
}

#[derive(Debug, Default, PartialEq, Eq)]
struct Nesting {
    braces: usize,
    parens: usize,
}

/// Brace and paren depth at byte offset `at`, ignoring string and char literals.
fn nesting_at(code: &str, at: usize) -> Nesting {
    let mut nesting = Nesting::default();
    let mut quote: Option<char> = None;
    let mut escaped = false;

    for (idx, c) in code.char_indices() {
        if idx >= at {
            break;
        }
        if let Some(q) = quote {
            if escaped {
                escaped = false;
            } else if c == '\\' {
                escaped = true;
            } else if c == q {
                quote = None;
            }
            continue;
        }
        match c {
            '"' | '\'' => quote = Some(c),
            '{' => nesting.braces += 1,
            '}' => nesting.braces = nesting.braces.saturating_sub(1),
            '(' => nesting.parens += 1,
            ')' => nesting.parens = nesting.parens.saturating_sub(1),
            _ => {}
        }
    }

    nesting
}

/// Removes `//` and `/* */` comments, leaving string and char literals intact.
fn strip_comments(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    let mut chars = raw.chars().peekable();
    let mut quote: Option<char> = None;

    while let Some(c) = chars.next() {
        if let Some(q) = quote {
            out.push(c);
            if c == '\\' {
                if let Some(next) = chars.next() {
                    out.push(next);
                }
            } else if c == q {
                quote = None;
            }
            continue;
        }

        match (c, chars.peek()) {
            ('/', Some('/')) => {
                for next in chars.by_ref() {
                    if next == '\n' {
                        out.push('\n');
                        break;
                    }
                }
            }
            ('/', Some('*')) => {
                chars.next();
                let mut prev = '\0';
                for next in chars.by_ref() {
                    if prev == '*' && next == '/' {
                        break;
                    }
                    prev = next;
                }
                out.push(' ');
            }
            ('"' | '\'', _) => {
                quote = Some(c);
                out.push(c);
            }
            _ => out.push(c),
        }
    }

    out
}
