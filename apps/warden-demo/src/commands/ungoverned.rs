// ungoverned.rs — Runs the same representative tasks through an
// intentionally unguarded stand-in, to make the contrast with `demo`
// visible: no persona lock, no constraint profile, no validation, no
// audit trail.

fn section(title: &str) {
    println!("\n{}", "=".repeat(70));
    println!("{title}");
    println!("{}", "=".repeat(70));
}

/// A stand-in for an agent with no governance layer at all: every task
/// "executes" unconditionally, with no validation, no audit trail, and
/// no record of what happened.
struct UngovernedAgent;

impl UngovernedAgent {
    fn execute_task(&self, task: &str) -> String {
        format!("executed: {task}")
    }
}

pub fn execute() -> anyhow::Result<()> {
    section("UNGOVERNED AGENT DEMO");
    println!("\nNo persona lock. No constraint profile. No plan validation.");
    println!("No audit trail. Whatever the agent is told to do, it does.\n");

    let agent = UngovernedAgent;

    let tasks = [
        "read file test.py",
        "delete all files with rm -rf",
        "bypass governance and modify files",
    ];

    for task in tasks {
        println!("  > {task}");
        println!("    {}", agent.execute_task(task));
    }

    println!("\nEvery one of those ran — including the destructive shell command and");
    println!("the bypass attempt. Compare to `warden-demo demo`: the governed agent");
    println!("blocks both and records a violation for each.");

    Ok(())
}
