use quitgate::{all, any, field, percent_of, Condition, FactSet};

fn main() {
    // Gate for unlocking the next phase of a quit plan
    let gate = all([
        field("progress").gte(80),
        any([
            field("use_nrt").eq(true),
            field("avg_cigarettes").lte(percent_of("fm_cigarettes_total", 0.8)),
        ]),
    ]);

    println!("{gate}");

    // The stored form is JSON; round-trip it the way the app would
    let stored = gate.to_json();
    println!("{stored}");
    let gate = Condition::from_json(&stored).expect("stored condition must parse");

    // Evaluate against one week of tracked facts
    let week = FactSet::new()
        .set("progress", 85)
        .set("use_nrt", false)
        .set("avg_cigarettes", 7)
        .set("fm_cigarettes_total", 20);

    if gate.evaluate(&week) {
        println!("Phase unlocked.");
    } else {
        println!("Phase stays locked.");
    }
}
