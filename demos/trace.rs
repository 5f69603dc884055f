use quitgate::{all, any, field, percent_of, FactSet};

fn main() {
    let gate = all([
        field("progress").gte(80),
        any([
            field("use_nrt").eq(true),
            field("avg_cigarettes").lte(percent_of("fm_cigarettes_total", 0.8)),
        ]),
    ]);

    // The baseline fact is missing, so the formula rule faults; the OR
    // still passes through the NRT branch.
    let week = FactSet::new()
        .set("progress", 85)
        .set("use_nrt", true)
        .set("avg_cigarettes", 7);

    let report = gate.evaluate_detailed(&week);

    println!("{report}");
    println!();
    for (path, error) in report.faults() {
        println!("unresolved at {path}: {error}");
    }
    println!("Duration: {:?}", report.duration());
}
