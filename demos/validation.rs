use quitgate::{Condition, FieldTable};

fn main() {
    let table = FieldTable::standard();

    // A draft straight out of the rule editor, before it is saved
    let draft = r#"{
        "logic": "AND",
        "rules": [
            { "field": "progress", "operator": ">=", "value": 150 },
            { "field": "stress_level", "operator": "<", "value": 4 },
            { "field": "fm_cigarettes_total", "operator": ">", "value": 10 },
            { "field": "use_nrt", "operator": ">=", "value": true }
        ]
    }"#;

    let condition = Condition::from_json(draft).expect("draft must be well-formed JSON");

    match condition.validate(&table) {
        Ok(()) => println!("Draft is ready to save."),
        Err(errors) => {
            println!("Draft has {} problems:", errors.len());
            for issue in &errors {
                println!("  {issue}");
            }
        }
    }
}
