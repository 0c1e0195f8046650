use anyhow::Result;
use valis_core::task::classify;

pub fn run(text: &str, json: bool) -> Result<()> {
    let task_type = classify(text);

    if json {
        let output = serde_json::json!({
            "text": text,
            "task_type": task_type,
        });
        println!("{}", serde_json::to_string(&output)?);
    } else {
        println!("🔎 {} ({})", task_type, task_type.display_name());
    }

    Ok(())
}
