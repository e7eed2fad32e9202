use dialoguer::{Confirm, Input, Select};

use crate::config::settings::AGE_CHOICES;

pub fn ask_directory() -> anyhow::Result<String> {
    let directory: String = Input::new()
        .with_prompt("Enter Directory ('./projects')")
        .default(".".to_string())
        .interact_text()?;
    Ok(directory)
}

pub fn confirm_auto_delete() -> anyhow::Result<bool> {
    let confirmed = Confirm::new()
        .with_prompt("Do you want nmscan to delete node_modules in old folders?")
        .default(false)
        .interact()?;
    Ok(confirmed)
}

pub fn choose_age() -> anyhow::Result<u32> {
    let items: Vec<String> = AGE_CHOICES.iter().map(|d| d.to_string()).collect();
    let selection = Select::new()
        .with_prompt("How old should folders be? (days)")
        .items(&items)
        .default(0)
        .interact()?;
    Ok(AGE_CHOICES[selection])
}
