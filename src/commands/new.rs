use crate::core::{
    command_init::{StoreInit, StoreOptions},
    error::Result,
    file_uri,
    output::{print_json, print_sketch, print_success},
};

/// Create a new sketch in a temp workspace
pub fn execute_new(options: &StoreOptions) -> Result<()> {
    let store = StoreInit::initialize(options)?;
    let sketch = store.create_new_sketch()?;

    if options.json {
        return print_json(&sketch);
    }
    print_success(&format!("Created {}", sketch.name));
    print_sketch(&sketch);
    Ok(())
}

/// Copy an existing sketch into a temp workspace
pub fn execute_clone(options: &StoreOptions, path: &str) -> Result<()> {
    let store = StoreInit::initialize(options)?;
    let sketch = store.clone_example(&file_uri::parse(path)?)?;

    if options.json {
        return print_json(&sketch);
    }
    print_success(&format!("Cloned {}", sketch.name));
    print_sketch(&sketch);
    Ok(())
}
