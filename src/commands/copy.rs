use crate::core::{
    command_init::{StoreInit, StoreOptions},
    error::Result,
    file_uri,
    output::{print_json, print_success},
};

/// Copy the sketch at `sketch` to `destination`
pub fn execute_copy(options: &StoreOptions, sketch: &str, destination: &str) -> Result<()> {
    let store = StoreInit::initialize(options)?;
    let sketch = store.load_sketch(&file_uri::parse(sketch)?)?;
    let destination = file_uri::parse(destination)?;

    let copied = store.copy(&sketch, &destination)?;

    if options.json {
        return print_json(&copied);
    }
    let copied_path = file_uri::to_path(&copied)?;
    print_success(&format!("Copied {} to {}", sketch.name, copied_path.display()));
    println!();
    Ok(())
}
