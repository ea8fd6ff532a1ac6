use crate::core::{
    command_init::{StoreInit, StoreOptions},
    error::Result,
    file_uri,
    output::print_success,
};

/// Delete the sketch at `sketch` from disk
pub fn execute_delete(options: &StoreOptions, sketch: &str) -> Result<()> {
    let store = StoreInit::initialize(options)?;
    let sketch = store.load_sketch(&file_uri::parse(sketch)?)?;

    store.delete_sketch(&sketch)?;

    if !options.json {
        print_success(&format!("Deleted {}", sketch.name));
        println!();
    }
    Ok(())
}
