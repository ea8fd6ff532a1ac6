use crate::core::{
    command_init::{StoreInit, StoreOptions},
    error::{Result, SketchStoreError},
    file_uri,
    output::{print_json, print_sketch},
};

/// Load and show the sketch at `path`
pub fn execute_load(options: &StoreOptions, path: &str) -> Result<()> {
    let store = StoreInit::initialize(options)?;
    let sketch = store.load_sketch(&file_uri::parse(path)?)?;

    if options.json {
        return print_json(&sketch);
    }
    print_sketch(&sketch);
    Ok(())
}

/// Show the sketch containing `path`
pub fn execute_folder(options: &StoreOptions, path: &str) -> Result<()> {
    let store = StoreInit::initialize(options)?;
    let uri = file_uri::parse(path)?;

    match store.get_sketch_folder(&uri)? {
        Some(sketch) if options.json => print_json(&sketch),
        Some(sketch) => {
            print_sketch(&sketch);
            Ok(())
        }
        None if options.json => print_json(&serde_json::Value::Null),
        None => Err(SketchStoreError::not_found(
            format!("{path} is not inside a sketch"),
            uri.as_str(),
        )),
    }
}
