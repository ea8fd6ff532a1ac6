use assert_cmd::prelude::*;
use predicates::prelude::*;

mod common;
use common::{assertions, fixtures::*, sketchbook::*};

#[cfg(test)]
mod load_command_tests {
    use super::*;

    #[test]
    fn test_load_shows_sketch_files() -> anyhow::Result<()> {
        let sketchbook = create_blink_sketchbook()?;

        sketchbook
            .command()?
            .arg("load")
            .arg(sketchbook.path.join("Blink"))
            .assert()
            .success()
            .stdout(predicate::str::contains("Blink.ino"))
            .stdout(predicate::str::contains("Sketch files:"))
            .stdout(predicate::str::contains("tab.ino"))
            .stdout(predicate::str::contains("Additional files:"))
            .stdout(predicate::str::contains("driver.cpp"));

        Ok(())
    }

    #[test]
    fn test_load_accepts_file_uri() -> anyhow::Result<()> {
        let sketchbook = create_blink_sketchbook()?;

        let output = sketchbook
            .command()?
            .args(["--json", "load", sketchbook.uri("Blink").as_str()])
            .output()?;
        assert!(output.status.success());

        let sketch: serde_json::Value = serde_json::from_slice(&output.stdout)?;
        assert_eq!(sketch["name"], "Blink");
        assert_eq!(sketch["mainFileUri"], sketchbook.uri("Blink/Blink.ino").as_str());
        assert_eq!(sketch["otherSketchFileUris"].as_array().map(Vec::len), Some(1));
        assert!(sketch["mtimeMs"].as_u64().is_some());

        Ok(())
    }

    #[test]
    fn test_load_missing_sketch_fails() -> anyhow::Result<()> {
        let sketchbook = setup_sketchbook()?;

        sketchbook
            .command()?
            .arg("load")
            .arg(sketchbook.path.join("Missing"))
            .assert()
            .failure()
            .stderr(assertions::sketch_not_found());

        Ok(())
    }

    #[test]
    fn test_load_misnamed_sketch_reports_invalid_name() -> anyhow::Result<()> {
        let sketchbook = setup_sketchbook()?;
        create_file(&sketchbook.path, "Foo/Bar.ino", "void setup() {}\n")?;

        sketchbook
            .command()?
            .arg("load")
            .arg(sketchbook.path.join("Foo"))
            .assert()
            .failure()
            .stderr(assertions::invalid_sketch_name())
            .stderr(predicate::str::contains("Bar.ino"));

        Ok(())
    }

    #[test]
    fn test_folder_finds_enclosing_sketch() -> anyhow::Result<()> {
        let sketchbook = create_blink_sketchbook()?;

        let output = sketchbook
            .command()?
            .args(["--json", "folder"])
            .arg(sketchbook.path.join("Blink/src/driver.cpp"))
            .output()?;
        assert!(output.status.success());

        let sketch: serde_json::Value = serde_json::from_slice(&output.stdout)?;
        assert_eq!(sketch["uri"], sketchbook.uri("Blink").as_str());

        Ok(())
    }

    #[test]
    fn test_folder_outside_any_sketch() -> anyhow::Result<()> {
        let sketchbook = create_foo_bar_sketchbook()?;

        sketchbook
            .command()?
            .arg("folder")
            .arg(sketchbook.path.join("Bar/Baz.txt"))
            .assert()
            .failure()
            .stderr(assertions::sketch_not_found());

        Ok(())
    }

    #[test]
    fn test_build_dir_is_stable() -> anyhow::Result<()> {
        let sketchbook = create_blink_sketchbook()?;

        let first = sketchbook
            .command()?
            .arg("build-dir")
            .arg(sketchbook.path.join("Blink"))
            .output()?;
        let second = sketchbook
            .command()?
            .arg("build-dir")
            .arg(sketchbook.path.join("Blink"))
            .output()?;

        assert!(first.status.success());
        let build_dir = String::from_utf8(first.stdout)?;
        assert!(build_dir.contains("arduino-ide2-"));
        assert_eq!(build_dir, String::from_utf8(second.stdout)?);

        Ok(())
    }
}
