use sketch_store::core::recent::{RecentSketchesFile, MAX_RECENT_SKETCHES};
use std::fs;
use std::thread::sleep;
use std::time::Duration;

mod common;
use common::{fixtures::*, sketchbook::*};

#[cfg(test)]
mod recent_sketches_tests {
    use super::*;

    fn recorded_uris(sketchbook: &TestSketchbook) -> Vec<String> {
        let data = RecentSketchesFile::in_config_dir(&sketchbook.config_dir)
            .load()
            .unwrap();
        data.keys().cloned().collect()
    }

    #[test]
    fn test_mark_records_and_notifies() -> anyhow::Result<()> {
        let sketchbook = create_blink_sketchbook()?;
        let test_store = create_store(&sketchbook);

        let recorded = test_store
            .store
            .mark_as_recently_opened(&sketchbook.uri("Blink"))?;

        assert!(recorded);

        assert_eq!(recorded_uris(&sketchbook), vec![sketchbook.uri("Blink").to_string()]);
        assert_eq!(test_store.notifier.count(), 1);
        assert_eq!(test_store.notifier.last(), Some(vec!["Blink".to_string()]));

        let recent = test_store.store.recently_opened_sketches(false)?;
        assert_eq!(recent.len(), 1);
        assert_eq!(recent[0].name, "Blink");

        Ok(())
    }

    #[test]
    fn test_record_is_bounded_and_evicts_oldest() -> anyhow::Result<()> {
        let sketchbook = setup_sketchbook()?;
        let test_store = create_store(&sketchbook);

        for i in 0..=MAX_RECENT_SKETCHES {
            let name = format!("Sketch{i:02}");
            create_sketch(&sketchbook.path, &name)?;
            test_store
                .store
                .mark_as_recently_opened(&sketchbook.uri(&name))?;
            sleep(Duration::from_millis(3));
        }

        let uris = recorded_uris(&sketchbook);
        assert_eq!(uris.len(), MAX_RECENT_SKETCHES);
        assert!(!uris.contains(&sketchbook.uri("Sketch00").to_string()));
        assert!(uris.contains(&sketchbook.uri("Sketch01").to_string()));
        assert!(uris.contains(&sketchbook.uri("Sketch10").to_string()));

        let recent = test_store.store.recently_opened_sketches(false)?;
        assert_eq!(recent.len(), MAX_RECENT_SKETCHES);
        assert_eq!(recent[0].name, "Sketch10");
        assert_eq!(recent[MAX_RECENT_SKETCHES - 1].name, "Sketch01");

        Ok(())
    }

    #[test]
    fn test_reopening_moves_sketch_to_front() -> anyhow::Result<()> {
        let sketchbook = setup_sketchbook()?;
        create_sketch(&sketchbook.path, "First")?;
        create_sketch(&sketchbook.path, "Second")?;
        let test_store = create_store(&sketchbook);

        test_store.store.mark_as_recently_opened(&sketchbook.uri("First"))?;
        sleep(Duration::from_millis(3));
        test_store.store.mark_as_recently_opened(&sketchbook.uri("Second"))?;
        sleep(Duration::from_millis(3));
        test_store.store.mark_as_recently_opened(&sketchbook.uri("First"))?;

        let names: Vec<String> = test_store
            .store
            .recently_opened_sketches(false)?
            .into_iter()
            .map(|sketch| sketch.name.clone())
            .collect();
        assert_eq!(names, vec!["First", "Second"]);

        Ok(())
    }

    #[test]
    fn test_temp_and_missing_sketches_are_not_recorded() -> anyhow::Result<()> {
        let sketchbook = setup_sketchbook()?;
        let test_store = create_store(&sketchbook);
        let unsaved = test_store.store.create_new_sketch()?;

        assert!(!test_store.store.mark_as_recently_opened(&unsaved.uri)?);
        assert!(!test_store
            .store
            .mark_as_recently_opened(&sketchbook.uri("DoesNotExist"))?);
        create_file(&sketchbook.path, "Misnamed/Other.ino", "")?;
        assert!(!test_store
            .store
            .mark_as_recently_opened(&sketchbook.uri("Misnamed"))?);

        assert!(recorded_uris(&sketchbook).is_empty());
        assert_eq!(test_store.notifier.count(), 0);
        assert!(test_store.store.recently_opened_sketches(true)?.is_empty());

        Ok(())
    }

    #[test]
    fn test_refresh_prunes_deleted_sketches() -> anyhow::Result<()> {
        let sketchbook = setup_sketchbook()?;
        create_sketch(&sketchbook.path, "Keep")?;
        create_sketch(&sketchbook.path, "Gone")?;
        let test_store = create_store(&sketchbook);
        test_store.store.mark_as_recently_opened(&sketchbook.uri("Keep"))?;
        test_store.store.mark_as_recently_opened(&sketchbook.uri("Gone"))?;
        let notifications_before = test_store.notifier.count();

        fs::remove_dir_all(sketchbook.path.join("Gone"))?;

        // Cached list is served until a refresh is forced
        assert_eq!(test_store.store.recently_opened_sketches(false)?.len(), 2);
        assert_eq!(test_store.notifier.count(), notifications_before);

        let refreshed = test_store.store.recently_opened_sketches(true)?;
        assert_eq!(refreshed.len(), 1);
        assert_eq!(refreshed[0].name, "Keep");
        assert_eq!(recorded_uris(&sketchbook), vec![sketchbook.uri("Keep").to_string()]);
        assert_eq!(test_store.notifier.count(), notifications_before + 1);

        // Nothing left to prune, nothing to notify
        test_store.store.recently_opened_sketches(true)?;
        assert_eq!(test_store.notifier.count(), notifications_before + 1);

        Ok(())
    }

    #[test]
    fn test_existing_record_is_loaded_lazily() -> anyhow::Result<()> {
        let sketchbook = setup_sketchbook()?;
        create_sketch(&sketchbook.path, "Old")?;
        create_sketch(&sketchbook.path, "New")?;
        fs::write(
            sketchbook.config_dir.join("recent-sketches.json"),
            serde_json::json!({
                sketchbook.uri("Old").as_str(): 1000,
                sketchbook.uri("New").as_str(): 2000,
                "file:///no/such/sketch": 3000,
            })
            .to_string(),
        )?;
        let test_store = create_store(&sketchbook);

        let recent = test_store.store.recently_opened_sketches(false)?;

        let names: Vec<&str> = recent.iter().map(|sketch| sketch.name.as_str()).collect();
        assert_eq!(names, vec!["New", "Old"]);
        let data = RecentSketchesFile::in_config_dir(&sketchbook.config_dir).load()?;
        assert_eq!(data.len(), 2);
        assert_eq!(data[sketchbook.uri("Old").as_str()], 1000);
        assert_eq!(test_store.notifier.count(), 1);

        Ok(())
    }

    #[test]
    fn test_concurrent_marks_never_lose_updates() -> anyhow::Result<()> {
        let sketchbook = setup_sketchbook()?;
        let names: Vec<String> = (0..6).map(|i| format!("Parallel{i}")).collect();
        for name in &names {
            create_sketch(&sketchbook.path, name)?;
        }
        let test_store = create_store(&sketchbook);

        std::thread::scope(|scope| {
            for name in &names {
                let store = &test_store.store;
                let uri = sketchbook.uri(name);
                scope.spawn(move || assert!(store.mark_as_recently_opened(&uri).unwrap()));
            }
        });

        assert_eq!(recorded_uris(&sketchbook).len(), names.len());
        assert_eq!(test_store.notifier.count(), names.len());

        Ok(())
    }
}
